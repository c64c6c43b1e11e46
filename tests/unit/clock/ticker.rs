use super::*;

type Cb = dyn FnMut(&mut Vec<&'static str>) -> anyhow::Result<()>;

fn cb(f: impl FnMut(&mut Vec<&'static str>) -> anyhow::Result<()> + 'static) -> Box<Cb> {
    Box::new(f)
}

#[test]
fn re_registering_a_key_replaces_it() {
    let mut ticker: Ticker<Cb> = Ticker::new();
    assert!(!ticker.add(
        "aura",
        cb(|log| {
            log.push("old");
            Ok(())
        })
    ));
    assert!(ticker.add(
        "aura",
        cb(|log| {
            log.push("new");
            Ok(())
        })
    ));
    assert_eq!(ticker.len(), 1);

    let mut log = Vec::new();
    ticker.dispatch(|f| f(&mut log));
    assert_eq!(log, vec!["new"]);
}

#[test]
fn failing_callbacks_are_isolated() {
    let mut ticker: Ticker<Cb> = Ticker::new();
    ticker.add(
        "a",
        cb(|log| {
            log.push("a");
            Ok(())
        }),
    );
    ticker.add("bad", cb(|_| anyhow::bail!("boom")));
    ticker.add(
        "c",
        cb(|log| {
            log.push("c");
            Ok(())
        }),
    );

    let mut log = Vec::new();
    let faults = ticker.dispatch(|f| f(&mut log));
    assert_eq!(faults, 1);
    assert_eq!(log, vec!["a", "c"]);
}

#[test]
fn remove_reports_presence() {
    let mut ticker: Ticker<Cb> = Ticker::new();
    ticker.add("a", cb(|_| Ok(())));
    assert!(ticker.remove("a"));
    assert!(!ticker.remove("a"));
    assert!(ticker.is_empty());
    assert_eq!(ticker.keys().count(), 0);
}
