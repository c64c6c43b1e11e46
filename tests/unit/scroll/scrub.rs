use super::*;

const DT: f64 = 1.0 / 60.0;

#[test]
fn zero_lag_follows_directly() {
    let mut f = ScrubFollower::new(0.0);
    f.update(0.0, DT, None);
    assert_eq!(f.update(0.4, DT, None), 0.4);
    assert_eq!(f.update(0.9, DT, None), 0.9);
}

#[test]
fn flick_is_eased_and_caught_up_within_one_lag() {
    let mut f = ScrubFollower::new(1.0);
    f.update(0.0, DT, None);

    let first = f.update(1.0, DT, None);
    assert!(first > 0.0 && first < 0.5, "{first}");

    let mut last = first;
    for _ in 0..59 {
        let v = f.update(1.0, DT, None);
        assert!(v >= last);
        last = v;
    }
    assert!((last - 1.0).abs() < 1e-9);
}

#[test]
fn snap_waits_for_quiet_then_settles_on_increment() {
    let snap = SnapSpec::new(0.5);
    let mut f = ScrubFollower::new(0.0);
    f.update(0.0, DT, Some(&snap));
    assert_eq!(f.update(0.3, DT, Some(&snap)), 0.3);

    // Still inside the quiet period.
    for _ in 0..3 {
        assert_eq!(f.update(0.3, DT, Some(&snap)), 0.3);
    }
    for _ in 0..120 {
        f.update(0.3, DT, Some(&snap));
    }
    assert!((f.current() - 0.5).abs() < 1e-9);
    assert_eq!(f.target(), 0.5);
}

#[test]
fn scrolling_again_cancels_the_snap() {
    let snap = SnapSpec::new(0.5);
    let mut f = ScrubFollower::new(0.0);
    f.update(0.0, DT, Some(&snap));
    f.update(0.3, DT, Some(&snap));
    for _ in 0..60 {
        f.update(0.3, DT, Some(&snap));
    }
    assert_eq!(f.update(0.1, DT, Some(&snap)), 0.1);
}
