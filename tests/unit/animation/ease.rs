use super::*;

const ALL: [Ease; 17] = [
    Ease::Linear,
    Ease::InQuad,
    Ease::OutQuad,
    Ease::InOutQuad,
    Ease::InCubic,
    Ease::OutCubic,
    Ease::InOutCubic,
    Ease::InQuart,
    Ease::OutQuart,
    Ease::InOutQuart,
    Ease::InQuint,
    Ease::OutQuint,
    Ease::InOutQuint,
    Ease::InExpo,
    Ease::OutExpo,
    Ease::OUT_ELASTIC,
    Ease::OUT_BACK,
];

#[test]
fn endpoints_are_exact() {
    for ease in ALL {
        assert!(ease.apply(0.0).abs() < 1e-9, "{ease:?} at 0");
        assert!((ease.apply(1.0) - 1.0).abs() < 1e-9, "{ease:?} at 1");
    }
}

#[test]
fn input_is_clamped() {
    assert_eq!(Ease::OutCubic.apply(-3.0), 0.0);
    assert_eq!(Ease::OutCubic.apply(7.0), 1.0);
}

#[test]
fn in_out_is_symmetric_at_midpoint() {
    for ease in [
        Ease::InOutQuad,
        Ease::InOutCubic,
        Ease::InOutQuart,
        Ease::InOutQuint,
    ] {
        assert!((ease.apply(0.5) - 0.5).abs() < 1e-12);
    }
}

#[test]
fn back_and_elastic_overshoot() {
    let back = Ease::OutBack { overshoot: 1.7 };
    let peak = (1..100)
        .map(|i| back.apply(i as f64 / 100.0))
        .fold(f64::MIN, f64::max);
    assert!(peak > 1.0);

    let elastic = Ease::OutElastic {
        amplitude: 1.2,
        period: 0.4,
    };
    let peak = (1..100)
        .map(|i| elastic.apply(i as f64 / 100.0))
        .fold(f64::MIN, f64::max);
    assert!(peak > 1.0);
}

#[test]
fn parses_gsap_names() {
    assert_eq!("none".parse::<Ease>().unwrap(), Ease::Linear);
    assert_eq!("power4.out".parse::<Ease>().unwrap(), Ease::OutQuint);
    assert_eq!("power2.out".parse::<Ease>().unwrap(), Ease::OutCubic);
    assert_eq!("power3.out".parse::<Ease>().unwrap(), Ease::OutQuart);
    assert_eq!("power4.inOut".parse::<Ease>().unwrap(), Ease::InOutQuint);
    assert_eq!("power4.in".parse::<Ease>().unwrap(), Ease::InQuint);
    assert_eq!("expo.out".parse::<Ease>().unwrap(), Ease::OutExpo);
    assert_eq!("expo".parse::<Ease>().unwrap(), Ease::OutExpo);
    assert_eq!(
        "elastic.out(1.2, 0.4)".parse::<Ease>().unwrap(),
        Ease::OutElastic {
            amplitude: 1.2,
            period: 0.4
        }
    );
    assert_eq!(
        "back.out(1.7)".parse::<Ease>().unwrap(),
        Ease::OutBack { overshoot: 1.7 }
    );
}

#[test]
fn rejects_unknown_names() {
    assert!("wobble.out".parse::<Ease>().is_err());
    assert!("elastic.out(1.2".parse::<Ease>().is_err());
    assert!("back.out(x)".parse::<Ease>().is_err());
}

#[test]
fn misordered_parentheses_are_errors() {
    for bad in [")(", "x)(", "back.out)1.7("] {
        assert!(
            matches!(bad.parse::<Ease>(), Err(ChoreoError::Validation(_))),
            "{bad}"
        );
    }
}
