use super::*;

fn t0() -> TargetId {
    TargetId(0)
}

#[test]
fn builder_collects_properties_once() {
    let spec = TweenSpec::new(t0())
        .from(Property::Opacity, 0.0)
        .from(Property::Y, 50.0)
        .to(Property::Y, 0.0)
        .duration(1.2)
        .ease(Ease::OutQuint)
        .overwrite(true);
    assert_eq!(
        spec.properties().as_slice(),
        &[Property::Y, Property::Opacity]
    );
    assert_eq!(spec.overwrite, Overwrite::All);
    assert_eq!(spec.ease, Some(Ease::OutQuint));
}

#[test]
fn playhead_clamps_and_reports_progress() {
    let mut ph = Playhead::new(2.0);
    assert!(ph.advance(0.5));
    assert!((ph.progress() - 0.25).abs() < 1e-12);
    assert!(ph.advance(10.0));
    assert!(ph.at_end());
    assert!(!ph.advance(1.0));

    ph.reversed = true;
    assert!(ph.advance(0.5));
    assert!((ph.time - 1.5).abs() < 1e-12);

    ph.paused = true;
    assert!(!ph.advance(0.5));
    assert!(!ph.is_running());
}

#[test]
fn completion_fires_once_per_crossing() {
    let mut ph = Playhead::new(1.0);
    ph.advance(1.0);
    assert_eq!(ph.check_finish(), Some(Finish::Completed));
    assert_eq!(ph.check_finish(), None);

    ph.seek_progress(0.5);
    assert_eq!(ph.check_finish(), None);
    ph.seek_progress(1.0);
    assert_eq!(ph.check_finish(), Some(Finish::Completed));

    ph.reversed = true;
    ph.advance(5.0);
    assert_eq!(ph.check_finish(), Some(Finish::ReverseCompleted));
    assert_eq!(ph.check_finish(), None);
}

#[test]
fn frame_values_capture_start_lazily() {
    let spec = TweenSpec::new(t0())
        .to(Property::X, 100.0)
        .duration(1.0)
        .delay(0.5)
        .ease(Ease::Linear);
    let mut tween = Tween::new(spec, 0);
    let mut captured = 0;

    tween.playhead.advance(0.25);
    assert!(tween.frame_values(|_| {
        captured += 1;
        Value::Number(20.0)
    })
    .is_none());
    assert_eq!(captured, 0);

    tween.playhead.advance(0.75);
    let values = tween
        .frame_values(|_| {
            captured += 1;
            Value::Number(20.0)
        })
        .unwrap();
    assert_eq!(captured, 1);
    assert_eq!(values[0].1, Value::Number(60.0));

    tween.playhead.advance(1.0);
    let values = tween.frame_values(|_| Value::Number(999.0)).unwrap();
    assert_eq!(values[0].1, Value::Number(100.0));
}

#[test]
fn from_only_properties_end_at_current_value() {
    let spec = TweenSpec::new(t0())
        .from(Property::Opacity, 0.0)
        .duration(1.0)
        .ease(Ease::Linear);
    let mut tween = Tween::new(spec, 0);
    tween.resolve_from_only(|_| Value::Number(0.8));
    assert_eq!(tween.spec.to.as_slice(), &[(Property::Opacity, Value::Number(0.8))]);

    let at_zero = tween.frame_values(|_| unreachable!()).unwrap();
    assert_eq!(at_zero[0].1, Value::Number(0.0));
}

#[test]
fn zero_duration_is_a_step() {
    let spec = TweenSpec::new(t0()).to(Property::Y, 10.0).duration(0.0);
    let tween = Tween::new(spec, 0);
    assert_eq!(tween.total_duration(), 0.0);
    assert_eq!(tween.eased(), 1.0);
}

#[test]
fn stripping_every_property_empties_the_tween() {
    let spec = TweenSpec::new(t0())
        .to(Property::X, 1.0)
        .to(Property::Y, 2.0);
    let mut tween = Tween::new(spec, 0);
    assert!(!tween.strip_properties(&[Property::X]));
    assert!(tween.strip_properties(&[Property::Y]));
}
