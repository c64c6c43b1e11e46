use super::*;

#[test]
fn smoothing_factor_composes_across_frame_rates() {
    let base = 0.12;
    // Four 240Hz frames cover the same distance as one 60Hz frame.
    let f60 = smoothing_factor(base, 1.0);
    let f240 = smoothing_factor(base, 0.25);
    let remaining_240 = (1.0 - f240).powi(4);
    assert!((remaining_240 - (1.0 - f60)).abs() < 1e-12);
    assert!((f60 - base).abs() < 1e-12);
}

#[test]
fn smoothing_factor_handles_degenerate_input() {
    assert_eq!(smoothing_factor(0.5, 0.0), 0.0);
    assert_eq!(smoothing_factor(1.0, 0.3), 1.0);
    assert_eq!(smoothing_factor(0.5, -2.0), 0.0);
}

#[test]
fn snap_rounds_to_nearest_increment() {
    assert!((snap_to_increment(0.3, 0.5) - 0.5).abs() < 1e-12);
    assert!((snap_to_increment(0.2, 0.5) - 0.0).abs() < 1e-12);
    assert!((snap_to_increment(0.9, 0.5) - 1.0).abs() < 1e-12);
    assert_eq!(snap_to_increment(0.42, 0.0), 0.42);
}

#[test]
fn normalized_clamps_and_steps() {
    assert_eq!(normalized(-5.0, 10.0), 0.0);
    assert_eq!(normalized(5.0, 10.0), 0.5);
    assert_eq!(normalized(50.0, 10.0), 1.0);
    assert_eq!(normalized(0.0, 0.0), 1.0);
    assert_eq!(normalized(-1.0, 0.0), 0.0);
}
