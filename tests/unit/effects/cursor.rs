use super::*;
use crate::foundation::core::{Rect, Size};
use crate::surface::memory::MemorySurface;

/// Follow a fixed target for `ticks_at_30hz / 30` seconds, sampled at `hz`.
fn run_at(hz: u32, ticks_at_30hz: u32) -> Point {
    let ratio = 60.0 / f64::from(hz);
    let frames = ticks_at_30hz * hz / 30;
    let target = Point::new(400.0, 300.0);
    let mut p = Point::ZERO;
    for _ in 0..frames {
        p = smooth_step(p, target, 0.12, ratio);
    }
    p
}

#[test]
fn smoothing_is_frame_rate_independent() {
    for ticks in [3, 8, 15, 30] {
        let slow = run_at(30, ticks);
        let fast = run_at(120, ticks);
        assert!((slow - fast).hypot() < 1e-6, "{ticks} ticks: {slow:?} vs {fast:?}");
    }
    let settled = run_at(30, 60);
    assert!((settled - Point::new(400.0, 300.0)).hypot() < 0.01);
}

#[test]
fn dot_jumps_and_aura_trails() {
    let mut s = MemorySurface::new(Size::new(1280.0, 800.0), 800.0);
    let dot = s.add_element(&["#cursor-dot"], Rect::ZERO);
    let aura = s.add_element(&["#aura-cursor"], Rect::ZERO);
    let mut anim = Animator::new();
    let mut follower = CursorFollower::new(CursorSpec::new(Some(dot), Some(aura)));

    follower
        .update(Some(Point::new(100.0, 50.0)), 1.0, false, &mut anim, &mut s)
        .unwrap();
    anim.advance(0.1, &mut s);
    assert_eq!(s.number(dot, Property::X), Some(100.0));
    assert_eq!(s.number(dot, Property::Y), Some(50.0));

    let aura_x = s.number(aura, Property::X).unwrap();
    assert!((aura_x - 12.0).abs() < 1e-9);

    for _ in 0..10 {
        follower
            .update(Some(Point::new(100.0, 50.0)), 1.0, false, &mut anim, &mut s)
            .unwrap();
    }
    assert!(s.number(aura, Property::X).unwrap() > aura_x);
    assert_eq!(anim.active_writers(dot, Property::X), 0);
}

#[test]
fn immediate_mode_snaps_the_aura() {
    let mut s = MemorySurface::new(Size::new(1280.0, 800.0), 800.0);
    let aura = s.add_element(&["#aura-cursor"], Rect::ZERO);
    let mut anim = Animator::new();
    let mut follower = CursorFollower::new(CursorSpec::new(None, Some(aura)));
    follower
        .update(Some(Point::new(640.0, 400.0)), 1.0, true, &mut anim, &mut s)
        .unwrap();
    assert_eq!(follower.smoothed(), Point::new(640.0, 400.0));
    assert_eq!(s.number(aura, Property::Y), Some(400.0));
}
