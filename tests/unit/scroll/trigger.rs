use super::*;
use crate::foundation::core::Rect;
use crate::surface::memory::MemorySurface;

const VIEWPORT: Size = Size::new(1280.0, 800.0);

fn page_with_line() -> (MemorySurface, TargetId) {
    let mut s = MemorySurface::new(VIEWPORT, 4000.0);
    let line = s.add_element(&[".manifesto-text"], Rect::new(0.0, 1000.0, 800.0, 1200.0));
    (s, line)
}

fn tracker(spec: TriggerSpec, s: &MemorySurface) -> Tracker {
    let mut t = Tracker::new(spec, Axis::Vertical);
    t.resolve(s, VIEWPORT, s.scroll_limit()).unwrap();
    t
}

#[test]
fn parses_toggle_actions() {
    let a: ToggleActions = "play none none reverse".parse().unwrap();
    assert_eq!(a.for_crossing(Crossing::Enter), ToggleAction::Play);
    assert_eq!(a.for_crossing(Crossing::LeaveBack), ToggleAction::Reverse);
    assert_eq!(ToggleActions::default().on_leave, ToggleAction::None);
    assert!("play none".parse::<ToggleActions>().is_err());
    assert!("play none none rewind".parse::<ToggleActions>().is_err());
}

#[test]
fn default_boundaries_follow_anchor() {
    let (s, line) = page_with_line();
    let t = tracker(TriggerSpec::anchored(line), &s);
    assert_eq!(t.span(), (200.0, 1200.0));

    let pinned = tracker(TriggerSpec::anchored(line).pin(true), &s);
    assert_eq!(pinned.span(), (1000.0, 1200.0));

    let free = tracker(TriggerSpec::default(), &s);
    assert_eq!(free.span(), (0.0, 3200.0));
}

#[test]
fn inverted_region_is_rejected() {
    let (s, line) = page_with_line();
    let spec = TriggerSpec::anchored(line)
        .start("bottom top".parse().unwrap())
        .end("top bottom".parse().unwrap());
    let mut t = Tracker::new(spec, Axis::Vertical);
    let err = t.resolve(&s, VIEWPORT, s.scroll_limit()).unwrap_err();
    assert!(matches!(err, ChoreoError::InvalidRegionConfig(_)));
}

#[test]
fn missing_anchor_is_reported() {
    let (s, _) = page_with_line();
    let mut t = Tracker::new(TriggerSpec::anchored(TargetId(77)), Axis::Vertical);
    let err = t.resolve(&s, VIEWPORT, s.scroll_limit()).unwrap_err();
    assert!(matches!(err, ChoreoError::TargetNotFound(_)));
}

#[test]
fn crossings_follow_the_state_machine() {
    let (s, line) = page_with_line();
    let mut t = tracker(TriggerSpec::anchored(line), &s);

    assert!(t.sample(0.0, 0.0).is_empty());
    assert_eq!(t.state(), RegionState::BeforeStart);
    assert_eq!(t.sample(300.0, 0.1).as_slice(), &[Crossing::Enter]);
    assert!(t.sample(600.0, 0.1).is_empty());
    assert_eq!(t.sample(1300.0, 0.1).as_slice(), &[Crossing::Leave]);
    assert_eq!(t.sample(1100.0, 0.1).as_slice(), &[Crossing::EnterBack]);
    assert_eq!(t.sample(100.0, 0.1).as_slice(), &[Crossing::LeaveBack]);
}

#[test]
fn jumping_the_whole_region_emits_both_crossings() {
    let (s, line) = page_with_line();
    let mut t = tracker(TriggerSpec::anchored(line), &s);
    t.sample(0.0, 0.0);
    assert_eq!(
        t.sample(3000.0, 0.016).as_slice(),
        &[Crossing::Enter, Crossing::Leave]
    );
    assert_eq!(
        t.sample(0.0, 0.016).as_slice(),
        &[Crossing::EnterBack, Crossing::LeaveBack]
    );
}

#[test]
fn first_sample_inside_the_region_enters() {
    let (s, line) = page_with_line();
    let mut t = tracker(TriggerSpec::anchored(line), &s);
    assert_eq!(t.sample(700.0, 0.0).as_slice(), &[Crossing::Enter]);
    assert_eq!(t.velocity(), 0.0);
}

#[test]
fn progress_is_monotonic_in_scroll_position() {
    let (s, line) = page_with_line();
    let mut t = tracker(TriggerSpec::anchored(line), &s);
    let mut last = -1.0;
    for i in 0..=40 {
        t.sample(f64::from(i) * 40.0, 0.016);
        let p = t.progress();
        assert!((0.0..=1.0).contains(&p));
        assert!(p >= last);
        last = p;
    }
    t.sample(700.0, 0.016);
    assert!((t.progress() - 0.5).abs() < 1e-12);
}

#[test]
fn velocity_is_signed_pixels_per_second() {
    let (s, line) = page_with_line();
    let mut t = tracker(TriggerSpec::anchored(line), &s);
    t.sample(100.0, 0.0);
    t.sample(150.0, 0.1);
    assert!((t.velocity() - 500.0).abs() < 1e-9);
    t.sample(120.0, 0.1);
    assert!((t.velocity() + 300.0).abs() < 1e-9);
    t.sample(120.0, 0.0);
    assert!((t.velocity() + 300.0).abs() < 1e-9);
}

#[test]
fn pin_offset_keeps_anchor_fixed_while_active() {
    let (s, line) = page_with_line();
    let mut t = tracker(TriggerSpec::anchored(line).pin(true), &s);
    t.sample(900.0, 0.0);
    assert_eq!(t.pin_offset(), Some(0.0));
    for pos in [1000.0, 1050.0, 1150.0, 1200.0] {
        t.sample(pos, 0.016);
        // Viewport-relative anchor top: layout top - scroll + compensation.
        let on_screen = 1000.0 - pos + t.pin_offset().unwrap();
        assert_eq!(on_screen, 0.0);
    }
    t.sample(1500.0, 0.016);
    assert_eq!(t.pin_offset(), Some(200.0));
}

#[test]
fn direct_scrub_tracks_raw_progress() {
    let (s, line) = page_with_line();
    let mut t = tracker(TriggerSpec::anchored(line).scrub(Scrub::Direct), &s);
    assert!(t.scrubbed());
    t.sample(700.0, 0.0);
    assert_eq!(t.update_effective(0.0), 0.5);
    t.sample(950.0, 0.016);
    assert_eq!(t.update_effective(0.016), 0.75);
}
