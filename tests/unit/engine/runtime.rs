use std::cell::{Cell, RefCell};
use std::rc::Rc;

use super::*;
use crate::foundation::core::{Rect, Size};
use crate::scroll::trigger::ToggleActions;
use crate::surface::memory::MemorySurface;

const VIEWPORT: Size = Size::new(1280.0, 800.0);
const STEP: f64 = 0.05;

fn page() -> (MemorySurface, TargetId) {
    let mut s = MemorySurface::new(VIEWPORT, 4000.0);
    let el = s.add_element(&[".reveal"], Rect::new(0.0, 1000.0, 800.0, 1200.0));
    (s, el)
}

fn engine() -> Engine {
    Engine::new(EngineOptions {
        seed: Some(1),
        ..EngineOptions::default()
    })
}

/// Tick at a steady 20 Hz from frame `from` for `frames` frames; returns the next frame index.
fn run(engine: &mut Engine, s: &mut MemorySurface, from: u32, frames: u32) -> u32 {
    for i in from..from + frames {
        engine.tick(f64::from(i) * STEP, s);
    }
    from + frames
}

fn callback(
    f: impl for<'a> FnMut(&mut FrameCtx<'a>) -> anyhow::Result<()> + 'static,
) -> Box<FrameCallback> {
    Box::new(f)
}

#[test]
fn toggle_actions_play_and_reverse_the_region_animation() {
    let (mut s, el) = page();
    s.set_property(el, Property::Opacity, Value::Number(0.0));
    let mut e = engine();
    let fade = e
        .register_tween(
            TweenSpec::new(el)
                .to(Property::Opacity, 1.0)
                .duration(1.0)
                .ease(Ease::Linear),
            &mut s,
        )
        .unwrap();
    let region = e
        .register_trigger(
            TriggerSpec::anchored(el)
                .start("top 80%".parse().unwrap())
                .animation(fade)
                .toggle_actions("play none none reverse".parse::<ToggleActions>().unwrap()),
            &mut s,
        )
        .unwrap();

    let mut f = run(&mut e, &mut s, 0, 5);
    assert_eq!(s.number(el, Property::Opacity), Some(0.0));
    assert!(e.drain_events().is_empty());

    s.scroll_to(400.0);
    f = run(&mut e, &mut s, f, 30);
    assert_eq!(s.number(el, Property::Opacity), Some(1.0));
    let events = e.drain_events();
    assert_eq!(
        events[0],
        EngineEvent::Trigger {
            id: region,
            crossing: Crossing::Enter
        }
    );
    assert!(events.contains(&EngineEvent::Animation(AnimationEvent::Completed(fade.into()))));
    assert!(e.animator().contains(fade));

    s.scroll_to(0.0);
    run(&mut e, &mut s, f, 30);
    assert_eq!(s.number(el, Property::Opacity), Some(0.0));
    let events = e.drain_events();
    assert!(events.contains(&EngineEvent::Trigger {
        id: region,
        crossing: Crossing::LeaveBack
    }));
    assert!(
        events.contains(&EngineEvent::Animation(AnimationEvent::ReverseCompleted(
            fade.into()
        )))
    );
}

#[test]
fn direct_scrub_writes_scroll_progress() {
    let (mut s, el) = page();
    let mut e = engine();
    let slide = e
        .register_tween(
            TweenSpec::new(el)
                .to(Property::X, 100.0)
                .duration(1.0)
                .ease(Ease::Linear),
            &mut s,
        )
        .unwrap();
    let region = e
        .register_trigger(
            TriggerSpec::default()
                .start(Boundary::Absolute(0.0))
                .end(Boundary::Absolute(1000.0))
                .scrub(Scrub::Direct)
                .animation(slide),
            &mut s,
        )
        .unwrap();

    s.scroll_to(250.0);
    let f = run(&mut e, &mut s, 0, 3);
    assert!((s.number(el, Property::X).unwrap() - 25.0).abs() < 1e-9);
    assert_eq!(e.trigger_snapshot(region).unwrap().progress, 0.25);

    s.scroll_to(1000.0);
    run(&mut e, &mut s, f, 1);
    assert!((s.number(el, Property::X).unwrap() - 100.0).abs() < 1e-9);
    assert!(e.animator().contains(slide));
}

#[test]
fn pinned_anchor_holds_its_viewport_position() {
    let (mut s, el) = page();
    let mut e = engine();
    let region = e
        .register_trigger(
            TriggerSpec::anchored(el)
                .pin(true)
                .end("+=500".parse().unwrap()),
            &mut s,
        )
        .unwrap();
    assert_eq!(e.trigger_snapshot(region).unwrap().start, 1000.0);

    let mut f = 0;
    for scroll in [900.0, 1000.0, 1130.0, 1420.0, 1500.0] {
        s.scroll_to(scroll);
        f = run(&mut e, &mut s, f, 1);
        let pin = s.number(el, Property::PinOffset).unwrap();
        let on_screen = 1000.0 - scroll + pin;
        if scroll >= 1000.0 {
            assert!((on_screen - 0.0).abs() < 1e-9, "scroll {scroll}");
        } else {
            assert_eq!(pin, 0.0);
        }
    }
    s.scroll_to(1800.0);
    run(&mut e, &mut s, f, 1);
    assert_eq!(s.number(el, Property::PinOffset), Some(500.0));
}

#[test]
fn malformed_regions_fail_at_registration() {
    let (mut s, el) = page();
    let mut e = engine();

    let err = e
        .register_trigger(
            TriggerSpec::anchored(el)
                .start("bottom top".parse().unwrap())
                .end("top bottom".parse().unwrap()),
            &mut s,
        )
        .unwrap_err();
    assert!(matches!(err, ChoreoError::InvalidRegionConfig(_)));

    let stray = ContainerId(Arena::<()>::new().insert(()));
    let err = e
        .register_trigger(TriggerSpec::anchored(el).container(stray), &mut s)
        .unwrap_err();
    assert!(matches!(err, ChoreoError::InvalidRegionConfig(_)));

    let err = e
        .register_horizontal(HorizontalSpec::new(el, el, Vec::new()), &mut s)
        .unwrap_err();
    assert!(matches!(err, ChoreoError::InvalidRegionConfig(_)));

    let single = e
        .register_horizontal(HorizontalSpec::new(el, el, vec![el]), &mut s)
        .unwrap();
    assert_eq!(e.container_snapshot(single).unwrap().travel, 0.0);
    let err = e
        .register_trigger(
            TriggerSpec::anchored(el).container(single).pin(true),
            &mut s,
        )
        .unwrap_err();
    assert!(matches!(err, ChoreoError::InvalidRegionConfig(_)));

    let err = e
        .register_trigger(TriggerSpec::anchored(TargetId(99)), &mut s)
        .unwrap_err();
    assert!(matches!(err, ChoreoError::TargetNotFound(_)));
}

#[test]
fn horizontal_container_drives_panels_and_nested_regions() {
    let mut s = MemorySurface::new(VIEWPORT, 10_000.0);
    let wrapper = s.add_element(&[".horizontal-wrapper"], Rect::new(0.0, 1000.0, 1280.0, 1800.0));
    let track = s.add_element(&[".horizontal-track"], Rect::new(0.0, 1000.0, 3840.0, 1800.0));
    let panels: Vec<TargetId> = (0..3)
        .map(|i| {
            let x = f64::from(i) * 1280.0;
            s.add_element(&[".panel"], Rect::new(x, 1000.0, x + 1280.0, 1800.0))
        })
        .collect();
    let mut e = engine();
    let mut spec = HorizontalSpec::new(wrapper, track, panels.clone());
    spec.scrub = Scrub::Direct;
    spec.snap = None;
    let container = e.register_horizontal(spec, &mut s).unwrap();
    let nested = e
        .register_trigger(
            TriggerSpec::anchored(panels[2])
                .start("left center".parse().unwrap())
                .container(container),
            &mut s,
        )
        .unwrap();
    assert_eq!(e.trigger_snapshot(nested).unwrap().start, 1920.0);

    s.scroll_to(1000.0 + 1920.0);
    let f = run(&mut e, &mut s, 0, 2);
    let snap = e.container_snapshot(container).unwrap();
    assert!((snap.progress - 0.5).abs() < 1e-9);
    assert!((snap.offset_percent + 100.0).abs() < 1e-9);
    assert!((snap.offset_px + 1280.0).abs() < 1e-9);
    for p in &panels {
        assert!((s.number(*p, Property::XPercent).unwrap() + 100.0).abs() < 1e-9);
    }
    assert_eq!(
        e.trigger_snapshot(nested).unwrap().state,
        crate::scroll::trigger::RegionState::BeforeStart
    );
    e.drain_events();

    s.scroll_to(1000.0 + 0.8 * 3840.0);
    run(&mut e, &mut s, f, 1);
    assert!(e.drain_events().contains(&EngineEvent::Trigger {
        id: nested,
        crossing: Crossing::Enter
    }));
}

#[test]
fn velocity_spike_decays() {
    let (mut s, el) = page();
    let mut e = engine();
    e.register_velocity(VelocitySpec::new(vec![el]), &mut s)
        .unwrap();
    let f = run(&mut e, &mut s, 0, 1);
    s.scroll_to(500.0);
    run(&mut e, &mut s, f, 1);
    let skew = s.number(el, Property::SkewY).unwrap();
    assert!(skew < 0.0 && skew > -15.0, "{skew}");
}

#[test]
fn retriggered_reveal_replaces_its_timer() {
    let (mut s, el) = page();
    let mut e = engine();
    let mut spec = DecryptSpec::new(el, "ABC");
    spec.trigger = Some(TriggerSpec::anchored(el).start("top 80%".parse().unwrap()));
    let region = e.register_decrypt(spec, &mut s).unwrap();
    assert!(region.is_some());

    let mut f = run(&mut e, &mut s, 0, 1);
    assert!(e.timers.is_empty());
    s.scroll_to(400.0);
    f = run(&mut e, &mut s, f, 1);
    assert!(e.decrypt_running(el));
    assert_eq!(e.timers.len(), 1);

    s.scroll_to(0.0);
    f = run(&mut e, &mut s, f, 1);
    s.scroll_to(400.0);
    f = run(&mut e, &mut s, f, 1);
    assert_eq!(e.timers.len(), 1);

    run(&mut e, &mut s, f, 20);
    assert!(!e.decrypt_running(el));
    assert!(e.timers.is_empty());
    assert_eq!(s.property(el, Property::Text), Some(&Value::from("ABC")));
    assert!(
        e.drain_events()
            .contains(&EngineEvent::DecryptCompleted { target: el })
    );
}

#[test]
fn reduced_motion_reveals_at_once() {
    let (mut s, el) = page();
    let mut e = Engine::new(EngineOptions {
        reduced_motion: true,
        seed: Some(3),
        ..EngineOptions::default()
    });
    e.register_decrypt(DecryptSpec::new(el, "SYSTEM"), &mut s)
        .unwrap();
    assert_eq!(s.property(el, Property::Text), Some(&Value::from("SYSTEM")));
    assert_eq!(
        e.drain_events(),
        vec![EngineEvent::DecryptCompleted { target: el }]
    );
}

#[test]
fn failing_ticker_does_not_stop_the_others() {
    let (mut s, el) = page();
    let mut e = engine();
    let seen = Rc::new(Cell::new(0));
    let counter = Rc::clone(&seen);
    e.add_ticker("broken", callback(|_| Err(anyhow::anyhow!("boom"))));
    e.add_ticker(
        "counter",
        callback(move |ctx| {
            counter.set(counter.get() + 1);
            ctx.animator
                .set(el, &[(Property::Opacity, Value::Number(0.5))], ctx.surface)?;
            Ok(())
        }),
    );
    assert!(e.add_ticker("broken", callback(|_| Err(anyhow::anyhow!("still broken")))));

    run(&mut e, &mut s, 0, 3);
    assert_eq!(seen.get(), 3);
    assert_eq!(s.number(el, Property::Opacity), Some(0.5));
    assert!(e.remove_ticker("broken"));
    assert!(!e.remove_ticker("broken"));
}

#[test]
fn frame_callbacks_only_see_this_frames_events() {
    let (mut s, el) = page();
    let mut e = engine();
    let fade = e
        .register_tween(
            TweenSpec::new(el)
                .to(Property::Opacity, 0.0)
                .duration(0.05)
                .ease(Ease::Linear),
            &mut s,
        )
        .unwrap();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let log = Rc::clone(&seen);
    e.add_ticker(
        "events",
        callback(move |ctx| {
            log.borrow_mut().push(ctx.events.len());
            Ok(())
        }),
    );

    run(&mut e, &mut s, 0, 5);
    assert_eq!(*seen.borrow(), vec![0, 1, 0, 0, 0]);
    assert_eq!(
        e.drain_events(),
        vec![EngineEvent::Animation(AnimationEvent::Completed(fade.into()))]
    );
}

#[test]
fn undrained_events_are_capped() {
    let (mut s, el) = page();
    let mut e = engine();
    for _ in 0..MAX_PENDING_EVENTS + 100 {
        e.register_tween(TweenSpec::new(el).to(Property::X, 1.0).duration(0.05), &mut s)
            .unwrap();
    }
    run(&mut e, &mut s, 0, 3);
    assert_eq!(e.drain_events().len(), MAX_PENDING_EVENTS);
}
