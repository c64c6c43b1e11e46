use super::*;
use crate::foundation::core::Size;
use crate::surface::memory::MemorySurface;

fn magnetic() -> (MemorySurface, TargetId, HoverEffect) {
    let mut s = MemorySurface::new(Size::new(1280.0, 800.0), 3000.0);
    let word = s.add_element(&["[data-magnetic]"], Rect::new(400.0, 1000.0, 600.0, 1100.0));
    let mut spec = HoverSpec::new(word);
    spec.follow = vec![
        PointerMapping {
            property: Property::X,
            axis: PointerAxis::X,
            scale: 0.15,
            normalized: false,
        },
        PointerMapping {
            property: Property::Rotation,
            axis: PointerAxis::X,
            scale: 0.02,
            normalized: false,
        },
    ];
    spec.on_leave = vec![
        TweenSpec::new(word)
            .to(Property::X, 0.0)
            .to(Property::Rotation, 0.0)
            .duration(1.0)
            .ease(Ease::OUT_ELASTIC),
    ];
    (s, word, HoverEffect::new(spec))
}

#[test]
fn normalized_mapping_spans_minus_one_to_one() {
    let rect = Rect::new(0.0, 0.0, 200.0, 100.0);
    let tilt = PointerMapping {
        property: Property::RotationX,
        axis: PointerAxis::Y,
        scale: -10.0,
        normalized: true,
    };
    let (offset, half) = pointer_offset(rect, Point::new(100.0, 100.0));
    assert_eq!(tilt.value(offset, half), -10.0);
    let (offset, half) = pointer_offset(rect, Point::new(100.0, 50.0));
    assert_eq!(tilt.value(offset, half), 0.0);
}

#[test]
fn hit_test_accounts_for_scroll() {
    let (mut s, _, mut fx) = magnetic();
    let mut anim = Animator::new();
    fx.update(Some(Point::new(550.0, 250.0)), &mut anim, &mut s)
        .unwrap();
    assert!(!fx.is_inside());

    s.scroll_to(800.0);
    fx.update(Some(Point::new(550.0, 250.0)), &mut anim, &mut s)
        .unwrap();
    assert!(fx.is_inside());
}

#[test]
fn follows_pointer_then_springs_back_on_leave() {
    let (mut s, word, mut fx) = magnetic();
    s.scroll_to(800.0);
    let mut anim = Animator::new();

    // 50 px right of the centre (500, 250 on screen).
    fx.update(Some(Point::new(550.0, 250.0)), &mut anim, &mut s)
        .unwrap();
    anim.advance(1.0, &mut s);
    assert!((s.number(word, Property::X).unwrap() - 7.5).abs() < 1e-9);
    assert!((s.number(word, Property::Rotation).unwrap() - 1.0).abs() < 1e-9);

    fx.update(None, &mut anim, &mut s).unwrap();
    assert!(!fx.is_inside());
    assert_eq!(anim.active_writers(word, Property::X), 1);
    anim.advance(1.0, &mut s);
    assert_eq!(s.number(word, Property::X), Some(0.0));
}

#[test]
fn leave_overrides_an_in_flight_follow() {
    let (mut s, word, mut fx) = magnetic();
    s.scroll_to(800.0);
    let mut anim = Animator::new();
    fx.update(Some(Point::new(550.0, 250.0)), &mut anim, &mut s)
        .unwrap();
    anim.advance(0.1, &mut s);
    fx.update(Some(Point::new(10.0, 10.0)), &mut anim, &mut s)
        .unwrap();
    assert_eq!(anim.active_writers(word, Property::X), 1);
    assert_eq!(anim.active_writers(word, Property::Rotation), 1);
}
