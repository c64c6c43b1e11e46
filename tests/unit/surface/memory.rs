use super::*;

fn page() -> MemorySurface {
    MemorySurface::new(Size::new(1280.0, 800.0), 4000.0)
}

#[test]
fn select_matches_any_tag_in_document_order() {
    let mut s = page();
    let a = s.add_element(&[".manifesto-text"], Rect::new(0.0, 900.0, 600.0, 960.0));
    let _b = s.add_element(&["#aura"], Rect::new(0.0, 0.0, 10.0, 10.0));
    let c = s.add_element(&[".manifesto-text", "#last"], Rect::new(0.0, 1000.0, 600.0, 1060.0));
    assert_eq!(s.select(".manifesto-text"), vec![a, c]);
    assert_eq!(s.select("#last"), vec![c]);
    assert!(s.select(".missing").is_empty());
}

#[test]
fn scroll_is_clamped_to_content() {
    let mut s = page();
    s.scroll_to(10_000.0);
    assert_eq!(s.scroll_offset(), 3200.0);
    s.scroll_to(-5.0);
    assert_eq!(s.scroll_offset(), 0.0);
}

#[test]
fn writes_to_removed_elements_are_dropped() {
    let mut s = page();
    let a = s.add_element(&["#a"], Rect::ZERO);
    s.apply_properties(a, &[(Property::Opacity, Value::Number(0.5))]);
    assert_eq!(s.number(a, Property::Opacity), Some(0.5));
    assert_eq!(s.write_count(), 1);

    assert!(s.remove_element(a));
    s.apply_properties(a, &[(Property::Opacity, Value::Number(1.0))]);
    assert!(!s.contains(a));
    assert_eq!(s.write_count(), 1);
}
