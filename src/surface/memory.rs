use std::collections::BTreeMap;

use crate::foundation::core::{Point, Property, Rect, Size, TargetId, Value};
use crate::surface::Surface;

#[derive(Debug, Clone)]
struct MemoryElement {
    tags: Vec<String>,
    bounds: Rect,
    props: BTreeMap<Property, Value>,
}

/// Surface that stores everything in memory.
///
/// Selectors match by exact tag: an element added with tags `["#aura", ".glow"]` is returned by
/// `select("#aura")` and `select(".glow")`.
#[derive(Debug, Clone)]
pub struct MemorySurface {
    elements: BTreeMap<TargetId, MemoryElement>,
    next_id: u32,
    scroll: f64,
    content_height: f64,
    viewport: Size,
    pointer: Option<Point>,
    writes: u64,
}

impl MemorySurface {
    /// Create an empty page with the given viewport and total content height.
    pub fn new(viewport: Size, content_height: f64) -> Self {
        Self {
            elements: BTreeMap::new(),
            next_id: 0,
            scroll: 0.0,
            content_height,
            viewport,
            pointer: None,
            writes: 0,
        }
    }

    /// Add an element and return its handle.
    pub fn add_element(&mut self, tags: &[&str], bounds: Rect) -> TargetId {
        let id = TargetId(self.next_id);
        self.next_id += 1;
        self.elements.insert(
            id,
            MemoryElement {
                tags: tags.iter().map(|t| (*t).to_owned()).collect(),
                bounds,
                props: BTreeMap::new(),
            },
        );
        id
    }

    /// Remove an element; handles to it become dangling.
    pub fn remove_element(&mut self, target: TargetId) -> bool {
        self.elements.remove(&target).is_some()
    }

    /// Change an element's layout rectangle.
    pub fn set_bounds(&mut self, target: TargetId, bounds: Rect) {
        if let Some(el) = self.elements.get_mut(&target) {
            el.bounds = bounds;
        }
    }

    /// Seed an authored property value (what the stylesheet would say).
    pub fn set_property(&mut self, target: TargetId, property: Property, value: Value) {
        if let Some(el) = self.elements.get_mut(&target) {
            el.props.insert(property, value);
        }
    }

    /// Set the scroll offset, clamped to the scrollable range.
    pub fn scroll_to(&mut self, offset: f64) {
        self.scroll = offset.clamp(0.0, self.scroll_limit());
    }

    /// Move (or remove) the pointer.
    pub fn set_pointer(&mut self, pointer: Option<Point>) {
        self.pointer = pointer;
    }

    /// Resize the viewport.
    pub fn set_viewport(&mut self, viewport: Size) {
        self.viewport = viewport;
    }

    /// Last written (or seeded) value of a property.
    pub fn property(&self, target: TargetId, property: Property) -> Option<&Value> {
        self.elements.get(&target)?.props.get(&property)
    }

    /// Numeric shorthand for [`MemorySurface::property`].
    pub fn number(&self, target: TargetId, property: Property) -> Option<f64> {
        self.property(target, property).and_then(Value::as_number)
    }

    /// Total number of property writes applied so far.
    pub fn write_count(&self) -> u64 {
        self.writes
    }
}

impl Surface for MemorySurface {
    fn contains(&self, target: TargetId) -> bool {
        self.elements.contains_key(&target)
    }

    fn select(&self, selector: &str) -> Vec<TargetId> {
        let selector = selector.trim();
        self.elements
            .iter()
            .filter(|(_, el)| el.tags.iter().any(|t| t == selector))
            .map(|(id, _)| *id)
            .collect()
    }

    fn scroll_offset(&self) -> f64 {
        self.scroll
    }

    fn scroll_limit(&self) -> f64 {
        (self.content_height - self.viewport.height).max(0.0)
    }

    fn viewport(&self) -> Size {
        self.viewport
    }

    fn bounds(&self, target: TargetId) -> Option<Rect> {
        self.elements.get(&target).map(|el| el.bounds)
    }

    fn pointer(&self) -> Option<Point> {
        self.pointer
    }

    fn read_property(&self, target: TargetId, property: Property) -> Option<Value> {
        self.property(target, property).cloned()
    }

    fn apply_properties(&mut self, target: TargetId, props: &[(Property, Value)]) {
        let Some(el) = self.elements.get_mut(&target) else {
            return;
        };
        for (p, v) in props {
            el.props.insert(*p, v.clone());
            self.writes += 1;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/surface/memory.rs"]
mod tests;
