//! Renderer surface boundary.
//!
//! The engine reads scroll, viewport, geometry and pointer state from a [`Surface`] once per
//! frame and writes computed properties back through [`Surface::apply_properties`].

use crate::foundation::core::{Point, Property, Rect, Size, TargetId, Value};

/// In-memory surface for tests and headless hosts.
pub mod memory;

/// Contract between the engine and whatever draws the page.
///
/// Geometry contract: [`Surface::bounds`] reports the element's layout rectangle in document
/// coordinates (as if the page were not scrolled), unaffected by properties the engine writes.
pub trait Surface {
    /// Whether `target` still exists.
    fn contains(&self, target: TargetId) -> bool;

    /// Resolve a selector to targets, in document order.
    fn select(&self, selector: &str) -> Vec<TargetId>;

    /// Current vertical scroll offset in pixels.
    fn scroll_offset(&self) -> f64;

    /// Maximum vertical scroll offset in pixels.
    fn scroll_limit(&self) -> f64;

    /// Viewport dimensions in pixels.
    fn viewport(&self) -> Size;

    /// Layout rectangle of `target` in document coordinates.
    fn bounds(&self, target: TargetId) -> Option<Rect>;

    /// Pointer position in viewport coordinates, if the pointer is over the page.
    fn pointer(&self) -> Option<Point>;

    /// Current value of a property as known by the renderer (e.g. authored styles).
    fn read_property(&self, _target: TargetId, _property: Property) -> Option<Value> {
        None
    }

    /// Reflect `props` on `target` within the current frame.
    fn apply_properties(&mut self, target: TargetId, props: &[(Property, Value)]);
}
