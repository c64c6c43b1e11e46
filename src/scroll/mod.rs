//! Scroll-linked regions: boundaries, trackers, scrub smoothing and horizontal containers.

/// Region boundary parsing and resolution.
pub mod boundary;
/// Horizontal pin-scroll containers.
pub mod horizontal;
/// Scrub smoothing and snapping.
pub mod scrub;
/// Trigger regions and their tracker state machine.
pub mod trigger;
