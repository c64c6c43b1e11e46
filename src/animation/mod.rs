//! Tweens, timelines and the animator that drives them.

/// Animator: ownership, overwrite rules, playback control.
pub mod animator;
/// Easing curves.
pub mod ease;
/// Timelines and child placement.
pub mod timeline;
/// Single-target tweens.
pub mod tween;
