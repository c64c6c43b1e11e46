//! Interaction effects layered on the animator and trackers.
//!
//! Each effect keeps a small amount of per-frame state and turns it into tweens or direct writes
//! when the engine steps it.

/// Dual-layer pointer follower.
pub mod cursor;
/// Character-substitution text reveal.
pub mod decrypt;
/// Pointer enter/move/leave reactions of single elements.
pub mod hover;
/// Scroll-speed driven transforms.
pub mod velocity;
