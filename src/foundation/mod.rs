//! Shared primitives: handles, properties, values, errors and small math helpers.

pub(crate) mod arena;
/// Handles, properties and values exchanged with the renderer surface.
pub mod core;
/// Error taxonomy.
pub mod error;
pub(crate) mod math;
