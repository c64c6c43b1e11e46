//! Declarative choreography documents.
//!
//! A page's effects can be written as JSON ([`ChoreographyDef`]) using selectors and CSS-like
//! property maps, then registered in one go with [`Engine::load`](crate::Engine::load).
//! Selectors are resolved against the [`Surface`](crate::surface::Surface) at load time.
//!
//! ```json
//! { "effects": [
//!     { "type": "tween", "targets": ".line", "to": { "y": 0, "opacity": 1 },
//!       "scrollTrigger": { "start": "top 90%", "end": "bottom 40%", "scrub": 1 } }
//! ] }
//! ```

/// Serde model of a choreography document.
pub mod choreography;
mod load;
/// CSS-like property values.
pub mod values;

pub use choreography::{ChoreographyDef, EffectDef};
pub use load::{FOLLOW_TARGET, LoadFailure, LoadReport, SELF_TARGET};
