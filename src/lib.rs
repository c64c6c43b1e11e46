//! Choreo is a scroll-synchronized animation and interaction engine.
//!
//! It drives tweens, timelines, scroll-linked regions (with scrubbing, pinning and snapping),
//! horizontal pin-scroll containers and a handful of pointer and text effects against an
//! abstract renderer [`Surface`]. A host owns one [`Engine`] per page and calls
//! [`Engine::tick`] once per display frame:
//!
//! - Register effects directly (`register_*`) or load a JSON [`ChoreographyDef`]
//! - Feed scroll, viewport, geometry and pointer state through the [`Surface`]
//! - Read back property writes and [`EngineEvent`]s
//!
//! ```
//! use choreo::{Engine, EngineOptions, MemorySurface, Property, Rect, Size, TweenSpec};
//!
//! let mut surface = MemorySurface::new(Size::new(1280.0, 800.0), 3000.0);
//! let title = surface.add_element(&["#title"], Rect::new(0.0, 100.0, 600.0, 200.0));
//! let mut engine = Engine::new(EngineOptions::default());
//! engine
//!     .register_tween(TweenSpec::new(title).to(Property::Opacity, 0.0).duration(0.5), &mut surface)
//!     .unwrap();
//! for frame in 0..40 {
//!     engine.tick(f64::from(frame) / 60.0, &mut surface);
//! }
//! assert_eq!(surface.number(title, Property::Opacity), Some(0.0));
//! ```
#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod animation;
pub mod clock;
pub mod config;
pub mod effects;
pub mod engine;
pub mod foundation;
pub mod scroll;
pub mod surface;

pub use crate::animation::animator::{AnimationEvent, AnimationId, Animator};
pub use crate::animation::ease::Ease;
pub use crate::animation::timeline::{Position, TimelineDefaults, TimelineId};
pub use crate::animation::tween::{Overwrite, TweenId, TweenSpec};
pub use crate::clock::{ClockOptions, FrameTime};
pub use crate::config::{ChoreographyDef, EffectDef, LoadFailure, LoadReport};
pub use crate::effects::cursor::CursorSpec;
pub use crate::effects::decrypt::DecryptSpec;
pub use crate::effects::hover::{HoverSpec, PointerAxis, PointerMapping};
pub use crate::effects::velocity::VelocitySpec;
pub use crate::engine::{Engine, EngineEvent, EngineOptions, FrameCallback, FrameCtx};
pub use crate::foundation::core::{
    Channel, Point, PropMap, Property, Rect, Rgba, Size, TargetId, Value, Vec2,
};
pub use crate::foundation::error::{ChoreoError, ChoreoResult};
pub use crate::scroll::boundary::{Axis, Boundary, Offset};
pub use crate::scroll::horizontal::{ContainerId, ContainerSnapshot, HorizontalSpec};
pub use crate::scroll::scrub::SnapSpec;
pub use crate::scroll::trigger::{
    Crossing, RegionState, Scrub, ToggleAction, ToggleActions, TriggerId, TriggerSnapshot,
    TriggerSpec,
};
pub use crate::surface::Surface;
pub use crate::surface::memory::MemorySurface;
