//! The owned engine context.
//!
//! [`Engine`] holds every piece of per-page state (clock, animator, trackers, containers,
//! effects, timers) and steps them in a fixed order once per frame. Nothing in the crate keeps
//! ambient global state; a host creates one engine per page and feeds it a [`Surface`] every
//! frame.
//!
//! [`Surface`]: crate::surface::Surface

mod runtime;

pub use runtime::{
    Engine, EngineEvent, EngineOptions, FrameCallback, FrameCtx, MAX_PENDING_EVENTS,
};
