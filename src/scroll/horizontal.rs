use crate::animation::timeline::TimelineId;
use crate::foundation::arena::SlotKey;
use crate::foundation::core::TargetId;
use crate::scroll::scrub::SnapSpec;
use crate::scroll::trigger::{Scrub, TriggerId};

/// Handle to a horizontal pin-scroll container.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ContainerId(pub(crate) SlotKey);

/// A pinned section whose vertical scroll distance moves a track of panels sideways.
#[derive(Clone, Debug, PartialEq)]
pub struct HorizontalSpec {
    /// Element pinned while the track travels.
    pub wrapper: TargetId,
    /// Element whose width sets the pinned scroll distance.
    pub track: TargetId,
    /// Panels translated by `xPercent`, in order.
    pub panels: Vec<TargetId>,
    /// Scroll-driven playback of the track.
    pub scrub: Scrub,
    /// Snap between panels.
    pub snap: Option<SnapSpec>,
}

impl HorizontalSpec {
    /// One-second smoothed scrub, snapping to each panel.
    pub fn new(wrapper: TargetId, track: TargetId, panels: Vec<TargetId>) -> Self {
        let snap = (panels.len() > 1).then(|| SnapSpec::new(1.0 / (panels.len() - 1) as f64));
        Self {
            wrapper,
            track,
            panels,
            scrub: Scrub::Smooth(1.0),
            snap,
        }
    }
}

/// Panel offset in percent of a panel's width for progress `p`.
pub fn offset_percent(progress: f64, panels: usize) -> f64 {
    -progress * panels.saturating_sub(1) as f64 * 100.0
}

/// Pixels the track moves over the whole region.
pub fn travel(track_width: f64, panels: usize) -> f64 {
    if panels == 0 {
        return 0.0;
    }
    panels.saturating_sub(1) as f64 * track_width / panels as f64
}

/// State of a container, for hosts and tests.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ContainerSnapshot {
    /// Effective progress of the pinned region.
    pub progress: f64,
    /// Current panel offset in percent.
    pub offset_percent: f64,
    /// Current track offset in pixels.
    pub offset_px: f64,
    /// Position along the local axis that nested regions are measured against.
    pub local_position: f64,
    /// Total horizontal travel in pixels.
    pub travel: f64,
    /// Number of panels.
    pub panels: usize,
}

#[derive(Debug, Clone)]
pub(crate) struct Container {
    pub(crate) spec: HorizontalSpec,
    /// `None` for a single-panel container, which never moves.
    pub(crate) trigger: Option<TriggerId>,
    pub(crate) timeline: Option<TimelineId>,
    pub(crate) track_width: f64,
    pub(crate) progress: f64,
}

impl Container {
    pub(crate) fn new(spec: HorizontalSpec, track_width: f64) -> Self {
        Self {
            spec,
            trigger: None,
            timeline: None,
            track_width,
            progress: 0.0,
        }
    }

    pub(crate) fn travel(&self) -> f64 {
        travel(self.track_width, self.spec.panels.len())
    }

    pub(crate) fn local_position(&self) -> f64 {
        self.progress * self.travel()
    }

    pub(crate) fn snapshot(&self) -> ContainerSnapshot {
        let travel = self.travel();
        ContainerSnapshot {
            progress: self.progress,
            offset_percent: offset_percent(self.progress, self.spec.panels.len()),
            offset_px: -self.progress * travel,
            local_position: self.local_position(),
            travel,
            panels: self.spec.panels.len(),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scroll/horizontal.rs"]
mod tests;
