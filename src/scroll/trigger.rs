use std::str::FromStr;

use smallvec::SmallVec;

use crate::animation::animator::AnimationId;
use crate::animation::tween::TweenSpec;
use crate::foundation::arena::SlotKey;
use crate::foundation::core::{Size, TargetId};
use crate::foundation::error::{ChoreoError, ChoreoResult};
use crate::foundation::math::normalized;
use crate::scroll::boundary::{Axis, Boundary, Offset};
use crate::scroll::horizontal::ContainerId;
use crate::scroll::scrub::{ScrubFollower, SnapSpec};
use crate::surface::Surface;

/// Handle to a registered trigger region.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TriggerId(pub(crate) SlotKey);

/// How scroll progress drives the associated animation.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub enum Scrub {
    /// Toggle actions control playback.
    #[default]
    Off,
    /// Progress is written straight to the animation.
    Direct,
    /// Progress catches up over the given lag in seconds.
    Smooth(f64),
}

impl Scrub {
    /// A positive lag smooths; zero follows directly.
    pub fn from_lag(lag: f64) -> Self {
        if lag > 0.0 { Self::Smooth(lag) } else { Self::Direct }
    }

    /// Whether scroll position drives the animation.
    pub fn is_on(self) -> bool {
        !matches!(self, Self::Off)
    }

    /// Catch-up time in seconds.
    pub fn lag(self) -> f64 {
        match self {
            Self::Smooth(lag) => lag,
            _ => 0.0,
        }
    }
}

/// Playback command applied to a region's animation on a crossing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ToggleAction {
    /// Play forward.
    Play,
    /// Play backward.
    Reverse,
    /// Freeze.
    Pause,
    /// Continue in the current direction.
    Resume,
    /// Jump to start and play.
    Restart,
    /// Jump to end.
    Complete,
    /// Jump to start and pause.
    Reset,
    /// Do nothing.
    #[default]
    None,
}

impl FromStr for ToggleAction {
    type Err = ChoreoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "play" => Self::Play,
            "reverse" => Self::Reverse,
            "pause" => Self::Pause,
            "resume" => Self::Resume,
            "restart" => Self::Restart,
            "complete" => Self::Complete,
            "reset" => Self::Reset,
            "none" => Self::None,
            other => {
                return Err(ChoreoError::invalid_region(format!(
                    "unknown toggle action '{other}'"
                )));
            }
        })
    }
}

/// The four boundary crossings of a region.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Crossing {
    /// Scrolling forward past `start`.
    Enter,
    /// Scrolling forward past `end`.
    Leave,
    /// Scrolling backward past `end`.
    EnterBack,
    /// Scrolling backward past `start`.
    LeaveBack,
}

/// Actions for enter, leave, enter-back and leave-back, in that order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ToggleActions {
    /// Forward past `start`.
    pub on_enter: ToggleAction,
    /// Forward past `end`.
    pub on_leave: ToggleAction,
    /// Backward past `end`.
    pub on_enter_back: ToggleAction,
    /// Backward past `start`.
    pub on_leave_back: ToggleAction,
}

impl Default for ToggleActions {
    fn default() -> Self {
        Self {
            on_enter: ToggleAction::Play,
            on_leave: ToggleAction::None,
            on_enter_back: ToggleAction::None,
            on_leave_back: ToggleAction::None,
        }
    }
}

impl ToggleActions {
    /// Action bound to `crossing`.
    pub fn for_crossing(&self, crossing: Crossing) -> ToggleAction {
        match crossing {
            Crossing::Enter => self.on_enter,
            Crossing::Leave => self.on_leave,
            Crossing::EnterBack => self.on_enter_back,
            Crossing::LeaveBack => self.on_leave_back,
        }
    }
}

impl FromStr for ToggleActions {
    type Err = ChoreoError;

    /// Four space-separated actions, e.g. `"play none none reverse"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let words: SmallVec<[&str; 4]> = s.split_whitespace().collect();
        let [enter, leave, enter_back, leave_back] = words.as_slice() else {
            return Err(ChoreoError::invalid_region(format!(
                "toggle actions need four words, got '{s}'"
            )));
        };
        Ok(Self {
            on_enter: enter.parse()?,
            on_leave: leave.parse()?,
            on_enter_back: enter_back.parse()?,
            on_leave_back: leave_back.parse()?,
        })
    }
}

/// Where the scroll position sits relative to a region.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum RegionState {
    /// Before `start`.
    #[default]
    BeforeStart,
    /// Between `start` and `end`, inclusive.
    Active,
    /// After `end`.
    AfterEnd,
}

/// Registration parameters for a trigger region.
#[derive(Clone, Debug, Default)]
pub struct TriggerSpec {
    /// Element whose geometry defines the region; `None` spans the whole scroll range.
    pub anchor: Option<TargetId>,
    /// Start boundary; defaults to `"top bottom"` (`"top top"` when pinned).
    pub start: Option<Boundary>,
    /// End boundary; defaults to `"bottom top"`.
    pub end: Option<Boundary>,
    /// Hold the anchor in place while active.
    pub pin: bool,
    /// Scroll-driven playback.
    pub scrub: Scrub,
    /// Snap scrubbed progress when scrolling settles.
    pub snap: Option<SnapSpec>,
    /// Crossing actions; ignored when `scrub` is on.
    pub toggle_actions: ToggleActions,
    /// Animation controlled by this region.
    pub animation: Option<AnimationId>,
    /// Measure along a horizontal container instead of page scroll.
    pub container: Option<ContainerId>,
    /// Tweens scheduled every time the region is entered forward.
    pub on_enter: Vec<TweenSpec>,
}

impl TriggerSpec {
    /// Region around `anchor` with default boundaries.
    pub fn anchored(anchor: TargetId) -> Self {
        Self {
            anchor: Some(anchor),
            ..Self::default()
        }
    }

    /// Set the start boundary.
    pub fn start(mut self, start: Boundary) -> Self {
        self.start = Some(start);
        self
    }

    /// Set the end boundary.
    pub fn end(mut self, end: Boundary) -> Self {
        self.end = Some(end);
        self
    }

    /// Control `animation` from this region.
    pub fn animation(mut self, animation: impl Into<AnimationId>) -> Self {
        self.animation = Some(animation.into());
        self
    }

    /// Set the scrub mode.
    pub fn scrub(mut self, scrub: Scrub) -> Self {
        self.scrub = scrub;
        self
    }

    /// Set the crossing actions.
    pub fn toggle_actions(mut self, actions: ToggleActions) -> Self {
        self.toggle_actions = actions;
        self
    }

    /// Measure along a horizontal container.
    pub fn container(mut self, container: ContainerId) -> Self {
        self.container = Some(container);
        self
    }

    /// Pin the anchor while active.
    pub fn pin(mut self, pin: bool) -> Self {
        self.pin = pin;
        self
    }

    /// Snap scrubbed progress.
    pub fn snap(mut self, snap: SnapSpec) -> Self {
        self.snap = Some(snap);
        self
    }

    /// Schedule `tween` on every forward entry.
    pub fn on_enter(mut self, tween: TweenSpec) -> Self {
        self.on_enter.push(tween);
        self
    }

    fn default_start(&self) -> Boundary {
        if self.anchor.is_none() {
            return Boundary::Absolute(0.0);
        }
        Boundary::Edges {
            element: Offset::Percent(0.0),
            viewport: Offset::Percent(if self.pin { 0.0 } else { 100.0 }),
        }
    }

    fn default_end(&self, scroll_limit: f64) -> Boundary {
        if self.anchor.is_none() {
            return Boundary::Absolute(scroll_limit);
        }
        Boundary::Edges {
            element: Offset::Percent(100.0),
            viewport: Offset::Percent(0.0),
        }
    }
}

/// Read-only view of a tracker for hosts and tests.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TriggerSnapshot {
    /// Current state.
    pub state: RegionState,
    /// Resolved start position.
    pub start: f64,
    /// Resolved end position.
    pub end: f64,
    /// Last sampled position along the axis.
    pub position: f64,
    /// Raw progress in `[0, 1]`.
    pub progress: f64,
    /// Progress after scrub smoothing and snapping.
    pub effective_progress: f64,
    /// Position change per second.
    pub velocity: f64,
    /// Compensation written to the anchor when pinned.
    pub pin_offset: Option<f64>,
}

/// State machine for one region.
#[derive(Debug, Clone)]
pub(crate) struct Tracker {
    pub(crate) spec: TriggerSpec,
    pub(crate) axis: Axis,
    start: f64,
    end: f64,
    state: RegionState,
    position: f64,
    velocity: f64,
    sampled: bool,
    follower: Option<ScrubFollower>,
    effective: f64,
    pub(crate) last_seek: Option<f64>,
    pub(crate) last_pin: Option<f64>,
}

impl Tracker {
    pub(crate) fn new(spec: TriggerSpec, axis: Axis) -> Self {
        let follower = (spec.scrub.is_on() || spec.snap.is_some())
            .then(|| ScrubFollower::new(spec.scrub.lag()));
        Self {
            spec,
            axis,
            start: 0.0,
            end: 0.0,
            state: RegionState::BeforeStart,
            position: 0.0,
            velocity: 0.0,
            sampled: false,
            follower,
            effective: 0.0,
            last_seek: None,
            last_pin: None,
        }
    }

    /// Scroll-driven playback is on (a snap without scrub implies direct scrubbing).
    pub(crate) fn scrubbed(&self) -> bool {
        self.follower.is_some()
    }

    /// Resolve boundaries. `scroll_limit` is the page limit or a container's travel.
    pub(crate) fn resolve(
        &mut self,
        surface: &dyn Surface,
        viewport: Size,
        scroll_limit: f64,
    ) -> ChoreoResult<()> {
        let anchor = match self.spec.anchor {
            Some(t) => Some(
                surface
                    .bounds(t)
                    .ok_or_else(|| ChoreoError::target_not_found(format!("trigger anchor {t:?}")))?,
            ),
            None => None,
        };
        let start_b = self
            .spec
            .start
            .clone()
            .unwrap_or_else(|| self.spec.default_start());
        let end_b = self
            .spec
            .end
            .clone()
            .unwrap_or_else(|| self.spec.default_end(scroll_limit));
        if matches!(start_b, Boundary::Relative(_)) {
            return Err(ChoreoError::invalid_region("start cannot be relative"));
        }
        let start = start_b.resolve(anchor, self.axis, viewport, scroll_limit, 0.0);
        let end = end_b.resolve(anchor, self.axis, viewport, scroll_limit, start);
        if !(start.is_finite() && end.is_finite()) || start > end {
            return Err(ChoreoError::invalid_region(format!(
                "region start {start} is after end {end}"
            )));
        }
        self.start = start;
        self.end = end;
        Ok(())
    }

    fn classify(&self, position: f64) -> RegionState {
        if position < self.start {
            RegionState::BeforeStart
        } else if position > self.end {
            RegionState::AfterEnd
        } else {
            RegionState::Active
        }
    }

    /// Record a new position. Returns the crossings since the previous sample, in order.
    ///
    /// The first sample is measured from `BeforeStart`.
    pub(crate) fn sample(&mut self, position: f64, dt: f64) -> SmallVec<[Crossing; 2]> {
        if !self.sampled {
            self.velocity = 0.0;
        } else if dt > 0.0 {
            self.velocity = (position - self.position) / dt;
        }
        self.sampled = true;
        self.position = position;

        let prev = self.state;
        let next = self.classify(position);
        self.state = next;
        use Crossing::*;
        use RegionState::*;
        let crossings: SmallVec<[Crossing; 2]> = match (prev, next) {
            (BeforeStart, Active) => smallvec::smallvec![Enter],
            (BeforeStart, AfterEnd) => smallvec::smallvec![Enter, Leave],
            (Active, AfterEnd) => smallvec::smallvec![Leave],
            (AfterEnd, Active) => smallvec::smallvec![EnterBack],
            (AfterEnd, BeforeStart) => smallvec::smallvec![EnterBack, LeaveBack],
            (Active, BeforeStart) => smallvec::smallvec![LeaveBack],
            _ => SmallVec::new(),
        };
        if !crossings.is_empty() {
            tracing::debug!(?prev, ?next, position, "region state changed");
        }
        crossings
    }

    /// Advance scrub smoothing for this frame and return the effective progress.
    pub(crate) fn update_effective(&mut self, dt: f64) -> f64 {
        let raw = self.progress();
        let snap = self.spec.snap;
        self.effective = match self.follower.as_mut() {
            Some(f) => f.update(raw, dt, snap.as_ref()),
            None => raw,
        };
        self.effective
    }

    pub(crate) fn progress(&self) -> f64 {
        normalized(self.position - self.start, self.end - self.start)
    }

    pub(crate) fn effective_progress(&self) -> f64 {
        self.effective
    }

    pub(crate) fn velocity(&self) -> f64 {
        self.velocity
    }

    pub(crate) fn state(&self) -> RegionState {
        self.state
    }

    pub(crate) fn span(&self) -> (f64, f64) {
        (self.start, self.end)
    }

    /// Distance the anchor must be pushed to stay fixed: grows while active, holds after.
    pub(crate) fn pin_offset(&self) -> Option<f64> {
        self.spec
            .pin
            .then(|| self.position.clamp(self.start, self.end) - self.start)
    }

    pub(crate) fn snapshot(&self) -> TriggerSnapshot {
        TriggerSnapshot {
            state: self.state,
            start: self.start,
            end: self.end,
            position: self.position,
            progress: self.progress(),
            effective_progress: self.effective,
            velocity: self.velocity,
            pin_offset: self.pin_offset(),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scroll/trigger.rs"]
mod tests;
