use smallvec::SmallVec;

use crate::animation::ease::Ease;
use crate::animation::timeline::TimelineId;
use crate::foundation::arena::SlotKey;
use crate::foundation::core::{PropMap, Property, TargetId, Value};

/// Handle to a scheduled tween. Stale handles are inert.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TweenId(pub(crate) SlotKey);

/// What a newly scheduled tween does to existing writers of the same `(target, property)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Overwrite {
    /// Leave existing tweens running; the most recently rendered value wins.
    #[default]
    None,
    /// Cancel every existing tween that writes any of the same properties.
    All,
    /// Strip only the overlapping properties from existing tweens.
    Auto,
}

impl From<bool> for Overwrite {
    fn from(v: bool) -> Self {
        if v { Self::All } else { Self::None }
    }
}

/// Scheduling parameters for a single-target tween.
#[derive(Clone, Debug, PartialEq)]
pub struct TweenSpec {
    /// Element written by the tween.
    pub target: TargetId,
    /// End values. Properties only present in `from` tween towards their current value.
    pub to: PropMap,
    /// Explicit start values; rendered immediately at schedule time.
    pub from: Option<PropMap>,
    /// Duration in seconds; `0` snaps.
    pub duration: f64,
    /// Easing applied to normalized progress; `None` inherits the timeline default (or `OutQuad`).
    pub ease: Option<Ease>,
    /// Delay in seconds before the tween starts.
    pub delay: f64,
    /// Conflict policy for existing writers.
    pub overwrite: Overwrite,
}

impl TweenSpec {
    /// A half-second `OutQuad` tween with no properties yet.
    pub fn new(target: TargetId) -> Self {
        Self {
            target,
            to: SmallVec::new(),
            from: None,
            duration: 0.5,
            ease: None,
            delay: 0.0,
            overwrite: Overwrite::None,
        }
    }

    /// Add an end value.
    pub fn to(mut self, property: Property, value: impl Into<Value>) -> Self {
        self.to.push((property, value.into()));
        self
    }

    /// Add an explicit start value.
    pub fn from(mut self, property: Property, value: impl Into<Value>) -> Self {
        self.from
            .get_or_insert_with(SmallVec::new)
            .push((property, value.into()));
        self
    }

    /// Set the duration in seconds.
    pub fn duration(mut self, secs: f64) -> Self {
        self.duration = secs;
        self
    }

    /// Set the easing function.
    pub fn ease(mut self, ease: Ease) -> Self {
        self.ease = Some(ease);
        self
    }

    /// Set the start delay in seconds.
    pub fn delay(mut self, secs: f64) -> Self {
        self.delay = secs;
        self
    }

    /// Set the overwrite policy.
    pub fn overwrite(mut self, overwrite: impl Into<Overwrite>) -> Self {
        self.overwrite = overwrite.into();
        self
    }

    /// Copy of this spec aimed at another target.
    pub fn retarget(&self, target: TargetId) -> Self {
        Self {
            target,
            ..self.clone()
        }
    }

    /// Every property this tween writes, without duplicates.
    pub fn properties(&self) -> SmallVec<[Property; 4]> {
        let mut out: SmallVec<[Property; 4]> = SmallVec::new();
        let from = self.from.iter().flatten();
        for (p, _) in self.to.iter().chain(from) {
            if !out.contains(p) {
                out.push(*p);
            }
        }
        out
    }
}

/// Time cursor shared by tweens and timelines.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Playhead {
    pub(crate) time: f64,
    pub(crate) duration: f64,
    pub(crate) reversed: bool,
    pub(crate) paused: bool,
    completed_fired: bool,
    reverse_fired: bool,
}

impl Playhead {
    pub(crate) fn new(duration: f64) -> Self {
        Self {
            time: 0.0,
            duration: duration.max(0.0),
            reversed: false,
            paused: false,
            completed_fired: false,
            reverse_fired: false,
        }
    }

    /// Move by `dt` seconds in the current direction. Returns whether the time changed.
    pub(crate) fn advance(&mut self, dt: f64) -> bool {
        if self.paused || dt <= 0.0 {
            return false;
        }
        let before = self.time;
        let step = if self.reversed { -dt } else { dt };
        self.time = (self.time + step).clamp(0.0, self.duration);
        self.time != before
    }

    pub(crate) fn progress(&self) -> f64 {
        crate::foundation::math::normalized(self.time, self.duration)
    }

    pub(crate) fn seek_progress(&mut self, p: f64) {
        self.time = p.clamp(0.0, 1.0) * self.duration;
    }

    pub(crate) fn at_end(&self) -> bool {
        self.time >= self.duration
    }

    pub(crate) fn at_start(&self) -> bool {
        self.time <= 0.0
    }

    /// Completion bookkeeping after the time moved. Each edge fires once per crossing.
    pub(crate) fn check_finish(&mut self) -> Option<Finish> {
        if !self.at_end() {
            self.completed_fired = false;
        }
        if !self.at_start() || !self.reversed {
            self.reverse_fired = false;
        }
        if self.at_end() && !self.reversed && !self.completed_fired {
            self.completed_fired = true;
            return Some(Finish::Completed);
        }
        if self.at_start() && self.reversed && !self.reverse_fired {
            self.reverse_fired = true;
            return Some(Finish::ReverseCompleted);
        }
        None
    }

    pub(crate) fn rearm(&mut self) {
        self.completed_fired = false;
        self.reverse_fired = false;
    }

    /// Still moving: not paused and not parked at the end it is heading to.
    pub(crate) fn is_running(&self) -> bool {
        if self.paused {
            return false;
        }
        if self.reversed {
            !self.at_start()
        } else {
            !self.at_end()
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Finish {
    Completed,
    ReverseCompleted,
}

#[derive(Debug, Clone)]
pub(crate) struct Tween {
    pub(crate) spec: TweenSpec,
    /// Start values captured on first render (or taken from `spec.from`).
    pub(crate) start: Option<PropMap>,
    pub(crate) playhead: Playhead,
    pub(crate) parent: Option<TimelineId>,
    /// Released once finished unless something (a trigger, a timeline) still controls it.
    pub(crate) retained: bool,
    /// Scheduling order; root tweens render oldest first so the newest write wins.
    pub(crate) seq: u64,
}

impl Tween {
    pub(crate) fn new(spec: TweenSpec, seq: u64) -> Self {
        let total = spec.delay.max(0.0) + spec.duration.max(0.0);
        Self {
            start: spec.from.clone(),
            playhead: Playhead::new(total),
            spec,
            parent: None,
            retained: false,
            seq,
        }
    }

    pub(crate) fn total_duration(&self) -> f64 {
        self.playhead.duration
    }

    /// Eased progress of the interpolation (not of the delay) for the current time.
    pub(crate) fn eased(&self) -> f64 {
        let local = self.playhead.time - self.spec.delay.max(0.0);
        let t = if self.spec.duration <= 0.0 {
            if local >= 0.0 { 1.0 } else { 0.0 }
        } else {
            (local / self.spec.duration).clamp(0.0, 1.0)
        };
        self.spec.ease.unwrap_or_default().apply(t)
    }

    pub(crate) fn has_started(&self) -> bool {
        self.start.is_some() && self.playhead.time >= self.spec.delay.max(0.0)
    }

    pub(crate) fn before_delay(&self) -> bool {
        self.playhead.time < self.spec.delay.max(0.0)
    }

    /// Values to write for the current time. `capture` supplies start values on first render.
    ///
    /// Returns `None` while the tween sits in its delay and has never rendered.
    pub(crate) fn frame_values(
        &mut self,
        capture: impl FnMut(Property) -> Value,
    ) -> Option<PropMap> {
        if self.before_delay() && self.start.is_none() {
            return None;
        }
        let start = self.ensure_start(capture);
        let e = self.eased();
        let mut out = PropMap::new();
        for (p, to) in &self.spec.to {
            let from = start
                .iter()
                .find(|(q, _)| q == p)
                .map(|(_, v)| v.clone())
                .unwrap_or_else(|| p.default_value());
            out.push((*p, from.interpolate(to, e)));
        }
        Some(out)
    }

    fn ensure_start(&mut self, mut capture: impl FnMut(Property) -> Value) -> PropMap {
        let start = self.start.get_or_insert_with(PropMap::new);
        for (p, _) in &self.spec.to {
            if !start.iter().any(|(q, _)| q == p) {
                start.push((*p, capture(*p)));
            }
        }
        start.clone()
    }

    /// Fill `to` for properties that only have a `from` value (a `from()` tween ends at the
    /// value the element had when the tween was created).
    pub(crate) fn resolve_from_only(&mut self, mut current: impl FnMut(Property) -> Value) {
        let Some(from) = self.spec.from.clone() else {
            return;
        };
        for (p, _) in from {
            if !self.spec.to.iter().any(|(q, _)| *q == p) {
                let v = current(p);
                self.spec.to.push((p, v));
            }
        }
    }

    /// Drop overlapping properties. Returns `true` when nothing is left to write.
    pub(crate) fn strip_properties(&mut self, props: &[Property]) -> bool {
        self.spec.to.retain(|(p, _)| !props.contains(p));
        if let Some(from) = self.spec.from.as_mut() {
            from.retain(|(p, _)| !props.contains(p));
        }
        if let Some(start) = self.start.as_mut() {
            start.retain(|(p, _)| !props.contains(p));
        }
        self.spec.to.is_empty()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/tween.rs"]
mod tests;
