use std::collections::HashMap;

use smallvec::SmallVec;

use crate::animation::timeline::{Position, Timeline, TimelineDefaults, TimelineId};
use crate::animation::tween::{Finish, Overwrite, Playhead, Tween, TweenId, TweenSpec};
use crate::foundation::arena::Arena;
use crate::foundation::core::{Property, TargetId, Value};
use crate::foundation::error::{ChoreoError, ChoreoResult};
use crate::surface::Surface;

/// Anything the animator can play, pause, seek or cancel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AnimationId {
    /// A single tween.
    Tween(TweenId),
    /// A timeline and its children.
    Timeline(TimelineId),
}

impl From<TweenId> for AnimationId {
    fn from(id: TweenId) -> Self {
        Self::Tween(id)
    }
}

impl From<TimelineId> for AnimationId {
    fn from(id: TimelineId) -> Self {
        Self::Timeline(id)
    }
}

/// Lifecycle notifications produced while advancing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnimationEvent {
    /// Reached its end while playing forward. Fires once per crossing.
    Completed(AnimationId),
    /// Reached its start while playing in reverse.
    ReverseCompleted(AnimationId),
}

type Key = (TargetId, Property);

fn current_value(
    cache: &HashMap<Key, Value>,
    surface: &dyn Surface,
    target: TargetId,
    property: Property,
) -> Value {
    cache
        .get(&(target, property))
        .cloned()
        .or_else(|| surface.read_property(target, property))
        .unwrap_or_else(|| property.default_value())
}

/// Owns every tween and timeline, the last written value of every property, and the index of
/// which tweens write which `(target, property)`.
#[derive(Debug, Default)]
pub struct Animator {
    tweens: Arena<Tween>,
    timelines: Arena<Timeline>,
    writers: HashMap<Key, SmallVec<[TweenId; 2]>>,
    cache: HashMap<Key, Value>,
    events: Vec<AnimationEvent>,
    next_seq: u64,
    reduced_motion: bool,
}

impl Animator {
    /// Empty animator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Collapse every subsequently scheduled duration and delay to zero.
    pub fn set_reduced_motion(&mut self, on: bool) {
        self.reduced_motion = on;
    }

    /// Whether reduced motion is on.
    pub fn reduced_motion(&self) -> bool {
        self.reduced_motion
    }

    /// Schedule a root tween. It starts playing on the next [`Animator::advance`].
    ///
    /// A tween with zero duration and zero delay writes its end values and completes before
    /// this returns; its handle is already released.
    pub fn schedule(&mut self, spec: TweenSpec, surface: &mut dyn Surface) -> ChoreoResult<TweenId> {
        let id = self.insert_tween(spec, None, surface)?;
        let instant = self
            .tweens
            .get(id.0)
            .is_some_and(|t| t.total_duration() <= 0.0);
        if instant {
            self.render_tween(id, surface);
            self.finish_root_tween(id);
        }
        Ok(id)
    }

    /// Write values immediately, outside any tween. Does not cancel running writers.
    pub fn set(
        &mut self,
        target: TargetId,
        props: &[(Property, Value)],
        surface: &mut dyn Surface,
    ) -> ChoreoResult<()> {
        if !surface.contains(target) {
            return Err(ChoreoError::target_not_found(format!("{target:?}")));
        }
        self.write(target, props, surface);
        Ok(())
    }

    /// Create an empty timeline. It plays as soon as it has children.
    pub fn create_timeline(&mut self, defaults: TimelineDefaults) -> TimelineId {
        TimelineId(self.timelines.insert(Timeline::new(defaults)))
    }

    /// Add a child tween at `position`.
    pub fn add_to_timeline(
        &mut self,
        timeline: TimelineId,
        spec: TweenSpec,
        position: &Position,
        surface: &mut dyn Surface,
    ) -> ChoreoResult<TweenId> {
        let ids = self.add_staggered(timeline, vec![spec], 0.0, position, surface)?;
        ids.into_iter()
            .next()
            .ok_or_else(|| ChoreoError::animation("timeline child was not created"))
    }

    /// Add a group of children, the i-th starting `i * each` seconds after `position`.
    ///
    /// The group counts as one entry for `<` / `>` positions.
    pub fn add_staggered(
        &mut self,
        timeline: TimelineId,
        specs: Vec<TweenSpec>,
        each: f64,
        position: &Position,
        surface: &mut dyn Surface,
    ) -> ChoreoResult<Vec<TweenId>> {
        let Some(tl) = self.timelines.get(timeline.0) else {
            return Err(ChoreoError::animation(format!("unknown timeline {timeline:?}")));
        };
        let start = tl.layout.resolve(position)?;
        let default_ease = tl.defaults.ease;
        for spec in &specs {
            if !surface.contains(spec.target) {
                return Err(ChoreoError::target_not_found(format!("{:?}", spec.target)));
            }
        }
        let each = if self.reduced_motion { 0.0 } else { each };

        let mut placed = Vec::with_capacity(specs.len());
        for mut spec in specs {
            if spec.ease.is_none() {
                spec.ease = default_ease;
            }
            let id = self.insert_tween(spec, Some(timeline), surface)?;
            let total = self.tweens.get(id.0).map_or(0.0, Tween::total_duration);
            placed.push((id, total));
        }
        if let Some(tl) = self.timelines.get_mut(timeline.0) {
            tl.layout.place_group(&placed, start, each);
            tl.sync_duration();
        }
        Ok(placed.into_iter().map(|(id, _)| id).collect())
    }

    /// Name a point on the timeline for later `Position::Label` references.
    pub fn add_label(
        &mut self,
        timeline: TimelineId,
        name: &str,
        position: &Position,
    ) -> ChoreoResult<f64> {
        let Some(tl) = self.timelines.get_mut(timeline.0) else {
            return Err(ChoreoError::animation(format!("unknown timeline {timeline:?}")));
        };
        let at = tl.layout.resolve(position)?;
        tl.layout.add_label(name, at);
        Ok(at)
    }

    /// Stop and forget an animation. Stale handles are ignored, so this is safe to call twice
    /// or from completion handling.
    pub fn cancel(&mut self, id: impl Into<AnimationId>) {
        match id.into() {
            AnimationId::Tween(t) => self.remove_tween(t),
            AnimationId::Timeline(tl) => {
                if let Some(timeline) = self.timelines.remove(tl.0) {
                    for e in timeline.layout.entries {
                        self.remove_tween(e.tween);
                    }
                }
            }
        }
    }

    /// Keep a finished root animation alive so it can be replayed (trigger-controlled).
    pub fn retain(&mut self, id: impl Into<AnimationId>) {
        match id.into() {
            AnimationId::Tween(t) => {
                if let Some(tw) = self.tweens.get_mut(t.0) {
                    tw.retained = true;
                }
            }
            AnimationId::Timeline(tl) => {
                if let Some(timeline) = self.timelines.get_mut(tl.0) {
                    timeline.retained = true;
                }
            }
        }
    }

    /// Play forward from the current position.
    pub fn play(&mut self, id: impl Into<AnimationId>) {
        self.with_playhead(id.into(), |ph| {
            ph.paused = false;
            ph.reversed = false;
        });
    }

    /// Play backwards from the current position.
    pub fn reverse(&mut self, id: impl Into<AnimationId>) {
        self.with_playhead(id.into(), |ph| {
            ph.paused = false;
            ph.reversed = true;
        });
    }

    /// Freeze at the current position.
    pub fn pause(&mut self, id: impl Into<AnimationId>) {
        self.with_playhead(id.into(), |ph| ph.paused = true);
    }

    /// Unfreeze in the current direction.
    pub fn resume(&mut self, id: impl Into<AnimationId>) {
        self.with_playhead(id.into(), |ph| ph.paused = false);
    }

    /// Jump to the start and play forward.
    pub fn restart(&mut self, id: impl Into<AnimationId>, surface: &mut dyn Surface) {
        let id = id.into();
        self.with_playhead(id, |ph| {
            ph.rearm();
            ph.paused = false;
            ph.reversed = false;
        });
        self.jump(id, 0.0, surface);
    }

    /// Jump to the end.
    pub fn complete(&mut self, id: impl Into<AnimationId>, surface: &mut dyn Surface) {
        let id = id.into();
        self.with_playhead(id, |ph| ph.reversed = false);
        self.jump(id, 1.0, surface);
    }

    /// Jump to the start and pause.
    pub fn reset(&mut self, id: impl Into<AnimationId>, surface: &mut dyn Surface) {
        let id = id.into();
        self.with_playhead(id, |ph| {
            ph.paused = true;
            ph.reversed = false;
        });
        self.jump(id, 0.0, surface);
        self.with_playhead(id, |ph| ph.rearm());
    }

    /// Move to `progress` in `[0, 1]` and render immediately. Used by scroll scrubbing.
    pub fn seek_progress(
        &mut self,
        id: impl Into<AnimationId>,
        progress: f64,
        surface: &mut dyn Surface,
    ) {
        self.jump(id.into(), progress, surface);
    }

    /// Normalized position of the playhead.
    pub fn progress(&self, id: impl Into<AnimationId>) -> Option<f64> {
        match id.into() {
            AnimationId::Tween(t) => self.tweens.get(t.0).map(|tw| tw.playhead.progress()),
            AnimationId::Timeline(tl) => self.timelines.get(tl.0).map(|t| t.playhead.progress()),
        }
    }

    /// Total length in seconds (including delay for tweens).
    pub fn duration(&self, id: impl Into<AnimationId>) -> Option<f64> {
        match id.into() {
            AnimationId::Tween(t) => self.tweens.get(t.0).map(Tween::total_duration),
            AnimationId::Timeline(tl) => self.timelines.get(tl.0).map(|t| t.playhead.duration),
        }
    }

    /// Whether the animation exists and is still moving.
    ///
    /// Timeline children are active while their timeline is.
    pub fn is_active(&self, id: impl Into<AnimationId>) -> bool {
        match id.into() {
            AnimationId::Tween(t) => match self.tweens.get(t.0) {
                Some(tw) => match tw.parent {
                    Some(parent) => self.is_active(parent),
                    None => tw.playhead.is_running(),
                },
                None => false,
            },
            AnimationId::Timeline(tl) => self
                .timelines
                .get(tl.0)
                .is_some_and(|t| t.playhead.is_running()),
        }
    }

    /// Whether the handle still refers to a live animation.
    pub fn contains(&self, id: impl Into<AnimationId>) -> bool {
        match id.into() {
            AnimationId::Tween(t) => self.tweens.contains(t.0),
            AnimationId::Timeline(tl) => self.timelines.contains(tl.0),
        }
    }

    /// Tweens currently writing `(target, property)` that are still moving.
    pub fn active_writers(&self, target: TargetId, property: Property) -> usize {
        self.writers.get(&(target, property)).map_or(0, |ids| {
            ids.iter().filter(|id| self.is_active(**id)).count()
        })
    }

    /// Last value the engine wrote for `(target, property)`.
    pub fn value(&self, target: TargetId, property: Property) -> Option<&Value> {
        self.cache.get(&(target, property))
    }

    /// Last numeric value written, or what the surface reports, or the property default.
    pub fn current_number(&self, target: TargetId, property: Property, surface: &dyn Surface) -> f64 {
        current_value(&self.cache, surface, target, property)
            .as_number()
            .unwrap_or(0.0)
    }

    /// Number of live tweens (root and timeline children).
    pub fn tween_count(&self) -> usize {
        self.tweens.len()
    }

    /// Advance every playing root animation by `dt` seconds and write the results.
    ///
    /// Tweens whose target disappeared are cancelled silently. Timelines render before root
    /// tweens; root tweens render in scheduling order.
    pub fn advance(&mut self, dt: f64, surface: &mut dyn Surface) {
        let orphaned: Vec<TweenId> = self
            .tweens
            .iter()
            .filter(|(_, tw)| !surface.contains(tw.spec.target))
            .map(|(k, _)| TweenId(k))
            .collect();
        for id in orphaned {
            tracing::trace!(?id, "target gone, dropping tween");
            self.remove_tween(id);
        }

        for key in self.timelines.keys() {
            let id = TimelineId(key);
            let Some(tl) = self.timelines.get_mut(key) else {
                continue;
            };
            let before = tl.playhead.time;
            if tl.playhead.advance(dt) {
                self.render_timeline(id, before, surface);
                self.finish_timeline(id);
            }
        }

        let mut roots: Vec<(u64, TweenId)> = self
            .tweens
            .iter()
            .filter(|(_, tw)| tw.parent.is_none())
            .map(|(k, tw)| (tw.seq, TweenId(k)))
            .collect();
        roots.sort_unstable_by_key(|(seq, _)| *seq);
        for (_, id) in roots {
            let Some(tw) = self.tweens.get_mut(id.0) else {
                continue;
            };
            if tw.playhead.advance(dt) {
                self.render_tween(id, surface);
                self.finish_root_tween(id);
            }
        }
    }

    /// Take the events produced since the last call.
    pub fn drain_events(&mut self) -> Vec<AnimationEvent> {
        std::mem::take(&mut self.events)
    }

    fn insert_tween(
        &mut self,
        mut spec: TweenSpec,
        parent: Option<TimelineId>,
        surface: &mut dyn Surface,
    ) -> ChoreoResult<TweenId> {
        if !surface.contains(spec.target) {
            return Err(ChoreoError::target_not_found(format!("{:?}", spec.target)));
        }
        if !spec.duration.is_finite() || spec.duration < 0.0 {
            return Err(ChoreoError::validation(format!(
                "tween duration must be finite and >= 0, got {}",
                spec.duration
            )));
        }
        if !spec.delay.is_finite() || spec.delay < 0.0 {
            return Err(ChoreoError::validation(format!(
                "tween delay must be finite and >= 0, got {}",
                spec.delay
            )));
        }
        if spec.to.is_empty() && spec.from.as_ref().is_none_or(|f| f.is_empty()) {
            return Err(ChoreoError::validation("tween writes no properties"));
        }
        if self.reduced_motion {
            spec.duration = 0.0;
            spec.delay = 0.0;
        }

        let target = spec.target;
        let overwrite = spec.overwrite;
        let immediate = spec.from.is_some();
        let mut tween = Tween::new(spec, self.next_seq);
        self.next_seq += 1;
        tween.parent = parent;
        {
            let cache = &self.cache;
            let surface_ref: &dyn Surface = surface;
            tween.resolve_from_only(|p| current_value(cache, surface_ref, target, p));
        }
        let props = tween.spec.properties();
        self.apply_overwrite(target, &props, overwrite);

        let id = TweenId(self.tweens.insert(tween));
        for p in &props {
            self.writers.entry((target, *p)).or_default().push(id);
        }
        if immediate {
            self.render_tween(id, surface);
        }
        Ok(id)
    }

    fn apply_overwrite(&mut self, target: TargetId, props: &[Property], mode: Overwrite) {
        if mode == Overwrite::None {
            return;
        }
        let mut victims: SmallVec<[TweenId; 4]> = SmallVec::new();
        for p in props {
            if let Some(ids) = self.writers.get(&(target, *p)) {
                for id in ids {
                    if !victims.contains(id) {
                        victims.push(*id);
                    }
                }
            }
        }
        for id in victims {
            match mode {
                Overwrite::All => {
                    tracing::trace!(?id, ?target, "overwritten");
                    self.remove_tween(id);
                }
                Overwrite::Auto => {
                    let emptied = self
                        .tweens
                        .get_mut(id.0)
                        .is_some_and(|tw| tw.strip_properties(props));
                    for p in props {
                        self.unlink_writer(target, *p, id);
                    }
                    if emptied {
                        tracing::trace!(?id, ?target, "overwritten");
                        self.remove_tween(id);
                    }
                }
                Overwrite::None => {}
            }
        }
    }

    fn unlink_writer(&mut self, target: TargetId, property: Property, id: TweenId) {
        if let Some(ids) = self.writers.get_mut(&(target, property)) {
            ids.retain(|w| *w != id);
            if ids.is_empty() {
                self.writers.remove(&(target, property));
            }
        }
    }

    fn remove_tween(&mut self, id: TweenId) {
        let Some(tween) = self.tweens.remove(id.0) else {
            return;
        };
        for p in tween.spec.properties() {
            self.unlink_writer(tween.spec.target, p, id);
        }
        if let Some(parent) = tween.parent {
            if let Some(tl) = self.timelines.get_mut(parent.0) {
                tl.layout.remove(id);
            }
        }
    }

    fn write(&mut self, target: TargetId, props: &[(Property, Value)], surface: &mut dyn Surface) {
        for (p, v) in props {
            self.cache.insert((target, *p), v.clone());
        }
        surface.apply_properties(target, props);
    }

    fn render_tween(&mut self, id: TweenId, surface: &mut dyn Surface) {
        let Some(tween) = self.tweens.get_mut(id.0) else {
            return;
        };
        let target = tween.spec.target;
        let values = {
            let cache = &self.cache;
            let surface_ref: &dyn Surface = surface;
            tween.frame_values(|p| current_value(cache, surface_ref, target, p))
        };
        if let Some(values) = values {
            self.write(target, &values, surface);
        }
    }

    /// Render children for the timeline's current time, coming from `before`.
    ///
    /// Children render in placement order going forward and in reverse order going backward,
    /// so the child closest to the playhead writes last.
    fn render_timeline(&mut self, id: TimelineId, before: f64, surface: &mut dyn Surface) {
        let Some(tl) = self.timelines.get(id.0) else {
            return;
        };
        let time = tl.playhead.time;
        let mut entries = tl.layout.entries.clone();
        if time < before {
            entries.reverse();
        }
        for e in entries {
            let Some(tw) = self.tweens.get_mut(e.tween.0) else {
                continue;
            };
            let local = time - e.start;
            if local < 0.0 && !tw.has_started() {
                continue;
            }
            tw.playhead.time = local.clamp(0.0, tw.total_duration());
            self.render_tween(e.tween, surface);
        }
    }

    fn with_playhead(&mut self, id: AnimationId, f: impl FnOnce(&mut Playhead)) {
        match id {
            AnimationId::Tween(t) => {
                if let Some(tw) = self.tweens.get_mut(t.0) {
                    f(&mut tw.playhead);
                }
            }
            AnimationId::Timeline(tl) => {
                if let Some(t) = self.timelines.get_mut(tl.0) {
                    f(&mut t.playhead);
                }
            }
        }
    }

    fn jump(&mut self, id: AnimationId, progress: f64, surface: &mut dyn Surface) {
        match id {
            AnimationId::Tween(t) => {
                let Some(tw) = self.tweens.get_mut(t.0) else {
                    return;
                };
                tw.playhead.seek_progress(progress);
                let root = tw.parent.is_none();
                self.render_tween(t, surface);
                if root {
                    self.finish_root_tween(t);
                }
            }
            AnimationId::Timeline(tl) => {
                let Some(timeline) = self.timelines.get_mut(tl.0) else {
                    return;
                };
                let before = timeline.playhead.time;
                timeline.playhead.seek_progress(progress);
                self.render_timeline(tl, before, surface);
                self.finish_timeline(tl);
            }
        }
    }

    fn finish_root_tween(&mut self, id: TweenId) {
        let Some(tw) = self.tweens.get_mut(id.0) else {
            return;
        };
        let Some(finish) = tw.playhead.check_finish() else {
            return;
        };
        let release = finish == Finish::Completed && !tw.retained;
        self.events.push(match finish {
            Finish::Completed => AnimationEvent::Completed(id.into()),
            Finish::ReverseCompleted => AnimationEvent::ReverseCompleted(id.into()),
        });
        if release {
            self.remove_tween(id);
        }
    }

    fn finish_timeline(&mut self, id: TimelineId) {
        let Some(tl) = self.timelines.get_mut(id.0) else {
            return;
        };
        let Some(finish) = tl.playhead.check_finish() else {
            return;
        };
        let release = finish == Finish::Completed && !tl.retained;
        self.events.push(match finish {
            Finish::Completed => AnimationEvent::Completed(id.into()),
            Finish::ReverseCompleted => AnimationEvent::ReverseCompleted(id.into()),
        });
        if release {
            self.cancel(id);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/animator.rs"]
mod tests;
