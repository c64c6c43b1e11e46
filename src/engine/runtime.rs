use std::collections::HashMap;

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

use crate::animation::animator::{AnimationEvent, AnimationId, Animator};
use crate::animation::ease::Ease;
use crate::animation::timeline::{Position, TimelineDefaults, TimelineId};
use crate::animation::tween::{TweenId, TweenSpec};
use crate::clock::ticker::Ticker;
use crate::clock::timers::Timers;
use crate::clock::{Clock, ClockOptions, FrameTime};
use crate::effects::cursor::{CursorFollower, CursorSpec};
use crate::effects::decrypt::{DecryptSession, DecryptSpec};
use crate::effects::hover::{HoverEffect, HoverSpec};
use crate::effects::velocity::{VelocityEffect, VelocitySpec};
use crate::foundation::arena::Arena;
use crate::foundation::core::{Property, TargetId, Value};
use crate::foundation::error::{ChoreoError, ChoreoResult};
use crate::scroll::boundary::{Axis, Boundary, Offset};
use crate::scroll::horizontal::{Container, ContainerId, ContainerSnapshot, HorizontalSpec, offset_percent};
use crate::scroll::trigger::{
    Crossing, Scrub, ToggleAction, Tracker, TriggerId, TriggerSnapshot, TriggerSpec,
};
use crate::surface::Surface;

/// Undrained events kept across frames before the oldest are dropped.
pub const MAX_PENDING_EVENTS: usize = 4096;

/// Engine configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineOptions {
    /// Frame clock tuning.
    pub clock: ClockOptions,
    /// Collapse tweens and smoothing to immediate writes and reveal text at once.
    pub reduced_motion: bool,
    /// Seed for the decryption filler characters. `None` seeds from the OS.
    pub seed: Option<u64>,
}

/// Something the host may want to react to, in the order it happened during the frame.
#[derive(Clone, Debug, PartialEq)]
pub enum EngineEvent {
    /// A tween or timeline finished (or finished in reverse).
    Animation(AnimationEvent),
    /// A region boundary was crossed.
    Trigger {
        /// Region that was crossed.
        id: TriggerId,
        /// Which boundary, in which direction.
        crossing: Crossing,
    },
    /// A text reveal wrote its final text.
    DecryptCompleted {
        /// Element that holds the text.
        target: TargetId,
    },
}

/// What a per-frame callback sees.
pub struct FrameCtx<'a> {
    /// Timing of the current frame.
    pub frame: FrameTime,
    /// The animator, for scheduling or reading values.
    pub animator: &'a mut Animator,
    /// The surface being driven.
    pub surface: &'a mut dyn Surface,
    /// Events produced earlier in this frame. Undrained events from previous frames are not
    /// included.
    pub events: &'a [EngineEvent],
}

/// A keyed per-frame callback registered with [`Engine::add_ticker`].
pub type FrameCallback = dyn for<'a> FnMut(&mut FrameCtx<'a>) -> anyhow::Result<()>;

/// One page worth of choreography state.
pub struct Engine {
    opts: EngineOptions,
    clock: Clock,
    animator: Animator,
    trackers: Arena<Tracker>,
    containers: Arena<Container>,
    velocity: Vec<VelocityEffect>,
    cursor: Option<CursorFollower>,
    hovers: Vec<HoverEffect>,
    timers: Timers,
    decrypts: HashMap<TargetId, DecryptSession>,
    decrypt_triggers: HashMap<TriggerId, DecryptSpec>,
    tickers: Ticker<FrameCallback>,
    rng: Box<dyn RngCore>,
    events: Vec<EngineEvent>,
    last_frame: Option<FrameTime>,
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("opts", &self.opts)
            .field("tweens", &self.animator.tween_count())
            .field("triggers", &self.trackers.len())
            .field("containers", &self.containers.len())
            .field("decrypts", &self.decrypts.len())
            .field("tickers", &self.tickers)
            .finish_non_exhaustive()
    }
}

impl Engine {
    /// Engine with a random source seeded from `opts.seed` (or the OS).
    pub fn new(opts: EngineOptions) -> Self {
        let rng: StdRng = match opts.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(opts, Box::new(rng))
    }

    /// Engine drawing filler characters from `rng`.
    pub fn with_rng(opts: EngineOptions, rng: Box<dyn RngCore>) -> Self {
        let mut animator = Animator::new();
        animator.set_reduced_motion(opts.reduced_motion);
        Self {
            opts,
            clock: Clock::new(opts.clock),
            animator,
            trackers: Arena::new(),
            containers: Arena::new(),
            velocity: Vec::new(),
            cursor: None,
            hovers: Vec::new(),
            timers: Timers::new(),
            decrypts: HashMap::new(),
            decrypt_triggers: HashMap::new(),
            tickers: Ticker::new(),
            rng,
            events: Vec::new(),
            last_frame: None,
        }
    }

    /// Options the engine was built with.
    pub fn options(&self) -> &EngineOptions {
        &self.opts
    }

    /// The animator, for reading playback state and written values.
    pub fn animator(&self) -> &Animator {
        &self.animator
    }

    /// The animator, for scheduling tweens and building timelines directly.
    pub fn animator_mut(&mut self) -> &mut Animator {
        &mut self.animator
    }

    /// Timing of the most recent [`Engine::tick`].
    pub fn last_frame(&self) -> Option<FrameTime> {
        self.last_frame
    }

    /// Schedule a free-running tween.
    pub fn register_tween(
        &mut self,
        spec: TweenSpec,
        surface: &mut dyn Surface,
    ) -> ChoreoResult<TweenId> {
        self.animator.schedule(spec, surface)
    }

    /// Create a timeline and fill it with `(tween, position)` children in order.
    #[tracing::instrument(skip(self, children, surface), fields(children = children.len()))]
    pub fn register_timeline(
        &mut self,
        defaults: TimelineDefaults,
        children: Vec<(TweenSpec, Position)>,
        surface: &mut dyn Surface,
    ) -> ChoreoResult<TimelineId> {
        let tl = self.animator.create_timeline(defaults);
        for (spec, position) in children {
            if let Err(err) = self.animator.add_to_timeline(tl, spec, &position, surface) {
                self.animator.cancel(tl);
                return Err(err);
            }
        }
        Ok(tl)
    }

    /// Register a scroll region. Its boundaries are resolved now; a malformed region fails here
    /// rather than on the first scroll.
    ///
    /// The region's animation is paused and kept alive so crossings can replay it.
    #[tracing::instrument(skip(self, spec, surface), fields(anchor = ?spec.anchor, scrub = ?spec.scrub))]
    pub fn register_trigger(
        &mut self,
        mut spec: TriggerSpec,
        surface: &mut dyn Surface,
    ) -> ChoreoResult<TriggerId> {
        let (axis, limit) = match spec.container {
            Some(c) => {
                let container = self.containers.get(c.0).ok_or_else(|| {
                    ChoreoError::invalid_region(format!("unknown container {c:?}"))
                })?;
                if spec.pin {
                    return Err(ChoreoError::invalid_region(
                        "regions inside a horizontal container cannot pin",
                    ));
                }
                (Axis::Horizontal, container.travel())
            }
            None => (Axis::Vertical, surface.scroll_limit()),
        };
        if let Some(anim) = spec.animation {
            if !self.animator.contains(anim) {
                return Err(ChoreoError::animation(format!(
                    "region animation {anim:?} does not exist"
                )));
            }
        }
        if self.opts.reduced_motion {
            if let Scrub::Smooth(_) = spec.scrub {
                spec.scrub = Scrub::Direct;
            }
            if let Some(snap) = spec.snap.as_mut() {
                snap.delay = 0.0;
                snap.duration = 0.0;
            }
        }

        let mut tracker = Tracker::new(spec, axis);
        tracker.resolve(&*surface, surface.viewport(), limit)?;
        if let Some(anim) = tracker.spec.animation {
            self.animator.pause(anim);
            self.animator.retain(anim);
        }
        let (start, end) = tracker.span();
        let id = TriggerId(self.trackers.insert(tracker));
        tracing::debug!(?id, start, end, "region registered");
        Ok(id)
    }

    /// Forget a region. Its animation is left where it is.
    pub fn remove_trigger(&mut self, id: TriggerId) -> bool {
        self.decrypt_triggers.remove(&id);
        self.velocity.retain(|v| v.tracker != id);
        self.trackers.remove(id.0).is_some()
    }

    /// Register a horizontal pin-scroll container.
    ///
    /// A single panel gives a container that never moves; nested regions may still reference
    /// it. No panels at all is an [`ChoreoError::InvalidRegionConfig`].
    #[tracing::instrument(skip(self, spec, surface), fields(panels = spec.panels.len()))]
    pub fn register_horizontal(
        &mut self,
        spec: HorizontalSpec,
        surface: &mut dyn Surface,
    ) -> ChoreoResult<ContainerId> {
        let n = spec.panels.len();
        if n == 0 {
            return Err(ChoreoError::invalid_region(
                "horizontal container has no panels",
            ));
        }
        for t in [spec.wrapper, spec.track].iter().chain(&spec.panels) {
            if !surface.contains(*t) {
                return Err(ChoreoError::target_not_found(format!(
                    "horizontal container element {t:?}"
                )));
            }
        }
        let track_width = surface.bounds(spec.track).map_or(0.0, |b| b.width());

        let mut container = Container::new(spec.clone(), track_width);
        if n > 1 {
            // Scroll position drives this timeline, so it keeps its length under reduced motion.
            let reduced = self.animator.reduced_motion();
            self.animator.set_reduced_motion(false);
            let timeline = self.build_track_timeline(&spec.panels, surface);
            self.animator.set_reduced_motion(reduced);
            let timeline = timeline?;

            let mut region = TriggerSpec::anchored(spec.wrapper)
                .start(Boundary::Edges {
                    element: Offset::Percent(0.0),
                    viewport: Offset::Percent(0.0),
                })
                .end(Boundary::Relative(Offset::Px(track_width)))
                .pin(true)
                .scrub(spec.scrub)
                .animation(timeline);
            region.snap = spec.snap;
            let trigger = match self.register_trigger(region, surface) {
                Ok(t) => t,
                Err(err) => {
                    self.animator.cancel(timeline);
                    return Err(err);
                }
            };
            container.timeline = Some(timeline);
            container.trigger = Some(trigger);
        }
        Ok(ContainerId(self.containers.insert(container)))
    }

    fn build_track_timeline(
        &mut self,
        panels: &[TargetId],
        surface: &mut dyn Surface,
    ) -> ChoreoResult<TimelineId> {
        let end = offset_percent(1.0, panels.len());
        let timeline = self.animator.create_timeline(TimelineDefaults {
            ease: Some(Ease::Linear),
        });
        let specs = panels
            .iter()
            .map(|p| TweenSpec::new(*p).to(Property::XPercent, end).duration(1.0))
            .collect();
        if let Err(err) =
            self.animator
                .add_staggered(timeline, specs, 0.0, &Position::At(0.0), surface)
        {
            self.animator.cancel(timeline);
            return Err(err);
        }
        Ok(timeline)
    }

    /// Register a velocity-reactive effect backed by a region spanning the whole page.
    #[tracing::instrument(skip(self, spec, surface), fields(targets = spec.targets.len()))]
    pub fn register_velocity(
        &mut self,
        spec: VelocitySpec,
        surface: &mut dyn Surface,
    ) -> ChoreoResult<TriggerId> {
        if spec.targets.is_empty() {
            return Err(ChoreoError::validation("velocity effect has no targets"));
        }
        if !spec.targets.iter().any(|t| surface.contains(*t)) {
            return Err(ChoreoError::target_not_found("no velocity effect target exists"));
        }
        let tracker = self.register_trigger(TriggerSpec::default(), surface)?;
        self.velocity.push(VelocityEffect { spec, tracker });
        Ok(tracker)
    }

    /// Install the pointer follower, replacing any previous one.
    #[tracing::instrument(skip(self, surface))]
    pub fn register_cursor(&mut self, spec: CursorSpec, surface: &dyn Surface) -> ChoreoResult<()> {
        for t in [spec.dot, spec.aura].into_iter().flatten() {
            if !surface.contains(t) {
                return Err(ChoreoError::target_not_found(format!("cursor layer {t:?}")));
            }
        }
        self.cursor = Some(CursorFollower::new(spec));
        Ok(())
    }

    /// Register a text reveal. Without a trigger it starts immediately; with one, every forward
    /// entry into the region (re)starts it. Returns the region, if any.
    #[tracing::instrument(skip(self, spec, surface), fields(target = ?spec.target))]
    pub fn register_decrypt(
        &mut self,
        spec: DecryptSpec,
        surface: &mut dyn Surface,
    ) -> ChoreoResult<Option<TriggerId>> {
        spec.validate()?;
        if !surface.contains(spec.target) {
            return Err(ChoreoError::target_not_found(format!(
                "decrypt target {:?}",
                spec.target
            )));
        }
        match spec.trigger.clone() {
            Some(region) => {
                let id = self.register_trigger(region, surface)?;
                self.decrypt_triggers.insert(id, spec);
                Ok(Some(id))
            }
            None => {
                self.start_decrypt(&spec, surface);
                Ok(None)
            }
        }
    }

    /// Register pointer enter/move/leave reactions for one element.
    #[tracing::instrument(skip(self, spec, surface), fields(target = ?spec.target))]
    pub fn register_hover(&mut self, spec: HoverSpec, surface: &dyn Surface) -> ChoreoResult<()> {
        if !surface.contains(spec.target) {
            return Err(ChoreoError::target_not_found(format!(
                "hover target {:?}",
                spec.target
            )));
        }
        self.hovers.push(HoverEffect::new(spec));
        Ok(())
    }

    /// Register a per-frame callback under `key`, replacing an existing one with that key.
    pub fn add_ticker(&mut self, key: impl Into<String>, callback: Box<FrameCallback>) -> bool {
        self.tickers.add(key, callback)
    }

    /// Unregister a per-frame callback.
    pub fn remove_ticker(&mut self, key: &str) -> bool {
        self.tickers.remove(key)
    }

    /// Re-measure container tracks and re-resolve every region after a layout change.
    ///
    /// Every region is attempted; the first failure is returned.
    pub fn refresh(&mut self, surface: &dyn Surface) -> ChoreoResult<()> {
        for key in self.containers.keys() {
            let Some(container) = self.containers.get_mut(key) else {
                continue;
            };
            let Some(bounds) = surface.bounds(container.spec.track) else {
                continue;
            };
            container.track_width = bounds.width();
            if let Some(tracker) = container
                .trigger
                .and_then(|t| self.trackers.get_mut(t.0))
            {
                tracker.spec.end = Some(Boundary::Relative(Offset::Px(bounds.width())));
            }
        }

        let viewport = surface.viewport();
        let mut first_err = None;
        for key in self.trackers.keys() {
            let limit = match self.trackers.get(key).and_then(|t| t.spec.container) {
                Some(c) => self.containers.get(c.0).map_or(0.0, Container::travel),
                None => surface.scroll_limit(),
            };
            let Some(tracker) = self.trackers.get_mut(key) else {
                continue;
            };
            if let Err(err) = tracker.resolve(surface, viewport, limit) {
                tracing::warn!(id = ?TriggerId(key), error = %err, "region refresh failed");
                first_err.get_or_insert(err);
            }
        }
        first_err.map_or(Ok(()), Err)
    }

    /// Current state of a region.
    pub fn trigger_snapshot(&self, id: TriggerId) -> Option<TriggerSnapshot> {
        self.trackers.get(id.0).map(Tracker::snapshot)
    }

    /// Current state of a horizontal container.
    pub fn container_snapshot(&self, id: ContainerId) -> Option<ContainerSnapshot> {
        self.containers.get(id.0).map(Container::snapshot)
    }

    /// Whether a text reveal is running on `target`.
    pub fn decrypt_running(&self, target: TargetId) -> bool {
        self.decrypts.contains_key(&target)
    }

    /// Take the events produced since the last call.
    ///
    /// Events accumulate until drained, up to [`MAX_PENDING_EVENTS`]; past that the oldest are
    /// dropped.
    pub fn drain_events(&mut self) -> Vec<EngineEvent> {
        std::mem::take(&mut self.events)
    }

    /// Run one frame at host time `now` (seconds).
    ///
    /// Inputs are read once up front; every write of the frame happens afterwards, in this
    /// order: page regions, containers, regions inside containers, velocity effects, cursor,
    /// hover reactions, text reveals, tweens, then per-frame callbacks.
    pub fn tick(&mut self, now: f64, surface: &mut dyn Surface) -> FrameTime {
        let frame = self.clock.advance(now);
        self.last_frame = Some(frame);
        if self.events.len() > MAX_PENDING_EVENTS {
            let excess = self.events.len() - MAX_PENDING_EVENTS;
            self.events.drain(..excess);
            tracing::debug!(dropped = excess, "events not drained, dropping the oldest");
        }
        let first_event = self.events.len();
        let dt = frame.delta;
        let scroll = surface.scroll_offset();
        let pointer = surface.pointer();

        let (nested, root): (Vec<_>, Vec<_>) = self
            .trackers
            .iter()
            .map(|(k, t)| (TriggerId(k), t.spec.container))
            .partition(|(_, c)| c.is_some());
        for (id, _) in root {
            self.step_tracker(id, scroll, dt, surface);
        }

        for key in self.containers.keys() {
            let progress = self
                .containers
                .get(key)
                .and_then(|c| c.trigger)
                .and_then(|t| self.trackers.get(t.0))
                .map(Tracker::effective_progress);
            if let (Some(p), Some(c)) = (progress, self.containers.get_mut(key)) {
                c.progress = p;
            }
        }

        for (id, container) in nested {
            let position = container
                .and_then(|c| self.containers.get(c.0))
                .map_or(0.0, Container::local_position);
            self.step_tracker(id, position, dt, surface);
        }

        for effect in &mut self.velocity {
            let velocity = self
                .trackers
                .get(effect.tracker.0)
                .map_or(0.0, Tracker::velocity);
            if let Err(err) = effect.update(velocity, &mut self.animator, surface) {
                tracing::warn!(error = %err, "velocity effect failed");
            }
        }

        if let Some(cursor) = self.cursor.as_mut() {
            let immediate = self.opts.reduced_motion;
            if let Err(err) =
                cursor.update(pointer, frame.delta_ratio, immediate, &mut self.animator, surface)
            {
                tracing::warn!(error = %err, "cursor follower failed");
            }
        }

        for hover in &mut self.hovers {
            if let Err(err) = hover.update(pointer, &mut self.animator, surface) {
                tracing::warn!(target_id = ?hover.spec.target, error = %err, "hover effect failed");
            }
        }

        self.step_decrypts(dt, surface);

        self.animator.advance(dt, surface);
        self.events
            .extend(self.animator.drain_events().into_iter().map(EngineEvent::Animation));

        if !self.tickers.is_empty() {
            let mut ctx = FrameCtx {
                frame,
                animator: &mut self.animator,
                surface: &mut *surface,
                events: &self.events[first_event..],
            };
            self.tickers.dispatch(|cb| cb(&mut ctx));
        }
        frame
    }

    fn step_tracker(&mut self, id: TriggerId, position: f64, dt: f64, surface: &mut dyn Surface) {
        let Some(tracker) = self.trackers.get_mut(id.0) else {
            return;
        };
        let crossings = tracker.sample(position, dt);
        let effective = tracker.update_effective(dt);
        let scrubbed = tracker.scrubbed();
        let seek = (scrubbed && tracker.last_seek != Some(effective)).then_some(effective);
        if seek.is_some() {
            tracker.last_seek = seek;
        }
        let pin = tracker.pin_offset();
        let pin_write = if pin != tracker.last_pin { pin } else { None };
        tracker.last_pin = pin;
        let animation = tracker.spec.animation;
        let anchor = tracker.spec.anchor;
        let actions = tracker.spec.toggle_actions;
        let entered = crossings.contains(&Crossing::Enter);
        let on_enter = if entered {
            tracker.spec.on_enter.clone()
        } else {
            Vec::new()
        };

        if let (Some(anim), Some(p)) = (animation, seek) {
            self.animator.seek_progress(anim, p, surface);
        }
        if let (Some(anchor), Some(offset)) = (anchor, pin_write) {
            let write = [(Property::PinOffset, Value::Number(offset))];
            if let Err(err) = self.animator.set(anchor, &write, surface) {
                tracing::warn!(?id, error = %err, "pin write failed");
            }
        }
        for crossing in crossings {
            self.events.push(EngineEvent::Trigger { id, crossing });
            if let (false, Some(anim)) = (scrubbed, animation) {
                self.apply_action(anim, actions.for_crossing(crossing), surface);
            }
        }
        for tween in on_enter {
            if let Err(err) = self.animator.schedule(tween, surface) {
                tracing::warn!(?id, error = %err, "region entry tween skipped");
            }
        }
        if entered {
            if let Some(spec) = self.decrypt_triggers.get(&id).cloned() {
                self.start_decrypt(&spec, surface);
            }
        }
    }

    fn apply_action(&mut self, anim: AnimationId, action: ToggleAction, surface: &mut dyn Surface) {
        match action {
            ToggleAction::Play => self.animator.play(anim),
            ToggleAction::Reverse => self.animator.reverse(anim),
            ToggleAction::Pause => self.animator.pause(anim),
            ToggleAction::Resume => self.animator.resume(anim),
            ToggleAction::Restart => self.animator.restart(anim, surface),
            ToggleAction::Complete => self.animator.complete(anim, surface),
            ToggleAction::Reset => self.animator.reset(anim, surface),
            ToggleAction::None => {}
        }
    }

    /// Start (or restart) a reveal. A session already running on the target loses its timer
    /// first.
    fn start_decrypt(&mut self, spec: &DecryptSpec, surface: &mut dyn Surface) {
        if let Some(old) = self.decrypts.remove(&spec.target) {
            tracing::debug!(target_id = ?spec.target, "superseding running reveal");
            self.timers.cancel(old.task);
        }
        if self.opts.reduced_motion || spec.text.is_empty() {
            self.finish_decrypt(spec.target, spec.text.clone(), surface);
            return;
        }
        let task = self.timers.schedule_interval(spec.interval);
        self.decrypts
            .insert(spec.target, DecryptSession::new(spec, task));
    }

    fn step_decrypts(&mut self, dt: f64, surface: &mut dyn Surface) {
        for (task, count) in self.timers.advance(dt) {
            let Some(target) = self
                .decrypts
                .iter()
                .find(|(_, s)| s.task == task)
                .map(|(t, _)| *t)
            else {
                self.timers.cancel(task);
                continue;
            };
            if !surface.contains(target) {
                self.timers.cancel(task);
                self.decrypts.remove(&target);
                continue;
            }
            let Some(session) = self.decrypts.get_mut(&target) else {
                continue;
            };
            let mut text = String::new();
            for _ in 0..count {
                text = session.tick(&mut *self.rng);
                if session.is_complete() {
                    break;
                }
            }
            if session.is_complete() {
                let final_text = session.final_text();
                self.timers.cancel(task);
                self.decrypts.remove(&target);
                self.finish_decrypt(target, final_text, surface);
            } else if let Err(err) = self.animator.set(target, &[(Property::Text, text.into())], surface) {
                tracing::warn!(target_id = ?target, error = %err, "reveal write failed");
            }
        }
    }

    fn finish_decrypt(&mut self, target: TargetId, text: String, surface: &mut dyn Surface) {
        match self.animator.set(target, &[(Property::Text, text.into())], surface) {
            Ok(()) => self.events.push(EngineEvent::DecryptCompleted { target }),
            Err(err) => tracing::warn!(target_id = ?target, error = %err, "reveal write failed"),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/engine/runtime.rs"]
mod tests;
