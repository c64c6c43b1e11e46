use std::collections::HashMap;

use crate::animation::animator::AnimationId;
use crate::animation::ease::Ease;
use crate::animation::timeline::{Position, TimelineDefaults, TimelineId};
use crate::animation::tween::TweenSpec;
use crate::config::choreography::{
    ChoreographyDef, CursorDef, DecryptDef, EffectDef, HorizontalDef, HoverDef, ScrollTriggerDef,
    SetDef, SnapDef, TimelineDef, TriggerDef, TweenDef, VelocityDef,
};
use crate::config::values::expand_props;
use crate::effects::cursor::CursorSpec;
use crate::effects::decrypt::DecryptSpec;
use crate::effects::hover::{HoverSpec, PointerMapping};
use crate::effects::velocity::VelocitySpec;
use crate::engine::Engine;
use crate::foundation::core::{Property, TargetId};
use crate::foundation::error::{ChoreoError, ChoreoResult};
use crate::scroll::horizontal::{ContainerId, HorizontalSpec};
use crate::scroll::scrub::SnapSpec;
use crate::scroll::trigger::TriggerSpec;
use crate::surface::Surface;

/// Selector standing for the hovered element inside hover reactions.
pub const SELF_TARGET: &str = "$self";
/// Selector standing for the hovered element's paired follow target.
pub const FOLLOW_TARGET: &str = "$follow";

/// Outcome of [`Engine::load`].
#[derive(Debug, Default)]
pub struct LoadReport {
    /// Effects registered without error.
    pub registered: usize,
    /// Effects that were skipped.
    pub failures: Vec<LoadFailure>,
    /// Horizontal containers by name.
    pub containers: HashMap<String, ContainerId>,
}

impl LoadReport {
    /// Whether every effect registered.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// One effect that failed to register.
#[derive(Debug)]
pub struct LoadFailure {
    /// Position in [`ChoreographyDef::effects`].
    pub index: usize,
    /// [`EffectDef::kind`] of the effect.
    pub kind: &'static str,
    /// Why it failed.
    pub error: ChoreoError,
}

impl Engine {
    /// Register every effect of a choreography document against `surface`.
    ///
    /// Selectors are resolved once, now. A failing effect is logged and reported; the rest still
    /// load. Engine options in the document are not applied here.
    #[tracing::instrument(skip_all, fields(effects = def.effects.len()))]
    pub fn load(&mut self, def: &ChoreographyDef, surface: &mut dyn Surface) -> LoadReport {
        let mut report = LoadReport::default();
        for (index, effect) in def.effects.iter().enumerate() {
            let result = Loader {
                engine: self,
                containers: &mut report.containers,
                surface: &mut *surface,
            }
            .effect(effect);
            match result {
                Ok(()) => report.registered += 1,
                Err(error) => {
                    tracing::warn!(index, kind = effect.kind(), %error, "effect skipped");
                    report.failures.push(LoadFailure {
                        index,
                        kind: effect.kind(),
                        error,
                    });
                }
            }
        }
        tracing::info!(
            registered = report.registered,
            failed = report.failures.len(),
            "choreography loaded"
        );
        report
    }
}

struct Loader<'a> {
    engine: &'a mut Engine,
    containers: &'a mut HashMap<String, ContainerId>,
    surface: &'a mut dyn Surface,
}

impl Loader<'_> {
    fn effect(&mut self, effect: &EffectDef) -> ChoreoResult<()> {
        match effect {
            EffectDef::Set(def) => self.set(def),
            EffectDef::Tween(def) => self.tween(def),
            EffectDef::Timeline(def) => self.timeline(def),
            EffectDef::Trigger(def) => self.trigger(def),
            EffectDef::Horizontal(def) => self.horizontal(def),
            EffectDef::Velocity(def) => self.velocity(def),
            EffectDef::Cursor(def) => self.cursor(def),
            EffectDef::Decrypt(def) => self.decrypt(def),
            EffectDef::Hover(def) => self.hover(def),
        }
    }

    fn select(&self, selector: &str) -> ChoreoResult<Vec<TargetId>> {
        let found = self.surface.select(selector);
        if found.is_empty() {
            return Err(ChoreoError::target_not_found(format!(
                "selector '{selector}' matched nothing"
            )));
        }
        Ok(found)
    }

    fn first(&self, selector: &str) -> ChoreoResult<TargetId> {
        self.select(selector).map(|found| found[0])
    }

    fn set(&mut self, def: &SetDef) -> ChoreoResult<()> {
        let props = expand_props(&def.props)?;
        for target in self.select(&def.targets)? {
            self.engine
                .animator_mut()
                .set(target, &props, &mut *self.surface)?;
        }
        Ok(())
    }

    /// Region for `anchor`, attached to its named container if any.
    fn region(&self, def: &ScrollTriggerDef, anchor: Option<TargetId>) -> ChoreoResult<TriggerSpec> {
        let mut spec = def.region(anchor)?;
        if let Some(name) = &def.container_animation {
            let id = self.containers.get(name).copied().ok_or_else(|| {
                ChoreoError::invalid_region(format!("unknown container animation '{name}'"))
            })?;
            spec.container = Some(id);
        }
        Ok(spec)
    }

    /// Attach `animation` to a new region, cancelling the animation if the region is rejected.
    fn bind(&mut self, region: TriggerSpec, animation: AnimationId) -> ChoreoResult<()> {
        let region = region.animation(animation);
        if let Err(err) = self.engine.register_trigger(region, &mut *self.surface) {
            self.engine.animator_mut().cancel(animation);
            return Err(err);
        }
        Ok(())
    }

    fn tween(&mut self, def: &TweenDef) -> ChoreoResult<()> {
        let targets = self.select(&def.targets)?;
        let Some(st) = &def.scroll_trigger else {
            for spec in staggered_specs(def, &targets)? {
                self.engine.register_tween(spec, &mut *self.surface)?;
            }
            return Ok(());
        };

        match &st.trigger {
            None => {
                for target in targets {
                    let region = self.region(st, Some(target))?;
                    let id = self
                        .engine
                        .register_tween(def.spec(target)?, &mut *self.surface)?;
                    self.bind(region, id.into())?;
                }
            }
            Some(selector) if st.each => {
                let anchors = self.select(selector)?;
                for (i, target) in targets.into_iter().enumerate() {
                    let anchor = anchors.get(i).copied().ok_or_else(|| {
                        ChoreoError::target_not_found(format!(
                            "'{selector}' has no match for target {i}"
                        ))
                    })?;
                    let region = self.region(st, Some(anchor))?;
                    let id = self
                        .engine
                        .register_tween(def.spec(target)?, &mut *self.surface)?;
                    self.bind(region, id.into())?;
                }
            }
            Some(selector) => {
                let region = self.region(st, Some(self.first(selector)?))?;
                let animation: AnimationId = if let [target] = targets.as_slice() {
                    self.engine
                        .register_tween(def.spec(*target)?, &mut *self.surface)?
                        .into()
                } else {
                    let specs = targets
                        .iter()
                        .map(|t| def.spec(*t))
                        .collect::<ChoreoResult<Vec<_>>>()?;
                    let animator = self.engine.animator_mut();
                    let tl = animator.create_timeline(TimelineDefaults::default());
                    if let Err(err) = animator.add_staggered(
                        tl,
                        specs,
                        def.stagger,
                        &Position::At(0.0),
                        &mut *self.surface,
                    ) {
                        animator.cancel(tl);
                        return Err(err);
                    }
                    tl.into()
                };
                self.bind(region, animation)?;
            }
        }
        Ok(())
    }

    fn timeline(&mut self, def: &TimelineDef) -> ChoreoResult<()> {
        let defaults = TimelineDefaults {
            ease: def.defaults.ease.as_deref().map(str::parse::<Ease>).transpose()?,
        };
        let region = match &def.scroll_trigger {
            Some(st) => {
                let anchor = match &st.trigger {
                    Some(sel) => Some(self.first(sel)?),
                    None => None,
                };
                Some(self.region(st, anchor)?)
            }
            None => None,
        };

        let tl = self.engine.animator_mut().create_timeline(defaults);
        if let Err(err) = self.fill_timeline(tl, def) {
            self.engine.animator_mut().cancel(tl);
            return Err(err);
        }
        match region {
            Some(region) => self.bind(region, tl.into()),
            None => Ok(()),
        }
    }

    fn fill_timeline(
        &mut self,
        tl: TimelineId,
        def: &TimelineDef,
    ) -> ChoreoResult<()> {
        for child in &def.children {
            let targets = self.select(&child.tween.targets)?;
            let specs = targets
                .iter()
                .map(|t| child.tween.spec(*t))
                .collect::<ChoreoResult<Vec<_>>>()?;
            let mut position: Position = child.position.parse()?;
            let animator = self.engine.animator_mut();
            if let Some(label) = &child.label {
                animator.add_label(tl, label, &position)?;
                position = Position::Label(label.clone(), 0.0);
            }
            animator.add_staggered(tl, specs, child.tween.stagger, &position, &mut *self.surface)?;
        }
        Ok(())
    }

    fn trigger(&mut self, def: &TriggerDef) -> ChoreoResult<()> {
        let anchor = match &def.region.trigger {
            Some(sel) => Some(self.first(sel)?),
            None => None,
        };
        let mut region = self.region(&def.region, anchor)?;
        for tween in &def.on_enter {
            let targets = self.select(&tween.targets)?;
            region.on_enter.extend(staggered_specs(tween, &targets)?);
        }
        self.engine.register_trigger(region, &mut *self.surface)?;
        Ok(())
    }

    fn horizontal(&mut self, def: &HorizontalDef) -> ChoreoResult<()> {
        if self.containers.contains_key(&def.name) {
            return Err(ChoreoError::validation(format!(
                "container '{}' is defined twice",
                def.name
            )));
        }
        let mut spec = HorizontalSpec::new(
            self.first(&def.wrapper)?,
            self.first(&def.track)?,
            self.select(&def.panels)?,
        );
        if let Some(scrub) = def.scrub {
            spec.scrub = scrub.into();
        }
        match def.snap {
            Some(SnapDef::Flag(false)) => spec.snap = None,
            Some(SnapDef::Increment(i)) => spec.snap = Some(SnapSpec::new(i)),
            Some(SnapDef::Flag(true)) | None => {}
        }
        let id = self.engine.register_horizontal(spec, &mut *self.surface)?;
        self.containers.insert(def.name.clone(), id);
        Ok(())
    }

    fn velocity(&mut self, def: &VelocityDef) -> ChoreoResult<()> {
        let mut spec = VelocitySpec::new(self.select(&def.targets)?);
        if let Some(p) = &def.property {
            spec.property = parse_property(p)?;
        }
        if let Some(divisor) = def.divisor {
            if divisor == 0.0 {
                return Err(ChoreoError::validation("velocity divisor must not be zero"));
            }
            spec.divisor = divisor;
        }
        if let Some(max) = def.max {
            spec.max = max.abs();
        }
        if let Some(duration) = def.duration {
            spec.duration = duration;
        }
        if let Some(ease) = &def.ease {
            spec.ease = ease.parse()?;
        }
        self.engine.register_velocity(spec, &mut *self.surface)?;
        Ok(())
    }

    fn cursor(&mut self, def: &CursorDef) -> ChoreoResult<()> {
        let dot = def.dot.as_deref().map(|s| self.first(s)).transpose()?;
        let aura = def.aura.as_deref().map(|s| self.first(s)).transpose()?;
        let mut spec = CursorSpec::new(dot, aura);
        if let Some(f) = def.base_factor {
            spec.base_factor = f;
        }
        if let Some(d) = def.dot_duration {
            spec.dot_duration = d;
        }
        self.engine.register_cursor(spec, &*self.surface)
    }

    fn decrypt(&mut self, def: &DecryptDef) -> ChoreoResult<()> {
        let target = self.first(&def.target)?;
        let mut spec = DecryptSpec::new(target, def.text.clone());
        if let Some(alphabet) = &def.alphabet {
            spec.alphabet = alphabet.clone();
        }
        if let Some(interval) = def.interval {
            spec.interval = interval;
        }
        if let Some(rate) = def.rate {
            spec.rate = rate;
        }
        if let Some(st) = &def.scroll_trigger {
            let anchor = match &st.trigger {
                Some(sel) => self.first(sel)?,
                None => target,
            };
            spec.trigger = Some(self.region(st, Some(anchor))?);
        }
        self.engine.register_decrypt(spec, &mut *self.surface)?;
        Ok(())
    }

    fn hover(&mut self, def: &HoverDef) -> ChoreoResult<()> {
        let targets = self.select(&def.targets)?;
        let followers = match &def.follow_target {
            Some(sel) => self.select(sel)?,
            None => Vec::new(),
        };
        let follow = def
            .follow
            .iter()
            .map(|m| {
                Ok::<_, ChoreoError>(PointerMapping {
                    property: parse_property(&m.property)?,
                    axis: m.axis,
                    scale: m.scale,
                    normalized: m.normalized,
                })
            })
            .collect::<ChoreoResult<Vec<_>>>()?;
        let follow_ease = def
            .follow_ease
            .as_deref()
            .map(str::parse::<Ease>)
            .transpose()?;

        for (i, target) in targets.into_iter().enumerate() {
            let follower = followers.get(i).copied();
            let mut spec = HoverSpec::new(target);
            spec.follow_target = follower;
            spec.follow = follow.clone();
            if let Some(d) = def.follow_duration {
                spec.follow_duration = d;
            }
            if let Some(ease) = follow_ease {
                spec.follow_ease = ease;
            }
            spec.on_enter = self.reactions(&def.on_enter, target, follower)?;
            spec.on_move = self.reactions(&def.on_move, target, follower)?;
            spec.on_leave = self.reactions(&def.on_leave, target, follower)?;
            self.engine.register_hover(spec, &*self.surface)?;
        }
        Ok(())
    }

    /// Tweens of a hover reaction with `$self` and `$follow` bound for one element.
    fn reactions(
        &self,
        defs: &[TweenDef],
        this: TargetId,
        follower: Option<TargetId>,
    ) -> ChoreoResult<Vec<TweenSpec>> {
        let mut out = Vec::new();
        for def in defs {
            let targets = match def.targets.as_str() {
                SELF_TARGET => vec![this],
                FOLLOW_TARGET => match follower {
                    Some(f) => vec![f],
                    None => {
                        return Err(ChoreoError::validation(format!(
                            "'{FOLLOW_TARGET}' used without a follow target for {this:?}"
                        )));
                    }
                },
                sel => self.select(sel)?,
            };
            out.extend(staggered_specs(def, &targets)?);
        }
        Ok(out)
    }
}

/// One tween per target, the i-th delayed by an extra `i * stagger` seconds.
fn staggered_specs(def: &TweenDef, targets: &[TargetId]) -> ChoreoResult<Vec<TweenSpec>> {
    targets
        .iter()
        .enumerate()
        .map(|(i, t)| {
            let mut spec = def.spec(*t)?;
            spec.delay += i as f64 * def.stagger;
            Ok::<_, ChoreoError>(spec)
        })
        .collect()
}

fn parse_property(name: &str) -> ChoreoResult<Property> {
    Property::parse(name)
        .ok_or_else(|| ChoreoError::validation(format!("unknown property '{name}'")))
}

#[cfg(test)]
#[path = "../../tests/unit/config/load.rs"]
mod tests;
