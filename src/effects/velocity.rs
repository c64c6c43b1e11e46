use crate::animation::animator::Animator;
use crate::animation::ease::Ease;
use crate::animation::tween::{Overwrite, TweenSpec};
use crate::foundation::core::{Property, TargetId};
use crate::foundation::error::ChoreoResult;
use crate::scroll::trigger::TriggerId;
use crate::surface::Surface;

/// A transform that spikes with scroll speed and relaxes to zero.
#[derive(Clone, Debug, PartialEq)]
pub struct VelocitySpec {
    /// Elements that receive the transform.
    pub targets: Vec<TargetId>,
    /// Property written (skew by default).
    pub property: Property,
    /// Velocity (px/s) per unit of property; negative flips the direction.
    pub divisor: f64,
    /// Largest magnitude written.
    pub max: f64,
    /// Seconds the decay back to zero takes.
    pub duration: f64,
    /// Decay ease.
    pub ease: Ease,
}

impl VelocitySpec {
    /// Vertical skew of up to 15 degrees, one degree per 250 px/s against the scroll direction.
    pub fn new(targets: Vec<TargetId>) -> Self {
        Self {
            targets,
            property: Property::SkewY,
            divisor: -250.0,
            max: 15.0,
            duration: 1.0,
            ease: Ease::OutQuart,
        }
    }
}

/// `clamp(velocity / divisor, -max, max)`.
pub fn magnitude(velocity: f64, divisor: f64, max: f64) -> f64 {
    if divisor == 0.0 {
        return 0.0;
    }
    let max = max.abs();
    (velocity / divisor).clamp(-max, max)
}

#[derive(Debug, Clone)]
pub(crate) struct VelocityEffect {
    pub(crate) spec: VelocitySpec,
    pub(crate) tracker: TriggerId,
}

impl VelocityEffect {
    /// Schedule a fresh decay when the new magnitude beats what is currently applied.
    pub(crate) fn update(
        &mut self,
        velocity: f64,
        animator: &mut Animator,
        surface: &mut dyn Surface,
    ) -> ChoreoResult<()> {
        let next = magnitude(velocity, self.spec.divisor, self.spec.max);
        let Some(probe) = self.spec.targets.iter().copied().find(|t| surface.contains(*t)) else {
            return Ok(());
        };
        let applied = animator.current_number(probe, self.spec.property, &*surface);
        if next.abs() <= applied.abs() {
            return Ok(());
        }
        for target in self.spec.targets.iter().copied() {
            if !surface.contains(target) {
                continue;
            }
            let decay = TweenSpec::new(target)
                .from(self.spec.property, next)
                .to(self.spec.property, 0.0)
                .duration(self.spec.duration)
                .ease(self.spec.ease)
                .overwrite(Overwrite::All);
            animator.schedule(decay, surface)?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/velocity.rs"]
mod tests;
