use crate::animation::animator::Animator;
use crate::animation::ease::Ease;
use crate::animation::tween::{Overwrite, TweenSpec};
use crate::foundation::core::{Point, Property, TargetId, Value};
use crate::foundation::error::ChoreoResult;
use crate::foundation::math::smoothing_factor;
use crate::surface::Surface;

/// Dual-layer pointer follower.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CursorSpec {
    /// Layer that jumps to the pointer with a very short tween.
    pub dot: Option<TargetId>,
    /// Layer that trails the pointer with frame-rate corrected smoothing.
    pub aura: Option<TargetId>,
    /// Fraction of the remaining distance covered per reference frame.
    pub base_factor: f64,
    /// Duration of the dot tween in seconds.
    pub dot_duration: f64,
}

impl CursorSpec {
    /// Default factors: 0.12 per reference frame for the aura, 0.1 s for the dot.
    pub fn new(dot: Option<TargetId>, aura: Option<TargetId>) -> Self {
        Self {
            dot,
            aura,
            base_factor: 0.12,
            dot_duration: 0.1,
        }
    }
}

/// One smoothing step from `current` towards `target`.
pub fn smooth_step(current: Point, target: Point, base_factor: f64, delta_ratio: f64) -> Point {
    let f = smoothing_factor(base_factor, delta_ratio);
    current.lerp(target, f)
}

#[derive(Debug, Clone)]
pub(crate) struct CursorFollower {
    pub(crate) spec: CursorSpec,
    raw: Point,
    smoothed: Point,
    last_pointer: Option<Point>,
}

impl CursorFollower {
    pub(crate) fn new(spec: CursorSpec) -> Self {
        Self {
            spec,
            raw: Point::ZERO,
            smoothed: Point::ZERO,
            last_pointer: None,
        }
    }

    pub(crate) fn smoothed(&self) -> Point {
        self.smoothed
    }

    /// Follow the pointer for one frame. With `immediate`, the aura lands on the pointer.
    pub(crate) fn update(
        &mut self,
        pointer: Option<Point>,
        delta_ratio: f64,
        immediate: bool,
        animator: &mut Animator,
        surface: &mut dyn Surface,
    ) -> ChoreoResult<()> {
        if let Some(p) = pointer {
            if self.last_pointer != Some(p) {
                self.last_pointer = Some(p);
                self.raw = p;
                if let Some(dot) = self.spec.dot.filter(|d| surface.contains(*d)) {
                    let tween = TweenSpec::new(dot)
                        .to(Property::X, p.x)
                        .to(Property::Y, p.y)
                        .duration(self.spec.dot_duration)
                        .ease(Ease::OutQuad)
                        .overwrite(Overwrite::All);
                    animator.schedule(tween, surface)?;
                }
            }
        }

        self.smoothed = if immediate {
            self.raw
        } else {
            smooth_step(self.smoothed, self.raw, self.spec.base_factor, delta_ratio)
        };
        if let Some(aura) = self.spec.aura.filter(|a| surface.contains(*a)) {
            animator.set(
                aura,
                &[
                    (Property::X, Value::Number(self.smoothed.x)),
                    (Property::Y, Value::Number(self.smoothed.y)),
                ],
                surface,
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/cursor.rs"]
mod tests;
