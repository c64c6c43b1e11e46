use crate::animation::animator::Animator;
use crate::animation::ease::Ease;
use crate::animation::tween::{Overwrite, TweenSpec};
use crate::foundation::core::{Point, Property, Rect, TargetId, Vec2};
use crate::foundation::error::ChoreoResult;
use crate::surface::Surface;

/// Pointer axis read by a [`PointerMapping`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerAxis {
    /// Horizontal offset from the element centre.
    X,
    /// Vertical offset from the element centre.
    Y,
}

/// Maps the pointer's offset from the hovered element's centre onto a property.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerMapping {
    /// Property written on the follow target.
    pub property: Property,
    /// Axis of the offset.
    pub axis: PointerAxis,
    /// Multiplier applied to the offset.
    pub scale: f64,
    /// Divide the offset by the half extent first, giving `[-1, 1]` across the element.
    pub normalized: bool,
}

impl PointerMapping {
    /// Value for a pointer `offset` from the centre of an element with `half` extents.
    pub fn value(&self, offset: Vec2, half: Vec2) -> f64 {
        let (d, h) = match self.axis {
            PointerAxis::X => (offset.x, half.x),
            PointerAxis::Y => (offset.y, half.y),
        };
        let d = if self.normalized {
            if h > 0.0 { d / h } else { 0.0 }
        } else {
            d
        };
        d * self.scale
    }
}

/// Enter, move and leave reactions of one element.
#[derive(Clone, Debug, PartialEq)]
pub struct HoverSpec {
    /// Element whose layout rect is the hit area.
    pub target: TargetId,
    /// Element receiving the pointer-follow tween; defaults to `target`.
    pub follow_target: Option<TargetId>,
    /// Pointer-follow mappings applied on every pointer move while inside.
    pub follow: Vec<PointerMapping>,
    /// Duration of each pointer-follow tween.
    pub follow_duration: f64,
    /// Ease of each pointer-follow tween.
    pub follow_ease: Ease,
    /// Tweens scheduled when the pointer enters.
    pub on_enter: Vec<TweenSpec>,
    /// Tweens scheduled on every pointer move while inside.
    pub on_move: Vec<TweenSpec>,
    /// Tweens scheduled when the pointer leaves.
    pub on_leave: Vec<TweenSpec>,
}

impl HoverSpec {
    /// Hover reactions with no tweens yet.
    pub fn new(target: TargetId) -> Self {
        Self {
            target,
            follow_target: None,
            follow: Vec::new(),
            follow_duration: 0.5,
            follow_ease: Ease::OutCubic,
            on_enter: Vec::new(),
            on_move: Vec::new(),
            on_leave: Vec::new(),
        }
    }
}

/// Pointer offset from the centre of `rect`, plus the rect's half extents.
pub fn pointer_offset(rect: Rect, pointer: Point) -> (Vec2, Vec2) {
    let centre = rect.center();
    (
        pointer - centre,
        Vec2::new(rect.width() / 2.0, rect.height() / 2.0),
    )
}

#[derive(Debug, Clone)]
pub(crate) struct HoverEffect {
    pub(crate) spec: HoverSpec,
    inside: bool,
    last_pointer: Option<Point>,
}

impl HoverEffect {
    pub(crate) fn new(spec: HoverSpec) -> Self {
        Self {
            spec,
            inside: false,
            last_pointer: None,
        }
    }

    pub(crate) fn is_inside(&self) -> bool {
        self.inside
    }

    /// Step the enter/move/leave state machine for this frame's pointer.
    pub(crate) fn update(
        &mut self,
        pointer: Option<Point>,
        animator: &mut Animator,
        surface: &mut dyn Surface,
    ) -> ChoreoResult<()> {
        let Some(layout) = surface.bounds(self.spec.target) else {
            return Ok(());
        };
        let scroll = surface.scroll_offset();
        let on_screen = layout - Vec2::new(0.0, scroll);
        let inside = pointer.is_some_and(|p| on_screen.contains(p));

        if inside && !self.inside {
            tracing::trace!(target_id = ?self.spec.target, "pointer entered");
            schedule_all(&self.spec.on_enter, animator, surface)?;
        }
        if !inside && self.inside {
            tracing::trace!(target_id = ?self.spec.target, "pointer left");
            self.last_pointer = None;
            schedule_all(&self.spec.on_leave, animator, surface)?;
        }
        self.inside = inside;

        let Some(p) = pointer.filter(|_| inside) else {
            return Ok(());
        };
        if self.last_pointer == Some(p) {
            return Ok(());
        }
        self.last_pointer = Some(p);

        if !self.spec.follow.is_empty() {
            let (offset, half) = pointer_offset(on_screen, p);
            let follower = self.spec.follow_target.unwrap_or(self.spec.target);
            let mut tween = TweenSpec::new(follower)
                .duration(self.spec.follow_duration)
                .ease(self.spec.follow_ease)
                .overwrite(Overwrite::Auto);
            for m in &self.spec.follow {
                tween = tween.to(m.property, m.value(offset, half));
            }
            if surface.contains(follower) {
                animator.schedule(tween, surface)?;
            }
        }
        schedule_all(&self.spec.on_move, animator, surface)
    }
}

/// Hover reactions replace overlapping properties of earlier reactions.
fn schedule_all(
    specs: &[TweenSpec],
    animator: &mut Animator,
    surface: &mut dyn Surface,
) -> ChoreoResult<()> {
    for spec in specs {
        if !surface.contains(spec.target) {
            continue;
        }
        let mut spec = spec.clone();
        if spec.overwrite == Overwrite::None {
            spec.overwrite = Overwrite::Auto;
        }
        animator.schedule(spec, surface)?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/effects/hover.rs"]
mod tests;
