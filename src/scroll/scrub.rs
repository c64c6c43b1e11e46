use crate::animation::ease::Ease;
use crate::foundation::math::{EPSILON, lerp, snap_to_increment};

/// Snap-to-increment behaviour for scrubbed regions.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SnapSpec {
    /// Progress step to snap to (`1 / (N - 1)` for N panels).
    pub increment: f64,
    /// Seconds without scroll movement before snapping.
    #[serde(default = "SnapSpec::default_delay")]
    pub delay: f64,
    /// Seconds the snap ease takes.
    #[serde(default = "SnapSpec::default_duration")]
    pub duration: f64,
    /// Snap ease.
    #[serde(default = "SnapSpec::default_ease")]
    pub ease: Ease,
}

impl SnapSpec {
    fn default_delay() -> f64 {
        0.1
    }

    fn default_duration() -> f64 {
        0.5
    }

    fn default_ease() -> Ease {
        Ease::InOutQuad
    }

    /// Snap to multiples of `increment` with default timing.
    pub fn new(increment: f64) -> Self {
        Self {
            increment,
            delay: Self::default_delay(),
            duration: Self::default_duration(),
            ease: Self::default_ease(),
        }
    }
}

/// Eases displayed progress toward raw scroll progress.
///
/// Every change of the raw value restarts an `OutExpo` catch-up lasting `lag` seconds, so the
/// displayed value reaches the raw value within one lag after scrolling stops. Lag 0 follows
/// directly. With a snap configured, a quiet period starts a second ease to the nearest
/// increment.
#[derive(Clone, Debug)]
pub struct ScrubFollower {
    lag: f64,
    raw: f64,
    from: f64,
    target: f64,
    current: f64,
    elapsed: f64,
    duration: f64,
    ease: Ease,
    quiet: f64,
    snapped: bool,
    primed: bool,
}

impl ScrubFollower {
    /// Follower with the given lag in seconds.
    pub fn new(lag: f64) -> Self {
        Self {
            lag: lag.max(0.0),
            raw: 0.0,
            from: 0.0,
            target: 0.0,
            current: 0.0,
            elapsed: 0.0,
            duration: 0.0,
            ease: Ease::OutExpo,
            quiet: 0.0,
            snapped: false,
            primed: false,
        }
    }

    /// Displayed progress.
    pub fn current(&self) -> f64 {
        self.current
    }

    /// Value currently being eased to.
    pub fn target(&self) -> f64 {
        self.target
    }

    fn ease_to(&mut self, target: f64, duration: f64, ease: Ease) {
        self.from = self.current;
        self.target = target;
        self.elapsed = 0.0;
        self.duration = duration.max(0.0);
        self.ease = ease;
    }

    /// Feed the raw progress for this frame and return the displayed progress.
    ///
    /// The first call jumps straight to `raw`.
    pub fn update(&mut self, raw: f64, dt: f64, snap: Option<&SnapSpec>) -> f64 {
        if !self.primed {
            self.primed = true;
            self.raw = raw;
            self.from = raw;
            self.target = raw;
            self.current = raw;
            return raw;
        }
        let dt = dt.max(0.0);
        if (raw - self.raw).abs() > EPSILON {
            self.raw = raw;
            self.quiet = 0.0;
            self.snapped = false;
            self.ease_to(raw, self.lag, Ease::OutExpo);
        } else {
            self.quiet += dt;
        }

        if let Some(snap) = snap {
            if !self.snapped && self.quiet >= snap.delay {
                self.snapped = true;
                let to = snap_to_increment(self.raw, snap.increment);
                if (to - self.target).abs() > EPSILON {
                    tracing::trace!(from = self.raw, to, "snapping");
                    self.ease_to(to, snap.duration, snap.ease);
                }
            }
        }

        self.elapsed += dt;
        self.current = if self.duration <= 0.0 || self.elapsed >= self.duration {
            self.target
        } else {
            lerp(
                self.from,
                self.target,
                self.ease.apply(self.elapsed / self.duration),
            )
        };
        self.current
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scroll/scrub.rs"]
mod tests;
