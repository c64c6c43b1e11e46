//! Frame clock, keyed per-frame callbacks and fixed-interval timers.

/// Keyed per-frame callback registry.
pub mod ticker;
/// Fixed-interval tasks driven by frame deltas.
pub mod timers;

/// Frame clock configuration.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ClockOptions {
    /// Frame rate that `delta_ratio == 1` corresponds to.
    pub reference_fps: f64,
    /// Raw deltas above this (seconds) are treated as a stall.
    pub lag_threshold: f64,
    /// Delta used in place of a stalled frame (seconds).
    pub adjusted_lag: f64,
}

impl Default for ClockOptions {
    fn default() -> Self {
        Self {
            reference_fps: 60.0,
            lag_threshold: 0.5,
            adjusted_lag: 1.0 / 30.0,
        }
    }
}

/// Timing for one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameTime {
    /// Frame counter, starting at 1 for the first advanced frame.
    pub frame: u64,
    /// Smoothed engine time in seconds (sum of smoothed deltas).
    pub time: f64,
    /// Smoothed seconds since the previous frame.
    pub delta: f64,
    /// `delta` measured in reference frames.
    pub delta_ratio: f64,
}

/// Turns host timestamps into smoothed frame deltas.
///
/// The first call yields a zero delta. Time going backwards also yields a zero delta.
#[derive(Clone, Debug)]
pub struct Clock {
    opts: ClockOptions,
    last: Option<f64>,
    frame: u64,
    time: f64,
}

impl Clock {
    /// New clock that has not seen a timestamp yet.
    pub fn new(opts: ClockOptions) -> Self {
        Self {
            opts,
            last: None,
            frame: 0,
            time: 0.0,
        }
    }

    /// Configuration in use.
    pub fn options(&self) -> &ClockOptions {
        &self.opts
    }

    /// Record a host timestamp `now` (seconds) and return the frame timing.
    pub fn advance(&mut self, now: f64) -> FrameTime {
        let raw = match self.last {
            Some(last) if now > last => now - last,
            _ => 0.0,
        };
        if self.last.is_none_or(|last| now > last) {
            self.last = Some(now);
        }
        let delta = if raw > self.opts.lag_threshold {
            tracing::debug!(raw, adjusted = self.opts.adjusted_lag, "frame stall smoothed");
            self.opts.adjusted_lag
        } else {
            raw
        };
        self.frame += 1;
        self.time += delta;
        FrameTime {
            frame: self.frame,
            time: self.time,
            delta,
            delta_ratio: delta * self.opts.reference_fps.max(1.0),
        }
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new(ClockOptions::default())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/clock/clock.rs"]
mod tests;
