/// Tolerance used where repeated fractional accumulation must land on integer boundaries.
pub(crate) const EPSILON: f64 = 1e-9;

pub(crate) fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Frame-rate corrected exponential smoothing factor.
///
/// `base` is the fraction of the remaining distance covered per reference frame; `delta_ratio`
/// is the elapsed time measured in reference frames. Applying the result `n` times with ratio `r`
/// covers the same distance as applying it once with ratio `n * r`.
pub(crate) fn smoothing_factor(base: f64, delta_ratio: f64) -> f64 {
    let base = base.clamp(0.0, 1.0);
    1.0 - (1.0 - base).powf(delta_ratio.max(0.0))
}

/// Nearest multiple of `increment`, clamped to `[0, 1]`.
pub(crate) fn snap_to_increment(value: f64, increment: f64) -> f64 {
    if increment <= 0.0 || !increment.is_finite() {
        return value.clamp(0.0, 1.0);
    }
    ((value / increment).round() * increment).clamp(0.0, 1.0)
}

/// `value / span` clamped to `[0, 1]`; a zero span is a step at `0`.
pub(crate) fn normalized(value: f64, span: f64) -> f64 {
    if span <= 0.0 {
        return if value >= 0.0 { 1.0 } else { 0.0 };
    }
    (value / span).clamp(0.0, 1.0)
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
