use std::f64::consts::TAU;
use std::str::FromStr;

use crate::foundation::error::ChoreoError;

/// Easing functions used to map normalized animation progress.
///
/// Input is clamped to `[0, 1]`; output is not, so elastic and back curves overshoot.
#[derive(Clone, Copy, Debug, PartialEq, Default, serde::Serialize, serde::Deserialize)]
pub enum Ease {
    /// Linear interpolation.
    Linear,
    /// Quadratic ease-in.
    InQuad,
    /// Quadratic ease-out.
    #[default]
    OutQuad,
    /// Quadratic ease-in/out.
    InOutQuad,
    /// Cubic ease-in.
    InCubic,
    /// Cubic ease-out.
    OutCubic,
    /// Cubic ease-in/out.
    InOutCubic,
    /// Quartic ease-in.
    InQuart,
    /// Quartic ease-out.
    OutQuart,
    /// Quartic ease-in/out.
    InOutQuart,
    /// Quintic ease-in.
    InQuint,
    /// Quintic ease-out.
    OutQuint,
    /// Quintic ease-in/out.
    InOutQuint,
    /// Exponential ease-in.
    InExpo,
    /// Exponential ease-out.
    OutExpo,
    /// Elastic ease-out oscillating around the target.
    OutElastic {
        /// Oscillation amplitude (values below 1 are treated as 1).
        amplitude: f64,
        /// Oscillation period in normalized time.
        period: f64,
    },
    /// Ease-out that overshoots the target before settling.
    OutBack {
        /// Overshoot strength.
        overshoot: f64,
    },
}

fn power_in(t: f64, n: i32) -> f64 {
    t.powi(n)
}

fn power_out(t: f64, n: i32) -> f64 {
    1.0 - (1.0 - t).powi(n)
}

fn power_in_out(t: f64, n: i32) -> f64 {
    if t < 0.5 {
        power_in(t * 2.0, n) / 2.0
    } else {
        1.0 - power_in((1.0 - t) * 2.0, n) / 2.0
    }
}

impl Ease {
    /// Default elastic ease-out (`elastic.out(1, 0.3)`).
    pub const OUT_ELASTIC: Ease = Ease::OutElastic {
        amplitude: 1.0,
        period: 0.3,
    };

    /// Default back ease-out (`back.out(1.70158)`).
    pub const OUT_BACK: Ease = Ease::OutBack {
        overshoot: 1.70158,
    };

    /// Apply this easing function to normalized progress `t`.
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::InQuad => power_in(t, 2),
            Self::OutQuad => power_out(t, 2),
            Self::InOutQuad => power_in_out(t, 2),
            Self::InCubic => power_in(t, 3),
            Self::OutCubic => power_out(t, 3),
            Self::InOutCubic => power_in_out(t, 3),
            Self::InQuart => power_in(t, 4),
            Self::OutQuart => power_out(t, 4),
            Self::InOutQuart => power_in_out(t, 4),
            Self::InQuint => power_in(t, 5),
            Self::OutQuint => power_out(t, 5),
            Self::InOutQuint => power_in_out(t, 5),
            Self::InExpo => {
                if t == 0.0 {
                    0.0
                } else {
                    2f64.powf(10.0 * (t - 1.0))
                }
            }
            Self::OutExpo => {
                if t == 1.0 {
                    1.0
                } else {
                    1.0 - 2f64.powf(-10.0 * t)
                }
            }
            Self::OutElastic { amplitude, period } => elastic_out(t, amplitude, period),
            Self::OutBack { overshoot } => {
                let u = t - 1.0;
                u * u * ((overshoot + 1.0) * u + overshoot) + 1.0
            }
        }
    }
}

fn elastic_out(t: f64, amplitude: f64, period: f64) -> f64 {
    if t == 0.0 {
        return 0.0;
    }
    if t == 1.0 {
        return 1.0;
    }
    let a = amplitude.max(1.0);
    let p = if period > 0.0 { period } else { 0.3 };
    // Phase shift chosen so the curve starts at exactly 0.
    let shift = p / TAU * (1.0 / a).asin();
    a * 2f64.powf(-10.0 * t) * ((t - shift) * TAU / p).sin() + 1.0
}

fn parse_params(s: &str) -> Result<(&str, Vec<f64>), ChoreoError> {
    let Some(open) = s.find('(') else {
        return Ok((s, Vec::new()));
    };
    let close = s[open..]
        .rfind(')')
        .map(|i| open + i)
        .ok_or_else(|| ChoreoError::validation(format!("unterminated ease parameters in '{s}'")))?;
    let params = s[open + 1..close]
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(|p| {
            p.parse::<f64>()
                .map_err(|_| ChoreoError::validation(format!("bad ease parameter '{p}' in '{s}'")))
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok((&s[..open], params))
}

impl FromStr for Ease {
    type Err = ChoreoError;

    /// Parse GSAP-style names: `none`, `power0..4.{in,out,inOut}`, `quad/cubic/quart/quint.*`,
    /// `expo.{in,out}`, `elastic.out(amplitude, period)`, `back.out(overshoot)`.
    /// A family without a direction means `.out`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (name, params) = parse_params(s)?;
        let (family, dir) = name.split_once('.').unwrap_or((name, "out"));

        let power = |n: u8| -> Result<Ease, ChoreoError> {
            let ease = match (n, dir) {
                (0, _) => Ease::Linear,
                (1, "in") => Ease::InQuad,
                (1, "out") => Ease::OutQuad,
                (1, "inOut") => Ease::InOutQuad,
                (2, "in") => Ease::InCubic,
                (2, "out") => Ease::OutCubic,
                (2, "inOut") => Ease::InOutCubic,
                (3, "in") => Ease::InQuart,
                (3, "out") => Ease::OutQuart,
                (3, "inOut") => Ease::InOutQuart,
                (4, "in") => Ease::InQuint,
                (4, "out") => Ease::OutQuint,
                (4, "inOut") => Ease::InOutQuint,
                _ => return Err(ChoreoError::validation(format!("unknown ease '{s}'"))),
            };
            Ok(ease)
        };

        match family {
            "none" | "linear" => Ok(Ease::Linear),
            "power0" => power(0),
            "power1" | "quad" => power(1),
            "power2" | "cubic" => power(2),
            "power3" | "quart" => power(3),
            "power4" | "quint" | "strong" => power(4),
            "expo" => match dir {
                "in" => Ok(Ease::InExpo),
                "out" => Ok(Ease::OutExpo),
                _ => Err(ChoreoError::validation(format!("unsupported ease '{s}'"))),
            },
            "elastic" if dir == "out" => Ok(Ease::OutElastic {
                amplitude: params.first().copied().unwrap_or(1.0),
                period: params.get(1).copied().unwrap_or(0.3),
            }),
            "back" if dir == "out" => Ok(Ease::OutBack {
                overshoot: params.first().copied().unwrap_or(1.70158),
            }),
            _ => Err(ChoreoError::validation(format!("unsupported ease '{s}'"))),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/ease.rs"]
mod tests;
