use std::collections::BTreeMap;

use crate::foundation::core::{PropMap, Property, Rgba, Value};
use crate::foundation::error::{ChoreoError, ChoreoResult};

/// CSS-like property map as written in a choreography document.
pub type PropsDef = BTreeMap<String, serde_json::Value>;

/// Keys the renderer handles on its own; they are skipped with a warning.
const UNSUPPORTED: &[&str] = &["mixBlendMode", "textShadow", "boxShadow", "transformOrigin"];

/// Expand a document property map into engine properties.
///
/// Compound keys expand to several properties: `color` and `backgroundColor` to four channels,
/// `clipPath: "inset(t r b l)"` to four insets, `filter: "blur(N)"` to [`Property::Blur`]. Units
/// are stripped; the renderer decides what a bare number means for each property. Unknown and
/// unsupported keys are skipped with a warning.
pub fn expand_props(props: &PropsDef) -> ChoreoResult<PropMap> {
    let mut out = PropMap::new();
    for (key, raw) in props {
        match key.as_str() {
            "color" => out.extend(parse_color(as_str(key, raw)?)?.channels(Property::Color)),
            "backgroundColor" => out.extend(
                parse_color(as_str(key, raw)?)?.channels(Property::BackgroundColor),
            ),
            "clipPath" => {
                let [t, r, b, l] = parse_inset(as_str(key, raw)?)?;
                out.extend([
                    (Property::ClipTop, Value::Number(t)),
                    (Property::ClipRight, Value::Number(r)),
                    (Property::ClipBottom, Value::Number(b)),
                    (Property::ClipLeft, Value::Number(l)),
                ]);
            }
            "filter" => out.push((Property::Blur, Value::Number(parse_blur(as_str(key, raw)?)?))),
            k if UNSUPPORTED.contains(&k) => {
                tracing::warn!(key = k, "unsupported property skipped");
            }
            k => match Property::parse(k) {
                Some(p) if p.is_discrete() => out.push((p, Value::Text(text_of(raw)))),
                Some(p) => out.push((p, Value::Number(number_of(key, raw)?))),
                None => tracing::warn!(key = k, "unknown property skipped"),
            },
        }
    }
    Ok(out)
}

fn as_str<'a>(key: &str, raw: &'a serde_json::Value) -> ChoreoResult<&'a str> {
    raw.as_str()
        .ok_or_else(|| ChoreoError::validation(format!("'{key}' expects a string, got {raw}")))
}

fn text_of(raw: &serde_json::Value) -> String {
    match raw {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn number_of(key: &str, raw: &serde_json::Value) -> ChoreoResult<f64> {
    match raw {
        serde_json::Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| ChoreoError::validation(format!("'{key}' is out of range"))),
        serde_json::Value::String(s) => parse_length(s),
        other => Err(ChoreoError::validation(format!(
            "'{key}' expects a number, got {other}"
        ))),
    }
}

/// Number with an optional CSS unit suffix (`"0.8em"`, `"-5deg"`, `"10px"`, `"50%"`).
pub fn parse_length(s: &str) -> ChoreoResult<f64> {
    let s = s.trim();
    let digits = s
        .trim_end_matches(|c: char| c.is_ascii_alphabetic() || c == '%')
        .trim();
    digits
        .parse::<f64>()
        .map_err(|_| ChoreoError::validation(format!("bad length '{s}'")))
}

/// `#rgb`, `#rrggbb`, `rgb(r, g, b)` or `rgba(r, g, b, a)`.
pub fn parse_color(s: &str) -> ChoreoResult<Rgba> {
    let s = s.trim();
    let bad = || ChoreoError::validation(format!("bad color '{s}'"));
    if let Some(hex) = s.strip_prefix('#') {
        let digits: Vec<u32> = hex
            .chars()
            .map(|c| c.to_digit(16))
            .collect::<Option<_>>()
            .ok_or_else(bad)?;
        let (r, g, b) = match digits.as_slice() {
            [r, g, b] => (r * 17, g * 17, b * 17),
            [r1, r2, g1, g2, b1, b2] => (r1 * 16 + r2, g1 * 16 + g2, b1 * 16 + b2),
            _ => return Err(bad()),
        };
        return Ok(Rgba::new(f64::from(r), f64::from(g), f64::from(b), 1.0));
    }
    let (name, args) = function_args(s).ok_or_else(bad)?;
    let nums = args
        .split(',')
        .map(|a| a.trim().parse::<f64>().map_err(|_| bad()))
        .collect::<ChoreoResult<Vec<_>>>()?;
    match (name, nums.as_slice()) {
        ("rgb", [r, g, b]) => Ok(Rgba::new(*r, *g, *b, 1.0)),
        ("rgba", [r, g, b, a]) => Ok(Rgba::new(*r, *g, *b, *a)),
        _ => Err(bad()),
    }
}

/// Radius of `blur(Npx)`.
pub fn parse_blur(s: &str) -> ChoreoResult<f64> {
    match function_args(s.trim()) {
        Some(("blur", arg)) => parse_length(arg),
        _ => Err(ChoreoError::validation(format!(
            "only blur() filters are supported, got '{s}'"
        ))),
    }
}

/// `inset(t r b l)` in percent. One, two or three values expand like CSS margins.
pub fn parse_inset(s: &str) -> ChoreoResult<[f64; 4]> {
    let Some(("inset", args)) = function_args(s.trim()) else {
        return Err(ChoreoError::validation(format!(
            "only inset() clip paths are supported, got '{s}'"
        )));
    };
    let v = args
        .split_whitespace()
        .map(parse_length)
        .collect::<ChoreoResult<Vec<_>>>()?;
    match v.as_slice() {
        [a] => Ok([*a; 4]),
        [tb, rl] => Ok([*tb, *rl, *tb, *rl]),
        [t, rl, b] => Ok([*t, *rl, *b, *rl]),
        [t, r, b, l] => Ok([*t, *r, *b, *l]),
        _ => Err(ChoreoError::validation(format!("bad inset '{s}'"))),
    }
}

fn function_args(s: &str) -> Option<(&str, &str)> {
    let open = s.find('(')?;
    let inner = s[open + 1..].strip_suffix(')')?;
    Some((s[..open].trim(), inner))
}

#[cfg(test)]
#[path = "../../tests/unit/config/values.rs"]
mod tests;
