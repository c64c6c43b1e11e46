use std::collections::HashMap;
use std::str::FromStr;

use crate::animation::ease::Ease;
use crate::animation::tween::{Playhead, TweenId};
use crate::foundation::arena::SlotKey;
use crate::foundation::error::{ChoreoError, ChoreoResult};

/// Handle to a timeline. Stale handles are inert.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimelineId(pub(crate) SlotKey);

/// Values inherited by children that leave them unset.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TimelineDefaults {
    /// Ease for children without their own.
    #[serde(default)]
    pub ease: Option<Ease>,
}

/// Where a child is placed on its timeline.
///
/// String forms: `""` (append), `"1.5"` (absolute), `"+=0.5"` / `"-=0.8"` (relative to the
/// timeline end), `"<"` / `"<0.2"` (previous start), `">"` / `">-0.1"` (previous end),
/// `"intro"` / `"intro+=0.3"` (label).
#[derive(Clone, Debug, PartialEq, Default)]
pub enum Position {
    /// At the current end of the timeline.
    #[default]
    Append,
    /// At an absolute time in seconds.
    At(f64),
    /// Offset from the current end.
    End(f64),
    /// Offset from the start of the most recently added child or group.
    PreviousStart(f64),
    /// Offset from the end of the most recently added child or group.
    PreviousEnd(f64),
    /// Offset from a named label.
    Label(String, f64),
}

fn parse_offset(s: &str, whole: &str) -> ChoreoResult<f64> {
    let s = s.trim();
    if s.is_empty() {
        return Ok(0.0);
    }
    let (sign, rest) = if let Some(r) = s.strip_prefix("+=") {
        (1.0, r)
    } else if let Some(r) = s.strip_prefix("-=") {
        (-1.0, r)
    } else {
        (1.0, s)
    };
    rest.trim()
        .parse::<f64>()
        .map(|v| sign * v)
        .map_err(|_| ChoreoError::validation(format!("bad position '{whole}'")))
}

impl FromStr for Position {
    type Err = ChoreoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Ok(Self::Append);
        }
        if let Some(rest) = s.strip_prefix('<') {
            return Ok(Self::PreviousStart(parse_offset(rest, s)?));
        }
        if let Some(rest) = s.strip_prefix('>') {
            return Ok(Self::PreviousEnd(parse_offset(rest, s)?));
        }
        if s.starts_with("+=") || s.starts_with("-=") {
            return Ok(Self::End(parse_offset(s, s)?));
        }
        if let Ok(v) = s.parse::<f64>() {
            return Ok(Self::At(v));
        }
        match s.find("+=").or_else(|| s.find("-=")) {
            Some(i) => Ok(Self::Label(s[..i].trim().to_owned(), parse_offset(&s[i..], s)?)),
            None => Ok(Self::Label(s.to_owned(), 0.0)),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Entry {
    pub(crate) tween: TweenId,
    pub(crate) start: f64,
    pub(crate) end: f64,
}

/// Child placement: entries, labels and the most recently added group.
#[derive(Clone, Debug, Default)]
pub(crate) struct Layout {
    pub(crate) entries: Vec<Entry>,
    labels: HashMap<String, f64>,
    previous: Option<(f64, f64)>,
}

impl Layout {
    pub(crate) fn end(&self) -> f64 {
        self.entries.iter().map(|e| e.end).fold(0.0, f64::max)
    }

    /// Start time for `position` given what has been placed so far. Negative results clamp to 0.
    pub(crate) fn resolve(&self, position: &Position) -> ChoreoResult<f64> {
        let (prev_start, prev_end) = self.previous.unwrap_or((0.0, 0.0));
        let t = match position {
            Position::Append => self.end(),
            Position::At(t) => *t,
            Position::End(off) => self.end() + off,
            Position::PreviousStart(off) => prev_start + off,
            Position::PreviousEnd(off) => prev_end + off,
            Position::Label(name, off) => {
                let Some(at) = self.labels.get(name) else {
                    return Err(ChoreoError::validation(format!("unknown label '{name}'")));
                };
                at + off
            }
        };
        if !t.is_finite() {
            return Err(ChoreoError::validation(format!(
                "position {position:?} resolves to {t}"
            )));
        }
        Ok(t.max(0.0))
    }

    /// Place `children` (tween, total duration) at `start`, the i-th offset by `i * each`.
    pub(crate) fn place_group(&mut self, children: &[(TweenId, f64)], start: f64, each: f64) {
        let mut group_end = start;
        for (i, (tween, duration)) in children.iter().enumerate() {
            let s = (start + each * i as f64).max(0.0);
            let end = s + duration.max(0.0);
            group_end = group_end.max(end);
            self.entries.push(Entry {
                tween: *tween,
                start: s,
                end,
            });
        }
        self.previous = Some((start, group_end));
    }

    pub(crate) fn add_label(&mut self, name: &str, at: f64) {
        self.labels.insert(name.to_owned(), at);
    }

    pub(crate) fn label(&self, name: &str) -> Option<f64> {
        self.labels.get(name).copied()
    }

    pub(crate) fn remove(&mut self, tween: TweenId) {
        self.entries.retain(|e| e.tween != tween);
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Timeline {
    pub(crate) defaults: TimelineDefaults,
    pub(crate) layout: Layout,
    pub(crate) playhead: Playhead,
    pub(crate) retained: bool,
}

impl Timeline {
    pub(crate) fn new(defaults: TimelineDefaults) -> Self {
        Self {
            defaults,
            layout: Layout::default(),
            playhead: Playhead::new(0.0),
            retained: false,
        }
    }

    pub(crate) fn sync_duration(&mut self) {
        self.playhead.duration = self.layout.end();
        self.playhead.time = self.playhead.time.min(self.playhead.duration);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/timeline.rs"]
mod tests;
