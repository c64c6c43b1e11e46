use rand::Rng;

use crate::clock::timers::TaskId;
use crate::foundation::core::TargetId;
use crate::foundation::error::{ChoreoError, ChoreoResult};
use crate::foundation::math::EPSILON;
use crate::scroll::trigger::TriggerSpec;

/// Filler characters used while text is still scrambled.
pub const DEFAULT_ALPHABET: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Wider filler set with digits and symbols, for [`DecryptSpec::alphabet`].
pub const GLYPH_ALPHABET: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789@#$%^&*";

/// Timed character-substitution reveal of a target's text.
#[derive(Clone, Debug)]
pub struct DecryptSpec {
    /// Element whose text is written.
    pub target: TargetId,
    /// Text revealed at the end.
    pub text: String,
    /// Filler characters.
    pub alphabet: String,
    /// Seconds between ticks.
    pub interval: f64,
    /// Characters revealed per tick (may be fractional).
    pub rate: f64,
    /// Region whose forward entry starts the reveal; `None` starts it at registration.
    pub trigger: Option<TriggerSpec>,
}

impl DecryptSpec {
    /// One character every three 30 ms ticks, default alphabet, started immediately.
    pub fn new(target: TargetId, text: impl Into<String>) -> Self {
        Self {
            target,
            text: text.into(),
            alphabet: DEFAULT_ALPHABET.to_owned(),
            interval: 0.03,
            rate: 1.0 / 3.0,
            trigger: None,
        }
    }

    pub(crate) fn validate(&self) -> ChoreoResult<()> {
        if !(self.rate > 0.0 && self.rate.is_finite()) {
            return Err(ChoreoError::validation(format!(
                "decrypt rate must be positive, got {}",
                self.rate
            )));
        }
        if !(self.interval >= 0.0 && self.interval.is_finite()) {
            return Err(ChoreoError::validation(format!(
                "decrypt interval must be >= 0, got {}",
                self.interval
            )));
        }
        if self.alphabet.is_empty() {
            return Err(ChoreoError::validation("decrypt alphabet is empty"));
        }
        Ok(())
    }
}

/// Characters revealed after `ticks` ticks at `rate` per tick.
pub fn reveal_count(ticks: u32, rate: f64) -> usize {
    (f64::from(ticks) * rate + EPSILON).floor().max(0.0) as usize
}

/// Ticks needed to reveal `len` characters: `ceil(len / rate)`.
pub fn ticks_to_complete(len: usize, rate: f64) -> u32 {
    if len == 0 {
        return 0;
    }
    (len as f64 / rate - EPSILON).ceil().max(1.0) as u32
}

/// First `revealed` characters of `text`, the rest replaced by random `alphabet` characters.
pub fn render_reveal<R: Rng + ?Sized>(
    text: &[char],
    revealed: usize,
    alphabet: &[char],
    rng: &mut R,
) -> String {
    text.iter()
        .enumerate()
        .map(|(i, c)| {
            if i < revealed || alphabet.is_empty() {
                *c
            } else {
                alphabet[rng.gen_range(0..alphabet.len())]
            }
        })
        .collect()
}

#[derive(Debug, Clone)]
pub(crate) struct DecryptSession {
    pub(crate) target: TargetId,
    pub(crate) task: TaskId,
    text: Vec<char>,
    alphabet: Vec<char>,
    rate: f64,
    ticks: u32,
}

impl DecryptSession {
    pub(crate) fn new(spec: &DecryptSpec, task: TaskId) -> Self {
        Self {
            target: spec.target,
            task,
            text: spec.text.chars().collect(),
            alphabet: spec.alphabet.chars().collect(),
            rate: spec.rate,
            ticks: 0,
        }
    }

    pub(crate) fn ticks(&self) -> u32 {
        self.ticks
    }

    pub(crate) fn is_complete(&self) -> bool {
        reveal_count(self.ticks, self.rate) >= self.text.len()
    }

    /// Run one tick and return the text to write.
    pub(crate) fn tick<R: Rng + ?Sized>(&mut self, rng: &mut R) -> String {
        self.ticks += 1;
        let revealed = reveal_count(self.ticks, self.rate).min(self.text.len());
        render_reveal(&self.text, revealed, &self.alphabet, rng)
    }

    pub(crate) fn final_text(&self) -> String {
        self.text.iter().collect()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/decrypt.rs"]
mod tests;
