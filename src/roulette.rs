//! Roulette title animation.
//!
//! This module shuffles up to three highlight slots over the letters of a title. Every tick moves
//! the slots that are still spinning to random letters, the ticks slow down along an ease-out curve,
//! and each slot settles on its final letter at its own point of the animation.

use std::time::Duration;

use rand::{seq::SliceRandom as _, Rng};

/// Maximum number of highlight slots, one per accent colour.
pub const ACCENT_SLOTS: usize = 3;

/// Number of redraws a spinning slot gets to avoid a letter another slot already holds.
const COLLISION_RETRIES: usize = 16;

/// Timings and shape of the roulette.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RouletteTimings {
    /// Total spin time.
    pub duration: Duration,
    /// Delay between the first ticks.
    pub tick_min: Duration,
    /// Delay between the last ticks.
    pub tick_max: Duration,
    /// Number of letters to highlight, capped at [`ACCENT_SLOTS`].
    pub picks: usize,
    /// Fraction of the spin time at which each slot stops, in slot order.
    pub stop_fractions: [f64; ACCENT_SLOTS],
}

impl Default for RouletteTimings {
    fn default() -> Self {
        Self {
            duration: Duration::from_millis(3100),
            tick_min: Duration::from_millis(80),
            tick_max: Duration::from_millis(420),
            picks: ACCENT_SLOTS,
            stop_fractions: [0.62, 0.80, 1.0],
        }
    }
}

/// Cubic ease-out curve over `[0, 1]`.
#[must_use]
pub fn ease_out_cubic(progress: f64) -> f64 {
    1.0 - (1.0 - progress).powi(3)
}

/// Character-shuffle highlight over a title.
#[derive(Clone, Debug, PartialEq)]
pub struct Roulette {
    /// Characters of the title, newlines included.
    chars: Vec<char>,
    /// Indices of the characters a slot may land on.
    eligible: Vec<usize>,
    /// Character index each slot currently highlights.
    slots: Vec<usize>,
    /// Character index each slot settles on.
    finals: Vec<usize>,
    /// Timings of the spin.
    timings: RouletteTimings,
    /// Whether the slots are still moving.
    spinning: bool,
}

impl Roulette {
    /// Creates a roulette over `text` and starts it spinning.
    ///
    /// Spaces and newlines are never highlighted. The final letters and the initial positions of
    /// the slots are drawn up front; a title without any eligible letter produces an idle roulette.
    pub fn new<R: Rng + ?Sized>(text: &str, timings: RouletteTimings, rng: &mut R) -> Self {
        let chars: Vec<char> = text.chars().collect();
        let eligible: Vec<usize> = chars
            .iter()
            .enumerate()
            .filter(|(_, symbol)| !matches!(symbol, ' ' | '\n'))
            .map(|(idx, _)| idx)
            .collect();
        let picks = timings.picks.min(ACCENT_SLOTS);
        let finals = pick_unique(&eligible, picks, rng);
        let slots = pick_unique(&eligible, picks, rng);
        let spinning = !finals.is_empty();

        Self {
            chars,
            eligible,
            slots,
            finals,
            timings,
            spinning,
        }
    }

    /// Delay before the first tick.
    #[must_use]
    pub const fn first_delay(&self) -> Duration {
        self.timings.tick_min
    }

    /// Advances the roulette to `elapsed` time since it started.
    ///
    /// Slots whose stop fraction has been reached settle on their final letter; the others jump to
    /// a random eligible letter, avoiding letters already taken when possible. Returns the delay
    /// until the next tick, or `None` once the spin is over.
    pub fn tick<R: Rng + ?Sized>(&mut self, elapsed: Duration, rng: &mut R) -> Option<Duration> {
        if !self.spinning {
            return None;
        }

        let progress = self.progress(elapsed);
        let mut taken = Vec::with_capacity(self.slots.len());

        for (slot, current) in self.slots.iter_mut().enumerate() {
            if progress >= stop_fraction(&self.timings, slot) {
                if let Some(last) = self.finals.get(slot) {
                    *current = *last;
                    taken.push(*last);
                }
            }
        }

        for (slot, current) in self.slots.iter_mut().enumerate() {
            if progress >= stop_fraction(&self.timings, slot) {
                continue;
            }

            let mut candidate = self.eligible.choose(rng).copied();
            let mut retries = 0;
            while retries < COLLISION_RETRIES && candidate.is_some_and(|idx| taken.contains(&idx)) {
                candidate = self.eligible.choose(rng).copied();
                retries += 1;
            }
            if let Some(idx) = candidate {
                *current = idx;
                taken.push(idx);
            }
        }

        if progress >= 1.0 {
            self.slots.clone_from(&self.finals);
            self.spinning = false;
            return None;
        }

        let span = self.timings.tick_max.saturating_sub(self.timings.tick_min);
        Some(self.timings.tick_min + span.mul_f64(ease_out_cubic(progress)))
    }

    /// Returns the slot highlighting the character at `index`, if any.
    #[must_use]
    pub fn slot_at(&self, index: usize) -> Option<usize> {
        self.slots.iter().position(|slot| *slot == index)
    }

    /// Whether the slots are still moving.
    #[must_use]
    pub const fn is_spinning(&self) -> bool {
        self.spinning
    }

    /// Characters of the title.
    #[must_use]
    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    /// Character index currently highlighted by each slot.
    #[must_use]
    pub fn slots(&self) -> &[usize] {
        &self.slots
    }

    /// Character index each slot settles on.
    #[must_use]
    pub fn finals(&self) -> &[usize] {
        &self.finals
    }

    /// Fraction of the spin time covered by `elapsed`, capped at one.
    fn progress(&self, elapsed: Duration) -> f64 {
        let total = self.timings.duration.as_secs_f64();
        if total <= 0.0 {
            return 1.0;
        }

        (elapsed.as_secs_f64() / total).min(1.0)
    }
}

/// Stop fraction of a slot; slots without one stop at the very end.
fn stop_fraction(timings: &RouletteTimings, slot: usize) -> f64 {
    timings.stop_fractions.get(slot).copied().unwrap_or(1.0)
}

/// Draws `count` distinct values, or returns all of them if there are not enough.
fn pick_unique<R: Rng + ?Sized>(from: &[usize], count: usize, rng: &mut R) -> Vec<usize> {
    if from.len() <= count {
        return from.to_vec();
    }

    from.choose_multiple(rng, count).copied().collect()
}
