//! Dice oracle used for initiative rolls and the final tie-break.
//!
//! The scheduler only needs uniformly distributed integers in a small closed
//! range. Each call must produce one fresh outcome, independent of the
//! previous ones.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

/// Source of dice outcomes.
pub trait DiceOracle: Send + Sync {
    /// Roll a value in `[min, max]` inclusive.
    fn roll(&self, min: u32, max: u32) -> u32;

    /// Roll one six-sided die.
    fn roll_d6(&self) -> u32 {
        self.roll(1, 6)
    }

    /// Draw one fair binary outcome.
    fn coin(&self) -> bool {
        self.roll(1, 2) == 1
    }
}

/// PCG random number generator (Permuted Congruential Generator).
///
/// Uses the PCG-XSH-RR variant: 64 bits of state, 32-bit output. The state
/// advances on every roll so consecutive calls are independent draws, while
/// a fixed seed still replays the same sequence.
#[derive(Debug)]
pub struct PcgDice {
    state: AtomicU64,
}

impl PcgDice {
    /// PCG multiplier constant.
    const MULTIPLIER: u64 = 6364136223846793005;

    /// PCG increment constant.
    const INCREMENT: u64 = 1442695040888963407;

    pub fn new(seed: u64) -> Self {
        Self {
            state: AtomicU64::new(seed),
        }
    }

    /// `state' = (state × multiplier + increment) mod 2^64`
    #[inline]
    fn pcg_step(state: u64) -> u64 {
        state
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT)
    }

    /// XSH-RR output permutation.
    #[inline]
    fn pcg_output(state: u64) -> u32 {
        let xorshifted = (((state >> 18) ^ state) >> 27) as u32;
        let rot = (state >> 59) as u32;
        xorshifted.rotate_right(rot)
    }

    fn next_u32(&self) -> u32 {
        // fetch_update only fails when the closure returns None.
        let previous = self
            .state
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |state| {
                Some(Self::pcg_step(state))
            })
            .unwrap_or_else(|state| state);
        Self::pcg_output(Self::pcg_step(previous))
    }
}

impl DiceOracle for PcgDice {
    fn roll(&self, min: u32, max: u32) -> u32 {
        if min >= max {
            return min;
        }
        let range = max - min + 1;
        min + (self.next_u32() % range)
    }
}

/// Dice that replay a fixed script, for tests and recorded sessions.
///
/// Each roll pops the next scripted value and clamps it into the requested
/// range. Once the script is exhausted every roll returns `min`.
#[derive(Debug, Default)]
pub struct ScriptedDice {
    script: Mutex<VecDeque<u32>>,
}

impl ScriptedDice {
    pub fn new(values: impl IntoIterator<Item = u32>) -> Self {
        Self {
            script: Mutex::new(values.into_iter().collect()),
        }
    }

    /// Appends more values to the script.
    pub fn push(&self, values: impl IntoIterator<Item = u32>) {
        let mut script = self.script.lock().unwrap_or_else(|e| e.into_inner());
        script.extend(values);
    }

    pub fn remaining(&self) -> usize {
        self.script.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

impl DiceOracle for ScriptedDice {
    fn roll(&self, min: u32, max: u32) -> u32 {
        let next = self
            .script
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front();
        match next {
            Some(value) => value.clamp(min, max.max(min)),
            None => min,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pcg_rolls_stay_in_range() {
        let dice = PcgDice::new(42);
        for _ in 0..1_000 {
            let value = dice.roll(1, 6);
            assert!((1..=6).contains(&value));
        }
    }

    #[test]
    fn pcg_replays_with_same_seed() {
        let a = PcgDice::new(7);
        let b = PcgDice::new(7);
        let left: Vec<u32> = (0..16).map(|_| a.roll(1, 100)).collect();
        let right: Vec<u32> = (0..16).map(|_| b.roll(1, 100)).collect();
        assert_eq!(left, right);
    }

    #[test]
    fn pcg_draws_are_fresh_per_call() {
        let dice = PcgDice::new(3);
        let draws: Vec<u32> = (0..32).map(|_| dice.roll(1, 1_000_000)).collect();
        let mut unique = draws.clone();
        unique.sort_unstable();
        unique.dedup();
        assert!(unique.len() > 1);
    }

    #[test]
    fn scripted_dice_clamps_and_falls_back_to_min() {
        let dice = ScriptedDice::new([9, 0, 2]);
        assert_eq!(dice.roll(1, 6), 6);
        assert_eq!(dice.roll(1, 6), 1);
        assert!(!dice.coin());
        assert_eq!(dice.remaining(), 0);
        assert_eq!(dice.roll(3, 6), 3);
    }
}
