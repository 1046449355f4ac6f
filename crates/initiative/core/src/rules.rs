//! Score rules applied between passes.
//!
//! Every function here is pure: the same inputs always give the same score,
//! which lets non-privileged parties predict the outcome the privileged party
//! will commit.

use crate::config::InitiativeConfig;

/// Decay policy for initiative scores.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScoreRules {
    pass_decay: f64,
    initial_pass: u32,
}

impl ScoreRules {
    pub fn new(pass_decay: u32, initial_pass: u32) -> Self {
        Self {
            pass_decay: f64::from(pass_decay),
            initial_pass,
        }
    }

    pub fn from_config(config: &InitiativeConfig) -> Self {
        Self::new(config.pass_decay, config.initial_pass)
    }

    /// Score after one pass completes.
    ///
    /// Subtracts the fixed decay step. Spent scores keep dropping below zero
    /// instead of being erased, so they stay visible but never order first.
    pub fn decay_on_pass(&self, score: f64) -> f64 {
        score - self.pass_decay
    }

    /// Score for a combatant rolling for the first time during `current_pass`.
    ///
    /// Applies the decay of every pass that already elapsed so the newcomer
    /// lines up with peers that have been decaying since the first pass.
    pub fn late_spawn_adjustment(&self, score: f64, current_pass: u32) -> f64 {
        let elapsed = current_pass.saturating_sub(self.initial_pass);
        score - self.pass_decay * f64::from(elapsed)
    }

    /// Returns true if at least one score is still positive after decay.
    pub fn can_advance_pass<I>(&self, scores: I) -> bool
    where
        I: IntoIterator<Item = f64>,
    {
        scores
            .into_iter()
            .any(|score| self.decay_on_pass(score) > 0.0)
    }
}

impl Default for ScoreRules {
    fn default() -> Self {
        Self::from_config(&InitiativeConfig::default())
    }
}
