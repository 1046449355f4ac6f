//! Round engine that commits encounter transitions.
//!
//! Every transition runs against a working copy of the snapshot. The copy
//! replaces the caller's state only after all three phases succeed, so a
//! rejected transition never leaves a partial write behind.
mod errors;
mod transition;
mod transitions;
mod turns;

pub use errors::{ExecuteError, TransitionError, TransitionKind, TransitionPhase};
pub use transition::{EncounterTransition, Transition};
pub use transitions::{
    AddCombatant, AdjustInitiative, AdvanceGuard, AdvancePass, AdvanceRound, RemoveCombatant,
    RollInitiative, SetDefeated, SetTurn, StartCombat,
};
pub use turns::{TurnPlan, plan_next_turn};

use crate::config::InitiativeConfig;
use crate::env::EncounterEnv;
use crate::state::{EncounterState, RoundState};

/// Counters before and after a committed transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TransitionOutcome {
    pub kind: TransitionKind,
    pub before: RoundState,
    pub after: RoundState,
}

/// Drives transitions against a mutable encounter snapshot.
pub struct RoundEngine<'a> {
    state: &'a mut EncounterState,
}

impl<'a> RoundEngine<'a> {
    pub fn new(state: &'a mut EncounterState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &EncounterState {
        self.state
    }

    /// Plans the next turn without mutating anything.
    pub fn plan_next_turn(&self, config: &InitiativeConfig) -> TurnPlan {
        plan_next_turn(self.state, config)
    }

    /// Executes a transition, committing only if every phase succeeds.
    pub fn execute(
        &mut self,
        env: &EncounterEnv<'_>,
        transition: impl Into<Transition>,
    ) -> Result<TransitionOutcome, ExecuteError> {
        let transition = transition.into();
        let before = self.state.round;

        let mut working = self.state.clone();
        transition::execute_transition(&transition, &mut working, env)?;
        *self.state = working;

        Ok(TransitionOutcome {
            kind: transition.kind(),
            before,
            after: self.state.round,
        })
    }
}
