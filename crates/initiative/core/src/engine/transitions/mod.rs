//! Concrete encounter transitions.
//!
//! Each transition validates against the current snapshot, mutates it, and
//! leaves the round counters and frozen order consistent.
mod adjust;
mod pass;
mod roll;
mod roster;
mod round;
mod start;
mod turn;

pub use adjust::AdjustInitiative;
pub use pass::{AdvanceGuard, AdvancePass};
pub use roll::RollInitiative;
pub use roster::{AddCombatant, RemoveCombatant, SetDefeated};
pub use round::AdvanceRound;
pub use start::StartCombat;
pub use turn::SetTurn;

use crate::env::EncounterEnv;
use crate::order::sort_turn_order;
use crate::state::{CombatantId, EncounterState};

use super::errors::TransitionError;

pub(crate) fn require_started(state: &EncounterState) -> Result<(), TransitionError> {
    if state.round.is_started() {
        Ok(())
    } else {
        Err(TransitionError::NotStarted)
    }
}

pub(crate) fn require_combatant(
    state: &EncounterState,
    id: CombatantId,
) -> Result<(), TransitionError> {
    if state.combatants.contains(id) {
        Ok(())
    } else {
        Err(TransitionError::CombatantNotFound { id })
    }
}

/// Recomputes and freezes the order for a new pass.
pub(crate) fn refreeze_order(state: &mut EncounterState, env: &EncounterEnv<'_>) {
    state.turn_order = sort_turn_order(&state.combatants, env);
}

pub(crate) fn clear_acted(state: &mut EncounterState) {
    for combatant in state.combatants.iter_mut() {
        combatant.acted_this_pass = false;
    }
}
