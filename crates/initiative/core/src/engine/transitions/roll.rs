use crate::engine::errors::{TransitionError, TransitionKind};
use crate::engine::transition::EncounterTransition;
use crate::env::EncounterEnv;
use crate::order::insert_in_order;
use crate::state::{CombatantId, EncounterState};

use super::{clear_acted, refreeze_order, require_combatant};

/// Rolls fresh initiative for the given combatants.
///
/// During the first pass (or before combat starts) the whole order is
/// re-sorted and the pointer returns to the top. In a later pass the new
/// scores are reduced by the decay already elapsed and merged into the part
/// of the order that has not acted yet; the pointer keeps following the
/// combatant whose turn it is.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RollInitiative {
    pub ids: Vec<CombatantId>,
}

impl RollInitiative {
    pub fn new(ids: impl IntoIterator<Item = CombatantId>) -> Self {
        Self {
            ids: ids.into_iter().collect(),
        }
    }

    pub fn single(id: CombatantId) -> Self {
        Self { ids: vec![id] }
    }

    fn is_late(state: &EncounterState, env: &EncounterEnv<'_>) -> bool {
        state.round.is_started() && state.round.pass > env.config().initial_pass
    }

    fn merge_late(&self, state: &mut EncounterState, env: &EncounterEnv<'_>) {
        let split = (state.round.turn + 1).min(state.turn_order.len());
        let mut tail = state.turn_order.split_off(split);

        let movers: Vec<CombatantId> = tail
            .iter()
            .copied()
            .filter(|id| self.ids.contains(id))
            .collect();
        tail.retain(|id| !movers.contains(id));

        for id in movers {
            insert_in_order(&mut tail, id, &state.combatants, env);
        }
        state.turn_order.extend(tail);
    }
}

impl EncounterTransition for RollInitiative {
    fn kind(&self) -> TransitionKind {
        TransitionKind::RollInitiative
    }

    fn pre_validate(
        &self,
        state: &EncounterState,
        _env: &EncounterEnv<'_>,
    ) -> Result<(), TransitionError> {
        self.ids
            .iter()
            .try_for_each(|&id| require_combatant(state, id))
    }

    fn apply(
        &self,
        state: &mut EncounterState,
        env: &EncounterEnv<'_>,
    ) -> Result<(), TransitionError> {
        let late = Self::is_late(state, env);
        let rules = env.rules();
        let pass = state.round.pass;

        for &id in &self.ids {
            let combatant = state
                .combatants
                .get_mut(id)
                .ok_or(TransitionError::CombatantNotFound { id })?;
            let rolled = env.roll_initiative(combatant);
            combatant.initiative = Some(if late {
                rules.late_spawn_adjustment(rolled, pass)
            } else {
                rolled
            });
        }

        if late {
            self.merge_late(state, env);
        } else {
            refreeze_order(state, env);
            state.round.turn = 0;
            if state.round.is_started() {
                clear_acted(state);
            }
        }
        Ok(())
    }
}
