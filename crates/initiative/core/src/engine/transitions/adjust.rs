use crate::engine::errors::{TransitionError, TransitionKind};
use crate::engine::transition::EncounterTransition;
use crate::env::EncounterEnv;
use crate::state::{CombatantId, EncounterState};

use super::require_combatant;

/// Adds a signed delta to one persisted score.
///
/// The frozen order is left alone; the change shows up at the next re-sort.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AdjustInitiative {
    pub id: CombatantId,
    pub delta: f64,
}

impl AdjustInitiative {
    pub fn new(id: CombatantId, delta: f64) -> Self {
        Self { id, delta }
    }
}

impl EncounterTransition for AdjustInitiative {
    fn kind(&self) -> TransitionKind {
        TransitionKind::AdjustInitiative
    }

    fn pre_validate(
        &self,
        state: &EncounterState,
        _env: &EncounterEnv<'_>,
    ) -> Result<(), TransitionError> {
        require_combatant(state, self.id)?;
        let rolled = state
            .combatants
            .get(self.id)
            .is_some_and(|combatant| combatant.initiative.is_some());
        if !rolled {
            return Err(TransitionError::InitiativeNotRolled { id: self.id });
        }
        Ok(())
    }

    fn apply(
        &self,
        state: &mut EncounterState,
        _env: &EncounterEnv<'_>,
    ) -> Result<(), TransitionError> {
        let combatant = state
            .combatants
            .get_mut(self.id)
            .ok_or(TransitionError::CombatantNotFound { id: self.id })?;
        combatant.initiative = combatant.initiative.map(|score| score + self.delta);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::RoundEngine;
    use crate::engine::transitions::fixtures::*;
    use crate::env::ScriptedDice;
    use crate::state::RoundState;

    #[test]
    fn adjust_changes_score_but_not_order() {
        let attributes = attributes();
        let dice = ScriptedDice::default();
        let config = config();
        let env = EncounterEnv::new(&attributes, &dice, &config);

        let mut state = encounter([npc(1, 12.0), npc(2, 8.0)]);
        state.round = RoundState::new(1, 1, 0);

        RoundEngine::new(&mut state)
            .execute(&env, AdjustInitiative::new(CombatantId(2), 7.5))
            .unwrap();

        assert_eq!(state.combatants.get(CombatantId(2)).unwrap().score(), Some(15.5));
        assert_eq!(state.turn_order, vec![CombatantId(1), CombatantId(2)]);
        assert_eq!(state.round, RoundState::new(1, 1, 0));
    }

    #[test]
    fn adjust_can_push_score_negative() {
        let attributes = attributes();
        let dice = ScriptedDice::default();
        let config = config();
        let env = EncounterEnv::new(&attributes, &dice, &config);

        let mut state = encounter([npc(1, 4.0)]);
        RoundEngine::new(&mut state)
            .execute(&env, AdjustInitiative::new(CombatantId(1), -10.0))
            .unwrap();
        assert_eq!(state.combatants.get(CombatantId(1)).unwrap().score(), Some(-6.0));
    }

    #[test]
    fn adjust_unrolled_score_is_rejected() {
        let attributes = attributes();
        let dice = ScriptedDice::default();
        let config = config();
        let env = EncounterEnv::new(&attributes, &dice, &config);

        let mut state = encounter([npc(1, 4.0)]);
        state.combatants.get_mut(CombatantId(1)).unwrap().initiative = None;

        let err = RoundEngine::new(&mut state)
            .execute(&env, AdjustInitiative::new(CombatantId(1), 2.0))
            .unwrap_err();
        assert_eq!(err.error, TransitionError::InitiativeNotRolled { id: CombatantId(1) });
    }
}
