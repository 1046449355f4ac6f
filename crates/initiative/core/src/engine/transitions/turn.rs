use crate::engine::errors::{TransitionError, TransitionKind};
use crate::engine::transition::EncounterTransition;
use crate::engine::turns::{TurnPlan, plan_next_turn};
use crate::env::EncounterEnv;
use crate::state::{EncounterState, RoundState};

use super::require_started;

/// Moves the turn pointer within the current pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SetTurn {
    pub index: usize,
    /// Counters the step was planned from. When set, the step only applies
    /// while the counters are unchanged and the plan still calls for it.
    pub planned_from: Option<RoundState>,
}

impl SetTurn {
    pub fn new(index: usize) -> Self {
        Self {
            index,
            planned_from: None,
        }
    }

    /// Step computed by a "next turn" call against `observed`.
    pub fn planned(index: usize, observed: RoundState) -> Self {
        Self {
            index,
            planned_from: Some(observed),
        }
    }
}

impl EncounterTransition for SetTurn {
    fn kind(&self) -> TransitionKind {
        TransitionKind::SetTurn
    }

    fn pre_validate(
        &self,
        state: &EncounterState,
        env: &EncounterEnv<'_>,
    ) -> Result<(), TransitionError> {
        require_started(state)?;
        let len = state.turn_order.len();
        if self.index >= len {
            return Err(TransitionError::TurnOutOfRange {
                index: self.index,
                len,
            });
        }

        let Some(observed) = self.planned_from else {
            return Ok(());
        };
        let current = state.stamp();
        if observed != state.round {
            return Err(TransitionError::StaleRequest {
                current,
                reason: "turn pointer moved since the step was planned",
            });
        }
        if plan_next_turn(state, env.config()) != (TurnPlan::Step { index: self.index }) {
            return Err(TransitionError::StaleRequest {
                current,
                reason: "current state does not call for this step",
            });
        }
        Ok(())
    }

    fn apply(
        &self,
        state: &mut EncounterState,
        _env: &EncounterEnv<'_>,
    ) -> Result<(), TransitionError> {
        // The outgoing combatant has taken its turn.
        let current = state.turn_order.get(state.round.turn).copied();
        if let Some(combatant) = current.and_then(|id| state.combatants.get_mut(id)) {
            combatant.acted_this_pass = true;
        }
        state.round.turn = self.index;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::RoundEngine;
    use crate::engine::transitions::fixtures::*;
    use crate::env::ScriptedDice;
    use crate::state::{CombatantId, RoundState};

    #[test]
    fn step_marks_outgoing_combatant_as_acted() {
        let attributes = attributes();
        let dice = ScriptedDice::default();
        let config = config();
        let env = EncounterEnv::new(&attributes, &dice, &config);

        let mut state = encounter([npc(1, 14.0), npc(2, 9.0), npc(3, 4.0)]);
        state.round = RoundState::new(1, 1, 0);

        RoundEngine::new(&mut state).execute(&env, SetTurn::new(2)).unwrap();

        assert_eq!(state.round.turn, 2);
        assert!(state.combatants.get(CombatantId(1)).unwrap().acted_this_pass);
        assert!(!state.combatants.get(CombatantId(2)).unwrap().acted_this_pass);
        assert_eq!(state.current_combatant().map(|c| c.id), Some(CombatantId(3)));
    }

    #[test]
    fn step_outside_sequence_is_rejected() {
        let attributes = attributes();
        let dice = ScriptedDice::default();
        let config = config();
        let env = EncounterEnv::new(&attributes, &dice, &config);

        let mut state = encounter([npc(1, 14.0)]);
        state.round = RoundState::new(1, 1, 0);

        let err = RoundEngine::new(&mut state)
            .execute(&env, SetTurn::new(1))
            .unwrap_err();
        assert_eq!(err.error, TransitionError::TurnOutOfRange { index: 1, len: 1 });
    }

    #[test]
    fn planned_step_is_stale_once_the_pointer_moved() {
        let attributes = attributes();
        let dice = ScriptedDice::default();
        let config = config();
        let env = EncounterEnv::new(&attributes, &dice, &config);

        let mut state = encounter([npc(1, 14.0), npc(2, 9.0), npc(3, 4.0)]);
        state.round = RoundState::new(1, 1, 0);
        let observed = state.round;

        let mut engine = RoundEngine::new(&mut state);
        engine.execute(&env, SetTurn::planned(1, observed)).unwrap();

        // A second caller planned the same step from the same snapshot.
        let err = engine
            .execute(&env, SetTurn::planned(1, observed))
            .unwrap_err();
        assert!(err.is_stale());
        assert_eq!(engine.state().round, RoundState::new(1, 1, 1));
    }

    #[test]
    fn planned_step_must_match_the_current_plan() {
        let attributes = attributes();
        let dice = ScriptedDice::default();
        let config = config();
        let env = EncounterEnv::new(&attributes, &dice, &config);

        let mut state = encounter([npc(1, 14.0), npc(2, 9.0), npc(3, 4.0)]);
        state.round = RoundState::new(1, 1, 0);
        state.combatants.get_mut(CombatantId(2)).unwrap().defeated = true;

        let err = RoundEngine::new(&mut state)
            .execute(&env, SetTurn::planned(1, RoundState::new(1, 1, 0)))
            .unwrap_err();
        assert!(err.is_stale());
        assert_eq!(state.round.turn, 0);
    }

    #[test]
    fn step_requires_running_combat() {
        let attributes = attributes();
        let dice = ScriptedDice::default();
        let config = config();
        let env = EncounterEnv::new(&attributes, &dice, &config);

        let mut state = encounter([npc(1, 14.0), npc(2, 9.0)]);
        let err = RoundEngine::new(&mut state)
            .execute(&env, SetTurn::new(1))
            .unwrap_err();
        assert_eq!(err.error, TransitionError::NotStarted);
    }
}
