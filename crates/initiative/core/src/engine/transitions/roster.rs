use crate::config::InitiativeConfig;
use crate::engine::errors::{TransitionError, TransitionKind};
use crate::engine::transition::EncounterTransition;
use crate::env::EncounterEnv;
use crate::state::{Combatant, CombatantId, EncounterState};

use super::require_combatant;

/// Adds a combatant to the roster, at the end of the frozen order.
#[derive(Clone, Debug, PartialEq)]
pub struct AddCombatant {
    pub combatant: Combatant,
}

impl AddCombatant {
    pub fn new(combatant: Combatant) -> Self {
        Self { combatant }
    }
}

impl EncounterTransition for AddCombatant {
    fn kind(&self) -> TransitionKind {
        TransitionKind::AddCombatant
    }

    fn pre_validate(
        &self,
        state: &EncounterState,
        _env: &EncounterEnv<'_>,
    ) -> Result<(), TransitionError> {
        let id = self.combatant.id;
        if state.combatants.contains(id) {
            return Err(TransitionError::DuplicateCombatant { id });
        }
        if state.combatants.len() >= InitiativeConfig::MAX_COMBATANTS {
            return Err(TransitionError::RosterFull {
                max: InitiativeConfig::MAX_COMBATANTS,
            });
        }
        Ok(())
    }

    fn apply(
        &self,
        state: &mut EncounterState,
        _env: &EncounterEnv<'_>,
    ) -> Result<(), TransitionError> {
        let mut combatant = self.combatant.clone();
        combatant.acted_this_pass = false;
        let id = combatant.id;

        state
            .combatants
            .insert(combatant)
            .map_err(|rejected| TransitionError::DuplicateCombatant { id: rejected.id })?;
        state.turn_order.push(id);
        Ok(())
    }
}

/// Removes a combatant while keeping the pointer on the acting combatant.
///
/// Removing the acting combatant itself hands the turn to its successor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RemoveCombatant {
    pub id: CombatantId,
}

impl RemoveCombatant {
    pub fn new(id: CombatantId) -> Self {
        Self { id }
    }
}

impl EncounterTransition for RemoveCombatant {
    fn kind(&self) -> TransitionKind {
        TransitionKind::RemoveCombatant
    }

    fn pre_validate(
        &self,
        state: &EncounterState,
        _env: &EncounterEnv<'_>,
    ) -> Result<(), TransitionError> {
        require_combatant(state, self.id)
    }

    fn apply(
        &self,
        state: &mut EncounterState,
        _env: &EncounterEnv<'_>,
    ) -> Result<(), TransitionError> {
        state
            .combatants
            .remove(self.id)
            .ok_or(TransitionError::CombatantNotFound { id: self.id })?;

        if let Some(position) = state.position_of(self.id) {
            state.turn_order.remove(position);
            if position < state.round.turn {
                state.round.turn -= 1;
            }
        }

        let last = state.turn_order.len().saturating_sub(1);
        state.round.turn = state.round.turn.min(last);
        Ok(())
    }
}

/// Flags or clears a combatant's defeated state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SetDefeated {
    pub id: CombatantId,
    pub defeated: bool,
}

impl SetDefeated {
    pub fn new(id: CombatantId, defeated: bool) -> Self {
        Self { id, defeated }
    }
}

impl EncounterTransition for SetDefeated {
    fn kind(&self) -> TransitionKind {
        TransitionKind::SetDefeated
    }

    fn pre_validate(
        &self,
        state: &EncounterState,
        _env: &EncounterEnv<'_>,
    ) -> Result<(), TransitionError> {
        require_combatant(state, self.id)
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
        combatant.defeated = self.defeated;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::RoundEngine;
    use crate::engine::transitions::fixtures::*;
    use crate::env::ScriptedDice;
    use crate::state::{ActorId, Controller, RoundState};

    fn running(turn: usize) -> EncounterState {
        let mut state = encounter([npc(1, 20.0), npc(2, 15.0), npc(3, 10.0), npc(4, 5.0)]);
        state.round = RoundState::new(1, 1, turn);
        state
    }

    #[test]
    fn add_appends_to_frozen_order() {
        let attributes = attributes();
        let dice = ScriptedDice::default();
        let config = config();
        let env = EncounterEnv::new(&attributes, &dice, &config);

        let mut state = running(1);
        let newcomer = Combatant::new(CombatantId(9), ActorId(9), Controller::Player);
        RoundEngine::new(&mut state)
            .execute(&env, AddCombatant::new(newcomer))
            .unwrap();

        assert_eq!(state.turn_order.last(), Some(&CombatantId(9)));
        assert_eq!(state.combatants.get(CombatantId(9)).unwrap().initiative, None);
        assert_eq!(state.round.turn, 1);
    }

    #[test]
    fn add_rejects_duplicate_id() {
        let attributes = attributes();
        let dice = ScriptedDice::default();
        let config = config();
        let env = EncounterEnv::new(&attributes, &dice, &config);

        let mut state = running(0);
        let err = RoundEngine::new(&mut state)
            .execute(&env, AddCombatant::new(npc(2, 1.0)))
            .unwrap_err();
        assert_eq!(err.error, TransitionError::DuplicateCombatant { id: CombatantId(2) });
        assert_eq!(state.combatants.len(), 4);
    }

    #[test]
    fn add_rejects_full_roster() {
        let attributes = attributes();
        let dice = ScriptedDice::default();
        let config = config();
        let env = EncounterEnv::new(&attributes, &dice, &config);

        let roster = (0..InitiativeConfig::MAX_COMBATANTS as u32).map(|n| npc(n, 1.0));
        let mut state = encounter(roster);
        let err = RoundEngine::new(&mut state)
            .execute(&env, AddCombatant::new(npc(1_000, 1.0)))
            .unwrap_err();
        assert!(matches!(err.error, TransitionError::RosterFull { .. }));
    }

    #[test]
    fn removing_an_earlier_combatant_keeps_the_acting_one() {
        let attributes = attributes();
        let dice = ScriptedDice::default();
        let config = config();
        let env = EncounterEnv::new(&attributes, &dice, &config);

        let mut state = running(2);
        RoundEngine::new(&mut state)
            .execute(&env, RemoveCombatant::new(CombatantId(1)))
            .unwrap();

        assert_eq!(state.round.turn, 1);
        assert_eq!(state.current_combatant().map(|c| c.id), Some(CombatantId(3)));
    }

    #[test]
    fn removing_a_later_combatant_leaves_pointer_alone() {
        let attributes = attributes();
        let dice = ScriptedDice::default();
        let config = config();
        let env = EncounterEnv::new(&attributes, &dice, &config);

        let mut state = running(1);
        RoundEngine::new(&mut state)
            .execute(&env, RemoveCombatant::new(CombatantId(4)))
            .unwrap();

        assert_eq!(state.round.turn, 1);
        assert_eq!(state.current_combatant().map(|c| c.id), Some(CombatantId(2)));
    }

    #[test]
    fn removing_the_last_acting_combatant_clamps_pointer() {
        let attributes = attributes();
        let dice = ScriptedDice::default();
        let config = config();
        let env = EncounterEnv::new(&attributes, &dice, &config);

        let mut state = running(3);
        let mut engine = RoundEngine::new(&mut state);
        engine.execute(&env, RemoveCombatant::new(CombatantId(4))).unwrap();
        assert_eq!(engine.state().round.turn, 2);

        for id in 1..=3 {
            engine.execute(&env, RemoveCombatant::new(CombatantId(id))).unwrap();
        }
        assert_eq!(state.round.turn, 0);
        assert!(state.turn_order.is_empty());
    }

    #[test]
    fn set_defeated_toggles_flag() {
        let attributes = attributes();
        let dice = ScriptedDice::default();
        let config = config();
        let env = EncounterEnv::new(&attributes, &dice, &config);

        let mut state = running(0);
        let mut engine = RoundEngine::new(&mut state);
        engine.execute(&env, SetDefeated::new(CombatantId(3), true)).unwrap();
        assert!(engine.state().combatants.get(CombatantId(3)).unwrap().defeated);

        let err = engine
            .execute(&env, SetDefeated::new(CombatantId(8), true))
            .unwrap_err();
        assert_eq!(err.error, TransitionError::CombatantNotFound { id: CombatantId(8) });
    }
}
