use crate::engine::errors::{TransitionError, TransitionKind};
use crate::engine::transition::EncounterTransition;
use crate::env::EncounterEnv;
use crate::state::{EncounterState, RoundState};

use super::refreeze_order;

/// Leaves the not-started state: rolls everyone and freezes the first order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StartCombat;

impl EncounterTransition for StartCombat {
    fn kind(&self) -> TransitionKind {
        TransitionKind::StartCombat
    }

    fn pre_validate(
        &self,
        state: &EncounterState,
        _env: &EncounterEnv<'_>,
    ) -> Result<(), TransitionError> {
        if state.round != RoundState::NOT_STARTED {
            return Err(TransitionError::AlreadyStarted {
                round: state.round.round,
            });
        }
        Ok(())
    }

    fn apply(
        &self,
        state: &mut EncounterState,
        env: &EncounterEnv<'_>,
    ) -> Result<(), TransitionError> {
        for combatant in state.combatants.iter_mut() {
            combatant.initiative = Some(env.roll_initiative(combatant));
            combatant.acted_this_pass = false;
        }

        let config = env.config();
        state.round = RoundState::new(config.initial_round, config.initial_pass, 0);
        refreeze_order(state, env);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::RoundEngine;
    use crate::engine::transitions::fixtures::*;
    use crate::env::ScriptedDice;
    use crate::state::{Combatant, CombatantId};

    #[test]
    fn start_rolls_everyone_and_sets_initial_counters() {
        let attributes = attributes();
        let dice = dice([6, 1, 4]);
        let config = config().with_initial_counters(2, 1);
        let env = EncounterEnv::new(&attributes, &dice, &config);

        let mut state = encounter([npc(1, 0.0), player(2, 0.0), npc(3, 0.0)]);
        state.combatants.get_mut(CombatantId(2)).unwrap().initiative = None;

        RoundEngine::new(&mut state).execute(&env, StartCombat).unwrap();

        assert_eq!(state.round, RoundState::new(2, 1, 0));
        let scores: Vec<Option<f64>> = state.combatants.iter().map(Combatant::score).collect();
        assert_eq!(scores, vec![Some(11.0), Some(6.0), Some(9.0)]);
        assert_eq!(
            state.turn_order,
            vec![CombatantId(1), CombatantId(3), CombatantId(2)]
        );
        assert_eq!(state.current_combatant().map(|c| c.id), Some(CombatantId(1)));
    }

    #[test]
    fn start_is_rejected_once_running() {
        let attributes = attributes();
        let dice = ScriptedDice::default();
        let config = config();
        let env = EncounterEnv::new(&attributes, &dice, &config);

        let mut state = encounter([npc(1, 12.0)]);
        state.round = RoundState::new(3, 2, 0);

        let err = RoundEngine::new(&mut state)
            .execute(&env, StartCombat)
            .unwrap_err();
        assert_eq!(err.error, TransitionError::AlreadyStarted { round: 3 });
        assert_eq!(state.round, RoundState::new(3, 2, 0));
    }

    #[test]
    fn start_with_empty_roster_still_enters_round_one() {
        let attributes = attributes();
        let dice = ScriptedDice::default();
        let config = config();
        let env = EncounterEnv::new(&attributes, &dice, &config);

        let mut state = EncounterState::new("enc-1");
        RoundEngine::new(&mut state).execute(&env, StartCombat).unwrap();

        assert_eq!(state.round, RoundState::new(1, 1, 0));
        assert!(state.turn_order.is_empty());
        assert!(state.current_combatant().is_none());
    }
}
