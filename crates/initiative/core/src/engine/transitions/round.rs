use crate::engine::errors::{TransitionError, TransitionKind};
use crate::engine::transition::EncounterTransition;
use crate::engine::turns::TurnPlan;
use crate::env::EncounterEnv;
use crate::state::{EncounterState, RoundStamp};

use super::{AdvanceGuard, clear_acted, refreeze_order, require_started};

/// Starts the next round: resets the pass and re-rolls initiative.
///
/// With `npc_only_auto_roll`, player-controlled combatants are reset to
/// "not rolled" instead and are expected to roll for themselves.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AdvanceRound {
    pub guard: AdvanceGuard,
}

impl AdvanceRound {
    pub fn forced() -> Self {
        Self {
            guard: AdvanceGuard::Forced,
        }
    }

    pub fn requested(expected: Option<RoundStamp>) -> Self {
        Self {
            guard: AdvanceGuard::requested(expected),
        }
    }

    pub fn explicit(expected: Option<RoundStamp>) -> Self {
        Self {
            guard: AdvanceGuard::explicit(expected),
        }
    }
}

impl EncounterTransition for AdvanceRound {
    fn kind(&self) -> TransitionKind {
        TransitionKind::AdvanceRound
    }

    fn pre_validate(
        &self,
        state: &EncounterState,
        env: &EncounterEnv<'_>,
    ) -> Result<(), TransitionError> {
        require_started(state)?;
        self.guard.check(state, env, TurnPlan::AdvanceRound)
    }

    fn apply(
        &self,
        state: &mut EncounterState,
        env: &EncounterEnv<'_>,
    ) -> Result<(), TransitionError> {
        let npc_only = env.config().npc_only_auto_roll;
        for combatant in state.combatants.iter_mut() {
            combatant.initiative = if npc_only && combatant.is_player() {
                None
            } else {
                Some(env.roll_initiative(combatant))
            };
        }
        clear_acted(state);

        state.round.round += 1;
        state.round.pass = env.config().initial_pass;
        state.round.turn = 0;
        refreeze_order(state, env);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::RoundEngine;
    use crate::engine::transitions::fixtures::*;
    use crate::state::{CombatantId, RoundState};

    fn spent_round() -> EncounterState {
        let mut state = encounter([npc(1, -3.0), player(2, 6.0), npc(3, 2.0)]);
        state.round = RoundState::new(2, 3, 2);
        state
    }

    #[test]
    fn round_rerolls_everyone_and_resets_pass() {
        let attributes = attributes();
        let dice = dice([2, 5, 1]);
        let config = config();
        let env = EncounterEnv::new(&attributes, &dice, &config);

        let mut state = spent_round();
        RoundEngine::new(&mut state)
            .execute(&env, AdvanceRound::forced())
            .unwrap();

        assert_eq!(state.round, RoundState::new(3, 1, 0));
        let scores: Vec<Option<f64>> = state.combatants.iter().map(|c| c.initiative).collect();
        assert_eq!(scores, vec![Some(7.0), Some(10.0), Some(6.0)]);
        assert_eq!(
            state.turn_order,
            vec![CombatantId(2), CombatantId(1), CombatantId(3)]
        );
    }

    #[test]
    fn npc_only_policy_leaves_players_unrolled() {
        let attributes = attributes();
        let dice = dice([4, 4]);
        let config = config().with_npc_only_auto_roll(true);
        let env = EncounterEnv::new(&attributes, &dice, &config);

        let mut state = spent_round();
        RoundEngine::new(&mut state)
            .execute(&env, AdvanceRound::forced())
            .unwrap();

        assert_eq!(state.combatants.get(CombatantId(2)).unwrap().initiative, None);
        assert_eq!(state.combatants.get(CombatantId(1)).unwrap().score(), Some(9.0));
        assert_eq!(state.combatants.get(CombatantId(3)).unwrap().score(), Some(9.0));
        assert_eq!(state.turn_order.last(), Some(&CombatantId(2)));
        assert_eq!(dice.remaining(), 0);
    }

    #[test]
    fn stamped_round_request_follows_the_counters() {
        let attributes = attributes();
        let dice = dice([1, 1, 1, 1, 1, 1]);
        let config = config();
        let env = EncounterEnv::new(&attributes, &dice, &config);

        let mut state = spent_round();
        let stamp = RoundStamp { round: 2, pass: 3 };
        let mut engine = RoundEngine::new(&mut state);
        engine.execute(&env, AdvanceRound::requested(Some(stamp))).unwrap();

        let err = engine
            .execute(&env, AdvanceRound::requested(Some(stamp)))
            .unwrap_err();
        assert!(err.is_stale());
        assert_eq!(engine.state().round, RoundState::new(3, 1, 0));
    }

    #[test]
    fn unstamped_round_request_is_stale_while_a_pass_is_due() {
        let attributes = attributes();
        let dice = crate::env::ScriptedDice::default();
        let config = config();
        let env = EncounterEnv::new(&attributes, &dice, &config);

        let mut state = spent_round();
        state.combatants.get_mut(CombatantId(3)).unwrap().initiative = Some(25.0);

        let err = RoundEngine::new(&mut state)
            .execute(&env, AdvanceRound::requested(None))
            .unwrap_err();
        assert!(err.is_stale());
        assert_eq!(state.round, RoundState::new(2, 3, 2));
    }

    #[test]
    fn explicit_round_request_skips_the_plan_but_not_the_stamp() {
        let attributes = attributes();
        let dice = dice([1, 1, 1]);
        let config = config();
        let env = EncounterEnv::new(&attributes, &dice, &config);

        let mut state = spent_round();
        state.combatants.get_mut(CombatantId(3)).unwrap().initiative = Some(25.0);
        let stamp = state.stamp();

        let mut engine = RoundEngine::new(&mut state);
        engine.execute(&env, AdvanceRound::explicit(Some(stamp))).unwrap();
        assert_eq!(engine.state().round, RoundState::new(3, 1, 0));

        let err = engine
            .execute(&env, AdvanceRound::explicit(Some(stamp)))
            .unwrap_err();
        assert!(err.is_stale());
    }
}
