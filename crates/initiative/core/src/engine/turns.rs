//! Pure "what happens on next turn" computation.
//!
//! Planning never mutates state. The runtime plans first, then either commits
//! the plan itself or relays it to the privileged party, which plans again
//! against its own copy before committing.

use crate::config::InitiativeConfig;
use crate::rules::ScoreRules;
use crate::state::{Combatant, EncounterState};

/// Intended effect of a "next turn" request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TurnPlan {
    /// Combat is not running yet; the request turns into a start.
    StartCombat,
    /// Move the pointer to `index` within the current pass.
    Step { index: usize },
    /// Sequence exhausted and some score survives decay.
    AdvancePass,
    /// Sequence exhausted and nobody has an action left.
    AdvanceRound,
}

fn is_viable(combatant: &Combatant, skip_defeated: bool) -> bool {
    if skip_defeated && combatant.defeated {
        return false;
    }
    combatant.has_action_left()
}

/// Plans the next turn for the given encounter snapshot.
///
/// Searches forward from the turn pointer for a combatant with a positive
/// score, skipping defeated ones when `skip_defeated` is set. When the pass is
/// exhausted, decides between another pass and a new round.
pub fn plan_next_turn(state: &EncounterState, config: &InitiativeConfig) -> TurnPlan {
    if !state.round.is_started() {
        return TurnPlan::StartCombat;
    }

    let next = state
        .turn_sequence()
        .into_iter()
        .enumerate()
        .skip(state.round.turn + 1)
        .find(|(_, combatant)| is_viable(combatant, config.skip_defeated))
        .map(|(index, _)| index);

    if let Some(index) = next {
        return TurnPlan::Step { index };
    }

    let rules = ScoreRules::from_config(config);
    let scores = state
        .combatants
        .iter()
        .filter(|combatant| !(config.skip_defeated && combatant.defeated))
        .filter_map(Combatant::score);

    if rules.can_advance_pass(scores) {
        TurnPlan::AdvancePass
    } else {
        TurnPlan::AdvanceRound
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{ActorId, CombatantId, Controller, RoundState};

    fn encounter(scores: &[(u32, f64, bool)], turn: usize) -> EncounterState {
        let roster = scores.iter().map(|&(id, score, defeated)| {
            Combatant::new(CombatantId(id), ActorId(id), Controller::GameMaster)
                .with_initiative(score)
                .with_defeated(defeated)
        });
        let mut state = EncounterState::with_combatants("enc", roster);
        state.round = RoundState::new(1, 1, turn);
        state
    }

    #[test]
    fn not_started_plans_a_start() {
        let state = EncounterState::new("enc");
        assert_eq!(
            plan_next_turn(&state, &InitiativeConfig::default()),
            TurnPlan::StartCombat
        );
    }

    #[test]
    fn steps_over_defeated_and_spent_combatants() {
        let state = encounter(&[(1, 20.0, false), (2, 15.0, true), (3, 0.0, false), (4, 5.0, false)], 0);
        assert_eq!(
            plan_next_turn(&state, &InitiativeConfig::default()),
            TurnPlan::Step { index: 3 }
        );
    }

    #[test]
    fn non_skip_variant_still_requires_positive_score() {
        let state = encounter(&[(1, 20.0, false), (2, 15.0, true), (3, 0.0, false)], 0);
        let config = InitiativeConfig::default().with_skip_defeated(false);
        assert_eq!(plan_next_turn(&state, &config), TurnPlan::Step { index: 1 });
    }

    #[test]
    fn exhausted_pass_with_surviving_score_plans_pass() {
        let state = encounter(&[(1, 21.0, false), (2, 8.0, false)], 1);
        assert_eq!(
            plan_next_turn(&state, &InitiativeConfig::default()),
            TurnPlan::AdvancePass
        );
    }

    #[test]
    fn exhausted_pass_without_surviving_score_plans_round() {
        let state = encounter(&[(1, 9.0, false), (2, 4.0, false), (3, 30.0, true)], 2);
        assert_eq!(
            plan_next_turn(&state, &InitiativeConfig::default()),
            TurnPlan::AdvanceRound
        );
    }

    #[test]
    fn defeated_scores_count_when_not_skipping() {
        let state = encounter(&[(1, 9.0, false), (2, 30.0, true)], 1);
        let config = InitiativeConfig::default().with_skip_defeated(false);
        assert_eq!(plan_next_turn(&state, &config), TurnPlan::AdvancePass);
    }
}
