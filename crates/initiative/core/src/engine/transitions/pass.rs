use crate::engine::errors::{TransitionError, TransitionKind};
use crate::engine::transition::EncounterTransition;
use crate::engine::turns::{TurnPlan, plan_next_turn};
use crate::env::EncounterEnv;
use crate::state::{EncounterState, RoundStamp};

use super::{clear_acted, refreeze_order, require_started};

/// How an advance request proves it is still current.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AdvanceGuard {
    /// Direct privileged call; only requires running combat.
    #[default]
    Forced,
    /// Advance planned by a "next turn" call, possibly on another party.
    ///
    /// The current snapshot is always re-planned and must still call for
    /// this advance. A stamp, when present, must also match the counters.
    Requested { expected: Option<RoundStamp> },
    /// Advance asked for explicitly, regardless of remaining actions.
    ///
    /// Only the stamp is checked; the request is stale once the counters
    /// moved past it.
    Explicit { expected: Option<RoundStamp> },
}

impl AdvanceGuard {
    pub fn requested(expected: Option<RoundStamp>) -> Self {
        Self::Requested { expected }
    }

    pub fn explicit(expected: Option<RoundStamp>) -> Self {
        Self::Explicit { expected }
    }

    pub(crate) fn check(
        &self,
        state: &EncounterState,
        env: &EncounterEnv<'_>,
        wanted: TurnPlan,
    ) -> Result<(), TransitionError> {
        let (expected, replan) = match self {
            Self::Forced => return Ok(()),
            Self::Requested { expected } => (expected, true),
            Self::Explicit { expected } => (expected, false),
        };

        let current = state.stamp();
        if expected.is_some_and(|expected| expected != current) {
            return Err(TransitionError::StaleRequest {
                current,
                reason: "counters moved past the requested stamp",
            });
        }
        if replan && plan_next_turn(state, env.config()) != wanted {
            return Err(TransitionError::StaleRequest {
                current,
                reason: "current state does not call for this advance",
            });
        }
        Ok(())
    }
}

/// Ends the current pass: decays every score and starts the next pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AdvancePass {
    pub guard: AdvanceGuard,
}

impl AdvancePass {
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
}

impl EncounterTransition for AdvancePass {
    fn kind(&self) -> TransitionKind {
        TransitionKind::AdvancePass
    }

    fn pre_validate(
        &self,
        state: &EncounterState,
        env: &EncounterEnv<'_>,
    ) -> Result<(), TransitionError> {
        require_started(state)?;
        self.guard.check(state, env, TurnPlan::AdvancePass)
    }

    fn apply(
        &self,
        state: &mut EncounterState,
        env: &EncounterEnv<'_>,
    ) -> Result<(), TransitionError> {
        let rules = env.rules();
        for combatant in state.combatants.iter_mut() {
            // Unrolled combatants stay unrolled.
            combatant.initiative = combatant.initiative.map(|score| rules.decay_on_pass(score));
        }
        clear_acted(state);

        state.round.pass += 1;
        state.round.turn = 0;
        refreeze_order(state, env);
        Ok(())
    }
}
