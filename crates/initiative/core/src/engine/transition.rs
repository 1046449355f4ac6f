//! Transition contract and dispatch.

use crate::env::EncounterEnv;
use crate::state::EncounterState;

use super::errors::{ExecuteError, TransitionError, TransitionKind, TransitionPhase};
use super::transitions::{
    AddCombatant, AdjustInitiative, AdvancePass, AdvanceRound, RemoveCombatant, RollInitiative,
    SetDefeated, SetTurn, StartCombat,
};

/// Defines how a concrete transition mutates the encounter.
///
/// Implementors can override the validation hooks to surface pre- and
/// post-conditions that must hold around the mutation. Hooks receive the
/// collaborators through [`EncounterEnv`] and must stay side-effect free.
pub trait EncounterTransition {
    fn kind(&self) -> TransitionKind;

    /// Validates pre-conditions using the state **before** mutation.
    fn pre_validate(
        &self,
        _state: &EncounterState,
        _env: &EncounterEnv<'_>,
    ) -> Result<(), TransitionError> {
        Ok(())
    }

    /// Applies the transition. Implementations may assume `pre_validate`
    /// already succeeded.
    fn apply(
        &self,
        state: &mut EncounterState,
        env: &EncounterEnv<'_>,
    ) -> Result<(), TransitionError>;

    /// Validates post-conditions using the state **after** mutation.
    fn post_validate(
        &self,
        state: &EncounterState,
        _env: &EncounterEnv<'_>,
    ) -> Result<(), TransitionError> {
        check_invariants(state)
    }
}

/// Round counters and turn order invariants every committed state satisfies.
pub(crate) fn check_invariants(state: &EncounterState) -> Result<(), TransitionError> {
    if !state.round.is_consistent() {
        return Err(TransitionError::InvalidCounters);
    }
    if !state.order_is_consistent() {
        return Err(TransitionError::OrderInconsistent);
    }
    let len = state.turn_order.len();
    if len > 0 && state.round.turn >= len {
        return Err(TransitionError::TurnOutOfRange {
            index: state.round.turn,
            len,
        });
    }
    Ok(())
}

/// Every transition the engine knows how to commit.
#[derive(Clone, Debug, PartialEq)]
pub enum Transition {
    StartCombat(StartCombat),
    SetTurn(SetTurn),
    AdvancePass(AdvancePass),
    AdvanceRound(AdvanceRound),
    RollInitiative(RollInitiative),
    AdjustInitiative(AdjustInitiative),
    AddCombatant(AddCombatant),
    RemoveCombatant(RemoveCombatant),
    SetDefeated(SetDefeated),
}

impl Transition {
    pub fn kind(&self) -> TransitionKind {
        self.as_transition().kind()
    }

    fn as_transition(&self) -> &dyn EncounterTransition {
        match self {
            Self::StartCombat(t) => t,
            Self::SetTurn(t) => t,
            Self::AdvancePass(t) => t,
            Self::AdvanceRound(t) => t,
            Self::RollInitiative(t) => t,
            Self::AdjustInitiative(t) => t,
            Self::AddCombatant(t) => t,
            Self::RemoveCombatant(t) => t,
            Self::SetDefeated(t) => t,
        }
    }
}

macro_rules! impl_from_transition {
    ($($variant:ident),* $(,)?) => {
        $(
            impl From<$variant> for Transition {
                fn from(transition: $variant) -> Self {
                    Self::$variant(transition)
                }
            }
        )*
    };
}

impl_from_transition!(
    StartCombat,
    SetTurn,
    AdvancePass,
    AdvanceRound,
    RollInitiative,
    AdjustInitiative,
    AddCombatant,
    RemoveCombatant,
    SetDefeated,
);

/// Runs a transition through the three-phase pipeline.
///
/// Phases:
/// 1. `pre_validate` - Check preconditions before mutation
/// 2. `apply` - Mutate the encounter
/// 3. `post_validate` - Verify postconditions after mutation
pub(super) fn execute_transition(
    transition: &Transition,
    state: &mut EncounterState,
    env: &EncounterEnv<'_>,
) -> Result<(), ExecuteError> {
    let transition = transition.as_transition();
    let kind = transition.kind();

    transition
        .pre_validate(state, env)
        .map_err(|error| ExecuteError::new(kind, TransitionPhase::PreValidate, error))?;

    transition
        .apply(state, env)
        .map_err(|error| ExecuteError::new(kind, TransitionPhase::Apply, error))?;

    transition
        .post_validate(state, env)
        .map_err(|error| ExecuteError::new(kind, TransitionPhase::PostValidate, error))?;

    Ok(())
}
