//! Deterministic initiative rules shared by every party of an encounter.
//!
//! `initiative-core` defines the canonical turn/pass/round rules (score decay,
//! turn ordering, the round state machine) and exposes pure APIs that the
//! runtime drives on behalf of privileged and non-privileged callers. All
//! encounter mutation flows through [`engine::RoundEngine`], and supporting
//! crates depend on the types re-exported here.
pub mod config;
pub mod engine;
pub mod env;
pub mod error;
pub mod order;
pub mod rules;
pub mod state;

pub use config::InitiativeConfig;
pub use engine::{
    AddCombatant, AdjustInitiative, AdvanceGuard, AdvancePass, AdvanceRound, ExecuteError,
    RemoveCombatant, RollInitiative, RoundEngine, SetDefeated, SetTurn, StartCombat, Transition,
    TransitionError, TransitionKind, TransitionOutcome, TransitionPhase, TurnPlan, plan_next_turn,
};
pub use env::{
    ActorAttributes, AttributeOracle, DiceOracle, EncounterEnv, PcgDice, ScriptedDice,
    StaticAttributes,
};
pub use error::{ErrorSeverity, InitiativeError};
pub use order::{TieBreakKeys, compare_combatants, insert_in_order, sort_turn_order};
pub use rules::ScoreRules;
pub use state::{
    ActorId, Combatant, CombatantId, CombatantSet, Controller, EncounterId, EncounterState,
    RoundStamp, RoundState,
};
