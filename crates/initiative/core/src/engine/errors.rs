//! Error types for the transition pipeline.

use crate::error::{ErrorSeverity, InitiativeError};
use crate::state::{CombatantId, RoundStamp};

/// Identifies a transition for logging, authority checks, and events.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr, strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum TransitionKind {
    StartCombat,
    SetTurn,
    AdvancePass,
    AdvanceRound,
    RollInitiative,
    AdjustInitiative,
    AddCombatant,
    RemoveCombatant,
    SetDefeated,
}

impl TransitionKind {
    /// Returns true if only the privileged party may commit this transition.
    ///
    /// Stepping the turn pointer and rolling initiative are participant-level
    /// writes every party may perform.
    pub const fn requires_authority(&self) -> bool {
        !matches!(self, Self::SetTurn | Self::RollInitiative)
    }
}

/// Identifies which stage of the transition pipeline produced an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TransitionPhase {
    PreValidate,
    Apply,
    PostValidate,
}

impl TransitionPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransitionPhase::PreValidate => "pre_validate",
            TransitionPhase::Apply => "apply",
            TransitionPhase::PostValidate => "post_validate",
        }
    }
}

/// Reasons a transition refuses to run or detects a broken result.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    #[error("combat has not started")]
    NotStarted,

    #[error("combat already started (round {round})")]
    AlreadyStarted { round: u32 },

    #[error("combatant {id} not found")]
    CombatantNotFound { id: CombatantId },

    #[error("combatant {id} already exists")]
    DuplicateCombatant { id: CombatantId },

    #[error("encounter already holds the maximum of {max} combatants")]
    RosterFull { max: usize },

    #[error("combatant {id} has not rolled initiative")]
    InitiativeNotRolled { id: CombatantId },

    #[error("turn {index} is outside a sequence of {len}")]
    TurnOutOfRange { index: usize, len: usize },

    #[error("stale request at {current}: {reason}")]
    StaleRequest {
        current: RoundStamp,
        reason: &'static str,
    },

    #[error("turn order does not match the combatant roster")]
    OrderInconsistent,

    #[error("round counters violate the round/pass invariant")]
    InvalidCounters,
}

impl TransitionError {
    /// Returns true if the error marks an outdated request rather than a failure.
    pub const fn is_stale(&self) -> bool {
        matches!(self, Self::StaleRequest { .. })
    }
}

impl InitiativeError for TransitionError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::NotStarted | Self::StaleRequest { .. } => ErrorSeverity::Recoverable,
            Self::AlreadyStarted { .. }
            | Self::CombatantNotFound { .. }
            | Self::DuplicateCombatant { .. }
            | Self::RosterFull { .. }
            | Self::InitiativeNotRolled { .. }
            | Self::TurnOutOfRange { .. } => ErrorSeverity::Validation,
            Self::OrderInconsistent | Self::InvalidCounters => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::NotStarted => "TURN_NOT_STARTED",
            Self::AlreadyStarted { .. } => "TURN_ALREADY_STARTED",
            Self::CombatantNotFound { .. } => "COMBATANT_NOT_FOUND",
            Self::DuplicateCombatant { .. } => "COMBATANT_DUPLICATE",
            Self::RosterFull { .. } => "COMBATANT_ROSTER_FULL",
            Self::InitiativeNotRolled { .. } => "INITIATIVE_NOT_ROLLED",
            Self::TurnOutOfRange { .. } => "TURN_OUT_OF_RANGE",
            Self::StaleRequest { .. } => "REQUEST_STALE",
            Self::OrderInconsistent => "ORDER_INCONSISTENT",
            Self::InvalidCounters => "ROUND_INVALID_COUNTERS",
        }
    }
}

/// Error surfaced while executing a transition through the engine.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExecuteError {
    pub kind: TransitionKind,
    pub phase: TransitionPhase,
    pub error: TransitionError,
}

impl ExecuteError {
    pub fn new(kind: TransitionKind, phase: TransitionPhase, error: TransitionError) -> Self {
        Self { kind, phase, error }
    }

    pub fn is_stale(&self) -> bool {
        self.error.is_stale()
    }
}

impl std::fmt::Display for ExecuteError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} failed during {}: {}",
            self.kind,
            self.phase.as_str(),
            self.error
        )
    }
}

impl std::error::Error for ExecuteError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

impl InitiativeError for ExecuteError {
    fn severity(&self) -> ErrorSeverity {
        self.error.severity()
    }

    fn error_code(&self) -> &'static str {
        self.error.error_code()
    }
}
