//! Unified error types surfaced by the runtime API.
//!
//! Wraps failures from the document store, the round engine, and the relay
//! channel so clients can bubble them up with consistent context.
use thiserror::Error;

use initiative_core::{ErrorSeverity, ExecuteError, InitiativeError, TransitionKind};

pub use crate::repository::RepositoryError;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    Transition(#[from] ExecuteError),

    #[error("{kind} may only be committed by the privileged party")]
    NotPrivileged { kind: TransitionKind },

    #[error("relay channel closed")]
    ChannelClosed,

    #[error("malformed relay message: {0}")]
    MalformedMessage(String),

    #[error("runtime requires {0} to be configured before building")]
    MissingCollaborator(&'static str),

    #[error("relay worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),
}

impl RuntimeError {
    /// Returns true if the error only reports an outdated request.
    pub fn is_stale(&self) -> bool {
        matches!(self, Self::Transition(error) if error.is_stale())
    }
}

impl InitiativeError for RuntimeError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Transition(error) => error.severity(),
            Self::NotPrivileged { .. } | Self::MalformedMessage(_) => ErrorSeverity::Validation,
            Self::MissingCollaborator(_) => ErrorSeverity::Fatal,
            Self::ChannelClosed => ErrorSeverity::Recoverable,
            Self::Repository(RepositoryError::EncounterNotFound(_)) => ErrorSeverity::Validation,
            Self::Repository(_) | Self::WorkerJoin(_) => ErrorSeverity::Fatal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Transition(error) => error.error_code(),
            Self::Repository(RepositoryError::EncounterNotFound(_)) => "ENCOUNTER_NOT_FOUND",
            Self::Repository(_) => "REPOSITORY_FAILURE",
            Self::NotPrivileged { .. } => "NOT_PRIVILEGED",
            Self::ChannelClosed => "RELAY_CHANNEL_CLOSED",
            Self::MalformedMessage(_) => "RELAY_MALFORMED",
            Self::MissingCollaborator(_) => "RUNTIME_MISSING_COLLABORATOR",
            Self::WorkerJoin(_) => "WORKER_JOIN",
        }
    }
}
