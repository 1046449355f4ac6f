//! Error types raised by repository implementations.

use thiserror::Error;

use initiative_core::EncounterId;

/// Errors surfaced by repository implementations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("encounter repository lock was poisoned")]
    LockPoisoned,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("encounter {0} not found")]
    EncounterNotFound(EncounterId),

    #[error("document for encounter {expected} holds encounter {found}")]
    IdMismatch {
        expected: EncounterId,
        found: EncounterId,
    },
}
