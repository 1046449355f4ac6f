//! Common error infrastructure for initiative-core.
//!
//! Domain-specific errors (e.g. [`crate::engine::TransitionError`]) live next to
//! the code that raises them. This module only provides the shared severity
//! classification so the runtime can decide what to log and what to swallow.

/// Severity level of an error, used for categorization and recovery strategies.
///
/// - **Recoverable**: the request is outdated or premature; retrying the
///   top-level action later is the expected handling
/// - **Validation**: invalid input that should be rejected without retry
/// - **Internal**: unexpected state inconsistencies that require investigation
/// - **Fatal**: unrecoverable errors indicating a corrupted encounter document
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Stale relay requests, turns requested before combat started.
    Recoverable,

    /// Missing combatants, duplicate ids, unrolled scores.
    Validation,

    /// Turn order and combatant roster out of sync.
    Internal,

    /// Encounter document cannot be used any more.
    Fatal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    /// Returns true if this error is potentially recoverable.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    /// Returns true if this error indicates an internal bug.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Common trait for all initiative-core errors.
///
/// # Implementation Guidelines
///
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Classify severity based on recoverability, not impact
pub trait InitiativeError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    ///
    /// Default implementation uses the error type name.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}
