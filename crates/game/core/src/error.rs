//! Common error infrastructure for tactics-core.
//!
//! Domain-specific errors (`GridError`, `MoveError`, `ActionError`, ...) live
//! next to the operations they validate. They all implement [`GameError`] so
//! callers can classify failures uniformly.
//!
//! # Severity policy
//!
//! - Configuration problems are **Fatal**: the engine refuses to start.
//! - Bad player input is **Validation**: rejected, state unchanged, no action consumed.
//! - Unmet preconditions (no energy, dead target, engine busy) are **Recoverable**.
//! - Occupancy or roster desyncs are **Internal** and indicate bugs.

/// Severity level of an error, used for categorization and recovery strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Can succeed later without changing the request (e.g. wait for a movement to finish).
    Recoverable,

    /// Invalid input; the caller must re-issue a corrected intent.
    Validation,

    /// Unexpected state inconsistency.
    Internal,

    /// Cannot continue; no battle may start.
    Fatal,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::Fatal)
    }
}

/// Common trait for all tactics-core errors.
pub trait GameError: std::fmt::Display + std::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a stable identifier for this error variant, used in logs and tests.
    fn error_code(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}
