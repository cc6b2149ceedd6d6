//! Common error infrastructure for battle-core.
//!
//! Domain-specific errors (e.g., `ActionRejected`, `BoardError`) are defined in
//! their respective modules alongside the operations they validate. This module
//! only provides the shared classification used by hosts for logging and
//! recovery.
//!
//! Invariant violations (negative health, unknown tag bits) are programming
//! errors and panic instead of surfacing through these types.

/// Severity level of an error, used for categorization and recovery strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Recoverable error - can retry with same or alternative action.
    ///
    /// Examples: not enough energy yet, destination tile occupied
    Recoverable,

    /// Validation error - invalid input, should not retry without changes.
    ///
    /// Examples: target not found, action declared outside the player turn
    Validation,

    /// Internal error - unexpected state inconsistency.
    ///
    /// Examples: occupancy map desync
    Internal,

    /// Fatal error - battle cannot continue.
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

/// Common trait for all battle-core errors.
///
/// # Implementation Guidelines
///
/// - All error enums should implement this trait
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Classify severity based on recoverability, not impact
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    ///
    /// Default implementation uses the error type name.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}
