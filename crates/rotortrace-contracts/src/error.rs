//! Error types for the Rotortrace audit core.
//!
//! All fallible operations return `AuditResult<T>`. Policy gates raised by
//! append are expected, recoverable conditions for callers (skip logging
//! and move on); storage write failures are not and must be surfaced.
//! Revert eligibility failures are NOT errors; they are structured
//! `RevertOutcome` values (see `crate::revert`).

use thiserror::Error;

use crate::action::{AuditLevel, Category};

/// The unified error type for the audit core.
#[derive(Debug, Error)]
pub enum AuditError {
    /// Audit capture is switched off in the configuration.
    #[error("audit logging is disabled")]
    Disabled,

    /// The action's category is not in the configured allow-list.
    #[error("category '{category}' is not enabled for audit capture")]
    CategoryDisallowed { category: Category },

    /// The entry's severity is below the configured floor.
    #[error("level '{level}' is below the configured minimum level '{min_level}'")]
    LevelBelowThreshold {
        level: AuditLevel,
        min_level: AuditLevel,
    },

    /// The required human-readable description is missing or blank.
    #[error("description is required and must not be empty")]
    MissingDescription,

    /// The supplied filter is malformed; rejected before any storage access.
    #[error("invalid filter: {reason}")]
    InvalidFilter { reason: String },

    /// The identity collaborator could not supply the current actor.
    ///
    /// Append never records an anonymous or blank actor.
    #[error("identity provider unavailable: {reason}")]
    IdentityUnavailable { reason: String },

    /// The durable store could not be read.
    ///
    /// Ledger reads degrade to an empty collection instead of surfacing
    /// this; it is reported by `DurableStore` implementations and by
    /// operations that cannot degrade (config persistence).
    #[error("durable store read failed: {reason}")]
    StorageRead { reason: String },

    /// The durable store rejected a write. Always propagated: silently
    /// dropping a write is worse than surfacing it.
    #[error("durable store write failed: {reason}")]
    StorageWrite { reason: String },

    /// A configuration value or document is missing or invalid.
    #[error("configuration error: {reason}")]
    Config { reason: String },
}

/// Convenience alias used throughout the Rotortrace crates.
pub type AuditResult<T> = Result<T, AuditError>;
