//! Revert outcome shapes.
//!
//! Eligibility failures are ordinary values, not `Err`: the UI presents a
//! specific message per failure kind, so the coordinator returns a
//! structured `RevertOutcome` and reserves `AuditError` for storage,
//! identity, and policy failures.

use serde::{Deserialize, Serialize};

use crate::entry::AuditLogEntry;

/// Why a revert was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RevertError {
    /// No ledger entry has the requested id.
    LogNotFound,
    /// The entry was appended with `revertible = false`.
    NotRevertible,
    /// The entry already carries a `reverted_by` link.
    AlreadyReverted,
}

/// The result of a revert attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevertOutcome {
    pub success: bool,

    /// Human-readable summary suitable for direct display.
    pub message: String,

    /// The compensating entry, present only on success.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revert_log: Option<AuditLogEntry>,

    /// The refusal reason, present only on failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<RevertError>,
}

impl RevertOutcome {
    /// A successful outcome carrying the compensating entry.
    pub fn succeeded(message: impl Into<String>, revert_log: AuditLogEntry) -> Self {
        Self {
            success: true,
            message: message.into(),
            revert_log: Some(revert_log),
            error: None,
        }
    }

    /// A refusal with its reason.
    pub fn refused(error: RevertError, message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            revert_log: None,
            error: Some(error),
        }
    }
}
