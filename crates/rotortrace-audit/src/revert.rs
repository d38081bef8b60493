//! The revert coordinator's pure parts: eligibility and change inversion.
//!
//! A revert is a *compensating record*, not a replay: the coordinator never
//! re-executes business logic, it only records the inverted deltas and links
//! the two entries. The stateful two-step sequence (append compensating
//! entry, then back-link the original) lives in the service.

use rotortrace_contracts::entry::{AuditLogEntry, EntryId, FieldChange};
use rotortrace_contracts::revert::{RevertError, RevertOutcome};

/// Check whether the looked-up entry may be compensated.
///
/// Returns the eligible entry, or the refusal outcome the caller should
/// surface as-is.
pub fn check_eligibility<'a>(
    entry: Option<&'a AuditLogEntry>,
    log_id: &EntryId,
) -> Result<&'a AuditLogEntry, RevertOutcome> {
    let entry = match entry {
        Some(entry) => entry,
        None => {
            return Err(RevertOutcome::refused(
                RevertError::LogNotFound,
                format!("no audit entry with id '{}'", log_id),
            ));
        }
    };

    if !entry.revertible {
        return Err(RevertOutcome::refused(
            RevertError::NotRevertible,
            format!("entry '{}' was recorded as not revertible", entry.id),
        ));
    }

    if let Some(reverted_by) = &entry.reverted_by {
        return Err(RevertOutcome::refused(
            RevertError::AlreadyReverted,
            format!(
                "entry '{}' was already reverted by entry '{}'",
                entry.id, reverted_by
            ),
        ));
    }

    Ok(entry)
}

/// Structurally invert a change list: swap old and new per field, keep the
/// field order and value kinds.
pub fn invert_changes(changes: &[FieldChange]) -> Vec<FieldChange> {
    changes
        .iter()
        .map(|change| FieldChange {
            field: change.field.clone(),
            old_value: change.new_value.clone(),
            new_value: change.old_value.clone(),
            kind: change.kind,
        })
        .collect()
}

/// The compensating entry's description: original summary plus the
/// caller-supplied reason.
pub fn compensating_description(original: &AuditLogEntry, reason: &str) -> String {
    format!("Revert of '{}'. Reason: {}", original.description, reason)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use rotortrace_contracts::entry::ValueKind;

    use super::*;

    #[test]
    fn inversion_swaps_values_and_keeps_order() {
        let changes = vec![
            FieldChange {
                field: "state".to_string(),
                old_value: json!("received"),
                new_value: json!("diagnosed"),
                kind: ValueKind::String,
            },
            FieldChange {
                field: "hours".to_string(),
                old_value: json!(2),
                new_value: json!(5),
                kind: ValueKind::Number,
            },
        ];

        let inverted = invert_changes(&changes);

        assert_eq!(inverted.len(), 2);
        assert_eq!(inverted[0].field, "state");
        assert_eq!(inverted[0].old_value, json!("diagnosed"));
        assert_eq!(inverted[0].new_value, json!("received"));
        assert_eq!(inverted[1].old_value, json!(5));
        assert_eq!(inverted[1].new_value, json!(2));
    }

    #[test]
    fn missing_entry_refuses_with_log_not_found() {
        let id = EntryId("missing".to_string());
        let outcome = check_eligibility(None, &id).unwrap_err();
        assert_eq!(outcome.error, Some(RevertError::LogNotFound));
        assert!(outcome.message.contains("missing"));
    }
}
