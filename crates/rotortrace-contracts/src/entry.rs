//! The audit log entry and its building blocks.
//!
//! `AuditLogEntry` is immutable once appended, with one sanctioned
//! exception: `reverted_by` transitions from `None` to `Some(id)` exactly
//! once when a compensating entry is recorded. Everything else is captured
//! by value at append time so later changes elsewhere (for example a user
//! rename) never rewrite history.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::action::{AuditAction, AuditLevel, Category, EntityType};

/// Opaque unique identifier for a ledger entry.
///
/// The generated form is `<epoch-millis>-<uuid-v4>`, so the id embeds its
/// creation time for human inspection, but ordering is always done on the
/// entry's `timestamp` field, never on the id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntryId(pub String);

impl EntryId {
    /// Generate a fresh id stamped with the given creation time.
    pub fn generate(at: DateTime<Utc>) -> Self {
        EntryId(format!("{}-{}", at.timestamp_millis(), Uuid::new_v4()))
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The identity of the actor at the time of the action, captured by value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub user_id: String,
    pub user_name: String,
    pub user_role: String,
}

/// Disambiguates how a change's values should be displayed and inverted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    String,
    Number,
    Boolean,
    /// Structured value; `old_value`/`new_value` hold arbitrary JSON.
    Json,
}

/// One field-level delta recorded with an entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldChange {
    pub field: String,
    pub old_value: Value,
    pub new_value: Value,
    #[serde(rename = "type")]
    pub kind: ValueKind,
}

/// What a caller supplies to record an action.
///
/// The audit service fills in everything else: id, timestamp, category,
/// actor, and (when configured) the calling client's user agent.
#[derive(Debug, Clone)]
pub struct AppendRequest {
    pub action: AuditAction,
    pub entity_id: Option<String>,
    pub entity_type: Option<EntityType>,
    /// Required, non-empty.
    pub description: String,
    pub changes: Option<Vec<FieldChange>>,
    pub metadata: Option<BTreeMap<String, Value>>,
    pub level: AuditLevel,
    pub revertible: bool,
}

impl AppendRequest {
    /// A minimal request: level `info`, not revertible, no entity, no deltas.
    pub fn new(action: AuditAction, description: impl Into<String>) -> Self {
        Self {
            action,
            entity_id: None,
            entity_type: None,
            description: description.into(),
            changes: None,
            metadata: None,
            level: AuditLevel::Info,
            revertible: false,
        }
    }

    pub fn entity(mut self, entity_id: impl Into<String>, entity_type: EntityType) -> Self {
        self.entity_id = Some(entity_id.into());
        self.entity_type = Some(entity_type);
        self
    }

    pub fn changes(mut self, changes: Vec<FieldChange>) -> Self {
        self.changes = Some(changes);
        self
    }

    pub fn metadata(mut self, metadata: BTreeMap<String, Value>) -> Self {
        self.metadata = Some(metadata);
        self
    }

    pub fn level(mut self, level: AuditLevel) -> Self {
        self.level = level;
        self
    }

    pub fn revertible(mut self, revertible: bool) -> Self {
        self.revertible = revertible;
        self
    }
}

/// One immutable record of a single past action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditLogEntry {
    /// Unique id generated at append time.
    pub id: EntryId,

    /// Primary sort key; display order is newest first.
    pub timestamp: DateTime<Utc>,

    /// The namespaced action identifier.
    pub action: AuditAction,

    /// Derived from `action` by the catalog at append time.
    pub category: Category,

    /// Severity of the action.
    pub level: AuditLevel,

    /// Who performed the action, captured by value.
    pub actor: Actor,

    /// The business object this action concerns, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_type: Option<EntityType>,

    /// Human-readable summary. Required and non-empty.
    pub description: String,

    /// Ordered field-level deltas, if the caller supplied them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub changes: Option<Vec<FieldChange>>,

    /// Opaque action-specific context.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<BTreeMap<String, Value>>,

    /// Calling client description, captured only when
    /// `include_system_info` is enabled in the config.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,

    /// Whether the action can be compensated. A property of the action,
    /// set by the caller at append time, never changed afterwards.
    pub revertible: bool,

    /// Id of the compensating entry, set at most once after a successful
    /// revert. A set value permanently closes the entry against further
    /// reverts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reverted_by: Option<EntryId>,
}
