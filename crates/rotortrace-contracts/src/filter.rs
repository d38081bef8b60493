//! Query filter over the ledger.
//!
//! Every field is optional. Distinct fields combine with AND; set-valued
//! fields (`categories`, `actions`, `levels`) are OR within the set. The
//! query engine in rotortrace-audit owns the matching logic; this type is
//! the contract callers build.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::action::{AuditAction, AuditLevel, Category, EntityType};

/// A set of optional predicates over `AuditLogEntry`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuditLogFilter {
    /// Inclusive lower bound on `timestamp`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<DateTime<Utc>>,

    /// Inclusive upper bound on `timestamp`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,

    /// Set membership on `category`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<Category>>,

    /// Set membership on `action`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actions: Option<Vec<AuditAction>>,

    /// Set membership on `level`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub levels: Option<Vec<AuditLevel>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_type: Option<EntityType>,

    /// When true, only entries with `revertible = true` and no
    /// `reverted_by` link match.
    #[serde(default)]
    pub revertible_only: bool,

    /// Case-insensitive substring match against description, actor name,
    /// and the action identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_text: Option<String>,
}
