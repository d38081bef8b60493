//! Aggregation and pagination result shapes.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::action::{AuditAction, AuditLevel, Category};
use crate::entry::AuditLogEntry;

/// One page of query results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogPage {
    /// Entries on this page, newest first.
    pub logs: Vec<AuditLogEntry>,

    /// Filtered count before pagination.
    pub total: usize,

    /// 1-based page number that was served.
    pub page: usize,

    pub page_size: usize,

    /// True when pages beyond this one exist.
    pub has_more: bool,
}

/// Entries grouped by UTC calendar day, groups newest-date first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelineGroup {
    /// The calendar day (serializes as `YYYY-MM-DD`).
    pub date: NaiveDate,

    /// Entries of that day, keeping the global newest-first order.
    pub logs: Vec<AuditLogEntry>,
}

/// Per-actor activity count, identified by `user_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActorActivity {
    pub user_id: String,
    pub user_name: String,
    pub count: u64,
}

/// Per-action frequency count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionActivity {
    pub action: AuditAction,
    pub count: u64,
}

/// Aggregate statistics over a filtered view of the ledger.
///
/// `by_category` and `by_level` are zero-filled: every catalog category and
/// every severity level is present even when its count is 0. When the
/// filtered set is empty, `from` and `to` are both the wall clock time of
/// the aggregation; min/max over an empty set is otherwise undefined and
/// this sentinel keeps the bounds well-formed for dashboards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditStats {
    /// Filtered entry count.
    pub total: u64,

    pub by_category: BTreeMap<Category, u64>,

    pub by_level: BTreeMap<AuditLevel, u64>,

    /// Top 5 actors by entry count; ties keep first-seen order.
    pub top_actors: Vec<ActorActivity>,

    /// Top 10 actions by frequency; ties keep first-seen order.
    pub top_actions: Vec<ActionActivity>,

    /// Oldest timestamp in the filtered set, or the aggregation time when
    /// the set is empty.
    pub from: DateTime<Utc>,

    /// Newest timestamp in the filtered set, or the aggregation time when
    /// the set is empty.
    pub to: DateTime<Utc>,
}
