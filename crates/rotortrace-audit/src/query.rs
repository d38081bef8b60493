//! The query engine: conjunctive filtering, sorting, and pagination.
//!
//! All predicates of a filter combine with AND; within a set-valued field
//! (`categories`, `actions`, `levels`) membership is OR. Results are always
//! sorted by timestamp descending (newest first) before pagination, and
//! `total` counts the filtered set before slicing.

use std::cmp::Reverse;

use rotortrace_contracts::entry::AuditLogEntry;
use rotortrace_contracts::error::{AuditError, AuditResult};
use rotortrace_contracts::filter::AuditLogFilter;
use rotortrace_contracts::stats::LogPage;

/// Default page size for `get_logs`.
pub const DEFAULT_PAGE_SIZE: usize = 50;

/// Page size used internally by the aggregator to see the whole filtered set.
pub const AGGREGATION_PAGE_SIZE: usize = 10_000;

/// Reject malformed filters before any storage access.
pub fn validate(filter: &AuditLogFilter) -> AuditResult<()> {
    if let (Some(from), Some(to)) = (filter.from, filter.to) {
        if from > to {
            return Err(AuditError::InvalidFilter {
                reason: format!("'from' ({}) is after 'to' ({})", from, to),
            });
        }
    }
    Ok(())
}

/// True when `entry` satisfies every enabled predicate of `filter`.
pub fn matches(entry: &AuditLogEntry, filter: &AuditLogFilter) -> bool {
    if let Some(from) = filter.from {
        if entry.timestamp < from {
            return false;
        }
    }
    if let Some(to) = filter.to {
        if entry.timestamp > to {
            return false;
        }
    }
    if let Some(user_id) = &filter.user_id {
        if entry.actor.user_id != *user_id {
            return false;
        }
    }
    if let Some(categories) = &filter.categories {
        if !categories.contains(&entry.category) {
            return false;
        }
    }
    if let Some(actions) = &filter.actions {
        if !actions.contains(&entry.action) {
            return false;
        }
    }
    if let Some(levels) = &filter.levels {
        if !levels.contains(&entry.level) {
            return false;
        }
    }
    if let Some(entity_id) = &filter.entity_id {
        if entry.entity_id.as_deref() != Some(entity_id.as_str()) {
            return false;
        }
    }
    if let Some(entity_type) = filter.entity_type {
        if entry.entity_type != Some(entity_type) {
            return false;
        }
    }
    if filter.revertible_only && !(entry.revertible && entry.reverted_by.is_none()) {
        return false;
    }
    if let Some(search) = &filter.search_text {
        let needle = search.to_lowercase();
        let hit = entry.description.to_lowercase().contains(&needle)
            || entry.actor.user_name.to_lowercase().contains(&needle)
            || entry.action.as_str().contains(&needle);
        if !hit {
            return false;
        }
    }
    true
}

/// Apply `filter` (if any) and sort the survivors newest-first.
pub fn filtered_sorted(
    entries: Vec<AuditLogEntry>,
    filter: Option<&AuditLogFilter>,
) -> Vec<AuditLogEntry> {
    let mut result: Vec<AuditLogEntry> = match filter {
        Some(filter) => entries.into_iter().filter(|e| matches(e, filter)).collect(),
        None => entries,
    };
    // Stable sort: entries with equal timestamps keep storage order.
    result.sort_by_key(|e| Reverse(e.timestamp));
    result
}

/// Slice one page out of an already filtered, sorted set.
///
/// `page` is 1-based; 0 is treated as 1. A page beyond the last yields an
/// empty slice, not an error.
pub fn paginate(entries: Vec<AuditLogEntry>, page: usize, page_size: usize) -> LogPage {
    let page = page.max(1);
    let total = entries.len();
    let start = (page - 1).saturating_mul(page_size).min(total);
    let end = start.saturating_add(page_size).min(total);

    LogPage {
        logs: entries[start..end].to_vec(),
        total,
        page,
        page_size,
        has_more: end < total,
    }
}
