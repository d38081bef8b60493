//! The aggregator: statistics and the day-grouped timeline.
//!
//! Both functions operate on an already filtered, newest-first slice as
//! produced by the query engine.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use rotortrace_contracts::action::{AuditLevel, Category};
use rotortrace_contracts::entry::AuditLogEntry;
use rotortrace_contracts::stats::{ActionActivity, ActorActivity, AuditStats, TimelineGroup};

const TOP_ACTORS: usize = 5;
const TOP_ACTIONS: usize = 10;

/// Group newest-first entries by UTC calendar day.
///
/// Because the input is sorted by timestamp descending, each day's entries
/// are contiguous; groups come out date-descending and entries keep the
/// global order within their group.
pub fn timeline(entries: Vec<AuditLogEntry>) -> Vec<TimelineGroup> {
    let mut groups: Vec<TimelineGroup> = Vec::new();

    for entry in entries {
        let date = entry.timestamp.date_naive();
        match groups.last_mut() {
            Some(group) if group.date == date => group.logs.push(entry),
            _ => groups.push(TimelineGroup {
                date,
                logs: vec![entry],
            }),
        }
    }

    groups
}

/// Compute aggregate statistics over a filtered set.
///
/// `at` is the aggregation wall clock time; it doubles as the sentinel for
/// both `{from, to}` bounds when the set is empty.
pub fn compute(entries: &[AuditLogEntry], at: DateTime<Utc>) -> AuditStats {
    let mut by_category: BTreeMap<Category, u64> =
        Category::ALL.iter().map(|c| (*c, 0)).collect();
    let mut by_level: BTreeMap<AuditLevel, u64> =
        AuditLevel::ALL.iter().map(|l| (*l, 0)).collect();

    // Vec-based counting keeps first-seen order, which breaks count ties.
    let mut actors: Vec<ActorActivity> = Vec::new();
    let mut actions: Vec<ActionActivity> = Vec::new();

    for entry in entries {
        *by_category.entry(entry.category).or_insert(0) += 1;
        *by_level.entry(entry.level).or_insert(0) += 1;

        match actors.iter_mut().find(|a| a.user_id == entry.actor.user_id) {
            Some(actor) => actor.count += 1,
            None => actors.push(ActorActivity {
                user_id: entry.actor.user_id.clone(),
                user_name: entry.actor.user_name.clone(),
                count: 1,
            }),
        }

        match actions.iter_mut().find(|a| a.action == entry.action) {
            Some(action) => action.count += 1,
            None => actions.push(ActionActivity {
                action: entry.action,
                count: 1,
            }),
        }
    }

    // Stable sort preserves first-seen order among equal counts.
    actors.sort_by(|a, b| b.count.cmp(&a.count));
    actors.truncate(TOP_ACTORS);
    actions.sort_by(|a, b| b.count.cmp(&a.count));
    actions.truncate(TOP_ACTIONS);

    let from = entries.iter().map(|e| e.timestamp).min().unwrap_or(at);
    let to = entries.iter().map(|e| e.timestamp).max().unwrap_or(at);

    AuditStats {
        total: entries.len() as u64,
        by_category,
        by_level,
        top_actors: actors,
        top_actions: actions,
        from,
        to,
    }
}
