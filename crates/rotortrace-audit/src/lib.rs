//! # rotortrace-audit
//!
//! The audit/event log core for the drone-repair workshop application:
//! durable recording of every state-changing action, queries and aggregate
//! statistics over that history, a chronological timeline, retention-based
//! purging, tabular export, and compensating reverts of recorded actions.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use rotortrace_audit::{AuditService, FileStore, StaticIdentity};
//! use rotortrace_contracts::entry::AppendRequest;
//! use rotortrace_contracts::action::AuditAction;
//!
//! let identity = Arc::new(StaticIdentity::new("u-1", "Marta", "technician"));
//! let store = Arc::new(FileStore::new("audit.json"));
//! let audit = AuditService::open(identity, store)?;
//!
//! audit.append(AppendRequest::new(
//!     AuditAction::RepairCreated,
//!     "Created repair #42",
//! ))?;
//! let page = audit.get_logs(None, 1, 50)?;
//! ```
//!
//! History is append-only: entries are never edited or deleted by id. The
//! two sanctioned exceptions are the retention manager (age-based bulk
//! purge) and the revert coordinator's one-time `reverted_by` back-link.

pub mod catalog;
pub mod config;
pub mod export;
pub mod ledger;
pub mod memory;
pub mod query;
pub mod revert;
pub mod service;
pub mod stats;

pub use config::{ConfigStore, CONFIG_KEY};
pub use export::ExportFormat;
pub use ledger::{Ledger, LEDGER_KEY};
pub use memory::{FileStore, MemoryStore, StaticEnvironment, StaticIdentity};
pub use query::DEFAULT_PAGE_SIZE;
pub use service::AuditService;

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{DateTime, Duration, TimeZone, Utc};
    use serde_json::json;

    use rotortrace_contracts::action::{AuditAction, AuditLevel, Category, EntityType};
    use rotortrace_contracts::config::AuditConfigUpdate;
    use rotortrace_contracts::entry::{
        Actor, AppendRequest, AuditLogEntry, EntryId, FieldChange, ValueKind,
    };
    use rotortrace_contracts::error::{AuditError, AuditResult};
    use rotortrace_contracts::filter::AuditLogFilter;
    use rotortrace_contracts::revert::RevertError;
    use rotortrace_core::{DurableStore, IdentityProvider};

    use crate::catalog;
    use crate::export::ExportFormat;
    use crate::ledger::{Ledger, LEDGER_KEY};
    use crate::query::DEFAULT_PAGE_SIZE;
    use crate::memory::{MemoryStore, StaticEnvironment, StaticIdentity};
    use crate::service::AuditService;

    // ── Helpers ───────────────────────────────────────────────────────────────

    /// A service over a fresh in-memory store, acting as technician Marta.
    fn make_service() -> AuditService {
        AuditService::new(
            Arc::new(StaticIdentity::new("u-7", "Marta", "technician")),
            Arc::new(MemoryStore::new()),
        )
    }

    /// Build a complete entry with a chosen timestamp, for seeding the
    /// ledger directly when append-time stamping is in the way.
    fn make_entry(timestamp: DateTime<Utc>, action: AuditAction) -> AuditLogEntry {
        AuditLogEntry {
            id: EntryId::generate(timestamp),
            timestamp,
            action,
            category: catalog::category_of(&action),
            level: AuditLevel::Info,
            actor: Actor {
                user_id: "u-7".to_string(),
                user_name: "Marta".to_string(),
                user_role: "technician".to_string(),
            },
            entity_id: None,
            entity_type: None,
            description: format!("seeded {}", action),
            changes: None,
            metadata: None,
            user_agent: None,
            revertible: false,
            reverted_by: None,
        }
    }

    /// An identity provider that always fails, for the no-anonymous-actor rule.
    struct NoIdentity;

    impl IdentityProvider for NoIdentity {
        fn current_actor(&self) -> AuditResult<Actor> {
            Err(AuditError::IdentityUnavailable {
                reason: "session expired".to_string(),
            })
        }
    }

    // ── Append/read round-trip ────────────────────────────────────────────────

    /// The entry returned by append shows up verbatim in the next unfiltered
    /// query, including changes and metadata.
    #[test]
    fn append_round_trips_through_get_logs() {
        let audit = make_service();

        let mut metadata = std::collections::BTreeMap::new();
        metadata.insert("previous_technician".to_string(), json!("u-3"));

        let entry = audit
            .append(
                AppendRequest::new(AuditAction::StateChanged, "State changed on repair #42")
                    .entity("42", EntityType::Repair)
                    .changes(vec![FieldChange {
                        field: "state".to_string(),
                        old_value: json!("received"),
                        new_value: json!("diagnosed"),
                        kind: ValueKind::String,
                    }])
                    .metadata(metadata)
                    .revertible(true),
            )
            .unwrap();

        let page = audit.get_logs(None, 1, 50).unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.logs[0], entry, "entry must round-trip verbatim");
        assert_eq!(page.logs[0].category, Category::State);
    }

    // ── Policy gating ─────────────────────────────────────────────────────────

    /// Appending outside the category allow-list fails and writes nothing.
    #[test]
    fn disallowed_category_never_writes() {
        let audit = make_service();
        audit
            .update_config(AuditConfigUpdate {
                categories: Some(vec![Category::Repair]),
                ..AuditConfigUpdate::default()
            })
            .unwrap();

        let err = audit
            .append(AppendRequest::new(
                AuditAction::BudgetApproved,
                "Approved budget #9",
            ))
            .unwrap_err();

        assert!(matches!(
            err,
            AuditError::CategoryDisallowed {
                category: Category::Budget
            }
        ));
        assert_eq!(audit.get_logs(None, 1, 50).unwrap().total, 0);
    }

    /// With the floor at `error`, `info` is gated and `critical` passes.
    #[test]
    fn severity_floor_gates_append() {
        let audit = make_service();
        audit
            .update_config(AuditConfigUpdate {
                min_level: Some(AuditLevel::Error),
                ..AuditConfigUpdate::default()
            })
            .unwrap();

        let err = audit
            .append(AppendRequest::new(AuditAction::RepairUpdated, "Updated"))
            .unwrap_err();
        assert!(matches!(err, AuditError::LevelBelowThreshold { .. }));
        assert_eq!(audit.get_logs(None, 1, 50).unwrap().total, 0);

        audit
            .append(
                AppendRequest::new(AuditAction::RepairUpdated, "Updated")
                    .level(AuditLevel::Critical),
            )
            .unwrap();
        assert_eq!(audit.get_logs(None, 1, 50).unwrap().total, 1);
    }

    #[test]
    fn disabled_config_gates_every_append() {
        let audit = make_service();
        audit
            .update_config(AuditConfigUpdate {
                enabled: Some(false),
                ..AuditConfigUpdate::default()
            })
            .unwrap();

        let err = audit
            .append(AppendRequest::new(AuditAction::RepairCreated, "Created"))
            .unwrap_err();
        assert!(matches!(err, AuditError::Disabled));
    }

    #[test]
    fn blank_description_is_rejected_before_any_write() {
        let audit = make_service();
        let err = audit
            .append(AppendRequest::new(AuditAction::RepairCreated, "   "))
            .unwrap_err();
        assert!(matches!(err, AuditError::MissingDescription));
        assert_eq!(audit.get_logs(None, 1, 50).unwrap().total, 0);
    }

    /// No actor means no entry; an anonymous record is never written.
    #[test]
    fn identity_failure_blocks_append() {
        let audit = AuditService::new(Arc::new(NoIdentity), Arc::new(MemoryStore::new()));

        let err = audit
            .append(AppendRequest::new(AuditAction::RepairCreated, "Created"))
            .unwrap_err();
        assert!(matches!(err, AuditError::IdentityUnavailable { .. }));
        assert_eq!(audit.get_logs(None, 1, 50).unwrap().total, 0);
    }

    // ── Filtering ─────────────────────────────────────────────────────────────

    /// Category and level predicates combine with AND.
    #[test]
    fn filter_fields_combine_conjunctively() {
        let audit = make_service();
        audit
            .append(AppendRequest::new(AuditAction::RepairCreated, "info one"))
            .unwrap();
        let warned = audit
            .append(
                AppendRequest::new(AuditAction::RepairUpdated, "warning one")
                    .level(AuditLevel::Warning),
            )
            .unwrap();

        let filter = AuditLogFilter {
            categories: Some(vec![Category::Repair]),
            levels: Some(vec![AuditLevel::Warning]),
            ..AuditLogFilter::default()
        };
        let page = audit.get_logs(Some(&filter), 1, 50).unwrap();

        assert_eq!(page.total, 1);
        assert_eq!(page.logs[0].id, warned.id);
    }

    #[test]
    fn search_text_is_case_insensitive() {
        let audit = make_service();
        audit
            .append(AppendRequest::new(
                AuditAction::FileUploaded,
                "Uploaded Flight-Controller schematic",
            ))
            .unwrap();
        audit
            .append(AppendRequest::new(AuditAction::PartAdded, "Added rotor arm"))
            .unwrap();

        let filter = AuditLogFilter {
            search_text: Some("flight-controller".to_string()),
            ..AuditLogFilter::default()
        };
        let page = audit.get_logs(Some(&filter), 1, 50).unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.logs[0].action, AuditAction::FileUploaded);
    }

    #[test]
    fn revertible_only_excludes_closed_and_non_revertible_entries() {
        let audit = make_service();
        audit
            .append(AppendRequest::new(AuditAction::RepairCreated, "plain"))
            .unwrap();
        let open = audit
            .append(AppendRequest::new(AuditAction::StateChanged, "open").revertible(true))
            .unwrap();
        let closed = audit
            .append(AppendRequest::new(AuditAction::StateChanged, "closed").revertible(true))
            .unwrap();
        audit.revert(&closed.id, "mistake").unwrap();

        let filter = AuditLogFilter {
            revertible_only: true,
            ..AuditLogFilter::default()
        };
        let page = audit.get_logs(Some(&filter), 1, 50).unwrap();

        assert_eq!(page.total, 1);
        assert_eq!(page.logs[0].id, open.id);
    }

    #[test]
    fn inverted_date_range_is_rejected() {
        let audit = make_service();
        let filter = AuditLogFilter {
            from: Some(Utc::now()),
            to: Some(Utc::now() - Duration::hours(1)),
            ..AuditLogFilter::default()
        };
        let err = audit.get_logs(Some(&filter), 1, 50).unwrap_err();
        assert!(matches!(err, AuditError::InvalidFilter { .. }));
    }

    // ── Pagination ────────────────────────────────────────────────────────────

    /// ceil(N / k) non-empty pages whose concatenation reproduces the full
    /// sorted set exactly once each.
    #[test]
    fn pages_partition_the_filtered_set() {
        let audit = make_service();
        for i in 0..7 {
            audit
                .append(AppendRequest::new(
                    AuditAction::RepairUpdated,
                    format!("update {}", i),
                ))
                .unwrap();
        }

        let full = audit.get_logs(None, 1, 100).unwrap().logs;
        assert_eq!(full.len(), 7);

        let mut concatenated = Vec::new();
        for page_no in 1..=3 {
            let page = audit.get_logs(None, page_no, 3).unwrap();
            assert_eq!(page.total, 7);
            assert!(!page.logs.is_empty());
            assert_eq!(page.has_more, page_no < 3);
            concatenated.extend(page.logs);
        }

        assert_eq!(concatenated, full);
    }

    /// A default-sized page holds at most `DEFAULT_PAGE_SIZE` entries and
    /// signals the overflow via `has_more`.
    #[test]
    fn default_page_size_caps_one_page() {
        let audit = make_service();
        for i in 0..=DEFAULT_PAGE_SIZE {
            audit
                .append(AppendRequest::new(
                    AuditAction::RepairUpdated,
                    format!("update {}", i),
                ))
                .unwrap();
        }

        let page = audit.get_logs(None, 1, DEFAULT_PAGE_SIZE).unwrap();
        assert_eq!(page.logs.len(), DEFAULT_PAGE_SIZE);
        assert_eq!(page.total, DEFAULT_PAGE_SIZE + 1);
        assert!(page.has_more);
    }

    #[test]
    fn out_of_range_page_is_empty_not_an_error() {
        let audit = make_service();
        audit
            .append(AppendRequest::new(AuditAction::RepairCreated, "only one"))
            .unwrap();

        let page = audit.get_logs(None, 99, 10).unwrap();
        assert!(page.logs.is_empty());
        assert_eq!(page.total, 1);
        assert!(!page.has_more);
    }

    // ── Revert ────────────────────────────────────────────────────────────────

    /// The compensating entry carries the structurally inverted
    /// changes and the original gains the back-link.
    #[test]
    fn revert_records_inverted_changes_and_links_original() {
        let audit = make_service();
        let original = audit
            .append(
                AppendRequest::new(AuditAction::StateChanged, "State changed")
                    .changes(vec![FieldChange {
                        field: "state".to_string(),
                        old_value: json!("received"),
                        new_value: json!("diagnosed"),
                        kind: ValueKind::String,
                    }])
                    .revertible(true),
            )
            .unwrap();

        let outcome = audit.revert(&original.id, "wrong diagnosis").unwrap();
        assert!(outcome.success);

        let revert_log = outcome.revert_log.expect("success carries the new entry");
        assert_eq!(revert_log.action, AuditAction::Reverted);
        assert_eq!(revert_log.level, AuditLevel::Warning);
        assert!(!revert_log.revertible, "a revert cannot itself be reverted");
        assert!(revert_log.description.contains("wrong diagnosis"));

        let changes = revert_log.changes.expect("inverted changes recorded");
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].old_value, json!("diagnosed"));
        assert_eq!(changes[0].new_value, json!("received"));
        assert_eq!(changes[0].kind, ValueKind::String);

        let page = audit.get_logs(None, 1, 50).unwrap();
        let stored_original = page
            .logs
            .iter()
            .find(|e| e.id == original.id)
            .expect("original still present");
        assert_eq!(stored_original.reverted_by, Some(revert_log.id));
    }

    /// The second revert of the same entry is refused and the back-link
    /// keeps its first value.
    #[test]
    fn second_revert_is_refused_as_already_reverted() {
        let audit = make_service();
        let original = audit
            .append(AppendRequest::new(AuditAction::StateChanged, "changed").revertible(true))
            .unwrap();

        let first = audit.revert(&original.id, "first").unwrap();
        assert!(first.success);
        let first_link = first.revert_log.unwrap().id;

        let second = audit.revert(&original.id, "second").unwrap();
        assert!(!second.success);
        assert_eq!(second.error, Some(RevertError::AlreadyReverted));

        let page = audit.get_logs(None, 1, 50).unwrap();
        let stored = page.logs.iter().find(|e| e.id == original.id).unwrap();
        assert_eq!(stored.reverted_by, Some(first_link));
    }

    /// `revertible = false` refuses regardless of the reason text.
    #[test]
    fn non_revertible_entry_is_refused() {
        let audit = make_service();
        let entry = audit
            .append(AppendRequest::new(AuditAction::RepairCreated, "created"))
            .unwrap();

        let outcome = audit.revert(&entry.id, "any reason at all").unwrap();
        assert!(!outcome.success);
        assert_eq!(outcome.error, Some(RevertError::NotRevertible));
    }

    #[test]
    fn revert_of_unknown_id_is_refused_as_not_found() {
        let audit = make_service();
        let outcome = audit
            .revert(&EntryId("nope".to_string()), "reason")
            .unwrap();
        assert!(!outcome.success);
        assert_eq!(outcome.error, Some(RevertError::LogNotFound));
    }

    // ── Retention ─────────────────────────────────────────────────────────────

    /// With a 30-day window, only the 31-day-old entry is purged.
    #[test]
    fn cleanup_removes_exactly_the_expired_entries() {
        let store: Arc<MemoryStore> = Arc::new(MemoryStore::new());
        let now = Utc::now();
        let seed = Ledger::new(store.clone());
        seed.replace_all(vec![
            make_entry(now, AuditAction::RepairCreated),
            make_entry(now - Duration::days(29), AuditAction::RepairUpdated),
            make_entry(now - Duration::days(31), AuditAction::PartAdded),
        ])
        .unwrap();

        let audit = AuditService::new(
            Arc::new(StaticIdentity::new("u-7", "Marta", "technician")),
            store,
        );
        audit
            .update_config(AuditConfigUpdate {
                retention_days: Some(30),
                ..AuditConfigUpdate::default()
            })
            .unwrap();

        let removed = audit.cleanup().unwrap();
        assert_eq!(removed, 1);

        let page = audit.get_logs(None, 1, 50).unwrap();
        assert_eq!(page.total, 2);
        assert!(page.logs.iter().all(|e| e.action != AuditAction::PartAdded));
    }

    #[test]
    fn zero_retention_days_means_unlimited() {
        let store: Arc<MemoryStore> = Arc::new(MemoryStore::new());
        let seed = Ledger::new(store.clone());
        seed.replace_all(vec![make_entry(
            Utc::now() - Duration::days(3650),
            AuditAction::RepairCreated,
        )])
        .unwrap();

        let audit = AuditService::new(
            Arc::new(StaticIdentity::new("u-7", "Marta", "technician")),
            store,
        );
        audit
            .update_config(AuditConfigUpdate {
                retention_days: Some(0),
                ..AuditConfigUpdate::default()
            })
            .unwrap();

        assert_eq!(audit.cleanup().unwrap(), 0);
        assert_eq!(audit.get_logs(None, 1, 50).unwrap().total, 1);
    }

    /// `open` runs the retention pass when `auto_cleanup` is on.
    #[test]
    fn open_runs_startup_cleanup() {
        let store: Arc<MemoryStore> = Arc::new(MemoryStore::new());
        let seed = Ledger::new(store.clone());
        seed.replace_all(vec![
            make_entry(Utc::now(), AuditAction::RepairCreated),
            make_entry(Utc::now() - Duration::days(365), AuditAction::PartAdded),
        ])
        .unwrap();

        // Default config: retention 90 days, auto_cleanup on.
        let audit = AuditService::open(
            Arc::new(StaticIdentity::new("u-7", "Marta", "technician")),
            store,
        )
        .unwrap();

        assert_eq!(audit.get_logs(None, 1, 50).unwrap().total, 1);
    }

    // ── Entity logs ───────────────────────────────────────────────────────────

    #[test]
    fn entity_logs_return_only_the_matching_object() {
        let audit = make_service();
        let entry = audit
            .append(
                AppendRequest::new(AuditAction::RepairCreated, "Created repair #42")
                    .entity("42", EntityType::Repair),
            )
            .unwrap();
        audit
            .append(
                AppendRequest::new(AuditAction::RepairCreated, "Created repair #43")
                    .entity("43", EntityType::Repair),
            )
            .unwrap();
        audit
            .append(
                AppendRequest::new(AuditAction::PartAdded, "Added part to client object")
                    .entity("42", EntityType::Client),
            )
            .unwrap();

        let logs = audit.get_entity_logs("42", EntityType::Repair);
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0], entry);
    }

    // ── Aggregation ───────────────────────────────────────────────────────────

    /// Entries on two calendar days group into two date-descending buckets.
    #[test]
    fn timeline_groups_by_day_newest_first() {
        let store: Arc<MemoryStore> = Arc::new(MemoryStore::new());
        let seed = Ledger::new(store.clone());
        let day1a = Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap();
        let day1b = Utc.with_ymd_and_hms(2024, 1, 1, 17, 30, 0).unwrap();
        let day2 = Utc.with_ymd_and_hms(2024, 1, 2, 8, 15, 0).unwrap();
        seed.replace_all(vec![
            make_entry(day2, AuditAction::BudgetApproved),
            make_entry(day1b, AuditAction::StateChanged),
            make_entry(day1a, AuditAction::RepairCreated),
        ])
        .unwrap();

        let audit = AuditService::new(
            Arc::new(StaticIdentity::new("u-7", "Marta", "technician")),
            store,
        );

        let timeline = audit.get_timeline(None).unwrap();
        assert_eq!(timeline.len(), 2);
        assert_eq!(timeline[0].date.to_string(), "2024-01-02");
        assert_eq!(timeline[0].logs.len(), 1);
        assert_eq!(timeline[1].date.to_string(), "2024-01-01");
        assert_eq!(timeline[1].logs.len(), 2);
        // Within a group, entries keep the global newest-first order.
        assert_eq!(timeline[1].logs[0].timestamp, day1b);
        assert_eq!(timeline[1].logs[1].timestamp, day1a);
    }

    #[test]
    fn stats_zero_fill_all_categories_and_levels() {
        let audit = make_service();
        audit
            .append(AppendRequest::new(AuditAction::RepairCreated, "created"))
            .unwrap();

        let stats = audit.get_stats(None).unwrap();
        assert_eq!(stats.total, 1);
        assert_eq!(stats.by_category.len(), Category::ALL.len());
        assert_eq!(stats.by_category[&Category::Repair], 1);
        assert_eq!(stats.by_category[&Category::Budget], 0);
        assert_eq!(stats.by_level.len(), AuditLevel::ALL.len());
        assert_eq!(stats.by_level[&AuditLevel::Info], 1);
        assert_eq!(stats.by_level[&AuditLevel::Critical], 0);
        assert_eq!(stats.top_actors.len(), 1);
        assert_eq!(stats.top_actors[0].user_id, "u-7");
        assert_eq!(stats.top_actions[0].action, AuditAction::RepairCreated);
    }

    /// The documented sentinel: on an empty filtered set, both bounds are
    /// the aggregation time.
    #[test]
    fn stats_on_empty_set_use_query_time_bounds() {
        let audit = make_service();
        let before = Utc::now();
        let stats = audit.get_stats(None).unwrap();
        let after = Utc::now();

        assert_eq!(stats.total, 0);
        assert_eq!(stats.from, stats.to);
        assert!(stats.from >= before && stats.from <= after);
    }

    // ── Read-path degradation ─────────────────────────────────────────────────

    /// A corrupt ledger blob reads as an empty history, never an error.
    #[test]
    fn corrupt_ledger_blob_degrades_to_empty() {
        let store: Arc<MemoryStore> = Arc::new(MemoryStore::new());
        store.set(LEDGER_KEY, "{definitely not json").unwrap();

        let audit = AuditService::new(
            Arc::new(StaticIdentity::new("u-7", "Marta", "technician")),
            store,
        );

        let page = audit.get_logs(None, 1, 50).unwrap();
        assert_eq!(page.total, 0);
    }

    // ── Environment capture ───────────────────────────────────────────────────

    #[test]
    fn user_agent_captured_only_when_configured() {
        let store: Arc<MemoryStore> = Arc::new(MemoryStore::new());
        let audit = AuditService::new(
            Arc::new(StaticIdentity::new("u-7", "Marta", "technician")),
            store,
        )
        .with_environment(Arc::new(StaticEnvironment::new("workshop-tablet/2.1")));

        let without = audit
            .append(AppendRequest::new(AuditAction::RepairCreated, "one"))
            .unwrap();
        assert_eq!(without.user_agent, None);

        audit
            .update_config(AuditConfigUpdate {
                include_system_info: Some(true),
                ..AuditConfigUpdate::default()
            })
            .unwrap();

        let with = audit
            .append(AppendRequest::new(AuditAction::RepairCreated, "two"))
            .unwrap();
        assert_eq!(with.user_agent, Some("workshop-tablet/2.1".to_string()));
    }

    // ── Config persistence ────────────────────────────────────────────────────

    /// Updates persist through the durable store and are observed by a
    /// later service over the same store.
    #[test]
    fn config_updates_survive_reconstruction() {
        let store: Arc<MemoryStore> = Arc::new(MemoryStore::new());
        let first = AuditService::new(
            Arc::new(StaticIdentity::new("u-7", "Marta", "technician")),
            store.clone(),
        );
        first
            .update_config(AuditConfigUpdate {
                retention_days: Some(7),
                min_level: Some(AuditLevel::Warning),
                ..AuditConfigUpdate::default()
            })
            .unwrap();

        let second = AuditService::new(
            Arc::new(StaticIdentity::new("u-8", "Iker", "admin")),
            store,
        );
        let config = second.get_config();
        assert_eq!(config.retention_days, 7);
        assert_eq!(config.min_level, AuditLevel::Warning);
    }

    // ── Export ────────────────────────────────────────────────────────────────

    #[test]
    fn csv_export_has_header_and_one_row_per_entry() {
        let audit = make_service();
        audit
            .append(AppendRequest::new(
                AuditAction::RepairCreated,
                "Created repair #42, urgent",
            ))
            .unwrap();
        audit
            .append(AppendRequest::new(AuditAction::PartAdded, "Added rotor arm"))
            .unwrap();

        let bytes = audit.export(None, ExportFormat::Csv).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[0],
            "timestamp,user,action,category,level,description,changes"
        );
        // The comma-bearing description is quoted.
        assert!(lines.iter().any(|l| l.contains("\"Created repair #42, urgent\"")));
    }

    /// The unimplemented format degrades to the tabular payload.
    #[test]
    fn pdf_export_degrades_to_csv() {
        let audit = make_service();
        audit
            .append(AppendRequest::new(AuditAction::RepairCreated, "created"))
            .unwrap();

        let pdf = audit.export(None, ExportFormat::Pdf).unwrap();
        let csv = audit.export(None, ExportFormat::Csv).unwrap();
        assert_eq!(pdf, csv);
    }

    #[test]
    fn json_export_parses_back_to_entries() {
        let audit = make_service();
        let entry = audit
            .append(AppendRequest::new(AuditAction::RepairCreated, "created"))
            .unwrap();

        let bytes = audit.export(None, ExportFormat::Json).unwrap();
        let decoded: Vec<AuditLogEntry> = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(decoded, vec![entry]);
    }
}
