//! The audit service: the public entry point composing every component.
//!
//! Append runs the gate pipeline in a fixed order:
//!
//!   validate description → enabled? → category allowed? → severity floor →
//!   resolve actor → stamp id/timestamp → capture environment → ledger write
//!
//! Read operations (`get_logs`, timeline, stats, export) never mutate shared
//! state and never let storage failures escape the boundary; mutating
//! operations (append, revert, cleanup, config updates) always propagate
//! write failures.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{Duration, Utc};
use serde_json::json;
use tracing::{debug, info};

use rotortrace_contracts::action::{AuditAction, AuditLevel, EntityType};
use rotortrace_contracts::config::{AuditConfigUpdate, AuditLogConfig};
use rotortrace_contracts::entry::{AppendRequest, AuditLogEntry, EntryId};
use rotortrace_contracts::error::{AuditError, AuditResult};
use rotortrace_contracts::filter::AuditLogFilter;
use rotortrace_contracts::revert::RevertOutcome;
use rotortrace_contracts::stats::{AuditStats, LogPage, TimelineGroup};
use rotortrace_core::{DurableStore, EnvironmentProbe, IdentityProvider};

use crate::catalog;
use crate::config::ConfigStore;
use crate::export::{self, ExportFormat};
use crate::ledger::Ledger;
use crate::query;
use crate::revert;
use crate::stats;

/// The audit core behind one durable store.
///
/// Explicitly constructed with its collaborators, so multiple independent
/// instances can coexist (tests, per-tenant deployments) without hidden
/// process-wide state. Designed for a single-owner caller model: mutations
/// are full read-modify-write passes over the ledger, and two independent
/// processes sharing one store can lose a concurrent write (last snapshot
/// wins). Serialize access behind one owner for multi-writer deployments.
pub struct AuditService {
    identity: Arc<dyn IdentityProvider>,
    environment: Option<Arc<dyn EnvironmentProbe>>,
    ledger: Ledger,
    config: ConfigStore,
}

impl AuditService {
    /// Construct a service without touching the store.
    pub fn new(identity: Arc<dyn IdentityProvider>, store: Arc<dyn DurableStore>) -> Self {
        Self {
            identity,
            environment: None,
            ledger: Ledger::new(store.clone()),
            config: ConfigStore::new(store),
        }
    }

    /// Attach the optional environment collaborator consulted when
    /// `include_system_info` is enabled.
    pub fn with_environment(mut self, environment: Arc<dyn EnvironmentProbe>) -> Self {
        self.environment = Some(environment);
        self
    }

    /// Construct a service and, when the configuration says so, run the
    /// startup retention pass.
    pub fn open(
        identity: Arc<dyn IdentityProvider>,
        store: Arc<dyn DurableStore>,
    ) -> AuditResult<Self> {
        let service = Self::new(identity, store);
        if service.get_config().auto_cleanup {
            let removed = service.cleanup()?;
            if removed > 0 {
                info!(removed, "startup retention pass purged expired entries");
            }
        }
        Ok(service)
    }

    // ── Append ────────────────────────────────────────────────────────────────

    /// Record one action in the ledger.
    ///
    /// # Errors
    ///
    /// - `MissingDescription` when the description is blank (checked before
    ///   any storage access)
    /// - `Disabled`, `CategoryDisallowed`, `LevelBelowThreshold` when the
    ///   configured policy gates the entry; expected, recoverable conditions
    ///   that callers typically skip past
    /// - `IdentityUnavailable` when no actor can be resolved; an anonymous
    ///   entry is never recorded
    /// - `StorageWrite` when the ledger write fails
    pub fn append(&self, request: AppendRequest) -> AuditResult<AuditLogEntry> {
        if request.description.trim().is_empty() {
            return Err(AuditError::MissingDescription);
        }

        let config = self.config.get();
        if !config.enabled {
            return Err(AuditError::Disabled);
        }

        let category = catalog::category_of(&request.action);
        if !config.categories.contains(&category) {
            return Err(AuditError::CategoryDisallowed { category });
        }

        if request.level < config.min_level {
            return Err(AuditError::LevelBelowThreshold {
                level: request.level,
                min_level: config.min_level,
            });
        }

        let actor = self.identity.current_actor()?;

        let now = Utc::now();
        let user_agent = if config.include_system_info {
            self.environment.as_ref().and_then(|probe| probe.user_agent())
        } else {
            None
        };

        let entry = AuditLogEntry {
            id: EntryId::generate(now),
            timestamp: now,
            action: request.action,
            category,
            level: request.level,
            actor,
            entity_id: request.entity_id,
            entity_type: request.entity_type,
            description: request.description,
            changes: request.changes,
            metadata: request.metadata,
            user_agent,
            revertible: request.revertible,
            reverted_by: None,
        };

        self.ledger.append(entry.clone())?;

        debug!(
            id = %entry.id,
            action = %entry.action,
            category = %entry.category,
            level = %entry.level,
            "audit entry appended"
        );

        Ok(entry)
    }

    // ── Query ─────────────────────────────────────────────────────────────────

    /// One page of the filtered history, newest first.
    ///
    /// An out-of-range page or a filter matching nothing yields an empty
    /// page, not an error; only a malformed filter is rejected.
    pub fn get_logs(
        &self,
        filter: Option<&AuditLogFilter>,
        page: usize,
        page_size: usize,
    ) -> AuditResult<LogPage> {
        if let Some(filter) = filter {
            query::validate(filter)?;
        }
        let entries = query::filtered_sorted(self.ledger.read_all(), filter);
        Ok(query::paginate(entries, page, page_size))
    }

    /// All entries concerning one business object, newest first.
    pub fn get_entity_logs(&self, entity_id: &str, entity_type: EntityType) -> Vec<AuditLogEntry> {
        let filter = AuditLogFilter {
            entity_id: Some(entity_id.to_string()),
            entity_type: Some(entity_type),
            ..AuditLogFilter::default()
        };
        query::filtered_sorted(self.ledger.read_all(), Some(&filter))
    }

    // ── Aggregation ───────────────────────────────────────────────────────────

    /// The filtered history grouped by UTC calendar day, newest day first.
    pub fn get_timeline(&self, filter: Option<&AuditLogFilter>) -> AuditResult<Vec<TimelineGroup>> {
        let page = self.get_logs(filter, 1, query::AGGREGATION_PAGE_SIZE)?;
        Ok(stats::timeline(page.logs))
    }

    /// Aggregate statistics over the filtered history.
    pub fn get_stats(&self, filter: Option<&AuditLogFilter>) -> AuditResult<AuditStats> {
        let page = self.get_logs(filter, 1, query::AGGREGATION_PAGE_SIZE)?;
        Ok(stats::compute(&page.logs, Utc::now()))
    }

    // ── Revert ────────────────────────────────────────────────────────────────

    /// Compensate a previously recorded entry.
    ///
    /// Eligibility failures come back as a refused `RevertOutcome`; `Err` is
    /// reserved for storage, identity, and policy failures. The compensating
    /// append passes through the same policy gates as any append.
    ///
    /// The sequence is append-then-link: a reader between the two writes
    /// sees the compensating entry with the original not yet linked, which
    /// is a legal intermediate state.
    pub fn revert(&self, log_id: &EntryId, reason: &str) -> AuditResult<RevertOutcome> {
        let entries = self.ledger.read_all();
        let original =
            match revert::check_eligibility(entries.iter().find(|e| e.id == *log_id), log_id) {
                Ok(entry) => entry.clone(),
                Err(refusal) => return Ok(refusal),
            };

        let mut metadata = BTreeMap::new();
        metadata.insert("reverted_entry_id".to_string(), json!(original.id.0));

        let mut request = AppendRequest::new(
            AuditAction::Reverted,
            revert::compensating_description(&original, reason),
        )
        .level(AuditLevel::Warning)
        .metadata(metadata);
        request.entity_id = original.entity_id.clone();
        request.entity_type = original.entity_type;
        if let Some(changes) = &original.changes {
            request = request.changes(revert::invert_changes(changes));
        }

        let revert_entry = self.append(request)?;

        // Back-link the original. This is the single sanctioned mutation of
        // an appended entry.
        let linked: Vec<AuditLogEntry> = self
            .ledger
            .read_all()
            .into_iter()
            .map(|mut entry| {
                if entry.id == original.id {
                    entry.reverted_by = Some(revert_entry.id.clone());
                }
                entry
            })
            .collect();
        self.ledger.replace_all(linked)?;

        info!(
            original = %original.id,
            compensating = %revert_entry.id,
            "entry reverted"
        );

        Ok(RevertOutcome::succeeded(
            format!("entry '{}' reverted", original.id),
            revert_entry,
        ))
    }

    // ── Retention ─────────────────────────────────────────────────────────────

    /// Purge entries older than the configured retention window.
    ///
    /// Returns the number removed. A `retention_days` of 0 disables the
    /// window entirely.
    pub fn cleanup(&self) -> AuditResult<usize> {
        let config = self.config.get();
        if config.retention_days == 0 {
            return Ok(0);
        }

        let cutoff = Utc::now() - Duration::days(i64::from(config.retention_days));
        let entries = self.ledger.read_all();
        let before = entries.len();

        let kept: Vec<AuditLogEntry> = entries
            .into_iter()
            .filter(|e| e.timestamp >= cutoff)
            .collect();
        let removed = before - kept.len();

        if removed > 0 {
            self.ledger.replace_all(kept)?;
            info!(
                removed,
                retention_days = config.retention_days,
                "retention cleanup purged expired entries"
            );
        }

        Ok(removed)
    }

    // ── Export ────────────────────────────────────────────────────────────────

    /// Serialize the filtered history in the requested transfer format.
    pub fn export(
        &self,
        filter: Option<&AuditLogFilter>,
        format: ExportFormat,
    ) -> AuditResult<Vec<u8>> {
        if let Some(filter) = filter {
            query::validate(filter)?;
        }
        let entries = query::filtered_sorted(self.ledger.read_all(), filter);
        Ok(export::render(&entries, format))
    }

    // ── Configuration ─────────────────────────────────────────────────────────

    pub fn get_config(&self) -> AuditLogConfig {
        self.config.get()
    }

    /// Merge a partial update into the configuration and persist it.
    /// Subsequent appends observe the new policy immediately.
    pub fn update_config(&self, update: AuditConfigUpdate) -> AuditResult<AuditLogConfig> {
        self.config.update(update)
    }

    /// Overwrite the configuration wholesale, e.g. from a TOML defaults file.
    pub fn replace_config(&self, config: AuditLogConfig) -> AuditResult<()> {
        self.config.replace(config)
    }
}
