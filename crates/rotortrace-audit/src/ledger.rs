//! The ledger: the append-only store of audit entries.
//!
//! The whole collection lives under one durable key as a JSON blob and is
//! loaded lazily into an in-process cache behind a `Mutex`. Storage order
//! is newest-first (append prepends), but callers must not rely on it; the
//! query engine sorts explicitly.
//!
//! Read-path failures (missing key, unreadable store, corrupt blob) degrade
//! to an empty collection with a `warn!` so dashboards stay up while the
//! degradation remains operationally visible. Write failures always
//! propagate.

use std::sync::{Arc, Mutex};

use tracing::{debug, warn};

use rotortrace_contracts::entry::AuditLogEntry;
use rotortrace_contracts::error::{AuditError, AuditResult};
use rotortrace_core::DurableStore;

/// The fixed durable key holding the serialized ledger.
pub const LEDGER_KEY: &str = "rotortrace:ledger";

/// Append-only collection of audit entries over a `DurableStore`.
pub struct Ledger {
    store: Arc<dyn DurableStore>,
    cache: Mutex<Option<Vec<AuditLogEntry>>>,
}

impl Ledger {
    pub fn new(store: Arc<dyn DurableStore>) -> Self {
        Self {
            store,
            cache: Mutex::new(None),
        }
    }

    /// Add one entry to the front of the collection and persist.
    pub fn append(&self, entry: AuditLogEntry) -> AuditResult<()> {
        let mut guard = self.cache.lock().map_err(|e| AuditError::StorageWrite {
            reason: format!("ledger cache lock poisoned: {}", e),
        })?;

        let mut entries = match guard.take() {
            Some(entries) => entries,
            None => self.load_from_store(),
        };
        entries.insert(0, entry);

        self.persist(&entries)?;
        *guard = Some(entries);
        Ok(())
    }

    /// Return the full current collection.
    ///
    /// Never fails: an unreadable or corrupt blob degrades to an empty
    /// collection (logged at `warn!`).
    pub fn read_all(&self) -> Vec<AuditLogEntry> {
        let mut guard = match self.cache.lock() {
            Ok(guard) => guard,
            Err(e) => {
                warn!(error = %e, "ledger cache lock poisoned; degrading to empty read");
                return Vec::new();
            }
        };

        if guard.is_none() {
            *guard = Some(self.load_from_store());
        }
        guard.as_ref().cloned().unwrap_or_default()
    }

    /// Atomically overwrite the stored collection.
    ///
    /// Used by retention cleanup and by the revert coordinator's back-link
    /// update; never by ordinary callers.
    pub fn replace_all(&self, entries: Vec<AuditLogEntry>) -> AuditResult<()> {
        let mut guard = self.cache.lock().map_err(|e| AuditError::StorageWrite {
            reason: format!("ledger cache lock poisoned: {}", e),
        })?;

        self.persist(&entries)?;
        *guard = Some(entries);
        Ok(())
    }

    fn persist(&self, entries: &[AuditLogEntry]) -> AuditResult<()> {
        let blob = serde_json::to_string(entries).map_err(|e| AuditError::StorageWrite {
            reason: format!("failed to serialize ledger: {}", e),
        })?;
        self.store.set(LEDGER_KEY, &blob)?;
        debug!(entry_count = entries.len(), "ledger persisted");
        Ok(())
    }

    fn load_from_store(&self) -> Vec<AuditLogEntry> {
        match self.store.get(LEDGER_KEY) {
            Ok(Some(blob)) => match serde_json::from_str(&blob) {
                Ok(entries) => entries,
                Err(e) => {
                    warn!(error = %e, "ledger blob is corrupt; degrading to empty read");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!(error = %e, "durable store unreadable; degrading to empty read");
                Vec::new()
            }
        }
    }
}
