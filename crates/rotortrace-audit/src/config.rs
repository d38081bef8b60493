//! The config store: process-wide audit policy over a durable key.
//!
//! Loaded lazily, cached, and re-persisted after every update so subsequent
//! append/query calls observe the new policy immediately.

use std::sync::{Arc, Mutex};

use tracing::{info, warn};

use rotortrace_contracts::config::{AuditConfigUpdate, AuditLogConfig};
use rotortrace_contracts::error::{AuditError, AuditResult};
use rotortrace_core::DurableStore;

/// The fixed durable key holding the serialized configuration.
pub const CONFIG_KEY: &str = "rotortrace:config";

/// Cached, durable holder of the `AuditLogConfig`.
pub struct ConfigStore {
    store: Arc<dyn DurableStore>,
    cache: Mutex<Option<AuditLogConfig>>,
}

impl ConfigStore {
    pub fn new(store: Arc<dyn DurableStore>) -> Self {
        Self {
            store,
            cache: Mutex::new(None),
        }
    }

    /// Return the current configuration, falling back to defaults when
    /// nothing has been persisted yet (or the blob is corrupt).
    pub fn get(&self) -> AuditLogConfig {
        let mut guard = match self.cache.lock() {
            Ok(guard) => guard,
            Err(e) => {
                warn!(error = %e, "config cache lock poisoned; serving defaults");
                return AuditLogConfig::default();
            }
        };

        if guard.is_none() {
            *guard = Some(self.load_from_store());
        }
        guard.clone().unwrap_or_default()
    }

    /// Merge `update` into the current configuration and persist the result.
    ///
    /// Returns the merged configuration. Write failures propagate.
    pub fn update(&self, update: AuditConfigUpdate) -> AuditResult<AuditLogConfig> {
        let mut merged = self.get();
        merged.apply(update);
        self.replace(merged.clone())?;
        Ok(merged)
    }

    /// Overwrite the configuration wholesale. Used when seeding from a
    /// deployment's TOML defaults file.
    pub fn replace(&self, config: AuditLogConfig) -> AuditResult<()> {
        let blob = serde_json::to_string(&config).map_err(|e| AuditError::StorageWrite {
            reason: format!("failed to serialize config: {}", e),
        })?;
        self.store.set(CONFIG_KEY, &blob)?;

        let mut guard = self.cache.lock().map_err(|e| AuditError::StorageWrite {
            reason: format!("config cache lock poisoned: {}", e),
        })?;
        *guard = Some(config.clone());

        info!(
            enabled = config.enabled,
            retention_days = config.retention_days,
            min_level = %config.min_level,
            "audit configuration persisted"
        );
        Ok(())
    }

    fn load_from_store(&self) -> AuditLogConfig {
        match self.store.get(CONFIG_KEY) {
            Ok(Some(blob)) => match serde_json::from_str(&blob) {
                Ok(config) => config,
                Err(e) => {
                    warn!(error = %e, "config blob is corrupt; serving defaults");
                    AuditLogConfig::default()
                }
            },
            Ok(None) => AuditLogConfig::default(),
            Err(e) => {
                warn!(error = %e, "durable store unreadable; serving default config");
                AuditLogConfig::default()
            }
        }
    }
}
