//! Runtime configuration for the audit core.
//!
//! `AuditLogConfig` is loaded once at startup from the durable store (or
//! from a TOML defaults file in deployments that ship one) and mutated only
//! through explicit `AuditConfigUpdate` merges, which the config store
//! persists immediately.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::action::{AuditLevel, Category};
use crate::error::{AuditError, AuditResult};

/// Mutable runtime policy for audit capture and retention.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditLogConfig {
    /// Master switch. When false, every append fails with `Disabled`.
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Maximum age of kept entries in whole days. 0 means unlimited.
    #[serde(default = "default_retention_days")]
    pub retention_days: u32,

    /// Allow-list gating append by category.
    #[serde(default = "default_categories")]
    pub categories: Vec<Category>,

    /// Severity floor gating append.
    #[serde(default = "default_min_level")]
    pub min_level: AuditLevel,

    /// Run a retention pass once when the service opens.
    #[serde(default = "default_auto_cleanup")]
    pub auto_cleanup: bool,

    /// Capture the calling client's user-agent string into entries.
    #[serde(default)]
    pub include_system_info: bool,
}

fn default_enabled() -> bool {
    true
}

fn default_retention_days() -> u32 {
    90
}

fn default_categories() -> Vec<Category> {
    Category::ALL.to_vec()
}

fn default_min_level() -> AuditLevel {
    AuditLevel::Info
}

fn default_auto_cleanup() -> bool {
    true
}

impl Default for AuditLogConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            retention_days: 90,
            categories: Category::ALL.to_vec(),
            min_level: AuditLevel::Info,
            auto_cleanup: true,
            include_system_info: false,
        }
    }
}

impl AuditLogConfig {
    /// Parse `s` as a TOML configuration document.
    ///
    /// Absent fields take their defaults, so a partial document is valid.
    /// Returns `AuditError::Config` if the TOML is malformed.
    pub fn from_toml_str(s: &str) -> AuditResult<Self> {
        toml::from_str(s).map_err(|e| AuditError::Config {
            reason: format!("failed to parse config TOML: {}", e),
        })
    }

    /// Read the file at `path` and parse it as TOML configuration.
    pub fn from_file(path: &Path) -> AuditResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| AuditError::Config {
            reason: format!("failed to read config file '{}': {}", path.display(), e),
        })?;
        Self::from_toml_str(&contents)
    }

    /// Merge the set fields of `update` into `self`.
    pub fn apply(&mut self, update: AuditConfigUpdate) {
        if let Some(enabled) = update.enabled {
            self.enabled = enabled;
        }
        if let Some(retention_days) = update.retention_days {
            self.retention_days = retention_days;
        }
        if let Some(categories) = update.categories {
            self.categories = categories;
        }
        if let Some(min_level) = update.min_level {
            self.min_level = min_level;
        }
        if let Some(auto_cleanup) = update.auto_cleanup {
            self.auto_cleanup = auto_cleanup;
        }
        if let Some(include_system_info) = update.include_system_info {
            self.include_system_info = include_system_info;
        }
    }
}

/// A partial configuration: only the set fields are merged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuditConfigUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retention_days: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<Category>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_level: Option<AuditLevel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_cleanup: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_system_info: Option<bool>,
}
