//! Action identifiers, categories, and severity levels.
//!
//! `AuditAction` is the closed set of state-changing actions the workshop
//! application reports. Identifiers are namespaced (`repair:created`,
//! `state:changed`, ...) and the namespace prefix determines the entry's
//! `Category` (see the catalog in rotortrace-audit).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Every state-changing action the application can record.
///
/// The set is closed on purpose: an unknown action cannot be appended, so
/// every entry in the ledger is classifiable and filterable. The serialized
/// form is the namespaced identifier, e.g. `"repair:created"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AuditAction {
    #[serde(rename = "repair:created")]
    RepairCreated,
    #[serde(rename = "repair:updated")]
    RepairUpdated,
    #[serde(rename = "repair:deleted")]
    RepairDeleted,
    #[serde(rename = "state:changed")]
    StateChanged,
    #[serde(rename = "part:added")]
    PartAdded,
    #[serde(rename = "part:updated")]
    PartUpdated,
    #[serde(rename = "part:deleted")]
    PartDeleted,
    #[serde(rename = "file:uploaded")]
    FileUploaded,
    #[serde(rename = "file:deleted")]
    FileDeleted,
    #[serde(rename = "budget:created")]
    BudgetCreated,
    #[serde(rename = "budget:approved")]
    BudgetApproved,
    #[serde(rename = "budget:rejected")]
    BudgetRejected,
    #[serde(rename = "notification:sent")]
    NotificationSent,
    #[serde(rename = "user:login")]
    UserLogin,
    #[serde(rename = "user:logout")]
    UserLogout,
    #[serde(rename = "system:config_changed")]
    ConfigChanged,
    #[serde(rename = "system:cleanup")]
    Cleanup,
    /// Reserved for compensating entries written by the revert coordinator.
    #[serde(rename = "system:reverted")]
    Reverted,
}

impl AuditAction {
    /// The namespaced identifier, identical to the serialized form.
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::RepairCreated => "repair:created",
            AuditAction::RepairUpdated => "repair:updated",
            AuditAction::RepairDeleted => "repair:deleted",
            AuditAction::StateChanged => "state:changed",
            AuditAction::PartAdded => "part:added",
            AuditAction::PartUpdated => "part:updated",
            AuditAction::PartDeleted => "part:deleted",
            AuditAction::FileUploaded => "file:uploaded",
            AuditAction::FileDeleted => "file:deleted",
            AuditAction::BudgetCreated => "budget:created",
            AuditAction::BudgetApproved => "budget:approved",
            AuditAction::BudgetRejected => "budget:rejected",
            AuditAction::NotificationSent => "notification:sent",
            AuditAction::UserLogin => "user:login",
            AuditAction::UserLogout => "user:logout",
            AuditAction::ConfigChanged => "system:config_changed",
            AuditAction::Cleanup => "system:cleanup",
            AuditAction::Reverted => "system:reverted",
        }
    }

    /// All actions, in declaration order. Used by the demo CLI and tests.
    pub const ALL: [AuditAction; 18] = [
        AuditAction::RepairCreated,
        AuditAction::RepairUpdated,
        AuditAction::RepairDeleted,
        AuditAction::StateChanged,
        AuditAction::PartAdded,
        AuditAction::PartUpdated,
        AuditAction::PartDeleted,
        AuditAction::FileUploaded,
        AuditAction::FileDeleted,
        AuditAction::BudgetCreated,
        AuditAction::BudgetApproved,
        AuditAction::BudgetRejected,
        AuditAction::NotificationSent,
        AuditAction::UserLogin,
        AuditAction::UserLogout,
        AuditAction::ConfigChanged,
        AuditAction::Cleanup,
        AuditAction::Reverted,
    ];
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AuditAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AuditAction::ALL
            .iter()
            .copied()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| format!("unknown audit action '{}'", s))
    }
}

/// Classification axis derived from the action's namespace prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Repair,
    State,
    Part,
    File,
    Budget,
    Notification,
    System,
}

impl Category {
    /// All categories, in declaration order. Stats are zero-filled over this set.
    pub const ALL: [Category; 7] = [
        Category::Repair,
        Category::State,
        Category::Part,
        Category::File,
        Category::Budget,
        Category::Notification,
        Category::System,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Repair => "repair",
            Category::State => "state",
            Category::Part => "part",
            Category::File => "file",
            Category::Budget => "budget",
            Category::Notification => "notification",
            Category::System => "system",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Severity of a recorded action.
///
/// The derived `Ord` follows declaration order, so the config's severity
/// floor is a plain `level < min_level` comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditLevel {
    Info,
    Warning,
    Error,
    Critical,
}

impl AuditLevel {
    pub const ALL: [AuditLevel; 4] = [
        AuditLevel::Info,
        AuditLevel::Warning,
        AuditLevel::Error,
        AuditLevel::Critical,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AuditLevel::Info => "info",
            AuditLevel::Warning => "warning",
            AuditLevel::Error => "error",
            AuditLevel::Critical => "critical",
        }
    }
}

impl fmt::Display for AuditLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AuditLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AuditLevel::ALL
            .iter()
            .copied()
            .find(|l| l.as_str() == s)
            .ok_or_else(|| format!("unknown audit level '{}'", s))
    }
}

/// The closed set of business-object kinds an entry may reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
    Repair,
    Client,
    Part,
    Budget,
    File,
    User,
}

impl EntityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::Repair => "repair",
            EntityType::Client => "client",
            EntityType::Part => "part",
            EntityType::Budget => "budget",
            EntityType::File => "file",
            EntityType::User => "user",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "repair" => Ok(EntityType::Repair),
            "client" => Ok(EntityType::Client),
            "part" => Ok(EntityType::Part),
            "budget" => Ok(EntityType::Budget),
            "file" => Ok(EntityType::File),
            "user" => Ok(EntityType::User),
            other => Err(format!("unknown entity type '{}'", other)),
        }
    }
}
