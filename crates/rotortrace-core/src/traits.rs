//! Trait definitions for the audit core's external collaborators.
//!
//! Three seams separate the core from the host application:
//!
//! - `IdentityProvider`: who is acting (queried at append time)
//! - `DurableStore`:     where the ledger and config persist
//! - `EnvironmentProbe`: what client is calling (optional capture)
//!
//! The audit service takes these at construction, so multiple independent
//! instances can coexist (tests, per-tenant services) without hidden
//! process-wide state.

use rotortrace_contracts::entry::Actor;
use rotortrace_contracts::error::AuditResult;

/// Supplies the current actor's identity at append time.
///
/// The identity is captured by value into the entry; later renames or role
/// changes never rewrite history. If the provider cannot answer, append
/// fails with `IdentityUnavailable` rather than recording a blank actor.
pub trait IdentityProvider: Send + Sync {
    /// Resolve the actor performing the current operation.
    fn current_actor(&self) -> AuditResult<Actor>;
}

/// Key-value persistence surface for the ledger and the config.
///
/// One fixed key holds the whole ledger blob, another the config blob.
/// Implementations must make `set` durable before returning; the core
/// never retries a failed write.
pub trait DurableStore: Send + Sync {
    /// Read the blob stored under `key`, or `None` when absent.
    fn get(&self, key: &str) -> AuditResult<Option<String>>;

    /// Durably overwrite the blob stored under `key`.
    fn set(&self, key: &str, value: &str) -> AuditResult<()>;
}

/// Describes the calling client.
///
/// Consulted only when the config's `include_system_info` flag is on.
pub trait EnvironmentProbe: Send + Sync {
    /// A user-agent style string for the calling client, if known.
    fn user_agent(&self) -> Option<String>;
}
