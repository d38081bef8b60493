//! Reference collaborator implementations.
//!
//! `MemoryStore` backs tests, `FileStore` backs the demo CLI across
//! restarts, and the `Static*` types stand in for the host application's
//! identity and environment collaborators.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Mutex;

use rotortrace_contracts::entry::Actor;
use rotortrace_contracts::error::{AuditError, AuditResult};
use rotortrace_core::{DurableStore, EnvironmentProbe, IdentityProvider};

// ── MemoryStore ───────────────────────────────────────────────────────────────

/// A `DurableStore` that forgets everything on drop. Test use only.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DurableStore for MemoryStore {
    fn get(&self, key: &str) -> AuditResult<Option<String>> {
        let entries = self.entries.lock().map_err(|e| AuditError::StorageRead {
            reason: format!("memory store lock poisoned: {}", e),
        })?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> AuditResult<()> {
        let mut entries = self.entries.lock().map_err(|e| AuditError::StorageWrite {
            reason: format!("memory store lock poisoned: {}", e),
        })?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

// ── FileStore ─────────────────────────────────────────────────────────────────

/// A `DurableStore` keeping all keys in one JSON file.
///
/// Every `set` rewrites the whole file; adequate for the single-owner
/// caller model this core is designed for.
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read_map(&self) -> AuditResult<BTreeMap<String, String>> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => {
                return Err(AuditError::StorageRead {
                    reason: format!("failed to read '{}': {}", self.path.display(), e),
                });
            }
        };
        serde_json::from_str(&contents).map_err(|e| AuditError::StorageRead {
            reason: format!("store file '{}' is corrupt: {}", self.path.display(), e),
        })
    }
}

impl DurableStore for FileStore {
    fn get(&self, key: &str) -> AuditResult<Option<String>> {
        Ok(self.read_map()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> AuditResult<()> {
        // A corrupt file loses unrelated keys here; the alternative is
        // refusing every future write, which is worse for an audit sink.
        let mut map = self.read_map().unwrap_or_default();
        map.insert(key.to_string(), value.to_string());

        let blob = serde_json::to_string_pretty(&map).map_err(|e| AuditError::StorageWrite {
            reason: format!("failed to serialize store file: {}", e),
        })?;
        std::fs::write(&self.path, blob).map_err(|e| AuditError::StorageWrite {
            reason: format!("failed to write '{}': {}", self.path.display(), e),
        })
    }
}

// ── Static collaborators ──────────────────────────────────────────────────────

/// An `IdentityProvider` that always answers with one fixed actor.
pub struct StaticIdentity {
    actor: Actor,
}

impl StaticIdentity {
    pub fn new(
        user_id: impl Into<String>,
        user_name: impl Into<String>,
        user_role: impl Into<String>,
    ) -> Self {
        Self {
            actor: Actor {
                user_id: user_id.into(),
                user_name: user_name.into(),
                user_role: user_role.into(),
            },
        }
    }
}

impl IdentityProvider for StaticIdentity {
    fn current_actor(&self) -> AuditResult<Actor> {
        Ok(self.actor.clone())
    }
}

/// An `EnvironmentProbe` that always reports one fixed client string.
pub struct StaticEnvironment {
    user_agent: String,
}

impl StaticEnvironment {
    pub fn new(user_agent: impl Into<String>) -> Self {
        Self {
            user_agent: user_agent.into(),
        }
    }
}

impl EnvironmentProbe for StaticEnvironment {
    fn user_agent(&self) -> Option<String> {
        Some(self.user_agent.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_round_trips() {
        let store = MemoryStore::new();
        assert_eq!(store.get("k").unwrap(), None);

        store.set("k", "v1").unwrap();
        assert_eq!(store.get("k").unwrap(), Some("v1".to_string()));

        store.set("k", "v2").unwrap();
        assert_eq!(store.get("k").unwrap(), Some("v2".to_string()));
    }

    #[test]
    fn file_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audit.json");

        {
            let store = FileStore::new(&path);
            store.set("a", "1").unwrap();
            store.set("b", "2").unwrap();
        }

        let reopened = FileStore::new(&path);
        assert_eq!(reopened.get("a").unwrap(), Some("1".to_string()));
        assert_eq!(reopened.get("b").unwrap(), Some("2".to_string()));
        assert_eq!(reopened.get("c").unwrap(), None);
    }

    #[test]
    fn file_store_missing_file_reads_as_absent() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("never-written.json"));
        assert_eq!(store.get("k").unwrap(), None);
    }
}
