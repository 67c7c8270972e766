//! Durable storage for cached provider sessions.
//!
//! This module provides:
//! - `CredentialStore`: the storage seam injected into the authenticator
//!   and the session cache manager
//! - `FileCredentialStore`: a single JSON file keyed by account id
//! - `MemoryCredentialStore`: an in-process store for tests and embedding
//!
//! Whole-mapping reads and writes mirror the on-disk format. Updates go
//! through `upsert`, which each implementation serializes so concurrent
//! logins for different accounts cannot drop each other's records.

pub mod file;

use std::sync::{Mutex, MutexGuard};

use anyhow::Result;
use indexmap::IndexMap;

use crate::auth::SessionRecord;

pub use file::FileCredentialStore;

/// Account id -> last known session for that account, in first-login order
pub type SessionMap = IndexMap<String, SessionRecord>;

pub trait CredentialStore: Send + Sync {
    /// Read every stored record. A store that does not exist yet is empty.
    fn load(&self) -> Result<SessionMap>;

    /// Replace the stored mapping with `sessions`.
    fn save(&self, sessions: &SessionMap) -> Result<()>;

    /// Insert or overwrite the record for `account_id`, leaving every other
    /// account untouched.
    fn upsert(&self, account_id: &str, record: SessionRecord) -> Result<()>;

    /// Record for a single account, if any
    fn get(&self, account_id: &str) -> Result<Option<SessionRecord>> {
        Ok(self.load()?.swap_remove(account_id))
    }
}

#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    sessions: Mutex<SessionMap>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sessions(sessions: SessionMap) -> Self {
        Self {
            sessions: Mutex::new(sessions),
        }
    }

    fn lock(&self) -> MutexGuard<'_, SessionMap> {
        // A panic mid-update cannot leave the map half-written
        self.sessions.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn load(&self) -> Result<SessionMap> {
        Ok(self.lock().clone())
    }

    fn save(&self, sessions: &SessionMap) -> Result<()> {
        *self.lock() = sessions.clone();
        Ok(())
    }

    fn upsert(&self, account_id: &str, record: SessionRecord) -> Result<()> {
        self.lock().insert(account_id.to_string(), record);
        Ok(())
    }
}
