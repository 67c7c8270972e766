use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing::debug;

use super::{CredentialStore, SessionMap};
use crate::auth::SessionRecord;

/// Default location of the session file, relative to the working directory
pub const DEFAULT_STORE_PATH: &str = "./config/login_info.json";

/// Distinguishes temp files of store instances sharing a path in one process
static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Sessions persisted as one pretty-printed JSON object keyed by account id.
pub struct FileCredentialStore {
    path: PathBuf,
    /// Held across read-modify-write so in-process writers never interleave
    write_lock: Mutex<()>,
}

impl FileCredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Sibling file the new contents are written to before the rename
    fn temp_path(&self) -> PathBuf {
        let name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "sessions".to_string());
        self.path
            .with_file_name(format!(
                ".{}.{}-{}.tmp",
                name,
                std::process::id(),
                TEMP_COUNTER.fetch_add(1, Ordering::Relaxed)
            ))
    }

    fn read(&self) -> Result<SessionMap> {
        if !self.path.exists() {
            return Ok(SessionMap::new());
        }

        let contents = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read session store: {}", self.path.display()))?;
        if contents.trim().is_empty() {
            return Ok(SessionMap::new());
        }

        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse session store: {}", self.path.display()))
    }

    fn write(&self, sessions: &SessionMap) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create session store directory: {}", parent.display())
                })?;
            }
        }

        let contents = serde_json::to_string_pretty(sessions)?;
        let temp = self.temp_path();
        let written = std::fs::write(&temp, contents)
            .with_context(|| format!("Failed to write session store: {}", temp.display()))
            .and_then(|()| {
                std::fs::rename(&temp, &self.path).with_context(|| {
                    format!("Failed to replace session store: {}", self.path.display())
                })
            });
        if let Err(e) = written {
            // A partial temp file is never read; drop it so retries don't pile up
            if let Err(cleanup) = std::fs::remove_file(&temp) {
                debug!(path = %temp.display(), error = %cleanup, "Temp file not removed");
            }
            return Err(e);
        }

        debug!(path = %self.path.display(), accounts = sessions.len(), "Session store written");
        Ok(())
    }
}

impl CredentialStore for FileCredentialStore {
    fn load(&self) -> Result<SessionMap> {
        self.read()
    }

    fn save(&self, sessions: &SessionMap) -> Result<()> {
        let _guard = self.write_lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        self.write(sessions)
    }

    fn upsert(&self, account_id: &str, record: SessionRecord) -> Result<()> {
        let _guard = self.write_lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let mut sessions = self.read()?;
        sessions.insert(account_id.to_string(), record);
        self.write(&sessions)
    }
}

// ============================================================================
// Tests
// ============================================================================
