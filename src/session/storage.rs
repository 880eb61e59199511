// src/session/storage.rs — Persistence adapters for the session store
//
// The store persists two things: the full session collection (one JSON
// array file) and the active session's id (one plain string file). Writes
// are atomic (temp file + rename). Corrupt or unparsable stored data is
// treated as absent; the store recovers by synthesizing a default session.

use std::io::Write;
use std::path::PathBuf;

use super::ChatSession;
use crate::infra::paths;

pub trait SessionStorage: Send {
    /// Load the persisted collection. Absent or corrupt data yields an
    /// empty collection, never an error.
    fn load_sessions(&self) -> Vec<ChatSession>;

    fn save_sessions(&mut self, sessions: &[ChatSession]) -> anyhow::Result<()>;

    fn load_active_id(&self) -> Option<String>;

    fn save_active_id(&mut self, id: &str) -> anyhow::Result<()>;
}

/// File-backed storage under the app data directory.
pub struct JsonFileStorage {
    sessions_path: PathBuf,
    active_id_path: PathBuf,
}

impl JsonFileStorage {
    /// Storage at the default data-directory locations.
    pub fn new() -> Self {
        Self {
            sessions_path: paths::sessions_file(),
            active_id_path: paths::active_session_file(),
        }
    }

    pub fn at(sessions_path: PathBuf, active_id_path: PathBuf) -> Self {
        Self {
            sessions_path,
            active_id_path,
        }
    }

    /// Atomic write: temp file in the same directory, then rename.
    fn write_atomic(path: &PathBuf, content: &[u8]) -> anyhow::Result<()> {
        let dir = path
            .parent()
            .ok_or_else(|| anyhow::anyhow!("storage path has no parent directory"))?;
        std::fs::create_dir_all(dir)?;

        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("storage");
        let tmp = dir.join(format!(".{file_name}.tmp"));

        let mut f = std::fs::File::create(&tmp)?;
        f.write_all(content)?;
        f.flush()?;
        f.sync_all()?;
        std::fs::rename(&tmp, path)?;
        Ok(())
    }
}

impl Default for JsonFileStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStorage for JsonFileStorage {
    fn load_sessions(&self) -> Vec<ChatSession> {
        let content = match std::fs::read_to_string(&self.sessions_path) {
            Ok(c) => c,
            Err(_) => return Vec::new(),
        };
        match serde_json::from_str(&content) {
            Ok(sessions) => sessions,
            Err(e) => {
                tracing::warn!("discarding corrupt session data: {e}");
                Vec::new()
            }
        }
    }

    fn save_sessions(&mut self, sessions: &[ChatSession]) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(sessions)?;
        Self::write_atomic(&self.sessions_path, json.as_bytes())
    }

    fn load_active_id(&self) -> Option<String> {
        let id = std::fs::read_to_string(&self.active_id_path).ok()?;
        let id = id.trim();
        if id.is_empty() {
            None
        } else {
            Some(id.to_string())
        }
    }

    fn save_active_id(&mut self, id: &str) -> anyhow::Result<()> {
        Self::write_atomic(&self.active_id_path, id.as_bytes())
    }
}

/// In-memory storage for tests.
#[derive(Default)]
pub struct MemoryStorage {
    pub sessions: Vec<ChatSession>,
    pub active_id: Option<String>,
}

impl SessionStorage for MemoryStorage {
    fn load_sessions(&self) -> Vec<ChatSession> {
        self.sessions.clone()
    }

    fn save_sessions(&mut self, sessions: &[ChatSession]) -> anyhow::Result<()> {
        self.sessions = sessions.to_vec();
        Ok(())
    }

    fn load_active_id(&self) -> Option<String> {
        self.active_id.clone()
    }

    fn save_active_id(&mut self, id: &str) -> anyhow::Result<()> {
        self.active_id = Some(id.to_string());
        Ok(())
    }
}
