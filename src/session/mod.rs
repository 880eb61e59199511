// src/session/mod.rs — Chat sessions and the session store

pub mod storage;

use std::collections::HashMap;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use storage::SessionStorage;

/// A (word, explanation) pair highlighting a learnable term in model output.
/// Produced entirely by the gateway; the matcher only locates occurrences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    pub word: String,
    pub explanation: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Model,
}

/// One conversation turn. The four optional fields are filled in lazily on
/// user request (translate / annotate) and toggled for visibility.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub role: MessageRole,
    pub parts: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translated_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_translation: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotations: Option<Vec<Annotation>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_annotations: Option<bool>,
}

impl Message {
    pub fn user(parts: impl Into<String>) -> Self {
        Self::new(MessageRole::User, parts)
    }

    pub fn model(parts: impl Into<String>) -> Self {
        Self::new(MessageRole::Model, parts)
    }

    fn new(role: MessageRole, parts: impl Into<String>) -> Self {
        Self {
            role,
            parts: parts.into(),
            translated_text: None,
            show_translation: None,
            annotations: None,
            show_annotations: None,
        }
    }
}

pub const DEFAULT_NATIVE_LANGUAGE: &str = "English";
pub const DEFAULT_LEARNING_LANGUAGE: &str = "Japanese";

fn default_native_language() -> String {
    DEFAULT_NATIVE_LANGUAGE.to_string()
}

fn default_learning_language() -> String {
    DEFAULT_LEARNING_LANGUAGE.to_string()
}

/// A persisted conversation thread with its own language pair.
/// On-disk field names stay camelCase for compatibility with data written
/// by earlier versions of the app. Missing language fields are backfilled
/// with defaults on load.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatSession {
    pub id: String,
    pub name: String,
    pub messages: Vec<Message>,
    /// Creation time in milliseconds since the epoch.
    pub created_at: i64,
    #[serde(default = "default_native_language")]
    pub native_language: String,
    #[serde(default = "default_learning_language")]
    pub learning_language: String,
}

impl ChatSession {
    fn new(name: String, native_language: String, learning_language: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            messages: Vec::new(),
            created_at: Utc::now().timestamp_millis(),
            native_language,
            learning_language,
        }
    }
}

/// Token tying an in-flight gateway call to the store state it started
/// from. A completion holding a superseded token must be discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestToken {
    session_id: String,
    seq: u64,
}

/// Owns the session collection and the active-session pointer. Every
/// mutation persists through the injected storage adapter; storage failures
/// are logged and never surfaced (the in-memory state stays authoritative).
pub struct SessionStore {
    sessions: Vec<ChatSession>,
    active_id: Option<String>,
    storage: Box<dyn SessionStorage>,
    request_seqs: HashMap<String, u64>,
}

impl SessionStore {
    /// Load persisted state and resolve the active session. An absent or
    /// corrupt collection, or an unresolvable active id, ends with one
    /// fresh default session — the store is never empty.
    pub fn open(storage: Box<dyn SessionStorage>) -> Self {
        let sessions = storage.load_sessions();
        let active_id = storage.load_active_id();

        let mut store = Self {
            sessions,
            active_id: None,
            storage,
            request_seqs: HashMap::new(),
        };

        match active_id {
            Some(id) if store.sessions.iter().any(|s| s.id == id) => {
                store.active_id = Some(id);
            }
            _ => store.initialize_default_session(),
        }
        store
    }

    pub fn sessions(&self) -> &[ChatSession] {
        &self.sessions
    }

    pub fn active_session(&self) -> Option<&ChatSession> {
        let id = self.active_id.as_deref()?;
        self.sessions.iter().find(|s| s.id == id)
    }

    /// Append a new session with an empty message sequence and make it
    /// active. The name is derived from the current session count.
    pub fn create_session(
        &mut self,
        native_language: Option<String>,
        learning_language: Option<String>,
    ) -> &ChatSession {
        let name = format!("Session {}", self.sessions.len() + 1);
        let session = ChatSession::new(
            name,
            native_language.unwrap_or_else(default_native_language),
            learning_language.unwrap_or_else(default_learning_language),
        );
        let id = session.id.clone();
        self.sessions.push(session);
        self.persist();
        self.set_active(id);
        self.sessions.last().unwrap()
    }

    /// Activate the session with the given id. Silent no-op if not found.
    pub fn load_session(&mut self, session_id: &str) {
        if self.sessions.iter().any(|s| s.id == session_id) {
            self.set_active(session_id.to_string());
        }
    }

    /// Replace the active session's message sequence, in both the
    /// collection and the active reference.
    pub fn update_current_session_messages(&mut self, messages: Vec<Message>) {
        let Some(active_id) = self.active_id.clone() else {
            return;
        };
        if let Some(session) = self.sessions.iter_mut().find(|s| s.id == active_id) {
            session.messages = messages;
            self.persist();
        }
    }

    /// Update the language pair on a session by id.
    pub fn update_session_languages(
        &mut self,
        session_id: &str,
        native_language: &str,
        learning_language: &str,
    ) {
        if let Some(session) = self.sessions.iter_mut().find(|s| s.id == session_id) {
            session.native_language = native_language.to_string();
            session.learning_language = learning_language.to_string();
            self.persist();
        }
    }

    /// Remove a session. Deleting the active session activates the most
    /// recently created survivor, or synthesizes a fresh default session
    /// when none remain.
    pub fn delete_session(&mut self, session_id: &str) {
        if !self.sessions.iter().any(|s| s.id == session_id) {
            return;
        }

        let was_active = self.active_id.as_deref() == Some(session_id);
        self.sessions.retain(|s| s.id != session_id);
        self.request_seqs.remove(session_id);

        if was_active {
            match self.sessions.iter().max_by_key(|s| s.created_at) {
                Some(most_recent) => {
                    let id = most_recent.id.clone();
                    self.persist();
                    self.set_active(id);
                }
                None => self.initialize_default_session(),
            }
        } else {
            self.persist();
        }
    }

    /// Start a gateway call for a session; supersedes any earlier token
    /// for the same session.
    pub fn begin_request(&mut self, session_id: &str) -> RequestToken {
        let seq = self.request_seqs.entry(session_id.to_string()).or_insert(0);
        *seq += 1;
        RequestToken {
            session_id: session_id.to_string(),
            seq: *seq,
        }
    }

    /// Whether a token still represents the latest request for its session.
    pub fn is_current(&self, token: &RequestToken) -> bool {
        self.request_seqs.get(&token.session_id) == Some(&token.seq)
    }

    fn initialize_default_session(&mut self) {
        let session = ChatSession::new(
            "Session 1".into(),
            default_native_language(),
            default_learning_language(),
        );
        let id = session.id.clone();
        self.sessions = vec![session];
        self.persist();
        self.set_active(id);
    }

    fn set_active(&mut self, id: String) {
        self.active_id = Some(id.clone());
        if let Err(e) = self.storage.save_active_id(&id) {
            tracing::warn!("failed to persist active session id: {e}");
        }
    }

    fn persist(&mut self) {
        if let Err(e) = self.storage.save_sessions(&self.sessions) {
            tracing::warn!("failed to persist sessions: {e}");
        }
    }
}
