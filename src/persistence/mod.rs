//! Session state persistence with SQLite backend.
//!
//! Hosts that round-trip [`SessionState`] through their own storage can skip
//! this module entirely; hosts that want the engine side to own durability
//! between turns get the [`SessionStore`] trait and a file-based SQLite
//! implementation keyed by conversation id.

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::Mutex;

use crate::state::SessionState;

/// Abstract session state persistence.
///
/// State is appended after every lifecycle mutation; loading returns the
/// most recent snapshot for the conversation.
pub trait SessionStore: Send + Sync + std::fmt::Debug {
    /// Initialize the persistence backend (create tables, indexes, etc.).
    fn init_db(&self) -> Result<(), anyhow::Error>;

    /// Persist the state for a conversation after a lifecycle mutation.
    fn save_state(
        &self,
        conversation_id: &str,
        state: &SessionState,
    ) -> Result<(), anyhow::Error>;

    /// Load the most recent state for a conversation, or `None` if the
    /// conversation has no persisted state yet.
    fn load_state(&self, conversation_id: &str) -> Result<Option<SessionState>, anyhow::Error>;
}

/// SQLite-based implementation of session state persistence.
///
/// The connection sits behind a mutex so hosts whose lifecycle calls can
/// overlap (retries, reconnects) cannot interleave writes for the same
/// conversation.
#[derive(Debug)]
pub struct SqliteSessionStore {
    /// Path to the SQLite database file.
    pub db_path: String,
    conn: Mutex<Connection>,
}

impl SqliteSessionStore {
    /// Open (or create) a store at `db_path`.
    ///
    /// # Arguments
    ///
    /// * `db_path` - Optional path to the SQLite database file. If `None`,
    ///   uses `stage_sessions.db` in the current directory.
    pub fn new(db_path: Option<String>) -> Result<Self, anyhow::Error> {
        let path = db_path.unwrap_or_else(|| "stage_sessions.db".to_string());

        // Ensure parent directory exists.
        if let Some(parent) = Path::new(&path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(&path)?;
        let store = Self {
            db_path: path,
            conn: Mutex::new(conn),
        };
        store.init_db()?;
        Ok(store)
    }
}

impl SessionStore for SqliteSessionStore {
    fn init_db(&self) -> Result<(), anyhow::Error> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| anyhow::anyhow!("failed to acquire database lock: {}", e))?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS session_states (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                conversation_id TEXT NOT NULL,
                timestamp DATETIME NOT NULL,
                state_json TEXT NOT NULL
            )",
            [],
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_session_states_conversation
             ON session_states(conversation_id)",
            [],
        )?;

        Ok(())
    }

    fn save_state(
        &self,
        conversation_id: &str,
        state: &SessionState,
    ) -> Result<(), anyhow::Error> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| anyhow::anyhow!("failed to acquire database lock: {}", e))?;

        let state_json = serde_json::to_string(state)?;
        let now = Utc::now().to_rfc3339();

        conn.execute(
            "INSERT INTO session_states (conversation_id, timestamp, state_json)
             VALUES (?1, ?2, ?3)",
            params![conversation_id, now, state_json],
        )?;

        log::debug!(
            "persisted state for conversation {} ({} bytes)",
            conversation_id,
            state_json.len(),
        );
        Ok(())
    }

    fn load_state(&self, conversation_id: &str) -> Result<Option<SessionState>, anyhow::Error> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| anyhow::anyhow!("failed to acquire database lock: {}", e))?;

        let state_json: Option<String> = conn
            .query_row(
                "SELECT state_json FROM session_states
                 WHERE conversation_id = ?1
                 ORDER BY id DESC LIMIT 1",
                params![conversation_id],
                |row| row.get(0),
            )
            .optional()?;

        match state_json {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }
}
