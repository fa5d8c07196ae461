//! Process-wide session store.
//!
//! Backed by [`DashMap`], so independent conversations can be served from one
//! process without a global lock.  A turn works on an owned copy of its
//! session: [`SessionStore::checkout`] hands out a clone (creating the
//! session on first use) and [`SessionStore::commit`] writes it back.  A turn
//! that fails simply never commits, which leaves the stored session exactly
//! as it was.
//!
//! # Example
//!
//! ```rust
//! # use nutribot_store::SessionStore;
//! let store = SessionStore::new();
//! let mut session = store.checkout("alice");
//! session.update_context("greeted", serde_json::json!(true));
//! store.commit(session);
//!
//! assert!(store.get("alice").unwrap().get_context("greeted").is_some());
//! ```

use std::sync::Arc;

use dashmap::DashMap;
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::session::{Session, SessionSummary};

/// Concurrent map of session id to [`Session`].
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    inner: Arc<DashMap<String, Session>>,
}

impl SessionStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(DashMap::new()),
        }
    }

    /// Create a session with a generated id and return that id.
    pub fn create(&self) -> String {
        let session = Session::new();
        let id = session.session_id.clone();
        self.inner.insert(id.clone(), session);
        id
    }

    /// Return a working copy of the session, creating it on first use.
    pub fn checkout(&self, session_id: &str) -> Session {
        self.inner
            .entry(session_id.to_string())
            .or_insert_with(|| Session::with_id(session_id))
            .clone()
    }

    /// Replace the stored session with `session`.
    pub fn commit(&self, session: Session) {
        debug!(
            session_id = %session.session_id,
            journey = ?session.current_journey,
            step = ?session.current_step,
            "session committed"
        );
        self.inner.insert(session.session_id.clone(), session);
    }

    /// Snapshot of an existing session.
    pub fn get(&self, session_id: &str) -> StoreResult<Session> {
        self.inner
            .get(session_id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| StoreError::NotFound {
                entity: "session",
                id: session_id.to_string(),
            })
    }

    /// Summary of an existing session.
    pub fn summary(&self, session_id: &str) -> StoreResult<SessionSummary> {
        self.inner
            .get(session_id)
            .map(|entry| entry.value().summary())
            .ok_or_else(|| StoreError::NotFound {
                entity: "session",
                id: session_id.to_string(),
            })
    }

    /// Drop a session.  Returns it if it existed.
    pub fn remove(&self, session_id: &str) -> Option<Session> {
        debug!(session_id = %session_id, "session removed");
        self.inner.remove(session_id).map(|(_, session)| session)
    }

    /// Number of live sessions.
    pub fn count(&self) -> usize {
        self.inner.len()
    }
}
