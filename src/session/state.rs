//! Session state: the active persona and the retrieval log
//!
//! This is the only mutable state in the server. All mutation goes through
//! one mutex, so concurrent appenders always receive distinct, consecutive
//! sequence numbers in append order. One session is shared by every caller
//! of the process; there is no per-client isolation.

use crate::catalog::PersonaRecord;
use crate::session::event::{PendingRetrieval, RetrievalEvent};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::info;
use uuid::Uuid;

/// Session lifecycle
///
/// Uninitialized → Active(p) on the first successful activation, then
/// Active(p) → Active(q) on every later one. There is no terminal state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SessionPhase {
    Uninitialized,
    Active { persona_id: String },
}

impl SessionPhase {
    /// Whether module retrieval is permitted
    pub fn allows_retrieval(&self) -> bool {
        matches!(self, SessionPhase::Active { .. })
    }
}

#[derive(Debug, Default)]
struct SessionInner {
    active_persona_id: Option<String>,
    log: Vec<RetrievalEvent>,
}

/// Process-wide session
#[derive(Debug)]
pub struct SessionState {
    inner: Mutex<SessionInner>,
    session_id: Uuid,
    started_at: DateTime<Utc>,
}

impl SessionState {
    /// Create an empty session
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(SessionInner::default()),
            session_id: Uuid::new_v4(),
            started_at: Utc::now(),
        }
    }

    // Every critical section leaves the state consistent, so a poisoned
    // lock is still safe to use.
    fn lock(&self) -> MutexGuard<'_, SessionInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Make `persona` the active identity
    ///
    /// Takes a catalog record rather than a bare id so the active id always
    /// resolves. Returns the previously active id, if any.
    pub fn set_active_persona(&self, persona: &PersonaRecord) -> Option<String> {
        let previous = self.lock().active_persona_id.replace(persona.id.clone());
        info!(
            persona_id = %persona.id,
            previous = previous.as_deref().unwrap_or("<none>"),
            "Active persona set"
        );
        previous
    }

    pub fn active_persona_id(&self) -> Option<String> {
        self.lock().active_persona_id.clone()
    }

    pub fn phase(&self) -> SessionPhase {
        match self.active_persona_id() {
            Some(persona_id) => SessionPhase::Active { persona_id },
            None => SessionPhase::Uninitialized,
        }
    }

    /// Append an event, assigning the next sequence number under the lock
    pub fn append_event(&self, pending: PendingRetrieval) -> u64 {
        let mut inner = self.lock();
        let sequence_number = inner.log.len() as u64 + 1;
        inner.log.push(pending.into_event(sequence_number));
        sequence_number
    }

    /// Read-only snapshot of the log, in append order
    pub fn get_log(&self) -> Vec<RetrievalEvent> {
        self.lock().log.clone()
    }

    pub fn log_len(&self) -> usize {
        self.lock().log.len()
    }

    /// Empty the log, keeping the active persona; returns how many events were dropped
    pub fn clear_log(&self) -> usize {
        let mut inner = self.lock();
        let dropped = inner.log.len();
        inner.log.clear();
        info!(dropped, "Retrieval log cleared");
        dropped
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}
