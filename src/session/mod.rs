//! Session state and retrieval audit log
//!
//! Components:
//! - Session State: active persona plus the append-only retrieval log
//! - Retrieval Event: one audit record per module retrieval

pub mod event;
pub mod state;

// Re-export key types
pub use event::{module_frequency, PendingRetrieval, RetrievalEvent};
pub use state::{SessionPhase, SessionState};
