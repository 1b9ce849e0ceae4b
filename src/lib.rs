//! Silicon Sampling - selective persona retrieval
//!
//! Serves survey personas to an LLM caller one module at a time, so each
//! answer is grounded only in the information the question needs, and every
//! access is recorded in an ordered retrieval log.
//!
//! # Architecture
//!
//! - **catalog**: read-only persona, skill and rule catalogs loaded at startup
//! - **session**: active persona and the append-only retrieval log
//! - **engine**: activation, module retrieval, rule rendering, status
//! - **tools**: named actions with JSON argument schemas
//! - **server**: JSON-RPC 2.0 over stdio

pub mod errors;
pub mod types;

pub mod catalog;
pub mod engine;
pub mod session;

pub mod bootstrap;
pub mod cli;
pub mod logging;
pub mod server;
pub mod tools;

// Re-export commonly used types
pub use bootstrap::Bootstrap;
pub use catalog::{PersonaCatalog, PersonaRecord, RuleCatalog, SkillCatalog};
pub use engine::{RetrievalEngine, RetrievalResult};
pub use errors::{Result, SamplingError};
pub use session::{RetrievalEvent, SessionState};
pub use tools::{ToolRegistry, ToolRuntime};
pub use types::ModuleName;
