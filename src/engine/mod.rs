//! Retrieval engine
//!
//! The orchestrator between the read-only catalogs and the mutable session.

pub mod retrieval;
pub mod types;

pub use retrieval::{validate_module_names, RetrievalEngine};
pub use types::{
    ActivationResult, ClearLogResult, FrameworkStatus, ModuleOutcome, ModuleSchema,
    RenderedRule, RetrievalLogReport, RetrievalResult,
};
