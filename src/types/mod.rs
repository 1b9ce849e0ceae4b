//! Type definitions module
//!
//! Core types shared by the catalogs, the session and the retrieval engine.

pub mod module;

// Re-export commonly used types
pub use module::{ModuleContent, ModuleName};
