//! Access surface
//!
//! Exposes the retrieval engine as named, independently invocable tools:
//! - Registry: tool names, descriptions and JSON input schemas
//! - Runtime: argument decoding and dispatch to the engine
//! - Types: invocation results and schemas

pub mod registry;
pub mod runtime;
pub mod types;

// Re-export commonly used types
pub use registry::ToolRegistry;
pub use runtime::ToolRuntime;
pub use types::{ToolResult, ToolSchema};
