//! Tool invocation types
//!
//! Core types for the access surface: tool schemas and invocation results.

use crate::errors::SamplingError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

/// Result of one tool invocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResult {
    /// Tool name that was invoked
    pub tool: String,

    /// Structured output; for failures, the error payload
    pub output: Value,

    /// Whether invocation was successful
    pub success: bool,

    /// Error tag if failed
    pub error_kind: Option<String>,

    /// Invocation duration in milliseconds
    pub duration_ms: u64,
}

impl ToolResult {
    /// Create successful result
    pub fn success(tool: impl Into<String>, output: Value, duration: Duration) -> Self {
        Self {
            tool: tool.into(),
            output,
            success: true,
            error_kind: None,
            duration_ms: duration.as_millis() as u64,
        }
    }

    /// Create failed result carrying the error's structured payload
    pub fn failure(tool: impl Into<String>, error: &SamplingError, duration: Duration) -> Self {
        Self {
            tool: tool.into(),
            output: error.to_payload(),
            success: false,
            error_kind: Some(error.kind().to_string()),
            duration_ms: duration.as_millis() as u64,
        }
    }

    /// Output rendered as pretty JSON text
    pub fn output_text(&self) -> String {
        serde_json::to_string_pretty(&self.output).unwrap_or_else(|_| self.output.to_string())
    }
}

/// Tool schema definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolSchema {
    /// Tool name
    pub name: String,

    /// Tool description shown to the model
    pub description: String,

    /// Parameter schema (JSON Schema)
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,

    /// Whether the tool leaves session state untouched
    #[serde(skip)]
    pub read_only: bool,
}

impl ToolSchema {
    /// Create new tool schema
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        input_schema: Value,
        read_only: bool,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input_schema,
            read_only,
        }
    }
}
