//! Error types for the silicon sampling server
//!
//! Every error the engine can return is recoverable once the catalogs are
//! loaded. Errors carry the identifiers a caller needs to self-correct, and
//! `to_payload` renders them as structured JSON for the access surface.

use serde_json::{json, Value};
use thiserror::Error;

/// Main error type for catalog loading, session handling and retrieval
#[derive(Error, Debug)]
pub enum SamplingError {
    /// A catalog directory could not be read at startup
    #[error("Failed to load catalog from {path}: {reason}")]
    CatalogLoad { path: String, reason: String },

    /// Requested persona id is not in the catalog
    #[error("Persona '{id}' not found. Available personas: {}", .available.join(", "))]
    PersonaNotFound { id: String, available: Vec<String> },

    /// Requested skill is not in the catalog
    #[error("Skill '{name}' not found. Available skills: {}", .available.join(", "))]
    SkillNotFound { name: String, available: Vec<String> },

    /// Requested rule template is not in the catalog
    #[error("Rule '{name}' not found. Available rules: {}", .available.join(", "))]
    RuleNotFound { name: String, available: Vec<String> },

    /// Retrieval attempted before a persona was activated
    #[error("No active persona. Call set_active_persona first.")]
    NoActivePersona,

    /// One or more requested module names are not canonical
    #[error("Invalid module(s): {}. Valid modules are: {}", .invalid.join(", "), .valid.join(", "))]
    InvalidModuleName { invalid: Vec<String>, valid: Vec<String> },

    /// Tool arguments did not match the tool's input schema
    #[error("Invalid arguments for {tool}: {reason}")]
    InvalidArguments { tool: String, reason: String },

    /// Tool name is not registered
    #[error("Unknown tool '{name}'. Available tools: {}", .available.join(", "))]
    UnknownTool { name: String, available: Vec<String> },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// Generic errors with context
    #[error("{0}")]
    Generic(String),
}

/// Result type alias for sampling operations
pub type Result<T> = std::result::Result<T, SamplingError>;

impl SamplingError {
    /// Stable snake_case tag for the error variant
    pub fn kind(&self) -> &'static str {
        match self {
            SamplingError::CatalogLoad { .. } => "catalog_load",
            SamplingError::PersonaNotFound { .. } => "persona_not_found",
            SamplingError::SkillNotFound { .. } => "skill_not_found",
            SamplingError::RuleNotFound { .. } => "rule_not_found",
            SamplingError::NoActivePersona => "no_active_persona",
            SamplingError::InvalidModuleName { .. } => "invalid_module_name",
            SamplingError::InvalidArguments { .. } => "invalid_arguments",
            SamplingError::UnknownTool { .. } => "unknown_tool",
            SamplingError::ConfigError(_) => "config",
            SamplingError::IoError(_) => "io",
            SamplingError::SerializationError(_) => "serialization",
            SamplingError::Generic(_) => "generic",
        }
    }

    /// Whether the caller can fix the request and retry
    pub fn is_recoverable(&self) -> bool {
        !matches!(
            self,
            SamplingError::CatalogLoad { .. } | SamplingError::ConfigError(_)
        )
    }

    /// Structured JSON rendering, including the hints a caller needs to retry
    pub fn to_payload(&self) -> Value {
        let mut payload = json!({
            "error": self.to_string(),
            "kind": self.kind(),
        });

        let hints = match self {
            SamplingError::PersonaNotFound { available, .. } => {
                Some(json!({ "available_personas": available }))
            }
            SamplingError::SkillNotFound { available, .. } => {
                Some(json!({ "available_skills": available }))
            }
            SamplingError::RuleNotFound { available, .. } => {
                Some(json!({ "available_rules": available }))
            }
            SamplingError::InvalidModuleName { invalid, valid } => Some(json!({
                "invalid_modules": invalid,
                "valid_modules": valid,
            })),
            SamplingError::UnknownTool { available, .. } => {
                Some(json!({ "available_tools": available }))
            }
            SamplingError::NoActivePersona => Some(json!({
                "hint": "Call list_personas, then set_active_persona with one of the returned ids.",
            })),
            _ => None,
        };

        if let (Some(Value::Object(extra)), Value::Object(map)) = (hints, &mut payload) {
            map.extend(extra);
        }

        payload
    }
}

/// Convert anyhow errors to SamplingError
impl From<anyhow::Error> for SamplingError {
    fn from(err: anyhow::Error) -> Self {
        SamplingError::Generic(err.to_string())
    }
}
