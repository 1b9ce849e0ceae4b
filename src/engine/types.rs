//! Result types returned by the retrieval engine

use crate::session::RetrievalEvent;
use crate::types::{ModuleContent, ModuleName};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use uuid::Uuid;

/// Note attached to a canonical module the active persona does not carry
pub const ABSENT_MODULE_NOTE: &str = "Module exists but has no data for this persona.";

/// Outcome for one requested module
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ModuleOutcome {
    /// The persona carries this module
    Resolved { content: ModuleContent },

    /// Valid module name, but no data for this persona
    Absent { note: String },
}

impl ModuleOutcome {
    pub fn absent() -> Self {
        ModuleOutcome::Absent {
            note: ABSENT_MODULE_NOTE.to_string(),
        }
    }

    pub fn content(&self) -> Option<&ModuleContent> {
        match self {
            ModuleOutcome::Resolved { content } => Some(content),
            ModuleOutcome::Absent { .. } => None,
        }
    }
}

/// Result of a selective module retrieval
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievalResult {
    /// Position of the logged event
    pub sequence_number: u64,
    pub persona_id: String,
    pub requested_modules: Vec<String>,
    pub resolved_modules: BTreeSet<ModuleName>,
    pub absent_modules: BTreeSet<ModuleName>,

    /// One entry per distinct requested module; modules never requested do not appear
    pub data: BTreeMap<ModuleName, ModuleOutcome>,
}

impl RetrievalResult {
    /// Returned content for `module`, if it was requested and resolved
    pub fn content(&self, module: ModuleName) -> Option<&ModuleContent> {
        self.data.get(&module).and_then(ModuleOutcome::content)
    }
}

/// Confirmation returned by persona activation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivationResult {
    pub status: String,
    pub persona_id: String,
    pub name: String,

    /// One-sentence identity the model should adopt
    pub identity_anchor: String,

    /// Every canonical module name
    pub available_modules: Vec<String>,

    /// Modules this persona actually carries
    pub persona_modules: Vec<ModuleName>,

    pub previous_persona_id: Option<String>,
}

/// Rule template rendered for the active persona
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedRule {
    pub rule_name: String,
    pub persona_id: String,
    pub rendered_rule: String,
}

/// Retrieval log with per-module request counts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievalLogReport {
    pub session_retrievals: Vec<RetrievalEvent>,
    pub total_retrievals: usize,
    pub module_frequency: BTreeMap<String, usize>,
}

/// Confirmation of a log reset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClearLogResult {
    pub cleared: usize,
    pub log_length: usize,
}

/// Rules layer: identity anchor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RulesStatus {
    pub active_persona: Option<String>,
    pub persona_loaded: bool,
    pub available_rule_templates: Vec<String>,
}

/// Skills layer: reasoning procedures
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillsStatus {
    pub available: Vec<String>,
    pub count: usize,
}

/// Retrieval layer: persona modules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievalStatus {
    pub personas_in_database: usize,
    pub available_modules: Vec<String>,
    pub retrievals_this_session: usize,
}

/// Side-effect-free diagnostic snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameworkStatus {
    pub session_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub rules: RulesStatus,
    pub skills: SkillsStatus,
    pub retrieval: RetrievalStatus,
}

/// One canonical module and what it holds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleDescriptor {
    pub name: String,
    pub description: String,
}

/// Persona database schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleSchema {
    pub description: String,
    pub modules: Vec<ModuleDescriptor>,
    pub design_principles: Vec<String>,
}

impl ModuleSchema {
    /// Schema of the seven canonical modules
    pub fn canonical() -> Self {
        Self {
            description: "Modular persona database schema for silicon sampling".to_string(),
            modules: ModuleName::ALL
                .iter()
                .map(|m| ModuleDescriptor {
                    name: m.as_str().to_string(),
                    description: m.description().to_string(),
                })
                .collect(),
            design_principles: [
                "Each module is self-contained and can be retrieved independently",
                "Modules map to distinct domains of survey questions",
                "Granularity allows the model to perform selective retrieval per question",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        }
    }
}
