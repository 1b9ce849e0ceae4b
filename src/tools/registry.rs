//! Tool registry with JSON schemas
//!
//! Maintains registry of the actions exposed to the model.
//!
//! Tools:
//! - list_personas: Discover available respondents
//! - set_active_persona: Establish the identity anchor
//! - get_persona_modules: Selective module retrieval (logged)
//! - get_survey_skill: Load a reasoning procedure
//! - get_rule: Render a rule template for the active persona
//! - get_retrieval_log: Inspect the audit trail
//! - clear_retrieval_log: Reset the audit trail
//! - get_framework_status: Diagnostic snapshot
//! - get_module_schema: Describe the seven modules

use crate::catalog::{DEFAULT_RULE, DEFAULT_SKILL};
use crate::tools::types::ToolSchema;
use crate::types::ModuleName;
use serde_json::json;
use std::collections::BTreeMap;

/// Tool registry
#[derive(Debug, Clone)]
pub struct ToolRegistry {
    /// Map of tool name to schema
    tools: BTreeMap<String, ToolSchema>,
}

impl ToolRegistry {
    /// Create new tool registry with all tools
    pub fn new() -> Self {
        let mut registry = Self {
            tools: BTreeMap::new(),
        };

        registry.register_list_personas();
        registry.register_set_active_persona();
        registry.register_get_persona_modules();
        registry.register_get_survey_skill();
        registry.register_get_rule();
        registry.register_get_retrieval_log();
        registry.register_clear_retrieval_log();
        registry.register_get_framework_status();
        registry.register_get_module_schema();

        registry
    }

    fn register(&mut self, schema: ToolSchema) {
        self.tools.insert(schema.name.clone(), schema);
    }

    fn register_list_personas(&mut self) {
        self.register(ToolSchema::new(
            "list_personas",
            "List all available personas with their id, name and a brief demographic summary. \
             Use this to choose which persona to activate before a survey simulation.",
            json!({ "type": "object", "properties": {} }),
            true,
        ));
    }

    fn register_set_active_persona(&mut self) {
        self.register(ToolSchema::new(
            "set_active_persona",
            "Set the active persona for this session. Must be called before \
             get_persona_modules; it establishes which respondent you are simulating.",
            json!({
                "type": "object",
                "properties": {
                    "persona_id": {
                        "type": "string",
                        "description": "Id of the persona to activate (from list_personas)"
                    }
                },
                "required": ["persona_id"]
            }),
            false,
        ));
    }

    fn register_get_persona_modules(&mut self) {
        self.register(ToolSchema::new(
            "get_persona_modules",
            "Selectively retrieve specific modules of the active persona. Before answering a \
             survey question, decide which modules are relevant and retrieve only those. \
             Every call is recorded in the retrieval log.",
            json!({
                "type": "object",
                "properties": {
                    "modules": {
                        "type": "array",
                        "items": {
                            "type": "string",
                            "enum": ModuleName::canonical_names()
                        },
                        "minItems": 1,
                        "maxItems": 7,
                        "description": "Module names to retrieve"
                    },
                    "question_context": {
                        "type": "string",
                        "description": "Brief description of the survey question being answered",
                        "default": ""
                    }
                },
                "required": ["modules"]
            }),
            false,
        ));
    }

    fn register_get_survey_skill(&mut self) {
        self.register(ToolSchema::new(
            "get_survey_skill",
            "Load a survey response skill: a structured reasoning procedure for a class of \
             questions (e.g. general, sensitive, attitudinal).",
            json!({
                "type": "object",
                "properties": {
                    "skill_type": {
                        "type": "string",
                        "description": "Name of the skill to load",
                        "default": DEFAULT_SKILL
                    }
                }
            }),
            true,
        ));
    }

    fn register_get_rule(&mut self) {
        self.register(ToolSchema::new(
            "get_rule",
            "Load a rule template rendered with the active persona's demographics. Rules set \
             the identity anchor and response-style constraints.",
            json!({
                "type": "object",
                "properties": {
                    "rule_name": {
                        "type": "string",
                        "description": "Name of the rule to render",
                        "default": DEFAULT_RULE
                    }
                }
            }),
            true,
        ));
    }

    fn register_get_retrieval_log(&mut self) {
        self.register(ToolSchema::new(
            "get_retrieval_log",
            "Get every module retrieval made in this session, in order, with per-module \
             request counts.",
            json!({ "type": "object", "properties": {} }),
            true,
        ));
    }

    fn register_clear_retrieval_log(&mut self) {
        self.register(ToolSchema::new(
            "clear_retrieval_log",
            "Clear the retrieval log. Call between experimental conditions. The active \
             persona is kept.",
            json!({ "type": "object", "properties": {} }),
            false,
        ));
    }

    fn register_get_framework_status(&mut self) {
        self.register(ToolSchema::new(
            "get_framework_status",
            "Report the state of the rules, skills and retrieval layers: active persona, \
             catalogued skills and personas, and the number of retrievals so far.",
            json!({ "type": "object", "properties": {} }),
            true,
        ));
    }

    fn register_get_module_schema(&mut self) {
        self.register(ToolSchema::new(
            "get_module_schema",
            "Describe the seven persona modules and what each one contains.",
            json!({ "type": "object", "properties": {} }),
            true,
        ));
    }

    /// Get tool schema by name
    pub fn get(&self, name: &str) -> Option<&ToolSchema> {
        self.tools.get(name)
    }

    /// Check if tool exists
    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Get all tool names, sorted
    pub fn tool_names(&self) -> Vec<String> {
        self.tools.keys().cloned().collect()
    }

    /// Get all tool schemas, sorted by name
    pub fn schemas(&self) -> Vec<&ToolSchema> {
        self.tools.values().collect()
    }

    /// Get names of tools that never mutate the session
    pub fn read_only_tools(&self) -> Vec<String> {
        self.tools
            .iter()
            .filter(|(_, schema)| schema.read_only)
            .map(|(name, _)| name.clone())
            .collect()
    }

    /// Get total number of tools
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Check if registry is empty
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_creation() {
        let registry = ToolRegistry::new();
        assert_eq!(registry.len(), 9);
        assert!(!registry.is_empty());
    }

    #[test]
    fn test_access_surface_actions_registered() {
        let registry = ToolRegistry::new();

        for name in [
            "list_personas",
            "set_active_persona",
            "get_persona_modules",
            "get_survey_skill",
            "get_retrieval_log",
            "clear_retrieval_log",
            "get_framework_status",
        ] {
            assert!(registry.contains(name), "missing tool {}", name);
        }
        assert!(registry.contains("get_rule"));
        assert!(registry.contains("get_module_schema"));
    }

    #[test]
    fn test_read_only_tools() {
        let registry = ToolRegistry::new();
        let read_only = registry.read_only_tools();

        assert_eq!(read_only.len(), 6);
        assert!(!read_only.contains(&"set_active_persona".to_string()));
        assert!(!read_only.contains(&"get_persona_modules".to_string()));
        assert!(!read_only.contains(&"clear_retrieval_log".to_string()));
    }

    #[test]
    fn test_module_schema_enumerates_canonical_names() {
        let registry = ToolRegistry::new();
        let schema = registry.get("get_persona_modules").unwrap();
        let names = &schema.input_schema["properties"]["modules"]["items"]["enum"];
        assert_eq!(names.as_array().unwrap().len(), 7);
        assert_eq!(schema.input_schema["properties"]["modules"]["minItems"], 1);
        assert_eq!(schema.input_schema["properties"]["modules"]["maxItems"], 7);
        assert_eq!(schema.input_schema["required"][0], "modules");
    }

    #[test]
    fn test_schemas_have_descriptions() {
        let registry = ToolRegistry::new();
        for schema in registry.schemas() {
            assert!(!schema.name.is_empty());
            assert!(!schema.description.is_empty());
            assert_eq!(schema.input_schema["type"], "object");
        }
    }

    #[test]
    fn test_nonexistent_tool() {
        let registry = ToolRegistry::new();
        assert!(!registry.contains("read_file"));
        assert!(registry.get("read_file").is_none());
    }
}
