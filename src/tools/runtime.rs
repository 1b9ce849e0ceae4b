//! Tool runtime coordinator
//!
//! Thin pass-through from named actions to the retrieval engine. Arguments
//! are validated against each tool's parameters, and every engine error is
//! turned into a structured, unsuccessful `ToolResult` instead of aborting.

use crate::catalog::{DEFAULT_RULE, DEFAULT_SKILL};
use crate::engine::RetrievalEngine;
use crate::errors::{Result, SamplingError};
use crate::tools::registry::ToolRegistry;
use crate::tools::types::ToolResult;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Instant;
use tracing::{debug, warn};

#[derive(Debug, Deserialize)]
struct SetActivePersonaArgs {
    persona_id: String,
}

#[derive(Debug, Deserialize)]
struct GetPersonaModulesArgs {
    modules: Vec<String>,
    #[serde(default)]
    question_context: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GetSurveySkillArgs {
    #[serde(default = "default_skill", alias = "skill_name", alias = "name")]
    skill_type: String,
}

#[derive(Debug, Deserialize)]
struct GetRuleArgs {
    #[serde(default = "default_rule", alias = "name")]
    rule_name: String,
}

fn default_skill() -> String {
    DEFAULT_SKILL.to_string()
}

fn default_rule() -> String {
    DEFAULT_RULE.to_string()
}

/// Tool runtime coordinator
#[derive(Debug, Clone)]
pub struct ToolRuntime {
    engine: RetrievalEngine,
    registry: ToolRegistry,
}

impl ToolRuntime {
    /// Create new tool runtime over an engine
    pub fn new(engine: RetrievalEngine) -> Self {
        Self {
            engine,
            registry: ToolRegistry::new(),
        }
    }

    /// Invoke a tool and wrap the outcome
    ///
    /// This is the entry point used by the transport and the CLI.
    ///
    /// # Flow
    /// 1. Validate tool exists in registry
    /// 2. Decode arguments
    /// 3. Dispatch to the engine
    /// 4. Success → JSON output, error → structured error payload
    pub fn execute(&self, tool: &str, args: &Value) -> ToolResult {
        let start = Instant::now();

        match self.invoke(tool, args) {
            Ok(output) => {
                debug!(tool, duration_us = start.elapsed().as_micros() as u64, "Tool succeeded");
                ToolResult::success(tool, output, start.elapsed())
            }
            Err(err) => {
                warn!(tool, kind = err.kind(), error = %err, "Tool failed");
                ToolResult::failure(tool, &err, start.elapsed())
            }
        }
    }

    /// Invoke a tool, returning the raw engine outcome
    pub fn invoke(&self, tool: &str, args: &Value) -> Result<Value> {
        if !self.registry.contains(tool) {
            return Err(SamplingError::UnknownTool {
                name: tool.to_string(),
                available: self.registry.tool_names(),
            });
        }

        match tool {
            "list_personas" => {
                let personas = self.engine.list_personas();
                let empty = personas.is_empty();
                let mut output = json!({
                    "count": personas.len(),
                    "personas": personas,
                });
                if empty {
                    output["note"] =
                        json!("No personas found. Add JSON files to the personas directory.");
                }
                Ok(output)
            }
            "set_active_persona" => {
                let args: SetActivePersonaArgs = decode(tool, args)?;
                to_value(self.engine.set_active_persona(args.persona_id.trim())?)
            }
            "get_persona_modules" => {
                let args: GetPersonaModulesArgs = decode(tool, args)?;
                to_value(
                    self.engine
                        .get_modules(&args.modules, args.question_context.as_deref())?,
                )
            }
            "get_survey_skill" => {
                let args: GetSurveySkillArgs = decode(tool, args)?;
                let skill = self.engine.get_skill(&args.skill_type)?;
                Ok(json!({
                    "skill_type": skill.name,
                    "instructions": skill.body,
                }))
            }
            "get_rule" => {
                let args: GetRuleArgs = decode(tool, args)?;
                to_value(self.engine.get_rule(&args.rule_name)?)
            }
            "get_retrieval_log" => to_value(self.engine.retrieval_log()),
            "clear_retrieval_log" => {
                let cleared = self.engine.clear_retrieval_log();
                Ok(json!({
                    "status": "Retrieval log cleared.",
                    "cleared": cleared.cleared,
                    "log_length": cleared.log_length,
                }))
            }
            "get_framework_status" => to_value(self.engine.status()),
            "get_module_schema" => to_value(self.engine.module_schema()),
            _ => Err(SamplingError::UnknownTool {
                name: tool.to_string(),
                available: self.registry.tool_names(),
            }),
        }
    }

    /// Get tool registry
    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Get the engine behind the tools
    pub fn engine(&self) -> &RetrievalEngine {
        &self.engine
    }

    /// Get all tool names
    pub fn tool_names(&self) -> Vec<String> {
        self.registry.tool_names()
    }

    /// Check if tool exists
    pub fn has_tool(&self, name: &str) -> bool {
        self.registry.contains(name)
    }
}

/// Decode tool arguments; a missing or null argument object means "no arguments"
fn decode<T: DeserializeOwned>(tool: &str, args: &Value) -> Result<T> {
    let args = match args {
        Value::Null => json!({}),
        other => other.clone(),
    };
    serde_json::from_value(args).map_err(|e| SamplingError::InvalidArguments {
        tool: tool.to_string(),
        reason: e.to_string(),
    })
}

fn to_value<T: serde::Serialize>(value: T) -> Result<Value> {
    Ok(serde_json::to_value(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{
        PersonaCatalog, PersonaRecord, RuleCatalog, SkillCatalog, SkillTemplate,
    };
    use crate::session::SessionState;
    use crate::types::ModuleName;
    use std::sync::Arc;

    fn setup_runtime() -> ToolRuntime {
        let personas = PersonaCatalog::from_records(vec![PersonaRecord::new("p1", "Maria")
            .with_module(ModuleName::Demographics, json!({"age": 45}))
            .with_module(ModuleName::Health, json!({"insurance": "medicaid"}))]);
        let skills = SkillCatalog::from_templates(vec![
            SkillTemplate::new("general", "Step 1."),
            SkillTemplate::new("sensitive", "Be honest."),
        ]);
        let engine = RetrievalEngine::new(
            Arc::new(personas),
            Arc::new(skills),
            Arc::new(RuleCatalog::default()),
            Arc::new(SessionState::new()),
        );
        ToolRuntime::new(engine)
    }

    #[test]
    fn test_runtime_creation() {
        let runtime = setup_runtime();
        assert_eq!(runtime.tool_names().len(), 9);
        assert!(runtime.has_tool("get_persona_modules"));
        assert!(!runtime.has_tool("write_file"));
    }

    #[test]
    fn test_unknown_tool() {
        let runtime = setup_runtime();
        let result = runtime.execute("write_file", &json!({}));
        assert!(!result.success);
        assert_eq!(result.error_kind.as_deref(), Some("unknown_tool"));
        assert_eq!(result.output["available_tools"].as_array().unwrap().len(), 9);
    }

    #[test]
    fn test_list_personas() {
        let runtime = setup_runtime();
        let result = runtime.execute("list_personas", &Value::Null);
        assert!(result.success);
        assert_eq!(result.output["count"], 1);
        assert_eq!(result.output["personas"][0]["id"], "p1");
        assert_eq!(result.output["personas"][0]["summary"], "45-year-old");
    }

    #[test]
    fn test_set_active_then_retrieve() {
        let runtime = setup_runtime();

        let activated = runtime.execute("set_active_persona", &json!({"persona_id": "p1"}));
        assert!(activated.success);
        assert_eq!(activated.output["name"], "Maria");

        let result = runtime.execute(
            "get_persona_modules",
            &json!({"modules": ["health", "economy"], "question_context": "ACA support"}),
        );
        assert!(result.success);
        assert_eq!(result.output["sequence_number"], 1);
        assert_eq!(result.output["data"]["health"]["status"], "resolved");
        assert_eq!(
            result.output["data"]["health"]["content"],
            json!({"insurance": "medicaid"})
        );
        assert_eq!(result.output["data"]["economy"]["status"], "absent");
        assert_eq!(result.output["absent_modules"], json!(["economy"]));
    }

    #[test]
    fn test_invalid_arguments() {
        let runtime = setup_runtime();
        runtime.execute("set_active_persona", &json!({"persona_id": "p1"}));

        let result = runtime.execute("get_persona_modules", &json!({"modules": "health"}));
        assert!(!result.success);
        assert_eq!(result.error_kind.as_deref(), Some("invalid_arguments"));

        let result = runtime.execute("set_active_persona", &json!({}));
        assert_eq!(result.error_kind.as_deref(), Some("invalid_arguments"));
    }

    #[test]
    fn test_invalid_module_payload_lists_names() {
        let runtime = setup_runtime();
        runtime.execute("set_active_persona", &json!({"persona_id": "p1"}));
        let result = runtime.execute(
            "get_persona_modules",
            &json!({"modules": ["health", "income"]}),
        );
        assert!(!result.success);
        assert_eq!(result.output["invalid_modules"], json!(["income"]));
        assert_eq!(result.output["valid_modules"].as_array().unwrap().len(), 7);
    }

    #[test]
    fn test_skill_defaults_and_aliases() {
        let runtime = setup_runtime();
        let result = runtime.execute("get_survey_skill", &json!({}));
        assert_eq!(result.output["skill_type"], "general");

        let result = runtime.execute("get_survey_skill", &json!({"name": "sensitive"}));
        assert_eq!(result.output["instructions"], "Be honest.");

        let result = runtime.execute("get_survey_skill", &json!({"skill_type": "likert"}));
        assert_eq!(result.error_kind.as_deref(), Some("skill_not_found"));
        assert_eq!(
            result.output["available_skills"],
            json!(["general", "sensitive"])
        );
    }

    #[test]
    fn test_clear_and_status() {
        let runtime = setup_runtime();
        runtime.execute("set_active_persona", &json!({"persona_id": "p1"}));
        runtime.execute("get_persona_modules", &json!({"modules": ["health"]}));

        let status = runtime.execute("get_framework_status", &json!({}));
        assert_eq!(status.output["retrieval"]["retrievals_this_session"], 1);

        let cleared = runtime.execute("clear_retrieval_log", &json!({}));
        assert_eq!(cleared.output["cleared"], 1);
        assert_eq!(cleared.output["log_length"], 0);

        let status = runtime.execute("get_framework_status", &json!({}));
        assert_eq!(status.output["rules"]["active_persona"], "p1");
    }

    #[test]
    fn test_get_rule_without_templates() {
        let runtime = setup_runtime();
        runtime.execute("set_active_persona", &json!({"persona_id": "p1"}));
        let result = runtime.execute("get_rule", &json!({}));
        assert_eq!(result.error_kind.as_deref(), Some("rule_not_found"));
    }
}
