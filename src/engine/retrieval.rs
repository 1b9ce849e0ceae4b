//! Selective retrieval engine
//!
//! Orchestrates the catalogs and the session: validates every request,
//! extracts only the named modules from the active persona, and appends one
//! audit event per successful retrieval.
//!
//! # Flow of `get_modules`
//! 1. Require an active persona
//! 2. Reject the whole request if any name is not canonical
//! 3. Resolve each name against the persona (missing = absent, not an error)
//! 4. Append the event, then return content plus the sequence number

use crate::catalog::{
    PersonaCatalog, PersonaRecord, PersonaSummary, RuleCatalog, SkillCatalog, SkillTemplate,
};
use crate::engine::types::{
    ActivationResult, ClearLogResult, FrameworkStatus, ModuleOutcome, ModuleSchema,
    RenderedRule, RetrievalLogReport, RetrievalResult, RetrievalStatus, RulesStatus,
    SkillsStatus,
};
use crate::errors::{Result, SamplingError};
use crate::session::{module_frequency, PendingRetrieval, SessionState};
use crate::types::ModuleName;
use chrono::Utc;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use tracing::{debug, info};

/// Retrieval engine shared by every access-surface action
#[derive(Debug, Clone)]
pub struct RetrievalEngine {
    personas: Arc<PersonaCatalog>,
    skills: Arc<SkillCatalog>,
    rules: Arc<RuleCatalog>,
    session: Arc<SessionState>,
}

impl RetrievalEngine {
    /// Create engine over pre-loaded catalogs and a session
    pub fn new(
        personas: Arc<PersonaCatalog>,
        skills: Arc<SkillCatalog>,
        rules: Arc<RuleCatalog>,
        session: Arc<SessionState>,
    ) -> Self {
        Self {
            personas,
            skills,
            rules,
            session,
        }
    }

    pub fn personas(&self) -> &PersonaCatalog {
        &self.personas
    }

    pub fn skills(&self) -> &SkillCatalog {
        &self.skills
    }

    pub fn rules(&self) -> &RuleCatalog {
        &self.rules
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    /// Discovery listing, sorted by id
    pub fn list_personas(&self) -> Vec<PersonaSummary> {
        self.personas.list()
    }

    /// Activate a persona by id
    ///
    /// Activation sets identity only; it is not a data access and is not logged
    /// as a retrieval.
    pub fn set_active_persona(&self, id: &str) -> Result<ActivationResult> {
        let persona = self.personas.get(id)?;
        let previous_persona_id = self.session.set_active_persona(persona);

        Ok(ActivationResult {
            status: "active".to_string(),
            persona_id: persona.id.clone(),
            name: persona.name.clone(),
            identity_anchor: identity_anchor(persona),
            available_modules: ModuleName::canonical_names(),
            persona_modules: persona.module_names(),
            previous_persona_id,
        })
    }

    /// The active persona's record
    pub fn get_active_persona(&self) -> Result<&PersonaRecord> {
        let id = self
            .session
            .active_persona_id()
            .ok_or(SamplingError::NoActivePersona)?;
        self.personas.get(&id)
    }

    /// Selectively retrieve modules for the active persona
    pub fn get_modules(
        &self,
        requested: &[String],
        question_context: Option<&str>,
    ) -> Result<RetrievalResult> {
        let persona = self.get_active_persona()?;

        if requested.is_empty() {
            return Err(SamplingError::InvalidArguments {
                tool: "get_persona_modules".to_string(),
                reason: format!(
                    "request at least one module. Valid modules are: {}",
                    ModuleName::canonical_names().join(", ")
                ),
            });
        }

        let modules = validate_module_names(requested)?;

        if requested.len() > ModuleName::ALL.len() {
            return Err(SamplingError::InvalidArguments {
                tool: "get_persona_modules".to_string(),
                reason: format!(
                    "request at most {} module names, got {}",
                    ModuleName::ALL.len(),
                    requested.len()
                ),
            });
        }

        let mut data = BTreeMap::new();
        let mut resolved_modules = BTreeSet::new();
        let mut absent_modules = BTreeSet::new();

        for module in modules {
            let outcome = match persona.module(module) {
                Some(content) => {
                    resolved_modules.insert(module);
                    ModuleOutcome::Resolved {
                        content: content.clone(),
                    }
                }
                None => {
                    absent_modules.insert(module);
                    ModuleOutcome::absent()
                }
            };
            data.insert(module, outcome);
        }

        let question_context = question_context
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        let sequence_number = self.session.append_event(PendingRetrieval {
            persona_id: persona.id.clone(),
            requested_modules: requested.to_vec(),
            resolved_modules: resolved_modules.clone(),
            absent_modules: absent_modules.clone(),
            question_context: question_context.clone(),
            timestamp: Utc::now(),
        });

        info!(
            sequence_number,
            persona_id = %persona.id,
            requested = ?requested,
            resolved = resolved_modules.len(),
            absent = absent_modules.len(),
            question_context = question_context.as_deref().unwrap_or(""),
            "Modules retrieved"
        );

        Ok(RetrievalResult {
            sequence_number,
            persona_id: persona.id.clone(),
            requested_modules: requested.to_vec(),
            resolved_modules,
            absent_modules,
            data,
        })
    }

    /// Look up a skill; needs no active persona and is never logged
    pub fn get_skill(&self, name: &str) -> Result<&SkillTemplate> {
        let skill = self.skills.get(name)?;
        debug!(skill = %name, "Skill loaded");
        Ok(skill)
    }

    /// Render a rule template for the active persona; not logged as a retrieval
    pub fn get_rule(&self, name: &str) -> Result<RenderedRule> {
        let persona = self.get_active_persona()?;
        let rule = self.rules.get(name)?;

        Ok(RenderedRule {
            rule_name: rule.name.clone(),
            persona_id: persona.id.clone(),
            rendered_rule: rule.render(persona),
        })
    }

    /// Snapshot of the retrieval log
    pub fn retrieval_log(&self) -> RetrievalLogReport {
        let events = self.session.get_log();
        RetrievalLogReport {
            total_retrievals: events.len(),
            module_frequency: module_frequency(&events),
            session_retrievals: events,
        }
    }

    /// Empty the retrieval log; the active persona is untouched
    pub fn clear_retrieval_log(&self) -> ClearLogResult {
        let cleared = self.session.clear_log();
        ClearLogResult {
            cleared,
            log_length: self.session.log_len(),
        }
    }

    /// Diagnostic snapshot with no side effects
    pub fn status(&self) -> FrameworkStatus {
        let active_persona = self.session.active_persona_id();

        FrameworkStatus {
            session_id: self.session.session_id(),
            started_at: self.session.started_at(),
            rules: RulesStatus {
                persona_loaded: active_persona.is_some(),
                active_persona,
                available_rule_templates: self.rules.list(),
            },
            skills: SkillsStatus {
                available: self.skills.list(),
                count: self.skills.len(),
            },
            retrieval: RetrievalStatus {
                personas_in_database: self.personas.len(),
                available_modules: ModuleName::canonical_names(),
                retrievals_this_session: self.session.log_len(),
            },
        }
    }

    /// Descriptions of the canonical modules
    pub fn module_schema(&self) -> ModuleSchema {
        ModuleSchema::canonical()
    }
}

/// Parse every requested name, or fail listing each distinct invalid one
///
/// Returned modules are distinct, in first-requested order.
pub fn validate_module_names(requested: &[String]) -> Result<Vec<ModuleName>> {
    let mut modules = Vec::with_capacity(requested.len());
    let mut invalid: Vec<String> = Vec::new();

    for name in requested {
        match name.parse::<ModuleName>() {
            Ok(module) => {
                if !modules.contains(&module) {
                    modules.push(module);
                }
            }
            Err(bad) => {
                if !invalid.contains(&bad) {
                    invalid.push(bad);
                }
            }
        }
    }

    if invalid.is_empty() {
        Ok(modules)
    } else {
        Err(SamplingError::InvalidModuleName {
            invalid,
            valid: ModuleName::canonical_names(),
        })
    }
}

/// "You are Maria, a 45-year-old woman living in Dayton, Ohio. ..."
fn identity_anchor(persona: &PersonaRecord) -> String {
    let name = persona
        .demographic("name")
        .unwrap_or_else(|| persona.name.clone());
    let age = persona.demographic("age").unwrap_or_else(|| "?".to_string());
    let gender = persona
        .demographic("gender")
        .unwrap_or_else(|| "person".to_string());
    let city = persona.demographic("city").unwrap_or_else(|| "?".to_string());
    let state = persona.demographic("state").unwrap_or_else(|| "?".to_string());

    format!(
        "You are {}, a {}-year-old {} living in {}, {}. \
         Answer survey questions naturally, as you would in a real telephone survey.",
        name, age, gender, city, state
    )
}
