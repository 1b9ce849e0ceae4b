//! Startup wiring
//!
//! Loads the catalogs named by the configuration, builds the engine and the
//! tool runtime, and hands back a protocol handler ready to serve.

use crate::catalog::{PersonaCatalog, RuleCatalog, SkillCatalog};
use crate::cli::Config;
use crate::engine::RetrievalEngine;
use crate::errors::Result;
use crate::server::{ProtocolHandler, ServerInfo};
use crate::session::SessionState;
use crate::tools::ToolRuntime;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

/// Loaded catalogs plus a fresh session
#[derive(Debug, Clone)]
pub struct Bootstrap {
    engine: RetrievalEngine,
    info: ServerInfo,
}

impl Bootstrap {
    /// Load every catalog the configuration points at
    ///
    /// Personas and skills are required: an inaccessible directory aborts
    /// startup. The rules directory is optional and yields an empty catalog
    /// when it does not exist.
    pub fn from_config(config: &Config) -> Result<Self> {
        let personas = PersonaCatalog::load(config.personas_dir())?;
        let skills = SkillCatalog::load(config.skills_dir())?;
        let rules = load_optional_rules(&config.rules_dir())?;

        if personas.is_empty() {
            warn!(dir = %config.personas_dir().display(), "No personas loaded");
        }

        info!(
            personas = personas.len(),
            skills = skills.len(),
            rules = rules.len(),
            "Catalogs ready"
        );

        let engine = RetrievalEngine::new(
            Arc::new(personas),
            Arc::new(skills),
            Arc::new(rules),
            Arc::new(SessionState::new()),
        );

        Ok(Self {
            engine,
            info: ServerInfo {
                name: config.server.name.clone(),
                version: config.server.version.clone(),
                instructions: config.server.instructions.clone(),
            },
        })
    }

    pub fn engine(&self) -> &RetrievalEngine {
        &self.engine
    }

    pub fn server_info(&self) -> &ServerInfo {
        &self.info
    }

    /// Tool runtime over the loaded engine
    pub fn runtime(&self) -> ToolRuntime {
        ToolRuntime::new(self.engine.clone())
    }

    /// Protocol handler over the loaded engine
    pub fn handler(&self) -> ProtocolHandler {
        ProtocolHandler::new(self.runtime(), self.info.clone())
    }
}

fn load_optional_rules(dir: &Path) -> Result<RuleCatalog> {
    if !dir.exists() {
        warn!(dir = %dir.display(), "Rules directory not found, get_rule will have no templates");
        return Ok(RuleCatalog::default());
    }
    RuleCatalog::load(dir)
}
