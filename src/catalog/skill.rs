//! Skill catalog
//!
//! Named reasoning-procedure templates ("general", "sensitive",
//! "attitudinal", ...). One text or markdown file per skill; the file stem
//! is the skill name.

use crate::catalog::loader::{self, CatalogEntry, RawEntry};
use crate::errors::{Result, SamplingError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::info;

/// File extensions recognised as skill templates
pub const SKILL_EXTENSIONS: &[&str] = &["txt", "md"];

/// Skill used when the caller does not name one
pub const DEFAULT_SKILL: &str = "general";

/// A named reasoning procedure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillTemplate {
    pub name: String,
    pub body: String,
}

impl SkillTemplate {
    pub fn new(name: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            body: body.into(),
        }
    }

    /// Parse a skill file; empty bodies are rejected
    pub fn from_file(stem: &str, contents: &str) -> std::result::Result<Self, String> {
        if stem.is_empty() {
            return Err("skill file has no name".to_string());
        }
        if contents.trim().is_empty() {
            return Err("skill file is empty".to_string());
        }
        Ok(Self::new(stem, contents))
    }
}

impl CatalogEntry for SkillTemplate {
    fn key(&self) -> &str {
        &self.name
    }
}

/// Name-keyed skill index, immutable after construction
#[derive(Debug, Clone, Default)]
pub struct SkillCatalog {
    skills: BTreeMap<String, SkillTemplate>,
}

impl SkillCatalog {
    /// Load every skill file in `dir`
    pub fn load(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        let entries = loader::load_entries(dir, SKILL_EXTENSIONS, SkillTemplate::from_file)?;
        let catalog = Self::from_entries(entries);
        info!(dir = %dir.display(), skills = catalog.len(), "Skill catalog loaded");
        Ok(catalog)
    }

    pub fn from_entries(entries: Vec<RawEntry<SkillTemplate>>) -> Self {
        Self {
            skills: loader::index_entries("skill", entries),
        }
    }

    pub fn from_templates(templates: impl IntoIterator<Item = SkillTemplate>) -> Self {
        let entries = templates
            .into_iter()
            .map(|t| RawEntry::ok(format!("<memory:{}>", t.name), t))
            .collect();
        Self::from_entries(entries)
    }

    /// Look up a skill by name
    pub fn get(&self, name: &str) -> Result<&SkillTemplate> {
        self.skills
            .get(name)
            .ok_or_else(|| SamplingError::SkillNotFound {
                name: name.to_string(),
                available: self.list(),
            })
    }

    /// Skill names, sorted
    pub fn list(&self) -> Vec<String> {
        self.skills.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.skills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_load_txt_and_md() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("general.txt"), "1. Read the question.").unwrap();
        fs::write(temp.path().join("sensitive.md"), "# Sensitive topics").unwrap();
        fs::write(temp.path().join("empty.txt"), "   \n").unwrap();
        fs::write(temp.path().join("data.json"), "{}").unwrap();

        let catalog = SkillCatalog::load(temp.path()).unwrap();
        assert_eq!(catalog.list(), vec!["general", "sensitive"]);
        assert_eq!(catalog.get("general").unwrap().body, "1. Read the question.");
    }

    #[test]
    fn test_get_unknown_lists_available() {
        let catalog = SkillCatalog::from_templates(vec![
            SkillTemplate::new("general", "g"),
            SkillTemplate::new("attitudinal", "a"),
        ]);
        match catalog.get("likert") {
            Err(SamplingError::SkillNotFound { name, available }) => {
                assert_eq!(name, "likert");
                assert_eq!(available, vec!["attitudinal", "general"]);
            }
            other => panic!("unexpected: {:?}", other),
        }
    }
}
