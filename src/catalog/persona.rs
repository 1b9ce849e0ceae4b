//! Persona catalog
//!
//! Read-only index of synthetic survey respondents, built once at startup
//! from a directory of JSON files (one respondent per file).

use crate::catalog::loader::{self, CatalogEntry, RawEntry};
use crate::errors::{Result, SamplingError};
use crate::types::{ModuleContent, ModuleName};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info};

/// File extensions recognised as persona records
pub const PERSONA_EXTENSIONS: &[&str] = &["json"];

/// Top-level keys that describe the record rather than a module
const METADATA_KEYS: &[&str] = &["id", "name", "persona_id"];

/// One synthetic respondent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonaRecord {
    pub id: String,
    pub name: String,
    modules: BTreeMap<ModuleName, ModuleContent>,
}

/// Discovery view of a persona
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonaSummary {
    pub id: String,
    pub name: String,
    pub summary: String,
}

impl PersonaRecord {
    /// Create a persona with no modules
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            modules: BTreeMap::new(),
        }
    }

    /// Attach a module (builder style); null content leaves it absent
    pub fn with_module(mut self, module: ModuleName, content: ModuleContent) -> Self {
        if !content.is_null() {
            self.modules.insert(module, content);
        }
        self
    }

    /// Parse a persona file
    ///
    /// The id is the declared `id` (or `persona_id`), falling back to the file
    /// stem. The name is the declared `name`, then `demographics.name`.
    pub fn from_json(stem: &str, contents: &str) -> std::result::Result<Self, String> {
        let value: Value =
            serde_json::from_str(contents).map_err(|e| format!("invalid JSON: {}", e))?;

        let object = match value {
            Value::Object(object) => object,
            other => {
                return Err(format!(
                    "expected a JSON object at the top level, found {}",
                    json_type_name(&other)
                ))
            }
        };

        let declared = |key: &str| {
            object
                .get(key)
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };

        let id = declared("id")
            .or_else(|| declared("persona_id"))
            .unwrap_or_else(|| stem.to_string());
        if id.is_empty() {
            return Err("persona has no id and no usable file name".to_string());
        }

        let mut modules = BTreeMap::new();
        for (key, content) in &object {
            if METADATA_KEYS.contains(&key.as_str()) {
                continue;
            }
            match key.parse::<ModuleName>() {
                // null carries no data; the module is absent
                Ok(_) if content.is_null() => {
                    debug!(persona = %id, module = %key, "Null module treated as absent")
                }
                Ok(module) => {
                    modules.insert(module, content.clone());
                }
                Err(_) => debug!(persona = %id, key = %key, "Ignoring non-module key"),
            }
        }

        let name = declared("name")
            .or_else(|| {
                modules
                    .get(&ModuleName::Demographics)
                    .and_then(|d| d.get("name"))
                    .and_then(Value::as_str)
                    .map(str::to_string)
            })
            .unwrap_or_else(|| "Unknown".to_string());

        Ok(Self { id, name, modules })
    }

    /// Content of one module, if this persona carries it
    pub fn module(&self, module: ModuleName) -> Option<&ModuleContent> {
        self.modules.get(&module)
    }

    /// Whether this persona carries the module
    pub fn has_module(&self, module: ModuleName) -> bool {
        self.modules.contains_key(&module)
    }

    /// Modules present on this persona, in canonical order
    pub fn module_names(&self) -> Vec<ModuleName> {
        self.modules.keys().copied().collect()
    }

    /// A demographics field rendered as plain text
    pub fn demographic(&self, field: &str) -> Option<String> {
        self.modules
            .get(&ModuleName::Demographics)
            .and_then(|d| d.get(field))
            .and_then(display_scalar)
    }

    /// Short descriptive line for discovery listings
    ///
    /// e.g. "45-year-old woman, Ohio, Bachelor's degree, Democrat"
    pub fn summary(&self) -> String {
        let mut parts = Vec::new();

        match (self.demographic("age"), self.demographic("gender")) {
            (Some(age), Some(gender)) => parts.push(format!("{}-year-old {}", age, gender)),
            (Some(age), None) => parts.push(format!("{}-year-old", age)),
            (None, Some(gender)) => parts.push(gender),
            (None, None) => {}
        }
        parts.extend(self.demographic("state"));
        parts.extend(self.demographic("education"));
        parts.extend(
            self.module(ModuleName::Politics)
                .and_then(|p| p.get("party_identification"))
                .and_then(display_scalar),
        );

        if parts.is_empty() {
            "No demographic details".to_string()
        } else {
            parts.join(", ")
        }
    }

    /// Discovery view
    pub fn to_summary(&self) -> PersonaSummary {
        PersonaSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            summary: self.summary(),
        }
    }
}

impl CatalogEntry for PersonaRecord {
    fn key(&self) -> &str {
        &self.id
    }
}

/// Id-keyed persona index, immutable after construction
#[derive(Debug, Clone, Default)]
pub struct PersonaCatalog {
    personas: BTreeMap<String, PersonaRecord>,
}

impl PersonaCatalog {
    /// Load every persona file in `dir`
    pub fn load(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        let entries = loader::load_entries(dir, PERSONA_EXTENSIONS, PersonaRecord::from_json)?;
        let catalog = Self::from_entries(entries);
        info!(dir = %dir.display(), personas = catalog.len(), "Persona catalog loaded");
        Ok(catalog)
    }

    /// Index raw parse results (duplicates: later wins)
    pub fn from_entries(entries: Vec<RawEntry<PersonaRecord>>) -> Self {
        Self {
            personas: loader::index_entries("persona", entries),
        }
    }

    /// Index already-built records
    pub fn from_records(records: impl IntoIterator<Item = PersonaRecord>) -> Self {
        let entries = records
            .into_iter()
            .map(|record| RawEntry::ok(format!("<memory:{}>", record.id), record))
            .collect();
        Self::from_entries(entries)
    }

    /// Look up a persona by id
    pub fn get(&self, id: &str) -> Result<&PersonaRecord> {
        self.personas
            .get(id)
            .ok_or_else(|| SamplingError::PersonaNotFound {
                id: id.to_string(),
                available: self.ids(),
            })
    }

    /// Check if persona exists
    pub fn contains(&self, id: &str) -> bool {
        self.personas.contains_key(id)
    }

    /// Summaries sorted by id
    pub fn list(&self) -> Vec<PersonaSummary> {
        self.personas.values().map(PersonaRecord::to_summary).collect()
    }

    /// All ids, sorted
    pub fn ids(&self) -> Vec<String> {
        self.personas.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.personas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.personas.is_empty()
    }
}

/// Render a scalar JSON value as text; structured values are rendered as JSON
pub(crate) fn display_scalar(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        other => Some(other.to_string()),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
