//! Rule catalog and rendering
//!
//! Rules establish the respondent's identity anchor and response-style
//! constraints. A rule is a text template filled in from the active
//! persona's demographics. Different rules implement the experimental
//! conditions ("survey_respondent", "baseline_static", "rules_only").

use crate::catalog::loader::{self, CatalogEntry, RawEntry};
use crate::catalog::persona::{display_scalar, PersonaRecord};
use crate::errors::{Result, SamplingError};
use crate::types::ModuleName;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::info;

/// File extensions recognised as rule templates
pub const RULE_EXTENSIONS: &[&str] = &["txt"];

/// Rule used when the caller does not name one
pub const DEFAULT_RULE: &str = "survey_respondent";

/// Placeholder expanded to every module the persona carries
const BACKSTORY_PLACEHOLDER: &str = "{full_backstory}";

/// Demographic placeholders and the text used when the field is missing
///
/// `{name}` falls back to the record's own name before the default.
const DEMOGRAPHIC_PLACEHOLDERS: &[(&str, &str)] = &[
    ("name", "Unknown"),
    ("age", "?"),
    ("gender", "person"),
    ("city", "?"),
    ("state", "?"),
    ("education", "?"),
    ("race", "?"),
    ("religion", "?"),
];

/// A named rule template
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleTemplate {
    pub name: String,
    pub body: String,
}

impl RuleTemplate {
    pub fn new(name: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            body: body.into(),
        }
    }

    fn from_file(stem: &str, contents: &str) -> std::result::Result<Self, String> {
        if contents.trim().is_empty() {
            return Err("rule file is empty".to_string());
        }
        Ok(Self::new(stem, contents))
    }

    /// Fill the template in for `persona`
    pub fn render(&self, persona: &PersonaRecord) -> String {
        let mut rendered = self.body.clone();

        for (field, fallback) in DEMOGRAPHIC_PLACEHOLDERS {
            let placeholder = format!("{{{}}}", field);
            if !rendered.contains(&placeholder) {
                continue;
            }
            let value = persona
                .demographic(field)
                .or_else(|| {
                    (*field == "name" && !persona.name.is_empty()).then(|| persona.name.clone())
                })
                .unwrap_or_else(|| fallback.to_string());
            rendered = rendered.replace(&placeholder, &value);
        }

        if rendered.contains(BACKSTORY_PLACEHOLDER) {
            rendered = rendered.replace(BACKSTORY_PLACEHOLDER, &full_backstory(persona));
        }

        rendered
    }
}

impl CatalogEntry for RuleTemplate {
    fn key(&self) -> &str {
        &self.name
    }
}

/// Every non-empty module in canonical order, as `[module]` then `  key: value` lines
pub fn full_backstory(persona: &PersonaRecord) -> String {
    let mut lines = Vec::new();

    for module in ModuleName::ALL {
        let Some(content) = persona.module(module) else {
            continue;
        };
        if is_empty_content(content) {
            continue;
        }

        lines.push(format!("[{}]", module));
        match content {
            Value::Object(fields) => {
                for (key, value) in fields {
                    let text = display_scalar(value).unwrap_or_else(|| "null".to_string());
                    lines.push(format!("  {}: {}", key, text));
                }
            }
            other => {
                let text = display_scalar(other).unwrap_or_default();
                lines.push(format!("  {}", text));
            }
        }
    }

    lines.join("\n")
}

fn is_empty_content(content: &Value) -> bool {
    match content {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
        Value::Number(_) => false,
    }
}

/// Name-keyed rule index, immutable after construction
#[derive(Debug, Clone, Default)]
pub struct RuleCatalog {
    rules: BTreeMap<String, RuleTemplate>,
}

impl RuleCatalog {
    /// Load every rule file in `dir`
    pub fn load(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        let entries = loader::load_entries(dir, RULE_EXTENSIONS, RuleTemplate::from_file)?;
        let catalog = Self::from_entries(entries);
        info!(dir = %dir.display(), rules = catalog.len(), "Rule catalog loaded");
        Ok(catalog)
    }

    pub fn from_entries(entries: Vec<RawEntry<RuleTemplate>>) -> Self {
        Self {
            rules: loader::index_entries("rule", entries),
        }
    }

    pub fn from_templates(templates: impl IntoIterator<Item = RuleTemplate>) -> Self {
        let entries = templates
            .into_iter()
            .map(|t| RawEntry::ok(format!("<memory:{}>", t.name), t))
            .collect();
        Self::from_entries(entries)
    }

    pub fn get(&self, name: &str) -> Result<&RuleTemplate> {
        self.rules
            .get(name)
            .ok_or_else(|| SamplingError::RuleNotFound {
                name: name.to_string(),
                available: self.list(),
            })
    }

    /// Rule names, sorted
    pub fn list(&self) -> Vec<String> {
        self.rules.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn persona() -> PersonaRecord {
        PersonaRecord::new("p1", "Maria Lopez")
            .with_module(
                ModuleName::Demographics,
                json!({"name": "Maria Lopez", "age": 45, "city": "Dayton", "state": "Ohio"}),
            )
            .with_module(ModuleName::Economy, json!({"employment": "nurse"}))
            .with_module(ModuleName::Health, json!({}))
    }

    #[test]
    fn test_render_demographics_with_fallbacks() {
        let rule = RuleTemplate::new(
            "survey_respondent",
            "You are {name}, a {age}-year-old {gender} in {city}, {state}. Religion: {religion}.",
        );
        assert_eq!(
            rule.render(&persona()),
            "You are Maria Lopez, a 45-year-old person in Dayton, Ohio. Religion: ?."
        );
    }

    #[test]
    fn test_full_backstory_canonical_order_skips_empty() {
        let text = full_backstory(&persona());
        assert_eq!(
            text,
            concat!(
                "[demographics]\n  age: 45\n  city: Dayton\n  name: Maria Lopez\n  state: Ohio\n",
                "[economy]\n  employment: nurse"
            )
        );
    }

    #[test]
    fn test_render_backstory_placeholder() {
        let rule = RuleTemplate::new("baseline_static", "Backstory:\n{full_backstory}");
        let rendered = rule.render(&persona());
        assert!(rendered.starts_with("Backstory:\n[demographics]"));
        assert!(!rendered.contains("{full_backstory}"));
    }

    #[test]
    fn test_name_falls_back_to_record_name() {
        let persona = PersonaRecord::new("p2", "James Carter")
            .with_module(ModuleName::Demographics, json!({"age": 67}));
        let rule = RuleTemplate::new("r", "{name} ({age}, {state})");
        assert_eq!(rule.render(&persona), "James Carter (67, ?)");

        let nameless = PersonaRecord::new("p3", "");
        assert_eq!(rule.render(&nameless), "Unknown (?, ?)");
    }

    #[test]
    fn test_get_unknown_rule() {
        let catalog = RuleCatalog::from_templates(vec![RuleTemplate::new("rules_only", "x")]);
        assert_eq!(catalog.get("nope").unwrap_err().kind(), "rule_not_found");
        assert!(catalog.get("rules_only").is_ok());
    }
}
