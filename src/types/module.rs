//! Canonical persona modules
//!
//! A persona's biography is split into seven named modules. The engine only
//! routes modules by name; their content is schema-free structured data.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Content of one module: nested scalar/array/map data of any shape
pub type ModuleContent = serde_json::Value;

/// The seven canonical persona modules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModuleName {
    Demographics,
    LifeNarrative,
    Health,
    Economy,
    Politics,
    SocialViews,
    LocalContext,
}

impl ModuleName {
    /// All modules in canonical order
    pub const ALL: [ModuleName; 7] = [
        ModuleName::Demographics,
        ModuleName::LifeNarrative,
        ModuleName::Health,
        ModuleName::Economy,
        ModuleName::Politics,
        ModuleName::SocialViews,
        ModuleName::LocalContext,
    ];

    /// Wire name of the module
    pub fn as_str(&self) -> &'static str {
        match self {
            ModuleName::Demographics => "demographics",
            ModuleName::LifeNarrative => "life_narrative",
            ModuleName::Health => "health",
            ModuleName::Economy => "economy",
            ModuleName::Politics => "politics",
            ModuleName::SocialViews => "social_views",
            ModuleName::LocalContext => "local_context",
        }
    }

    /// What kind of respondent data the module holds
    pub fn description(&self) -> &'static str {
        match self {
            ModuleName::Demographics => {
                "Age, gender, region, education, income, ethnicity, household composition"
            }
            ModuleName::LifeNarrative => {
                "Family history, career trajectory, formative life events, personal milestones"
            }
            ModuleName::Health => {
                "Insurance status, chronic conditions, health behaviors, healthcare experiences"
            }
            ModuleName::Economy => {
                "Employment situation, financial anxieties, economic outlook, class identity"
            }
            ModuleName::Politics => {
                "Party identification, past voting behavior, political engagement, media diet"
            }
            ModuleName::SocialViews => {
                "Stances on immigration, race, gender, religion, cultural issues"
            }
            ModuleName::LocalContext => {
                "State/regional facts, local news awareness, community characteristics"
            }
        }
    }

    /// Canonical names as owned strings, in canonical order
    pub fn canonical_names() -> Vec<String> {
        Self::ALL.iter().map(|m| m.as_str().to_string()).collect()
    }
}

impl fmt::Display for ModuleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModuleName {
    type Err = String;

    /// Exact match only: "Health" or " health" are not canonical names
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ModuleName::ALL
            .iter()
            .copied()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_all_canonical_names() {
        for module in ModuleName::ALL {
            assert_eq!(module.as_str().parse::<ModuleName>().unwrap(), module);
        }
    }

    #[test]
    fn test_parse_is_exact() {
        assert!("Health".parse::<ModuleName>().is_err());
        assert!(" health".parse::<ModuleName>().is_err());
        assert_eq!("finances".parse::<ModuleName>().unwrap_err(), "finances");
    }

    #[test]
    fn test_canonical_order() {
        let names = ModuleName::canonical_names();
        assert_eq!(names.len(), 7);
        assert_eq!(names[0], "demographics");
        assert_eq!(names[6], "local_context");
    }

    #[test]
    fn test_serde_uses_wire_names() {
        let json = serde_json::to_string(&ModuleName::SocialViews).unwrap();
        assert_eq!(json, "\"social_views\"");
        let back: ModuleName = serde_json::from_str("\"life_narrative\"").unwrap();
        assert_eq!(back, ModuleName::LifeNarrative);
    }
}
