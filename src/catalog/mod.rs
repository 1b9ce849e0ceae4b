//! Read-only catalogs loaded once at startup
//!
//! - Personas: synthetic respondents with up to seven modules
//! - Skills: named reasoning procedures
//! - Rules: identity-anchor templates rendered per persona
//!
//! Catalogs never change after construction and are shared without locking.

pub mod loader;
pub mod persona;
pub mod rule;
pub mod skill;

// Re-export commonly used types
pub use loader::{CatalogEntry, RawEntry};
pub use persona::{PersonaCatalog, PersonaRecord, PersonaSummary};
pub use rule::{RuleCatalog, RuleTemplate, DEFAULT_RULE};
pub use skill::{SkillCatalog, SkillTemplate, DEFAULT_SKILL};
