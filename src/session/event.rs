//! Retrieval audit events

use crate::types::ModuleName;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// One recorded `get_persona_modules` call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievalEvent {
    /// 1-based position in the current log
    pub sequence_number: u64,

    /// Persona that was active when the call was made
    pub persona_id: String,

    /// Module names exactly as requested, duplicates preserved
    pub requested_modules: Vec<String>,

    /// Modules found on the persona and returned
    pub resolved_modules: BTreeSet<ModuleName>,

    /// Canonical modules requested but not carried by this persona
    pub absent_modules: BTreeSet<ModuleName>,

    /// Caller-supplied label for the survey question
    pub question_context: Option<String>,

    pub timestamp: DateTime<Utc>,
}

/// Event contents before the session assigns a sequence number
#[derive(Debug, Clone, PartialEq)]
pub struct PendingRetrieval {
    pub persona_id: String,
    pub requested_modules: Vec<String>,
    pub resolved_modules: BTreeSet<ModuleName>,
    pub absent_modules: BTreeSet<ModuleName>,
    pub question_context: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl PendingRetrieval {
    /// Seal the event with its position in the log
    pub fn into_event(self, sequence_number: u64) -> RetrievalEvent {
        RetrievalEvent {
            sequence_number,
            persona_id: self.persona_id,
            requested_modules: self.requested_modules,
            resolved_modules: self.resolved_modules,
            absent_modules: self.absent_modules,
            question_context: self.question_context,
            timestamp: self.timestamp,
        }
    }
}

/// How many times each canonical module was requested across `events`
///
/// Every canonical module appears in the result, with zero if never requested.
/// Duplicates within one request count once per occurrence.
pub fn module_frequency(events: &[RetrievalEvent]) -> BTreeMap<String, usize> {
    let mut counts: BTreeMap<String, usize> = ModuleName::ALL
        .iter()
        .map(|m| (m.as_str().to_string(), 0))
        .collect();

    for name in events.iter().flat_map(|e| e.requested_modules.iter()) {
        if let Some(count) = counts.get_mut(name) {
            *count += 1;
        }
    }

    counts
}
