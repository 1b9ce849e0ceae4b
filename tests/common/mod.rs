//! On-disk catalog fixtures shared by the integration tests

#![allow(dead_code)]

use silicon_sampling::cli::Config;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

pub const MARIA: &str = r#"{
    "id": "p1",
    "name": "Maria Lopez",
    "demographics": {
        "age": 45,
        "gender": "woman",
        "city": "Columbus",
        "state": "Ohio",
        "education": "Bachelor's degree"
    },
    "health": {
        "insurance": "Medicaid",
        "chronic_conditions": ["asthma"]
    }
}"#;

pub const JAMES: &str = r#"{
    "id": "p2",
    "name": "James Carter",
    "demographics": {"age": 67, "gender": "man", "state": "Texas"},
    "health": {"insurance": "Medicare"},
    "economy": {"employment": "retired", "income_bracket": "50-75k"},
    "politics": {"party_identification": "Republican"}
}"#;

/// Temp directory with personas/, skills/ and rules/ populated
pub struct Fixture {
    pub root: TempDir,
}

impl Fixture {
    pub fn new() -> Self {
        let root = TempDir::new().expect("temp dir");
        for dir in ["personas", "skills", "rules"] {
            fs::create_dir(root.path().join(dir)).expect("fixture dir");
        }

        let fixture = Self { root };
        fixture.persona("p1.json", MARIA);
        fixture.persona("p2.json", JAMES);
        fixture.skill("general.txt", "Step 1: read the question.\nStep 2: retrieve modules.");
        fixture.skill("sensitive_topics.md", "# Sensitive topics\nAnswer honestly.");
        fixture.rule(
            "survey_respondent.txt",
            "You are {name}, {age}, from {state}.\n{full_backstory}",
        );
        fixture
    }

    pub fn persona(&self, file: &str, contents: &str) {
        write(&self.root.path().join("personas"), file, contents);
    }

    pub fn skill(&self, file: &str, contents: &str) {
        write(&self.root.path().join("skills"), file, contents);
    }

    pub fn rule(&self, file: &str, contents: &str) {
        write(&self.root.path().join("rules"), file, contents);
    }

    pub fn config(&self) -> Config {
        let mut config = Config::default();
        let dir = |name: &str| self.root.path().join(name).to_string_lossy().into_owned();
        config.paths.personas_dir = dir("personas");
        config.paths.skills_dir = dir("skills");
        config.paths.rules_dir = dir("rules");
        config
    }
}

fn write(dir: &Path, file: &str, contents: &str) {
    fs::write(dir.join(file), contents).expect("fixture file");
}
