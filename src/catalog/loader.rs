//! Two-phase catalog construction
//!
//! Phase one (`load_entries`) walks a directory and parses every matching
//! file, keeping per-file failures as values. Phase two (`index_entries`)
//! turns those results into an id-keyed map: failed entries are skipped with
//! a warning, and on a duplicate key the later entry wins with a warning.
//! Tests can call `index_entries` directly with synthetic entries.

use crate::errors::{Result, SamplingError};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Anything that can live in a catalog under a unique key
pub trait CatalogEntry {
    /// Unique key within the catalog
    fn key(&self) -> &str;
}

/// Outcome of parsing one file during discovery
#[derive(Debug, Clone)]
pub struct RawEntry<T> {
    /// Where the entry came from (file path, or a label for synthetic entries)
    pub source: PathBuf,

    /// Parsed record, or a reason why the file was rejected
    pub parsed: std::result::Result<T, String>,
}

impl<T> RawEntry<T> {
    /// Successfully parsed entry
    pub fn ok(source: impl Into<PathBuf>, value: T) -> Self {
        Self {
            source: source.into(),
            parsed: Ok(value),
        }
    }

    /// Rejected entry
    pub fn rejected(source: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            parsed: Err(reason.into()),
        }
    }
}

/// List files in `dir` whose extension is one of `extensions`, sorted by path
///
/// Fails only when the directory itself cannot be read.
pub fn discover(dir: &Path, extensions: &[&str]) -> Result<Vec<PathBuf>> {
    let reader = fs::read_dir(dir).map_err(|e| SamplingError::CatalogLoad {
        path: dir.display().to_string(),
        reason: e.to_string(),
    })?;

    let mut files = Vec::new();
    for entry in reader {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!(dir = %dir.display(), error = %e, "Skipping unreadable directory entry");
                continue;
            }
        };

        let path = entry.path();
        if !path.is_file() {
            continue;
        }

        let matches = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| extensions.iter().any(|want| want.eq_ignore_ascii_case(ext)))
            .unwrap_or(false);

        if matches {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}

/// Read and parse every matching file in `dir`
///
/// `parse` receives the file stem and the file contents. Read and parse
/// failures become rejected entries rather than aborting the load.
pub fn load_entries<T, F>(
    dir: &Path,
    extensions: &[&str],
    parse: F,
) -> Result<Vec<RawEntry<T>>>
where
    F: Fn(&str, &str) -> std::result::Result<T, String>,
{
    let files = discover(dir, extensions)?;
    let mut entries = Vec::with_capacity(files.len());

    for path in files {
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_string();

        let parsed = fs::read_to_string(&path)
            .map_err(|e| format!("read failed: {}", e))
            .and_then(|contents| parse(&stem, &contents));

        debug!(file = %path.display(), ok = parsed.is_ok(), "Parsed catalog file");
        entries.push(RawEntry { source: path, parsed });
    }

    Ok(entries)
}

/// Build the key → entry map from raw parse results
pub fn index_entries<T: CatalogEntry>(
    kind: &str,
    entries: Vec<RawEntry<T>>,
) -> BTreeMap<String, T> {
    let mut index = BTreeMap::new();

    for entry in entries {
        match entry.parsed {
            Ok(value) => {
                let key = value.key().to_string();
                if index.insert(key.clone(), value).is_some() {
                    warn!(
                        kind,
                        key = %key,
                        source = %entry.source.display(),
                        "Duplicate catalog key, later entry replaces earlier one"
                    );
                }
            }
            Err(reason) => {
                warn!(
                    kind,
                    source = %entry.source.display(),
                    reason = %reason,
                    "Skipping malformed catalog entry"
                );
            }
        }
    }

    index
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[derive(Debug, Clone, PartialEq)]
    struct Item {
        key: String,
        value: u32,
    }

    impl CatalogEntry for Item {
        fn key(&self) -> &str {
            &self.key
        }
    }

    fn item(key: &str, value: u32) -> Item {
        Item {
            key: key.to_string(),
            value,
        }
    }

    #[test]
    fn test_index_skips_rejected_entries() {
        let entries = vec![
            RawEntry::ok("a", item("a", 1)),
            RawEntry::rejected("bad", "not json"),
            RawEntry::ok("b", item("b", 2)),
        ];
        let index = index_entries("item", entries);
        assert_eq!(index.len(), 2);
        assert!(index.contains_key("a"));
        assert!(index.contains_key("b"));
    }

    #[test]
    fn test_index_duplicate_later_wins() {
        let entries = vec![
            RawEntry::ok("first", item("x", 1)),
            RawEntry::ok("second", item("x", 2)),
        ];
        let index = index_entries("item", entries);
        assert_eq!(index.len(), 1);
        assert_eq!(index["x"].value, 2);
    }

    #[test]
    fn test_discover_filters_and_sorts() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("b.json"), "{}").unwrap();
        fs::write(temp.path().join("a.JSON"), "{}").unwrap();
        fs::write(temp.path().join("notes.txt"), "ignored").unwrap();
        fs::create_dir(temp.path().join("nested.json")).unwrap();

        let files = discover(temp.path(), &["json"]).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["a.JSON", "b.json"]);
    }

    #[test]
    fn test_discover_missing_directory_fails() {
        let temp = TempDir::new().unwrap();
        let err = discover(&temp.path().join("missing"), &["json"]).unwrap_err();
        assert_eq!(err.kind(), "catalog_load");
    }

    #[test]
    fn test_load_entries_keeps_parse_failures() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("one.txt"), "1").unwrap();
        fs::write(temp.path().join("two.txt"), "two").unwrap();

        let entries = load_entries(temp.path(), &["txt"], |stem, body| {
            body.trim()
                .parse::<u32>()
                .map(|value| item(stem, value))
                .map_err(|e| e.to_string())
        })
        .unwrap();

        assert_eq!(entries.len(), 2);
        assert!(entries[0].parsed.is_ok());
        assert!(entries[1].parsed.is_err());
    }
}
