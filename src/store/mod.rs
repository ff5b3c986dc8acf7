//! Specification store
//!
//! Named layout specifications persisted as pretty-printed JSON documents,
//! one file per specification: `<dir>/<id>.json`.
//!
//! Ids are 1-128 characters of `[A-Za-z0-9_-]`, starting with a letter or
//! digit, so an id can never escape the store directory.

mod errors;

pub use errors::{StoreError, StoreResult};

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;
use uuid::Uuid;

use crate::layout::LayoutSpec;

const ID_PATTERN: &str = r"^[A-Za-z0-9][A-Za-z0-9_-]{0,127}$";
const EXTENSION: &str = "json";

static ID_RE: OnceLock<Option<Regex>> = OnceLock::new();

/// Whether `id` can name a stored specification
pub fn is_valid_id(id: &str) -> bool {
    ID_RE
        .get_or_init(|| Regex::new(ID_PATTERN).ok())
        .as_ref()
        .is_some_and(|re| re.is_match(id))
}

#[derive(Debug, Clone)]
pub struct SpecStore {
    dir: PathBuf,
}

impl SpecStore {
    /// Opens the store, creating the directory if needed.
    pub fn open(dir: impl Into<PathBuf>) -> StoreResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// A fresh random id
    pub fn new_id() -> String {
        Uuid::new_v4().to_string()
    }

    /// Writes `spec` under `id`, replacing any previous version.
    pub fn save(&self, id: &str, spec: &LayoutSpec) -> StoreResult<()> {
        let path = self.path_for(id)?;
        let mut content = serde_json::to_string_pretty(&spec.to_value())
            .map_err(|e| StoreError::Io(e.into()))?;
        content.push('\n');

        // Write-then-rename so readers never see a partial file.
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, content)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    pub fn load(&self, id: &str) -> StoreResult<LayoutSpec> {
        let path = self.path_for(id)?;
        if !path.is_file() {
            return Err(StoreError::NotFound(id.to_string()));
        }
        let content = fs::read_to_string(&path)?;
        LayoutSpec::from_json(&content).map_err(|source| StoreError::Malformed {
            id: id.to_string(),
            source,
        })
    }

    pub fn exists(&self, id: &str) -> bool {
        self.path_for(id).map(|p| p.is_file()).unwrap_or(false)
    }

    pub fn delete(&self, id: &str) -> StoreResult<()> {
        let path = self.path_for(id)?;
        if !path.is_file() {
            return Err(StoreError::NotFound(id.to_string()));
        }
        fs::remove_file(&path)?;
        Ok(())
    }

    /// Every stored id, sorted.
    pub fn list(&self) -> StoreResult<Vec<String>> {
        let mut ids = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                if is_valid_id(stem) && path.is_file() {
                    ids.push(stem.to_string());
                }
            }
        }
        ids.sort();
        Ok(ids)
    }

    fn path_for(&self, id: &str) -> StoreResult<PathBuf> {
        if !is_valid_id(id) {
            return Err(StoreError::InvalidId(id.to_string()));
        }
        Ok(self.dir.join(format!("{}.{}", id, EXTENSION)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::LayoutType;
    use serde_json::json;
    use tempfile::TempDir;

    fn sample() -> LayoutSpec {
        LayoutSpec::from_value(&json!({
            "layout": "wizard",
            "order": ["account", "profile"],
            "account": {"layout": "grid", "options": {"columns": 2}}
        }))
        .unwrap()
    }

    #[test]
    fn test_id_rules() {
        assert!(is_valid_id("signup"));
        assert!(is_valid_id("signup_v2-final"));
        assert!(is_valid_id(&SpecStore::new_id()));
        assert!(!is_valid_id(""));
        assert!(!is_valid_id("-leading"));
        assert!(!is_valid_id("../etc/passwd"));
        assert!(!is_valid_id("has space"));
        assert!(!is_valid_id(&"a".repeat(129)));
    }

    #[test]
    fn test_save_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = SpecStore::open(dir.path().join("specs")).unwrap();

        store.save("signup", &sample()).unwrap();
        assert!(store.exists("signup"));

        let loaded = store.load("signup").unwrap();
        assert_eq!(loaded, sample());
        assert_eq!(
            loaded.property("account").unwrap().layout_type(),
            Some(LayoutType::Grid)
        );

        let raw = fs::read_to_string(dir.path().join("specs/signup.json")).unwrap();
        assert!(raw.contains("\n  \"layout\": \"wizard\""));
    }

    #[test]
    fn test_list_sorted_and_filtered() {
        let dir = TempDir::new().unwrap();
        let store = SpecStore::open(dir.path()).unwrap();
        store.save("zeta", &sample()).unwrap();
        store.save("alpha", &sample()).unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        assert_eq!(store.list().unwrap(), vec!["alpha", "zeta"]);
    }

    #[test]
    fn test_delete_and_missing() {
        let dir = TempDir::new().unwrap();
        let store = SpecStore::open(dir.path()).unwrap();
        store.save("signup", &sample()).unwrap();

        store.delete("signup").unwrap();
        assert!(!store.exists("signup"));
        assert!(matches!(store.delete("signup"), Err(StoreError::NotFound(_))));
        assert!(matches!(store.load("signup"), Err(StoreError::NotFound(_))));
    }

    #[test]
    fn test_invalid_id_rejected() {
        let dir = TempDir::new().unwrap();
        let store = SpecStore::open(dir.path()).unwrap();
        assert!(matches!(
            store.save("../escape", &sample()),
            Err(StoreError::InvalidId(_))
        ));
    }

    #[test]
    fn test_malformed_file() {
        let dir = TempDir::new().unwrap();
        let store = SpecStore::open(dir.path()).unwrap();
        fs::write(dir.path().join("broken.json"), "[1, 2]").unwrap();

        let err = store.load("broken").unwrap_err();
        assert_eq!(err.code(), "SF_STORE_MALFORMED");
    }
}
