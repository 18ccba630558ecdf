//! The local data directory shared by export and import.
//!
//! One JSON file per entity kind (`milestones.json`), or per parent for
//! fan-out kinds (`tests_run_4.json`, `attachments_case_17.json`). Writes go
//! through a temp file in the same directory and are renamed into place, so
//! a file is either the previous export or the new one, never a partial mix.

use serde::Serialize;
use serde_json::Value;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::StoreError;

/// Prefix of the per-run test listings.
pub const TESTS_RUN_PREFIX: &str = "tests_run_";

/// Prefix of the per-run, per-test result files.
pub const RESULTS_RUN_PREFIX: &str = "results_run_";

/// `tests_run_<id>.json`
#[must_use]
pub fn tests_run_file(run_id: &str) -> String {
    format!("{TESTS_RUN_PREFIX}{run_id}.json")
}

/// `results_run_<id>.json`
#[must_use]
pub fn results_run_file(run_id: &str) -> String {
    format!("{RESULTS_RUN_PREFIX}{run_id}.json")
}

/// Directory holding exported JSON files.
#[derive(Debug, Clone)]
pub struct DataDir {
    root: PathBuf,
}

impl DataDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub fn path(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    /// Write `value` as pretty JSON to `name`, replacing any previous file.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the directory or file cannot be written.
    pub fn save<T: Serialize + ?Sized>(&self, name: &str, value: &T) -> Result<PathBuf, StoreError> {
        let path = self.path(name);
        let io_error = |source| StoreError::Io {
            path: path.clone(),
            source,
        };

        std::fs::create_dir_all(&self.root).map_err(io_error)?;
        let mut bytes = serde_json::to_vec_pretty(value).map_err(|source| StoreError::Json {
            path: path.clone(),
            source,
        })?;
        bytes.push(b'\n');

        let mut tmp = tempfile::NamedTempFile::new_in(&self.root).map_err(io_error)?;
        tmp.write_all(&bytes).map_err(io_error)?;
        tmp.persist(&path).map_err(|e| io_error(e.error))?;
        Ok(path)
    }

    /// Read and parse `name`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Missing`] if the file does not exist,
    /// [`StoreError::Io`] if it cannot be read, or [`StoreError::Json`] if it
    /// is not valid JSON.
    pub fn load(&self, name: &str) -> Result<Value, StoreError> {
        Self::load_path(&self.path(name))
    }

    /// Read and parse an arbitrary path.
    ///
    /// # Errors
    ///
    /// Same as [`Self::load`].
    pub fn load_path(path: &Path) -> Result<Value, StoreError> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StoreError::Missing(path.to_path_buf()));
            }
            Err(source) => {
                return Err(StoreError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        serde_json::from_str(&contents).map_err(|source| StoreError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    #[must_use]
    pub fn exists(&self, name: &str) -> bool {
        self.path(name).is_file()
    }

    /// Files named `<prefix><id>.json`, as `(id, path)` sorted by id
    /// (numerically where possible).
    ///
    /// A missing directory yields an empty list.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the directory cannot be listed.
    pub fn scan(&self, prefix: &str) -> Result<Vec<(String, PathBuf)>, StoreError> {
        let entries = match std::fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(StoreError::Io {
                    path: self.root.clone(),
                    source,
                });
            }
        };

        let mut found = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| StoreError::Io {
                path: self.root.clone(),
                source,
            })?;
            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };
            let Some(id) = name
                .strip_prefix(prefix)
                .and_then(|rest| rest.strip_suffix(".json"))
            else {
                continue;
            };
            if id.is_empty() || !entry.path().is_file() {
                continue;
            }
            found.push((id.to_string(), entry.path()));
        }

        found.sort_by(|(a, _), (b, _)| {
            (a.parse::<u64>().ok(), a.as_str()).cmp(&(b.parse::<u64>().ok(), b.as_str()))
        });
        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = DataDir::new(dir.path().join("nested"));

        let value = json!({"milestones": [{"id": 1, "name": "M1"}]});
        let path = store.save("milestones.json", &value).unwrap();

        assert_eq!(path, dir.path().join("nested").join("milestones.json"));
        assert_eq!(store.load("milestones.json").unwrap(), value);
        assert!(store.exists("milestones.json"));
    }

    #[test]
    fn save_accepts_borrowed_slices() {
        let dir = tempfile::tempdir().unwrap();
        let store = DataDir::new(dir.path());
        let tests = vec![json!({"id": 101}), json!({"id": 102})];

        store.save(&tests_run_file("11"), tests.as_slice()).unwrap();

        assert_eq!(
            store.load("tests_run_11.json").unwrap(),
            json!([{"id": 101}, {"id": 102}])
        );
    }

    #[test]
    fn save_overwrites_wholesale() {
        let dir = tempfile::tempdir().unwrap();
        let store = DataDir::new(dir.path());

        store.save("users.json", &json!([1, 2, 3])).unwrap();
        store.save("users.json", &json!([4])).unwrap();
        assert_eq!(store.load("users.json").unwrap(), json!([4]));

        // No temp files left behind.
        let names: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(names, vec!["users.json".to_string()]);
    }

    #[test]
    fn load_missing_and_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let store = DataDir::new(dir.path());

        assert!(matches!(store.load("nope.json"), Err(StoreError::Missing(_))));

        std::fs::write(dir.path().join("bad.json"), "{not json").unwrap();
        assert!(matches!(store.load("bad.json"), Err(StoreError::Json { .. })));
    }

    #[test]
    fn scan_sorts_ids_numerically() {
        let dir = tempfile::tempdir().unwrap();
        let store = DataDir::new(dir.path());
        for name in [
            "tests_run_10.json",
            "tests_run_9.json",
            "tests_run_.json",
            "tests_run_2.json.bak",
            "results_run_9.json",
        ] {
            std::fs::write(dir.path().join(name), "[]").unwrap();
        }

        let ids: Vec<String> = store
            .scan(TESTS_RUN_PREFIX)
            .unwrap()
            .into_iter()
            .map(|(id, _)| id)
            .collect();
        assert_eq!(ids, vec!["9".to_string(), "10".to_string()]);
    }

    #[test]
    fn scan_missing_dir_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = DataDir::new(dir.path().join("absent"));
        assert!(store.scan("attachments_case_").unwrap().is_empty());
    }

    #[test]
    fn file_name_helpers() {
        assert_eq!(tests_run_file("4"), "tests_run_4.json");
        assert_eq!(results_run_file("4"), "results_run_4.json");
    }
}
