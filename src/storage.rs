//! Persistent local key/value store
//!
//! Holds the resolved server URL and player identity across restarts.
//! Reads and writes are synchronous; every write flushes the whole map to disk.

use anyhow::{Context, Result};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::constants;

/// Narrow synchronous key/value interface used by the resolvers
pub trait KeyValueStore {
    /// Stored value for `key`, or `None` when absent or empty
    fn get(&self, key: &str) -> Option<String>;

    /// Store `value` under `key`, replacing any previous value
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// Store backed by a flat JSON object on disk
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl JsonFileStore {
    /// Default location: `<config_dir>/resonate-cast-receiver/storage.json`
    pub fn default_path() -> PathBuf {
        let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push(constants::storage::APP_DIR);
        path.push(constants::storage::FILENAME);
        path
    }

    /// Open the store at `path`. A missing file is an empty store.
    ///
    /// A file that cannot be parsed is moved aside to `<path>.bak` and the
    /// store starts empty, so launch overrides can still be applied and saved.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let entries = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read store from {:?}", path))?;
            match serde_json::from_str(&contents) {
                Ok(entries) => entries,
                Err(e) => {
                    let backup = with_suffix(&path, ".bak");
                    warn!(
                        path = %path.display(),
                        backup = %backup.display(),
                        error = %e,
                        "Store file is corrupt, starting empty"
                    );
                    if let Err(e) = fs::rename(&path, &backup) {
                        warn!(
                            path = %path.display(),
                            error = %e,
                            "Failed to move corrupt store aside"
                        );
                    }
                    BTreeMap::new()
                }
            }
        } else {
            info!(path = %path.display(), "No store file found, starting empty");
            BTreeMap::new()
        };

        debug!(path = %path.display(), keys = entries.len(), "Opened local store");
        Ok(Self { path, entries })
    }

    /// Write to a sibling temp file, then rename over the store so a crash
    /// mid-write never leaves a torn file behind.
    fn flush(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create store directory {:?}", parent))?;
        }

        let json = serde_json::to_string_pretty(&self.entries)
            .context("Failed to serialize store to JSON")?;
        let tmp = with_suffix(&self.path, ".tmp");
        fs::write(&tmp, json)
            .with_context(|| format!("Failed to write store to {:?}", tmp))?;
        fs::rename(&tmp, &self.path)
            .with_context(|| format!("Failed to replace store at {:?}", self.path))?;
        Ok(())
    }
}

fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(suffix);
    PathBuf::from(name)
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).filter(|v| !v.is_empty()).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        self.flush()?;
        debug!(key = key, path = %self.path.display(), "Persisted store entry");
        Ok(())
    }
}

/// Volatile store, used when the receiver runs with `--no-persist`
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).filter(|v| !v.is_empty()).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path().join("storage.json")).unwrap();
        assert_eq!(store.get("resonate_server_url"), None);
    }

    #[test]
    fn test_values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("storage.json");

        let mut store = JsonFileStore::open(&path).unwrap();
        store.set("resonate_player_id", "cast-abc12345").unwrap();
        drop(store);

        let reopened = JsonFileStore::open(&path).unwrap();
        assert_eq!(reopened.get("resonate_player_id"), Some("cast-abc12345".to_string()));
    }

    #[test]
    fn test_set_overwrites_previous_value() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonFileStore::open(dir.path().join("storage.json")).unwrap();
        store.set("resonate_server_url", "http://old:8095").unwrap();
        store.set("resonate_server_url", "http://new:8095").unwrap();
        assert_eq!(store.get("resonate_server_url"), Some("http://new:8095".to_string()));
    }

    #[test]
    fn test_corrupt_file_opens_empty_and_accepts_writes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        // Torn write: truncated mid-string
        fs::write(&path, r#"{"resonate_server_url": "http://h:8095", "resonate_pl"#).unwrap();

        let mut store = JsonFileStore::open(&path).unwrap();
        assert_eq!(store.get("resonate_server_url"), None);
        assert!(dir.path().join("storage.json.bak").exists());

        store.set("resonate_server_url", "http://h:8095").unwrap();
        let reopened = JsonFileStore::open(&path).unwrap();
        assert_eq!(reopened.get("resonate_server_url"), Some("http://h:8095".to_string()));
    }

    #[test]
    fn test_flush_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        let mut store = JsonFileStore::open(&path).unwrap();
        store.set("resonate_player_id", "kitchen").unwrap();

        assert!(path.exists());
        assert!(!dir.path().join("storage.json.tmp").exists());
    }

    #[test]
    fn test_empty_value_reads_as_absent() {
        let mut store = MemoryStore::new();
        store.set("resonate_server_url", "").unwrap();
        assert_eq!(store.get("resonate_server_url"), None);
    }
}
