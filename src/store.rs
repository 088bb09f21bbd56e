use anyhow::{Context, Result};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

/// File-backed key/value store for client-local state.
///
/// A single JSON map on disk, shared by whatever features want to stash
/// small bits of state. Keys are namespaced by prefix so one feature can
/// clear its own state without clobbering anyone else's.
pub struct KvStore {
    path: PathBuf,
    entries: HashMap<String, String>,
}

impl KvStore {
    /// Open the store at `path`, creating an empty one if the file does not
    /// exist. A corrupt file is logged and treated as empty rather than
    /// failing startup.
    pub fn open(path: PathBuf) -> Result<Self> {
        let entries = if path.exists() {
            let content = fs::read_to_string(&path)
                .context("Failed to read store file")?;
            match serde_json::from_str(&content) {
                Ok(entries) => entries,
                Err(err) => {
                    tracing::warn!(error = %err, path = %path.display(), "store file is corrupt, starting empty");
                    HashMap::new()
                }
            }
        } else {
            HashMap::new()
        };

        Ok(Self { path, entries })
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn set(&mut self, key: &str, value: String) -> Result<()> {
        self.entries.insert(key.to_string(), value);
        self.persist()
    }

    #[allow(dead_code)]
    pub fn remove(&mut self, key: &str) -> Result<()> {
        self.entries.remove(key);
        self.persist()
    }

    /// Remove every key under `prefix`, leaving foreign keys alone.
    pub fn clear_prefix(&mut self, prefix: &str) -> Result<()> {
        self.entries.retain(|key, _| !key.starts_with(prefix));
        self.persist()
    }

    #[allow(dead_code)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn persist(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .context("Failed to create store directory")?;
        }
        let content = serde_json::to_string_pretty(&self.entries)
            .context("Failed to serialize store")?;
        fs::write(&self.path, content)
            .context("Failed to write store file")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_then_reopen_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");

        let mut store = KvStore::open(path.clone()).unwrap();
        store.set("chat.questions-asked", "3".into()).unwrap();

        let reopened = KvStore::open(path).unwrap();
        assert_eq!(reopened.get("chat.questions-asked"), Some("3"));
    }

    #[test]
    fn clear_prefix_leaves_foreign_keys_alone() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = KvStore::open(dir.path().join("store.json")).unwrap();
        store.set("chat.questions-asked", "5".into()).unwrap();
        store.set("chat.last-session", "abc".into()).unwrap();
        store.set("quiz.best-score", "7".into()).unwrap();

        store.clear_prefix("chat.").unwrap();

        assert_eq!(store.len(), 1);
        assert_eq!(store.get("quiz.best-score"), Some("7"));
        assert_eq!(store.get("chat.questions-asked"), None);
    }

    #[test]
    fn corrupt_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        fs::write(&path, "not json {").unwrap();

        let mut store = KvStore::open(path).unwrap();
        assert!(store.is_empty());
        // Still usable afterwards.
        store.set("chat.questions-asked", "1".into()).unwrap();
        assert_eq!(store.get("chat.questions-asked"), Some("1"));
    }
}
