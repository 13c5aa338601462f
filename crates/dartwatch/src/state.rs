//! Persistent set of receipt numbers already evaluated.
//!
//! Every filing observed in a run is marked seen, matched or not, so
//! later runs never re-evaluate it. The set grows monotonically and is
//! never pruned.

use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StateError {
    #[error("seen-state io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("seen-state encode error: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Narrow load/save interface over the seen set so tests can back it
/// with memory instead of a file.
pub trait SeenStore: Send + Sync {
    /// A missing store is the empty set (first run).
    fn load(&self) -> Result<HashSet<String>, StateError>;
    /// Fully replaces any previous contents.
    fn save(&self, seen: &HashSet<String>) -> Result<(), StateError>;
}

/// File-backed store: a JSON array of receipt-number strings.
pub struct JsonSeenStore {
    path: PathBuf,
}

impl JsonSeenStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl SeenStore for JsonSeenStore {
    fn load(&self) -> Result<HashSet<String>, StateError> {
        if !self.path.exists() {
            return Ok(HashSet::new());
        }
        let raw = fs::read_to_string(&self.path)?;
        let entries: Vec<String> = serde_json::from_str(&raw)?;
        Ok(entries.into_iter().collect())
    }

    fn save(&self, seen: &HashSet<String>) -> Result<(), StateError> {
        // Sorted output keeps the file stable across runs.
        let mut entries: Vec<&String> = seen.iter().collect();
        entries.sort();
        fs::write(&self.path, serde_json::to_string(&entries)?)?;
        Ok(())
    }
}

/// In-memory store for tests and dry runs.
#[derive(Clone, Default)]
pub struct InMemorySeenStore {
    inner: Arc<Mutex<HashSet<String>>>,
}

impl InMemorySeenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_seen<I: IntoIterator<Item = String>>(entries: I) -> Self {
        Self {
            inner: Arc::new(Mutex::new(entries.into_iter().collect())),
        }
    }

    pub fn snapshot(&self) -> HashSet<String> {
        self.inner.lock().expect("seen store lock poisoned").clone()
    }
}

impl SeenStore for InMemorySeenStore {
    fn load(&self) -> Result<HashSet<String>, StateError> {
        Ok(self.snapshot())
    }

    fn save(&self, seen: &HashSet<String>) -> Result<(), StateError> {
        *self.inner.lock().expect("seen store lock poisoned") = seen.clone();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_loads_as_empty_set() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = JsonSeenStore::new(dir.path().join("seen_filings.json"));
        assert!(store.load().expect("loads").is_empty());
    }

    #[test]
    fn save_then_load_round_trips_exactly() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = JsonSeenStore::new(dir.path().join("seen_filings.json"));

        let seen: HashSet<String> = ["20250801000001", "20250801000002"]
            .into_iter()
            .map(str::to_string)
            .collect();
        store.save(&seen).expect("saves");
        assert_eq!(store.load().expect("loads"), seen);
    }

    #[test]
    fn save_overwrites_previous_contents() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = JsonSeenStore::new(dir.path().join("seen_filings.json"));

        store
            .save(&HashSet::from(["old".to_string()]))
            .expect("first save");
        let replacement = HashSet::from(["old".to_string(), "new".to_string()]);
        store.save(&replacement).expect("second save");
        assert_eq!(store.load().expect("loads"), replacement);
    }

    #[test]
    fn corrupt_file_is_an_error_not_an_empty_set() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("seen_filings.json");
        fs::write(&path, "not json").expect("write corrupt file");
        let store = JsonSeenStore::new(path);
        assert!(matches!(store.load(), Err(StateError::Encode(_))));
    }
}
