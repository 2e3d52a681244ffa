//! State store — persists local state records between invocations.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use parking_lot::RwLock;
use tracing::{info, warn};

use crate::reconciler::Reconciled;
use crate::state::EmoteSetState;

/// File-backed map from resource address to its local state record.
///
/// The host serializes lifecycle calls per address; the store only guards
/// its own map.
pub struct StateStore {
    path: PathBuf,
    records: RwLock<BTreeMap<String, EmoteSetState>>,
}

impl StateStore {
    /// Open a store, loading records from `path` when it exists.
    pub fn open(path: &Path) -> Self {
        let records = load_records(path);
        info!("StateStore: {} records loaded", records.len());

        Self {
            path: path.to_path_buf(),
            records: RwLock::new(records),
        }
    }

    /// All records, ordered by address.
    pub fn list(&self) -> Vec<(String, EmoteSetState)> {
        self.records
            .read()
            .iter()
            .map(|(addr, state)| (addr.clone(), state.clone()))
            .collect()
    }

    pub fn get(&self, addr: &str) -> Option<EmoteSetState> {
        self.records.read().get(addr).cloned()
    }

    pub fn put(&self, addr: &str, state: EmoteSetState) {
        let mut records = self.records.write();
        records.insert(addr.to_string(), state);
        drop(records);
        self.save();
    }

    /// Remove a record. Returns true if it existed.
    pub fn remove(&self, addr: &str) -> bool {
        let mut records = self.records.write();
        let removed = records.remove(addr).is_some();
        drop(records);

        if removed {
            self.save();
        }
        removed
    }

    /// Store the outcome of a lifecycle call: records without an id are dropped.
    pub fn commit(&self, addr: &str, outcome: &Reconciled) {
        if outcome.state.is_created() {
            self.put(addr, outcome.state.clone());
        } else {
            self.remove(addr);
        }
    }

    fn save(&self) {
        let records = self.records.read();
        if let Ok(data) = serde_json::to_string_pretty(&*records) {
            if let Some(parent) = self.path.parent() {
                std::fs::create_dir_all(parent).ok();
            }
            if let Err(e) = std::fs::write(&self.path, data) {
                warn!("Failed to save state to {}: {}", self.path.display(), e);
            }
        }
    }
}

fn load_records(path: &Path) -> BTreeMap<String, EmoteSetState> {
    match std::fs::read_to_string(path) {
        Ok(data) => serde_json::from_str(&data).unwrap_or_else(|e| {
            warn!("Ignoring unreadable state file {}: {}", path.display(), e);
            BTreeMap::new()
        }),
        Err(_) => BTreeMap::new(),
    }
}
