//! Store snapshot file handling.

use std::path::{Path, PathBuf};

use anyhow::Context;
use expensr_store::MemoryStore;

/// Default snapshot location under the platform data directory.
pub fn default_store_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("expensr")
        .join("store.json")
}

/// Open the snapshot, or start empty when none exists yet.
pub fn open(path: &Path) -> anyhow::Result<MemoryStore> {
    if path.exists() {
        MemoryStore::load(path)
            .with_context(|| format!("failed to load store from {}", path.display()))
    } else {
        Ok(MemoryStore::new())
    }
}

/// Persist the snapshot, creating parent directories as needed.
pub fn save(store: &MemoryStore, path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    store
        .save(path)
        .with_context(|| format!("failed to save store to {}", path.display()))
}
