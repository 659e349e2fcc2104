use super::types::{Store, STORE_VERSION};
use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use std::fs::File;
use std::path::Path;

/// Load the store from a JSON file
///
/// If the file doesn't exist, returns a new empty store using `default_arpu`.
/// If the file exists but has an unsupported version, returns an error.
/// A stored ARPU that is zero or negative is replaced by `default_arpu`.
pub fn load_store(path: &Path, default_arpu: f64) -> Result<Store> {
    if !path.exists() {
        return Ok(Store::new(default_arpu));
    }

    let file = File::open(path)
        .with_context(|| format!("Failed to open store file at {}", path.display()))?;

    let mut store: Store = serde_json::from_reader(file)
        .with_context(|| format!("Failed to load store from {}", path.display()))?;

    if store.version != STORE_VERSION {
        anyhow::bail!("Unsupported store version: {}", store.version);
    }

    // Stored rates that are not positive fall back to the configured default
    let stored_arpu = store.arpu;
    if !store.set_arpu(stored_arpu) {
        store.arpu = default_arpu;
    }

    Ok(store)
}

/// Save the store to a JSON file atomically
///
/// Creates the parent directory if it doesn't exist.
pub fn save_store(path: &Path, store: &Store) -> Result<()> {
    if let Some(parent) = path.parent() {
        crate::config::ensure_dir(parent)?;
    }

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;

    serde_json::to_writer_pretty(&mut file, store).context("Failed to serialize store")?;

    file.commit().context("Failed to save store")?;

    Ok(())
}
