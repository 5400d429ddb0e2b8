//! Policy file and data file handling.

use std::path::Path;

use anyhow::{Context, Result};
use stay_engine::{AvailabilityPolicy, MemoryStore};
use tracing::debug;

/// Load the availability policy from a TOML file, or the defaults.
pub fn load_policy(path: Option<&Path>) -> Result<AvailabilityPolicy> {
    let Some(path) = path else {
        return Ok(AvailabilityPolicy::default());
    };
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    let policy: AvailabilityPolicy = toml::from_str(&raw)
        .with_context(|| format!("Invalid policy in config file: {}", path.display()))?;
    debug!(?policy, "loaded policy");
    Ok(policy)
}

/// Load the booking data file. A missing file is an empty store.
pub fn load_store(path: &Path, policy: AvailabilityPolicy) -> Result<MemoryStore> {
    let store = if path.exists() {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read data file: {}", path.display()))?;
        MemoryStore::from_json(&raw)
            .with_context(|| format!("Failed to parse data file: {}", path.display()))?
    } else {
        debug!(path = %path.display(), "data file missing, starting empty");
        MemoryStore::new()
    };
    Ok(store.with_exclusion(policy))
}

pub fn save_store(path: &Path, store: &MemoryStore) -> Result<()> {
    let json = store.to_json().context("Failed to serialize booking data")?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write data file: {}", path.display()))
}
