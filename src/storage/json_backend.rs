use chrono::Utc;
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{debug, error, warn};

use crate::{
    core::utils::{app_data_dir, canonical_name, ensure_dir, write_atomic},
    domain::Entry,
};

use super::{decode_entries, EntryStorage, Result};

/// Storage key used when the configuration does not name one.
pub const DEFAULT_STORAGE_KEY: &str = "home_book_entries_v1";

const SLOT_EXTENSION: &str = "json";
const QUARANTINE_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M";

/// Filesystem-backed slot: one pretty-printed JSON array per storage key.
#[derive(Debug, Clone)]
pub struct JsonStorage {
    root: PathBuf,
    slot: PathBuf,
}

impl JsonStorage {
    pub fn new(root: Option<PathBuf>, storage_key: &str) -> Result<Self> {
        let root = root.unwrap_or_else(app_data_dir);
        ensure_dir(&root)?;
        let slot = root.join(format!("{}.{}", canonical_name(storage_key), SLOT_EXTENSION));
        Ok(Self { root, slot })
    }

    pub fn slot_path(&self) -> &Path {
        &self.slot
    }

    /// Copies an unreadable slot aside so the next save cannot destroy it.
    fn quarantine(&self) -> Result<PathBuf> {
        let stem = self
            .slot
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or("entries");
        let timestamp = Utc::now().format(QUARANTINE_TIMESTAMP_FORMAT);
        let target = self
            .root
            .join(format!("{stem}.corrupt-{timestamp}.{SLOT_EXTENSION}"));
        fs::copy(&self.slot, &target)?;
        Ok(target)
    }
}

impl EntryStorage for JsonStorage {
    fn load(&self) -> Result<Vec<Entry>> {
        if !self.slot.exists() {
            debug!(path = %self.slot.display(), "no stored entries yet");
            return Ok(Vec::new());
        }
        let data = fs::read(&self.slot)?;
        match decode_entries(&data) {
            Ok(entries) => {
                debug!(count = entries.len(), path = %self.slot.display(), "loaded entries");
                Ok(entries)
            }
            Err(err) => {
                warn!(path = %self.slot.display(), %err, "stored entries are malformed; starting empty");
                let copy = self.quarantine().map_err(|copy_err| {
                    error!(%copy_err, "could not preserve the malformed slot");
                    copy_err
                })?;
                warn!(path = %copy.display(), "kept a copy of the malformed slot");
                Ok(Vec::new())
            }
        }
    }

    fn save(&self, entries: &[Entry]) -> Result<()> {
        let json = serde_json::to_string_pretty(entries)?;
        write_atomic(&self.slot, &json)?;
        debug!(count = entries.len(), path = %self.slot.display(), "saved entries");
        Ok(())
    }
}
