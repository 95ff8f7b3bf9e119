use std::{
    io,
    sync::{Arc, Mutex, MutexGuard},
};
use tracing::warn;

use crate::{domain::Entry, errors::StorageError};

use super::{decode_entries, EntryStorage, Result};

#[derive(Debug, Default)]
struct Slot {
    contents: Option<String>,
    writes: usize,
    fail_writes: bool,
}

/// In-memory slot. Clones share the same slot, so a test can keep a handle
/// while the store owns another.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    slot: Arc<Mutex<Slot>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts with raw slot text, exactly as if it had been written earlier.
    pub fn with_contents(raw: impl Into<String>) -> Self {
        let storage = Self::default();
        storage.lock().contents = Some(raw.into());
        storage
    }

    pub fn contents(&self) -> Option<String> {
        self.lock().contents.clone()
    }

    /// Number of successful saves so far.
    pub fn write_count(&self) -> usize {
        self.lock().writes
    }

    /// Makes subsequent saves fail, emulating an unavailable or full disk.
    pub fn set_fail_writes(&self, fail: bool) {
        self.lock().fail_writes = fail;
    }

    fn lock(&self) -> MutexGuard<'_, Slot> {
        self.slot
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl EntryStorage for MemoryStorage {
    fn load(&self) -> Result<Vec<Entry>> {
        let slot = self.lock();
        let Some(raw) = slot.contents.as_deref() else {
            return Ok(Vec::new());
        };
        match decode_entries(raw.as_bytes()) {
            Ok(entries) => Ok(entries),
            Err(err) => {
                warn!(%err, "in-memory slot is malformed; starting empty");
                Ok(Vec::new())
            }
        }
    }

    fn save(&self, entries: &[Entry]) -> Result<()> {
        let mut slot = self.lock();
        if slot.fail_writes {
            return Err(StorageError::Io(io::Error::new(
                io::ErrorKind::Other,
                "storage unavailable",
            )));
        }
        slot.contents = Some(serde_json::to_string(entries)?);
        slot.writes += 1;
        Ok(())
    }
}
