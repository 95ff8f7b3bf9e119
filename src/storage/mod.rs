pub mod json_backend;
pub mod memory;

use crate::{domain::Entry, errors::StorageError};

pub type Result<T> = std::result::Result<T, StorageError>;

/// Durable slot holding the whole entry collection as one JSON array.
pub trait EntryStorage: Send + Sync {
    /// Reads the slot. A missing slot yields an empty collection; backends fail
    /// soft on malformed contents instead of surfacing a parse error, but only
    /// once the malformed contents are safe from the next save.
    fn load(&self) -> Result<Vec<Entry>>;

    /// Serializes `entries` and overwrites the slot.
    fn save(&self, entries: &[Entry]) -> Result<()>;
}

/// Decodes stored slot bytes. Blank contents count as an empty collection;
/// invalid UTF-8 is a decode error like any other malformed input.
pub(crate) fn decode_entries(raw: &[u8]) -> std::result::Result<Vec<Entry>, serde_json::Error> {
    if raw.iter().all(u8::is_ascii_whitespace) {
        return Ok(Vec::new());
    }
    serde_json::from_slice(raw)
}

pub use json_backend::{JsonStorage, DEFAULT_STORAGE_KEY};
pub use memory::MemoryStorage;
