//! The session's entry collection and its mutate-then-persist operations.

use chrono::NaiveDate;
use tracing::{debug, error, warn};

use crate::core::clock::Clock;
use crate::domain::{Entry, EntryDraft, EntryId};
use crate::errors::{StorageError, StoreError};
use crate::storage::EntryStorage;

pub type StoreResult<T> = Result<T, StoreError>;

/// Owns the in-memory entries and mirrors every change to its storage slot.
///
/// The in-memory collection is authoritative for the session: when a save
/// fails the mutation stays applied and the call reports
/// [`StoreError::Persistence`].
pub struct EntryStore {
    entries: Vec<Entry>,
    storage: Box<dyn EntryStorage>,
    clock: Box<dyn Clock>,
    load_error: Option<String>,
}

impl EntryStore {
    /// Loads the stored collection. A storage error is logged and the session
    /// starts with an empty collection that is never written back, so the
    /// unread slot survives the session.
    pub fn open(storage: Box<dyn EntryStorage>, clock: Box<dyn Clock>) -> Self {
        let (entries, load_error) = match storage.load() {
            Ok(entries) => (entries, None),
            Err(err) => {
                warn!(%err, "could not load stored entries; starting empty without saving");
                (Vec::new(), Some(err.to_string()))
            }
        };
        debug!(count = entries.len(), "entry store opened");
        Self {
            entries,
            storage,
            clock,
            load_error,
        }
    }

    /// Why the slot could not be read, when saving is blocked for the session.
    pub fn load_error(&self) -> Option<&str> {
        self.load_error.as_deref()
    }

    pub fn list(&self) -> &[Entry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: &EntryId) -> Option<&Entry> {
        self.entries.iter().find(|entry| &entry.id == id)
    }

    /// Finds an entry by exact id, falling back to a unique id prefix.
    pub fn resolve(&self, reference: &str) -> StoreResult<&Entry> {
        let reference = reference.trim();
        if let Some(entry) = self.entries.iter().find(|entry| entry.id.as_str() == reference) {
            return Ok(entry);
        }
        if reference.is_empty() {
            return Err(StoreError::NotFound(reference.to_string()));
        }
        let mut matches = self
            .entries
            .iter()
            .filter(|entry| entry.id.as_str().starts_with(reference));
        match (matches.next(), matches.next()) {
            (Some(entry), None) => Ok(entry),
            (Some(_), Some(_)) => Err(StoreError::AmbiguousId(reference.to_string())),
            (None, _) => Err(StoreError::NotFound(reference.to_string())),
        }
    }

    /// Current date according to the store's clock; the default date for new entries.
    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// Validates and appends a new entry, returning it with its fresh id.
    pub fn add(&mut self, draft: EntryDraft) -> StoreResult<Entry> {
        let draft = draft.validated()?;
        let entry = draft.into_entry(self.mint_id());
        self.entries.push(entry.clone());
        debug!(id = %entry.id, kind = %entry.kind, amount = entry.amount, "entry added");
        self.persist()?;
        Ok(entry)
    }

    /// Overwrites the mutable fields of the entry `id` in place.
    pub fn update(&mut self, id: &EntryId, draft: EntryDraft) -> StoreResult<Entry> {
        let position = self
            .position(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        let draft = draft.validated()?;
        let entry = &mut self.entries[position];
        entry.apply(draft);
        let updated = entry.clone();
        debug!(id = %updated.id, position, "entry updated");
        self.persist()?;
        Ok(updated)
    }

    /// Deletes the entry `id`. An unknown id leaves the collection and the slot untouched.
    pub fn remove(&mut self, id: &EntryId) -> StoreResult<Option<Entry>> {
        let Some(position) = self.position(id) else {
            debug!(%id, "remove ignored unknown id");
            return Ok(None);
        };
        let removed = self.entries.remove(position);
        debug!(id = %removed.id, "entry removed");
        self.persist()?;
        Ok(Some(removed))
    }

    /// Drops every entry and returns how many were removed.
    pub fn clear(&mut self) -> StoreResult<usize> {
        let count = self.entries.len();
        self.entries.clear();
        debug!(count, "entries cleared");
        self.persist()?;
        Ok(count)
    }

    fn position(&self, id: &EntryId) -> Option<usize> {
        self.entries.iter().position(|entry| &entry.id == id)
    }

    fn mint_id(&self) -> EntryId {
        loop {
            let id = EntryId::generate();
            if self.position(&id).is_none() {
                return id;
            }
        }
    }

    fn persist(&self) -> StoreResult<()> {
        if let Some(reason) = &self.load_error {
            warn!(%reason, "skipping save over an unread slot");
            return Err(StorageError::Unreadable(reason.clone()).into());
        }
        self.storage.save(&self.entries).map_err(|err| {
            error!(%err, "failed to persist entries; keeping in-memory state");
            StoreError::from(err)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::clock::FixedClock;
    use crate::domain::EntryKind;
    use crate::errors::ValidationError;
    use crate::storage::MemoryStorage;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn store_with(storage: &MemoryStorage) -> EntryStore {
        EntryStore::open(
            Box::new(storage.clone()),
            Box::new(FixedClock::new(date(2024, 2, 14))),
        )
    }

    fn food(amount: f64) -> EntryDraft {
        EntryDraft::new(EntryKind::Expense, amount, "Food", date(2024, 1, 10))
    }

    #[test]
    fn add_appends_and_persists() {
        let storage = MemoryStorage::new();
        let mut store = store_with(&storage);
        let entry = store.add(food(300.0)).unwrap();

        assert_eq!(store.list(), &[entry.clone()]);
        assert_eq!(storage.write_count(), 1);
        assert!(storage.contents().unwrap().contains(entry.id.as_str()));
    }

    #[test]
    fn rejected_add_does_not_touch_state_or_storage() {
        let storage = MemoryStorage::new();
        let mut store = store_with(&storage);
        let err = store.add(food(0.0)).unwrap_err();
        assert!(matches!(
            err,
            StoreError::Validation(ValidationError::NonPositiveAmount)
        ));
        let err = store
            .add(EntryDraft::new(EntryKind::Income, 5.0, "", date(2024, 1, 1)))
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::Validation(ValidationError::EmptyCategory)
        ));
        assert!(store.is_empty());
        assert_eq!(storage.write_count(), 0);
    }

    #[test]
    fn update_keeps_identity_and_position() {
        let storage = MemoryStorage::new();
        let mut store = store_with(&storage);
        let first = store.add(food(10.0)).unwrap();
        let second = store.add(food(20.0)).unwrap();
        let third = store.add(food(30.0)).unwrap();

        let draft = EntryDraft::new(EntryKind::Income, 99.0, "Refund", date(2024, 3, 1))
            .with_description("returned item");
        let updated = store.update(&second.id, draft).unwrap();

        assert_eq!(updated.id, second.id);
        let ids: Vec<_> = store.list().iter().map(|e| e.id.clone()).collect();
        assert_eq!(ids, vec![first.id.clone(), second.id.clone(), third.id.clone()]);
        assert_eq!(store.list()[0], first);
        assert_eq!(store.list()[2], third);
        assert_eq!(store.list()[1].category, "Refund");
        assert_eq!(store.list()[1].kind, EntryKind::Income);
    }

    #[test]
    fn update_unknown_id_is_not_found_and_does_not_save() {
        let storage = MemoryStorage::new();
        let mut store = store_with(&storage);
        let err = store
            .update(&EntryId::from("missing"), food(1.0))
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound(ref id) if id == "missing"));
        assert_eq!(storage.write_count(), 0);
    }

    #[test]
    fn remove_unknown_id_is_a_no_op() {
        let storage = MemoryStorage::new();
        let mut store = store_with(&storage);
        store.add(food(1.0)).unwrap();
        assert!(store.remove(&EntryId::from("missing")).unwrap().is_none());
        assert_eq!(store.len(), 1);
        assert_eq!(storage.write_count(), 1);
    }

    #[test]
    fn failed_save_keeps_in_memory_mutation() {
        let storage = MemoryStorage::new();
        let mut store = store_with(&storage);
        storage.set_fail_writes(true);
        let err = store.add(food(5.0)).unwrap_err();
        assert!(err.is_persistence());
        assert_eq!(store.len(), 1);
        assert_eq!(storage.contents(), None);
    }

    #[test]
    fn failed_remove_and_clear_stay_applied() {
        let storage = MemoryStorage::new();
        let mut store = store_with(&storage);
        let kept = store.add(food(1.0)).unwrap();
        let dropped = store.add(food(2.0)).unwrap();
        storage.set_fail_writes(true);

        let err = store.remove(&dropped.id).unwrap_err();
        assert!(matches!(err, StoreError::Persistence(_)));
        assert_eq!(store.list(), &[kept.clone()]);

        let err = store.clear().unwrap_err();
        assert!(matches!(err, StoreError::Persistence(_)));
        assert!(store.is_empty());
        assert_eq!(storage.write_count(), 2);
    }

    struct UnreadableStorage {
        inner: MemoryStorage,
    }

    impl EntryStorage for UnreadableStorage {
        fn load(&self) -> crate::storage::Result<Vec<Entry>> {
            Err(StorageError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "slot locked",
            )))
        }

        fn save(&self, entries: &[Entry]) -> crate::storage::Result<()> {
            self.inner.save(entries)
        }
    }

    #[test]
    fn load_failure_blocks_every_save() {
        let inner = MemoryStorage::with_contents("[]");
        let mut store = EntryStore::open(
            Box::new(UnreadableStorage {
                inner: inner.clone(),
            }),
            Box::new(FixedClock::new(date(2024, 2, 14))),
        );
        assert!(store.load_error().is_some_and(|reason| reason.contains("slot locked")));

        let err = store.add(food(4.0)).unwrap_err();
        assert!(matches!(
            err,
            StoreError::Persistence(StorageError::Unreadable(_))
        ));
        assert_eq!(store.len(), 1);
        assert_eq!(inner.write_count(), 0);
        assert_eq!(inner.contents().as_deref(), Some("[]"));
    }

    #[test]
    fn resolve_accepts_unique_prefixes_only() {
        let storage = MemoryStorage::with_contents(
            r#"[{"id":"id100","type":"income","amount":1,"category":"a","date":"2024-01-01","description":""},
                {"id":"id200","type":"income","amount":1,"category":"b","date":"2024-01-01","description":""}]"#,
        );
        let store = store_with(&storage);
        assert_eq!(store.resolve("id1").unwrap().category, "a");
        assert!(matches!(store.resolve("id"), Err(StoreError::AmbiguousId(_))));
        assert!(matches!(store.resolve("zz"), Err(StoreError::NotFound(_))));
    }

    #[test]
    fn today_comes_from_the_clock() {
        let store = store_with(&MemoryStorage::new());
        assert_eq!(store.today(), date(2024, 2, 14));
    }
}
