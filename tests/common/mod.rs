#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::NaiveDate;
use home_book::{
    core::{EntryStore, FixedClock},
    domain::{EntryDraft, EntryKind},
    storage::{JsonStorage, DEFAULT_STORAGE_KEY},
};
use once_cell::sync::Lazy;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

/// A fresh data directory that outlives the calling test.
pub fn test_dir() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    base
}

/// Opens a store over the default JSON slot in `base`, dated 2024-02-14.
pub fn open_store(base: &Path) -> EntryStore {
    let storage = JsonStorage::new(Some(base.to_path_buf()), DEFAULT_STORAGE_KEY)
        .expect("create json storage backend");
    EntryStore::open(
        Box::new(storage),
        Box::new(FixedClock::new(date(2024, 2, 14))),
    )
}

pub fn slot_path(base: &Path) -> PathBuf {
    base.join(format!("{DEFAULT_STORAGE_KEY}.json"))
}

/// The three-entry collection used across the aggregation scenarios.
pub fn scenario_drafts() -> Vec<EntryDraft> {
    vec![
        EntryDraft::new(EntryKind::Income, 1000.0, "Salary", date(2024, 1, 5)),
        EntryDraft::new(EntryKind::Expense, 300.0, "Food", date(2024, 1, 10)),
        EntryDraft::new(EntryKind::Expense, 200.0, "Food", date(2024, 2, 1)),
    ]
}
