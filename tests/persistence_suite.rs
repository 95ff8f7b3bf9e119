mod common;

use std::fs;

use common::{date, open_store, scenario_drafts, slot_path, test_dir};
use home_book::domain::{EntryDraft, EntryKind};
use serde_json::Value;

#[test]
fn entries_survive_a_reopen_in_order() {
    let base = test_dir();
    let mut store = open_store(&base);
    for draft in scenario_drafts() {
        store.add(draft).unwrap();
    }
    let saved = store.list().to_vec();

    let reopened = open_store(&base);
    assert_eq!(reopened.list(), saved.as_slice());
}

#[test]
fn slot_uses_original_field_names() {
    let base = test_dir();
    let mut store = open_store(&base);
    store
        .add(
            EntryDraft::new(EntryKind::Expense, 300.0, "Food", date(2024, 1, 10))
                .with_description("market"),
        )
        .unwrap();

    let raw = fs::read_to_string(slot_path(&base)).unwrap();
    let json: Value = serde_json::from_str(&raw).unwrap();
    let first = &json.as_array().unwrap()[0];
    assert_eq!(first["type"], "expense");
    assert_eq!(first["amount"], 300.0);
    assert_eq!(first["category"], "Food");
    assert_eq!(first["date"], "2024-01-10");
    assert_eq!(first["description"], "market");
    assert!(first["id"].is_string());
}

#[test]
fn legacy_slot_with_timestamp_ids_loads_unchanged() {
    let base = test_dir();
    fs::write(
        slot_path(&base),
        r#"[{"id":"id1704412800000","type":"income","amount":1000,"category":"Salary","date":"2024-01-05","description":""},
            {"id":"id1704844800000","type":"expense","amount":300,"category":"Food","date":"2024-01-10"}]"#,
    )
    .unwrap();

    let store = open_store(&base);
    assert_eq!(store.len(), 2);
    assert_eq!(store.list()[0].id.as_str(), "id1704412800000");
    assert_eq!(store.list()[1].description, "");
    assert!(store.resolve("id17048").is_ok());
}

#[test]
fn malformed_slot_loads_empty_and_keeps_a_copy() {
    let base = test_dir();
    fs::write(slot_path(&base), "{ not json").unwrap();

    let store = open_store(&base);
    assert!(store.is_empty());

    let copies: Vec<_> = fs::read_dir(&base)
        .unwrap()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_name().to_string_lossy().contains(".corrupt-"))
        .collect();
    assert_eq!(copies.len(), 1);
    assert_eq!(fs::read_to_string(copies[0].path()).unwrap(), "{ not json");
}

#[test]
fn clear_writes_an_empty_array() {
    let base = test_dir();
    let mut store = open_store(&base);
    for draft in scenario_drafts() {
        store.add(draft).unwrap();
    }
    assert_eq!(store.clear().unwrap(), 3);

    let raw = fs::read_to_string(slot_path(&base)).unwrap();
    let json: Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(json, Value::Array(Vec::new()));
    assert!(open_store(&base).is_empty());
}

#[test]
fn no_staging_file_is_left_behind() {
    let base = test_dir();
    let mut store = open_store(&base);
    store.add(scenario_drafts().remove(0)).unwrap();
    let leftovers: Vec<_> = fs::read_dir(&base)
        .unwrap()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_name().to_string_lossy().ends_with(".tmp"))
        .collect();
    assert!(leftovers.is_empty());
}

#[test]
fn undecodable_slot_is_never_overwritten() {
    let base = test_dir();
    let raw = b"[{\"id\":\"id1\",\"type\":\"expense\",\"amount\":12,\"category\":\"Caf\xe9\",\"date\":\"2024-01-10\"}]".to_vec();
    fs::write(slot_path(&base), &raw).unwrap();

    let mut store = open_store(&base);
    assert!(store.is_empty());
    let copies: Vec<_> = fs::read_dir(&base)
        .unwrap()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_name().to_string_lossy().contains(".corrupt-"))
        .collect();
    assert_eq!(copies.len(), 1);
    assert_eq!(fs::read(copies[0].path()).unwrap(), raw);

    store
        .add(EntryDraft::new(EntryKind::Income, 5.0, "Gift", date(2024, 2, 1)))
        .unwrap();
    assert_eq!(fs::read(copies[0].path()).unwrap(), raw);
}

#[test]
fn slot_that_cannot_be_read_blocks_saving() {
    let base = test_dir();
    // A directory where the slot file should be makes every read fail.
    fs::create_dir(slot_path(&base)).unwrap();

    let mut store = open_store(&base);
    assert!(store.load_error().is_some());
    let err = store
        .add(EntryDraft::new(EntryKind::Income, 5.0, "Gift", date(2024, 2, 1)))
        .unwrap_err();
    assert!(err.is_persistence());
    assert_eq!(store.len(), 1);
    assert!(slot_path(&base).is_dir());
}
