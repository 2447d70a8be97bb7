use serde_json::json;

use super::*;
use crate::error::StorageError;
use crate::storage::MemoryStorage;

fn defaults() -> Value {
    json!({
        "general": { "mode": "light", "layout": "default" },
        "aside": { "display": true, "minimized": false },
        "menu": { "items": ["dashboard", "settings"] }
    })
}

fn store() -> LayoutConfigStore {
    LayoutConfigStore::with_key(defaults(), "config_test")
}

struct UnreadableStorage;

impl Storage for UnreadableStorage {
    fn get_item(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Err(StorageError::Unavailable)
    }

    fn set_item(&mut self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Err(StorageError::Unavailable)
    }

    fn remove_item(&mut self, _key: &str) -> Result<(), StorageError> {
        Err(StorageError::Unavailable)
    }
}

// =============================================================
// Keys
// =============================================================

#[test]
fn default_key_uses_compiled_demo() {
    let store = LayoutConfigStore::new(json!({}));
    assert_eq!(store.key(), format!("config_{APP_DEMO}"));
    assert_eq!(store.key(), storage_key());
    assert!(store.key().starts_with("config_"));
}

// =============================================================
// get
// =============================================================

#[test]
fn get_resolves_nested_paths() {
    let store = store();
    let fallback = json!("fallback");
    assert_eq!(store.get("general.mode", &fallback), &json!("light"));
    assert_eq!(store.get("aside.display", &fallback), &json!(true));
    assert_eq!(store.get("menu.items.1", &fallback), &json!("settings"));
}

#[test]
fn get_falls_back_for_missing_paths() {
    let store = store();
    let fallback = json!("fallback");
    assert_eq!(store.get("general.missing", &fallback), &fallback);
    assert_eq!(store.get("menu.items.9", &fallback), &fallback);
    assert_eq!(store.get("menu.items.first", &fallback), &fallback);
    assert_eq!(store.get("general.mode.deeper", &fallback), &fallback);
}

#[test]
fn get_returns_stored_null() {
    let store = LayoutConfigStore::with_key(json!({ "toolbar": null }), "k");
    assert_eq!(store.get("toolbar", &json!(1)), &Value::Null);
}

#[test]
fn empty_path_yields_whole_config() {
    let store = store();
    assert_eq!(store.lookup(""), Some(&defaults()));
}

// =============================================================
// set
// =============================================================

#[test]
fn set_updates_config_and_persists_json() {
    let mut store = store();
    let mut storage = MemoryStorage::new();
    store.set("aside.minimized", json!(true), &mut storage).expect("set");

    assert_eq!(store.lookup("aside.minimized"), Some(&json!(true)));
    let raw = storage.get_item("config_test").expect("read").expect("persisted");
    let persisted: Value = serde_json::from_str(&raw).expect("json");
    assert_eq!(&persisted, store.config());
    assert_eq!(store.initial(), &defaults());
}

#[test]
fn set_creates_intermediate_containers() {
    let mut store = store();
    let mut storage = MemoryStorage::new();
    store.set("header.fixed.desktop", json!(true), &mut storage).expect("set");
    store.set("toolbar.buttons.2", json!("new"), &mut storage).expect("set");

    assert_eq!(store.config()["header"], json!({ "fixed": { "desktop": true } }));
    assert_eq!(store.config()["toolbar"], json!({ "buttons": [null, null, "new"] }));
}

#[test]
fn set_replaces_scalars_in_the_way() {
    let mut store = store();
    let mut storage = MemoryStorage::new();
    store.set("general.mode.dark", json!(1), &mut storage).expect("set");
    assert_eq!(store.config()["general"]["mode"], json!({ "dark": 1 }));
}

#[test]
fn set_indexes_existing_arrays() {
    let mut store = store();
    let mut storage = MemoryStorage::new();
    store.set("menu.items.0", json!("home"), &mut storage).expect("set");
    assert_eq!(store.config()["menu"]["items"], json!(["home", "settings"]));
}

#[test]
fn set_rejects_invalid_paths() {
    let mut store = store();
    let mut storage = MemoryStorage::new();
    for path in ["", "aside..display", ".aside", "menu.items.first"] {
        let err = store.set(path, json!(1), &mut storage).expect_err(path);
        assert!(matches!(err, ConfigError::InvalidPath { .. }), "{path}: {err}");
    }
    assert!(storage.is_empty());
    assert_eq!(store.config(), &defaults());
}

#[test]
fn set_rejects_indexes_far_past_the_end() {
    let mut store = store();
    let mut storage = MemoryStorage::new();
    for path in ["menu.items.18446744073709551615", "menu.items.4000000000000", "toolbar.slots.5000"] {
        let err = store.set(path, json!(1), &mut storage).expect_err(path);
        assert!(matches!(err, ConfigError::InvalidPath { reason: "array index out of range", .. }), "{path}: {err}");
    }
    assert!(storage.is_empty());
    assert_eq!(store.config(), &defaults());
}

#[test]
fn set_pads_arrays_up_to_the_gap_limit() {
    let mut store = store();
    let mut storage = MemoryStorage::new();
    let path = format!("menu.items.{}", 2 + MAX_ARRAY_GAP);
    store.set(&path, json!("last"), &mut storage).expect("set");
    let items = store.config()["menu"]["items"].as_array().expect("array");
    assert_eq!(items.len(), 3 + MAX_ARRAY_GAP);
    assert_eq!(items[2], Value::Null);
    assert_eq!(items[2 + MAX_ARRAY_GAP], json!("last"));
}

#[test]
fn set_survives_storage_failure() {
    let mut store = store();
    store.set("aside.display", json!(false), &mut UnreadableStorage).expect("set");
    assert_eq!(store.lookup("aside.display"), Some(&json!(false)));
}

// =============================================================
// reset
// =============================================================

#[test]
fn reset_restores_initial_without_touching_storage() {
    let mut store = store();
    let mut storage = MemoryStorage::new();
    store.set("general.layout", json!("compact"), &mut storage).expect("set");
    store.reset();
    assert_eq!(store.config(), &defaults());
    assert_eq!(storage.len(), 1);
}

// =============================================================
// override_from
// =============================================================

#[test]
fn override_merges_persisted_keys_shallowly() {
    let mut store = store();
    let mut storage = MemoryStorage::new();
    storage
        .set_item("config_test", r#"{"aside": {"minimized": true}, "extra": 1}"#)
        .expect("seed");

    store.override_from(&storage);

    // Top-level keys are replaced wholesale.
    assert_eq!(store.config()["aside"], json!({ "minimized": true }));
    assert_eq!(store.config()["extra"], json!(1));
    assert_eq!(store.config()["general"], defaults()["general"]);
    assert_eq!(store.initial(), store.config());
}

#[test]
fn override_then_reset_keeps_merged_baseline() {
    let mut store = store();
    let mut storage = MemoryStorage::new();
    storage.set_item("config_test", r#"{"extra": true}"#).expect("seed");
    store.override_from(&storage);
    store.set("extra", json!(false), &mut storage).expect("set");
    store.reset();
    assert_eq!(store.config()["extra"], json!(true));
}

#[test]
fn override_round_trips_set() {
    let mut storage = MemoryStorage::new();
    let mut first = store();
    first.set("aside.minimized", json!(true), &mut storage).expect("set");

    let mut second = store();
    second.override_from(&storage);
    assert_eq!(second.config(), first.config());
}

#[test]
fn override_without_persisted_value_keeps_defaults() {
    let mut store = store();
    store.override_from(&MemoryStorage::new());
    assert_eq!(store.config(), &defaults());
}

#[test]
fn override_ignores_unusable_persisted_values() {
    for raw in ["", "{not json", "[1, 2]", "\"text\"", "null", "42"] {
        let mut store = store();
        let mut storage = MemoryStorage::new();
        storage.set_item("config_test", raw).expect("seed");
        store.override_from(&storage);
        assert_eq!(store.config(), &defaults(), "persisted {raw:?}");
    }
}

#[test]
fn override_ignores_unreadable_storage() {
    let mut store = store();
    store.override_from(&UnreadableStorage);
    assert_eq!(store.config(), &defaults());
}

#[test]
fn read_persisted_reports_error_kinds() {
    let mut storage = MemoryStorage::new();
    storage.set_item("k", "[]").expect("seed");
    assert!(matches!(read_persisted(&storage, "k"), Err(ConfigError::NotAnObject)));
    storage.set_item("k", "{").expect("seed");
    assert!(matches!(read_persisted(&storage, "k"), Err(ConfigError::Malformed(_))));
    assert!(matches!(read_persisted(&UnreadableStorage, "k"), Err(ConfigError::Storage(_))));
}
