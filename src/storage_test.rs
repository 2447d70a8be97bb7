use super::*;

struct BrokenStorage;

impl Storage for BrokenStorage {
    fn get_item(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Err(StorageError::Unavailable)
    }

    fn set_item(&mut self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Err(StorageError::Browser("QuotaExceededError".to_owned()))
    }

    fn remove_item(&mut self, _key: &str) -> Result<(), StorageError> {
        Err(StorageError::Unavailable)
    }
}

#[test]
fn memory_storage_set_get_remove() {
    let mut storage = MemoryStorage::new();
    assert!(storage.is_empty());
    storage.set_item("k", "v").expect("set");
    assert_eq!(storage.get_item("k").expect("get").as_deref(), Some("v"));
    assert_eq!(storage.len(), 1);
    storage.remove_item("k").expect("remove");
    assert_eq!(storage.get_item("k").expect("get"), None);
}

#[test]
fn memory_storage_overwrites() {
    let mut storage = MemoryStorage::new();
    storage.set_item("k", "1").expect("set");
    storage.set_item("k", "2").expect("set");
    assert_eq!(storage.get_item("k").expect("get").as_deref(), Some("2"));
    assert_eq!(storage.len(), 1);
}

#[test]
fn save_json_writes_serialized_value() {
    let mut storage = MemoryStorage::new();
    save_json(&mut storage, "draft", &serde_json::json!({"a": [1, 2]}));
    assert_eq!(storage.get_item("draft").expect("get").as_deref(), Some(r#"{"a":[1,2]}"#));
}

#[test]
fn save_json_tolerates_broken_storage() {
    let mut storage = BrokenStorage;
    save_json(&mut storage, "k", &1_u32);
}
