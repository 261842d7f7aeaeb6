//! Key-value store interface
//!
//! The session layer only ever sees this trait: JSON documents in named
//! collections, addressed by string id. The in-memory implementation backs
//! the server and the tests; a real database adapter would live behind the
//! same five operations.

use rustc_hash::FxHashMap;
use serde_json::Value;
use std::sync::RwLock;

/// Collection holding game records
pub const GAMES: &str = "games";

/// Collection holding player records
pub const PLAYERS: &str = "players";

pub trait Store: Send + Sync {
    /// Insert or replace a whole document
    fn put(&self, collection: &str, id: &str, record: Value);

    fn get(&self, collection: &str, id: &str) -> Option<Value>;

    /// Remove a document; removing a missing one is a no-op
    fn delete(&self, collection: &str, id: &str);

    /// Shallow-merge `fields` (a JSON object) into an existing document.
    /// No-op when the document is missing.
    fn update_fields(&self, collection: &str, id: &str, fields: Value);

    fn scan(&self, collection: &str) -> Vec<Value>;
}

/// In-memory store
#[derive(Default)]
pub struct MemoryStore {
    collections: RwLock<FxHashMap<String, FxHashMap<String, Value>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Store for MemoryStore {
    fn put(&self, collection: &str, id: &str, record: Value) {
        let mut collections = self.collections.write().unwrap();
        collections
            .entry(collection.to_string())
            .or_default()
            .insert(id.to_string(), record);
    }

    fn get(&self, collection: &str, id: &str) -> Option<Value> {
        let collections = self.collections.read().unwrap();
        collections.get(collection)?.get(id).cloned()
    }

    fn delete(&self, collection: &str, id: &str) {
        let mut collections = self.collections.write().unwrap();
        if let Some(records) = collections.get_mut(collection) {
            records.remove(id);
        }
    }

    fn update_fields(&self, collection: &str, id: &str, fields: Value) {
        let Value::Object(fields) = fields else {
            return;
        };
        let mut collections = self.collections.write().unwrap();
        let Some(Value::Object(record)) = collections
            .get_mut(collection)
            .and_then(|records| records.get_mut(id))
        else {
            return;
        };
        for (key, value) in fields {
            record.insert(key, value);
        }
    }

    fn scan(&self, collection: &str) -> Vec<Value> {
        let collections = self.collections.read().unwrap();
        collections
            .get(collection)
            .map(|records| records.values().cloned().collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_put_get_delete() {
        let store = MemoryStore::new();
        store.put(GAMES, "g1", json!({"name": "one"}));
        assert_eq!(store.get(GAMES, "g1"), Some(json!({"name": "one"})));
        assert_eq!(store.get(GAMES, "g2"), None);
        assert_eq!(store.get(PLAYERS, "g1"), None);

        store.delete(GAMES, "g1");
        assert_eq!(store.get(GAMES, "g1"), None);
        // deleting twice is fine
        store.delete(GAMES, "g1");
    }

    #[test]
    fn test_update_fields_merges_shallow() {
        let store = MemoryStore::new();
        store.put(GAMES, "g1", json!({"name": "one", "host_turn": true}));
        store.update_fields(GAMES, "g1", json!({"host_turn": false, "challenger": "p2"}));
        assert_eq!(
            store.get(GAMES, "g1"),
            Some(json!({"name": "one", "host_turn": false, "challenger": "p2"}))
        );
    }

    #[test]
    fn test_update_fields_on_missing_doc_is_a_noop() {
        let store = MemoryStore::new();
        store.update_fields(GAMES, "nope", json!({"x": 1}));
        assert_eq!(store.get(GAMES, "nope"), None);
    }

    #[test]
    fn test_scan() {
        let store = MemoryStore::new();
        assert!(store.scan(GAMES).is_empty());
        store.put(GAMES, "g1", json!({"n": 1}));
        store.put(GAMES, "g2", json!({"n": 2}));
        assert_eq!(store.scan(GAMES).len(), 2);
    }
}
