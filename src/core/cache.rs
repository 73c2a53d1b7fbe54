use crate::domain::model::OperationResult;
use serde_json::{Map, Value};
use std::collections::hash_map::DefaultHasher;
use std::collections::{BTreeMap, HashMap};
use std::hash::{Hash, Hasher};
use tokio::sync::Mutex;

/// Identifies an operation by its document and variables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OperationKey(u64);

impl OperationKey {
    pub fn new(query: &str, variables: &Map<String, Value>) -> Self {
        let mut hasher = DefaultHasher::new();
        query.hash(&mut hasher);
        let sorted: BTreeMap<&String, &Value> = variables.iter().collect();
        serde_json::to_string(&sorted)
            .unwrap_or_default()
            .hash(&mut hasher);
        Self(hasher.finish())
    }
}

/// Per-client store of query results.
#[derive(Debug, Default)]
pub struct DocumentCache {
    entries: Mutex<HashMap<OperationKey, OperationResult>>,
}

impl DocumentCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, key: OperationKey) -> Option<OperationResult> {
        self.entries.lock().await.get(&key).cloned()
    }

    pub async fn insert(&self, key: OperationKey, result: OperationResult) {
        self.entries.lock().await.insert(key, result);
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }
}
