//! In-memory document store
//!
//! Backs the test suite and local runs. Documents live in a single map
//! keyed by full path under a tokio `RwLock`; batch deletes are atomic
//! under the write lock.

use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::document::{DocumentSnapshot, Fields, Timestamp};
use crate::errors::TriggerResult;

use super::{DocumentStore, Patch, Query, WriteValue};

/// In-memory [`DocumentStore`] implementation
#[derive(Debug, Default)]
pub struct MemoryStore {
    docs: RwLock<BTreeMap<String, Fields>>,
}

impl MemoryStore {
    /// Empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a document wholesale. Test seeding helper.
    pub async fn insert(&self, path: impl Into<String>, fields: Fields) {
        self.docs.write().await.insert(path.into(), fields);
    }

    /// Add a document to a collection under a generated id.
    ///
    /// Returns the full document path.
    pub async fn add(&self, collection: &str, fields: Fields) -> TriggerResult<String> {
        let path = format!("{}/{}", collection, Uuid::now_v7());
        self.docs.write().await.insert(path.clone(), fields);
        Ok(path)
    }

    /// Number of documents currently stored
    pub async fn doc_count(&self) -> usize {
        self.docs.read().await.len()
    }

    fn resolve(patch: Patch) -> Fields {
        let now = Timestamp::now().to_value();
        let mut fields = Fields::new();
        for (field, value) in patch.iter() {
            let resolved = match value {
                WriteValue::Value(v) => v.clone(),
                WriteValue::ServerTimestamp => now.clone(),
            };
            fields.insert(field.clone(), resolved);
        }
        fields
    }

    fn in_collection(path: &str, collection: &str) -> bool {
        path.strip_prefix(collection)
            .and_then(|rest| rest.strip_prefix('/'))
            .is_some_and(|id| !id.contains('/'))
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn get(&self, path: &str) -> TriggerResult<Option<DocumentSnapshot>> {
        let docs = self.docs.read().await;
        Ok(docs
            .get(path)
            .map(|fields| DocumentSnapshot::new(path, fields.clone())))
    }

    async fn query(&self, query: &Query) -> TriggerResult<Vec<DocumentSnapshot>> {
        let docs = self.docs.read().await;
        let mut results: Vec<DocumentSnapshot> = docs
            .iter()
            .filter(|(path, _)| Self::in_collection(path, &query.collection))
            .map(|(path, fields)| DocumentSnapshot::new(path.clone(), fields.clone()))
            .filter(|snap| query.filter.as_ref().is_none_or(|f| f.matches(snap)))
            .collect();

        if let Some((field, direction)) = &query.order_by {
            results.sort_by(|a, b| {
                let ordering = match (a.get(field), b.get(field)) {
                    (Some(x), Some(y)) => {
                        super::compare_values(x, y).unwrap_or(std::cmp::Ordering::Equal)
                    }
                    (Some(_), None) => std::cmp::Ordering::Less,
                    (None, Some(_)) => std::cmp::Ordering::Greater,
                    (None, None) => std::cmp::Ordering::Equal,
                };
                match direction {
                    super::Direction::Ascending => ordering,
                    super::Direction::Descending => ordering.reverse(),
                }
            });
        }

        if let Some(limit) = query.limit {
            results.truncate(limit);
        }
        Ok(results)
    }

    async fn set_merge(&self, path: &str, patch: Patch) -> TriggerResult<()> {
        let resolved = Self::resolve(patch);
        let mut docs = self.docs.write().await;
        let fields = docs.entry(path.to_string()).or_default();
        for (field, value) in resolved {
            fields.insert(field, value);
        }
        debug!("Merged patch onto {}", path);
        Ok(())
    }

    async fn delete_batch(&self, paths: &[String]) -> TriggerResult<()> {
        let mut docs = self.docs.write().await;
        for path in paths {
            docs.remove(path);
        }
        debug!("Deleted batch of {} documents", paths.len());
        Ok(())
    }
}
