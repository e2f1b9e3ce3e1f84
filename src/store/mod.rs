//! Document store abstraction
//!
//! The helpers never talk to a concrete database; they consume a
//! [`DocumentStore`] capability: get-by-path, query-with-limit, partial
//! merge-write, and atomic batch delete. Server-assigned timestamps are
//! expressed as a write sentinel resolved by the store at commit, never a
//! client clock value.
//!
//! [`memory::MemoryStore`] provides an in-memory implementation backing
//! the test suite and local runs.

use async_trait::async_trait;
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::document::{DocumentSnapshot, Timestamp};
use crate::errors::TriggerResult;

pub mod memory;

pub use memory::MemoryStore;

/// A value to write into a document field
#[derive(Debug, Clone, PartialEq)]
pub enum WriteValue {
    /// A literal JSON value
    Value(Value),
    /// Resolved to the commit time by the store
    ServerTimestamp,
}

/// A partial update: fields to merge onto a document.
///
/// Fields not named in the patch are left untouched by `set_merge`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Patch {
    entries: BTreeMap<String, WriteValue>,
}

impl Patch {
    /// Empty patch
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field to a literal value
    pub fn set(&mut self, field: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.entries
            .insert(field.into(), WriteValue::Value(value.into()));
        self
    }

    /// Set a field to the store's commit timestamp
    pub fn set_server_timestamp(&mut self, field: impl Into<String>) -> &mut Self {
        self.entries.insert(field.into(), WriteValue::ServerTimestamp);
        self
    }

    /// Whether the patch names any fields
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether the patch names a field
    pub fn contains(&self, field: &str) -> bool {
        self.entries.contains_key(field)
    }

    /// Iterate over field/value entries
    pub fn iter(&self) -> impl Iterator<Item = (&String, &WriteValue)> {
        self.entries.iter()
    }
}

/// Comparison operator for query filters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    /// Equal
    Eq,
    /// Less than
    Lt,
    /// Less than or equal
    Le,
    /// Greater than
    Gt,
    /// Greater than or equal
    Ge,
}

/// A single field filter on a query
#[derive(Debug, Clone, PartialEq)]
pub struct FieldFilter {
    /// Field to compare
    pub field: String,
    /// Comparison operator
    pub op: FilterOp,
    /// Right-hand value
    pub value: Value,
}

/// Sort direction for query ordering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Smallest first
    Ascending,
    /// Largest first
    Descending,
}

/// A query over one collection: optional filter, ordering, and limit
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    /// Collection path to scan
    pub collection: String,
    /// Optional field filter
    pub filter: Option<FieldFilter>,
    /// Optional ordering
    pub order_by: Option<(String, Direction)>,
    /// Optional result cap
    pub limit: Option<usize>,
}

impl Query {
    /// Query over every document in a collection
    pub fn collection(path: impl Into<String>) -> Self {
        Self {
            collection: path.into(),
            filter: None,
            order_by: None,
            limit: None,
        }
    }

    /// Keep only documents whose field compares true against the value
    pub fn where_field(
        mut self,
        field: impl Into<String>,
        op: FilterOp,
        value: impl Into<Value>,
    ) -> Self {
        self.filter = Some(FieldFilter {
            field: field.into(),
            op,
            value: value.into(),
        });
        self
    }

    /// Order results by a field
    pub fn order_by(mut self, field: impl Into<String>, direction: Direction) -> Self {
        self.order_by = Some((field.into(), direction));
        self
    }

    /// Cap the number of results
    pub fn limit(mut self, n: usize) -> Self {
        self.limit = Some(n);
        self
    }
}

/// Async document store capability consumed by every helper
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch one document by path, `None` if it does not exist
    async fn get(&self, path: &str) -> TriggerResult<Option<DocumentSnapshot>>;

    /// Run a query, honoring its filter, ordering, and limit
    async fn query(&self, query: &Query) -> TriggerResult<Vec<DocumentSnapshot>>;

    /// Merge a patch onto a document, creating it if absent.
    ///
    /// Server-timestamp sentinels are resolved at commit; fields not in
    /// the patch are untouched.
    async fn set_merge(&self, path: &str, patch: Patch) -> TriggerResult<()>;

    /// Delete the listed documents as one atomic batch
    async fn delete_batch(&self, paths: &[String]) -> TriggerResult<()>;
}

/// Order two stored values for filtering and sorting.
///
/// Timestamp-shaped maps compare as timestamps, numbers as f64, strings
/// and booleans natively. Mixed or unordered types compare as `None` and
/// fail any filter.
pub(crate) fn compare_values(a: &Value, b: &Value) -> Option<Ordering> {
    if let (Some(ta), Some(tb)) = (Timestamp::from_value(a), Timestamp::from_value(b)) {
        return Some(ta.cmp(&tb));
    }
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64().partial_cmp(&y.as_f64()),
        (Value::String(x), Value::String(y)) => Some(x.cmp(y)),
        (Value::Bool(x), Value::Bool(y)) => Some(x.cmp(y)),
        _ => None,
    }
}

impl FieldFilter {
    /// Whether a document passes this filter
    pub(crate) fn matches(&self, snapshot: &DocumentSnapshot) -> bool {
        let Some(value) = snapshot.get(&self.field) else {
            return false;
        };
        let Some(ordering) = compare_values(value, &self.value) else {
            return false;
        };
        match self.op {
            FilterOp::Eq => ordering == Ordering::Equal,
            FilterOp::Lt => ordering == Ordering::Less,
            FilterOp::Le => ordering != Ordering::Greater,
            FilterOp::Gt => ordering == Ordering::Greater,
            FilterOp::Ge => ordering != Ordering::Less,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_patch_builder() {
        let mut patch = Patch::new();
        assert!(patch.is_empty());

        patch.set("title", "hello").set_server_timestamp("updatedAt");
        assert!(!patch.is_empty());
        assert!(patch.contains("title"));
        assert_eq!(
            patch.iter().map(|(k, _)| k.as_str()).collect::<Vec<_>>(),
            vec!["title", "updatedAt"]
        );
    }

    #[test]
    fn test_compare_values_timestamps() {
        let a = json!({"_seconds": 10, "_nanoseconds": 0});
        let b = json!({"_seconds": 11, "_nanoseconds": 0});
        assert_eq!(compare_values(&a, &b), Some(Ordering::Less));
        assert_eq!(compare_values(&b, &b), Some(Ordering::Equal));
    }

    #[test]
    fn test_compare_values_mixed_types() {
        assert_eq!(compare_values(&json!(1), &json!("1")), None);
        assert_eq!(compare_values(&json!(1.5), &json!(2)), Some(Ordering::Less));
    }

    #[test]
    fn test_filter_missing_field_never_matches() {
        let snap = DocumentSnapshot::new("c/d", serde_json::Map::new());
        let filter = FieldFilter {
            field: "completed".to_string(),
            op: FilterOp::Le,
            value: json!(5),
        };
        assert!(!filter.matches(&snap));
    }

    #[test]
    fn test_query_builder() {
        let q = Query::collection("_events")
            .where_field("completed", FilterOp::Le, json!(100))
            .order_by("completed", Direction::Ascending)
            .limit(3);
        assert_eq!(q.collection, "_events");
        assert_eq!(q.limit, Some(3));
        assert!(q.filter.is_some());
    }
}
