//! Denormalized top-N aggregation of child documents
//!
//! [`aggregate_data`] keeps a bounded array of the most relevant child
//! documents embedded in a parent, refreshed whenever a child is written.
//! The whole array is recomputed from the caller's query rather than
//! patched in place, so the aggregate always reflects an
//! ordering-correct snapshot of the query at the moment of the
//! triggering write. The price is one read and one query per write;
//! irrelevant child updates are skipped to keep that cheap.
//!
//! Writes are not transactional: concurrent triggers on the same parent
//! can race and the last merge wins.

use serde_json::Value;
use tracing::info;

use crate::change::DocumentChange;
use crate::errors::{TriggerResult, WritePolicy};
use crate::events::TriggerContext;
use crate::fields::ID_FIELD;
use crate::store::{DocumentStore, Patch, Query};

/// Default number of child documents kept in an aggregate
pub const DEFAULT_AGGREGATE_LIMIT: usize = 3;

/// Options for [`aggregate_data`]
#[derive(Debug, Clone)]
pub struct AggregateOptions {
    /// Name of the array field on the parent; defaults to
    /// `<collection>Aggregate`
    pub aggregate_field: Option<String>,

    /// Child fields stripped from each aggregate entry
    pub field_exceptions: Vec<String>,

    /// Extra fields merged onto the parent alongside the aggregate
    pub data: Patch,

    /// Maximum number of entries kept
    pub limit: usize,

    /// Recompute even when the triggering child is not in the current
    /// aggregate. Useful when the query ordering is not insertion-stable,
    /// where a skipped recomputation could leave a stale window.
    pub always_aggregate: bool,

    /// How a failed parent write is handled
    pub write_policy: WritePolicy,
}

impl Default for AggregateOptions {
    fn default() -> Self {
        Self {
            aggregate_field: None,
            field_exceptions: Vec::new(),
            data: Patch::new(),
            limit: DEFAULT_AGGREGATE_LIMIT,
            always_aggregate: false,
            write_policy: WritePolicy::default(),
        }
    }
}

/// Recompute the aggregate array on `target_path` from the query's top-N
/// results.
///
/// The triggering child's collection and document ids come from the
/// context's resource path. On update or delete of a child that is not
/// currently represented in the aggregate, the recomputation is skipped
/// entirely (unless `always_aggregate`): rewriting the parent for a
/// child outside the window would be a wasted write.
///
/// Returns whether the parent was written.
pub async fn aggregate_data(
    store: &dyn DocumentStore,
    change: &DocumentChange,
    ctx: &TriggerContext,
    target_path: &str,
    query: &Query,
    options: AggregateOptions,
) -> TriggerResult<bool> {
    let collection_id = ctx.collection_id()?.to_string();
    let document_id = ctx.document_id()?.to_string();

    let aggregate_field = options
        .aggregate_field
        .unwrap_or_else(|| format!("{}Aggregate", collection_id));

    let target = store.get(target_path).await?;
    let children = store.query(&query.clone().limit(options.limit)).await?;

    if change.is_pop() && !options.always_aggregate {
        let represented = target
            .as_ref()
            .and_then(|t| t.get(&aggregate_field))
            .and_then(Value::as_array)
            .is_some_and(|entries| {
                entries
                    .iter()
                    .any(|entry| entry.get(ID_FIELD).and_then(Value::as_str) == Some(&document_id))
            });
        if !represented {
            return Ok(false);
        }
    }

    let entries: Vec<Value> = children
        .into_iter()
        .map(|child| {
            let mut fields = child.fields;
            fields.insert(ID_FIELD.to_string(), Value::String(child.id));
            for exception in &options.field_exceptions {
                fields.remove(exception);
            }
            Value::Object(fields)
        })
        .collect();

    let mut data = options.data;
    data.set(aggregate_field, Value::Array(entries));

    info!("Aggregating {} data on {}", collection_id, target_path);
    options
        .write_policy
        .apply(store.set_merge(target_path, data).await, "aggregate write")?;
    Ok(true)
}
