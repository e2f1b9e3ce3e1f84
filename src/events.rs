//! Idempotent event dedup guard
//!
//! Serverless platforms deliver at-least-once: the same event can reach a
//! function twice, seconds or hours apart. [`event_exists`] marks each
//! event id as processed in a side collection and tells the caller to
//! abort on redelivery. Markers older than 24 hours are garbage-collected
//! on the way through, in sequential atomic batches.

use chrono::{Duration, Utc};
use std::sync::Mutex;
use tracing::{info, warn};

use crate::bulk::ArrayChunk;
use crate::document::Timestamp;
use crate::errors::{TriggerError, TriggerResult, WritePolicy};
use crate::store::{DocumentStore, FilterOp, Patch, Query};

/// Default collection holding event markers
pub const DEFAULT_EVENTS_COLLECTION: &str = "_events";

/// Marker field holding the completion timestamp
pub const COMPLETED_FIELD: &str = "completed";

/// How long event markers are retained before garbage collection
const MARKER_RETENTION_HOURS: i64 = 24;

/// Per-invocation trigger metadata: the platform event id and the resource
/// path of the document that fired the trigger.
///
/// The context also carries the dedup guard's single-slot "last seen
/// event id". Scoping the slot to the context keeps concurrent
/// invocations in one process independent; the slot still only remembers
/// the most recent id, so it cannot catch duplicates interleaved with a
/// different event through the same context. That limitation is
/// inherited behavior; the persisted marker is the real guard.
#[derive(Debug)]
pub struct TriggerContext {
    event_id: String,
    resource: String,
    last_event: Mutex<Option<String>>,
}

impl TriggerContext {
    /// Create a context from the platform's event id and resource path
    pub fn new(event_id: impl Into<String>, resource: impl Into<String>) -> Self {
        Self {
            event_id: event_id.into(),
            resource: resource.into(),
            last_event: Mutex::new(None),
        }
    }

    /// Unique id of this delivery attempt
    pub fn event_id(&self) -> &str {
        &self.event_id
    }

    /// Resource path of the triggering document
    pub fn resource(&self) -> &str {
        &self.resource
    }

    /// Collection id of the triggering document (second-to-last segment)
    pub fn collection_id(&self) -> TriggerResult<&str> {
        let mut segments = self.resource.rsplit('/');
        segments.next();
        segments
            .next()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| TriggerError::InvalidResourcePath(self.resource.clone()))
    }

    /// Document id of the triggering document (last segment)
    pub fn document_id(&self) -> TriggerResult<&str> {
        self.resource
            .rsplit('/')
            .next()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| TriggerError::InvalidResourcePath(self.resource.clone()))
    }

    /// Record this context's event id in the slot; true if it was already
    /// the most recent id seen.
    fn already_seen(&self) -> bool {
        let mut slot = self.last_event.lock().unwrap_or_else(|e| e.into_inner());
        if slot.as_deref() == Some(self.event_id.as_str()) {
            return true;
        }
        *slot = Some(self.event_id.clone());
        false
    }
}

/// Check whether this event was already processed, marking it if not.
///
/// Returns `true` when the event is a duplicate delivery and the caller
/// should skip all further side effects. On first delivery the marker is
/// written best-effort, expired markers are swept, and `false` is
/// returned. Uses the default `_events` collection; see
/// [`event_exists_in`] to override it.
pub async fn event_exists(
    store: &dyn DocumentStore,
    ctx: &TriggerContext,
) -> TriggerResult<bool> {
    event_exists_in(store, ctx, DEFAULT_EVENTS_COLLECTION).await
}

/// [`event_exists`] against a caller-chosen marker collection
pub async fn event_exists_in(
    store: &dyn DocumentStore,
    ctx: &TriggerContext,
    events_col: &str,
) -> TriggerResult<bool> {
    // Same context, same event: already handled in this invocation.
    if ctx.already_seen() {
        return Ok(false);
    }

    let marker_path = format!("{}/{}", events_col, ctx.event_id());
    if store.get(&marker_path).await?.is_some() {
        info!("Duplicate function run: {}", ctx.event_id());
        return Ok(true);
    }

    // First delivery: persist the marker. Markers are written once and
    // never overwritten.
    let mut marker = Patch::new();
    marker.set_server_timestamp(COMPLETED_FIELD);
    WritePolicy::BestEffort.apply(
        store.set_merge(&marker_path, marker).await,
        "event marker write",
    )?;

    collect_expired_markers(store, events_col).await?;
    Ok(false)
}

/// Delete all markers completed at or before the retention cutoff.
///
/// One atomic batch per chunk, issued sequentially; a failed chunk is
/// logged and the sweep moves on, so partial sweeps are possible. The
/// next invocation picks up whatever was left behind.
async fn collect_expired_markers(
    store: &dyn DocumentStore,
    events_col: &str,
) -> TriggerResult<()> {
    let cutoff = Timestamp::from(Utc::now() - Duration::hours(MARKER_RETENTION_HOURS));
    let query = Query::collection(events_col).where_field(
        COMPLETED_FIELD,
        FilterOp::Le,
        cutoff.to_value(),
    );

    let stale: Vec<String> = store
        .query(&query)
        .await?
        .into_iter()
        .map(|doc| doc.path)
        .collect();
    if stale.is_empty() {
        return Ok(());
    }

    let total = stale.len();
    info!("Deleting {} expired event markers", total);
    let chunks = ArrayChunk::new(stale);
    for chunk in chunks.iter() {
        if let Err(e) = store.delete_batch(chunk).await {
            warn!("Event marker sweep batch failed: {}", e);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_path_parsing() {
        let ctx = TriggerContext::new(
            "evt-1",
            "projects/p/databases/(default)/documents/posts/p1",
        );
        assert_eq!(ctx.collection_id().unwrap(), "posts");
        assert_eq!(ctx.document_id().unwrap(), "p1");
    }

    #[test]
    fn test_short_resource_path_rejected() {
        let ctx = TriggerContext::new("evt-1", "justone");
        assert!(ctx.collection_id().is_err());
        assert_eq!(ctx.document_id().unwrap(), "justone");

        let ctx = TriggerContext::new("evt-1", "");
        assert!(ctx.document_id().is_err());
    }

    #[test]
    fn test_already_seen_single_slot() {
        let ctx = TriggerContext::new("evt-1", "c/d");
        assert!(!ctx.already_seen());
        assert!(ctx.already_seen());
        assert!(ctx.already_seen());
    }
}
