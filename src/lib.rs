//! Helpers for document-store triggered serverless functions
//!
//! This crate provides the glue a trigger handler needs around its
//! actual business logic: change classification, field diffing,
//! idempotent event dedup, timestamp bookkeeping, denormalized top-N
//! aggregation, and text-indexing helpers. The document store itself is
//! consumed through the [`store::DocumentStore`] trait; an in-memory
//! implementation backs the tests.
//!
//! A typical handler:
//!
//! ```rust,no_run
//! use docstore_triggers::{
//!     aggregate_data, event_exists, trigger_function, AggregateOptions,
//!     DocumentChange, DocumentStore, Query, TriggerContext, TriggerOptions,
//! };
//!
//! async fn on_post_write(
//!     store: &dyn DocumentStore,
//!     change: DocumentChange,
//!     ctx: TriggerContext,
//! ) -> docstore_triggers::TriggerResult<()> {
//!     // Abort on our own feedback write or a duplicate delivery.
//!     if change.is_trigger_write(ctx.event_id()) || event_exists(store, &ctx).await? {
//!         return Ok(());
//!     }
//!
//!     let query = Query::collection("posts");
//!     aggregate_data(
//!         store,
//!         &change,
//!         &ctx,
//!         "frontpage/latest",
//!         &query,
//!         AggregateOptions::default(),
//!     )
//!     .await?;
//!
//!     // Stamp createdAt/updatedAt back onto the post.
//!     trigger_function(store, &change, Default::default(), TriggerOptions::default()).await?;
//!     Ok(())
//! }
//! ```

pub mod aggregate;
pub mod bulk;
pub mod change;
pub mod document;
pub mod errors;
pub mod events;
pub mod fields;
pub mod search;
pub mod store;
pub mod trigger;

// Re-export commonly used types
pub use aggregate::{aggregate_data, AggregateOptions, DEFAULT_AGGREGATE_LIMIT};
pub use bulk::{ArrayChunk, DEFAULT_CHUNK_SIZE};
pub use change::{DocumentChange, CREATED_AT, UPDATED_AT};
pub use document::{DocumentSnapshot, Fields, Timestamp};
pub use errors::{TriggerError, TriggerResult, WritePolicy};
pub use events::{event_exists, event_exists_in, TriggerContext, DEFAULT_EVENTS_COLLECTION};
pub use fields::{
    array_value_change, foreign_key_change, get_after, get_before, get_value, single_values,
    value_after, value_before, value_change, value_create, value_delete, ID_FIELD,
};
pub use search::{category_array, friendly_url, soundex, trigrams};
pub use store::{
    Direction, DocumentStore, FieldFilter, FilterOp, MemoryStore, Patch, Query, WriteValue,
};
pub use trigger::{trigger_function, TriggerOptions};
