//! Timestamp bookkeeping and write-back onto the triggering document
//!
//! [`trigger_function`] stamps `createdAt`/`updatedAt` with the store's
//! server timestamp and merges any caller patch back onto the document
//! that fired the trigger. That write re-enters the same handler, so
//! callers must gate their invocation with
//! [`DocumentChange::is_trigger_write`] first or they will recurse
//! forever.

use tracing::info;

use crate::change::{DocumentChange, CREATED_AT, UPDATED_AT};
use crate::errors::{TriggerResult, WritePolicy};
use crate::store::{DocumentStore, Patch};

/// Options for [`trigger_function`]
#[derive(Debug, Clone)]
pub struct TriggerOptions {
    /// Stamp `createdAt` on create and `updatedAt` on update
    pub update_dates: bool,

    /// How a failed write-back is handled
    pub write_policy: WritePolicy,
}

impl Default for TriggerOptions {
    fn default() -> Self {
        Self {
            update_dates: true,
            write_policy: WritePolicy::default(),
        }
    }
}

/// Merge timestamps and a caller patch back onto the triggering document.
///
/// On create, `createdAt` is added to the patch; on update, `updatedAt`.
/// Both use the server-timestamp sentinel, resolved by the store at
/// commit. Nothing is written for deletes or when the final patch is
/// empty. Returns whether a write was issued.
pub async fn trigger_function(
    store: &dyn DocumentStore,
    change: &DocumentChange,
    mut data: Patch,
    options: TriggerOptions,
) -> TriggerResult<bool> {
    if options.update_dates {
        if change.is_create() {
            data.set_server_timestamp(CREATED_AT);
        }
        if change.is_update() {
            data.set_server_timestamp(UPDATED_AT);
        }
    }

    if !change.is_write() || data.is_empty() {
        return Ok(false);
    }

    // after is present for any write
    let Some(path) = change.after.as_ref().map(|s| s.path.as_str()) else {
        return Ok(false);
    };
    info!("Running function again to update data on {}", path);
    options
        .write_policy
        .apply(store.set_merge(path, data).await, "trigger write-back")?;
    Ok(true)
}
