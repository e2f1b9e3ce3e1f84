//! Change classification for trigger invocations
//!
//! A trigger delivers a before/after snapshot pair; exactly one of four
//! transitions holds: created (before absent), updated (both present),
//! deleted (after absent), or no-op (both absent, not expected in
//! practice). The classifier also distinguishes an externally-caused
//! update from the library's own timestamp feedback write, which is what
//! keeps [`crate::trigger::trigger_function`] from recursing forever.

use tracing::info;

use crate::document::DocumentSnapshot;

/// Field stamped on document creation
pub const CREATED_AT: &str = "createdAt";

/// Field stamped on document update
pub const UPDATED_AT: &str = "updatedAt";

/// The before/after snapshot pair delivered to a trigger
#[derive(Debug, Clone, Default)]
pub struct DocumentChange {
    /// Document state before the write, if it existed
    pub before: Option<DocumentSnapshot>,

    /// Document state after the write, if it still exists
    pub after: Option<DocumentSnapshot>,
}

impl DocumentChange {
    /// Create a change from optional before/after snapshots
    pub fn new(before: Option<DocumentSnapshot>, after: Option<DocumentSnapshot>) -> Self {
        Self { before, after }
    }

    /// The document was created by this write
    pub fn is_create(&self) -> bool {
        self.before.is_none() && self.after.is_some()
    }

    /// The document existed and still exists
    pub fn is_update(&self) -> bool {
        self.before.is_some() && self.after.is_some()
    }

    /// The document was deleted by this write
    pub fn is_delete(&self) -> bool {
        self.before.is_some() && self.after.is_none()
    }

    /// Create or update
    pub fn is_write(&self) -> bool {
        self.is_create() || self.is_update()
    }

    /// Create or delete
    pub fn is_shift(&self) -> bool {
        self.is_create() || self.is_delete()
    }

    /// Update or delete
    pub fn is_pop(&self) -> bool {
        self.is_update() || self.is_delete()
    }

    /// The document id, from whichever side exists
    pub fn document_id(&self) -> Option<&str> {
        self.after
            .as_ref()
            .or(self.before.as_ref())
            .map(|s| s.id.as_str())
    }

    /// The document path, from whichever side exists
    pub fn document_path(&self) -> Option<&str> {
        self.after
            .as_ref()
            .or(self.before.as_ref())
            .map(|s| s.path.as_str())
    }

    /// Whether downstream side effects should run for this update.
    ///
    /// Returns false when the write is the library's own feedback:
    /// an `updatedAt` whose seconds component moved between before and
    /// after (only [`crate::trigger::trigger_function`] rewrites that
    /// field), or a `createdAt` appearing on a document that had none.
    pub fn can_continue(&self) -> bool {
        let (Some(before), Some(after)) = (&self.before, &self.after) else {
            return true;
        };
        if let (Some(b), Some(a)) = (before.timestamp(UPDATED_AT), after.timestamp(UPDATED_AT)) {
            if a.seconds != b.seconds {
                return false;
            }
        }
        if !before.contains(CREATED_AT) && after.contains(CREATED_AT) {
            return false;
        }
        true
    }

    /// Whether this invocation is an echo of the library's own write.
    ///
    /// Callers should abort further side effects when this returns true.
    pub fn is_trigger_write(&self, event_id: &str) -> bool {
        if self.is_update() && !self.can_continue() {
            info!("Trigger function run: {}", event_id);
            return true;
        }
        false
    }
}
