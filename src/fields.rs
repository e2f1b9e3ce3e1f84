//! Field-level diffing across a document change
//!
//! These helpers short-circuit redundant trigger work: a handler that only
//! cares about `title` can bail out early when `title` did not move. The
//! virtual field `id` resolves to the document id rather than a stored
//! field, so relationship keys and denormalized copies can be diffed with
//! the same calls.

use serde_json::Value;

use crate::change::DocumentChange;
use crate::document::DocumentSnapshot;

/// Virtual field resolved to the document id
pub const ID_FIELD: &str = "id";

fn side_value(snap: &DocumentSnapshot, field: &str) -> Option<Value> {
    if field == ID_FIELD {
        return Some(Value::String(snap.id.clone()));
    }
    snap.get(field).cloned()
}

/// A field's value on the after side, if that side and field exist
pub fn get_after(change: &DocumentChange, field: &str) -> Option<Value> {
    change.after.as_ref().and_then(|s| side_value(s, field))
}

/// A field's value on the before side, if that side and field exist
pub fn get_before(change: &DocumentChange, field: &str) -> Option<Value> {
    change.before.as_ref().and_then(|s| side_value(s, field))
}

/// The latest available value of a field: after if the document still
/// exists, otherwise before
pub fn get_value(change: &DocumentChange, field: &str) -> Option<Value> {
    if change.after.is_some() {
        get_after(change, field)
    } else {
        get_before(change, field)
    }
}

/// Whether the field was present before the write
pub fn value_before(change: &DocumentChange, field: &str) -> bool {
    match &change.before {
        Some(s) => field == ID_FIELD || s.contains(field),
        None => false,
    }
}

/// Whether the field is present after the write
pub fn value_after(change: &DocumentChange, field: &str) -> bool {
    match &change.after {
        Some(s) => field == ID_FIELD || s.contains(field),
        None => false,
    }
}

/// The field appeared in this write
pub fn value_create(change: &DocumentChange, field: &str) -> bool {
    !value_before(change, field) && value_after(change, field)
}

/// The field disappeared in this write
pub fn value_delete(change: &DocumentChange, field: &str) -> bool {
    value_before(change, field) && !value_after(change, field)
}

// Canonical serialization: serde_json maps are key-sorted, so two values
// that differ only in insertion order serialize identically.
fn canonical(value: &Value) -> String {
    value.to_string()
}

/// Whether the field changed in this write: appeared, disappeared, or its
/// canonical serialized form differs between before and after
pub fn value_change(change: &DocumentChange, field: &str) -> bool {
    let before = get_before(change, field);
    let after = get_after(change, field);
    match (before, after) {
        (None, None) => false,
        (Some(b), Some(a)) => canonical(&b) != canonical(&a),
        _ => true,
    }
}

/// Whether any of the listed fields changed in this write
pub fn array_value_change(change: &DocumentChange, fields: &[&str]) -> bool {
    fields.iter().any(|f| value_change(change, f))
}

/// Whether any of the listed relationship-key fields differ strictly
/// between before and after.
///
/// Strict means plain value inequality, with an absent side unequal to
/// any present value. Used to detect foreign-key edits that invalidate
/// downstream aggregates.
pub fn foreign_key_change(change: &DocumentChange, fields: &[&str]) -> bool {
    fields
        .iter()
        .any(|f| get_before(change, f) != get_after(change, f))
}

/// Values present in exactly one of the two arrays, first-occurrence order
/// preserved (left array's leavers before right array's joiners).
pub fn single_values(a: &[Value], b: &[Value]) -> Vec<Value> {
    a.iter()
        .chain(b.iter())
        .filter(|v| !a.contains(v) || !b.contains(v))
        .cloned()
        .collect()
}
