//! Document snapshots and timestamp values
//!
//! A snapshot is the library's view of one document at one point in time:
//! its id, its full path in the store, and a field map of JSON values.
//! Timestamps use the platform's wire shape (`_seconds`/`_nanoseconds`) so
//! that values read back from a snapshot compare the way the store compares
//! them.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Field map of a document: field name to JSON value
pub type Fields = serde_json::Map<String, Value>;

/// A point-in-time timestamp in the store's wire representation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp {
    /// Whole seconds since the Unix epoch
    #[serde(rename = "_seconds")]
    pub seconds: i64,

    /// Sub-second nanoseconds
    #[serde(rename = "_nanoseconds")]
    pub nanos: u32,
}

impl Timestamp {
    /// Current wall-clock time
    pub fn now() -> Self {
        Utc::now().into()
    }

    /// Convert to a JSON value in wire shape
    pub fn to_value(self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }

    /// Parse a wire-shape JSON value back into a timestamp
    pub fn from_value(value: &Value) -> Option<Self> {
        serde_json::from_value(value.clone()).ok()
    }

    /// Convert to a UTC datetime
    pub fn to_datetime(self) -> DateTime<Utc> {
        Utc.timestamp_opt(self.seconds, self.nanos)
            .single()
            .unwrap_or_default()
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self {
            seconds: dt.timestamp(),
            nanos: dt.timestamp_subsec_nanos(),
        }
    }
}

/// A document as it existed at one side of a trigger invocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentSnapshot {
    /// Document id (last path segment)
    pub id: String,

    /// Full document path, e.g. `posts/abc123`
    pub path: String,

    /// Stored fields
    pub fields: Fields,
}

impl DocumentSnapshot {
    /// Create a snapshot from a document path and field map
    pub fn new(path: impl Into<String>, fields: Fields) -> Self {
        let path = path.into();
        let id = path.rsplit('/').next().unwrap_or_default().to_string();
        Self { id, path, fields }
    }

    /// Get a stored field's value
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Whether a stored field is present
    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Collection path this document belongs to (everything before the id)
    pub fn collection(&self) -> &str {
        self.path.rsplit_once('/').map(|(c, _)| c).unwrap_or("")
    }

    /// A stored timestamp field, if present and timestamp-shaped
    pub fn timestamp(&self, field: &str) -> Option<Timestamp> {
        self.get(field).and_then(Timestamp::from_value)
    }
}
