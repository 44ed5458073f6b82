//! The `PartitionStore` trait and its wire types.
//!
//! The trait deliberately mirrors what a managed partitioned store offers:
//! batch writes are capped at [`MAX_BATCH_ITEMS`] per call and may return
//! unprocessed requests; queries page through one partition via opaque
//! continuation tokens; counter updates are additive and atomic per call.
//! Nothing above this trait may assume cross-call atomicity.

use async_trait::async_trait;
use serde_json::Value;

use crate::errors::StoreError;

/// Maximum items a single batch-write call may carry.
pub const MAX_BATCH_ITEMS: usize = 25;

/// Table names used by the engine.
pub mod tables {
    /// Classified photo records.
    pub const PHOTO_TAGS: &str = "photo_tags";
    /// Highlight swipe actions.
    pub const HIGHLIGHT_ACTIONS: &str = "highlight_actions";
    /// Trashed photos awaiting restore or purge.
    pub const TRASH: &str = "trash";
    /// Per-user environmental-savings report.
    pub const REPORT: &str = "report";
    /// User interest-prompt preferences.
    pub const USER_PREFERENCES: &str = "user_preferences";
}

/// Address of one record: partition key plus optional sort key.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct RecordKey {
    /// Partition key (`userId`).
    pub partition: String,
    /// Sort key (`photoId`), absent for singleton records.
    pub sort: Option<String>,
}

impl RecordKey {
    /// Key for a partition-singleton record (report, preferences).
    #[must_use]
    pub fn partition(partition: impl Into<String>) -> Self {
        Self {
            partition: partition.into(),
            sort: None,
        }
    }

    /// Key for a (partition, sort) item.
    #[must_use]
    pub fn item(partition: impl Into<String>, sort: impl Into<String>) -> Self {
        Self {
            partition: partition.into(),
            sort: Some(sort.into()),
        }
    }

    /// Sort key in storage form; singletons use the empty string.
    #[must_use]
    pub fn sort_str(&self) -> &str {
        self.sort.as_deref().unwrap_or("")
    }
}

/// One request inside a batch write.
#[derive(Clone, Debug)]
pub enum WriteRequest {
    /// Insert or replace an item.
    Put {
        /// Record address.
        key: RecordKey,
        /// Serialized record body.
        item: Value,
    },
    /// Delete an item (no-op if absent).
    Delete {
        /// Record address.
        key: RecordKey,
    },
}

impl WriteRequest {
    /// The record address this request targets.
    #[must_use]
    pub fn key(&self) -> &RecordKey {
        match self {
            Self::Put { key, .. } | Self::Delete { key } => key,
        }
    }
}

/// Result of a batch write: requests the store did not process.
///
/// An empty `unprocessed` list means the whole batch was applied.
#[derive(Debug, Default)]
pub struct BatchWriteOutcome {
    /// Requests left unprocessed by the store.
    pub unprocessed: Vec<WriteRequest>,
}

impl BatchWriteOutcome {
    /// Whether every request in the batch was applied.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.unprocessed.is_empty()
    }
}

/// One page of a partition query.
#[derive(Debug, Default)]
pub struct Page {
    /// Items in this page, in sort-key order.
    pub items: Vec<Value>,
    /// Continuation token; `None` when the partition is exhausted.
    /// Callers must loop until no token is returned.
    pub next_token: Option<String>,
}

/// An additive update to one numeric field.
#[derive(Clone, Debug)]
pub struct CounterDelta {
    /// Field name inside the record body.
    pub field: String,
    /// Amount to add (may be fractional).
    pub amount: f64,
}

impl CounterDelta {
    /// Convenience constructor.
    #[must_use]
    pub fn new(field: impl Into<String>, amount: f64) -> Self {
        Self {
            field: field.into(),
            amount,
        }
    }
}

/// The external partitioned key-value store.
///
/// All calls are async I/O boundaries. Writes to distinct keys never
/// conflict; [`PartitionStore::add`] is the only primitive safe for
/// concurrent mutation of the same key.
#[async_trait]
pub trait PartitionStore: Send + Sync {
    /// Insert or replace one item.
    async fn put(&self, table: &str, key: RecordKey, item: Value) -> Result<(), StoreError>;

    /// Fetch one item, `None` if absent.
    async fn get(&self, table: &str, key: &RecordKey) -> Result<Option<Value>, StoreError>;

    /// Delete one item; absent items are a no-op.
    async fn delete(&self, table: &str, key: &RecordKey) -> Result<(), StoreError>;

    /// Fetch one page of a partition, starting after `start_token`.
    async fn query(
        &self,
        table: &str,
        partition: &str,
        start_token: Option<String>,
    ) -> Result<Page, StoreError>;

    /// Apply up to [`MAX_BATCH_ITEMS`] writes in one call.
    ///
    /// May apply only part of the batch; unapplied requests come back in
    /// the outcome and it is the caller's job to resubmit them.
    async fn batch_write(
        &self,
        table: &str,
        requests: Vec<WriteRequest>,
    ) -> Result<BatchWriteOutcome, StoreError>;

    /// Atomically add deltas to numeric fields of one record, creating the
    /// record with zeroed fields first if it does not exist.
    async fn add(
        &self,
        table: &str,
        key: &RecordKey,
        deltas: Vec<CounterDelta>,
    ) -> Result<(), StoreError>;
}

/// Merge additive deltas into a JSON record body.
///
/// Shared by backends: missing fields start at zero; integral results stay
/// integers in the stored JSON.
pub(crate) fn apply_deltas(body: &mut Value, deltas: &[CounterDelta]) {
    if !body.is_object() {
        *body = Value::Object(serde_json::Map::new());
    }
    if let Some(map) = body.as_object_mut() {
        for delta in deltas {
            let current = map.get(&delta.field).and_then(Value::as_f64).unwrap_or(0.0);
            let next = current + delta.amount;
            #[allow(clippy::cast_possible_truncation)]
            let number = if next.fract() == 0.0 && next.abs() < 9_007_199_254_740_992.0 {
                Value::from(next as i64)
            } else {
                serde_json::Number::from_f64(next).map_or(Value::Null, Value::Number)
            };
            let _ = map.insert(delta.field.clone(), number);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_key_sort_str() {
        assert_eq!(RecordKey::partition("u1").sort_str(), "");
        assert_eq!(RecordKey::item("u1", "p1").sort_str(), "p1");
    }

    #[test]
    fn write_request_key_access() {
        let put = WriteRequest::Put {
            key: RecordKey::item("u1", "p1"),
            item: serde_json::json!({}),
        };
        assert_eq!(put.key().sort_str(), "p1");
        let del = WriteRequest::Delete {
            key: RecordKey::item("u1", "p2"),
        };
        assert_eq!(del.key().sort_str(), "p2");
    }

    #[test]
    fn apply_deltas_from_missing_starts_at_zero() {
        let mut body = serde_json::json!({});
        apply_deltas(
            &mut body,
            &[CounterDelta::new("totalMB", 1.5), CounterDelta::new("totalDeletedCount", 2.0)],
        );
        assert_eq!(body["totalMB"], 1.5);
        assert_eq!(body["totalDeletedCount"], 2);
    }

    #[test]
    fn apply_deltas_accumulates() {
        let mut body = serde_json::json!({"totalMB": 3.25});
        apply_deltas(&mut body, &[CounterDelta::new("totalMB", 1.0)]);
        assert_eq!(body["totalMB"], 4.25);
    }

    #[test]
    fn apply_deltas_keeps_integers_integral() {
        let mut body = serde_json::json!({"totalDeletedCount": 5});
        apply_deltas(&mut body, &[CounterDelta::new("totalDeletedCount", 3.0)]);
        assert_eq!(body["totalDeletedCount"], 8);
    }
}
