//! In-memory `PartitionStore` backend.
//!
//! Used by unit and integration tests. Beyond the plain trait contract it
//! supports two test hooks: a configurable page size (to exercise the
//! continuation-token loop with small data sets) and unprocessed-item
//! injection (to exercise batch retry paths).

use std::collections::{BTreeMap, HashMap, VecDeque};

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;

use crate::errors::StoreError;
use crate::store::{
    apply_deltas, BatchWriteOutcome, CounterDelta, Page, PartitionStore, RecordKey, WriteRequest,
    MAX_BATCH_ITEMS,
};

const DEFAULT_PAGE_SIZE: usize = 100;

type Table = BTreeMap<(String, String), Value>;

/// In-process partitioned store.
pub struct MemoryStore {
    tables: Mutex<HashMap<String, Table>>,
    page_size: usize,
    /// Pending unprocessed-item injections, consumed one per batch write.
    injected_unprocessed: Mutex<VecDeque<usize>>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// Create a store with the default page size.
    #[must_use]
    pub fn new() -> Self {
        Self::with_page_size(DEFAULT_PAGE_SIZE)
    }

    /// Create a store that returns at most `page_size` items per query page.
    #[must_use]
    pub fn with_page_size(page_size: usize) -> Self {
        Self {
            tables: Mutex::new(HashMap::new()),
            page_size: page_size.max(1),
            injected_unprocessed: Mutex::new(VecDeque::new()),
        }
    }

    /// Make the next batch write leave its last `count` requests
    /// unprocessed. Multiple calls queue up, one per subsequent batch.
    pub fn inject_unprocessed(&self, count: usize) {
        self.injected_unprocessed.lock().push_back(count);
    }

    /// Total items across all tables (test assertion helper).
    #[must_use]
    pub fn len(&self) -> usize {
        self.tables.lock().values().map(BTreeMap::len).sum()
    }

    /// Whether the store holds no items at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn entry_key(key: &RecordKey) -> (String, String) {
        (key.partition.clone(), key.sort_str().to_owned())
    }
}

#[async_trait]
impl PartitionStore for MemoryStore {
    async fn put(&self, table: &str, key: RecordKey, item: Value) -> Result<(), StoreError> {
        let mut tables = self.tables.lock();
        let _ = tables
            .entry(table.to_owned())
            .or_default()
            .insert(Self::entry_key(&key), item);
        Ok(())
    }

    async fn get(&self, table: &str, key: &RecordKey) -> Result<Option<Value>, StoreError> {
        let tables = self.tables.lock();
        Ok(tables
            .get(table)
            .and_then(|t| t.get(&Self::entry_key(key)))
            .cloned())
    }

    async fn delete(&self, table: &str, key: &RecordKey) -> Result<(), StoreError> {
        let mut tables = self.tables.lock();
        if let Some(t) = tables.get_mut(table) {
            let _ = t.remove(&Self::entry_key(key));
        }
        Ok(())
    }

    async fn query(
        &self,
        table: &str,
        partition: &str,
        start_token: Option<String>,
    ) -> Result<Page, StoreError> {
        let tables = self.tables.lock();
        let Some(t) = tables.get(table) else {
            return Ok(Page::default());
        };

        let after = start_token.unwrap_or_default();
        let mut items = Vec::new();
        let mut last_sort = None;
        let mut more = false;
        for ((pk, sk), item) in t {
            if pk != partition {
                continue;
            }
            if !after.is_empty() && sk.as_str() <= after.as_str() {
                continue;
            }
            if items.len() == self.page_size {
                more = true;
                break;
            }
            items.push(item.clone());
            last_sort = Some(sk.clone());
        }

        Ok(Page {
            items,
            next_token: if more { last_sort } else { None },
        })
    }

    async fn batch_write(
        &self,
        table: &str,
        requests: Vec<WriteRequest>,
    ) -> Result<BatchWriteOutcome, StoreError> {
        if requests.len() > MAX_BATCH_ITEMS {
            return Err(StoreError::BatchTooLarge {
                len: requests.len(),
            });
        }

        let skip = self
            .injected_unprocessed
            .lock()
            .pop_front()
            .unwrap_or(0)
            .min(requests.len());
        let processed_len = requests.len() - skip;

        let mut requests = requests;
        let unprocessed = requests.split_off(processed_len);

        let mut tables = self.tables.lock();
        let t = tables.entry(table.to_owned()).or_default();
        for request in requests {
            match request {
                WriteRequest::Put { key, item } => {
                    let _ = t.insert(Self::entry_key(&key), item);
                }
                WriteRequest::Delete { key } => {
                    let _ = t.remove(&Self::entry_key(&key));
                }
            }
        }

        Ok(BatchWriteOutcome { unprocessed })
    }

    async fn add(
        &self,
        table: &str,
        key: &RecordKey,
        deltas: Vec<CounterDelta>,
    ) -> Result<(), StoreError> {
        let mut tables = self.tables.lock();
        let body = tables
            .entry(table.to_owned())
            .or_default()
            .entry(Self::entry_key(key))
            .or_insert_with(|| Value::Object(serde_json::Map::new()));
        apply_deltas(body, &deltas);
        Ok(())
    }
}
