//! `SQLite`-backed `PartitionStore`.
//!
//! Uses `r2d2` connection pooling with the `r2d2_sqlite` backend. The
//! [`PragmaCustomizer`] runs on each new connection to ensure WAL mode and
//! performance pragmas are set. All records live in a single `records`
//! table keyed by `(tbl, pk, sk)` so the store can host every logical
//! table behind one schema.
//!
//! `rusqlite` is synchronous, so every trait method hops to the blocking
//! thread pool via `tokio::task::spawn_blocking`.

use async_trait::async_trait;
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::Value;

use crate::errors::StoreError;
use crate::store::{
    apply_deltas, BatchWriteOutcome, CounterDelta, Page, PartitionStore, RecordKey, WriteRequest,
    MAX_BATCH_ITEMS,
};

/// Alias for the connection pool type.
pub type ConnectionPool = Pool<SqliteConnectionManager>;

/// Alias for a pooled connection.
pub type PooledConnection = r2d2::PooledConnection<SqliteConnectionManager>;

const DEFAULT_PAGE_SIZE: usize = 100;

/// Configuration for the connection pool.
#[derive(Clone, Debug)]
pub struct ConnectionConfig {
    /// Maximum pool size (default: 16).
    pub pool_size: u32,
    /// Busy timeout in milliseconds (default: 30000).
    pub busy_timeout_ms: u32,
    /// Cache size in KiB (default: 8192 = 8 MB).
    pub cache_size_kib: i64,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            pool_size: 16,
            busy_timeout_ms: 30_000,
            cache_size_kib: 8192,
        }
    }
}

/// `SQLite` pragma customizer that runs on each new connection.
#[derive(Debug)]
struct PragmaCustomizer {
    busy_timeout_ms: u32,
    cache_size_kib: i64,
}

impl r2d2::CustomizeConnection<Connection, rusqlite::Error> for PragmaCustomizer {
    fn on_acquire(&self, conn: &mut Connection) -> std::result::Result<(), rusqlite::Error> {
        conn.execute_batch(&format!(
            "PRAGMA journal_mode = WAL;\
             PRAGMA busy_timeout = {};\
             PRAGMA cache_size = -{};\
             PRAGMA synchronous = NORMAL;",
            self.busy_timeout_ms, self.cache_size_kib
        ))?;
        Ok(())
    }
}

/// Create an in-memory connection pool (for testing).
///
/// In-memory `SQLite` databases are private to a single connection, so
/// the pool is pinned to one connection regardless of the configured size.
pub fn new_in_memory(config: &ConnectionConfig) -> Result<ConnectionPool, StoreError> {
    let manager = SqliteConnectionManager::memory();
    let pool = Pool::builder()
        .max_size(1)
        .connection_timeout(std::time::Duration::from_secs(5))
        .connection_customizer(Box::new(PragmaCustomizer {
            busy_timeout_ms: config.busy_timeout_ms,
            cache_size_kib: config.cache_size_kib,
        }))
        .build(manager)?;
    Ok(pool)
}

/// Create a file-backed connection pool.
pub fn new_file(path: &str, config: &ConnectionConfig) -> Result<ConnectionPool, StoreError> {
    let manager = SqliteConnectionManager::file(path);
    let pool = Pool::builder()
        .max_size(config.pool_size)
        .connection_timeout(std::time::Duration::from_secs(5))
        .connection_customizer(Box::new(PragmaCustomizer {
            busy_timeout_ms: config.busy_timeout_ms,
            cache_size_kib: config.cache_size_kib,
        }))
        .build(manager)?;
    Ok(pool)
}

/// Create the `records` table if it does not exist yet.
pub fn run_migrations(conn: &Connection) -> Result<(), StoreError> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS records (
             tbl  TEXT NOT NULL,
             pk   TEXT NOT NULL,
             sk   TEXT NOT NULL DEFAULT '',
             item TEXT NOT NULL,
             PRIMARY KEY (tbl, pk, sk)
         );",
    )?;
    Ok(())
}

/// Durable partitioned store on top of `SQLite`.
#[derive(Clone)]
pub struct SqliteStore {
    pool: ConnectionPool,
    page_size: usize,
}

impl SqliteStore {
    /// Wrap an existing pool, running migrations on one connection first.
    pub fn new(pool: ConnectionPool) -> Result<Self, StoreError> {
        let conn = pool.get()?;
        run_migrations(&conn)?;
        drop(conn);
        Ok(Self {
            pool,
            page_size: DEFAULT_PAGE_SIZE,
        })
    }

    /// Open an in-memory store (for testing).
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::new(new_in_memory(&ConnectionConfig::default())?)
    }

    /// Open a file-backed store at `path`.
    pub fn open_file(path: &str, config: &ConnectionConfig) -> Result<Self, StoreError> {
        Self::new(new_file(path, config)?)
    }

    /// Override the query page size.
    #[must_use]
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    async fn on_pool<T, F>(&self, op: F) -> Result<T, StoreError>
    where
        T: Send + 'static,
        F: FnOnce(PooledConnection) -> Result<T, StoreError> + Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            op(conn)
        })
        .await
        .map_err(|err| StoreError::backend(format!("blocking task failed: {err}")))?
    }
}

fn parse_item(raw: String) -> Result<Value, StoreError> {
    Ok(serde_json::from_str(&raw)?)
}

#[async_trait]
impl PartitionStore for SqliteStore {
    async fn put(&self, table: &str, key: RecordKey, item: Value) -> Result<(), StoreError> {
        let table = table.to_owned();
        self.on_pool(move |conn| {
            let _ = conn.execute(
                "INSERT INTO records (tbl, pk, sk, item) VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT (tbl, pk, sk) DO UPDATE SET item = excluded.item",
                params![table, key.partition, key.sort_str(), item.to_string()],
            )?;
            Ok(())
        })
        .await
    }

    async fn get(&self, table: &str, key: &RecordKey) -> Result<Option<Value>, StoreError> {
        let table = table.to_owned();
        let key = key.clone();
        self.on_pool(move |conn| {
            let raw: Option<String> = conn
                .query_row(
                    "SELECT item FROM records WHERE tbl = ?1 AND pk = ?2 AND sk = ?3",
                    params![table, key.partition, key.sort_str()],
                    |row| row.get(0),
                )
                .optional()?;
            raw.map(parse_item).transpose()
        })
        .await
    }

    async fn delete(&self, table: &str, key: &RecordKey) -> Result<(), StoreError> {
        let table = table.to_owned();
        let key = key.clone();
        self.on_pool(move |conn| {
            let _ = conn.execute(
                "DELETE FROM records WHERE tbl = ?1 AND pk = ?2 AND sk = ?3",
                params![table, key.partition, key.sort_str()],
            )?;
            Ok(())
        })
        .await
    }

    async fn query(
        &self,
        table: &str,
        partition: &str,
        start_token: Option<String>,
    ) -> Result<Page, StoreError> {
        let table = table.to_owned();
        let partition = partition.to_owned();
        let after = start_token.unwrap_or_default();
        let page_size = self.page_size;
        #[allow(clippy::cast_possible_wrap)]
        let limit = (page_size + 1) as i64;
        self.on_pool(move |conn| {
            // Fetch one extra row to learn whether another page exists.
            let mut stmt = conn.prepare(
                "SELECT sk, item FROM records
                 WHERE tbl = ?1 AND pk = ?2 AND sk > ?3
                 ORDER BY sk
                 LIMIT ?4",
            )?;
            let rows = stmt.query_map(
                params![table, partition, after, limit],
                |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)),
            )?;

            let mut items = Vec::new();
            let mut last_sort = None;
            let mut more = false;
            for row in rows {
                let (sk, raw) = row?;
                if items.len() == page_size {
                    more = true;
                    break;
                }
                items.push(parse_item(raw)?);
                last_sort = Some(sk);
            }

            Ok(Page {
                items,
                next_token: if more { last_sort } else { None },
            })
        })
        .await
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

        let table = table.to_owned();
        self.on_pool(move |mut conn| {
            let tx = conn.transaction()?;
            for request in &requests {
                match request {
                    WriteRequest::Put { key, item } => {
                        let _ = tx.execute(
                            "INSERT INTO records (tbl, pk, sk, item) VALUES (?1, ?2, ?3, ?4)
                             ON CONFLICT (tbl, pk, sk) DO UPDATE SET item = excluded.item",
                            params![table, key.partition, key.sort_str(), item.to_string()],
                        )?;
                    }
                    WriteRequest::Delete { key } => {
                        let _ = tx.execute(
                            "DELETE FROM records WHERE tbl = ?1 AND pk = ?2 AND sk = ?3",
                            params![table, key.partition, key.sort_str()],
                        )?;
                    }
                }
            }
            tx.commit()?;
            // Transactional writes are all-or-nothing, so nothing is ever
            // left unprocessed.
            Ok(BatchWriteOutcome::default())
        })
        .await
    }

    async fn add(
        &self,
        table: &str,
        key: &RecordKey,
        deltas: Vec<CounterDelta>,
    ) -> Result<(), StoreError> {
        let table = table.to_owned();
        let key = key.clone();
        self.on_pool(move |mut conn| {
            let tx = conn.transaction()?;
            let raw: Option<String> = tx
                .query_row(
                    "SELECT item FROM records WHERE tbl = ?1 AND pk = ?2 AND sk = ?3",
                    params![table, key.partition, key.sort_str()],
                    |row| row.get(0),
                )
                .optional()?;
            let mut body = match raw {
                Some(raw) => parse_item(raw)?,
                None => Value::Object(serde_json::Map::new()),
            };
            apply_deltas(&mut body, &deltas);
            let _ = tx.execute(
                "INSERT INTO records (tbl, pk, sk, item) VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT (tbl, pk, sk) DO UPDATE SET item = excluded.item",
                params![table, key.partition, key.sort_str(), body.to_string()],
            )?;
            tx.commit()?;
            Ok(())
        })
        .await
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn put_get_delete_round_trip() {
        let store = SqliteStore::open_in_memory().unwrap();
        let key = RecordKey::item("u1", "p1");
        store
            .put("photo_tags", key.clone(), json!({"photoId": "p1"}))
            .await
            .unwrap();
        let fetched = store.get("photo_tags", &key).await.unwrap().unwrap();
        assert_eq!(fetched["photoId"], "p1");

        store.delete("photo_tags", &key).await.unwrap();
        assert!(store.get("photo_tags", &key).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn put_overwrites_existing_item() {
        let store = SqliteStore::open_in_memory().unwrap();
        let key = RecordKey::item("u1", "p1");
        store.put("t", key.clone(), json!({"v": 1})).await.unwrap();
        store.put("t", key.clone(), json!({"v": 2})).await.unwrap();
        let fetched = store.get("t", &key).await.unwrap().unwrap();
        assert_eq!(fetched["v"], 2);
    }

    #[tokio::test]
    async fn logical_tables_are_isolated() {
        let store = SqliteStore::open_in_memory().unwrap();
        let key = RecordKey::item("u1", "p1");
        store.put("trash", key.clone(), json!({})).await.unwrap();
        assert!(store.get("photo_tags", &key).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn query_pages_in_sort_order() {
        let store = SqliteStore::open_in_memory().unwrap().with_page_size(2);
        for id in ["c", "a", "b"] {
            store
                .put("t", RecordKey::item("u1", id), json!({"id": id}))
                .await
                .unwrap();
        }

        let first = store.query("t", "u1", None).await.unwrap();
        assert_eq!(first.items.len(), 2);
        assert_eq!(first.items[0]["id"], "a");
        assert_eq!(first.items[1]["id"], "b");

        let second = store.query("t", "u1", first.next_token).await.unwrap();
        assert_eq!(second.items.len(), 1);
        assert_eq!(second.items[0]["id"], "c");
        assert!(second.next_token.is_none());
    }

    #[tokio::test]
    async fn batch_write_is_transactional() {
        let store = SqliteStore::open_in_memory().unwrap();
        let outcome = store
            .batch_write(
                "t",
                vec![
                    WriteRequest::Put {
                        key: RecordKey::item("u1", "a"),
                        item: json!({"id": "a"}),
                    },
                    WriteRequest::Put {
                        key: RecordKey::item("u1", "b"),
                        item: json!({"id": "b"}),
                    },
                ],
            )
            .await
            .unwrap();
        assert!(outcome.is_complete());
        assert_eq!(store.query("t", "u1", None).await.unwrap().items.len(), 2);
    }

    #[tokio::test]
    async fn add_accumulates_counters() {
        let store = SqliteStore::open_in_memory().unwrap();
        let key = RecordKey::partition("u1");
        store
            .add(
                "report",
                &key,
                vec![
                    CounterDelta::new("totalMB", 10.0),
                    CounterDelta::new("totalDeletedCount", 3.0),
                ],
            )
            .await
            .unwrap();
        store
            .add("report", &key, vec![CounterDelta::new("totalMB", 0.5)])
            .await
            .unwrap();

        let body = store.get("report", &key).await.unwrap().unwrap();
        assert_eq!(body["totalMB"], 10.5);
        assert_eq!(body["totalDeletedCount"], 3);
    }

    #[tokio::test]
    async fn file_backed_store_persists_across_opens() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sweep.db");
        let path = path.to_str().unwrap();
        let config = ConnectionConfig::default();

        {
            let store = SqliteStore::open_file(path, &config).unwrap();
            store
                .put("t", RecordKey::item("u1", "p1"), json!({"id": "p1"}))
                .await
                .unwrap();
        }

        let store = SqliteStore::open_file(path, &config).unwrap();
        let fetched = store
            .get("t", &RecordKey::item("u1", "p1"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(fetched["id"], "p1");
    }
}
