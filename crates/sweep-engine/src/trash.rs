//! The trash ledger: move-to-trash, restore, and permanent delete.
//!
//! Restore and purge take arbitrary batches of photo ids, chunk them to
//! the storage collaborator's 25-item batch limit, and issue one batch
//! write per chunk sequentially. A chunk that comes back with
//! unprocessed items is retried up to the configured limit with a
//! linearly growing delay; whatever is still unprocessed afterwards is
//! surfaced to the caller alongside the succeeded ids.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use sweep_core::retry::RetryConfig;
use sweep_core::savings::Savings;
use sweep_store::records::{Report, TrashItem};
use sweep_store::repos::{ReportRepo, TrashRepo};
use sweep_store::store::MAX_BATCH_ITEMS;
use sweep_store::PartitionStore;

use crate::errors::{EngineError, Result};

/// One photo to move to trash.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrashAdd {
    /// Photo identifier.
    pub photo_id: String,
    /// Which surface sent the photo here.
    #[serde(default)]
    pub source: Option<String>,
    /// Tags carried along for the trash view.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Quality score at deletion time.
    #[serde(default)]
    pub score: f64,
}

/// One photo to permanently delete, with its size for the savings
/// arithmetic.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurgeItem {
    /// Photo identifier.
    pub photo_id: String,
    /// File size in bytes.
    #[serde(default)]
    pub size: u64,
}

/// Partial-success result of a batched trash operation.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchOutcome {
    /// Ids whose writes were applied.
    pub succeeded: Vec<String>,
    /// Ids still unprocessed after retry exhaustion.
    pub unprocessed: Vec<String>,
}

/// Result of a permanent-delete operation.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PurgeResult {
    /// Per-id write outcome.
    #[serde(flatten)]
    pub outcome: BatchOutcome,
    /// Savings computed over the full requested batch.
    pub saved: Savings,
}

/// Trash lifecycle and report accumulation.
pub struct TrashLedger {
    trash: TrashRepo,
    report: ReportRepo,
    retry: RetryConfig,
}

impl TrashLedger {
    /// Build a ledger over the given store.
    #[must_use]
    pub fn new(store: Arc<dyn PartitionStore>, retry: RetryConfig) -> Self {
        Self {
            trash: TrashRepo::new(store.clone()),
            report: ReportRepo::new(store),
            retry,
        }
    }

    /// Move photos to trash. Re-adding an already-trashed photo is an
    /// idempotent upsert.
    pub async fn add(&self, user_id: &str, items: Vec<TrashAdd>) -> Result<usize> {
        let deleted_at = Utc::now().timestamp_millis();
        let count = items.len();
        for item in items {
            let record = TrashItem {
                user_id: user_id.to_owned(),
                photo_id: item.photo_id,
                deleted_at,
                source: item.source,
                tags: item.tags,
                score: item.score,
            };
            self.trash
                .put(record)
                .await
                .map_err(|err| EngineError::store("trash_add", user_id, err))?;
        }
        Ok(count)
    }

    /// Every trash entry for the user.
    pub async fn list(&self, user_id: &str) -> Result<Vec<TrashItem>> {
        self.trash
            .list(user_id)
            .await
            .map_err(|err| EngineError::store("trash_list", user_id, err))
    }

    /// Restore photos out of trash by deleting their trash records.
    ///
    /// Restoring an id with no trash record is a no-op that still counts
    /// as succeeded. Multi-chunk restores are not atomic: a failure mid
    /// way leaves earlier chunks applied.
    pub async fn restore(&self, user_id: &str, photo_ids: Vec<String>) -> Result<BatchOutcome> {
        self.delete_chunked("trash_restore", user_id, photo_ids).await
    }

    /// Permanently delete photos: remove their trash records and add the
    /// batch's savings onto the user's report.
    ///
    /// The savings are computed over the full requested batch, matching
    /// the at-least-attempted discipline of the underlying deletes.
    pub async fn purge(&self, user_id: &str, items: Vec<PurgeItem>) -> Result<PurgeResult> {
        let total_bytes: u64 = items.iter().map(|item| item.size).sum();
        let saved = Savings::from_bytes(total_bytes, items.len() as u64);

        let photo_ids = items.into_iter().map(|item| item.photo_id).collect();
        let outcome = self.delete_chunked("trash_purge", user_id, photo_ids).await?;

        self.report
            .accumulate(user_id, &saved)
            .await
            .map_err(|err| EngineError::store("report_accumulate", user_id, err))?;
        info!(
            user_id,
            deleted = saved.n,
            mb = saved.mb,
            "accumulated purge savings"
        );

        Ok(PurgeResult { outcome, saved })
    }

    /// The user's cumulative savings report, if one exists.
    pub async fn report(&self, user_id: &str) -> Result<Option<Report>> {
        self.report
            .fetch(user_id)
            .await
            .map_err(|err| EngineError::store("report_fetch", user_id, err))
    }

    /// Delete trash records in sequential chunks of [`MAX_BATCH_ITEMS`],
    /// retrying each chunk's unprocessed remainder with linear backoff.
    async fn delete_chunked(
        &self,
        operation: &'static str,
        user_id: &str,
        photo_ids: Vec<String>,
    ) -> Result<BatchOutcome> {
        let mut unprocessed = Vec::new();

        for chunk in photo_ids.chunks(MAX_BATCH_ITEMS) {
            let mut pending = chunk.to_vec();
            let mut attempt = 0;
            loop {
                pending = self
                    .trash
                    .delete_batch(user_id, &pending)
                    .await
                    .map_err(|err| EngineError::store(operation, user_id, err))?;
                if pending.is_empty() || attempt >= self.retry.max_retries {
                    break;
                }
                attempt += 1;
                tokio::time::sleep(Duration::from_millis(self.retry.delay_ms(attempt))).await;
            }
            if !pending.is_empty() {
                warn!(
                    user_id,
                    operation,
                    count = pending.len(),
                    "items still unprocessed after retry exhaustion"
                );
                unprocessed.extend(pending);
            }
        }

        let succeeded = photo_ids
            .into_iter()
            .filter(|id| !unprocessed.contains(id))
            .collect();
        Ok(BatchOutcome {
            succeeded,
            unprocessed,
        })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use sweep_store::memory::MemoryStore;

    fn ledger(store: Arc<MemoryStore>) -> TrashLedger {
        // Zero base delay keeps the retry tests fast.
        TrashLedger::new(
            store,
            RetryConfig {
                max_retries: 3,
                base_delay_ms: 0,
            },
        )
    }

    fn adds(ids: &[&str]) -> Vec<TrashAdd> {
        ids.iter()
            .map(|id| TrashAdd {
                photo_id: (*id).to_owned(),
                source: Some("삭제 추천".into()),
                tags: vec![],
                score: 0.9,
            })
            .collect()
    }

    #[tokio::test]
    async fn add_is_an_idempotent_upsert() {
        let store = Arc::new(MemoryStore::new());
        let ledger = ledger(store);
        ledger.add("u1", adds(&["p1"])).await.unwrap();
        ledger.add("u1", adds(&["p1"])).await.unwrap();
        assert_eq!(ledger.list("u1").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn restore_of_sixty_ids_chunks_and_succeeds() {
        let store = Arc::new(MemoryStore::new());
        let ledger = ledger(store.clone());
        let ids: Vec<String> = (0..60).map(|i| format!("p{i:02}")).collect();
        ledger
            .add("u1", adds(&ids.iter().map(String::as_str).collect::<Vec<_>>()))
            .await
            .unwrap();

        let outcome = ledger.restore("u1", ids).await.unwrap();
        assert_eq!(outcome.succeeded.len(), 60);
        assert!(outcome.unprocessed.is_empty());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn restore_of_missing_records_is_a_noop_success() {
        let store = Arc::new(MemoryStore::new());
        let ledger = ledger(store);
        let outcome = ledger
            .restore("u1", vec!["ghost".to_owned()])
            .await
            .unwrap();
        assert_eq!(outcome.succeeded, vec!["ghost".to_owned()]);

        // Second restore of the same id is equally fine.
        let outcome = ledger
            .restore("u1", vec!["ghost".to_owned()])
            .await
            .unwrap();
        assert!(outcome.unprocessed.is_empty());
    }

    #[tokio::test]
    async fn unprocessed_items_are_retried_until_clean() {
        let store = Arc::new(MemoryStore::new());
        let ledger = ledger(store.clone());
        let ids: Vec<String> = (0..10).map(|i| format!("p{i}")).collect();
        ledger
            .add("u1", adds(&ids.iter().map(String::as_str).collect::<Vec<_>>()))
            .await
            .unwrap();

        // Two partial responses, then clean.
        store.inject_unprocessed(4);
        store.inject_unprocessed(2);
        let outcome = ledger.restore("u1", ids).await.unwrap();
        assert_eq!(outcome.succeeded.len(), 10);
        assert!(outcome.unprocessed.is_empty());
    }

    #[tokio::test]
    async fn retry_exhaustion_surfaces_unprocessed_ids() {
        let store = Arc::new(MemoryStore::new());
        let ledger = ledger(store.clone());
        let ids: Vec<String> = (0..5).map(|i| format!("p{i}")).collect();
        ledger
            .add("u1", adds(&ids.iter().map(String::as_str).collect::<Vec<_>>()))
            .await
            .unwrap();

        // Partial on the first attempt and all 3 retries.
        for _ in 0..4 {
            store.inject_unprocessed(1);
        }
        let outcome = ledger.restore("u1", ids).await.unwrap();
        assert_eq!(outcome.succeeded.len(), 4);
        assert_eq!(outcome.unprocessed, vec!["p4".to_owned()]);
    }

    #[tokio::test]
    async fn purge_accumulates_the_report_additively() {
        let store = Arc::new(MemoryStore::new());
        let ledger = ledger(store);
        ledger.add("u1", adds(&["p1", "p2"])).await.unwrap();

        let result = ledger
            .purge(
                "u1",
                vec![
                    PurgeItem {
                        photo_id: "p1".into(),
                        size: 1_048_576,
                    },
                    PurgeItem {
                        photo_id: "p2".into(),
                        size: 0,
                    },
                ],
            )
            .await
            .unwrap();
        assert_eq!(result.outcome.succeeded.len(), 2);
        assert!((result.saved.mb - 1.0).abs() < f64::EPSILON);
        assert_eq!(result.saved.n, 2);

        let report = ledger.report("u1").await.unwrap().unwrap();
        assert_eq!(report.total_deleted_count, 2);
        assert!((report.total_mb - 1.0).abs() < 1e-9);

        // A second purge adds on top instead of overwriting.
        let _ = ledger
            .purge(
                "u1",
                vec![PurgeItem {
                    photo_id: "p3".into(),
                    size: 1_048_576,
                }],
            )
            .await
            .unwrap();
        let report = ledger.report("u1").await.unwrap().unwrap();
        assert_eq!(report.total_deleted_count, 3);
        assert!((report.total_mb - 2.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn report_is_none_before_any_purge() {
        let ledger = ledger(Arc::new(MemoryStore::new()));
        assert!(ledger.report("u1").await.unwrap().is_none());
    }
}
