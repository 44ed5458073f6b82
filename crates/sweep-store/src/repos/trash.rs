//! Repository for the trash ledger.

use std::sync::Arc;

use crate::errors::StoreError;
use crate::records::TrashItem;
use crate::store::{tables, PartitionStore, RecordKey, WriteRequest, MAX_BATCH_ITEMS};

/// Trash entry storage, one row per (`userId`, `photoId`).
#[derive(Clone)]
pub struct TrashRepo {
    store: Arc<dyn PartitionStore>,
}

impl TrashRepo {
    /// Create a repository over `store`.
    #[must_use]
    pub fn new(store: Arc<dyn PartitionStore>) -> Self {
        Self { store }
    }

    /// Insert or overwrite one trash entry.
    pub async fn put(&self, item: TrashItem) -> Result<(), StoreError> {
        let key = item.key();
        self.store
            .put(tables::TRASH, key, serde_json::to_value(item)?)
            .await
    }

    /// Fetch one entry by photo id.
    pub async fn get(
        &self,
        user_id: &str,
        photo_id: &str,
    ) -> Result<Option<TrashItem>, StoreError> {
        let key = RecordKey::item(user_id, photo_id);
        let item = self.store.get(tables::TRASH, &key).await?;
        item.map(|v| Ok(serde_json::from_value(v)?)).transpose()
    }

    /// Every trash entry for `user_id`.
    pub async fn list(&self, user_id: &str) -> Result<Vec<TrashItem>, StoreError> {
        let mut items = Vec::new();
        let mut token = None;
        loop {
            let page = self.store.query(tables::TRASH, user_id, token).await?;
            for item in page.items {
                items.push(serde_json::from_value(item)?);
            }
            token = page.next_token;
            if token.is_none() {
                break;
            }
        }
        Ok(items)
    }

    /// Delete up to [`MAX_BATCH_ITEMS`] entries in one backend call.
    ///
    /// Returns the photo ids the backend left unprocessed; the caller
    /// decides whether and how to retry them.
    pub async fn delete_batch(
        &self,
        user_id: &str,
        photo_ids: &[String],
    ) -> Result<Vec<String>, StoreError> {
        debug_assert!(photo_ids.len() <= MAX_BATCH_ITEMS);
        let requests = photo_ids
            .iter()
            .map(|photo_id| WriteRequest::Delete {
                key: RecordKey::item(user_id, photo_id.clone()),
            })
            .collect();
        let outcome = self.store.batch_write(tables::TRASH, requests).await?;
        Ok(outcome
            .unprocessed
            .into_iter()
            .filter_map(|request| request.key().sort.clone())
            .collect())
    }
}
