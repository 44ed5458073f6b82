//! Repository for classified photo records.

use std::sync::Arc;

use serde_json::Value;
use tracing::warn;

use crate::errors::StoreError;
use crate::records::PhotoRecord;
use crate::store::{tables, PartitionStore, WriteRequest, MAX_BATCH_ITEMS};

/// Photo record storage, one row per (`userId`, `photoId`).
#[derive(Clone)]
pub struct PhotoRepo {
    store: Arc<dyn PartitionStore>,
}

impl PhotoRepo {
    /// Create a repository over `store`.
    #[must_use]
    pub fn new(store: Arc<dyn PartitionStore>) -> Self {
        Self { store }
    }

    /// Persist a batch of classified photos, chunked to the backend's
    /// batch limit. Chunks that come back partially unprocessed are
    /// logged and retried once immediately.
    pub async fn save_batch(&self, photos: Vec<PhotoRecord>) -> Result<(), StoreError> {
        let mut requests = Vec::with_capacity(photos.len());
        for photo in photos {
            let key = photo.key();
            requests.push(WriteRequest::Put {
                key,
                item: serde_json::to_value(photo)?,
            });
        }

        for chunk in requests.chunks(MAX_BATCH_ITEMS) {
            let outcome = self
                .store
                .batch_write(tables::PHOTO_TAGS, chunk.to_vec())
                .await?;
            if !outcome.is_complete() {
                warn!(
                    unprocessed = outcome.unprocessed.len(),
                    "photo batch partially unprocessed, retrying once"
                );
                let retry = self
                    .store
                    .batch_write(tables::PHOTO_TAGS, outcome.unprocessed)
                    .await?;
                if !retry.is_complete() {
                    return Err(StoreError::backend(format!(
                        "{} photo writes still unprocessed after retry",
                        retry.unprocessed.len()
                    )));
                }
            }
        }
        Ok(())
    }

    /// Fetch every photo for `user_id`, following continuation tokens.
    pub async fn fetch_all(&self, user_id: &str) -> Result<Vec<PhotoRecord>, StoreError> {
        let mut photos = Vec::new();
        let mut token = None;
        loop {
            let page = self
                .store
                .query(tables::PHOTO_TAGS, user_id, token)
                .await?;
            for item in page.items {
                photos.push(decode(item)?);
            }
            token = page.next_token;
            if token.is_none() {
                break;
            }
        }
        Ok(photos)
    }

    /// Fetch one photo by id.
    pub async fn get(
        &self,
        user_id: &str,
        photo_id: &str,
    ) -> Result<Option<PhotoRecord>, StoreError> {
        let key = crate::store::RecordKey::item(user_id, photo_id);
        let item = self.store.get(tables::PHOTO_TAGS, &key).await?;
        item.map(decode).transpose()
    }
}

fn decode(item: Value) -> Result<PhotoRecord, StoreError> {
    Ok(serde_json::from_value(item)?)
}
