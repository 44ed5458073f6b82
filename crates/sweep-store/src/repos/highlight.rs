//! Repository for highlight swipe decisions.

use std::collections::HashSet;
use std::sync::Arc;

use crate::errors::StoreError;
use crate::records::HighlightAction;
use crate::store::{tables, PartitionStore};

/// Highlight action storage, upserted per (`userId`, `photoId`).
#[derive(Clone)]
pub struct HighlightRepo {
    store: Arc<dyn PartitionStore>,
}

impl HighlightRepo {
    /// Create a repository over `store`.
    #[must_use]
    pub fn new(store: Arc<dyn PartitionStore>) -> Self {
        Self { store }
    }

    /// Record a swipe decision. A later action for the same photo
    /// replaces the earlier one.
    pub async fn record_action(&self, action: HighlightAction) -> Result<(), StoreError> {
        let key = action.key();
        self.store
            .put(tables::HIGHLIGHT_ACTIONS, key, serde_json::to_value(action)?)
            .await
    }

    /// Every recorded action for `user_id`.
    pub async fn history(&self, user_id: &str) -> Result<Vec<HighlightAction>, StoreError> {
        let mut actions = Vec::new();
        let mut token = None;
        loop {
            let page = self
                .store
                .query(tables::HIGHLIGHT_ACTIONS, user_id, token)
                .await?;
            for item in page.items {
                actions.push(serde_json::from_value(item)?);
            }
            token = page.next_token;
            if token.is_none() {
                break;
            }
        }
        Ok(actions)
    }

    /// Photo ids the user has already acted on, for feed exclusion.
    pub async fn acted_photo_ids(&self, user_id: &str) -> Result<HashSet<String>, StoreError> {
        let actions = self.history(user_id).await?;
        Ok(actions.into_iter().map(|a| a.photo_id).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;
    use chrono::{TimeZone, Utc};
    use sweep_core::action::HighlightActionKind;

    fn action(photo_id: &str, kind: HighlightActionKind) -> HighlightAction {
        HighlightAction {
            user_id: "u1".into(),
            photo_id: photo_id.into(),
            action: kind,
            timestamp: Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
        }
    }

    #[tokio::test]
    async fn later_action_replaces_earlier_one() {
        let repo = HighlightRepo::new(Arc::new(MemoryStore::new()));
        repo.record_action(action("p1", HighlightActionKind::Deferred))
            .await
            .unwrap();
        repo.record_action(action("p1", HighlightActionKind::Deleted))
            .await
            .unwrap();

        let history = repo.history("u1").await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].action, HighlightActionKind::Deleted);
    }

    #[tokio::test]
    async fn acted_photo_ids_collects_every_action() {
        let repo = HighlightRepo::new(Arc::new(MemoryStore::new()));
        repo.record_action(action("p1", HighlightActionKind::Archived))
            .await
            .unwrap();
        repo.record_action(action("p2", HighlightActionKind::Deleted))
            .await
            .unwrap();

        let acted = repo.acted_photo_ids("u1").await.unwrap();
        assert!(acted.contains("p1"));
        assert!(acted.contains("p2"));
        assert!(!acted.contains("p3"));
    }
}
