//! Repository for user interest-prompt selections.

use std::sync::Arc;

use crate::errors::StoreError;
use crate::records::UserPreferences;
use crate::store::{tables, PartitionStore, RecordKey};

/// Prompt selection storage, one row per user, replaced wholesale.
#[derive(Clone)]
pub struct PreferencesRepo {
    store: Arc<dyn PartitionStore>,
}

impl PreferencesRepo {
    /// Create a repository over `store`.
    #[must_use]
    pub fn new(store: Arc<dyn PartitionStore>) -> Self {
        Self { store }
    }

    /// Replace the user's selection.
    pub async fn save(&self, prefs: UserPreferences) -> Result<(), StoreError> {
        let key = RecordKey::partition(prefs.user_id.clone());
        self.store
            .put(tables::USER_PREFERENCES, key, serde_json::to_value(prefs)?)
            .await
    }

    /// The stored selection, or `None` if the user never saved one.
    pub async fn get(&self, user_id: &str) -> Result<Option<UserPreferences>, StoreError> {
        let key = RecordKey::partition(user_id);
        let item = self.store.get(tables::USER_PREFERENCES, &key).await?;
        item.map(|v| Ok(serde_json::from_value(v)?)).transpose()
    }

    /// The selected prompt tags, empty when nothing was ever saved.
    pub async fn prompt_tags(&self, user_id: &str) -> Result<Vec<String>, StoreError> {
        Ok(self
            .get(user_id)
            .await?
            .map(|p| p.prompt_tags)
            .unwrap_or_default())
    }
}
