//! Repository for the per-user savings report.

use std::sync::Arc;

use sweep_core::savings::Savings;

use crate::errors::StoreError;
use crate::records::Report;
use crate::store::{tables, CounterDelta, PartitionStore, RecordKey};

/// Cumulative savings ledger, one row per user.
#[derive(Clone)]
pub struct ReportRepo {
    store: Arc<dyn PartitionStore>,
}

impl ReportRepo {
    /// Create a repository over `store`.
    #[must_use]
    pub fn new(store: Arc<dyn PartitionStore>) -> Self {
        Self { store }
    }

    /// Add one purge's savings onto the running totals. A missing row
    /// starts from zero.
    pub async fn accumulate(&self, user_id: &str, savings: &Savings) -> Result<(), StoreError> {
        let key = RecordKey::partition(user_id);
        #[allow(clippy::cast_precision_loss)]
        let deleted = savings.n as f64;
        self.store
            .add(
                tables::REPORT,
                &key,
                vec![
                    CounterDelta::new("totalMB", savings.mb),
                    CounterDelta::new("totalCarbon", savings.carbon),
                    CounterDelta::new("totalTrees", savings.trees),
                    CounterDelta::new("totalDeletedCount", deleted),
                ],
            )
            .await
    }

    /// The current totals, or `None` if the user never purged anything.
    pub async fn fetch(&self, user_id: &str) -> Result<Option<Report>, StoreError> {
        let key = RecordKey::partition(user_id);
        let item = self.store.get(tables::REPORT, &key).await?;
        item.map(|v| Ok(serde_json::from_value(v)?)).transpose()
    }
}
