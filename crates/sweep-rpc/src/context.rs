//! Shared context passed to every RPC handler.

use std::sync::Arc;

use sweep_core::retry::RetryConfig;
use sweep_engine::classify::Classifier;
use sweep_engine::geo::ReverseGeocoder;
use sweep_engine::highlight::HighlightCurator;
use sweep_engine::trash::TrashLedger;
use sweep_settings::types::SweepSettings;
use sweep_store::repos::PreferencesRepo;
use sweep_store::PartitionStore;

/// Handles every handler needs: the store, the geocoder, and settings.
///
/// Engine components are request-scoped and cheap to build; the context
/// constructs them on demand from the shared handles.
#[derive(Clone)]
pub struct RpcContext {
    /// The storage collaborator.
    pub store: Arc<dyn PartitionStore>,
    /// The reverse-geocoding collaborator.
    pub geocoder: Arc<dyn ReverseGeocoder>,
    /// Loaded settings.
    pub settings: Arc<SweepSettings>,
}

impl RpcContext {
    /// Build a context from the shared handles.
    #[must_use]
    pub fn new(
        store: Arc<dyn PartitionStore>,
        geocoder: Arc<dyn ReverseGeocoder>,
        settings: Arc<SweepSettings>,
    ) -> Self {
        Self {
            store,
            geocoder,
            settings,
        }
    }

    /// A classifier over this context's store and geocoder.
    #[must_use]
    pub fn classifier(&self) -> Classifier {
        Classifier::new(
            self.store.clone(),
            self.geocoder.clone(),
            self.settings.clone(),
        )
    }

    /// A highlight curator over this context's store.
    #[must_use]
    pub fn curator(&self) -> HighlightCurator {
        HighlightCurator::new(self.store.clone(), &self.settings)
    }

    /// A trash ledger over this context's store.
    #[must_use]
    pub fn ledger(&self) -> TrashLedger {
        TrashLedger::new(self.store.clone(), self.retry_config())
    }

    /// The preference repository.
    #[must_use]
    pub fn preferences(&self) -> PreferencesRepo {
        PreferencesRepo::new(self.store.clone())
    }

    fn retry_config(&self) -> RetryConfig {
        self.settings.trash.retry
    }
}
