//! Typed repositories over the partitioned store.
//!
//! Each repository owns one logical table and translates between the
//! typed records in [`crate::records`] and the JSON bodies the store
//! persists. Batch-size chunking and pagination loops live here so that
//! callers above never see continuation tokens or the 25-item limit.

mod highlight;
mod photos;
mod preferences;
mod report;
mod trash;

pub use highlight::HighlightRepo;
pub use photos::PhotoRepo;
pub use preferences::PreferencesRepo;
pub use report::ReportRepo;
pub use trash::TrashRepo;
