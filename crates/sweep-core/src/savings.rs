//! Environmental-impact arithmetic for permanent deletes.
//!
//! Storage reclaimed by a permanent delete is converted into carbon and
//! tree equivalents. The conversion chain and its rounding are part of the
//! observable contract (the values accumulate additively into the per-user
//! report), so they live here as one canonical implementation:
//!
//! 1. `mb = round2(total_bytes / 1 MiB)`
//! 2. `carbon_kg = round2(mb × 2.12/1024)`
//! 3. `trees = round4(carbon_kg × 1000 × 0.36/1000)`

use serde::{Deserialize, Serialize};

/// Kilograms of CO₂ attributed to one megabyte of stored data.
pub const CARBON_KG_PER_MB: f64 = 2.12 / 1024.0;

/// Tree equivalents per gram of CO₂.
pub const TREES_PER_GRAM: f64 = 0.36 / 1000.0;

/// Bytes per megabyte (binary).
pub const BYTES_PER_MB: f64 = 1_048_576.0;

/// Estimated reclaimable megabytes per delete-recommended photo, used by
/// the folder summary's storage-savings estimate.
pub const RECLAIM_MB_PER_PHOTO: u64 = 2;

/// Computed savings for one permanent-delete batch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Savings {
    /// Megabytes reclaimed, rounded to 2 places.
    pub mb: f64,
    /// Kilograms of CO₂ saved, rounded to 2 places.
    pub carbon: f64,
    /// Tree equivalents saved, rounded to 4 places.
    pub trees: f64,
    /// Number of photos deleted.
    pub n: u64,
}

/// Round to a fixed number of decimal places.
#[must_use]
fn round_places(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

impl Savings {
    /// Compute savings for a batch of `n` photos totalling `total_bytes`.
    #[must_use]
    pub fn from_bytes(total_bytes: u64, n: u64) -> Self {
        #[allow(clippy::cast_precision_loss)]
        let mb = round_places(total_bytes as f64 / BYTES_PER_MB, 2);
        let carbon = round_places(mb * CARBON_KG_PER_MB, 2);
        let carbon_grams = carbon * 1000.0;
        let trees = round_places(carbon_grams * TREES_PER_GRAM, 4);
        Self {
            mb,
            carbon,
            trees,
            n,
        }
    }
}
