//! Typed records persisted in the partitioned store.
//!
//! These are the storage-boundary shapes: field names are camelCase to
//! match the JSON wire contract, timestamps are RFC 3339 strings, and the
//! multi-label folder membership is one comma-joined string. Everything
//! above this module works with [`LabelSet`] instead of raw folder strings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sweep_core::action::HighlightActionKind;
use sweep_core::labels::{FolderLabel, LabelSet};
use sweep_core::tags::TagScores;

use crate::store::RecordKey;

/// A latitude/longitude pair.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoPoint {
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lon: f64,
}

/// Pixel dimensions of a photo.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageSize {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

/// One classified photo, keyed by (`userId`, `photoId`).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoRecord {
    /// Owning user (partition key).
    pub user_id: String,
    /// Photo identifier (sort key).
    pub photo_id: String,
    /// Comma-joined ordered folder labels; may be empty.
    #[serde(default)]
    pub folder: String,
    /// Classification time.
    pub timestamp: DateTime<Utc>,
    /// Analysis-metric scores.
    #[serde(default)]
    pub tags: TagScores,
    /// Free-form interest keywords for highlight matching.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub content_tags: Vec<String>,
    /// Duplicate/similarity cluster id (`d`/`s` prefix).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,
    /// Application name derived from a screenshot filename.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_app: Option<String>,
    /// Capture location, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<GeoPoint>,
    /// Pixel dimensions, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_size: Option<ImageSize>,
}

impl PhotoRecord {
    /// Storage address of this record.
    #[must_use]
    pub fn key(&self) -> RecordKey {
        RecordKey::item(self.user_id.clone(), self.photo_id.clone())
    }

    /// The folder membership as an ordered label set.
    #[must_use]
    pub fn labels(&self) -> LabelSet {
        LabelSet::split(&self.folder)
    }

    /// Folder string for display, substituting `기타` when empty.
    #[must_use]
    pub fn folder_or_other(&self) -> &str {
        if self.folder.is_empty() {
            FolderLabel::Other.as_str()
        } else {
            &self.folder
        }
    }

    /// Whether this photo belongs to the named folder.
    #[must_use]
    pub fn in_folder(&self, folder_name: &str) -> bool {
        self.labels().contains_name(folder_name)
    }
}

/// A recorded swipe decision, keyed by (`userId`, `photoId`).
///
/// Upsert semantics: the latest action for a photo wins.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HighlightAction {
    /// Owning user (partition key).
    pub user_id: String,
    /// Photo identifier (sort key).
    pub photo_id: String,
    /// The decision taken.
    pub action: HighlightActionKind,
    /// When the decision was recorded.
    pub timestamp: DateTime<Utc>,
}

impl HighlightAction {
    /// Storage address of this record.
    #[must_use]
    pub fn key(&self) -> RecordKey {
        RecordKey::item(self.user_id.clone(), self.photo_id.clone())
    }
}

/// A trashed photo awaiting restore or purge.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrashItem {
    /// Owning user (partition key).
    pub user_id: String,
    /// Photo identifier (sort key).
    pub photo_id: String,
    /// Trash entry time, epoch milliseconds.
    pub deleted_at: i64,
    /// Which surface sent the photo here (folder name, highlight, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Tags carried along for display in the trash view.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    /// Quality score at deletion time.
    #[serde(default)]
    pub score: f64,
}

impl TrashItem {
    /// Storage address of this record.
    #[must_use]
    pub fn key(&self) -> RecordKey {
        RecordKey::item(self.user_id.clone(), self.photo_id.clone())
    }
}

/// Per-user cumulative savings ledger.
///
/// Only ever mutated through additive counter updates; the stored record
/// may therefore carry fields this shape defaults to zero.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    /// Total photos permanently deleted.
    #[serde(default)]
    pub total_deleted_count: u64,
    /// Total megabytes reclaimed. The wire field is `totalMB`, not the
    /// camel-cased `totalMb`.
    #[serde(default, rename = "totalMB")]
    pub total_mb: f64,
    /// Total kilograms of CO₂ saved.
    #[serde(default)]
    pub total_carbon: f64,
    /// Total tree equivalents saved.
    #[serde(default)]
    pub total_trees: f64,
}

/// User-selected interest prompts, replaced wholesale on save.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPreferences {
    /// Owning user (partition key).
    pub user_id: String,
    /// Chosen prompt tags, in selection order.
    #[serde(default)]
    pub prompt_tags: Vec<String>,
    /// Last save time.
    pub updated_at: DateTime<Utc>,
}
