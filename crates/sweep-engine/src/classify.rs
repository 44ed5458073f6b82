//! The classification rule evaluator and batch-save service.
//!
//! Rule order is part of the observable contract: a duplicate cluster id
//! short-circuits everything, otherwise labels accumulate as
//! similarity → blur → screenshot → delete-recommended and the joined
//! `folder` string preserves that order.

use std::sync::{Arc, LazyLock};

use chrono::{DateTime, Utc};
use futures::future::join_all;
use regex::Regex;
use serde::Deserialize;
use tracing::info;

use sweep_core::labels::{FolderLabel, LabelSet};
use sweep_core::tags::TagScores;
use sweep_settings::types::SweepSettings;
use sweep_store::records::{GeoPoint, ImageSize, PhotoRecord};
use sweep_store::repos::PhotoRepo;
use sweep_store::PartitionStore;

use crate::errors::{EngineError, Result};
use crate::geo::{maybe_tag_travel, ReverseGeocoder};

/// Matches `Screenshot_<digits>_<digits>_<AppName>.<ext>` and captures
/// the application name.
static SOURCE_APP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Screenshot_\d+_\d+_(.+?)\.").expect("valid screenshot pattern"));

/// Filename substring that marks a screenshot.
const SCREENSHOT_MARKER: &str = "Screenshot_";

/// One photo's classification input.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassifyRequest {
    /// Photo identifier.
    pub photo_id: String,
    /// Analysis-metric scores.
    #[serde(default)]
    pub tags: TagScores,
    /// Original filename, used for screenshot detection.
    #[serde(default)]
    pub filename: Option<String>,
    /// Exact-duplicate cluster id (`d` prefix).
    #[serde(default)]
    pub duplicate_group_id: Option<String>,
    /// Near-duplicate cluster id (`s` prefix).
    #[serde(default)]
    pub similar_group_id: Option<String>,
    /// Interest keywords; the travel tagger may append to these.
    #[serde(default)]
    pub content_tags: Vec<String>,
    /// Capture time; defaults to now when absent.
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
    /// Capture location, if known.
    #[serde(default)]
    pub location: Option<GeoPoint>,
    /// Pixel dimensions, if known.
    #[serde(default)]
    pub image_size: Option<ImageSize>,
}

/// The rule evaluator's output for one photo.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Classification {
    /// Ordered folder labels; may be empty.
    pub labels: LabelSet,
    /// The cluster id that produced a duplicate or similar label.
    pub group_id: Option<String>,
    /// Application name extracted from a screenshot filename.
    pub source_app: Option<String>,
}

/// Evaluate the classification rules for one photo.
///
/// Pure: the travel tagger mutates `content_tags` before this runs.
#[must_use]
pub fn classify(
    tags: &TagScores,
    filename: Option<&str>,
    duplicate_group_id: Option<&str>,
    similar_group_id: Option<&str>,
    low_score_threshold: f64,
) -> Classification {
    // Duplicate membership short-circuits every other rule.
    if let Some(group_id) = duplicate_group_id {
        return Classification {
            labels: FolderLabel::Duplicate.into(),
            group_id: Some(group_id.to_owned()),
            source_app: None,
        };
    }

    let mut labels = LabelSet::new();
    let mut group_id = None;
    let mut source_app = None;

    if let Some(similar_id) = similar_group_id {
        labels.push(FolderLabel::Similar);
        group_id = Some(similar_id.to_owned());
    }

    if tags.is_blurry() {
        labels.push(FolderLabel::Blurry);
    }

    if let Some(filename) = filename {
        if filename.contains(SCREENSHOT_MARKER) {
            labels.push(FolderLabel::Screenshot);
            source_app = SOURCE_APP_RE
                .captures(filename)
                .and_then(|caps| caps.get(1))
                .map(|m| m.as_str().to_owned());
        }
    }

    if tags.recommends_delete(low_score_threshold) {
        labels.push(FolderLabel::DeleteRecommended);
    }

    Classification {
        labels,
        group_id,
        source_app,
    }
}

/// Classification service: evaluates rules, enriches with travel tags,
/// and persists the results.
pub struct Classifier {
    photos: PhotoRepo,
    geocoder: Arc<dyn ReverseGeocoder>,
    settings: Arc<SweepSettings>,
}

impl Classifier {
    /// Build a classifier over the given store and geocoder.
    #[must_use]
    pub fn new(
        store: Arc<dyn PartitionStore>,
        geocoder: Arc<dyn ReverseGeocoder>,
        settings: Arc<SweepSettings>,
    ) -> Self {
        Self {
            photos: PhotoRepo::new(store),
            geocoder,
            settings,
        }
    }

    /// Classify one photo without persisting anything.
    #[must_use]
    pub fn classify_one(&self, request: &ClassifyRequest) -> Classification {
        classify(
            &request.tags,
            request.filename.as_deref(),
            request.duplicate_group_id.as_deref(),
            request.similar_group_id.as_deref(),
            self.settings.classify.low_score_threshold,
        )
    }

    /// Classify and persist a batch for one user.
    ///
    /// Photos with a location are enriched concurrently by the travel
    /// tagger first; per-photo enrichment is independent. Returns the
    /// number of records saved.
    pub async fn save_batch(
        &self,
        user_id: &str,
        requests: Vec<ClassifyRequest>,
    ) -> Result<usize> {
        let enriched = join_all(requests.into_iter().map(|request| self.enrich(request))).await;

        let records: Vec<PhotoRecord> = enriched
            .into_iter()
            .map(|request| self.to_record(user_id, request))
            .collect();
        let count = records.len();

        self.photos
            .save_batch(records)
            .await
            .map_err(|err| EngineError::store("save_batch", user_id, err))?;
        info!(user_id, count, "saved classified photo batch");
        Ok(count)
    }

    /// Every persisted classification for `user_id`.
    pub async fn results(&self, user_id: &str) -> Result<Vec<PhotoRecord>> {
        self.photos
            .fetch_all(user_id)
            .await
            .map_err(|err| EngineError::store("results", user_id, err))
    }

    /// One persisted classification, if present.
    pub async fn result(&self, user_id: &str, photo_id: &str) -> Result<Option<PhotoRecord>> {
        self.photos
            .get(user_id, photo_id)
            .await
            .map_err(|err| EngineError::store("result", user_id, err))
    }

    async fn enrich(&self, mut request: ClassifyRequest) -> ClassifyRequest {
        if !self.settings.geocoder.enabled {
            return request;
        }
        if let Some(location) = request.location {
            maybe_tag_travel(
                self.geocoder.as_ref(),
                &mut request.content_tags,
                location.lat,
                location.lon,
                &self.settings.classify.travel_destinations,
            )
            .await;
        }
        request
    }

    fn to_record(&self, user_id: &str, request: ClassifyRequest) -> PhotoRecord {
        let classification = self.classify_one(&request);
        PhotoRecord {
            user_id: user_id.to_owned(),
            photo_id: request.photo_id,
            // The batch path persists an empty folder as-is; only the
            // single-photo read path substitutes 기타.
            folder: classification.labels.join(),
            timestamp: request.timestamp.unwrap_or_else(Utc::now),
            tags: request.tags,
            content_tags: request.content_tags,
            group_id: classification.group_id,
            source_app: classification.source_app,
            location: request.location,
            image_size: request.image_size,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
