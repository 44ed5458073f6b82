//! Settings type definitions.
//!
//! All types use `#[serde(rename_all = "camelCase")]` to match the JSON
//! wire format. Each type implements [`Default`] with production default
//! values; `#[serde(default)]` allows partial JSON — missing fields get
//! their default value during deserialization.

use serde::{Deserialize, Serialize};
use sweep_core::retry::RetryConfig;

/// Root settings type for the Sweep engine.
///
/// Loaded from `~/.sweep/settings.json` with defaults applied for missing
/// fields. Environment variables can override specific values.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SweepSettings {
    /// Settings schema version.
    pub version: String,
    /// Application name.
    pub name: String,
    /// Classification rule parameters.
    pub classify: ClassifySettings,
    /// Reverse-geocoding collaborator settings.
    pub geocoder: GeocoderSettings,
    /// Highlight feed parameters.
    pub highlight: HighlightSettings,
    /// Trash ledger batch/retry parameters.
    pub trash: TrashSettings,
    /// Media/thumbnail reference settings.
    pub media: MediaSettings,
}

impl Default for SweepSettings {
    fn default() -> Self {
        Self {
            version: "0.1.0".to_string(),
            name: "sweep".to_string(),
            classify: ClassifySettings::default(),
            geocoder: GeocoderSettings::default(),
            highlight: HighlightSettings::default(),
            trash: TrashSettings::default(),
            media: MediaSettings::default(),
        }
    }
}

/// Classification rule parameters.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClassifySettings {
    /// Badness score at or above which `삭제 추천` is applied.
    ///
    /// One threshold and one comparison direction for both the
    /// single-photo and the batch-save path.
    pub low_score_threshold: f64,
    /// Destination keywords that mark a region as a travel spot.
    pub travel_destinations: Vec<String>,
}

impl Default for ClassifySettings {
    fn default() -> Self {
        Self {
            low_score_threshold: 0.85,
            travel_destinations: ["제주", "부산", "강릉", "속초", "여수", "경주", "전주", "남해"]
                .iter()
                .map(ToString::to_string)
                .collect(),
        }
    }
}

/// Reverse-geocoding collaborator settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GeocoderSettings {
    /// Whether geo enrichment is attempted at all.
    pub enabled: bool,
    /// Base URL of the reverse-geocode endpoint.
    pub base_url: String,
    /// API key ID header value.
    pub key_id: String,
    /// API key secret header value.
    pub key_secret: String,
}

impl Default for GeocoderSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: "https://maps.apigw.ntruss.com/map-reversegeocode/v2".to_string(),
            key_id: String::new(),
            key_secret: String::new(),
        }
    }
}

/// Highlight feed parameters.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HighlightSettings {
    /// Screenshots older than this many months are considered stale.
    pub stale_screenshot_months: u32,
}

impl Default for HighlightSettings {
    fn default() -> Self {
        Self {
            stale_screenshot_months: 6,
        }
    }
}

/// Trash ledger batch/retry parameters.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TrashSettings {
    /// Retry policy for unprocessed batch-delete items.
    pub retry: RetryConfig,
}

/// Media/thumbnail reference settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MediaSettings {
    /// Base URL prepended to photo IDs to form thumbnail references.
    pub thumbnail_base_url: String,
}

impl Default for MediaSettings {
    fn default() -> Self {
        Self {
            thumbnail_base_url: "https://cdn.sweep.example".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_production_values() {
        let settings = SweepSettings::default();
        assert!((settings.classify.low_score_threshold - 0.85).abs() < f64::EPSILON);
        assert_eq!(settings.highlight.stale_screenshot_months, 6);
        assert_eq!(settings.trash.retry.max_retries, 3);
        assert!(settings.classify.travel_destinations.contains(&"제주".to_string()));
    }

    #[test]
    fn partial_json_fills_defaults() {
        let settings: SweepSettings =
            serde_json::from_str(r#"{"classify":{"lowScoreThreshold":0.5}}"#).unwrap();
        assert!((settings.classify.low_score_threshold - 0.5).abs() < f64::EPSILON);
        assert_eq!(settings.highlight.stale_screenshot_months, 6);
        assert!(!settings.classify.travel_destinations.is_empty());
    }

    #[test]
    fn serializes_camel_case() {
        let json = serde_json::to_value(SweepSettings::default()).unwrap();
        assert!(json["classify"]["lowScoreThreshold"].is_number());
        assert!(json["highlight"]["staleScreenshotMonths"].is_number());
    }
}
