//! Structured analysis-metric scores attached to a photo.
//!
//! The upstream analyzer sends an open map of metric name → number. The
//! fields the classification rules actually read are modeled explicitly so
//! the threshold comparison is a compile-time-checkable decision; everything
//! else is preserved in `extra` and round-trips untouched.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Numeric analysis scores for one photo.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagScores {
    /// Blur detector output: `1` = blurry, `0`/absent = sharp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blurry: Option<u8>,

    /// Quality badness score in `[0, 1]`; higher means worse.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub low_score: Option<f64>,

    /// Screenshot flag from device metadata: `1` = screenshot.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub screenshot: Option<u8>,

    /// Any other analyzer metrics, preserved verbatim.
    #[serde(flatten)]
    pub extra: BTreeMap<String, f64>,
}

impl TagScores {
    /// Whether the blur detector fired.
    #[must_use]
    pub fn is_blurry(&self) -> bool {
        self.blurry == Some(1)
    }

    /// Whether the device flagged this photo as a screenshot.
    #[must_use]
    pub fn is_screenshot(&self) -> bool {
        self.screenshot == Some(1)
    }

    /// Whether the quality score crosses the delete-recommendation
    /// threshold. Absent scores never recommend deletion.
    #[must_use]
    pub fn recommends_delete(&self, threshold: f64) -> bool {
        self.low_score.is_some_and(|score| score >= threshold)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blurry_flag() {
        let scores = TagScores {
            blurry: Some(1),
            ..TagScores::default()
        };
        assert!(scores.is_blurry());
        assert!(!TagScores::default().is_blurry());
    }

    #[test]
    fn zero_blurry_is_sharp() {
        let scores = TagScores {
            blurry: Some(0),
            ..TagScores::default()
        };
        assert!(!scores.is_blurry());
    }

    #[test]
    fn delete_recommendation_threshold_inclusive() {
        let scores = TagScores {
            low_score: Some(0.85),
            ..TagScores::default()
        };
        assert!(scores.recommends_delete(0.85));
        assert!(!scores.recommends_delete(0.86));
    }

    #[test]
    fn absent_score_never_recommends_delete() {
        assert!(!TagScores::default().recommends_delete(0.0));
    }

    #[test]
    fn extra_metrics_round_trip() {
        let json = r#"{"blurry":1,"lowScore":0.4,"sharpness":0.9}"#;
        let scores: TagScores = serde_json::from_str(json).unwrap();
        assert_eq!(scores.blurry, Some(1));
        assert_eq!(scores.low_score, Some(0.4));
        assert_eq!(scores.extra.get("sharpness"), Some(&0.9));

        let back = serde_json::to_value(&scores).unwrap();
        assert_eq!(back["sharpness"], 0.9);
    }
}
