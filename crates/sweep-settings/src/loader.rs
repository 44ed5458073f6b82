//! Settings loading with deep merge and environment variable overrides.
//!
//! Loading flow:
//! 1. Start with compiled [`SweepSettings::default()`]
//! 2. If `~/.sweep/settings.json` exists, deep-merge user values over defaults
//! 3. Apply environment variable overrides (highest priority)
//!
//! Deep merge rules:
//! - Objects are merged recursively (source overrides target per-key)
//! - Arrays and primitives are replaced entirely by source
//! - Null values in source are skipped (preserving target)

use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::debug;

use crate::errors::Result;
use crate::types::SweepSettings;

/// Resolve the path to the settings file (`~/.sweep/settings.json`).
pub fn settings_path() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
    PathBuf::from(home).join(".sweep").join("settings.json")
}

/// Load settings from the default path with env var overrides.
pub fn load_settings() -> Result<SweepSettings> {
    load_settings_from_path(&settings_path())
}

/// Load settings from a specific path with env var overrides.
///
/// If the file does not exist, returns defaults. If the file contains
/// invalid JSON, returns an error.
pub fn load_settings_from_path(path: &Path) -> Result<SweepSettings> {
    let defaults = serde_json::to_value(SweepSettings::default())?;

    let merged = if path.exists() {
        debug!(?path, "loading settings from file");
        let content = std::fs::read_to_string(path)?;
        let user: Value = serde_json::from_str(&content)?;
        deep_merge(defaults, user)
    } else {
        debug!(?path, "settings file not found, using defaults");
        defaults
    };

    let mut settings: SweepSettings = serde_json::from_value(merged)?;
    apply_env_overrides(&mut settings);
    Ok(settings)
}

/// Recursive deep merge of two JSON values.
///
/// - Objects are merged recursively (source overrides target per-key)
/// - Arrays and primitives are replaced entirely by source
/// - Null values in source are skipped (preserving target)
pub fn deep_merge(target: Value, source: Value) -> Value {
    match (target, source) {
        (Value::Object(mut target_map), Value::Object(source_map)) => {
            for (key, source_val) in source_map {
                if source_val.is_null() {
                    continue;
                }
                let merged = if let Some(target_val) = target_map.remove(&key) {
                    deep_merge(target_val, source_val)
                } else {
                    source_val
                };
                let _ = target_map.insert(key, merged);
            }
            Value::Object(target_map)
        }
        (_, source) => source,
    }
}

/// Apply environment variable overrides to loaded settings.
///
/// Invalid values are logged and ignored (fall back to file/default).
pub fn apply_env_overrides(settings: &mut SweepSettings) {
    // Geocoder credentials keep the names the deployment already exports.
    if let Some(v) = read_env_string("NCP_CLIENT_ID") {
        settings.geocoder.key_id = v;
    }
    if let Some(v) = read_env_string("NCP_CLIENT_SECRET") {
        settings.geocoder.key_secret = v;
    }
    if let Some(v) = read_env_string("SWEEP_GEOCODER_URL") {
        settings.geocoder.base_url = v;
    }
    if let Some(v) = read_env_f64("SWEEP_LOW_SCORE_THRESHOLD", 0.0, 1.0) {
        settings.classify.low_score_threshold = v;
    }
    if let Some(v) = read_env_u32("SWEEP_STALE_MONTHS", 1, 120) {
        settings.highlight.stale_screenshot_months = v;
    }
    if let Some(v) = read_env_string("SWEEP_THUMBNAIL_BASE_URL") {
        settings.media.thumbnail_base_url = v;
    }
}

// ── Pure parsing functions (testable without env vars) ──────────────────────

/// Parse a string as an `f64` within a range.
pub fn parse_f64_range(val: &str, min: f64, max: f64) -> Option<f64> {
    let n: f64 = val.parse().ok()?;
    (n >= min && n <= max).then_some(n)
}

/// Parse a string as a `u32` within a range.
pub fn parse_u32_range(val: &str, min: u32, max: u32) -> Option<u32> {
    let n: u32 = val.parse().ok()?;
    (n >= min && n <= max).then_some(n)
}

// ── Env var readers (thin wrappers) ─────────────────────────────────────────

fn read_env_string(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

fn read_env_f64(name: &str, min: f64, max: f64) -> Option<f64> {
    let val = std::env::var(name).ok()?;
    let result = parse_f64_range(&val, min, max);
    if result.is_none() {
        tracing::warn!(key = name, value = %val, "invalid f64 env var, ignoring");
    }
    result
}

fn read_env_u32(name: &str, min: u32, max: u32) -> Option<u32> {
    let val = std::env::var(name).ok()?;
    let result = parse_u32_range(&val, min, max);
    if result.is_none() {
        tracing::warn!(key = name, value = %val, "invalid u32 env var, ignoring");
    }
    result
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    // ── deep_merge ──────────────────────────────────────────────────

    #[test]
    fn merge_simple_override() {
        let target = serde_json::json!({"a": 1, "b": 2});
        let source = serde_json::json!({"b": 3});
        let merged = deep_merge(target, source);
        assert_eq!(merged, serde_json::json!({"a": 1, "b": 3}));
    }

    #[test]
    fn merge_nested_objects() {
        let target = serde_json::json!({"classify": {"lowScoreThreshold": 0.85, "travelDestinations": ["제주"]}});
        let source = serde_json::json!({"classify": {"lowScoreThreshold": 0.5}});
        let merged = deep_merge(target, source);
        assert_eq!(merged["classify"]["lowScoreThreshold"], 0.5);
        assert_eq!(merged["classify"]["travelDestinations"][0], "제주");
    }

    #[test]
    fn merge_arrays_replaced_wholesale() {
        let target = serde_json::json!({"list": [1, 2, 3]});
        let source = serde_json::json!({"list": [4]});
        let merged = deep_merge(target, source);
        assert_eq!(merged["list"], serde_json::json!([4]));
    }

    #[test]
    fn merge_null_preserves_target() {
        let target = serde_json::json!({"a": 1});
        let source = serde_json::json!({"a": null});
        let merged = deep_merge(target, source);
        assert_eq!(merged["a"], 1);
    }

    // ── load_settings_from_path ─────────────────────────────────────

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = load_settings_from_path(&dir.path().join("nope.json")).unwrap();
        assert_eq!(settings.name, "sweep");
    }

    #[test]
    fn file_values_merge_over_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{"highlight":{"staleScreenshotMonths":3}}"#).unwrap();
        let settings = load_settings_from_path(&path).unwrap();
        assert_eq!(settings.highlight.stale_screenshot_months, 3);
        assert!((settings.classify.low_score_threshold - 0.85).abs() < f64::EPSILON);
    }

    #[test]
    fn invalid_json_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{not json").unwrap();
        assert!(load_settings_from_path(&path).is_err());
    }

    // ── parsers ─────────────────────────────────────────────────────

    #[test]
    fn parse_f64_in_range() {
        assert_eq!(parse_f64_range("0.5", 0.0, 1.0), Some(0.5));
        assert_eq!(parse_f64_range("1.5", 0.0, 1.0), None);
        assert_eq!(parse_f64_range("abc", 0.0, 1.0), None);
    }

    #[test]
    fn parse_u32_in_range() {
        assert_eq!(parse_u32_range("6", 1, 120), Some(6));
        assert_eq!(parse_u32_range("0", 1, 120), None);
        assert_eq!(parse_u32_range("-1", 1, 120), None);
    }
}
