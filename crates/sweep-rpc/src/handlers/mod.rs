//! RPC handler modules and registration.

pub mod classify;
pub mod folders;
pub mod highlight;
pub mod preferences;
pub mod report;
pub mod trash;

use serde_json::Value;

use crate::errors::RpcError;
use crate::registry::MethodRegistry;

/// Register all RPC handlers with the registry.
pub fn register_all(registry: &mut MethodRegistry) {
    // Classify
    registry.register("classify.photo", classify::ClassifyPhotoHandler);
    registry.register("classify.save", classify::SaveBatchHandler);
    registry.register("classify.results", classify::GetResultsHandler);

    // Folders
    registry.register("folders.summary", folders::FolderSummaryHandler);
    registry.register("folders.photos", folders::FolderPhotosHandler);
    registry.register(
        "screenshots.subfolders",
        folders::ScreenshotSubfoldersHandler,
    );

    // Highlight
    registry.register("highlight.folders", highlight::HighlightFoldersHandler);
    registry.register("highlight.photos", highlight::HighlightPhotosHandler);
    registry.register("highlight.action", highlight::RecordActionHandler);
    registry.register("highlight.history", highlight::HistoryHandler);

    // Trash
    registry.register("trash.add", trash::AddHandler);
    registry.register("trash.list", trash::ListHandler);
    registry.register("trash.restore", trash::RestoreHandler);
    registry.register("trash.purge", trash::PurgeHandler);

    // Report
    registry.register("report.get", report::GetReportHandler);

    // Preferences
    registry.register("preferences.save", preferences::SavePreferencesHandler);
    registry.register("preferences.get", preferences::GetPreferencesHandler);
    registry.register("prompts.init", preferences::InitialPromptsHandler);
}

/// Extract a required parameter from the params object.
pub(crate) fn require_param<'a>(
    params: Option<&'a Value>,
    key: &str,
) -> Result<&'a Value, RpcError> {
    params
        .and_then(|p| p.get(key))
        .ok_or_else(|| RpcError::invalid_params(format!("Missing required parameter: {key}")))
}

/// Extract a required string parameter.
pub(crate) fn require_string_param(params: Option<&Value>, key: &str) -> Result<String, RpcError> {
    require_param(params, key)?
        .as_str()
        .map(ToOwned::to_owned)
        .ok_or_else(|| RpcError::invalid_params(format!("Parameter '{key}' must be a string")))
}

/// Extract a required array parameter.
pub(crate) fn require_array_param<'a>(
    params: Option<&'a Value>,
    key: &str,
) -> Result<&'a Vec<Value>, RpcError> {
    require_param(params, key)?
        .as_array()
        .ok_or_else(|| RpcError::invalid_params(format!("Parameter '{key}' must be an array")))
}

/// Deserialize a required parameter into a typed value.
pub(crate) fn parse_param<T: serde::de::DeserializeOwned>(
    value: &Value,
    key: &str,
) -> Result<T, RpcError> {
    serde_json::from_value(value.clone())
        .map_err(|err| RpcError::invalid_params(format!("Parameter '{key}' is malformed: {err}")))
}


#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn register_all_populates_registry() {
        let mut registry = MethodRegistry::new();
        register_all(&mut registry);
        assert!(registry.has_method("classify.photo"));
        assert!(registry.has_method("folders.summary"));
        assert!(registry.has_method("highlight.action"));
        assert!(registry.has_method("trash.purge"));
        assert!(registry.has_method("prompts.init"));
        assert_eq!(registry.methods().len(), 18);
    }

    #[test]
    fn require_param_missing() {
        let params = Some(json!({"other": 1}));
        let err = require_param(params.as_ref(), "userId").unwrap_err();
        assert_eq!(err.code(), "INVALID_PARAMS");
        assert!(err.to_string().contains("userId"));
    }

    #[test]
    fn require_string_param_wrong_type() {
        let params = Some(json!({"userId": 42}));
        let err = require_string_param(params.as_ref(), "userId").unwrap_err();
        assert_eq!(err.code(), "INVALID_PARAMS");
    }

    #[test]
    fn require_array_param_ok() {
        let params = Some(json!({"photoIds": ["a", "b"]}));
        let ids = require_array_param(params.as_ref(), "photoIds").unwrap();
        assert_eq!(ids.len(), 2);
    }
}
