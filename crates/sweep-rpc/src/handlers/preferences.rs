//! Preference and prompt handlers.

use async_trait::async_trait;
use chrono::Utc;
use serde_json::{json, Value};

use sweep_engine::highlight::initial_prompts;
use sweep_store::records::UserPreferences;

use crate::context::RpcContext;
use crate::errors::RpcError;
use crate::handlers::{require_array_param, require_string_param};
use crate::registry::MethodHandler;

/// Replace the user's interest-prompt selection.
pub struct SavePreferencesHandler;

#[async_trait]
impl MethodHandler for SavePreferencesHandler {
    async fn handle(&self, params: Option<Value>, ctx: &RpcContext) -> Result<Value, RpcError> {
        let user_id = require_string_param(params.as_ref(), "userId")?;
        let raw_tags = require_array_param(params.as_ref(), "promptTags")?;
        let prompt_tags: Vec<String> = raw_tags
            .iter()
            .map(|tag| {
                tag.as_str().map(ToOwned::to_owned).ok_or_else(|| {
                    RpcError::invalid_params("Parameter 'promptTags' must contain strings")
                })
            })
            .collect::<Result<_, _>>()?;

        let prefs = UserPreferences {
            user_id: user_id.clone(),
            prompt_tags,
            updated_at: Utc::now(),
        };
        ctx.preferences()
            .save(prefs)
            .await
            .map_err(|err| RpcError::Internal {
                message: format!("failed to save preferences for {user_id}: {err}"),
            })?;
        Ok(json!({ "saved": true }))
    }
}

/// Fetch the user's interest-prompt selection.
pub struct GetPreferencesHandler;

#[async_trait]
impl MethodHandler for GetPreferencesHandler {
    async fn handle(&self, params: Option<Value>, ctx: &RpcContext) -> Result<Value, RpcError> {
        let user_id = require_string_param(params.as_ref(), "userId")?;
        let tags = ctx
            .preferences()
            .prompt_tags(&user_id)
            .await
            .map_err(|err| RpcError::Internal {
                message: format!("failed to load preferences for {user_id}: {err}"),
            })?;
        Ok(json!({ "promptTags": tags }))
    }
}

/// The global prompt categories shown before any selection is saved.
pub struct InitialPromptsHandler;

#[async_trait]
impl MethodHandler for InitialPromptsHandler {
    async fn handle(&self, _params: Option<Value>, _ctx: &RpcContext) -> Result<Value, RpcError> {
        Ok(json!({ "prompts": initial_prompts() }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::test_helpers::make_test_context;
    use serde_json::json;

    #[tokio::test]
    async fn save_then_get_round_trips() {
        let ctx = make_test_context();
        let saved = SavePreferencesHandler
            .handle(
                Some(json!({"userId": "u1", "promptTags": ["동물", "여행"]})),
                &ctx,
            )
            .await
            .unwrap();
        assert_eq!(saved["saved"], true);

        let result = GetPreferencesHandler
            .handle(Some(json!({"userId": "u1"})), &ctx)
            .await
            .unwrap();
        assert_eq!(result["promptTags"], json!(["동물", "여행"]));
    }

    #[tokio::test]
    async fn get_without_save_is_empty() {
        let ctx = make_test_context();
        let result = GetPreferencesHandler
            .handle(Some(json!({"userId": "u1"})), &ctx)
            .await
            .unwrap();
        assert!(result["promptTags"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn initial_prompts_lists_every_category() {
        let ctx = make_test_context();
        let result = InitialPromptsHandler.handle(None, &ctx).await.unwrap();
        let prompts = result["prompts"].as_array().unwrap();
        assert_eq!(prompts.len(), 6);
        assert_eq!(prompts[0], "음식");
    }

    #[tokio::test]
    async fn save_rejects_missing_tags() {
        let ctx = make_test_context();
        let err = SavePreferencesHandler
            .handle(Some(json!({"userId": "u1"})), &ctx)
            .await
            .unwrap_err();
        assert_eq!(err.code(), "INVALID_PARAMS");
    }
}
