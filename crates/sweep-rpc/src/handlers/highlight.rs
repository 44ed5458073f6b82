//! Highlight handlers: folders, photos, action, history.

use async_trait::async_trait;
use serde_json::{json, Value};

use sweep_core::action::HighlightActionKind;

use crate::context::RpcContext;
use crate::errors::RpcError;
use crate::handlers::require_string_param;
use crate::registry::MethodHandler;

/// The ordered highlight feed.
pub struct HighlightFoldersHandler;

#[async_trait]
impl MethodHandler for HighlightFoldersHandler {
    async fn handle(&self, params: Option<Value>, ctx: &RpcContext) -> Result<Value, RpcError> {
        let user_id = require_string_param(params.as_ref(), "userId")?;
        let folders = ctx.curator().folders(&user_id).await?;
        Ok(json!({ "folders": folders }))
    }
}

/// Photos for one highlight folder.
pub struct HighlightPhotosHandler;

#[async_trait]
impl MethodHandler for HighlightPhotosHandler {
    async fn handle(&self, params: Option<Value>, ctx: &RpcContext) -> Result<Value, RpcError> {
        let user_id = require_string_param(params.as_ref(), "userId")?;
        let folder = require_string_param(params.as_ref(), "folder")?;
        let photos = ctx.curator().photos_for_folder(&user_id, &folder).await?;
        Ok(json!({ "photos": photos }))
    }
}

/// Record a swipe decision.
pub struct RecordActionHandler;

#[async_trait]
impl MethodHandler for RecordActionHandler {
    async fn handle(&self, params: Option<Value>, ctx: &RpcContext) -> Result<Value, RpcError> {
        let user_id = require_string_param(params.as_ref(), "userId")?;
        let photo_id = require_string_param(params.as_ref(), "photoId")?;
        let action_raw = require_string_param(params.as_ref(), "action")?;
        let action: HighlightActionKind = action_raw
            .parse()
            .map_err(|_| RpcError::invalid_params(format!("Invalid action: {action_raw}")))?;

        ctx.curator().record_action(&user_id, &photo_id, action).await?;
        Ok(json!({ "recorded": true }))
    }
}

/// The user's swipe history.
pub struct HistoryHandler;

#[async_trait]
impl MethodHandler for HistoryHandler {
    async fn handle(&self, params: Option<Value>, ctx: &RpcContext) -> Result<Value, RpcError> {
        let user_id = require_string_param(params.as_ref(), "userId")?;
        let history = ctx.curator().history(&user_id).await?;
        Ok(json!({ "actions": history }))
    }
}
