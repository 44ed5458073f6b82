//! Classification handlers: photo, save, results.

use async_trait::async_trait;
use serde_json::{json, Value};

use sweep_engine::classify::ClassifyRequest;

use crate::context::RpcContext;
use crate::errors::RpcError;
use crate::handlers::{parse_param, require_array_param, require_string_param};
use crate::registry::MethodHandler;

/// Classify one photo without persisting it.
pub struct ClassifyPhotoHandler;

#[async_trait]
impl MethodHandler for ClassifyPhotoHandler {
    async fn handle(&self, params: Option<Value>, ctx: &RpcContext) -> Result<Value, RpcError> {
        let params =
            params.ok_or_else(|| RpcError::invalid_params("Missing request parameters"))?;
        let _user_id = require_string_param(Some(&params), "userId")?;
        let _photo_id = require_string_param(Some(&params), "photoId")?;
        let request: ClassifyRequest = serde_json::from_value(params).map_err(|err| {
            RpcError::invalid_params(format!("Malformed classify request: {err}"))
        })?;

        let classification = ctx.classifier().classify_one(&request);
        Ok(json!({
            "photoId": request.photo_id,
            "folder": classification.labels.join_or_other(),
            "tags": request.tags,
            "sourceApp": classification.source_app,
        }))
    }
}

/// Classify and persist a batch of photos.
pub struct SaveBatchHandler;

#[async_trait]
impl MethodHandler for SaveBatchHandler {
    async fn handle(&self, params: Option<Value>, ctx: &RpcContext) -> Result<Value, RpcError> {
        let user_id = require_string_param(params.as_ref(), "userId")?;
        let photos = require_array_param(params.as_ref(), "classifiedPhotos")?;

        let requests: Vec<ClassifyRequest> = photos
            .iter()
            .map(|photo| parse_param(photo, "classifiedPhotos"))
            .collect::<Result<_, _>>()?;

        let saved = ctx.classifier().save_batch(&user_id, requests).await?;
        Ok(json!({ "saved": saved }))
    }
}

/// Fetch every persisted classification for a user.
pub struct GetResultsHandler;

#[async_trait]
impl MethodHandler for GetResultsHandler {
    async fn handle(&self, params: Option<Value>, ctx: &RpcContext) -> Result<Value, RpcError> {
        let user_id = require_string_param(params.as_ref(), "userId")?;
        let results = ctx.classifier().results(&user_id).await?;
        Ok(json!({ "photos": results }))
    }
}
