//! Folder handlers: summary, photos, screenshot subfolders.

use async_trait::async_trait;
use serde_json::{json, Value};

use sweep_engine::folders;

use crate::context::RpcContext;
use crate::errors::RpcError;
use crate::handlers::require_string_param;
use crate::registry::MethodHandler;

/// Folder summary for the home screen cards.
pub struct FolderSummaryHandler;

#[async_trait]
impl MethodHandler for FolderSummaryHandler {
    async fn handle(&self, params: Option<Value>, ctx: &RpcContext) -> Result<Value, RpcError> {
        let user_id = require_string_param(params.as_ref(), "userId")?;
        let photos = ctx.classifier().results(&user_id).await?;
        let summary = folders::summarize(&photos, &ctx.settings.media.thumbnail_base_url);
        Ok(json!({
            "summary": {
                "totalPhotos": summary.total_photos,
                "savedStorage": summary.saved_storage,
            },
            "folders": summary.folders,
        }))
    }
}

/// Photos inside one folder.
pub struct FolderPhotosHandler;

#[async_trait]
impl MethodHandler for FolderPhotosHandler {
    async fn handle(&self, params: Option<Value>, ctx: &RpcContext) -> Result<Value, RpcError> {
        let user_id = require_string_param(params.as_ref(), "userId")?;
        let folder_name = require_string_param(params.as_ref(), "folderName")?;
        let photos = ctx.classifier().results(&user_id).await?;
        let matched = folders::photos_in_folder(&photos, &folder_name);
        Ok(json!({ "photos": matched }))
    }
}

/// Screenshot subcategory buckets.
pub struct ScreenshotSubfoldersHandler;

#[async_trait]
impl MethodHandler for ScreenshotSubfoldersHandler {
    async fn handle(&self, params: Option<Value>, ctx: &RpcContext) -> Result<Value, RpcError> {
        let user_id = require_string_param(params.as_ref(), "userId")?;
        let photos = ctx.classifier().results(&user_id).await?;
        let subfolders = folders::screenshot_subfolders(&photos);
        Ok(json!({ "subfolders": subfolders }))
    }
}
