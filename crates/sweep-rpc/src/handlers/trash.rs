//! Trash handlers: add, list, restore, purge.

use async_trait::async_trait;
use serde_json::{json, Value};

use sweep_engine::trash::{PurgeItem, TrashAdd};

use crate::context::RpcContext;
use crate::errors::RpcError;
use crate::handlers::{parse_param, require_array_param, require_string_param};
use crate::registry::MethodHandler;

/// Move photos to trash.
pub struct AddHandler;

#[async_trait]
impl MethodHandler for AddHandler {
    async fn handle(&self, params: Option<Value>, ctx: &RpcContext) -> Result<Value, RpcError> {
        let user_id = require_string_param(params.as_ref(), "userId")?;
        let raw_items = require_array_param(params.as_ref(), "photos")?;
        let items: Vec<TrashAdd> = raw_items
            .iter()
            .map(|item| parse_param(item, "photos"))
            .collect::<Result<_, _>>()?;

        let added = ctx.ledger().add(&user_id, items).await?;
        Ok(json!({ "added": added }))
    }
}

/// List the user's trash.
pub struct ListHandler;

#[async_trait]
impl MethodHandler for ListHandler {
    async fn handle(&self, params: Option<Value>, ctx: &RpcContext) -> Result<Value, RpcError> {
        let user_id = require_string_param(params.as_ref(), "userId")?;
        let items = ctx.ledger().list(&user_id).await?;
        Ok(json!({ "items": items }))
    }
}

fn string_ids(raw: &[Value], key: &str) -> Result<Vec<String>, RpcError> {
    raw.iter()
        .map(|id| {
            id.as_str().map(ToOwned::to_owned).ok_or_else(|| {
                RpcError::invalid_params(format!("Parameter '{key}' must contain strings"))
            })
        })
        .collect()
}

/// Restore photos out of trash.
pub struct RestoreHandler;

#[async_trait]
impl MethodHandler for RestoreHandler {
    async fn handle(&self, params: Option<Value>, ctx: &RpcContext) -> Result<Value, RpcError> {
        let user_id = require_string_param(params.as_ref(), "userId")?;
        let raw_ids = require_array_param(params.as_ref(), "photoIds")?;
        let photo_ids = string_ids(raw_ids, "photoIds")?;

        let outcome = ctx.ledger().restore(&user_id, photo_ids).await?;
        serde_json::to_value(outcome).map_err(|err| RpcError::Internal {
            message: err.to_string(),
        })
    }
}

/// Permanently delete photos and accumulate the savings report.
pub struct PurgeHandler;

#[async_trait]
impl MethodHandler for PurgeHandler {
    async fn handle(&self, params: Option<Value>, ctx: &RpcContext) -> Result<Value, RpcError> {
        let user_id = require_string_param(params.as_ref(), "userId")?;
        let raw_items = require_array_param(params.as_ref(), "photos")?;
        let items: Vec<PurgeItem> = raw_items
            .iter()
            .map(|item| parse_param(item, "photos"))
            .collect::<Result<_, _>>()?;

        let result = ctx.ledger().purge(&user_id, items).await?;
        serde_json::to_value(result).map_err(|err| RpcError::Internal {
            message: err.to_string(),
        })
    }
}
