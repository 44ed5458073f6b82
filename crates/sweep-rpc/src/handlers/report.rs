//! Report handler.

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::context::RpcContext;
use crate::errors::RpcError;
use crate::handlers::require_string_param;
use crate::registry::MethodHandler;

/// Fetch the user's cumulative savings report.
pub struct GetReportHandler;

#[async_trait]
impl MethodHandler for GetReportHandler {
    async fn handle(&self, params: Option<Value>, ctx: &RpcContext) -> Result<Value, RpcError> {
        let user_id = require_string_param(params.as_ref(), "userId")?;
        match ctx.ledger().report(&user_id).await? {
            Some(report) => Ok(json!(report)),
            None => Err(RpcError::not_found(format!(
                "No report for user {user_id}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::test_helpers::make_test_context;
    use crate::handlers::trash::{AddHandler, PurgeHandler};
    use serde_json::json;

    #[tokio::test]
    async fn missing_report_is_not_found() {
        let ctx = make_test_context();
        let err = GetReportHandler
            .handle(Some(json!({"userId": "u1"})), &ctx)
            .await
            .unwrap_err();
        assert_eq!(err.code(), "NOT_FOUND");
    }

    #[tokio::test]
    async fn report_reflects_purges() {
        let ctx = make_test_context();
        let _ = AddHandler
            .handle(
                Some(json!({"userId": "u1", "photos": [{"photoId": "p1"}]})),
                &ctx,
            )
            .await
            .unwrap();
        let _ = PurgeHandler
            .handle(
                Some(json!({
                    "userId": "u1",
                    "photos": [{"photoId": "p1", "size": 1_048_576}]
                })),
                &ctx,
            )
            .await
            .unwrap();

        let report = GetReportHandler
            .handle(Some(json!({"userId": "u1"})), &ctx)
            .await
            .unwrap();
        assert_eq!(report["totalDeletedCount"], 1);
        assert_eq!(report["totalMB"], 1.0);
    }
}
