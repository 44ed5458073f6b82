//! Method registry: dotted method names to handlers.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use crate::context::RpcContext;
use crate::errors::RpcError;

/// One RPC method implementation.
#[async_trait]
pub trait MethodHandler: Send + Sync {
    /// Validate params and execute the method.
    async fn handle(&self, params: Option<Value>, ctx: &RpcContext) -> Result<Value, RpcError>;
}

/// Maps method names to handlers and dispatches requests.
#[derive(Default)]
pub struct MethodRegistry {
    handlers: HashMap<String, Arc<dyn MethodHandler>>,
}

impl MethodRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler under a method name. A later registration for
    /// the same name replaces the earlier one.
    pub fn register(&mut self, method: &str, handler: impl MethodHandler + 'static) {
        let _ = self.handlers.insert(method.to_owned(), Arc::new(handler));
    }

    /// Whether a handler is registered for the method.
    #[must_use]
    pub fn has_method(&self, method: &str) -> bool {
        self.handlers.contains_key(method)
    }

    /// Registered method names, unsorted.
    #[must_use]
    pub fn methods(&self) -> Vec<&str> {
        self.handlers.keys().map(String::as_str).collect()
    }

    /// Dispatch one request to its handler.
    pub async fn dispatch(
        &self,
        method: &str,
        params: Option<Value>,
        ctx: &RpcContext,
    ) -> Result<Value, RpcError> {
        let Some(handler) = self.handlers.get(method) else {
            return Err(RpcError::MethodNotFound {
                method: method.to_owned(),
            });
        };
        debug!(method, "dispatching rpc request");
        handler.handle(params, ctx).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::test_helpers::make_test_context;
    use serde_json::json;

    struct EchoHandler;

    #[async_trait]
    impl MethodHandler for EchoHandler {
        async fn handle(
            &self,
            params: Option<Value>,
            _ctx: &RpcContext,
        ) -> Result<Value, RpcError> {
            Ok(params.unwrap_or(Value::Null))
        }
    }

    #[tokio::test]
    async fn dispatch_routes_to_registered_handler() {
        let mut registry = MethodRegistry::new();
        registry.register("test.echo", EchoHandler);
        let ctx = make_test_context();

        let result = registry
            .dispatch("test.echo", Some(json!({"a": 1})), &ctx)
            .await
            .unwrap();
        assert_eq!(result["a"], 1);
    }

    #[tokio::test]
    async fn dispatch_unknown_method_errors() {
        let registry = MethodRegistry::new();
        let ctx = make_test_context();
        let err = registry.dispatch("no.such", None, &ctx).await.unwrap_err();
        assert_eq!(err.code(), "METHOD_NOT_FOUND");
    }
}
