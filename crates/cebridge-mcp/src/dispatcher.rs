//! Request dispatch: turns one inbound item into at most one response.

use crate::codec::InboundMessage;
use crate::jsonrpc::{JsonRpcRequest, JsonRpcResponse, INVALID_PARAMS, METHOD_NOT_FOUND};
use crate::mcp::{
    self, ToolCall, METHOD_INITIALIZE, METHOD_TOOLS_CALL, METHOD_TOOLS_LIST, NOTIFICATION_PREFIX,
};
use crate::tools::ToolRegistry;
use crate::transport::Inbound;
use cebridge_core::{BridgeError, EngineClient, Result};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Routes requests to the MCP methods or to engine tools.
pub struct Dispatcher {
    client: Arc<dyn EngineClient>,
    registry: ToolRegistry,
}

impl Dispatcher {
    pub fn new(client: Arc<dyn EngineClient>, registry: ToolRegistry) -> Self {
        Self { client, registry }
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Handle one inbound item. `None` means nothing is sent back.
    pub async fn handle(&self, inbound: Inbound) -> Option<JsonRpcResponse> {
        match inbound {
            Err(e) => Some(JsonRpcResponse::error(e.id(), e.code(), e.to_string())),
            Ok(InboundMessage::Reply(reply)) => {
                debug!("Dropping client reply: {}", reply);
                None
            }
            Ok(InboundMessage::Request(request)) => self.handle_request(request).await,
        }
    }

    pub async fn handle_request(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        let JsonRpcRequest {
            method, params, id, ..
        } = request;

        let Some(id) = id else {
            if method.starts_with(NOTIFICATION_PREFIX) {
                debug!("Notification: {}", method);
            } else {
                warn!("Ignoring request without id: {}", method);
            }
            return None;
        };

        let params = params.unwrap_or(Value::Null);
        debug!("RPC call: {}({})", method, params);

        let response = match method.as_str() {
            METHOD_INITIALIZE => {
                info!("Client initialized");
                JsonRpcResponse::success(id, mcp::initialize_result(&params))
            }
            METHOD_TOOLS_LIST => JsonRpcResponse::success(id, mcp::tools_list(&self.registry)),
            METHOD_TOOLS_CALL => match ToolCall::parse(&params) {
                Ok(call) if self.registry.get(&call.name).is_some() => {
                    let outcome = self.invoke(&call.name, &call.arguments).await;
                    if let Err(e) = &outcome {
                        error!("Tool {} failed: {}", call.name, e);
                    }
                    JsonRpcResponse::success(id, mcp::call_tool_result(outcome))
                }
                Ok(call) => {
                    JsonRpcResponse::error(id, INVALID_PARAMS, format!("Unknown tool: {}", call.name))
                }
                Err(e) => JsonRpcResponse::error(id, e.to_rpc_error_code(), e.to_string()),
            },
            name if self.registry.get(name).is_some() => match self.invoke(name, &params).await {
                Ok(value) => JsonRpcResponse::success(id, value),
                Err(e) => {
                    error!("RPC error for {}: {}", name, e);
                    JsonRpcResponse::error(id, e.to_rpc_error_code(), e.to_string())
                }
            },
            other => {
                warn!("Unknown method: {}", other);
                JsonRpcResponse::error(id, METHOD_NOT_FOUND, format!("Method not found: {}", other))
            }
        };

        Some(response)
    }

    /// Run a tool by name: build its engine params and forward the call.
    pub async fn invoke(&self, name: &str, arguments: &Value) -> Result<Value> {
        let tool = self
            .registry
            .get(name)
            .ok_or_else(|| BridgeError::invalid_params(format!("Unknown tool: {}", name)))?;

        let params = tool.build_params(arguments)?;
        self.client.call(tool.method, params).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::DecodeError;
    use crate::jsonrpc::{INVALID_REQUEST, PARSE_ERROR};
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;

    /// Records calls and answers from a fixed closure.
    struct FakeEngine {
        calls: Mutex<Vec<(String, Value)>>,
        answer: fn(&str) -> Result<Value>,
    }

    #[async_trait]
    impl EngineClient for FakeEngine {
        async fn call(&self, method: &str, params: Value) -> Result<Value> {
            self.calls
                .lock()
                .unwrap()
                .push((method.to_string(), params));
            (self.answer)(method)
        }
    }

    fn dispatcher(answer: fn(&str) -> Result<Value>) -> (Dispatcher, Arc<FakeEngine>) {
        let engine = Arc::new(FakeEngine {
            calls: Mutex::new(Vec::new()),
            answer,
        });
        let dispatcher = Dispatcher::new(engine.clone(), ToolRegistry::builtin());
        (dispatcher, engine)
    }

    fn ok_engine(_: &str) -> Result<Value> {
        Ok(json!({"success": true, "value": 77}))
    }

    fn down_engine(_: &str) -> Result<Value> {
        Err(BridgeError::ServiceUnavailable {
            pipe: "CE_MCP_Bridge_v99".to_string(),
            source: None,
        })
    }

    fn request(method: &str, params: Value, id: i64) -> Inbound {
        Ok(InboundMessage::Request(JsonRpcRequest::new(method, params, id)))
    }

    #[tokio::test]
    async fn test_direct_tool_call_returns_value() {
        let (dispatcher, engine) = dispatcher(ok_engine);

        let resp = dispatcher
            .handle(request("read_integer", json!({"address": "0x400000", "type": "byte"}), 2))
            .await
            .unwrap();

        assert_eq!(resp.id, json!(2));
        assert_eq!(resp.result.unwrap(), json!({"success": true, "value": 77}));
        let calls = engine.calls.lock().unwrap();
        assert_eq!(calls[0].0, "read_integer");
        assert_eq!(calls[0].1, json!({"address": "0x400000", "type": "byte"}));
    }

    #[tokio::test]
    async fn test_unreachable_engine_is_error_response() {
        let (dispatcher, _) = dispatcher(down_engine);

        let resp = dispatcher.handle(request("ping", json!({}), 1)).await.unwrap();

        assert_eq!(resp.id, json!(1));
        let err = resp.error.unwrap();
        assert_eq!(err.code, -32001);
        assert!(err.message.contains("Pipe not found"));
    }

    #[tokio::test]
    async fn test_invalid_params_not_forwarded() {
        let (dispatcher, engine) = dispatcher(ok_engine);

        let resp = dispatcher
            .handle(request("read_memory", json!({"size": 4}), 5))
            .await
            .unwrap();

        assert_eq!(resp.error.unwrap().code, INVALID_PARAMS);
        assert!(engine.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_tool_method_mapping() {
        let (dispatcher, engine) = dispatcher(ok_engine);

        dispatcher
            .invoke("read_pointer", &json!({"address": "0x10", "offsets": [4]}))
            .await
            .unwrap();

        let calls = engine.calls.lock().unwrap();
        assert_eq!(calls[0].0, "read_pointer_chain");
        assert_eq!(calls[0].1, json!({"base": "0x10", "offsets": [4]}));
    }

    #[tokio::test]
    async fn test_unknown_method() {
        let (dispatcher, _) = dispatcher(ok_engine);

        let resp = dispatcher.handle(request("format_disk", json!({}), 9)).await.unwrap();
        assert_eq!(resp.error.unwrap().code, METHOD_NOT_FOUND);
    }

    #[tokio::test]
    async fn test_initialize_and_list() {
        let (dispatcher, engine) = dispatcher(ok_engine);

        let resp = dispatcher
            .handle(request("initialize", json!({"protocolVersion": "2024-11-05"}), 0))
            .await
            .unwrap();
        assert_eq!(resp.result.unwrap()["serverInfo"]["name"], "cheatengine");

        let resp = dispatcher.handle(request("tools/list", json!({}), 1)).await.unwrap();
        assert_eq!(resp.result.unwrap()["tools"].as_array().unwrap().len(), 43);
        assert!(engine.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_tools_call_wraps_content() {
        let (dispatcher, _) = dispatcher(ok_engine);

        let resp = dispatcher
            .handle(request(
                "tools/call",
                json!({"name": "get_process_info", "arguments": {}}),
                3,
            ))
            .await
            .unwrap();

        let result = resp.result.unwrap();
        assert_eq!(result["isError"], false);
        assert_eq!(result["content"][0]["text"], r#"{"success":true,"value":77}"#);
    }

    #[tokio::test]
    async fn test_tools_call_fault_is_error_content() {
        let (dispatcher, _) = dispatcher(down_engine);

        let resp = dispatcher
            .handle(request("tools/call", json!({"name": "ping"}), 4))
            .await
            .unwrap();

        assert!(!resp.is_error());
        let result = resp.result.unwrap();
        assert_eq!(result["isError"], true);
        assert!(result["content"][0]["text"]
            .as_str()
            .unwrap()
            .contains("Pipe not found"));
    }

    #[tokio::test]
    async fn test_tools_call_unknown_tool() {
        let (dispatcher, _) = dispatcher(ok_engine);

        let resp = dispatcher
            .handle(request("tools/call", json!({"name": "nope"}), 6))
            .await
            .unwrap();
        assert_eq!(resp.error.unwrap().code, INVALID_PARAMS);
    }

    #[tokio::test]
    async fn test_notifications_and_replies_get_no_response() {
        let (dispatcher, engine) = dispatcher(ok_engine);

        let notification: JsonRpcRequest =
            serde_json::from_value(json!({"jsonrpc": "2.0", "method": "notifications/initialized"}))
                .unwrap();
        assert!(dispatcher
            .handle(Ok(InboundMessage::Request(notification)))
            .await
            .is_none());

        let reply = json!({"jsonrpc": "2.0", "id": 1, "result": {}});
        assert!(dispatcher.handle(Ok(InboundMessage::Reply(reply))).await.is_none());
        assert!(engine.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_decode_errors_answered() {
        let (dispatcher, _) = dispatcher(ok_engine);

        let resp = dispatcher
            .handle(Err(DecodeError::Parse("bad".to_string())))
            .await
            .unwrap();
        assert_eq!(resp.id, Value::Null);
        assert_eq!(resp.error.unwrap().code, PARSE_ERROR);

        let resp = dispatcher
            .handle(Err(DecodeError::InvalidRequest {
                message: "no method".to_string(),
                id: Some(json!(12)),
            }))
            .await
            .unwrap();
        assert_eq!(resp.id, json!(12));
        assert_eq!(resp.error.unwrap().code, INVALID_REQUEST);
    }
}
