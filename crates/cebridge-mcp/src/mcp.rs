//! MCP method payloads: `initialize`, `tools/list` and `tools/call`.

use crate::tools::ToolRegistry;
use crate::wrapper::format_result;
use cebridge_core::{BridgeError, Result, ServerConfig};
use serde::Deserialize;
use serde_json::{json, Value};

pub const METHOD_INITIALIZE: &str = "initialize";
pub const METHOD_TOOLS_LIST: &str = "tools/list";
pub const METHOD_TOOLS_CALL: &str = "tools/call";
pub const NOTIFICATION_PREFIX: &str = "notifications/";

/// Reply to `initialize`.
///
/// The client's requested protocol version is echoed back when present.
pub fn initialize_result(params: &Value) -> Value {
    let protocol_version = params
        .get("protocolVersion")
        .and_then(Value::as_str)
        .unwrap_or(ServerConfig::PROTOCOL_VERSION);

    json!({
        "protocolVersion": protocol_version,
        "capabilities": {
            "tools": {"listChanged": false}
        },
        "serverInfo": {
            "name": ServerConfig::SERVER_NAME,
            "version": env!("CARGO_PKG_VERSION"),
        },
    })
}

/// Reply to `tools/list`.
pub fn tools_list(registry: &ToolRegistry) -> Value {
    let tools: Vec<Value> = registry
        .iter()
        .map(|tool| {
            json!({
                "name": tool.name,
                "description": tool.description,
                "inputSchema": tool.input_schema(),
            })
        })
        .collect();

    json!({ "tools": tools })
}

/// Params of a `tools/call` request.
#[derive(Debug, Clone, Deserialize)]
pub struct ToolCall {
    pub name: String,
    #[serde(default)]
    pub arguments: Value,
}

impl ToolCall {
    pub fn parse(params: &Value) -> Result<Self> {
        serde_json::from_value(params.clone())
            .map_err(|e| BridgeError::invalid_params(format!("tools/call: {}", e)))
    }
}

/// Wrap a tool outcome as MCP content. Bridge faults become `isError: true`.
pub fn call_tool_result(outcome: Result<Value>) -> Value {
    match outcome {
        Ok(value) => text_content(format_result(&value), false),
        Err(e) => text_content(e.to_string(), true),
    }
}

fn text_content(text: String, is_error: bool) -> Value {
    json!({
        "content": [{"type": "text", "text": text}],
        "isError": is_error,
    })
}
