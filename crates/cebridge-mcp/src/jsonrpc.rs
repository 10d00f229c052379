//! JSON-RPC 2.0 message types for the stdio side.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// JSON-RPC version string.
pub const JSONRPC_VERSION: &str = "2.0";

// Standard JSON-RPC error codes.
pub const PARSE_ERROR: i32 = -32700;
pub const INVALID_REQUEST: i32 = -32600;
pub const METHOD_NOT_FOUND: i32 = -32601;
pub const INVALID_PARAMS: i32 = -32602;
pub const INTERNAL_ERROR: i32 = -32603;

fn default_version() -> String {
    JSONRPC_VERSION.to_string()
}

/// Keeps an explicit `null` as `Some(Value::Null)` instead of `None`.
fn present<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Value>, D::Error> {
    Value::deserialize(deserializer).map(Some)
}

/// JSON-RPC 2.0 request (or notification, when `id` is absent).
///
/// The `jsonrpc` field is optional on input; callers that leave it out are
/// treated as speaking 2.0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    #[serde(default = "default_version")]
    pub jsonrpc: String,
    pub method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
}

impl JsonRpcRequest {
    pub fn new(method: impl Into<String>, params: Value, id: impl Into<Value>) -> Self {
        Self {
            jsonrpc: default_version(),
            method: method.into(),
            params: Some(params),
            id: Some(id.into()),
        }
    }

    /// Whether this message expects no response.
    pub fn is_notification(&self) -> bool {
        self.id.is_none()
    }
}

/// JSON-RPC 2.0 response. Exactly one of `result`/`error` is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    #[serde(default = "default_version")]
    pub jsonrpc: String,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
    #[serde(default)]
    pub id: Value,
}

/// JSON-RPC 2.0 error object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl JsonRpcResponse {
    pub fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: default_version(),
            result: Some(result),
            error: None,
            id,
        }
    }

    pub fn error(id: Value, code: i32, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: default_version(),
            result: None,
            error: Some(JsonRpcError {
                code,
                message: message.into(),
                data: None,
            }),
            id,
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_without_version_defaults_to_2_0() {
        let req: JsonRpcRequest =
            serde_json::from_str(r#"{"method":"ping","params":{},"id":1}"#).unwrap();
        assert_eq!(req.jsonrpc, "2.0");
        assert_eq!(req.id, Some(json!(1)));
        assert!(!req.is_notification());
    }

    #[test]
    fn test_notification_has_no_id() {
        let req: JsonRpcRequest =
            serde_json::from_str(r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#)
                .unwrap();
        assert!(req.is_notification());
        assert!(req.params.is_none());
    }

    #[test]
    fn test_success_omits_error() {
        let resp = JsonRpcResponse::success(json!(2), json!({"success": true}));
        let json = serde_json::to_string(&resp).unwrap();

        assert!(json.contains("\"result\""));
        assert!(!json.contains("\"error\""));
    }

    #[test]
    fn test_error_omits_result_and_data() {
        let resp = JsonRpcResponse::error(json!("abc"), INTERNAL_ERROR, "boom");
        let json = serde_json::to_string(&resp).unwrap();

        assert!(!json.contains("\"result\""));
        assert!(!json.contains("\"data\""));
        assert!(json.contains("-32603"));
        assert!(resp.is_error());
    }

    #[test]
    fn test_null_result_survives_roundtrip() {
        let resp = JsonRpcResponse::success(json!(1), Value::Null);
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("\"result\":null"));

        let parsed: JsonRpcResponse = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, resp);
    }

    #[test]
    fn test_unknown_id_serializes_as_null() {
        let resp = JsonRpcResponse::error(Value::Null, PARSE_ERROR, "Parse error");
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("\"id\":null"));
    }
}
