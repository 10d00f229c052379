//! Newline-delimited JSON framing for the stdio side.
//!
//! Every outbound message is one compact JSON document followed by exactly
//! one `\n`. Nothing here goes through a text-mode layer: bytes are written
//! as produced, so no `\r` can ever reach the consumer. Compact JSON never
//! contains a raw newline (string contents are escaped), which keeps one
//! message per line.

use crate::jsonrpc::{JsonRpcRequest, INVALID_REQUEST, JSONRPC_VERSION, PARSE_ERROR};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// A successfully decoded inbound line.
#[derive(Debug, Clone, PartialEq)]
pub enum InboundMessage {
    /// A request or notification.
    Request(JsonRpcRequest),
    /// A response object sent by the client. The gateway never issues
    /// requests of its own, so these are only logged.
    Reply(Value),
}

/// A line that could not be turned into a message.
///
/// Decode failures are delivered on the inbound channel like messages so the
/// dispatcher can answer them; they never end the session.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DecodeError {
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid Request: {message}")]
    InvalidRequest { message: String, id: Option<Value> },
}

impl DecodeError {
    /// JSON-RPC error code for the response.
    pub fn code(&self) -> i32 {
        match self {
            DecodeError::Parse(_) => PARSE_ERROR,
            DecodeError::InvalidRequest { .. } => INVALID_REQUEST,
        }
    }

    /// Best-effort id to correlate the error response with.
    pub fn id(&self) -> Value {
        match self {
            DecodeError::Parse(_) => Value::Null,
            DecodeError::InvalidRequest { id, .. } => id.clone().unwrap_or(Value::Null),
        }
    }
}

/// Encode a message as one line: compact JSON plus `\n`.
pub fn encode_line<T: Serialize>(message: &T) -> serde_json::Result<Vec<u8>> {
    let mut line = serde_json::to_vec(message)?;
    line.push(b'\n');
    Ok(line)
}

/// Whether a raw line carries nothing but whitespace.
pub fn is_blank(line: &[u8]) -> bool {
    line.iter().all(u8::is_ascii_whitespace)
}

/// Decode one raw line (with or without its terminator).
pub fn decode_line(line: &[u8]) -> Result<InboundMessage, DecodeError> {
    let text = std::str::from_utf8(line)
        .map_err(|e| DecodeError::Parse(format!("invalid UTF-8: {}", e)))?;

    let value: Value =
        serde_json::from_str(text).map_err(|e| DecodeError::Parse(e.to_string()))?;

    let Value::Object(obj) = &value else {
        return Err(DecodeError::InvalidRequest {
            message: "expected a JSON object".to_string(),
            id: None,
        });
    };

    if !obj.contains_key("method") && (obj.contains_key("result") || obj.contains_key("error")) {
        return Ok(InboundMessage::Reply(value));
    }

    let id = obj.get("id").cloned();
    let request: JsonRpcRequest =
        serde_json::from_value(value).map_err(|e| DecodeError::InvalidRequest {
            message: e.to_string(),
            id: id.clone(),
        })?;

    if request.jsonrpc != JSONRPC_VERSION {
        return Err(DecodeError::InvalidRequest {
            message: format!("expected jsonrpc {}, got {}", JSONRPC_VERSION, request.jsonrpc),
            id,
        });
    }

    Ok(InboundMessage::Request(request))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jsonrpc::JsonRpcResponse;
    use serde_json::json;

    #[test]
    fn test_encode_ends_with_single_lf() {
        let line = encode_line(&JsonRpcResponse::success(json!(1), json!("a\r\nb"))).unwrap();

        assert_eq!(line.last(), Some(&b'\n'));
        assert_eq!(line.iter().filter(|b| **b == b'\n').count(), 1);
        assert!(!line.contains(&b'\r'));
    }

    #[test]
    fn test_request_line_roundtrip() {
        let request = JsonRpcRequest::new("read_memory", json!({"address": "0x10", "size": 4}), 9);
        let line = encode_line(&request).unwrap();

        assert_eq!(decode_line(&line).unwrap(), InboundMessage::Request(request));
    }

    #[test]
    fn test_trailing_crlf_tolerated() {
        let msg = decode_line(b"{\"method\":\"ping\",\"id\":1}\r\n").unwrap();
        assert!(matches!(msg, InboundMessage::Request(r) if r.method == "ping"));
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        let err = decode_line(b"{\"method\": \"ping\"").unwrap_err();
        assert_eq!(err.code(), PARSE_ERROR);
        assert_eq!(err.id(), Value::Null);
    }

    #[test]
    fn test_invalid_utf8_is_parse_error() {
        let err = decode_line(&[0xff, 0xfe, b'\n']).unwrap_err();
        assert!(matches!(err, DecodeError::Parse(_)));
    }

    #[test]
    fn test_invalid_request_keeps_id() {
        let err = decode_line(br#"{"params":{},"id":17}"#).unwrap_err();
        assert_eq!(err.code(), INVALID_REQUEST);
        assert_eq!(err.id(), json!(17));
    }

    #[test]
    fn test_wrong_version_rejected() {
        let err = decode_line(br#"{"jsonrpc":"1.0","method":"ping","id":"x"}"#).unwrap_err();
        assert_eq!(err.code(), INVALID_REQUEST);
        assert_eq!(err.id(), json!("x"));
    }

    #[test]
    fn test_non_object_rejected() {
        let err = decode_line(b"[1,2,3]").unwrap_err();
        assert_eq!(err.code(), INVALID_REQUEST);
    }

    #[test]
    fn test_client_reply_recognized() {
        let msg = decode_line(br#"{"jsonrpc":"2.0","id":4,"result":{}}"#).unwrap();
        assert!(matches!(msg, InboundMessage::Reply(_)));
    }

    #[test]
    fn test_blank_lines() {
        assert!(is_blank(b"\n"));
        assert!(is_blank(b"  \r\n"));
        assert!(!is_blank(b"{}\n"));
    }
}
