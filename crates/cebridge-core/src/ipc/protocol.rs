//! Pipe wire format and JSON-RPC envelope.
//!
//! Each message is a 4-byte little-endian length prefix followed by that many
//! bytes of UTF-8 JSON:
//!
//! ```text
//! [u32 LE: len][UTF-8 JSON bytes of len]
//! ```

use crate::config::PipeConfig;
use crate::{BridgeError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// JSON-RPC 2.0 request sent to the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipeRequest {
    pub jsonrpc: String,
    pub method: String,
    pub params: Value,
    pub id: u64,
}

impl PipeRequest {
    /// Create a new request. A non-object `params` is replaced by `{}`.
    pub fn new(method: impl Into<String>, params: Value, id: u64) -> Self {
        let params = if params.is_object() {
            params
        } else {
            Value::Object(Default::default())
        };
        Self {
            jsonrpc: PipeConfig::JSONRPC_VERSION.to_string(),
            method: method.into(),
            params,
            id,
        }
    }
}

/// Encode a message as one frame: length prefix, then compact JSON.
pub fn encode_frame<T: Serialize>(message: &T) -> Result<Vec<u8>> {
    let body = serde_json::to_vec(message)?;
    let len = u32::try_from(body.len()).map_err(|_| {
        BridgeError::connection(format!("request of {} bytes exceeds u32 framing", body.len()))
    })?;

    let mut frame = Vec::with_capacity(PipeConfig::FRAME_HEADER_LEN + body.len());
    frame.extend_from_slice(&len.to_le_bytes());
    frame.extend_from_slice(&body);
    Ok(frame)
}

/// Decode the declared body length from a frame header.
///
/// Fails with a connection error when fewer than four bytes are available,
/// which means the peer went away mid-frame.
pub fn decode_header(header: &[u8]) -> Result<u32> {
    let bytes: [u8; PipeConfig::FRAME_HEADER_LEN] = header
        .get(..PipeConfig::FRAME_HEADER_LEN)
        .and_then(|h| h.try_into().ok())
        .ok_or_else(|| BridgeError::connection("incomplete response header"))?;
    Ok(u32::from_le_bytes(bytes))
}

/// Reject a declared length above `limit` before anything is allocated.
pub fn check_frame_len(len: u32, limit: u32) -> Result<usize> {
    if len > limit {
        return Err(BridgeError::ResponseTooLarge { size: len, limit });
    }
    Ok(len as usize)
}

/// Decode one complete frame (header and body) into a JSON value.
pub fn decode_frame(frame: &[u8]) -> Result<Value> {
    let len = check_frame_len(decode_header(frame)?, PipeConfig::MAX_RESPONSE_SIZE)?;
    let body = frame
        .get(PipeConfig::FRAME_HEADER_LEN..)
        .ok_or_else(|| BridgeError::connection("incomplete response header"))?;
    if body.len() != len {
        return Err(BridgeError::connection(format!(
            "frame declares {} bytes but carries {}",
            len,
            body.len()
        )));
    }
    decode_body(body)
}

/// Parse a frame body as JSON.
pub fn decode_body(body: &[u8]) -> Result<Value> {
    serde_json::from_slice(body).map_err(BridgeError::malformed)
}

/// Normalize an engine reply into the value handed back to callers.
///
/// - `{error: ...}` becomes `{success: false, error: "<stringified>"}`.
///   Protocol errors from the far end are data, not bridge faults.
/// - `{result: ...}` is unwrapped.
/// - Anything else is returned untouched.
///
/// A `null` error next to a result is ignored.
pub fn interpret_reply(reply: Value) -> Value {
    match reply {
        Value::Object(mut obj) => {
            match obj.remove("error") {
                Some(Value::Null) | None => {}
                Some(err) => {
                    return serde_json::json!({
                        "success": false,
                        "error": stringify_error(&err),
                    });
                }
            }
            if let Some(result) = obj.remove("result") {
                return result;
            }
            Value::Object(obj)
        }
        other => other,
    }
}

/// Whether a value reports a domain-level failure (`success: false`).
pub fn is_domain_failure(value: &Value) -> bool {
    value.get("success").and_then(Value::as_bool) == Some(false)
}

fn stringify_error(err: &Value) -> String {
    match err {
        Value::String(s) => s.clone(),
        Value::Object(obj) => obj
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| err.to_string()),
        other => other.to_string(),
    }
}
