//! Error types for the bridge.
//!
//! The taxonomy separates "the engine is not there" from "the engine is there
//! but the conversation broke". Domain failures reported by the engine itself
//! are not errors at this level; they travel back to the caller as data.

use thiserror::Error;

/// Main error type for the bridge.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// The pipe could not be opened: the inspection engine is not running.
    #[error("Inspection engine is not running (Pipe not found: {pipe})")]
    ServiceUnavailable {
        pipe: String,
        #[source]
        source: Option<std::io::Error>,
    },

    /// Any framing or transport fault on an established connection.
    #[error("Connection error: {0}")]
    Connection(String),

    /// The engine announced a response larger than the frame ceiling.
    #[error("Connection error: response too large ({size} bytes, limit {limit})")]
    ResponseTooLarge { size: u32, limit: u32 },

    /// A frame arrived intact but its body was not valid JSON.
    #[error("Connection error: malformed payload: {message}")]
    MalformedPayload {
        message: String,
        #[source]
        source: Option<serde_json::Error>,
    },

    /// The caller supplied arguments that do not fit the tool's parameter table.
    #[error("Invalid params: {message}")]
    InvalidParams { message: String },

    #[error("IO error: {message}")]
    Io {
        message: String,
        #[source]
        source: Option<std::io::Error>,
    },

    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: Option<serde_json::Error>,
    },
}

/// Result type alias for bridge operations.
pub type Result<T> = std::result::Result<T, BridgeError>;

impl From<std::io::Error> for BridgeError {
    fn from(err: std::io::Error) -> Self {
        BridgeError::Io {
            message: err.to_string(),
            source: Some(err),
        }
    }
}

impl From<serde_json::Error> for BridgeError {
    fn from(err: serde_json::Error) -> Self {
        BridgeError::Json {
            message: err.to_string(),
            source: Some(err),
        }
    }
}

impl BridgeError {
    /// Create a connection error from any displayable cause.
    pub fn connection(message: impl Into<String>) -> Self {
        BridgeError::Connection(message.into())
    }

    /// Create a malformed-payload error from a JSON parse failure.
    pub fn malformed(err: serde_json::Error) -> Self {
        BridgeError::MalformedPayload {
            message: err.to_string(),
            source: Some(err),
        }
    }

    /// Create an invalid-params error.
    pub fn invalid_params(message: impl Into<String>) -> Self {
        BridgeError::InvalidParams {
            message: message.into(),
        }
    }

    /// Whether this error belongs to the connection-fault class.
    ///
    /// Oversized and undecodable responses are connection faults too: both
    /// leave the current connection unusable.
    pub fn is_connection_error(&self) -> bool {
        matches!(
            self,
            BridgeError::Connection(_)
                | BridgeError::ResponseTooLarge { .. }
                | BridgeError::MalformedPayload { .. }
        )
    }

    /// Convert to a JSON-RPC error code.
    ///
    /// Standard JSON-RPC error codes:
    /// - -32602: Invalid params
    /// - -32603: Internal error
    ///
    /// Custom error codes (application-defined, -32000 to -32099):
    /// - -32000: Pipe transport error
    /// - -32001: Inspection engine not running
    pub fn to_rpc_error_code(&self) -> i32 {
        match self {
            BridgeError::ServiceUnavailable { .. } => -32001,

            BridgeError::Connection(_)
            | BridgeError::ResponseTooLarge { .. }
            | BridgeError::MalformedPayload { .. }
            | BridgeError::Io { .. } => -32000,

            BridgeError::InvalidParams { .. } => -32602,

            BridgeError::Json { .. } => -32603,
        }
    }
}
