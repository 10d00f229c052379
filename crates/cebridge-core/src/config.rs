//! Centralized configuration for the bridge.
//!
//! Constants live on unit structs grouped by concern. Runtime-tunable values
//! for the pipe client are carried by [`ClientOptions`].

use std::time::Duration;

/// Pipe transport configuration.
pub struct PipeConfig;

impl PipeConfig {
    /// Base name of the pipe the inspection engine's bridge plugin listens on.
    pub const PIPE_BASENAME: &'static str = "CE_MCP_Bridge_v99";

    /// Attempts per call, the first one included.
    pub const MAX_ATTEMPTS: u32 = 2;

    /// Hard ceiling for a single response frame (16 MiB).
    pub const MAX_RESPONSE_SIZE: u32 = 16 * 1024 * 1024;

    /// Size of the little-endian length prefix.
    pub const FRAME_HEADER_LEN: usize = 4;

    /// Default deadline for each read or write on the pipe.
    pub const READ_TIMEOUT: Duration = Duration::from_secs(60);

    /// JSON-RPC version sent to the engine.
    pub const JSONRPC_VERSION: &'static str = "2.0";

    /// Default pipe address for this platform.
    #[cfg(windows)]
    pub fn default_pipe_name() -> String {
        format!(r"\\.\pipe\{}", Self::PIPE_BASENAME)
    }

    /// Default pipe address for this platform.
    ///
    /// Outside Windows the engine side is expected to expose the same
    /// framing over a Unix domain socket in the temp directory.
    #[cfg(not(windows))]
    pub fn default_pipe_name() -> String {
        std::env::temp_dir()
            .join(format!("{}.sock", Self::PIPE_BASENAME))
            .to_string_lossy()
            .into_owned()
    }
}

/// Stdio-facing server configuration.
pub struct ServerConfig;

impl ServerConfig {
    /// Name reported to MCP clients.
    pub const SERVER_NAME: &'static str = "cheatengine";

    /// MCP protocol revision advertised when the client does not ask for one.
    pub const PROTOCOL_VERSION: &'static str = "2024-11-05";

    /// Capacity of the inbound/outbound hand-off channels.
    pub const CHANNEL_CAPACITY: usize = 1;
}

/// Runtime options for [`crate::PipeClient`].
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Pipe address (named pipe path on Windows, socket path elsewhere).
    pub pipe_name: String,
    /// Attempts per call, the first one included. Never below 1.
    pub max_attempts: u32,
    /// Per read/write deadline. `None` waits forever.
    pub read_timeout: Option<Duration>,
    /// Largest response body accepted.
    pub max_response_size: u32,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            pipe_name: PipeConfig::default_pipe_name(),
            max_attempts: PipeConfig::MAX_ATTEMPTS,
            read_timeout: Some(PipeConfig::READ_TIMEOUT),
            max_response_size: PipeConfig::MAX_RESPONSE_SIZE,
        }
    }
}

impl ClientOptions {
    /// Create options with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the pipe address.
    pub fn with_pipe_name(mut self, pipe_name: impl Into<String>) -> Self {
        self.pipe_name = pipe_name.into();
        self
    }

    /// Set the attempt budget. Zero is clamped to one.
    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    /// Set the per-operation deadline.
    pub fn with_read_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.read_timeout = timeout;
        self
    }

    /// Set the response ceiling.
    pub fn with_max_response_size(mut self, size: u32) -> Self {
        self.max_response_size = size;
        self
    }
}
