//! Cheat Engine bridge core.
//!
//! Talks to the inspection engine's bridge plugin over a local pipe using
//! length-prefixed JSON-RPC. This crate knows nothing about the stdio side;
//! see `cebridge-mcp` for the gateway that exposes the engine as MCP tools.
//!
//! # Example
//!
//! ```rust,ignore
//! use cebridge_core::{ClientOptions, PipeClient};
//!
//! #[tokio::main]
//! async fn main() -> cebridge_core::Result<()> {
//!     let client = PipeClient::new(ClientOptions::default());
//!     let info = client.call("get_process_info", serde_json::json!({})).await?;
//!     println!("{}", info);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod ipc;

pub use config::{ClientOptions, PipeConfig, ServerConfig};
pub use error::{BridgeError, Result};
#[cfg(any(unix, windows))]
pub use ipc::PlatformConnector;
pub use ipc::{interpret_reply, is_domain_failure, EngineClient, PipeClient, PipeConnector, PipeRequest};
