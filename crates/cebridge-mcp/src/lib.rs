//! MCP stdio gateway for the Cheat Engine bridge.
//!
//! A [`Session`] reads newline-delimited JSON-RPC from a byte stream,
//! answers the MCP methods itself and forwards every tool call to the
//! engine through a [`cebridge_core::EngineClient`].

pub mod codec;
pub mod dispatcher;
pub mod jsonrpc;
pub mod mcp;
pub mod session;
pub mod tools;
pub mod transport;
pub mod wrapper;

pub use dispatcher::Dispatcher;
pub use session::Session;
pub use tools::{ToolRegistry, ToolSpec};
pub use transport::StreamTransport;
