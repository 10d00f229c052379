//! Pipe IPC with the inspection engine.
//!
//! Length-prefixed JSON-RPC 2.0 over a local named pipe (a Unix domain socket
//! outside Windows).
//!
//! # Architecture
//!
//! - **Protocol**: frame codec, request envelope, reply normalization
//! - **Connector**: opens a fresh stream to the engine
//! - **Client**: owns the connection, sends one request at a time, retries
//!   transport faults on a new connection

pub mod client;
pub mod connector;
pub mod protocol;

pub use client::{EngineClient, PipeClient};
#[cfg(any(unix, windows))]
pub use connector::PlatformConnector;
pub use connector::PipeConnector;
pub use protocol::{interpret_reply, is_domain_failure, PipeRequest};
