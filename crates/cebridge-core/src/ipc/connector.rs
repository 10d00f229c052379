//! Pipe connectors.
//!
//! A connector knows how to open a fresh byte stream to the engine. The
//! client owns the resulting stream and asks for a new one after any fault.
//!
//! On Windows the engine listens on a named pipe. Elsewhere the same framing
//! is carried over a Unix domain socket, which is the closest local,
//! bidirectional, path-addressed equivalent.

use tokio::io::{AsyncRead, AsyncWrite};

/// Opens connections to the inspection engine.
#[async_trait::async_trait]
pub trait PipeConnector: Send + Sync + 'static {
    /// Stream type produced by this connector.
    type Stream: AsyncRead + AsyncWrite + Unpin + Send + 'static;

    /// Open a new connection.
    async fn connect(&self) -> std::io::Result<Self::Stream>;

    /// Address being connected to, for diagnostics.
    fn endpoint(&self) -> &str;
}

/// Connector for Windows named pipes (`\\.\pipe\...`).
#[cfg(windows)]
#[derive(Debug, Clone)]
pub struct NamedPipeConnector {
    name: String,
}

#[cfg(windows)]
impl NamedPipeConnector {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

#[cfg(windows)]
#[async_trait::async_trait]
impl PipeConnector for NamedPipeConnector {
    type Stream = tokio::net::windows::named_pipe::NamedPipeClient;

    async fn connect(&self) -> std::io::Result<Self::Stream> {
        // A busy pipe is reported like an absent one: the engine serves one
        // client at a time and another bridge already holds it.
        tokio::net::windows::named_pipe::ClientOptions::new().open(&self.name)
    }

    fn endpoint(&self) -> &str {
        &self.name
    }
}

/// Connector for Unix domain sockets.
#[cfg(unix)]
#[derive(Debug, Clone)]
pub struct UnixSocketConnector {
    path: String,
}

#[cfg(unix)]
impl UnixSocketConnector {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }
}

#[cfg(unix)]
#[async_trait::async_trait]
impl PipeConnector for UnixSocketConnector {
    type Stream = tokio::net::UnixStream;

    async fn connect(&self) -> std::io::Result<Self::Stream> {
        tokio::net::UnixStream::connect(&self.path).await
    }

    fn endpoint(&self) -> &str {
        &self.path
    }
}

/// Connector for the current platform.
#[cfg(windows)]
pub type PlatformConnector = NamedPipeConnector;

/// Connector for the current platform.
#[cfg(unix)]
pub type PlatformConnector = UnixSocketConnector;
