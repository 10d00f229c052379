//! Pipe RPC client for the inspection engine.
//!
//! Sends one framed JSON-RPC request and waits for one framed response. The
//! connection is opened on first use, dropped on any fault, and reopened by
//! the next attempt.
//!
//! # Thread Safety
//!
//! The client uses a tokio `Mutex` around the connection slot, so at most one
//! request is on the wire at a time. The engine processes one command at a
//! time anyway; there is no multiplexing on the pipe.

use super::connector::PipeConnector;
#[cfg(any(unix, windows))]
use super::connector::PlatformConnector;
use super::protocol::{check_frame_len, decode_body, decode_header, encode_frame, interpret_reply, PipeRequest};
use crate::config::{ClientOptions, PipeConfig};
use crate::{BridgeError, Result};
use serde_json::Value;
use std::future::Future;
use std::io::ErrorKind;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// Anything that can forward a method call to the engine.
///
/// Implemented by [`PipeClient`]; the dispatcher only depends on this trait.
#[async_trait::async_trait]
pub trait EngineClient: Send + Sync {
    /// Forward `method` with `params` and return the engine's answer.
    async fn call(&self, method: &str, params: Value) -> Result<Value>;
}

/// Client for the engine's length-prefixed JSON-RPC pipe.
pub struct PipeClient<C: PipeConnector> {
    connector: C,
    connection: Mutex<Option<C::Stream>>,
    last_id: AtomicU64,
    options: ClientOptions,
}

#[cfg(any(unix, windows))]
impl PipeClient<PlatformConnector> {
    /// Create a client for the platform's pipe flavour at `options.pipe_name`.
    pub fn new(options: ClientOptions) -> Self {
        let connector = PlatformConnector::new(options.pipe_name.clone());
        Self::with_connector(connector, options)
    }
}

impl<C: PipeConnector> PipeClient<C> {
    /// Create a client that opens connections through `connector`.
    pub fn with_connector(connector: C, options: ClientOptions) -> Self {
        Self {
            connector,
            connection: Mutex::new(None),
            last_id: AtomicU64::new(0),
            options,
        }
    }

    /// Options this client was built with.
    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    /// Whether a connection is currently held.
    pub async fn is_connected(&self) -> bool {
        self.connection.lock().await.is_some()
    }

    /// Call a JSON-RPC method on the engine.
    ///
    /// Transport faults are retried with a fresh connection until the attempt
    /// budget runs out. A pipe that cannot be opened fails immediately with
    /// `ServiceUnavailable`, and an oversized response fails immediately with
    /// `ResponseTooLarge`.
    pub async fn call(&self, method: &str, params: Value) -> Result<Value> {
        let mut slot = self.connection.lock().await;
        let mut last_error: Option<BridgeError> = None;

        for attempt in 1..=self.options.max_attempts {
            let mut stream = match slot.take() {
                Some(stream) => stream,
                None => self.connect().await?,
            };

            let request = PipeRequest::new(method, params.clone(), self.next_request_id());
            debug!("Pipe call {} (id {}, attempt {})", method, request.id, attempt);

            match self.exchange(&mut stream, &request).await {
                Ok(reply) => {
                    *slot = Some(stream);
                    return Ok(interpret_reply(reply));
                }
                Err(e @ BridgeError::ResponseTooLarge { .. }) => {
                    warn!("Pipe call {} rejected: {}", method, e);
                    return Err(e);
                }
                Err(e) => {
                    warn!(
                        "Pipe call {} failed on attempt {}/{}: {}",
                        method, attempt, self.options.max_attempts, e
                    );
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| BridgeError::connection("unknown communication error")))
    }

    async fn connect(&self) -> Result<C::Stream> {
        let stream = self
            .connector
            .connect()
            .await
            .map_err(|e| BridgeError::ServiceUnavailable {
                pipe: self.connector.endpoint().to_string(),
                source: Some(e),
            })?;

        debug!("Connected to engine pipe {}", self.connector.endpoint());
        Ok(stream)
    }

    /// One request/response exchange on an open connection.
    async fn exchange(&self, stream: &mut C::Stream, request: &PipeRequest) -> Result<Value> {
        let frame = encode_frame(request)?;
        let (header, body) = frame.split_at(PipeConfig::FRAME_HEADER_LEN);

        self.with_deadline(stream.write_all(header))
            .await
            .map_err(transport_error)?;
        self.with_deadline(stream.write_all(body))
            .await
            .map_err(transport_error)?;
        self.with_deadline(stream.flush())
            .await
            .map_err(transport_error)?;

        let mut header = [0u8; PipeConfig::FRAME_HEADER_LEN];
        self.with_deadline(stream.read_exact(&mut header))
            .await
            .map_err(|e| match e.kind() {
                ErrorKind::UnexpectedEof => BridgeError::connection("incomplete response header"),
                _ => transport_error(e),
            })?;

        let len = check_frame_len(decode_header(&header)?, self.options.max_response_size)?;

        let mut body = vec![0u8; len];
        self.with_deadline(stream.read_exact(&mut body))
            .await
            .map_err(|e| match e.kind() {
                ErrorKind::UnexpectedEof => BridgeError::connection("incomplete response body"),
                _ => transport_error(e),
            })?;

        decode_body(&body)
    }

    async fn with_deadline<T, F>(&self, fut: F) -> std::io::Result<T>
    where
        F: Future<Output = std::io::Result<T>>,
    {
        match self.options.read_timeout {
            Some(limit) => tokio::time::timeout(limit, fut)
                .await
                .unwrap_or_else(|_| Err(std::io::Error::new(ErrorKind::TimedOut, "timeout"))),
            None => fut.await,
        }
    }

    /// Timestamp-derived id, strictly increasing for this client.
    fn next_request_id(&self) -> u64 {
        let now = u64::try_from(chrono::Utc::now().timestamp_millis()).unwrap_or(0);
        match self
            .last_id
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                Some(now.max(last.saturating_add(1)))
            }) {
            Ok(prev) | Err(prev) => now.max(prev.saturating_add(1)),
        }
    }
}

#[async_trait::async_trait]
impl<C: PipeConnector> EngineClient for PipeClient<C> {
    async fn call(&self, method: &str, params: Value) -> Result<Value> {
        PipeClient::call(self, method, params).await
    }
}

fn transport_error(err: std::io::Error) -> BridgeError {
    match err.kind() {
        ErrorKind::TimedOut => BridgeError::connection("timeout"),
        _ => BridgeError::connection(format!("pipe communication failed: {}", err)),
    }
}
