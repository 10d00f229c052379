//! Stream transport: two independent loops over a byte stream pair.
//!
//! The reader loop turns lines into [`Inbound`] items on one channel; the
//! writer loop drains the other channel, writing and flushing one line per
//! message. Either loop ends on its own when its side closes, without
//! waiting for the other.

use crate::codec::{decode_line, encode_line, is_blank, DecodeError, InboundMessage};
use crate::jsonrpc::JsonRpcResponse;
use cebridge_core::ServerConfig;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

/// One item from the reader loop: a message or a line that failed to decode.
pub type Inbound = Result<InboundMessage, DecodeError>;

/// The outbound side has shut down.
#[derive(Debug, thiserror::Error)]
#[error("output stream closed")]
pub struct TransportClosed;

/// Handle to a running pair of stream loops.
pub struct StreamTransport {
    inbound: mpsc::Receiver<Inbound>,
    outbound: mpsc::Sender<JsonRpcResponse>,
    reader_task: JoinHandle<()>,
    writer_task: JoinHandle<()>,
}

impl StreamTransport {
    /// Start both loops on the current runtime.
    pub fn spawn<R, W>(reader: R, writer: W) -> Self
    where
        R: AsyncRead + Unpin + Send + 'static,
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let (inbound_tx, inbound) = mpsc::channel(ServerConfig::CHANNEL_CAPACITY);
        let (outbound, outbound_rx) = mpsc::channel(ServerConfig::CHANNEL_CAPACITY);

        let reader_task = tokio::spawn(read_loop(reader, inbound_tx));
        let writer_task = tokio::spawn(write_loop(writer, outbound_rx));

        Self {
            inbound,
            outbound,
            reader_task,
            writer_task,
        }
    }

    /// Next inbound item, or `None` once the input stream has ended.
    pub async fn recv(&mut self) -> Option<Inbound> {
        self.inbound.recv().await
    }

    /// Queue a response for the writer loop.
    pub async fn send(&self, response: JsonRpcResponse) -> Result<(), TransportClosed> {
        self.outbound.send(response).await.map_err(|_| TransportClosed)
    }

    /// Close both channels and wait for both loops to finish.
    ///
    /// Responses already queued are still written before the writer exits.
    pub async fn shutdown(self) {
        let Self {
            inbound,
            outbound,
            reader_task,
            writer_task,
        } = self;

        drop(inbound);
        drop(outbound);

        for (name, task) in [("reader", reader_task), ("writer", writer_task)] {
            if let Err(e) = task.await {
                error!("Stream {} loop panicked: {}", name, e);
            }
        }
    }
}

async fn read_loop<R>(reader: R, inbound: mpsc::Sender<Inbound>)
where
    R: AsyncRead + Unpin,
{
    let mut reader = BufReader::new(reader);
    let mut line = Vec::new();

    loop {
        line.clear();
        let read = tokio::select! {
            _ = inbound.closed() => {
                debug!("Inbound channel closed, stopping reader");
                return;
            }
            read = reader.read_until(b'\n', &mut line) => read,
        };

        match read {
            Ok(0) => {
                debug!("Input stream ended");
                return;
            }
            Ok(_) => {}
            Err(e) => {
                warn!("Input stream read failed: {}", e);
                return;
            }
        }

        if is_blank(&line) {
            continue;
        }

        let item = decode_line(&line);
        if let Err(e) = &item {
            warn!("Undecodable input line: {}", e);
        }

        if inbound.send(item).await.is_err() {
            debug!("Inbound channel closed, stopping reader");
            return;
        }
    }
}

async fn write_loop<W>(mut writer: W, mut outbound: mpsc::Receiver<JsonRpcResponse>)
where
    W: AsyncWrite + Unpin,
{
    while let Some(response) = outbound.recv().await {
        let line = match encode_line(&response) {
            Ok(line) => line,
            Err(e) => {
                error!("Failed to serialize response: {}", e);
                continue;
            }
        };

        let written = async {
            writer.write_all(&line).await?;
            writer.flush().await
        }
        .await;

        if let Err(e) = written {
            // The consumer went away; there is nobody left to answer.
            debug!("Output stream closed: {}", e);
            return;
        }
    }
    debug!("Outbound channel closed, stopping writer");
}
