//! One gateway session: a dispatcher driven by a stream transport.

use crate::dispatcher::Dispatcher;
use crate::tools::ToolRegistry;
use crate::transport::StreamTransport;
use cebridge_core::{ClientOptions, EngineClient, PipeClient};
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncWrite};
use tracing::{debug, info};

pub struct Session {
    dispatcher: Dispatcher,
}

impl Session {
    pub fn new(client: Arc<dyn EngineClient>, registry: ToolRegistry) -> Self {
        Self {
            dispatcher: Dispatcher::new(client, registry),
        }
    }

    /// Session backed by a pipe client for this platform.
    ///
    /// Nothing is opened here; the first tool call connects.
    pub fn connect(options: ClientOptions) -> Self {
        info!("Engine pipe: {}", options.pipe_name);
        Self::new(Arc::new(PipeClient::new(options)), ToolRegistry::builtin())
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Serve requests until the input ends or the output can no longer be written.
    ///
    /// Requests are handled one at a time, in arrival order.
    pub async fn run<R, W>(&self, reader: R, writer: W)
    where
        R: AsyncRead + Unpin + Send + 'static,
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let mut transport = StreamTransport::spawn(reader, writer);
        let mut handled = 0u64;

        while let Some(inbound) = transport.recv().await {
            let Some(response) = self.dispatcher.handle(inbound).await else {
                continue;
            };
            if transport.send(response).await.is_err() {
                info!("Output closed, ending session");
                break;
            }
            handled += 1;
        }

        debug!("Session finished after {} responses", handled);
        transport.shutdown().await;
    }

    /// Serve over the process's stdin and stdout.
    pub async fn run_stdio(&self) {
        self.run(tokio::io::stdin(), tokio::io::stdout()).await;
    }
}
