//! cebridge-mcp - MCP stdio gateway for the Cheat Engine bridge.
//!
//! Reads newline-delimited JSON-RPC from stdin, forwards tool calls over the
//! engine's pipe and writes one response line per request to stdout. Logs
//! go to stderr only.

use anyhow::{Context, Result};
use cebridge_core::{ClientOptions, PipeConfig};
use cebridge_mcp::Session;
use clap::Parser;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "cebridge-mcp", version)]
#[command(about = "MCP server bridging stdio to the Cheat Engine pipe")]
struct Args {
    /// Pipe to connect to (defaults to the bridge plugin's pipe)
    #[arg(long, env = "CE_BRIDGE_PIPE")]
    pipe: Option<String>,

    /// Attempts per engine call, the first one included
    #[arg(long, env = "CE_BRIDGE_MAX_ATTEMPTS", default_value_t = PipeConfig::MAX_ATTEMPTS)]
    max_attempts: u32,

    /// Seconds to wait on each pipe read or write (0 = no limit)
    #[arg(long, env = "CE_BRIDGE_READ_TIMEOUT", default_value_t = PipeConfig::READ_TIMEOUT.as_secs())]
    read_timeout_secs: u64,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

impl Args {
    fn client_options(&self) -> ClientOptions {
        let mut options = ClientOptions::new()
            .with_max_attempts(self.max_attempts)
            .with_read_timeout(match self.read_timeout_secs {
                0 => None,
                secs => Some(Duration::from_secs(secs)),
            });
        if let Some(pipe) = &self.pipe {
            options = options.with_pipe_name(pipe.as_str());
        }
        options
    }
}

fn init_logging(debug: bool) -> Result<()> {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    // stdout carries the protocol
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(false)
        .compact()
        .try_init()
        .map_err(|e| anyhow::anyhow!(e))
        .context("failed to initialize logging")
}

fn run(args: Args) -> Result<()> {
    init_logging(args.debug)?;

    let options = args.client_options();
    info!("Starting cebridge-mcp v{}", env!("CARGO_PKG_VERSION"));

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;

    runtime.block_on(async {
        let session = Session::connect(options);
        session.run_stdio().await;
    });
    // Do not wait on the blocked stdin reader thread.
    runtime.shutdown_background();

    info!("Input closed, exiting");
    Ok(())
}

fn main() {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let code = if e.use_stderr() { 1 } else { 0 };
            let _ = e.print();
            std::process::exit(code);
        }
    };

    let code = match run(args) {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("cebridge-mcp: {:#}", e);
            1
        }
    };

    // A blocked stdin read would otherwise hold the runtime open.
    std::process::exit(code);
}
