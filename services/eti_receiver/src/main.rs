//! ZeroMQ ETI receiver binary
//!
//! Usage:
//!   zmq-eti-receiver localhost 9100 > out.eti
//!   zmq-eti-receiver -t mux.example.net 9100 -o out.eti
//!   zmq-eti-receiver --config receiver.toml --strict

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use eti_config::{Overrides, ReceiverConfig};
use eti_network::{FrameSink, WriterSink, ZmqSubscriber, ZmqSubscriberConfig};
use eti_receiver::EtiReceiver;

#[derive(Parser, Debug)]
#[command(name = "zmq-eti-receiver")]
#[command(about = "Connects to a DAB multiplexer's ETI output at tcp://host:port using a \
ZeroMQ SUB socket and outputs raw ETI")]
#[command(version)]
struct Args {
    /// Publisher host
    host: Option<String>,

    /// Publisher port
    port: Option<u16>,

    /// Enable TIST decoding and time delta calculation
    #[arg(short, long)]
    timestamps: bool,

    /// Path to a TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write ETI to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Stop on the first malformed message
    #[arg(long)]
    strict: bool,

    /// Log level (trace, debug, info, warn, error); RUST_LOG takes precedence
    #[arg(short, long)]
    log_level: Option<String>,
}

impl Args {
    fn overrides(&self) -> Overrides {
        Overrides {
            host: self.host.clone(),
            port: self.port,
            timestamps: self.timestamps,
            output: self.output.clone(),
            strict: self.strict,
            log_level: self.log_level.clone(),
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = ReceiverConfig::load(args.config.as_deref())?;
    config.apply(&args.overrides());

    // Initialize logging
    init_logging(&config.logging.level)?;

    config.validate().map_err(|e| {
        error!("Invalid configuration: {}", e);
        e
    })?;

    info!("ZMQ ETI receiver version {}", env!("CARGO_PKG_VERSION"));
    info!(
        "Connecting to {}, show tist={}",
        config.endpoint(),
        config.diagnostics.timestamps
    );

    let source = ZmqSubscriber::connect(ZmqSubscriberConfig {
        endpoint: config.endpoint(),
        max_message_size: config.source.max_message_size,
    })
    .await
    .context("Failed to connect to publisher")?;

    match &config.output.path {
        Some(path) => {
            info!("Writing ETI to {}", path.display());
            let sink = WriterSink::create(path)
                .await
                .context("Failed to open output file")?;
            receive(source, sink, &config).await
        }
        None => receive(source, WriterSink::stdout(), &config).await,
    }
}

async fn receive<K: FrameSink>(source: ZmqSubscriber, sink: K, config: &ReceiverConfig) -> Result<()> {
    let mut receiver = EtiReceiver::from_config(source, sink, config);
    let summary = receiver
        .run_until(shutdown_signal())
        .await
        .context("Receiver stopped")?;

    info!(stop_reason = ?summary.stop_reason, "{}", summary);
    Ok(())
}

/// Logs go to stderr; stdout carries the ETI stream
fn init_logging(level: &str) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(level)
            .with_context(|| format!("Invalid log level '{}'", level))?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to install Ctrl-C handler: {}", e);
        std::future::pending::<()>().await;
    }
}
