//! Proxy subscription merger.
//!
//! # Architecture Overview
//!
//! ```text
//!     GET /{prefix}/{client_id}
//!  ──────────────────────────────▶ http::server
//!                                      │
//!                                      ▼
//!                              sources::provider ───▶ local document / remote document
//!                                      │
//!                                      ▼
//!                              sources::classifier (endpoints | inline | dropped)
//!                                      │
//!                                      ▼
//!                              aggregator::merge ──┬─▶ fetcher ──▶ <endpoint 1><client_id>
//!                                      │           ├─▶ fetcher ──▶ <endpoint 2><client_id>
//!                                      │           └─▶ fetcher ──▶ ...
//!                                      ▼
//!                              codec (base64) + profile headers
//!  ◀──────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use subscription_merger::config::load_config;
use subscription_merger::observability::{logging, metrics};
use subscription_merger::{HttpServer, Shutdown};

#[derive(Parser)]
#[command(name = "subscription-merger")]
#[command(about = "Merges proxy subscriptions and serves them over HTTP", long_about = None)]
struct Args {
    /// Optional TOML configuration file; environment variables override it.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listener bind address.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = load_config(args.config.as_deref())?;
    if let Some(bind) = args.bind {
        config.listener.bind_address = bind;
    }

    logging::init_logging(&config.observability);
    tracing::info!("subscription-merger v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        bind_address = %config.listener.bind_address,
        source_mode = ?config.source_list.mode,
        subscription_timeout_ms = config.subscriptions.timeout_ms,
        source_list_timeout_ms = config.source_list.timeout_ms,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;

    let shutdown = Shutdown::new();
    shutdown.trigger_on_signal();

    let server = HttpServer::new(config)?;
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
