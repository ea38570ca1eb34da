//! Site edge (v1)
//!
//! Edge service for the marketing site, built with Tokio and Axum.
//!
//! # Architecture Overview
//!
//! ```text
//!                           ┌──────────────────────────────────────────────────┐
//!                           │                    SITE EDGE                      │
//!                           │                                                   │
//!     Client Request        │  ┌──────────┐    ┌──────────────┐                 │
//!     ──────────────────────┼─▶│  http    │───▶│ host routing │──┐              │
//!                           │  │ server   │    │  middleware  │  │              │
//!                           │  └──────────┘    └──────┬───────┘  │ redirect /   │
//!                           │                         │          │ block        │
//!                           │            rewrite /    ▼          │              │
//!                           │            pass    ┌──────────┐    │              │
//!                           │                    │ sitemap, │    │              │
//!                           │                    │ healthz  │    │              │
//!                           │                    └────┬─────┘    │              │
//!                           │                         │ else     │              │
//!                           │                         ▼          │              │
//!     Client Response       │                    ┌──────────┐    │              │   Page
//!     ◀─────────────────────┼────────────────────│ upstream │◀───┘──────────────┼── Renderer
//!                           │                    └──────────┘                   │
//!                           └──────────────────────────────────────────────────┘
//! ```

use clap::Parser;
use std::path::PathBuf;
use tokio::net::TcpListener;

use site_edge::config::{load_config, EdgeConfig};
use site_edge::http::HttpServer;
use site_edge::lifecycle::Shutdown;
use site_edge::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "site-edge")]
#[command(about = "Host-based routing edge for the marketing site", long_about = None)]
struct Args {
    /// Path to a TOML configuration file.
    #[arg(short, long, env = "SITE_EDGE_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => EdgeConfig::default(),
    };

    logging::init(&config.observability);

    tracing::info!("site-edge v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        config_path = ?args.config,
        bind_address = %config.listener.bind_address,
        upstream = %config.upstream.address,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    shutdown.trigger_on_signal();

    let server = HttpServer::new(config)?;
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
