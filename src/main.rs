//! Employee Directory Search Service
//!
//! # Architecture Overview
//!
//! ```text
//!     POST /search (X-Org-Id)
//!     ──────────────────────▶ http ──▶ directory::orchestrator
//!                                          │
//!                                          ├─▶ security::rate_limit (per-org window)
//!                                          ├─▶ security::tenant (identifier check)
//!                                          ▼
//!                                     directory::engine ──▶ directory::query
//!                                          │
//!                                          ▼
//!                                     storage (pooled SQLite)
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use employee_directory::config::{loader, watcher::ConfigWatcher};
use employee_directory::http::HttpServer;
use employee_directory::lifecycle::{signals, startup, Shutdown};
use employee_directory::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "employee-directory")]
#[command(about = "Multi-tenant employee directory search service", long_about = None)]
struct Args {
    /// Path to a TOML configuration file; watched for changes.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => loader::load_config(path)?,
        None => loader::default_config()?,
    };

    logging::init_logging(&config.observability.log_level);
    tracing::info!("employee-directory v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        database = %config.database.path,
        requests_per_window = config.rate_limit.requests_per_window,
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

    let service = startup::build_service(&config)?;

    // Keep the watcher alive for the life of the server.
    let (_watcher, config_updates) = match &args.config {
        Some(path) => {
            let (watcher, updates) = ConfigWatcher::new(path);
            (Some(watcher.run()?), updates)
        }
        None => {
            let (_, updates) = mpsc::unbounded_channel();
            (None, updates)
        }
    };

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        signals::wait_for_termination().await;
        shutdown.trigger();
    });

    let server = HttpServer::new(config, service);
    server.run(listener, config_updates, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
