//! HTTP image transform server.
//!
//! # Architecture Overview
//!
//! ```text
//!                   ┌────────────────────────────────────────────────┐
//!                   │               IMAGE TRANSFORMER                 │
//!                   │                                                 │
//!   Image upload    │  ┌─────────┐   ┌──────────┐   ┌─────────────┐  │
//!   ────────────────┼─▶│   net   │──▶│   http   │──▶│   routing   │  │
//!                   │  │listener │   │ dispatch │   │path grammar │  │
//!                   │  └─────────┘   └──────────┘   └──────┬──────┘  │
//!                   │                                      │         │
//!                   │                                      ▼         │
//!                   │                              ┌─────────────┐   │
//!                   │                              │  transform  │   │
//!                   │                              │ validate +  │   │
//!                   │                              │  pipeline   │   │
//!   PNG / 204 / 400 │  ┌──────────┐                └──────┬──────┘   │
//!   ◀───────────────┼──│ response │◀──────────────────────┘          │
//!                   │  └──────────┘                                  │
//!                   │                                                 │
//!                   │  Cross-cutting: config, observability           │
//!                   └────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use image_transformer::config::loader::load_config;
use image_transformer::{Server, ServerConfig};

#[derive(Debug, Parser)]
#[command(name = "image-transformer", about = "HTTP image transform server")]
struct Args {
    /// Path to a TOML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the bind address from the config.
    #[arg(long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "image_transformer=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => ServerConfig::default(),
    };
    if let Some(bind) = args.bind {
        config.listener.bind_address = bind;
    }

    tracing::info!(
        bind_address = %config.listener.bind_address,
        max_body_bytes = config.limits.max_body_bytes,
        max_dimension = config.limits.max_dimension,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            image_transformer::observability::metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    let bind_address = config.listener.bind_address.clone();
    let server = Server::new(config);
    let local_addr = server.start(&bind_address).await?;
    tracing::info!(address = %local_addr, "Listening for connections");

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutdown signal received");

    server.stop().await;
    server.dispose().await;

    tracing::info!("Shutdown complete");
    Ok(())
}
