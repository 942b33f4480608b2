//! API mediator
//!
//! # Architecture Overview
//!
//! ```text
//!                     ┌───────────────────────────────────────────────────┐
//!                     │                   API MEDIATOR                    │
//!                     │                                                   │
//!   Client Request    │  ┌─────────┐   ┌──────────┐   ┌────────────────┐  │
//!   ──────────────────┼─▶│  http   │──▶│ routing  │──▶│ proxy::engine  │  │
//!                     │  │ server  │   │ registry │   │                │  │
//!                     │  └─────────┘   └──────────┘   └───────┬────────┘  │
//!                     │                                       │           │
//!                     │                                       ▼           │
//!   Client Response   │  ┌──────────┐   ┌──────────┐   ┌────────────────┐ │
//!   ◀─────────────────┼──│ security │◀──│ rewrite  │◀──│   transport    │◀┼── Backend
//!                     │  │ cors/hdr │   │ api-docs │   │ (hyper client) │ │
//!                     │  └──────────┘   └──────────┘   └────────────────┘ │
//!                     │                                                   │
//!                     │   config · observability · resilience · lifecycle │
//!                     └───────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use api_mediator::config;
use api_mediator::lifecycle::{signals, Shutdown};
use api_mediator::observability::{logging, metrics};
use api_mediator::GatewayServer;

#[derive(Parser)]
#[command(name = "api-mediator")]
#[command(about = "Path-prefix API gateway with OpenAPI rewriting", long_about = None)]
struct Args {
    /// TOML configuration file. Defaults apply when omitted.
    #[arg(short, long, env = "MEDIATOR_CONFIG")]
    config: Option<PathBuf>,

    /// Validate the configuration and exit.
    #[arg(long)]
    check: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => config::load_config(path)?,
        None => config::default_config()?,
    };

    if args.check {
        println!("configuration OK ({} backends)", config.backends.len());
        return Ok(());
    }

    logging::init_logging(&config.observability);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "api-mediator starting");

    tracing::info!(
        bind_address = %config.listener.bind_address,
        prefix = %config.gateway.prefix,
        backends = config.backends.len(),
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => {
                if let Err(e) = metrics::init_metrics(addr) {
                    tracing::error!(error = %e, "Failed to start metrics exporter");
                }
            }
            Err(e) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                error = %e,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    signals::spawn_signal_handler(shutdown);

    GatewayServer::new(config).run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
