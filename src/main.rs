//! Dispatch emulator
//!
//! Local stand-in for a platform front end: routes requests by host and path
//! to named backend services and proxies them.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request    ┌────────┐   ┌────────────┐   ┌──────────────┐
//!     ─────────────────▶│  http  │──▶│  routing   │──▶│ http proxy   │──▶ Backend
//!                       │ server │   │ dispatcher │   │ + client     │
//!     Client Response   └────────┘   └────────────┘   └──────────────┘
//!     ◀──────────────────────── relayed, hop-by-hop stripped ◀──────────
//!
//!     Cross-cutting: config, observability (logging, metrics, error
//!     reporting), security (forwarding headers), lifecycle
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use dispatch_emulator::config::loader::read_config;
use dispatch_emulator::config::services::merge_service_specs;
use dispatch_emulator::config::validation::validate_config;
use dispatch_emulator::config::{ConfigError, ProxyConfig};
use dispatch_emulator::http::HttpServer;
use dispatch_emulator::lifecycle::{build_proxy_handler, wait_for_signal, Shutdown};
use dispatch_emulator::observability::{logging, metrics, TracingReporter};

#[derive(Parser)]
#[command(name = "dispatch-emulator")]
#[command(about = "Route requests by host and path to backend services", long_about = None)]
struct Cli {
    /// TOML settings file
    #[arg(long, value_name = "FILE")]
    settings: Option<PathBuf>,

    /// Dispatch file (dispatch.yaml or dispatch.xml)
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    dispatch_file: Option<PathBuf>,

    /// Service mapping, repeatable
    #[arg(short = 's', long = "service", value_name = "NAME:ORIGIN")]
    services: Vec<String>,

    /// Listen address
    #[arg(short = 'l', long = "listen", value_name = "ADDR")]
    listen: Option<String>,

    /// Log every forwarded request and backend response
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Fatal error");
            eprintln!("dispatch-emulator: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = settings(&cli)?;

    logging::init_logging(&config.observability);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "dispatch-emulator starting");

    let handler = build_proxy_handler(&config, Arc::new(TracingReporter))?;
    tracing::info!(
        services = handler.dispatcher().services().len(),
        rules = handler.dispatcher().rules().len(),
        "Dispatcher ready"
    );

    if config.observability.metrics_enabled {
        let addr: SocketAddr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr);
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        wait_for_signal().await;
        shutdown.trigger();
    });

    HttpServer::new(handler).run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

/// Settings file (or defaults) with command-line overrides applied, validated.
fn settings(cli: &Cli) -> Result<ProxyConfig, ConfigError> {
    let mut config = match &cli.settings {
        Some(path) => read_config(path)?,
        None => ProxyConfig::default(),
    };

    if let Some(path) = &cli.dispatch_file {
        config.dispatch_file = Some(path.clone());
        config.dispatch.clear();
    }
    merge_service_specs(&mut config, cli.services.as_slice())?;
    if let Some(listen) = &cli.listen {
        config.listener.bind_address = listen.clone();
    }
    if cli.verbose {
        config.observability.log_level = "debug".to_string();
    }

    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}
