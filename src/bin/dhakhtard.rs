//! dhakhtard: the Dhakhtar daemon.
//!
//! Serves symptom diagnosis over an HTTP JSON API.

use std::net::SocketAddr;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use dhakhtar::server::config::{Config, Secrets};
use dhakhtar::server::{build_service, serve};
use dhakhtar::{BuildInfo, DhakhtarError};

/// Dhakhtar daemon: symptom to disease prediction service.
#[derive(Parser)]
#[command(name = "dhakhtard")]
#[command(version = dhakhtar::PKG_VERSION)]
#[command(about = "Dhakhtar diagnosis daemon")]
struct Args {
    /// Path to configuration file.
    #[arg(short, long, env = "DHAKHTAR_CONFIG")]
    config: Option<std::path::PathBuf>,

    /// Override the bind address from the config file.
    #[arg(long)]
    address: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let args = Args::parse();

    let config = Config::load(args.config.as_deref())?;
    let secrets = Secrets::load()?;

    let service = build_service(&config, &secrets).await?;

    let address = args.address.as_deref().unwrap_or(&config.server.address);
    let addr: SocketAddr = address
        .parse()
        .map_err(|e| DhakhtarError::Configuration(format!("Invalid address: {e}")))?;

    let build = BuildInfo::current();
    info!(version = %build.version_string(), %addr, "dhakhtard starting");

    let listener = TcpListener::bind(addr).await?;
    serve(listener, Arc::new(service), &config.server.cors_origins).await?;

    info!("dhakhtard stopped");
    Ok(())
}
