//! exhibitd: Exhibit daemon.
//!
//! Serves every configured model over HTTP under `/api/<model_id>`, plus
//! the permalink service under `/permalink`.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::net::TcpListener;
use tracing::{info, warn};

use exhibit::config::Config;
use exhibit::engine::RemoteEngine;
use exhibit::permalink::{InMemoryPermalinkStore, PermalinkStore};
use exhibit::server::{self, logging};
use exhibit::{ExhibitError, ModelEndpoint};

/// Exhibit daemon: NLP model demo server.
#[derive(Parser)]
#[command(name = "exhibitd")]
#[command(version = exhibit::PKG_VERSION)]
#[command(about = "Exhibit model demo server")]
struct Args {
    /// Path to configuration file.
    #[arg(short, long)]
    config: Option<std::path::PathBuf>,

    /// Listen address, overriding the configuration file.
    #[arg(short, long, env = "EXHIBIT_ADDRESS")]
    address: Option<String>,

    /// Development mode: readable logs and detailed server errors.
    #[arg(long)]
    dev: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Load configuration
    let mut config = Config::load(args.config.as_deref())?;
    if let Some(address) = args.address {
        config.server.address = address;
    }
    config.server.development |= args.dev;

    logging::init_tracing(config.server.development);

    let endpoints = build_endpoints(&config)?;

    let permalinks: Option<Arc<dyn PermalinkStore>> = if config.permalinks.enabled {
        Some(Arc::new(InMemoryPermalinkStore::new()))
    } else {
        warn!("No database, permalinks are disabled.");
        None
    };

    // Parse address
    let addr: SocketAddr = config
        .server
        .address
        .parse()
        .map_err(|e| ExhibitError::Configuration(format!("Invalid address: {e}")))?;

    info!(
        version = exhibit::version_string(),
        %addr,
        models = endpoints.len(),
        development = config.server.development,
        "exhibitd starting"
    );

    let app = server::app(&endpoints, permalinks, config.server.development);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    info!("exhibitd stopped");
    Ok(())
}

/// Build one endpoint per configured model, each backed by the remote engine.
fn build_endpoints(config: &Config) -> exhibit::Result<Vec<Arc<ModelEndpoint>>> {
    let timeout = Duration::from_secs(config.engine.timeout_secs);

    config
        .resolve_models()?
        .into_iter()
        .map(|model| {
            let engine = RemoteEngine::with_timeout(&config.engine.base_url, &model.id, timeout)?;
            Ok(Arc::new(ModelEndpoint::new(model, Arc::new(engine))?))
        })
        .collect()
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "unable to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
