use clap::Parser;
use error_common::{log_error, IntakeError, Result};
use logger_redacted::init_tracing;
use tracing::info;

use claims_server::{config::StorageBackend, create_app, ClaimsServer, ServerConfig};

/// Claim intake HTTP server
#[derive(Parser, Debug)]
#[command(name = "claims-server")]
#[command(about = "Batch dental claim intake HTTP API server")]
struct Args {
    /// Server bind address
    #[arg(long, env = "CLAIMS_HOST")]
    host: Option<String>,

    /// Server port
    #[arg(short, long, env = "CLAIMS_PORT")]
    port: Option<u16>,

    /// Configuration file path (YAML, TOML or JSON)
    #[arg(short, long, env = "CLAIMS_CONFIG")]
    config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Claim store backend: postgres or memory
    #[arg(long, env = "CLAIMS_STORAGE")]
    storage: Option<StorageBackend>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let mut config = ServerConfig::load(args.config.as_deref())?;
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(storage) = args.storage {
        config.storage = storage;
    }
    config.validate()?;

    init_tracing(&config.logging, args.verbose)?;

    info!("Starting {}", config.name);
    info!("Version: {}", env!("CARGO_PKG_VERSION"));
    info!(storage = %config.storage, "Bind address: {}", config.bind_address());

    let addr = config.bind_address();
    let server = ClaimsServer::new(config).await.inspect_err(|e| log_error("startup", e))?;

    let app = create_app(server);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| IntakeError::NetworkError(format!("Failed to bind to {addr}: {e}")))?;

    info!("Claim intake server running on http://{addr}");
    info!("Claim endpoint available at: http://{addr}/claim_process");
    info!("Health check available at: http://{addr}/health");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| IntakeError::ServerError(format!("HTTP server error: {e}")))?;

    info!("Claim intake server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received, draining connections");
}
