use brp_brandweer::config::Config;
use brp_brandweer::handlers::{self, AppState};
use brp_brandweer::lookup::BrpLookup;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Main entry point for the application.
///
/// Initializes logging, loads the configuration, sets up the TLS session
/// towards the population register and starts the Axum server.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "brp_brandweer=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;
    tracing::info!("Configuration loaded successfully");

    // One TLS session configuration, shared read-only by every request
    let lookup = BrpLookup::new(&config.brp).await?;
    tracing::info!("BRP client initialized: {}", config.brp.endpoint());

    let app_state = Arc::new(AppState { lookup });
    let app = handlers::router(app_state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
