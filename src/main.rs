use anyhow::Result;
use flexible_fees::cart::AppState;
use flexible_fees::config::ServerConfig;
use flexible_fees::router::create_app_router;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = ServerConfig::load()?;

    init_tracing(&config)?;
    info!("Loaded configuration: {:?}", config);

    // Initialize application state
    let state = match &config.rules_file {
        Some(path) => AppState::from_rules_file(path).await?,
        None => AppState::new(),
    };

    // Build application router with all routes and middleware
    let app = create_app_router(Arc::new(state));

    // Start the server
    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Server running on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Initialize tracing subscriber
fn init_tracing(config: &ServerConfig) -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.default_filter().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {}", e))?;

    Ok(())
}
