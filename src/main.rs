//! # Atlas Gateway - Main Entry Point
//!
//! Unified entry point for the Atlas risk-intelligence platform. The
//! gateway fronts every backend service: it authenticates clients, rate
//! limits them, caches hot GET responses, and forwards everything else
//! upstream under per-service circuit breakers.
//!
//! Startup is environment-driven: service URLs, the JWT secret, allowed
//! CORS origins, and cache settings all come from environment variables
//! with development defaults.

use atlas_gateway::{GatewayConfig, GatewayResult, GatewayServer};
use tracing::{error, info};

#[tokio::main]
async fn main() -> GatewayResult<()> {
    let config = GatewayConfig::from_env()?;
    init_observability(&config);

    info!("🚀 Starting Atlas API Gateway");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));
    info!(
        environment = %config.environment,
        port = config.port,
        services = config.services.len(),
        "configuration loaded"
    );

    match GatewayServer::new(config).await {
        Ok(server) => {
            server.start().await?;
        }
        Err(e) => {
            error!("Failed to start gateway: {}", e);
            std::process::exit(1);
        }
    }

    info!("✅ Gateway shutdown complete");
    Ok(())
}

/// Initialize logging: compact output for development, JSON for production
fn init_observability(config: &GatewayConfig) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("atlas_gateway={},tower_http=info", config.log_level).into());

    if config.is_production() {
        tracing_subscriber::registry()
            .with(tracing_subscriber::fmt::layer().with_target(true).json())
            .with(filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(tracing_subscriber::fmt::layer().with_target(true))
            .with(filter)
            .init();
    }

    info!("📊 Observability initialized");
}
