use anyhow::{Context, Result};
use econudge::api::{cors_layer, create_router, AppState};
use econudge::config::EcoNudgeConfig;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "econudge=info".into()),
        )
        .init();

    info!("Eco Nudge starting...");

    let config = EcoNudgeConfig::from_env_or_file().context("Failed to load configuration")?;

    info!(
        bind_addr = %config.server.bind_addr,
        body_size_limit_bytes = config.api.body_size_limit_bytes,
        cors_origins = config.api.cors_allow_origins.len(),
        "Configuration loaded"
    );

    let state = AppState::new(&config);
    let router = create_router(state).layer(cors_layer(&config.api.cors_allow_origins));

    let listener = tokio::net::TcpListener::bind(&config.server.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.server.bind_addr))?;
    info!(addr = %config.server.bind_addr, "HTTP API listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    info!("Eco Nudge stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        // Keep serving; without a signal handler only a kill stops the process
        tracing::error!(error = %e, "Failed to listen for ctrl_c signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
