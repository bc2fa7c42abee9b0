use anyhow::Context;
use carepoint::logging::init_tracing;
use carepoint::metrics::{init_metrics, metrics_app};
use carepoint::router::init_router;
use carepoint::state::init_app_state;
use carepoint_config::ServerConfig;
use dotenvy::dotenv;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let _log_guards = init_tracing().context("Failed to initialize logging")?;

    let state = init_app_state().await?;
    let mut app = init_router(state);

    match init_metrics() {
        Ok(handle) => app = app.merge(metrics_app(handle)),
        Err(e) => warn!(error = %e, "Prometheus recorder not installed, /metrics disabled"),
    }

    let config = ServerConfig::from_env();
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port))
        .await
        .with_context(|| format!("Failed to bind port {}", config.port))?;

    info!(port = config.port, "Server running on http://localhost:{}", config.port);
    info!("Scalar UI available at http://localhost:{}/scalar", config.port);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
