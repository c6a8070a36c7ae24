//! Startup Analysis Backend — Binary Entrypoint
//! Boots the Axum HTTP server, wiring config, connectors, routes, and metrics.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use startup_analyzer::analyze::Analyzer;
use startup_analyzer::api::{self, AppState};
use startup_analyzer::config::AppConfig;
use startup_analyzer::metrics::Metrics;
use startup_analyzer::news::NewsClient;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("startup_analyzer=info,warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env in local/dev; no-op when absent.
    let _ = dotenvy::dotenv();
    init_tracing();

    let cfg = AppConfig::from_env();
    let metrics = Metrics::init();

    // Connectors fail fast here when a required credential is missing.
    let analyzer = Analyzer::from_config(&cfg)?;
    let news = NewsClient::from_config(&cfg)?;

    let state = AppState::new(analyzer, news);
    let app = api::router(state).merge(metrics.router());

    let addr = cfg.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, offline = cfg.offline_mode, "startup-analyzer listening");
    axum::serve(listener, app).await?;

    Ok(())
}
