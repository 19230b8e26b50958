mod api;
mod middleware;

use std::sync::Arc;
use std::time::Duration;

use micromob_operators::gbfs::BoltGbfs;
use micromob_operators::{build_http_client, Aggregator, FetchCache, SourceRegistry};
use tracing_subscriber::EnvFilter;

use crate::api::{build_app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = micromob_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let client = build_http_client(config.http_timeout_secs, &config.user_agent)?;
    let registry = SourceRegistry::from_config(&client, &config.operators);
    let gbfs = registry.bolt().map(BoltGbfs::new);
    let cache = FetchCache::new(Duration::from_millis(config.cache_ttl_ms));
    let aggregator = Aggregator::new(registry, cache, config.toggles.clone());

    tracing::info!(
        env = %config.env,
        operators = ?aggregator.sources().configured(),
        "starting micromob-server"
    );

    let app = build_app(AppState {
        aggregator: Arc::new(aggregator),
        gbfs,
    });

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, "listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
