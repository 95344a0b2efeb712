mod api;
mod middleware;

use std::time::Duration;

use rxlocate_providers::NominatimConfig;
use tracing_subscriber::EnvFilter;

use crate::api::{build_app, rate_limit_state, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = rxlocate_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let pool_config = rxlocate_db::PoolConfig::from_app_config(&config);
    let pool = rxlocate_db::connect_pool(&config.database_url, pool_config).await?;
    let applied = rxlocate_db::run_migrations(&pool).await?;
    tracing::info!(applied, env = ?config.env, "database ready");

    let state = AppState::new(
        pool,
        &NominatimConfig::from_app_config(&config),
        Duration::from_secs(config.search_cache_ttl_secs),
    )?;
    let app = build_app(state, rate_limit_state(config.rate_limit_per_minute));

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, "rxlocate-server listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
