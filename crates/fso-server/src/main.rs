mod config;

use std::path::PathBuf;
use std::sync::Arc;

use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use fso_api::{AppState, AppStateInner};
use fso_db::Database;

use crate::config::{Config, IN_MEMORY};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fso=debug,fso_api=debug,fso_db=info,tower_http=debug".into()),
        )
        .init();

    let config = Config::from_env()?;

    // Init database
    let db = if config.db_path == IN_MEMORY {
        Database::open_in_memory()?
    } else {
        Database::open(&PathBuf::from(&config.db_path))?
    };

    let mut inner = AppStateInner::new(Arc::new(db), config.jwt_secret.clone());
    inner.token_ttl = chrono::Duration::seconds(config.token_ttl_secs);
    inner.passwords = config.password_policy();
    inner.usernames = config.username_policy();
    let state: AppState = Arc::new(inner);

    info!(
        "Password policy: {} (min length {}, symbols {}), username policy: {}",
        config.password_preset,
        state.passwords.min_length(),
        state.passwords.symbols(),
        config.username_preset
    );

    let app = fso_api::router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr = config.addr()?;
    info!("fso server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();
    #[cfg(unix)]
    {
        let sigterm = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate());
        match sigterm {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = ctrl_c => info!("Received Ctrl+C, shutting down..."),
                    _ = sigterm.recv() => info!("Received SIGTERM, shutting down..."),
                }
            }
            Err(e) => {
                tracing::warn!("SIGTERM handler unavailable ({}), waiting for Ctrl+C", e);
                ctrl_c.await.ok();
                info!("Received Ctrl+C, shutting down...");
            }
        }
    }
    #[cfg(not(unix))]
    {
        ctrl_c.await.ok();
        info!("Received Ctrl+C, shutting down...");
    }
}
