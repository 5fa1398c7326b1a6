use anyhow::Context;
use tokio::{net::TcpListener, signal};
use tracing::info;
use tracing_subscriber::EnvFilter;

use cabin_booking::backend::ApiClient;
use cabin_booking::cache::start_cache_warmer;
use cabin_booking::config::Config;
use cabin_booking::{app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("cabin_booking=debug,tower_http=info")),
        )
        .init();

    let config = Config::from_env()?;
    info!(
        "Backend: {} (availability: {}, duplicate window: {:?})",
        config.backend_url, config.availability_mode, config.duplicate_window
    );

    let backend = ApiClient::new(&config.backend_url, config.backend_timeout)
        .context("building backend client")?;
    let bind_addr = config.bind_addr;
    let cache_refresh = config.cache_refresh;

    let state = AppState::new(backend.clone(), config);
    tokio::spawn(start_cache_warmer(state.cache.clone(), backend, cache_refresh));

    let listener = TcpListener::bind(bind_addr)
        .await
        .with_context(|| format!("binding {bind_addr}"))?;
    info!("Listening on {}", bind_addr);

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut term) => {
                term.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
