use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vidshelf_api::config::{ServerConfig, StoreBackend};
use vidshelf_api::router::build_app_router;
use vidshelf_api::state::AppState;
use vidshelf_core::store::{MemoryStore, RemoteStore};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "vidshelf_api=debug,vidshelf_core=debug,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(
        host = %config.host,
        port = %config.port,
        store = config.store.name(),
        pool_drop_target = config.pool_drop_target,
        serialize_transfers = config.serialize_transfers,
        "Loaded server configuration",
    );

    // --- Store ---
    let store = connect_store(&config.store).await;

    // --- App state ---
    let shutdown_timeout = Duration::from_secs(config.shutdown_timeout_secs);
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    let state = AppState::new(store, config);

    // An unreachable store at startup is not fatal: views start empty and
    // the next successful load fills them.
    match state.membership.load().await {
        Ok(snapshot) => tracing::info!(
            categories = snapshot.categories().len(),
            "Initial membership snapshot loaded"
        ),
        Err(e) => tracing::warn!(error = %e, "Initial membership load failed"),
    }

    let app = build_app_router(state);

    // --- Start server ---
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();
    let server = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.await;
            })
            .await
    });

    shutdown_signal().await;
    let _ = shutdown_tx.send(());

    // --- Drain ---
    match tokio::time::timeout(shutdown_timeout, server).await {
        Ok(Ok(Ok(()))) => tracing::info!("Graceful shutdown complete"),
        Ok(Ok(Err(e))) => tracing::error!(error = %e, "Server error"),
        Ok(Err(e)) => tracing::error!(error = %e, "Server task panicked"),
        Err(_) => tracing::warn!(
            timeout_secs = shutdown_timeout.as_secs(),
            "Shutdown drain timed out, exiting with requests in flight"
        ),
    }
}

/// Build the configured [`RemoteStore`].
///
/// Panics if the Postgres backend cannot connect or migrate, so
/// misconfiguration fails at startup.
async fn connect_store(backend: &StoreBackend) -> Arc<dyn RemoteStore> {
    match backend {
        StoreBackend::Memory => {
            tracing::info!("Using in-memory store; data is lost on exit");
            Arc::new(MemoryStore::new())
        }
        StoreBackend::Http { base_url } => {
            tracing::info!(%base_url, "Using document server store");
            Arc::new(vidshelf_store::HttpStore::new(base_url.clone()))
        }
        StoreBackend::Postgres { database_url } => {
            let pool = vidshelf_db::create_pool(database_url)
                .await
                .expect("Failed to connect to database");
            tracing::info!("Database connection pool created");

            vidshelf_db::health_check(&pool)
                .await
                .expect("Database health check failed");

            vidshelf_db::run_migrations(&pool)
                .await
                .expect("Failed to run database migrations");
            tracing::info!("Database migrations applied");

            Arc::new(vidshelf_db::PgStore::new(pool))
        }
    }
}

/// Wait for SIGINT or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
