//! UserEvents REST API
//!
//! Main application entry point

use anyhow::Context;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use UserEvents::{
    config::Settings,
    database::{create_pool, run_migrations, DatabaseConfig},
    hubs::{ConsoleHub, ConsoleLayer},
    utils::logging,
    AppState, ServiceFactory,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    // Load configuration
    let settings = Settings::new().context("Failed to load configuration")?;
    settings.validate()?;

    // Initialize logging; the guard flushes the log file on exit
    let console = ConsoleHub::new(settings.console.buffer_size);
    let console_layer = settings.console.enabled.then(|| {
        ConsoleLayer::new(console.clone())
            .with_min_level(logging::parse_level(&settings.console.level))
    });
    let _log_guard = logging::init_logging(&settings.logging, console_layer)?;

    info!("Starting {}...", UserEvents::info());

    // Initialize database connection
    info!("Connecting to database...");
    let pool = create_pool(&DatabaseConfig::from(&settings.database)).await?;
    run_migrations(&pool).await?;

    // Initialize services
    info!("Initializing services...");
    let services = ServiceFactory::new(pool.clone(), &settings)?;
    if settings.email.is_none() {
        warn!("Email settings missing, /Email will reject requests");
    }

    let bind_address = settings.server.bind_address.clone();
    let shutdown = CancellationToken::new();
    let app = UserEvents::router(AppState::new(services, console, settings), shutdown.clone());

    let listener = TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", bind_address))?;
    info!("Listening on {}", bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown))
        .await?;

    pool.close().await;
    info!("UserEvents has been shut down.");

    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM and closes console streams, so graceful
/// shutdown only waits for ordinary requests.
async fn shutdown_signal(shutdown: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
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
                warn!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
    shutdown.cancel();
}
