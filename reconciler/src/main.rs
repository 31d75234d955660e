//! Lumenda Reconciler
//!
//! Mirrors on-chain remittance transfers into a Postgres read cache.
//!
//! The contract is the source of truth; this daemon keeps an
//! eventually-consistent copy that serves reads (history, pending
//! claims, per-account totals) without hitting the chain. It polls
//! the registry, discovers transfers past the cache's high-water
//! mark, and refreshes pending rows until they settle.

mod config;
mod db;
mod registry;
mod sync;
mod types;

use std::sync::Arc;
use std::time::Duration;

use config::Config;
use registry::RegistryClient;
use sync::{Reconciler, RetryConfig};
use tracing::info;

fn main() -> eyre::Result<()> {
    // Install color-eyre for better error reporting
    color_eyre::install()?;

    // Run the async main
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(async_main())
}

async fn async_main() -> eyre::Result<()> {
    init_logging();

    info!("Starting Lumenda Reconciler");

    let config = Config::load()?;
    info!(
        lcd_url = %config.chain.lcd_url,
        contract = %config.chain.contract_address,
        "Configuration loaded"
    );

    // Connect to database
    let db = db::create_pool(&config.database.url).await?;
    info!("Database connected");

    // Run migrations
    db::run_migrations(&db).await?;
    info!("Database migrations complete");

    let source = Arc::new(RegistryClient::new(
        &config.chain.lcd_url,
        &config.chain.contract_address,
    )?);

    let retry = RetryConfig::new(
        config.sync.retry_attempts,
        Duration::from_millis(config.sync.retry_delay_ms),
    );
    let mut reconciler = Reconciler::new(
        db,
        source,
        Duration::from_millis(config.sync.poll_interval_ms),
        retry,
    );

    // Create shutdown channel
    let (shutdown_tx, shutdown_rx) = tokio::sync::mpsc::channel::<()>(1);

    // Handle signals
    tokio::spawn(async move {
        wait_for_shutdown_signal().await;
        let _ = shutdown_tx.send(()).await;
    });

    reconciler.run(shutdown_rx).await?;

    info!("Lumenda Reconciler stopped");
    Ok(())
}

/// Initialize tracing/logging with structured output
fn init_logging() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,lumenda_reconciler=debug"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_thread_ids(true))
        .with(filter)
        .init();
}

/// Wait for shutdown signals (SIGINT/SIGTERM)
async fn wait_for_shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating shutdown");
        }
    }
}
