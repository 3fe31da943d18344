//! Birdwatch API server entry point.
//!
//! Loads [`AppConfig`] from `birdwatch.toml` (or `BIRDWATCH_CONFIG`) and
//! `BIRDWATCH_*` environment variables, initializes logging, connects the
//! selected storage backend and serves HTTP until shutdown.

use std::sync::Arc;

use birdwatch_api::{
    AppConfig, AppState, OwnerRepository, BcryptPasswordEncoder, StorageBackend, start_server,
};
use birdwatch_db::RoutingPool;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Application entry point.
///
/// # Errors
///
/// Returns an error if configuration, storage setup or the server fails.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load()?;
    init_tracing(config.log.json);

    info!(
        host = %config.server.host,
        port = config.server.port,
        storage = ?config.storage,
        "birdwatch-api starting"
    );

    let repository = connect_storage(&config).await?;
    let state = Arc::new(AppState::new(
        repository.clone(),
        Arc::new(BcryptPasswordEncoder::new()),
    ));

    start_server(&config.server, state).await?;

    if let OwnerRepository::Postgres(pool) = repository {
        pool.close().await;
    }
    info!("birdwatch-api stopped");
    Ok(())
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn connect_storage(config: &AppConfig) -> anyhow::Result<OwnerRepository> {
    match config.storage {
        StorageBackend::Memory => {
            info!("Using in-memory storage, data is lost on shutdown");
            Ok(OwnerRepository::in_memory())
        }
        StorageBackend::Postgres => {
            let primary = config.database.primary()?;
            let replica = config.database.replica();
            let pool = RoutingPool::connect(&primary, replica.as_ref()).await?;
            if config.database.run_migrations {
                pool.run_migrations().await?;
                info!("Migrations applied");
            }
            Ok(OwnerRepository::Postgres(pool))
        }
    }
}
