//! Delivery order service
//!
//! Configuration comes from `DELIVERY_CONFIG` (or `delivery.yaml`), with
//! `DELIVERY_DATABASE_URL` and `DELIVERY_BIND_ADDRESS` overrides. Without a
//! database URL the service runs on in-memory storage.

use anyhow::Result;
use delivery::config::DeliveryConfig;
use delivery::prelude::*;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    let config = DeliveryConfig::load()?;
    init_tracing(&config.logging.filter);

    let builder = ServerBuilder::new().with_config(&config)?;

    let builder = match config.database_url() {
        #[cfg(feature = "postgres")]
        Some(_) => with_postgres(builder, &config).await?,
        #[cfg(not(feature = "postgres"))]
        Some(_) => {
            tracing::warn!(
                "database.url is set but the postgres feature is disabled, using in-memory storage"
            );
            with_in_memory(builder, &config)?
        }
        None => {
            tracing::info!("No database configured, using in-memory storage");
            with_in_memory(builder, &config)?
        }
    };

    builder.serve(&config.server.bind_address).await
}

fn init_tracing(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn with_in_memory(builder: ServerBuilder, config: &DeliveryConfig) -> Result<ServerBuilder> {
    Ok(builder
        .with_order_store(InMemoryOrderStore::new())
        .with_mirror(InMemoryMirror::new(config.mirror_bounds()?)))
}

#[cfg(feature = "postgres")]
async fn with_postgres(builder: ServerBuilder, config: &DeliveryConfig) -> Result<ServerBuilder> {
    use delivery::storage::postgres::{connect, ensure_schema};

    let pool = connect(&config.database).await?;
    ensure_schema(&pool).await?;
    tracing::info!("Connected to PostgreSQL");

    Ok(builder
        .with_order_store(PostgresOrderStore::new(pool.clone()))
        .with_mirror(PostgresMirror::new(pool.clone(), config.mirror_bounds()?))
        .with_log_sink(PostgresLogSink::new(pool, config.database_min_level()?)))
}
