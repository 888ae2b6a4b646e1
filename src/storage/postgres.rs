//! PostgreSQL storage backend using sqlx.
//!
//! Provides [`PostgresOrderStore`], [`PostgresMirror`] and
//! [`PostgresLogSink`], all sharing one `sqlx::PgPool`.
//!
//! # Feature flag
//!
//! This module is gated behind the `postgres` feature flag (enabled by
//! default).
//!
//! # Schema
//!
//! - `orders`: one row per order, `SERIAL` id
//! - `filtered_orders`: same shape, replaced wholesale on every list query;
//!   ids are copied from `orders`, not generated
//! - `log_entries`: append-only business log

use crate::config::DatabaseConfig;
use crate::core::error::StorageError;
use crate::core::order::{NewOrder, Order, OrderFilter, OrderId};
use crate::core::service::{FilteredOrdersMirror, OrderStore};
use crate::logging::{LogEntry, LogSink, Severity};
use crate::mirror::{MirrorBounds, mirror_rows};
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

const BACKEND: &str = "postgres";

// ---------------------------------------------------------------------------
// Connection and schema management
// ---------------------------------------------------------------------------

/// Open a connection pool for `config.url`
pub async fn connect(config: &DatabaseConfig) -> Result<PgPool, StorageError> {
    let url = config
        .url
        .as_deref()
        .filter(|url| !url.trim().is_empty())
        .ok_or_else(|| StorageError::ConnectionError {
            backend: BACKEND.to_string(),
            message: "database.url is not set".to_string(),
        })?;

    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(url)
        .await
        .map_err(|e| StorageError::ConnectionError {
            backend: BACKEND.to_string(),
            message: e.to_string(),
        })
}

/// Apply the required tables (idempotent).
///
/// Safe to call on every startup.
pub async fn ensure_schema(pool: &PgPool) -> Result<(), StorageError> {
    let statements = [
        (
            "orders",
            "CREATE TABLE IF NOT EXISTS orders (
                id SERIAL PRIMARY KEY,
                name VARCHAR(100) NOT NULL,
                weight DOUBLE PRECISION NOT NULL,
                district VARCHAR(100) NOT NULL,
                delivery_date_time TIMESTAMPTZ NOT NULL
            )",
        ),
        (
            "orders index",
            "CREATE INDEX IF NOT EXISTS idx_orders_delivery
                ON orders (delivery_date_time, district)",
        ),
        (
            "filtered_orders",
            "CREATE TABLE IF NOT EXISTS filtered_orders (
                id INTEGER PRIMARY KEY,
                name VARCHAR(100) NOT NULL,
                weight DOUBLE PRECISION NOT NULL,
                district VARCHAR(100) NOT NULL,
                delivery_date_time TIMESTAMPTZ NOT NULL
            )",
        ),
        (
            "log_entries",
            "CREATE TABLE IF NOT EXISTS log_entries (
                id BIGSERIAL PRIMARY KEY,
                level VARCHAR(16) NOT NULL,
                message TEXT NOT NULL,
                source VARCHAR(255) NOT NULL,
                exception TEXT NOT NULL DEFAULT '',
                logged_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )",
        ),
    ];

    for (what, sql) in statements {
        sqlx::query(sql)
            .execute(pool)
            .await
            .map_err(|e| StorageError::SchemaError {
                backend: BACKEND.to_string(),
                message: format!("Failed to create {}: {}", what, e),
            })?;
    }

    Ok(())
}

/// Column tuple shared by `orders` queries
type OrderRow = (i32, String, f64, String, DateTime<Utc>);

const ORDER_COLUMNS: &str = "id, name, weight, district, delivery_date_time";

fn order_from_row((id, name, weight, district, delivery_date_time): OrderRow) -> Order {
    Order {
        id,
        name,
        weight,
        district,
        delivery_date_time,
    }
}

// ---------------------------------------------------------------------------
// PostgresOrderStore
// ---------------------------------------------------------------------------

/// Order store backed by the `orders` table
///
/// # Example
///
/// ```rust,ignore
/// let pool = delivery::storage::postgres::connect(&config.database).await?;
/// let store = PostgresOrderStore::new(pool);
/// let order = store.create(new_order).await?;
/// ```
#[derive(Clone, Debug)]
pub struct PostgresOrderStore {
    pool: PgPool,
}

impl PostgresOrderStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OrderStore for PostgresOrderStore {
    async fn list(&self, filter: &OrderFilter) -> Result<Vec<Order>> {
        let sql = format!(
            "SELECT {} FROM orders \
             WHERE ($1::timestamptz IS NULL OR delivery_date_time BETWEEN $1 AND $2::timestamptz) \
             AND ($3::text IS NULL OR district = $3) \
             ORDER BY id",
            ORDER_COLUMNS
        );

        let rows = sqlx::query_as::<_, OrderRow>(&sql)
            .bind(filter.from_date)
            .bind(filter.to_date())
            .bind(filter.district.as_deref())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| anyhow!("Failed to list orders: {}", e))?;

        Ok(rows.into_iter().map(order_from_row).collect())
    }

    async fn get(&self, id: OrderId) -> Result<Option<Order>> {
        let sql = format!("SELECT {} FROM orders WHERE id = $1", ORDER_COLUMNS);

        let row = sqlx::query_as::<_, OrderRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| anyhow!("Failed to get order: {}", e))?;

        Ok(row.map(order_from_row))
    }

    async fn create(&self, order: NewOrder) -> Result<Order> {
        let sql = format!(
            "INSERT INTO orders (name, weight, district, delivery_date_time) \
             VALUES ($1, $2, $3, $4) RETURNING {}",
            ORDER_COLUMNS
        );

        let row = sqlx::query_as::<_, OrderRow>(&sql)
            .bind(&order.name)
            .bind(order.weight)
            .bind(&order.district)
            .bind(order.delivery_date_time)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| anyhow!("Failed to create order: {}", e))?;

        Ok(order_from_row(row))
    }

    async fn update(&self, id: OrderId, order: NewOrder) -> Result<Option<Order>> {
        let sql = format!(
            "UPDATE orders \
             SET name = $1, weight = $2, district = $3, delivery_date_time = $4 \
             WHERE id = $5 RETURNING {}",
            ORDER_COLUMNS
        );

        let row = sqlx::query_as::<_, OrderRow>(&sql)
            .bind(&order.name)
            .bind(order.weight)
            .bind(&order.district)
            .bind(order.delivery_date_time)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| anyhow!("Failed to update order: {}", e))?;

        Ok(row.map(order_from_row))
    }

    async fn delete(&self, id: OrderId) -> Result<Option<Order>> {
        let sql = format!("DELETE FROM orders WHERE id = $1 RETURNING {}", ORDER_COLUMNS);

        let row = sqlx::query_as::<_, OrderRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| anyhow!("Failed to delete order: {}", e))?;

        Ok(row.map(order_from_row))
    }
}

// ---------------------------------------------------------------------------
// PostgresMirror
// ---------------------------------------------------------------------------

/// Filtered-orders mirror backed by the `filtered_orders` table
///
/// The truncate and the inserts run in one transaction; if any statement
/// fails the transaction is rolled back on drop and the previous contents
/// stay in place.
#[derive(Clone, Debug)]
pub struct PostgresMirror {
    pool: PgPool,
    bounds: MirrorBounds,
}

impl PostgresMirror {
    pub fn new(pool: PgPool, bounds: MirrorBounds) -> Self {
        Self { pool, bounds }
    }
}

#[async_trait]
impl FilteredOrdersMirror for PostgresMirror {
    async fn replace(&self, orders: &[Order]) -> Result<()> {
        let rows = mirror_rows(orders, &self.bounds);

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| anyhow!("Failed to begin mirror transaction: {}", e))?;

        sqlx::query("TRUNCATE TABLE filtered_orders")
            .execute(&mut *tx)
            .await
            .map_err(|e| anyhow!("Failed to truncate filtered_orders: {}", e))?;

        for row in &rows {
            sqlx::query(
                "INSERT INTO filtered_orders (id, name, weight, district, delivery_date_time) \
                 VALUES ($1, $2, $3, $4, $5)",
            )
            .bind(row.id)
            .bind(&row.name)
            .bind(row.weight)
            .bind(&row.district)
            .bind(row.delivery_date_time)
            .execute(&mut *tx)
            .await
            .map_err(|e| anyhow!("Failed to insert mirror row {}: {}", row.id, e))?;
        }

        tx.commit()
            .await
            .map_err(|e| anyhow!("Failed to commit mirror transaction: {}", e))?;

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// PostgresLogSink
// ---------------------------------------------------------------------------

/// Log sink inserting one `log_entries` row per accepted entry
#[derive(Clone, Debug)]
pub struct PostgresLogSink {
    pool: PgPool,
    min_level: Severity,
}

impl PostgresLogSink {
    pub fn new(pool: PgPool, min_level: Severity) -> Self {
        Self { pool, min_level }
    }
}

#[async_trait]
impl LogSink for PostgresLogSink {
    fn accepts(&self, level: Severity) -> bool {
        level >= self.min_level
    }

    async fn write(&self, entry: &LogEntry) -> Result<()> {
        sqlx::query(
            "INSERT INTO log_entries (level, message, source, exception, logged_at) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(entry.level.as_str())
        .bind(&entry.message)
        .bind(&entry.source)
        .bind(&entry.exception)
        .bind(entry.logged_at)
        .execute(&self.pool)
        .await
        .map_err(|e| anyhow!("Failed to insert log entry: {}", e))?;

        Ok(())
    }
}
