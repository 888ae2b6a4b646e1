//! Integration tests for the PostgreSQL backends.
//!
//! # Requirements
//!
//! - Docker must be running (testcontainers launches a PostgreSQL container)
//! - Feature flag `postgres` must be enabled (it is by default)
//! - `DELIVERY_TEST_CONTAINERS=1` must be set; otherwise every test returns early
//!
//! # Running
//!
//! ```sh
//! DELIVERY_TEST_CONTAINERS=1 cargo test --test postgres_tests
//! ```
//!
//! # Test isolation
//!
//! All tests share a single PostgreSQL container (via `OnceLock`). Each test
//! holds a process-wide lock, creates a fresh `PgPool` and truncates the
//! tables before running.

#![cfg(feature = "postgres")]

use axum::http::StatusCode;
use axum_test::TestServer;
use chrono::{DateTime, Duration, TimeZone, Utc};
use delivery::config::DatabaseConfig;
use delivery::prelude::*;
use delivery::storage::postgres::{connect, ensure_schema};
use serde_json::json;
use sqlx::PgPool;
use std::sync::{Mutex, MutexGuard, OnceLock};
use testcontainers::runners::AsyncRunner;
use testcontainers_modules::postgres::Postgres;

// ---------------------------------------------------------------------------
// Shared test environment (single container, fresh pool per test)
// ---------------------------------------------------------------------------

const OPT_IN_ENV: &str = "DELIVERY_TEST_CONTAINERS";

/// Holds the testcontainer handle (keeps it alive) and the connection URL.
struct PgTestEnv {
    _container: testcontainers::ContainerAsync<Postgres>,
    connection_url: String,
}

/// Initialized once per test binary; must outlive individual tokio runtimes.
static TEST_ENV: OnceLock<PgTestEnv> = OnceLock::new();

/// Serializes tests sharing the database.
static DB_LOCK: Mutex<()> = Mutex::new(());

async fn init_pg_env() -> &'static PgTestEnv {
    if let Some(env) = TEST_ENV.get() {
        return env;
    }

    let container = Postgres::default()
        .start()
        .await
        .expect("Failed to start PostgreSQL container, is Docker running?");

    let host = container.get_host().await.unwrap();
    let port = container.get_host_port_ipv4(5432).await.unwrap();
    let url = format!("postgres://postgres:postgres@{}:{}/postgres", host, port);

    let _ = TEST_ENV.set(PgTestEnv {
        _container: container,
        connection_url: url,
    });
    TEST_ENV.get().unwrap()
}

/// A fresh pool on clean tables, or `None` when container tests are not enabled.
async fn pg_pool() -> Option<(MutexGuard<'static, ()>, PgPool)> {
    if std::env::var(OPT_IN_ENV).is_err() {
        eprintln!("skipping: set {} to run PostgreSQL tests", OPT_IN_ENV);
        return None;
    }

    let guard = DB_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    let env = init_pg_env().await;

    let config = DatabaseConfig {
        url: Some(env.connection_url.clone()),
        max_connections: 2,
    };
    let pool = connect(&config).await.expect("Failed to connect to PostgreSQL");
    ensure_schema(&pool).await.expect("Failed to create schema");

    sqlx::query("TRUNCATE TABLE orders, filtered_orders, log_entries RESTART IDENTITY")
        .execute(&pool)
        .await
        .expect("Failed to truncate tables");

    Some((guard, pool))
}

fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2099, 6, 1, 10, 0, 0).unwrap()
}

fn new_order(name: &str, district: &str, at: DateTime<Utc>) -> NewOrder {
    NewOrder {
        name: name.to_string(),
        weight: 12.5,
        district: district.to_string(),
        delivery_date_time: at,
    }
}

async fn mirror_contents(pool: &PgPool) -> Vec<(i32, DateTime<Utc>)> {
    sqlx::query_as::<_, (i32, DateTime<Utc>)>(
        "SELECT id, delivery_date_time FROM filtered_orders ORDER BY id",
    )
    .fetch_all(pool)
    .await
    .unwrap()
}

// ---------------------------------------------------------------------------
// Schema
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_ensure_schema_is_idempotent() {
    let Some((_guard, pool)) = pg_pool().await else {
        return;
    };

    ensure_schema(&pool).await.unwrap();
    ensure_schema(&pool).await.unwrap();
}

// ---------------------------------------------------------------------------
// PostgresOrderStore
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_store_crud_round_trip() {
    let Some((_guard, pool)) = pg_pool().await else {
        return;
    };
    let store = PostgresOrderStore::new(pool);

    let created = store
        .create(new_order("Test Name", "Test District", base_time()))
        .await
        .unwrap();
    assert_eq!(created.id, 1);

    let fetched = store.get(created.id).await.unwrap().unwrap();
    assert_eq!(fetched, created);

    let updated = store
        .update(created.id, new_order("Renamed", "North", base_time() + Duration::hours(1)))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.name, "Renamed");

    let deleted = store.delete(created.id).await.unwrap().unwrap();
    assert_eq!(deleted, updated);

    assert!(store.get(created.id).await.unwrap().is_none());
    assert!(store.delete(created.id).await.unwrap().is_none());
    assert!(
        store
            .update(created.id, new_order("Ghost", "North", base_time()))
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn test_store_list_window_and_district() {
    let Some((_guard, pool)) = pg_pool().await else {
        return;
    };
    let store = PostgresOrderStore::new(pool);
    let base = base_time();

    for (name, district, offset) in [
        ("First", "Center", 0),
        ("Second", "Center", 30),
        ("Third", "North", 10),
        ("Fourth", "Center", 31),
        ("Fifth", "Center", -1),
    ] {
        store
            .create(new_order(name, district, base + Duration::minutes(offset)))
            .await
            .unwrap();
    }

    let ids = |orders: Vec<Order>| orders.into_iter().map(|o| o.id).collect::<Vec<_>>();

    let all = store.list(&OrderFilter::default()).await.unwrap();
    assert_eq!(ids(all), vec![1, 2, 3, 4, 5]);

    let window = store
        .list(&OrderFilter::new(Some(base), None))
        .await
        .unwrap();
    assert_eq!(ids(window), vec![1, 2, 3]);

    let both = store
        .list(&OrderFilter::new(Some(base), Some("Center".to_string())))
        .await
        .unwrap();
    assert_eq!(ids(both), vec![1, 2]);

    let district_only = store
        .list(&OrderFilter::new(None, Some("North".to_string())))
        .await
        .unwrap();
    assert_eq!(ids(district_only), vec![3]);
}

// ---------------------------------------------------------------------------
// PostgresMirror
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_mirror_replaces_and_clamps() {
    let Some((_guard, pool)) = pg_pool().await else {
        return;
    };
    let mirror = PostgresMirror::new(pool.clone(), MirrorBounds::default());
    let ancient = Utc.with_ymd_and_hms(1500, 1, 1, 0, 0, 0).unwrap();

    mirror
        .replace(&[
            new_order("Old", "Center", ancient).with_id(7),
            new_order("New", "Center", base_time()).with_id(9),
        ])
        .await
        .unwrap();

    assert_eq!(
        mirror_contents(&pool).await,
        vec![(7, MirrorBounds::default().min_date), (9, base_time())]
    );

    mirror
        .replace(&[new_order("Only", "North", base_time()).with_id(3)])
        .await
        .unwrap();
    assert_eq!(mirror_contents(&pool).await, vec![(3, base_time())]);

    mirror.replace(&[]).await.unwrap();
    assert!(mirror_contents(&pool).await.is_empty());
}

#[tokio::test]
async fn test_mirror_failure_rolls_back() {
    let Some((_guard, pool)) = pg_pool().await else {
        return;
    };
    let mirror = PostgresMirror::new(pool.clone(), MirrorBounds::default());

    mirror
        .replace(&[new_order("Kept", "Center", base_time()).with_id(1)])
        .await
        .unwrap();

    // Duplicate primary key fails the second insert
    let duplicate = new_order("Dup", "Center", base_time()).with_id(2);
    let result = mirror.replace(&[duplicate.clone(), duplicate]).await;
    assert!(result.is_err());

    assert_eq!(mirror_contents(&pool).await, vec![(1, base_time())]);
}

// ---------------------------------------------------------------------------
// PostgresLogSink
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_log_sink_gates_and_inserts() {
    let Some((_guard, pool)) = pg_pool().await else {
        return;
    };
    let sink = std::sync::Arc::new(PostgresLogSink::new(pool.clone(), Severity::Information));
    let logger = Logger::new("delivery::orders", sink.clone());

    assert!(!sink.accepts(Severity::Debug));
    logger.log(Severity::Debug, "dropped", None).await;
    logger.info("Order 1 created").await;
    logger
        .error("Error fetching orders", &anyhow::anyhow!("timeout"))
        .await;

    let rows = sqlx::query_as::<_, (String, String, String, String)>(
        "SELECT level, message, source, exception FROM log_entries ORDER BY id",
    )
    .fetch_all(&pool)
    .await
    .unwrap();

    assert_eq!(
        rows,
        vec![
            (
                "Information".to_string(),
                "Order 1 created".to_string(),
                "delivery::orders".to_string(),
                String::new(),
            ),
            (
                "Error".to_string(),
                "Error fetching orders".to_string(),
                "delivery::orders".to_string(),
                "timeout".to_string(),
            ),
        ]
    );
}

// ---------------------------------------------------------------------------
// Full service over PostgreSQL
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_rest_over_postgres() {
    let Some((_guard, pool)) = pg_pool().await else {
        return;
    };

    let router = ServerBuilder::new()
        .with_order_store(PostgresOrderStore::new(pool.clone()))
        .with_mirror(PostgresMirror::new(pool.clone(), MirrorBounds::default()))
        .with_log_sink(PostgresLogSink::new(pool.clone(), Severity::Information))
        .build()
        .unwrap();
    let server = TestServer::try_new(router).unwrap();

    let created = server
        .post("/orders")
        .json(&json!({
            "name": "Test Name",
            "weight": 50,
            "district": "Test District",
            "deliveryDateTime": "2099-06-01T10:00:00Z",
        }))
        .await;
    created.assert_status(StatusCode::CREATED);

    let listed = server
        .get("/orders")
        .add_query_param("district", "Test District")
        .await;
    listed.assert_status_ok();
    assert_eq!(listed.json::<Vec<OrderDto>>().len(), 1);
    assert_eq!(mirror_contents(&pool).await, vec![(1, base_time())]);

    server
        .get("/orders")
        .add_query_param("district", "123")
        .await
        .assert_status_bad_request();

    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM log_entries")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert!(count >= 4);
}
