//! # Delivery
//!
//! A delivery-order CRUD service built on axum and sqlx.
//!
//! ## Features
//!
//! - **Validated orders**: every stored order passes the field rules (letters-only
//!   name and district, weight in `[0, 100]`, delivery strictly in the future)
//! - **Filtered listing**: `fromDate` selects a configurable window (30 minutes by
//!   default), `district` an exact match
//! - **Filtered-orders mirror**: each list result replaces a mirror table, with
//!   delivery dates clamped into the table's representable range
//! - **Database logging**: business events go to the `log_entries` table through
//!   pluggable, severity-gated sinks
//! - **Backends**: PostgreSQL (feature `postgres`, on by default) or in-memory
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use delivery::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     ServerBuilder::new()
//!         .with_order_store(InMemoryOrderStore::new())
//!         .with_mirror(InMemoryMirror::default())
//!         .serve("127.0.0.1:3000")
//!         .await
//! }
//! ```

pub mod config;
pub mod core;
pub mod logging;
pub mod mirror;
pub mod orders;
pub mod server;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        error::{ApiError, ConfigError, FieldViolation, StorageError, ValidationError},
        order::{NewOrder, Order, OrderDraft, OrderFilter, OrderId},
        query::ListOrdersQuery,
        service::{FilteredOrdersMirror, OrderStore},
        validation::{OrderValidator, ValidatedOrder, validate_district_filter},
    };

    // === Configuration ===
    pub use crate::config::DeliveryConfig;

    // === Logging ===
    pub use crate::logging::{
        FanoutSink, InMemoryLogSink, LogEntry, LogSink, Logger, Severity, TracingSink,
    };

    // === Mirror ===
    pub use crate::mirror::{MirrorBounds, MirrorRow};

    // === Orders ===
    pub use crate::orders::{OrderDto, OrderState};

    // === Server ===
    pub use crate::server::{RestExposure, ServerBuilder, ServerHost};

    // === Storage ===
    pub use crate::storage::{InMemoryMirror, InMemoryOrderStore};

    #[cfg(feature = "postgres")]
    pub use crate::storage::{PostgresLogSink, PostgresMirror, PostgresOrderStore};

    // === External re-exports ===
    pub use anyhow::Result;
    pub use async_trait::async_trait;
    pub use chrono::{DateTime, Duration, Utc};
}
