//! Service traits for order persistence and the filtered-orders mirror

use crate::core::order::{NewOrder, Order, OrderFilter, OrderId};
use anyhow::Result;
use async_trait::async_trait;

/// Persistence operations over the single orders table
///
/// Implementations assume their input already passed validation. A missing
/// id is reported as `Ok(None)`, never as an error.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// List orders matching `filter`, ordered by id
    async fn list(&self, filter: &OrderFilter) -> Result<Vec<Order>>;

    /// Get an order by id
    async fn get(&self, id: OrderId) -> Result<Option<Order>>;

    /// Persist a new order under a freshly assigned id
    async fn create(&self, order: NewOrder) -> Result<Order>;

    /// Replace all business fields of an existing order, keeping its id
    async fn update(&self, id: OrderId, order: NewOrder) -> Result<Option<Order>>;

    /// Remove an order, returning it as it was just before removal
    async fn delete(&self, id: OrderId) -> Result<Option<Order>>;
}

/// Side-effect writer that mirrors the latest list result into a second table
///
/// `replace` wipes the whole mirror and inserts one row per order, reusing
/// the order id as the row key. Dates are clamped on a copy; the caller's
/// orders are left untouched. Implementations make the wipe and the inserts
/// a single atomic step.
#[async_trait]
pub trait FilteredOrdersMirror: Send + Sync {
    async fn replace(&self, orders: &[Order]) -> Result<()>;
}
