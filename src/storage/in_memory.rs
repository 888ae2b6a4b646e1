//! In-memory order store and mirror for testing and development

use crate::core::order::{NewOrder, Order, OrderFilter, OrderId};
use crate::core::service::{FilteredOrdersMirror, OrderStore};
use crate::mirror::{MirrorBounds, MirrorRow, mirror_rows};
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

// ============================================================================
// Orders
// ============================================================================

#[derive(Debug, Default)]
struct OrderTable {
    rows: BTreeMap<OrderId, Order>,
    last_id: OrderId,
}

/// In-memory order store
///
/// Ids are assigned sequentially from 1 and never reused. Uses RwLock for
/// thread-safe access; clones share the same table.
#[derive(Clone, Default)]
pub struct InMemoryOrderStore {
    table: Arc<RwLock<OrderTable>>,
}

impl InMemoryOrderStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with `orders`, assigning ids in order
    pub fn with_orders(orders: impl IntoIterator<Item = NewOrder>) -> Result<Self> {
        let store = Self::new();
        {
            let mut table = store
                .table
                .write()
                .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;
            for order in orders {
                table.last_id += 1;
                let id = table.last_id;
                table.rows.insert(id, order.with_id(id));
            }
        }
        Ok(store)
    }

    pub fn len(&self) -> usize {
        self.table.read().map(|t| t.rows.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn list(&self, filter: &OrderFilter) -> Result<Vec<Order>> {
        let table = self
            .table
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        Ok(table
            .rows
            .values()
            .filter(|order| filter.matches(order))
            .cloned()
            .collect())
    }

    async fn get(&self, id: OrderId) -> Result<Option<Order>> {
        let table = self
            .table
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        Ok(table.rows.get(&id).cloned())
    }

    async fn create(&self, order: NewOrder) -> Result<Order> {
        let mut table = self
            .table
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        table.last_id = table
            .last_id
            .checked_add(1)
            .ok_or_else(|| anyhow!("Order id space exhausted"))?;
        let order = order.with_id(table.last_id);
        table.rows.insert(order.id, order.clone());

        Ok(order)
    }

    async fn update(&self, id: OrderId, order: NewOrder) -> Result<Option<Order>> {
        let mut table = self
            .table
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        match table.rows.get_mut(&id) {
            Some(existing) => {
                *existing = order.with_id(id);
                Ok(Some(existing.clone()))
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, id: OrderId) -> Result<Option<Order>> {
        let mut table = self
            .table
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        Ok(table.rows.remove(&id))
    }
}

// ============================================================================
// Mirror
// ============================================================================

/// In-memory filtered-orders mirror
///
/// `replace` swaps the whole row set under one write lock, so readers see
/// either the previous result set or the new one.
#[derive(Clone)]
pub struct InMemoryMirror {
    bounds: MirrorBounds,
    rows: Arc<RwLock<Vec<MirrorRow>>>,
}

impl InMemoryMirror {
    pub fn new(bounds: MirrorBounds) -> Self {
        Self {
            bounds,
            rows: Arc::new(RwLock::new(Vec::new())),
        }
    }

    pub fn bounds(&self) -> &MirrorBounds {
        &self.bounds
    }

    /// Current mirror contents
    pub fn rows(&self) -> Vec<MirrorRow> {
        self.rows.read().map(|rows| rows.clone()).unwrap_or_default()
    }
}

impl Default for InMemoryMirror {
    fn default() -> Self {
        Self::new(MirrorBounds::default())
    }
}

#[async_trait]
impl FilteredOrdersMirror for InMemoryMirror {
    async fn replace(&self, orders: &[Order]) -> Result<()> {
        let fresh = mirror_rows(orders, &self.bounds);

        let mut rows = self
            .rows
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;
        *rows = fresh;

        Ok(())
    }
}
