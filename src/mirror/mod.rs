//! Filtered-orders mirror rows and date clamping
//!
//! The mirror table can only hold dates inside the backing store's
//! representable range. [`MirrorBounds`] carries that range (historically
//! 1753-01-01 to 9999-12-31) and [`MirrorRow::from_order`] clamps a private
//! copy of each order into it.

use crate::core::error::ConfigError;
use crate::core::order::{Order, OrderId};
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Representable date range of the mirror table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MirrorBounds {
    pub min_date: DateTime<Utc>,
    pub max_date: DateTime<Utc>,
}

impl MirrorBounds {
    /// Build bounds, rejecting an inverted range
    pub fn new(min_date: DateTime<Utc>, max_date: DateTime<Utc>) -> Result<Self, ConfigError> {
        if min_date > max_date {
            return Err(ConfigError::InvalidValue {
                field: "mirror.min_date".to_string(),
                value: min_date.to_rfc3339(),
                message: format!(
                    "must not be later than mirror.max_date ({})",
                    max_date.to_rfc3339()
                ),
            });
        }
        Ok(Self { min_date, max_date })
    }

    /// Clamp `at` into `[min_date, max_date]`
    pub fn clamp(&self, at: DateTime<Utc>) -> DateTime<Utc> {
        at.clamp(self.min_date, self.max_date)
    }
}

impl Default for MirrorBounds {
    fn default() -> Self {
        Self {
            min_date: Utc
                .with_ymd_and_hms(1753, 1, 1, 0, 0, 0)
                .single()
                .expect("constant date is valid"),
            max_date: Utc
                .with_ymd_and_hms(9999, 12, 31, 0, 0, 0)
                .single()
                .expect("constant date is valid"),
        }
    }
}

/// One row of the filtered-orders mirror table
#[derive(Debug, Clone, PartialEq)]
pub struct MirrorRow {
    pub id: OrderId,
    pub name: String,
    pub weight: f64,
    pub district: String,
    pub delivery_date_time: DateTime<Utc>,
}

impl MirrorRow {
    /// Copy `order`, clamping its delivery date into `bounds`
    pub fn from_order(order: &Order, bounds: &MirrorBounds) -> Self {
        Self {
            id: order.id,
            name: order.name.clone(),
            weight: order.weight,
            district: order.district.clone(),
            delivery_date_time: bounds.clamp(order.delivery_date_time),
        }
    }
}

/// Mirror rows for a whole result set
pub fn mirror_rows(orders: &[Order], bounds: &MirrorBounds) -> Vec<MirrorRow> {
    orders
        .iter()
        .map(|order| MirrorRow::from_order(order, bounds))
        .collect()
}
