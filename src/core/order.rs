//! Order records and list filters

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Identifier assigned by the store on creation
pub type OrderId = i32;

/// Default width of the `fromDate` delivery window
pub const DEFAULT_WINDOW_MINUTES: i64 = 30;

/// A persisted delivery order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub name: String,
    pub weight: f64,
    pub district: String,
    pub delivery_date_time: DateTime<Utc>,
}

/// The business fields of an order, before the store assigns an id
///
/// Used for both create and update: an update replaces all four fields
/// and keeps the id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
    pub name: String,
    pub weight: f64,
    pub district: String,
    pub delivery_date_time: DateTime<Utc>,
}

impl NewOrder {
    /// Attach an id, producing the stored form
    pub fn with_id(self, id: OrderId) -> Order {
        Order {
            id,
            name: self.name,
            weight: self.weight,
            district: self.district,
            delivery_date_time: self.delivery_date_time,
        }
    }
}

/// Order-shaped input as received from a client
///
/// Every field is optional so that a missing value surfaces as a validation
/// failure rather than a deserialization error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDraft {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub weight: Option<f64>,
    #[serde(default)]
    pub district: Option<String>,
    #[serde(default, deserialize_with = "crate::core::query::deserialize_optional_timestamp")]
    pub delivery_date_time: Option<DateTime<Utc>>,
}

/// Criteria for listing orders
///
/// Both criteria are optional and combine with AND. A `from_date` of `T`
/// selects deliveries in the closed window `[T, T + window]`.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderFilter {
    pub from_date: Option<DateTime<Utc>>,
    pub district: Option<String>,
    pub window: Duration,
}

impl OrderFilter {
    /// Build a filter, treating an empty or whitespace-only district as absent
    pub fn new(from_date: Option<DateTime<Utc>>, district: Option<String>) -> Self {
        Self {
            from_date,
            district: district.filter(|d| !d.trim().is_empty()),
            window: Duration::minutes(DEFAULT_WINDOW_MINUTES),
        }
    }

    /// Override the delivery window width
    pub fn with_window(mut self, window: Duration) -> Self {
        self.window = window;
        self
    }

    /// Upper bound of the delivery window, if a `from_date` is set
    ///
    /// Saturates at the latest representable instant.
    pub fn to_date(&self) -> Option<DateTime<Utc>> {
        self.from_date.map(|from| {
            from.checked_add_signed(self.window)
                .unwrap_or(DateTime::<Utc>::MAX_UTC)
        })
    }

    /// Whether an order satisfies every criterion of this filter
    pub fn matches(&self, order: &Order) -> bool {
        let in_window = match (self.from_date, self.to_date()) {
            (Some(from), Some(to)) => {
                order.delivery_date_time >= from && order.delivery_date_time <= to
            }
            _ => true,
        };

        in_window && self.district.as_deref().is_none_or(|d| order.district == d)
    }
}

impl Default for OrderFilter {
    fn default() -> Self {
        Self::new(None, None)
    }
}
