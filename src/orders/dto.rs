//! Transfer objects exposed over HTTP

use crate::core::order::{Order, OrderId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The externally visible shape of an order
///
/// ```json
/// {"id": 1, "name": "Test Name", "weight": 50.0, "district": "Test District",
///  "deliveryDateTime": "2030-05-01T12:00:00Z"}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDto {
    pub id: OrderId,
    pub name: String,
    pub weight: f64,
    pub district: String,
    pub delivery_date_time: DateTime<Utc>,
}

impl From<Order> for OrderDto {
    fn from(order: Order) -> Self {
        Self {
            id: order.id,
            name: order.name,
            weight: order.weight,
            district: order.district,
            delivery_date_time: order.delivery_date_time,
        }
    }
}

/// Map a result set, preserving order
pub fn to_dtos(orders: Vec<Order>) -> Vec<OrderDto> {
    orders.into_iter().map(OrderDto::from).collect()
}
