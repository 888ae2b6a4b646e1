//! Router builder for order routes

use crate::orders::handlers::{
    OrderState, create_order, delete_order, get_order, list_orders, update_order,
};
use axum::{Router, routing::get};

/// Build order routes
///
/// - GET /orders - List orders (`fromDate`, `district` filters)
/// - POST /orders - Create an order
/// - GET /orders/{id} - Get an order
/// - PUT /orders/{id} - Replace an order's fields
/// - DELETE /orders/{id} - Delete an order
pub fn build_order_routes(state: OrderState) -> Router {
    Router::new()
        .route("/orders", get(list_orders).post(create_order))
        .route(
            "/orders/{id}",
            get(get_order).put(update_order).delete(delete_order),
        )
        .with_state(state)
}
