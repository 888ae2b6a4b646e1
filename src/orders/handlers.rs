//! HTTP handlers for order operations
//!
//! Each handler validates its input, calls the store, and maps the result
//! to a transfer object. Listing additionally replaces the filtered-orders
//! mirror with the result set. Unexpected failures are logged with the
//! error attached and answered with a generic 500.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use chrono::Duration;
use std::sync::Arc;

use super::dto::{OrderDto, to_dtos};
use crate::core::error::ApiError;
use crate::core::order::{OrderFilter, OrderId};
use crate::core::query::ListOrdersQuery;
use crate::core::service::{FilteredOrdersMirror, OrderStore};
use crate::core::validation::{ValidatedOrder, validate_district_filter};
use crate::logging::Logger;

/// Application state shared across order handlers
#[derive(Clone)]
pub struct OrderState {
    pub store: Arc<dyn OrderStore>,
    pub mirror: Arc<dyn FilteredOrdersMirror>,
    pub logger: Logger,
    /// Width of the `fromDate` window
    pub window: Duration,
}

impl OrderState {
    /// Log an unexpected failure and turn it into a 500
    async fn internal(&self, message: &str, error: anyhow::Error) -> ApiError {
        self.logger.error(message, &error).await;
        ApiError::Internal(error)
    }

    async fn not_found(&self, id: OrderId) -> ApiError {
        self.logger.warn(format!("Order {} not found", id)).await;
        ApiError::NotFound { id }
    }
}

/// List orders, optionally filtered by delivery window and district
///
/// GET /orders?fromDate=...&district=...
pub async fn list_orders(
    State(state): State<OrderState>,
    Query(query): Query<ListOrdersQuery>,
) -> Result<Json<Vec<OrderDto>>, ApiError> {
    state
        .logger
        .info(format!(
            "Fetching orders with fromDate={} district={}",
            query.from_date.as_deref().unwrap_or("-"),
            query.district.as_deref().unwrap_or("-"),
        ))
        .await;

    let from_date = match query.from_date() {
        Ok(from_date) => from_date,
        Err(message) => {
            state.logger.warn(message).await;
            return Err(ApiError::BadRequest(message.to_string()));
        }
    };

    // Blank districts mean "no filter" and are not validated
    let district = query.district.filter(|d| !d.trim().is_empty());
    if let Some(district) = district.as_deref() {
        if let Err(violation) = validate_district_filter(district) {
            state.logger.warn(violation.message.clone()).await;
            return Err(ApiError::BadRequest(violation.message));
        }
    }

    let filter = OrderFilter::new(from_date, district).with_window(state.window);

    let orders = match state.store.list(&filter).await {
        Ok(orders) => orders,
        Err(e) => return Err(state.internal("Error fetching orders", e).await),
    };
    state
        .logger
        .info(format!("Found {} orders", orders.len()))
        .await;

    if let Err(e) = state.mirror.replace(&orders).await {
        return Err(state.internal("Error saving filtered orders", e).await);
    }
    state
        .logger
        .info(format!("Saved {} orders to filtered_orders", orders.len()))
        .await;

    Ok(Json(to_dtos(orders)))
}

/// Get a single order
///
/// GET /orders/{id}
pub async fn get_order(
    State(state): State<OrderState>,
    Path(id): Path<OrderId>,
) -> Result<Json<OrderDto>, ApiError> {
    match state.store.get(id).await {
        Ok(Some(order)) => Ok(Json(order.into())),
        Ok(None) => Err(state.not_found(id).await),
        Err(e) => Err(state.internal("Error fetching order", e).await),
    }
}

/// Create an order
///
/// POST /orders → 201 with `Location: /orders/{id}`
pub async fn create_order(
    State(state): State<OrderState>,
    ValidatedOrder(order): ValidatedOrder,
) -> Result<Response, ApiError> {
    let created = match state.store.create(order).await {
        Ok(created) => created,
        Err(e) => return Err(state.internal("Error creating order", e).await),
    };

    state
        .logger
        .info(format!("Order {} created", created.id))
        .await;

    let location = format!("/orders/{}", created.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(OrderDto::from(created)),
    )
        .into_response())
}

/// Replace all business fields of an order
///
/// PUT /orders/{id}
pub async fn update_order(
    State(state): State<OrderState>,
    Path(id): Path<OrderId>,
    ValidatedOrder(order): ValidatedOrder,
) -> Result<Json<OrderDto>, ApiError> {
    match state.store.update(id, order).await {
        Ok(Some(updated)) => {
            state.logger.info(format!("Order {} updated", id)).await;
            Ok(Json(updated.into()))
        }
        Ok(None) => Err(state.not_found(id).await),
        Err(e) => Err(state.internal("Error updating order", e).await),
    }
}

/// Delete an order, returning it as it was before removal
///
/// DELETE /orders/{id}
pub async fn delete_order(
    State(state): State<OrderState>,
    Path(id): Path<OrderId>,
) -> Result<Json<OrderDto>, ApiError> {
    match state.store.delete(id).await {
        Ok(Some(deleted)) => {
            state.logger.info(format!("Order {} deleted", id)).await;
            Ok(Json(deleted.into()))
        }
        Ok(None) => Err(state.not_found(id).await),
        Err(e) => Err(state.internal("Error deleting order", e).await),
    }
}
