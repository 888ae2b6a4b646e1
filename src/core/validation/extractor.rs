//! Axum extractor for validated order bodies
//!
//! `ValidatedOrder` parses the JSON body into an [`OrderDraft`], runs the
//! full [`OrderValidator`] rule list at the current instant and hands the
//! handler a [`NewOrder`] that is safe to persist.

use super::rules::OrderValidator;
use crate::core::error::{ApiError, ValidationError};
use crate::core::order::{NewOrder, OrderDraft};
use axum::{
    Json,
    extract::{FromRequest, Request},
};
use chrono::Utc;
use std::sync::LazyLock;

static VALIDATOR: LazyLock<OrderValidator> = LazyLock::new(OrderValidator::new);

/// Axum extractor that validates an order body
///
/// # Usage
///
/// ```rust,ignore
/// pub async fn create_order(
///     State(state): State<OrderState>,
///     ValidatedOrder(order): ValidatedOrder,
/// ) -> Result<Response, ApiError> {
///     // order already passed every field rule
/// }
/// ```
pub struct ValidatedOrder(pub NewOrder);

impl ValidatedOrder {
    /// Get the inner order
    pub fn into_inner(self) -> NewOrder {
        self.0
    }
}

impl std::ops::Deref for ValidatedOrder {
    type Target = NewOrder;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<S> FromRequest<S> for ValidatedOrder
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(draft): Json<OrderDraft> = Json::from_request(req, state)
            .await
            .map_err(|e| {
                ApiError::Validation(ValidationError::InvalidJson {
                    message: e.body_text(),
                })
            })?;

        let order = VALIDATOR.validate_draft(draft, Utc::now())?;
        Ok(ValidatedOrder(order))
    }
}
