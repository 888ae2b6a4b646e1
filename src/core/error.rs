//! Typed error handling for the delivery service
//!
//! Store and mirror seams return `anyhow::Result`; this module holds the
//! errors that callers are expected to match on, and the mapping from
//! [`ApiError`] to HTTP responses.
//!
//! # Error Categories
//!
//! - [`ApiError`]: what a request handler can fail with
//! - [`ValidationError`]: order input that breaks a field rule
//! - [`ConfigError`]: configuration loading and checking
//! - [`StorageError`]: backend connection and schema failures
//!
//! # Example
//!
//! ```rust,ignore
//! async fn get_order(id: OrderId) -> Result<Json<OrderDto>, ApiError> {
//!     let order = store.get(id).await.map_err(ApiError::Internal)?;
//!     order.map(|o| Json(o.into())).ok_or(ApiError::NotFound { id })
//! }
//! ```

use crate::core::order::OrderId;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use std::fmt;

/// Body sent with every 500 response; details stay in the server log
pub const INTERNAL_ERROR_MESSAGE: &str = "An error occurred on the server.";

/// Errors surfaced by the order HTTP handlers
#[derive(Debug)]
pub enum ApiError {
    /// A query parameter failed validation; the message is the whole body
    BadRequest(String),

    /// A request body failed one or more field rules
    Validation(ValidationError),

    /// No order with this id
    NotFound { id: OrderId },

    /// Anything else (store unavailable, mirror failure, ...)
    Internal(anyhow::Error),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::BadRequest(message) => write!(f, "{}", message),
            ApiError::Validation(e) => write!(f, "{}", e),
            ApiError::NotFound { id } => write!(f, "Order with id '{}' not found", id),
            ApiError::Internal(e) => write!(f, "Internal error: {}", e),
        }
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ApiError::Validation(e) => Some(e),
            ApiError::Internal(e) => Some(&**e),
            _ => None,
        }
    }
}

/// Error response structure for JSON error bodies
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ApiError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "BAD_REQUEST",
            ApiError::Validation(e) => e.error_code(),
            ApiError::NotFound { .. } => "ORDER_NOT_FOUND",
            ApiError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match self {
            ApiError::BadRequest(message) => (status, message).into_response(),
            ApiError::Validation(e) => (status, Json(e.to_response())).into_response(),
            ApiError::NotFound { .. } => status.into_response(),
            ApiError::Internal(_) => (status, INTERNAL_ERROR_MESSAGE).into_response(),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::Validation(err)
    }
}

// =============================================================================
// Validation Errors
// =============================================================================

/// A single broken field rule
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Errors related to order input
#[derive(Debug)]
pub enum ValidationError {
    /// One or more field rules failed
    FieldErrors(Vec<FieldViolation>),

    /// The body was not valid JSON for an order
    InvalidJson { message: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::FieldErrors(errors) => {
                let msgs: Vec<String> = errors
                    .iter()
                    .map(|e| format!("{}: {}", e.field, e.message))
                    .collect();
                write!(f, "Validation errors: {}", msgs.join(", "))
            }
            ValidationError::InvalidJson { message } => {
                write!(f, "Invalid JSON: {}", message)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

impl ValidationError {
    pub fn error_code(&self) -> &'static str {
        match self {
            ValidationError::FieldErrors(_) => "VALIDATION_ERROR",
            ValidationError::InvalidJson { .. } => "INVALID_JSON",
        }
    }

    /// Field messages, in rule order
    pub fn messages(&self) -> Vec<&str> {
        match self {
            ValidationError::FieldErrors(errors) => {
                errors.iter().map(|e| e.message.as_str()).collect()
            }
            ValidationError::InvalidJson { message } => vec![message.as_str()],
        }
    }

    fn to_response(&self) -> ErrorResponse {
        let details = match self {
            ValidationError::FieldErrors(errors) => Some(serde_json::json!({ "fields": errors })),
            ValidationError::InvalidJson { .. } => None,
        };

        ErrorResponse {
            code: self.error_code().to_string(),
            message: self.to_string(),
            details,
        }
    }
}

// =============================================================================
// Config Errors
// =============================================================================

/// Errors related to configuration
#[derive(Debug)]
pub enum ConfigError {
    /// Failed to parse configuration file
    ParseError {
        file: Option<String>,
        message: String,
    },

    /// Invalid value in configuration
    InvalidValue {
        field: String,
        value: String,
        message: String,
    },

    /// IO error while reading configuration
    IoError { path: String, message: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ParseError {
                file: Some(file),
                message,
            } => write!(f, "Failed to parse config file '{}': {}", file, message),
            ConfigError::ParseError {
                file: None,
                message,
            } => write!(f, "Failed to parse config: {}", message),
            ConfigError::InvalidValue {
                field,
                value,
                message,
            } => write!(
                f,
                "Invalid value '{}' for field '{}': {}",
                value, field, message
            ),
            ConfigError::IoError { path, message } => {
                write!(f, "IO error reading '{}': {}", path, message)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

// =============================================================================
// Storage Errors
// =============================================================================

/// Errors related to storage backends
#[derive(Debug)]
pub enum StorageError {
    /// Connection error
    ConnectionError { backend: String, message: String },

    /// Schema creation error
    SchemaError { backend: String, message: String },
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::ConnectionError { backend, message } => {
                write!(f, "Failed to connect to {}: {}", backend, message)
            }
            StorageError::SchemaError { backend, message } => {
                write!(f, "Failed to prepare {} schema: {}", backend, message)
            }
        }
    }
}

impl std::error::Error for StorageError {}
