//! Core module containing the order domain types, rules and service traits

pub mod error;
pub mod order;
pub mod query;
pub mod service;
pub mod validation;

pub use error::{ApiError, ConfigError, FieldViolation, StorageError, ValidationError};
pub use order::{NewOrder, Order, OrderDraft, OrderFilter, OrderId};
pub use query::ListOrdersQuery;
pub use service::{FilteredOrdersMirror, OrderStore};
pub use validation::{OrderValidator, ValidatedOrder, validate_district_filter};
