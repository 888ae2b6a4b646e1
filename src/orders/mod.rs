//! Order HTTP surface: transfer objects and handlers

pub mod dto;
pub mod handlers;

pub use dto::OrderDto;
pub use handlers::{
    OrderState, create_order, delete_order, get_order, list_orders, update_order,
};
