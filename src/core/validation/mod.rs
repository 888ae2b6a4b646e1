//! Validation system for order input
//!
//! Rules are an explicit ordered list of predicate + message pairs
//! ([`rules::OrderRule`]) built from the reusable predicates in
//! [`validators`]. The [`extractor::ValidatedOrder`] extractor applies them
//! to request bodies before handlers run.

pub mod extractor;
pub mod rules;
pub mod validators;

pub use extractor::ValidatedOrder;
pub use rules::{OrderRule, OrderValidator, validate_district_filter};
