//! Order validation rules
//!
//! Rules are evaluated in declaration order and never short-circuit: a draft
//! with a bad name and a bad weight reports both. A rule on a missing field
//! passes, leaving the failure to that field's `required` rule.

use super::validators::{at_least, at_most, in_future, letters_and_spaces, max_chars};
use crate::core::error::{FieldViolation, ValidationError};
use crate::core::order::{NewOrder, OrderDraft};
use chrono::{DateTime, Utc};

/// Maximum length of `name` and `district`
pub const MAX_TEXT_CHARS: usize = 100;

pub const NAME_REQUIRED: &str = "Name is required.";
pub const NAME_TOO_LONG: &str = "Name must be at most 100 characters.";
pub const NAME_PATTERN: &str = "Name may contain only letters and spaces.";
pub const DISTRICT_REQUIRED: &str = "District is required.";
pub const DISTRICT_TOO_LONG: &str = "District must be at most 100 characters.";
pub const DISTRICT_PATTERN: &str = "District may contain only letters and spaces.";
pub const WEIGHT_REQUIRED: &str = "Weight is required.";
pub const WEIGHT_TOO_LOW: &str = "Value must be greater than or equal to 0.";
pub const WEIGHT_TOO_HIGH: &str = "Value must be less than or equal to 100.";
pub const DELIVERY_REQUIRED: &str = "Delivery date is required.";
pub const DELIVERY_IN_PAST: &str = "Delivery date must be in the future.";

type Check = Box<dyn Fn(&OrderDraft, DateTime<Utc>) -> bool + Send + Sync>;

/// A predicate over a draft plus the message reported when it fails
pub struct OrderRule {
    field: &'static str,
    message: &'static str,
    check: Check,
}

impl OrderRule {
    /// Rule that fails when `present` reports the field missing
    pub fn required(
        field: &'static str,
        message: &'static str,
        present: fn(&OrderDraft) -> bool,
    ) -> Self {
        Self {
            field,
            message,
            check: Box::new(move |draft: &OrderDraft, _: DateTime<Utc>| present(draft)),
        }
    }

    /// Rule over a text field
    pub fn text(
        field: &'static str,
        message: &'static str,
        get: fn(&OrderDraft) -> Option<&str>,
        valid: impl Fn(&str) -> bool + Send + Sync + 'static,
    ) -> Self {
        Self {
            field,
            message,
            check: Box::new(move |draft: &OrderDraft, _: DateTime<Utc>| {
                get(draft).is_none_or(&valid)
            }),
        }
    }

    /// Rule over a numeric field
    pub fn number(
        field: &'static str,
        message: &'static str,
        get: fn(&OrderDraft) -> Option<f64>,
        valid: impl Fn(f64) -> bool + Send + Sync + 'static,
    ) -> Self {
        Self {
            field,
            message,
            check: Box::new(move |draft: &OrderDraft, _: DateTime<Utc>| {
                get(draft).is_none_or(&valid)
            }),
        }
    }

    /// Rule over a timestamp field, checked against the validation instant
    pub fn timestamp(
        field: &'static str,
        message: &'static str,
        get: fn(&OrderDraft) -> Option<DateTime<Utc>>,
        valid: fn(DateTime<Utc>, DateTime<Utc>) -> bool,
    ) -> Self {
        Self {
            field,
            message,
            check: Box::new(move |draft: &OrderDraft, now: DateTime<Utc>| {
                get(draft).is_none_or(|value| valid(value, now))
            }),
        }
    }

    /// Evaluate against `draft`, returning the violation if it fails
    pub fn check(&self, draft: &OrderDraft, now: DateTime<Utc>) -> Option<FieldViolation> {
        if (self.check)(draft, now) {
            None
        } else {
            Some(FieldViolation::new(self.field, self.message))
        }
    }
}

/// Ordered rule set for order create/update input
pub struct OrderValidator {
    rules: Vec<OrderRule>,
}

impl OrderValidator {
    pub fn new() -> Self {
        Self {
            rules: vec![
                OrderRule::required("name", NAME_REQUIRED, |d| d.name.is_some()),
                OrderRule::text("name", NAME_TOO_LONG, |d| d.name.as_deref(), max_chars(MAX_TEXT_CHARS)),
                OrderRule::text("name", NAME_PATTERN, |d| d.name.as_deref(), letters_and_spaces),
                OrderRule::required("weight", WEIGHT_REQUIRED, |d| d.weight.is_some()),
                OrderRule::number("weight", WEIGHT_TOO_LOW, |d| d.weight, at_least(0.0)),
                OrderRule::number("weight", WEIGHT_TOO_HIGH, |d| d.weight, at_most(100.0)),
                OrderRule::required("district", DISTRICT_REQUIRED, |d| d.district.is_some()),
                OrderRule::text("district", DISTRICT_TOO_LONG, |d| d.district.as_deref(), max_chars(MAX_TEXT_CHARS)),
                OrderRule::text("district", DISTRICT_PATTERN, |d| d.district.as_deref(), letters_and_spaces),
                OrderRule::required("deliveryDateTime", DELIVERY_REQUIRED, |d| d.delivery_date_time.is_some()),
                OrderRule::timestamp("deliveryDateTime", DELIVERY_IN_PAST, |d| d.delivery_date_time, in_future),
            ],
        }
    }

    /// Every violation of `draft` at instant `now`; empty means valid
    pub fn validate(&self, draft: &OrderDraft, now: DateTime<Utc>) -> Vec<FieldViolation> {
        self.rules
            .iter()
            .filter_map(|rule| rule.check(draft, now))
            .collect()
    }

    /// Validate and convert into the store's input type
    pub fn validate_draft(
        &self,
        draft: OrderDraft,
        now: DateTime<Utc>,
    ) -> Result<NewOrder, ValidationError> {
        let violations = self.validate(&draft, now);
        if !violations.is_empty() {
            return Err(ValidationError::FieldErrors(violations));
        }

        match draft {
            OrderDraft {
                name: Some(name),
                weight: Some(weight),
                district: Some(district),
                delivery_date_time: Some(delivery_date_time),
            } => Ok(NewOrder {
                name,
                weight,
                district,
                delivery_date_time,
            }),
            // Unreachable once the required rules pass
            _ => Err(ValidationError::FieldErrors(Vec::new())),
        }
    }
}

impl Default for OrderValidator {
    fn default() -> Self {
        Self::new()
    }
}

/// Validate a non-empty district used as a list filter
///
/// Returns the first failing district message. Callers skip this for empty
/// or whitespace-only filters, which mean "no filter".
pub fn validate_district_filter(district: &str) -> Result<(), FieldViolation> {
    if !max_chars(MAX_TEXT_CHARS)(district) {
        return Err(FieldViolation::new("district", DISTRICT_TOO_LONG));
    }
    if !letters_and_spaces(district) {
        return Err(FieldViolation::new("district", DISTRICT_PATTERN));
    }
    Ok(())
}
