//! Reusable field validators
//!
//! Each validator is a plain predicate over a typed value; `true` means the
//! value passes. Rules in [`super::rules`] pair them with field names and
//! messages.

use chrono::{DateTime, Utc};
use regex::Regex;
use std::sync::LazyLock;

static LETTERS_AND_SPACES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z\s]+$").expect("static pattern compiles"));

/// Validator: non-empty, ASCII letters and whitespace only
pub fn letters_and_spaces(value: &str) -> bool {
    LETTERS_AND_SPACES.is_match(value)
}

/// Validator: at most `max` characters (not bytes)
pub fn max_chars(max: usize) -> impl Fn(&str) -> bool + Send + Sync + Clone {
    move |value: &str| value.chars().count() <= max
}

/// Validator: number is greater than or equal to `min`
pub fn at_least(min: f64) -> impl Fn(f64) -> bool + Send + Sync + Clone {
    move |value: f64| value >= min
}

/// Validator: number is less than or equal to `max`
pub fn at_most(max: f64) -> impl Fn(f64) -> bool + Send + Sync + Clone {
    move |value: f64| value <= max
}

/// Validator: timestamp is strictly later than `now`
pub fn in_future(value: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    value > now
}
