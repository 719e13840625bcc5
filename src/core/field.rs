//! Field value types and shared format checks

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use uuid::Uuid;

/// A polymorphic field value that can hold different types
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum FieldValue {
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Uuid(Uuid),
    DateTime(DateTime<Utc>),
    Null,
}

impl FieldValue {
    /// Get the value as a string if possible
    pub fn as_string(&self) -> Option<&str> {
        match self {
            FieldValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get the value as an integer if possible
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            FieldValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Check if the value is null
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// Compare against a raw query string.
    ///
    /// Search endpoints only ever receive strings, so numbers, booleans and
    /// UUIDs are compared through their canonical textual form.
    pub fn matches_str(&self, raw: &str) -> bool {
        match self {
            FieldValue::String(s) => s == raw,
            FieldValue::Integer(i) => raw.parse::<i64>().is_ok_and(|v| v == *i),
            FieldValue::Float(f) => raw.parse::<f64>().is_ok_and(|v| (v - f).abs() < f64::EPSILON),
            FieldValue::Boolean(b) => raw.parse::<bool>().is_ok_and(|v| v == *b),
            FieldValue::Uuid(u) => Uuid::parse_str(raw).is_ok_and(|v| v == *u),
            FieldValue::DateTime(dt) => dt.to_rfc3339() == raw,
            FieldValue::Null => false,
        }
    }
}

/// Conversion used by the entity macros to expose struct fields to search
pub trait ToFieldValue {
    fn to_field_value(&self) -> FieldValue;
}

impl ToFieldValue for String {
    fn to_field_value(&self) -> FieldValue {
        FieldValue::String(self.clone())
    }
}

impl ToFieldValue for i64 {
    fn to_field_value(&self) -> FieldValue {
        FieldValue::Integer(*self)
    }
}

impl ToFieldValue for f64 {
    fn to_field_value(&self) -> FieldValue {
        FieldValue::Float(*self)
    }
}

impl ToFieldValue for bool {
    fn to_field_value(&self) -> FieldValue {
        FieldValue::Boolean(*self)
    }
}

impl ToFieldValue for Uuid {
    fn to_field_value(&self) -> FieldValue {
        FieldValue::Uuid(*self)
    }
}

impl ToFieldValue for DateTime<Utc> {
    fn to_field_value(&self) -> FieldValue {
        FieldValue::DateTime(*self)
    }
}

impl<T: ToFieldValue> ToFieldValue for Option<T> {
    fn to_field_value(&self) -> FieldValue {
        self.as_ref()
            .map(ToFieldValue::to_field_value)
            .unwrap_or(FieldValue::Null)
    }
}

/// URL-safe slug: lowercase alphanumerics separated by single dashes
pub fn slug_regex() -> &'static Regex {
    static SLUG_REGEX: OnceLock<Regex> = OnceLock::new();
    SLUG_REGEX.get_or_init(|| {
        Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").expect("slug pattern is valid")
    })
}

/// Local mobile number as couriers accept it: 11 digits starting with `01`
pub fn phone_regex() -> &'static Regex {
    static PHONE_REGEX: OnceLock<Regex> = OnceLock::new();
    PHONE_REGEX.get_or_init(|| Regex::new(r"^01[3-9]\d{8}$").expect("phone pattern is valid"))
}
