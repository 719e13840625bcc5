//! Shared test harness for storage backend testing
//!
//! Provides builders for catalog records and the `data_service_tests!` /
//! `ordered_collection_tests!` suites that every backend runs.
//!
//! # Usage
//!
//! From any integration test file in `tests/`:
//! ```rust,ignore
//! #[macro_use]
//! mod storage_harness;
//! use storage_harness::*;
//! ```

#![allow(dead_code)]

#[macro_use]
pub mod data_service_tests;
#[macro_use]
pub mod ordered_collection_tests;

use chrono::{Duration, Utc};
use storefront::entities::Category;

/// An active category named `name` with a slug derived from it
pub fn category(name: &str) -> Category {
    Category::new(name.to_string(), slugify(name), None)
}

/// Categories `names[i]` with `created_at` spaced one second apart, oldest first
pub fn categories(names: &[&str]) -> Vec<Category> {
    let base = Utc::now() - Duration::minutes(10);
    names
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let mut c = category(name);
            c.created_at = base + Duration::seconds(i as i64);
            c.updated_at = c.created_at;
            c
        })
        .collect()
}

pub fn slugify(name: &str) -> String {
    name.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}

/// Names of `records`, in the order given
pub fn names(records: &[Category]) -> Vec<String> {
    records.iter().map(|r| r.name.clone()).collect()
}

/// Positions of `records`, in the order given
pub fn positions(records: &[Category]) -> Vec<i64> {
    records.iter().map(|r| r.order).collect()
}
