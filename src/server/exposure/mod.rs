//! API exposure for the storefront
//!
//! An exposure consumes a [`ServerHost`](super::host::ServerHost) and produces
//! a router for its protocol. REST is the only one.

pub mod rest;

pub use rest::RestExposure;
