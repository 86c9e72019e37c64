//! Catalog service client for vRealize Automation.
//!
//! This crate wraps the consumer side of the vRA catalog service: looking up provisioned
//! resources, reading their network interfaces, and submitting and tracking requests.

#![deny(missing_docs)]

pub mod client;
pub mod models;

pub use client::{ConsumerClient, ConsumerClientBuilder, LEGACY_REQUEST_ID_LOCATION};
pub use models::{network_entries, resource_entries, ResourceEntry};

/// Convenient result alias that reuses the shared vRA error type.
pub type Result<T> = vra_core::Result<T>;
