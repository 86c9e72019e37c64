//! Reservation service client for vRealize Automation.
//!
//! This crate provides typed models and an asynchronous client for reservation types and
//! schemas, business groups, compute resources and reservations.

#![deny(missing_docs)]

pub mod client;
pub mod models;

pub use client::{ReservationClient, ReservationClientBuilder, LEGACY_RESERVATION_ID_LOCATION};
pub use models::{BusinessGroup, FieldValuesRequest, Reservation};

/// Convenient result alias that reuses the shared vRA error type.
pub type Result<T> = vra_core::Result<T>;
