//! # vra-core
//!
//! Core types and utilities for working with the vRealize Automation (vRA) REST API.
//!
//! This crate provides the error type, configuration, bearer-token authentication and the
//! authenticated HTTP session shared by the catalog and reservation clients.
//!
//! ## Modules
//!
//! - [`error`] - Error types and HTTP status to exit code mapping
//! - [`config`] - Configuration structures for vRA clients
//! - [`auth`] - Identity service authentication
//! - [`client`] - HTTP client configuration and the authenticated service session
//! - [`location`] - Id extraction from `Location` headers
//! - [`query`] - OData query parameter builder
//! - [`types`] - Services, paged collections and listing formats
//! - [`display`] - Id/name table rendering

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod auth;
pub mod client;
pub mod config;
pub mod display;
pub mod error;
pub mod location;
pub mod query;
pub mod types;

// Re-export commonly used types
pub use auth::{BearerToken, Credentials};
pub use client::{ClientConfig, ServiceClient, ServiceClientBuilder};
pub use config::VraClientConfig;
pub use error::{Error, Result};
pub use location::IdLocation;
pub use types::{ListFormat, Listing, Page, VraService, DEFAULT_TENANT};
