//! Core vRA domain types.
//!
//! This module defines the services exposed by a vRA appliance, the paged collection
//! envelope the services return, and the listing formats offered to callers.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::str::FromStr;

/// Tenant used when the caller does not name one.
pub const DEFAULT_TENANT: &str = "vsphere.local";

/// REST services hosted on a vRA appliance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VraService {
    /// Identity service (tokens, tenants, business groups)
    Identity,
    /// Catalog service (consumer resources and requests)
    Catalog,
    /// Reservation service (reservations and their schemas)
    Reservation,
}

impl VraService {
    /// Returns the service name as a string.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Identity => "identity",
            Self::Catalog => "catalog",
            Self::Reservation => "reservation",
        }
    }

    /// Path prefix of the service's API on the appliance.
    #[must_use]
    pub const fn api_prefix(&self) -> &'static str {
        match self {
            Self::Identity => "identity/api",
            Self::Catalog => "catalog-service/api",
            Self::Reservation => "reservation-service/api",
        }
    }

    /// Returns all available services.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Identity, Self::Catalog, Self::Reservation]
    }
}

impl FromStr for VraService {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "identity" => Ok(Self::Identity),
            "catalog" | "catalog-service" => Ok(Self::Catalog),
            "reservation" | "reservation-service" => Ok(Self::Reservation),
            _ => Err(Error::ConfigError(format!("Unknown service: {s}"))),
        }
    }
}

impl std::fmt::Display for VraService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Paged collection envelope returned by list endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Page<T = Value> {
    /// Items on this page.
    pub content: Vec<T>,
    /// Paging metadata (size, totalElements, ...), passed through untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
    /// Navigation links, passed through untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<Value>,
}

impl<T> Page<T> {
    /// Consume the page and return its items.
    #[must_use]
    pub fn into_content(self) -> Vec<T> {
        self.content
    }
}

/// How a listing operation should hand back its items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListFormat {
    /// Two-column (Id, Name) text table.
    #[default]
    Table,
    /// The raw list of objects.
    #[serde(alias = "json")]
    Structured,
}

impl FromStr for ListFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "table" => Ok(Self::Table),
            "json" | "structured" => Ok(Self::Structured),
            _ => Err(Error::ValidationError(format!("Unknown list format: {s}"))),
        }
    }
}

/// Result of a listing operation in the requested [`ListFormat`].
#[derive(Debug, Clone, PartialEq)]
pub enum Listing<T = Value> {
    /// Rendered table text.
    Table(String),
    /// Items exactly as returned by the service.
    Structured(Vec<T>),
}

impl<T> Listing<T> {
    /// Returns the rendered table, if this is a table listing.
    #[must_use]
    pub fn as_table(&self) -> Option<&str> {
        match self {
            Self::Table(text) => Some(text),
            Self::Structured(_) => None,
        }
    }

    /// Returns the items, if this is a structured listing.
    #[must_use]
    pub fn into_items(self) -> Option<Vec<T>> {
        match self {
            Self::Table(_) => None,
            Self::Structured(items) => Some(items),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_service_prefixes() {
        assert_eq!(VraService::Identity.api_prefix(), "identity/api");
        assert_eq!(VraService::Catalog.api_prefix(), "catalog-service/api");
        assert_eq!(
            VraService::Reservation.api_prefix(),
            "reservation-service/api"
        );
        assert_eq!(VraService::all().len(), 3);
    }

    #[test]
    fn test_service_from_str() {
        assert_eq!(
            "Catalog-Service".parse::<VraService>().unwrap(),
            VraService::Catalog
        );
        assert!("vmapi".parse::<VraService>().is_err());
    }

    #[test]
    fn test_page_deserialize_with_metadata() {
        let page: Page = serde_json::from_value(json!({
            "links": [],
            "content": [{"id": "a"}, {"id": "b"}],
            "metadata": {"size": 20, "totalElements": 2}
        }))
        .unwrap();

        assert_eq!(page.content.len(), 2);
        assert_eq!(page.metadata.unwrap()["totalElements"], 2);
    }

    #[test]
    fn test_page_requires_content() {
        let result = serde_json::from_value::<Page>(json!({"metadata": {}}));
        assert!(result.is_err());
    }

    #[test]
    fn test_list_format_parsing() {
        assert_eq!("table".parse::<ListFormat>().unwrap(), ListFormat::Table);
        assert_eq!("JSON".parse::<ListFormat>().unwrap(), ListFormat::Structured);
        assert!("xml".parse::<ListFormat>().is_err());
        assert_eq!(ListFormat::default(), ListFormat::Table);
    }

    #[test]
    fn test_listing_accessors() {
        let table: Listing = Listing::Table("Id Name".to_string());
        assert_eq!(table.as_table(), Some("Id Name"));
        assert!(table.into_items().is_none());

        let items = Listing::Structured(vec![json!({"id": "1"})]);
        assert!(items.as_table().is_none());
        assert_eq!(items.into_items().unwrap().len(), 1);
    }
}
