//! Configuration structures for vRA clients.
//!
//! This module provides the configuration used to reach a vRA appliance: the host, the
//! default tenant and the transport posture.

use crate::types::DEFAULT_TENANT;
use crate::Error;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;
use validator::Validate;

/// Configuration for a vRA client instance.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct VraClientConfig {
    /// Appliance host name (`vra.example.com`) or full base URL (`https://vra:8443`)
    #[validate(length(min = 1))]
    pub host: String,

    /// Tenant used for authentication and tenant-scoped endpoints
    #[validate(length(min = 1))]
    #[serde(default = "default_tenant")]
    pub tenant: String,

    /// Skip TLS certificate validation
    #[serde(default = "default_insecure_transport")]
    pub insecure_transport: bool,

    /// Optional request timeout in seconds; requests block indefinitely when unset
    #[validate(range(min = 1, max = 600))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,
}

fn default_tenant() -> String {
    DEFAULT_TENANT.to_string()
}

const fn default_insecure_transport() -> bool {
    true
}

impl VraClientConfig {
    /// Create a new client configuration for the given host.
    ///
    /// # Errors
    ///
    /// Returns an error if the host is empty or does not form a valid URL.
    pub fn new(host: impl Into<String>) -> Result<Self, Error> {
        let config = Self {
            host: host.into(),
            tenant: default_tenant(),
            insecure_transport: default_insecure_transport(),
            request_timeout_secs: None,
        };

        config.check()?;
        Ok(config)
    }

    /// Set the tenant. `None` keeps the default tenant.
    #[must_use]
    pub fn with_tenant(mut self, tenant: Option<impl Into<String>>) -> Self {
        if let Some(tenant) = tenant {
            self.tenant = tenant.into();
        }
        self
    }

    /// Enable or disable TLS certificate validation bypass.
    #[must_use]
    pub const fn with_insecure_transport(mut self, insecure: bool) -> Self {
        self.insecure_transport = insecure;
        self
    }

    /// Set request timeout in seconds.
    #[must_use]
    pub const fn with_timeout(mut self, seconds: u64) -> Self {
        self.request_timeout_secs = Some(seconds);
        self
    }

    /// Get the request timeout as a Duration.
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    /// Validate the configuration, including the derived base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if a field is out of range or the host is not usable.
    pub fn check(&self) -> Result<(), Error> {
        self.validate()
            .map_err(|e| Error::ConfigError(format!("Invalid configuration: {e}")))?;
        self.base_url().map(|_| ())
    }

    /// Parse the appliance base URL.
    ///
    /// A bare host name is reached over HTTPS. The returned URL always ends with `/` so
    /// relative API paths join beneath it.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL cannot be parsed.
    pub fn base_url(&self) -> Result<Url, Error> {
        let raw = if self.host.contains("://") {
            self.host.clone()
        } else {
            format!("https://{}", self.host)
        };

        let mut url = Url::parse(&raw)
            .map_err(|e| Error::ConfigError(format!("Invalid vRA host `{}`: {e}", self.host)))?;

        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }

        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_defaults() {
        let config = VraClientConfig::new("vra.example.com").unwrap();
        assert_eq!(config.tenant, "vsphere.local");
        assert!(config.insecure_transport);
        assert!(config.timeout().is_none());
    }

    #[test]
    fn test_bare_host_uses_https() {
        let config = VraClientConfig::new("vra.example.com").unwrap();
        assert_eq!(
            config.base_url().unwrap().as_str(),
            "https://vra.example.com/"
        );
    }

    #[test]
    fn test_full_url_kept() {
        let config = VraClientConfig::new("http://127.0.0.1:8080/vra").unwrap();
        assert_eq!(
            config.base_url().unwrap().as_str(),
            "http://127.0.0.1:8080/vra/"
        );
    }

    #[test]
    fn test_empty_host_rejected() {
        let err = VraClientConfig::new("").unwrap_err();
        assert!(matches!(err, Error::ConfigError(_)));
    }

    #[test]
    fn test_builder_overrides() {
        let config = VraClientConfig::new("vra.example.com")
            .unwrap()
            .with_tenant(Some("qe"))
            .with_insecure_transport(false)
            .with_timeout(45);

        assert_eq!(config.tenant, "qe");
        assert!(!config.insecure_transport);
        assert_eq!(config.timeout(), Some(Duration::from_secs(45)));
    }

    #[test]
    fn test_with_tenant_none_keeps_default() {
        let config = VraClientConfig::new("vra.example.com")
            .unwrap()
            .with_tenant(None::<String>);
        assert_eq!(config.tenant, DEFAULT_TENANT);
    }

    #[test]
    fn test_timeout_range_validated() {
        let config = VraClientConfig::new("vra.example.com")
            .unwrap()
            .with_timeout(0);
        assert!(config.check().is_err());
    }

    #[test]
    fn test_deserialize_applies_defaults() {
        let config: VraClientConfig =
            serde_json::from_str(r#"{"host": "vra.example.com"}"#).unwrap();
        assert_eq!(config.tenant, DEFAULT_TENANT);
        assert!(config.insecure_transport);
        assert!(config.request_timeout_secs.is_none());
    }
}
