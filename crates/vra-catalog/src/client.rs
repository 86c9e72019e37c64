//! Asynchronous catalog consumer client implementation.

use crate::models::{first_content_id, network_entries};
use crate::Result;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;
use url::Url;
use vra_core::auth::{BearerToken, Credentials};
use vra_core::client::{ClientConfig, ServiceClient, ServiceClientBuilder};
use vra_core::location::{IdLocation, CATALOG_REQUEST_ID_SEGMENT};
use vra_core::query::QueryParams;
use vra_core::types::VraService;
use vra_core::VraClientConfig;

const USER_AGENT: &str = concat!("vra-catalog/", env!("CARGO_PKG_VERSION"));

/// Id position used by older deployments when reading request `Location` headers.
pub const LEGACY_REQUEST_ID_LOCATION: IdLocation = IdLocation::Segment(CATALOG_REQUEST_ID_SEGMENT);

/// Builder for [`ConsumerClient`].
#[derive(Debug, Clone)]
pub struct ConsumerClientBuilder {
    inner: ServiceClientBuilder,
}

impl ConsumerClientBuilder {
    /// Create a builder from a vRA configuration.
    pub fn new(config: VraClientConfig) -> Result<Self> {
        let builder =
            ServiceClientBuilder::new(VraService::Catalog, config)?.with_user_agent(USER_AGENT);

        Ok(Self { inner: builder })
    }

    /// Override the HTTP client configuration.
    #[must_use]
    pub fn with_http_config(mut self, config: ClientConfig) -> Self {
        self.inner = self.inner.with_http_config(config);
        self
    }

    /// Override how request ids are read from `Location` headers.
    #[must_use]
    pub fn with_id_location(mut self, id_location: IdLocation) -> Self {
        self.inner = self.inner.with_id_location(id_location);
        self
    }

    /// Authenticate with explicit credentials and build the client.
    pub async fn connect(self, credentials: Credentials) -> Result<ConsumerClient> {
        let inner = self.inner.connect(credentials).await?;
        Ok(ConsumerClient { inner })
    }

    /// Authenticate against the configured tenant and build the client.
    pub async fn login(
        self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<ConsumerClient> {
        let inner = self.inner.login(username, password).await?;
        Ok(ConsumerClient { inner })
    }
}

/// Asynchronous client for the catalog service consumer API.
///
/// Authentication happens while connecting; the token is reused for every call.
#[derive(Debug)]
pub struct ConsumerClient {
    inner: ServiceClient,
}

impl ConsumerClient {
    /// Connect to `host` and authenticate. `None` selects the `vsphere.local` tenant.
    pub async fn connect(
        host: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
        tenant: Option<&str>,
    ) -> Result<Self> {
        let config = VraClientConfig::new(host)?.with_tenant(tenant);
        ConsumerClientBuilder::new(config)?
            .login(username, password)
            .await
    }

    /// Start a builder from a vRA configuration.
    pub fn builder(config: VraClientConfig) -> Result<ConsumerClientBuilder> {
        ConsumerClientBuilder::new(config)
    }

    /// Return the base URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        self.inner.base_url()
    }

    /// Bearer token of this session, for troubleshooting.
    #[must_use]
    pub fn token(&self) -> &BearerToken {
        self.inner.token()
    }

    /// Account the session was opened for.
    #[must_use]
    pub fn username(&self) -> &str {
        self.inner.username()
    }

    /// Tenant the session was opened for.
    #[must_use]
    pub fn tenant(&self) -> &str {
        self.inner.tenant()
    }

    /// Fetch a catalog resource by id.
    pub async fn get_resource(&self, id: &str) -> Result<Value> {
        let path = format!("consumer/resources/{id}");
        self.inner.get_json(&path, &[]).await
    }

    /// Find the id of the resource provisioned by a request.
    ///
    /// Fails with [`vra_core::Error::MissingField`] when the request produced no resource.
    pub async fn get_resource_id(&self, request_id: &str) -> Result<String> {
        let mut params = QueryParams::new();
        params.filter_eq("request", request_id);

        let content: Vec<Value> = self
            .inner
            .get_content(VraService::Catalog, "consumer/resources", &params.into_pairs())
            .await?;
        first_content_id(&content)
    }

    /// List every resource visible to the current user.
    pub async fn get_all_resources(&self) -> Result<Vec<Value>> {
        self.inner
            .get_content(VraService::Catalog, "consumer/resources", &[])
            .await
    }

    /// Network interface entries of a resource.
    ///
    /// Only the last interface of the resource's `NETWORK_LIST` is returned.
    pub async fn get_resource_networking(&self, id: &str) -> Result<Vec<Value>> {
        let resource = self.get_resource(id).await?;
        network_entries(&resource)
    }

    /// Fetch a request by id.
    pub async fn get_request(&self, id: &str) -> Result<Value> {
        let path = format!("consumer/requests/{id}");
        self.inner.get_json(&path, &[]).await
    }

    /// Submit a provisioning request and return the new request id.
    pub async fn request_resource<B>(&self, payload: &B) -> Result<String>
    where
        B: Serialize + ?Sized,
    {
        let id = self
            .inner
            .post_for_location("consumer/requests", payload)
            .await?;
        debug!(request_id = %id, "Submitted catalog request");
        Ok(id)
    }
}
