//! HTTP client utilities shared by the vRA service clients.
//!
//! This module provides HTTP client configuration, the accepted-status check applied to
//! every response, and [`ServiceClient`], an authenticated session bound to one vRA
//! service.

use crate::auth::{authenticate, BearerToken, Credentials};
use crate::config::VraClientConfig;
use crate::location::IdLocation;
use crate::types::{Page, VraService};
use crate::{Error, Result};
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, ClientBuilder, Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

/// Media type sent in `Content-Type` and `Accept` on every request.
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Statuses treated as success; everything else is fatal.
pub const ACCEPTED_STATUSES: [StatusCode; 2] = [StatusCode::OK, StatusCode::CREATED];

/// Default connect timeout in seconds.
pub const DEFAULT_CONNECT_TIMEOUT: u64 = 10;

/// HTTP client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Request timeout; `None` waits for the service indefinitely
    pub timeout: Option<Duration>,

    /// TCP connect timeout
    pub connect_timeout: Duration,

    /// Enable response compression
    pub enable_compression: bool,

    /// Skip TLS certificate validation
    pub insecure_transport: bool,
}

impl ClientConfig {
    /// Create a new client configuration with default values.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            timeout: None,
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT),
            enable_compression: true,
            insecure_transport: false,
        }
    }

    /// Derive the HTTP configuration from a [`VraClientConfig`].
    #[must_use]
    pub fn from_vra_config(config: &VraClientConfig) -> Self {
        Self {
            timeout: config.timeout(),
            insecure_transport: config.insecure_transport,
            ..Self::new()
        }
    }

    /// Set request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set connect timeout.
    #[must_use]
    pub const fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Enable or disable compression.
    #[must_use]
    pub const fn with_compression(mut self, enabled: bool) -> Self {
        self.enable_compression = enabled;
        self
    }

    /// Enable or disable TLS certificate validation bypass.
    #[must_use]
    pub const fn with_insecure_transport(mut self, insecure: bool) -> Self {
        self.insecure_transport = insecure;
        self
    }

    /// Build a `reqwest` client honouring this configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if the TLS backend cannot be initialised.
    pub fn build_http(&self, user_agent: &str) -> Result<Client> {
        let mut builder = ClientBuilder::new()
            .user_agent(user_agent)
            .connect_timeout(self.connect_timeout);

        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        if !self.enable_compression {
            builder = builder.no_gzip();
        }

        if self.insecure_transport {
            warn!("TLS certificate validation disabled for vRA client");
            builder = builder.danger_accept_invalid_certs(true);
        }

        builder
            .build()
            .map_err(|err| Error::ConfigError(format!("Failed to build vRA HTTP client: {err}")))
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Pass through 200/201 responses and turn anything else into
/// [`Error::UnexpectedStatus`] carrying the body text.
///
/// # Errors
///
/// Returns [`Error::UnexpectedStatus`] for any status outside [`ACCEPTED_STATUSES`].
pub async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if ACCEPTED_STATUSES.contains(&status) {
        return Ok(response);
    }

    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());

    Err(Error::UnexpectedStatus {
        status: status.as_u16(),
        body,
    })
}

/// Builder for [`ServiceClient`].
#[derive(Debug, Clone)]
pub struct ServiceClientBuilder {
    service: VraService,
    config: VraClientConfig,
    http_config: ClientConfig,
    user_agent: String,
    id_location: IdLocation,
}

impl ServiceClientBuilder {
    /// Create a builder for the given service from a vRA configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new(service: VraService, config: VraClientConfig) -> Result<Self> {
        config.check()?;
        let http_config = ClientConfig::from_vra_config(&config);

        Ok(Self {
            service,
            config,
            http_config,
            user_agent: concat!("vra-core/", env!("CARGO_PKG_VERSION")).to_string(),
            id_location: IdLocation::default(),
        })
    }

    /// Override the `User-Agent` header.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Override the HTTP client configuration.
    #[must_use]
    pub fn with_http_config(mut self, config: ClientConfig) -> Self {
        self.http_config = config;
        self
    }

    /// Override how ids are read from `Location` headers.
    #[must_use]
    pub const fn with_id_location(mut self, id_location: IdLocation) -> Self {
        self.id_location = id_location;
        self
    }

    /// The configuration this builder will connect with.
    #[must_use]
    pub const fn config(&self) -> &VraClientConfig {
        &self.config
    }

    /// Authenticate and build the client.
    ///
    /// The tenant of `credentials` is used for the token request.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built or authentication fails.
    pub async fn connect(self, credentials: Credentials) -> Result<ServiceClient> {
        let base_url = self.config.base_url()?;
        let http = self.http_config.build_http(&self.user_agent)?;
        let token = authenticate(&http, &base_url, &credentials).await?;

        Ok(ServiceClient {
            http,
            base_url,
            service: self.service,
            username: credentials.username().to_string(),
            tenant: credentials.tenant().to_string(),
            token,
            id_location: self.id_location,
        })
    }

    /// Authenticate with the configured tenant and build the client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built or authentication fails.
    pub async fn login(
        self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<ServiceClient> {
        let credentials = Credentials::new(username, password, Some(self.config.tenant.as_str()));
        self.connect(credentials).await
    }
}

/// Authenticated session bound to one vRA service.
///
/// The token is obtained once while connecting and never refreshed.
#[derive(Debug)]
pub struct ServiceClient {
    http: Client,
    base_url: Url,
    service: VraService,
    username: String,
    tenant: String,
    token: BearerToken,
    id_location: IdLocation,
}

impl ServiceClient {
    /// Return the appliance base URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Service this client targets.
    #[must_use]
    pub const fn service(&self) -> VraService {
        self.service
    }

    /// Account the session was opened for.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Tenant the session was opened for.
    #[must_use]
    pub fn tenant(&self) -> &str {
        &self.tenant
    }

    /// Bearer token of the session.
    #[must_use]
    pub const fn token(&self) -> &BearerToken {
        &self.token
    }

    /// How ids are read from `Location` headers.
    #[must_use]
    pub const fn id_location(&self) -> IdLocation {
        self.id_location
    }

    /// Resolve a path relative to this client's service prefix.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidEndpoint`] if the path cannot be joined.
    pub fn build_url(&self, path: &str) -> Result<Url> {
        self.build_service_url(self.service, path)
    }

    /// Resolve a path relative to another service's prefix on the same appliance.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidEndpoint`] if the path cannot be joined.
    pub fn build_service_url(&self, service: VraService, path: &str) -> Result<Url> {
        let normalized = path.trim_start_matches('/');
        let full = format!("{}/{normalized}", service.api_prefix());
        self.base_url.join(&full).map_err(|err| {
            Error::InvalidEndpoint(format!("Invalid {service} path `{path}`: {err}"))
        })
    }

    /// Send one authenticated request and check its status.
    ///
    /// # Errors
    ///
    /// Returns a transport error, or [`Error::UnexpectedStatus`] for a status other than
    /// 200/201.
    pub async fn execute<B>(
        &self,
        method: Method,
        service: VraService,
        path: &str,
        params: &[(&str, String)],
        body: Option<&B>,
    ) -> Result<Response>
    where
        B: Serialize + ?Sized,
    {
        let url = self.build_service_url(service, path)?;
        let mut request = self
            .http
            .request(method.clone(), url)
            .header(CONTENT_TYPE, JSON_CONTENT_TYPE)
            .header(ACCEPT, JSON_CONTENT_TYPE)
            .header(AUTHORIZATION, self.token.expose());

        if !params.is_empty() {
            request = request.query(params);
        }
        if let Some(payload) = body {
            request = request.json(payload);
        }

        info!(%service, %method, path, "vRA request");

        let response = request.send().await?;
        check_status(response).await
    }

    /// GET a path of this client's service and decode the JSON body.
    ///
    /// # Errors
    ///
    /// Returns transport, status or decoding errors.
    pub async fn get_json<T>(&self, path: &str, params: &[(&str, String)]) -> Result<T>
    where
        T: DeserializeOwned,
    {
        self.send_json::<(), T>(Method::GET, self.service, path, params, None)
            .await
    }

    /// GET a paged collection and return its `content`.
    ///
    /// # Errors
    ///
    /// Returns transport, status or decoding errors; a body without `content` is a
    /// decoding error.
    pub async fn get_content<T>(
        &self,
        service: VraService,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<Vec<T>>
    where
        T: DeserializeOwned,
    {
        self.send_json::<(), Page<T>>(Method::GET, service, path, params, None)
            .await
            .map(Page::into_content)
    }

    /// Send a request and decode the JSON body.
    ///
    /// # Errors
    ///
    /// Returns transport, status or decoding errors.
    pub async fn send_json<B, R>(
        &self,
        method: Method,
        service: VraService,
        path: &str,
        params: &[(&str, String)],
        body: Option<&B>,
    ) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let response = self.execute(method, service, path, params, body).await?;

        response.json::<R>().await.map_err(|err| {
            Error::ParseError(format!(
                "Failed to parse {service} response for `{path}`: {err}"
            ))
        })
    }

    /// POST a body and return the id of the created object from the `Location` header.
    ///
    /// # Errors
    ///
    /// Returns transport or status errors, or [`Error::InvalidLocation`] when the header
    /// is missing or malformed.
    pub async fn post_for_location<B>(&self, path: &str, body: &B) -> Result<String>
    where
        B: Serialize + ?Sized,
    {
        let response = self
            .execute(Method::POST, self.service, path, &[], Some(body))
            .await?;
        let id = self.id_location.from_headers(response.headers())?;
        debug!(service = %self.service, path, id = %id, "Created vRA object");
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn mount_token(server: &MockServer) {
        Mock::given(method("POST"))
            .and(path("/identity/api/tokens"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "tok"})))
            .mount(server)
            .await;
    }

    async fn connect(server: &MockServer, service: VraService) -> ServiceClient {
        mount_token(server).await;
        let config = VraClientConfig::new(server.uri()).unwrap();
        ServiceClientBuilder::new(service, config)
            .unwrap()
            .connect(Credentials::new("admin", "secret", None))
            .await
            .unwrap()
    }

    #[test]
    fn test_client_config_new() {
        let config = ClientConfig::new();
        assert!(config.timeout.is_none());
        assert_eq!(
            config.connect_timeout,
            Duration::from_secs(DEFAULT_CONNECT_TIMEOUT)
        );
        assert!(config.enable_compression);
        assert!(!config.insecure_transport);
    }

    #[test]
    fn test_client_config_from_vra_config() {
        let vra = VraClientConfig::new("vra.example.com")
            .unwrap()
            .with_timeout(30);
        let config = ClientConfig::from_vra_config(&vra);
        assert_eq!(config.timeout, Some(Duration::from_secs(30)));
        assert!(config.insecure_transport);
    }

    #[test]
    fn test_client_config_builder() {
        let config = ClientConfig::new()
            .with_timeout(Duration::from_secs(60))
            .with_connect_timeout(Duration::from_secs(5))
            .with_compression(false)
            .with_insecure_transport(true);

        assert_eq!(config.timeout, Some(Duration::from_secs(60)));
        assert_eq!(config.connect_timeout, Duration::from_secs(5));
        assert!(!config.enable_compression);
        assert!(config.insecure_transport);
        assert!(config.build_http("vra-test").is_ok());
    }

    #[tokio::test]
    async fn connect_stores_session() {
        let server = MockServer::start().await;
        let client = connect(&server, VraService::Catalog).await;

        assert_eq!(client.token().expose(), "Bearer tok");
        assert_eq!(client.username(), "admin");
        assert_eq!(client.tenant(), "vsphere.local");
        assert_eq!(client.service(), VraService::Catalog);
        assert_eq!(client.id_location(), IdLocation::LastSegment);
    }

    #[tokio::test]
    async fn build_url_prefixes_service() {
        let server = MockServer::start().await;
        let client = connect(&server, VraService::Reservation).await;

        let url = client.build_url("/reservations/types").unwrap();
        assert_eq!(
            url.as_str(),
            format!("{}/reservation-service/api/reservations/types", server.uri())
        );

        let url = client
            .build_service_url(VraService::Identity, "tenants/qe/subtenants")
            .unwrap();
        assert!(url.path().ends_with("/identity/api/tenants/qe/subtenants"));
    }

    #[tokio::test]
    async fn execute_sends_standard_headers() {
        let server = MockServer::start().await;
        let client = connect(&server, VraService::Catalog).await;

        Mock::given(method("GET"))
            .and(path("/catalog-service/api/consumer/resources"))
            .and(header("Authorization", "Bearer tok"))
            .and(header("Accept", "application/json"))
            .and(header("Content-Type", "application/json"))
            .and(query_param("page", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"content": []})))
            .expect(1)
            .mount(&server)
            .await;

        let items: Vec<Value> = client
            .get_content(
                VraService::Catalog,
                "consumer/resources",
                &[("page", "2".to_string())],
            )
            .await
            .unwrap();
        assert!(items.is_empty());
    }

    #[tokio::test]
    async fn unexpected_status_carries_code_and_body() {
        let server = MockServer::start().await;
        let client = connect(&server, VraService::Catalog).await;

        for status in [202_u16, 204, 400, 404, 500, 503] {
            let route = format!("/catalog-service/api/status/{status}");
            Mock::given(method("GET"))
                .and(path(route.as_str()))
                .respond_with(ResponseTemplate::new(status).set_body_string("nope"))
                .mount(&server)
                .await;

            let err = client
                .get_json::<Value>(&format!("status/{status}"), &[])
                .await
                .unwrap_err();
            assert_eq!(err.exit_code(), i32::from(status));
            assert_eq!(err.status(), Some(status));
        }
    }

    #[tokio::test]
    async fn post_for_location_reads_header() {
        let server = MockServer::start().await;
        let client = connect(&server, VraService::Catalog).await;

        Mock::given(method("POST"))
            .and(path("/catalog-service/api/consumer/requests"))
            .and(body_json(json!({"catalogItemId": "item-1"})))
            .respond_with(ResponseTemplate::new(201).insert_header(
                "Location",
                "https://vra.example.com/catalog-service/api/consumer/requests/req-9",
            ))
            .mount(&server)
            .await;

        let id = client
            .post_for_location("consumer/requests", &json!({"catalogItemId": "item-1"}))
            .await
            .unwrap();
        assert_eq!(id, "req-9");
    }

    #[tokio::test]
    async fn login_uses_configured_tenant() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/identity/api/tokens"))
            .and(body_json(json!({
                "username": "ops",
                "password": "pw",
                "tenant": "qe"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "qe-tok"})))
            .expect(1)
            .mount(&server)
            .await;

        let config = VraClientConfig::new(server.uri())
            .unwrap()
            .with_tenant(Some("qe"));
        let client = ServiceClientBuilder::new(VraService::Catalog, config)
            .unwrap()
            .login("ops", "pw")
            .await
            .unwrap();
        assert_eq!(client.tenant(), "qe");
        assert_eq!(client.token().id(), "qe-tok");
    }

    #[tokio::test]
    async fn connect_fails_on_rejected_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/identity/api/tokens"))
            .respond_with(ResponseTemplate::new(400).set_body_string("bad tenant"))
            .mount(&server)
            .await;

        let config = VraClientConfig::new(server.uri()).unwrap();
        let err = ServiceClientBuilder::new(VraService::Reservation, config)
            .unwrap()
            .connect(Credentials::new("admin", "secret", Some("nope")))
            .await
            .unwrap_err();
        assert_eq!(err.exit_code(), 400);
    }
}
