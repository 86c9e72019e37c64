//! Asynchronous reservation client implementation.

use crate::models::{BusinessGroup, FieldValuesRequest, Reservation};
use crate::Result;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::debug;
use url::Url;
use vra_core::auth::{BearerToken, Credentials};
use vra_core::client::{ClientConfig, ServiceClient, ServiceClientBuilder};
use vra_core::display::into_listing;
use vra_core::location::{IdLocation, RESERVATION_ID_SEGMENT};
use vra_core::types::{ListFormat, Listing, VraService, DEFAULT_TENANT};
use vra_core::{Error, VraClientConfig};

const USER_AGENT: &str = concat!("vra-reservation/", env!("CARGO_PKG_VERSION"));

/// Id position used by older deployments when reading reservation `Location` headers.
pub const LEGACY_RESERVATION_ID_LOCATION: IdLocation = IdLocation::Segment(RESERVATION_ID_SEGMENT);

/// Builder for [`ReservationClient`].
#[derive(Debug, Clone)]
pub struct ReservationClientBuilder {
    inner: ServiceClientBuilder,
}

impl ReservationClientBuilder {
    /// Create a builder from a vRA configuration.
    pub fn new(config: VraClientConfig) -> Result<Self> {
        let builder = ServiceClientBuilder::new(VraService::Reservation, config)?
            .with_user_agent(USER_AGENT);

        Ok(Self { inner: builder })
    }

    /// Override the HTTP client configuration.
    #[must_use]
    pub fn with_http_config(mut self, config: ClientConfig) -> Self {
        self.inner = self.inner.with_http_config(config);
        self
    }

    /// Override how reservation ids are read from `Location` headers.
    #[must_use]
    pub fn with_id_location(mut self, id_location: IdLocation) -> Self {
        self.inner = self.inner.with_id_location(id_location);
        self
    }

    /// Authenticate with explicit credentials and build the client.
    pub async fn connect(self, credentials: Credentials) -> Result<ReservationClient> {
        let inner = self.inner.connect(credentials).await?;
        Ok(ReservationClient { inner })
    }

    /// Authenticate against the configured tenant and build the client.
    pub async fn login(
        self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<ReservationClient> {
        let inner = self.inner.login(username, password).await?;
        Ok(ReservationClient { inner })
    }
}

/// Asynchronous client for reservation management.
///
/// Reservation calls go to the reservation service; business group lookups go to the
/// identity service of the same appliance with the same token.
#[derive(Debug)]
pub struct ReservationClient {
    inner: ServiceClient,
}

impl ReservationClient {
    /// Connect to `host` and authenticate. `None` selects the `vsphere.local` tenant.
    pub async fn connect(
        host: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
        tenant: Option<&str>,
    ) -> Result<Self> {
        let config = VraClientConfig::new(host)?.with_tenant(tenant);
        ReservationClientBuilder::new(config)?
            .login(username, password)
            .await
    }

    /// Start a builder from a vRA configuration.
    pub fn builder(config: VraClientConfig) -> Result<ReservationClientBuilder> {
        ReservationClientBuilder::new(config)
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

    /// List the reservation types known to the appliance.
    pub async fn get_reservation_types(&self) -> Result<Vec<Value>> {
        self.inner
            .get_content(VraService::Reservation, "reservations/types", &[])
            .await
    }

    /// Field definitions of a reservation type's default schema.
    pub async fn get_reservation_schema(&self, schema_class_id: &str) -> Result<Vec<Value>> {
        let path = format!("data-service/schema/{schema_class_id}/default");
        let mut schema: Value = self.inner.get_json(&path, &[]).await?;

        match schema.get_mut("fields").map(Value::take) {
            Some(Value::Array(fields)) => Ok(fields),
            Some(_) | None => Err(Error::MissingField("fields".to_string())),
        }
    }

    /// Raw subtenant collection of a tenant. `None` queries `vsphere.local`.
    ///
    /// The whole payload is returned; use [`Self::find_business_group_id`] to look up a
    /// single group by name.
    pub async fn get_business_group_id(&self, tenant: Option<&str>) -> Result<Value> {
        self.identity_get(&subtenants_path(tenant)).await
    }

    /// Id of the business group called `name`, if the tenant has one.
    pub async fn find_business_group_id(
        &self,
        tenant: Option<&str>,
        name: &str,
    ) -> Result<Option<String>> {
        let groups = self.list_business_groups(tenant).await?;
        Ok(groups
            .into_iter()
            .find(|group| group.name == name)
            .map(|group| group.id))
    }

    /// Business groups of a tenant. `None` queries `vsphere.local`.
    pub async fn list_business_groups(&self, tenant: Option<&str>) -> Result<Vec<BusinessGroup>> {
        self.inner
            .get_content(VraService::Identity, &subtenants_path(tenant), &[])
            .await
    }

    /// Business groups of a tenant as an id/name table or as the raw `content` list.
    pub async fn get_all_business_groups(
        &self,
        tenant: Option<&str>,
        format: ListFormat,
    ) -> Result<Listing> {
        let groups: Vec<Value> = self
            .inner
            .get_content(VraService::Identity, &subtenants_path(tenant), &[])
            .await?;
        Ok(into_listing(groups, format))
    }

    /// Compute resources a reservation of the given type can be placed on.
    pub async fn get_compute_resource_for_reservation(&self, schema_class_id: &str) -> Result<Value> {
        let path = format!("data-service/schema/{schema_class_id}/default/computeResource/values");
        self.post_json(&path, &json!({})).await
    }

    /// Permissible values of `field_id` for a reservation on the given compute resource.
    pub async fn get_resource_schema_for_reservation(
        &self,
        schema_class_id: &str,
        field_id: &str,
        compute_resource_id: &str,
    ) -> Result<Value> {
        let path = format!("data-service/schema/{schema_class_id}/default/{field_id}/values");
        let body = FieldValuesRequest::for_compute_resource(compute_resource_id);
        self.post_json(&path, &body).await
    }

    /// Create a reservation and return its id.
    pub async fn create_reservation<B>(&self, payload: &B) -> Result<String>
    where
        B: Serialize + ?Sized,
    {
        let id = self.inner.post_for_location("reservations", payload).await?;
        debug!(reservation_id = %id, "Created reservation");
        Ok(id)
    }

    /// Fetch a reservation by id.
    pub async fn get_reservation(&self, id: &str) -> Result<Value> {
        let path = format!("reservations/{id}");
        self.inner.get_json(&path, &[]).await
    }

    /// Fetch a reservation by id as compact JSON text.
    pub async fn get_reservation_string(&self, id: &str) -> Result<String> {
        let reservation = self.get_reservation(id).await?;
        Ok(serde_json::to_string(&reservation)?)
    }

    /// All reservations visible to the current user.
    pub async fn list_reservations(&self) -> Result<Vec<Reservation>> {
        self.inner
            .get_content(VraService::Reservation, "reservations", &[])
            .await
    }

    /// All reservations as an id/name table or as the raw `content` list.
    pub async fn get_all_reservations(&self, format: ListFormat) -> Result<Listing> {
        let reservations: Vec<Value> = self
            .inner
            .get_content(VraService::Reservation, "reservations", &[])
            .await?;
        Ok(into_listing(reservations, format))
    }

    async fn identity_get<T>(&self, path: &str) -> Result<T>
    where
        T: DeserializeOwned,
    {
        self.inner
            .send_json::<(), T>(Method::GET, VraService::Identity, path, &[], None)
            .await
    }

    async fn post_json<B>(&self, path: &str, body: &B) -> Result<Value>
    where
        B: Serialize + ?Sized,
    {
        self.inner
            .send_json(Method::POST, VraService::Reservation, path, &[], Some(body))
            .await
    }
}

fn subtenants_path(tenant: Option<&str>) -> String {
    format!("tenants/{}/subtenants", tenant.unwrap_or(DEFAULT_TENANT))
}
