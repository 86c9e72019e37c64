//! Identity service authentication.
//!
//! A vRA session starts with one `POST /identity/api/tokens` call that trades a username,
//! password and tenant for a bearer token. The token is sent on every later request.

use crate::client::{check_status, JSON_CONTENT_TYPE};
use crate::types::{VraService, DEFAULT_TENANT};
use crate::{Error, Result};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use url::Url;

/// Prefix the identity service expects in the `Authorization` header.
pub const BEARER_PREFIX: &str = "Bearer ";

/// Username, password and tenant used to obtain a token.
#[derive(Debug)]
pub struct Credentials {
    username: String,
    password: SecretString,
    tenant: String,
}

impl Credentials {
    /// Create credentials. `None` selects the default tenant.
    #[must_use]
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        tenant: Option<&str>,
    ) -> Self {
        let password: String = password.into();
        Self {
            username: username.into(),
            password: SecretString::new(password.into_boxed_str()),
            tenant: tenant.unwrap_or(DEFAULT_TENANT).to_string(),
        }
    }

    /// Account name.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Tenant the account belongs to.
    #[must_use]
    pub fn tenant(&self) -> &str {
        &self.tenant
    }

    /// Replace the tenant.
    #[must_use]
    pub fn with_tenant(mut self, tenant: impl Into<String>) -> Self {
        self.tenant = tenant.into();
        self
    }
}

/// Bearer token issued by the identity service, including the `Bearer ` prefix.
#[derive(Debug)]
pub struct BearerToken(SecretString);

impl BearerToken {
    /// Wrap a raw token id as returned in the identity response.
    #[must_use]
    pub fn from_id(id: &str) -> Self {
        Self(SecretString::new(format!("{BEARER_PREFIX}{id}").into()))
    }

    /// Full `Authorization` header value.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }

    /// Token id without the `Bearer ` prefix.
    #[must_use]
    pub fn id(&self) -> &str {
        self.expose()
            .strip_prefix(BEARER_PREFIX)
            .unwrap_or_else(|| self.expose())
    }
}

#[derive(Serialize)]
struct TokenRequest<'a> {
    username: &'a str,
    password: &'a str,
    tenant: &'a str,
}

#[derive(Deserialize)]
struct TokenResponse {
    id: Option<String>,
}

/// Exchange credentials for a bearer token.
///
/// # Errors
///
/// Returns [`Error::UnexpectedStatus`] for any status other than 200/201 and
/// [`Error::MissingField`] when the response carries no `id`.
pub async fn authenticate(
    http: &Client,
    base_url: &Url,
    credentials: &Credentials,
) -> Result<BearerToken> {
    let path = format!("{}/tokens", VraService::Identity.api_prefix());
    let url = base_url
        .join(&path)
        .map_err(|err| Error::InvalidEndpoint(format!("Invalid identity path `{path}`: {err}")))?;

    let body = TokenRequest {
        username: &credentials.username,
        password: credentials.password.expose_secret(),
        tenant: &credentials.tenant,
    };

    info!(
        username = %credentials.username,
        tenant = %credentials.tenant,
        "Requesting vRA bearer token"
    );

    let response = http
        .post(url)
        .header(CONTENT_TYPE, JSON_CONTENT_TYPE)
        .header(ACCEPT, JSON_CONTENT_TYPE)
        .json(&body)
        .send()
        .await?;

    let response = check_status(response).await?;
    let token: TokenResponse = response.json().await.map_err(|err| {
        Error::ParseError(format!("Failed to parse identity token response: {err}"))
    })?;

    let id = token
        .id
        .ok_or_else(|| Error::MissingField("id".to_string()))?;

    debug!(username = %credentials.username, "Authenticated against vRA identity service");
    Ok(BearerToken::from_id(&id))
}
