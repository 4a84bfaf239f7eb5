//! Bearer-token sources for the calendar API.
//!
//! Two sources are supported: a fixed token (handy for local testing with a
//! token copied from Graph Explorer) and the OAuth2 client-credentials grant
//! against a Microsoft identity platform tenant.

use async_trait::async_trait;
use calagent_config::CredentialsConfig;
use calagent_core::error::CalendarError;
use serde::Deserialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Default identity platform authority.
pub const DEFAULT_AUTHORITY: &str = "https://login.microsoftonline.com";

/// Scope requested for application permissions on Microsoft Graph.
pub const GRAPH_SCOPE: &str = "https://graph.microsoft.com/.default";

/// Tokens are refreshed this long before they actually expire.
const EXPIRY_MARGIN: Duration = Duration::from_secs(60);

/// Supplies the bearer token attached to calendar requests.
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Return a valid access token, fetching a new one if needed.
    async fn bearer_token(&self) -> Result<String, CalendarError>;
}

/// A fixed, pre-acquired access token.
pub struct StaticToken {
    token: String,
}

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

#[async_trait]
impl CredentialProvider for StaticToken {
    fn name(&self) -> &str {
        "static"
    }

    async fn bearer_token(&self) -> Result<String, CalendarError> {
        Ok(self.token.clone())
    }
}

/// Stands in when no credentials are configured; every request fails with
/// [`CalendarError::NotConfigured`], which the tools report as text.
pub struct MissingCredentials;

#[async_trait]
impl CredentialProvider for MissingCredentials {
    fn name(&self) -> &str {
        "missing"
    }

    async fn bearer_token(&self) -> Result<String, CalendarError> {
        Err(CalendarError::NotConfigured(
            "set GRAPH_ACCESS_TOKEN, or TENANT_ID, CLIENT_ID and CLIENT_SECRET".into(),
        ))
    }
}

struct CachedToken {
    access_token: String,
    expires_at: Instant,
}

/// OAuth2 client-credentials grant with an in-process token cache.
pub struct ClientCredentials {
    token_url: String,
    client_id: String,
    client_secret: String,
    client: reqwest::Client,
    cached: Mutex<Option<CachedToken>>,
}

impl ClientCredentials {
    pub fn new(
        authority: &str,
        tenant_id: &str,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        client: reqwest::Client,
    ) -> Self {
        Self {
            token_url: format!(
                "{}/{tenant_id}/oauth2/v2.0/token",
                authority.trim_end_matches('/')
            ),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            client,
            cached: Mutex::new(None),
        }
    }

    async fn fetch(&self) -> Result<CachedToken, CalendarError> {
        debug!(url = %self.token_url, "Requesting client-credentials token");

        let response = self
            .client
            .post(&self.token_url)
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("scope", GRAPH_SCOPE),
            ])
            .send()
            .await
            .map_err(|e| CalendarError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "Token request rejected");
            return Err(CalendarError::Unauthorized(format!(
                "token endpoint returned {}: {body}",
                status.as_u16()
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| CalendarError::Decode(e.to_string()))?;

        let lifetime = Duration::from_secs(token.expires_in).saturating_sub(EXPIRY_MARGIN);
        Ok(CachedToken {
            access_token: token.access_token,
            expires_at: Instant::now() + lifetime,
        })
    }
}

#[async_trait]
impl CredentialProvider for ClientCredentials {
    fn name(&self) -> &str {
        "client_credentials"
    }

    async fn bearer_token(&self) -> Result<String, CalendarError> {
        let mut cached = self.cached.lock().await;
        if let Some(token) = cached.as_ref() {
            if Instant::now() < token.expires_at {
                return Ok(token.access_token.clone());
            }
        }

        let fresh = self.fetch().await?;
        let access_token = fresh.access_token.clone();
        *cached = Some(fresh);
        Ok(access_token)
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: u64,
}

fn default_expires_in() -> u64 {
    3600
}

/// Pick a credential source from configuration.
///
/// A configured access token wins over client credentials. Without either,
/// the returned source fails every request.
pub fn from_config(
    config: &CredentialsConfig,
    client: reqwest::Client,
) -> Arc<dyn CredentialProvider> {
    if let Some(token) = config.access_token.as_deref().filter(|t| !t.is_empty()) {
        info!("Using static Graph access token");
        return Arc::new(StaticToken::new(token));
    }

    match (
        config.tenant_id.as_deref(),
        config.client_id.as_deref(),
        config.client_secret.as_deref(),
    ) {
        (Some(tenant), Some(id), Some(secret)) => {
            let authority = config.authority_url.as_deref().unwrap_or(DEFAULT_AUTHORITY);
            info!(tenant = %tenant, "Using client-credentials grant");
            Arc::new(ClientCredentials::new(authority, tenant, id, secret, client))
        }
        _ => {
            warn!("No calendar credentials configured; calendar tools will report errors");
            Arc::new(MissingCredentials)
        }
    }
}
