use std::fmt;

use preview_allowlist_core::DirectoryError;
use serde::Deserialize;

use crate::client::error_message;

/// Scopes requested for the management token.
pub const MANAGEMENT_SCOPE: &str = "read:clients update:clients";

/// Credentials of the machine-to-machine application used to call the
/// management API.
#[derive(Clone)]
pub struct ManagementCredentials {
    domain: String,
    client_id: String,
    client_secret: String,
}

impl ManagementCredentials {
    pub fn new(
        domain: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self {
            domain: domain.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// Tenant base URL without a trailing slash.
    ///
    /// A bare host is served over https; a value that already carries a
    /// scheme is used as is.
    pub fn base_url(&self) -> String {
        let domain = self.domain.trim_end_matches('/');
        if domain.starts_with("https://") || domain.starts_with("http://") {
            domain.to_string()
        } else {
            format!("https://{domain}")
        }
    }

    /// Audience of the management API.
    pub fn audience(&self) -> String {
        format!("{}/api/v2/", self.base_url())
    }
}

impl fmt::Debug for ManagementCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManagementCredentials")
            .field("domain", &self.domain)
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub expires_in: Option<u64>,
}

/// Exchanges the management credentials for a bearer token
/// (`client_credentials` grant).
pub async fn client_credentials_token(
    http: &reqwest::Client,
    credentials: &ManagementCredentials,
) -> Result<TokenResponse, DirectoryError> {
    let body = url::form_urlencoded::Serializer::new(String::new())
        .append_pair("grant_type", "client_credentials")
        .append_pair("client_id", &credentials.client_id)
        .append_pair("client_secret", &credentials.client_secret)
        .append_pair("audience", &credentials.audience())
        .append_pair("scope", MANAGEMENT_SCOPE)
        .finish();

    let resp = http
        .post(format!("{}/oauth/token", credentials.base_url()))
        .header("Content-Type", "application/x-www-form-urlencoded")
        .body(body)
        .send()
        .await
        .map_err(|e| DirectoryError::Network(e.to_string()))?;

    if !resp.status().is_success() {
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        return Err(DirectoryError::Authentication(format!(
            "token request failed (HTTP {status}): {}",
            error_message(&body)
        )));
    }

    let token: TokenResponse = resp
        .json()
        .await
        .map_err(|e| DirectoryError::Decode(format!("token response: {e}")))?;
    tracing::debug!(expires_in = ?token.expires_in, "Obtained management API token");
    Ok(token)
}
