use std::time::Duration;

use async_trait::async_trait;
use preview_allowlist_core::{ClientDirectory, ClientRecord, DirectoryError, UpdatePayload};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::OnceCell;

use crate::auth::{self, ManagementCredentials};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Auth0 management API client for the `clients` resource.
///
/// The bearer token is requested on first use and reused for the rest of
/// the run.
pub struct ManagementClient {
    http: reqwest::Client,
    base_url: String,
    credentials: ManagementCredentials,
    token: OnceCell<String>,
}

impl ManagementClient {
    pub fn new(credentials: ManagementCredentials) -> Result<Self, DirectoryError> {
        Self::with_timeout(credentials, REQUEST_TIMEOUT)
    }

    pub fn with_timeout(
        credentials: ManagementCredentials,
        timeout: Duration,
    ) -> Result<Self, DirectoryError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DirectoryError::Network(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            http,
            base_url: credentials.base_url(),
            credentials,
            token: OnceCell::new(),
        })
    }

    fn client_url(&self, client_id: &str) -> String {
        format!("{}/api/v2/clients/{}", self.base_url, client_id)
    }

    async fn access_token(&self) -> Result<&str, DirectoryError> {
        let token = self
            .token
            .get_or_try_init(|| async {
                auth::client_credentials_token(&self.http, &self.credentials)
                    .await
                    .map(|t| t.access_token)
            })
            .await?;
        Ok(token.as_str())
    }

    async fn request(
        &self,
        method: reqwest::Method,
        url: &str,
    ) -> Result<reqwest::RequestBuilder, DirectoryError> {
        let token = self.access_token().await?;
        Ok(self
            .http
            .request(method, url)
            .bearer_auth(token)
            .header("Accept", "application/json"))
    }
}

#[async_trait]
impl ClientDirectory for ManagementClient {
    async fn fetch_client(&self, client_id: &str) -> Result<ClientRecord, DirectoryError> {
        let url = self.client_url(client_id);
        let resp = self
            .request(reqwest::Method::GET, &url)
            .await?
            .send()
            .await
            .map_err(|e| DirectoryError::Network(e.to_string()))?;
        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(DirectoryError::ClientNotFound(client_id.to_string()));
        }
        handle_response(resp).await
    }

    async fn update_client(
        &self,
        client_id: &str,
        payload: &UpdatePayload,
    ) -> Result<ClientRecord, DirectoryError> {
        let url = self.client_url(client_id);
        let resp = self
            .request(reqwest::Method::PATCH, &url)
            .await?
            .json(payload)
            .send()
            .await
            .map_err(|e| DirectoryError::Network(e.to_string()))?;
        handle_response(resp).await
    }
}

async fn handle_response<T: DeserializeOwned>(
    resp: reqwest::Response,
) -> Result<T, DirectoryError> {
    let status = resp.status();
    let body = resp
        .text()
        .await
        .map_err(|e| DirectoryError::Network(e.to_string()))?;

    if !status.is_success() {
        return Err(DirectoryError::http(status.as_u16(), error_message(&body)));
    }

    serde_json::from_str(&body).map_err(|e| DirectoryError::Decode(e.to_string()))
}

/// Picks the human-readable part of an Auth0 error body, falling back to the
/// raw body.
pub(crate) fn error_message(body: &str) -> String {
    if let Ok(json) = serde_json::from_str::<Value>(body) {
        for key in ["message", "error_description", "error"] {
            if let Some(msg) = json.get(key).and_then(|v| v.as_str())
                && !msg.is_empty()
            {
                return msg.to_string();
            }
        }
    }
    body.to_string()
}
