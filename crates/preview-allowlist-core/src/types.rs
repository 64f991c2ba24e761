//! Data types exchanged between the reconciler and the remote client.

use serde::{Deserialize, Serialize};

use crate::expand::expand_urls_for;

/// Current state of a remote authorization client.
///
/// Only the allow-list fields are modelled; anything else the management API
/// returns is ignored. A field missing from the response reads as empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientRecord {
    /// Client identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,

    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Origins allowed to use this client. Gates the membership check.
    #[serde(default)]
    pub allowed_clients: Vec<String>,

    /// Origins allowed for web-message and silent authentication.
    #[serde(default)]
    pub web_origins: Vec<String>,

    /// Origins allowed to make cross-origin requests.
    #[serde(default)]
    pub allowed_origins: Vec<String>,

    /// Fully qualified callback URLs.
    #[serde(default)]
    pub callbacks: Vec<String>,

    /// Fully qualified post-logout redirect URLs.
    #[serde(default)]
    pub allowed_logout_urls: Vec<String>,
}

/// Input of a single reconciliation run.
///
/// Built once from validated configuration and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentContext {
    primary_url: String,
    secondary_url: Option<String>,
    callback_path_templates: String,
    logout_path_templates: String,
}

impl DeploymentContext {
    /// Creates a context for a deploy URL and its comma-separated path templates.
    #[must_use]
    pub fn new(
        primary_url: impl Into<String>,
        callback_path_templates: impl Into<String>,
        logout_path_templates: impl Into<String>,
    ) -> Self {
        Self {
            primary_url: primary_url.into(),
            secondary_url: None,
            callback_path_templates: callback_path_templates.into(),
            logout_path_templates: logout_path_templates.into(),
        }
    }

    /// Sets the canonical ("prime") deploy URL. An empty string means none.
    #[must_use]
    pub fn with_secondary_url(mut self, url: Option<impl Into<String>>) -> Self {
        self.secondary_url = url.map(Into::<String>::into).filter(|u| !u.is_empty());
        self
    }

    /// The per-build deploy URL.
    pub fn primary_url(&self) -> &str {
        &self.primary_url
    }

    /// The canonical deploy URL, when one is configured.
    pub fn secondary_url(&self) -> Option<&str> {
        self.secondary_url.as_deref()
    }

    pub fn callback_path_templates(&self) -> &str {
        &self.callback_path_templates
    }

    pub fn logout_path_templates(&self) -> &str {
        &self.logout_path_templates
    }

    /// Origins to register: the primary URL, then the secondary URL if any.
    pub fn origins(&self) -> Vec<String> {
        std::iter::once(self.primary_url.clone())
            .chain(self.secondary_url.clone())
            .collect()
    }

    /// Fully qualified callback URLs for both base URLs, primary first.
    pub fn callback_urls(&self) -> Vec<String> {
        expand_urls_for(self, &self.callback_path_templates)
    }

    /// Fully qualified logout URLs for both base URLs, primary first.
    pub fn logout_urls(&self) -> Vec<String> {
        expand_urls_for(self, &self.logout_path_templates)
    }
}

/// Allow-list values submitted to the remote client in one update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdatePayload {
    pub allowed_clients: Vec<String>,
    pub web_origins: Vec<String>,
    pub allowed_origins: Vec<String>,
    pub callbacks: Vec<String>,
    pub allowed_logout_urls: Vec<String>,
}

impl UpdatePayload {
    /// Appends the values derived from `context` to each field of `record`.
    ///
    /// Existing entries keep their order and are never removed or
    /// deduplicated. Only called once the membership check has failed.
    pub(crate) fn merge(record: &ClientRecord, context: &DeploymentContext) -> Self {
        let origins = context.origins();
        Self {
            allowed_clients: append(&record.allowed_clients, &origins),
            web_origins: append(&record.web_origins, &origins),
            allowed_origins: append(&record.allowed_origins, &origins),
            callbacks: append(&record.callbacks, &context.callback_urls()),
            allowed_logout_urls: append(&record.allowed_logout_urls, &context.logout_urls()),
        }
    }

    /// The record the remote client should hold once this payload is applied.
    #[must_use]
    pub fn apply_to(&self, record: &ClientRecord) -> ClientRecord {
        ClientRecord {
            client_id: record.client_id.clone(),
            name: record.name.clone(),
            allowed_clients: self.allowed_clients.clone(),
            web_origins: self.web_origins.clone(),
            allowed_origins: self.allowed_origins.clone(),
            callbacks: self.callbacks.clone(),
            allowed_logout_urls: self.allowed_logout_urls.clone(),
        }
    }
}

fn append(existing: &[String], derived: &[String]) -> Vec<String> {
    existing.iter().chain(derived).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context() -> DeploymentContext {
        DeploymentContext::new("https://deploy-123.example", "auth/callback", "auth/logout")
    }

    #[test]
    fn test_client_record_missing_fields_default_to_empty() {
        let record: ClientRecord = serde_json::from_str(
            r#"{"client_id":"abc","name":"Storefront","callbacks":["https://a/cb"],"grant_types":["implicit"]}"#,
        )
        .unwrap();

        assert_eq!(record.name.as_deref(), Some("Storefront"));
        assert_eq!(record.callbacks, vec!["https://a/cb"]);
        assert!(record.allowed_clients.is_empty());
        assert!(record.allowed_logout_urls.is_empty());
    }

    #[test]
    fn test_empty_secondary_url_is_absent() {
        let ctx = context().with_secondary_url(Some(""));
        assert_eq!(ctx.secondary_url(), None);
        assert_eq!(ctx.origins(), vec!["https://deploy-123.example"]);
    }

    #[test]
    fn test_origins_primary_first() {
        let ctx = context().with_secondary_url(Some("https://main--site.example"));
        assert_eq!(
            ctx.origins(),
            vec!["https://deploy-123.example", "https://main--site.example"]
        );
    }

    #[test]
    fn test_merge_appends_without_touching_existing_entries() {
        let record = ClientRecord {
            allowed_clients: vec!["https://b".into(), "https://a".into(), "https://b".into()],
            web_origins: vec!["https://w".into()],
            allowed_origins: vec![],
            callbacks: vec!["https://a/auth/callback".into()],
            allowed_logout_urls: vec!["https://a/auth/logout".into()],
            ..Default::default()
        };

        let payload = UpdatePayload::merge(&record, &context());

        assert_eq!(
            payload.allowed_clients,
            vec!["https://b", "https://a", "https://b", "https://deploy-123.example"]
        );
        assert_eq!(
            payload.web_origins,
            vec!["https://w", "https://deploy-123.example"]
        );
        assert_eq!(payload.allowed_origins, vec!["https://deploy-123.example"]);
        assert_eq!(
            payload.callbacks,
            vec![
                "https://a/auth/callback",
                "https://deploy-123.example/auth/callback"
            ]
        );
        assert_eq!(
            payload.allowed_logout_urls,
            vec![
                "https://a/auth/logout",
                "https://deploy-123.example/auth/logout"
            ]
        );
    }

    #[test]
    fn test_merge_with_secondary_url() {
        let ctx = DeploymentContext::new("https://p", "cb,cb2", "out")
            .with_secondary_url(Some("https://s"));
        let payload = UpdatePayload::merge(&ClientRecord::default(), &ctx);

        assert_eq!(payload.allowed_clients, vec!["https://p", "https://s"]);
        assert_eq!(
            payload.callbacks,
            vec!["https://p/cb", "https://p/cb2", "https://s/cb", "https://s/cb2"]
        );
        assert_eq!(payload.allowed_logout_urls, vec!["https://p/out", "https://s/out"]);
    }

    #[test]
    fn test_payload_serializes_only_allow_lists() {
        let payload = UpdatePayload::merge(&ClientRecord::default(), &context());
        let value = serde_json::to_value(&payload).unwrap();
        let keys: Vec<&str> = value
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(keys.len(), 5);
        assert!(keys.contains(&"allowed_logout_urls"));
        assert!(!keys.contains(&"client_id"));
    }
}
