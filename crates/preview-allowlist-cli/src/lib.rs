//! Build-hook plumbing around `preview-allowlist-core`: option parsing,
//! dotenv loading, the Auth0 management API client and report rendering.

pub mod auth;
pub mod cli;
pub mod client;
pub mod config;
pub mod observability;
pub mod output;

use preview_allowlist_core::{ReconcileError, ReconcileOutcome, Reconciler};

use client::ManagementClient;
use config::Settings;

/// Registers the configured deploy URL on the configured client.
///
/// `settings` must already be validated; no remote call is made before this
/// function is entered.
pub async fn sync(
    settings: &Settings,
    dry_run: bool,
) -> Result<ReconcileOutcome, ReconcileError> {
    tracing::info!(url = %settings.context.primary_url(), "Deploy preview URL");
    if let Some(prime) = settings.context.secondary_url() {
        tracing::info!(url = %prime, "Deploy preview prime URL");
    }

    let directory = ManagementClient::new(settings.credentials.clone()).map_err(|source| {
        ReconcileError::RemoteRead {
            client_id: settings.client_id.clone(),
            source,
        }
    })?;

    let reconciler =
        Reconciler::new(directory, settings.client_id.as_str(), settings.context.clone())
            .with_dry_run(dry_run);
    reconciler.reconcile().await
}
