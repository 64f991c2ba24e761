//! The reconciliation run: read, decide, and at most one write.

use crate::error::ReconcileError;
use crate::expand::is_registered;
use crate::traits::ClientDirectory;
use crate::types::{ClientRecord, DeploymentContext, UpdatePayload};

/// How a reconciliation run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// The deploy URL was already registered. Nothing was written.
    Unchanged {
        /// The record as read.
        client: ClientRecord,
    },
    /// The merged allow-lists were submitted and accepted.
    Updated {
        /// The record returned by the update call.
        client: ClientRecord,
        /// What was submitted.
        payload: UpdatePayload,
    },
    /// Dry run: an update was required but not submitted.
    Planned {
        /// The record as read.
        client: ClientRecord,
        /// What would have been submitted.
        payload: UpdatePayload,
    },
}

impl ReconcileOutcome {
    /// Short machine-readable status.
    pub fn status(&self) -> &'static str {
        match self {
            Self::Unchanged { .. } => "unchanged",
            Self::Updated { .. } => "updated",
            Self::Planned { .. } => "planned",
        }
    }

    /// `true` if the remote client was modified.
    pub fn is_updated(&self) -> bool {
        matches!(self, Self::Updated { .. })
    }

    pub fn client(&self) -> &ClientRecord {
        match self {
            Self::Unchanged { client }
            | Self::Updated { client, .. }
            | Self::Planned { client, .. } => client,
        }
    }

    pub fn payload(&self) -> Option<&UpdatePayload> {
        match self {
            Self::Unchanged { .. } => None,
            Self::Updated { payload, .. } | Self::Planned { payload, .. } => Some(payload),
        }
    }

    /// The allowed origins the remote client holds (or would hold, for a dry run).
    pub fn allowed_clients(&self) -> &[String] {
        match self {
            Self::Unchanged { client } | Self::Updated { client, .. } => &client.allowed_clients,
            Self::Planned { payload, .. } => &payload.allowed_clients,
        }
    }
}

/// Registers a deploy URL on one authorization client.
///
/// The reconciler reads the client once, decides, and writes at most once.
/// There is no version check between the read and the write: a concurrent
/// run registering the same URL in between is not detected.
pub struct Reconciler<D> {
    directory: D,
    client_id: String,
    context: DeploymentContext,
    dry_run: bool,
}

impl<D: ClientDirectory> Reconciler<D> {
    /// Creates a reconciler for `client_id`.
    ///
    /// `context` must come from validated configuration: a non-empty primary
    /// URL is assumed.
    pub fn new(directory: D, client_id: impl Into<String>, context: DeploymentContext) -> Self {
        Self {
            directory,
            client_id: client_id.into(),
            context,
            dry_run: false,
        }
    }

    /// Computes the update without submitting it.
    #[must_use]
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Decides what to submit for `record`, or `None` if the deploy URL is
    /// already registered.
    pub fn plan(&self, record: &ClientRecord) -> Option<UpdatePayload> {
        if is_registered(&record.allowed_clients, self.context.primary_url()) {
            return None;
        }
        Some(UpdatePayload::merge(record, &self.context))
    }

    /// Runs one reconciliation.
    ///
    /// # Errors
    ///
    /// Returns `ReconcileError::RemoteRead` if the client cannot be read and
    /// `ReconcileError::RemoteWrite` if the update is rejected. Neither is
    /// retried.
    pub async fn reconcile(&self) -> Result<ReconcileOutcome, ReconcileError> {
        let client = self
            .directory
            .fetch_client(&self.client_id)
            .await
            .map_err(|source| ReconcileError::RemoteRead {
                client_id: self.client_id.clone(),
                source,
            })?;

        tracing::info!(
            client_id = %self.client_id,
            name = client.name.as_deref().unwrap_or("-"),
            "Retrieved client"
        );

        let Some(payload) = self.plan(&client) else {
            tracing::info!(
                url = %self.context.primary_url(),
                "URL has already been added to the client"
            );
            return Ok(ReconcileOutcome::Unchanged { client });
        };

        tracing::info!(
            url = %self.context.primary_url(),
            "URL has not yet been added to the client"
        );

        if self.dry_run {
            tracing::info!("Dry run, skipping client update");
            return Ok(ReconcileOutcome::Planned { client, payload });
        }

        match self.directory.update_client(&self.client_id, &payload).await {
            Ok(client) => {
                tracing::info!(
                    client_id = %self.client_id,
                    allowed_clients = ?client.allowed_clients,
                    "Patched client"
                );
                Ok(ReconcileOutcome::Updated { client, payload })
            }
            Err(source) => Err(ReconcileError::RemoteWrite {
                client_id: self.client_id.clone(),
                source,
            }),
        }
    }
}
