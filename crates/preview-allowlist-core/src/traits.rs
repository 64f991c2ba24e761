//! The seam between the reconciler and the remote authorization service.

use async_trait::async_trait;

use crate::error::DirectoryError;
use crate::types::{ClientRecord, UpdatePayload};

/// Read/write access to authorization client records.
///
/// The reconciler calls [`fetch_client`](Self::fetch_client) exactly once per
/// run and [`update_client`](Self::update_client) at most once, strictly after
/// the fetch has completed. Implementations own timeouts and authentication.
#[async_trait]
pub trait ClientDirectory: Send + Sync {
    /// Reads the current state of a client.
    ///
    /// # Errors
    ///
    /// Returns `DirectoryError::ClientNotFound` if the identifier does not
    /// resolve, or any other variant for transport and credential failures.
    async fn fetch_client(&self, client_id: &str) -> Result<ClientRecord, DirectoryError>;

    /// Applies the merged allow-lists to a client in a single request.
    ///
    /// Returns the client as stored after the update.
    async fn update_client(
        &self,
        client_id: &str,
        payload: &UpdatePayload,
    ) -> Result<ClientRecord, DirectoryError>;
}

#[async_trait]
impl<T: ClientDirectory + ?Sized> ClientDirectory for std::sync::Arc<T> {
    async fn fetch_client(&self, client_id: &str) -> Result<ClientRecord, DirectoryError> {
        (**self).fetch_client(client_id).await
    }

    async fn update_client(
        &self,
        client_id: &str,
        payload: &UpdatePayload,
    ) -> Result<ClientRecord, DirectoryError> {
        (**self).update_client(client_id, payload).await
    }
}
