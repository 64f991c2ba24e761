//! Error types for allow-list reconciliation.

/// Errors reported by a [`ClientDirectory`](crate::ClientDirectory) implementation.
#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    /// The management API could not be reached.
    #[error("Network error: {0}")]
    Network(String),

    /// The management API answered with a non-success status.
    #[error("HTTP error: status {status}: {message}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Message extracted from the response body.
        message: String,
    },

    /// The client identifier does not resolve to a client.
    #[error("Client not found: {0}")]
    ClientNotFound(String),

    /// Management credentials were rejected or no token could be obtained.
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// The response body could not be decoded.
    #[error("Failed to decode response: {0}")]
    Decode(String),
}

impl DirectoryError {
    /// Creates a new `Http` error.
    #[must_use]
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self::Http {
            status,
            message: message.into(),
        }
    }
}

/// Errors that terminate a reconciliation run.
///
/// Every variant is fatal. The no-op branch (URL already registered) is a
/// successful outcome, never an error.
#[derive(Debug, thiserror::Error)]
pub enum ReconcileError {
    /// One or more required configuration values are absent.
    #[error("Missing environment variables: {}", .missing.join(", "))]
    Configuration {
        /// Every missing item, in declaration order.
        missing: Vec<String>,
    },

    /// Reading the client record failed.
    #[error("Failed to fetch client {client_id}: {source}")]
    RemoteRead {
        /// Identifier of the client being read.
        client_id: String,
        /// Underlying directory failure.
        #[source]
        source: DirectoryError,
    },

    /// Submitting the merged allow-lists failed.
    #[error("Failed to patch client {client_id}: {source}")]
    RemoteWrite {
        /// Identifier of the client being updated.
        client_id: String,
        /// Underlying directory failure.
        #[source]
        source: DirectoryError,
    },
}

impl ReconcileError {
    /// Creates a new `Configuration` error.
    #[must_use]
    pub fn configuration<I, S>(missing: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Configuration {
            missing: missing.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns `true` if this error was raised before any remote call.
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration { .. })
    }

    /// Process exit status for this error.
    ///
    /// Configuration problems exit with 2, remote failures with 1.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Configuration { .. } => 2,
            Self::RemoteRead { .. } | Self::RemoteWrite { .. } => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_lists_every_item() {
        let err = ReconcileError::configuration(["AUTH0_DOMAIN", "DEPLOY_URL"]);
        assert_eq!(
            err.to_string(),
            "Missing environment variables: AUTH0_DOMAIN, DEPLOY_URL"
        );
        assert!(err.is_configuration());
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_remote_errors_display() {
        let err = ReconcileError::RemoteRead {
            client_id: "abc".into(),
            source: DirectoryError::ClientNotFound("abc".into()),
        };
        assert_eq!(
            err.to_string(),
            "Failed to fetch client abc: Client not found: abc"
        );
        assert_eq!(err.exit_code(), 1);

        let err = ReconcileError::RemoteWrite {
            client_id: "abc".into(),
            source: DirectoryError::http(400, "Payload validation error"),
        };
        assert_eq!(
            err.to_string(),
            "Failed to patch client abc: HTTP error: status 400: Payload validation error"
        );
        assert!(!err.is_configuration());
    }
}
