//! Error types for the HealthSync agent
//!
//! The `Display` strings of the precondition variants double as the
//! user-visible status messages persisted by the orchestrator, so they are
//! part of the product surface and must stay stable.

use thiserror::Error;

/// Errors surfaced by the sync core
#[derive(Error, Debug)]
pub enum SyncError {
    /// Server URL or API token is not configured
    #[error("Missing server URL or token")]
    MissingConfig,

    /// The health-data backend is not installed or not supported on this host
    #[error("Health provider not available")]
    ProviderUnavailable,

    /// Required read scopes have not been granted
    #[error("Permissions not granted")]
    PermissionDenied,

    /// The provider itself failed while answering a record query
    #[error("Provider error: {0}")]
    Provider(String),

    /// Transport-level or non-2xx failure while submitting a payload
    #[error("HTTP error: {0}")]
    Http(String),

    /// The settings store could not be read or persisted
    #[error("Store error: {0}")]
    Store(String),
}
