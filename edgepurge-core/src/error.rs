//! Unified error type definition

use serde::Serialize;
use thiserror::Error;

// Re-export library error type
pub use edgepurge_provider::{CredentialValidationError, PurgeError};

/// Core layer error type
#[derive(Error, Debug, Serialize)]
#[serde(tag = "code", content = "details")]
pub enum CoreError {
    /// Persisted state could not be read or written
    #[error("Storage error: {0}")]
    StorageError(String),

    /// Settings file missing required structure or holding invalid values
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Validation error
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Credential fields failed local checks (structured, field level)
    #[error("{0}")]
    CredentialValidation(CredentialValidationError),

    /// The provider rejected the credentials
    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),

    /// The provider did not answer within the configured bound
    #[error("Timed out: {0}")]
    Timeout(String),

    /// Credential check failed for a reason other than rejection or timeout
    #[error("Unknown provider error: {0}")]
    UnknownProvider(String),

    /// No zone configured and the account does not have exactly one zone
    #[error("Zone not configured: {0}")]
    ZoneNotConfigured(String),

    /// A runtime dependency is missing
    #[error("Dependency unavailable: {0}")]
    DependencyUnavailable(String),

    /// Provider error (converting from library)
    #[error("{0}")]
    Provider(#[from] PurgeError),
}

impl CoreError {
    /// Whether it is expected behavior (user input, missing configuration, etc.), used for log classification.
    ///
    /// Level `warn` should be used when returning `true` and level `error` when returning `false`.
    /// **Please update this method when new variants are added.**
    #[must_use]
    pub fn is_expected(&self) -> bool {
        match self {
            Self::ValidationError(_)
            | Self::CredentialValidation(_)
            | Self::InvalidCredentials(_)
            | Self::ZoneNotConfigured(_) => true,
            Self::Provider(e) => e.is_expected(),
            _ => false,
        }
    }
}

impl From<CredentialValidationError> for CoreError {
    fn from(err: CredentialValidationError) -> Self {
        Self::CredentialValidation(err)
    }
}

/// Core layer Result type alias
pub type CoreResult<T> = std::result::Result<T, CoreError>;
