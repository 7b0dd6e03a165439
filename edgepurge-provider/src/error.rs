use serde::{Deserialize, Serialize};

/// Unified error type for all CDN purge client operations.
///
/// Each variant includes a `provider` field identifying which provider produced the error,
/// plus variant-specific context. All variants are serializable for structured error reporting.
///
/// # Transient Errors
///
/// The following variants represent transient failures that may succeed if the caller
/// re-enqueues the work later:
/// - [`NetworkError`](Self::NetworkError) - network connectivity issues, 5xx gateway errors
/// - [`Timeout`](Self::Timeout) - request timed out
/// - [`RateLimited`](Self::RateLimited) - API rate limit exceeded
///
/// The client never retries on its own.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "code")]
pub enum PurgeError {
    /// A network-level error occurred (DNS resolution failure, connection refused, etc.).
    NetworkError {
        /// Provider that produced the error.
        provider: String,
        /// Error details.
        detail: String,
    },

    /// The provided credentials were rejected (HTTP 401/403 or an auth error code).
    InvalidCredentials {
        /// Provider that produced the error.
        provider: String,
        /// Original error message from the provider API, if available.
        raw_message: Option<String>,
    },

    /// The API rate limit has been exceeded (HTTP 429).
    RateLimited {
        /// Provider that produced the error.
        provider: String,
        /// Seconds to wait before the provider accepts requests again, if known.
        retry_after: Option<u64>,
        /// Original error message from the provider API, if available.
        raw_message: Option<String>,
    },

    /// The request did not complete within the configured bound.
    Timeout {
        /// Provider that produced the error.
        provider: String,
        /// Error details.
        detail: String,
    },

    /// The zone identifier does not resolve to a zone of this account.
    ZoneNotFound {
        /// Provider that produced the error.
        provider: String,
        /// Zone identifier used in the request.
        zone_id: String,
        /// Original error message from the provider API, if available.
        raw_message: Option<String>,
    },

    /// The provider rejected the request with a non-success HTTP status.
    Api {
        /// Provider that produced the error.
        provider: String,
        /// HTTP status code of the response.
        http_status: u16,
        /// Provider-specific error code, if the body carried one.
        raw_code: Option<String>,
        /// Provider-supplied error message.
        raw_message: String,
    },

    /// An update was attempted on a zone setting that is not editable.
    ///
    /// Raised before any network I/O.
    NotEditable {
        /// Provider that produced the error.
        provider: String,
        /// Name of the zone setting.
        setting: String,
    },

    /// Failed to parse the API response body.
    ParseError {
        /// Provider that produced the error.
        provider: String,
        /// Error details.
        detail: String,
    },

    /// Failed to serialize the request body.
    SerializationError {
        /// Provider that produced the error.
        provider: String,
        /// Error details.
        detail: String,
    },

    /// An unrecognized error from the provider API.
    Unknown {
        /// Provider that produced the error.
        provider: String,
        /// Raw error code from the API, if available.
        raw_code: Option<String>,
        /// Raw error message from the API.
        raw_message: String,
    },
}

impl PurgeError {
    /// Whether the failure is an expected outcome (bad input, missing resource, etc.),
    /// used to pick the log level.
    ///
    /// `true` means `warn`, `false` means `error`.
    /// **Keep this in sync when adding variants.**
    #[must_use]
    pub fn is_expected(&self) -> bool {
        matches!(
            self,
            Self::InvalidCredentials { .. }
                | Self::RateLimited { .. }
                | Self::ZoneNotFound { .. }
                | Self::NotEditable { .. }
        )
    }

    /// HTTP status carried by the error, if the provider answered at all.
    #[must_use]
    pub fn http_status(&self) -> Option<u16> {
        match self {
            Self::Api { http_status, .. } => Some(*http_status),
            Self::RateLimited { .. } => Some(429),
            _ => None,
        }
    }
}

impl std::fmt::Display for PurgeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NetworkError { provider, detail } => {
                write!(f, "[{provider}] Network error: {detail}")
            }
            Self::InvalidCredentials {
                provider,
                raw_message,
            } => {
                if let Some(msg) = raw_message {
                    write!(f, "[{provider}] Invalid credentials: {msg}")
                } else {
                    write!(f, "[{provider}] Invalid credentials")
                }
            }
            Self::RateLimited {
                provider,
                retry_after,
                ..
            } => {
                if let Some(secs) = retry_after {
                    write!(f, "[{provider}] Rate limited (retry after {secs}s)")
                } else {
                    write!(f, "[{provider}] Rate limited")
                }
            }
            Self::Timeout { provider, detail } => {
                write!(f, "[{provider}] Request timeout: {detail}")
            }
            Self::ZoneNotFound {
                provider,
                zone_id,
                raw_message,
            } => {
                if let Some(msg) = raw_message {
                    write!(f, "[{provider}] Zone '{zone_id}' not found: {msg}")
                } else {
                    write!(f, "[{provider}] Zone '{zone_id}' not found")
                }
            }
            Self::Api {
                provider,
                http_status,
                raw_code,
                raw_message,
            } => {
                if let Some(code) = raw_code {
                    write!(f, "[{provider}] HTTP {http_status} ({code}): {raw_message}")
                } else {
                    write!(f, "[{provider}] HTTP {http_status}: {raw_message}")
                }
            }
            Self::NotEditable { provider, setting } => {
                write!(f, "[{provider}] Zone setting '{setting}' is not editable")
            }
            Self::ParseError { provider, detail } => {
                write!(f, "[{provider}] Parse error: {detail}")
            }
            Self::SerializationError { provider, detail } => {
                write!(f, "[{provider}] Serialization error: {detail}")
            }
            Self::Unknown {
                provider,
                raw_message,
                ..
            } => {
                write!(f, "[{provider}] {raw_message}")
            }
        }
    }
}

impl std::error::Error for PurgeError {}

/// Convenience type alias for `Result<T, PurgeError>`.
pub type Result<T> = std::result::Result<T, PurgeError>;
