//! # edgepurge-provider
//!
//! CDN cache purge client abstraction.
//!
//! ## Supported Providers
//!
//! | Provider | Feature Flag | Auth Method |
//! |----------|-------------|-------------|
//! | [Cloudflare](https://www.cloudflare.com/) | `cloudflare` | `X-Auth-Key` + `X-Auth-Email` |
//!
//! ## Feature Flags
//!
//! - **`cloudflare`** *(default)* - Enable the Cloudflare client.
//! - **`native-tls`** *(default)* - Use the platform's native TLS implementation.
//! - **`rustls`** - Use rustls. Recommended for cross-compilation.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use edgepurge_provider::{create_client, ClientOptions, Credentials, ProviderType};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = create_client(
//!         ProviderType::Cloudflare,
//!         Credentials::new("api-key", "ops@example.com"),
//!         &ClientOptions::default(),
//!     )?;
//!
//!     let zones = client.list_zones().await?;
//!     let zone = &zones[0];
//!
//!     // Callers chunk to `max_items_per_request()` themselves
//!     let tags = vec!["node:1".to_string(), "node:2".to_string()];
//!     client.purge_tags(&zone.id, &tags).await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! All client operations return [`Result<T, PurgeError>`](PurgeError):
//!
//! - [`PurgeError::InvalidCredentials`] - the provider rejected the key/email pair (HTTP 401/403)
//! - [`PurgeError::Timeout`] - no response within the configured bound
//! - [`PurgeError::Api`] - any other non-2xx response, with HTTP status and provider code
//! - [`PurgeError::NotEditable`] - a zone setting update was refused locally, no request sent
//!
//! Nothing is retried automatically.

mod error;
mod factory;
mod http_client;
mod providers;
mod traits;
mod types;
mod utils;

// Re-export error types
pub use error::{PurgeError, Result};

// Re-export factory functions
pub use factory::create_client;

// Re-export core trait only (internal traits are not exported)
pub use traits::PurgeClient;

// Re-export types
pub use types::{
    ClientOptions, CredentialValidationError, Credentials, DEFAULT_REQUEST_TIMEOUT_SECS,
    ProviderType, Zone, ZoneSetting, ZoneSettingValue, ZoneStatus,
};

// Re-export concrete clients (behind feature flags)
#[cfg(feature = "cloudflare")]
pub use providers::{CloudflareClient, MAX_ITEMS_PER_PURGE_REQUEST};

/// Checks that an HTTP client can be built with the compiled-in TLS backend.
///
/// Used by dependency diagnostics; it performs no network I/O.
pub fn http_stack_available() -> Result<()> {
    providers::common::create_http_client(
        "probe",
        std::time::Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
    )
    .map(|_| ())
}
