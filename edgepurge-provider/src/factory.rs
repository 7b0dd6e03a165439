//! Client factory functions.

use std::sync::Arc;

use crate::error::Result;
use crate::traits::PurgeClient;
use crate::types::{ClientOptions, Credentials, ProviderType};

#[cfg(feature = "cloudflare")]
use crate::providers::CloudflareClient;

/// Creates a [`PurgeClient`] for `provider` authenticated with `credentials`.
///
/// The returned client is wrapped in `Arc<dyn PurgeClient>` for easy sharing
/// across async tasks. Credentials are passed through untouched; whether the
/// provider accepts them is only known after the first request.
///
/// # Examples
///
/// ```rust,no_run
/// use edgepurge_provider::{create_client, ClientOptions, Credentials, ProviderType};
///
/// let client = create_client(
///     ProviderType::Cloudflare,
///     Credentials::new("api-key", "ops@example.com"),
///     &ClientOptions::default(),
/// ).unwrap();
/// ```
pub fn create_client(
    provider: ProviderType,
    credentials: Credentials,
    options: &ClientOptions,
) -> Result<Arc<dyn PurgeClient>> {
    match provider {
        #[cfg(feature = "cloudflare")]
        ProviderType::Cloudflare => Ok(Arc::new(CloudflareClient::new(credentials, options)?)),
    }
}
