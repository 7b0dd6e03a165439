//! Purge client construction abstract Trait

use std::sync::Arc;

use edgepurge_provider::{create_client, ClientOptions, Credentials, ProviderType, PurgeClient};

use crate::error::CoreResult;

/// Builds purge clients for a credential pair
///
/// Services never construct clients directly so they can run against mocks.
pub trait ClientFactory: Send + Sync {
    /// # Arguments
    /// * `credentials` - API key and email
    /// * `options` - Timeout and endpoint overrides
    fn create(
        &self,
        credentials: Credentials,
        options: &ClientOptions,
    ) -> CoreResult<Arc<dyn PurgeClient>>;
}

/// Factory backed by the provider library
#[derive(Debug, Clone, Copy)]
pub struct ProviderClientFactory {
    provider: ProviderType,
}

impl ProviderClientFactory {
    #[must_use]
    pub fn new(provider: ProviderType) -> Self {
        Self { provider }
    }
}

impl Default for ProviderClientFactory {
    fn default() -> Self {
        Self::new(ProviderType::Cloudflare)
    }
}

impl ClientFactory for ProviderClientFactory {
    fn create(
        &self,
        credentials: Credentials,
        options: &ClientOptions,
    ) -> CoreResult<Arc<dyn PurgeClient>> {
        Ok(create_client(self.provider, credentials, options)?)
    }
}
