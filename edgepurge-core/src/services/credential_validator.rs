//! Credential check against the provider

use std::sync::Arc;

use edgepurge_provider::{ClientOptions, Credentials, PurgeError};

use crate::error::{CoreError, CoreResult};
use crate::services::RateState;
use crate::traits::ClientFactory;

/// Confirms that an API key / email pair authenticates
///
/// Issues one zone listing and classifies the outcome. Nothing is persisted
/// here; saving credentials is up to the caller.
pub struct CredentialValidator {
    client_factory: Arc<dyn ClientFactory>,
    rate_state: RateState,
    options: ClientOptions,
}

impl CredentialValidator {
    pub fn new(
        client_factory: Arc<dyn ClientFactory>,
        rate_state: RateState,
        options: ClientOptions,
    ) -> Self {
        Self {
            client_factory,
            rate_state,
            options,
        }
    }

    /// # Errors
    /// * `InvalidCredentials` - the provider rejected the pair
    /// * `Timeout` - no answer within the request bound
    /// * `UnknownProvider` - anything else
    /// * `StorageError` - the call succeeded but could not be counted
    pub async fn assert_valid(&self, api_key: &str, email: &str) -> CoreResult<()> {
        let credentials = Credentials::new(api_key, email);
        let client = self
            .client_factory
            .create(credentials, &self.options)
            .map_err(|e| CoreError::UnknownProvider(e.to_string()))?;

        match client.list_zones().await {
            Ok(zones) => {
                log::info!(
                    "[credential_validator] Credentials accepted, {} zone(s) visible",
                    zones.len()
                );
                self.rate_state.increment_api_rate_count().await?;
                Ok(())
            }
            Err(e) => Err(classify(e)),
        }
    }
}

fn classify(err: PurgeError) -> CoreError {
    match err {
        PurgeError::InvalidCredentials { .. } => {
            log::warn!("[credential_validator] {err}");
            CoreError::InvalidCredentials(err.to_string())
        }
        PurgeError::Timeout { .. } => {
            log::warn!("[credential_validator] {err}");
            CoreError::Timeout(err.to_string())
        }
        other => {
            log::error!("[credential_validator] {other}");
            CoreError::UnknownProvider(other.to_string())
        }
    }
}
