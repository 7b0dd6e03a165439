//! Business logic service layer

mod credential_service;
mod credential_validator;
mod dependency_check;
mod diagnostic_service;
mod dispatcher;
mod rate_state;
mod tag_hasher;
mod zone_service;

pub use credential_service::CredentialService;
pub use credential_validator::CredentialValidator;
pub use dependency_check::MemoizedDependencyCheck;
pub use diagnostic_service::{
    classify_usage, DiagnosticService, CHECK_API_RATE, CHECK_CREDENTIALS, CHECK_DAILY_TAG_PURGE,
    CHECK_DEPENDENCIES,
};
pub use dispatcher::{DispatchOptions, InvalidationDispatcher};
pub use rate_state::RateState;
pub use tag_hasher::{TagHasher, TAG_HASH_LEN};
pub use zone_service::{ZoneService, ZONE_CACHE_TTL_SECS};

use std::sync::Arc;

use edgepurge_provider::{Credentials, PurgeClient, PurgeError};

use crate::error::{CoreError, CoreResult};
use crate::traits::{Clock, ClientFactory, SecretStore, SettingsRepository, StateStore};
use crate::types::{CredentialSource, PurgeSettings};

/// Service context - holds all dependencies
///
/// The platform layer builds this context and injects its storage implementations.
pub struct ServiceContext {
    /// Rate counter storage
    pub state_store: Arc<dyn StateStore>,
    /// Settings persistence
    pub settings_repository: Arc<dyn SettingsRepository>,
    /// External secrets
    pub secret_store: Arc<dyn SecretStore>,
    /// Purge client construction
    pub client_factory: Arc<dyn ClientFactory>,
    /// Time source
    pub clock: Arc<dyn Clock>,
}

impl ServiceContext {
    /// Create service context
    #[must_use]
    pub fn new(
        state_store: Arc<dyn StateStore>,
        settings_repository: Arc<dyn SettingsRepository>,
        secret_store: Arc<dyn SecretStore>,
        client_factory: Arc<dyn ClientFactory>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            state_store,
            settings_repository,
            secret_store,
            client_factory,
            clock,
        }
    }

    /// Load and validate settings
    pub async fn load_settings(&self) -> CoreResult<PurgeSettings> {
        let settings = self.settings_repository.load().await?;
        settings.validate()?;
        Ok(settings)
    }

    /// Rate accounting configured from `settings`
    pub fn rate_state(&self, settings: &PurgeSettings) -> CoreResult<RateState> {
        Ok(
            RateState::new(self.state_store.clone(), self.clock.clone())
                .with_daily_offset(settings.daily_window_offset()?),
        )
    }

    /// Turn a credential source into a key/email pair
    ///
    /// A secret that does not exist resolves to empty values; the caller's
    /// validation then rejects them.
    pub async fn resolve_credentials(&self, source: &CredentialSource) -> CoreResult<Credentials> {
        match source {
            CredentialSource::Inline { api_key, email } => {
                Ok(Credentials::new(api_key.clone(), email.clone()))
            }
            CredentialSource::SecretKey {
                email,
                api_key_secret,
            } => {
                let api_key = self.secret_store.get_value(api_key_secret).await?;
                if api_key.is_none() {
                    log::warn!("[credentials] Secret '{api_key_secret}' not found");
                }
                Ok(Credentials::new(api_key.unwrap_or_default(), email.clone()))
            }
            CredentialSource::CombinedSecret { secret_id } => {
                let Some(mut values) = self.secret_store.get_values(secret_id).await? else {
                    log::warn!("[credentials] Secret '{secret_id}' not found");
                    return Ok(Credentials::new(String::new(), String::new()));
                };
                Ok(Credentials::new(
                    values.remove("password").unwrap_or_default(),
                    values.remove("username").unwrap_or_default(),
                ))
            }
        }
    }

    /// Client for the configured credentials
    pub async fn purge_client(&self, settings: &PurgeSettings) -> CoreResult<Arc<dyn PurgeClient>> {
        let credentials = self.resolve_credentials(&settings.credentials).await?;
        credentials.validate()?;
        self.client_factory
            .create(credentials, &settings.client_options())
    }

    /// Mark the stored credentials as invalid
    ///
    /// Called when the provider rejects them.
    pub async fn mark_credentials_invalid(&self, error_msg: &str) {
        let result: CoreResult<()> = async {
            let mut settings = self.settings_repository.load().await?;
            if !settings.valid_credentials {
                return Ok(());
            }
            settings.valid_credentials = false;
            self.settings_repository.save(&settings).await
        }
        .await;

        match result {
            Ok(()) => log::warn!("[credentials] Marked invalid: {error_msg}"),
            Err(e) => log::error!("[credentials] Failed to mark credentials invalid: {e}"),
        }
    }

    /// Handle a provider error
    ///
    /// Marks the credentials invalid when the provider rejected them, then
    /// converts the error.
    pub async fn handle_purge_error(&self, err: PurgeError) -> CoreError {
        if let PurgeError::InvalidCredentials { .. } = &err {
            self.mark_credentials_invalid(&err.to_string()).await;
        }
        CoreError::Provider(err)
    }
}
