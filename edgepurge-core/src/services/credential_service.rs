//! Credential management service

use std::sync::Arc;

use crate::error::{CoreError, CoreResult};
use crate::services::{CredentialValidator, RateState, ServiceContext};
use crate::types::{CredentialSource, PurgeSettings};

/// Validates credential sources and persists them with their validity flag
pub struct CredentialService {
    ctx: Arc<ServiceContext>,
    rate_state: RateState,
}

impl CredentialService {
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>, rate_state: RateState) -> Self {
        Self { ctx, rate_state }
    }

    /// Validate `source` against the provider and save it
    ///
    /// Empty or malformed fields are rejected before any request and nothing
    /// is saved. A provider rejection saves the source with
    /// `valid_credentials = false` and returns the error. Timeouts and other
    /// failures leave the stored settings untouched.
    pub async fn validate_and_save(&self, source: CredentialSource) -> CoreResult<PurgeSettings> {
        let mut settings = self.ctx.load_settings().await?;
        let credentials = self.ctx.resolve_credentials(&source).await?;
        credentials.validate()?;

        let validator = CredentialValidator::new(
            self.ctx.client_factory.clone(),
            self.rate_state.clone(),
            settings.client_options(),
        );
        match validator
            .assert_valid(&credentials.api_key, &credentials.email)
            .await
        {
            Ok(()) => {
                settings.credentials = source;
                settings.valid_credentials = true;
                self.ctx.settings_repository.save(&settings).await?;
                log::info!("[credentials] Credentials validated and saved");
                Ok(settings)
            }
            Err(e @ CoreError::InvalidCredentials(_)) => {
                settings.credentials = source;
                settings.valid_credentials = false;
                self.ctx.settings_repository.save(&settings).await?;
                Err(e)
            }
            Err(e) => {
                log::warn!("[credentials] Validation inconclusive, settings unchanged: {e}");
                Err(e)
            }
        }
    }

    /// Re-check the stored credentials and update the validity flag
    pub async fn revalidate(&self) -> CoreResult<()> {
        let settings = self.ctx.load_settings().await?;
        self.validate_and_save(settings.credentials).await.map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{
        create_test_configured_credential_service, create_test_credential_service, PurgeCall,
    };
    use crate::traits::SettingsRepository;
    use edgepurge_provider::PurgeError;
    use std::collections::HashMap;

    fn inline(key: &str, email: &str) -> CredentialSource {
        CredentialSource::Inline {
            api_key: key.into(),
            email: email.into(),
        }
    }

    #[tokio::test]
    async fn test_valid_source_is_saved_as_valid() {
        let (service, deps) = create_test_credential_service();

        let saved = service
            .validate_and_save(inline("key", "ops@example.com"))
            .await
            .unwrap();

        assert!(saved.valid_credentials);
        let stored = deps.settings.load().await.unwrap();
        assert_eq!(stored.credentials, inline("key", "ops@example.com"));
        assert!(stored.valid_credentials);
    }

    #[tokio::test]
    async fn test_rejected_source_is_saved_as_invalid() {
        let (service, deps) = create_test_credential_service();
        deps.factory
            .client()
            .fail_call(
                0,
                PurgeError::InvalidCredentials {
                    provider: "mock".into(),
                    raw_message: None,
                },
            )
            .await;

        let err = service
            .validate_and_save(inline("bad", "ops@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::InvalidCredentials(_)));

        let stored = deps.settings.load().await.unwrap();
        assert!(!stored.valid_credentials);
        assert_eq!(stored.credentials, inline("bad", "ops@example.com"));
    }

    #[tokio::test]
    async fn test_empty_fields_fail_before_any_request() {
        let (service, deps) = create_test_credential_service();

        let err = service
            .validate_and_save(inline("", "ops@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::CredentialValidation(_)));
        assert!(deps.factory.client().calls().await.is_empty());
        assert_eq!(deps.settings.save_count().await, 0);
    }

    #[tokio::test]
    async fn test_combined_secret_source() {
        let (service, deps) = create_test_credential_service();
        deps.secrets
            .insert_values(
                "cloudflare",
                HashMap::from([
                    ("username".to_string(), "ops@example.com".to_string()),
                    ("password".to_string(), "secret-key".to_string()),
                ]),
            )
            .await;

        service
            .validate_and_save(CredentialSource::CombinedSecret {
                secret_id: "cloudflare".into(),
            })
            .await
            .unwrap();

        assert_eq!(
            deps.factory.last_credentials().map(|c| c.api_key),
            Some("secret-key".to_string())
        );
        assert_eq!(deps.factory.client().calls().await, vec![PurgeCall::ListZones]);
    }

    #[tokio::test]
    async fn test_secret_key_source() {
        let (service, deps) = create_test_credential_service();
        deps.secrets.insert_value("cf_api_key", "from-secret").await;

        service
            .validate_and_save(CredentialSource::SecretKey {
                email: "ops@example.com".into(),
                api_key_secret: "cf_api_key".into(),
            })
            .await
            .unwrap();

        assert_eq!(
            deps.factory.last_credentials(),
            Some(edgepurge_provider::Credentials::new(
                "from-secret",
                "ops@example.com"
            ))
        );
        assert_eq!(deps.rate.get_api_rate_count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_missing_secret_fails_validation() {
        let (service, deps) = create_test_credential_service();

        let err = service
            .validate_and_save(CredentialSource::SecretKey {
                email: "ops@example.com".into(),
                api_key_secret: "absent".into(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::CredentialValidation(_)));
        assert!(deps.factory.client().calls().await.is_empty());
    }

    // ---- transient failures ----

    fn timeout() -> PurgeError {
        PurgeError::Timeout {
            provider: "mock".into(),
            detail: "no response within 10s".into(),
        }
    }

    #[tokio::test]
    async fn test_timeout_saves_nothing() {
        let (service, deps) = create_test_credential_service();
        deps.factory.client().fail_call(0, timeout()).await;

        let err = service
            .validate_and_save(inline("key", "ops@example.com"))
            .await
            .unwrap_err();

        assert!(matches!(err, CoreError::Timeout(_)));
        assert_eq!(deps.settings.save_count().await, 0);
        assert_eq!(deps.settings.load().await.unwrap(), PurgeSettings::default());
    }

    // ---- revalidate ----

    #[tokio::test]
    async fn test_revalidate_keeps_flag_on_timeout() {
        let (service, deps) = create_test_configured_credential_service();
        deps.factory.client().fail_call(0, timeout()).await;

        let err = service.revalidate().await.unwrap_err();

        assert!(matches!(err, CoreError::Timeout(_)));
        assert!(deps.settings.load().await.unwrap().valid_credentials);
        assert_eq!(deps.settings.save_count().await, 0);
    }

    #[tokio::test]
    async fn test_revalidate_clears_flag_on_rejection() {
        let (service, deps) = create_test_configured_credential_service();
        deps.factory
            .client()
            .fail_call(
                0,
                PurgeError::InvalidCredentials {
                    provider: "mock".into(),
                    raw_message: Some("Unknown X-Auth-Key or X-Auth-Email".into()),
                },
            )
            .await;

        let err = service.revalidate().await.unwrap_err();

        assert!(matches!(err, CoreError::InvalidCredentials(_)));
        assert!(!deps.settings.load().await.unwrap().valid_credentials);
    }

    #[tokio::test]
    async fn test_revalidate_success_keeps_source() {
        let (service, deps) = create_test_configured_credential_service();

        service.revalidate().await.unwrap();

        let stored = deps.settings.load().await.unwrap();
        assert!(stored.valid_credentials);
        assert_eq!(stored.credentials, inline("test-key", "ops@example.com"));
        assert_eq!(deps.factory.client().calls().await, vec![PurgeCall::ListZones]);
    }
}
