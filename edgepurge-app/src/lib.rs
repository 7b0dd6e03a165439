//! Platform-agnostic application bootstrap for edgepurge.
//!
//! Provides `AppState` (service container) and `AppStateBuilder` (adapter
//! injection). Storage adapters live in [`adapters`].

pub mod adapters;

use std::sync::Arc;

use edgepurge_core::error::{CoreError, CoreResult};
use edgepurge_core::services::{
    CredentialService, DiagnosticService, InvalidationDispatcher, MemoizedDependencyCheck,
    RateState, ServiceContext, TagHasher, ZoneService,
};
use edgepurge_core::traits::{
    ClientFactory, Clock, DependencyProbe, HttpStackProbe, ProviderClientFactory, SecretStore,
    SettingsRepository, StateStore, SystemClock,
};
use edgepurge_core::types::{
    DiagnosticResult, DiagnosticSeverity, DispatchSummary, InvalidationItem, InvalidationState,
};

use adapters::InMemorySecretStore;

/// Platform-agnostic application state.
///
/// Holds every service and the `ServiceContext`. Each embedding program
/// constructs this once at startup via `AppStateBuilder`.
pub struct AppState {
    /// Service context (holds all adapters)
    pub ctx: Arc<ServiceContext>,
    /// Rate accounting shared by every service
    pub rate_state: RateState,
    /// Credential validation and persistence
    pub credential_service: CredentialService,
    /// Zone lookup and zone settings
    pub zone_service: Arc<ZoneService>,
    /// Status checks
    pub diagnostic_service: DiagnosticService,
    /// Runtime dependency check, evaluated once
    pub dependency_check: Arc<MemoizedDependencyCheck>,
}

impl AppState {
    /// Evaluate the dependency check and report overall status in the log.
    pub async fn run_startup(&self) {
        if let Some(missing) = self.dependency_check.missing() {
            log::warn!("[app] Cache invalidation disabled: {missing}");
            return;
        }

        let results = self.status().await;
        match DiagnosticSeverity::worst(&results) {
            DiagnosticSeverity::Ok => log::info!("[app] Ready"),
            worst => log::warn!("[app] Started with status {worst}"),
        }
    }

    /// Dispatcher for the current zone
    ///
    /// Fails with `DependencyUnavailable` before any lookup when the runtime
    /// dependencies are missing.
    pub async fn dispatcher(&self) -> CoreResult<InvalidationDispatcher> {
        self.dependency_check.assert()?;
        self.zone_service.dispatcher().await
    }

    /// Dispatch every pending item in `items` to the current zone.
    ///
    /// With nothing pending this returns immediately, without touching the
    /// provider or the counters.
    pub async fn invalidate(&self, items: &mut [InvalidationItem]) -> CoreResult<DispatchSummary> {
        if !items.iter().any(|i| i.state == InvalidationState::Pending) {
            return Ok(DispatchSummary {
                skipped: items.len(),
                ..DispatchSummary::default()
            });
        }
        self.dispatcher().await?.dispatch(items).await
    }

    /// `Cache-Tag` response header value for `tags`
    ///
    /// Literal tags while they fit the configured `cache_tag_header_limit`,
    /// their hashes otherwise.
    pub async fn cache_tag_header<S: AsRef<str>>(&self, tags: &[S]) -> CoreResult<String> {
        let settings = self.ctx.load_settings().await?;
        Ok(TagHasher::cache_tag_header_value(
            tags,
            settings.cache_tag_header_limit,
        ))
    }

    /// Every diagnostic check
    pub async fn status(&self) -> Vec<DiagnosticResult> {
        self.diagnostic_service.run_all().await
    }
}

/// Builder for constructing `AppState` with platform-specific adapters.
///
/// # Required adapters
/// - `state_store`: where rate counters are kept
/// - `settings_repository`: where settings are kept
///
/// # Optional
/// - `secret_store`: defaults to an empty `InMemorySecretStore`
/// - `client_factory`: defaults to `ProviderClientFactory` (Cloudflare)
/// - `clock`: defaults to `SystemClock`
/// - `dependency_probe`: defaults to `HttpStackProbe`
#[derive(Default)]
pub struct AppStateBuilder {
    state_store: Option<Arc<dyn StateStore>>,
    settings_repository: Option<Arc<dyn SettingsRepository>>,
    secret_store: Option<Arc<dyn SecretStore>>,
    client_factory: Option<Arc<dyn ClientFactory>>,
    clock: Option<Arc<dyn Clock>>,
    dependency_probe: Option<Arc<dyn DependencyProbe>>,
}

impl AppStateBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn state_store(mut self, store: Arc<dyn StateStore>) -> Self {
        self.state_store = Some(store);
        self
    }

    #[must_use]
    pub fn settings_repository(mut self, repo: Arc<dyn SettingsRepository>) -> Self {
        self.settings_repository = Some(repo);
        self
    }

    #[must_use]
    pub fn secret_store(mut self, store: Arc<dyn SecretStore>) -> Self {
        self.secret_store = Some(store);
        self
    }

    #[must_use]
    pub fn client_factory(mut self, factory: Arc<dyn ClientFactory>) -> Self {
        self.client_factory = Some(factory);
        self
    }

    #[must_use]
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    #[must_use]
    pub fn dependency_probe(mut self, probe: Arc<dyn DependencyProbe>) -> Self {
        self.dependency_probe = Some(probe);
        self
    }

    /// Build the `AppState`.
    ///
    /// Loads the settings once to configure the daily window.
    ///
    /// # Errors
    /// Returns `CoreError::ValidationError` if required adapters are missing,
    /// or the settings error if they cannot be loaded.
    pub async fn build(self) -> CoreResult<AppState> {
        let state_store = self
            .state_store
            .ok_or_else(|| CoreError::ValidationError("state_store is required".to_string()))?;
        let settings_repository = self.settings_repository.ok_or_else(|| {
            CoreError::ValidationError("settings_repository is required".to_string())
        })?;
        let secret_store = self
            .secret_store
            .unwrap_or_else(|| Arc::new(InMemorySecretStore::new()));
        let client_factory = self
            .client_factory
            .unwrap_or_else(|| Arc::new(ProviderClientFactory::default()));
        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock));
        let dependency_probe = self
            .dependency_probe
            .unwrap_or_else(|| Arc::new(HttpStackProbe));

        let ctx = Arc::new(ServiceContext::new(
            state_store,
            settings_repository,
            secret_store,
            client_factory,
            clock,
        ));

        let settings = ctx.load_settings().await?;
        let rate_state = ctx.rate_state(&settings)?;
        let dependency_check = Arc::new(MemoizedDependencyCheck::new(dependency_probe));

        let credential_service = CredentialService::new(Arc::clone(&ctx), rate_state.clone());
        let zone_service = Arc::new(ZoneService::new(Arc::clone(&ctx), rate_state.clone()));
        let diagnostic_service = DiagnosticService::new(
            Arc::clone(&ctx),
            rate_state.clone(),
            Arc::clone(&dependency_check),
        );

        Ok(AppState {
            ctx,
            rate_state,
            credential_service,
            zone_service,
            diagnostic_service,
            dependency_check,
        })
    }
}
