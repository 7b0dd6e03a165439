//! Test helper module
//!
//! Provides mock implementations and convenient test factory methods.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use edgepurge_provider::{
    ClientOptions, Credentials, PurgeClient, PurgeError, Zone, ZoneSetting, ZoneSettingValue,
    ZoneStatus,
};
use tokio::sync::RwLock;

use crate::error::{CoreError, CoreResult};
use crate::services::{
    CredentialService, CredentialValidator, DiagnosticService, DispatchOptions,
    InvalidationDispatcher, MemoizedDependencyCheck, RateState, ServiceContext, ZoneService,
};
use crate::traits::{
    ClientFactory, Clock, DependencyProbe, SecretStore, SettingsRepository, StateStore,
};
use crate::types::{CounterKind, CredentialSource, PurgeSettings, RateCounter, RateWindow};

// ===== MockPurgeClient =====

/// A request the mock client received
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PurgeCall {
    ListZones,
    GetSettings { zone_id: String },
    UpdateSetting { zone_id: String, name: String },
    Tags { zone_id: String, tags: Vec<String> },
    Urls { zone_id: String, urls: Vec<String> },
    Everything { zone_id: String },
}

pub struct MockPurgeClient {
    zones: RwLock<Vec<Zone>>,
    calls: RwLock<Vec<PurgeCall>>,
    /// call index -> error returned for that call
    failures: RwLock<HashMap<usize, PurgeError>>,
}

impl MockPurgeClient {
    pub fn new() -> Self {
        Self::with_zones(Vec::new())
    }

    pub fn with_zones(zones: Vec<Zone>) -> Self {
        Self {
            zones: RwLock::new(zones),
            calls: RwLock::new(Vec::new()),
            failures: RwLock::new(HashMap::new()),
        }
    }

    pub async fn calls(&self) -> Vec<PurgeCall> {
        self.calls.read().await.clone()
    }

    /// Make the `index`-th request (0-based) fail with `err`
    pub async fn fail_call(&self, index: usize, err: PurgeError) {
        self.failures.write().await.insert(index, err);
    }

    async fn record(&self, call: PurgeCall) -> edgepurge_provider::Result<()> {
        let mut calls = self.calls.write().await;
        let index = calls.len();
        calls.push(call);
        match self.failures.read().await.get(&index) {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl PurgeClient for MockPurgeClient {
    fn id(&self) -> &'static str {
        "mock"
    }

    fn max_items_per_request(&self) -> usize {
        30
    }

    async fn list_zones(&self) -> edgepurge_provider::Result<Vec<Zone>> {
        self.record(PurgeCall::ListZones).await?;
        Ok(self.zones.read().await.clone())
    }

    async fn get_zone_settings(&self, zone_id: &str) -> edgepurge_provider::Result<Vec<ZoneSetting>> {
        self.record(PurgeCall::GetSettings {
            zone_id: zone_id.to_string(),
        })
        .await?;
        Ok(vec![
            ZoneSetting::new("always_online", ZoneSettingValue::Bool(false), true),
            ZoneSetting::new("ssl", ZoneSettingValue::Enum("full".into()), false),
        ])
    }

    async fn update_zone_setting(
        &self,
        zone_id: &str,
        setting: &ZoneSetting,
    ) -> edgepurge_provider::Result<ZoneSetting> {
        if !setting.editable {
            return Err(PurgeError::NotEditable {
                provider: "mock".to_string(),
                setting: setting.name.clone(),
            });
        }
        self.record(PurgeCall::UpdateSetting {
            zone_id: zone_id.to_string(),
            name: setting.name.clone(),
        })
        .await?;
        Ok(setting.clone())
    }

    async fn purge_tags(&self, zone_id: &str, tags: &[String]) -> edgepurge_provider::Result<()> {
        self.record(PurgeCall::Tags {
            zone_id: zone_id.to_string(),
            tags: tags.to_vec(),
        })
        .await
    }

    async fn purge_urls(&self, zone_id: &str, urls: &[String]) -> edgepurge_provider::Result<()> {
        self.record(PurgeCall::Urls {
            zone_id: zone_id.to_string(),
            urls: urls.to_vec(),
        })
        .await
    }

    async fn purge_everything(&self, zone_id: &str) -> edgepurge_provider::Result<()> {
        self.record(PurgeCall::Everything {
            zone_id: zone_id.to_string(),
        })
        .await
    }
}

pub fn test_zone(id: &str, name: &str) -> Zone {
    Zone {
        id: id.to_string(),
        name: name.to_string(),
        status: ZoneStatus::Active,
        paused: false,
        plan: None,
        owner: None,
        name_servers: Vec::new(),
    }
}

// ===== MockClientFactory =====

pub struct MockClientFactory {
    client: Arc<MockPurgeClient>,
    last_credentials: Mutex<Option<Credentials>>,
    /// If Some, create() fails with this message
    create_error: Mutex<Option<String>>,
}

impl MockClientFactory {
    pub fn new(client: Arc<MockPurgeClient>) -> Self {
        Self {
            client,
            last_credentials: Mutex::new(None),
            create_error: Mutex::new(None),
        }
    }

    pub fn client(&self) -> &Arc<MockPurgeClient> {
        &self.client
    }

    pub fn last_credentials(&self) -> Option<Credentials> {
        self.last_credentials.lock().unwrap().clone()
    }

    pub fn set_create_error(&self, err: Option<String>) {
        *self.create_error.lock().unwrap() = err;
    }
}

impl ClientFactory for MockClientFactory {
    fn create(
        &self,
        credentials: Credentials,
        _options: &ClientOptions,
    ) -> CoreResult<Arc<dyn PurgeClient>> {
        if let Some(msg) = self.create_error.lock().unwrap().clone() {
            return Err(CoreError::Provider(PurgeError::NetworkError {
                provider: "mock".to_string(),
                detail: msg,
            }));
        }
        *self.last_credentials.lock().unwrap() = Some(credentials);
        Ok(self.client.clone())
    }
}

// ===== MockStateStore =====

#[derive(Default)]
pub struct MockStateStore {
    counters: RwLock<HashMap<CounterKind, RateCounter>>,
    /// If Some, every call fails with this storage error
    error: RwLock<Option<String>>,
}

impl MockStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn seed(&self, kind: CounterKind, counter: RateCounter) {
        self.counters.write().await.insert(kind, counter);
    }

    pub async fn set_error(&self, err: Option<String>) {
        *self.error.write().await = err;
    }

    async fn check(&self) -> CoreResult<()> {
        match self.error.read().await.as_ref() {
            Some(msg) => Err(CoreError::StorageError(msg.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl StateStore for MockStateStore {
    async fn get_counter(&self, kind: CounterKind) -> CoreResult<Option<RateCounter>> {
        self.check().await?;
        Ok(self.counters.read().await.get(&kind).copied())
    }

    async fn increment_counter(
        &self,
        kind: CounterKind,
        window: &RateWindow,
        now: DateTime<Utc>,
    ) -> CoreResult<RateCounter> {
        self.check().await?;
        let mut counters = self.counters.write().await;
        let next = window.advance(counters.get(&kind).copied(), now);
        counters.insert(kind, next);
        Ok(next)
    }
}

/// State store whose every call fails
pub struct FailingStateStore;

#[async_trait]
impl StateStore for FailingStateStore {
    async fn get_counter(&self, _kind: CounterKind) -> CoreResult<Option<RateCounter>> {
        Err(CoreError::StorageError("state store offline".to_string()))
    }

    async fn increment_counter(
        &self,
        _kind: CounterKind,
        _window: &RateWindow,
        _now: DateTime<Utc>,
    ) -> CoreResult<RateCounter> {
        Err(CoreError::StorageError("state store offline".to_string()))
    }
}

// ===== MockSettingsRepository =====

pub struct MockSettingsRepository {
    settings: RwLock<PurgeSettings>,
    saves: RwLock<usize>,
}

impl MockSettingsRepository {
    pub fn new(settings: PurgeSettings) -> Self {
        Self {
            settings: RwLock::new(settings),
            saves: RwLock::new(0),
        }
    }

    pub async fn save_count(&self) -> usize {
        *self.saves.read().await
    }
}

#[async_trait]
impl SettingsRepository for MockSettingsRepository {
    async fn load(&self) -> CoreResult<PurgeSettings> {
        Ok(self.settings.read().await.clone())
    }

    async fn save(&self, settings: &PurgeSettings) -> CoreResult<()> {
        *self.settings.write().await = settings.clone();
        *self.saves.write().await += 1;
        Ok(())
    }
}

// ===== MockSecretStore =====

#[derive(Default)]
pub struct MockSecretStore {
    values: RwLock<HashMap<String, String>>,
    multi: RwLock<HashMap<String, HashMap<String, String>>>,
}

impl MockSecretStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_value(&self, id: &str, value: &str) {
        self.values
            .write()
            .await
            .insert(id.to_string(), value.to_string());
    }

    pub async fn insert_values(&self, id: &str, values: HashMap<String, String>) {
        self.multi.write().await.insert(id.to_string(), values);
    }
}

#[async_trait]
impl SecretStore for MockSecretStore {
    async fn get_value(&self, secret_id: &str) -> CoreResult<Option<String>> {
        Ok(self.values.read().await.get(secret_id).cloned())
    }

    async fn get_values(&self, secret_id: &str) -> CoreResult<Option<HashMap<String, String>>> {
        Ok(self.multi.read().await.get(secret_id).cloned())
    }
}

// ===== ManualClock =====

/// Clock that only moves when told to
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn at(year: i32, month: u32, day: u32, hour: u32, min: u32, sec: u32) -> Self {
        Self {
            now: Mutex::new(
                Utc.with_ymd_and_hms(year, month, day, hour, min, sec)
                    .unwrap(),
            ),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap();
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

// ===== CountingProbe =====

pub struct CountingProbe {
    outcome: Result<(), String>,
    runs: AtomicUsize,
}

impl CountingProbe {
    pub fn ok() -> Self {
        Self {
            outcome: Ok(()),
            runs: AtomicUsize::new(0),
        }
    }

    pub fn failing(reason: &str) -> Self {
        Self {
            outcome: Err(reason.to_string()),
            runs: AtomicUsize::new(0),
        }
    }

    pub fn runs(&self) -> usize {
        self.runs.load(Ordering::SeqCst)
    }
}

impl DependencyProbe for CountingProbe {
    fn probe(&self) -> Result<(), String> {
        self.runs.fetch_add(1, Ordering::SeqCst);
        self.outcome.clone()
    }
}

// ===== Test factory methods =====

/// Everything a service test may want to inspect or tweak
pub struct TestDeps {
    pub ctx: Arc<ServiceContext>,
    pub settings: Arc<MockSettingsRepository>,
    pub secrets: Arc<MockSecretStore>,
    pub factory: Arc<MockClientFactory>,
    pub store: Arc<MockStateStore>,
    pub clock: Arc<ManualClock>,
    pub rate: RateState,
}

impl TestDeps {
    pub async fn set_zone(&self, zone_id: Option<&str>) {
        let mut settings = self.settings.load().await.unwrap();
        settings.zone_id = zone_id.map(str::to_string);
        self.settings.save(&settings).await.unwrap();
    }

    pub async fn set_valid_credentials(&self, valid: bool) {
        let mut settings = self.settings.load().await.unwrap();
        settings.valid_credentials = valid;
        self.settings.save(&settings).await.unwrap();
    }
}

fn test_clock() -> Arc<ManualClock> {
    Arc::new(ManualClock::at(2024, 3, 1, 12, 0, 0))
}

/// Settings holding a valid-looking inline credential pair
pub fn configured_settings() -> PurgeSettings {
    PurgeSettings {
        credentials: CredentialSource::Inline {
            api_key: "test-key".to_string(),
            email: "ops@example.com".to_string(),
        },
        valid_credentials: true,
        ..PurgeSettings::default()
    }
}

pub fn create_test_deps(settings: PurgeSettings, zones: Vec<Zone>) -> TestDeps {
    let settings_repo = Arc::new(MockSettingsRepository::new(settings));
    let secrets = Arc::new(MockSecretStore::new());
    let factory = Arc::new(MockClientFactory::new(Arc::new(
        MockPurgeClient::with_zones(zones),
    )));
    let store = Arc::new(MockStateStore::new());
    let clock = test_clock();

    let ctx = Arc::new(ServiceContext::new(
        store.clone(),
        settings_repo.clone(),
        secrets.clone(),
        factory.clone(),
        clock.clone(),
    ));
    let rate = RateState::new(store.clone(), clock.clone());

    TestDeps {
        ctx,
        settings: settings_repo,
        secrets,
        factory,
        store,
        clock,
        rate,
    }
}

pub fn create_test_rate_state() -> (RateState, Arc<MockStateStore>, Arc<ManualClock>) {
    let store = Arc::new(MockStateStore::new());
    let clock = test_clock();
    let rate = RateState::new(store.clone(), clock.clone());
    (rate, store, clock)
}

pub fn create_test_dispatcher(
    max_items_per_request: usize,
) -> (InvalidationDispatcher, Arc<MockPurgeClient>, RateState) {
    let client = Arc::new(MockPurgeClient::new());
    let (rate, _store, _clock) = create_test_rate_state();
    let dispatcher = InvalidationDispatcher::new(
        client.clone(),
        "zone-1",
        rate.clone(),
        DispatchOptions {
            max_items_per_request,
            ..DispatchOptions::default()
        },
    );
    (dispatcher, client, rate)
}

pub fn create_test_validator() -> (CredentialValidator, Arc<MockClientFactory>, RateState) {
    let factory = Arc::new(MockClientFactory::new(Arc::new(MockPurgeClient::new())));
    let (rate, _store, _clock) = create_test_rate_state();
    let validator = CredentialValidator::new(
        factory.clone(),
        rate.clone(),
        ClientOptions::default(),
    );
    (validator, factory, rate)
}

pub fn create_test_credential_service() -> (CredentialService, TestDeps) {
    let deps = create_test_deps(PurgeSettings::default(), Vec::new());
    let service = CredentialService::new(deps.ctx.clone(), deps.rate.clone());
    (service, deps)
}

/// Credential service over settings that already hold valid credentials
pub fn create_test_configured_credential_service() -> (CredentialService, TestDeps) {
    let deps = create_test_deps(configured_settings(), Vec::new());
    let service = CredentialService::new(deps.ctx.clone(), deps.rate.clone());
    (service, deps)
}

pub fn create_test_zone_service(zones: Vec<Zone>) -> (ZoneService, TestDeps) {
    let deps = create_test_deps(configured_settings(), zones);
    let service = ZoneService::new(deps.ctx.clone(), deps.rate.clone());
    (service, deps)
}

pub fn create_test_diagnostics(probe: CountingProbe) -> (DiagnosticService, TestDeps) {
    let deps = create_test_deps(PurgeSettings::default(), Vec::new());
    let check = Arc::new(MemoizedDependencyCheck::new(Arc::new(probe)));
    let service = DiagnosticService::new(deps.ctx.clone(), deps.rate.clone(), check);
    (service, deps)
}
