//! Type definitions

mod diagnostics;
mod invalidation;
mod rate;
mod settings;

pub use diagnostics::{DiagnosticResult, DiagnosticSeverity};
pub use invalidation::{
    ChunkOutcome, DispatchSummary, InvalidationItem, InvalidationKind, InvalidationState,
};
pub use rate::{CounterKind, RateCounter, RateWindow, API_RATE_WINDOW_MINUTES};
pub use settings::{
    CredentialSource, PurgeSettings, DEFAULT_API_RATE_LIMIT, DEFAULT_CACHE_TAG_HEADER_LIMIT,
    DEFAULT_DAILY_TAG_PURGE_LIMIT, DEFAULT_EXTENSION_SIGNAL_TAG, DEFAULT_REQUEST_TIMEOUT_SECS,
};

// Re-export public types of the provider library
pub use edgepurge_provider::{
    ClientOptions, CredentialValidationError, Credentials, ProviderType, Zone, ZoneSetting,
    ZoneSettingValue, ZoneStatus,
};
