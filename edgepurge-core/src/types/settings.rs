//! Persisted purge configuration

use std::time::Duration;

use chrono::FixedOffset;
use serde::{Deserialize, Serialize};

use edgepurge_provider::{ClientOptions, MAX_ITEMS_PER_PURGE_REQUEST};

use crate::error::{CoreError, CoreResult};

/// Provider API-rate ceiling per five minute window
pub const DEFAULT_API_RATE_LIMIT: u64 = 1200;
/// Tag purge requests allowed per calendar day
pub const DEFAULT_DAILY_TAG_PURGE_LIMIT: u64 = 2000;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
/// Tag whose invalidation means code was installed or removed
pub const DEFAULT_EXTENSION_SIGNAL_TAG: &str = "config:core.extension";
/// Byte budget for a `Cache-Tag` response header
pub const DEFAULT_CACHE_TAG_HEADER_LIMIT: usize = 16 * 1024;

/// Where the API key and email come from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum CredentialSource {
    /// Both values stored in the settings themselves
    Inline {
        #[serde(default)]
        api_key: String,
        #[serde(default)]
        email: String,
    },
    /// Email stored inline, API key held by the secret store
    SecretKey {
        #[serde(default)]
        email: String,
        api_key_secret: String,
    },
    /// One secret holding `username` (email) and `password` (API key)
    CombinedSecret { secret_id: String },
}

impl Default for CredentialSource {
    fn default() -> Self {
        Self::Inline {
            api_key: String::new(),
            email: String::new(),
        }
    }
}

/// Purge configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PurgeSettings {
    /// Zone to purge. `None` falls back to the account's only zone.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zone_id: Option<String>,
    /// Set after the credentials last passed validation
    pub valid_credentials: bool,
    pub api_rate_limit: u64,
    pub daily_tag_purge_limit: u64,
    pub max_items_per_request: usize,
    pub request_timeout_secs: u64,
    /// Offset from UTC, in seconds, of the day boundary for the daily counter
    pub daily_window_utc_offset_secs: i32,
    pub extension_signal_tag: String,
    pub cache_tag_header_limit: usize,
    /// Kept last so it serializes as a trailing table
    pub credentials: CredentialSource,
}

impl Default for PurgeSettings {
    fn default() -> Self {
        Self {
            zone_id: None,
            valid_credentials: false,
            api_rate_limit: DEFAULT_API_RATE_LIMIT,
            daily_tag_purge_limit: DEFAULT_DAILY_TAG_PURGE_LIMIT,
            max_items_per_request: MAX_ITEMS_PER_PURGE_REQUEST,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            daily_window_utc_offset_secs: 0,
            extension_signal_tag: DEFAULT_EXTENSION_SIGNAL_TAG.to_string(),
            cache_tag_header_limit: DEFAULT_CACHE_TAG_HEADER_LIMIT,
            credentials: CredentialSource::default(),
        }
    }
}

impl PurgeSettings {
    /// Rejects values no component can work with
    pub fn validate(&self) -> CoreResult<()> {
        if self.api_rate_limit == 0 {
            return Err(CoreError::ConfigError(
                "api_rate_limit must be greater than 0".to_string(),
            ));
        }
        if self.daily_tag_purge_limit == 0 {
            return Err(CoreError::ConfigError(
                "daily_tag_purge_limit must be greater than 0".to_string(),
            ));
        }
        if self.max_items_per_request == 0 {
            return Err(CoreError::ConfigError(
                "max_items_per_request must be greater than 0".to_string(),
            ));
        }
        if self.request_timeout_secs == 0 {
            return Err(CoreError::ConfigError(
                "request_timeout_secs must be greater than 0".to_string(),
            ));
        }
        self.daily_window_offset()?;
        Ok(())
    }

    /// Day-boundary offset for the daily counter
    pub fn daily_window_offset(&self) -> CoreResult<FixedOffset> {
        FixedOffset::east_opt(self.daily_window_utc_offset_secs).ok_or_else(|| {
            CoreError::ConfigError(format!(
                "daily_window_utc_offset_secs out of range: {}",
                self.daily_window_utc_offset_secs
            ))
        })
    }

    #[must_use]
    pub fn client_options(&self) -> ClientOptions {
        ClientOptions {
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            ..ClientOptions::default()
        }
    }

    /// Configured zone, ignoring blank values
    #[must_use]
    pub fn configured_zone(&self) -> Option<&str> {
        self.zone_id
            .as_deref()
            .map(str::trim)
            .filter(|z| !z.is_empty())
    }
}
