use async_trait::async_trait;

use crate::error::{PurgeError, Result};
use crate::types::{Zone, ZoneSetting};

/// Raw API error (internal use)
#[derive(Debug, Clone)]
pub(crate) struct RawApiError {
    /// HTTP status of the response, when the provider answered.
    pub http_status: Option<u16>,
    /// Provider error code (format differs per provider)
    pub code: Option<String>,
    /// Raw error message
    pub message: String,
}

impl RawApiError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            http_status: None,
            code: None,
            message: message.into(),
        }
    }

    pub fn with_code(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            http_status: None,
            code: Some(code.into()),
            message: message.into(),
        }
    }

    #[must_use]
    pub fn with_status(mut self, http_status: u16) -> Self {
        self.http_status = Some(http_status);
        self
    }
}

/// Extra context used while mapping an error (internal use)
#[derive(Debug, Clone, Default)]
pub(crate) struct ErrorContext {
    /// Zone the request targeted (for `ZoneNotFound`)
    pub zone_id: Option<String>,
}

impl ErrorContext {
    pub fn zone(zone_id: &str) -> Self {
        Self {
            zone_id: Some(zone_id.to_string()),
        }
    }
}

/// Maps raw provider failures onto [`PurgeError`] (internal use)
pub(crate) trait ErrorMapper {
    /// Provider identifier
    fn provider_name(&self) -> &'static str;

    /// Map a raw API error to the unified error type
    fn map_error(&self, raw: RawApiError, context: ErrorContext) -> PurgeError;

    /// Shortcut: parse error
    fn parse_error(&self, detail: impl ToString) -> PurgeError {
        PurgeError::ParseError {
            provider: self.provider_name().to_string(),
            detail: detail.to_string(),
        }
    }

    /// Shortcut: fallback for anything unrecognised
    fn unknown_error(&self, raw: RawApiError) -> PurgeError {
        match raw.http_status {
            Some(http_status) => PurgeError::Api {
                provider: self.provider_name().to_string(),
                http_status,
                raw_code: raw.code,
                raw_message: raw.message,
            },
            None => PurgeError::Unknown {
                provider: self.provider_name().to_string(),
                raw_code: raw.code,
                raw_message: raw.message,
            },
        }
    }
}

/// CDN purge client.
///
/// Every method issues provider requests with a bounded timeout and turns any
/// non-success response into a [`PurgeError`]; an error is never reported as
/// an empty result. Nothing is retried automatically.
#[async_trait]
pub trait PurgeClient: Send + Sync {
    /// Provider identifier
    fn id(&self) -> &'static str;

    /// Largest number of tags or URLs accepted in one purge request.
    ///
    /// `purge_tags` and `purge_urls` do not chunk; callers must.
    fn max_items_per_request(&self) -> usize;

    /// List every zone of the authenticated account.
    async fn list_zones(&self) -> Result<Vec<Zone>>;

    /// Fetch all settings of a zone.
    async fn get_zone_settings(&self, zone_id: &str) -> Result<Vec<ZoneSetting>>;

    /// Update a single zone setting and return the stored result.
    ///
    /// Fails with [`PurgeError::NotEditable`] before any I/O when
    /// `setting.editable` is `false`.
    async fn update_zone_setting(&self, zone_id: &str, setting: &ZoneSetting)
    -> Result<ZoneSetting>;

    /// Purge cached objects carrying any of `tags`.
    async fn purge_tags(&self, zone_id: &str, tags: &[String]) -> Result<()>;

    /// Purge cached copies of `urls`.
    async fn purge_urls(&self, zone_id: &str, urls: &[String]) -> Result<()>;

    /// Purge the whole zone cache.
    async fn purge_everything(&self, zone_id: &str) -> Result<()>;
}
