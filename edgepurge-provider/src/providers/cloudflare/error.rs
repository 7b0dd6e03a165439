//! Cloudflare error mapping

use crate::error::PurgeError;
use crate::traits::{ErrorContext, ErrorMapper, RawApiError};

use super::CloudflareClient;

/// Cloudflare error code mapping
/// Reference: <https://developers.cloudflare.com/fundamentals/api/troubleshooting/>
impl ErrorMapper for CloudflareClient {
    fn provider_name(&self) -> &'static str {
        "cloudflare"
    }

    fn map_error(&self, raw: RawApiError, context: ErrorContext) -> PurgeError {
        if matches!(raw.http_status, Some(401 | 403)) {
            return PurgeError::InvalidCredentials {
                provider: self.provider_name().to_string(),
                raw_message: Some(raw.message),
            };
        }

        match raw.code.as_deref() {
            // Authentication error
            // 6003: Invalid request headers
            // 6103: Invalid format for X-Auth-Key header
            // 6102: Invalid format for X-Auth-Email header
            // 9103: Unknown X-Auth-Key or X-Auth-Email
            // 9109: Unauthorized to access requested resource / Max auth failures reached
            // 10000: Authentication error
            Some("6003" | "6102" | "6103" | "9103" | "9109" | "10000") => {
                PurgeError::InvalidCredentials {
                    provider: self.provider_name().to_string(),
                    raw_message: Some(raw.message),
                }
            }

            // Zone does not exist
            // 1001: Invalid zone identifier
            // 7003: Could not route to /path. perhaps your object identifier is invalid?
            Some("1001" | "7003") => PurgeError::ZoneNotFound {
                provider: self.provider_name().to_string(),
                zone_id: context.zone_id.unwrap_or_else(|| "<unknown>".to_string()),
                raw_message: Some(raw.message),
            },

            // 1015: You are being rate limited (delivered with a non-429 status)
            Some("1015" | "10429") => PurgeError::RateLimited {
                provider: self.provider_name().to_string(),
                retry_after: None,
                raw_message: Some(raw.message),
            },

            // Everything else keeps its HTTP status (304, 4xx, 5xx)
            _ => self.unknown_error(raw),
        }
    }
}
