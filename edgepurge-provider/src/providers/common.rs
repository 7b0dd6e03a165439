//! Provider common utility functions

use std::time::Duration;

use reqwest::Client;

use crate::error::{PurgeError, Result};

// ============ HTTP Client ============

/// Default connection timeout (seconds)
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 5;

/// Create an HTTP client bounded by `request_timeout`.
///
/// The connect timeout never exceeds the request timeout.
pub fn create_http_client(provider: &str, request_timeout: Duration) -> Result<Client> {
    let connect_timeout = request_timeout.min(Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS));
    Client::builder()
        .connect_timeout(connect_timeout)
        .timeout(request_timeout)
        .build()
        .map_err(|e| PurgeError::NetworkError {
            provider: provider.to_string(),
            detail: format!("Failed to create HTTP client: {e}"),
        })
}

/// Strip trailing slashes so paths can be appended with a leading `/`.
pub fn normalize_base_url(base_url: &str) -> String {
    base_url.trim_end_matches('/').to_string()
}
