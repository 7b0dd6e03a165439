//! Cloudflare purge client

mod error;
mod http;
mod provider;
mod types;

use reqwest::Client;

use crate::error::Result;
use crate::providers::common::{create_http_client, normalize_base_url};
use crate::types::{ClientOptions, Credentials};

pub(crate) use types::{
    CloudflareResponse, CloudflareZone, CloudflareZoneSetting, PurgeCacheBody,
};

pub(crate) const CF_API_BASE: &str = "https://api.cloudflare.com/client/v4";
/// Maximum number of zones per page for the Cloudflare Zones API
pub(crate) const MAX_PAGE_SIZE_ZONES: u32 = 50;
/// Maximum number of tags or files in a single purge_cache request
pub const MAX_ITEMS_PER_PURGE_REQUEST: usize = 30;

/// Cloudflare purge client authenticating with a global API key.
pub struct CloudflareClient {
    pub(crate) client: Client,
    pub(crate) credentials: Credentials,
    pub(crate) base_url: String,
}

impl CloudflareClient {
    pub fn new(credentials: Credentials, options: &ClientOptions) -> Result<Self> {
        let base_url = options
            .base_url
            .as_deref()
            .map_or_else(|| CF_API_BASE.to_string(), normalize_base_url);
        Ok(Self {
            client: create_http_client("cloudflare", options.request_timeout)?,
            credentials,
            base_url,
        })
    }

    /// Point the client at another API root (mock servers, proxies).
    #[must_use]
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = normalize_base_url(base_url);
        self
    }
}
