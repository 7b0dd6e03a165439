//! Shared test helpers

#![allow(dead_code)]

use std::env;
use std::sync::Arc;
use std::time::Duration;

use edgepurge_provider::{
    ClientOptions, CloudflareClient, Credentials, ProviderType, PurgeClient, create_client,
};

/// Skip the test when any of the environment variables is missing.
#[macro_export]
macro_rules! skip_if_no_credentials {
    ($($var:expr),+) => {
        $(
            if std::env::var($var).is_err() {
                eprintln!("Skipping test: missing environment variable {}", $var);
                return;
            }
        )+
    };
}

/// Assert that a `Result` is `Ok` and unwrap it (fails the test otherwise).
#[macro_export]
macro_rules! require_ok {
    ($expr:expr $(,)?) => {{
        let res = $expr;
        assert!(res.is_ok(), "expected Ok(..), got {res:?}");
        let Ok(val) = res else {
            return;
        };
        val
    }};
    ($expr:expr, $($msg:tt)+) => {{
        let res = $expr;
        assert!(
            res.is_ok(),
            "{}: {res:?}",
            format_args!($($msg)+)
        );
        let Ok(val) = res else {
            return;
        };
        val
    }};
}

/// Assert that an `Option` is `Some` and unwrap it (fails the test otherwise).
#[macro_export]
macro_rules! require_some {
    ($expr:expr $(,)?) => {{
        let opt = $expr;
        assert!(opt.is_some(), "expected Some(..), got None");
        let Some(val) = opt else {
            return;
        };
        val
    }};
    ($expr:expr, $($msg:tt)+) => {{
        let opt = $expr;
        assert!(opt.is_some(), "{}", format_args!($($msg)+));
        let Some(val) = opt else {
            return;
        };
        val
    }};
}

pub const TEST_API_KEY: &str = "test-api-key";
pub const TEST_EMAIL: &str = "ops@example.com";

/// Client pointed at a local mock server.
pub fn mock_client(base_url: &str) -> CloudflareClient {
    mock_client_with_timeout(base_url, Duration::from_secs(5))
}

/// Client pointed at a local mock server with a custom request bound.
pub fn mock_client_with_timeout(base_url: &str, request_timeout: Duration) -> CloudflareClient {
    let options = ClientOptions {
        request_timeout,
        base_url: Some(base_url.to_string()),
    };
    CloudflareClient::new(Credentials::new(TEST_API_KEY, TEST_EMAIL), &options)
        .expect("client should build")
}

/// Cloudflare envelope around a `result` value.
pub fn cf_ok(result: serde_json::Value) -> serde_json::Value {
    serde_json::json!({
        "success": true,
        "errors": [],
        "messages": [],
        "result": result,
    })
}

/// Cloudflare envelope carrying a single error.
pub fn cf_err(code: i32, message: &str) -> serde_json::Value {
    serde_json::json!({
        "success": false,
        "errors": [{ "code": code, "message": message }],
        "messages": [],
        "result": null,
    })
}

/// Live test context, built from environment variables
pub struct TestContext {
    pub client: Arc<dyn PurgeClient>,
    pub zone_name: Option<String>,
}

impl TestContext {
    /// Create a Cloudflare test context
    pub fn cloudflare() -> Option<Self> {
        let api_key = env::var("CLOUDFLARE_API_KEY").ok()?;
        let email = env::var("CLOUDFLARE_EMAIL").ok()?;
        let zone_name = env::var("TEST_ZONE").ok();

        let client = create_client(
            ProviderType::Cloudflare,
            Credentials::new(api_key, email),
            &ClientOptions::default(),
        )
        .ok()?;

        Some(Self { client, zone_name })
    }

    /// Resolve the test zone id, or the only zone of the account.
    pub async fn find_zone_id(&self) -> Option<String> {
        let zones = self.client.list_zones().await.ok()?;
        match &self.zone_name {
            Some(name) => zones.into_iter().find(|z| &z.name == name).map(|z| z.id),
            None if zones.len() == 1 => zones.into_iter().next().map(|z| z.id),
            None => None,
        }
    }
}
