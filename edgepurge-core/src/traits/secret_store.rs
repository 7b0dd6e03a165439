//! Secret store abstract Trait

use async_trait::async_trait;
use std::collections::HashMap;

use crate::error::CoreResult;

/// Read access to externally managed secrets
///
/// A missing secret is `Ok(None)`, not an error.
#[async_trait]
pub trait SecretStore: Send + Sync {
    /// Single-value secret, e.g. an API key
    ///
    /// # Arguments
    /// * `secret_id` - Secret identifier
    async fn get_value(&self, secret_id: &str) -> CoreResult<Option<String>>;

    /// Multi-value secret, e.g. `username` / `password`
    ///
    /// # Arguments
    /// * `secret_id` - Secret identifier
    async fn get_values(&self, secret_id: &str) -> CoreResult<Option<HashMap<String, String>>>;
}
