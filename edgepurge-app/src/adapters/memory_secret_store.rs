//! In-memory `SecretStore`.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use edgepurge_core::error::CoreResult;
use edgepurge_core::traits::SecretStore;

#[derive(Debug, Clone)]
enum Secret {
    Value(String),
    Values(HashMap<String, String>),
}

/// Secrets held in process memory
///
/// Useful when the embedding program reads secrets from its own source
/// (environment, a vault client) at startup. Asking for a single value of a
/// multi-value secret, or the reverse, reads as absent.
#[derive(Debug, Clone, Default)]
pub struct InMemorySecretStore {
    secrets: Arc<RwLock<HashMap<String, Secret>>>,
}

impl InMemorySecretStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a single-value secret, replacing any previous one
    pub async fn set_value(&self, secret_id: impl Into<String>, value: impl Into<String>) {
        self.secrets
            .write()
            .await
            .insert(secret_id.into(), Secret::Value(value.into()));
    }

    /// Store a multi-value secret, replacing any previous one
    pub async fn set_values(&self, secret_id: impl Into<String>, values: HashMap<String, String>) {
        self.secrets
            .write()
            .await
            .insert(secret_id.into(), Secret::Values(values));
    }

    pub async fn remove(&self, secret_id: &str) {
        self.secrets.write().await.remove(secret_id);
    }
}

#[async_trait]
impl SecretStore for InMemorySecretStore {
    async fn get_value(&self, secret_id: &str) -> CoreResult<Option<String>> {
        Ok(match self.secrets.read().await.get(secret_id) {
            Some(Secret::Value(v)) => Some(v.clone()),
            _ => None,
        })
    }

    async fn get_values(&self, secret_id: &str) -> CoreResult<Option<HashMap<String, String>>> {
        Ok(match self.secrets.read().await.get(secret_id) {
            Some(Secret::Values(v)) => Some(v.clone()),
            _ => None,
        })
    }
}
