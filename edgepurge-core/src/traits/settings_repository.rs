//! Settings persistence abstract Trait

use async_trait::async_trait;

use crate::error::CoreResult;
use crate::types::PurgeSettings;

/// Settings repository Trait
///
/// Platform implementations:
/// - App: `TomlSettingsRepository` (one TOML file)
#[async_trait]
pub trait SettingsRepository: Send + Sync {
    /// Load settings
    ///
    /// Returns defaults when nothing has been saved yet.
    async fn load(&self) -> CoreResult<PurgeSettings>;

    /// Replace the stored settings
    ///
    /// # Arguments
    /// * `settings` - Complete settings to persist
    async fn save(&self, settings: &PurgeSettings) -> CoreResult<()>;
}
