//! `SettingsRepository` backed by a single TOML file.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;

use edgepurge_core::error::{CoreError, CoreResult};
use edgepurge_core::traits::SettingsRepository;
use edgepurge_core::types::PurgeSettings;

/// Settings stored as TOML at a fixed path.
///
/// A missing file reads as [`PurgeSettings::default`]. Writes go to a
/// sibling temporary file that is then renamed over the target.
#[derive(Debug, Clone)]
pub struct TomlSettingsRepository {
    path: PathBuf,
}

impl TomlSettingsRepository {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(std::ffi::OsStr::to_os_string)
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl SettingsRepository for TomlSettingsRepository {
    async fn load(&self) -> CoreResult<PurgeSettings> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::debug!(
                    "[settings] {} not found, using defaults",
                    self.path.display()
                );
                return Ok(PurgeSettings::default());
            }
            Err(e) => {
                return Err(CoreError::StorageError(format!(
                    "Failed to read {}: {e}",
                    self.path.display()
                )));
            }
        };

        let settings: PurgeSettings = toml::from_str(&content).map_err(|e| {
            CoreError::ConfigError(format!("Invalid settings in {}: {e}", self.path.display()))
        })?;
        settings.validate()?;
        Ok(settings)
    }

    async fn save(&self, settings: &PurgeSettings) -> CoreResult<()> {
        let content = toml::to_string_pretty(settings)
            .map_err(|e| CoreError::SerializationError(e.to_string()))?;

        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                CoreError::StorageError(format!("Failed to create directory: {e}"))
            })?;
        }

        let tmp = self.temp_path();
        tokio::fs::write(&tmp, content)
            .await
            .map_err(|e| CoreError::StorageError(format!("Failed to write settings: {e}")))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| CoreError::StorageError(format!("Failed to replace settings: {e}")))?;

        log::debug!("[settings] Saved to {}", self.path.display());
        Ok(())
    }
}
