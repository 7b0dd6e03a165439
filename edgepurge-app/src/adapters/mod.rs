//! Storage adapters for the core traits.

mod memory_secret_store;
mod toml_settings;

pub use memory_secret_store::InMemorySecretStore;
pub use toml_settings::TomlSettingsRepository;

#[cfg(feature = "sqlite-store")]
mod sqlite;

#[cfg(feature = "sqlite-store")]
pub use sqlite::SqliteStore;
