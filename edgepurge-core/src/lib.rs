//! edgepurge core library
//!
//! Cache invalidation logic for a CDN edge cache:
//! - Rate accounting against the provider's API and daily tag-purge limits (`RateState`)
//! - Tag hashing (`TagHasher`)
//! - Batched, failure-isolated purge dispatch (`InvalidationDispatcher`)
//! - Credential validation, zone lookup and status diagnostics
//!
//! Storage, secrets, time and client construction are abstracted through
//! traits so the platform layer can plug in its own implementations.

pub mod error;
pub mod services;
pub mod traits;
pub mod types;

#[cfg(test)]
mod test_utils;

// Re-export common types
pub use error::{CoreError, CoreResult};
pub use services::ServiceContext;
pub use traits::{
    ClientFactory, Clock, DependencyProbe, SecretStore, SettingsRepository, StateStore,
};
