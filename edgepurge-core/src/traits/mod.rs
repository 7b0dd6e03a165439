//! Storage and collaborator abstraction layer
//!
//! Defines the traits the platform layer implements.

mod client_factory;
mod clock;
mod dependency_probe;
mod secret_store;
mod settings_repository;
mod state_store;

pub use client_factory::{ClientFactory, ProviderClientFactory};
pub use clock::{Clock, SystemClock};
pub use dependency_probe::{DependencyProbe, HttpStackProbe};
pub use secret_store::SecretStore;
pub use settings_repository::SettingsRepository;
pub use state_store::{InMemoryStateStore, StateStore};
