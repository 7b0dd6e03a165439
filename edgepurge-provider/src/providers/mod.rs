//! CDN purge client implementations

/// Shared utilities used by provider implementations.
pub mod common;

#[cfg(feature = "cloudflare")]
mod cloudflare;

#[cfg(feature = "cloudflare")]
pub use cloudflare::{CloudflareClient, MAX_ITEMS_PER_PURGE_REQUEST};
