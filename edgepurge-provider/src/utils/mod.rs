//! Utility modules.

/// Serde helpers for optional timestamps.
pub mod datetime;

/// Truncation of response bodies before they reach the logs.
pub mod log_sanitizer;
