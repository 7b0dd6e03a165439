use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============ Provider Types ============

/// Identifies which CDN provider implementation to use.
///
/// Each variant is gated behind its corresponding feature flag.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ProviderType {
    /// Cloudflare. Requires feature `cloudflare`.
    #[cfg(feature = "cloudflare")]
    Cloudflare,
}

impl std::fmt::Display for ProviderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            #[cfg(feature = "cloudflare")]
            Self::Cloudflare => write!(f, "cloudflare"),
        }
    }
}

// ============ Credentials ============

/// Error returned when a credential pair fails local validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CredentialValidationError {
    /// A credential field is present but empty/whitespace-only.
    EmptyField {
        /// Machine-readable field key.
        field: String,
        /// Human-readable field label.
        label: String,
    },
    /// A credential field has an invalid format.
    InvalidFormat {
        /// Machine-readable field key.
        field: String,
        /// Human-readable field label.
        label: String,
        /// Description of what's wrong with the format.
        reason: String,
    },
}

impl std::fmt::Display for CredentialValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyField { label, .. } => write!(f, "Field must not be empty: {label}"),
            Self::InvalidFormat { label, reason, .. } => write!(f, "{label}: {reason}"),
        }
    }
}

impl std::error::Error for CredentialValidationError {}

/// API key / account email pair sent as `X-Auth-Key` / `X-Auth-Email`.
///
/// `Debug` output never contains the key.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    /// Global API key.
    pub api_key: String,
    /// Account email address.
    pub email: String,
}

impl Credentials {
    pub fn new(api_key: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            email: email.into(),
        }
    }

    /// Checks that both fields are present and the email looks like one.
    ///
    /// This is a local sanity check only; it says nothing about whether the
    /// provider accepts the pair.
    pub fn validate(&self) -> Result<(), CredentialValidationError> {
        if self.api_key.trim().is_empty() {
            return Err(CredentialValidationError::EmptyField {
                field: "api_key".to_string(),
                label: "API Key".to_string(),
            });
        }
        if self.email.trim().is_empty() {
            return Err(CredentialValidationError::EmptyField {
                field: "email".to_string(),
                label: "Email".to_string(),
            });
        }
        if !self.email.contains('@') {
            return Err(CredentialValidationError::InvalidFormat {
                field: "email".to_string(),
                label: "Email".to_string(),
                reason: "must be an email address".to_string(),
            });
        }
        Ok(())
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"<redacted>")
            .field("email", &self.email)
            .finish()
    }
}

// ============ Client Options ============

/// Default bound on a single provider request, in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Knobs for constructing a purge client.
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Upper bound on a whole request (connect + response).
    pub request_timeout: Duration,
    /// Override for the provider API base URL. `None` uses the public endpoint.
    pub base_url: Option<String>,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            base_url: None,
        }
    }
}

// ============ Zone Types ============

/// Status of a zone at the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZoneStatus {
    /// Zone is active and proxied.
    Active,
    /// Zone is pending activation/verification.
    Pending,
    /// Zone has been moved away or paused.
    Paused,
    /// Zone was deactivated.
    Deactivated,
    /// Status could not be determined.
    Unknown,
}

/// Read-only snapshot of a zone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Zone {
    /// Provider-specific zone identifier.
    pub id: String,
    /// Domain name (e.g., `"example.com"`).
    pub name: String,
    /// Current zone status.
    pub status: ZoneStatus,
    /// Whether the zone is paused (traffic bypasses the edge).
    #[serde(default)]
    pub paused: bool,
    /// Plan name, if reported.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan: Option<String>,
    /// Owner email, if reported.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    /// Name servers assigned to the zone.
    #[serde(default)]
    pub name_servers: Vec<String>,
}

// ============ Zone Settings ============

/// Value of a zone setting.
///
/// Composite shapes bundle several sub-values that are always updated together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum ZoneSettingValue {
    /// On/off toggle.
    Bool(bool),
    /// Numeric setting (e.g., browser cache TTL).
    Integer(i64),
    /// One of a fixed set of strings (e.g., security level `"medium"`).
    Enum(String),
    /// Auto-minify flags.
    Minify {
        /// Minify CSS.
        css: bool,
        /// Minify HTML.
        html: bool,
        /// Minify JavaScript.
        js: bool,
    },
    /// Mobile redirect.
    MobileRedirect {
        /// Whether the redirect is active.
        enabled: bool,
        /// Subdomain that mobile visitors are sent to.
        subdomain: Option<String>,
        /// Drop the path when redirecting.
        strip_uri: bool,
    },
    /// Security header (HSTS) block, kept as raw JSON.
    SecurityHeader(serde_json::Value),
    /// Any shape not modelled above.
    Other(serde_json::Value),
}

impl ZoneSettingValue {
    /// Short human-readable rendering of the value.
    pub fn display_value(&self) -> String {
        fn on_off(flag: bool) -> &'static str {
            if flag { "on" } else { "off" }
        }

        match self {
            Self::Bool(flag) => on_off(*flag).to_string(),
            Self::Integer(n) => n.to_string(),
            Self::Enum(s) => s.clone(),
            Self::Minify { css, html, js } => format!(
                "css={} html={} js={}",
                on_off(*css),
                on_off(*html),
                on_off(*js)
            ),
            Self::MobileRedirect {
                enabled,
                subdomain,
                strip_uri,
            } => format!(
                "{} subdomain={} strip_uri={strip_uri}",
                on_off(*enabled),
                subdomain.as_deref().unwrap_or("-")
            ),
            Self::SecurityHeader(v) | Self::Other(v) => v.to_string(),
        }
    }
}

/// One tunable property of a zone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneSetting {
    /// Setting identifier (e.g., `"security_level"`).
    pub name: String,
    /// Current value.
    pub value: ZoneSettingValue,
    /// Whether the account may change this setting.
    pub editable: bool,
    /// Last modification time, if reported.
    #[serde(
        default,
        with = "crate::utils::datetime",
        skip_serializing_if = "Option::is_none"
    )]
    pub last_modified: Option<DateTime<Utc>>,
}

impl ZoneSetting {
    pub fn new(name: impl Into<String>, value: ZoneSettingValue, editable: bool) -> Self {
        Self {
            name: name.into(),
            value,
            editable,
            last_modified: None,
        }
    }

    /// Copy of this setting carrying a new value.
    #[must_use]
    pub fn with_value(&self, value: ZoneSettingValue) -> Self {
        Self {
            value,
            ..self.clone()
        }
    }
}
