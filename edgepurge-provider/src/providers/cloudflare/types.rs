//! Cloudflare API type definitions

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use crate::types::{ZoneSetting, ZoneSettingValue, ZoneStatus};

/// Cloudflare API generic response envelope
#[derive(Debug, Deserialize)]
pub struct CloudflareResponse<T> {
    pub success: bool,
    pub result: Option<T>,
    pub errors: Option<Vec<CloudflareError>>,
    pub result_info: Option<CloudflareResultInfo>,
}

impl<T> CloudflareResponse<T> {
    /// First error code/message pair, if any.
    pub fn first_error(&self) -> Option<(String, String)> {
        self.errors
            .as_ref()
            .and_then(|errors| errors.first())
            .map(|e| (e.code.to_string(), e.message.clone()))
    }
}

#[derive(Debug, Deserialize)]
pub struct CloudflareError {
    pub code: i32,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct CloudflareResultInfo {
    pub page: u32,
    #[allow(dead_code)]
    pub per_page: u32,
    pub total_pages: Option<u32>,
    pub total_count: u32,
}

#[derive(Debug, Deserialize)]
pub struct CloudflarePlan {
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CloudflareOwner {
    pub email: Option<String>,
}

/// Cloudflare Zone structure
#[derive(Debug, Deserialize)]
pub struct CloudflareZone {
    pub id: String,
    pub name: String,
    pub status: String,
    #[serde(default)]
    pub paused: bool,
    pub plan: Option<CloudflarePlan>,
    pub owner: Option<CloudflareOwner>,
    #[serde(default)]
    pub name_servers: Vec<String>,
}

impl CloudflareZone {
    /// Cloudflare statuses: active, pending, initializing, moved, deleted, deactivated
    pub fn status(&self) -> ZoneStatus {
        match self.status.as_str() {
            "active" => ZoneStatus::Active,
            "pending" | "initializing" => ZoneStatus::Pending,
            "moved" => ZoneStatus::Paused,
            "deleted" | "deactivated" => ZoneStatus::Deactivated,
            _ => ZoneStatus::Unknown,
        }
    }
}

/// Cloudflare zone setting as returned by `GET zones/{id}/settings`
#[derive(Debug, Serialize, Deserialize)]
pub struct CloudflareZoneSetting {
    pub id: String,
    pub value: Value,
    #[serde(default)]
    pub editable: bool,
    pub modified_on: Option<String>,
}

/// Body of `DELETE zones/{id}/purge_cache`
#[derive(Debug, Serialize)]
pub struct PurgeCacheBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purge_everything: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub files: Option<&'a [String]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<&'a [String]>,
}

impl<'a> PurgeCacheBody<'a> {
    pub fn everything() -> Self {
        Self {
            purge_everything: Some(true),
            files: None,
            tags: None,
        }
    }

    pub fn files(files: &'a [String]) -> Self {
        Self {
            purge_everything: None,
            files: Some(files),
            tags: None,
        }
    }

    pub fn tags(tags: &'a [String]) -> Self {
        Self {
            purge_everything: None,
            files: None,
            tags: Some(tags),
        }
    }
}

// ============ Setting value conversion ============

fn on_off(flag: bool) -> Value {
    Value::String(if flag { "on" } else { "off" }.to_string())
}

fn is_on(value: Option<&Value>) -> Option<bool> {
    match value?.as_str()? {
        "on" => Some(true),
        "off" => Some(false),
        _ => None,
    }
}

/// Decode a wire value into the typed setting shape.
pub fn value_from_wire(id: &str, value: Value) -> ZoneSettingValue {
    if id == "security_header" {
        return ZoneSettingValue::SecurityHeader(value);
    }

    match value {
        Value::String(s) => match s.as_str() {
            "on" => ZoneSettingValue::Bool(true),
            "off" => ZoneSettingValue::Bool(false),
            _ => ZoneSettingValue::Enum(s),
        },
        Value::Bool(flag) => ZoneSettingValue::Bool(flag),
        Value::Number(n) => match n.as_i64() {
            Some(i) => ZoneSettingValue::Integer(i),
            None => ZoneSettingValue::Other(Value::Number(n)),
        },
        Value::Object(obj) => {
            object_from_wire(&obj).unwrap_or_else(|| ZoneSettingValue::Other(Value::Object(obj)))
        }
        other => ZoneSettingValue::Other(other),
    }
}

fn object_from_wire(obj: &Map<String, Value>) -> Option<ZoneSettingValue> {
    if obj.contains_key("css") || obj.contains_key("html") || obj.contains_key("js") {
        return Some(ZoneSettingValue::Minify {
            css: is_on(obj.get("css"))?,
            html: is_on(obj.get("html"))?,
            js: is_on(obj.get("js"))?,
        });
    }
    if obj.contains_key("mobile_subdomain") || obj.contains_key("strip_uri") {
        return Some(ZoneSettingValue::MobileRedirect {
            enabled: is_on(obj.get("status")).unwrap_or(false),
            subdomain: obj
                .get("mobile_subdomain")
                .and_then(Value::as_str)
                .map(str::to_string),
            strip_uri: obj
                .get("strip_uri")
                .and_then(Value::as_bool)
                .unwrap_or(false),
        });
    }
    None
}

/// Encode a typed value into what the settings endpoint expects.
pub fn value_to_wire(value: &ZoneSettingValue) -> Value {
    match value {
        ZoneSettingValue::Bool(flag) => on_off(*flag),
        ZoneSettingValue::Integer(n) => json!(n),
        ZoneSettingValue::Enum(s) => Value::String(s.clone()),
        ZoneSettingValue::Minify { css, html, js } => json!({
            "css": on_off(*css),
            "html": on_off(*html),
            "js": on_off(*js),
        }),
        ZoneSettingValue::MobileRedirect {
            enabled,
            subdomain,
            strip_uri,
        } => json!({
            "status": on_off(*enabled),
            "mobile_subdomain": subdomain,
            "strip_uri": strip_uri,
        }),
        ZoneSettingValue::SecurityHeader(v) | ZoneSettingValue::Other(v) => v.clone(),
    }
}

impl From<CloudflareZoneSetting> for ZoneSetting {
    fn from(raw: CloudflareZoneSetting) -> Self {
        let last_modified = raw
            .modified_on
            .as_deref()
            .and_then(|s| chrono::DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| dt.with_timezone(&chrono::Utc));
        Self {
            value: value_from_wire(&raw.id, raw.value),
            name: raw.id,
            editable: raw.editable,
            last_modified,
        }
    }
}
