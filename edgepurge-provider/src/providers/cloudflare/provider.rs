//! Cloudflare `PurgeClient` trait implementation

use async_trait::async_trait;
use serde_json::json;
use urlencoding::encode;

use crate::error::{PurgeError, Result};
use crate::traits::{ErrorContext, ErrorMapper, PurgeClient};
use crate::types::{Zone, ZoneSetting};

use super::types::value_to_wire;
use super::{
    CloudflareClient, CloudflareZone, CloudflareZoneSetting, MAX_ITEMS_PER_PURGE_REQUEST,
    PurgeCacheBody,
};

impl CloudflareClient {
    pub(crate) fn cf_zone_to_zone(zone: CloudflareZone) -> Zone {
        let status = zone.status();
        Zone {
            id: zone.id,
            name: zone.name,
            status,
            paused: zone.paused,
            plan: zone.plan.and_then(|p| p.name),
            owner: zone.owner.and_then(|o| o.email),
            name_servers: zone.name_servers,
        }
    }

    async fn purge_cache(&self, zone_id: &str, body: &PurgeCacheBody<'_>) -> Result<()> {
        self.delete_with_body(
            &format!("/zones/{}/purge_cache", encode(zone_id)),
            body,
            ErrorContext::zone(zone_id),
        )
        .await
    }
}

#[async_trait]
impl PurgeClient for CloudflareClient {
    fn id(&self) -> &'static str {
        "cloudflare"
    }

    fn max_items_per_request(&self) -> usize {
        MAX_ITEMS_PER_PURGE_REQUEST
    }

    async fn list_zones(&self) -> Result<Vec<Zone>> {
        let zones: Vec<CloudflareZone> = self.get_all_pages("/zones").await?;
        Ok(zones.into_iter().map(Self::cf_zone_to_zone).collect())
    }

    async fn get_zone_settings(&self, zone_id: &str) -> Result<Vec<ZoneSetting>> {
        let settings: Vec<CloudflareZoneSetting> = self
            .get(
                &format!("/zones/{}/settings", encode(zone_id)),
                ErrorContext::zone(zone_id),
            )
            .await?;
        Ok(settings.into_iter().map(ZoneSetting::from).collect())
    }

    async fn update_zone_setting(
        &self,
        zone_id: &str,
        setting: &ZoneSetting,
    ) -> Result<ZoneSetting> {
        if !setting.editable {
            return Err(PurgeError::NotEditable {
                provider: self.provider_name().to_string(),
                setting: setting.name.clone(),
            });
        }

        let body = json!({ "value": value_to_wire(&setting.value) });
        let updated: CloudflareZoneSetting = self
            .patch(
                &format!(
                    "/zones/{}/settings/{}",
                    encode(zone_id),
                    encode(&setting.name)
                ),
                &body,
                ErrorContext::zone(zone_id),
            )
            .await?;
        Ok(updated.into())
    }

    async fn purge_tags(&self, zone_id: &str, tags: &[String]) -> Result<()> {
        self.purge_cache(zone_id, &PurgeCacheBody::tags(tags)).await
    }

    async fn purge_urls(&self, zone_id: &str, urls: &[String]) -> Result<()> {
        self.purge_cache(zone_id, &PurgeCacheBody::files(urls)).await
    }

    async fn purge_everything(&self, zone_id: &str) -> Result<()> {
        self.purge_cache(zone_id, &PurgeCacheBody::everything())
            .await
    }
}
