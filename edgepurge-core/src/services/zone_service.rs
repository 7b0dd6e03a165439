//! Zone lookup and zone settings service

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;

use edgepurge_provider::{PurgeClient, PurgeError, Zone, ZoneSetting};

use crate::error::{CoreError, CoreResult};
use crate::services::{DispatchOptions, InvalidationDispatcher, RateState, ServiceContext};

/// How long a zone listing is reused
pub const ZONE_CACHE_TTL_SECS: i64 = 300;

struct CachedZones {
    zones: Vec<Zone>,
    fetched_at: DateTime<Utc>,
}

/// Zone service
///
/// Every request it sends counts towards the API rate.
pub struct ZoneService {
    ctx: Arc<ServiceContext>,
    rate_state: RateState,
    cache: RwLock<Option<CachedZones>>,
    ttl: Duration,
}

impl ZoneService {
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>, rate_state: RateState) -> Self {
        Self {
            ctx,
            rate_state,
            cache: RwLock::new(None),
            ttl: Duration::seconds(ZONE_CACHE_TTL_SECS),
        }
    }

    /// Zones visible to the configured credentials
    ///
    /// Served from cache while the last listing is younger than the TTL.
    pub async fn list_zones(&self) -> CoreResult<Vec<Zone>> {
        let now = self.ctx.clock.now();
        if let Some(cached) = self.cache.read().await.as_ref() {
            if now.signed_duration_since(cached.fetched_at) < self.ttl {
                return Ok(cached.zones.clone());
            }
        }

        let client = self.client().await?;
        let result = client.list_zones().await;
        self.rate_state.increment_api_rate_count().await?;
        let zones = match result {
            Ok(zones) => zones,
            Err(e) => return Err(self.ctx.handle_purge_error(e).await),
        };

        log::debug!("[zones] Fetched {} zone(s)", zones.len());
        *self.cache.write().await = Some(CachedZones {
            zones: zones.clone(),
            fetched_at: now,
        });
        Ok(zones)
    }

    /// Drop the cached listing
    pub async fn invalidate_cache(&self) {
        *self.cache.write().await = None;
    }

    /// The zone purges go to
    ///
    /// The configured zone if there is one, otherwise the account's only zone.
    pub async fn current_zone_id(&self) -> CoreResult<String> {
        let settings = self.ctx.load_settings().await?;
        if let Some(zone_id) = settings.configured_zone() {
            return Ok(zone_id.to_string());
        }

        let zones = self.list_zones().await?;
        match zones.as_slice() {
            [zone] => Ok(zone.id.clone()),
            [] => Err(CoreError::ZoneNotConfigured(
                "no zones visible to these credentials".to_string(),
            )),
            many => Err(CoreError::ZoneNotConfigured(format!(
                "account has {} zones, set zone_id",
                many.len()
            ))),
        }
    }

    /// Settings of the current zone
    pub async fn get_zone_settings(&self) -> CoreResult<Vec<ZoneSetting>> {
        let zone_id = self.current_zone_id().await?;
        let client = self.client().await?;
        let result = client.get_zone_settings(&zone_id).await;
        self.rate_state.increment_api_rate_count().await?;
        match result {
            Ok(settings) => Ok(settings),
            Err(e) => Err(self.ctx.handle_purge_error(e).await),
        }
    }

    /// Update one setting of the current zone
    ///
    /// A setting that is not editable is refused without sending a request
    /// and is not counted.
    pub async fn update_zone_setting(&self, setting: &ZoneSetting) -> CoreResult<ZoneSetting> {
        let zone_id = self.current_zone_id().await?;
        let client = self.client().await?;
        match client.update_zone_setting(&zone_id, setting).await {
            Err(e @ PurgeError::NotEditable { .. }) => {
                log::warn!("[zones] {e}");
                Err(e.into())
            }
            result => {
                self.rate_state.increment_api_rate_count().await?;
                match result {
                    Ok(updated) => {
                        log::info!(
                            "[zones] Updated '{}' on zone {zone_id}: {}",
                            updated.name,
                            updated.value.display_value()
                        );
                        Ok(updated)
                    }
                    Err(e) => Err(self.ctx.handle_purge_error(e).await),
                }
            }
        }
    }

    /// Dispatcher bound to the current zone and configured credentials
    pub async fn dispatcher(&self) -> CoreResult<InvalidationDispatcher> {
        let settings = self.ctx.load_settings().await?;
        let zone_id = self.current_zone_id().await?;
        let client = self.client().await?;
        Ok(InvalidationDispatcher::new(
            client,
            zone_id,
            self.rate_state.clone(),
            DispatchOptions::from(&settings),
        ))
    }

    async fn client(&self) -> CoreResult<Arc<dyn PurgeClient>> {
        let settings = self.ctx.load_settings().await?;
        self.ctx.purge_client(&settings).await
    }
}
