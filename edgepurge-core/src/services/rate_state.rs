//! Provider quota accounting

use std::sync::Arc;

use chrono::FixedOffset;

use crate::error::CoreResult;
use crate::traits::{Clock, StateStore};
use crate::types::{CounterKind, RateWindow};

/// Tracks API calls per five minutes and tag purges per calendar day
///
/// Every read and increment goes to the [`StateStore`]; nothing is cached in
/// memory, so counts survive restarts and are shared between processes using
/// the same store. Storage errors are returned as-is.
#[derive(Clone)]
pub struct RateState {
    store: Arc<dyn StateStore>,
    clock: Arc<dyn Clock>,
    api_window: RateWindow,
    daily_window: RateWindow,
}

impl RateState {
    /// Daily window aligned to UTC midnight
    #[must_use]
    pub fn new(store: Arc<dyn StateStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            clock,
            api_window: RateWindow::api_rate(),
            daily_window: RateWindow::utc_day(),
        }
    }

    /// Move the daily boundary to midnight at `offset`
    #[must_use]
    pub fn with_daily_offset(mut self, offset: FixedOffset) -> Self {
        self.daily_window = RateWindow::CalendarDay(offset);
        self
    }

    /// API calls in the active five minute window
    pub async fn get_api_rate_count(&self) -> CoreResult<u64> {
        self.get(CounterKind::ApiRate, &self.api_window).await
    }

    /// Record one API call; returns the new count
    pub async fn increment_api_rate_count(&self) -> CoreResult<u64> {
        self.increment(CounterKind::ApiRate, &self.api_window).await
    }

    /// Tag purge requests made today
    pub async fn get_tag_daily_count(&self) -> CoreResult<u64> {
        self.get(CounterKind::TagPurgeDaily, &self.daily_window)
            .await
    }

    /// Record one tag purge request; returns the new count
    pub async fn increment_tag_purge_daily_count(&self) -> CoreResult<u64> {
        self.increment(CounterKind::TagPurgeDaily, &self.daily_window)
            .await
    }

    async fn get(&self, kind: CounterKind, window: &RateWindow) -> CoreResult<u64> {
        let counter = self.store.get_counter(kind).await?;
        Ok(window.current_count(counter.as_ref(), self.clock.now()))
    }

    async fn increment(&self, kind: CounterKind, window: &RateWindow) -> CoreResult<u64> {
        let counter = self
            .store
            .increment_counter(kind, window, self.clock.now())
            .await?;
        log::debug!(
            "[rate_state] {} = {} (window start {})",
            kind.count_key(),
            counter.count,
            counter.window_start.to_rfc3339()
        );
        Ok(counter.count)
    }
}
