//! Rate counter persistence abstract Trait

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::error::CoreResult;
use crate::types::{CounterKind, RateCounter, RateWindow};

/// Durable storage for the rate counters
///
/// Platform implementations:
/// - Core: `InMemoryStateStore` (tests, ephemeral use)
/// - App: `SqliteStore` (`SeaORM`, feature `sqlite-store`)
///
/// Each counter occupies two keys, see [`CounterKind::count_key`] and
/// [`CounterKind::start_key`].
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Read the stored counter
    ///
    /// # Returns
    /// * `Ok(Some(counter))` - both keys present
    /// * `Ok(None)` - nothing recorded yet
    async fn get_counter(&self, kind: CounterKind) -> CoreResult<Option<RateCounter>>;

    /// Apply one increment under `window` and return the stored result
    ///
    /// Must be atomic with respect to concurrent callers sharing the same
    /// store: read, [`RateWindow::advance`] and write happen in one
    /// isolated step.
    ///
    /// # Arguments
    /// * `kind` - Counter to increment
    /// * `window` - Window used to decide between increment and reset
    /// * `now` - Current time from the injected clock
    async fn increment_counter(
        &self,
        kind: CounterKind,
        window: &RateWindow,
        now: DateTime<Utc>,
    ) -> CoreResult<RateCounter>;
}

/// In-memory state store
///
/// Not durable; state is lost with the process.
#[derive(Clone, Default)]
pub struct InMemoryStateStore {
    counters: Arc<Mutex<HashMap<CounterKind, RateCounter>>>,
}

impl InMemoryStateStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StateStore for InMemoryStateStore {
    async fn get_counter(&self, kind: CounterKind) -> CoreResult<Option<RateCounter>> {
        Ok(self.counters.lock().await.get(&kind).copied())
    }

    async fn increment_counter(
        &self,
        kind: CounterKind,
        window: &RateWindow,
        now: DateTime<Utc>,
    ) -> CoreResult<RateCounter> {
        let mut counters = self.counters.lock().await;
        let next = window.advance(counters.get(&kind).copied(), now);
        counters.insert(kind, next);
        Ok(next)
    }
}
