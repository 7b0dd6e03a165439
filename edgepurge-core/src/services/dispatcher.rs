//! Invalidation dispatch
//!
//! Turns pending invalidations into size-bounded provider purge requests.

use std::sync::Arc;

use edgepurge_provider::PurgeClient;

use crate::error::CoreResult;
use crate::services::{RateState, TagHasher};
use crate::types::{
    ChunkOutcome, DispatchSummary, InvalidationItem, InvalidationKind, InvalidationState,
    PurgeSettings, DEFAULT_EXTENSION_SIGNAL_TAG,
};

/// Dispatch tuning
#[derive(Debug, Clone)]
pub struct DispatchOptions {
    /// Upper bound on items per request; clamped to the client's own limit
    pub max_items_per_request: usize,
    /// Tag that turns a batch of tag purges into one full-zone purge
    pub extension_signal_tag: Option<String>,
}

impl Default for DispatchOptions {
    fn default() -> Self {
        Self {
            max_items_per_request: edgepurge_provider::MAX_ITEMS_PER_PURGE_REQUEST,
            extension_signal_tag: Some(DEFAULT_EXTENSION_SIGNAL_TAG.to_string()),
        }
    }
}

impl From<&PurgeSettings> for DispatchOptions {
    fn from(settings: &PurgeSettings) -> Self {
        let signal = settings.extension_signal_tag.trim();
        Self {
            max_items_per_request: settings.max_items_per_request,
            extension_signal_tag: (!signal.is_empty()).then(|| signal.to_string()),
        }
    }
}

/// Provider request a chunk turns into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PurgeAction {
    Tags,
    Urls,
    Everything,
}

#[derive(Debug)]
struct Chunk {
    kind: InvalidationKind,
    action: PurgeAction,
    /// Indices into the dispatched slice
    items: Vec<usize>,
}

/// Sends pending invalidations to the provider and records quota usage
///
/// Provider failures never escape [`dispatch`](Self::dispatch): they end up
/// as `Failed` item states. Storage failures from [`RateState`] do escape,
/// since losing a count could push real usage past the provider limit.
pub struct InvalidationDispatcher {
    client: Arc<dyn PurgeClient>,
    zone_id: String,
    rate_state: RateState,
    options: DispatchOptions,
}

impl InvalidationDispatcher {
    pub fn new(
        client: Arc<dyn PurgeClient>,
        zone_id: impl Into<String>,
        rate_state: RateState,
        options: DispatchOptions,
    ) -> Self {
        Self {
            client,
            zone_id: zone_id.into(),
            rate_state,
            options,
        }
    }

    #[must_use]
    pub fn zone_id(&self) -> &str {
        &self.zone_id
    }

    /// Items per request actually used
    fn chunk_size(&self) -> usize {
        self.options
            .max_items_per_request
            .clamp(1, self.client.max_items_per_request().max(1))
    }

    /// Dispatch every `Pending` item in `items`
    ///
    /// Items in any other state are left untouched. Chunks are sent one after
    /// another; a failed chunk does not stop the ones after it.
    pub async fn dispatch(&self, items: &mut [InvalidationItem]) -> CoreResult<DispatchSummary> {
        let mut summary = DispatchSummary {
            skipped: items
                .iter()
                .filter(|i| i.state != InvalidationState::Pending)
                .count(),
            ..DispatchSummary::default()
        };

        let chunks = self.plan(items);
        if chunks.is_empty() {
            log::info!("[dispatcher] Nothing to invalidate");
            return Ok(summary);
        }

        log::info!(
            "[dispatcher] Dispatching {} invalidation(s) in {} request(s) to zone {}",
            items.len() - summary.skipped,
            chunks.len(),
            self.zone_id
        );

        for chunk in chunks {
            let outcome = self.process_chunk(items, &chunk).await?;
            if outcome.succeeded {
                summary.succeeded += outcome.items;
            } else {
                summary.failed += outcome.items;
            }
            summary.chunks.push(outcome);
        }

        Ok(summary)
    }

    /// Convenience wrapper: invalidate a set of cache tags
    pub async fn dispatch_tags<S: AsRef<str>>(
        &self,
        tags: &[S],
    ) -> CoreResult<(Vec<InvalidationItem>, DispatchSummary)> {
        let mut items: Vec<_> = tags
            .iter()
            .map(|t| InvalidationItem::tag(t.as_ref()))
            .collect();
        let summary = self.dispatch(&mut items).await?;
        Ok((items, summary))
    }

    /// Group pending items by kind, in order of first appearance, and split
    /// each group into requests
    ///
    /// Tag and URL groups are cut to the chunk size. `Everything` items (and
    /// a tag group carrying the extension signal) need one `purge_everything`
    /// call however many there are, so they always form a single chunk.
    fn plan(&self, items: &[InvalidationItem]) -> Vec<Chunk> {
        let mut groups: Vec<(InvalidationKind, Vec<usize>)> = Vec::new();
        for (idx, item) in items.iter().enumerate() {
            if item.state != InvalidationState::Pending {
                continue;
            }
            match groups.iter_mut().find(|(kind, _)| *kind == item.kind) {
                Some((_, members)) => members.push(idx),
                None => groups.push((item.kind, vec![idx])),
            }
        }

        let size = self.chunk_size();
        let mut chunks = Vec::new();
        for (kind, members) in groups {
            match kind {
                InvalidationKind::Tag if self.has_extension_signal(items, &members) => {
                    log::info!(
                        "[dispatcher] Extension change signalled, purging the whole zone instead of {} tag(s)",
                        members.len()
                    );
                    chunks.push(Chunk {
                        kind,
                        action: PurgeAction::Everything,
                        items: members,
                    });
                }
                InvalidationKind::Tag | InvalidationKind::Url => {
                    let action = if kind == InvalidationKind::Tag {
                        PurgeAction::Tags
                    } else {
                        PurgeAction::Urls
                    };
                    chunks.extend(members.chunks(size).map(|part| Chunk {
                        kind,
                        action,
                        items: part.to_vec(),
                    }));
                }
                InvalidationKind::Everything => chunks.push(Chunk {
                    kind,
                    action: PurgeAction::Everything,
                    items: members,
                }),
            }
        }
        chunks
    }

    fn has_extension_signal(&self, items: &[InvalidationItem], members: &[usize]) -> bool {
        self.options
            .extension_signal_tag
            .as_deref()
            .is_some_and(|signal| members.iter().any(|&i| items[i].expression == signal))
    }

    async fn process_chunk(
        &self,
        items: &mut [InvalidationItem],
        chunk: &Chunk,
    ) -> CoreResult<ChunkOutcome> {
        for &i in &chunk.items {
            items[i].transition(InvalidationState::Processing)?;
        }

        let expressions: Vec<String> = chunk
            .items
            .iter()
            .map(|&i| items[i].expression.clone())
            .collect();

        let result = match chunk.action {
            PurgeAction::Tags => {
                let payload = TagHasher::with_hashes(&expressions);
                self.client.purge_tags(&self.zone_id, &payload).await
            }
            PurgeAction::Urls => self.client.purge_urls(&self.zone_id, &expressions).await,
            PurgeAction::Everything => self.client.purge_everything(&self.zone_id).await,
        };

        let (next, error) = match &result {
            Ok(()) => (InvalidationState::Succeeded, None),
            Err(e) => {
                if e.is_expected() {
                    log::warn!(
                        "[dispatcher] Purge of {} {} invalidation(s) failed: {e}",
                        chunk.items.len(),
                        chunk.kind
                    );
                } else {
                    log::error!(
                        "[dispatcher] Purge of {} {} invalidation(s) failed: {e}",
                        chunk.items.len(),
                        chunk.kind
                    );
                }
                (InvalidationState::Failed, Some(e.to_string()))
            }
        };
        for &i in &chunk.items {
            items[i].transition(next)?;
        }

        // One request, one unit, whatever the outcome
        self.rate_state.increment_api_rate_count().await?;
        if result.is_ok() && chunk.action == PurgeAction::Tags {
            self.rate_state.increment_tag_purge_daily_count().await?;
        }

        Ok(ChunkOutcome {
            kind: chunk.kind,
            items: chunk.items.len(),
            succeeded: result.is_ok(),
            error,
        })
    }
}
