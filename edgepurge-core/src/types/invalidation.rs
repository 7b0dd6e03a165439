//! Invalidation request types

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};

/// What an invalidation targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvalidationKind {
    /// A cache tag; purged together with its short hash
    Tag,
    /// A single absolute URL
    Url,
    /// The whole zone; the expression is ignored
    Everything,
}

impl std::fmt::Display for InvalidationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Tag => write!(f, "tag"),
            Self::Url => write!(f, "url"),
            Self::Everything => write!(f, "everything"),
        }
    }
}

/// Lifecycle of an invalidation
///
/// `Pending -> Processing -> Succeeded | Failed`. Terminal states never change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvalidationState {
    Pending,
    Processing,
    Succeeded,
    Failed,
}

impl InvalidationState {
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed)
    }

    /// Whether moving from `self` to `next` is a legal step
    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Processing)
                | (Self::Processing, Self::Succeeded | Self::Failed)
        )
    }
}

/// A request to invalidate one thing in the edge cache
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvalidationItem {
    /// Item ID (UUID)
    pub id: String,
    pub kind: InvalidationKind,
    /// Tag text or URL. Empty for `Everything`.
    pub expression: String,
    pub state: InvalidationState,
}

impl InvalidationItem {
    /// New pending item
    pub fn new(kind: InvalidationKind, expression: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            kind,
            expression: expression.into(),
            state: InvalidationState::Pending,
        }
    }

    pub fn tag(tag: impl Into<String>) -> Self {
        Self::new(InvalidationKind::Tag, tag)
    }

    pub fn url(url: impl Into<String>) -> Self {
        Self::new(InvalidationKind::Url, url)
    }

    pub fn everything() -> Self {
        Self::new(InvalidationKind::Everything, String::new())
    }

    /// Moves the item to `next`, rejecting regressions and skipped steps
    pub fn transition(&mut self, next: InvalidationState) -> CoreResult<()> {
        if !self.state.can_transition_to(next) {
            return Err(CoreError::ValidationError(format!(
                "Invalidation {} cannot move from {:?} to {:?}",
                self.id, self.state, next
            )));
        }
        self.state = next;
        Ok(())
    }
}

/// Outcome of one provider request made by the dispatcher
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChunkOutcome {
    pub kind: InvalidationKind,
    /// Number of invalidations covered by the request
    pub items: usize,
    pub succeeded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Result of a dispatch run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchSummary {
    pub succeeded: usize,
    pub failed: usize,
    /// Items that were not pending and were left untouched
    pub skipped: usize,
    pub chunks: Vec<ChunkOutcome>,
}

impl DispatchSummary {
    /// Number of provider requests made
    #[must_use]
    pub fn requests(&self) -> usize {
        self.chunks.len()
    }
}
