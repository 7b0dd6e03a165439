//! Runtime dependency check, evaluated once

use std::sync::{Arc, OnceLock};

use crate::error::{CoreError, CoreResult};
use crate::traits::DependencyProbe;

/// Runs a [`DependencyProbe`] at most once and remembers the answer
///
/// Build one per process and share it by reference.
pub struct MemoizedDependencyCheck {
    probe: Arc<dyn DependencyProbe>,
    outcome: OnceLock<Result<(), String>>,
}

impl MemoizedDependencyCheck {
    #[must_use]
    pub fn new(probe: Arc<dyn DependencyProbe>) -> Self {
        Self {
            probe,
            outcome: OnceLock::new(),
        }
    }

    fn outcome(&self) -> &Result<(), String> {
        self.outcome.get_or_init(|| {
            let outcome = self.probe.probe();
            if let Err(reason) = &outcome {
                log::error!("[dependencies] Purging is unavailable: {reason}");
            }
            outcome
        })
    }

    /// Whether all dependencies are present
    pub fn is_met(&self) -> bool {
        self.outcome().is_ok()
    }

    /// What is missing, if anything
    pub fn missing(&self) -> Option<&str> {
        self.outcome().as_ref().err().map(String::as_str)
    }

    /// `DependencyUnavailable` when something is missing
    pub fn assert(&self) -> CoreResult<()> {
        self.outcome()
            .clone()
            .map_err(CoreError::DependencyUnavailable)
    }
}
