//! Diagnostic result types

use serde::{Deserialize, Serialize};

/// Health level of a check, ordered from best to worst
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DiagnosticSeverity {
    Ok,
    Warning,
    Error,
}

impl DiagnosticSeverity {
    /// Worst severity among `results`; `Ok` when empty
    pub fn worst<'a>(results: impl IntoIterator<Item = &'a DiagnosticResult>) -> Self {
        results
            .into_iter()
            .map(|r| r.severity)
            .max()
            .unwrap_or(Self::Ok)
    }
}

impl std::fmt::Display for DiagnosticSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ok => write!(f, "OK"),
            Self::Warning => write!(f, "WARNING"),
            Self::Error => write!(f, "ERROR"),
        }
    }
}

/// One row of the status report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosticResult {
    /// Stable machine identifier, e.g. `api_rate`
    pub id: String,
    pub title: String,
    pub severity: DiagnosticSeverity,
    pub message: String,
    /// Observed value, when the check measures one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl DiagnosticResult {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        severity: DiagnosticSeverity,
        message: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            severity,
            message: message.into(),
            value: None,
        }
    }

    #[must_use]
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }
}
