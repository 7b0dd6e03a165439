//! Operational status checks
//!
//! Checks never fail: storage or configuration problems are reported as an
//! `Error` row with the reason in the message.

use std::sync::Arc;

use futures::future::{join_all, BoxFuture, FutureExt};

use crate::error::CoreResult;
use crate::services::{MemoizedDependencyCheck, RateState, ServiceContext};
use crate::types::{DiagnosticResult, DiagnosticSeverity};

pub const CHECK_CREDENTIALS: &str = "credentials";
pub const CHECK_DEPENDENCIES: &str = "dependencies";
pub const CHECK_API_RATE: &str = "api_rate";
pub const CHECK_DAILY_TAG_PURGE: &str = "daily_tag_purge";

/// Severity of a usage count against its limit
///
/// `Error` at or above the limit, `Warning` at or above three quarters of it.
/// An unset count is zero.
#[must_use]
pub fn classify_usage(count: Option<u64>, limit: u64) -> DiagnosticSeverity {
    let count = count.unwrap_or(0);
    if count >= limit {
        DiagnosticSeverity::Error
    } else if count.saturating_mul(4) >= limit.saturating_mul(3) {
        DiagnosticSeverity::Warning
    } else {
        DiagnosticSeverity::Ok
    }
}

pub struct DiagnosticService {
    ctx: Arc<ServiceContext>,
    rate_state: RateState,
    dependencies: Arc<MemoizedDependencyCheck>,
}

impl DiagnosticService {
    #[must_use]
    pub fn new(
        ctx: Arc<ServiceContext>,
        rate_state: RateState,
        dependencies: Arc<MemoizedDependencyCheck>,
    ) -> Self {
        Self {
            ctx,
            rate_state,
            dependencies,
        }
    }

    /// Every check, evaluated concurrently, in a fixed order
    pub async fn run_all(&self) -> Vec<DiagnosticResult> {
        let checks: Vec<BoxFuture<'_, DiagnosticResult>> = vec![
            self.check_credentials().boxed(),
            async { self.check_dependencies() }.boxed(),
            self.check_api_rate().boxed(),
            self.check_daily_tag_purges().boxed(),
        ];
        let results = join_all(checks).await;

        let worst = DiagnosticSeverity::worst(&results);
        if worst == DiagnosticSeverity::Ok {
            log::debug!("[diagnostics] All checks passed");
        } else {
            log::info!("[diagnostics] Worst status: {worst}");
        }
        results
    }

    pub async fn check_credentials(&self) -> DiagnosticResult {
        const TITLE: &str = "Cloudflare credentials";
        match self.ctx.load_settings().await {
            Ok(settings) if settings.valid_credentials => DiagnosticResult::new(
                CHECK_CREDENTIALS,
                TITLE,
                DiagnosticSeverity::Ok,
                "Credentials are valid",
            ),
            Ok(_) => DiagnosticResult::new(
                CHECK_CREDENTIALS,
                TITLE,
                DiagnosticSeverity::Error,
                "Credentials are missing or were rejected; save valid credentials",
            ),
            Err(e) => unavailable(CHECK_CREDENTIALS, TITLE, &e.to_string()),
        }
    }

    pub fn check_dependencies(&self) -> DiagnosticResult {
        const TITLE: &str = "Runtime dependencies";
        match self.dependencies.missing() {
            None => DiagnosticResult::new(
                CHECK_DEPENDENCIES,
                TITLE,
                DiagnosticSeverity::Ok,
                "All dependencies are available",
            ),
            Some(reason) => DiagnosticResult::new(
                CHECK_DEPENDENCIES,
                TITLE,
                DiagnosticSeverity::Error,
                format!("Purging is unavailable: {reason}"),
            ),
        }
    }

    pub async fn check_api_rate(&self) -> DiagnosticResult {
        const TITLE: &str = "API rate (5 minutes)";
        let usage = async {
            let settings = self.ctx.load_settings().await?;
            let count = self.rate_state.get_api_rate_count().await?;
            CoreResult::Ok((count, settings.api_rate_limit))
        }
        .await;
        match usage {
            Ok((count, limit)) => usage_result(CHECK_API_RATE, TITLE, count, limit, "API calls"),
            Err(e) => unavailable(CHECK_API_RATE, TITLE, &e.to_string()),
        }
    }

    pub async fn check_daily_tag_purges(&self) -> DiagnosticResult {
        const TITLE: &str = "Tag purges today";
        if let Some(reason) = self.dependencies.missing() {
            return DiagnosticResult::new(
                CHECK_DAILY_TAG_PURGE,
                TITLE,
                DiagnosticSeverity::Error,
                format!("Tag purging is unavailable: {reason}"),
            );
        }
        let usage = async {
            let settings = self.ctx.load_settings().await?;
            let count = self.rate_state.get_tag_daily_count().await?;
            CoreResult::Ok((count, settings.daily_tag_purge_limit))
        }
        .await;
        match usage {
            Ok((count, limit)) => {
                usage_result(CHECK_DAILY_TAG_PURGE, TITLE, count, limit, "tag purges")
            }
            Err(e) => unavailable(CHECK_DAILY_TAG_PURGE, TITLE, &e.to_string()),
        }
    }
}

fn usage_result(id: &str, title: &str, count: u64, limit: u64, unit: &str) -> DiagnosticResult {
    let severity = classify_usage(Some(count), limit);
    let message = match severity {
        DiagnosticSeverity::Ok => format!("{count} of {limit} {unit} used"),
        DiagnosticSeverity::Warning => {
            format!("{count} of {limit} {unit} used; approaching the limit")
        }
        DiagnosticSeverity::Error => {
            format!("{count} of {limit} {unit} used; limit reached, further requests will be refused")
        }
    };
    DiagnosticResult::new(id, title, severity, message).with_value(count.to_string())
}

fn unavailable(id: &str, title: &str, reason: &str) -> DiagnosticResult {
    log::warn!("[diagnostics] {id}: {reason}");
    DiagnosticResult::new(
        id,
        title,
        DiagnosticSeverity::Error,
        format!("Status unavailable: {reason}"),
    )
}
