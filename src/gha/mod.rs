//! GitHub Actions check aggregation for the `gha` command.
//!
//! A poll cycle turns the pull request's check records into [`CheckStats`] and a
//! three-way [`PollOutcome`]. Checks that are still running always dominate: the
//! loop waits for every check before declaring failure so the final report is
//! complete.

pub mod poll;
pub mod provider;

use std::fmt;
use std::time::Duration;
use thiserror::Error;

use crate::config::{MARKER_FAILURE, MARKER_PENDING, MARKER_SUCCESS};

pub use poll::poll_checks;
pub use provider::{GhCli, ScriptedProvider};

/// Lifecycle of a single check as reported by GitHub
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckStatus {
    Queued,
    InProgress,
    Completed,
    /// Any status GitHub may add later; treated as not completed
    Other(String),
}

impl From<&str> for CheckStatus {
    fn from(value: &str) -> Self {
        match value {
            "QUEUED" => Self::Queued,
            "IN_PROGRESS" => Self::InProgress,
            "COMPLETED" => Self::Completed,
            other => Self::Other(other.to_string()),
        }
    }
}

impl fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Queued => write!(f, "QUEUED"),
            Self::InProgress => write!(f, "IN_PROGRESS"),
            Self::Completed => write!(f, "COMPLETED"),
            Self::Other(status) => write!(f, "{}", status),
        }
    }
}

/// Terminal outcome of a completed check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckConclusion {
    Success,
    Neutral,
    Skipped,
    Failure,
    Cancelled,
    /// `TIMED_OUT`, `ACTION_REQUIRED`, `STARTUP_FAILURE`, ...; counted as failed
    Other(String),
}

impl CheckConclusion {
    /// Parses a wire value; an empty string means the check has no conclusion yet
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        let conclusion = match value {
            "" => return None,
            "SUCCESS" => Self::Success,
            "NEUTRAL" => Self::Neutral,
            "SKIPPED" => Self::Skipped,
            "FAILURE" => Self::Failure,
            "CANCELLED" => Self::Cancelled,
            other => Self::Other(other.to_string()),
        };
        Some(conclusion)
    }

    /// Neutral and skipped checks ran (or were deliberately not run) without
    /// blocking the pull request
    #[must_use]
    pub fn is_passing(&self) -> bool {
        matches!(self, Self::Success | Self::Neutral | Self::Skipped)
    }
}

impl fmt::Display for CheckConclusion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => write!(f, "SUCCESS"),
            Self::Neutral => write!(f, "NEUTRAL"),
            Self::Skipped => write!(f, "SKIPPED"),
            Self::Failure => write!(f, "FAILURE"),
            Self::Cancelled => write!(f, "CANCELLED"),
            Self::Other(conclusion) => write!(f, "{}", conclusion),
        }
    }
}

/// One CI check on the pull request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckRecord {
    pub name: String,
    pub status: CheckStatus,
    /// Only meaningful once `status` is [`CheckStatus::Completed`]
    pub conclusion: Option<CheckConclusion>,
}

impl CheckRecord {
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        status: CheckStatus,
        conclusion: Option<CheckConclusion>,
    ) -> Self {
        Self {
            name: name.into(),
            status,
            conclusion,
        }
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.status == CheckStatus::Completed
    }

    /// Marker shown in the failure report. Only unambiguous outcomes get a
    /// glyph; neutral, skipped and cancelled checks stay blank.
    #[must_use]
    pub fn marker(&self) -> &'static str {
        if !self.is_complete() {
            return MARKER_PENDING;
        }

        match self.conclusion {
            Some(CheckConclusion::Success) => MARKER_SUCCESS,
            Some(CheckConclusion::Failure) => MARKER_FAILURE,
            _ => MARKER_PENDING,
        }
    }

    /// Conclusion for completed checks, status otherwise
    #[must_use]
    pub fn status_display(&self) -> String {
        match (&self.status, &self.conclusion) {
            (CheckStatus::Completed, Some(conclusion)) => conclusion.to_string(),
            (CheckStatus::Completed, None) => String::new(),
            (status, _) => status.to_string(),
        }
    }
}

/// Pull request state as returned by the status provider
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PrStatus {
    pub number: u64,
    pub state: String,
    pub checks: Vec<CheckRecord>,
}

/// Overall result of one poll cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    Pending,
    Success,
    Failure,
}

/// Bucket counts for one poll cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CheckStats {
    pub passed: usize,
    pub failed: usize,
    pub pending: usize,
    pub total: usize,
}

impl CheckStats {
    #[must_use]
    pub fn from_checks(checks: &[CheckRecord]) -> Self {
        let mut stats = Self {
            total: checks.len(),
            ..Self::default()
        };

        for check in checks {
            if !check.is_complete() {
                stats.pending += 1;
            } else if check
                .conclusion
                .as_ref()
                .is_some_and(CheckConclusion::is_passing)
            {
                stats.passed += 1;
            } else {
                stats.failed += 1;
            }
        }

        stats
    }

    /// Pending beats failed beats success
    #[must_use]
    pub fn outcome(&self) -> PollOutcome {
        if self.pending > 0 {
            PollOutcome::Pending
        } else if self.failed > 0 {
            PollOutcome::Failure
        } else {
            PollOutcome::Success
        }
    }
}

impl fmt::Display for CheckStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Checks: {}/{} completed ({} passed, {} failed, {} pending)",
            self.passed + self.failed,
            self.total,
            self.passed,
            self.failed,
            self.pending
        )
    }
}

pub const NO_CHECKS_SUMMARY: &str = "No checks found yet...";

/// Reduces a poll's check records to an outcome and a one-line summary.
///
/// An empty list is pending: CI may simply not have reported yet.
#[must_use]
pub fn analyze_checks(checks: &[CheckRecord]) -> (PollOutcome, String) {
    if checks.is_empty() {
        return (PollOutcome::Pending, NO_CHECKS_SUMMARY.to_string());
    }

    let stats = CheckStats::from_checks(checks);
    (stats.outcome(), stats.to_string())
}

/// Terminal failures of the polling loop that callers may want to tell apart
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GhaError {
    #[error("timeout: checks did not complete within {}", format_duration(.0))]
    Timeout(Duration),

    #[error("checks failed")]
    ChecksFailed,
}

/// Compact rendering such as `1h`, `30m`, `45s` or `1h30m`
#[must_use]
pub fn format_duration(duration: &Duration) -> String {
    let total = duration.as_secs();
    let (hours, minutes, seconds) = (total / 3600, (total % 3600) / 60, total % 60);

    let mut out = String::new();
    if hours > 0 {
        out.push_str(&format!("{}h", hours));
    }
    if minutes > 0 {
        out.push_str(&format!("{}m", minutes));
    }
    if seconds > 0 || out.is_empty() {
        out.push_str(&format!("{}s", seconds));
    }
    out
}
