use anyhow::{Context, Result};
use serde::Deserialize;
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::process::Command;

use super::{CheckConclusion, CheckRecord, CheckStatus, PrStatus};
use crate::traits::PrStatusProvider;

const PR_VIEW_FIELDS: &str = "number,state,statusCheckRollup";

/// Reads pull request status through the GitHub CLI (`gh pr view`)
pub struct GhCli;

impl PrStatusProvider for GhCli {
    fn fetch_pr_status(&self) -> Result<PrStatus> {
        tracing::debug!("running gh pr view");
        let output = Command::new("gh")
            .args(["pr", "view", "--json", PR_VIEW_FIELDS])
            .output()
            .context("failed to run gh (is the GitHub CLI installed?)")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            if is_no_pr_error(&stderr) {
                anyhow::bail!("no PR found for current branch");
            }
            anyhow::bail!("failed to get PR status: {}", stderr.trim());
        }

        parse_pr_status(&output.stdout)
    }
}

/// `gh` reports a missing PR as "no pull requests found for branch ..."
#[must_use]
pub fn is_no_pr_error(stderr: &str) -> bool {
    stderr.contains("no pull request")
}

/// Parses the JSON printed by `gh pr view --json number,state,statusCheckRollup`
///
/// # Errors
/// Returns an error if the payload is not valid JSON of the expected shape
pub fn parse_pr_status(json: &[u8]) -> Result<PrStatus> {
    let raw: RawPrStatus = serde_json::from_slice(json).context("failed to parse PR status")?;

    Ok(PrStatus {
        number: raw.number,
        state: raw.state,
        checks: raw
            .status_check_rollup
            .unwrap_or_default()
            .into_iter()
            .map(RawCheck::into_record)
            .collect(),
    })
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPrStatus {
    #[serde(default)]
    number: u64,
    #[serde(default)]
    state: String,
    #[serde(default)]
    status_check_rollup: Option<Vec<RawCheck>>,
}

/// A rollup entry: either a `CheckRun` (name/status/conclusion) or a legacy
/// commit `StatusContext` (context/state)
#[derive(Debug, Deserialize)]
struct RawCheck {
    #[serde(rename = "__typename", default)]
    typename: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    context: Option<String>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    conclusion: Option<String>,
    #[serde(default)]
    state: Option<String>,
}

impl RawCheck {
    fn into_record(self) -> CheckRecord {
        let is_status_context = self.typename.as_deref() == Some("StatusContext")
            || (self.status.is_none() && self.state.is_some());
        let name = self.name.or(self.context).unwrap_or_default();

        if is_status_context {
            let (status, conclusion) = match self.state.as_deref().unwrap_or_default() {
                "SUCCESS" => (CheckStatus::Completed, Some(CheckConclusion::Success)),
                "FAILURE" | "ERROR" => (CheckStatus::Completed, Some(CheckConclusion::Failure)),
                "PENDING" | "EXPECTED" => (CheckStatus::Queued, None),
                other => (CheckStatus::Other(other.to_string()), None),
            };
            return CheckRecord::new(name, status, conclusion);
        }

        CheckRecord::new(
            name,
            CheckStatus::from(self.status.as_deref().unwrap_or_default()),
            self.conclusion.as_deref().and_then(CheckConclusion::parse),
        )
    }
}

/// Provider returning canned responses in order, for tests
pub struct ScriptedProvider {
    responses: RefCell<VecDeque<Result<PrStatus, String>>>,
    fallback: Option<PrStatus>,
    calls: Cell<usize>,
}

impl ScriptedProvider {
    #[must_use]
    pub fn new(responses: Vec<Result<PrStatus, String>>) -> Self {
        Self {
            responses: RefCell::new(responses.into()),
            fallback: None,
            calls: Cell::new(0),
        }
    }

    /// Returns `status` on every call
    #[must_use]
    pub fn repeating(status: PrStatus) -> Self {
        Self {
            responses: RefCell::new(VecDeque::new()),
            fallback: Some(status),
            calls: Cell::new(0),
        }
    }

    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

impl PrStatusProvider for ScriptedProvider {
    fn fetch_pr_status(&self) -> Result<PrStatus> {
        self.calls.set(self.calls.get() + 1);

        match self.responses.borrow_mut().pop_front() {
            Some(Ok(status)) => Ok(status),
            Some(Err(message)) => Err(anyhow::anyhow!(message)),
            None => self
                .fallback
                .clone()
                .context("no scripted PR status left"),
        }
    }
}
