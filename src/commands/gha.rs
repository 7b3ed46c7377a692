use anyhow::Result;
use std::io::Write;

use crate::config::GhaConfig;
use crate::gha::poll_checks;
use crate::traits::{Clock, PrStatusProvider};

/// Waits for the current branch's pull request checks to finish
///
/// # Errors
/// Returns an error if:
/// - The provider fails (no PR, `gh` missing, unparsable output)
/// - Any check fails ([`crate::gha::GhaError::ChecksFailed`])
/// - The checks outlive `config.timeout` ([`crate::gha::GhaError::Timeout`])
pub fn monitor_checks(
    provider: &dyn PrStatusProvider,
    clock: &dyn Clock,
    config: &GhaConfig,
    out: &mut dyn Write,
) -> Result<()> {
    tracing::info!(
        interval_secs = config.poll_interval.as_secs(),
        timeout_secs = config.timeout.as_secs(),
        "monitoring checks"
    );
    poll_checks(provider, clock, config, out)
}
