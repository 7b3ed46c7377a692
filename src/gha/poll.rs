use anyhow::Result;
use std::io::Write;

use super::{CheckRecord, GhaError, PollOutcome, analyze_checks};
use crate::config::GhaConfig;
use crate::traits::{Clock, PrStatusProvider};

/// Polls the provider until every check has finished or the timeout is hit.
///
/// The deadline is checked before each query, so a cycle that starts past the
/// timeout reports [`GhaError::Timeout`] even if CI would have succeeded.
/// Provider errors are returned as-is; only a pending outcome loops again.
///
/// # Errors
/// Returns an error if:
/// - The provider fails (no pull request, `gh` missing, bad JSON)
/// - Some checks failed ([`GhaError::ChecksFailed`])
/// - The timeout elapsed ([`GhaError::Timeout`])
pub fn poll_checks(
    provider: &dyn PrStatusProvider,
    clock: &dyn Clock,
    config: &GhaConfig,
    out: &mut dyn Write,
) -> Result<()> {
    let started = clock.now();
    let mut cycle = 0usize;

    writeln!(out, "Monitoring GitHub Actions for current branch's PR...")?;

    loop {
        if clock.now().duration_since(started) > config.timeout {
            tracing::warn!(cycles = cycle, "gave up waiting for checks");
            return Err(GhaError::Timeout(config.timeout).into());
        }

        cycle += 1;
        let status = provider.fetch_pr_status()?;
        let (outcome, summary) = analyze_checks(&status.checks);
        tracing::debug!(cycle, pr = status.number, ?outcome, "polled checks");

        write!(out, "\r{}", summary)?;
        out.flush()?;

        match outcome {
            PollOutcome::Success => {
                writeln!(out, "\nAll checks passed!")?;
                return Ok(());
            }
            PollOutcome::Failure => {
                writeln!(out, "\nSome checks failed!")?;
                print_check_details(&status.checks, out)?;
                return Err(GhaError::ChecksFailed.into());
            }
            PollOutcome::Pending => clock.sleep(config.poll_interval),
        }
    }
}

/// Writes one `[marker] name: status` line per check
///
/// # Errors
/// Returns an error if writing to `out` fails
pub fn print_check_details(checks: &[CheckRecord], out: &mut dyn Write) -> Result<()> {
    writeln!(out, "\nCheck details:")?;
    for check in checks {
        writeln!(
            out,
            "  [{}] {}: {}",
            check.marker(),
            check.name,
            check.status_display()
        )?;
    }
    Ok(())
}
