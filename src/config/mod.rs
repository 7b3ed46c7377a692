//! Fixed configuration for `wt`.
//!
//! Everything here is a compile-time constant. The only runtime overrides are
//! the `--hook` flag and the `WT_LOG` log filter read by the binary.

use std::time::Duration;

/// Crate version, printed by `wt version`
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Directory (relative to the main repository root) that holds all worktrees
pub const WORKTREES_DIR: &str = ".worktrees";

/// Directory copied from the repository root into every new worktree
pub const CLAUDE_DIR: &str = ".claude";

/// Hook script run after `create` when present at the repository root
pub const DEFAULT_HOOK: &str = ".worktree-hook";

/// Environment variable holding the `tracing` filter directive
pub const LOG_ENV: &str = "WT_LOG";

/// Filter used when `WT_LOG` is unset or invalid
pub const DEFAULT_LOG_FILTER: &str = "warn";

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);
pub const DEFAULT_GHA_TIMEOUT: Duration = Duration::from_secs(60 * 60);

pub const MARKER_SUCCESS: &str = "+";
pub const MARKER_FAILURE: &str = "x";
pub const MARKER_PENDING: &str = " ";

/// Timing for the GitHub Actions polling loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GhaConfig {
    /// Pause between two polls while checks are still pending
    pub poll_interval: Duration,
    /// Ceiling on the start time of a poll cycle, measured from loop start
    pub timeout: Duration,
}

impl Default for GhaConfig {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            timeout: DEFAULT_GHA_TIMEOUT,
        }
    }
}
