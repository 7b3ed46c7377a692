use anyhow::Result;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::gha::PrStatus;

/// Git operations `wt` needs, one method per logical operation, so commands
/// can be exercised without touching a real repository
pub trait GitOperations {
    /// Root of the main working tree, even when called from inside a linked worktree
    ///
    /// # Errors
    /// Returns an error when the current directory is not inside a git repository
    fn main_root(&self) -> Result<PathBuf>;

    /// Creates `branch` from HEAD and checks it out into a new worktree at `worktree_path`
    ///
    /// # Errors
    /// Returns an error if the branch already exists or the worktree cannot be added
    fn create_worktree(&self, root: &Path, branch: &str, worktree_path: &Path) -> Result<()>;

    /// Removes the worktree checked out at `worktree_path`, refusing dirty worktrees
    ///
    /// # Errors
    /// Returns an error if the worktree is unknown, dirty, or cannot be deleted
    fn remove_worktree(&self, root: &Path, worktree_path: &Path) -> Result<()>;

    /// Force-deletes a local branch
    ///
    /// # Errors
    /// Returns an error if the branch does not exist or cannot be deleted
    fn delete_branch(&self, root: &Path, branch: &str) -> Result<()>;
}

/// Source of pull request CI status for the current branch
pub trait PrStatusProvider {
    /// # Errors
    /// Returns an error when no pull request exists or the provider call fails
    fn fetch_pr_status(&self) -> Result<PrStatus>;
}

/// Time source for the polling loop
pub trait Clock {
    fn now(&self) -> Instant;
    fn sleep(&self, duration: Duration);
}
