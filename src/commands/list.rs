use anyhow::Result;
use std::io::Write;

use crate::storage::WorktreeLayout;
use crate::traits::GitOperations;

/// Prints the names of the worktrees under `.worktrees/`, one per line
///
/// # Errors
/// Returns an error if not inside a git repository or `.worktrees/` cannot be read
pub fn list_worktrees(git: &dyn GitOperations, out: &mut dyn Write) -> Result<()> {
    let layout = WorktreeLayout::new(git.main_root()?);

    for name in layout.list_worktree_names()? {
        writeln!(out, "{}", name)?;
    }

    Ok(())
}
