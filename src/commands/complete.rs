use anyhow::Result;
use std::io::Write;

use crate::cli::Command;
use crate::storage::WorktreeLayout;
use crate::traits::GitOperations;

/// Backs `wt __complete <subcommand>`: prints worktree names for the
/// subcommands that take one, and nothing for the rest
///
/// # Errors
/// Returns an error if worktree names are needed but not inside a git repository
pub fn complete_names(git: &dyn GitOperations, subcommand: &str, out: &mut dyn Write) -> Result<()> {
    match Command::from_word(subcommand) {
        Some(Command::Jump | Command::Remove) => {
            let layout = WorktreeLayout::new(git.main_root()?);
            for name in layout.list_worktree_names()? {
                writeln!(out, "{}", name)?;
            }
        }
        _ => tracing::debug!(subcommand, "no dynamic completions"),
    }
    Ok(())
}
