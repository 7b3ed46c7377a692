use anyhow::{Context, Result};
use std::io::Write;
use std::path::Path;

use crate::config::WORKTREES_DIR;
use crate::storage::WorktreeLayout;
use crate::traits::GitOperations;

/// Removes a worktree and force-deletes its branch.
///
/// Without a name the worktree containing `cwd` is removed. Progress goes to
/// `err`; if `cwd` was inside the removed worktree the repository root is
/// printed to `out` so the shell wrapper can leave the deleted directory.
///
/// # Errors
/// Returns an error if:
/// - Not inside a git repository
/// - No name was given and `cwd` is not inside a worktree
/// - The worktree is dirty or git fails to remove it
/// - The branch cannot be deleted
pub fn remove_worktree(
    git: &dyn GitOperations,
    cwd: Option<&Path>,
    name: Option<&str>,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<()> {
    let layout = WorktreeLayout::new(git.main_root()?);

    let name = match name {
        Some(name) => name.to_string(),
        None => layout
            .current_worktree_name(cwd)
            .context("not inside a worktree (specify branch name)")?,
    };

    let worktree_path = layout.worktree_path(&name);
    // Must be checked while the directory still exists
    let inside = layout.is_inside(cwd, &worktree_path);

    writeln!(err, "Removing worktree {}/{}", WORKTREES_DIR, name)?;
    git.remove_worktree(layout.root(), &worktree_path)
        .context("failed to remove worktree")?;

    writeln!(err, "Deleting branch {}", name)?;
    git.delete_branch(layout.root(), &name)
        .context("failed to delete branch")?;

    writeln!(err, "Done! Worktree and branch removed")?;

    if inside {
        writeln!(out, "{}", layout.root().display())?;
    }
    Ok(())
}
