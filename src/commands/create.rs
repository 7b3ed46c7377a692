use anyhow::{Context, Result};
use std::io::Write;
use std::path::Path;
use std::process::Command;

use crate::config::{CLAUDE_DIR, WORKTREES_DIR};
use crate::storage::WorktreeLayout;
use crate::traits::GitOperations;

/// Creates `.worktrees/<name>` on a new branch `<name>`, then copies the
/// repository's `.claude/` directory into it and runs the hook, when present
///
/// # Errors
/// Returns an error if:
/// - Not inside a git repository
/// - `.worktrees/` does not exist
/// - Git fails to create the branch or worktree
/// - Copying `.claude/` fails
/// - The hook cannot be started or exits unsuccessfully
pub fn create_worktree(
    git: &dyn GitOperations,
    name: &str,
    hook: &str,
    out: &mut dyn Write,
) -> Result<()> {
    let layout = WorktreeLayout::new(git.main_root()?);
    layout.validate_worktrees_dir()?;

    let worktree_path = layout.worktree_path(name);

    writeln!(
        out,
        "Creating worktree at {}/{} with branch {}",
        WORKTREES_DIR, name, name
    )?;
    git.create_worktree(layout.root(), name, &worktree_path)
        .context("failed to create worktree")?;

    let claude_dir = layout.claude_dir();
    if claude_dir.exists() {
        writeln!(out, "Copying {}/ directory...", CLAUDE_DIR)?;
        copy_dir_recursive(&claude_dir, &worktree_path.join(CLAUDE_DIR))
            .with_context(|| format!("failed to copy {}/ directory", CLAUDE_DIR))?;
    }

    let hook_path = layout.hook_path(hook);
    if hook_path.exists() {
        writeln!(out, "Running hook: {}", hook)?;
        // The hook writes straight to the terminal
        out.flush()?;
        run_hook(&hook_path, &worktree_path).context("hook failed")?;
    }

    writeln!(out, "Done! Worktree ready at {}/{}", WORKTREES_DIR, name)?;
    Ok(())
}

fn run_hook(hook_path: &Path, worktree_path: &Path) -> Result<()> {
    tracing::debug!(hook = %hook_path.display(), cwd = %worktree_path.display(), "running hook");

    let status = Command::new(hook_path)
        .current_dir(worktree_path)
        .status()
        .with_context(|| format!("failed to run {}", hook_path.display()))?;

    if !status.success() {
        anyhow::bail!("{}", status);
    }
    Ok(())
}

fn copy_dir_recursive(source: &Path, target: &Path) -> Result<()> {
    std::fs::create_dir_all(target)?;

    for entry in std::fs::read_dir(source)? {
        let entry = entry?;
        let source_path = entry.path();
        let target_path = target.join(entry.file_name());

        if source_path.is_dir() {
            copy_dir_recursive(&source_path, &target_path)?;
        } else {
            std::fs::copy(&source_path, &target_path)
                .with_context(|| format!("Failed to copy {}", source_path.display()))?;
        }
    }

    Ok(())
}
