//! Fixture files shared by the create tests

use anyhow::Result;
use assert_fs::fixture::ChildPath;
use assert_fs::prelude::*;
use predicates::prelude::*;

/// Populates `<repo>/.claude/` with a settings file and a nested command
///
/// # Errors
/// Returns an error if the files cannot be written
pub fn create_claude_dir(repo_dir: &ChildPath) -> Result<()> {
    let claude = repo_dir.child(".claude");
    claude.child("settings.json").write_str(r#"{"model": "default"}"#)?;
    claude
        .child("commands")
        .child("review.md")
        .write_str("Review the diff")?;
    Ok(())
}

/// Asserts that [`create_claude_dir`]'s files exist in `worktree`
///
/// # Errors
/// Never fails; assertion failures panic
pub fn assert_claude_dir_copied(worktree: &ChildPath) -> Result<()> {
    let claude = worktree.child(".claude");
    claude
        .child("settings.json")
        .assert(predicate::str::contains("\"model\""));
    claude
        .child("commands")
        .child("review.md")
        .assert("Review the diff");
    Ok(())
}

/// Writes an executable `/bin/sh` script at `dir/name`
///
/// # Errors
/// Returns an error if the script cannot be written or made executable
pub fn write_hook(dir: &ChildPath, name: &str, body: &str) -> Result<()> {
    let hook = dir.child(name);
    hook.write_str(&format!("#!/bin/sh\n{}\n", body))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(hook.path(), std::fs::Permissions::from_mode(0o755))?;
    }

    Ok(())
}
