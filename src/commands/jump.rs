use anyhow::Result;
use std::io::Write;
use std::path::Path;

use crate::storage::WorktreeLayout;
use crate::traits::GitOperations;

/// Prints the path of worktree `name` for the shell wrapper to `cd` into.
/// Without a name this behaves like [`print_root`].
///
/// # Errors
/// Returns an error if not inside a git repository or the worktree does not exist
pub fn jump_to_worktree(
    git: &dyn GitOperations,
    cwd: Option<&Path>,
    name: Option<&str>,
    out: &mut dyn Write,
) -> Result<()> {
    let Some(name) = name else {
        return print_root(git, cwd, out);
    };

    let layout = WorktreeLayout::new(git.main_root()?);
    let worktree_path = layout.worktree_path(name);
    if !worktree_path.exists() {
        anyhow::bail!("worktree {:?} does not exist", name);
    }

    writeln!(out, "{}", worktree_path.display())?;
    Ok(())
}

/// Prints the repository root when `cwd` is inside a worktree; prints
/// nothing at the root or elsewhere in the repository
///
/// # Errors
/// Returns an error if not inside a git repository
pub fn print_root(git: &dyn GitOperations, cwd: Option<&Path>, out: &mut dyn Write) -> Result<()> {
    let layout = WorktreeLayout::new(git.main_root()?);

    if let Some(name) = layout.current_worktree_name(cwd) {
        tracing::debug!(worktree = %name, "inside worktree, printing root");
        writeln!(out, "{}", layout.root().display())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::MockGit;
    use tempfile::TempDir;

    fn setup() -> TempDir {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir_all(temp.path().join(".worktrees/feat/src")).unwrap();
        temp
    }

    #[test]
    fn test_jump_to_named_worktree() {
        let temp = setup();
        let mut out = Vec::new();

        jump_to_worktree(&MockGit::new(temp.path()), None, Some("feat"), &mut out).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            format!("{}\n", temp.path().join(".worktrees/feat").display())
        );
    }

    #[test]
    fn test_jump_to_missing_worktree() {
        let temp = setup();
        let mut out = Vec::new();

        let err = jump_to_worktree(&MockGit::new(temp.path()), None, Some("nope"), &mut out)
            .unwrap_err();

        assert_eq!(err.to_string(), "worktree \"nope\" does not exist");
        assert!(out.is_empty());
    }

    #[test]
    fn test_jump_without_name_from_worktree_prints_root() {
        let temp = setup();
        let cwd = temp.path().join(".worktrees/feat/src");
        let mut out = Vec::new();

        jump_to_worktree(&MockGit::new(temp.path()), Some(&cwd), None, &mut out).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            format!("{}\n", temp.path().display())
        );
    }

    #[test]
    fn test_root_outside_worktree_prints_nothing() {
        let temp = setup();
        let mut out = Vec::new();

        print_root(&MockGit::new(temp.path()), Some(temp.path()), &mut out).unwrap();
        print_root(&MockGit::new(temp.path()), None, &mut out).unwrap();

        assert!(out.is_empty());
    }
}
