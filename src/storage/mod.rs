use anyhow::{Context, Result};
use std::path::{Component, Path, PathBuf};

use crate::config::{CLAUDE_DIR, WORKTREES_DIR};

/// Paths of the `.worktrees/` layout inside a main repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorktreeLayout {
    root: PathBuf,
}

impl WorktreeLayout {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub fn worktrees_dir(&self) -> PathBuf {
        self.root.join(WORKTREES_DIR)
    }

    #[must_use]
    pub fn worktree_path(&self, name: &str) -> PathBuf {
        self.worktrees_dir().join(name)
    }

    #[must_use]
    pub fn claude_dir(&self) -> PathBuf {
        self.root.join(CLAUDE_DIR)
    }

    /// Hook paths are resolved against the repository root
    #[must_use]
    pub fn hook_path(&self, hook: &str) -> PathBuf {
        self.root.join(hook)
    }

    /// Name used for git's worktree metadata, which may not contain slashes
    #[must_use]
    pub fn admin_name(branch_name: &str) -> String {
        branch_name.replace(['/', '\\', ':', '*', '?', '"', '<', '>', '|'], "-")
    }

    /// # Errors
    /// Returns an error if `.worktrees/` is missing; `wt` never creates it
    pub fn validate_worktrees_dir(&self) -> Result<()> {
        if !self.worktrees_dir().is_dir() {
            anyhow::bail!("{} directory does not exist (create it first)", WORKTREES_DIR);
        }
        Ok(())
    }

    /// Directory names directly under `.worktrees/`, sorted
    ///
    /// # Errors
    /// Returns an error if `.worktrees/` exists but cannot be read
    pub fn list_worktree_names(&self) -> Result<Vec<String>> {
        let dir = self.worktrees_dir();
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut names = Vec::new();
        for entry in std::fs::read_dir(&dir)
            .with_context(|| format!("Failed to read {}", dir.display()))?
        {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                names.push(entry.file_name().to_string_lossy().to_string());
            }
        }

        names.sort();
        Ok(names)
    }

    /// Name of the worktree containing `cwd`, if any. Never fails: anything
    /// that cannot be resolved counts as "not inside a worktree".
    #[must_use]
    pub fn current_worktree_name(&self, cwd: Option<&Path>) -> Option<String> {
        let relative = self.relative_to_worktrees(cwd?)?;

        match relative.components().next()? {
            Component::Normal(name) => Some(name.to_string_lossy().to_string()),
            _ => None,
        }
    }

    /// True when `cwd` is `worktree_path` or below it
    #[must_use]
    pub fn is_inside(&self, cwd: Option<&Path>, worktree_path: &Path) -> bool {
        let Some(cwd) = cwd else {
            return false;
        };
        canonical(cwd).starts_with(canonical(worktree_path))
    }

    fn relative_to_worktrees(&self, cwd: &Path) -> Option<PathBuf> {
        // Canonical paths handle symlinked temp dirs (e.g. /var -> /private/var on macOS)
        let worktrees_dir = canonical(&self.worktrees_dir());
        canonical(cwd)
            .strip_prefix(&worktrees_dir)
            .ok()
            .map(Path::to_path_buf)
    }
}

fn canonical(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_paths() {
        let layout = WorktreeLayout::new("/repo");
        assert_eq!(layout.worktrees_dir(), PathBuf::from("/repo/.worktrees"));
        assert_eq!(
            layout.worktree_path("feat"),
            PathBuf::from("/repo/.worktrees/feat")
        );
        assert_eq!(layout.claude_dir(), PathBuf::from("/repo/.claude"));
        assert_eq!(
            layout.hook_path(".worktree-hook"),
            PathBuf::from("/repo/.worktree-hook")
        );
    }

    #[test]
    fn test_admin_name_sanitization() {
        assert_eq!(WorktreeLayout::admin_name("feature/auth"), "feature-auth");
        assert_eq!(WorktreeLayout::admin_name("plain"), "plain");
    }

    #[test]
    fn test_validate_worktrees_dir() {
        let temp = TempDir::new().unwrap();
        let layout = WorktreeLayout::new(temp.path());

        let err = layout.validate_worktrees_dir().unwrap_err();
        assert_eq!(
            err.to_string(),
            ".worktrees directory does not exist (create it first)"
        );

        std::fs::create_dir(temp.path().join(".worktrees")).unwrap();
        assert!(layout.validate_worktrees_dir().is_ok());
    }

    #[test]
    fn test_list_worktree_names_skips_files() {
        let temp = TempDir::new().unwrap();
        let layout = WorktreeLayout::new(temp.path());
        assert!(layout.list_worktree_names().unwrap().is_empty());

        let dir = temp.path().join(".worktrees");
        std::fs::create_dir_all(dir.join("zeta")).unwrap();
        std::fs::create_dir_all(dir.join("alpha")).unwrap();
        std::fs::write(dir.join("notes.txt"), "x").unwrap();

        assert_eq!(layout.list_worktree_names().unwrap(), vec!["alpha", "zeta"]);
    }

    #[test]
    fn test_current_worktree_name() {
        let temp = TempDir::new().unwrap();
        let layout = WorktreeLayout::new(temp.path());
        let nested = temp.path().join(".worktrees/feat/src/deep");
        std::fs::create_dir_all(&nested).unwrap();

        assert_eq!(
            layout.current_worktree_name(Some(&nested)),
            Some("feat".to_string())
        );
        assert_eq!(
            layout.current_worktree_name(Some(&temp.path().join(".worktrees/feat"))),
            Some("feat".to_string())
        );
        assert_eq!(
            layout.current_worktree_name(Some(&temp.path().join(".worktrees"))),
            None
        );
        assert_eq!(layout.current_worktree_name(Some(temp.path())), None);
        assert_eq!(layout.current_worktree_name(None), None);
    }

    #[test]
    fn test_is_inside() {
        let temp = TempDir::new().unwrap();
        let layout = WorktreeLayout::new(temp.path());
        let feat = temp.path().join(".worktrees/feat");
        let feature = temp.path().join(".worktrees/feature");
        std::fs::create_dir_all(feat.join("src")).unwrap();
        std::fs::create_dir_all(&feature).unwrap();

        assert!(layout.is_inside(Some(&feat), &feat));
        assert!(layout.is_inside(Some(&feat.join("src")), &feat));
        assert!(!layout.is_inside(Some(&feature), &feat));
        assert!(!layout.is_inside(None, &feat));
    }
}
