#![allow(clippy::unwrap_used)] // Tests use unwrap for simplicity

use anyhow::{Context, Result};
use assert_fs::prelude::*;
use assert_fs::TempDir;

use std::path::{Path, PathBuf};
use std::process::Command;

/// A real git repository with a `.worktrees/` directory, cleaned up on drop
pub struct CliTestEnvironment {
    pub repo_dir: assert_fs::fixture::ChildPath,
    /// A directory outside any repository
    pub outside_dir: assert_fs::fixture::ChildPath,
    _temp_dir: TempDir, // Keep temp_dir private to ensure cleanup, but don't expose it
}

impl CliTestEnvironment {
    /// Creates a new test environment with a real git repository and `.worktrees/`
    ///
    /// # Errors
    /// Returns an error if:
    /// - Failed to create temporary directory
    /// - Failed to initialize git repository
    /// - Failed to configure git settings
    /// - Failed to create initial commit
    pub fn new() -> Result<Self> {
        let env = Self::without_worktrees_dir()?;
        env.repo_dir.child(".worktrees").create_dir_all()?;
        Ok(env)
    }

    /// Same as [`CliTestEnvironment::new`] but without `.worktrees/`
    ///
    /// # Errors
    /// Returns an error if the repository cannot be set up
    pub fn without_worktrees_dir() -> Result<Self> {
        let temp_dir = TempDir::new().context("Failed to create temporary directory")?;
        let repo_dir = temp_dir.child("test_repo");
        let outside_dir = temp_dir.child("outside");

        repo_dir.create_dir_all()?;
        outside_dir.create_dir_all()?;

        Self::run_git_command(repo_dir.path(), &["init"])?;
        Self::run_git_command(repo_dir.path(), &["config", "user.name", "Test User"])?;
        Self::run_git_command(repo_dir.path(), &["config", "user.email", "test@example.com"])?;

        repo_dir.child("README.md").write_str("# Test Repo")?;
        Self::run_git_command(repo_dir.path(), &["add", "."])?;
        Self::run_git_command(repo_dir.path(), &["commit", "-m", "Initial commit"])?;

        // Ensure we have a main branch (some git versions default to 'master')
        Self::run_git_command(repo_dir.path(), &["branch", "-M", "main"])?;

        Ok(Self {
            repo_dir,
            outside_dir,
            _temp_dir: temp_dir,
        })
    }

    fn run_git_command(repo_path: &Path, args: &[&str]) -> Result<String> {
        let output = Command::new("git")
            .args(args)
            .current_dir(repo_path)
            .output()
            .context("Failed to execute git command")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("Git command failed: {}", stderr);
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }

    /// Runs `wt` from the repository root
    ///
    /// # Errors
    /// Returns an error if the binary cannot be found
    pub fn run_command(&self, args: &[&str]) -> Result<assert_cmd::Command> {
        self.run_command_in(self.repo_dir.path(), args)
    }

    /// Runs `wt` from `dir`
    ///
    /// # Errors
    /// Returns an error if the binary cannot be found
    pub fn run_command_in(&self, dir: &Path, args: &[&str]) -> Result<assert_cmd::Command> {
        let mut cmd = assert_cmd::Command::cargo_bin("wt").context("Failed to find wt binary")?;

        cmd.current_dir(dir).env_remove("WT_LOG");
        cmd.args(args);
        Ok(cmd)
    }

    /// Path of worktree `name` under `.worktrees/`
    pub fn worktree_path(&self, name: &str) -> assert_fs::fixture::ChildPath {
        self.repo_dir.child(".worktrees").child(name)
    }

    /// Canonical repository root, for comparing against printed paths
    pub fn canonical_root(&self) -> PathBuf {
        self.repo_dir.path().canonicalize().unwrap()
    }

    /// True when a local branch called `name` exists
    pub fn branch_exists(&self, name: &str) -> bool {
        let reference = format!("refs/heads/{}", name);
        Self::run_git_command(self.repo_dir.path(), &["rev-parse", "--verify", "--quiet", &reference])
            .is_ok()
    }

    /// Runs git in the repository and returns its stdout
    ///
    /// # Errors
    /// Returns an error if git exits unsuccessfully
    pub fn git(&self, args: &[&str]) -> Result<String> {
        Self::run_git_command(self.repo_dir.path(), args)
    }
}

/// Parses a command's stdout as a single path and canonicalizes it
pub fn stdout_path(output: &std::process::Output) -> PathBuf {
    let text = String::from_utf8(output.stdout.clone()).unwrap();
    PathBuf::from(text.trim_end_matches('\n'))
        .canonicalize()
        .unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;
    use predicates::prelude::*;

    #[test]
    fn test_cli_test_environment_creation() -> Result<()> {
        let env = CliTestEnvironment::new()?;

        env.repo_dir.assert(predicate::path::is_dir());
        env.repo_dir.child(".git").assert(predicate::path::exists());
        env.repo_dir
            .child("README.md")
            .assert(predicate::str::contains("# Test Repo"));
        env.repo_dir
            .child(".worktrees")
            .assert(predicate::path::is_dir());
        assert!(env.branch_exists("main"));
        assert!(!env.branch_exists("nope"));

        Ok(())
    }

    #[test]
    fn test_without_worktrees_dir() -> Result<()> {
        let env = CliTestEnvironment::without_worktrees_dir()?;
        env.repo_dir
            .child(".worktrees")
            .assert(predicate::path::missing());
        Ok(())
    }
}
