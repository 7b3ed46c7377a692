use anyhow::{Context, Result};
use git2::{BranchType, Repository, StatusOptions, WorktreeAddOptions, WorktreePruneOptions};
use std::cell::RefCell;
use std::path::{Path, PathBuf};

use crate::config::WORKTREES_DIR;
use crate::storage::WorktreeLayout;
use crate::traits::GitOperations;

pub struct GitRepo {
    repo: Repository,
}

impl GitRepo {
    /// Opens the git repository containing `path`
    ///
    /// # Errors
    /// Returns an error if `path` is not inside a git repository
    pub fn open(path: &Path) -> Result<Self> {
        let repo = Repository::discover(path).context("not in a git repository")?;
        Ok(Self { repo })
    }

    /// Root of the main working tree. From inside a linked worktree this is
    /// the repository the worktree was added to, not the worktree itself.
    ///
    /// # Errors
    /// Returns an error for bare repositories
    pub fn main_root(&self) -> Result<PathBuf> {
        if self.repo.is_bare() {
            anyhow::bail!("bare repositories are not supported");
        }

        // commondir is the shared `.git` directory; its parent is the main root
        self.repo
            .commondir()
            .parent()
            .map(Path::to_path_buf)
            .context("failed to resolve git directory path")
    }

    /// Creates `branch_name` from HEAD and checks it out into a new worktree
    ///
    /// # Errors
    /// Returns an error if:
    /// - HEAD does not point to a commit
    /// - The branch already exists
    /// - Git fails to add the worktree
    pub fn create_worktree(&self, branch_name: &str, worktree_path: &Path) -> Result<()> {
        let head = self
            .repo
            .head()
            .context("repository has no commits yet")?
            .peel_to_commit()?;

        let branch = self
            .repo
            .branch(branch_name, &head, false)
            .with_context(|| format!("Failed to create branch '{}'", branch_name))?;

        if let Some(parent) = worktree_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        // Like `git worktree add`, accept an existing empty directory
        if is_empty_dir(worktree_path) {
            std::fs::remove_dir(worktree_path).with_context(|| {
                format!("Failed to remove directory {}", worktree_path.display())
            })?;
        }

        let mut opts = WorktreeAddOptions::new();
        opts.reference(Some(branch.get()));

        let admin_name = WorktreeLayout::admin_name(branch_name);
        tracing::debug!(branch = branch_name, admin_name = %admin_name, "adding worktree");

        if let Err(e) = self.repo.worktree(&admin_name, worktree_path, Some(&opts)) {
            // Don't leave an orphaned branch behind
            if let Err(cleanup) = self.delete_branch(branch_name) {
                tracing::warn!(error = %cleanup, "failed to delete branch after worktree error");
            }
            return Err(e.into());
        }

        Ok(())
    }

    /// Removes the worktree checked out at `worktree_path`
    ///
    /// # Errors
    /// Returns an error if:
    /// - No registered worktree lives at that path
    /// - The worktree has modified or untracked files
    /// - Git fails to prune it
    pub fn remove_worktree(&self, worktree_path: &Path) -> Result<()> {
        let worktree = self.find_worktree_by_path(worktree_path)?;

        if has_local_changes(worktree_path)? {
            anyhow::bail!(
                "'{}' contains modified or untracked files",
                worktree_path.display()
            );
        }

        worktree.prune(Some(
            WorktreePruneOptions::new().valid(true).working_tree(true),
        ))?;

        if worktree_path.exists() {
            std::fs::remove_dir_all(worktree_path).with_context(|| {
                format!("Failed to remove directory {}", worktree_path.display())
            })?;
        }

        let worktrees_dir = self.main_root()?.join(WORKTREES_DIR);
        remove_empty_parents(worktree_path, &worktrees_dir)?;

        Ok(())
    }

    fn find_worktree_by_path(&self, worktree_path: &Path) -> Result<git2::Worktree> {
        let wanted = canonical(worktree_path);

        for name in self.repo.worktrees()?.iter().flatten() {
            let worktree = self.repo.find_worktree(name)?;
            if canonical(worktree.path()) == wanted {
                return Ok(worktree);
            }
        }

        anyhow::bail!("'{}' is not a working tree", worktree_path.display())
    }

    /// Deletes a local branch whether or not it is merged
    ///
    /// # Errors
    /// Returns an error if:
    /// - Branch doesn't exist
    /// - Git operations fail
    pub fn delete_branch(&self, branch_name: &str) -> Result<()> {
        let mut branch = self.repo.find_branch(branch_name, BranchType::Local)?;
        branch.delete()?;
        Ok(())
    }
}

fn has_local_changes(worktree_path: &Path) -> Result<bool> {
    if !worktree_path.exists() {
        return Ok(false);
    }

    let repo = Repository::open(worktree_path)?;
    let mut opts = StatusOptions::new();
    opts.include_untracked(true).include_ignored(false);
    Ok(!repo.statuses(Some(&mut opts))?.is_empty())
}

fn is_empty_dir(path: &Path) -> bool {
    std::fs::read_dir(path).is_ok_and(|mut entries| entries.next().is_none())
}

/// Removes the empty directories a nested branch name (`feature/auth`) left
/// between `worktree_path` and `stop`, stopping at the first non-empty one
fn remove_empty_parents(worktree_path: &Path, stop: &Path) -> Result<()> {
    let stop = canonical(stop);
    let mut dir = worktree_path.parent();

    while let Some(current) = dir {
        let resolved = canonical(current);
        if resolved == stop || !resolved.starts_with(&stop) || !is_empty_dir(current) {
            break;
        }
        std::fs::remove_dir(current)
            .with_context(|| format!("Failed to remove directory {}", current.display()))?;
        dir = current.parent();
    }

    Ok(())
}

fn canonical(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}

/// Production [`GitOperations`] backed by libgit2. Repositories are opened
/// per call so commands that never touch git (completion, version) work
/// outside a repository.
pub struct SystemGit {
    cwd: Option<PathBuf>,
}

impl SystemGit {
    #[must_use]
    pub fn new(cwd: Option<PathBuf>) -> Self {
        Self { cwd }
    }
}

impl GitOperations for SystemGit {
    fn main_root(&self) -> Result<PathBuf> {
        let cwd = self.cwd.as_deref().context("not in a git repository")?;
        GitRepo::open(cwd)?.main_root()
    }

    fn create_worktree(&self, root: &Path, branch: &str, worktree_path: &Path) -> Result<()> {
        GitRepo::open(root)?.create_worktree(branch, worktree_path)
    }

    fn remove_worktree(&self, root: &Path, worktree_path: &Path) -> Result<()> {
        GitRepo::open(root)?.remove_worktree(worktree_path)
    }

    fn delete_branch(&self, root: &Path, branch: &str) -> Result<()> {
        GitRepo::open(root)?.delete_branch(branch)
    }
}

/// Recording [`GitOperations`] for tests. Creating a worktree makes its
/// directory so later steps (copying, hooks) have somewhere to write.
pub struct MockGit {
    root: Option<PathBuf>,
    failures: Vec<(&'static str, String)>,
    calls: RefCell<Vec<String>>,
}

impl MockGit {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
            failures: Vec::new(),
            calls: RefCell::new(Vec::new()),
        }
    }

    /// A mock whose `main_root` fails as if run outside a repository
    #[must_use]
    pub fn outside_repo() -> Self {
        Self {
            root: None,
            failures: Vec::new(),
            calls: RefCell::new(Vec::new()),
        }
    }

    /// Makes `operation` (`create_worktree`, `remove_worktree`, `delete_branch`)
    /// fail with `message`
    #[must_use]
    pub fn failing(mut self, operation: &'static str, message: impl Into<String>) -> Self {
        self.failures.push((operation, message.into()));
        self
    }

    #[must_use]
    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    fn record(&self, operation: &'static str, detail: &str) -> Result<()> {
        self.calls
            .borrow_mut()
            .push(format!("{} {}", operation, detail).trim_end().to_string());

        match self.failures.iter().find(|(op, _)| *op == operation) {
            Some((_, message)) => Err(anyhow::anyhow!(message.clone())),
            None => Ok(()),
        }
    }
}

impl GitOperations for MockGit {
    fn main_root(&self) -> Result<PathBuf> {
        self.record("main_root", "")?;
        self.root.clone().context("not in a git repository")
    }

    fn create_worktree(&self, _root: &Path, branch: &str, worktree_path: &Path) -> Result<()> {
        self.record(
            "create_worktree",
            &format!("{} {}", branch, worktree_path.display()),
        )?;
        std::fs::create_dir_all(worktree_path)?;
        Ok(())
    }

    fn remove_worktree(&self, _root: &Path, worktree_path: &Path) -> Result<()> {
        self.record("remove_worktree", &worktree_path.display().to_string())?;
        if worktree_path.exists() {
            std::fs::remove_dir_all(worktree_path)?;
        }
        Ok(())
    }

    fn delete_branch(&self, _root: &Path, branch: &str) -> Result<()> {
        self.record("delete_branch", branch)
    }
}
