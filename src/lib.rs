//! # wt
//!
//! A small CLI for git worktrees kept under `.worktrees/` inside the
//! repository, with shell navigation and GitHub Actions polling.
//!
//! ## Quick Start
//!
//! ```bash
//! # Create .worktrees/my-feature on a new branch
//! wt create my-feature
//!
//! # Jump into it, and back to the repository root
//! wt jump my-feature
//! wt jump
//!
//! # Wait for the PR's checks, then clean up
//! wt gha
//! wt remove
//! ```
//!
//! `jump` and `remove` print a path for the shell wrapper in `shell/` to
//! `cd` into; the binary itself never changes the caller's directory.
//!
//! ## Module Structure
//!
//! - [`cli`] - Argument grammar and usage text
//! - [`dispatch`] - Routes a parsed invocation to its command and picks the exit status
//! - [`commands`] - Individual command implementations (create, remove, jump, gha, etc.)
//! - [`storage`] - Path layout of `.worktrees/` and current-worktree detection
//! - [`git`] - Git operations wrapper using git2 crate
//! - [`gha`] - CI check aggregation, the polling loop and the `gh` provider
//! - [`clock`] - Real and fake time sources for polling
//! - [`config`] - Built-in defaults
//! - [`traits`] - Collaborator traits for testability and abstraction

pub mod cli;
pub mod clock;
pub mod commands;
pub mod config;
pub mod dispatch;
pub mod gha;
pub mod git;
pub mod storage;
pub mod traits;

pub use anyhow::Result;
