//! Test support utilities for wt integration tests
//!
//! This crate provides shared test helpers and utilities for integration tests.
//! It's designed to be used only during development and testing, not published.

pub mod patterns;
pub mod test_env;

// Re-export commonly used items for convenience
pub use patterns::{assert_claude_dir_copied, create_claude_dir, write_hook};
pub use test_env::{CliTestEnvironment, stdout_path};
