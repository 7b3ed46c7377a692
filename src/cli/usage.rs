use clap::{Arg, Command, ValueHint};

use crate::config::{DEFAULT_HOOK, VERSION};

const EXAMPLES: &str = "\
Examples:
  wt create my-feature           Create .worktrees/my-feature on a new branch
  wt create --hook setup.sh feat Create a worktree, then run setup.sh inside it
  wt jump my-feature             Jump to a worktree
  wt jump                        Jump back to the repository root
  wt remove                      Remove the worktree you are in (auto-detects)
  wt remove my-feature           Remove a worktree and its branch
  wt gha                         Wait for GHA checks on the current branch's PR
  wt completion bash             Generate a bash completion script";

/// The `wt` command surface as a clap definition.
///
/// Parsing is done by [`crate::cli::Grammar`]; this definition only renders
/// help and feeds `clap_complete`.
#[must_use]
pub fn build_command() -> Command {
    Command::new("wt")
        .about("Git worktrees under .worktrees/, with shell navigation and CI polling")
        .version(VERSION)
        .override_usage("wt <command> [--hook <path>] [<name>]")
        .disable_help_subcommand(true)
        .disable_version_flag(true)
        .arg(
            Arg::new("hook")
                .long("hook")
                .value_name("path")
                .global(true)
                .default_value(DEFAULT_HOOK)
                .value_hint(ValueHint::FilePath)
                .help("Hook script run inside a new worktree after create"),
        )
        .subcommand(
            Command::new("create")
                .about("Create a worktree with a new branch")
                .arg(
                    Arg::new("name")
                        .required(true)
                        .value_hint(ValueHint::Other),
                ),
        )
        .subcommand(
            Command::new("remove")
                .about("Remove a worktree and its branch; auto-detects the current worktree")
                .arg(Arg::new("name").value_hint(ValueHint::Other)),
        )
        .subcommand(Command::new("list").about("List all worktrees"))
        .subcommand(
            Command::new("jump")
                .about("Jump to a worktree, or to the repository root without a name")
                .arg(Arg::new("name").value_hint(ValueHint::Other)),
        )
        .subcommand(
            Command::new("gha")
                .about("Monitor GitHub Actions status for the current branch's PR"),
        )
        .subcommand(
            Command::new("completion")
                .about("Generate a shell completion script")
                .arg(
                    Arg::new("shell")
                        .required(true)
                        .value_parser(["bash", "zsh", "fish"]),
                ),
        )
        .subcommand(Command::new("version").about("Print the wt version"))
        .subcommand(
            Command::new("__complete")
                .hide(true)
                .arg(Arg::new("subcommand").required(true)),
        )
        .after_help(EXAMPLES)
}

/// Plain-text help printed by `wt --help` and on empty input
#[must_use]
pub fn usage_text() -> String {
    build_command().render_help().to_string()
}
