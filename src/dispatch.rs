//! Routes a parsed [`Invocation`] to its handler and maps the outcome to an
//! exit status.

use anyhow::Result;
use std::io::Write;
use std::path::PathBuf;

use crate::cli::{Command, Grammar, Invocation, ParseError, usage_text};
use crate::commands::completion::Shell;
use crate::commands::{complete, completion, create, gha, jump, list, remove, version};
use crate::config::GhaConfig;
use crate::traits::{Clock, GitOperations, PrStatusProvider};

/// Everything a command handler may need from the outside world
pub struct Dispatcher<'a> {
    pub git: &'a dyn GitOperations,
    pub provider: &'a dyn PrStatusProvider,
    pub clock: &'a dyn Clock,
    /// `None` when the current directory could not be determined
    pub cwd: Option<PathBuf>,
    pub gha: GhaConfig,
}

impl Dispatcher<'_> {
    /// # Errors
    /// Returns whatever error the selected handler returns
    pub fn dispatch(
        &self,
        invocation: &Invocation,
        out: &mut dyn Write,
        err: &mut dyn Write,
    ) -> Result<()> {
        let name = invocation.name.as_deref();
        let cwd = self.cwd.as_deref();

        match invocation.command {
            Command::Create => {
                let name = name.ok_or(ParseError::BranchNameRequired)?;
                create::create_worktree(self.git, name, &invocation.hook_path, out)
            }
            Command::Remove => remove::remove_worktree(self.git, cwd, name, out, err),
            Command::List => list::list_worktrees(self.git, out),
            Command::Jump => jump::jump_to_worktree(self.git, cwd, name, out),
            Command::Root => jump::print_root(self.git, cwd, out),
            Command::Gha => gha::monitor_checks(self.provider, self.clock, &self.gha, out),
            Command::Completion => {
                let shell: Shell = name.ok_or(ParseError::ShellRequired)?.parse()?;
                completion::generate_completion(shell, out)
            }
            Command::Complete => {
                let subcommand = name.ok_or(ParseError::SubcommandRequired)?;
                complete::complete_names(self.git, subcommand, out)
            }
            Command::Version => version::print_version(out),
            Command::ShowHelp => {
                write!(out, "{}", usage_text())?;
                Ok(())
            }
        }
    }
}

/// Parses `args`, runs the command and reports failures on `err`.
///
/// Returns the process exit status: 0 on success, 1 on any error.
#[must_use]
pub fn run<S: AsRef<str>>(
    grammar: &Grammar,
    args: &[S],
    dispatcher: &Dispatcher<'_>,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> u8 {
    let result = grammar
        .parse(args)
        .map_err(anyhow::Error::from)
        .and_then(|invocation| dispatcher.dispatch(&invocation, out, err));

    let Err(error) = result else {
        return 0;
    };

    tracing::debug!(error = ?error, "command failed");

    // Output sinks are the terminal; there is nowhere left to report a write failure
    let _ = out.flush();
    let _ = match error.downcast_ref::<ParseError>() {
        Some(ParseError::MissingCommand) => write!(err, "{}", usage_text()),
        _ => writeln!(err, "error: {:#}", error),
    };
    1
}
