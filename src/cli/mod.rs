//! Argument grammar for `wt`.
//!
//! The grammar is deliberately small: one command word, an optional
//! `--hook <path>` option, and at most one positional argument. Every
//! malformed token is reported by name; nothing is silently corrected.
//!
//! ```text
//! wt [--hook <path>] <command> [--hook <path>] [<name>]
//! ```

pub mod usage;

use std::ffi::OsString;
use std::fmt;
use thiserror::Error;

use crate::config::DEFAULT_HOOK;

pub use usage::{build_command, usage_text};

/// What the user asked `wt` to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Create,
    Remove,
    List,
    Jump,
    Gha,
    Completion,
    /// `__complete`, called by the generated completion scripts
    Complete,
    /// Print the repository root when inside a worktree
    Root,
    Version,
    ShowHelp,
}

impl Command {
    /// Command words accepted in first position
    pub const KNOWN: [Command; 8] = [
        Command::Create,
        Command::Remove,
        Command::List,
        Command::Jump,
        Command::Gha,
        Command::Completion,
        Command::Complete,
        Command::Version,
    ];

    #[must_use]
    pub fn from_word(word: &str) -> Option<Self> {
        Self::KNOWN.into_iter().find(|cmd| cmd.word() == Some(word))
    }

    /// The word that selects this command, if it has one
    #[must_use]
    pub fn word(self) -> Option<&'static str> {
        match self {
            Command::Create => Some("create"),
            Command::Remove => Some("remove"),
            Command::List => Some("list"),
            Command::Jump => Some("jump"),
            Command::Gha => Some("gha"),
            Command::Completion => Some("completion"),
            Command::Complete => Some("__complete"),
            Command::Version => Some("version"),
            Command::Root | Command::ShowHelp => None,
        }
    }

    fn arity(self) -> Arity {
        match self {
            Command::Create => Arity::Required(ParseError::BranchNameRequired),
            Command::Completion => Arity::Required(ParseError::ShellRequired),
            Command::Complete => Arity::Required(ParseError::SubcommandRequired),
            Command::Remove | Command::Jump => Arity::Optional,
            Command::List | Command::Gha | Command::Version | Command::Root | Command::ShowHelp => {
                Arity::None
            }
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self, self.word()) {
            (_, Some(word)) => write!(f, "{}", word),
            (Command::Root, None) => write!(f, "root"),
            _ => write!(f, "help"),
        }
    }
}

/// How many positional arguments a command takes
enum Arity {
    None,
    Optional,
    Required(ParseError),
}

/// A fully parsed command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub command: Command,
    /// Branch, worktree, shell or subcommand name depending on `command`
    pub name: Option<String>,
    pub hook_path: String,
}

impl Invocation {
    #[must_use]
    pub fn new(command: Command, name: Option<String>) -> Self {
        Self {
            command,
            name,
            hook_path: DEFAULT_HOOK.to_string(),
        }
    }

    #[must_use]
    pub fn with_hook(mut self, hook_path: impl Into<String>) -> Self {
        self.hook_path = hook_path.into();
        self
    }

    /// Renders the invocation back into arguments that parse to an equal value.
    ///
    /// `Root` renders without a command word, which only parses back under
    /// [`EmptyInputPolicy::NavigateToRoot`].
    #[must_use]
    pub fn to_args(&self) -> Vec<String> {
        if self.command == Command::ShowHelp {
            return vec!["--help".to_string()];
        }

        let mut args: Vec<String> = self.command.word().map(str::to_string).into_iter().collect();
        if self.hook_path != DEFAULT_HOOK {
            args.push("--hook".to_string());
            args.push(self.hook_path.clone());
        }
        args.extend(self.name.iter().cloned());
        args
    }
}

/// Why an argument list was rejected
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseError {
    /// Empty input under the strict policy; rendered as usage on stderr
    #[error("no command given")]
    MissingCommand,

    #[error("unknown command: {0}")]
    UnknownCommand(String),

    #[error("unknown flag {0}")]
    UnknownFlag(String),

    #[error("--hook requires a path argument")]
    MissingHookPath,

    #[error("branch name required")]
    BranchNameRequired,

    #[error("shell name required (bash, zsh, fish)")]
    ShellRequired,

    #[error("subcommand required")]
    SubcommandRequired,

    #[error("unexpected argument: {0}")]
    UnexpectedArgument(String),

    /// Carries the lossy rendering of the offending argument
    #[error("argument is not valid UTF-8: {0}")]
    InvalidUtf8(String),
}

/// Converts raw process arguments to strings, rejecting the first one that
/// is not valid UTF-8 instead of mangling it into a branch name.
///
/// # Errors
/// Returns [`ParseError::InvalidUtf8`] naming the offending argument
pub fn utf8_args<I: IntoIterator<Item = OsString>>(args: I) -> Result<Vec<String>, ParseError> {
    args.into_iter()
        .map(|arg| {
            arg.into_string()
                .map_err(|raw| ParseError::InvalidUtf8(raw.to_string_lossy().into_owned()))
        })
        .collect()
}

/// What an empty command line means
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmptyInputPolicy {
    /// Print usage to stderr and exit 1
    #[default]
    ShowUsage,
    /// Behave like `wt jump` with no name
    NavigateToRoot,
}

/// What an unrecognised first word means
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnknownCommandPolicy {
    /// Fail with `unknown command: <word>`
    #[default]
    Reject,
    /// Treat the word as a branch name for an implicit `create`
    CreateBranch,
}

/// Parser configuration. The default is the strict grammar `wt` ships with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Grammar {
    pub empty_input: EmptyInputPolicy,
    pub unknown_command: UnknownCommandPolicy,
}

impl Grammar {
    /// The older, forgiving grammar: bare `wt` goes to the root and
    /// `wt <branch>` creates a worktree
    #[must_use]
    pub fn permissive() -> Self {
        Self {
            empty_input: EmptyInputPolicy::NavigateToRoot,
            unknown_command: UnknownCommandPolicy::CreateBranch,
        }
    }

    /// Parses `argv[1..]`.
    ///
    /// # Errors
    /// Returns a [`ParseError`] naming the first malformed token
    pub fn parse<S: AsRef<str>>(&self, args: &[S]) -> Result<Invocation, ParseError> {
        let args: Vec<&str> = args.iter().map(<S as AsRef<str>>::as_ref).collect();

        if is_help_requested(&args) {
            return Ok(Invocation::new(Command::ShowHelp, None));
        }

        let mut cursor = Cursor::new(&args);
        let mut hook_path = cursor.take_options()?;

        let Some(first) = cursor.peek() else {
            return match self.empty_input {
                EmptyInputPolicy::ShowUsage => Err(ParseError::MissingCommand),
                EmptyInputPolicy::NavigateToRoot => {
                    Ok(Invocation::new(Command::Root, None).with_hook(hook_or_default(hook_path)))
                }
            };
        };

        let command = match (Command::from_word(first), self.unknown_command) {
            (Some(command), _) => {
                cursor.advance();
                command
            }
            (None, UnknownCommandPolicy::CreateBranch) => Command::Create,
            (None, UnknownCommandPolicy::Reject) => {
                return Err(ParseError::UnknownCommand(first.to_string()));
            }
        };

        if let Some(path) = cursor.take_options()? {
            hook_path = Some(path);
        }

        let name = match command.arity() {
            Arity::None => None,
            Arity::Optional => cursor.take_positional(),
            Arity::Required(missing) => Some(cursor.take_positional().ok_or(missing)?),
        };

        if let Some(extra) = cursor.peek() {
            return Err(ParseError::UnexpectedArgument(extra.to_string()));
        }

        tracing::debug!(%command, ?name, "parsed arguments");
        Ok(Invocation::new(command, name).with_hook(hook_or_default(hook_path)))
    }
}

fn hook_or_default(hook_path: Option<String>) -> String {
    hook_path.unwrap_or_else(|| DEFAULT_HOOK.to_string())
}

/// `-h` and `--help` win wherever they appear
#[must_use]
pub fn is_help_requested<S: AsRef<str>>(args: &[S]) -> bool {
    args.iter()
        .any(|arg| matches!(arg.as_ref(), "-h" | "--help"))
}

struct Cursor<'a> {
    args: &'a [&'a str],
    idx: usize,
}

impl<'a> Cursor<'a> {
    fn new(args: &'a [&'a str]) -> Self {
        Self { args, idx: 0 }
    }

    fn peek(&self) -> Option<&'a str> {
        self.args.get(self.idx).copied()
    }

    fn advance(&mut self) {
        self.idx += 1;
    }

    /// Consumes a run of `--hook <path>` options. The last one wins.
    fn take_options(&mut self) -> Result<Option<String>, ParseError> {
        let mut hook_path = None;

        while let Some(arg) = self.peek() {
            if arg == "--hook" {
                let path = self
                    .args
                    .get(self.idx + 1)
                    .ok_or(ParseError::MissingHookPath)?;
                hook_path = Some((*path).to_string());
                self.idx += 2;
            } else if arg.starts_with('-') {
                return Err(ParseError::UnknownFlag(arg.to_string()));
            } else {
                break;
            }
        }

        Ok(hook_path)
    }

    fn take_positional(&mut self) -> Option<String> {
        let arg = self.peek()?;
        self.advance();
        Some(arg.to_string())
    }
}
