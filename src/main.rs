use std::io::{self, Write};
use std::process::ExitCode;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use wt::cli::{Grammar, utf8_args};
use wt::clock::SystemClock;
use wt::config::{DEFAULT_LOG_FILTER, GhaConfig, LOG_ENV};
use wt::dispatch::{Dispatcher, run};
use wt::gha::GhCli;
use wt::git::SystemGit;

/// Logs go to stderr; stdout carries paths for the shell wrapper
fn init_tracing() {
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .with_target(false),
        )
        .init();
}

fn main() -> ExitCode {
    init_tracing();

    let args = match utf8_args(std::env::args_os().skip(1)) {
        Ok(args) => args,
        Err(e) => {
            let _ = writeln!(io::stderr(), "error: {e}");
            return ExitCode::from(1);
        }
    };

    let cwd = match std::env::current_dir() {
        Ok(cwd) => Some(cwd),
        Err(e) => {
            tracing::warn!(error = %e, "cannot determine current directory");
            None
        }
    };

    let git = SystemGit::new(cwd.clone());
    let dispatcher = Dispatcher {
        git: &git,
        provider: &GhCli,
        clock: &SystemClock,
        cwd,
        gha: GhaConfig::default(),
    };

    let mut out = io::stdout().lock();
    let mut err = io::stderr();
    let code = run(&Grammar::default(), args.as_slice(), &dispatcher, &mut out, &mut err);
    let _ = out.flush();

    ExitCode::from(code)
}
