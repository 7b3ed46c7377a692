use anyhow::Result;
use std::io::Write;

use crate::config::VERSION;

/// Prints the `wt` version
///
/// # Errors
/// Returns an error if writing to `out` fails
pub fn print_version(out: &mut dyn Write) -> Result<()> {
    writeln!(out, "{}", VERSION)?;
    Ok(())
}
