//! Interactive shell.

use crate::error::CliResult;
use crate::parse::{parse_line, Command};
use crate::session::{Flow, Session};
use ledgerlink_store::SnapshotStore;
use std::io::{BufRead, Write};
use tracing::info;

/// Reads commands from `input` until `quit` or end of input.
///
/// The prompt and listings go to `output`; rejected commands and ids are
/// written to `errors`, one message per line. End of input saves the same
/// way `quit` does.
///
/// # Errors
///
/// Returns an error if reading, writing or saving fails.
pub fn run<S, R, W, E>(
    session: &mut Session<S>,
    mut input: R,
    output: &mut W,
    errors: &mut E,
) -> CliResult<()>
where
    S: SnapshotStore,
    R: BufRead,
    W: Write,
    E: Write,
{
    let mut line = String::new();
    loop {
        write!(output, "{}", session.prompt())?;
        output.flush()?;

        line.clear();
        let command = if input.read_line(&mut line)? == 0 {
            writeln!(output)?;
            Command::Quit
        } else {
            match parse_line(&line) {
                Ok(Some(command)) => command,
                Ok(None) => continue,
                Err(err) if err.is_recoverable() => {
                    writeln!(errors, "{err}")?;
                    continue;
                }
                Err(err) => return Err(err),
            }
        };

        let outcome = session.execute(command, output)?;
        for failure in &outcome.failures {
            writeln!(errors, "{failure}")?;
        }
        if outcome.flow == Flow::Quit {
            info!(nodes = session.registry().len(), "saved and exiting");
            return Ok(());
        }
    }
}
