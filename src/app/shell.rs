use crate::app::commands::{execute, parse_shell_line};
use crate::core::depot::DepotService;
use crate::domain::ports::{AuditLog, Storage};
use crate::utils::error::Result;
use std::io::{BufRead, Write};

/// Reads commands line by line and runs them against one service.
///
/// Rejected requests are reported on `output` and the loop continues; only
/// failures to read `input` or write `output` end the session early.
pub fn run_shell<S, L, R, W>(
    service: &mut DepotService<S, L>,
    input: R,
    mut output: W,
    report_path: &str,
) -> Result<usize>
where
    S: Storage,
    L: AuditLog,
    R: BufRead,
    W: Write,
{
    let mut executed = 0;

    for line in input.lines() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed == "exit" || trimmed == "quit" {
            break;
        }

        let command = match parse_shell_line(trimmed) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                writeln!(output, "error: {}", e)?;
                continue;
            }
        };

        match execute(service, &command, report_path) {
            Ok(text) => {
                output.write_all(text.as_bytes())?;
                executed += 1;
            }
            Err(e) => {
                tracing::debug!("Command {:?} rejected: {}", command, e);
                writeln!(output, "error: {}", e.user_friendly_message())?;
            }
        }
    }

    output.flush()?;
    Ok(executed)
}
