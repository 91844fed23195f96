//! Command runner triggered by file changes.
//!
//! Clears the terminal, prints a header with the time and the command line,
//! runs the command with its output streaming straight to the caller's
//! stream, so the child keeps its terminal and colors. A failed run ends
//! with a red banner pinned to the bottom of the screen.

use std::io::Write;
use std::process::{Command, Stdio};

use chrono::{DateTime, Local};

use crate::error::ExecError;
use crate::Result;

/// Home cursor, reset formatting, clear screen and scrollback.
const CLEAR: &str = "\x1b[H\x1b[0m\x1b[2J\x1b[3J";

/// Clear the current line.
const CLEAR_LINE: &str = "\x1b[2K";

const BOLD: u8 = 1;
const BRIGHT_WHITE: u8 = 97;
const RED_BACKGROUND: u8 = 41;

/// Characters that make a lone argument run through `sh -c`.
const SHELL_CHARS: &[char] = &['|', '&', ';'];

/// A command re-run on every change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandRunner {
    args: Vec<String>,
}

impl CommandRunner {
    /// Build a runner from a command line.
    ///
    /// A single argument containing `|`, `&` or `;` is treated as a shell
    /// snippet and run with `sh -c`.
    ///
    /// # Errors
    ///
    /// Returns an error if `args` is empty.
    pub fn new(mut args: Vec<String>) -> Result<Self> {
        if args.is_empty() {
            return Err(ExecError::EmptyCommand.into());
        }

        if args.len() == 1 && args[0].contains(SHELL_CHARS) {
            let snippet = args.remove(0);
            args = vec!["sh".to_string(), "-c".to_string(), snippet];
        }

        Ok(Self { args })
    }

    /// Program and arguments as they will be executed.
    #[must_use]
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Command line joined with spaces.
    #[must_use]
    pub fn command_line(&self) -> String {
        self.args.join(" ")
    }

    /// Run the command.
    ///
    /// The header and any failure banner go to `out`; the child writes its
    /// own output directly to `stdout` and `stderr` while it runs. Pass the
    /// same stream for all three to get the usual terminal view.
    ///
    /// Returns whether the command ran and exited successfully.
    ///
    /// # Errors
    ///
    /// Returns an error only if writing to `out` fails.
    pub fn run<W: Write>(
        &self,
        out: &mut W,
        stdout: impl Into<Stdio>,
        stderr: impl Into<Stdio>,
    ) -> Result<bool> {
        let command_line = self.command_line();
        let write_err = |e: std::io::Error| ExecError::Output {
            command: command_line.clone(),
            reason: e.to_string(),
        };

        writeln!(
            out,
            "{CLEAR}{}",
            wrap_color(&format!("{CLEAR_LINE}{}", header(Local::now(), &command_line)), &[BOLD])
        )
        .map_err(write_err)?;
        out.flush().map_err(write_err)?;

        tracing::debug!(command = %command_line, "Running command");
        let status = Command::new(&self.args[0])
            .args(&self.args[1..])
            .stdout(stdout)
            .stderr(stderr)
            .status();
        let failure = match status {
            Ok(status) if status.success() => None,
            Ok(status) => Some(status.to_string()),
            Err(e) => Some(e.to_string()),
        };

        if let Some(reason) = &failure {
            tracing::warn!(command = %command_line, reason = %reason, "Command failed");
            write!(
                out,
                "\n\x1b[999H{}\x1b[H",
                wrap_color(
                    &format!("{CLEAR_LINE}error: {reason}"),
                    &[BRIGHT_WHITE, RED_BACKGROUND, BOLD]
                )
            )
            .map_err(write_err)?;
        }
        out.flush().map_err(write_err)?;

        Ok(failure.is_none())
    }
}

/// `  ◄►  3:04:05 PM  ◄►  make test  ◄►  `
fn header(now: DateTime<Local>, command_line: &str) -> String {
    let time = now.format("%-I:%M:%S %p").to_string();
    ["", time.as_str(), command_line, ""].join("  ◄►  ")
}

/// Wrap `text` in SGR codes, innermost first, followed by a reset.
fn wrap_color(text: &str, codes: &[u8]) -> String {
    let mut wrapped = text.to_string();
    for code in codes {
        wrapped = format!("\x1b[{code}m{wrapped}");
    }
    wrapped.push_str("\x1b[0m");
    wrapped
}
