//! pollwatch - re-run a command when a file changes
//!
//! Entry point for the pollwatch binary.

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use is_terminal::IsTerminal;
use pollwatch::observability::{init_tracing, TracingConfig};
use pollwatch::{ChangeEvent, CommandRunner, Config, OsFs, OutputFormat, Result, Watcher};

/// Poll a directory tree and report or react to the most recently changed file
#[derive(Parser, Debug)]
#[command(name = "pollwatch")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory to watch
    #[arg(short, long, env = "POLLWATCH_ROOT", default_value = ".")]
    root: PathBuf,

    /// Files checked per poll tick
    #[arg(short, long, env = "POLLWATCH_CHUNK_SIZE", default_value = "6")]
    chunk_size: usize,

    /// Milliseconds between poll ticks
    #[arg(short, long, env = "POLLWATCH_POLL_INTERVAL_MS", default_value = "100")]
    poll_interval_ms: u64,

    /// Seconds between re-walks of the directory tree
    #[arg(long, env = "POLLWATCH_RUN_WINDOW_SECS", default_value = "60")]
    run_window_secs: u64,

    /// Do not report files that already exist at startup
    #[arg(long, env = "POLLWATCH_SKIP_INITIAL")]
    skip_initial: bool,

    /// Change report format when printing paths
    #[arg(long, value_enum, env = "POLLWATCH_FORMAT", default_value = "text")]
    format: OutputFormat,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "POLLWATCH_LOG_LEVEL", default_value = "warn")]
    log_level: String,

    /// Enable JSON logging output
    #[arg(long, env = "POLLWATCH_LOG_JSON")]
    log_json: bool,

    /// Command to run on every change; a single argument containing
    /// `|`, `&` or `;` runs through `sh -c`
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    command: Vec<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(&TracingConfig {
        level: cli.log_level.clone(),
        json: cli.log_json,
    });

    let config = Config {
        root: cli.root,
        chunk_size: cli.chunk_size,
        poll_interval: Duration::from_millis(cli.poll_interval_ms),
        run_window: Duration::from_secs(cli.run_window_secs),
        skip_initial: cli.skip_initial,
        log_level: cli.log_level,
        log_json: cli.log_json,
        format: cli.format,
        command: cli.command,
    };

    tracing::debug!(?config, "Configuration loaded");
    config.validate()?;

    let mode = select_mode(io::stdout().is_terminal(), !config.command.is_empty());
    if mode == Mode::Idle {
        tracing::warn!("stdout is a terminal and no command was given; nothing to do");
        if io::stdin().is_terminal() {
            println!("stdin is terminal");
        }
        return Ok(());
    }

    let fsys = OsFs::new(&config.root)?;
    let mut watcher = Watcher::new(config.watcher_config());

    tracing::info!(
        root = %config.root.display(),
        chunk_size = config.chunk_size,
        cycles_per_run = %config.cycles_per_run(),
        "Watching for changes"
    );

    if mode == Mode::Print {
        watch(&mut watcher, &fsys, &config, |path| print_change(path, config.format))
    } else {
        let runner = CommandRunner::new(config.command.clone())?;
        watch(&mut watcher, &fsys, &config, |_| {
            runner
                .run(&mut io::stderr(), io::stderr(), io::stderr())
                .map(|_| ())
        })
    }
}

/// What to do with detected changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    /// Print changed paths to stdout.
    Print,
    /// Re-run the command on every change.
    Run,
    /// Nothing useful to do; exit.
    Idle,
}

/// Piped stdout always gets paths; a terminal gets the command, if any.
const fn select_mode(stdout_is_terminal: bool, has_command: bool) -> Mode {
    match (stdout_is_terminal, has_command) {
        (false, _) => Mode::Print,
        (true, true) => Mode::Run,
        (true, false) => Mode::Idle,
    }
}

/// Poll forever, one run window at a time.
fn watch<F>(watcher: &mut Watcher, fsys: &OsFs, config: &Config, mut on_change: F) -> Result<()>
where
    F: FnMut(&str) -> Result<()>,
{
    loop {
        let mut failure = None;
        watcher.run_for(config.run_window, fsys, ".", |path| {
            if failure.is_none() {
                failure = on_change(path).err();
            }
        })?;

        if let Some(e) = failure {
            return Err(e);
        }

        let stats = watcher.stats();
        tracing::debug!(
            files = watcher.files().len(),
            cycles = stats.cycles,
            changes = stats.changes,
            stat_failures = stats.stat_failures,
            "Run window complete"
        );
    }
}

fn print_change(path: &str, format: OutputFormat) -> Result<()> {
    let mut stdout = io::stdout().lock();
    match format {
        OutputFormat::Text => writeln!(stdout, "{path}")?,
        OutputFormat::Json => writeln!(stdout, "{}", ChangeEvent::new(path).to_json_line()?)?,
    }
    stdout.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_mode() {
        assert_eq!(select_mode(false, false), Mode::Print);
        assert_eq!(select_mode(false, true), Mode::Print);
        assert_eq!(select_mode(true, true), Mode::Run);
        assert_eq!(select_mode(true, false), Mode::Idle);
    }

    #[test]
    fn test_cli_trailing_command() {
        let cli = Cli::parse_from(["pollwatch", "-c", "3", "cargo", "test", "--all"]);
        assert_eq!(cli.chunk_size, 3);
        assert_eq!(cli.command, vec!["cargo", "test", "--all"]);
    }
}
