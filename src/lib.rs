//! pollwatch
//!
//! Polling file watcher. Finds the most recently modified file under a
//! directory tree by stat'ing a bounded chunk of files per tick, and reports
//! at most one change per tick so a caller can react, for example by
//! re-running a build command.

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod exec;
pub mod fs;
pub mod observability;
pub mod watcher;

pub use config::{Config, OutputFormat};
pub use error::{Error, Result};
pub use exec::CommandRunner;
pub use fs::{FileSystem, MemFs, OsFs};
pub use watcher::{ChangeEvent, Watcher, WatcherConfig};
