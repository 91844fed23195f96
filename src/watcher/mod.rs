//! Polling file watcher.
//!
//! This module provides:
//! - Recursive enumeration of watchable files, skipping hidden directories
//! - Round-robin chunk scheduling so each tick stats a bounded set of files
//! - A recency cache that rechecks recently changed files every tick
//! - The [`Watcher`] that ties them together behind a blocking iterator

mod events;
mod recency;
mod scanner;
mod schedule;
#[allow(clippy::module_inception)]
mod watcher;

pub use events::ChangeEvent;
pub use recency::RecencyCache;
pub use scanner::{enumerate, enumerate_with_stats, ScanStats};
pub use schedule::{schedule, ChunkSchedule};
pub use watcher::{ScanCycles, WatchStats, Watcher, WatcherConfig};
