//! Polling watcher.
//!
//! Each tick stats one chunk of the known files and reports at most one
//! file whose modification time moved past the watermark. Files that changed
//! recently are rechecked every tick through a small recency cache, since a
//! file being edited tends to change again soon.

use std::collections::BTreeSet;
use std::thread;
use std::time::Duration;

use chrono::Utc;

use super::recency::RecencyCache;
use super::scanner::enumerate;
use super::schedule::ChunkSchedule;
use crate::error::WatcherError;
use crate::fs::FileSystem;
use crate::Result;

/// Default number of files stat'd per tick.
const DEFAULT_CHUNK_SIZE: usize = 6;

/// Default delay between ticks.
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Watcher configuration.
#[derive(Debug, Clone)]
pub struct WatcherConfig {
    /// Files stat'd per tick. Zero is treated as one.
    pub chunk_size: usize,
    /// Delay before each tick.
    pub poll_interval: Duration,
    /// Starting watermark in milliseconds since the Unix epoch.
    ///
    /// With the default of zero every existing file counts as changed the
    /// first time its chunk is polled.
    pub initial_watermark: i64,
}

impl Default for WatcherConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            poll_interval: DEFAULT_POLL_INTERVAL,
            initial_watermark: 0,
        }
    }
}

impl WatcherConfig {
    /// Chunk size after coercion to at least one.
    #[must_use]
    pub fn effective_chunk_size(&self) -> usize {
        self.chunk_size.max(1)
    }
}

/// Counters accumulated over the watcher's lifetime.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct WatchStats {
    /// Poll ticks run.
    pub cycles: u64,
    /// Stat calls made, excluding the empty-tree placeholder.
    pub stats: u64,
    /// Stat calls that failed, e.g. for files deleted since the walk.
    pub stat_failures: u64,
    /// Changes reported.
    pub changes: u64,
}

/// Polling file watcher.
#[derive(Debug)]
pub struct Watcher {
    config: WatcherConfig,
    watermark: i64,
    files: BTreeSet<String>,
    recent: RecencyCache<String>,
    stats: WatchStats,
}

impl Default for Watcher {
    fn default() -> Self {
        Self::new(WatcherConfig::default())
    }
}

impl Watcher {
    /// Create a watcher.
    #[must_use]
    pub fn new(config: WatcherConfig) -> Self {
        let recent = RecencyCache::new(config.effective_chunk_size());
        Self {
            watermark: config.initial_watermark,
            config,
            files: BTreeSet::new(),
            recent,
            stats: WatchStats::default(),
        }
    }

    #[must_use]
    pub const fn config(&self) -> &WatcherConfig {
        &self.config
    }

    /// Latest modification time already accounted for, in ms since epoch.
    #[must_use]
    pub const fn watermark(&self) -> i64 {
        self.watermark
    }

    /// Raise the watermark to `modified_ms`. Lower values are ignored.
    pub fn advance_watermark(&mut self, modified_ms: i64) {
        self.watermark = self.watermark.max(modified_ms);
    }

    /// Every file discovered so far, sorted.
    #[must_use]
    pub const fn files(&self) -> &BTreeSet<String> {
        &self.files
    }

    /// Files that changed most recently, newest first.
    #[must_use]
    pub const fn recent(&self) -> &RecencyCache<String> {
        &self.recent
    }

    #[must_use]
    pub const fn stats(&self) -> WatchStats {
        self.stats
    }

    /// Walk `root` and merge the result into the known file set.
    ///
    /// Files that are no longer found stay in the set; their stats fail and
    /// count as never modified. Returns the number of newly added files.
    pub fn reindex<F: FileSystem + ?Sized>(&mut self, fsys: &F, root: &str) -> usize {
        let before = self.files.len();
        self.files.extend(enumerate(fsys, root));
        let added = self.files.len() - before;

        if added > 0 {
            tracing::debug!(root, added, total = self.files.len(), "File set updated");
        }
        added
    }

    /// Poll `root` for `cycles` ticks.
    ///
    /// Re-walks `root` first, then returns a blocking iterator. Each call to
    /// `next` sleeps for the poll interval, stats the next chunk of files and
    /// yields `Some(path)` for the newest file past the watermark, or `None`.
    pub fn scan_cycles<'a, F: FileSystem + ?Sized>(
        &'a mut self,
        fsys: &'a F,
        root: &str,
        cycles: usize,
    ) -> ScanCycles<'a, F> {
        self.reindex(fsys, root);

        let schedule = ChunkSchedule::new(
            self.files.iter().cloned(),
            self.config.effective_chunk_size(),
            cycles,
        );

        ScanCycles {
            watcher: self,
            fsys,
            schedule,
        }
    }

    /// Poll for roughly `duration`, calling `on_change` for every change.
    ///
    /// Runs `duration / poll_interval` ticks. After each callback the
    /// watermark jumps to the current time, so a change is not reported
    /// twice. Returns the number of changes reported.
    ///
    /// # Errors
    ///
    /// Returns an error if the poll interval is zero.
    pub fn run_for<F, C>(
        &mut self,
        duration: Duration,
        fsys: &F,
        root: &str,
        mut on_change: C,
    ) -> Result<usize>
    where
        F: FileSystem + ?Sized,
        C: FnMut(&str),
    {
        let interval = self.config.poll_interval;
        if interval.is_zero() {
            return Err(WatcherError::ZeroPollInterval {
                duration_ms: duration.as_millis(),
            }
            .into());
        }

        let cycles =
            usize::try_from(duration.as_nanos() / interval.as_nanos()).unwrap_or(usize::MAX);
        let mut reported = 0;

        let mut scan = self.scan_cycles(fsys, root, cycles);
        while let Some(change) = scan.next() {
            if let Some(path) = change {
                on_change(&path);
                scan.advance_watermark(Utc::now().timestamp_millis());
                reported += 1;
            }
        }

        Ok(reported)
    }

    fn tick<F: FileSystem + ?Sized>(&mut self, fsys: &F, chunk: &[String]) -> Option<String> {
        self.stats.cycles += 1;

        let changed = self.newest_change(fsys, chunk).or_else(|| {
            let recent = self.recent.snapshot();
            self.newest_change(fsys, &recent)
        })?;

        tracing::debug!(path = %changed, watermark = self.watermark, "Change detected");
        self.recent.touch(changed.clone());
        self.stats.changes += 1;
        Some(changed)
    }

    /// Pick the newest file past the watermark and move the watermark to it.
    fn newest_change<F: FileSystem + ?Sized>(
        &mut self,
        fsys: &F,
        files: &[String],
    ) -> Option<String> {
        let mut newest = None;
        for file in files {
            let modified = self.modified_ms(fsys, file);
            if modified > self.watermark {
                self.watermark = modified;
                newest = Some(file);
            }
        }
        newest.cloned()
    }

    fn modified_ms<F: FileSystem + ?Sized>(&mut self, fsys: &F, path: &str) -> i64 {
        // Placeholder chunk of an empty tree.
        if path.is_empty() {
            return 0;
        }
        self.stats.stats += 1;
        match fsys.stat(path) {
            Ok(stat) => stat.modified_ms,
            Err(e) => {
                tracing::trace!(path, error = %e, "Stat failed");
                self.stats.stat_failures += 1;
                0
            }
        }
    }
}

/// Blocking iterator of poll results. See [`Watcher::scan_cycles`].
pub struct ScanCycles<'a, F: ?Sized> {
    watcher: &'a mut Watcher,
    fsys: &'a F,
    schedule: ChunkSchedule<String>,
}

impl<F: FileSystem + ?Sized> ScanCycles<'_, F> {
    /// Raise the watcher's watermark between ticks.
    pub fn advance_watermark(&mut self, modified_ms: i64) {
        self.watcher.advance_watermark(modified_ms);
    }

    /// Ticks left.
    #[must_use]
    pub const fn remaining(&self) -> usize {
        self.schedule.remaining()
    }
}

impl<F: FileSystem + ?Sized> Iterator for ScanCycles<'_, F> {
    type Item = Option<String>;

    fn next(&mut self) -> Option<Self::Item> {
        let chunk = self.schedule.next()?;

        let interval = self.watcher.config.poll_interval;
        if !interval.is_zero() {
            thread::sleep(interval);
        }

        Some(self.watcher.tick(self.fsys, &chunk))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.schedule.size_hint()
    }
}
