//! Filesystem backed by the local disk.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use chrono::{DateTime, Utc};

use super::{invalid_path, is_valid_path, DirEntry, FileKind, FileStat, FileSystem};
use crate::error::WatcherError;
use crate::Result;

/// Filesystem rooted at a directory on disk.
///
/// Relative paths handed to [`FileSystem`] methods are resolved against the
/// base directory.
#[derive(Debug, Clone)]
pub struct OsFs {
    base: PathBuf,
}

impl OsFs {
    /// Create a filesystem rooted at `base`.
    ///
    /// # Errors
    ///
    /// Returns an error if `base` does not exist or is not a directory.
    pub fn new(base: impl AsRef<Path>) -> Result<Self> {
        let base = base.as_ref().to_path_buf();

        if !base.is_dir() {
            let reason = if base.exists() {
                "not a directory"
            } else {
                "directory does not exist"
            };
            return Err(WatcherError::root_not_found(base.display().to_string(), reason).into());
        }

        Ok(Self { base })
    }

    /// Base directory on disk.
    #[must_use]
    pub fn base(&self) -> &Path {
        &self.base
    }

    fn resolve(&self, path: &str) -> io::Result<PathBuf> {
        if !is_valid_path(path) {
            return Err(invalid_path(path));
        }
        if path == "." {
            Ok(self.base.clone())
        } else {
            Ok(self.base.join(path))
        }
    }
}

impl FileSystem for OsFs {
    fn read_dir(&self, dir: &str) -> io::Result<Vec<DirEntry>> {
        let native = self.resolve(dir)?;
        let mut entries = Vec::new();

        for entry in fs::read_dir(native)? {
            let entry = entry?;
            let Ok(name) = entry.file_name().into_string() else {
                tracing::trace!(dir, "Skipping entry with non UTF-8 name");
                continue;
            };
            let kind = kind_of(&entry.file_type()?);
            entries.push(DirEntry::new(name, kind));
        }

        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    fn stat(&self, path: &str) -> io::Result<FileStat> {
        let metadata = fs::metadata(self.resolve(path)?)?;
        Ok(FileStat {
            kind: kind_of(&metadata.file_type()),
            modified_ms: unix_millis(metadata.modified()?),
        })
    }
}

fn kind_of(file_type: &fs::FileType) -> FileKind {
    if file_type.is_file() {
        FileKind::File
    } else if file_type.is_dir() {
        FileKind::Dir
    } else {
        FileKind::Other
    }
}

fn unix_millis(time: SystemTime) -> i64 {
    DateTime::<Utc>::from(time).timestamp_millis()
}
