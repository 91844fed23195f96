//! Filesystem abstraction consumed by the watcher.
//!
//! The watcher only needs two things from a filesystem: list a directory and
//! stat a path. Both are expressed over slash-separated relative paths where
//! `"."` names the root, so the same polling code runs against the real disk
//! ([`OsFs`]) or an in-memory tree ([`MemFs`]).

mod memory;
mod os;

pub use memory::MemFs;
pub use os::OsFs;

use std::io;

/// Kind of a filesystem entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    /// Regular file.
    File,
    /// Directory.
    Dir,
    /// Anything else (symlink, socket, device...).
    Other,
}

/// Result of a stat call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileStat {
    /// Entry kind.
    pub kind: FileKind,
    /// Modification time in milliseconds since the Unix epoch.
    pub modified_ms: i64,
}

impl FileStat {
    /// Stat of a regular file.
    #[must_use]
    pub const fn file(modified_ms: i64) -> Self {
        Self {
            kind: FileKind::File,
            modified_ms,
        }
    }

    /// Stat of a directory.
    #[must_use]
    pub const fn dir(modified_ms: i64) -> Self {
        Self {
            kind: FileKind::Dir,
            modified_ms,
        }
    }
}

/// One entry returned by [`FileSystem::read_dir`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    /// Base name of the entry.
    pub name: String,
    /// Entry kind, not following symlinks.
    pub kind: FileKind,
}

impl DirEntry {
    /// Create a new entry.
    pub fn new(name: impl Into<String>, kind: FileKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    /// Whether the entry is a directory.
    #[must_use]
    pub fn is_dir(&self) -> bool {
        self.kind == FileKind::Dir
    }

    /// Whether the entry name starts with a dot.
    #[must_use]
    pub fn is_hidden(&self) -> bool {
        self.name.starts_with('.')
    }
}

/// Read-only view of a directory tree.
pub trait FileSystem {
    /// List the entries of directory `dir`, sorted by name.
    ///
    /// # Errors
    ///
    /// Returns an error if `dir` is invalid, missing, or unreadable.
    fn read_dir(&self, dir: &str) -> io::Result<Vec<DirEntry>>;

    /// Stat `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if `path` is invalid or does not exist.
    fn stat(&self, path: &str) -> io::Result<FileStat>;
}

/// Check that `path` is a valid relative, slash-separated path.
///
/// `"."` is the only path allowed to contain a dot element. Empty paths,
/// absolute paths, trailing slashes and `.`/`..` elements are rejected.
#[must_use]
pub fn is_valid_path(path: &str) -> bool {
    if path == "." {
        return true;
    }
    !path.is_empty()
        && path
            .split('/')
            .all(|elem| !elem.is_empty() && elem != "." && elem != "..")
}

/// Join a directory and an entry name.
#[must_use]
pub fn join(dir: &str, name: &str) -> String {
    if dir == "." {
        name.to_string()
    } else {
        format!("{dir}/{name}")
    }
}

pub(crate) fn invalid_path(path: &str) -> io::Error {
    io::Error::new(
        io::ErrorKind::InvalidInput,
        format!("invalid path '{path}'"),
    )
}
