//! Directory enumeration for polling.
//!
//! Walks a tree through the [`FileSystem`] abstraction and collects every
//! regular file, skipping subtrees rooted at hidden directories.

use std::collections::BTreeSet;

use crate::fs::{join, FileKind, FileSystem};

/// Enumeration statistics.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ScanStats {
    /// Regular files added to the result.
    pub files_found: u64,
    /// Hidden directories skipped with their subtrees.
    pub hidden_skipped: u64,
    /// Entries that could not be stat'd or listed.
    pub errors: u64,
}

/// Enumerate the regular files under `root`.
///
/// See [`enumerate_with_stats`].
pub fn enumerate<F: FileSystem + ?Sized>(fsys: &F, root: &str) -> BTreeSet<String> {
    enumerate_with_stats(fsys, root).0
}

/// Enumerate the regular files under `root`, returning walk statistics.
///
/// A directory whose name starts with `.` is skipped together with its
/// subtree. This includes `root` itself; only `"."` is always walked.
/// Hidden files are kept, even as the root. An entry that
/// cannot be stat'd or listed is skipped and counted as an error; the walk
/// carries on with its siblings. If `root` is a regular file the result holds
/// just that path.
pub fn enumerate_with_stats<F: FileSystem + ?Sized>(
    fsys: &F,
    root: &str,
) -> (BTreeSet<String>, ScanStats) {
    let mut files = BTreeSet::new();
    let mut stats = ScanStats::default();

    match fsys.stat(root) {
        Ok(stat) if stat.kind == FileKind::File => {
            files.insert(root.to_string());
            stats.files_found += 1;
        }
        Ok(stat) if stat.kind == FileKind::Dir && is_hidden_root(root) => {
            tracing::trace!(root, "Skipping hidden walk root");
            stats.hidden_skipped += 1;
        }
        Ok(stat) if stat.kind == FileKind::Dir => {
            walk_dirs(fsys, root, &mut files, &mut stats);
        }
        Ok(_) => {}
        Err(e) => {
            tracing::debug!(root, error = %e, "Skipping unreadable walk root");
            stats.errors += 1;
        }
    }

    tracing::debug!(
        root,
        found = stats.files_found,
        hidden_skipped = stats.hidden_skipped,
        errors = stats.errors,
        "Directory walk complete"
    );

    (files, stats)
}

fn is_hidden_root(root: &str) -> bool {
    root != "." && root.rsplit('/').next().is_some_and(|name| name.starts_with('.'))
}

fn walk_dirs<F: FileSystem + ?Sized>(
    fsys: &F,
    root: &str,
    files: &mut BTreeSet<String>,
    stats: &mut ScanStats,
) {
    let mut pending = vec![root.to_string()];

    while let Some(dir) = pending.pop() {
        let entries = match fsys.read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::debug!(dir = %dir, error = %e, "Skipping unreadable directory");
                stats.errors += 1;
                continue;
            }
        };

        for entry in entries {
            let path = join(&dir, &entry.name);
            match entry.kind {
                FileKind::Dir if entry.is_hidden() => {
                    tracing::trace!(path = %path, "Skipping hidden directory");
                    stats.hidden_skipped += 1;
                }
                FileKind::Dir => pending.push(path),
                FileKind::File => {
                    files.insert(path);
                    stats.files_found += 1;
                }
                FileKind::Other => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::{DirEntry, FileStat, MemFs};
    use std::io;

    /// Fails every call whose path contains `needle`.
    struct FailingFs {
        inner: MemFs,
        needle: &'static str,
    }

    impl FailingFs {
        fn check(&self, path: &str) -> io::Result<()> {
            if path.contains(self.needle) {
                Err(io::Error::other(format!("injected failure: {path}")))
            } else {
                Ok(())
            }
        }
    }

    impl FileSystem for FailingFs {
        fn read_dir(&self, dir: &str) -> io::Result<Vec<DirEntry>> {
            self.check(dir)?;
            self.inner.read_dir(dir)
        }

        fn stat(&self, path: &str) -> io::Result<FileStat> {
            self.check(path)?;
            self.inner.stat(path)
        }
    }

    fn tree() -> FailingFs {
        let inner = MemFs::new();
        for path in [
            "a/f",
            "b/d/d/d/.f.txt",
            "c/d/.d/d/f.txt",
            ".d",
            ".e/d/d/f",
            ".f/d/f.txt",
            "y/1/f.txt",
            "y/2/error/f.txt",
            "y/3/f.txt",
            "z/1/f.txt",
            "z/2/f.txt",
            "z/3/f.txt",
        ] {
            inner.insert(path, 0);
        }
        FailingFs {
            inner,
            needle: "error",
        }
    }

    fn listed(fsys: &FailingFs, root: &str) -> Vec<String> {
        enumerate(fsys, root).into_iter().collect()
    }

    #[test]
    fn test_enumerate_skips_hidden_directories() {
        let fsys = tree();
        assert_eq!(listed(&fsys, "a"), vec!["a/f"]);
        assert_eq!(listed(&fsys, "b"), vec!["b/d/d/d/.f.txt"]);
        assert!(listed(&fsys, "c").is_empty());
    }

    #[test]
    fn test_enumerate_root_file() {
        let fsys = tree();
        assert_eq!(listed(&fsys, ".d"), vec![".d"]);
    }

    #[test]
    fn test_enumerate_hidden_root_yields_nothing() {
        let fsys = tree();
        assert!(listed(&fsys, ".e").is_empty());
        assert!(listed(&fsys, ".f").is_empty());

        let (_, stats) = enumerate_with_stats(&fsys, "c/d/.d");
        assert_eq!(stats.hidden_skipped, 1);
        assert_eq!(stats.files_found, 0);
    }

    #[test]
    fn test_enumerate_dot_root_is_walked() {
        let fsys = MemFs::new();
        fsys.insert("a.txt", 1);
        fsys.insert(".hidden/b.txt", 1);
        assert_eq!(enumerate(&fsys, ".").into_iter().collect::<Vec<_>>(), vec!["a.txt"]);
    }

    #[test]
    fn test_enumerate_failure_skips_subtree() {
        let fsys = tree();
        assert_eq!(listed(&fsys, "y"), vec!["y/1/f.txt", "y/3/f.txt"]);
        assert_eq!(
            listed(&fsys, "z"),
            vec!["z/1/f.txt", "z/2/f.txt", "z/3/f.txt"]
        );
    }

    #[test]
    fn test_enumerate_whole_tree() {
        let fsys = tree();
        let (files, stats) = enumerate_with_stats(&fsys, ".");

        let files: Vec<_> = files.into_iter().collect();
        assert_eq!(
            files,
            vec![
                ".d",
                "a/f",
                "b/d/d/d/.f.txt",
                "y/1/f.txt",
                "y/3/f.txt",
                "z/1/f.txt",
                "z/2/f.txt",
                "z/3/f.txt",
            ]
        );
        assert_eq!(stats.files_found, 8);
        // .e, .f and c/d/.d
        assert_eq!(stats.hidden_skipped, 3);
        assert_eq!(stats.errors, 1);
    }

    #[test]
    fn test_enumerate_missing_root() {
        let fsys = tree();
        let (files, stats) = enumerate_with_stats(&fsys, "nope");
        assert!(files.is_empty());
        assert_eq!(stats.errors, 1);
    }

    #[test]
    fn test_enumerate_empty_tree() {
        let fsys = MemFs::new();
        assert!(enumerate(&fsys, ".").is_empty());
    }
}
