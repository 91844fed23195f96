//! In-memory filesystem.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::io;

use super::{invalid_path, is_valid_path, DirEntry, FileKind, FileStat, FileSystem};

/// In-memory tree of regular files keyed by path.
///
/// Directories are implied by the files beneath them and report an mtime of
/// zero. Mutators take `&self` so a tree can be edited while a scan borrows
/// it.
#[derive(Debug, Default)]
pub struct MemFs {
    files: RefCell<BTreeMap<String, i64>>,
}

impl MemFs {
    /// Create an empty filesystem.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a file with the given modification time.
    ///
    /// # Panics
    ///
    /// Panics if `path` is not a valid relative path.
    pub fn insert(&self, path: impl Into<String>, modified_ms: i64) {
        let path = path.into();
        assert!(
            is_valid_path(&path) && path != ".",
            "invalid file path '{path}'"
        );
        self.files.borrow_mut().insert(path, modified_ms);
    }

    /// Set the modification time of a file, creating it if needed.
    pub fn touch(&self, path: impl Into<String>, modified_ms: i64) {
        self.insert(path, modified_ms);
    }

    /// Remove a file. Returns whether it existed.
    pub fn remove(&self, path: &str) -> bool {
        self.files.borrow_mut().remove(path).is_some()
    }

    /// Number of files.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.borrow().len()
    }

    /// Whether the tree holds no files.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.borrow().is_empty()
    }

    fn is_dir(files: &BTreeMap<String, i64>, path: &str) -> bool {
        if path == "." {
            return true;
        }
        let prefix = format!("{path}/");
        files
            .range(prefix.clone()..)
            .next()
            .is_some_and(|(key, _)| key.starts_with(&prefix))
    }
}

impl FileSystem for MemFs {
    fn read_dir(&self, dir: &str) -> io::Result<Vec<DirEntry>> {
        if !is_valid_path(dir) {
            return Err(invalid_path(dir));
        }

        let files = self.files.borrow();
        if files.contains_key(dir) {
            return Err(io::Error::other(format!("'{dir}' is not a directory")));
        }
        if !Self::is_dir(&files, dir) {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("'{dir}' not found"),
            ));
        }

        let prefix = if dir == "." {
            String::new()
        } else {
            format!("{dir}/")
        };

        let mut children = BTreeMap::new();
        for key in files
            .range(prefix.clone()..)
            .map(|(key, _)| key)
            .take_while(|key| key.starts_with(&prefix))
        {
            let rest = &key[prefix.len()..];
            match rest.split_once('/') {
                Some((name, _)) => children.insert(name.to_string(), FileKind::Dir),
                None => children.insert(rest.to_string(), FileKind::File),
            };
        }

        Ok(children
            .into_iter()
            .map(|(name, kind)| DirEntry::new(name, kind))
            .collect())
    }

    fn stat(&self, path: &str) -> io::Result<FileStat> {
        if !is_valid_path(path) {
            return Err(invalid_path(path));
        }

        let files = self.files.borrow();
        if let Some(&modified_ms) = files.get(path) {
            return Ok(FileStat::file(modified_ms));
        }
        if Self::is_dir(&files, path) {
            return Ok(FileStat::dir(0));
        }

        Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("'{path}' not found"),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(entries: &[DirEntry]) -> Vec<(&str, FileKind)> {
        entries.iter().map(|e| (e.name.as_str(), e.kind)).collect()
    }

    #[test]
    fn test_read_dir_implies_directories() {
        let fsys = MemFs::new();
        fsys.insert("a/f", 1);
        fsys.insert("a.txt", 2);
        fsys.insert("b/d/d/.f.txt", 3);
        fsys.insert(".d", 4);

        let root = fsys.read_dir(".").unwrap();
        assert_eq!(
            names(&root),
            vec![
                (".d", FileKind::File),
                ("a", FileKind::Dir),
                ("a.txt", FileKind::File),
                ("b", FileKind::Dir),
            ]
        );

        let nested = fsys.read_dir("b/d").unwrap();
        assert_eq!(names(&nested), vec![("d", FileKind::Dir)]);
    }

    #[test]
    fn test_read_dir_errors() {
        let fsys = MemFs::new();
        fsys.insert("a/f", 1);

        assert_eq!(
            fsys.read_dir("missing").unwrap_err().kind(),
            io::ErrorKind::NotFound
        );
        assert!(fsys.read_dir("a/f").is_err());
        assert_eq!(
            fsys.read_dir("a/").unwrap_err().kind(),
            io::ErrorKind::InvalidInput
        );
    }

    #[test]
    fn test_empty_root_is_listable() {
        let fsys = MemFs::new();
        assert!(fsys.is_empty());
        assert!(fsys.read_dir(".").unwrap().is_empty());
        assert_eq!(fsys.stat(".").unwrap(), FileStat::dir(0));
    }

    #[test]
    fn test_stat_and_touch() {
        let fsys = MemFs::new();
        fsys.insert("src/lib.rs", 5);

        assert_eq!(fsys.stat("src/lib.rs").unwrap(), FileStat::file(5));
        assert_eq!(fsys.stat("src").unwrap(), FileStat::dir(0));

        fsys.touch("src/lib.rs", 9);
        assert_eq!(fsys.stat("src/lib.rs").unwrap().modified_ms, 9);
        assert_eq!(fsys.len(), 1);

        assert!(fsys.remove("src/lib.rs"));
        assert!(!fsys.remove("src/lib.rs"));
        assert_eq!(
            fsys.stat("src/lib.rs").unwrap_err().kind(),
            io::ErrorKind::NotFound
        );
        assert_eq!(
            fsys.stat("").unwrap_err().kind(),
            io::ErrorKind::InvalidInput
        );
    }
}
