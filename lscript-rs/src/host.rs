//! File-system collaborator.
//!
//! The interpreter never touches the disk directly: script loading and the
//! `read`/`write` commands go through a [`FileHost`].  [`FsHost`] is the real
//! file system (UTF-8 text, whole-file reads and overwriting writes);
//! [`MemoryHost`] keeps files in a map for embedding and tests.

use std::collections::HashMap;
use std::io;

/// Whole-file text access used by the interpreter.
pub trait FileHost {
    /// Returns `true` if `path` names an existing file.
    fn exists(&self, path: &str) -> bool;

    /// Read the full contents of `path` as UTF-8 text.
    fn read(&self, path: &str) -> io::Result<String>;

    /// Write `contents` to `path`, replacing any existing file.
    fn write(&mut self, path: &str, contents: &str) -> io::Result<()>;
}

/// The host file system.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsHost;

impl FileHost for FsHost {
    fn exists(&self, path: &str) -> bool {
        std::path::Path::new(path).is_file()
    }

    fn read(&self, path: &str) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn write(&mut self, path: &str, contents: &str) -> io::Result<()> {
        std::fs::write(path, contents)
    }
}

/// An in-memory file table.
#[derive(Debug, Default, Clone)]
pub struct MemoryHost {
    files: HashMap<String, String>,
}

impl MemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, handy for seeding fixtures.
    pub fn with_file(mut self, path: impl Into<String>, contents: impl Into<String>) -> Self {
        self.files.insert(path.into(), contents.into());
        self
    }

    pub fn get(&self, path: &str) -> Option<&str> {
        self.files.get(path).map(String::as_str)
    }
}

impl FileHost for MemoryHost {
    fn exists(&self, path: &str) -> bool {
        self.files.contains_key(path)
    }

    fn read(&self, path: &str) -> io::Result<String> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, format!("{path}: no such file")))
    }

    fn write(&mut self, path: &str, contents: &str) -> io::Result<()> {
        self.files.insert(path.to_owned(), contents.to_owned());
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_round_trip() {
        let mut host = MemoryHost::new();
        assert!(!host.exists("a.txt"));
        host.write("a.txt", "hello").unwrap();
        assert!(host.exists("a.txt"));
        assert_eq!(host.read("a.txt").unwrap(), "hello");
    }

    #[test]
    fn memory_write_overwrites() {
        let mut host = MemoryHost::new().with_file("a.txt", "old");
        host.write("a.txt", "new").unwrap();
        assert_eq!(host.get("a.txt"), Some("new"));
    }

    #[test]
    fn memory_missing_is_not_found() {
        let host = MemoryHost::new();
        let err = host.read("nope").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn fs_host_reads_and_writes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        let path = path.to_str().unwrap();
        let mut host = FsHost;
        assert!(!host.exists(path));
        host.write(path, "first").unwrap();
        host.write(path, "second").unwrap();
        assert!(host.exists(path));
        assert_eq!(host.read(path).unwrap(), "second");
    }

    #[test]
    fn fs_host_directory_is_not_a_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(!FsHost.exists(dir.path().to_str().unwrap()));
    }
}
