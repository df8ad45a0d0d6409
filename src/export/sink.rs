//! Output destinations.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Somewhere to put generated files, addressed by `/`-separated relative paths.
pub trait OutputSink {
    fn write_file(&mut self, path: &str, contents: &[u8]) -> io::Result<()>;
}

/// Writes below a root directory, creating parent directories as needed.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    root: PathBuf,
}

impl DirectorySink {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl OutputSink for DirectorySink {
    fn write_file(&mut self, path: &str, contents: &[u8]) -> io::Result<()> {
        if path.split('/').any(|part| part == ".." || part.is_empty()) {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("refusing to write outside the output root: {path}"),
            ));
        }
        let target = path.split('/').fold(self.root.clone(), |dir, part| dir.join(part));
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(target, contents)
    }
}

/// Keeps files in memory; later writes to a path replace earlier ones.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    files: BTreeMap<String, Vec<u8>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, path: &str) -> Option<&[u8]> {
        self.files.get(path).map(Vec::as_slice)
    }

    /// A file's contents as UTF-8 text.
    pub fn text(&self, path: &str) -> Option<&str> {
        std::str::from_utf8(self.get(path)?).ok()
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl OutputSink for MemorySink {
    fn write_file(&mut self, path: &str, contents: &[u8]) -> io::Result<()> {
        self.files.insert(path.to_string(), contents.to_vec());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directory_sink_creates_parents() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = DirectorySink::new(dir.path());
        sink.write_file("spells/fireball.md", b"# Fireball\n").unwrap();
        let written = fs::read_to_string(dir.path().join("spells").join("fireball.md")).unwrap();
        assert_eq!(written, "# Fireball\n");
    }

    #[test]
    fn test_directory_sink_rejects_escaping_paths() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = DirectorySink::new(dir.path());
        let err = sink.write_file("../evil.md", b"x").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
        assert!(sink.write_file("/abs.md", b"x").is_err());
    }

    #[test]
    fn test_memory_sink_last_write_wins() {
        let mut sink = MemorySink::new();
        sink.write_file("a.md", b"one").unwrap();
        sink.write_file("a.md", b"two").unwrap();
        assert_eq!(sink.text("a.md"), Some("two"));
        assert_eq!(sink.len(), 1);
    }
}
