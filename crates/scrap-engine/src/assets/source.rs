use std::collections::HashMap;
use std::io;
use std::path::PathBuf;

/// Where the resource manager reads encoded asset bytes from.
pub trait AssetSource {
    fn read(&self, path: &str) -> io::Result<Vec<u8>>;
}

/// Assets resolved relative to a directory on disk.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl AssetSource for DirectorySource {
    fn read(&self, path: &str) -> io::Result<Vec<u8>> {
        std::fs::read(self.root.join(path))
    }
}

/// In-memory asset table, for tests and embedded builds.
#[derive(Debug, Clone, Default)]
pub struct MemoryAssets {
    files: HashMap<String, Vec<u8>>,
}

impl MemoryAssets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<String>, bytes: Vec<u8>) {
        self.files.insert(path.into(), bytes);
    }

    pub fn with(mut self, path: impl Into<String>, bytes: Vec<u8>) -> Self {
        self.insert(path, bytes);
        self
    }
}

impl AssetSource for MemoryAssets {
    fn read(&self, path: &str) -> io::Result<Vec<u8>> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, format!("no asset '{}'", path)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_assets_lookup() {
        let assets = MemoryAssets::new().with("a.bin", vec![1, 2, 3]);
        assert_eq!(assets.read("a.bin").unwrap(), vec![1, 2, 3]);
        assert_eq!(assets.read("b.bin").unwrap_err().kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn directory_source_missing_file() {
        let source = DirectorySource::new("/definitely/not/here");
        assert!(source.read("logo.png").is_err());
    }
}
