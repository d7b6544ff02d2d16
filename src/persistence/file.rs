use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::{PersistenceError, ScoreCache, parse_score};

/// Best score kept as plain text in a file
#[derive(Debug, Clone)]
pub struct FileCache {
    path: PathBuf,
}

impl FileCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ScoreCache for FileCache {
    fn load(&self) -> Result<u64, PersistenceError> {
        match fs::read_to_string(&self.path) {
            Ok(raw) => parse_score(&raw),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(0),
            Err(e) => Err(e.into()),
        }
    }

    /// Write to a sibling tmp file, then rename over the old save
    fn store(&mut self, score: u64) -> Result<(), PersistenceError> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, score.to_string())?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_zero() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FileCache::new(dir.path().join("best.txt"));
        assert_eq!(cache.load().unwrap(), 0);
    }

    #[test]
    fn test_store_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut cache = FileCache::new(dir.path().join("nested").join("best.txt"));
        cache.store(3_450).unwrap();
        assert_eq!(cache.load().unwrap(), 3_450);
        assert!(!cache.path().with_extension("tmp").exists());
    }

    #[test]
    fn test_corrupt_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("best.txt");
        fs::write(&path, "not a number").unwrap();
        let cache = FileCache::new(path);
        assert!(matches!(cache.load(), Err(PersistenceError::Corrupt(_))));
    }
}
