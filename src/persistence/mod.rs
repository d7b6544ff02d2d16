//! Local best-score cache
//!
//! Features:
//! - One integer (best score so far), read at startup, written at game over
//! - File backend with tmp -> save rename on native
//! - LocalStorage backend on the web
//! - Missing data loads as 0; corruption is reported, never fatal

mod file;
#[cfg(target_arch = "wasm32")]
mod local_storage;

pub use file::FileCache;
#[cfg(target_arch = "wasm32")]
pub use local_storage::LocalStorageCache;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("stored high score is corrupt: {0:?}")]
    Corrupt(String),
    #[error("storage unavailable: {0}")]
    Unavailable(&'static str),
}

/// Durable store for a single best score
pub trait ScoreCache {
    fn load(&self) -> Result<u64, PersistenceError>;
    fn store(&mut self, score: u64) -> Result<(), PersistenceError>;
}

/// In-process cache (tests, headless runs)
#[derive(Debug, Clone, Default)]
pub struct MemoryCache {
    score: u64,
}

impl MemoryCache {
    pub fn new(score: u64) -> Self {
        Self { score }
    }
}

impl ScoreCache for MemoryCache {
    fn load(&self) -> Result<u64, PersistenceError> {
        Ok(self.score)
    }

    fn store(&mut self, score: u64) -> Result<(), PersistenceError> {
        self.score = score;
        Ok(())
    }
}

/// Parse a stored score, tolerating surrounding whitespace
fn parse_score(raw: &str) -> Result<u64, PersistenceError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(0);
    }
    trimmed
        .parse()
        .map_err(|_| PersistenceError::Corrupt(trimmed.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_cache_round_trip() {
        let mut cache = MemoryCache::new(10);
        assert_eq!(cache.load().unwrap(), 10);
        cache.store(77).unwrap();
        assert_eq!(cache.load().unwrap(), 77);
    }

    #[test]
    fn test_parse_score() {
        assert_eq!(parse_score(" 1500\n").unwrap(), 1500);
        assert_eq!(parse_score("").unwrap(), 0);
        for raw in ["lots", "-5"] {
            assert!(matches!(parse_score(raw), Err(PersistenceError::Corrupt(_))));
        }
    }
}
