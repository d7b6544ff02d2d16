use super::{PersistenceError, ScoreCache, parse_score};

/// Best score kept in the browser's LocalStorage
#[derive(Debug, Clone)]
pub struct LocalStorageCache {
    key: String,
}

impl Default for LocalStorageCache {
    fn default() -> Self {
        Self::new("space_defender_high_score")
    }
}

impl LocalStorageCache {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    fn storage() -> Result<web_sys::Storage, PersistenceError> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or(PersistenceError::Unavailable("LocalStorage"))
    }
}

impl ScoreCache for LocalStorageCache {
    fn load(&self) -> Result<u64, PersistenceError> {
        let storage = Self::storage()?;
        match storage.get_item(&self.key) {
            Ok(Some(raw)) => parse_score(&raw),
            Ok(None) => Ok(0),
            Err(_) => Err(PersistenceError::Unavailable("LocalStorage read")),
        }
    }

    fn store(&mut self, score: u64) -> Result<(), PersistenceError> {
        Self::storage()?
            .set_item(&self.key, &score.to_string())
            .map_err(|_| PersistenceError::Unavailable("LocalStorage write"))
    }
}
