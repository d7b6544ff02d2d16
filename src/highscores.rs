//! High score leaderboard storage
//!
//! Backs the submit/list pair of the highscore service: records are
//! validated on the way in and listed best-first.

use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Millis;
use crate::sim::RunSummary;

/// Default number of entries returned by `top`
pub const DEFAULT_LIMIT: usize = 10;
/// Longest accepted player name (characters)
pub const MAX_NAME_LEN: usize = 32;

#[derive(Debug, Error)]
pub enum HighscoreError {
    /// Submission failed validation (bad request)
    #[error("invalid highscore: {0}")]
    Invalid(String),
    /// Backing storage failed (server error)
    #[error("highscore storage failed: {0}")]
    Storage(String),
}

impl From<std::io::Error> for HighscoreError {
    fn from(e: std::io::Error) -> Self {
        HighscoreError::Storage(e.to_string())
    }
}

impl From<serde_json::Error> for HighscoreError {
    fn from(e: serde_json::Error) -> Self {
        HighscoreError::Storage(e.to_string())
    }
}

/// A submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewHighscore {
    pub player_name: String,
    pub score: u64,
    /// Wave reached
    pub wave: u32,
    pub enemies_defeated: u32,
}

impl NewHighscore {
    pub fn from_run(player_name: impl Into<String>, run: &RunSummary) -> Self {
        Self {
            player_name: player_name.into(),
            score: run.score,
            wave: run.level,
            enemies_defeated: run.enemies_defeated,
        }
    }

    /// Parse a JSON request body
    pub fn from_json(json: &str) -> Result<Self, HighscoreError> {
        let entry: Self =
            serde_json::from_str(json).map_err(|e| HighscoreError::Invalid(e.to_string()))?;
        entry.validated()
    }

    /// Trim the name and check it is usable
    pub fn validated(mut self) -> Result<Self, HighscoreError> {
        self.player_name = self.player_name.trim().to_string();
        if self.player_name.is_empty() {
            return Err(HighscoreError::Invalid("player name is empty".into()));
        }
        if self.player_name.chars().count() > MAX_NAME_LEN {
            return Err(HighscoreError::Invalid(format!(
                "player name longer than {MAX_NAME_LEN} characters"
            )));
        }
        if self.wave == 0 {
            return Err(HighscoreError::Invalid("wave must be at least 1".into()));
        }
        Ok(self)
    }
}

/// A stored leaderboard entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HighscoreRecord {
    pub id: u64,
    pub player_name: String,
    pub score: u64,
    pub wave: u32,
    pub enemies_defeated: u32,
    /// Unix timestamp (ms) when submitted
    pub created_at: Millis,
}

/// Leaderboard backend
pub trait HighscoreStore {
    /// Validate and store a submission
    fn add(&mut self, entry: NewHighscore, now: Millis) -> Result<HighscoreRecord, HighscoreError>;

    /// All records, best first
    fn all(&self) -> Result<Vec<HighscoreRecord>, HighscoreError>;

    /// Best `limit` records
    fn top(&self, limit: usize) -> Result<Vec<HighscoreRecord>, HighscoreError> {
        let mut records = self.all()?;
        records.truncate(limit);
        Ok(records)
    }
}

/// Records plus the id counter, as persisted
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct Board {
    next_id: u64,
    entries: Vec<HighscoreRecord>,
}

impl Board {
    fn insert(
        &mut self,
        entry: NewHighscore,
        now: Millis,
    ) -> Result<HighscoreRecord, HighscoreError> {
        let entry = entry.validated()?;
        self.next_id += 1;
        let record = HighscoreRecord {
            id: self.next_id,
            player_name: entry.player_name,
            score: entry.score,
            wave: entry.wave,
            enemies_defeated: entry.enemies_defeated,
            created_at: now,
        };

        // Find insertion point (sorted descending by score, ties keep submission order)
        let pos = self
            .entries
            .iter()
            .position(|e| record.score > e.score)
            .unwrap_or(self.entries.len());
        self.entries.insert(pos, record.clone());
        Ok(record)
    }
}

/// In-memory leaderboard
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    board: Board,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.board.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.board.entries.is_empty()
    }
}

impl HighscoreStore for MemoryStore {
    fn add(&mut self, entry: NewHighscore, now: Millis) -> Result<HighscoreRecord, HighscoreError> {
        self.board.insert(entry, now)
    }

    fn all(&self) -> Result<Vec<HighscoreRecord>, HighscoreError> {
        Ok(self.board.entries.clone())
    }
}

/// Leaderboard persisted as a JSON file, rewritten on every submission
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read(&self) -> Result<Board, HighscoreError> {
        match fs::read_to_string(&self.path) {
            Ok(json) => Ok(serde_json::from_str(&json)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Board::default()),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, board: &Board) -> Result<(), HighscoreError> {
        let json = serde_json::to_string_pretty(board)?;
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl HighscoreStore for JsonFileStore {
    fn add(&mut self, entry: NewHighscore, now: Millis) -> Result<HighscoreRecord, HighscoreError> {
        let mut board = self.read()?;
        let record = board.insert(entry, now)?;
        self.write(&board)?;
        log::info!(
            "Highscore #{} saved: {} ({})",
            record.id,
            record.player_name,
            record.score
        );
        Ok(record)
    }

    fn all(&self) -> Result<Vec<HighscoreRecord>, HighscoreError> {
        Ok(self.read()?.entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, score: u64) -> NewHighscore {
        NewHighscore {
            player_name: name.into(),
            score,
            wave: 3,
            enemies_defeated: 25,
        }
    }

    #[test]
    fn test_top_is_sorted_descending() {
        let mut store = MemoryStore::new();
        for (name, score) in [("ana", 300), ("bo", 900), ("cy", 100), ("di", 900)] {
            store.add(entry(name, score), 1_000).unwrap();
        }
        let top = store.top(3).unwrap();
        let names: Vec<&str> = top.iter().map(|r| r.player_name.as_str()).collect();
        assert_eq!(names, vec!["bo", "di", "ana"]);
        assert_eq!(store.top(DEFAULT_LIMIT).unwrap().len(), 4);
    }

    #[test]
    fn test_ids_increase() {
        let mut store = MemoryStore::new();
        let a = store.add(entry("a", 1), 5).unwrap();
        let b = store.add(entry("b", 2), 6).unwrap();
        assert!(b.id > a.id);
        assert_eq!(b.created_at, 6);
    }

    #[test]
    fn test_invalid_submissions() {
        let mut store = MemoryStore::new();
        assert!(matches!(
            store.add(entry("   ", 10), 0),
            Err(HighscoreError::Invalid(_))
        ));
        let long = "x".repeat(MAX_NAME_LEN + 1);
        assert!(matches!(
            store.add(entry(&long, 10), 0),
            Err(HighscoreError::Invalid(_))
        ));
        assert!(store.is_empty());
    }

    #[test]
    fn test_from_json() {
        let ok = NewHighscore::from_json(
            r#"{"playerName":" Zed ","score":1200,"wave":4,"enemiesDefeated":40}"#,
        )
        .unwrap();
        assert_eq!(ok.player_name, "Zed");
        assert_eq!(ok.score, 1200);

        for bad in [
            r#"{"playerName":"Zed","score":-1,"wave":4,"enemiesDefeated":40}"#,
            r#"{"playerName":"Zed","score":10}"#,
            r#"{"playerName":"Zed","score":"lots","wave":4,"enemiesDefeated":40}"#,
            "not json",
        ] {
            assert!(matches!(
                NewHighscore::from_json(bad),
                Err(HighscoreError::Invalid(_))
            ));
        }
    }

    #[test]
    fn test_from_run() {
        let run = RunSummary {
            score: 880,
            level: 6,
            enemies_defeated: 61,
        };
        let entry = NewHighscore::from_run("pilot", &run);
        assert_eq!(entry.wave, 6);
        assert_eq!(entry.enemies_defeated, 61);
    }

    #[test]
    fn test_file_store_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scores.json");
        let mut store = JsonFileStore::new(&path);
        assert!(store.all().unwrap().is_empty());
        store.add(entry("ana", 300), 1).unwrap();
        store.add(entry("bo", 500), 2).unwrap();

        let reopened = JsonFileStore::new(&path);
        let top = reopened.top(1).unwrap();
        assert_eq!(top[0].player_name, "bo");
        assert_eq!(reopened.all().unwrap().len(), 2);
    }

    #[test]
    fn test_file_store_reports_storage_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scores.json");
        fs::write(&path, "{ broken").unwrap();
        let mut store = JsonFileStore::new(&path);
        assert!(matches!(store.all(), Err(HighscoreError::Storage(_))));
        assert!(matches!(
            store.add(entry("ana", 1), 0),
            Err(HighscoreError::Storage(_))
        ));
    }
}
