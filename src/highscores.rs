//! Score counter and high score persistence
//!
//! The high score is the running maximum across runs. Storage goes through
//! the `HighScoreStore` port and is best-effort: failures are logged and a
//! missing value reads as zero.

use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage unavailable")]
    Unavailable,
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("stored high score is malformed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Persistence port for the single high score value
pub trait HighScoreStore {
    /// `Ok(None)` when nothing has been saved yet
    fn load(&mut self) -> Result<Option<u64>, StoreError>;
    fn save(&mut self, high_score: u64) -> Result<(), StoreError>;
}

/// On-disk / LocalStorage record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
struct HighScoreRecord {
    high_score: u64,
}

fn encode(high_score: u64) -> Result<String, StoreError> {
    Ok(serde_json::to_string(&HighScoreRecord { high_score })?)
}

fn decode(json: &str) -> Result<u64, StoreError> {
    let record: HighScoreRecord = serde_json::from_str(json)?;
    Ok(record.high_score)
}

/// Shared handle, so a caller can keep inspecting a store it handed over
impl<S: HighScoreStore> HighScoreStore for Rc<RefCell<S>> {
    fn load(&mut self) -> Result<Option<u64>, StoreError> {
        self.borrow_mut().load()
    }

    fn save(&mut self, high_score: u64) -> Result<(), StoreError> {
        self.borrow_mut().save(high_score)
    }
}

/// In-memory store for tests and headless runs
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    pub value: Option<u64>,
    /// Number of successful saves
    pub saves: usize,
}

impl MemoryStore {
    pub fn with_value(value: u64) -> Self {
        Self {
            value: Some(value),
            saves: 0,
        }
    }
}

impl HighScoreStore for MemoryStore {
    fn load(&mut self) -> Result<Option<u64>, StoreError> {
        Ok(self.value)
    }

    fn save(&mut self, high_score: u64) -> Result<(), StoreError> {
        self.value = Some(high_score);
        self.saves += 1;
        Ok(())
    }
}

/// JSON file store for native builds
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone)]
pub struct FileStore {
    path: std::path::PathBuf,
}

#[cfg(not(target_arch = "wasm32"))]
impl FileStore {
    pub fn new(path: impl Into<std::path::PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl HighScoreStore for FileStore {
    fn load(&mut self) -> Result<Option<u64>, StoreError> {
        match std::fs::read_to_string(&self.path) {
            Ok(json) => decode(&json).map(Some),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn save(&mut self, high_score: u64) -> Result<(), StoreError> {
        std::fs::write(&self.path, encode(high_score)?)?;
        Ok(())
    }
}

/// Browser LocalStorage store
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStorageStore;

#[cfg(target_arch = "wasm32")]
impl LocalStorageStore {
    const STORAGE_KEY: &'static str = "flap_dash_highscore";

    fn storage() -> Result<web_sys::Storage, StoreError> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or(StoreError::Unavailable)
    }
}

#[cfg(target_arch = "wasm32")]
impl HighScoreStore for LocalStorageStore {
    fn load(&mut self) -> Result<Option<u64>, StoreError> {
        let storage = Self::storage()?;
        match storage.get_item(Self::STORAGE_KEY) {
            Ok(Some(json)) => decode(&json).map(Some),
            Ok(None) => Ok(None),
            Err(_) => Err(StoreError::Unavailable),
        }
    }

    fn save(&mut self, high_score: u64) -> Result<(), StoreError> {
        let storage = Self::storage()?;
        storage
            .set_item(Self::STORAGE_KEY, &encode(high_score)?)
            .map_err(|_| StoreError::Unavailable)
    }
}

/// Current score plus the persisted high score
pub struct ScoreBoard {
    score: u64,
    high_score: u64,
    store: Box<dyn HighScoreStore>,
}

impl ScoreBoard {
    /// Load the high score from `store`; any failure reads as zero
    pub fn new(mut store: Box<dyn HighScoreStore>) -> Self {
        let high_score = match store.load() {
            Ok(Some(value)) => {
                log::info!("Loaded high score {value}");
                value
            }
            Ok(None) => 0,
            Err(err) => {
                log::warn!("Could not load high score: {err}");
                0
            }
        };
        Self {
            score: 0,
            high_score,
            store,
        }
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn high_score(&self) -> u64 {
        self.high_score
    }

    /// Count one passed obstacle. Returns true if this set a new high score.
    pub fn increment(&mut self) -> bool {
        self.score += 1;
        if self.score <= self.high_score {
            return false;
        }
        self.high_score = self.score;
        if let Err(err) = self.store.save(self.high_score) {
            log::warn!("Could not save high score: {err}");
        }
        true
    }

    /// Start a new run; the high score is kept
    pub fn reset(&mut self) {
        self.score = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct BrokenStore;

    impl HighScoreStore for BrokenStore {
        fn load(&mut self) -> Result<Option<u64>, StoreError> {
            Err(StoreError::Unavailable)
        }

        fn save(&mut self, _high_score: u64) -> Result<(), StoreError> {
            Err(StoreError::Unavailable)
        }
    }

    #[test]
    fn test_loads_existing_high_score() {
        let board = ScoreBoard::new(Box::new(MemoryStore::with_value(12)));
        assert_eq!(board.score(), 0);
        assert_eq!(board.high_score(), 12);
    }

    #[test]
    fn test_missing_high_score_reads_as_zero() {
        let board = ScoreBoard::new(Box::new(MemoryStore::default()));
        assert_eq!(board.high_score(), 0);
    }

    #[test]
    fn test_high_score_is_running_max_across_runs() {
        let mut board = ScoreBoard::new(Box::new(MemoryStore::with_value(2)));
        assert!(!board.increment());
        assert!(!board.increment());
        assert!(board.increment());
        assert_eq!(board.high_score(), 3);

        board.reset();
        assert_eq!(board.score(), 0);
        board.increment();
        assert_eq!(board.high_score(), 3);
    }

    #[test]
    fn test_new_high_score_is_saved_and_reloaded() {
        let store = Rc::new(RefCell::new(MemoryStore::with_value(2)));
        let mut board = ScoreBoard::new(Box::new(store.clone()));
        board.increment();
        board.increment();
        assert_eq!(store.borrow().saves, 0);

        board.increment();
        board.increment();
        assert_eq!(store.borrow().value, Some(4));
        assert_eq!(store.borrow().saves, 2);

        let next_run = ScoreBoard::new(Box::new(store.clone()));
        assert_eq!(next_run.high_score(), 4);
        assert_eq!(next_run.score(), 0);
    }

    #[test]
    fn test_store_failures_are_not_fatal() {
        let mut board = ScoreBoard::new(Box::new(BrokenStore));
        assert_eq!(board.high_score(), 0);
        assert!(board.increment());
        assert_eq!(board.high_score(), 1);
    }

    #[test]
    fn test_record_json_shape() {
        assert_eq!(encode(7).unwrap(), r#"{"high_score":7}"#);
        assert_eq!(decode(r#"{"high_score":41}"#).unwrap(), 41);
        assert!(matches!(decode("41x"), Err(StoreError::Json(_))));
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_file_store_round_trip() {
        let path = std::env::temp_dir().join(format!("flap_dash_hs_{}.json", std::process::id()));
        let _ = std::fs::remove_file(&path);

        let mut store = FileStore::new(&path);
        assert_eq!(store.load().unwrap(), None);
        store.save(9).unwrap();
        assert_eq!(store.load().unwrap(), Some(9));

        let _ = std::fs::remove_file(&path);
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_high_score_survives_in_file_store() {
        let path = std::env::temp_dir().join(format!("flap_dash_board_{}.json", std::process::id()));
        let _ = std::fs::remove_file(&path);

        let mut board = ScoreBoard::new(Box::new(FileStore::new(&path)));
        assert_eq!(board.high_score(), 0);
        for _ in 0..3 {
            board.increment();
        }
        let reloaded = ScoreBoard::new(Box::new(FileStore::new(&path)));
        assert_eq!(reloaded.high_score(), 3);

        let _ = std::fs::remove_file(&path);
    }
}
