//! High score persistence
//!
//! A single best score survives across sessions. Storage is behind the
//! [`ScoreStore`] trait so the simulation stays testable; the shipped
//! implementations are a JSON file on disk and an in-memory store.
//! Storage failures are logged and swallowed - a broken score file
//! must never take the game down.

use std::cell::Cell;
use std::path::PathBuf;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

/// Persisted score record
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default)]
struct ScoreRecord {
    score: u32,
}

/// Best-score storage seam
pub trait ScoreStore {
    /// Load the persisted best score, or 0 when none exists.
    fn load(&self) -> u32;
    /// Persist a new best score.
    fn save(&mut self, score: u32);
}

/// JSON file backed store
pub struct JsonFileScoreStore {
    path: PathBuf,
}

impl JsonFileScoreStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ScoreStore for JsonFileScoreStore {
    fn load(&self) -> u32 {
        match std::fs::read_to_string(&self.path) {
            Ok(json) => match serde_json::from_str::<ScoreRecord>(&json) {
                Ok(record) => {
                    log::info!("Loaded high score {}", record.score);
                    record.score
                }
                Err(err) => {
                    log::warn!("Corrupt high score file, starting fresh: {err}");
                    0
                }
            },
            Err(_) => {
                log::info!("No high score file, starting fresh");
                0
            }
        }
    }

    fn save(&mut self, score: u32) {
        let record = ScoreRecord { score };
        let json = match serde_json::to_string(&record) {
            Ok(json) => json,
            Err(err) => {
                log::warn!("Failed to encode high score: {err}");
                return;
            }
        };
        if let Err(err) = std::fs::write(&self.path, json) {
            log::warn!("Failed to save high score: {err}");
        } else {
            log::info!("High score saved ({score})");
        }
    }
}

/// In-memory store for tests and headless sessions.
///
/// Clones share state, so a caller can keep a handle while the world
/// owns the boxed store and still observe saves.
#[derive(Debug, Clone, Default)]
pub struct MemoryScoreStore {
    score: Rc<Cell<u32>>,
    saves: Rc<Cell<u32>>,
}

impl MemoryScoreStore {
    pub fn with_score(score: u32) -> Self {
        let store = Self::default();
        store.score.set(score);
        store
    }

    /// Number of times `save` has been called on any shared clone.
    pub fn saves(&self) -> u32 {
        self.saves.get()
    }
}

impl ScoreStore for MemoryScoreStore {
    fn load(&self) -> u32 {
        self.score.get()
    }

    fn save(&mut self, score: u32) {
        self.score.set(score);
        self.saves.set(self.saves.get() + 1);
    }
}
