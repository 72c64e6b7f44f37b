use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::StorageError;
use crate::game::Difficulty;

/// Where the best score lives between sessions.
pub trait HighScoreStore {
    fn load(&self) -> u32;
    fn store(&mut self, score: u32) -> Result<(), StorageError>;
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SaveData {
    pub best_score: u32,
    pub difficulty: Difficulty,
    pub sound_enabled: bool,
}

impl Default for SaveData {
    fn default() -> Self {
        Self { best_score: 0, difficulty: Difficulty::default(), sound_enabled: true }
    }
}

/// Pretty-printed JSON save next to the binary.
pub struct JsonSaveFile {
    path: PathBuf,
    data: SaveData,
}

impl JsonSaveFile {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self::open_with_defaults(path, SaveData::default())
    }

    /// A missing or unreadable file starts from `defaults`; unreadable ones are logged.
    pub fn open_with_defaults(path: impl Into<PathBuf>, defaults: SaveData) -> Self {
        let path = path.into();
        let data = match read_save(&path) {
            Ok(Some(data)) => data,
            Ok(None) => defaults,
            Err(e) => {
                warn!("ignoring save file {}: {e}", path.display());
                defaults
            }
        };
        Self { path, data }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn data(&self) -> &SaveData {
        &self.data
    }

    pub fn update(&mut self, change: impl FnOnce(&mut SaveData)) -> Result<(), StorageError> {
        change(&mut self.data);
        self.flush()
    }

    fn flush(&self) -> Result<(), StorageError> {
        let text = serde_json::to_string_pretty(&self.data)?;
        fs::write(&self.path, text)?;
        Ok(())
    }
}

impl HighScoreStore for JsonSaveFile {
    fn load(&self) -> u32 {
        self.data.best_score
    }

    fn store(&mut self, score: u32) -> Result<(), StorageError> {
        self.update(|data| data.best_score = score)
    }
}

fn read_save(path: &Path) -> Result<Option<SaveData>, StorageError> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(Some(serde_json::from_str(&text)?)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    pub best_score: u32,
    pub writes: usize,
}

impl HighScoreStore for MemoryStore {
    fn load(&self) -> u32 {
        self.best_score
    }

    fn store(&mut self, score: u32) -> Result<(), StorageError> {
        self.best_score = score;
        self.writes += 1;
        Ok(())
    }
}
