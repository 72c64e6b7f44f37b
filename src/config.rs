use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use log::LevelFilter;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::game::Difficulty;
use crate::grid::Grid;

pub const CONFIG_PATH: &str = "snake_config.json";

const MIN_GRID_WIDTH: i32 = 2;
const MIN_GRID_HEIGHT: i32 = 1;
const MAX_GRID_SIDE: i32 = 200;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub grid_width: i32,
    pub grid_height: i32,
    /// Pixels per grid cell at scale 1.0.
    pub cell_size: f32,
    pub input_debounce_ms: u64,
    pub difficulty: Difficulty,
    pub log_level: String,
    pub log_path: PathBuf,
    pub save_path: PathBuf,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_width: 27,
            grid_height: 17,
            cell_size: 30.0,
            input_debounce_ms: 50,
            difficulty: Difficulty::Easy,
            log_level: "info".to_string(),
            log_path: PathBuf::from("snake_arcade.log"),
            save_path: PathBuf::from("snake_save.json"),
        }
    }
}

impl GameConfig {
    /// Reads `path`, falling back to defaults when the file does not exist.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigError::Read { path: path.to_path_buf(), source });
            }
        };
        Self::from_json(&text).map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })
    }

    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let width_ok = (MIN_GRID_WIDTH..=MAX_GRID_SIDE).contains(&self.grid_width);
        let height_ok = (MIN_GRID_HEIGHT..=MAX_GRID_SIDE).contains(&self.grid_height);
        if !width_ok || !height_ok {
            return Err(ConfigError::GridSize {
                width: self.grid_width,
                height: self.grid_height,
                min_w: MIN_GRID_WIDTH,
                min_h: MIN_GRID_HEIGHT,
                max: MAX_GRID_SIDE,
            });
        }
        if !(self.cell_size.is_finite() && self.cell_size > 0.0) {
            return Err(ConfigError::CellSize(self.cell_size));
        }
        Ok(())
    }

    pub fn grid(&self) -> Grid {
        Grid::new(self.grid_width, self.grid_height)
    }

    pub fn debounce_secs(&self) -> f64 {
        self.input_debounce_ms as f64 / 1000.0
    }

    pub fn screen_size(&self) -> (f32, f32) {
        (
            self.grid_width as f32 * self.cell_size,
            self.grid_height as f32 * self.cell_size,
        )
    }

    pub fn level_filter(&self) -> LevelFilter {
        self.log_level.parse().unwrap_or(LevelFilter::Info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = GameConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.grid(), Grid::new(27, 17));
        assert_eq!(config.screen_size(), (810.0, 510.0));
        assert!((config.debounce_secs() - 0.05).abs() < 1e-9);
    }

    #[test]
    fn partial_json_keeps_other_defaults() {
        let config = GameConfig::from_json(r#"{ "grid_width": 12, "difficulty": "hard" }"#).unwrap();
        assert_eq!(config.grid_width, 12);
        assert_eq!(config.grid_height, 17);
        assert_eq!(config.difficulty, Difficulty::Hard);
    }

    #[test]
    fn rejects_bad_sizes() {
        let config = GameConfig { grid_width: 1, ..Default::default() };
        assert!(matches!(config.validate(), Err(ConfigError::GridSize { .. })));
        let config = GameConfig { cell_size: 0.0, ..Default::default() };
        assert!(matches!(config.validate(), Err(ConfigError::CellSize(_))));
    }

    #[test]
    fn missing_file_means_defaults() {
        let path = std::env::temp_dir().join("snake_arcade_no_such_config.json");
        assert_eq!(GameConfig::load(&path).unwrap(), GameConfig::default());
    }

    #[test]
    fn log_level_parsing() {
        let config = GameConfig { log_level: "debug".into(), ..Default::default() };
        assert_eq!(config.level_filter(), LevelFilter::Debug);
        let config = GameConfig { log_level: "loud".into(), ..Default::default() };
        assert_eq!(config.level_filter(), LevelFilter::Info);
    }
}
