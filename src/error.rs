use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("grid must be between {min_w}x{min_h} and {max}x{max} cells, got {width}x{height}")]
    GridSize {
        width: i32,
        height: i32,
        min_w: i32,
        min_h: i32,
        max: i32,
    },
    #[error("cell size must be a positive number of pixels, got {0}")]
    CellSize(f32),
    #[error("could not read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("config {path} is not valid JSON: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("save file I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("save file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}
