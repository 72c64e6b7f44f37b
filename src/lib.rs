pub mod audio;
pub mod config;
pub mod effects;
pub mod error;
pub mod food;
pub mod game;
pub mod grid;
pub mod input;
pub mod presentation;
pub mod render;
pub mod save;
pub mod snake;
pub mod ticker;

pub use food::{Food, pick_free_cell};
pub use game::{Difficulty, EndReason, Game, GameEvent, GameStats, GameStatus};
pub use grid::{Cell, Direction, Grid, is_self_collision};
pub use input::{InputAction, InputRouter, Key};
pub use snake::Snake;
pub use ticker::FixedTicker;
