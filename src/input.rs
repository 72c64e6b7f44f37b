use crate::game::{Game, GameStatus};
use crate::grid::Direction;

pub const DEFAULT_DEBOUNCE_SECS: f64 = 0.050;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Key {
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    Escape,
    Other,
}

impl Key {
    pub fn from_name(name: &str) -> Self {
        match name {
            "ArrowLeft" => Key::ArrowLeft,
            "ArrowRight" => Key::ArrowRight,
            "ArrowUp" => Key::ArrowUp,
            "ArrowDown" => Key::ArrowDown,
            "Escape" => Key::Escape,
            _ => Key::Other,
        }
    }

    pub fn direction(self) -> Option<Direction> {
        match self {
            Key::ArrowLeft => Some(Direction::Left),
            Key::ArrowRight => Some(Direction::Right),
            Key::ArrowUp => Some(Direction::Up),
            Key::ArrowDown => Some(Direction::Down),
            Key::Escape | Key::Other => None,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InputAction {
    Steer(Direction),
    Pause,
    Resume,
}

/// Turns key presses into steering and pause requests on a [`Game`].
#[derive(Clone, Debug)]
pub struct InputRouter {
    debounce: f64,
    last_event_at: Option<f64>,
}

impl Default for InputRouter {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE_SECS)
    }
}

impl InputRouter {
    pub fn new(debounce_secs: f64) -> Self {
        Self { debounce: debounce_secs.max(0.0), last_event_at: None }
    }

    pub fn handle(&mut self, key: Key, now: f64, game: &mut Game) -> Option<InputAction> {
        if let Some(last) = self.last_event_at
            && now - last < self.debounce
        {
            return None;
        }
        self.last_event_at = Some(now);

        if key == Key::Escape {
            return match game.status() {
                GameStatus::Running => game.pause(now).then_some(InputAction::Pause),
                GameStatus::Paused => game.resume(now).then_some(InputAction::Resume),
                GameStatus::NotStarted | GameStatus::Over => None,
            };
        }

        let direction = key.direction()?;
        game.steer(direction).then_some(InputAction::Steer(direction))
    }
}
