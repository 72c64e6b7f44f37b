//! The narrow seams between the simulation and whatever draws, plays and stores it.

use log::warn;

use crate::game::{EndReason, Game, GameEvent, GameStats, GameStatus};
use crate::grid::{Cell, Direction};
use crate::save::HighScoreStore;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum SoundId {
    Eat,
    GameOver,
    Click,
    HighScore,
}

impl SoundId {
    pub const ALL: [SoundId; 4] = [SoundId::Eat, SoundId::GameOver, SoundId::Click, SoundId::HighScore];
}

/// Fire-and-forget sound output. Implementations swallow their own failures.
pub trait AudioSink {
    fn play(&mut self, sound: SoundId);
    /// Flips mute and returns whether sound is now enabled.
    fn toggle_mute(&mut self) -> bool;
    fn is_enabled(&self) -> bool;
}

pub trait Effects {
    fn shake(&mut self, intensity: f32, duration_frames: u32);
    fn burst_food(&mut self, at: Cell);
    fn burst_collision(&mut self, at: Cell);
    fn clear(&mut self);
}

/// Read-only view of one frame.
#[derive(Clone, Debug)]
pub struct Snapshot<'a> {
    pub body: &'a [Cell],
    pub food: Option<Cell>,
    pub food_scale: f32,
    pub direction: Direction,
    pub status: GameStatus,
    pub score: u32,
    pub high_score: u32,
    /// Whole seconds played so far, paused time excluded.
    pub elapsed_secs: u64,
    pub shake_offset: (f32, f32),
}

impl<'a> Snapshot<'a> {
    pub fn of(game: &'a Game, now: f64, shake_offset: (f32, f32)) -> Self {
        let scores = game.scores();
        Self {
            body: game.snake().body(),
            food: game.food().cell(),
            food_scale: game.food().pulse().scale(),
            direction: game.direction(),
            status: game.status(),
            score: scores.score,
            high_score: scores.high_score,
            elapsed_secs: game.elapsed(now) as u64,
            shake_offset,
        }
    }
}

pub trait Renderer {
    fn draw(&mut self, snapshot: &Snapshot<'_>);
}

pub fn shake_for(reason: EndReason) -> Option<(f32, u32)> {
    match reason {
        EndReason::WallCollision => Some((10.0, 20)),
        EndReason::SelfCollision => Some((8.0, 15)),
        EndReason::BoardFilled => None,
    }
}

/// Routes drained game events to the cosmetic collaborators and the high score store.
/// Returns the final stats if the run ended.
pub fn dispatch_events(
    events: Vec<GameEvent>,
    audio: &mut dyn AudioSink,
    effects: &mut dyn Effects,
    store: &mut dyn HighScoreStore,
) -> Option<GameStats> {
    let mut finished = None;
    for event in events {
        match event {
            GameEvent::FoodEaten { at } => {
                audio.play(SoundId::Eat);
                effects.burst_food(at);
            }
            GameEvent::Crashed { at, reason } => {
                effects.burst_collision(at);
                if let Some((intensity, frames)) = shake_for(reason) {
                    effects.shake(intensity, frames);
                }
                audio.play(SoundId::GameOver);
            }
            GameEvent::HighScoreChanged(score) => {
                if let Err(e) = store.store(score) {
                    warn!("could not persist high score {score}: {e}");
                }
            }
            GameEvent::GameOver(stats) => {
                if stats.is_new_high_score {
                    audio.play(SoundId::HighScore);
                }
                finished = Some(stats);
            }
            GameEvent::Paused | GameEvent::Resumed | GameEvent::ScoreChanged(_) => {}
        }
    }
    finished
}
