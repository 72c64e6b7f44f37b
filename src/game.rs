use std::fmt;

use log::info;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::food::Food;
use crate::grid::{Cell, Direction, Grid};
use crate::snake::Snake;

const INITIAL_LENGTH: usize = 3;
const INITIAL_DIRECTION: Direction = Direction::Right;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GameStatus {
    NotStarted,
    Running,
    Paused,
    Over,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Easy,
    Normal,
    Hard,
}

impl Difficulty {
    /// Simulation ticks per second.
    pub fn tick_rate(self) -> u32 {
        match self {
            Difficulty::Easy => 10,
            Difficulty::Normal => 14,
            Difficulty::Hard => 18,
        }
    }

    pub fn tick_interval(self) -> f64 {
        1.0 / self.tick_rate() as f64
    }

    pub fn harder(self) -> Self {
        match self {
            Difficulty::Easy => Difficulty::Normal,
            Difficulty::Normal | Difficulty::Hard => Difficulty::Hard,
        }
    }

    pub fn easier(self) -> Self {
        match self {
            Difficulty::Hard => Difficulty::Normal,
            Difficulty::Normal | Difficulty::Easy => Difficulty::Easy,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Difficulty::Easy => "easy",
            Difficulty::Normal => "normal",
            Difficulty::Hard => "hard",
        };
        f.write_str(name)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum EndReason {
    WallCollision,
    SelfCollision,
    /// The snake covers every cell, nowhere left to put food.
    BoardFilled,
}

#[derive(Clone, Debug, PartialEq)]
pub struct GameStats {
    pub final_score: u32,
    pub high_score: u32,
    pub time_survived_secs: u64,
    pub foods_eaten: u32,
    pub max_length: usize,
    pub is_new_high_score: bool,
    pub reason: EndReason,
}

/// Everything the core tells the outside world, drained by the host once per frame.
#[derive(Clone, Debug, PartialEq)]
pub enum GameEvent {
    Paused,
    Resumed,
    ScoreChanged(u32),
    FoodEaten { at: Cell },
    HighScoreChanged(u32),
    Crashed { at: Cell, reason: EndReason },
    GameOver(GameStats),
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ScoreState {
    pub score: u32,
    pub high_score: u32,
    pub max_length: usize,
    high_score_at_start: u32,
}

/// Running time of a single run; paused stretches are not counted.
#[derive(Clone, Debug, Default)]
struct RunClock {
    started_at: Option<f64>,
    paused_at: Option<f64>,
    stopped_at: Option<f64>,
    paused_total: f64,
}

impl RunClock {
    fn start(now: f64) -> Self {
        Self { started_at: Some(now), ..Default::default() }
    }

    fn pause(&mut self, now: f64) {
        self.paused_at = Some(now);
    }

    fn resume(&mut self, now: f64) {
        if let Some(at) = self.paused_at.take() {
            self.paused_total += (now - at).max(0.0);
        }
    }

    fn stop(&mut self, now: f64) {
        self.stopped_at = Some(now);
    }

    fn elapsed(&self, now: f64) -> f64 {
        let Some(started) = self.started_at else {
            return 0.0;
        };
        let end = self.stopped_at.or(self.paused_at).unwrap_or(now);
        (end - started - self.paused_total).max(0.0)
    }
}

pub struct Game {
    grid: Grid,
    status: GameStatus,
    difficulty: Difficulty,
    snake: Snake,
    direction: Direction,
    pending_direction: Direction,
    food: Food,
    scores: ScoreState,
    clock: RunClock,
    events: Vec<GameEvent>,
    last_stats: Option<GameStats>,
    rng: StdRng,
}

impl Game {
    pub fn new(grid: Grid, high_score: u32) -> Self {
        let seed: u64 = rand::rng().random();
        Self::with_seed(grid, high_score, seed)
    }

    pub fn with_seed(grid: Grid, high_score: u32, seed: u64) -> Self {
        let snake = initial_snake(&grid);
        let mut game = Self {
            grid,
            status: GameStatus::NotStarted,
            difficulty: Difficulty::default(),
            direction: INITIAL_DIRECTION,
            pending_direction: INITIAL_DIRECTION,
            food: Food::default(),
            scores: ScoreState {
                high_score,
                max_length: snake.len(),
                ..Default::default()
            },
            snake,
            clock: RunClock::default(),
            events: Vec::new(),
            last_stats: None,
            rng: StdRng::seed_from_u64(seed),
        };
        game.reset_run();
        game
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_running(&self) -> bool {
        self.status == GameStatus::Running
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn tick_interval(&self) -> f64 {
        self.difficulty.tick_interval()
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn pending_direction(&self) -> Direction {
        self.pending_direction
    }

    pub fn food(&self) -> &Food {
        &self.food
    }

    pub fn scores(&self) -> &ScoreState {
        &self.scores
    }

    pub fn score(&self) -> u32 {
        self.scores.score
    }

    pub fn high_score(&self) -> u32 {
        self.scores.high_score
    }

    pub fn last_stats(&self) -> Option<&GameStats> {
        self.last_stats.as_ref()
    }

    /// Seconds of play in the current run, paused stretches excluded.
    pub fn elapsed(&self, now: f64) -> f64 {
        self.clock.elapsed(now)
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Only takes effect between runs.
    pub fn set_difficulty(&mut self, difficulty: Difficulty) -> bool {
        if !matches!(self.status, GameStatus::NotStarted | GameStatus::Over) {
            return false;
        }
        if self.difficulty != difficulty {
            info!("difficulty set to {} ({} ticks/s)", difficulty, difficulty.tick_rate());
        }
        self.difficulty = difficulty;
        true
    }

    pub fn start(&mut self, now: f64) -> bool {
        if self.status != GameStatus::NotStarted {
            return false;
        }
        self.reset_run();
        self.scores.high_score_at_start = self.scores.high_score;
        self.clock = RunClock::start(now);
        self.status = GameStatus::Running;
        info!("run started on {} difficulty", self.difficulty);
        self.events.push(GameEvent::ScoreChanged(0));
        if self.food.cell().is_none() {
            // the starting body already covers the board
            self.finish(now, EndReason::BoardFilled);
        }
        true
    }

    pub fn pause(&mut self, now: f64) -> bool {
        if self.status != GameStatus::Running {
            return false;
        }
        self.status = GameStatus::Paused;
        self.clock.pause(now);
        info!("paused");
        self.events.push(GameEvent::Paused);
        true
    }

    pub fn resume(&mut self, now: f64) -> bool {
        if self.status != GameStatus::Paused {
            return false;
        }
        self.status = GameStatus::Running;
        self.clock.resume(now);
        info!("resumed");
        self.events.push(GameEvent::Resumed);
        true
    }

    /// Back to the menu state with a fresh board. Safe to call from any state.
    pub fn reset(&mut self) {
        self.status = GameStatus::NotStarted;
        self.reset_run();
        self.clock = RunClock::default();
        self.events.clear();
        self.last_stats = None;
    }

    pub fn restart(&mut self, now: f64) -> bool {
        self.reset();
        self.start(now)
    }

    /// Queues a direction change for the next tick. Reversing into the neck is refused.
    pub fn steer(&mut self, direction: Direction) -> bool {
        if self.status != GameStatus::Running || direction.is_opposite(self.direction) {
            return false;
        }
        self.pending_direction = direction;
        true
    }

    /// One simulation step. Returns false when the game is not running.
    pub fn tick(&mut self, now: f64) -> bool {
        if self.status != GameStatus::Running {
            return false;
        }

        self.direction = self.pending_direction;
        self.snake = self.snake.advance(self.direction);
        self.food.animate();

        let head = self.snake.head();
        if self.grid.is_out_of_bounds(head) {
            self.finish(now, EndReason::WallCollision);
            return true;
        }
        if self.snake.is_self_colliding() {
            self.finish(now, EndReason::SelfCollision);
            return true;
        }

        if self.food.is_at(head) {
            self.snake = self.snake.grow();
            self.scores.score += 1;
            self.scores.max_length = self.scores.max_length.max(self.snake.len());
            self.events.push(GameEvent::FoodEaten { at: head });
            self.events.push(GameEvent::ScoreChanged(self.scores.score));
            if self.scores.score > self.scores.high_score {
                self.scores.high_score = self.scores.score;
                self.events.push(GameEvent::HighScoreChanged(self.scores.score));
            }
            if self.food.regenerate(&self.grid, self.snake.body(), &mut self.rng).is_none() {
                self.finish(now, EndReason::BoardFilled);
            }
        }
        true
    }

    /// Replaces the body and heading, for setting up positions in tests and demos.
    #[doc(hidden)]
    pub fn debug_set_snake(&mut self, snake: Snake, direction: Direction) {
        self.scores.max_length = self.scores.max_length.max(snake.len());
        self.snake = snake;
        self.direction = direction;
        self.pending_direction = direction;
    }

    #[doc(hidden)]
    pub fn debug_set_food(&mut self, cell: Cell) {
        self.food = Food::at(cell);
    }

    fn reset_run(&mut self) {
        self.snake = initial_snake(&self.grid);
        self.direction = INITIAL_DIRECTION;
        self.pending_direction = INITIAL_DIRECTION;
        self.food = Food::default();
        self.food.regenerate(&self.grid, self.snake.body(), &mut self.rng);
        self.scores.score = 0;
        self.scores.max_length = self.snake.len();
    }

    fn finish(&mut self, now: f64, reason: EndReason) {
        if reason != EndReason::BoardFilled {
            self.events.push(GameEvent::Crashed { at: self.snake.head(), reason });
        }
        self.status = GameStatus::Over;
        self.clock.stop(now);
        let stats = GameStats {
            final_score: self.scores.score,
            high_score: self.scores.high_score,
            time_survived_secs: self.clock.elapsed(now) as u64,
            foods_eaten: self.scores.score,
            max_length: self.scores.max_length,
            is_new_high_score: self.scores.score > self.scores.high_score_at_start,
            reason,
        };
        info!(
            "game over ({:?}): score {} in {}s, max length {}{}",
            reason,
            stats.final_score,
            stats.time_survived_secs,
            stats.max_length,
            if stats.is_new_high_score { ", new high score" } else { "" }
        );
        self.last_stats = Some(stats.clone());
        self.events.push(GameEvent::GameOver(stats));
    }
}

/// Head in the middle of the board, body trailing to the left as far as it fits.
fn initial_snake(grid: &Grid) -> Snake {
    let head = grid.center();
    let length = INITIAL_LENGTH.min(head.x.max(0) as usize + 1);
    Snake::straight(head, INITIAL_DIRECTION, length)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn running(grid: Grid) -> Game {
        let mut game = Game::with_seed(grid, 0, 42);
        assert!(game.start(0.0));
        game.drain_events();
        game
    }

    #[test]
    fn transitions_follow_the_state_machine() {
        let mut game = Game::with_seed(Grid::new(10, 10), 0, 1);
        assert_eq!(game.status(), GameStatus::NotStarted);
        assert!(!game.pause(0.0));
        assert!(!game.resume(0.0));
        assert!(game.start(0.0));
        assert!(!game.start(0.0));
        assert!(!game.resume(0.0));
        assert!(game.pause(1.0));
        assert_eq!(game.status(), GameStatus::Paused);
        assert!(!game.pause(1.0));
        assert!(game.resume(2.0));
        assert_eq!(game.status(), GameStatus::Running);
        game.reset();
        assert_eq!(game.status(), GameStatus::NotStarted);
    }

    #[test]
    fn pause_and_resume_are_reported() {
        let mut game = running(Grid::new(10, 10));
        game.pause(1.0);
        game.resume(2.0);
        assert_eq!(game.drain_events(), vec![GameEvent::Paused, GameEvent::Resumed]);
        assert!(game.drain_events().is_empty());
    }

    #[test]
    fn paused_game_does_not_move() {
        let mut game = running(Grid::new(10, 10));
        let before = game.snake().clone();
        game.pause(0.5);
        assert!(!game.tick(1.0));
        assert_eq!(game.snake(), &before);
    }

    #[test]
    fn difficulty_is_locked_during_a_run() {
        let mut game = Game::with_seed(Grid::new(10, 10), 0, 1);
        assert!(game.set_difficulty(Difficulty::Hard));
        game.start(0.0);
        assert!(!game.set_difficulty(Difficulty::Easy));
        assert_eq!(game.difficulty(), Difficulty::Hard);
        assert!((game.tick_interval() - 1.0 / 18.0).abs() < 1e-9);
    }

    #[test]
    fn steering_refuses_reversal() {
        let mut game = running(Grid::new(10, 10));
        assert_eq!(game.direction(), Direction::Right);
        assert!(!game.steer(Direction::Left));
        assert_eq!(game.pending_direction(), Direction::Right);
        assert!(game.steer(Direction::Up));
        assert!(game.steer(Direction::Down));
        assert_eq!(game.pending_direction(), Direction::Down);
    }

    #[test]
    fn steering_ignored_when_not_running() {
        let mut game = Game::with_seed(Grid::new(10, 10), 0, 1);
        assert!(!game.steer(Direction::Up));
        assert_eq!(game.pending_direction(), Direction::Right);
    }

    #[test]
    fn self_collision_ends_the_run() {
        let mut game = running(Grid::new(10, 10));
        let body = vec![
            Cell::new(3, 4),
            Cell::new(3, 5),
            Cell::new(4, 5),
            Cell::new(5, 5),
            Cell::new(5, 4),
            Cell::new(4, 4),
            Cell::new(4, 3),
        ];
        game.debug_set_snake(Snake::new(body).unwrap(), Direction::Up);
        game.debug_set_food(Cell::new(0, 0));
        assert!(game.steer(Direction::Right));
        game.tick(3.0);
        assert_eq!(game.status(), GameStatus::Over);
        let stats = game.last_stats().unwrap();
        assert_eq!(stats.reason, EndReason::SelfCollision);
        assert_eq!(stats.time_survived_secs, 3);
    }

    #[test]
    fn moving_into_the_vacated_tail_cell_is_safe() {
        let mut game = running(Grid::new(10, 10));
        let body = vec![Cell::new(4, 4), Cell::new(5, 4), Cell::new(5, 5), Cell::new(4, 5)];
        game.debug_set_snake(Snake::new(body).unwrap(), Direction::Left);
        game.debug_set_food(Cell::new(0, 0));
        assert!(game.steer(Direction::Down));
        game.tick(0.1);
        assert_eq!(game.status(), GameStatus::Running);
        assert_eq!(game.snake().head(), Cell::new(4, 5));
    }

    #[test]
    fn high_score_tracks_the_best_run() {
        let mut game = Game::with_seed(Grid::new(10, 1), 1, 9);
        game.start(0.0);
        game.drain_events();
        game.debug_set_snake(Snake::new(vec![Cell::new(1, 0)]).unwrap(), Direction::Right);
        game.debug_set_food(Cell::new(2, 0));
        game.tick(0.1);
        assert_eq!(game.score(), 1);
        assert_eq!(game.high_score(), 1);
        game.debug_set_food(game.snake().head().step(Direction::Right));
        game.tick(0.2);
        assert_eq!(game.high_score(), 2);
        let events = game.drain_events();
        assert!(events.contains(&GameEvent::HighScoreChanged(2)));
        assert!(!events.contains(&GameEvent::HighScoreChanged(1)));
    }

    #[test]
    fn paused_time_is_not_survival_time() {
        let mut game = running(Grid::new(5, 1));
        game.debug_set_snake(Snake::new(vec![Cell::new(4, 0)]).unwrap(), Direction::Right);
        game.pause(2.0);
        game.resume(10.0);
        game.tick(12.5);
        let stats = game.last_stats().unwrap();
        assert_eq!(stats.reason, EndReason::WallCollision);
        assert_eq!(stats.time_survived_secs, 4);
    }

    #[test]
    fn filling_the_board_wins() {
        let mut game = running(Grid::new(3, 1));
        game.debug_set_snake(Snake::new(vec![Cell::new(1, 0), Cell::new(0, 0)]).unwrap(), Direction::Right);
        game.debug_set_food(Cell::new(2, 0));
        game.tick(1.0);
        assert_eq!(game.status(), GameStatus::Over);
        assert_eq!(game.food().cell(), None);
        assert_eq!(game.last_stats().unwrap().reason, EndReason::BoardFilled);
        assert_eq!(game.score(), 1);
    }

    #[test]
    fn a_board_the_starting_snake_fills_is_won_at_once() {
        let mut game = Game::with_seed(Grid::new(2, 1), 0, 1);
        assert_eq!(game.snake().body(), &[Cell::new(1, 0), Cell::new(0, 0)]);
        assert_eq!(game.food().cell(), None);
        assert!(game.start(0.0));
        assert_eq!(game.status(), GameStatus::Over);
        assert_eq!(game.last_stats().unwrap().reason, EndReason::BoardFilled);
        assert!(!game.tick(0.2));
        let events = game.drain_events();
        assert!(!events.iter().any(|e| matches!(e, GameEvent::Crashed { .. })));
        assert!(matches!(events.last(), Some(GameEvent::GameOver(stats)) if stats.reason == EndReason::BoardFilled));
    }

    #[test]
    fn final_stats_describe_the_run() {
        let mut game = Game::with_seed(Grid::new(6, 1), 1, 7);
        assert!(game.start(0.0));
        game.debug_set_snake(Snake::new(vec![Cell::new(2, 0), Cell::new(1, 0)]).unwrap(), Direction::Right);
        game.debug_set_food(Cell::new(3, 0));
        game.tick(1.0);
        assert_eq!(game.snake().len(), 3);
        game.debug_set_food(Cell::new(4, 0));
        game.tick(2.0);
        assert_eq!(game.snake().len(), 4);
        game.debug_set_food(Cell::new(0, 0));
        game.tick(3.0);
        assert_eq!(game.status(), GameStatus::Running);
        assert!((game.elapsed(3.5) - 3.5).abs() < 1e-9);
        game.tick(4.5);

        let stats = game.last_stats().unwrap().clone();
        assert_eq!(stats.reason, EndReason::WallCollision);
        assert_eq!(stats.final_score, 2);
        assert_eq!(stats.foods_eaten, 2);
        assert_eq!(stats.max_length, 4);
        assert_eq!(stats.time_survived_secs, 4);
        assert_eq!(stats.high_score, 2);
        assert!(stats.is_new_high_score);

        // second run falls short of the best set by the first
        assert!(game.restart(10.0));
        game.debug_set_food(Cell::new(0, 0));
        for t in [11.0, 12.0, 13.0] {
            game.tick(t);
        }
        let stats = game.last_stats().unwrap();
        assert_eq!(stats.reason, EndReason::WallCollision);
        assert_eq!(stats.final_score, 0);
        assert_eq!(stats.foods_eaten, 0);
        assert_eq!(stats.max_length, 3);
        assert_eq!(stats.time_survived_secs, 3);
        assert_eq!(stats.high_score, 2);
        assert!(!stats.is_new_high_score);
        assert_eq!(game.scores().high_score, 2);
    }

    #[test]
    fn initial_snake_fits_small_boards() {
        let game = Game::with_seed(Grid::new(3, 3), 0, 1);
        assert_eq!(game.snake().body(), &[Cell::new(1, 1), Cell::new(0, 1)]);
        let game = Game::with_seed(Grid::new(27, 17), 0, 1);
        assert_eq!(game.snake().len(), 3);
        assert!(game.snake().body().iter().all(|c| !game.grid().is_out_of_bounds(*c)));
        assert!(!game.snake().contains(game.food().cell().unwrap()));
    }
}
