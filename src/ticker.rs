use crate::game::Game;

/// Fires at most one simulation tick per poll once the difficulty's interval has passed.
/// Missed ticks are dropped rather than replayed.
#[derive(Clone, Debug, Default)]
pub struct FixedTicker {
    last_tick: f64,
}

impl FixedTicker {
    pub fn new(now: f64) -> Self {
        Self { last_tick: now }
    }

    pub fn last_tick(&self) -> f64 {
        self.last_tick
    }

    /// Returns true when a tick ran and the new state should be rendered.
    pub fn update(&mut self, now: f64, game: &mut Game) -> bool {
        if !game.is_running() {
            // idle poll; re-arm so a resumed run waits a full interval
            self.last_tick = now;
            return false;
        }
        if now - self.last_tick <= game.tick_interval() {
            return false;
        }
        self.last_tick = now;
        game.tick(now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Difficulty;
    use crate::grid::Grid;

    fn game() -> Game {
        let mut game = Game::with_seed(Grid::new(40, 5), 0, 3);
        game.set_difficulty(Difficulty::Easy);
        game
    }

    #[test]
    fn idle_until_started() {
        let mut game = game();
        let mut ticker = FixedTicker::new(0.0);
        assert!(!ticker.update(5.0, &mut game));
        assert_eq!(ticker.last_tick(), 5.0);
        game.start(5.0);
        assert!(!ticker.update(5.05, &mut game));
        assert!(ticker.update(5.11, &mut game));
    }

    #[test]
    fn one_tick_per_poll_without_catch_up() {
        let mut game = game();
        let mut ticker = FixedTicker::new(0.0);
        game.start(0.0);
        let head = game.snake().head();
        assert!(ticker.update(1.0, &mut game));
        assert_eq!(game.snake().head().x, head.x + 1);
        assert!(!ticker.update(1.05, &mut game));
        assert_eq!(game.snake().head().x, head.x + 1);
    }

    #[test]
    fn exactly_one_interval_does_not_tick() {
        let mut game = game();
        let mut ticker = FixedTicker::new(0.0);
        game.start(0.0);
        assert!(!ticker.update(0.1, &mut game));
        assert!(ticker.update(0.1001, &mut game));
    }

    #[test]
    fn pause_halts_ticks() {
        let mut game = game();
        let mut ticker = FixedTicker::new(0.0);
        game.start(0.0);
        game.pause(0.0);
        let before = game.snake().clone();
        assert!(!ticker.update(3.0, &mut game));
        assert_eq!(game.snake(), &before);
        game.resume(3.0);
        assert!(!ticker.update(3.05, &mut game));
        assert!(ticker.update(3.2, &mut game));
    }
}
