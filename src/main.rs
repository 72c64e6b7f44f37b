use std::fs::File;
use std::path::Path;

use anyhow::Context;
use log::{error, info, warn};
use macroquad::prelude::*;
use simplelog::{Config, WriteLogger};

use snake_arcade::audio::SoundBank;
use snake_arcade::config::{CONFIG_PATH, GameConfig};
use snake_arcade::effects::EffectLayer;
use snake_arcade::game::{Game, GameStats, GameStatus};
use snake_arcade::input::{InputRouter, Key};
use snake_arcade::presentation::{AudioSink, Effects, Renderer, Snapshot, SoundId, dispatch_events};
use snake_arcade::render::{self, CanvasRenderer};
use snake_arcade::save::{HighScoreStore, JsonSaveFile, SaveData};
use snake_arcade::ticker::FixedTicker;

/// Delay between the crash and the stats screen, so the crash effects are visible.
const GAME_OVER_SCREEN_DELAY: f64 = 0.5;

fn window_conf(config: &GameConfig) -> Conf {
    let (w, h) = config.screen_size();
    Conf {
        window_title: "Snake".to_owned(),
        window_width: w as i32,
        window_height: h as i32,
        window_resizable: false,
        ..Default::default()
    }
}

fn init_logging(config: &GameConfig) {
    let result = File::create(&config.log_path)
        .context("creating log file")
        .and_then(|file| {
            WriteLogger::init(config.level_filter(), Config::default(), file)
                .context("installing logger")
        });
    if let Err(e) = result {
        eprintln!("logging disabled: {e:#}");
    }
}

/// Keys polled each frame, in the order they are handled when several land together.
const POLLED_KEYS: [KeyCode; 13] = [
    KeyCode::Escape,
    KeyCode::Enter,
    KeyCode::Up,
    KeyCode::Down,
    KeyCode::Left,
    KeyCode::Right,
    KeyCode::W,
    KeyCode::S,
    KeyCode::A,
    KeyCode::D,
    KeyCode::R,
    KeyCode::M,
    KeyCode::Q,
];

fn pressed_keys() -> impl Iterator<Item = KeyCode> {
    POLLED_KEYS.into_iter().filter(|code| is_key_pressed(*code))
}

fn map_key(code: KeyCode) -> Key {
    match code {
        KeyCode::Left | KeyCode::A => Key::ArrowLeft,
        KeyCode::Right | KeyCode::D => Key::ArrowRight,
        KeyCode::Up | KeyCode::W => Key::ArrowUp,
        KeyCode::Down | KeyCode::S => Key::ArrowDown,
        KeyCode::Escape => Key::Escape,
        _ => Key::Other,
    }
}

struct App {
    game: Game,
    ticker: FixedTicker,
    input: InputRouter,
    effects: EffectLayer,
    audio: SoundBank,
    save: JsonSaveFile,
    renderer: CanvasRenderer,
    finished: Option<(f64, GameStats)>,
    quit: bool,
}

impl App {
    fn back_to_menu(&mut self) {
        self.audio.play(SoundId::Click);
        self.game.reset();
        self.effects.clear();
        self.finished = None;
    }

    fn remember(&mut self, change: impl FnOnce(&mut SaveData)) {
        if let Err(e) = self.save.update(change) {
            warn!("could not write {}: {e}", self.save.path().display());
        }
    }

    fn handle_keys(&mut self, now: f64) {
        for code in pressed_keys() {
            match self.game.status() {
                GameStatus::NotStarted => match code {
                    KeyCode::Enter => {
                        self.audio.play(SoundId::Click);
                        self.effects.clear();
                        self.game.start(now);
                    }
                    KeyCode::Left | KeyCode::Right => {
                        let current = self.game.difficulty();
                        let next = if code == KeyCode::Left { current.easier() } else { current.harder() };
                        if next != current && self.game.set_difficulty(next) {
                            self.audio.play(SoundId::Click);
                            self.remember(|d| d.difficulty = next);
                        }
                    }
                    KeyCode::M => {
                        let enabled = self.audio.toggle_mute();
                        self.remember(|d| d.sound_enabled = enabled);
                    }
                    KeyCode::Q => self.quit = true,
                    _ => {}
                },
                GameStatus::Paused if code == KeyCode::Enter => self.back_to_menu(),
                GameStatus::Running | GameStatus::Paused => {
                    self.input.handle(map_key(code), now, &mut self.game);
                }
                GameStatus::Over => match code {
                    KeyCode::R => {
                        self.audio.play(SoundId::Click);
                        self.effects.clear();
                        self.finished = None;
                        self.game.restart(now);
                    }
                    KeyCode::Enter => self.back_to_menu(),
                    KeyCode::Q => self.quit = true,
                    _ => {}
                },
            }
        }
    }

    fn frame(&mut self, now: f64) {
        self.handle_keys(now);
        self.ticker.update(now, &mut self.game);
        self.effects.update();

        let events = self.game.drain_events();
        if let Some(stats) = dispatch_events(events, &mut self.audio, &mut self.effects, &mut self.save) {
            self.finished = Some((now, stats));
        }

        let shake = self.effects.shake.offset();
        self.renderer.draw(&Snapshot::of(&self.game, now, shake));
        let layout = self.renderer.layout();
        self.effects.particles.draw(vec2(layout.off_x + shake.0, layout.off_y + shake.1));

        match self.game.status() {
            GameStatus::NotStarted => {
                render::draw_menu(self.game.difficulty(), self.audio.is_enabled(), self.game.high_score())
            }
            GameStatus::Paused => render::draw_pause(),
            GameStatus::Over => {
                if let Some((at, stats)) = &self.finished
                    && now - at >= GAME_OVER_SCREEN_DELAY
                {
                    render::draw_game_over(stats);
                }
            }
            GameStatus::Running => {}
        }
    }
}

async fn run_game(config: GameConfig) {
    let defaults = SaveData { difficulty: config.difficulty, ..Default::default() };
    let save = JsonSaveFile::open_with_defaults(&config.save_path, defaults);
    let audio = SoundBank::load(save.data().sound_enabled).await;

    let grid = config.grid();
    let mut game = Game::new(grid, save.load());
    game.set_difficulty(save.data().difficulty);
    info!("high score {} loaded from {}", save.load(), save.path().display());

    let mut app = App {
        game,
        ticker: FixedTicker::new(get_time()),
        input: InputRouter::new(config.debounce_secs()),
        effects: EffectLayer::new(config.cell_size),
        audio,
        save,
        renderer: CanvasRenderer::new(grid),
        finished: None,
        quit: false,
    };

    while !app.quit {
        app.frame(get_time());
        next_frame().await;
    }
    info!("bye");
}

fn run() -> anyhow::Result<()> {
    let (config, config_error) = match GameConfig::load(Path::new(CONFIG_PATH)) {
        Ok(config) => (config, None),
        Err(e) => (GameConfig::default(), Some(e)),
    };
    init_logging(&config);
    if let Some(e) = config_error {
        warn!("{e}; using defaults");
    }

    config
        .validate()
        .inspect_err(|e| error!("cannot set up the canvas: {e}"))
        .context("cannot set up the canvas")?;
    info!(
        "starting on a {}x{} board, {}px cells",
        config.grid_width, config.grid_height, config.cell_size
    );

    macroquad::Window::from_config(window_conf(&config), run_game(config));
    Ok(())
}

fn main() {
    if let Err(e) = run() {
        eprintln!("snake_arcade: {e:#}");
        std::process::exit(1);
    }
}
