use macroquad::prelude::*;

use crate::game::{Difficulty, GameStats, GameStatus};
use crate::grid::{Cell, Direction, Grid};
use crate::presentation::{Renderer, Snapshot};

const BACKGROUND: Color = Color::new(0.04, 0.05, 0.08, 1.0);
const GRID_LINE: Color = Color::new(1.0, 1.0, 1.0, 0.1);
const SNAKE_HEAD: Color = Color::new(0.45, 1.0, 0.35, 1.0);
const SNAKE_BODY: Color = Color::new(0.2, 0.8, 0.2, 1.0);
const SNAKE_EDGE: Color = Color::new(0.05, 0.4, 0.05, 1.0);
const EYE: Color = Color::new(0.35, 0.15, 0.05, 1.0);
const FOOD: Color = Color::new(1.0, 0.0, 0.0, 1.0);
const OVERLAY: Color = Color::new(0.0, 0.0, 0.0, 0.55);
const TITLE: Color = Color::new(0.64, 1.0, 0.64, 1.0);

/// Board layout for the current window: cell size and offset that fit the grid.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Layout {
    pub tile: f32,
    pub off_x: f32,
    pub off_y: f32,
}

impl Layout {
    pub fn fit(grid: &Grid, screen_w: f32, screen_h: f32) -> Self {
        let tile = (screen_w / grid.width as f32).min(screen_h / grid.height as f32);
        Self {
            tile,
            off_x: (screen_w - tile * grid.width as f32) * 0.5,
            off_y: (screen_h - tile * grid.height as f32) * 0.5,
        }
    }

    pub fn cell_origin(&self, cell: Cell) -> Vec2 {
        vec2(self.off_x + cell.x as f32 * self.tile, self.off_y + cell.y as f32 * self.tile)
    }
}

pub struct CanvasRenderer {
    grid: Grid,
    layout: Layout,
}

impl CanvasRenderer {
    pub fn new(grid: Grid) -> Self {
        let layout = Layout::fit(&grid, screen_width(), screen_height());
        Self { grid, layout }
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    fn draw_grid(&self, shift: Vec2) {
        let l = self.layout;
        let w = l.tile * self.grid.width as f32;
        let h = l.tile * self.grid.height as f32;
        for row in 0..=self.grid.height {
            let y = l.off_y + row as f32 * l.tile + shift.y;
            draw_line(l.off_x + shift.x, y, l.off_x + w + shift.x, y, 2.0, GRID_LINE);
        }
        for col in 0..=self.grid.width {
            let x = l.off_x + col as f32 * l.tile + shift.x;
            draw_line(x, l.off_y + shift.y, x, l.off_y + h + shift.y, 2.0, GRID_LINE);
        }
    }

    fn draw_food(&self, cell: Cell, scale: f32, shift: Vec2) {
        let half = self.layout.tile * 0.5;
        let p = self.layout.cell_origin(cell) + shift + vec2(half, half);
        draw_circle(p.x, p.y, self.layout.tile * 0.2 * scale, FOOD);
    }

    fn draw_snake(&self, body: &[Cell], direction: Direction, shift: Vec2) {
        let tile = self.layout.tile;
        for (i, cell) in on_board(&self.grid, body).rev() {
            let p = self.layout.cell_origin(*cell) + shift;
            let color = if i == 0 { SNAKE_HEAD } else { SNAKE_BODY };
            draw_rectangle(p.x + 1.0, p.y + 1.0, tile - 2.0, tile - 2.0, color);
            draw_rectangle_lines(p.x + 1.0, p.y + 1.0, tile - 2.0, tile - 2.0, 2.0, SNAKE_EDGE);
        }
        if let Some(head) = body.first().filter(|c| !self.grid.is_out_of_bounds(**c)) {
            let p = self.layout.cell_origin(*head) + shift;
            let (a, b) = eye_offsets(direction);
            let eye = tile * 0.2;
            draw_rectangle(p.x + a.0 * tile, p.y + a.1 * tile, eye, eye, EYE);
            draw_rectangle(p.x + b.0 * tile, p.y + b.1 * tile, eye, eye, EYE);
        }
    }

    fn draw_hud(&self, score: u32, high_score: u32, elapsed_secs: u64) {
        draw_text(&format!("SCORE {score}"), 10.0, 24.0, 26.0, WHITE);
        draw_centered(&clock_label(elapsed_secs), 24.0, 26, GRAY);
        let best = format!("BEST {high_score}");
        let m = measure_text(&best, None, 26, 1.0);
        draw_text(&best, screen_width() - m.width - 10.0, 24.0, 26.0, GOLD);
    }
}

impl Renderer for CanvasRenderer {
    fn draw(&mut self, snapshot: &Snapshot<'_>) {
        self.layout = Layout::fit(&self.grid, screen_width(), screen_height());
        let shift = vec2(snapshot.shake_offset.0, snapshot.shake_offset.1);
        clear_background(BACKGROUND);
        self.draw_grid(shift);
        if let Some(food) = snapshot.food {
            self.draw_food(food, snapshot.food_scale, shift);
        }
        self.draw_snake(snapshot.body, snapshot.direction, shift);
        if snapshot.status != GameStatus::NotStarted {
            self.draw_hud(snapshot.score, snapshot.high_score, snapshot.elapsed_secs);
        }
    }
}

/// Segments that lie on the board, with their index in the body.
/// A freshly grown tail can sit outside the walls for one tick.
fn on_board<'a>(grid: &'a Grid, body: &'a [Cell]) -> impl DoubleEndedIterator<Item = (usize, &'a Cell)> {
    body.iter().enumerate().filter(|(_, c)| !grid.is_out_of_bounds(**c))
}

fn clock_label(secs: u64) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}

/// Eye positions inside the head cell, as fractions of the cell size.
fn eye_offsets(direction: Direction) -> ((f32, f32), (f32, f32)) {
    match direction {
        Direction::Left => ((0.2, 0.2), (0.2, 0.6)),
        Direction::Right => ((0.6, 0.2), (0.6, 0.6)),
        Direction::Up => ((0.2, 0.2), (0.6, 0.2)),
        Direction::Down => ((0.2, 0.6), (0.6, 0.6)),
    }
}

fn draw_centered(text: &str, y: f32, size: u16, color: Color) {
    let m = measure_text(text, None, size, 1.0);
    draw_text(text, (screen_width() - m.width) * 0.5, y, size as f32, color);
}

fn dim_screen() {
    draw_rectangle(0.0, 0.0, screen_width(), screen_height(), OVERLAY);
}

pub fn draw_menu(difficulty: Difficulty, sound_enabled: bool, high_score: u32) {
    dim_screen();
    let sh = screen_height();
    let mut y = sh * 0.3;
    draw_centered("SNAKE", y, 56, TITLE);
    y += 60.0;
    draw_centered("Enter: Start", y, 24, WHITE);
    y += 30.0;
    draw_centered(&format!("< Difficulty: {difficulty} >"), y, 24, WHITE);
    y += 30.0;
    let sound = if sound_enabled { "M: Sound ON" } else { "M: Sound OFF" };
    draw_centered(sound, y, 24, GRAY);
    y += 30.0;
    draw_centered("Q: Quit", y, 24, GRAY);
    draw_centered(&format!("Best: {high_score}"), sh - 40.0, 22, GOLD);
}

pub fn draw_pause() {
    dim_screen();
    let y = screen_height() * 0.45;
    draw_centered("PAUSED", y, 48, TITLE);
    draw_centered("Esc: Resume   Enter: Main Menu", y + 44.0, 22, WHITE);
}

pub fn draw_game_over(stats: &GameStats) {
    dim_screen();
    let mut y = screen_height() * 0.3;
    let title = match stats.reason {
        crate::game::EndReason::BoardFilled => "BOARD CLEARED",
        _ => "GAME OVER",
    };
    draw_centered(title, y, 52, TITLE);
    y += 36.0;
    if stats.is_new_high_score {
        draw_centered("NEW BEST!", y, 28, GOLD);
    }
    y += 40.0;
    let lines = [
        format!("Score: {}", stats.final_score),
        format!("Best: {}", stats.high_score),
        format!("Time: {}s", stats.time_survived_secs),
        format!("Food eaten: {}", stats.foods_eaten),
        format!("Max length: {}", stats.max_length),
    ];
    for line in &lines {
        draw_centered(line, y, 24, WHITE);
        y += 28.0;
    }
    y += 16.0;
    draw_centered("R: Try Again   Enter: Main Menu", y, 22, GRAY);
}
