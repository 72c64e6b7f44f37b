use std::collections::HashSet;

use log::debug;
use rand::Rng;

use crate::grid::{Cell, Grid};

const PULSE_MIN: f32 = 0.9;
const PULSE_MAX: f32 = 1.2;
const PULSE_STEP: f32 = 0.02;

/// Picks a uniformly random cell of `grid` that is not in `occupied`.
/// `None` means the board is full.
pub fn pick_free_cell<R: Rng + ?Sized>(
    grid: &Grid,
    occupied: &HashSet<Cell>,
    rng: &mut R,
) -> Option<Cell> {
    let free: Vec<Cell> = grid.cells().filter(|c| !occupied.contains(c)).collect();
    if free.is_empty() {
        return None;
    }
    Some(free[rng.random_range(0..free.len())])
}

/// Breathing scale of the food sprite, advanced once per tick.
#[derive(Clone, Debug, PartialEq)]
pub struct FoodPulse {
    scale: f32,
    growing: bool,
}

impl Default for FoodPulse {
    fn default() -> Self {
        Self { scale: 1.0, growing: false }
    }
}

impl FoodPulse {
    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn advance(&mut self) {
        if self.scale > PULSE_MAX {
            self.scale = PULSE_MAX;
            self.growing = false;
        } else if self.scale < PULSE_MIN {
            self.scale = PULSE_MIN;
            self.growing = true;
        }
        if self.growing {
            self.scale += PULSE_STEP;
        } else {
            self.scale -= PULSE_STEP;
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct Food {
    cell: Option<Cell>,
    pulse: FoodPulse,
}

impl Food {
    pub fn at(cell: Cell) -> Self {
        Self { cell: Some(cell), pulse: FoodPulse::default() }
    }

    pub fn cell(&self) -> Option<Cell> {
        self.cell
    }

    pub fn is_at(&self, cell: Cell) -> bool {
        self.cell == Some(cell)
    }

    pub fn pulse(&self) -> &FoodPulse {
        &self.pulse
    }

    pub fn animate(&mut self) {
        self.pulse.advance();
    }

    /// Moves the food to a free cell, or clears it when none is left.
    pub fn regenerate<R: Rng + ?Sized>(&mut self, grid: &Grid, body: &[Cell], rng: &mut R) -> Option<Cell> {
        let occupied: HashSet<Cell> = body.iter().copied().collect();
        self.cell = pick_free_cell(grid, &occupied, rng);
        match self.cell {
            Some(c) => debug!("food spawned at ({}, {})", c.x, c.y),
            None => debug!("no free cell left for food"),
        }
        self.cell
    }
}
