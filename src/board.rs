// src/board.rs

//! The square grid a knight's move counts are displayed on.
//!
//! A `Board` owns exactly `size * size` cells, stored row by row. Each cell
//! carries its parity, whether it is currently revealed, and the move count
//! once it has been evaluated. Rebuilding replaces the board wholesale.

use log::debug;
use serde::Serialize;

use crate::error::BoardError;

/// Inclusive range a requested board size is clamped into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeBounds {
    pub min: usize,
    pub max: usize,
}

impl SizeBounds {
    pub const DEFAULT: SizeBounds = SizeBounds { min: 5, max: 36 };

    /// Clamps `size` into the bounds. Never panics, even for inverted bounds,
    /// in which case `max` wins.
    pub fn clamp(&self, size: usize) -> usize {
        size.max(self.min).min(self.max)
    }
}

impl Default for SizeBounds {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Colour class of a square: `(x + y) mod 2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Parity {
    Even,
    Odd,
}

impl Parity {
    pub fn of(x: usize, y: usize) -> Self {
        if (x + y) % 2 == 0 {
            Parity::Even
        } else {
            Parity::Odd
        }
    }
}

/// A single square.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    pub x: usize,
    pub y: usize,
    pub parity: Parity,
    pub revealed: bool,
    /// Cached move count, filled in on first evaluation.
    pub distance: Option<u32>,
}

impl Cell {
    fn new(x: usize, y: usize) -> Self {
        Cell {
            x,
            y,
            parity: Parity::of(x, y),
            revealed: false,
            distance: None,
        }
    }

    /// True when the move count should be drawn.
    pub fn shows_distance(&self) -> bool {
        self.revealed && self.distance.is_some()
    }

    /// Drops the cached count and hides the square.
    pub fn clear(&mut self) {
        self.revealed = false;
        self.distance = None;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    size: usize,
    cells: Vec<Cell>,
}

impl Board {
    /// Builds a fresh board. `requested` is clamped into `bounds`.
    pub fn build(requested: usize, bounds: SizeBounds) -> Self {
        let size = bounds.clamp(requested);
        if size != requested {
            debug!(
                "Board: requested size {} clamped to {} (bounds {}..={})",
                requested, size, bounds.min, bounds.max
            );
        }
        let cells = (0..size)
            .flat_map(|y| (0..size).map(move |x| Cell::new(x, y)))
            .collect();
        Board { size, cells }
    }

    /// Squares per side.
    pub fn size(&self) -> usize {
        self.size
    }

    /// All cells in row-major order (`y` outer, `x` inner).
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn cells_mut(&mut self) -> impl Iterator<Item = &mut Cell> {
        self.cells.iter_mut()
    }

    pub fn cell(&self, x: usize, y: usize) -> Result<&Cell, BoardError> {
        let index = self.index_of(x, y)?;
        Ok(&self.cells[index])
    }

    pub fn cell_mut(&mut self, x: usize, y: usize) -> Result<&mut Cell, BoardError> {
        let index = self.index_of(x, y)?;
        Ok(&mut self.cells[index])
    }

    pub fn cells_with_parity(&self, parity: Parity) -> impl Iterator<Item = &Cell> {
        self.cells.iter().filter(move |c| c.parity == parity)
    }

    pub fn revealed_count(&self) -> usize {
        self.cells.iter().filter(|c| c.revealed).count()
    }

    fn index_of(&self, x: usize, y: usize) -> Result<usize, BoardError> {
        if x >= self.size || y >= self.size {
            return Err(BoardError::SquareOutOfBounds {
                x,
                y,
                size: self.size,
            });
        }
        Ok(y * self.size + x)
    }
}
