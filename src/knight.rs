// src/knight.rs

//! Approximate knight-move counts from the origin square.
//!
//! The value produced here is a heuristic. Coordinates are walked toward
//! the origin one knight-shaped step at a time until both fall inside a
//! 5×5 band, and the remainder is read from a hand-tuned reference table.
//! It agrees with the true minimum on the table band and on many far
//! squares, but it is not a breadth-first search over the knight-move
//! graph and is not guaranteed to be minimal.

use crate::error::BoardError;
use log::trace;

/// Side length of the reference table. Coordinates below this value on
/// both axes are answered directly from the table.
pub const REFERENCE_SPAN: usize = 5;

/// Move counts for the 5×5 corner of the board, indexed `[x][y]`.
/// The table is symmetric.
pub const REFERENCE_GRID: [[u32; REFERENCE_SPAN]; REFERENCE_SPAN] = [
    [0, 3, 2, 3, 2],
    [3, 4, 1, 2, 3],
    [2, 1, 4, 3, 2],
    [3, 2, 3, 2, 3],
    [2, 3, 2, 3, 4],
];

/// Largest accepted coordinate. Every reduction step shrinks `max(x, y)`
/// by at least one, so the step count stays well inside `u32`.
pub const MAX_COORDINATE: i64 = 1_000_000_000;

/// The two leg lengths of a knight move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Movement {
    /// The long leg.
    pub a: i64,
    /// The short leg.
    pub b: i64,
}

impl Default for Movement {
    fn default() -> Self {
        Movement { a: 2, b: 1 }
    }
}

/// A knight that estimates its route length to any square with
/// non-negative coordinates.
#[derive(Debug, Clone, Default)]
pub struct Knight {
    movement: Movement,
}

impl Knight {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn movement(&self) -> Movement {
        self.movement
    }

    /// Estimates the number of moves from `(0, 0)` to `(x, y)`.
    ///
    /// Each step moves the long leg along whichever axis is strictly
    /// larger (the `y` axis on ties) and the short leg along the other,
    /// stepping away from zero instead when a coordinate is smaller than
    /// the leg. Every step strictly shrinks `max(x, y)` until both
    /// coordinates are inside the reference band, so the loop runs about
    /// `max(x, y) / 2` times.
    ///
    /// # Errors
    /// Returns [`BoardError::NegativeCoordinate`] if either coordinate is
    /// negative, and [`BoardError::CoordinateTooLarge`] if either exceeds
    /// [`MAX_COORDINATE`].
    pub fn shortest_route(&self, x: i64, y: i64) -> Result<u32, BoardError> {
        if x < 0 || y < 0 {
            return Err(BoardError::NegativeCoordinate { x, y });
        }
        if x > MAX_COORDINATE || y > MAX_COORDINATE {
            return Err(BoardError::CoordinateTooLarge {
                x,
                y,
                max: MAX_COORDINATE,
            });
        }

        let span = REFERENCE_SPAN as i64;
        let Movement { a, b } = self.movement;
        let (mut cur_x, mut cur_y) = (x, y);
        let mut steps: u32 = 0;

        while cur_x >= span || cur_y >= span {
            let (dx, dy) = if cur_x > cur_y { (a, b) } else { (b, a) };
            cur_x = step_toward_origin(cur_x, dx);
            cur_y = step_toward_origin(cur_y, dy);
            steps += 1;
        }

        let tail = REFERENCE_GRID[cur_x as usize][cur_y as usize];
        trace!(
            "Knight: ({}, {}) reduced to ({}, {}) after {} steps, table adds {}",
            x,
            y,
            cur_x,
            cur_y,
            steps,
            tail
        );
        Ok(steps + tail)
    }
}

fn step_toward_origin(value: i64, leg: i64) -> i64 {
    if value >= leg {
        value - leg
    } else {
        value + leg
    }
}

/// Heuristic move count from the origin using the standard knight.
pub fn distance(x: i64, y: i64) -> Result<u32, BoardError> {
    Knight::new().shortest_route(x, y)
}
