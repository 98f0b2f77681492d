// src/error.rs

use thiserror::Error;

/// Errors raised by the board model and the distance heuristic.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BoardError {
    #[error("coordinates must be non-negative, got ({x}, {y})")]
    NegativeCoordinate { x: i64, y: i64 },
    #[error("coordinates must not exceed {max}, got ({x}, {y})")]
    CoordinateTooLarge { x: i64, y: i64, max: i64 },
    #[error("square ({x}, {y}) is outside a {size}x{size} board")]
    SquareOutOfBounds { x: usize, y: usize, size: usize },
}
