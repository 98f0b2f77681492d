// src/snapshot.rs

//! A serializable view of a board: every square's coordinates and, once
//! evaluated, its label and CSS color.

use serde::Serialize;

use crate::board::{Board, Parity};
use crate::config::ColorScheme;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CellSnapshot {
    pub x: usize,
    pub y: usize,
    pub parity: Parity,
    pub revealed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance: Option<u32>,
    /// Text shown on the square while revealed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// CSS `hsla(...)` background once the distance is known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoardSnapshot {
    pub size: usize,
    pub revealed: usize,
    pub cells: Vec<CellSnapshot>,
}

impl BoardSnapshot {
    pub fn capture(board: &Board, scheme: &ColorScheme) -> Self {
        let cells = board
            .cells()
            .iter()
            .map(|cell| CellSnapshot {
                x: cell.x,
                y: cell.y,
                parity: cell.parity,
                revealed: cell.revealed,
                distance: cell.distance,
                label: cell
                    .distance
                    .filter(|_| cell.revealed)
                    .map(|d| d.to_string()),
                color: cell
                    .distance
                    .map(|d| scheme.colorize(d, board.size()).to_string()),
            })
            .collect();
        BoardSnapshot {
            size: board.size(),
            revealed: board.revealed_count(),
            cells,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
