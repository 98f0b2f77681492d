// src/renderer.rs

//! This module defines the `Renderer` and the `BoardLayout` it draws with.
//!
//! The `Renderer` turns a `Board` into abstract drawing commands for a
//! `Driver`. It never emits escape sequences itself. `BoardLayout` decides
//! where each square lands on screen and maps screen cells back to squares
//! for mouse hit testing.

use crate::backends::{AttrFlags, CellCoords, CellRect, Driver, TextRunStyle};
use crate::board::{Board, Cell, Parity};
use crate::color::{Color, NamedColor};
use crate::config::ColorScheme;

use anyhow::Result;
use log::{trace, warn};

/// Used when the scheme leaves a foreground as `Color::Default`.
pub const RENDERER_DEFAULT_FG: Color = Color::Named(NamedColor::White);
/// Used when the scheme leaves a background as `Color::Default`.
pub const RENDERER_DEFAULT_BG: Color = Color::Named(NamedColor::Black);

/// Rows reserved at the bottom of the screen for the status line.
pub const STATUS_LINES: usize = 1;

/// The board takes at most this share (in tenths) of the shorter screen axis.
const BOARD_SHARE_TENTHS: usize = 9;

/// Terminal cells are roughly twice as tall as they are wide, so a square
/// spans twice as many columns as rows.
const COLS_PER_ROW: usize = 2;

/// Placement of the board on a character grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardLayout {
    pub tiles: usize,
    pub origin_col: usize,
    pub origin_row: usize,
    pub square_cols: usize,
    pub square_rows: usize,
    pub screen_cols: usize,
    pub screen_rows: usize,
}

impl BoardLayout {
    /// Sizes and centers a `tiles`×`tiles` board on a `cols`×`rows` screen,
    /// leaving the status line free. Squares are never smaller than
    /// 1 row by 2 columns; a board that does not fit is clipped.
    pub fn fit(tiles: usize, cols: usize, rows: usize) -> Self {
        let tiles = tiles.max(1);
        let usable_rows = rows.saturating_sub(STATUS_LINES);
        let short_axis = usable_rows.min(cols / COLS_PER_ROW);
        let square_rows = (short_axis * BOARD_SHARE_TENTHS / 10 / tiles).max(1);
        let square_cols = square_rows * COLS_PER_ROW;

        let board_cols = square_cols * tiles;
        let board_rows = square_rows * tiles;
        if board_cols > cols || board_rows > usable_rows {
            warn!(
                "Renderer: {}x{} board needs {}x{} cells but only {}x{} are available; clipping.",
                tiles, tiles, board_cols, board_rows, cols, usable_rows
            );
        }

        BoardLayout {
            tiles,
            origin_col: cols.saturating_sub(board_cols) / 2,
            origin_row: usable_rows.saturating_sub(board_rows) / 2,
            square_cols,
            square_rows,
            screen_cols: cols,
            screen_rows: rows,
        }
    }

    /// Screen rectangle covered by square `(x, y)`, before clipping.
    pub fn square_rect(&self, x: usize, y: usize) -> CellRect {
        CellRect {
            x: self.origin_col + x * self.square_cols,
            y: self.origin_row + y * self.square_rows,
            width: self.square_cols,
            height: self.square_rows,
        }
    }

    /// Square under screen cell `(col, row)`, if any. Cells that `clip`
    /// hides (off screen or on the status line) never hit a square.
    pub fn hit_test(&self, col: usize, row: usize) -> Option<(usize, usize)> {
        if col < self.origin_col || row < self.origin_row {
            return None;
        }
        if col >= self.screen_cols || row >= self.status_row() {
            return None;
        }
        let x = (col - self.origin_col) / self.square_cols;
        let y = (row - self.origin_row) / self.square_rows;
        (x < self.tiles && y < self.tiles).then_some((x, y))
    }

    pub fn status_row(&self) -> usize {
        self.screen_rows.saturating_sub(STATUS_LINES)
    }

    /// Clips `rect` to the area above the status line.
    fn clip(&self, rect: CellRect) -> Option<CellRect> {
        let max_rows = self.status_row();
        if rect.x >= self.screen_cols || rect.y >= max_rows {
            return None;
        }
        Some(CellRect {
            x: rect.x,
            y: rect.y,
            width: rect.width.min(self.screen_cols - rect.x),
            height: rect.height.min(max_rows - rect.y),
        })
    }
}

/// Background of a square: its move-count color when revealed, otherwise
/// the plain parity color.
pub fn square_color(cell: &Cell, tiles: usize, scheme: &ColorScheme) -> Color {
    match cell.distance {
        Some(moves) if cell.revealed => scheme
            .colorize(moves, tiles)
            .over(resolve_bg(scheme.background)),
        _ => match cell.parity {
            Parity::Even => resolve_bg(scheme.even_square),
            Parity::Odd => resolve_bg(scheme.odd_square),
        },
    }
}

fn resolve_fg(color: Color) -> Color {
    if color == Color::Default {
        RENDERER_DEFAULT_FG
    } else {
        color
    }
}

fn resolve_bg(color: Color) -> Color {
    if color == Color::Default {
        RENDERER_DEFAULT_BG
    } else {
        color
    }
}

/// Stateless beyond the scope of a single `draw` call.
#[derive(Debug, Default)]
pub struct Renderer {}

impl Renderer {
    pub fn new() -> Self {
        Self {}
    }

    /// Redraws the whole board and the status line, then presents.
    pub fn draw(
        &self,
        board: &Board,
        scheme: &ColorScheme,
        layout: &BoardLayout,
        status: &str,
        driver: &mut dyn Driver,
    ) -> Result<()> {
        if layout.screen_cols == 0 || layout.screen_rows == 0 {
            return Ok(());
        }
        driver.clear_all(resolve_bg(scheme.background))?;

        for cell in board.cells() {
            self.draw_square(cell, board.size(), scheme, layout, driver)?;
        }
        self.draw_status_line(status, scheme, layout, driver)?;

        driver.present()
    }

    fn draw_square(
        &self,
        cell: &Cell,
        tiles: usize,
        scheme: &ColorScheme,
        layout: &BoardLayout,
        driver: &mut dyn Driver,
    ) -> Result<()> {
        let Some(rect) = layout.clip(layout.square_rect(cell.x, cell.y)) else {
            return Ok(());
        };
        let bg = square_color(cell, tiles, scheme);
        driver.fill_rect(rect, bg)?;

        let Some(moves) = cell.distance.filter(|_| cell.revealed) else {
            return Ok(());
        };
        let label = moves.to_string();
        if label.len() > rect.width {
            trace!(
                "Renderer: label '{}' does not fit square ({}, {}) of width {}",
                label,
                cell.x,
                cell.y,
                rect.width
            );
            return Ok(());
        }
        let coords = CellCoords {
            x: rect.x + (rect.width - label.len()) / 2,
            y: rect.y + rect.height / 2,
        };
        let style = TextRunStyle {
            fg: resolve_fg(scheme.label),
            bg,
            flags: AttrFlags::BOLD,
        };
        driver.draw_text_run(coords, &label, style)
    }

    fn draw_status_line(
        &self,
        status: &str,
        scheme: &ColorScheme,
        layout: &BoardLayout,
        driver: &mut dyn Driver,
    ) -> Result<()> {
        let width = layout.screen_cols;
        let mut line: String = status.chars().take(width).collect();
        let padding = width.saturating_sub(line.chars().count());
        line.push_str(&" ".repeat(padding));

        let style = TextRunStyle {
            fg: resolve_fg(scheme.status_fg),
            bg: resolve_bg(scheme.status_bg),
            flags: AttrFlags::empty(),
        };
        driver.draw_text_run(
            CellCoords {
                x: 0,
                y: layout.status_row(),
            },
            &line,
            style,
        )
    }
}
