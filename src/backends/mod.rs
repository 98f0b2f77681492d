// src/backends/mod.rs

//! Defines the `Driver` trait for presentation backends and the common types
//! shared by drivers and the renderer: `BackendEvent`, `CellCoords`,
//! `CellRect` and `TextRunStyle`.

use crate::color::Color;
pub use crate::keys::{KeySymbol, Modifiers};
use anyhow::Result;
use bitflags::bitflags;

pub mod console;
pub mod input;
#[cfg(test)]
pub mod mock;

/// Screen size assumed when a backend cannot query its environment.
pub const DEFAULT_WINDOW_WIDTH_CHARS: usize = 80;
pub const DEFAULT_WINDOW_HEIGHT_CHARS: usize = 24;

/// Mouse buttons a backend can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
    ScrollUp,
    ScrollDown,
    Other(u8),
}

/// Events originating from the backend, consumed by the `BoardController`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendEvent {
    Key {
        symbol: KeySymbol,
        modifiers: Modifiers,
        text: String,
    },
    /// A mouse button went down over the screen cell `(col, row)`, 0-based.
    MouseButtonPress {
        button: MouseButton,
        col: usize,
        row: usize,
        modifiers: Modifiers,
    },
    /// The display area changed size, in character cells.
    Resize { cols: usize, rows: usize },
    CloseRequested,
}

bitflags! {
    /// Text styling flags a driver may honour.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct AttrFlags: u8 {
        const BOLD      = 1 << 0;
        const UNDERLINE = 1 << 1;
        const REVERSE   = 1 << 2;
    }
}

/// A cell position on screen, 0-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellCoords {
    pub x: usize,
    pub y: usize,
}

/// A rectangle of screen cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRect {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

/// Style for a run of text. Colors must already be concrete (not
/// `Color::Default`) when handed to a driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextRunStyle {
    pub fg: Color,
    pub bg: Color,
    pub flags: AttrFlags,
}

/// A presentation backend.
pub trait Driver {
    /// Returns every event that arrived since the last call. Must not block.
    fn process_events(&mut self) -> Result<Vec<BackendEvent>>;

    /// Current display size as `(cols, rows)`.
    fn dimensions(&self) -> (usize, usize);

    fn clear_all(&mut self, bg: Color) -> Result<()>;

    fn draw_text_run(&mut self, coords: CellCoords, text: &str, style: TextRunStyle) -> Result<()>;

    fn fill_rect(&mut self, rect: CellRect, color: Color) -> Result<()>;

    /// Flushes everything drawn since the last present.
    fn present(&mut self) -> Result<()>;

    /// Restores whatever state the driver changed on startup.
    fn cleanup(&mut self) -> Result<()>;
}
