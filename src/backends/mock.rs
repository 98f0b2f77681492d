// src/backends/mock.rs

use crate::backends::{BackendEvent, CellCoords, CellRect, Driver, TextRunStyle};
use crate::color::Color;
use anyhow::Result;

/// Everything a `MockDriver` was asked to draw, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrawCommand {
    ClearAll { bg: Color },
    TextRun { coords: CellCoords, text: String, style: TextRunStyle },
    FillRect { rect: CellRect, color: Color },
    Present,
}

pub struct MockDriver {
    events: Vec<BackendEvent>,
    commands: Vec<DrawCommand>,
    cols: usize,
    rows: usize,
}

impl MockDriver {
    pub fn new(cols: usize, rows: usize) -> Self {
        Self {
            events: Vec::new(),
            commands: Vec::new(),
            cols,
            rows,
        }
    }

    pub fn push_event(&mut self, event: BackendEvent) {
        self.events.push(event);
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn clear_commands(&mut self) {
        self.commands.clear();
    }

    pub fn set_dimensions(&mut self, cols: usize, rows: usize) {
        self.cols = cols;
        self.rows = rows;
    }

    /// Text drawn at exactly `(x, y)`, if any.
    pub fn text_at(&self, x: usize, y: usize) -> Option<&str> {
        self.commands.iter().rev().find_map(|c| match c {
            DrawCommand::TextRun { coords, text, .. } if coords.x == x && coords.y == y => {
                Some(text.as_str())
            }
            _ => None,
        })
    }
}

impl Driver for MockDriver {
    fn process_events(&mut self) -> Result<Vec<BackendEvent>> {
        Ok(self.events.drain(..).collect())
    }

    fn dimensions(&self) -> (usize, usize) {
        (self.cols, self.rows)
    }

    fn clear_all(&mut self, bg: Color) -> Result<()> {
        self.commands.push(DrawCommand::ClearAll { bg });
        Ok(())
    }

    fn draw_text_run(&mut self, coords: CellCoords, text: &str, style: TextRunStyle) -> Result<()> {
        self.commands.push(DrawCommand::TextRun {
            coords,
            text: text.to_string(),
            style,
        });
        Ok(())
    }

    fn fill_rect(&mut self, rect: CellRect, color: Color) -> Result<()> {
        self.commands.push(DrawCommand::FillRect { rect, color });
        Ok(())
    }

    fn present(&mut self) -> Result<()> {
        self.commands.push(DrawCommand::Present);
        Ok(())
    }

    fn cleanup(&mut self) -> Result<()> {
        Ok(())
    }
}
