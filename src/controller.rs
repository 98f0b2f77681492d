// src/controller.rs

//! Drives the board in response to user input.
//!
//! The `BoardController` owns the one `Board`, the `Knight` that evaluates
//! squares, the configuration and the renderer. Drivers hand it
//! `BackendEvent`s; it turns them into `BoardAction`s, applies them, and
//! redraws when anything visible changed.

use anyhow::{Context, Result};
use log::{debug, info, trace};

use crate::backends::{BackendEvent, Driver, KeySymbol, Modifiers, MouseButton};
use crate::board::{Board, Cell, Parity};
use crate::color::Hsla;
use crate::config::{Config, RevealMode};
use crate::knight::Knight;
use crate::renderer::{BoardLayout, Renderer};

/// Whether the event loop should keep going.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ControllerStatus {
    Running,
    Shutdown,
}

/// Which squares a bulk reveal applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SquareFilter {
    All,
    Only(Parity),
}

impl SquareFilter {
    fn accepts(&self, cell: &Cell) -> bool {
        match self {
            SquareFilter::All => true,
            SquareFilter::Only(parity) => cell.parity == *parity,
        }
    }
}

/// Everything a user can ask of the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardAction {
    EvaluateSquare { x: usize, y: usize },
    RevealAll,
    RevealOdd,
    RevealEven,
    /// Rebuild at the currently requested size.
    Reset,
    /// Request a new size and rebuild.
    Resize(usize),
    Grow,
    Shrink,
    Quit,
}

pub struct BoardController {
    board: Board,
    knight: Knight,
    config: Config,
    renderer: Renderer,
    layout: BoardLayout,
    requested_size: usize,
    needs_redraw: bool,
}

impl BoardController {
    /// Builds a board of `config.board.tiles_per_vertex` squares laid out
    /// for a `cols`×`rows` screen.
    pub fn new(config: Config, cols: usize, rows: usize) -> Self {
        let requested_size = config.board.bounds().clamp(config.board.tiles_per_vertex);
        let board = Board::build(requested_size, config.board.bounds());
        let layout = BoardLayout::fit(board.size(), cols, rows);
        info!(
            "BoardController: {}x{} board, reveal mode {:?}",
            board.size(),
            board.size(),
            config.board.reveal_mode
        );
        BoardController {
            board,
            knight: Knight::new(),
            config,
            renderer: Renderer::new(),
            layout,
            requested_size,
            needs_redraw: true,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn layout(&self) -> &BoardLayout {
        &self.layout
    }

    pub fn requested_size(&self) -> usize {
        self.requested_size
    }

    /// Display color for a cell's cached move count, if it has one.
    pub fn color_for(&self, cell: &Cell) -> Option<Hsla> {
        cell.distance
            .map(|moves| self.config.colors.colorize(moves, self.board.size()))
    }

    pub fn apply(&mut self, action: BoardAction) -> Result<ControllerStatus> {
        debug!("BoardController: applying {:?}", action);
        match action {
            BoardAction::EvaluateSquare { x, y } => self.evaluate_square(x, y)?,
            BoardAction::RevealAll => self.evaluate_squares(SquareFilter::All)?,
            BoardAction::RevealOdd => self.evaluate_squares(SquareFilter::Only(Parity::Odd))?,
            BoardAction::RevealEven => self.evaluate_squares(SquareFilter::Only(Parity::Even))?,
            BoardAction::Reset => self.rebuild(),
            BoardAction::Resize(size) => self.request_size(size),
            BoardAction::Grow => self.request_size(self.requested_size.saturating_add(1)),
            BoardAction::Shrink => self.request_size(self.requested_size.saturating_sub(1)),
            BoardAction::Quit => return Ok(ControllerStatus::Shutdown),
        }
        Ok(ControllerStatus::Running)
    }

    /// A click on one square. The first click computes and reveals; later
    /// clicks follow the configured `RevealMode`. A hidden square with a
    /// cached distance is always shown again, whatever the mode.
    pub fn evaluate_square(&mut self, x: usize, y: usize) -> Result<()> {
        let mode = self.config.board.reveal_mode;
        let cell = self.board.cell_mut(x, y)?;
        if cell.revealed && cell.distance.is_some() && mode == RevealMode::Clear {
            trace!("BoardController: clearing ({}, {})", x, y);
            cell.clear();
        } else {
            Self::toggle_cell(&self.knight, cell)?;
        }
        self.needs_redraw = true;
        Ok(())
    }

    /// Applies the toggle evaluation to every square the filter accepts.
    /// Cached distances are never discarded here, whatever the reveal mode.
    pub fn evaluate_squares(&mut self, filter: SquareFilter) -> Result<()> {
        let knight = &self.knight;
        let mut touched = 0usize;
        for cell in self.board.cells_mut().filter(|c| filter.accepts(c)) {
            Self::toggle_cell(knight, cell)?;
            touched += 1;
        }
        debug!("BoardController: {:?} evaluated {} squares", filter, touched);
        self.needs_redraw = true;
        Ok(())
    }

    fn toggle_cell(knight: &Knight, cell: &mut Cell) -> Result<()> {
        if cell.distance.is_none() {
            let moves = knight
                .shortest_route(cell.x as i64, cell.y as i64)
                .with_context(|| format!("evaluating square ({}, {})", cell.x, cell.y))?;
            trace!("BoardController: ({}, {}) -> {} moves", cell.x, cell.y, moves);
            cell.distance = Some(moves);
            cell.revealed = true;
        } else {
            cell.revealed = !cell.revealed;
        }
        Ok(())
    }

    fn request_size(&mut self, size: usize) {
        self.requested_size = self.config.board.bounds().clamp(size);
        self.rebuild();
    }

    /// Throws the board away and builds a fresh one at the requested size.
    pub fn rebuild(&mut self) {
        self.board = Board::build(self.requested_size, self.config.board.bounds());
        self.layout = BoardLayout::fit(
            self.board.size(),
            self.layout.screen_cols,
            self.layout.screen_rows,
        );
        info!(
            "BoardController: rebuilt {}x{} board",
            self.board.size(),
            self.board.size()
        );
        self.needs_redraw = true;
    }

    pub fn resize_screen(&mut self, cols: usize, rows: usize) {
        self.layout = BoardLayout::fit(self.board.size(), cols, rows);
        self.needs_redraw = true;
    }

    /// Maps a key press to the action bound to it.
    pub fn action_for_key(&self, symbol: KeySymbol, modifiers: Modifiers) -> Option<BoardAction> {
        let bindings = &self.config.keybindings;
        let table = [
            (&bindings.reveal_all, BoardAction::RevealAll),
            (&bindings.reveal_odd, BoardAction::RevealOdd),
            (&bindings.reveal_even, BoardAction::RevealEven),
            (&bindings.reset, BoardAction::Reset),
            (&bindings.grow, BoardAction::Grow),
            (&bindings.shrink, BoardAction::Shrink),
            (&bindings.quit, BoardAction::Quit),
        ];
        table
            .into_iter()
            .find(|(combos, _)| combos.iter().any(|k| k.matches(symbol, modifiers)))
            .map(|(_, action)| action)
    }

    /// Translates one backend event into zero or one action.
    pub fn action_for_event(&mut self, event: BackendEvent) -> Option<BoardAction> {
        match event {
            BackendEvent::Key {
                symbol, modifiers, ..
            } => {
                let action = self.action_for_key(symbol, modifiers);
                if action.is_none() {
                    trace!("BoardController: unbound key {:?} {:?}", symbol, modifiers);
                }
                action
            }
            BackendEvent::MouseButtonPress {
                button: MouseButton::Left,
                col,
                row,
                ..
            } => self
                .layout
                .hit_test(col, row)
                .map(|(x, y)| BoardAction::EvaluateSquare { x, y }),
            BackendEvent::MouseButtonPress { button, .. } => {
                trace!("BoardController: ignoring {:?} press", button);
                None
            }
            BackendEvent::Resize { cols, rows } => {
                self.resize_screen(cols, rows);
                None
            }
            BackendEvent::CloseRequested => Some(BoardAction::Quit),
        }
    }

    /// One pass of the event loop: drain the driver, apply, redraw.
    pub fn process_event_cycle(&mut self, driver: &mut dyn Driver) -> Result<ControllerStatus> {
        let events = driver
            .process_events()
            .context("BoardController: driver failed to deliver events")?;
        for event in events {
            trace!("BoardController: handling {:?}", event);
            if let Some(action) = self.action_for_event(event) {
                if self.apply(action)? == ControllerStatus::Shutdown {
                    info!("BoardController: shutdown requested.");
                    return Ok(ControllerStatus::Shutdown);
                }
            }
        }
        if self.needs_redraw {
            self.draw(driver)?;
        }
        Ok(ControllerStatus::Running)
    }

    pub fn needs_redraw(&self) -> bool {
        self.needs_redraw
    }

    pub fn draw(&mut self, driver: &mut dyn Driver) -> Result<()> {
        let status = self.status_line();
        self.renderer
            .draw(&self.board, &self.config.colors, &self.layout, &status, driver)?;
        self.needs_redraw = false;
        Ok(())
    }

    fn status_line(&self) -> String {
        let size = self.board.size();
        format!(
            " {}x{} | revealed {}/{} | click a square | a all  o odd  e even  r reset  +/- size  q quit",
            size,
            size,
            self.board.revealed_count(),
            size * size
        )
    }
}

#[cfg(test)]
mod tests;
