// src/config.rs

//! Configuration structures for the board.
//!
//! Every struct deserializes with `#[serde(default)]`, so a configuration
//! file only needs to name the settings it changes. Files are JSON.

use anyhow::{bail, Context, Result};
use log::info;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::board::SizeBounds;
use crate::color::{Color, Hsla, NamedColor};
use crate::keys::{KeyCombination, KeySymbol};

/// Root of the configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub board: BoardConfig,
    pub colors: ColorScheme,
    pub keybindings: KeybindingsConfig,
    pub performance: PerformanceConfig,
}

impl Config {
    /// Reads and validates a JSON configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = Self::from_json(&text)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Parses and validates configuration from a JSON string.
    pub fn from_json(text: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads `path` if given, otherwise returns the defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => {
                info!("No config file given, using defaults.");
                Ok(Self::default())
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        let board = &self.board;
        if board.min_tiles == 0 {
            bail!("board.min_tiles must be at least 1");
        }
        if board.min_tiles > board.max_tiles {
            bail!(
                "board.min_tiles ({}) exceeds board.max_tiles ({})",
                board.min_tiles,
                board.max_tiles
            );
        }
        if self.colors.step_ratio <= 0.0 {
            bail!("colors.step_ratio must be positive");
        }
        Ok(())
    }
}

// --- Board Configuration ---

/// What a click on an already evaluated square does.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum RevealMode {
    /// Hide or show the square again, keeping its cached distance.
    #[default]
    Toggle,
    /// Forget the cached distance and restore the unrevealed color.
    Clear,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BoardConfig {
    /// Squares per side on startup.
    pub tiles_per_vertex: usize,
    /// Requested sizes are clamped into `min_tiles..=max_tiles`.
    pub min_tiles: usize,
    pub max_tiles: usize,
    pub reveal_mode: RevealMode,
}

impl Default for BoardConfig {
    fn default() -> Self {
        BoardConfig {
            tiles_per_vertex: 8,
            min_tiles: 5,
            max_tiles: 36,
            reveal_mode: RevealMode::Toggle,
        }
    }
}

impl BoardConfig {
    pub fn bounds(&self) -> SizeBounds {
        SizeBounds {
            min: self.min_tiles,
            max: self.max_tiles,
        }
    }
}

// --- Color Scheme Configuration ---

/// Colors for squares and chrome, plus the parameters that turn a move count
/// into a hue: `hue = moves * hue_degrees / tiles_per_vertex / step_ratio`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ColorScheme {
    pub hue_degrees: f64,
    pub step_ratio: f64,
    /// Percent.
    pub saturation: f64,
    /// Percent.
    pub lightness: f64,
    pub alpha: f64,

    pub even_square: Color,
    pub odd_square: Color,
    /// Backdrop revealed squares are blended over, and the screen clear color.
    pub background: Color,
    pub label: Color,
    pub status_fg: Color,
    pub status_bg: Color,
}

impl Default for ColorScheme {
    fn default() -> Self {
        ColorScheme {
            hue_degrees: 360.0,
            step_ratio: 0.75,
            saturation: 80.0,
            lightness: 40.0,
            alpha: 0.8,

            even_square: Color::Rgb(238, 238, 210),
            odd_square: Color::Rgb(118, 150, 86),
            background: Color::Named(NamedColor::Black),
            label: Color::Named(NamedColor::BrightWhite),
            status_fg: Color::Named(NamedColor::Black),
            status_bg: Color::Named(NamedColor::White),
        }
    }
}

impl ColorScheme {
    /// Color for a square `moves` knight moves from the origin on a board
    /// with `tiles` squares per side.
    pub fn colorize(&self, moves: u32, tiles: usize) -> Hsla {
        let hue = moves as f64 * self.hue_degrees / tiles.max(1) as f64 / self.step_ratio;
        Hsla {
            hue,
            saturation: self.saturation,
            lightness: self.lightness,
            alpha: self.alpha,
        }
    }
}

// --- Keybinding Configuration ---

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct KeybindingsConfig {
    pub reveal_all: Vec<KeyCombination>,
    pub reveal_odd: Vec<KeyCombination>,
    pub reveal_even: Vec<KeyCombination>,
    pub reset: Vec<KeyCombination>,
    pub grow: Vec<KeyCombination>,
    pub shrink: Vec<KeyCombination>,
    pub quit: Vec<KeyCombination>,
}

impl Default for KeybindingsConfig {
    fn default() -> Self {
        let key = |c| KeyCombination::plain(KeySymbol::Char(c));
        KeybindingsConfig {
            reveal_all: vec![key('a')],
            reveal_odd: vec![key('o')],
            reveal_even: vec![key('e')],
            reset: vec![key('r')],
            grow: vec![key('+'), key('='), KeyCombination::plain(KeySymbol::Up)],
            shrink: vec![key('-'), KeyCombination::plain(KeySymbol::Down)],
            quit: vec![
                key('q'),
                KeyCombination::plain(KeySymbol::Escape),
                KeyCombination::ctrl('c'),
            ],
        }
    }
}

// --- Performance Configuration ---

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PerformanceConfig {
    /// Sleep between event polls when nothing happened, in milliseconds.
    pub poll_interval_ms: u64,
}

impl Default for PerformanceConfig {
    fn default() -> Self {
        PerformanceConfig {
            poll_interval_ms: 16,
        }
    }
}
