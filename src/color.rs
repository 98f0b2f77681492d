// src/color.rs

//! Defines color-related enums (`NamedColor`, `Color`), the `Hsla` type used
//! for revealed squares, and conversion functions.

use log::warn;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Standard ANSI named colors (indices 0-15).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum NamedColor {
    Black = 0,
    Red = 1,
    Green = 2,
    Yellow = 3,
    Blue = 4,
    Magenta = 5,
    Cyan = 6,
    White = 7,
    BrightBlack = 8,
    BrightRed = 9,
    BrightGreen = 10,
    BrightYellow = 11,
    BrightBlue = 12,
    BrightMagenta = 13,
    BrightCyan = 14,
    BrightWhite = 15,
}

impl NamedColor {
    /// Converts a u8 index (0-15) to a `NamedColor`, or `None` if out of range.
    pub fn from_index(idx: u8) -> Option<Self> {
        use NamedColor::*;
        const ALL: [NamedColor; 16] = [
            Black,
            Red,
            Green,
            Yellow,
            Blue,
            Magenta,
            Cyan,
            White,
            BrightBlack,
            BrightRed,
            BrightGreen,
            BrightYellow,
            BrightBlue,
            BrightMagenta,
            BrightCyan,
            BrightWhite,
        ];
        ALL.get(idx as usize).copied()
    }

    /// Common sRGB values for the named colors.
    pub fn to_rgb(self) -> (u8, u8, u8) {
        match self {
            NamedColor::Black => (0, 0, 0),
            NamedColor::Red => (205, 0, 0),
            NamedColor::Green => (0, 205, 0),
            NamedColor::Yellow => (205, 205, 0),
            NamedColor::Blue => (0, 0, 238),
            NamedColor::Magenta => (205, 0, 205),
            NamedColor::Cyan => (0, 205, 205),
            NamedColor::White => (229, 229, 229),
            NamedColor::BrightBlack => (127, 127, 127),
            NamedColor::BrightRed => (255, 0, 0),
            NamedColor::BrightGreen => (0, 255, 0),
            NamedColor::BrightYellow => (255, 255, 0),
            NamedColor::BrightBlue => (92, 92, 255),
            NamedColor::BrightMagenta => (255, 0, 255),
            NamedColor::BrightCyan => (0, 255, 255),
            NamedColor::BrightWhite => (255, 255, 255),
        }
    }
}

/// A color as understood by the drivers.
///
/// `Default` is a placeholder the renderer must resolve before handing a
/// color to a driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Color {
    #[default]
    Default,
    Named(NamedColor),
    /// An entry of the 256-color palette.
    Indexed(u8),
    Rgb(u8, u8, u8),
}

const ANSI_NAMED_COLOR_COUNT: u8 = 16;
const COLOR_CUBE_OFFSET: u8 = 16;
const COLOR_CUBE_SIZE: u8 = 6;
const COLOR_CUBE_TOTAL_COLORS: u8 = COLOR_CUBE_SIZE * COLOR_CUBE_SIZE * COLOR_CUBE_SIZE;
const GRAYSCALE_OFFSET: u8 = COLOR_CUBE_OFFSET + COLOR_CUBE_TOTAL_COLORS;

/// Resolves any `Color` to its `(r, g, b)` components.
///
/// `Color::Default` has no concrete value here; it resolves to black with a
/// warning.
pub fn convert_to_rgb(color: Color) -> (u8, u8, u8) {
    match color {
        Color::Indexed(idx) if idx < ANSI_NAMED_COLOR_COUNT => NamedColor::from_index(idx)
            .map(NamedColor::to_rgb)
            .unwrap_or((0, 0, 0)),
        Color::Indexed(idx) if idx < GRAYSCALE_OFFSET => {
            let cube_idx = idx - COLOR_CUBE_OFFSET;
            let level = |c: u8| if c == 0 { 0 } else { c * 40 + 55 };
            (
                level((cube_idx / (COLOR_CUBE_SIZE * COLOR_CUBE_SIZE)) % COLOR_CUBE_SIZE),
                level((cube_idx / COLOR_CUBE_SIZE) % COLOR_CUBE_SIZE),
                level(cube_idx % COLOR_CUBE_SIZE),
            )
        }
        Color::Indexed(idx) => {
            let level = (idx - GRAYSCALE_OFFSET) * 10 + 8;
            (level, level, level)
        }
        Color::Named(named) => named.to_rgb(),
        Color::Rgb(r, g, b) => (r, g, b),
        Color::Default => {
            warn!("convert_to_rgb received Color::Default; resolving to black.");
            (0, 0, 0)
        }
    }
}

/// A hue/saturation/lightness color with an alpha channel.
///
/// Saturation and lightness are percentages (0-100), alpha is 0.0-1.0.
/// The hue is kept as given; it is only wrapped into `[0, 360)` when
/// converted to RGB.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hsla {
    pub hue: f64,
    pub saturation: f64,
    pub lightness: f64,
    pub alpha: f64,
}

impl Hsla {
    /// Converts to opaque RGB, ignoring alpha.
    pub fn to_rgb(&self) -> (u8, u8, u8) {
        let h = self.hue.rem_euclid(360.0) / 60.0;
        let s = (self.saturation / 100.0).clamp(0.0, 1.0);
        let l = (self.lightness / 100.0).clamp(0.0, 1.0);

        let chroma = (1.0 - (2.0 * l - 1.0).abs()) * s;
        let x = chroma * (1.0 - (h % 2.0 - 1.0).abs());
        let m = l - chroma / 2.0;

        let (r, g, b) = match h as u32 {
            0 => (chroma, x, 0.0),
            1 => (x, chroma, 0.0),
            2 => (0.0, chroma, x),
            3 => (0.0, x, chroma),
            4 => (x, 0.0, chroma),
            _ => (chroma, 0.0, x),
        };
        (to_channel(r + m), to_channel(g + m), to_channel(b + m))
    }

    /// Alpha-blends this color over a concrete backdrop.
    pub fn over(&self, backdrop: Color) -> Color {
        let (fr, fg, fb) = self.to_rgb();
        let (br, bg, bb) = convert_to_rgb(backdrop);
        let a = self.alpha.clamp(0.0, 1.0);
        let mix = |f: u8, b: u8| (f as f64 * a + b as f64 * (1.0 - a)).round() as u8;
        Color::Rgb(mix(fr, br), mix(fg, bg), mix(fb, bb))
    }
}

fn to_channel(v: f64) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

impl fmt::Display for Hsla {
    /// CSS notation, e.g. `hsla(240, 80%, 40%, 0.8)`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "hsla({}, {}%, {}%, {})",
            self.hue, self.saturation, self.lightness, self.alpha
        )
    }
}
