// src/keys.rs

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Keyboard modifiers reported alongside a key or mouse press.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct Modifiers: u8 {
        const SHIFT = 1 << 0;
        const CONTROL = 1 << 1;
        const ALT = 1 << 2;
    }
}

/// A decoded key press.
///
/// Only keys a console can report unambiguously are represented;
/// anything else decodes to `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum KeySymbol {
    Char(char),

    Left,
    Right,
    Up,
    Down,
    Home,
    End,

    Enter,
    Backspace,
    Tab,
    Escape,

    #[default]
    Unknown,
}

/// A key together with the modifiers that must be held for a binding.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Eq, PartialEq, Hash, Default)]
pub struct KeyCombination {
    #[serde(default)]
    pub symbol: KeySymbol,
    #[serde(default)]
    pub modifiers: Modifiers,
}

impl KeyCombination {
    pub const fn plain(symbol: KeySymbol) -> Self {
        KeyCombination {
            symbol,
            modifiers: Modifiers::empty(),
        }
    }

    pub const fn ctrl(c: char) -> Self {
        KeyCombination {
            symbol: KeySymbol::Char(c),
            modifiers: Modifiers::CONTROL,
        }
    }

    /// Character bindings ignore SHIFT, since the console already folds it
    /// into the character (`+` arrives as itself, not as shift-`=`).
    pub fn matches(&self, symbol: KeySymbol, modifiers: Modifiers) -> bool {
        if self.symbol != symbol {
            return false;
        }
        let relevant = if matches!(symbol, KeySymbol::Char(_)) {
            modifiers - Modifiers::SHIFT
        } else {
            modifiers
        };
        relevant == self.modifiers
    }
}
