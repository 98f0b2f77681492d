// src/backends/input.rs

//! Decodes raw console input bytes into `BackendEvent`s.
//!
//! Handles printable UTF-8 text, the C0 controls a keyboard produces,
//! cursor keys in both normal and application mode, and SGR (1006) mouse
//! reports. Sequences that are recognised but not useful (mouse releases,
//! motion, unknown CSI finals) are consumed and dropped.

use log::trace;

use super::{BackendEvent, KeySymbol, Modifiers, MouseButton};

const ESC_BYTE: u8 = 0x1B;
const DEL_BYTE: u8 = 0x7F;
const BACKSPACE_BYTE: u8 = 0x08;
const TAB_BYTE: u8 = 0x09;
const LF_BYTE: u8 = 0x0A;
const CR_BYTE: u8 = 0x0D;
const CTRL_RANGE: core::ops::RangeInclusive<u8> = 0x01..=0x1A;
const CSI_FINAL_RANGE: core::ops::RangeInclusive<u8> = 0x40..=0x7E;

// SGR mouse button field layout.
const MOUSE_BUTTON_MASK: u16 = 0b11;
const MOUSE_SHIFT_BIT: u16 = 4;
const MOUSE_ALT_BIT: u16 = 8;
const MOUSE_CTRL_BIT: u16 = 16;
const MOUSE_MOTION_BIT: u16 = 32;
const MOUSE_WHEEL_BIT: u16 = 64;

/// Decodes a buffer of input bytes. The buffer is expected to hold whole
/// sequences; a trailing partial escape sequence decodes as `Escape`.
pub fn parse_input(bytes: &[u8]) -> Vec<BackendEvent> {
    let mut events = Vec::new();
    let mut pos = 0;
    while pos < bytes.len() {
        let (consumed, event) = parse_one(&bytes[pos..]);
        if let Some(event) = event {
            events.push(event);
        }
        pos += consumed.max(1);
    }
    events
}

fn parse_one(bytes: &[u8]) -> (usize, Option<BackendEvent>) {
    let byte = bytes[0];
    match byte {
        ESC_BYTE => parse_escape(bytes),
        CR_BYTE | LF_BYTE => (1, Some(key(KeySymbol::Enter, Modifiers::empty(), "\r"))),
        TAB_BYTE => (1, Some(key(KeySymbol::Tab, Modifiers::empty(), "\t"))),
        DEL_BYTE | BACKSPACE_BYTE => (1, Some(key(KeySymbol::Backspace, Modifiers::empty(), ""))),
        b if CTRL_RANGE.contains(&b) => {
            let c = (b'a' + (b - 1)) as char;
            (1, Some(key(KeySymbol::Char(c), Modifiers::CONTROL, "")))
        }
        _ => parse_text(bytes),
    }
}

fn parse_text(bytes: &[u8]) -> (usize, Option<BackendEvent>) {
    let len = utf8_len(bytes[0]).min(bytes.len());
    match std::str::from_utf8(&bytes[..len]).ok().and_then(|s| s.chars().next()) {
        Some(c) if !c.is_control() => {
            let modifiers = if c.is_uppercase() {
                Modifiers::SHIFT
            } else {
                Modifiers::empty()
            };
            (len, Some(key(KeySymbol::Char(c), modifiers, &c.to_string())))
        }
        _ => {
            trace!("input: undecodable byte 0x{:02x}", bytes[0]);
            (1, Some(key(KeySymbol::Unknown, Modifiers::empty(), "")))
        }
    }
}

fn utf8_len(first: u8) -> usize {
    match first {
        0x00..=0x7F => 1,
        0xC2..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF4 => 4,
        _ => 1,
    }
}

fn parse_escape(bytes: &[u8]) -> (usize, Option<BackendEvent>) {
    match bytes.get(1) {
        Some(b'[') => parse_csi(bytes),
        Some(b'O') => match bytes.get(2).and_then(|&b| cursor_key(b)) {
            Some(symbol) => (3, Some(key(symbol, Modifiers::empty(), ""))),
            None => (2, None),
        },
        _ => (1, Some(key(KeySymbol::Escape, Modifiers::empty(), ""))),
    }
}

/// `bytes` starts with `ESC [`.
fn parse_csi(bytes: &[u8]) -> (usize, Option<BackendEvent>) {
    let body_start = 2;
    let Some(final_offset) = bytes[body_start..]
        .iter()
        .position(|b| CSI_FINAL_RANGE.contains(b))
    else {
        trace!("input: unterminated CSI sequence {:?}", bytes);
        return (bytes.len(), None);
    };
    let final_idx = body_start + final_offset;
    let consumed = final_idx + 1;
    let params = &bytes[body_start..final_idx];
    let final_byte = bytes[final_idx];

    if params.first() == Some(&b'<') {
        return (consumed, parse_sgr_mouse(&params[1..], final_byte));
    }

    match cursor_key(final_byte) {
        Some(symbol) => (consumed, Some(key(symbol, csi_modifiers(params), ""))),
        None => {
            trace!(
                "input: ignoring CSI final '{}' with params {:?}",
                final_byte as char,
                params
            );
            (consumed, None)
        }
    }
}

fn cursor_key(final_byte: u8) -> Option<KeySymbol> {
    match final_byte {
        b'A' => Some(KeySymbol::Up),
        b'B' => Some(KeySymbol::Down),
        b'C' => Some(KeySymbol::Right),
        b'D' => Some(KeySymbol::Left),
        b'H' => Some(KeySymbol::Home),
        b'F' => Some(KeySymbol::End),
        _ => None,
    }
}

/// xterm encodes modifiers on cursor keys as `1;<1 + bits>`.
fn csi_modifiers(params: &[u8]) -> Modifiers {
    let text = String::from_utf8_lossy(params);
    let Some(bits) = text
        .split(';')
        .nth(1)
        .and_then(|m| m.parse::<u8>().ok())
        .map(|m| m.saturating_sub(1))
    else {
        return Modifiers::empty();
    };
    let mut modifiers = Modifiers::empty();
    modifiers.set(Modifiers::SHIFT, bits & 1 != 0);
    modifiers.set(Modifiers::ALT, bits & 2 != 0);
    modifiers.set(Modifiers::CONTROL, bits & 4 != 0);
    modifiers
}

/// Parses `b;col;row` followed by `M` (press) or `m` (release).
fn parse_sgr_mouse(params: &[u8], final_byte: u8) -> Option<BackendEvent> {
    let text = std::str::from_utf8(params).ok()?;
    let mut fields = text.split(';').map(|f| f.parse::<u16>().ok());
    let (Some(Some(code)), Some(Some(col)), Some(Some(row))) =
        (fields.next(), fields.next(), fields.next())
    else {
        trace!("input: malformed SGR mouse report {:?}", text);
        return None;
    };

    if final_byte != b'M' || code & MOUSE_MOTION_BIT != 0 {
        return None;
    }

    let button = if code & MOUSE_WHEEL_BIT != 0 {
        if code & MOUSE_BUTTON_MASK == 0 {
            MouseButton::ScrollUp
        } else {
            MouseButton::ScrollDown
        }
    } else {
        match code & MOUSE_BUTTON_MASK {
            0 => MouseButton::Left,
            1 => MouseButton::Middle,
            2 => MouseButton::Right,
            other => MouseButton::Other(other as u8),
        }
    };

    let mut modifiers = Modifiers::empty();
    modifiers.set(Modifiers::SHIFT, code & MOUSE_SHIFT_BIT != 0);
    modifiers.set(Modifiers::ALT, code & MOUSE_ALT_BIT != 0);
    modifiers.set(Modifiers::CONTROL, code & MOUSE_CTRL_BIT != 0);

    Some(BackendEvent::MouseButtonPress {
        button,
        col: (col as usize).saturating_sub(1),
        row: (row as usize).saturating_sub(1),
        modifiers,
    })
}

fn key(symbol: KeySymbol, modifiers: Modifiers, text: &str) -> BackendEvent {
    BackendEvent::Key {
        symbol,
        modifiers,
        text: text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single(bytes: &[u8]) -> BackendEvent {
        let mut events = parse_input(bytes);
        assert_eq!(events.len(), 1, "expected one event from {:?}: {:?}", bytes, events);
        events.remove(0)
    }

    fn symbol_of(event: &BackendEvent) -> (KeySymbol, Modifiers) {
        match event {
            BackendEvent::Key {
                symbol, modifiers, ..
            } => (*symbol, *modifiers),
            other => panic!("expected key event, got {:?}", other),
        }
    }

    #[test]
    fn printable_ascii_becomes_char_keys() {
        let events = parse_input(b"ao+");
        let symbols: Vec<_> = events.iter().map(|e| symbol_of(e).0).collect();
        assert_eq!(
            symbols,
            vec![
                KeySymbol::Char('a'),
                KeySymbol::Char('o'),
                KeySymbol::Char('+')
            ]
        );
    }

    #[test]
    fn control_bytes_map_to_ctrl_letters() {
        assert_eq!(
            symbol_of(&single(&[0x03])),
            (KeySymbol::Char('c'), Modifiers::CONTROL)
        );
        assert_eq!(symbol_of(&single(b"\r")).0, KeySymbol::Enter);
        assert_eq!(symbol_of(&single(&[DEL_BYTE])).0, KeySymbol::Backspace);
    }

    #[test]
    fn lone_escape_is_escape_key() {
        assert_eq!(symbol_of(&single(&[ESC_BYTE])).0, KeySymbol::Escape);
    }

    #[test]
    fn cursor_keys_in_both_modes() {
        assert_eq!(symbol_of(&single(b"\x1b[A")).0, KeySymbol::Up);
        assert_eq!(symbol_of(&single(b"\x1bOB")).0, KeySymbol::Down);
        assert_eq!(
            symbol_of(&single(b"\x1b[1;5C")),
            (KeySymbol::Right, Modifiers::CONTROL)
        );
    }

    #[test]
    fn multibyte_utf8_decodes_to_one_key() {
        assert_eq!(symbol_of(&single("é".as_bytes())).0, KeySymbol::Char('é'));
    }

    #[test]
    fn sgr_left_press_is_zero_based() {
        assert_eq!(
            single(b"\x1b[<0;12;5M"),
            BackendEvent::MouseButtonPress {
                button: MouseButton::Left,
                col: 11,
                row: 4,
                modifiers: Modifiers::empty(),
            }
        );
    }

    #[test]
    fn sgr_release_and_motion_are_dropped() {
        assert!(parse_input(b"\x1b[<0;12;5m").is_empty());
        assert!(parse_input(b"\x1b[<32;12;5M").is_empty());
    }

    #[test]
    fn sgr_modifiers_and_wheel() {
        assert_eq!(
            single(b"\x1b[<18;1;1M"),
            BackendEvent::MouseButtonPress {
                button: MouseButton::Right,
                col: 0,
                row: 0,
                modifiers: Modifiers::CONTROL,
            }
        );
        match single(b"\x1b[<65;3;3M") {
            BackendEvent::MouseButtonPress { button, .. } => {
                assert_eq!(button, MouseButton::ScrollDown)
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn mixed_stream_keeps_order() {
        let events = parse_input(b"a\x1b[<0;2;3Mq");
        assert_eq!(events.len(), 3);
        assert_eq!(symbol_of(&events[0]).0, KeySymbol::Char('a'));
        assert!(matches!(
            events[1],
            BackendEvent::MouseButtonPress { col: 1, row: 2, .. }
        ));
        assert_eq!(symbol_of(&events[2]).0, KeySymbol::Char('q'));
    }

    #[test]
    fn unknown_csi_is_consumed_silently() {
        let events = parse_input(b"\x1b[200~x");
        assert_eq!(events.len(), 1);
        assert_eq!(symbol_of(&events[0]).0, KeySymbol::Char('x'));
    }
}
