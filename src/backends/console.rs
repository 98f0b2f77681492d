// src/backends/console.rs

use crate::backends::{
    input::parse_input, AttrFlags, BackendEvent, CellCoords, CellRect, Driver, TextRunStyle,
    DEFAULT_WINDOW_HEIGHT_CHARS, DEFAULT_WINDOW_WIDTH_CHARS,
};
use crate::color::Color;

use anyhow::{anyhow, Context, Result};
use libc::{winsize, STDIN_FILENO, TIOCGWINSZ};
use std::io::{self, stdin, stdout, Read, Write};
use std::mem;
use std::os::unix::io::RawFd;
use termios::{tcsetattr, Termios, ECHO, ICANON, ISIG, TCSANOW, VMIN, VTIME};

use log::{debug, error, info, trace, warn};

const CURSOR_HIDE: &str = "\x1b[?25l";
const CURSOR_SHOW: &str = "\x1b[?25h";
const ALT_SCREEN_ENTER: &str = "\x1b[?1049h";
const ALT_SCREEN_LEAVE: &str = "\x1b[?1049l";
// Button press/release reporting with SGR (1006) coordinates.
const MOUSE_REPORTING_ON: &str = "\x1b[?1000h\x1b[?1006h";
const MOUSE_REPORTING_OFF: &str = "\x1b[?1006l\x1b[?1000l";
const SGR_PREFIX: &str = "\x1b[";
const SGR_SUFFIX: char = 'm';
const SGR_SEPARATOR: &str = ";";
const SGR_RESET_ALL: u16 = 0;
const CLEAR_SCREEN_AND_HOME: &str = "\x1b[2J\x1b[H";

const INPUT_BUFFER_SIZE: usize = 256;

/// Draws the board on the controlling terminal with ANSI escape sequences.
///
/// Puts stdin into raw, non-blocking mode (`VMIN = 0`, `VTIME = 0`), switches
/// to the alternate screen and enables SGR mouse reporting. All output is
/// buffered until `present`. `cleanup` (also run on drop) undoes every change.
pub struct ConsoleDriver {
    original_termios: Option<Termios>,
    last_known_cols: usize,
    last_known_rows: usize,
    input_buffer: [u8; INPUT_BUFFER_SIZE],
    pending: String,
}

impl ConsoleDriver {
    pub fn new() -> Result<Self> {
        info!("Creating new ConsoleDriver.");
        let original_termios = Termios::from_fd(STDIN_FILENO)
            .context("ConsoleDriver: stdin is not a terminal")?;

        let mut raw_termios = original_termios;
        raw_termios.c_lflag &= !(ECHO | ICANON | ISIG);
        raw_termios.c_iflag &= !(libc::IXON | libc::IXOFF | libc::ICRNL | libc::INLCR | libc::IGNCR);
        raw_termios.c_oflag &= !libc::OPOST;
        raw_termios.c_cc[VMIN] = 0;
        raw_termios.c_cc[VTIME] = 0;
        tcsetattr(STDIN_FILENO, TCSANOW, &raw_termios)
            .context("ConsoleDriver: Failed to set raw terminal attributes")?;
        debug!("ConsoleDriver: Terminal set to raw mode.");

        let (cols, rows) = match get_terminal_size_cells(STDIN_FILENO) {
            Ok(size) => size,
            Err(e) => {
                restore_termios(&original_termios)?;
                return Err(e.context("ConsoleDriver: Failed to get initial terminal size"));
            }
        };
        info!("ConsoleDriver: Initial terminal size: {}x{} cells.", cols, rows);

        let mut driver = ConsoleDriver {
            original_termios: Some(original_termios),
            last_known_cols: cols,
            last_known_rows: rows,
            input_buffer: [0u8; INPUT_BUFFER_SIZE],
            pending: String::new(),
        };
        driver.pending.push_str(ALT_SCREEN_ENTER);
        driver.pending.push_str(CURSOR_HIDE);
        driver.pending.push_str(MOUSE_REPORTING_ON);
        driver
            .present()
            .context("ConsoleDriver: Failed to initialise screen modes")?;
        Ok(driver)
    }

    fn push_sgr(&mut self, codes: &[u16]) {
        if codes.is_empty() {
            return;
        }
        let joined = codes
            .iter()
            .map(|c| c.to_string())
            .collect::<Vec<_>>()
            .join(SGR_SEPARATOR);
        self.pending.push_str(SGR_PREFIX);
        self.pending.push_str(&joined);
        self.pending.push(SGR_SUFFIX);
    }

    fn push_cursor_position(&mut self, col: usize, row: usize) {
        self.pending
            .push_str(&format!("\x1b[{};{}H", row + 1, col + 1));
    }

    /// Appends SGR codes for a concrete foreground color.
    fn sgr_append_fg_color(codes: &mut Vec<u16>, fg: Color) -> Result<()> {
        match fg {
            Color::Default => {
                return Err(anyhow!(
                    "ConsoleDriver received Color::Default for foreground; the renderer must resolve it"
                ))
            }
            Color::Named(nc) if (nc as u8) < 8 => codes.push(30 + nc as u16),
            Color::Named(nc) => codes.push(90 + (nc as u16 - 8)),
            Color::Indexed(idx) => codes.extend_from_slice(&[38, 5, idx as u16]),
            Color::Rgb(r, g, b) => codes.extend_from_slice(&[38, 2, r as u16, g as u16, b as u16]),
        }
        Ok(())
    }

    /// Appends SGR codes for a concrete background color.
    fn sgr_append_bg_color(codes: &mut Vec<u16>, bg: Color) -> Result<()> {
        match bg {
            Color::Default => {
                return Err(anyhow!(
                    "ConsoleDriver received Color::Default for background; the renderer must resolve it"
                ))
            }
            Color::Named(nc) if (nc as u8) < 8 => codes.push(40 + nc as u16),
            Color::Named(nc) => codes.push(100 + (nc as u16 - 8)),
            Color::Indexed(idx) => codes.extend_from_slice(&[48, 5, idx as u16]),
            Color::Rgb(r, g, b) => codes.extend_from_slice(&[48, 2, r as u16, g as u16, b as u16]),
        }
        Ok(())
    }
}

impl Driver for ConsoleDriver {
    fn process_events(&mut self) -> Result<Vec<BackendEvent>> {
        let mut backend_events = Vec::new();

        match get_terminal_size_cells(STDIN_FILENO) {
            Ok((cols, rows)) if cols != self.last_known_cols || rows != self.last_known_rows => {
                info!(
                    "ConsoleDriver: Terminal resized from {}x{} to {}x{} cells.",
                    self.last_known_cols, self.last_known_rows, cols, rows
                );
                self.last_known_cols = cols;
                self.last_known_rows = rows;
                backend_events.push(BackendEvent::Resize { cols, rows });
            }
            Ok(_) => {}
            Err(e) => {
                warn!(
                    "ConsoleDriver: Failed to get terminal size: {}. Using last known.",
                    e
                );
            }
        }

        // With VMIN = VTIME = 0 a zero-length read just means no input yet.
        match stdin().read(&mut self.input_buffer) {
            Ok(0) => {}
            Ok(bytes_read) => {
                trace!("ConsoleDriver: Read {} bytes from stdin.", bytes_read);
                backend_events.extend(parse_input(&self.input_buffer[..bytes_read]));
            }
            Err(ref e) if e.kind() == io::ErrorKind::WouldBlock => {
                trace!("ConsoleDriver: stdin read WouldBlock.");
            }
            Err(ref e) if e.kind() == io::ErrorKind::Interrupted => {
                trace!("ConsoleDriver: stdin read Interrupted.");
            }
            Err(e) => {
                return Err(e).context("ConsoleDriver: Error reading from stdin");
            }
        }
        Ok(backend_events)
    }

    fn dimensions(&self) -> (usize, usize) {
        (self.last_known_cols, self.last_known_rows)
    }

    fn clear_all(&mut self, bg: Color) -> Result<()> {
        let mut codes = vec![SGR_RESET_ALL];
        Self::sgr_append_bg_color(&mut codes, bg)?;
        self.push_sgr(&codes);
        self.pending.push_str(CLEAR_SCREEN_AND_HOME);
        trace!("ConsoleDriver: clear_all with {:?}", bg);
        Ok(())
    }

    fn draw_text_run(&mut self, coords: CellCoords, text: &str, style: TextRunStyle) -> Result<()> {
        if text.is_empty() {
            return Ok(());
        }
        let mut codes = vec![SGR_RESET_ALL];
        if style.flags.contains(AttrFlags::BOLD) {
            codes.push(1);
        }
        if style.flags.contains(AttrFlags::UNDERLINE) {
            codes.push(4);
        }
        if style.flags.contains(AttrFlags::REVERSE) {
            codes.push(7);
        }
        Self::sgr_append_fg_color(&mut codes, style.fg)?;
        Self::sgr_append_bg_color(&mut codes, style.bg)?;

        self.push_cursor_position(coords.x, coords.y);
        self.push_sgr(&codes);
        self.pending.push_str(text);
        trace!(
            "ConsoleDriver: draw_text_run at ({},{}) text '{}' style {:?}",
            coords.x,
            coords.y,
            text,
            style
        );
        Ok(())
    }

    fn fill_rect(&mut self, rect: CellRect, color: Color) -> Result<()> {
        if rect.width == 0 || rect.height == 0 {
            return Ok(());
        }
        let mut codes = vec![SGR_RESET_ALL];
        Self::sgr_append_bg_color(&mut codes, color)?;
        self.push_sgr(&codes);

        let spaces = " ".repeat(rect.width);
        for y_offset in 0..rect.height {
            self.push_cursor_position(rect.x, rect.y + y_offset);
            self.pending.push_str(&spaces);
        }
        trace!(
            "ConsoleDriver: fill_rect at ({},{}, w:{}, h:{}) color {:?}",
            rect.x,
            rect.y,
            rect.width,
            rect.height,
            color
        );
        Ok(())
    }

    fn present(&mut self) -> Result<()> {
        let mut out = stdout().lock();
        out.write_all(self.pending.as_bytes())
            .context("ConsoleDriver: Failed to write frame to stdout")?;
        self.pending.clear();
        out.flush()
            .context("ConsoleDriver: Failed to flush stdout during present")
    }

    fn cleanup(&mut self) -> Result<()> {
        let Some(original_termios) = self.original_termios.take() else {
            trace!("ConsoleDriver: Already cleaned up.");
            return Ok(());
        };
        info!("ConsoleDriver: Cleaning up...");
        self.pending.clear();
        self.pending.push_str(SGR_PREFIX);
        self.pending.push_str(&SGR_RESET_ALL.to_string());
        self.pending.push(SGR_SUFFIX);
        self.pending.push_str(MOUSE_REPORTING_OFF);
        self.pending.push_str(CURSOR_SHOW);
        self.pending.push_str(ALT_SCREEN_LEAVE);
        let screen_result = self
            .present()
            .context("ConsoleDriver: Failed to restore screen modes");
        finish_cleanup(screen_result, || restore_termios(&original_termios))
    }
}

/// Runs `restore` whatever happened to the screen-mode write, then reports
/// the first failure.
fn finish_cleanup(screen_result: Result<()>, restore: impl FnOnce() -> Result<()>) -> Result<()> {
    if let Err(e) = &screen_result {
        warn!("{:#}", e);
    }
    restore()?;
    info!("ConsoleDriver: Cleanup complete.");
    screen_result
}

fn restore_termios(original: &Termios) -> Result<()> {
    debug!("ConsoleDriver: Restoring original terminal attributes.");
    tcsetattr(STDIN_FILENO, TCSANOW, original)
        .context("ConsoleDriver: Failed to restore original terminal attributes")
}

fn get_terminal_size_cells(fd: RawFd) -> Result<(usize, usize)> {
    // SAFETY: `winsz` is a plain C struct that ioctl fills in; it outlives the call.
    let winsz = unsafe {
        let mut winsz: winsize = mem::zeroed();
        if libc::ioctl(fd, TIOCGWINSZ, &mut winsz) == -1 {
            return Err(anyhow::Error::from(std::io::Error::last_os_error())
                .context("ConsoleDriver: ioctl(TIOCGWINSZ) failed"));
        }
        winsz
    };
    let cols = if winsz.ws_col == 0 {
        DEFAULT_WINDOW_WIDTH_CHARS
    } else {
        winsz.ws_col as usize
    };
    let rows = if winsz.ws_row == 0 {
        DEFAULT_WINDOW_HEIGHT_CHARS
    } else {
        winsz.ws_row as usize
    };
    Ok((cols, rows))
}

impl Drop for ConsoleDriver {
    fn drop(&mut self) {
        if let Err(e) = self.cleanup() {
            error!("ConsoleDriver: Error during cleanup in drop: {}", e);
        }
    }
}
