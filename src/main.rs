// src/main.rs

pub mod backends;
pub mod board;
pub mod color;
pub mod config;
pub mod controller;
pub mod error;
pub mod keys;
pub mod knight;
pub mod renderer;
pub mod snapshot;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use log::{error, info};

use crate::{
    backends::{console::ConsoleDriver, Driver},
    config::Config,
    controller::{BoardAction, BoardController, ControllerStatus},
    snapshot::BoardSnapshot,
};

/// Screen size assumed for headless runs; only the layout depends on it.
const HEADLESS_COLS: usize = 80;
const HEADLESS_ROWS: usize = 24;

#[derive(Parser, Debug)]
#[command(name = "knight-board", version, about = "Approximate knight-move counts on an N×N board")]
struct Cli {
    /// JSON configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Interactive board on the terminal (the default).
    Play {
        /// Squares per side, clamped to the configured bounds.
        #[arg(long)]
        size: Option<usize>,
    },
    /// Print the board as JSON after an optional bulk reveal.
    Dump {
        #[arg(long)]
        size: Option<usize>,
        #[arg(long, value_enum, default_value_t = RevealFilter::None)]
        reveal: RevealFilter,
    },
    /// Print the estimated move count from (0, 0) to (X, Y).
    Route {
        #[arg(allow_negative_numbers = true)]
        x: i64,
        #[arg(allow_negative_numbers = true)]
        y: i64,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum RevealFilter {
    None,
    All,
    Odd,
    Even,
}

impl RevealFilter {
    fn action(self) -> Option<BoardAction> {
        match self {
            RevealFilter::None => None,
            RevealFilter::All => Some(BoardAction::RevealAll),
            RevealFilter::Odd => Some(BoardAction::RevealOdd),
            RevealFilter::Even => Some(BoardAction::RevealEven),
        }
    }
}

fn main() -> Result<()> {
    // The interactive board owns the terminal, so only warnings and above go
    // to stderr unless RUST_LOG asks for more.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp_micros()
        .init();

    let cli = Cli::parse();
    let mut config = Config::load_or_default(cli.config.as_deref())?;

    match cli.command.unwrap_or(Command::Play { size: None }) {
        Command::Play { size } => {
            if let Some(size) = size {
                config.board.tiles_per_vertex = size;
            }
            play(config)
        }
        Command::Dump { size, reveal } => {
            if let Some(size) = size {
                config.board.tiles_per_vertex = size;
            }
            dump(config, reveal)
        }
        Command::Route { x, y } => {
            let moves = knight::distance(x, y)?;
            println!("{}", moves);
            Ok(())
        }
    }
}

fn dump(config: Config, reveal: RevealFilter) -> Result<()> {
    let mut controller = BoardController::new(config, HEADLESS_COLS, HEADLESS_ROWS);
    if let Some(action) = reveal.action() {
        controller.apply(action)?;
    }
    let snapshot = BoardSnapshot::capture(controller.board(), &controller.config().colors);
    println!(
        "{}",
        snapshot.to_json().context("Failed to serialize board")?
    );
    Ok(())
}

fn play(config: Config) -> Result<()> {
    info!("Starting knight-board...");
    let poll_interval = Duration::from_millis(config.performance.poll_interval_ms);

    let mut driver = ConsoleDriver::new().context("Failed to initialize console driver")?;
    let (cols, rows) = driver.dimensions();
    let mut controller = BoardController::new(config, cols, rows);

    let result = run_event_loop(&mut controller, &mut driver, poll_interval);
    if let Err(e) = driver.cleanup() {
        error!("Failed to restore terminal: {:#}", e);
    }
    result
}

fn run_event_loop(
    controller: &mut BoardController,
    driver: &mut dyn Driver,
    poll_interval: Duration,
) -> Result<()> {
    controller.draw(driver)?;
    loop {
        match controller.process_event_cycle(driver) {
            Ok(ControllerStatus::Running) => std::thread::sleep(poll_interval),
            Ok(ControllerStatus::Shutdown) => {
                info!("Controller requested shutdown. Exiting main loop.");
                return Ok(());
            }
            Err(e) => {
                error!(
                    "Error in event cycle: {:#}. Root cause: {:?}. Exiting.",
                    e,
                    e.root_cause()
                );
                return Err(e);
            }
        }
    }
}
