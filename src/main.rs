//! Tuitris: a classic falling-block puzzle in the terminal.

mod app;
mod canvas;
mod game;
mod grid;
mod input;
mod randomizer;
mod shapes;
mod theme;
mod ui;

use anyhow::{Context, Result};
use app::App;
use clap::{ArgAction, Parser, ValueEnum};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use thiserror::Error;
use tracing::{info, warn};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

const MIN_WIDTH: usize = 10;
const MIN_HEIGHT: usize = 6;
const MAX_TILE_SIZE: u16 = 8;

/// Runtime options validated from the CLI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameConfig {
    /// Grid columns, border included.
    pub width: usize,
    /// Grid rows, border included.
    pub height: usize,
    pub fps: u32,
    /// Frames between gravity ticks.
    pub tick_frames: u32,
    /// Pixels per tile edge.
    pub tile_size: u16,
    pub seed: Option<u64>,
    pub no_animation: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: 12,
            height: 22,
            fps: 60,
            tick_frames: 30,
            tile_size: 2,
            seed: None,
            no_animation: false,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("width {0} is too small (minimum {min})", min = MIN_WIDTH)]
    Width(usize),
    #[error("height {0} is too small (minimum {min})", min = MIN_HEIGHT)]
    Height(usize),
    #[error("fps must be at least 1")]
    Fps,
    #[error("tick frames must be at least 1")]
    TickFrames,
    #[error("tile size {0} is out of range (1..={max})", max = MAX_TILE_SIZE)]
    TileSize(u16),
}

impl GameConfig {
    pub fn from_args(args: &Args) -> Result<Self, ConfigError> {
        if args.width < MIN_WIDTH {
            return Err(ConfigError::Width(args.width));
        }
        if args.height < MIN_HEIGHT {
            return Err(ConfigError::Height(args.height));
        }
        if args.fps == 0 {
            return Err(ConfigError::Fps);
        }
        let tick_frames = args.tick_frames.unwrap_or((args.fps / 2).max(1));
        if tick_frames == 0 {
            return Err(ConfigError::TickFrames);
        }
        if !(1..=MAX_TILE_SIZE).contains(&args.tile_size) {
            return Err(ConfigError::TileSize(args.tile_size));
        }
        Ok(Self {
            width: args.width,
            height: args.height,
            fps: args.fps,
            tick_frames,
            tile_size: args.tile_size,
            seed: args.seed,
            no_animation: args.no_animation,
        })
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose, args.log_file.as_deref())?;
    let config = GameConfig::from_args(&args)?;
    let theme = theme::Theme::load(args.theme.as_deref(), args.palette).unwrap_or_else(|err| {
        warn!(error = %err, "theme not loaded, using classic colours");
        let mut theme = theme::Theme::classic();
        theme.apply_palette(args.palette);
        theme
    });
    info!(?config, "starting");
    App::new(config, theme).run()
}

/// The terminal is in raw mode while playing, so logs only go to a file.
fn init_logging(verbose: u8, log_file: Option<&Path>) -> Result<()> {
    let Some(path) = log_file else {
        return Ok(());
    };
    let file = std::fs::File::create(path)
        .with_context(|| format!("cannot create log file {}", path.display()))?;
    let level = match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .with(level)
        .init();
    Ok(())
}

/// Classic falling-block puzzle in the terminal.
#[derive(Debug, Parser)]
#[command(
    name = "tuitris",
    version,
    about = "Classic falling-block puzzle in the terminal. Fill rows edge to edge to clear them.",
    long_about = "Tuitris is a small falling-block puzzle for the terminal.\n\n\
        A tetromino falls one row per tick. Move and rotate it; when it lands it locks into \
        the well. Full rows are removed and everything above drops down. If a new piece has \
        no room, the well is emptied and play continues.\n\n\
        CONTROLS:\n  A / Left / h   Move left     D / Right / l  Move right\n  \
        W / Up / k     Rotate        S / Down / j   Soft drop (hold)\n  \
        Space / p      Pause         q / Esc        Quit\n\n\
        Use --theme to load a btop-style theme file (theme[piece_i]=\"#66BFFF\")."
)]
pub struct Args {
    /// Grid width in cells, border included.
    #[arg(long, default_value_t = 12, value_name = "COLS")]
    pub width: usize,

    /// Grid height in cells, border included.
    #[arg(long, default_value_t = 22, value_name = "ROWS")]
    pub height: usize,

    /// Simulation and render frames per second.
    #[arg(long, default_value_t = 60, value_name = "RATE")]
    pub fps: u32,

    /// Frames between gravity ticks. Defaults to half the frame rate (two rows per second).
    #[arg(long, value_name = "N")]
    pub tick_frames: Option<u32>,

    /// Tile edge in half-block pixels (two pixels per terminal row).
    #[arg(long, default_value_t = 2, value_name = "PX")]
    pub tile_size: u16,

    /// Path to theme file (btop-style theme[key]=\"value\"). Uses the classic colours if not set.
    #[arg(short, long, value_name = "FILE")]
    pub theme: Option<PathBuf>,

    /// Colour palette: normal (theme), high-contrast, or colorblind.
    #[arg(long, default_value = "normal")]
    pub palette: Palette,

    /// Seed the piece randomizer for a repeatable sequence.
    #[arg(long, value_name = "N")]
    pub seed: Option<u64>,

    /// Disable the row-clear flash.
    #[arg(long)]
    pub no_animation: bool,

    /// Write logs to this file.
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Palette {
    #[default]
    Normal,

    #[value(alias = "highcontrast", alias = "contrast")]
    HighContrast,

    #[value(alias = "colourblind")]
    Colorblind,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(argv: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("tuitris").chain(argv.iter().copied())).unwrap()
    }

    #[test]
    fn cli_is_well_formed() {
        Args::command().debug_assert();
    }

    #[test]
    fn defaults_match_game_config_default() {
        let config = GameConfig::from_args(&parse(&[])).unwrap();
        assert_eq!(config, GameConfig::default());
    }

    #[test]
    fn tick_frames_follow_fps_unless_given() {
        let config = GameConfig::from_args(&parse(&["--fps", "30"])).unwrap();
        assert_eq!(config.tick_frames, 15);
        let config = GameConfig::from_args(&parse(&["--fps", "30", "--tick-frames", "4"])).unwrap();
        assert_eq!(config.tick_frames, 4);
    }

    #[test]
    fn rejects_out_of_range_values() {
        assert_eq!(
            GameConfig::from_args(&parse(&["--width", "9"])),
            Err(ConfigError::Width(9))
        );
        assert_eq!(
            GameConfig::from_args(&parse(&["--height", "5"])),
            Err(ConfigError::Height(5))
        );
        assert_eq!(GameConfig::from_args(&parse(&["--fps", "0"])), Err(ConfigError::Fps));
        assert_eq!(
            GameConfig::from_args(&parse(&["--tick-frames", "0"])),
            Err(ConfigError::TickFrames)
        );
        assert_eq!(GameConfig::from_args(&parse(&["--fps", "1"])).unwrap().tick_frames, 1);
        assert_eq!(
            GameConfig::from_args(&parse(&["--tile-size", "9"])),
            Err(ConfigError::TileSize(9))
        );
    }

    #[test]
    fn palette_aliases_and_verbosity() {
        let args = parse(&["--palette", "colourblind", "-vv", "--seed", "7"]);
        assert_eq!(args.palette, Palette::Colorblind);
        assert_eq!(args.verbose, 2);
        assert_eq!(GameConfig::from_args(&args).unwrap().seed, Some(7));
    }

    #[test]
    fn config_error_messages_name_the_limit() {
        assert_eq!(
            ConfigError::Width(3).to_string(),
            "width 3 is too small (minimum 10)"
        );
    }
}
