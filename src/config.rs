//! Command-line options and the validated settings the app runs with.

use std::time::Duration;

use clap::Parser;
use thiserror::Error;

pub const MAX_FPS: u32 = 240;

/// Falling-block puzzle in the terminal.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "blockfall",
    version,
    about = "Falling-block puzzle in the terminal.",
    long_about = "Stack falling formations and clear full rows.\n\n\
        CONTROLS:\n  Left/A  Right/D  Move     Down/S  Soft drop   Up/W  Rotate\n  \
        Space  Hard drop   R  Restart   Esc/Q  Quit\n\n\
        Set RUST_LOG=debug and redirect stderr to a file to record a game log."
)]
pub struct Args {
    /// Render frames per second; the engine is ticked once per frame.
    #[arg(long, default_value = "60", value_name = "N")]
    pub fps: u32,

    /// How long cleared rows stay highlighted, in milliseconds.
    #[arg(long, default_value = "300", value_name = "MS")]
    pub clear_flash_ms: u64,

    /// Seed for the piece sequence. Random when not set.
    #[arg(long, value_name = "N")]
    pub seed: Option<u64>,

    /// Hide the landing preview of the current piece.
    #[arg(long)]
    pub no_ghost: bool,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("fps must be between 1 and {max}, got {0}", max = MAX_FPS)]
    FrameRate(u32),
    #[error("clear flash duration must be positive")]
    ClearFlash,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub frame_duration: Duration,
    pub clear_flash: Duration,
    pub seed: Option<u64>,
    pub show_ghost: bool,
}

impl Settings {
    pub fn from_args(args: &Args) -> Result<Self, ConfigError> {
        if args.fps == 0 || args.fps > MAX_FPS {
            return Err(ConfigError::FrameRate(args.fps));
        }
        if args.clear_flash_ms == 0 {
            return Err(ConfigError::ClearFlash);
        }
        Ok(Self {
            frame_duration: Duration::from_secs(1) / args.fps,
            clear_flash: Duration::from_millis(args.clear_flash_ms),
            seed: args.seed,
            show_ghost: !args.no_ghost,
        })
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            frame_duration: Duration::from_secs(1) / 60,
            clear_flash: Duration::from_millis(300),
            seed: None,
            show_ghost: true,
        }
    }
}
