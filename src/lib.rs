//! Icy Mountain Hot Potato - a wrap-around brick-ladder platformer
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, collisions, game state)
//! - `tuning`: Data-driven game balance
//! - `frame`: Render-ready snapshot handed to the presentation layer
//! - `audio`: Sound cues the simulation raises (playback lives elsewhere)
//! - `replay`: Headless input replays

pub mod audio;
pub mod frame;
pub mod highscores;
pub mod replay;
pub mod sim;
pub mod tuning;

pub use audio::{CueSink, LogCueSink, SoundCue};
pub use frame::FrameView;
pub use highscores::HighScore;
pub use tuning::{Tuning, TuningError};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame the stepper will try to catch up on (seconds)
    pub const MAX_FRAME_TIME: f32 = 0.1;

    /// Logical screen dimensions (pixels)
    pub const SCREEN_WIDTH: f32 = 1280.0;
    pub const SCREEN_HEIGHT: f32 = 720.0;

    /// Fixed brick arena capacity. Slots are never appended or removed.
    pub const MAX_BRICKS: usize = 256;
    /// Bricks per landing
    pub const LANDING_SIZE: usize = 3;
}

/// Floating-point modulo that always lands in [0, modulus)
#[inline]
pub fn positive_fmod(x: f32, modulus: f32) -> f32 {
    let m = x % modulus;
    if m < 0.0 { m + modulus } else { m }
}

/// Sample a level seed from the wall clock (milliseconds since the epoch)
pub fn clock_seed() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};

    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
