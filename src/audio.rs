//! Sound cues raised by the simulation
//!
//! The simulation only signals cues. Playback belongs to the presentation
//! layer, which implements `CueSink` over whatever audio backend it has.

use serde::{Deserialize, Serialize};

/// Sound effect cues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoundCue {
    /// Player left the ground
    JumpStart,
    /// Ball fell below the camera
    GameOver,
    /// Ball landed on the player or a brick and started squashing
    BounceStart,
    /// Ball launched off the player
    BounceEnd,
    /// Brick broken
    BrickBreak,
}

impl SoundCue {
    pub fn as_str(&self) -> &'static str {
        match self {
            SoundCue::JumpStart => "jump",
            SoundCue::GameOver => "game_over",
            SoundCue::BounceStart => "bounce_start",
            SoundCue::BounceEnd => "bounce_end",
            SoundCue::BrickBreak => "brick_break",
        }
    }
}

/// Fire-and-forget cue consumer
pub trait CueSink {
    fn play(&mut self, cue: SoundCue);
}

/// Records cues in order (handy for tests and replays)
impl CueSink for Vec<SoundCue> {
    fn play(&mut self, cue: SoundCue) {
        self.push(cue);
    }
}

/// Sink for headless runs: cues go to the log
#[derive(Debug, Default)]
pub struct LogCueSink {
    muted: bool,
}

impl LogCueSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mute/unmute cue logging
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }
}

impl CueSink for LogCueSink {
    fn play(&mut self, cue: SoundCue) {
        if !self.muted {
            log::debug!("cue: {}", cue.as_str());
        }
    }
}
