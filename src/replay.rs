//! Headless input replays
//!
//! A replay is a seed, an optional tuning override and one `TickInput` per
//! fixed step. Running it reproduces a session exactly; the per-tick trace is
//! what the headless runner prints.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::audio::CueSink;
use crate::sim::state::GameState;
use crate::sim::tick::{TickInput, tick};
use crate::tuning::{Tuning, TuningError};

#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("failed to read replay file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid replay json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("replay tuning rejected: {0}")]
    Tuning(#[from] TuningError),
}

/// Recorded session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Replay {
    pub seed: u64,
    #[serde(default)]
    pub tuning: Tuning,
    pub inputs: Vec<TickInput>,
}

/// One row of the headless trace
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TraceRow {
    pub tick: u64,
    pub player_x: f32,
    pub player_y: f32,
    pub ball_x: f32,
    pub ball_y: f32,
    pub score: u32,
    pub game_over: bool,
}

impl TraceRow {
    pub const CSV_HEADER: &'static str = "tick,player_x,player_y,ball_x,ball_y,score,game_over";

    pub fn of(state: &GameState) -> Self {
        Self {
            tick: state.time_ticks,
            player_x: state.player.pos.x,
            player_y: state.player.pos.y,
            ball_x: state.ball.pos.x,
            ball_y: state.ball.pos.y,
            score: state.score,
            game_over: state.is_game_over(),
        }
    }

    pub fn to_csv(&self) -> String {
        format!(
            "{},{:.3},{:.3},{:.3},{:.3},{},{}",
            self.tick,
            self.player_x,
            self.player_y,
            self.ball_x,
            self.ball_y,
            self.score,
            u8::from(self.game_over)
        )
    }
}

impl Replay {
    /// A session where nobody touches the controls
    pub fn idle(seed: u64, ticks: usize) -> Self {
        Self {
            seed,
            tuning: Tuning::default(),
            inputs: vec![TickInput::default(); ticks],
        }
    }

    pub fn from_json(json: &str) -> Result<Self, ReplayError> {
        let replay: Self = serde_json::from_str(json)?;
        replay.tuning.validate()?;
        Ok(replay)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ReplayError> {
        let path = path.as_ref();
        let replay = std::fs::read_to_string(path)
            .map_err(ReplayError::from)
            .and_then(|json| Self::from_json(&json))
            .inspect_err(|e| log::warn!("Rejected replay {}: {}", path.display(), e))?;
        log::info!(
            "Loaded replay {} (seed {}, {} ticks)",
            path.display(),
            replay.seed,
            replay.inputs.len()
        );
        Ok(replay)
    }

    /// Play every input from a fresh level, handing cues to `sink` after each
    /// tick. Returns one trace row per tick.
    pub fn run(&self, sink: &mut impl CueSink) -> Vec<TraceRow> {
        let mut state = GameState::with_tuning(self.seed, self.tuning);
        let mut rows = Vec::with_capacity(self.inputs.len());
        for input in &self.inputs {
            tick(&mut state, input);
            state.dispatch_cues(sink);
            rows.push(TraceRow::of(&state));
        }
        rows
    }
}
