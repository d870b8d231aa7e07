//! Data-driven game balance
//!
//! Every gameplay constant lives here so a level can be replayed or re-tuned
//! from a JSON file without recompiling. Missing fields fall back to the
//! shipped defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::{SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::sim::curves::ResponseCurves;

/// Errors raised while loading or validating a tuning file
#[derive(Debug, Error)]
pub enum TuningError {
    /// File could not be read
    #[error("failed to read tuning file: {0}")]
    Io(#[from] std::io::Error),
    /// File is not valid tuning JSON
    #[error("invalid tuning json: {0}")]
    Json(#[from] serde_json::Error),
    /// A constant is outside its usable range
    #[error("tuning value {name} = {value} out of range ({expected})")]
    OutOfRange {
        name: &'static str,
        value: f32,
        expected: &'static str,
    },
}

/// Gameplay constants. Lengths in pixels, velocities in pixels/s,
/// accelerations in pixels/s², times in fixed steps unless noted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === World ===
    pub screen_width: f32,
    pub screen_height: f32,

    // === Sizes ===
    pub ball_radius: f32,
    pub player_width: f32,
    pub player_height: f32,
    pub brick_width: f32,
    pub brick_height: f32,

    // === Gravity ===
    pub gravity: f32,
    /// Player gravity while holding down and not jumping
    pub fast_gravity: f32,

    // === Ball ===
    pub ball_bounce_vx: f32,
    pub ball_bounce_vy: f32,
    /// Sideways launch when the direction was pressed only during the carry
    pub ball_light_bounce_vx: f32,
    /// Fraction of impact speed kept when rebounding off a brick
    pub ball_bounce_attenuation: f32,

    // === Player ===
    pub player_max_velocity: f32,
    pub player_jump_velocity: f32,
    pub jump_release_attenuation: f32,
    /// Cut upward velocity on early jump release
    pub variable_jump_height: bool,

    // === Timers (steps) ===
    pub coyote_time: u32,
    pub time_to_buffer_jump: u32,
    /// Saturation value for the jump press/release counters
    pub max_time: u32,
    pub time_to_max_velocity: f32,
    pub time_to_zero_velocity: f32,
    pub time_to_pivot: f32,
    pub time_to_squash: u32,
    pub time_to_max_jump: u32,

    // === Camera ===
    pub camera_focus_bottom_margin: f32,
    pub camera_move_factor: f32,
    pub camera_epsilon: f32,

    // === Contacts ===
    /// Slack added to "was above" checks so resting contacts register
    pub contact_epsilon: f32,

    // === Level ===
    /// Horizontal inset for the random start position
    pub start_margin: f32,
    pub start_y: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            screen_width: SCREEN_WIDTH,
            screen_height: SCREEN_HEIGHT,

            ball_radius: 10.0,
            player_width: 32.0,
            player_height: 32.0,
            brick_width: 64.0,
            brick_height: 16.0,

            gravity: 800.0,
            fast_gravity: 2400.0,

            ball_bounce_vx: 200.0,
            ball_bounce_vy: 640.0,
            ball_light_bounce_vx: 80.0,
            ball_bounce_attenuation: 0.95,

            player_max_velocity: 300.0,
            player_jump_velocity: 500.0,
            jump_release_attenuation: 0.9,
            variable_jump_height: false,

            coyote_time: 6,
            time_to_buffer_jump: 8,
            max_time: 65535,
            time_to_max_velocity: 9.0,
            time_to_zero_velocity: 9.0,
            time_to_pivot: 6.0,
            time_to_squash: 8,
            time_to_max_jump: 32,

            camera_focus_bottom_margin: 128.0,
            camera_move_factor: 0.04,
            camera_epsilon: 0.001,

            contact_epsilon: 0.001,

            start_margin: 128.0,
            start_y: 128.0,
        }
    }
}

fn positive(name: &'static str, value: f32) -> Result<(), TuningError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(TuningError::OutOfRange {
            name,
            value,
            expected: "> 0",
        })
    }
}

fn unit_interval(name: &'static str, value: f32) -> Result<(), TuningError> {
    if value > 0.0 && value <= 1.0 {
        Ok(())
    } else {
        Err(TuningError::OutOfRange {
            name,
            value,
            expected: "(0, 1]",
        })
    }
}

impl Tuning {
    /// Parse tuning from JSON and validate it
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load tuning from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let path = path.as_ref();
        let tuning = std::fs::read_to_string(path)
            .map_err(TuningError::from)
            .and_then(|json| Self::from_json(&json))
            .inspect_err(|e| log::warn!("Rejected tuning {}: {}", path.display(), e))?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    /// Reject constants the simulation cannot run with
    pub fn validate(&self) -> Result<(), TuningError> {
        positive("screen_width", self.screen_width)?;
        positive("screen_height", self.screen_height)?;
        positive("ball_radius", self.ball_radius)?;
        positive("player_width", self.player_width)?;
        positive("player_height", self.player_height)?;
        positive("brick_width", self.brick_width)?;
        positive("brick_height", self.brick_height)?;
        positive("gravity", self.gravity)?;
        positive("fast_gravity", self.fast_gravity)?;
        positive("ball_bounce_vy", self.ball_bounce_vy)?;
        positive("player_max_velocity", self.player_max_velocity)?;
        positive("player_jump_velocity", self.player_jump_velocity)?;
        positive("time_to_max_velocity", self.time_to_max_velocity)?;
        positive("time_to_zero_velocity", self.time_to_zero_velocity)?;
        positive("time_to_pivot", self.time_to_pivot)?;
        unit_interval("ball_bounce_attenuation", self.ball_bounce_attenuation)?;
        unit_interval("jump_release_attenuation", self.jump_release_attenuation)?;
        unit_interval("camera_move_factor", self.camera_move_factor)?;

        if self.time_to_pivot > self.time_to_zero_velocity {
            return Err(TuningError::OutOfRange {
                name: "time_to_pivot",
                value: self.time_to_pivot,
                expected: "<= time_to_zero_velocity",
            });
        }
        if self.start_margin < 0.0 || self.start_margin * 2.0 > self.screen_width {
            return Err(TuningError::OutOfRange {
                name: "start_margin",
                value: self.start_margin,
                expected: "[0, screen_width / 2]",
            });
        }
        if self.max_time < self.time_to_buffer_jump {
            return Err(TuningError::OutOfRange {
                name: "max_time",
                value: self.max_time as f32,
                expected: ">= time_to_buffer_jump",
            });
        }
        Ok(())
    }

    /// Horizontal response curves for the player
    pub fn curves(&self) -> ResponseCurves {
        ResponseCurves {
            max_velocity: self.player_max_velocity,
            time_to_max: self.time_to_max_velocity,
            time_to_zero: self.time_to_zero_velocity,
            time_to_pivot: self.time_to_pivot,
        }
    }
}
