//! Horizontal velocity response curves
//!
//! The curves work on speeds (non-negative). `steer` applies the sign.

use serde::{Deserialize, Serialize};

/// Velocity shaping parameters (times in fixed steps)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResponseCurves {
    pub max_velocity: f32,
    pub time_to_max: f32,
    pub time_to_zero: f32,
    pub time_to_pivot: f32,
}

impl ResponseCurves {
    /// Speed up toward `max_velocity`, fast first and slow near the cap.
    /// Never returns less than `speed`; `max_velocity` is a fixed point.
    pub fn accelerate(&self, speed: f32) -> f32 {
        let warped = (speed / self.max_velocity).sqrt() + 1.0 / self.time_to_max;
        self.max_velocity.min(self.max_velocity * warped * warped)
    }

    /// Linear decay toward zero with no input
    pub fn decelerate(&self, speed: f32) -> f32 {
        decay(speed, self.max_velocity / self.time_to_zero)
    }

    /// Linear decay toward zero when input opposes motion
    pub fn pivot(&self, speed: f32) -> f32 {
        decay(speed, self.max_velocity / self.time_to_pivot)
    }

    /// Next signed velocity for the held direction.
    ///
    /// `direction` is -1, 0 or 1. Zero means no input or both sides held.
    pub fn steer(&self, velocity: f32, direction: i8) -> f32 {
        match direction {
            1 if velocity < 0.0 => -self.pivot(-velocity),
            1 => self.accelerate(velocity),
            -1 if velocity > 0.0 => self.pivot(velocity),
            -1 => -self.accelerate(-velocity),
            _ if velocity > 0.0 => self.decelerate(velocity),
            _ => -self.decelerate(-velocity),
        }
    }
}

#[inline]
fn decay(speed: f32, step: f32) -> f32 {
    (speed - step).max(0.0)
}
