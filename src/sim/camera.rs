//! Vertical camera follow
//!
//! The camera chases the highest brick the player has stood on, keeping a
//! fixed margin below it, with a single-pole low-pass so it never overshoots.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Camera {
    /// World y of the bottom edge of the view
    pub y: f32,
    /// Highest brick y the player has landed on
    pub focus_y: f32,
}

impl Camera {
    pub fn new(focus_y: f32) -> Self {
        Self { y: 0.0, focus_y }
    }

    /// Raise the focus. The focus never moves down.
    pub fn raise_focus(&mut self, y: f32) {
        self.focus_y = self.focus_y.max(y);
    }

    pub fn target(&self, bottom_margin: f32) -> f32 {
        self.focus_y - bottom_margin
    }

    /// Blend one step toward the target, skipping sub-epsilon moves
    pub fn follow(&mut self, bottom_margin: f32, factor: f32, epsilon: f32) {
        let target = self.target(bottom_margin);
        if (self.y - target).abs() > epsilon {
            self.y = (1.0 - factor) * self.y + factor * target;
        }
    }
}
