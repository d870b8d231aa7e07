//! Render-ready snapshot of a game state
//!
//! The simulation works in world space: y up, origin at the bottom-left, x
//! unbounded. Presenters draw in screen space: y down from the top edge, x
//! folded into `[0, screen_width)`. `FrameView::capture` does that mapping
//! once per tick so a presenter only copies sprites to the screen, twice each
//! (at `x` and at `x - screen_width`) to cover the wrap seam.

use serde::{Deserialize, Serialize};

use crate::positive_fmod;
use crate::sim::state::GameState;
use crate::tuning::Tuning;

/// Extra width of the squashed ball sprite over its round diameter
pub const SQUASH_WIDEN: f32 = 16.0;

/// Player sprite selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerPose {
    /// On a brick, or still inside the coyote window
    Standing,
    Jumping,
    Falling,
}

/// Ball sprite selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BallPose {
    Round,
    /// Carried by the player or pinned on a brick
    Squashed,
}

/// Axis-aligned sprite rectangle in screen space (top-left anchored)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sprite {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Sprite {
    /// Map a world box (left x, bottom y) into screen space
    pub fn from_world(x: f32, y: f32, w: f32, h: f32, camera_y: f32, tuning: &Tuning) -> Self {
        Self {
            x: positive_fmod(x, tuning.screen_width),
            y: world_to_screen_y(y + h, camera_y, tuning.screen_height),
            w,
            h,
        }
    }

    /// Second copy drawn one screen to the left so the seam shows both halves
    pub fn wrap_copy(&self, screen_width: f32) -> Self {
        Self {
            x: self.x - screen_width,
            ..*self
        }
    }
}

/// A live brick's slot and where to draw it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BrickSprite {
    pub slot: usize,
    pub sprite: Sprite,
}

/// Everything a presenter needs for one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameView {
    pub tick: u64,
    pub camera_y: f32,
    pub player: Sprite,
    pub player_pose: PlayerPose,
    pub ball: Sprite,
    pub ball_pose: BallPose,
    /// Bricks intersecting the view, in slot order
    pub bricks: Vec<BrickSprite>,
    pub score: u32,
    pub high_score: u32,
    /// Most-significant digit first
    pub score_digits: Vec<u8>,
    pub high_score_digits: Vec<u8>,
    pub game_over: bool,
}

impl FrameView {
    pub fn capture(state: &GameState) -> Self {
        let t = &state.tuning;
        let camera_y = state.camera.y;

        let player = Sprite::from_world(
            state.player.pos.x,
            state.player.pos.y,
            t.player_width,
            t.player_height,
            camera_y,
            t,
        );

        let ball_pose = ball_pose(state);
        let diameter = t.ball_radius * 2.0;
        let ball_w = match ball_pose {
            BallPose::Round => diameter,
            BallPose::Squashed => diameter + SQUASH_WIDEN,
        };
        let ball = Sprite::from_world(
            state.ball.pos.x - ball_w * 0.5,
            state.ball.pos.y - t.ball_radius,
            ball_w,
            diameter,
            camera_y,
            t,
        );

        let view_top = camera_y + t.screen_height;
        let bricks = state
            .bricks
            .iter_live()
            .filter(|(_, b)| b.y + t.brick_height >= camera_y && b.y <= view_top)
            .map(|(slot, b)| BrickSprite {
                slot,
                sprite: Sprite::from_world(b.x, b.y, t.brick_width, t.brick_height, camera_y, t),
            })
            .collect();

        let high_score = state.high_score.best();
        Self {
            tick: state.time_ticks,
            camera_y,
            player,
            player_pose: player_pose(state),
            ball,
            ball_pose,
            bricks,
            score: state.score,
            high_score,
            score_digits: digits(state.score),
            high_score_digits: digits(high_score),
            game_over: state.is_game_over(),
        }
    }
}

/// Flip a world y (up) into a screen y (down) relative to the camera
#[inline]
pub fn world_to_screen_y(world_y: f32, camera_y: f32, screen_height: f32) -> f32 {
    screen_height - (world_y - camera_y)
}

pub fn player_pose(state: &GameState) -> PlayerPose {
    if state.is_grounded() || state.counters.air_time < state.tuning.coyote_time {
        PlayerPose::Standing
    } else if state.is_jumping() {
        PlayerPose::Jumping
    } else {
        PlayerPose::Falling
    }
}

pub fn ball_pose(state: &GameState) -> BallPose {
    if state.is_carrying() || state.is_bouncing() {
        BallPose::Squashed
    } else {
        BallPose::Round
    }
}

/// Decimal digits, most-significant first. Zero is a single `0`.
pub fn digits(mut n: u32) -> Vec<u8> {
    let mut out = Vec::new();
    loop {
        out.push((n % 10) as u8);
        n /= 10;
        if n == 0 {
            break;
        }
    }
    out.reverse();
    out
}
