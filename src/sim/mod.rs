//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by brick slot)
//! - No rendering, audio or platform dependencies

pub mod camera;
pub mod curves;
pub mod geometry;
pub mod ladder;
pub mod state;
pub mod tick;

pub use camera::Camera;
pub use curves::ResponseCurves;
pub use geometry::{Rect, circle_rect_overlap, circle_rect_wrapped, rect_overlap, rect_rect_wrapped};
pub use ladder::{Brick, BrickField, generate_ladder};
pub use state::{BallState, Body, Counters, GamePhase, GameState, PlayerState};
pub use tick::{FixedStep, TickInput, tick};
