//! Game state and core simulation types
//!
//! All state a level needs lives here, owned by one `GameState` that the
//! tick function mutates in place.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::camera::Camera;
use super::geometry::Rect;
use super::ladder::{BrickField, generate_ladder};
use crate::audio::{CueSink, SoundCue};
use crate::highscores::HighScore;
use crate::tuning::Tuning;

/// Current phase of play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Simulation advancing
    Playing,
    /// Ball fell off the bottom. Terminal until reset.
    GameOver,
}

/// A point mass. Player bodies are anchored at the bottom-left of their box,
/// the ball at its center.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Body {
    pub pos: Vec2,
    pub vel: Vec2,
}

impl Body {
    pub fn at(pos: Vec2) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
        }
    }

    /// Explicit Euler step
    #[inline]
    pub fn integrate(&mut self, dt: f32) {
        self.pos += self.vel * dt;
    }
}

/// Ball state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum BallState {
    /// Gravity-driven flight
    Free,
    /// Riding on top of the player, squashing before launch
    Carried {
        /// Horizontal offset from the player's x, fixed for the whole carry
        offset: f32,
        timer: u32,
        /// Direction inputs held at the moment the carry began
        left_at_entry: bool,
        right_at_entry: bool,
    },
    /// Pinned on top of a brick it just landed on
    BounceSquash {
        /// Slot of the brick being hit
        brick: usize,
        timer: u32,
        /// Velocity restored on release
        stored_vel: Vec2,
        /// Resting height restored on release
        stored_py: f32,
    },
}

/// Player contact state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerState {
    Grounded,
    Airborne {
        /// Still inside the jump's rise window
        jumping: bool,
    },
}

/// Step counters driving coyote time, jump buffering and jump duration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Counters {
    /// Steps since the player last stood on a brick
    pub air_time: u32,
    /// Steps spent rising in the current jump
    pub jump_time: u32,
    /// Steps since the jump button went down (saturating)
    pub since_jump_press: u32,
    /// Steps since the jump button came up (saturating)
    pub since_jump_release: u32,
}

impl Counters {
    fn fresh(max_time: u32) -> Self {
        Self {
            air_time: 0,
            jump_time: 0,
            since_jump_press: max_time,
            since_jump_release: max_time,
        }
    }
}

/// Complete level state (deterministic for a given seed and input sequence)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Seed the current level was generated from
    pub seed: u64,
    /// Origin landing center
    pub start: Vec2,
    pub tuning: Tuning,
    pub phase: GamePhase,
    /// Simulation tick counter for this level
    pub time_ticks: u64,

    pub player: Body,
    pub player_state: PlayerState,
    /// Brick supporting the player this step
    pub player_brick: Option<usize>,
    pub ball: Body,
    pub ball_state: BallState,

    /// Positions at the start of the current step
    pub last_player_pos: Vec2,
    pub last_ball_pos: Vec2,

    pub bricks: BrickField,
    pub camera: Camera,
    pub counters: Counters,

    pub score: u32,
    pub high_score: HighScore,

    /// Cues raised since the last dispatch
    #[serde(skip)]
    pub cues: Vec<SoundCue>,
}

impl GameState {
    /// Create a level from a seed with the default tuning
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, Tuning::default())
    }

    /// Create a level from a seed and explicit tuning.
    ///
    /// # Panics
    ///
    /// If `tuning` fails [`Tuning::validate`]. Tuning read from files is
    /// validated on load; hand-built tuning should be checked first.
    pub fn with_tuning(seed: u64, tuning: Tuning) -> Self {
        if let Err(e) = tuning.validate() {
            panic!("invalid tuning: {e}");
        }
        let mut state = Self {
            seed,
            start: Vec2::ZERO,
            tuning,
            phase: GamePhase::Playing,
            time_ticks: 0,
            player: Body::default(),
            player_state: PlayerState::Airborne { jumping: false },
            player_brick: None,
            ball: Body::default(),
            ball_state: BallState::Free,
            last_player_pos: Vec2::ZERO,
            last_ball_pos: Vec2::ZERO,
            bricks: BrickField::empty(),
            camera: Camera::default(),
            counters: Counters::default(),
            score: 0,
            high_score: HighScore::new(),
            cues: Vec::new(),
        };
        state.reset(seed);
        state
    }

    /// Reinitialize the level from a seed. The high score carries over.
    pub fn reset(&mut self, seed: u64) {
        let t = &self.tuning;
        let mut rng = Pcg32::seed_from_u64(seed);
        let start_x = rng.random_range(t.start_margin..=t.screen_width - t.start_margin);
        let start = Vec2::new(start_x, t.start_y);

        let bricks = generate_ladder(&mut rng, start, t);
        let ball = Body::at(Vec2::new(start.x, start.y + t.player_height * 6.0));
        let player = Body::at(Vec2::new(
            start.x - t.player_width * 0.5,
            start.y + t.player_height * 2.0,
        ));
        let counters = Counters::fresh(t.max_time);

        self.seed = seed;
        self.start = start;
        self.phase = GamePhase::Playing;
        self.time_ticks = 0;
        self.player = player;
        self.player_state = PlayerState::Airborne { jumping: false };
        self.player_brick = None;
        self.ball = ball;
        self.ball_state = BallState::Free;
        self.last_player_pos = player.pos;
        self.last_ball_pos = ball.pos;
        self.bricks = bricks;
        self.camera = Camera::new(start.y);
        self.counters = counters;
        self.score = 0;
        self.cues.clear();

        log::info!(
            "Level seed {} start ({:.1}, {:.1}), {} bricks",
            seed,
            start.x,
            start.y,
            self.bricks.live_count()
        );
    }

    /// Seed for the level after this one, derived so a captured first seed
    /// reproduces a whole session
    pub fn next_seed(&self) -> u64 {
        let mut rng = Pcg32::seed_from_u64(self.seed);
        rng.random()
    }

    /// Player collision box
    pub fn player_rect(&self) -> Rect {
        Rect::new(
            self.player.pos.x,
            self.player.pos.y,
            self.tuning.player_width,
            self.tuning.player_height,
        )
    }

    pub fn player_top(&self) -> f32 {
        self.player.pos.y + self.tuning.player_height
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    pub fn is_grounded(&self) -> bool {
        self.player_state == PlayerState::Grounded
    }

    pub fn is_jumping(&self) -> bool {
        self.player_state == PlayerState::Airborne { jumping: true }
    }

    pub fn is_carrying(&self) -> bool {
        matches!(self.ball_state, BallState::Carried { .. })
    }

    pub fn is_bouncing(&self) -> bool {
        matches!(self.ball_state, BallState::BounceSquash { .. })
    }

    /// Brick the ball is currently squashing on
    pub fn hit_brick(&self) -> Option<usize> {
        match self.ball_state {
            BallState::BounceSquash { brick, .. } => Some(brick),
            _ => None,
        }
    }

    /// Queue a sound cue for the presentation layer
    pub fn emit(&mut self, cue: SoundCue) {
        self.cues.push(cue);
    }

    /// Hand queued cues to a sink, oldest first
    pub fn dispatch_cues(&mut self, sink: &mut impl CueSink) {
        for cue in self.cues.drain(..) {
            sink.play(cue);
        }
    }

    /// Remove a brick for good and score it
    pub fn break_brick(&mut self, index: usize) {
        let brick = self.bricks.break_brick(index);
        self.score += 1;
        if self.high_score.submit(self.score) {
            log::debug!("New high score {}", self.score);
        }
        self.emit(SoundCue::BrickBreak);
        log::debug!(
            "Broke brick {} at ({:.1}, {:.1}), score {}",
            index,
            brick.x,
            brick.y,
            self.score
        );
    }
}
