//! Fixed timestep simulation tick
//!
//! Core game loop that advances simulation deterministically. Each tick runs
//! the same stages in order: input latching, player and ball integration,
//! ball/player/brick contacts, camera follow, counters.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::{circle_rect_wrapped, rect_rect_wrapped};
use super::state::{BallState, GamePhase, GameState, PlayerState};
use crate::audio::SoundCue;
use crate::consts::{MAX_FRAME_TIME, MAX_SUBSTEPS, SIM_DT};

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TickInput {
    /// Held directions (level-triggered)
    pub left: bool,
    pub right: bool,
    pub down: bool,
    /// Jump button went down this tick
    pub jump_pressed: bool,
    /// Jump button came up this tick
    pub jump_released: bool,
    /// Restart the level with a fresh seed
    pub reset: bool,
}

impl TickInput {
    /// -1 for left, 1 for right, 0 for neither or both
    pub fn direction(&self) -> i8 {
        match (self.left, self.right) {
            (true, false) => -1,
            (false, true) => 1,
            _ => 0,
        }
    }

    /// Drop edge-triggered signals once they have been consumed
    pub fn clear_edges(&mut self) {
        self.jump_pressed = false;
        self.jump_released = false;
        self.reset = false;
    }
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput) {
    if input.reset {
        let seed = state.next_seed();
        log::debug!("Reset requested, next seed {}", seed);
        state.reset(seed);
        return;
    }

    if input.jump_pressed {
        state.counters.since_jump_press = 0;
    }
    if input.jump_released {
        state.counters.since_jump_release = 0;
    }

    if state.phase == GamePhase::GameOver {
        return;
    }

    state.time_ticks += 1;

    step_player(state, input, SIM_DT);
    step_ball(state, input, SIM_DT);
    check_fall_off(state);
    resolve_ball_player(state, input);
    resolve_bricks(state);

    let t = &state.tuning;
    state.camera.follow(
        t.camera_focus_bottom_margin,
        t.camera_move_factor,
        t.camera_epsilon,
    );

    update_counters(state);
}

/// Horizontal response, jump start/stop, gravity, integration
fn step_player(state: &mut GameState, input: &TickInput, dt: f32) {
    let t = &state.tuning;
    state.last_player_pos = state.player.pos;

    state.player.vel.x = t.curves().steer(state.player.vel.x, input.direction());

    let jumping = state.is_jumping();
    let grounded = state.is_grounded();
    let counters = state.counters;

    let buffered = counters.since_jump_press < t.time_to_buffer_jump;
    let can_jump = grounded || counters.air_time < t.coyote_time;
    if buffered && !jumping && can_jump {
        state.player.vel.y = t.player_jump_velocity;
        state.player_state = PlayerState::Airborne { jumping: true };
        // One press, one jump
        state.counters.since_jump_press = t.max_time;
        state.emit(SoundCue::JumpStart);
        log::debug!("Jump at tick {}", state.time_ticks);
    }

    let t = &state.tuning;
    if state.is_jumping() {
        let cut = t.variable_jump_height && input.jump_released && state.player.vel.y > 0.0;
        if cut {
            state.player.vel.y *= t.jump_release_attenuation;
        }
        if cut || state.counters.jump_time > t.time_to_max_jump {
            state.player_state = PlayerState::Airborne { jumping: false };
        }
    }

    let gravity = if !state.is_jumping() && input.down {
        state.tuning.fast_gravity
    } else {
        state.tuning.gravity
    };
    state.player.vel.y -= gravity * dt;
    state.player.integrate(dt);
}

/// Carry, bounce-squash or free flight
fn step_ball(state: &mut GameState, input: &TickInput, dt: f32) {
    state.last_ball_pos = state.ball.pos;
    let t = &state.tuning;

    match state.ball_state {
        BallState::Carried {
            offset,
            timer,
            left_at_entry,
            right_at_entry,
        } => {
            state.ball.pos.y = state.player_top() + t.ball_radius;
            if timer < t.time_to_squash {
                state.ball.pos.x = state.player.pos.x + offset;
                state.ball_state = BallState::Carried {
                    offset,
                    timer: timer + 1,
                    left_at_entry,
                    right_at_entry,
                };
            } else {
                let vx = match input.direction() {
                    -1 if left_at_entry => -t.ball_bounce_vx,
                    -1 => -t.ball_light_bounce_vx,
                    1 if right_at_entry => t.ball_bounce_vx,
                    1 => t.ball_light_bounce_vx,
                    _ => 0.0,
                };
                state.ball.vel = Vec2::new(vx, t.ball_bounce_vy);
                state.ball_state = BallState::Free;
                state.emit(SoundCue::BounceEnd);
                log::debug!("Ball launched off player, vx {:.1}", vx);
            }
        }
        BallState::BounceSquash {
            brick,
            timer,
            stored_vel,
            stored_py,
        } => {
            if timer < t.time_to_squash {
                state.ball_state = BallState::BounceSquash {
                    brick,
                    timer: timer + 1,
                    stored_vel,
                    stored_py,
                };
            } else {
                state.ball.vel = stored_vel;
                state.ball.pos.y = stored_py;
                state.ball_state = BallState::Free;
                state.break_brick(brick);
            }
        }
        BallState::Free => {
            state.ball.vel.y -= t.gravity * dt;
            state.ball.integrate(dt);
        }
    }
}

fn check_fall_off(state: &mut GameState) {
    if state.ball.pos.y + state.tuning.ball_radius < state.camera.y {
        state.phase = GamePhase::GameOver;
        state.emit(SoundCue::GameOver);
        log::debug!(
            "Game over at tick {}, score {}",
            state.time_ticks,
            state.score
        );
    }
}

/// Ball landing on the player starts a carry
fn resolve_ball_player(state: &mut GameState, input: &TickInput) {
    if state.is_carrying() {
        return;
    }

    let t = &state.tuning;
    let touching = circle_rect_wrapped(
        state.ball.pos,
        t.ball_radius,
        &state.player_rect(),
        t.screen_width,
    );
    let from_above = state.last_ball_pos.y > state.player_top();
    if !(touching && from_above && state.ball.vel.y <= 0.0) {
        return;
    }

    // A carry cuts a brick squash short; the brick still breaks.
    if let Some(brick) = state.hit_brick() {
        state.break_brick(brick);
    }

    state.ball_state = BallState::Carried {
        offset: state.ball.pos.x - state.player.pos.x,
        timer: 0,
        left_at_entry: input.left,
        right_at_entry: input.right,
    };
    state.emit(SoundCue::BounceStart);
    log::debug!("Ball caught at tick {}", state.time_ticks);
}

/// Ball-on-brick squashes and player ground contact
fn resolve_bricks(state: &mut GameState) {
    let t = state.tuning;
    state.player_brick = None;

    for index in 0..state.bricks.capacity() {
        let Some(brick) = state.bricks.get(index).copied() else {
            continue;
        };
        // Below the view: no collision
        if brick.y + t.brick_height < state.camera.y {
            continue;
        }
        let rect = brick.rect(&t);
        let top = brick.top(&t);

        if matches!(state.ball_state, BallState::Free) {
            let touching = circle_rect_wrapped(state.ball.pos, t.ball_radius, &rect, t.screen_width);
            let from_above = state.last_ball_pos.y - t.ball_radius + t.contact_epsilon > top;
            if touching && from_above && state.ball.vel.y < 0.0 {
                let rest_y = top + t.ball_radius;
                state.ball.pos.y = rest_y;
                state.ball_state = BallState::BounceSquash {
                    brick: index,
                    timer: 0,
                    stored_vel: Vec2::new(
                        state.ball.vel.x,
                        -t.ball_bounce_attenuation * state.ball.vel.y,
                    ),
                    stored_py: rest_y,
                };
                state.ball.vel = Vec2::ZERO;
                state.emit(SoundCue::BounceStart);
                log::debug!("Ball squashing on brick {}", index);
            }
        }

        let touching = rect_rect_wrapped(&state.player_rect(), &rect, t.screen_width);
        let from_above = state.last_player_pos.y + t.contact_epsilon > top;
        if touching && from_above && state.player.vel.y < 0.0 {
            state.camera.raise_focus(brick.y);
            state.player_brick = Some(index);
            state.player.pos.y = top;
            state.player.vel.y = 0.0;
            state.player_state = PlayerState::Grounded;
        }
    }

    if state.player_brick.is_none() && state.is_grounded() {
        state.player_state = PlayerState::Airborne { jumping: false };
    }
}

fn update_counters(state: &mut GameState) {
    let max_time = state.tuning.max_time;
    let c = &mut state.counters;

    match state.player_state {
        PlayerState::Grounded => {
            c.air_time = 0;
            c.jump_time = 0;
        }
        PlayerState::Airborne { jumping } => {
            c.air_time = c.air_time.saturating_add(1);
            if jumping {
                c.jump_time = c.jump_time.saturating_add(1);
            }
        }
    }

    c.since_jump_press = c.since_jump_press.saturating_add(1).min(max_time);
    c.since_jump_release = c.since_jump_release.saturating_add(1).min(max_time);
}

/// Fixed-timestep accumulator: turns variable frame time into whole ticks
#[derive(Debug, Clone, Default)]
pub struct FixedStep {
    accumulator: f32,
}

impl FixedStep {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run as many ticks as `frame_dt` covers (capped), returning the count.
    ///
    /// Edge-triggered inputs are consumed by the first tick only.
    pub fn advance(&mut self, state: &mut GameState, input: &TickInput, frame_dt: f32) -> u32 {
        self.accumulator += frame_dt.clamp(0.0, MAX_FRAME_TIME);

        let mut input = *input;
        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            tick(state, &input);
            input.clear_edges();
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        substeps
    }

    /// Fraction of a tick left in the accumulator (for render interpolation)
    pub fn alpha(&self) -> f32 {
        self.accumulator / SIM_DT
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::ladder::{Brick, BrickField};

    fn idle() -> TickInput {
        TickInput::default()
    }

    /// A state with no bricks, player parked far from the ball
    fn open_sky(seed: u64) -> GameState {
        let mut state = GameState::new(seed);
        state.bricks = BrickField::empty();
        state.player.pos = Vec2::new(state.start.x + 400.0, 2000.0);
        state.ball.pos = Vec2::new(state.start.x, 2000.0);
        state
    }

    #[test]
    fn test_drop_onto_player_carries_then_launches() {
        let mut state = GameState::new(12345);
        let input = idle();

        let mut ticks = 0;
        while !state.is_carrying() {
            let last_y = state.ball.pos.y;
            tick(&mut state, &input);
            ticks += 1;
            assert!(ticks < 300, "ball never reached the player");
            if state.is_carrying() {
                assert!(last_y > state.player_top());
            }
        }
        assert!(state.is_grounded());
        assert_eq!(state.cues.last(), Some(&SoundCue::BounceStart));

        let BallState::Carried { offset, .. } = state.ball_state else {
            unreachable!()
        };
        assert_eq!(offset, state.ball.pos.x - state.player.pos.x);

        let squash = state.tuning.time_to_squash;
        for _ in 0..squash {
            tick(&mut state, &input);
            let BallState::Carried { offset: kept, .. } = state.ball_state else {
                panic!("released early");
            };
            assert_eq!(kept, offset);
            assert_eq!(state.ball.pos.x, state.player.pos.x + offset);
        }

        tick(&mut state, &input);
        assert!(matches!(state.ball_state, BallState::Free));
        assert_eq!(state.ball.vel.x, 0.0);
        assert_eq!(state.ball.vel.y, state.tuning.ball_bounce_vy);
        assert_eq!(state.cues.last(), Some(&SoundCue::BounceEnd));
    }

    #[test]
    fn test_launch_direction_depends_on_entry_latch() {
        let mut state = GameState::new(7);
        let t = state.tuning;
        let right = TickInput {
            right: true,
            ..Default::default()
        };

        // Held since the catch: full bounce
        state.ball_state = BallState::Carried {
            offset: 0.0,
            timer: t.time_to_squash,
            left_at_entry: false,
            right_at_entry: true,
        };
        tick(&mut state, &right);
        assert_eq!(state.ball.vel.x, t.ball_bounce_vx);

        // Pressed during the carry: light bounce
        state.ball_state = BallState::Carried {
            offset: 0.0,
            timer: t.time_to_squash,
            left_at_entry: false,
            right_at_entry: false,
        };
        tick(&mut state, &right);
        assert_eq!(state.ball.vel.x, t.ball_light_bounce_vx);

        // Both held cancel out
        state.ball_state = BallState::Carried {
            offset: 0.0,
            timer: t.time_to_squash,
            left_at_entry: true,
            right_at_entry: true,
        };
        let both = TickInput {
            left: true,
            right: true,
            ..Default::default()
        };
        tick(&mut state, &both);
        assert_eq!(state.ball.vel.x, 0.0);
    }

    #[test]
    fn test_bounce_squash_breaks_brick() {
        let mut state = open_sky(3);
        let brick = Brick { x: 600.0, y: 300.0 };
        state.bricks.set(10, brick);
        state.ball.pos = Vec2::new(632.0, 400.0);
        state.ball.vel = Vec2::new(50.0, 0.0);
        let input = idle();

        let mut ticks = 0;
        while !state.is_bouncing() {
            tick(&mut state, &input);
            ticks += 1;
            assert!(ticks < 200, "ball never hit the brick");
        }
        assert_eq!(state.hit_brick(), Some(10));
        assert_eq!(state.ball.vel, Vec2::ZERO);
        let rest_y = brick.y + state.tuning.brick_height + state.tuning.ball_radius;
        assert_eq!(state.ball.pos.y, rest_y);

        let BallState::BounceSquash { stored_vel, .. } = state.ball_state else {
            unreachable!()
        };
        assert!(stored_vel.y > 0.0);
        assert_eq!(stored_vel.x, 50.0);

        let score = state.score;
        for _ in 0..state.tuning.time_to_squash {
            tick(&mut state, &input);
            assert!(state.is_bouncing());
            assert_eq!(state.ball.pos.y, rest_y);
        }
        tick(&mut state, &input);

        assert!(matches!(state.ball_state, BallState::Free));
        assert!(state.bricks.get(10).is_none());
        assert_eq!(state.score, score + 1);
        assert_eq!(state.ball.vel, stored_vel);
        assert_eq!(state.high_score.best(), state.score);
        assert!(state.cues.contains(&SoundCue::BrickBreak));
    }

    #[test]
    fn test_catch_during_squash_breaks_brick() {
        let mut state = open_sky(4);
        state.bricks.set(0, Brick { x: 600.0, y: 300.0 });
        state.ball.pos = Vec2::new(632.0, 326.0);
        state.ball_state = BallState::BounceSquash {
            brick: 0,
            timer: 2,
            stored_vel: Vec2::new(0.0, 300.0),
            stored_py: 326.0,
        };
        // Player top just under the pinned ball's center, touching it
        state.player.pos = Vec2::new(616.0, 326.0 - 5.0 - 32.0);
        state.player.vel = Vec2::ZERO;

        tick(&mut state, &idle());

        assert!(state.is_carrying());
        assert!(state.bricks.get(0).is_none());
        assert_eq!(state.score, 1);
        assert_eq!(
            &state.cues[state.cues.len() - 2..],
            &[SoundCue::BrickBreak, SoundCue::BounceStart]
        );
    }

    #[test]
    fn test_coyote_window_boundary() {
        let press = TickInput {
            jump_pressed: true,
            ..Default::default()
        };

        let mut state = open_sky(11);
        state.counters.air_time = state.tuning.coyote_time - 1;
        tick(&mut state, &press);
        assert!(state.is_jumping());
        assert!(state.cues.contains(&SoundCue::JumpStart));
        assert!(state.player.vel.y > 0.0);

        let mut state = open_sky(11);
        state.counters.air_time = state.tuning.coyote_time;
        tick(&mut state, &press);
        assert!(!state.is_jumping());
        assert!(!state.cues.contains(&SoundCue::JumpStart));
    }

    #[test]
    fn test_buffered_jump_fires_on_landing() {
        let mut state = open_sky(2);
        state.bricks.set(0, Brick { x: 1000.0, y: 1900.0 });
        state.player.pos = Vec2::new(1010.0, 1920.0);
        state.ball.pos = Vec2::new(200.0, 3000.0);
        state.counters.air_time = 100;
        let idle = idle();

        // Press while still falling, out of coyote time
        tick(
            &mut state,
            &TickInput {
                jump_pressed: true,
                ..Default::default()
            },
        );
        assert!(!state.is_jumping());

        let mut ticks = 0;
        while !state.is_jumping() {
            tick(&mut state, &idle);
            ticks += 1;
            assert!(ticks < state.tuning.time_to_buffer_jump, "buffer expired");
        }
        assert!(state.player.vel.y > 0.0);
    }

    #[test]
    fn test_jump_duration_caps() {
        let mut state = open_sky(5);
        state.counters.air_time = 0;
        let mut input = TickInput {
            jump_pressed: true,
            ..Default::default()
        };
        tick(&mut state, &input);
        assert!(state.is_jumping());

        input.clear_edges();
        let mut ticks = 0;
        while state.is_jumping() {
            tick(&mut state, &input);
            ticks += 1;
            assert!(ticks < 100);
        }
        assert_eq!(state.counters.jump_time, state.tuning.time_to_max_jump + 1);
    }

    #[test]
    fn test_variable_jump_cut() {
        let mut state = open_sky(6);
        state.tuning.variable_jump_height = true;
        state.counters.air_time = 0;
        tick(
            &mut state,
            &TickInput {
                jump_pressed: true,
                ..Default::default()
            },
        );
        let rising = state.player.vel.y;
        tick(
            &mut state,
            &TickInput {
                jump_released: true,
                ..Default::default()
            },
        );
        assert!(!state.is_jumping());
        let gravity_step = state.tuning.gravity * SIM_DT;
        let expected = rising * state.tuning.jump_release_attenuation - gravity_step;
        assert!((state.player.vel.y - expected).abs() < 1e-3);

        // The cut jump stays cut: the original press is spent
        let mut last_vy = state.player.vel.y;
        for _ in 0..10 {
            tick(&mut state, &idle());
            assert!(!state.is_jumping());
            assert!(state.player.vel.y < last_vy);
            last_vy = state.player.vel.y;
        }
        let jumps = state.cues.iter().filter(|&&c| c == SoundCue::JumpStart).count();
        assert_eq!(jumps, 1);
    }

    #[test]
    fn test_jump_spends_buffered_press() {
        let mut state = open_sky(16);
        state.counters.air_time = 0;
        tick(
            &mut state,
            &TickInput {
                jump_pressed: true,
                ..Default::default()
            },
        );
        assert!(state.is_jumping());
        assert_eq!(state.counters.since_jump_press, state.tuning.max_time);
    }

    /// Player parked at (600, 500) at rest, ball placed by the caller
    fn ball_over_player(ball_y: f32, ball_vy: f32) -> GameState {
        let mut state = open_sky(17);
        state.player.pos = Vec2::new(600.0, 500.0);
        state.player.vel = Vec2::ZERO;
        state.ball.pos = Vec2::new(616.0, ball_y);
        state.ball.vel = Vec2::new(0.0, ball_vy);
        state
    }

    #[test]
    fn test_ball_falling_onto_player_top_is_caught() {
        let mut state = ball_over_player(535.0, -50.0);
        tick(&mut state, &idle());
        assert!(state.is_carrying());
    }

    #[test]
    fn test_rising_ball_not_caught() {
        // Previous center above the player top, but moving up
        let mut state = ball_over_player(535.0, 100.0);
        tick(&mut state, &idle());
        assert!(state.ball.vel.y > 0.0);
        assert!(!state.is_carrying());
        assert!(!state.cues.contains(&SoundCue::BounceStart));
    }

    #[test]
    fn test_ball_from_below_player_top_not_caught() {
        // Falling and overlapping, but the previous center was under the top
        let mut state = ball_over_player(525.0, -50.0);
        tick(&mut state, &idle());
        assert!(state.last_ball_pos.y <= state.player_top());
        assert!(!state.is_carrying());
        assert!(!state.cues.contains(&SoundCue::BounceStart));
    }

    /// Brick at (600, 300) with top 316, player far away
    fn ball_over_brick(ball_y: f32, ball_vy: f32) -> GameState {
        let mut state = open_sky(18);
        state.bricks.set(10, Brick { x: 600.0, y: 300.0 });
        state.ball.pos = Vec2::new(632.0, ball_y);
        state.ball.vel = Vec2::new(0.0, ball_vy);
        state
    }

    #[test]
    fn test_ball_falling_onto_brick_top_squashes() {
        let mut state = ball_over_brick(327.0, -50.0);
        tick(&mut state, &idle());
        assert_eq!(state.hit_brick(), Some(10));
    }

    #[test]
    fn test_rising_ball_passes_through_brick() {
        let mut state = ball_over_brick(310.0, 200.0);
        for _ in 0..5 {
            tick(&mut state, &idle());
            assert!(!state.is_bouncing());
        }
        assert!(state.bricks.get(10).is_some());
        assert!(!state.cues.contains(&SoundCue::BounceStart));
    }

    #[test]
    fn test_ball_from_inside_brick_not_squashed() {
        // Previous bottom (310) already below the brick top
        let mut state = ball_over_brick(320.0, -50.0);
        tick(&mut state, &idle());
        assert!(!state.is_bouncing());
        assert!(state.ball.vel.y < 0.0);
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_rising_player_passes_up_through_brick() {
        let mut state = open_sky(19);
        state.bricks.set(0, Brick { x: 1000.0, y: 900.0 });
        state.player.pos = Vec2::new(1010.0, 880.0);
        state.player.vel = Vec2::new(0.0, 300.0);

        for _ in 0..10 {
            tick(&mut state, &idle());
            assert!(!state.is_grounded());
            assert_eq!(state.player_brick, None);
        }
        assert!(state.player.pos.y > 916.0);
        assert_eq!(state.camera.focus_y, state.start.y);
    }

    #[test]
    fn test_player_falling_inside_brick_does_not_land() {
        let mut state = open_sky(20);
        state.bricks.set(0, Brick { x: 1000.0, y: 900.0 });
        state.player.pos = Vec2::new(1010.0, 905.0);
        state.player.vel = Vec2::new(0.0, -10.0);

        tick(&mut state, &idle());
        assert!(!state.is_grounded());
        assert!(state.player.pos.y < 905.0);
    }

    #[test]
    fn test_player_lands_and_raises_focus() {
        let mut state = open_sky(9);
        state.bricks.set(3, Brick { x: 1000.0, y: 900.0 });
        state.player.pos = Vec2::new(1010.0, 920.0);
        let input = TickInput {
            down: true,
            ..Default::default()
        };

        let mut ticks = 0;
        while !state.is_grounded() {
            tick(&mut state, &input);
            ticks += 1;
            assert!(ticks < 60);
        }
        assert_eq!(state.player_brick, Some(3));
        assert_eq!(state.player.pos.y, 916.0);
        assert_eq!(state.player.vel.y, 0.0);
        assert_eq!(state.camera.focus_y, 900.0);
        assert_eq!(state.counters.air_time, 0);
    }

    #[test]
    fn test_lands_across_wrap_seam() {
        let mut state = open_sky(10);
        let width = state.tuning.screen_width;
        state.bricks.set(0, Brick { x: width - 20.0, y: 500.0 });
        state.player.pos = Vec2::new(5.0 + 3.0 * width, 520.0);

        let mut ticks = 0;
        while !state.is_grounded() {
            tick(&mut state, &idle());
            ticks += 1;
            assert!(ticks < 60);
        }
        assert_eq!(state.player_brick, Some(0));
    }

    #[test]
    fn test_offscreen_bricks_ignored() {
        let mut state = open_sky(12);
        state.camera.y = 1000.0;
        state.camera.focus_y = 1128.0;
        state.bricks.set(0, Brick { x: 1000.0, y: 900.0 });
        state.player.pos = Vec2::new(1010.0, 916.1);
        state.ball.pos = Vec2::new(200.0, 1500.0);

        tick(&mut state, &idle());
        assert!(!state.is_grounded());
        assert_eq!(state.player_brick, None);
        assert!(state.player.pos.y < 916.0);
    }

    #[test]
    fn test_game_over_freezes() {
        let mut state = open_sky(13);
        state.camera.y = 1990.0;
        state.camera.focus_y = 2118.0;
        state.ball.pos = Vec2::new(200.0, 1979.0);
        state.ball.vel = Vec2::new(0.0, -100.0);

        tick(&mut state, &idle());
        assert!(state.is_game_over());
        assert!(state.cues.contains(&SoundCue::GameOver));

        let frozen = state.ball;
        let ticks = state.time_ticks;
        for _ in 0..10 {
            tick(&mut state, &idle());
        }
        assert_eq!(state.ball, frozen);
        assert_eq!(state.time_ticks, ticks);
    }

    #[test]
    fn test_reset_regenerates_level() {
        let mut state = GameState::new(77);
        state.break_brick(5);
        state.phase = GamePhase::GameOver;
        let old_seed = state.seed;

        tick(
            &mut state,
            &TickInput {
                reset: true,
                ..Default::default()
            },
        );

        assert_ne!(state.seed, old_seed);
        assert_eq!(state.score, 0);
        assert!(!state.is_game_over());
        assert_eq!(state.high_score.best(), 1);
        let t = &state.tuning;
        assert_eq!(state.ball.pos, Vec2::new(state.start.x, state.start.y + 6.0 * t.player_height));
        assert_eq!(state.player.pos.y, state.start.y + 2.0 * t.player_height);
        let first_landing: Vec<_> = state
            .bricks
            .iter_live()
            .filter(|(_, b)| b.y == state.start.y)
            .collect();
        assert_eq!(first_landing.len(), 3);
    }

    #[test]
    fn test_counters_saturate() {
        let mut state = open_sky(14);
        let max = state.tuning.max_time;
        state.counters.since_jump_press = max;
        state.counters.since_jump_release = max - 1;
        tick(&mut state, &idle());
        assert_eq!(state.counters.since_jump_press, max);
        assert_eq!(state.counters.since_jump_release, max);

        tick(
            &mut state,
            &TickInput {
                jump_released: true,
                ..Default::default()
            },
        );
        assert_eq!(state.counters.since_jump_release, 1);
    }

    #[test]
    fn test_determinism() {
        let mut state1 = GameState::new(99999);
        let mut state2 = GameState::new(99999);

        let inputs = [
            TickInput {
                right: true,
                ..Default::default()
            },
            TickInput {
                right: true,
                jump_pressed: true,
                ..Default::default()
            },
            TickInput {
                left: true,
                down: true,
                ..Default::default()
            },
            TickInput::default(),
        ];

        for _ in 0..50 {
            for input in &inputs {
                tick(&mut state1, input);
                tick(&mut state2, input);
            }
        }

        assert_eq!(state1.time_ticks, state2.time_ticks);
        assert_eq!(state1.player, state2.player);
        assert_eq!(state1.ball, state2.ball);
        assert_eq!(state1.bricks, state2.bricks);
        assert_eq!(state1.cues, state2.cues);
    }

    #[test]
    fn test_fixed_step_consumes_edges_once() {
        let mut state = open_sky(15);
        // Out of coyote time, so the press stays buffered
        state.counters.air_time = 100;
        let mut stepper = FixedStep::new();
        let input = TickInput {
            jump_pressed: true,
            ..Default::default()
        };

        let ran = stepper.advance(&mut state, &input, 3.5 * SIM_DT);
        assert_eq!(ran, 3);
        assert_eq!(state.time_ticks, 3);
        // Pressed on the first substep, counted up on each
        assert_eq!(state.counters.since_jump_press, 3);
        assert!(stepper.alpha() > 0.4 && stepper.alpha() < 0.6);

        // Long stalls are clamped
        let ran = stepper.advance(&mut state, &TickInput::default(), 5.0);
        assert!(ran <= MAX_SUBSTEPS);
    }
}
