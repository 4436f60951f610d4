//! Player movement and the dash ability
//!
//! Each player converts a planar input direction into a target velocity every
//! physics step and runs a tick-counted dash state machine:
//! `Ready -> Dashing -> CoolingDown -> Ready`.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use super::contact::{Body, Side};
use super::state::GameEvent;
use crate::planar_to_world;
use crate::settings::Tuning;

/// Dash ability state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DashState {
    /// Dash available
    #[default]
    Ready,
    /// Boosted speed, ticks until the boost ends
    Dashing { ticks_left: u32 },
    /// Baseline speed, ticks until the next dash is allowed
    CoolingDown { ticks_left: u32 },
}

/// Input for one player for a single tick
#[derive(Debug, Clone, Copy, Default)]
pub struct PlayerInput {
    /// Desired planar direction (x, z); any length, zero means stand still
    pub direction: Vec2,
    /// Dash key went down since the last tick (edge, not level)
    pub dash: bool,
}

/// A player-controlled striker
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub side: Side,
    pub body: Body,
    start_position: Vec3,
    base_move_speed: f32,
    move_speed: f32,
    dash_multiplier: f32,
    dash_duration_ticks: u32,
    dash_cooldown_ticks: u32,
    dash: DashState,
}

impl Player {
    pub fn new(side: Side, start_position: Vec3, tuning: &Tuning) -> Self {
        Self {
            side,
            body: Body::at(start_position),
            start_position,
            base_move_speed: tuning.move_speed,
            move_speed: tuning.move_speed,
            dash_multiplier: tuning.dash_multiplier,
            dash_duration_ticks: tuning.dash_duration_ticks(),
            dash_cooldown_ticks: tuning.dash_cooldown_ticks(),
            dash: DashState::Ready,
        }
    }

    pub fn start_position(&self) -> Vec3 {
        self.start_position
    }

    pub fn dash_state(&self) -> DashState {
        self.dash
    }

    /// Current movement speed (boosted while dashing)
    pub fn move_speed(&self) -> f32 {
        self.move_speed
    }

    pub fn base_move_speed(&self) -> f32 {
        self.base_move_speed
    }

    /// Advance one physics step: dash request, movement, then timers
    pub fn step(&mut self, input: &PlayerInput, events: &mut Vec<GameEvent>) {
        if input.dash {
            self.try_dash(input.direction, events);
        }
        self.apply_movement(input.direction);
        self.advance_dash_timer();
    }

    /// Start a dash if one is available. Returns whether it started.
    ///
    /// Requests while dashing or cooling down are dropped without touching
    /// speed or timers.
    pub fn try_dash(&mut self, direction: Vec2, events: &mut Vec<GameEvent>) -> bool {
        if self.dash != DashState::Ready {
            return false;
        }

        self.move_speed = self.base_move_speed * self.dash_multiplier;
        self.dash = DashState::Dashing {
            ticks_left: self.dash_duration_ticks,
        };

        // Trail points away from the direction of travel
        let dir = planar_to_world(direction).normalize_or_zero();
        let trail = (dir != Vec3::ZERO).then_some(-dir);

        log::debug!("Player {} dash started", self.side.player_number());
        events.push(GameEvent::DashStarted {
            side: self.side,
            position: self.body.position,
            trail,
        });
        true
    }

    /// Set the horizontal velocity from input; the vertical component is left
    /// to the engine.
    fn apply_movement(&mut self, direction: Vec2) {
        let planar = direction.normalize_or_zero() * self.move_speed;
        self.body.velocity = Vec3::new(planar.x, self.body.velocity.y, planar.y);
    }

    fn advance_dash_timer(&mut self) {
        self.dash = match self.dash {
            DashState::Ready => DashState::Ready,
            DashState::Dashing { ticks_left } => {
                let ticks_left = ticks_left.saturating_sub(1);
                if ticks_left == 0 {
                    self.move_speed = self.base_move_speed;
                    DashState::CoolingDown {
                        ticks_left: self.dash_cooldown_ticks,
                    }
                } else {
                    DashState::Dashing { ticks_left }
                }
            }
            DashState::CoolingDown { ticks_left } => {
                let ticks_left = ticks_left.saturating_sub(1);
                if ticks_left == 0 {
                    DashState::Ready
                } else {
                    DashState::CoolingDown { ticks_left }
                }
            }
        };
    }

    /// Stop and return to the spawn point. Dash state keeps running.
    pub fn reset_position(&mut self) {
        self.body.teleport(self.start_position);
    }

    /// Fresh match: spawn point, baseline speed, dash ready
    pub fn restart(&mut self) {
        self.reset_position();
        self.move_speed = self.base_move_speed;
        self.dash = DashState::Ready;
    }
}
