//! Puck dynamics
//!
//! Owns the puck body, answers wall contacts with a biased elastic bounce,
//! maps goal triggers to the scoring side and exposes the freeze/reset hooks
//! used by the round reset.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::contact::{Body, ContactEvent, Side, SurfaceTag, biased_bounce};
use super::state::GameEvent;
use crate::consts::HIT_EFFECT_OFFSET;
use crate::error::SimError;

/// The puck
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Puck {
    /// Engine-facing body (kinematic while frozen)
    pub body: Body,
    start_position: Vec3,
    /// Velocity at the end of the previous physics step, before the engine
    /// resolved this step's penetration
    prev_velocity: Vec3,
    frozen: bool,
    /// Ticks left before hit feedback becomes audible
    grace_ticks: u32,
    /// Goal trigger the puck is currently inside (trigger-enter latch)
    in_goal: Option<Side>,
}

impl Puck {
    pub fn new(start_position: Vec3, grace_ticks: u32) -> Self {
        Self {
            body: Body::at(start_position),
            start_position,
            prev_velocity: Vec3::ZERO,
            frozen: false,
            grace_ticks,
            in_goal: None,
        }
    }

    pub fn start_position(&self) -> Vec3 {
        self.start_position
    }

    pub fn prev_velocity(&self) -> Vec3 {
        self.prev_velocity
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// True while the startup grace period still mutes hit feedback
    pub fn in_grace(&self) -> bool {
        self.grace_ticks > 0
    }

    /// Give the puck a velocity as if it had been moving since the last step
    pub fn launch(&mut self, velocity: Vec3) {
        self.body.velocity = velocity;
        self.prev_velocity = velocity;
    }

    /// Restart the startup grace window (new match)
    pub fn restart_grace(&mut self, ticks: u32) {
        self.grace_ticks = ticks;
    }

    /// Handle a collision-enter reported by the physics engine.
    ///
    /// Ignored entirely while frozen. Otherwise emits a hit (muted during the
    /// grace period) and applies the wall bounce for wall contacts.
    pub fn on_collision(&mut self, contact: &ContactEvent, bounce_bias: f32, events: &mut Vec<GameEvent>) {
        if self.frozen {
            return;
        }

        let normal = contact.unit_normal();
        events.push(GameEvent::Hit {
            point: contact.point + normal * HIT_EFFECT_OFFSET,
            normal,
            audible: !self.in_grace(),
        });

        if contact.other == SurfaceTag::Wall {
            self.on_wall_contact(contact, bounce_bias);
        }
    }

    /// Bounce off a wall.
    ///
    /// Uses the previous step's velocity: by the time the contact is reported
    /// the engine may already have altered the current one.
    pub fn on_wall_contact(&mut self, contact: &ContactEvent, bounce_bias: f32) {
        if self.frozen {
            return;
        }
        self.body.velocity = biased_bounce(self.prev_velocity, contact.normal, bounce_bias);
    }

    /// Handle entry into a goal trigger guarded by `goal`.
    ///
    /// Returns the side credited with the goal (the opponent of the goal's
    /// owner), or `None` when frozen or already inside that trigger.
    pub fn on_goal_trigger(&mut self, goal: Side) -> Option<Side> {
        if self.frozen || self.in_goal == Some(goal) {
            return None;
        }
        self.in_goal = Some(goal);
        Some(goal.opponent())
    }

    pub fn on_goal_exit(&mut self, goal: Side) {
        if self.in_goal == Some(goal) {
            self.in_goal = None;
        }
    }

    /// Take the puck out of collision response and goal detection
    pub fn freeze(&mut self) {
        debug_assert!(!self.frozen, "puck frozen twice");
        if self.frozen {
            log::warn!("Ignoring freeze of an already frozen puck");
            return;
        }
        self.frozen = true;
        self.body.kinematic = true;
    }

    pub fn unfreeze(&mut self) {
        debug_assert!(self.frozen, "unfreezing a live puck");
        if !self.frozen {
            log::warn!("Ignoring unfreeze of a live puck");
            return;
        }
        self.frozen = false;
        self.body.kinematic = false;
    }

    /// Stop the puck and put it back on its spawn point. Requires a frozen puck.
    pub fn reset(&mut self) -> Result<(), SimError> {
        debug_assert!(self.frozen, "puck reset while live");
        if !self.frozen {
            return Err(SimError::ResetWhileLive);
        }
        self.body.teleport(self.start_position);
        self.prev_velocity = Vec3::ZERO;
        self.in_goal = None;
        Ok(())
    }

    /// End-of-step bookkeeping: sample velocity for the next step's bounces
    /// and advance the grace timer.
    pub fn end_step(&mut self) {
        self.prev_velocity = self.body.velocity;
        self.grace_ticks = self.grace_ticks.saturating_sub(1);
    }
}
