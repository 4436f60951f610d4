//! Physics surface adapter
//!
//! The physics engine (broad/narrow phase, integration) lives outside the core.
//! It reports what happened during its step by pushing [`PhysicsEvent`]s into a
//! [`ContactQueue`], and reads/writes [`Body`] mirrors for each simulated body.
//! The tick drains the queue exactly once per physics step, before any movement
//! update, so collision response is plain data in, plain data out.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Which half of the table (and which player) something belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// Player 1
    Left,
    /// Player 2
    Right,
}

impl Side {
    pub const ALL: [Side; 2] = [Side::Left, Side::Right];

    pub fn opponent(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }

    /// Index into per-player arrays
    pub fn index(self) -> usize {
        match self {
            Side::Left => 0,
            Side::Right => 1,
        }
    }

    /// 1-based player number shown to humans
    pub fn player_number(self) -> u8 {
        self.index() as u8 + 1
    }
}

/// Tag of the collider the puck touched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SurfaceTag {
    Wall,
    /// Goal trigger volume guarded by the given side
    Goal(Side),
    Player(Side),
    Other,
}

impl SurfaceTag {
    /// Map an engine tag string onto the core vocabulary
    pub fn from_engine_tag(tag: &str) -> Self {
        match tag {
            "Wall" => SurfaceTag::Wall,
            "GoalLeft" => SurfaceTag::Goal(Side::Left),
            "GoalRight" => SurfaceTag::Goal(Side::Right),
            "Player1" => SurfaceTag::Player(Side::Left),
            "Player2" => SurfaceTag::Player(Side::Right),
            _ => SurfaceTag::Other,
        }
    }
}

/// A single collision contact, consumed synchronously during the tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactEvent {
    /// Surface normal at the contact, pointing away from the other collider
    pub normal: Vec3,
    /// World-space contact point
    pub point: Vec3,
    /// Relative velocity of the two bodies at impact
    pub relative_velocity: Vec3,
    /// What the puck hit
    pub other: SurfaceTag,
}

impl ContactEvent {
    pub fn new(normal: Vec3, point: Vec3, other: SurfaceTag) -> Self {
        Self {
            normal,
            point,
            relative_velocity: Vec3::ZERO,
            other,
        }
    }

    pub fn with_relative_velocity(mut self, relative_velocity: Vec3) -> Self {
        self.relative_velocity = relative_velocity;
        self
    }

    /// Unit normal (zero if the engine reported a degenerate one)
    pub fn unit_normal(&self) -> Vec3 {
        self.normal.normalize_or_zero()
    }
}

/// Events reported by the physics engine for the puck during one step
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PhysicsEvent {
    /// Puck entered a goal trigger guarded by the given side
    TriggerEnter(Side),
    /// Puck left a goal trigger
    TriggerExit(Side),
    /// Puck started touching a collider
    CollisionEnter(ContactEvent),
}

impl PhysicsEvent {
    /// Build a trigger-enter event from an engine tag; non-goal tags yield `None`
    pub fn trigger_enter(tag: &str) -> Option<Self> {
        match SurfaceTag::from_engine_tag(tag) {
            SurfaceTag::Goal(side) => Some(PhysicsEvent::TriggerEnter(side)),
            _ => None,
        }
    }
}

/// Per-step event queue filled by the physics engine and drained by the tick
#[derive(Debug, Default)]
pub struct ContactQueue {
    events: Vec<PhysicsEvent>,
}

impl ContactQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: PhysicsEvent) {
        self.events.push(event);
    }

    pub fn collision(&mut self, contact: ContactEvent) {
        self.push(PhysicsEvent::CollisionEnter(contact));
    }

    pub fn goal_entered(&mut self, goal: Side) {
        self.push(PhysicsEvent::TriggerEnter(goal));
    }

    pub fn goal_exited(&mut self, goal: Side) {
        self.push(PhysicsEvent::TriggerExit(goal));
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Take every queued event in arrival order
    pub fn drain(&mut self) -> Vec<PhysicsEvent> {
        std::mem::take(&mut self.events)
    }
}

/// Rigid-body mirror shared with the physics engine.
///
/// The engine writes integrated position/velocity back each step; the core
/// writes velocities and teleports. A kinematic body is excluded from
/// physics-driven movement (immovable in impulses) but still accepts explicit
/// position writes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub position: Vec3,
    pub velocity: Vec3,
    pub angular_velocity: Vec3,
    pub kinematic: bool,
}

impl Body {
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            velocity: Vec3::ZERO,
            angular_velocity: Vec3::ZERO,
            kinematic: false,
        }
    }

    /// Stop all motion and place the body
    pub fn teleport(&mut self, position: Vec3) {
        self.velocity = Vec3::ZERO;
        self.angular_velocity = Vec3::ZERO;
        self.position = position;
    }
}

/// Reflect a vector off a surface with the given unit normal
#[inline]
pub fn reflect(v: Vec3, normal: Vec3) -> Vec3 {
    v - 2.0 * v.dot(normal) * normal
}

/// Elastic bounce with an outward bias.
///
/// The incoming direction is reflected, nudged along the normal by `bias` and
/// renormalized, then scaled back to the incoming speed. Speed is preserved
/// exactly; the nudge keeps near-tangential hits from re-entering the wall.
pub fn biased_bounce(incoming: Vec3, normal: Vec3, bias: f32) -> Vec3 {
    let speed = incoming.length();
    let n = normal.normalize_or_zero();
    let reflected = reflect(incoming.normalize_or_zero(), n);
    let direction = (reflected + n * bias).normalize_or_zero();
    direction * speed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reflect_velocity() {
        // Moving right, hits a wall whose normal points left
        let reflected = reflect(Vec3::new(100.0, 0.0, 0.0), Vec3::new(-1.0, 0.0, 0.0));
        assert!((reflected.x + 100.0).abs() < 0.001);
        assert!(reflected.z.abs() < 0.001);
    }

    #[test]
    fn test_biased_bounce_head_on() {
        let out = biased_bounce(Vec3::new(0.0, 0.0, -4.0), Vec3::Z, 0.2);
        assert!((out - Vec3::new(0.0, 0.0, 4.0)).length() < 1e-4);
    }

    #[test]
    fn test_biased_bounce_zero_velocity() {
        assert_eq!(biased_bounce(Vec3::ZERO, Vec3::X, 0.2), Vec3::ZERO);
    }

    #[test]
    fn test_engine_tags() {
        assert_eq!(SurfaceTag::from_engine_tag("Wall"), SurfaceTag::Wall);
        assert_eq!(
            SurfaceTag::from_engine_tag("GoalLeft"),
            SurfaceTag::Goal(Side::Left)
        );
        assert_eq!(SurfaceTag::from_engine_tag("Bumper"), SurfaceTag::Other);
        assert_eq!(
            PhysicsEvent::trigger_enter("GoalRight"),
            Some(PhysicsEvent::TriggerEnter(Side::Right))
        );
        assert_eq!(PhysicsEvent::trigger_enter("Wall"), None);
    }

    #[test]
    fn test_queue_drains_in_order() {
        let mut queue = ContactQueue::new();
        queue.goal_entered(Side::Left);
        queue.collision(ContactEvent::new(Vec3::X, Vec3::ZERO, SurfaceTag::Wall));
        assert_eq!(queue.len(), 2);

        let events = queue.drain();
        assert!(queue.is_empty());
        assert_eq!(events[0], PhysicsEvent::TriggerEnter(Side::Left));
        assert!(matches!(events[1], PhysicsEvent::CollisionEnter(_)));
    }

    #[test]
    fn test_side_helpers() {
        assert_eq!(Side::Left.opponent(), Side::Right);
        assert_eq!(Side::Right.index(), 1);
        assert_eq!(Side::Left.player_number(), 1);
    }

    #[test]
    fn test_body_teleport() {
        let mut body = Body::at(Vec3::ONE);
        body.velocity = Vec3::X;
        body.angular_velocity = Vec3::Y;
        body.teleport(Vec3::ZERO);
        assert_eq!(body, Body::at(Vec3::ZERO));
    }
}
