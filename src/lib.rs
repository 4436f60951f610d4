//! Puck Duel - simulation core of a two-player arcade puck game
//!
//! Core modules:
//! - `sim`: Fixed-step simulation (puck bounce, dash abilities, round reset, match rules)
//! - `feedback`: Fire-and-forget VFX/HUD collaborators fed from simulation events
//! - `audio`: Sound effect routing with an optional playback backend
//! - `settings`: Data-driven tuning and preferences
//! - `error`: Error types shared across the crate

pub mod audio;
pub mod error;
pub mod feedback;
pub mod settings;
pub mod sim;

pub use error::{SettingsError, SimError};
pub use settings::{Settings, Tuning};

use glam::{Vec2, Vec3};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (physics clock)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Number of players in a match
    pub const PLAYER_COUNT: usize = 2;

    /// Match defaults
    pub const WIN_SCORE: u32 = 5;

    /// Player defaults
    pub const MOVE_SPEED: f32 = 10.0;
    pub const DASH_MULTIPLIER: f32 = 2.0;
    pub const DASH_DURATION_SECS: f32 = 0.25;
    pub const DASH_COOLDOWN_SECS: f32 = 2.0;

    /// Puck defaults
    /// Outward nudge added to a reflected direction so glancing hits leave the wall
    pub const BOUNCE_BIAS: f32 = 0.2;
    /// Startup window during which hit sounds are suppressed
    pub const GRACE_PERIOD_SECS: f32 = 0.1;

    /// Effects
    pub const HIT_EFFECT_OFFSET: f32 = 0.1;
    pub const EFFECT_LIFETIME_SECS: f32 = 2.0;
}

/// Convert a duration in seconds to a whole number of physics ticks (at least one)
#[inline]
pub fn secs_to_ticks(secs: f32) -> u32 {
    ((secs / consts::SIM_DT).round() as u32).max(1)
}

/// Lift a planar (x, z) input onto the table plane
#[inline]
pub fn planar_to_world(dir: Vec2) -> Vec3 {
    Vec3::new(dir.x, 0.0, dir.y)
}

/// Horizontal (table-plane) part of a world vector
#[inline]
pub fn horizontal(v: Vec3) -> Vec3 {
    Vec3::new(v.x, 0.0, v.z)
}
