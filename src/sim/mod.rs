//! Fixed-step simulation module
//!
//! All gameplay logic lives here. This module must stay free of engine,
//! audio and rendering dependencies:
//! - Fixed timestep only, timers counted in ticks
//! - Physics engine talks to it through `contact` (event queue + body mirrors)
//! - Feedback leaves as `GameEvent`s, never as direct calls

pub mod contact;
pub mod player;
pub mod puck;
pub mod reset;
pub mod state;
pub mod tick;

pub use contact::{Body, ContactEvent, ContactQueue, PhysicsEvent, Side, SurfaceTag, biased_bounce, reflect};
pub use player::{DashState, Player, PlayerInput};
pub use puck::Puck;
pub use reset::RoundReset;
pub use state::{GameEvent, GameState, GoalOutcome, Match, MatchPhase, TableLayout};
pub use tick::{TickInput, apply_physics_event, tick};
