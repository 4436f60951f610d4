//! Puck Duel headless runner
//!
//! Plays a scripted match on a toy box table and logs what happens. The table
//! surface below stands in for a real physics engine: it integrates bodies,
//! resolves penetration crudely and reports contacts through the same queue a
//! real engine adapter would fill.
//!
//! Usage: `puck-duel [settings.json]`

use glam::{Vec2, Vec3};

use puck_duel::Settings;
use puck_duel::audio::{AudioManager, SoundBackend, SoundEffect};
use puck_duel::consts::*;
use puck_duel::feedback::Feedback;
use puck_duel::horizontal;
use puck_duel::sim::{
    ContactEvent, ContactQueue, GameState, MatchPhase, Side, SurfaceTag, TableLayout, TickInput,
    tick,
};

/// Table half extents
const HALF_LENGTH: f32 = 8.0;
const HALF_WIDTH: f32 = 4.5;
const GOAL_HALF_WIDTH: f32 = 1.5;

const PUCK_RADIUS: f32 = 0.3;
const PLAYER_RADIUS: f32 = 0.5;
const SERVE_SPEED: f32 = 9.0;

/// Presentation frame rate of the demo loop
const FRAME_DT: f32 = 1.0 / 60.0;
/// Give up after two minutes of play
const MAX_FRAMES: u32 = 60 * 120;

/// Logs sounds instead of playing them
struct LogSound;

impl SoundBackend for LogSound {
    fn play(&mut self, effect: SoundEffect, volume: f32) {
        log::debug!("sound {effect:?} @ {volume:.2}");
    }
}

/// Toy physics surface: box table with goal mouths on the short walls
#[derive(Default)]
struct TableSurface {
    contacts: ContactQueue,
}

impl TableSurface {
    fn step(&mut self, state: &mut GameState, dt: f32) {
        for player in &mut state.players {
            player.body.position += player.body.velocity * dt;
            let (min_x, max_x) = match player.side {
                Side::Left => (-HALF_LENGTH + PLAYER_RADIUS, -PLAYER_RADIUS),
                Side::Right => (PLAYER_RADIUS, HALF_LENGTH - PLAYER_RADIUS),
            };
            player.body.position.x = player.body.position.x.clamp(min_x, max_x);
            player.body.position.z = player
                .body
                .position
                .z
                .clamp(-HALF_WIDTH + PLAYER_RADIUS, HALF_WIDTH - PLAYER_RADIUS);
        }

        let puck = &mut state.puck;
        if puck.body.kinematic {
            return;
        }
        puck.body.position += puck.body.velocity * dt;
        let p = puck.body.position;

        let z_limit = HALF_WIDTH - PUCK_RADIUS;
        if p.z.abs() > z_limit {
            let side = p.z.signum();
            puck.body.position.z = z_limit * side;
            // Penetration resolution eats the normal component
            puck.body.velocity.z = 0.0;
            let point = Vec3::new(p.x, p.y, HALF_WIDTH * side);
            self.contacts
                .collision(ContactEvent::new(Vec3::new(0.0, 0.0, -side), point, SurfaceTag::Wall));
        }

        let x_limit = HALF_LENGTH - PUCK_RADIUS;
        if p.x.abs() > x_limit {
            let side = p.x.signum();
            if p.z.abs() < GOAL_HALF_WIDTH {
                let goal = if side < 0.0 { Side::Left } else { Side::Right };
                self.contacts.goal_entered(goal);
            } else {
                puck.body.position.x = x_limit * side;
                puck.body.velocity.x = 0.0;
                let point = Vec3::new(HALF_LENGTH * side, p.y, p.z);
                self.contacts
                    .collision(ContactEvent::new(Vec3::new(-side, 0.0, 0.0), point, SurfaceTag::Wall));
            }
        }

        for player in &state.players {
            let offset = horizontal(puck.body.position - player.body.position);
            let dist = offset.length();
            let reach = PUCK_RADIUS + PLAYER_RADIUS;
            if dist >= reach || dist <= f32::EPSILON {
                continue;
            }
            let normal = offset / dist;
            let relative = puck.body.velocity - player.body.velocity;
            let closing = relative.dot(normal);
            if closing < 0.0 {
                puck.body.velocity -= 2.0 * closing * normal;
            }
            puck.body.position += normal * (reach - dist);
            self.contacts.collision(
                ContactEvent::new(normal, player.body.position + normal * PLAYER_RADIUS, SurfaceTag::Player(player.side))
                    .with_relative_velocity(relative),
            );
        }
    }
}

/// Game instance holding all state
struct Game {
    state: GameState,
    surface: TableSurface,
    feedback: Feedback,
    accumulator: f32,
    input: TickInput,
    serves: u32,
}

impl Game {
    fn new(settings: &Settings) -> Self {
        let layout = TableLayout::default();
        let mut audio = AudioManager::new(Some(Box::new(LogSound)));
        audio.start_music();
        Self {
            state: GameState::new(settings.tuning.clone(), layout.clone()),
            surface: TableSurface::default(),
            feedback: Feedback::new(settings, &layout, audio),
            accumulator: 0.0,
            input: TickInput::default(),
            serves: 0,
        }
    }

    /// Scripted strikers: sway across the goal mouth, dash every few seconds
    fn script_input(&mut self) {
        let t = self.state.time_ticks as f32 * SIM_DT;
        for side in Side::ALL {
            let phase = side.index() as f32 * 1.7;
            let target_z = (t * 0.9 + phase).sin() * GOAL_HALF_WIDTH * 1.5;
            let player = self.state.player(side);
            let dz = target_z - player.body.position.z;
            let dx = player.start_position().x - player.body.position.x;
            let input = &mut self.input.players[side.index()];
            input.direction = Vec2::new(dx, dz).clamp_length_max(1.0);
            if self.state.time_ticks % (180 + 60 * side.index() as u64) == 0 {
                input.dash = true;
            }
        }
    }

    /// Put a resting puck back into play, alternating direction
    fn serve_if_idle(&mut self) {
        let puck = &mut self.state.puck;
        if puck.is_frozen() || puck.body.velocity != Vec3::ZERO {
            return;
        }
        let angle = 0.35 + 0.2 * (self.serves % 3) as f32;
        let dir = if self.serves % 2 == 0 { 1.0 } else { -1.0 };
        puck.launch(Vec3::new(dir * angle.cos(), 0.0, angle.sin()) * SERVE_SPEED);
        self.serves += 1;
    }

    /// Run simulation ticks for one presentation frame
    fn update(&mut self, dt: f32) {
        let dt = dt.min(0.1);
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.script_input();
            if self.state.game.phase() == MatchPhase::Playing {
                self.serve_if_idle();
            }

            tick(&mut self.state, &self.input, &mut self.surface.contacts);
            if !self.state.is_time_frozen() {
                self.surface.step(&mut self.state, SIM_DT);
            }
            self.feedback.dispatch(self.state.drain_events());

            self.accumulator -= SIM_DT;
            substeps += 1;

            // Clear one-shot inputs after processing
            for player in &mut self.input.players {
                player.dash = false;
            }
            self.input.pause = false;
            self.input.restart = false;
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let settings = match std::env::args().nth(1) {
        Some(path) => Settings::load(&path).unwrap_or_else(|err| {
            log::error!("{err}; falling back to default settings");
            Settings::default()
        }),
        None => Settings::default(),
    };

    let mut game = Game::new(&settings);
    let mut frames = 0;
    while frames < MAX_FRAMES && !game.state.game.is_over() {
        game.update(FRAME_DT);
        frames += 1;
    }

    let [left, right] = game.state.game.scores();
    match game.state.game.winner() {
        Some(winner) => log::info!(
            "Player {} won {left}-{right} after {:.1}s",
            winner.player_number(),
            game.state.time_ticks as f32 * SIM_DT
        ),
        None => log::info!("No winner after {frames} frames ({left}-{right})"),
    }
}
