//! Presentation feedback
//!
//! Turns simulation [`GameEvent`]s into calls on the host's audio, VFX and HUD
//! collaborators. Every collaborator is optional and every call is
//! fire-and-forget: nothing here can influence gameplay.

use glam::Vec3;

use crate::audio::{AudioManager, SoundEffect};
use crate::consts::EFFECT_LIFETIME_SECS;
use crate::settings::Settings;
use crate::sim::{GameEvent, Side, TableLayout};

/// Visual effect kinds the core asks for
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EffectKind {
    /// Flash at the goal that conceded
    GoalFlash { goal: Side },
    /// Flash when the match is decided
    GameOverFlash { winner: Side },
    /// Contact particles
    HitSparks,
    /// Trail behind a dashing player
    DashTrail { side: Side },
    /// Squash/stretch on the dashing player; cosmetic only
    SquashStretch { side: Side },
}

/// One effect spawn request
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffectRequest {
    pub kind: EffectKind,
    pub position: Vec3,
    /// Facing direction (unit, or zero when undirected)
    pub direction: Vec3,
    /// Seconds before the host should despawn the effect
    pub lifetime: f32,
}

/// VFX collaborator
pub trait EffectSpawner {
    fn spawn(&mut self, request: EffectRequest);
}

/// Winner display data
#[derive(Debug, Clone, PartialEq)]
pub struct WinnerBanner {
    pub side: Side,
    pub label: String,
    /// Linear RGBA
    pub color: [f32; 4],
}

impl WinnerBanner {
    pub fn for_side(side: Side) -> Self {
        let color = match side {
            Side::Left => [0.2, 0.55, 1.0, 1.0],
            Side::Right => [1.0, 0.3, 0.25, 1.0],
        };
        Self {
            side,
            label: format!("Player {} Wins!", side.player_number()),
            color,
        }
    }
}

/// Scoreboard / menu collaborator
pub trait Hud {
    fn show_score(&mut self, score: [u32; 2]);
    fn show_winner(&mut self, banner: &WinnerBanner);
    fn hide_winner(&mut self);
    fn show_pause_menu(&mut self, visible: bool);
    /// Whether the pause key may open the menu
    fn set_pause_enabled(&mut self, enabled: bool);
}

/// Event dispatcher for all presentation collaborators
pub struct Feedback {
    pub audio: AudioManager,
    effects: Option<Box<dyn EffectSpawner>>,
    hud: Option<Box<dyn Hud>>,
    goal_centers: [Vec3; 2],
    particles: bool,
    trails: bool,
    squash_stretch: bool,
    flashes: bool,
}

impl Feedback {
    pub fn new(settings: &Settings, layout: &TableLayout, mut audio: AudioManager) -> Self {
        audio.set_master_volume(settings.master_volume);
        audio.set_sfx_volume(settings.sfx_volume);
        audio.set_music_volume(settings.music_volume);
        Self {
            audio,
            effects: None,
            hud: None,
            goal_centers: layout.goal_centers,
            particles: settings.particles,
            trails: settings.trails,
            squash_stretch: settings.effective_squash_stretch(),
            flashes: settings.effective_flashes(),
        }
    }

    pub fn with_effects(mut self, effects: Box<dyn EffectSpawner>) -> Self {
        self.effects = Some(effects);
        self
    }

    pub fn with_hud(mut self, hud: Box<dyn Hud>) -> Self {
        self.hud = Some(hud);
        self
    }

    /// Dispatch a batch of events in order
    pub fn dispatch(&mut self, events: impl IntoIterator<Item = GameEvent>) {
        for event in events {
            self.handle(&event);
        }
    }

    pub fn handle(&mut self, event: &GameEvent) {
        match *event {
            GameEvent::GoalScored {
                conceded, score, ..
            } => {
                self.audio.play(SoundEffect::Goal);
                if let Some(hud) = self.hud.as_mut() {
                    hud.show_score(score);
                }
                if self.flashes {
                    let goal = self.goal_centers[conceded.index()];
                    // Flash faces into the table
                    let inward = Vec3::new(-goal.x, 0.0, -goal.z).normalize_or_zero();
                    self.spawn(EffectKind::GoalFlash { goal: conceded }, goal, inward);
                }
            }
            GameEvent::GameOver { winner, score } => {
                self.audio.play(SoundEffect::GameOver);
                if let Some(hud) = self.hud.as_mut() {
                    hud.show_score(score);
                    hud.set_pause_enabled(false);
                    hud.show_winner(&WinnerBanner::for_side(winner));
                }
                if self.flashes {
                    self.spawn(EffectKind::GameOverFlash { winner }, Vec3::ZERO, Vec3::Y);
                }
            }
            GameEvent::Hit {
                point,
                normal,
                audible,
            } => {
                if audible {
                    self.audio.play(SoundEffect::Hit);
                }
                if self.particles {
                    self.spawn(EffectKind::HitSparks, point, normal);
                }
            }
            GameEvent::DashStarted {
                side,
                position,
                trail,
            } => {
                self.audio.play(SoundEffect::Dash);
                if let Some(direction) = trail.filter(|_| self.trails) {
                    self.spawn(EffectKind::DashTrail { side }, position, direction);
                }
                if self.squash_stretch {
                    let facing = trail.map(|t| -t).unwrap_or(Vec3::ZERO);
                    self.spawn(EffectKind::SquashStretch { side }, position, facing);
                }
            }
            GameEvent::PauseToggled { paused } => {
                self.audio.play(SoundEffect::UiClick);
                if let Some(hud) = self.hud.as_mut() {
                    hud.show_pause_menu(paused);
                }
            }
            GameEvent::Rematch => {
                self.audio.play(SoundEffect::UiClick);
                if let Some(hud) = self.hud.as_mut() {
                    hud.hide_winner();
                    hud.show_pause_menu(false);
                    hud.set_pause_enabled(true);
                    hud.show_score([0, 0]);
                }
            }
        }
    }

    fn spawn(&mut self, kind: EffectKind, position: Vec3, direction: Vec3) {
        let Some(effects) = self.effects.as_mut() else {
            return;
        };
        effects.spawn(EffectRequest {
            kind,
            position,
            direction,
            lifetime: EFFECT_LIFETIME_SECS,
        });
    }
}
