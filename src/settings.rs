//! Game settings and tuning
//!
//! Gameplay tuning lives in [`Tuning`]; presentation preferences sit next to it
//! in [`Settings`]. Both are plain serde structs so a JSON file can override any
//! subset of the defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::SettingsError;
use crate::secs_to_ticks;

/// Gameplay tuning for a match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Goals needed to win the match
    pub win_score: u32,
    /// Baseline player speed (units/s)
    pub move_speed: f32,
    /// Speed multiplier applied while dashing
    pub dash_multiplier: f32,
    /// How long a dash lasts (seconds)
    pub dash_duration: f32,
    /// Cooldown after a dash ends before the next one is allowed (seconds)
    pub dash_cooldown: f32,
    /// Outward normal bias added to wall reflections
    pub bounce_bias: f32,
    /// Hit feedback suppression window after spawn (seconds)
    pub grace_period: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            win_score: WIN_SCORE,
            move_speed: MOVE_SPEED,
            dash_multiplier: DASH_MULTIPLIER,
            dash_duration: DASH_DURATION_SECS,
            dash_cooldown: DASH_COOLDOWN_SECS,
            bounce_bias: BOUNCE_BIAS,
            grace_period: GRACE_PERIOD_SECS,
        }
    }
}

impl Tuning {
    pub fn dash_duration_ticks(&self) -> u32 {
        secs_to_ticks(self.dash_duration)
    }

    pub fn dash_cooldown_ticks(&self) -> u32 {
        secs_to_ticks(self.dash_cooldown)
    }

    /// Grace period in ticks. Zero disables it entirely.
    pub fn grace_ticks(&self) -> u32 {
        if self.grace_period <= 0.0 {
            0
        } else {
            secs_to_ticks(self.grace_period)
        }
    }

    /// Reject values that would break the simulation invariants
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.win_score == 0 {
            return Err(invalid("win_score", "must be at least 1"));
        }
        check_finite_non_negative("move_speed", self.move_speed)?;
        check_finite_non_negative("dash_duration", self.dash_duration)?;
        check_finite_non_negative("dash_cooldown", self.dash_cooldown)?;
        check_finite_non_negative("bounce_bias", self.bounce_bias)?;
        check_finite_non_negative("grace_period", self.grace_period)?;
        if !self.dash_multiplier.is_finite() || self.dash_multiplier <= 0.0 {
            return Err(invalid("dash_multiplier", "must be a positive number"));
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: &str) -> SettingsError {
    SettingsError::Invalid {
        field,
        reason: reason.to_string(),
    }
}

fn check_finite_non_negative(field: &'static str, value: f32) -> Result<(), SettingsError> {
    if !value.is_finite() || value < 0.0 {
        return Err(invalid(field, "must be a finite, non-negative number"));
    }
    Ok(())
}

/// Game settings/preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Gameplay tuning
    pub tuning: Tuning,

    // === Visual Effects ===
    /// Contact particles on hits
    pub particles: bool,
    /// Dash trails
    pub trails: bool,
    /// Squash/stretch animation on dash (cosmetic only)
    pub squash_stretch: bool,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Music volume (0.0 - 1.0)
    pub music_volume: f32,

    // === Accessibility ===
    /// Reduced motion (no flashes, no squash/stretch)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tuning: Tuning::default(),

            particles: true,
            trails: true,
            squash_stretch: true,

            master_volume: 0.8,
            sfx_volume: 1.0,
            music_volume: 0.7,

            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Effective squash/stretch (respects reduced_motion)
    pub fn effective_squash_stretch(&self) -> bool {
        self.squash_stretch && !self.reduced_motion
    }

    /// Effective screen flashes (respects reduced_motion)
    pub fn effective_flashes(&self) -> bool {
        !self.reduced_motion
    }

    /// Parse settings from JSON; missing fields fall back to defaults
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let mut settings: Settings = serde_json::from_str(json)?;
        settings.master_volume = settings.master_volume.clamp(0.0, 1.0);
        settings.sfx_volume = settings.sfx_volume.clamp(0.0, 1.0);
        settings.music_volume = settings.music_volume.clamp(0.0, 1.0);
        settings.tuning.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
