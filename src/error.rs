//! Error types

use thiserror::Error;

/// Core simulation errors.
///
/// These are invariant guards: callers that respect the documented
/// preconditions never see them.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SimError {
    /// The puck was asked to teleport while it still takes part in collisions
    #[error("puck reset requested while the puck is not frozen")]
    ResetWhileLive,

    /// The round reset could not find every participant it must re-seat
    #[error("round reset needs {expected} players, found {found}")]
    MissingParticipant { expected: usize, found: usize },
}

/// Errors raised while loading or validating settings
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed settings JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid setting `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}
