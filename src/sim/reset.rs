//! Round reset sequencing
//!
//! After a non-terminal goal the playfield is re-seated in two halves split
//! by a physics step:
//!
//! 1. [`RoundReset::begin`] freezes the puck (kinematic, no collision response).
//! 2. The engine runs one step with the puck frozen.
//! 3. [`RoundReset::complete`] re-seats both players and the puck.
//! 4. The puck is unfrozen when the completion scope ends.
//!
//! Step 4 is tied to a [`FreezeGuard`] so every exit path out of the
//! completion, including early returns and unwinding, unfreezes the puck.

use std::ops::{Deref, DerefMut};

use serde::{Deserialize, Serialize};

use super::player::Player;
use super::puck::Puck;
use crate::consts::PLAYER_COUNT;
use crate::error::SimError;

/// An in-flight round reset. The puck is frozen for as long as one exists.
#[must_use = "a begun round reset leaves the puck frozen until completed"]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundReset {
    begun_at_tick: u64,
}

impl RoundReset {
    /// Freeze the puck and start the sequence during tick `now`
    pub fn begin(puck: &mut Puck, now: u64) -> Self {
        puck.freeze();
        log::debug!("Round reset begun at tick {now}");
        Self { begun_at_tick: now }
    }

    pub fn begun_at_tick(&self) -> u64 {
        self.begun_at_tick
    }

    /// True once at least one physics step has passed since the freeze
    pub fn is_due(&self, now: u64) -> bool {
        now > self.begun_at_tick
    }

    /// Re-seat the players and the puck, then unfreeze.
    ///
    /// Aborts with [`SimError::MissingParticipant`] if the player set is
    /// incomplete; the puck is unfrozen either way.
    pub fn complete(self, puck: &mut Puck, players: &mut [Player]) -> Result<(), SimError> {
        let mut puck = FreezeGuard::new(puck);

        if players.len() != PLAYER_COUNT {
            return Err(SimError::MissingParticipant {
                expected: PLAYER_COUNT,
                found: players.len(),
            });
        }

        for player in players.iter_mut() {
            player.reset_position();
        }
        puck.reset()?;

        log::debug!("Round reset completed (begun at tick {})", self.begun_at_tick);
        Ok(())
    }
}

/// Scoped ownership of a frozen puck: unfreezes on drop
struct FreezeGuard<'a> {
    puck: &'a mut Puck,
}

impl<'a> FreezeGuard<'a> {
    fn new(puck: &'a mut Puck) -> Self {
        Self { puck }
    }
}

impl Deref for FreezeGuard<'_> {
    type Target = Puck;

    fn deref(&self) -> &Puck {
        self.puck
    }
}

impl DerefMut for FreezeGuard<'_> {
    fn deref_mut(&mut self) -> &mut Puck {
        self.puck
    }
}

impl Drop for FreezeGuard<'_> {
    fn drop(&mut self) {
        if self.puck.is_frozen() {
            self.puck.unfreeze();
        }
    }
}
