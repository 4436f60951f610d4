//! Match rules and the complete game state
//!
//! [`Match`] is the scoring state machine. [`GameState`] owns every simulated
//! entity (puck, both players, the in-flight round reset) and is the single
//! entry point for "a goal occurred".

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::contact::Side;
use super::player::Player;
use super::puck::Puck;
use super::reset::RoundReset;
use crate::settings::Tuning;

/// Lifecycle of a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchPhase {
    /// Active gameplay
    Playing,
    /// Playfield is being re-seated after a goal; further goals are ignored
    Resetting,
    /// A player reached the win score; terminal until rematch
    GameOver { winner: Side },
}

/// Result of reporting a goal to the match
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GoalOutcome {
    /// Goal dropped (match over or reset in progress)
    Rejected,
    /// Goal counted, round reset started
    RoundReset,
    /// Goal counted and it decided the match
    GameOver { winner: Side },
}

/// Scores and the match lifecycle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    score: [u32; 2],
    win_score: u32,
    phase: MatchPhase,
}

impl Match {
    pub fn new(win_score: u32) -> Self {
        Self {
            score: [0, 0],
            win_score: win_score.max(1),
            phase: MatchPhase::Playing,
        }
    }

    pub fn score(&self, side: Side) -> u32 {
        self.score[side.index()]
    }

    pub fn scores(&self) -> [u32; 2] {
        self.score
    }

    pub fn win_score(&self) -> u32 {
        self.win_score
    }

    pub fn phase(&self) -> MatchPhase {
        self.phase
    }

    pub fn is_over(&self) -> bool {
        matches!(self.phase, MatchPhase::GameOver { .. })
    }

    pub fn winner(&self) -> Option<Side> {
        match self.phase {
            MatchPhase::GameOver { winner } => Some(winner),
            _ => None,
        }
    }

    /// Credit a goal to `scorer` and advance the lifecycle.
    ///
    /// Only one score changes per call, so the scorer's new score is checked
    /// against the threshold first.
    pub fn record_goal(&mut self, scorer: Side) -> GoalOutcome {
        if self.phase != MatchPhase::Playing {
            return GoalOutcome::Rejected;
        }

        self.score[scorer.index()] += 1;

        let winner = [scorer, scorer.opponent()]
            .into_iter()
            .find(|side| self.score(*side) >= self.win_score);

        match winner {
            Some(winner) => {
                self.phase = MatchPhase::GameOver { winner };
                GoalOutcome::GameOver { winner }
            }
            None => {
                self.phase = MatchPhase::Resetting;
                GoalOutcome::RoundReset
            }
        }
    }

    /// Enter the resetting sub-state outside of a goal (rematch)
    pub fn begin_reset(&mut self) {
        if self.phase == MatchPhase::Playing {
            self.phase = MatchPhase::Resetting;
        }
    }

    /// Round reset done: back to play
    pub fn finish_reset(&mut self) {
        if self.phase == MatchPhase::Resetting {
            self.phase = MatchPhase::Playing;
        }
    }

    /// Clear scores for a new match
    pub fn restart(&mut self) {
        self.score = [0, 0];
        self.phase = MatchPhase::Playing;
    }
}

/// Events emitted by the simulation for audio/VFX/HUD collaborators
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// Non-terminal goal
    GoalScored {
        scorer: Side,
        /// Goal the puck went into
        conceded: Side,
        score: [u32; 2],
    },
    /// Match decided
    GameOver { winner: Side, score: [u32; 2] },
    /// Puck touched something while live
    Hit {
        point: Vec3,
        normal: Vec3,
        /// False during the startup grace period
        audible: bool,
    },
    /// A player started a dash
    DashStarted {
        side: Side,
        position: Vec3,
        /// Trail direction (opposite to travel), `None` when standing still
        trail: Option<Vec3>,
    },
    PauseToggled { paused: bool },
    Rematch,
}

/// Spawn points and goal placement on the table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableLayout {
    pub puck_start: Vec3,
    pub player_starts: [Vec3; 2],
    /// Goal mouth centers, indexed by the side guarding them
    pub goal_centers: [Vec3; 2],
}

impl Default for TableLayout {
    fn default() -> Self {
        Self {
            puck_start: Vec3::new(0.0, 0.1, 0.0),
            player_starts: [Vec3::new(-6.0, 0.5, 0.0), Vec3::new(6.0, 0.5, 0.0)],
            goal_centers: [Vec3::new(-8.0, 0.0, 0.0), Vec3::new(8.0, 0.0, 0.0)],
        }
    }
}

/// Complete game state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub tuning: Tuning,
    pub layout: TableLayout,
    /// Physics ticks simulated so far (stops while time is frozen)
    pub time_ticks: u64,
    /// Pause menu open; simulation time is frozen
    pub paused: bool,
    pub game: Match,
    pub puck: Puck,
    /// Indexed by [`Side::index`]
    pub players: [Player; 2],
    /// Round reset waiting for its second half
    reset: Option<RoundReset>,
    /// Feedback produced since the last drain
    #[serde(skip)]
    pub events: Vec<GameEvent>,
}

impl GameState {
    pub fn new(tuning: Tuning, layout: TableLayout) -> Self {
        let players = [
            Player::new(Side::Left, layout.player_starts[0], &tuning),
            Player::new(Side::Right, layout.player_starts[1], &tuning),
        ];
        Self {
            game: Match::new(tuning.win_score),
            puck: Puck::new(layout.puck_start, tuning.grace_ticks()),
            players,
            time_ticks: 0,
            paused: false,
            reset: None,
            events: Vec::new(),
            tuning,
            layout,
        }
    }

    pub fn player(&self, side: Side) -> &Player {
        &self.players[side.index()]
    }

    pub fn player_mut(&mut self, side: Side) -> &mut Player {
        &mut self.players[side.index()]
    }

    /// Simulation time stands still while paused or after the match is decided
    pub fn is_time_frozen(&self) -> bool {
        self.paused || self.game.is_over()
    }

    pub fn reset_in_flight(&self) -> bool {
        self.reset.is_some()
    }

    /// A goal occurred for `scorer`.
    ///
    /// Goals during a reset or after the match is over are dropped.
    pub fn score_goal(&mut self, scorer: Side) -> GoalOutcome {
        let outcome = self.game.record_goal(scorer);
        let score = self.game.scores();

        match outcome {
            GoalOutcome::Rejected => {
                log::debug!("Dropping goal for player {} ({:?})", scorer.player_number(), self.game.phase());
            }
            GoalOutcome::RoundReset => {
                log::info!("Player {} scores: {}-{}", scorer.player_number(), score[0], score[1]);
                debug_assert!(self.reset.is_none(), "round reset already in flight");
                self.events.push(GameEvent::GoalScored {
                    scorer,
                    conceded: scorer.opponent(),
                    score,
                });
                if self.reset.is_none() {
                    self.reset = Some(RoundReset::begin(&mut self.puck, self.time_ticks));
                }
            }
            GoalOutcome::GameOver { winner } => {
                log::info!(
                    "Game over: player {} wins {}-{}",
                    winner.player_number(),
                    score[0],
                    score[1]
                );
                self.events.push(GameEvent::GameOver { winner, score });
            }
        }

        outcome
    }

    /// Run the second half of the round reset once its physics step has passed
    pub fn advance_reset(&mut self) {
        let now = self.time_ticks;
        if let Some(reset) = self.reset.take_if(|r| r.is_due(now)) {
            self.complete_reset(reset);
        }
    }

    fn complete_reset(&mut self, reset: RoundReset) {
        if let Err(err) = reset.complete(&mut self.puck, &mut self.players) {
            log::error!("Round reset aborted: {err}");
        }
        self.game.finish_reset();
    }

    /// Open/close the pause menu. Disabled once the match is over.
    pub fn toggle_pause(&mut self) {
        if self.game.is_over() {
            return;
        }
        self.paused = !self.paused;
        log::info!("{}", if self.paused { "Paused" } else { "Resumed" });
        self.events.push(GameEvent::PauseToggled {
            paused: self.paused,
        });
    }

    /// Start a new match in place.
    ///
    /// An in-flight reset is completed first (resets are never cancelled);
    /// the new match then re-seats everything through a fresh round reset.
    pub fn rematch(&mut self) {
        if let Some(reset) = self.reset.take() {
            self.complete_reset(reset);
        }

        self.game.restart();
        self.paused = false;
        for player in &mut self.players {
            player.restart();
        }
        self.puck.restart_grace(self.tuning.grace_ticks());

        self.game.begin_reset();
        self.reset = Some(RoundReset::begin(&mut self.puck, self.time_ticks));

        log::info!("Rematch started");
        self.events.push(GameEvent::Rematch);
    }

    /// Take all pending feedback events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
