//! Fixed timestep simulation tick
//!
//! Core loop that advances the match by one physics step. Per step:
//! 1. Pause/rematch requests
//! 2. Contact events from the previous engine step (collision response, goals)
//! 3. Second half of a pending round reset
//! 4. Player input, dash timers
//! 5. Puck end-of-step sampling

use super::contact::{ContactQueue, PhysicsEvent};
use super::player::PlayerInput;
use super::state::GameState;

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Indexed by `Side::index`
    pub players: [PlayerInput; 2],
    /// Pause toggle (edge)
    pub pause: bool,
    /// Start a new match (edge)
    pub restart: bool,
}

/// Advance the game state by one fixed physics step.
///
/// `contacts` holds what the physics engine reported since the previous tick;
/// it is drained here before any movement update. Nothing is drained while
/// simulation time is frozen.
pub fn tick(state: &mut GameState, input: &TickInput, contacts: &mut ContactQueue) {
    if input.pause {
        state.toggle_pause();
    }

    // Rematch is the only way out of a frozen (game over) match
    if state.is_time_frozen() && !input.restart {
        return;
    }

    state.time_ticks += 1;

    if input.restart {
        state.rematch();
    }

    for event in contacts.drain() {
        apply_physics_event(state, event);
    }

    state.advance_reset();

    // A goal this step may have ended the match: time stops here
    if !state.game.is_over() {
        for (player, player_input) in state.players.iter_mut().zip(input.players.iter()) {
            player.step(player_input, &mut state.events);
        }
    }

    state.puck.end_step();

    debug_assert!(
        state.reset_in_flight() || !state.puck.is_frozen(),
        "puck left frozen with no round reset in flight"
    );
}

/// Route one engine event to the puck and, for goals, to the match
pub fn apply_physics_event(state: &mut GameState, event: PhysicsEvent) {
    match event {
        PhysicsEvent::TriggerEnter(goal) => {
            if let Some(scorer) = state.puck.on_goal_trigger(goal) {
                state.score_goal(scorer);
            }
        }
        PhysicsEvent::TriggerExit(goal) => state.puck.on_goal_exit(goal),
        PhysicsEvent::CollisionEnter(contact) => {
            state
                .puck
                .on_collision(&contact, state.tuning.bounce_bias, &mut state.events);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Tuning;
    use crate::sim::contact::{ContactEvent, Side, SurfaceTag};
    use crate::sim::player::DashState;
    use crate::sim::state::{GameEvent, GoalOutcome, MatchPhase, TableLayout};
    use glam::{Vec2, Vec3};

    fn new_state(win_score: u32) -> GameState {
        let tuning = Tuning {
            win_score,
            ..Default::default()
        };
        GameState::new(tuning, TableLayout::default())
    }

    fn idle() -> TickInput {
        TickInput::default()
    }

    /// Push `count` goals into `goal`, letting each round reset finish
    fn play_goals(state: &mut GameState, queue: &mut ContactQueue, goal: Side, count: u32) {
        for _ in 0..count {
            queue.goal_entered(goal);
            tick(state, &idle(), queue);
            tick(state, &idle(), queue);
        }
    }

    #[test]
    fn test_final_goal_ends_match() {
        let mut state = new_state(5);
        let mut queue = ContactQueue::new();
        // Goals in the right goal credit player 1
        play_goals(&mut state, &mut queue, Side::Right, 4);
        assert_eq!(state.game.scores(), [4, 0]);
        assert_eq!(state.game.phase(), MatchPhase::Playing);

        queue.goal_entered(Side::Right);
        tick(&mut state, &idle(), &mut queue);
        assert_eq!(state.game.scores(), [5, 0]);
        assert_eq!(state.game.phase(), MatchPhase::GameOver { winner: Side::Left });
        assert!(!state.reset_in_flight());

        // Time is frozen: ticks change nothing
        let frozen_at = state.time_ticks;
        queue.goal_entered(Side::Left);
        tick(&mut state, &idle(), &mut queue);
        assert_eq!(state.time_ticks, frozen_at);
        assert_eq!(state.game.scores(), [5, 0]);
    }

    #[test]
    fn test_goal_resets_playfield_after_one_step() {
        let mut state = new_state(5);
        let mut queue = ContactQueue::new();
        play_goals(&mut state, &mut queue, Side::Left, 2);
        assert_eq!(state.game.scores(), [0, 2]);

        state.puck.body.position = Vec3::new(-8.3, 0.1, 0.4);
        state.puck.launch(Vec3::new(-6.0, 0.0, 2.0));
        state.players[0].body.position = Vec3::new(-2.0, 0.5, 1.0);

        queue.goal_entered(Side::Right);
        tick(&mut state, &idle(), &mut queue);
        assert_eq!(state.game.scores(), [1, 2]);
        assert_eq!(state.game.phase(), MatchPhase::Resetting);
        assert!(state.puck.is_frozen());

        tick(&mut state, &idle(), &mut queue);
        assert_eq!(state.game.phase(), MatchPhase::Playing);
        assert!(!state.puck.is_frozen());
        assert_eq!(state.puck.body.position, state.puck.start_position());
        assert_eq!(state.puck.body.velocity, Vec3::ZERO);
        assert_eq!(state.puck.body.angular_velocity, Vec3::ZERO);
        assert_eq!(state.players[0].body.position, state.players[0].start_position());
    }

    #[test]
    fn test_double_trigger_same_step() {
        let mut state = new_state(5);
        let mut queue = ContactQueue::new();
        play_goals(&mut state, &mut queue, Side::Right, 4);

        // Engine reported the crossing twice in one step
        queue.goal_entered(Side::Right);
        queue.goal_entered(Side::Right);
        tick(&mut state, &idle(), &mut queue);
        assert_eq!(state.game.scores(), [5, 0]);

        // Direct second call is dropped as well
        assert_eq!(state.score_goal(Side::Left), GoalOutcome::Rejected);
        assert_eq!(state.game.scores(), [5, 0]);
    }

    #[test]
    fn test_bounce_after_goal_in_same_step_ignored() {
        let mut state = new_state(5);
        let mut queue = ContactQueue::new();
        state.puck.launch(Vec3::new(-3.0, 0.0, 0.0));

        queue.goal_entered(Side::Left);
        queue.collision(ContactEvent::new(Vec3::X, Vec3::ZERO, SurfaceTag::Wall));
        tick(&mut state, &idle(), &mut queue);

        assert!(state.puck.is_frozen());
        assert_eq!(state.puck.body.velocity, Vec3::new(-3.0, 0.0, 0.0));
        assert!(!state.events.iter().any(|e| matches!(e, GameEvent::Hit { .. })));
    }

    #[test]
    fn test_wall_bounce_through_queue() {
        let mut state = new_state(5);
        let mut queue = ContactQueue::new();
        state.puck.launch(Vec3::new(5.0, 0.0, 3.0));

        queue.collision(ContactEvent::new(Vec3::NEG_X, Vec3::new(8.0, 0.1, 1.0), SurfaceTag::Wall));
        tick(&mut state, &idle(), &mut queue);

        let v = state.puck.body.velocity;
        assert!((v.length() - 34.0_f32.sqrt()).abs() < 1e-4);
        assert!(v.x < 0.0);
        // Sampled for the next step
        assert_eq!(state.puck.prev_velocity(), v);
        // Startup grace still running: hit is muted
        assert!(matches!(state.events[0], GameEvent::Hit { audible: false, .. }));
    }

    #[test]
    fn test_dash_spam_within_duration() {
        let tuning = Tuning::default();
        let mut state = new_state(5);
        let mut queue = ContactQueue::new();
        let mut input = TickInput::default();
        input.players[0] = PlayerInput {
            direction: Vec2::X,
            dash: true,
        };

        tick(&mut state, &input, &mut queue);
        tick(&mut state, &input, &mut queue);
        let dashes = state
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::DashStarted { .. }))
            .count();
        assert_eq!(dashes, 1);

        let boosted = tuning.move_speed * tuning.dash_multiplier;
        assert!((state.players[0].body.velocity.x - boosted).abs() < 1e-5);

        // Track when speed returns to baseline and when the dash is ready again
        let mut input = TickInput::default();
        input.players[0].direction = Vec2::X;
        let mut restored_at = None;
        let mut ready_at = None;
        for t in 3..=(tuning.dash_duration_ticks() + tuning.dash_cooldown_ticks() + 5) {
            tick(&mut state, &input, &mut queue);
            let speed = state.players[0].move_speed();
            if restored_at.is_none() && speed == tuning.move_speed {
                restored_at = Some(t);
            }
            if ready_at.is_none() && state.players[0].dash_state() == DashState::Ready {
                ready_at = Some(t);
            }
        }

        assert_eq!(restored_at, Some(tuning.dash_duration_ticks()));
        assert_eq!(
            ready_at,
            Some(tuning.dash_duration_ticks() + tuning.dash_cooldown_ticks())
        );
    }

    #[test]
    fn test_dash_survives_round_reset() {
        let mut state = new_state(5);
        let mut queue = ContactQueue::new();
        let mut input = TickInput::default();
        input.players[1].dash = true;
        tick(&mut state, &input, &mut queue);

        play_goals(&mut state, &mut queue, Side::Left, 1);
        assert!(matches!(state.players[1].dash_state(), DashState::Dashing { .. }));
    }

    #[test]
    fn test_pause_freezes_timers_and_reset() {
        let mut state = new_state(5);
        let mut queue = ContactQueue::new();
        queue.goal_entered(Side::Left);
        tick(&mut state, &idle(), &mut queue);
        assert!(state.puck.is_frozen());

        let pause = TickInput {
            pause: true,
            ..Default::default()
        };
        tick(&mut state, &pause, &mut queue);
        assert!(state.paused);
        for _ in 0..10 {
            tick(&mut state, &idle(), &mut queue);
        }
        // Reset still waiting for a real physics step
        assert!(state.puck.is_frozen());

        tick(&mut state, &pause, &mut queue);
        assert!(!state.paused);
        assert!(!state.puck.is_frozen());
        assert_eq!(state.game.phase(), MatchPhase::Playing);
    }

    #[test]
    fn test_restart_after_game_over() {
        let mut state = new_state(1);
        let mut queue = ContactQueue::new();
        queue.goal_entered(Side::Left);
        tick(&mut state, &idle(), &mut queue);
        assert!(state.game.is_over());

        let restart = TickInput {
            restart: true,
            ..Default::default()
        };
        tick(&mut state, &restart, &mut queue);
        assert_eq!(state.game.scores(), [0, 0]);
        assert!(state.puck.is_frozen());

        tick(&mut state, &idle(), &mut queue);
        assert!(!state.puck.is_frozen());
        assert_eq!(state.game.phase(), MatchPhase::Playing);
        assert!(state.drain_events().contains(&GameEvent::Rematch));
    }

    #[test]
    fn test_determinism() {
        let mut state1 = new_state(5);
        let mut state2 = new_state(5);
        let mut q1 = ContactQueue::new();
        let mut q2 = ContactQueue::new();

        let mut inputs = vec![TickInput::default(); 4];
        inputs[0].players[0].direction = Vec2::new(0.3, 0.7);
        inputs[1].players[1].dash = true;
        inputs[2].players[0].direction = Vec2::new(-1.0, 0.2);

        for input in &inputs {
            for q in [&mut q1, &mut q2] {
                q.collision(ContactEvent::new(Vec3::Z, Vec3::ZERO, SurfaceTag::Wall));
            }
            tick(&mut state1, input, &mut q1);
            tick(&mut state2, input, &mut q2);
        }

        assert_eq!(state1.time_ticks, state2.time_ticks);
        assert_eq!(state1.puck.body, state2.puck.body);
        assert_eq!(state1.players[0].body, state2.players[0].body);
        assert_eq!(state1.players[1].dash_state(), state2.players[1].dash_state());
    }
}
