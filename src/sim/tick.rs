//! Fixed-step simulation tick
//!
//! One call advances the match by one rendered frame, in a fixed order:
//! input and actor decision, kinematics, collisions, goals, turn
//! management, win check.

use glam::DVec2;

use super::actor::{ActorView, LaunchRequest};
use super::state::{GameEvent, MatchState, PlayerId};
use super::{collision, goal, kinematics};
use crate::error::SimError;

/// Input events collected since the previous tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Pointer position in arena coordinates
    pub pointer: Option<DVec2>,
    /// Primary button went down
    pub press: bool,
    /// Primary button came up
    pub release: bool,
    /// Select the next active puck
    pub cycle_selection: bool,
    /// Start the match over
    pub reset: bool,
    /// Flip the debug overlay
    pub toggle_debug: bool,
}

/// Advance the match by one tick
pub fn tick(state: &mut MatchState, input: &TickInput) -> Result<Vec<GameEvent>, SimError> {
    let mut events = Vec::new();
    state.time_ticks += 1;

    // Debug overlay toggle
    if input.toggle_debug {
        state.debug = !state.debug;
    }

    // Reset wins over everything else this tick
    if input.reset {
        state.reset();
        events.push(GameEvent::MatchReset);
        return Ok(events);
    }

    let current = state.turn.current;

    if !state.game_over {
        handle_human_input(state, current, input);

        // Actors think through the cooldown; launches wait for it to expire
        if state.turn.may_decide(&state.players[current.0]) {
            let view = ActorView {
                pieces: &state.pieces,
                player: &state.players[current.0],
                target_goal: state.board.goal_for(current),
                tuning: &state.tuning,
            };
            let decision = state.actors[current.0].decide(&view, &mut state.rng);
            match decision {
                Some(request) if state.turn.may_submit(&state.players[current.0]) => {
                    apply_launch(state, current, request, &mut events)?;
                }
                // Still cooling down: keep the request for a later tick
                Some(request) => state.actors[current.0].hold(request),
                None => {}
            }
        }
    }

    // Move pucks
    for piece in &mut state.pieces {
        kinematics::advance(piece, &state.tuning);
    }

    // Puck-puck collisions
    collision::resolve_all(&mut state.pieces, &state.tuning, &mut state.rng);

    // Sink pucks; the last seat to clear this tick takes the win
    let capture_radius = state.tuning.capture_radius();
    let mut cleared = None;
    for seat in 0..state.players.len() {
        let player_id = PlayerId(seat);
        let goal = state.board.goal_for(player_id);
        let outcome =
            goal::check(&mut state.players[seat], &mut state.pieces, goal, capture_radius);
        for piece in outcome.sunk {
            log::debug!("{} sank {:?}", state.players[seat].name, piece);
            events.push(GameEvent::PieceSunk {
                player: player_id,
                piece,
            });
        }
        if outcome.cleared {
            cleared = Some(player_id);
        }
    }
    if let Some(winner) = cleared {
        state.finish(winner, &mut events);
    }

    // Turn management
    if !state.game_over {
        if let Some(next) = state
            .turn
            .update(&mut state.players, &state.pieces, &state.tuning)
        {
            state.actors[next.0].reset_turn();
            events.push(GameEvent::TurnChanged { player: next });
        }
    }

    // Win check for seats emptied some other way
    if !state.game_over {
        let cleared = state
            .players
            .iter()
            .rev()
            .find(|p| !p.has_active_pieces(&state.pieces))
            .map(|p| p.id);
        if let Some(winner) = cleared {
            state.finish(winner, &mut events);
        }
    }

    if state.debug {
        let move_made = state.current_player().move_made;
        state.debug_text = format!(
            "Player: {}, Move Made: {}, Stopped Frames: {}, Cooldown: {}",
            state.turn.current.0, move_made, state.turn.settled_frames, state.turn.cooldown
        );
    }

    // Anything non-finite is a fault
    for piece in state.pieces.iter().filter(|p| p.active) {
        if !piece.pos.is_finite() || !piece.vel.is_finite() {
            return Err(SimError::NonFinite(piece.id));
        }
    }

    Ok(events)
}

/// Start the requested puck moving and mark the seat's move as made
fn apply_launch(
    state: &mut MatchState,
    current: PlayerId,
    request: LaunchRequest,
    events: &mut Vec<GameEvent>,
) -> Result<(), SimError> {
    let piece = state
        .pieces
        .get_mut(request.piece.0)
        .filter(|p| p.owner == current)
        .ok_or(SimError::UnknownPiece(request.piece))?;
    kinematics::launch(piece, request.angle, request.power, state.tuning.max_velocity);
    state.turn.record_move(&mut state.players[current.0]);

    let power = request.power.min(state.tuning.max_velocity);
    log::debug!(
        "{} launched {:?}: angle {:.3}, power {:.2}",
        state.players[current.0].name,
        request.piece,
        request.angle,
        power
    );
    events.push(GameEvent::Launched {
        player: current,
        piece: request.piece,
        angle: request.angle,
        power,
    });
    Ok(())
}

/// Advance one tick, resetting the match if the tick faults.
///
/// There is no partial recovery from a fault: the match starts over and the
/// frame loop carries on.
pub fn run_frame(state: &mut MatchState, input: &TickInput) -> Vec<GameEvent> {
    match tick(state, input) {
        Ok(events) => events,
        Err(e) => {
            log::error!("Simulation fault: {}; resetting match", e);
            state.reset();
            vec![GameEvent::MatchReset]
        }
    }
}

/// Route pointer and selection input to the current seat if it's human and
/// hasn't launched yet this turn
fn handle_human_input(state: &mut MatchState, current: PlayerId, input: &TickInput) {
    if state.players[current.0].move_made {
        return;
    }
    let Some(human) = state.actors[current.0].as_human_mut() else {
        return;
    };
    let view = ActorView {
        pieces: &state.pieces,
        player: &state.players[current.0],
        target_goal: state.board.goal_for(current),
        tuning: &state.tuning,
    };

    if input.cycle_selection {
        human.cycle_selection();
    }
    if input.press {
        human.begin_aim();
    }
    if let Some(pointer) = input.pointer {
        human.aim_at(pointer, &view);
    }
    if input.release {
        if let Some(request) = human.commit_aim(&view) {
            log::debug!("Aim committed: {:?}", request);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::sim::state::{PieceId, Role};
    use crate::sim::turn::TurnPhase;
    use crate::tuning::Tuning;

    fn human_vs_ai() -> MatchState {
        MatchState::new(&Settings::default())
    }

    fn ai_vs_ai(seed: u64) -> MatchState {
        MatchState::with_seats(
            Tuning::default(),
            [Role::Automated, Role::Automated],
            ["A".to_string(), "B".to_string()],
            seed,
        )
    }

    fn idle(state: &mut MatchState, ticks: usize) -> Vec<GameEvent> {
        let mut events = Vec::new();
        for _ in 0..ticks {
            events.extend(tick(state, &TickInput::default()).unwrap());
        }
        events
    }

    fn flick(state: &mut MatchState, pointer: DVec2) -> Vec<GameEvent> {
        let press = TickInput {
            pointer: Some(pointer),
            press: true,
            ..Default::default()
        };
        let release = TickInput {
            pointer: Some(pointer),
            release: true,
            ..Default::default()
        };
        let mut events = tick(state, &press).unwrap();
        events.extend(tick(state, &release).unwrap());
        events
    }

    #[test]
    fn test_human_launch_and_turn_handoff() {
        let mut state = human_vs_ai();
        // Puck 0 at (150, 150): aim straight down, gently
        let events = flick(&mut state, DVec2::new(150.0, 190.0));
        assert!(events.iter().any(|e| matches!(
            e,
            GameEvent::Launched { player: PlayerId(0), piece: PieceId(0), .. }
        )));
        assert!(state.players[0].move_made);
        assert!(state.pieces[0].vel.y > 0.0);

        let events = idle(&mut state, 400);
        assert!(events.contains(&GameEvent::TurnChanged { player: PlayerId(1) }));
        assert_eq!(state.turn.current, PlayerId(1));
    }

    #[test]
    fn test_human_launches_once_per_turn() {
        let mut state = human_vs_ai();
        flick(&mut state, DVec2::new(150.0, 190.0));
        let events = flick(&mut state, DVec2::new(250.0, 150.0));
        assert!(!events.iter().any(|e| matches!(e, GameEvent::Launched { .. })));
    }

    #[test]
    fn test_release_without_press_is_noop() {
        let mut state = human_vs_ai();
        let events = tick(
            &mut state,
            &TickInput {
                pointer: Some(DVec2::new(300.0, 300.0)),
                release: true,
                ..Default::default()
            },
        )
        .unwrap();
        assert!(events.is_empty());
        assert!(!state.players[0].move_made);
    }

    #[test]
    fn test_human_input_ignored_on_ai_turn() {
        let mut state = human_vs_ai();
        state.turn.current = PlayerId(1);
        state.players[1].move_made = true;
        flick(&mut state, DVec2::new(150.0, 190.0));
        assert!(!state.players[0].move_made);
        assert_eq!(state.pieces[0].vel, DVec2::ZERO);
    }

    #[test]
    fn test_ai_thinks_through_cooldown() {
        let mut state = human_vs_ai();
        flick(&mut state, DVec2::new(150.0, 190.0));
        let mut ticks = 0;
        while state.turn.current != PlayerId(1) {
            tick(&mut state, &TickInput::default()).unwrap();
            ticks += 1;
            assert!(ticks < 1000);
        }
        assert_eq!(state.turn.phase, TurnPhase::Cooldown { remaining: 30 });

        // Thinking overlaps the 30 cooldown ticks; the launch lands on tick 31
        let events = idle(&mut state, 30);
        assert!(!events.iter().any(|e| matches!(e, GameEvent::Launched { .. })));
        assert_eq!(state.turn.cooldown, 0);
        let events = idle(&mut state, 1);
        assert!(events.iter().any(|e| matches!(
            e,
            GameEvent::Launched { player: PlayerId(1), .. }
        )));
    }

    #[test]
    fn test_release_during_cooldown_fires_when_it_expires() {
        let mut state = human_vs_ai();
        state.turn.cooldown = 5;

        let events = flick(&mut state, DVec2::new(150.0, 190.0));
        assert!(!events.iter().any(|e| matches!(e, GameEvent::Launched { .. })));
        assert!(!state.players[0].move_made);

        let events = idle(&mut state, 3);
        assert!(!events.iter().any(|e| matches!(e, GameEvent::Launched { .. })));
        assert_eq!(state.pieces[0].vel, DVec2::ZERO);

        let events = idle(&mut state, 1);
        assert!(events.iter().any(|e| matches!(
            e,
            GameEvent::Launched { player: PlayerId(0), piece: PieceId(0), .. }
        )));
        assert!(state.players[0].move_made);
        assert!(state.pieces[0].vel.y > 0.0);
    }

    #[test]
    fn test_sinking_last_puck_wins() {
        let mut state = human_vs_ai();
        let goal = state.board.goal_for(PlayerId(1));
        for id in [5, 6, 7, 8] {
            state.pieces[id].active = false;
        }
        state.pieces[9].pos = goal;

        let events = idle(&mut state, 1);
        assert!(events.contains(&GameEvent::PieceSunk {
            player: PlayerId(1),
            piece: PieceId(9)
        }));
        assert!(events.contains(&GameEvent::GameOver { winner: PlayerId(1) }));
        assert!(state.game_over);
        assert_eq!(state.winner, Some(PlayerId(1)));
        assert_eq!(state.players[1].score, 1);

        // Game over sticks; input is ignored
        let events = flick(&mut state, DVec2::new(150.0, 190.0));
        assert!(events.is_empty());
        assert!(state.game_over);
        assert_eq!(state.winner, Some(PlayerId(1)));
    }

    #[test]
    fn test_simultaneous_clear_goes_to_later_seat() {
        let mut state = human_vs_ai();
        for id in [1, 2, 3, 4, 5, 6, 7, 8] {
            state.pieces[id].active = false;
        }
        state.pieces[0].pos = state.board.goal_for(PlayerId(0));
        state.pieces[9].pos = state.board.goal_for(PlayerId(1));

        let events = idle(&mut state, 1);
        let game_overs: Vec<_> = events
            .iter()
            .filter(|e| matches!(e, GameEvent::GameOver { .. }))
            .collect();
        assert_eq!(game_overs, vec![&GameEvent::GameOver { winner: PlayerId(1) }]);
        assert_eq!(state.winner, Some(PlayerId(1)));
        assert_eq!(state.players[0].score, 1);
        assert_eq!(state.players[1].score, 1);

        // Later ticks don't move the win
        idle(&mut state, 5);
        assert_eq!(state.winner, Some(PlayerId(1)));
    }

    #[test]
    fn test_reset_from_mid_motion() {
        let mut state = human_vs_ai();
        flick(&mut state, DVec2::new(400.0, 150.0));
        idle(&mut state, 3);
        assert!(state.pieces[0].vel.length() > 0.0);

        let events = tick(
            &mut state,
            &TickInput {
                reset: true,
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(events, vec![GameEvent::MatchReset]);
        assert_eq!(state.pieces[0].pos, DVec2::new(150.0, 150.0));
        assert_eq!(state.pieces[0].vel, DVec2::ZERO);
        assert!(!state.players[0].move_made);
        assert_eq!(state.turn.current, PlayerId(0));
    }

    #[test]
    fn test_fault_resets_match() {
        let mut state = human_vs_ai();
        state.players[0].score = 2;
        state.pieces[3].vel = DVec2::new(f64::NAN, 0.0);

        assert!(matches!(
            tick(&mut state.clone(), &TickInput::default()),
            Err(SimError::NonFinite(_))
        ));

        let events = run_frame(&mut state, &TickInput::default());
        assert_eq!(events, vec![GameEvent::MatchReset]);
        assert_eq!(state.players[0].score, 0);
        assert!(state.pieces.iter().all(|p| p.vel == DVec2::ZERO));
    }

    #[test]
    fn test_debug_toggle_fills_text() {
        let mut state = human_vs_ai();
        tick(
            &mut state,
            &TickInput {
                toggle_debug: true,
                ..Default::default()
            },
        )
        .unwrap();
        assert!(state.debug);
        assert!(state.debug_text.starts_with("Player: 0, Move Made: false"));
    }

    #[test]
    fn test_same_seed_same_match() {
        let mut a = ai_vs_ai(77);
        let mut b = ai_vs_ai(77);
        idle(&mut a, 2_000);
        idle(&mut b, 2_000);
        assert_eq!(a.pieces, b.pieces);
        assert_eq!(a.turn.current, b.turn.current);
    }

    #[test]
    fn test_ai_match_alternates_without_faults() {
        let mut state = ai_vs_ai(3);
        let mut events = Vec::new();
        for _ in 0..5_000 {
            events.extend(run_frame(&mut state, &TickInput::default()));
            if state.game_over {
                break;
            }
        }
        assert!(!events.contains(&GameEvent::MatchReset));
        for seat in [PlayerId(0), PlayerId(1)] {
            assert!(events.iter().any(|e| matches!(
                e,
                GameEvent::Launched { player, .. } if *player == seat
            )));
        }
        assert!(state.pieces.iter().all(|p| p.pos.is_finite()));
    }
}
