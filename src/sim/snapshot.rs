//! Read-only view of a match for the presentation layer

use glam::DVec2;
use serde::Serialize;

use super::state::{Board, MatchState, Piece, PieceId, PlayerId, Role};
use super::turn::TurnPhase;
use crate::consts::AIM_LINE_SCALE;
use crate::polar_to_cartesian;

#[derive(Debug, Clone, Serialize)]
pub struct PlayerView {
    pub id: PlayerId,
    pub name: String,
    pub role: Role,
    pub score: u32,
    pub active_pieces: usize,
}

/// Aim line for the overlay
#[derive(Debug, Clone, Serialize)]
pub struct AimView {
    pub piece: PieceId,
    pub origin: DVec2,
    pub angle: f64,
    pub power: f64,
    pub end: DVec2,
}

/// Everything a renderer needs to draw one frame
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub tick: u64,
    pub arena: DVec2,
    pub board: Board,
    pub pieces: Vec<Piece>,
    pub players: Vec<PlayerView>,
    pub current_player: PlayerId,
    pub phase: TurnPhase,
    pub aim: Option<AimView>,
    pub game_over: bool,
    pub winner: Option<PlayerId>,
    pub debug_text: Option<String>,
}

impl Snapshot {
    pub fn capture(state: &MatchState) -> Self {
        let current = state.turn.current;

        // Aim overlay only while a human seat is dragging
        let aim = state.actors[current.0].as_human().and_then(|human| {
            let aim = human.aim?;
            let piece = state.players[current.0].select_active(&state.pieces, human.selected)?;
            let origin = state.pieces[piece.0].pos;
            // Line grows with power
            let end = origin + polar_to_cartesian(aim.power * AIM_LINE_SCALE, aim.angle);
            Some(AimView {
                piece,
                origin,
                angle: aim.angle,
                power: aim.power,
                end,
            })
        });

        Self {
            tick: state.time_ticks,
            arena: DVec2::new(state.tuning.arena_width, state.tuning.arena_height),
            board: state.board.clone(),
            // Sunk pucks stay in the list, flagged inactive
            pieces: state.pieces.clone(),
            players: state
                .players
                .iter()
                .map(|p| PlayerView {
                    id: p.id,
                    name: p.name.clone(),
                    role: p.role,
                    score: p.score,
                    active_pieces: p.active_count(&state.pieces),
                })
                .collect(),
            current_player: current,
            phase: state.turn.phase,
            aim,
            game_over: state.game_over,
            winner: state.winner,
            // Overlay text only while debug is on
            debug_text: state.debug.then(|| state.debug_text.clone()),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
