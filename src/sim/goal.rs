//! Goal detection: pucks that reach their seat's hole drop in and score

use glam::DVec2;

use super::state::{Piece, PieceId, Player};

/// What one goal check did
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GoalOutcome {
    /// Pucks sunk this check, in selection order
    pub sunk: Vec<PieceId>,
    /// Something was sunk and the seat has no active pucks left
    pub cleared: bool,
}

/// Sink any of `player`'s active pucks within `capture_radius` of `goal`.
///
/// Each sunk puck is deactivated for good and scores one point. Sunk pucks
/// are skipped, so re-checking never scores twice.
pub fn check(
    player: &mut Player,
    pieces: &mut [Piece],
    goal: DVec2,
    capture_radius: f64,
) -> GoalOutcome {
    let mut outcome = GoalOutcome::default();

    for &id in &player.pieces {
        let piece = &mut pieces[id.0];
        if !piece.active {
            continue;
        }
        if piece.pos.distance(goal) < capture_radius {
            piece.active = false;
            outcome.sunk.push(id);
        }
    }

    if !outcome.sunk.is_empty() {
        player.score += outcome.sunk.len() as u32;
        outcome.cleared = !player.has_active_pieces(pieces);
    }
    outcome
}
