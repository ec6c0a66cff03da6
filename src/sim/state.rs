//! Match state and core simulation types
//!
//! Pucks live in a single arena indexed by `PieceId`; players hold ordered
//! id lists into it. Sunk pucks are flagged inactive and never removed, so
//! ids stay stable for the whole match.

use glam::DVec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::actor::Actor;
use super::kinematics;
use super::turn::TurnController;
use crate::settings::Settings;
use crate::tuning::Tuning;

/// Stable index of a puck in the arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PieceId(pub usize);

/// Seat index (0 or 1)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub usize);

impl PlayerId {
    /// The seat across the table
    pub fn other(self) -> Self {
        PlayerId((self.0 + 1) % 2)
    }
}

/// Who makes decisions for a seat
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Human,
    Automated,
}

/// A puck
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Piece {
    pub id: PieceId,
    pub pos: DVec2,
    pub vel: DVec2,
    pub radius: f64,
    pub owner: PlayerId,
    /// Inactive pucks are frozen and ignored by physics and selection
    pub active: bool,
}

impl Piece {
    pub fn new(id: PieceId, owner: PlayerId, pos: DVec2, radius: f64) -> Self {
        Self {
            id,
            pos,
            vel: DVec2::ZERO,
            radius,
            owner,
            active: true,
        }
    }
}

/// A seat at the table
#[derive(Debug, Clone, Serialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub role: Role,
    pub score: u32,
    /// Owned pucks in selection order
    pub pieces: Vec<PieceId>,
    /// Set once this seat has launched during the current turn
    pub move_made: bool,
}

impl Player {
    /// Active pucks in selection order
    pub fn active_pieces<'a>(&'a self, arena: &'a [Piece]) -> impl Iterator<Item = &'a Piece> + 'a {
        self.pieces
            .iter()
            .map(move |id| &arena[id.0])
            .filter(|p| p.active)
    }

    pub fn active_count(&self, arena: &[Piece]) -> usize {
        self.active_pieces(arena).count()
    }

    pub fn has_active_pieces(&self, arena: &[Piece]) -> bool {
        self.active_pieces(arena).next().is_some()
    }

    /// True when every active puck is below the motion epsilon
    pub fn all_settled(&self, arena: &[Piece], epsilon: f64) -> bool {
        self.active_pieces(arena)
            .all(|p| kinematics::is_settled(p, epsilon))
    }

    /// The `index`-th active puck, wrapping; `None` when nothing is left
    pub fn select_active(&self, arena: &[Piece], index: usize) -> Option<PieceId> {
        let count = self.active_count(arena);
        if count == 0 {
            return None;
        }
        self.active_pieces(arena).nth(index % count).map(|p| p.id)
    }
}

/// Static table geometry
#[derive(Debug, Clone, Serialize)]
pub struct Board {
    /// Top-left corner of the playing surface
    pub origin: DVec2,
    pub width: f64,
    pub height: f64,
    /// Centre divider width; drawn only, pucks pass over it
    pub divider_width: f64,
    /// `goals[i]` is where seat `i` scores, on the far side from its pucks
    pub goals: [DVec2; 2],
    pub hole_radius: f64,
}

impl Board {
    pub fn new(tuning: &Tuning) -> Self {
        let origin = tuning.board_origin();
        let mid_y = (tuning.board_height / 2.0).floor();
        Self {
            origin,
            width: tuning.board_width,
            height: tuning.board_height,
            divider_width: tuning.divider_width,
            goals: [
                origin + DVec2::new(tuning.board_width - tuning.goal_inset, mid_y),
                origin + DVec2::new(tuning.goal_inset, mid_y),
            ],
            hole_radius: tuning.hole_radius,
        }
    }

    /// Goal the given seat is trying to sink its pucks into
    pub fn goal_for(&self, player: PlayerId) -> DVec2 {
        self.goals[player.0]
    }

    /// Starting slot for a seat's `index`-th puck: three to a row, rows 60 apart
    pub fn start_slot(&self, player: PlayerId, index: usize) -> DVec2 {
        let col = (index % 3) as f64 * 50.0;
        let row = (index / 3) as f64 * 60.0;
        match player.0 {
            0 => self.origin + DVec2::new(100.0 + col, 100.0 + row),
            _ => self.origin + DVec2::new(self.width - 100.0 - col, self.height - 100.0 - row),
        }
    }
}

/// Something the presentation layer may want to react to
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum GameEvent {
    Launched {
        player: PlayerId,
        piece: PieceId,
        angle: f64,
        power: f64,
    },
    PieceSunk {
        player: PlayerId,
        piece: PieceId,
    },
    TurnChanged {
        player: PlayerId,
    },
    GameOver {
        winner: PlayerId,
    },
    MatchReset,
}

/// Complete match state plus the per-session context (clock, debug flag, RNG)
#[derive(Debug, Clone)]
pub struct MatchState {
    pub tuning: Tuning,
    pub board: Board,
    /// Every puck of both seats, indexed by `PieceId`
    pub pieces: Vec<Piece>,
    pub players: [Player; 2],
    pub actors: [Actor; 2],
    pub turn: TurnController,
    pub game_over: bool,
    pub winner: Option<PlayerId>,
    /// Frame clock; keeps counting across resets
    pub time_ticks: u64,
    /// Debug overlay toggle; survives resets
    pub debug: bool,
    /// Diagnostic line, refreshed each tick while `debug` is on
    pub debug_text: String,
    pub seed: u64,
    pub(crate) rng: Pcg32,
}

impl MatchState {
    /// Create a match from settings
    pub fn new(settings: &Settings) -> Self {
        let mut state = Self::with_seats(
            settings.tuning.clone(),
            settings.roles,
            [settings.names[0].clone(), settings.names[1].clone()],
            settings.seed(),
        );
        state.debug = settings.debug_overlay;
        state
    }

    /// Create a match with explicit tuning and seats
    pub fn with_seats(tuning: Tuning, roles: [Role; 2], names: [String; 2], seed: u64) -> Self {
        let board = Board::new(&tuning);
        let [name0, name1] = names;
        let players = [
            Player {
                id: PlayerId(0),
                name: name0,
                role: roles[0],
                score: 0,
                pieces: Vec::new(),
                move_made: false,
            },
            Player {
                id: PlayerId(1),
                name: name1,
                role: roles[1],
                score: 0,
                pieces: Vec::new(),
                move_made: false,
            },
        ];
        let mut state = Self {
            actors: [Actor::for_role(roles[0]), Actor::for_role(roles[1])],
            turn: TurnController::new(PlayerId(0)),
            tuning,
            board,
            pieces: Vec::new(),
            players,
            game_over: false,
            winner: None,
            time_ticks: 0,
            debug: false,
            debug_text: String::new(),
            seed,
            rng: Pcg32::seed_from_u64(seed),
        };
        state.place_pieces();
        log::info!(
            "Match created: {} ({:?}) vs {} ({:?}), seed {}",
            state.players[0].name,
            state.players[0].role,
            state.players[1].name,
            state.players[1].role,
            seed
        );
        state
    }

    /// Put both seats' pucks back on their starting slots
    fn place_pieces(&mut self) {
        self.pieces.clear();
        for player in &mut self.players {
            player.pieces.clear();
            for i in 0..self.tuning.pucks_per_player {
                let id = PieceId(self.pieces.len());
                let pos = self.board.start_slot(player.id, i);
                self.pieces
                    .push(Piece::new(id, player.id, pos, self.tuning.puck_radius));
                player.pieces.push(id);
            }
        }
    }

    /// Reinitialize the whole match. Safe from any state; the clock, RNG
    /// stream, and debug flag carry over.
    pub fn reset(&mut self) {
        self.place_pieces();
        for player in &mut self.players {
            player.score = 0;
            player.move_made = false;
        }
        for (actor, player) in self.actors.iter_mut().zip(&self.players) {
            *actor = Actor::for_role(player.role);
        }
        self.turn = TurnController::new(PlayerId(0));
        self.game_over = false;
        self.winner = None;
        self.debug_text.clear();
        log::info!("Match reset");
    }

    pub fn current_player(&self) -> &Player {
        &self.players[self.turn.current.0]
    }

    pub fn piece(&self, id: PieceId) -> Option<&Piece> {
        self.pieces.get(id.0)
    }

    /// Latch the end of the match. Once over, later calls change nothing.
    pub(crate) fn finish(&mut self, winner: PlayerId, events: &mut Vec<GameEvent>) {
        if self.game_over {
            return;
        }
        self.game_over = true;
        self.winner = Some(winner);
        log::info!("Game over: {} wins", self.players[winner.0].name);
        events.push(GameEvent::GameOver { winner });
    }
}
