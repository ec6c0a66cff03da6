//! Turn state machine
//!
//! ```text
//! Cooldown(n) --n reaches 0--> AwaitingMove --launch--> InMotion
//!      ^                                                   |
//!      |                                        current seat's pucks stop
//!      |                                                   v
//!      +---- settled for REQUIRED_SETTLED_FRAMES ---- Settling(k)
//! ```
//!
//! The settle counter only restarts on a new launch or a turn change; a
//! stopped seat that gets knocked back into motion keeps its partial count.

use serde::Serialize;

use super::state::{Piece, Player, PlayerId};
use crate::tuning::Tuning;

/// Observable turn phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TurnPhase {
    /// New turn, actor can't act yet
    Cooldown { remaining: u32 },
    /// Waiting for the current seat to launch
    AwaitingMove,
    /// Launched, current seat's pucks still moving
    InMotion,
    /// Launched and everything has stopped for `frames` ticks
    Settling { frames: u32 },
}

#[derive(Debug, Clone)]
pub struct TurnController {
    /// Seat whose turn it is
    pub current: PlayerId,
    /// Ticks left before the current seat may act
    pub cooldown: u32,
    /// Settled ticks counted since the last launch
    pub settled_frames: u32,
    pub phase: TurnPhase,
}

impl TurnController {
    /// Start a match on `first`'s turn, with no cooldown
    pub fn new(first: PlayerId) -> Self {
        Self {
            current: first,
            cooldown: 0,
            settled_frames: 0,
            phase: TurnPhase::AwaitingMove,
        }
    }

    /// Whether `player` should be asked for a move this tick (cooldown or not)
    pub fn may_decide(&self, player: &Player) -> bool {
        player.id == self.current && !player.move_made
    }

    /// Whether `player` may launch right now
    pub fn may_submit(&self, player: &Player) -> bool {
        player.id == self.current && self.cooldown == 0 && !player.move_made
    }

    /// Note a launch by the current seat; restarts the settle count
    pub fn record_move(&mut self, player: &mut Player) {
        player.move_made = true;
        self.settled_frames = 0;
        self.phase = TurnPhase::InMotion;
    }

    /// Advance one tick. Returns the new seat when the turn passes.
    pub fn update(
        &mut self,
        players: &mut [Player; 2],
        pieces: &[Piece],
        tuning: &Tuning,
    ) -> Option<PlayerId> {
        let player = &players[self.current.0];

        if self.cooldown > 0 {
            self.cooldown -= 1;
            self.phase = if self.cooldown > 0 {
                TurnPhase::Cooldown {
                    remaining: self.cooldown,
                }
            } else if player.move_made {
                TurnPhase::InMotion
            } else {
                TurnPhase::AwaitingMove
            };
            return None;
        }

        if !player.move_made {
            self.phase = TurnPhase::AwaitingMove;
            return None;
        }

        if !player.all_settled(pieces, tuning.motion_epsilon) {
            self.phase = TurnPhase::InMotion;
            return None;
        }

        self.settled_frames += 1;
        self.phase = TurnPhase::Settling {
            frames: self.settled_frames,
        };

        if self.settled_frames >= tuning.required_settled_frames {
            let next = self.current.other();
            self.begin_turn(next, players, tuning.cooldown_ticks);
            return Some(next);
        }
        None
    }

    /// Hand the table to `player`
    fn begin_turn(&mut self, player: PlayerId, players: &mut [Player; 2], cooldown: u32) {
        self.current = player;
        self.settled_frames = 0;
        self.cooldown = cooldown;
        players[player.0].move_made = false;
        self.phase = if cooldown > 0 {
            TurnPhase::Cooldown {
                remaining: cooldown,
            }
        } else {
            TurnPhase::AwaitingMove
        };
        log::info!("Turn passes to {}", players[player.0].name);
    }
}
