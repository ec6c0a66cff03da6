//! Tick-based simulation module
//!
//! All gameplay logic lives here:
//! - Fixed step: one tick per rendered frame, constants in ticks
//! - Seeded RNG only
//! - Stable iteration order (by piece id)
//! - No rendering or platform dependencies

pub mod actor;
pub mod collision;
pub mod goal;
pub mod kinematics;
pub mod snapshot;
pub mod state;
pub mod tick;
pub mod turn;

pub use actor::{Actor, ActorView, Aim, AutomatedActor, HumanActor, LaunchRequest};
pub use collision::{CollisionResult, resolve_all, resolve_pair};
pub use goal::GoalOutcome;
pub use snapshot::{AimView, PlayerView, Snapshot};
pub use state::{Board, GameEvent, MatchState, Piece, PieceId, Player, PlayerId, Role};
pub use tick::{TickInput, run_frame, tick};
pub use turn::{TurnController, TurnPhase};
