//! Decision makers for each seat
//!
//! A human seat turns pointer input into a launch; an automated seat waits
//! out a short "thinking" delay and then flicks a random puck at its goal.
//! Both are asked the same question each tick through [`Actor::decide`].

use glam::DVec2;
use rand::Rng;
use serde::Serialize;

use super::state::{Piece, PieceId, Player, Role};
use crate::cartesian_to_polar;
use crate::tuning::Tuning;

/// A launch ready to apply
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LaunchRequest {
    pub piece: PieceId,
    pub angle: f64,
    pub power: f64,
}

/// In-progress aim (radians, pixels per tick)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Aim {
    pub angle: f64,
    pub power: f64,
}

/// What an actor can see when deciding
#[derive(Debug, Clone, Copy)]
pub struct ActorView<'a> {
    pub pieces: &'a [Piece],
    pub player: &'a Player,
    /// Hole this seat is trying to sink into
    pub target_goal: DVec2,
    pub tuning: &'a Tuning,
}

/// Pointer-driven seat
#[derive(Debug, Clone, Default)]
pub struct HumanActor {
    /// Index into the seat's active pucks; wraps
    pub selected: usize,
    pub aim: Option<Aim>,
    pending: Option<LaunchRequest>,
}

impl HumanActor {
    /// Move selection to the next active puck
    pub fn cycle_selection(&mut self) {
        self.selected = self.selected.wrapping_add(1);
    }

    /// Currently selected active puck, normalizing the index
    pub fn selected_piece(&mut self, view: &ActorView<'_>) -> Option<PieceId> {
        let count = view.player.active_count(view.pieces);
        if count == 0 {
            return None;
        }
        self.selected %= count;
        view.player.select_active(view.pieces, self.selected)
    }

    pub fn is_aiming(&self) -> bool {
        self.aim.is_some()
    }

    pub fn begin_aim(&mut self) {
        self.aim = Some(Aim::default());
    }

    /// Set the aim directly; ignored unless aiming
    pub fn update_aim(&mut self, angle: f64, power: f64, max_velocity: f64) {
        if let Some(aim) = self.aim.as_mut() {
            aim.angle = angle;
            aim.power = power.clamp(0.0, max_velocity);
        }
    }

    /// Aim from the selected puck toward a pointer position
    pub fn aim_at(&mut self, pointer: DVec2, view: &ActorView<'_>) {
        if !self.is_aiming() {
            return;
        }
        let Some(id) = self.selected_piece(view) else {
            return;
        };
        let (distance, angle) = cartesian_to_polar(pointer - view.pieces[id.0].pos);
        let tuning = view.tuning;
        self.update_aim(angle, distance / tuning.human_power_divisor, tuning.max_velocity);
    }

    /// Finish aiming. Queues a launch of the selected puck; releasing
    /// without a press, or with nothing left to select, does nothing.
    pub fn commit_aim(&mut self, view: &ActorView<'_>) -> Option<LaunchRequest> {
        let aim = self.aim.take()?;
        let piece = self.selected_piece(view)?;
        let request = LaunchRequest {
            piece,
            angle: aim.angle,
            power: aim.power,
        };
        self.pending = Some(request);
        Some(request)
    }

    fn decide(&mut self) -> Option<LaunchRequest> {
        self.pending.take()
    }

    fn reset_turn(&mut self) {
        self.aim = None;
        self.pending = None;
    }
}

/// Seat played by the computer
#[derive(Debug, Clone, Default)]
pub struct AutomatedActor {
    pub thinking: bool,
    pub ticks_thought: u32,
    pending: Option<LaunchRequest>,
}

impl AutomatedActor {
    fn decide<R: Rng + ?Sized>(
        &mut self,
        view: &ActorView<'_>,
        rng: &mut R,
    ) -> Option<LaunchRequest> {
        if view.player.move_made {
            return None;
        }
        if let Some(request) = self.pending.take() {
            return Some(request);
        }
        if !self.thinking {
            self.thinking = true;
            self.ticks_thought = 0;
        }
        if self.ticks_thought < view.tuning.ai_think_ticks {
            self.ticks_thought += 1;
            return None;
        }
        self.thinking = false;
        self.ticks_thought = 0;

        let active: Vec<&Piece> = view.player.active_pieces(view.pieces).collect();
        if active.is_empty() {
            return None;
        }
        let piece = active[rng.random_range(0..active.len())];

        let tuning = view.tuning;
        let (distance, angle) = cartesian_to_polar(view.target_goal - piece.pos);
        let jitter = tuning.ai_aim_jitter;
        let angle = angle + rng.random_range(-jitter..=jitter);
        let power = (distance / tuning.ai_power_divisor)
            .min(tuning.max_velocity * tuning.ai_power_fraction);

        Some(LaunchRequest {
            piece: piece.id,
            angle,
            power,
        })
    }
}

/// A seat's decision maker
#[derive(Debug, Clone)]
pub enum Actor {
    Human(HumanActor),
    Automated(AutomatedActor),
}

impl Actor {
    pub fn for_role(role: Role) -> Self {
        match role {
            Role::Human => Actor::Human(HumanActor::default()),
            Role::Automated => Actor::Automated(AutomatedActor::default()),
        }
    }

    /// A launch to apply this tick, if the actor has one ready.
    ///
    /// Called every tick of the seat's turn until it launches, including
    /// during the cooldown.
    pub fn decide<R: Rng + ?Sized>(
        &mut self,
        view: &ActorView<'_>,
        rng: &mut R,
    ) -> Option<LaunchRequest> {
        match self {
            Actor::Human(human) => human.decide(),
            Actor::Automated(ai) => ai.decide(view, rng),
        }
    }

    /// Hand back a request that couldn't be applied yet; the next
    /// `decide` returns it again
    pub fn hold(&mut self, request: LaunchRequest) {
        match self {
            Actor::Human(human) => human.pending = Some(request),
            Actor::Automated(ai) => ai.pending = Some(request),
        }
    }

    /// Drop per-turn state when a new turn starts
    pub fn reset_turn(&mut self) {
        match self {
            Actor::Human(human) => human.reset_turn(),
            Actor::Automated(ai) => *ai = AutomatedActor::default(),
        }
    }

    /// Aim being drawn, if any
    pub fn aim(&self) -> Option<Aim> {
        match self {
            Actor::Human(human) => human.aim,
            Actor::Automated(_) => None,
        }
    }

    pub fn as_human_mut(&mut self) -> Option<&mut HumanActor> {
        match self {
            Actor::Human(human) => Some(human),
            Actor::Automated(_) => None,
        }
    }

    pub fn as_human(&self) -> Option<&HumanActor> {
        match self {
            Actor::Human(human) => Some(human),
            Actor::Automated(_) => None,
        }
    }
}
