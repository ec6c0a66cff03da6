//! Pucket - a two-player puck-flicking table game
//!
//! Core modules:
//! - `sim`: Tick-based simulation (kinematics, collisions, goals, turns, actors)
//! - `tuning`: Data-driven rule and physics constants
//! - `settings`: Runtime preferences (seats, seed, debug overlay)
//! - `error`: Error types for configuration and simulation faults

pub mod error;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use error::{SimError, TuningError};
pub use settings::Settings;
pub use tuning::Tuning;

use glam::DVec2;

/// Default game constants (all distances in screen pixels, all times in ticks)
pub mod consts {
    /// Target frame rate; one simulation tick per rendered frame
    pub const TARGET_FPS: u32 = 60;

    /// Arena dimensions (walls are the arena edges, not the board)
    pub const ARENA_WIDTH: f64 = 800.0;
    pub const ARENA_HEIGHT: f64 = 600.0;
    /// Board dimensions, centred in the arena
    pub const BOARD_WIDTH: f64 = 700.0;
    pub const BOARD_HEIGHT: f64 = 500.0;
    /// Centre divider width (cosmetic only)
    pub const DIVIDER_WIDTH: f64 = 10.0;
    /// Goal inset from the board's short edges
    pub const GOAL_INSET: f64 = 50.0;

    pub const PUCK_RADIUS: f64 = 20.0;
    pub const HOLE_RADIUS: f64 = 25.0;
    /// The hole swallows a puck slightly before full overlap
    pub const HOLE_MARGIN: f64 = 5.0;

    /// Launch speed cap (pixels per tick)
    pub const MAX_VELOCITY: f64 = 10.0;
    /// Per-tick velocity decay
    pub const FRICTION: f64 = 0.98;
    /// Velocity kept on a wall bounce
    pub const WALL_RESTITUTION: f64 = 0.8;
    /// Below this on both axes a puck counts as stopped
    pub const MOTION_EPSILON: f64 = 0.1;
    /// Sub-elastic puck-puck impulse factor (2.0 would be fully elastic)
    pub const COLLISION_IMPULSE: f64 = 1.8;
    /// Centres closer than this are treated as coincident
    pub const DEGENERATE_DISTANCE: f64 = 1e-4;
    /// Per-axis nudge applied to coincident pucks
    pub const JITTER_MIN: f64 = 0.1;
    pub const JITTER_MAX: f64 = 1.0;

    pub const PUCKS_PER_PLAYER: usize = 5;
    /// Ticks before a new turn's actor may act (half a second at 60 Hz)
    pub const COOLDOWN_TICKS: u32 = 30;
    /// Consecutive settled ticks required before the turn passes
    pub const REQUIRED_SETTLED_FRAMES: u32 = 30;

    /// Automated actor "thinking" delay
    pub const AI_THINK_TICKS: u32 = 30;
    /// Random aim perturbation, radians either side
    pub const AI_AIM_JITTER: f64 = 0.2;
    pub const AI_POWER_DIVISOR: f64 = 50.0;
    /// Fraction of MAX_VELOCITY the automated actor will use at most
    pub const AI_POWER_FRACTION: f64 = 0.8;

    /// Pointer distance (pixels) per unit of launch power
    pub const HUMAN_POWER_DIVISOR: f64 = 20.0;
    /// Aim overlay length per unit of power
    pub const AIM_LINE_SCALE: f64 = 5.0;

    /// Seed used when settings don't provide one
    pub const DEFAULT_SEED: u64 = 0x5EED_F00D;
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f64, theta: f64) -> DVec2 {
    DVec2::new(r * theta.cos(), r * theta.sin())
}

/// Convert cartesian (x, y) to polar (r, theta)
#[inline]
pub fn cartesian_to_polar(v: DVec2) -> (f64, f64) {
    (v.length(), v.y.atan2(v.x))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_polar_roundtrip_axis() {
        let v = polar_to_cartesian(10.0, FRAC_PI_2);
        assert!(v.x.abs() < 1e-9);
        assert!((v.y - 10.0).abs() < 1e-9);

        let (r, theta) = cartesian_to_polar(DVec2::new(-3.0, 0.0));
        assert!((r - 3.0).abs() < 1e-9);
        assert!((theta - std::f64::consts::PI).abs() < 1e-9);
    }
}
