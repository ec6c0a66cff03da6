//! Data-driven game balance
//!
//! Every rule constant lives here so a match can be re-tuned from JSON
//! without touching the engine. Fields missing from the JSON keep their
//! defaults.

use std::time::Duration;

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::TuningError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Geometry ===
    pub arena_width: f64,
    pub arena_height: f64,
    pub board_width: f64,
    pub board_height: f64,
    pub divider_width: f64,
    pub goal_inset: f64,
    pub puck_radius: f64,
    pub hole_radius: f64,
    pub hole_margin: f64,

    // === Physics ===
    pub max_velocity: f64,
    pub friction: f64,
    pub wall_restitution: f64,
    pub motion_epsilon: f64,
    pub collision_impulse: f64,
    pub degenerate_distance: f64,
    pub jitter_min: f64,
    pub jitter_max: f64,

    // === Turns ===
    pub pucks_per_player: usize,
    pub cooldown_ticks: u32,
    pub required_settled_frames: u32,

    // === Actors ===
    pub ai_think_ticks: u32,
    pub ai_aim_jitter: f64,
    pub ai_power_divisor: f64,
    pub ai_power_fraction: f64,
    pub human_power_divisor: f64,

    pub target_fps: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            arena_width: ARENA_WIDTH,
            arena_height: ARENA_HEIGHT,
            board_width: BOARD_WIDTH,
            board_height: BOARD_HEIGHT,
            divider_width: DIVIDER_WIDTH,
            goal_inset: GOAL_INSET,
            puck_radius: PUCK_RADIUS,
            hole_radius: HOLE_RADIUS,
            hole_margin: HOLE_MARGIN,

            max_velocity: MAX_VELOCITY,
            friction: FRICTION,
            wall_restitution: WALL_RESTITUTION,
            motion_epsilon: MOTION_EPSILON,
            collision_impulse: COLLISION_IMPULSE,
            degenerate_distance: DEGENERATE_DISTANCE,
            jitter_min: JITTER_MIN,
            jitter_max: JITTER_MAX,

            pucks_per_player: PUCKS_PER_PLAYER,
            cooldown_ticks: COOLDOWN_TICKS,
            required_settled_frames: REQUIRED_SETTLED_FRAMES,

            ai_think_ticks: AI_THINK_TICKS,
            ai_aim_jitter: AI_AIM_JITTER,
            ai_power_divisor: AI_POWER_DIVISOR,
            ai_power_fraction: AI_POWER_FRACTION,
            human_power_divisor: HUMAN_POWER_DIVISOR,

            target_fps: TARGET_FPS,
        }
    }
}

impl Tuning {
    /// Parse and validate tuning from JSON
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Self = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Reject values the engine can't run with
    pub fn validate(&self) -> Result<(), TuningError> {
        let finite = [
            ("arena_width", self.arena_width),
            ("arena_height", self.arena_height),
            ("board_width", self.board_width),
            ("board_height", self.board_height),
            ("divider_width", self.divider_width),
            ("goal_inset", self.goal_inset),
            ("puck_radius", self.puck_radius),
            ("hole_radius", self.hole_radius),
            ("hole_margin", self.hole_margin),
            ("max_velocity", self.max_velocity),
            ("friction", self.friction),
            ("wall_restitution", self.wall_restitution),
            ("motion_epsilon", self.motion_epsilon),
            ("collision_impulse", self.collision_impulse),
            ("degenerate_distance", self.degenerate_distance),
            ("jitter_min", self.jitter_min),
            ("jitter_max", self.jitter_max),
            ("ai_aim_jitter", self.ai_aim_jitter),
            ("ai_power_divisor", self.ai_power_divisor),
            ("ai_power_fraction", self.ai_power_fraction),
            ("human_power_divisor", self.human_power_divisor),
        ];
        for (field, value) in finite {
            if !value.is_finite() {
                return Err(TuningError::invalid(field, format!("{value} is not finite")));
            }
        }

        let positive = [
            ("arena_width", self.arena_width),
            ("arena_height", self.arena_height),
            ("board_width", self.board_width),
            ("board_height", self.board_height),
            ("puck_radius", self.puck_radius),
            ("hole_radius", self.hole_radius),
            ("max_velocity", self.max_velocity),
            ("motion_epsilon", self.motion_epsilon),
            ("degenerate_distance", self.degenerate_distance),
            ("ai_power_divisor", self.ai_power_divisor),
            ("human_power_divisor", self.human_power_divisor),
        ];
        for (field, value) in positive {
            if value <= 0.0 {
                return Err(TuningError::invalid(field, format!("{value} must be positive")));
            }
        }

        if !(self.friction > 0.0 && self.friction < 1.0) {
            return Err(TuningError::invalid("friction", "must lie in (0, 1)"));
        }
        if !(0.0..=1.0).contains(&self.wall_restitution) {
            return Err(TuningError::invalid("wall_restitution", "must lie in [0, 1]"));
        }
        if self.jitter_min <= 0.0 || self.jitter_min >= self.jitter_max {
            return Err(TuningError::invalid(
                "jitter_min",
                "jitter range must be positive and non-empty",
            ));
        }
        if self.board_width > self.arena_width || self.board_height > self.arena_height {
            return Err(TuningError::invalid("board_width", "board must fit inside the arena"));
        }
        if 2.0 * self.puck_radius > self.arena_width.min(self.arena_height) {
            return Err(TuningError::invalid("puck_radius", "puck doesn't fit in the arena"));
        }
        if self.ai_aim_jitter < 0.0 {
            return Err(TuningError::invalid("ai_aim_jitter", "must not be negative"));
        }
        if !(0.0..=1.0).contains(&self.ai_power_fraction) {
            return Err(TuningError::invalid("ai_power_fraction", "must lie in [0, 1]"));
        }
        if self.pucks_per_player == 0 {
            return Err(TuningError::invalid("pucks_per_player", "need at least one puck"));
        }
        if self.target_fps == 0 {
            return Err(TuningError::invalid("target_fps", "must be non-zero"));
        }
        Ok(())
    }

    /// Top-left corner of the board (board is centred in the arena)
    pub fn board_origin(&self) -> DVec2 {
        DVec2::new(
            ((self.arena_width - self.board_width) / 2.0).floor(),
            ((self.arena_height - self.board_height) / 2.0).floor(),
        )
    }

    /// Wall-clock length of one tick at the target frame rate
    pub fn tick_duration(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.target_fps.max(1) as f64)
    }

    /// Distance below which a puck drops into a hole
    pub fn capture_radius(&self) -> f64 {
        self.hole_radius - self.hole_margin
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(Tuning::default().validate().is_ok());
        assert_eq!(Tuning::default().board_origin(), DVec2::new(50.0, 50.0));
        assert_eq!(Tuning::default().capture_radius(), 20.0);
        assert_eq!(Tuning::default().tick_duration().as_micros(), 16_666);
    }

    #[test]
    fn test_long_run_duration_does_not_wrap() {
        let ticks = u32::MAX as u64 + 60;
        let played = Tuning::default().tick_duration().mul_f64(ticks as f64);
        assert!(played.as_secs_f64() > u32::MAX as f64 / 60.0);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "friction": 0.9, "pucks_per_player": 3 }"#).unwrap();
        assert_eq!(tuning.friction, 0.9);
        assert_eq!(tuning.pucks_per_player, 3);
        assert_eq!(tuning.max_velocity, MAX_VELOCITY);
        assert_eq!(tuning.cooldown_ticks, COOLDOWN_TICKS);
    }

    #[test]
    fn test_rejects_bad_friction() {
        let err = Tuning::from_json(r#"{ "friction": 1.0 }"#).unwrap_err();
        assert!(matches!(err, TuningError::Invalid { field: "friction", .. }));
    }

    #[test]
    fn test_rejects_malformed_json() {
        let err = Tuning::from_json("{ friction: ").unwrap_err();
        assert!(matches!(err, TuningError::Parse(_)));
    }

    #[test]
    fn test_rejects_zero_pucks() {
        let tuning = Tuning {
            pucks_per_player: 0,
            ..Default::default()
        };
        assert!(tuning.validate().is_err());
    }
}
