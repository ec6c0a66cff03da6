//! Puck motion: friction, integration, and wall bounces

use super::state::Piece;
use crate::polar_to_cartesian;
use crate::tuning::Tuning;

/// Advance one puck by a single tick.
///
/// Friction decays the velocity first, then the puck moves. A puck that
/// ends up past an arena edge is clamped back onto it and its velocity on
/// that axis is reversed and damped. Axes are handled independently, so a
/// puck in a corner can bounce off both walls in the same tick.
pub fn advance(piece: &mut Piece, tuning: &Tuning) {
    if !piece.active {
        return;
    }

    piece.vel *= tuning.friction;
    piece.pos += piece.vel;

    let r = piece.radius;
    let restitution = tuning.wall_restitution;

    if piece.pos.x < r {
        piece.pos.x = r;
        piece.vel.x = -piece.vel.x * restitution;
    } else if piece.pos.x > tuning.arena_width - r {
        piece.pos.x = tuning.arena_width - r;
        piece.vel.x = -piece.vel.x * restitution;
    }

    if piece.pos.y < r {
        piece.pos.y = r;
        piece.vel.y = -piece.vel.y * restitution;
    } else if piece.pos.y > tuning.arena_height - r {
        piece.pos.y = tuning.arena_height - r;
        piece.vel.y = -piece.vel.y * restitution;
    }
}

/// Both velocity components below `epsilon`
#[inline]
pub fn is_settled(piece: &Piece, epsilon: f64) -> bool {
    piece.vel.x.abs() < epsilon && piece.vel.y.abs() < epsilon
}

/// Set a puck moving along `angle` at `power` (capped at `max_velocity`).
///
/// Replaces whatever velocity the puck had; relaunching a moving puck is
/// allowed.
pub fn launch(piece: &mut Piece, angle: f64, power: f64, max_velocity: f64) {
    if !piece.active {
        return;
    }
    let power = power.min(max_velocity);
    piece.vel = polar_to_cartesian(power, angle);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{PieceId, PlayerId};
    use glam::DVec2;
    use proptest::prelude::*;

    fn puck(x: f64, y: f64, vx: f64, vy: f64) -> Piece {
        let mut p = Piece::new(PieceId(0), PlayerId(0), DVec2::new(x, y), 20.0);
        p.vel = DVec2::new(vx, vy);
        p
    }

    #[test]
    fn test_left_wall_bounce() {
        let tuning = Tuning::default();
        let mut p = puck(10.0, 300.0, -5.0, 0.0);
        advance(&mut p, &tuning);
        assert_eq!(p.pos.x, 20.0);
        assert!((p.vel.x - 3.92).abs() < 1e-9);
        assert_eq!(p.vel.y, 0.0);
        assert_eq!(p.pos.y, 300.0);
    }

    #[test]
    fn test_corner_bounces_both_axes() {
        let tuning = Tuning::default();
        let mut p = puck(785.0, 585.0, 6.0, 6.0);
        advance(&mut p, &tuning);
        assert_eq!(p.pos, DVec2::new(780.0, 580.0));
        assert!(p.vel.x < 0.0 && p.vel.y < 0.0);
        assert!((p.vel.x + 6.0 * 0.98 * 0.8).abs() < 1e-9);
    }

    #[test]
    fn test_free_motion() {
        let tuning = Tuning::default();
        let mut p = puck(400.0, 300.0, 2.0, -1.0);
        advance(&mut p, &tuning);
        assert!((p.vel.x - 1.96).abs() < 1e-12);
        assert!((p.pos.x - 401.96).abs() < 1e-12);
        assert!((p.pos.y - 299.02).abs() < 1e-12);
    }

    #[test]
    fn test_launch_clamps_and_overwrites() {
        let mut p = puck(400.0, 300.0, -3.0, 7.0);
        launch(&mut p, 0.0, 25.0, 10.0);
        assert_eq!(p.vel, DVec2::new(10.0, 0.0));

        launch(&mut p, std::f64::consts::FRAC_PI_2, 4.0, 10.0);
        assert!(p.vel.x.abs() < 1e-12);
        assert!((p.vel.y - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_settled_threshold() {
        assert!(is_settled(&puck(0.0, 0.0, 0.09, -0.09), 0.1));
        assert!(!is_settled(&puck(0.0, 0.0, 0.1, 0.0), 0.1));
        assert!(!is_settled(&puck(0.0, 0.0, 0.0, -0.5), 0.1));
    }

    #[test]
    fn test_inactive_is_frozen() {
        let tuning = Tuning::default();
        let mut p = puck(10.0, 300.0, -5.0, 2.0);
        p.active = false;
        let before = p.clone();
        advance(&mut p, &tuning);
        launch(&mut p, 1.0, 5.0, 10.0);
        assert_eq!(p, before);
    }

    proptest! {
        #[test]
        fn prop_stays_inside_arena(
            x in -200.0f64..1000.0,
            y in -200.0f64..800.0,
            vx in -50.0f64..50.0,
            vy in -50.0f64..50.0,
        ) {
            let tuning = Tuning::default();
            let mut p = puck(x, y, vx, vy);
            advance(&mut p, &tuning);
            prop_assert!(p.pos.x >= p.radius && p.pos.x <= tuning.arena_width - p.radius);
            prop_assert!(p.pos.y >= p.radius && p.pos.y <= tuning.arena_height - p.radius);
        }

        #[test]
        fn prop_friction_never_speeds_up(
            x in 0.0f64..800.0,
            y in 0.0f64..600.0,
            vx in -10.0f64..10.0,
            vy in -10.0f64..10.0,
        ) {
            let tuning = Tuning::default();
            let mut p = puck(x, y, vx, vy);
            let before = p.vel.length();
            advance(&mut p, &tuning);
            prop_assert!(p.vel.length() <= before);
        }
    }
}
