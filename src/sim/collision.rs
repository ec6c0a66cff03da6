//! Puck-puck collision detection and response
//!
//! Pucks are equal-mass discs. Overlapping pairs that are closing get a
//! symmetric, slightly inelastic impulse along the line of centres, then are
//! pushed apart so they stop interpenetrating.

use glam::DVec2;
use rand::Rng;

use super::state::Piece;
use crate::tuning::Tuning;

/// Result of resolving one pair
#[derive(Debug, Clone, PartialEq)]
pub struct CollisionResult {
    /// The discs overlapped
    pub hit: bool,
    /// Unit vector from the first puck's centre to the second's
    pub normal: DVec2,
    /// Impulse scalar; the first puck got `-impulse * normal`, the second
    /// `+impulse * normal`
    pub impulse: f64,
    /// Depth of overlap before separation
    pub penetration: f64,
    /// Response was applied (false when the pair was already separating)
    pub resolved: bool,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            normal: DVec2::ZERO,
            impulse: 0.0,
            penetration: 0.0,
            resolved: false,
        }
    }
}

/// Resolve a single pair of pucks.
///
/// Coincident centres have no usable normal, so the second puck is nudged by
/// a small random offset first.
pub fn resolve_pair<R: Rng + ?Sized>(
    a: &mut Piece,
    b: &mut Piece,
    tuning: &Tuning,
    rng: &mut R,
) -> CollisionResult {
    if !a.active || !b.active {
        return CollisionResult::miss();
    }

    let mut delta = b.pos - a.pos;
    let mut distance = delta.length();

    if distance < tuning.degenerate_distance {
        b.pos += DVec2::new(
            rng.random_range(tuning.jitter_min..tuning.jitter_max),
            rng.random_range(tuning.jitter_min..tuning.jitter_max),
        );
        delta = b.pos - a.pos;
        distance = delta.length();
    }

    let min_distance = a.radius + b.radius;
    if distance >= min_distance {
        return CollisionResult::miss();
    }

    let normal = delta / distance;
    let penetration = min_distance - distance;

    // Negative when the pucks are closing
    let vn = (b.vel - a.vel).dot(normal);
    if vn > 0.0 {
        return CollisionResult {
            hit: true,
            normal,
            impulse: 0.0,
            penetration,
            resolved: false,
        };
    }

    let impulse = -tuning.collision_impulse * vn / 2.0;
    a.vel -= impulse * normal;
    b.vel += impulse * normal;

    let push = 0.5 * penetration;
    a.pos -= push * normal;
    b.pos += push * normal;

    CollisionResult {
        hit: true,
        normal,
        impulse,
        penetration,
        resolved: true,
    }
}

/// Resolve every unordered pair of active pucks once, in arena order.
///
/// Returns how many pairs were resolved. Simultaneous multi-puck contacts
/// are handled pair by pair, so the outcome depends on arena order.
pub fn resolve_all<R: Rng + ?Sized>(
    pieces: &mut [Piece],
    tuning: &Tuning,
    rng: &mut R,
) -> usize {
    let mut resolved = 0;
    for i in 0..pieces.len() {
        if !pieces[i].active {
            continue;
        }
        for j in (i + 1)..pieces.len() {
            if !pieces[j].active {
                continue;
            }
            let (head, tail) = pieces.split_at_mut(j);
            if resolve_pair(&mut head[i], &mut tail[0], tuning, rng).resolved {
                resolved += 1;
            }
        }
    }
    resolved
}
