//! Per-frame projectile integration
//!
//! Frame-coupled explicit Euler: one call advances exactly one frame at the
//! fixed 60 Hz cadence. Velocities are in pixels per frame.

use super::state::Projectile;
use crate::tuning::Tuning;

/// Apply gravity, drag or boost, move, then resolve contact with the ground line
pub fn integrate(p: &mut Projectile, ground_y: f32, t: &Tuning) {
    p.vel.y += t.gravity;

    if p.is_boosting {
        p.boost_timer = p.boost_timer.saturating_sub(1);
        // Boost only ever raises horizontal speed, and skips horizontal drag
        p.vel.x = p.vel.x.max(t.boost_pad_speed);
        p.vel.y *= t.drag_y;
        if p.boost_timer == 0 {
            p.is_boosting = false;
        }
    } else {
        p.vel.x *= t.drag_x;
        p.vel.y *= t.drag_y;
    }

    p.pos += p.vel;

    resolve_ground(p, ground_y, t);
}

/// Clamp to the ground line and bounce, settle, or roll
pub fn resolve_ground(p: &mut Projectile, ground_y: f32, t: &Tuning) {
    let rest_y = ground_y - p.radius;
    if p.pos.y < rest_y {
        p.on_ground = false;
        return;
    }

    p.pos.y = rest_y;
    p.on_ground = true;

    if p.vel.y.abs() > t.ground_bounce_threshold {
        p.vel.y *= -t.bounce_factor;
        if !p.is_boosting {
            p.vel.x *= t.friction_factor;
        }
        if p.vel.y.abs() < t.bounce_snap_epsilon {
            p.vel.y = 0.0;
        }
    } else {
        p.vel.y = 0.0;
        if !p.is_boosting {
            p.vel.x *= t.settle_friction_factor;
            if p.vel.x.abs() < t.roll_snap_epsilon {
                p.vel.x = 0.0;
            }
        }
    }
}

/// Advance the stillness counter. Returns true once the round should end.
///
/// A boosting projectile is never still. A counter already parked past the
/// threshold (stopper hit) keeps counting as long as the projectile is still,
/// even before it touches the ground. A projectile perched on an obstacle top
/// with no horizontal speed counts too, however it bobs vertically.
pub fn update_stillness(p: &mut Projectile, t: &Tuning) -> bool {
    if p.is_boosting {
        p.stopped_frames = 0;
        return false;
    }

    let still = p.vel.length_squared() < t.still_speed_sq;
    let halted = p.stopped_frames > t.stop_frame_threshold;
    let perched = p.perched && p.vel.x == 0.0;
    if (still && (p.on_ground || halted)) || perched {
        p.stopped_frames = p.stopped_frames.saturating_add(1);
    } else {
        p.stopped_frames = 0;
    }

    p.stopped_frames > t.stop_frame_threshold
}
