//! Collision detection and response for the obstacle field
//!
//! Circle-vs-axis-aligned-box: a cheap bounding-box reject, then the exact
//! closest-point test. Only the first overlapping obstacle (in spawn order)
//! is resolved each frame.

use glam::Vec2;

use super::state::{Obstacle, ObstacleKind, Projectile};
use crate::polar_to_cartesian;
use crate::tuning::Tuning;

/// Contact between the projectile and one obstacle
#[derive(Debug, Clone)]
pub struct Contact {
    /// Closest point on the obstacle to the projectile center
    pub point: Vec2,
    /// Separation direction, pointing from the obstacle toward the projectile
    pub normal: Vec2,
    /// Center-to-surface distance (0 when the center is inside the box)
    pub distance: f32,
    /// How far the circle overlaps the box
    pub penetration: f32,
}

/// Closest point on the obstacle rectangle to `center`
#[inline]
pub fn closest_point(center: Vec2, obs: &Obstacle) -> Vec2 {
    Vec2::new(
        center.x.clamp(obs.x, obs.right()),
        center.y.clamp(obs.y, obs.bottom()),
    )
}

/// Does a circle overlap the obstacle?
pub fn circle_overlaps(center: Vec2, radius: f32, obs: &Obstacle) -> bool {
    // Bounding-box reject first
    if center.x + radius <= obs.x
        || center.x - radius >= obs.right()
        || center.y + radius <= obs.y
        || center.y - radius >= obs.bottom()
    {
        return false;
    }
    center.distance_squared(closest_point(center, obs)) < radius * radius
}

/// Index of the first obstacle (in collection order) the circle overlaps
pub fn first_overlap(center: Vec2, radius: f32, obstacles: &[Obstacle]) -> Option<usize> {
    obstacles
        .iter()
        .position(|obs| circle_overlaps(center, radius, obs))
}

/// Compute the contact for a circle known to overlap `obs`
pub fn contact(center: Vec2, radius: f32, obs: &Obstacle) -> Contact {
    let point = closest_point(center, obs);
    let offset = center - point;
    let distance = offset.length();
    // Center inside the box: no usable direction, push straight up
    let normal = if distance == 0.0 {
        Vec2::NEG_Y
    } else {
        offset / distance
    };
    Contact {
        point,
        normal,
        distance,
        penetration: radius - distance,
    }
}

/// Reflect the approaching part of `vel` along `normal` with restitution
#[inline]
pub fn bounce_velocity(vel: Vec2, normal: Vec2, restitution: f32) -> Vec2 {
    let vn = vel.dot(normal);
    if vn < 0.0 {
        vel + normal * (-(1.0 + restitution) * vn)
    } else {
        vel
    }
}

/// Check the projectile against every live obstacle and resolve the first hit.
/// Returns the archetype that was hit, if any.
pub fn check_obstacle_collisions(
    p: &mut Projectile,
    obstacles: &[Obstacle],
    t: &Tuning,
) -> Option<ObstacleKind> {
    let idx = first_overlap(p.pos, p.radius, obstacles)?;
    let obs = &obstacles[idx];
    handle_collision(p, obs, t);
    log::debug!(
        "Hit {:?} at ({:.0}, {:.0}), vel now ({:.1}, {:.1})",
        obs.kind,
        obs.x,
        obs.y,
        p.vel.x,
        p.vel.y
    );
    Some(obs.kind)
}

/// Push the projectile out of `obs` and apply the archetype's response
pub fn handle_collision(p: &mut Projectile, obs: &Obstacle, t: &Tuning) {
    let c = contact(p.pos, p.radius, obs);

    // Slight over-correction so we don't start next frame still embedded
    p.pos += c.normal * (c.penetration * t.separation_factor);

    let vel_original = p.vel;
    p.perched = false;

    match obs.kind {
        ObstacleKind::Bush => {
            p.vel *= t.bush_damping;
            if c.normal.y < -0.1 {
                p.vel.y = p.vel.y.min(-1.0);
            }
            p.cancel_boost();
        }
        ObstacleKind::Rock => {
            p.vel = bounce_velocity(p.vel, c.normal, t.rock_bounce_factor);
            if vel_original.dot(c.normal) < 0.0 && !p.is_boosting {
                p.vel *= t.rock_damping;
            }
            // Landed on top with almost no bounce left: pop it off the edge
            if c.normal.y < -0.9 && p.vel.y.abs() < 1.0 {
                p.vel.y = -1.0;
                p.on_ground = false;
            }
            p.cancel_boost();
        }
        ObstacleKind::Spring => {
            p.vel.y = t.spring_bounce_y - (vel_original.y * t.spring_impact_factor).abs();
            p.vel.x += t.spring_bounce_x_add;
            p.on_ground = false;
            p.cancel_boost();
        }
        ObstacleKind::BounceBox => {
            p.vel.y = t.bounce_box_bounce_y - (vel_original.y * t.bounce_box_impact_factor).abs();
            p.vel.x *= t.bounce_box_bounce_x_factor;
            p.on_ground = false;
            p.cancel_boost();
        }
        ObstacleKind::BoostPad => {
            p.start_boost(t.boost_duration_frames);
            p.vel = Vec2::new(t.boost_pad_speed, t.boost_pad_launch_y);
            p.on_ground = false;
        }
        ObstacleKind::Ramp => {
            let speed = (vel_original.length() * t.ramp_launch_speed_factor)
                .max(t.ramp_min_launch_speed);
            p.vel = polar_to_cartesian(speed, t.ramp_launch_angle);
            p.on_ground = false;
            p.cancel_boost();
        }
        ObstacleKind::Stopper => {
            p.vel = Vec2::ZERO;
            p.stopped_frames = t.stopper_halt_frames;
            p.cancel_boost();
            park_against_face(p, obs, c.normal, t.stopper_push_epsilon);
        }
    }

    // On top of a block with the horizontal speed spent: nothing left to travel
    let supports = matches!(
        obs.kind,
        ObstacleKind::Bush | ObstacleKind::Rock | ObstacleKind::BounceBox
    );
    if supports && c.normal.y < -0.1 {
        if p.vel.x.abs() < t.roll_snap_epsilon {
            p.vel.x = 0.0;
        }
        p.perched = p.vel.x == 0.0;
    }
}

/// Place the projectile flush against the face it hit, `gap` clear of it
fn park_against_face(p: &mut Projectile, obs: &Obstacle, normal: Vec2, gap: f32) {
    if normal.x.abs() > normal.y.abs() {
        p.pos.x = if normal.x > 0.0 {
            obs.right() + p.radius + gap
        } else {
            obs.x - p.radius - gap
        };
    } else if normal.y < 0.0 {
        p.pos.y = obs.y - p.radius - gap;
    } else {
        p.pos.y = obs.bottom() + p.radius + gap;
    }
}
