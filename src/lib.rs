//! Pixel Launch - a launch-and-fly physics toy
//!
//! Core modules:
//! - `sim`: Frame-coupled simulation (integrator, collisions, obstacle field, game phases)
//! - `tuning`: Data-driven physics and generation balance

pub mod sim;
pub mod tuning;

pub use sim::{FrameInput, GamePhase, SimulationSession, Snapshot, tick};
pub use tuning::{Tuning, TuningError};

use glam::Vec2;

/// Game configuration constants
///
/// Physics, archetype and field values are only the defaults baked into
/// [`Tuning::default`]; the simulation reads those from the session's `Tuning`.
/// Launcher geometry, aim limits, the metre scale and the cull margin are fixed
/// and read from here directly.
pub mod consts {
    use std::f32::consts::PI;

    /// Target frame rate. Every timer in the sim counts frames at this cadence.
    pub const FRAME_RATE: u32 = 60;

    /// Ground line as a fraction of viewport height
    pub const GROUND_LEVEL_PERCENT: f32 = 0.85;
    /// Launcher sits this far above the ground line
    pub const LAUNCHER_GROUND_OFFSET: f32 = 30.0;
    /// Launcher world x
    pub const LAUNCHER_X: f32 = 100.0;
    /// Distance from launcher pivot to muzzle
    pub const MUZZLE_DISTANCE: f32 = 35.0;
    pub const DEFAULT_AIM_ANGLE: f32 = -PI / 4.0;
    pub const DEFAULT_AIM_POWER: f32 = 10.0;
    /// Aim angle clamp (screen space, y grows downward)
    pub const AIM_ANGLE_MIN: f32 = -PI * 0.9;
    pub const AIM_ANGLE_MAX: f32 = -PI * 0.05;

    /// Per-frame gravity (pixels/frame²)
    pub const GRAVITY_FORCE: f32 = 0.4;
    pub const DRAG_COEFFICIENT_X: f32 = 0.995;
    pub const DRAG_COEFFICIENT_Y: f32 = 0.997;
    pub const LAUNCH_POWER_MAX: f32 = 35.0;
    /// Releases at or below this power are discarded
    pub const LAUNCH_MIN_POWER: f32 = 1.0;

    pub const PROJECTILE_RADIUS: f32 = 15.0;
    pub const BOUNCE_FACTOR: f32 = 0.7;
    pub const FRICTION_FACTOR: f32 = 0.8;
    /// Rolling friction once bounces have died out (FRICTION_FACTOR * 0.85)
    pub const SETTLE_FRICTION_FACTOR: f32 = FRICTION_FACTOR * 0.85;
    /// Impacts slower than this settle instead of bouncing
    pub const GROUND_BOUNCE_THRESHOLD: f32 = 1.0;
    pub const BOUNCE_SNAP_EPSILON: f32 = 0.5;
    pub const ROLL_SNAP_EPSILON: f32 = 0.05;

    /// Squared speed below which the projectile counts as still
    pub const STILL_SPEED_SQ: f32 = 0.01;
    /// Round ends once the stillness counter exceeds this
    pub const STOP_FRAME_THRESHOLD: u32 = 45;
    /// Off-screen-left abort margin, in viewport widths
    pub const OFFSCREEN_ABORT_FACTOR: f32 = 0.7;

    pub const BUSH_DAMPING: f32 = 0.88;
    pub const ROCK_BOUNCE_FACTOR: f32 = 0.6;
    pub const ROCK_DAMPING: f32 = 0.98;
    pub const SPRING_BOUNCE_Y: f32 = -30.0;
    pub const SPRING_BOUNCE_X_ADD: f32 = 3.0;
    pub const SPRING_IMPACT_FACTOR: f32 = 0.4;
    pub const BOUNCE_BOX_BOUNCE_Y: f32 = -25.0;
    pub const BOUNCE_BOX_BOUNCE_X_FACTOR: f32 = 0.98;
    pub const BOUNCE_BOX_IMPACT_FACTOR: f32 = 0.5;
    pub const BOOST_PAD_SPEED: f32 = 40.0;
    pub const BOOST_PAD_LAUNCH_Y: f32 = -30.0;
    pub const BOOST_DURATION_FRAMES: u32 = 100;
    pub const RAMP_LAUNCH_SPEED_FACTOR: f32 = 1.3;
    pub const RAMP_LAUNCH_ANGLE: f32 = -PI / 5.0;
    pub const RAMP_MIN_LAUNCH_SPEED: f32 = LAUNCH_POWER_MAX * 0.8;
    /// Stopper parks the counter past the threshold
    pub const STOPPER_HALT_FRAMES: u32 = 100;
    pub const STOPPER_PUSH_EPSILON: f32 = 0.1;
    /// Positional over-correction when separating from an obstacle
    pub const SEPARATION_FACTOR: f32 = 1.05;

    pub const OBSTACLE_MIN_DIST: f32 = 280.0;
    pub const OBSTACLE_MAX_DIST: f32 = 650.0;
    /// First obstacle frontier, in viewport widths past the launcher
    pub const FRONTIER_START_FACTOR: f32 = 0.7;
    pub const GENERATION_AHEAD_FACTOR: f32 = 1.5;
    /// Extra lookahead per unit of horizontal speed
    pub const LOOKAHEAD_PER_SPEED: f32 = 10.0;
    pub const PRUNE_BEHIND_FACTOR: f32 = 0.5;

    pub const SCROLL_FOLLOW_FACTOR: f32 = 0.3;
    pub const CAMERA_SMOOTHING: f32 = 0.1;
    /// Horizontal slack around the viewport for visibility culling
    pub const VISIBLE_MARGIN: f32 = 100.0;

    /// World pixels per displayed metre
    pub const PIXELS_PER_METRE: f32 = 10.0;
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

/// Linearly map `value` from `[in_min, in_max]` to `[out_min, out_max]`, clamped to the output range
#[inline]
pub fn map_range_clamped(value: f32, in_min: f32, in_max: f32, out_min: f32, out_max: f32) -> f32 {
    if (in_max - in_min).abs() < f32::EPSILON {
        return out_min;
    }
    let t = ((value - in_min) / (in_max - in_min)).clamp(0.0, 1.0);
    out_min + (out_max - out_min) * t
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn test_polar_to_cartesian() {
        let v = polar_to_cartesian(10.0, -PI / 2.0);
        assert!(v.x.abs() < 1e-4);
        assert!((v.y + 10.0).abs() < 1e-4);
    }

    #[test]
    fn test_map_range_clamped() {
        assert_eq!(map_range_clamped(50.0, 0.0, 100.0, 0.0, 35.0), 17.5);
        assert_eq!(map_range_clamped(500.0, 0.0, 100.0, 0.0, 35.0), 35.0);
        assert_eq!(map_range_clamped(-5.0, 0.0, 100.0, 0.0, 35.0), 0.0);
        // Degenerate input range
        assert_eq!(map_range_clamped(3.0, 0.0, 0.0, 0.0, 35.0), 0.0);
    }
}
