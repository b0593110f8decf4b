//! Data-driven game balance
//!
//! Every physics and generation constant the simulation reads lives here.
//! Defaults come from [`crate::consts`]; a JSON file may override any subset.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Why a tuning set was rejected
#[derive(Debug, Clone, PartialEq)]
pub enum TuningError {
    /// A value that must be strictly positive was not
    NotPositive { field: &'static str, value: f32 },
    /// A multiplicative coefficient outside `[0, 1]`
    OutOfUnitRange { field: &'static str, value: f32 },
    /// A `[min, max]` pair with `min > max`
    InvertedRange { field: &'static str, min: f32, max: f32 },
}

impl fmt::Display for TuningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotPositive { field, value } => {
                write!(f, "{field} must be positive (got {value})")
            }
            Self::OutOfUnitRange { field, value } => {
                write!(f, "{field} must be within [0, 1] (got {value})")
            }
            Self::InvertedRange { field, min, max } => {
                write!(f, "{field} range is inverted ({min} > {max})")
            }
        }
    }
}

impl std::error::Error for TuningError {}

/// Physics and generation parameters for a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Integrator ===
    pub gravity: f32,
    pub drag_x: f32,
    pub drag_y: f32,
    pub bounce_factor: f32,
    pub friction_factor: f32,
    /// Kept separate from `friction_factor`: settling damps harder than bouncing
    pub settle_friction_factor: f32,
    pub ground_bounce_threshold: f32,
    pub bounce_snap_epsilon: f32,
    pub roll_snap_epsilon: f32,
    pub still_speed_sq: f32,
    pub stop_frame_threshold: u32,
    pub offscreen_abort_factor: f32,

    // === Launch ===
    pub launch_power_max: f32,
    pub launch_min_power: f32,
    pub projectile_radius: f32,

    // === Archetype responses ===
    pub bush_damping: f32,
    pub rock_bounce_factor: f32,
    pub rock_damping: f32,
    pub spring_bounce_y: f32,
    pub spring_bounce_x_add: f32,
    pub spring_impact_factor: f32,
    pub bounce_box_bounce_y: f32,
    pub bounce_box_bounce_x_factor: f32,
    pub bounce_box_impact_factor: f32,
    pub boost_pad_speed: f32,
    pub boost_pad_launch_y: f32,
    pub boost_duration_frames: u32,
    pub ramp_launch_speed_factor: f32,
    pub ramp_launch_angle: f32,
    pub ramp_min_launch_speed: f32,
    pub stopper_halt_frames: u32,
    pub stopper_push_epsilon: f32,
    pub separation_factor: f32,

    // === Obstacle field ===
    pub obstacle_min_dist: f32,
    pub obstacle_max_dist: f32,
    pub frontier_start_factor: f32,
    pub generation_ahead_factor: f32,
    pub lookahead_per_speed: f32,
    pub prune_behind_factor: f32,

    // === Camera ===
    pub scroll_follow_factor: f32,
    pub camera_smoothing: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity: GRAVITY_FORCE,
            drag_x: DRAG_COEFFICIENT_X,
            drag_y: DRAG_COEFFICIENT_Y,
            bounce_factor: BOUNCE_FACTOR,
            friction_factor: FRICTION_FACTOR,
            settle_friction_factor: SETTLE_FRICTION_FACTOR,
            ground_bounce_threshold: GROUND_BOUNCE_THRESHOLD,
            bounce_snap_epsilon: BOUNCE_SNAP_EPSILON,
            roll_snap_epsilon: ROLL_SNAP_EPSILON,
            still_speed_sq: STILL_SPEED_SQ,
            stop_frame_threshold: STOP_FRAME_THRESHOLD,
            offscreen_abort_factor: OFFSCREEN_ABORT_FACTOR,

            launch_power_max: LAUNCH_POWER_MAX,
            launch_min_power: LAUNCH_MIN_POWER,
            projectile_radius: PROJECTILE_RADIUS,

            bush_damping: BUSH_DAMPING,
            rock_bounce_factor: ROCK_BOUNCE_FACTOR,
            rock_damping: ROCK_DAMPING,
            spring_bounce_y: SPRING_BOUNCE_Y,
            spring_bounce_x_add: SPRING_BOUNCE_X_ADD,
            spring_impact_factor: SPRING_IMPACT_FACTOR,
            bounce_box_bounce_y: BOUNCE_BOX_BOUNCE_Y,
            bounce_box_bounce_x_factor: BOUNCE_BOX_BOUNCE_X_FACTOR,
            bounce_box_impact_factor: BOUNCE_BOX_IMPACT_FACTOR,
            boost_pad_speed: BOOST_PAD_SPEED,
            boost_pad_launch_y: BOOST_PAD_LAUNCH_Y,
            boost_duration_frames: BOOST_DURATION_FRAMES,
            ramp_launch_speed_factor: RAMP_LAUNCH_SPEED_FACTOR,
            ramp_launch_angle: RAMP_LAUNCH_ANGLE,
            ramp_min_launch_speed: RAMP_MIN_LAUNCH_SPEED,
            stopper_halt_frames: STOPPER_HALT_FRAMES,
            stopper_push_epsilon: STOPPER_PUSH_EPSILON,
            separation_factor: SEPARATION_FACTOR,

            obstacle_min_dist: OBSTACLE_MIN_DIST,
            obstacle_max_dist: OBSTACLE_MAX_DIST,
            frontier_start_factor: FRONTIER_START_FACTOR,
            generation_ahead_factor: GENERATION_AHEAD_FACTOR,
            lookahead_per_speed: LOOKAHEAD_PER_SPEED,
            prune_behind_factor: PRUNE_BEHIND_FACTOR,

            scroll_follow_factor: SCROLL_FOLLOW_FACTOR,
            camera_smoothing: CAMERA_SMOOTHING,
        }
    }
}

impl Tuning {
    /// Parse a tuning set from JSON. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Parse and validate, falling back to defaults on any problem
    pub fn from_json_or_default(json: &str) -> Self {
        match Self::from_json(json) {
            Ok(tuning) => match tuning.validate() {
                Ok(()) => {
                    log::info!("Loaded tuning overrides");
                    tuning
                }
                Err(e) => {
                    log::warn!("Rejected tuning ({e}), using defaults");
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("Could not parse tuning ({e}), using defaults");
                Self::default()
            }
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Check the values the simulation relies on to stay well-behaved
    pub fn validate(&self) -> Result<(), TuningError> {
        let positive = [
            ("projectile_radius", self.projectile_radius),
            ("launch_power_max", self.launch_power_max),
            ("obstacle_min_dist", self.obstacle_min_dist),
            ("boost_pad_speed", self.boost_pad_speed),
        ];
        for (field, value) in positive {
            if !(value > 0.0) {
                return Err(TuningError::NotPositive { field, value });
            }
        }

        let unit = [
            ("drag_x", self.drag_x),
            ("drag_y", self.drag_y),
            ("bounce_factor", self.bounce_factor),
            ("friction_factor", self.friction_factor),
            ("settle_friction_factor", self.settle_friction_factor),
            ("bush_damping", self.bush_damping),
            ("rock_bounce_factor", self.rock_bounce_factor),
            ("rock_damping", self.rock_damping),
            ("camera_smoothing", self.camera_smoothing),
        ];
        for (field, value) in unit {
            if !(0.0..=1.0).contains(&value) {
                return Err(TuningError::OutOfUnitRange { field, value });
            }
        }

        if self.obstacle_min_dist > self.obstacle_max_dist {
            return Err(TuningError::InvertedRange {
                field: "obstacle_dist",
                min: self.obstacle_min_dist,
                max: self.obstacle_max_dist,
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert_eq!(Tuning::default().validate(), Ok(()));
    }

    #[test]
    fn test_settle_friction_stays_distinct() {
        let t = Tuning::default();
        assert!(t.settle_friction_factor < t.friction_factor);
        assert!((t.settle_friction_factor - 0.68).abs() < 1e-6);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let t = Tuning::from_json(r#"{ "gravity": 0.5 }"#).unwrap();
        assert_eq!(t.gravity, 0.5);
        assert_eq!(t.boost_duration_frames, BOOST_DURATION_FRAMES);
    }

    #[test]
    fn test_invalid_json_falls_back() {
        let t = Tuning::from_json_or_default("not json");
        assert_eq!(t, Tuning::default());
    }

    #[test]
    fn test_rejects_inverted_gap_range() {
        let t = Tuning {
            obstacle_min_dist: 700.0,
            ..Default::default()
        };
        assert!(matches!(
            t.validate(),
            Err(TuningError::InvertedRange { .. })
        ));
        assert_eq!(Tuning::from_json_or_default(&t.to_json().unwrap()), Tuning::default());
    }

    #[test]
    fn test_rejects_amplifying_drag() {
        let t = Tuning {
            drag_x: 1.2,
            ..Default::default()
        };
        let err = t.validate().unwrap_err();
        assert_eq!(err.to_string(), "drag_x must be within [0, 1] (got 1.2)");
    }
}
