//! Game state and core simulation types
//!
//! Everything the frame loop mutates lives in [`SimulationSession`]. Renderers
//! only ever see it through [`Snapshot`].

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::camera::Camera;
use crate::consts::*;
use crate::tuning::Tuning;
use crate::{map_range_clamped, polar_to_cartesian};

/// Current phase of a round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title card, waiting for the first press
    #[default]
    Instructions,
    /// Dragging out an aim vector
    Aiming,
    /// Projectile in the air (or rolling)
    Flying,
    /// Round over, distance on screen
    Result,
}

/// The fixed launcher the projectile leaves from
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Launcher {
    pub pos: Vec2,
    /// Aim angle in radians, screen space (negative is up)
    pub angle: f32,
    pub power: f32,
}

impl Launcher {
    pub fn new(ground_y: f32) -> Self {
        Self {
            pos: Vec2::new(LAUNCHER_X, ground_y - LAUNCHER_GROUND_OFFSET),
            angle: DEFAULT_AIM_ANGLE,
            power: DEFAULT_AIM_POWER,
        }
    }

    /// Where the projectile sits while aiming
    pub fn muzzle(&self) -> Vec2 {
        self.pos + polar_to_cartesian(MUZZLE_DISTANCE, self.angle)
    }

    pub fn reset_aim(&mut self) {
        self.angle = DEFAULT_AIM_ANGLE;
        self.power = DEFAULT_AIM_POWER;
    }

    /// Set angle and power from a raw drag vector.
    ///
    /// The angle is clamped to "mostly upward"; power maps the drag length
    /// from `[0, viewport_width / 3]` onto `[0, power_max]`.
    pub fn aim_from_drag(&mut self, drag: Vec2, viewport_width: f32, power_max: f32) {
        self.angle = drag.y.atan2(drag.x).clamp(AIM_ANGLE_MIN, AIM_ANGLE_MAX);
        self.power = map_range_clamped(drag.length(), 0.0, viewport_width / 3.0, 0.0, power_max);
    }

    pub fn launch_velocity(&self) -> Vec2 {
        polar_to_cartesian(self.power, self.angle)
    }

    /// Aim angle in degrees above the horizon, for the HUD
    pub fn elevation_degrees(&self) -> f32 {
        -self.angle.to_degrees()
    }
}

/// The simulated body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub on_ground: bool,
    /// Consecutive frames spent grounded and still
    pub stopped_frames: u32,
    pub is_boosting: bool,
    /// Frames of boost left (60 per second)
    pub boost_timer: u32,
    /// Came to a horizontal stop on top of an obstacle
    #[serde(default)]
    pub perched: bool,
}

impl Projectile {
    pub fn new(pos: Vec2, radius: f32) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            radius,
            on_ground: false,
            stopped_frames: 0,
            is_boosting: false,
            boost_timer: 0,
            perched: false,
        }
    }

    pub fn start_boost(&mut self, frames: u32) {
        self.is_boosting = frames > 0;
        self.boost_timer = frames;
    }

    pub fn cancel_boost(&mut self) {
        self.is_boosting = false;
        self.boost_timer = 0;
    }

    /// Whole seconds of boost left, rounded up
    pub fn boost_seconds_remaining(&self) -> u32 {
        self.boost_timer.div_ceil(FRAME_RATE)
    }
}

/// Obstacle archetypes, each with its own collision response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleKind {
    /// Soft absorber
    Bush,
    /// Rigid bounce
    Rock,
    /// Strong vertical launch with a forward nudge
    Spring,
    /// Ends the round on contact
    Stopper,
    /// Vertical launch, slightly weaker than a spring
    BounceBox,
    /// Timed horizontal boost
    BoostPad,
    /// Redirects all speed up and forward
    Ramp,
}

/// An axis-aligned obstacle in world space (immutable once spawned)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    pub kind: ObstacleKind,
    /// Hovering above the ground instead of resting on it
    #[serde(default)]
    pub floating: bool,
}

impl Obstacle {
    pub fn new(kind: ObstacleKind, x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            x,
            y,
            w,
            h,
            kind,
            floating: false,
        }
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }
}

/// One play session. Constructed once; `reset` swaps out per-round state.
#[derive(Debug, Clone)]
pub struct SimulationSession {
    pub tuning: Tuning,
    pub phase: GamePhase,
    /// Viewport size in pixels (width, height)
    pub viewport: Vec2,
    /// World y of the ground surface
    pub ground_y: f32,
    pub launcher: Launcher,
    pub projectile: Projectile,
    /// Live obstacles, in spawn order
    pub obstacles: Vec<Obstacle>,
    pub camera: Camera,
    /// Rightmost x obstacles have been generated up to
    pub frontier: f32,
    pub current_distance: f32,
    /// Best distance this process has seen. Never reset.
    pub max_distance: f32,
    /// `max_distance` as it stood when the current flight was launched
    pub best_at_launch: f32,
    /// Pointer position where the current charge began
    pub charge_start: Option<Vec2>,
    /// Frames simulated since construction
    pub frame: u64,
    pub seed: u64,
    pub(crate) rng: Pcg32,
}

impl SimulationSession {
    /// Create a session for a viewport, starting on the instructions card
    pub fn new(seed: u64, width: f32, height: f32, tuning: Tuning) -> Self {
        let ground_y = height * GROUND_LEVEL_PERCENT;
        let launcher = Launcher::new(ground_y);
        let projectile = Projectile::new(launcher.muzzle(), tuning.projectile_radius);

        let mut session = Self {
            tuning,
            phase: GamePhase::Instructions,
            viewport: Vec2::new(width, height),
            ground_y,
            launcher,
            projectile,
            obstacles: Vec::new(),
            camera: Camera::default(),
            frontier: 0.0,
            current_distance: 0.0,
            max_distance: 0.0,
            best_at_launch: 0.0,
            charge_start: None,
            frame: 0,
            seed,
            rng: Pcg32::seed_from_u64(seed),
        };
        session.reset();

        log::info!(
            "Session created: seed={} viewport={}x{}",
            seed,
            width,
            height
        );
        session
    }

    /// Start a fresh round. Leaves `phase` and `max_distance` alone.
    pub fn reset(&mut self) {
        self.launcher.reset_aim();
        self.projectile = Projectile::new(self.launcher.muzzle(), self.tuning.projectile_radius);
        self.obstacles.clear();
        self.camera = Camera::default();
        self.current_distance = 0.0;
        self.frontier = self.launcher.pos.x + self.viewport.x * self.tuning.frontier_start_factor;
        self.charge_start = None;
    }

    pub fn is_charging(&self) -> bool {
        self.charge_start.is_some()
    }

    /// Refresh both distance counters from the projectile position
    pub fn update_distance(&mut self) {
        self.current_distance = (self.projectile.pos.x - self.launcher.pos.x).max(0.0);
        self.max_distance = self.max_distance.max(self.current_distance);
    }

    pub fn distance_metres(&self) -> f32 {
        self.current_distance / PIXELS_PER_METRE
    }

    pub fn best_metres(&self) -> f32 {
        self.max_distance / PIXELS_PER_METRE
    }

    /// Did the current flight beat every earlier one? A tie does not count.
    pub fn is_new_best(&self) -> bool {
        self.current_distance > self.best_at_launch
    }

    /// Launch power as a percentage of the maximum
    pub fn power_percent(&self) -> f32 {
        self.launcher.power / self.tuning.launch_power_max * 100.0
    }

    /// Obstacles overlapping the viewport plus a small margin
    pub fn visible_obstacles(&self) -> impl Iterator<Item = &Obstacle> {
        let (left, right) = self.camera.visible_span(self.viewport.x, VISIBLE_MARGIN);
        self.obstacles
            .iter()
            .filter(move |o| o.right() > left && o.x < right)
    }

    /// Read-only view for renderers
    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            phase: self.phase,
            launcher: &self.launcher,
            projectile: &self.projectile,
            obstacles: &self.obstacles,
            camera_x: self.camera.x,
            current_distance: self.current_distance,
            max_distance: self.max_distance,
            is_charging: self.is_charging(),
        }
    }
}

/// Per-frame read-only view of the session
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot<'a> {
    pub phase: GamePhase,
    pub launcher: &'a Launcher,
    pub projectile: &'a Projectile,
    pub obstacles: &'a [Obstacle],
    pub camera_x: f32,
    pub current_distance: f32,
    pub max_distance: f32,
    pub is_charging: bool,
}
