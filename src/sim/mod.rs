//! Frame-coupled simulation module
//!
//! All gameplay logic lives here:
//! - One frame per `tick`, at a fixed 60 Hz cadence (no delta time)
//! - Timers are integer frame counters
//! - Seeded RNG for the obstacle field
//! - No rendering or platform dependencies

pub mod camera;
pub mod collision;
pub mod generator;
pub mod kinematics;
pub mod state;
pub mod tick;

pub use camera::Camera;
pub use collision::{Contact, check_obstacle_collisions, circle_overlaps, handle_collision};
pub use generator::{generate_obstacles, prune_obstacles, spawn_obstacle};
pub use kinematics::{integrate, update_stillness};
pub use state::{
    GamePhase, Launcher, Obstacle, ObstacleKind, Projectile, SimulationSession, Snapshot,
};
pub use tick::{FrameInput, RoundEnd, tick};
