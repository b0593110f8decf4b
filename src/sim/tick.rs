//! Fixed-rate frame tick
//!
//! One call to [`tick`] is one frame at 60 Hz. Input is applied first, then
//! the camera, then whatever the current phase runs.

use glam::Vec2;

use super::camera::Camera;
use super::collision::check_obstacle_collisions;
use super::generator::{generate_obstacles, prune_obstacles};
use super::kinematics::{integrate, update_stillness};
use super::state::{GamePhase, SimulationSession};
use crate::consts::{GROUND_LEVEL_PERCENT, LAUNCHER_GROUND_OFFSET};

/// Pointer and window events sampled at the start of a frame
#[derive(Debug, Clone, Default)]
pub struct FrameInput {
    /// Pointer went down at this screen position
    pub press: Option<Vec2>,
    /// Pointer moved to this screen position while held
    pub drag: Option<Vec2>,
    /// Pointer went up
    pub release: bool,
    /// Viewport resized to (width, height)
    pub resize: Option<Vec2>,
}

/// Why a flight ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundEnd {
    /// Grounded and still for long enough, or halted by a stopper
    CameToRest,
    /// Fell too far behind the left edge of the view
    LeftScreen,
    /// Projectile state went non-finite; the frame was skipped
    Invalid,
}

/// Advance the session by one frame
pub fn tick(session: &mut SimulationSession, input: &FrameInput) {
    // Resize lands between frames, before this frame's pointer input
    if let Some(size) = input.resize {
        session.resize(size.x, size.y);
    }
    if let Some(pointer) = input.press {
        session.press(pointer);
    }
    if let Some(pointer) = input.drag {
        session.drag_to(pointer);
    }
    if input.release {
        session.pointer_up();
    }

    session.frame += 1;

    let target = Camera::target_for(
        session.projectile.pos.x,
        session.viewport.x,
        session.tuning.scroll_follow_factor,
    );
    session
        .camera
        .follow(Some(target), session.tuning.camera_smoothing);
    prune_obstacles(session);

    match session.phase {
        GamePhase::Aiming => {
            session.projectile.pos = session.launcher.muzzle();
        }
        GamePhase::Flying => {
            if let Some(end) = step_flight(session) {
                session.finish_round(end);
            }
            generate_obstacles(session);
        }
        GamePhase::Instructions | GamePhase::Result => {}
    }
}

/// Integrate, collide, score, then decide whether the flight is over
fn step_flight(session: &mut SimulationSession) -> Option<RoundEnd> {
    let p = &session.projectile;
    if !(p.pos.is_finite() && p.vel.is_finite()) {
        log::warn!(
            "Skipping frame {}: non-finite projectile (pos={:?}, vel={:?})",
            session.frame,
            p.pos,
            p.vel
        );
        return Some(RoundEnd::Invalid);
    }

    let t = &session.tuning;
    integrate(&mut session.projectile, session.ground_y, t);
    check_obstacle_collisions(&mut session.projectile, &session.obstacles, t);
    session.update_distance();

    let t = &session.tuning;
    if update_stillness(&mut session.projectile, t) {
        return Some(RoundEnd::CameToRest);
    }

    let left_edge = session.camera.x - session.viewport.x * t.offscreen_abort_factor;
    if session.projectile.pos.x < left_edge {
        return Some(RoundEnd::LeftScreen);
    }

    None
}

impl SimulationSession {
    /// Click/tap: start a round, begin a charge, or dismiss the result
    pub fn press(&mut self, pointer: Vec2) {
        match self.phase {
            GamePhase::Instructions => {
                self.phase = GamePhase::Aiming;
                self.reset();
                log::info!("Round started (best so far {:.0} m)", self.best_metres());
            }
            GamePhase::Aiming => {
                self.charge_start = Some(pointer);
            }
            GamePhase::Result => {
                self.phase = GamePhase::Instructions;
            }
            GamePhase::Flying => {}
        }
    }

    /// Pointer moved while held: re-aim relative to where the charge began
    pub fn drag_to(&mut self, pointer: Vec2) {
        if let Some(start) = self.charge_start {
            self.aim(pointer - start);
        }
    }

    /// Pointer released: fire if a charge is in progress
    pub fn pointer_up(&mut self) {
        if self.is_charging() {
            self.release();
        }
    }

    /// Aim from a raw drag vector. Ignored outside of aiming.
    pub fn aim(&mut self, drag: Vec2) {
        if self.phase != GamePhase::Aiming {
            return;
        }
        self.launcher
            .aim_from_drag(drag, self.viewport.x, self.tuning.launch_power_max);
    }

    /// Launch with the current aim. Weak charges are dropped and aiming continues.
    /// Returns whether the projectile left the launcher.
    pub fn release(&mut self) -> bool {
        if self.phase != GamePhase::Aiming {
            return false;
        }
        self.charge_start = None;

        if self.launcher.power <= self.tuning.launch_min_power {
            log::debug!("Charge too weak ({:.2}), discarded", self.launcher.power);
            return false;
        }

        let p = &mut self.projectile;
        p.pos = self.launcher.muzzle();
        p.vel = self.launcher.launch_velocity();
        p.on_ground = false;
        p.stopped_frames = 0;
        p.perched = false;
        p.cancel_boost();
        self.best_at_launch = self.max_distance;
        self.phase = GamePhase::Flying;

        log::info!(
            "Launched at {:.1}° with power {:.1}",
            self.launcher.elevation_degrees(),
            self.launcher.power
        );
        true
    }

    /// Apply a new viewport size. Mid-flight only the geometry moves; any
    /// other phase also starts over.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.viewport = Vec2::new(width, height);
        self.ground_y = height * GROUND_LEVEL_PERCENT;
        self.launcher.pos.y = self.ground_y - LAUNCHER_GROUND_OFFSET;

        match self.phase {
            GamePhase::Flying => {}
            GamePhase::Result => {
                self.phase = GamePhase::Instructions;
                self.reset();
            }
            GamePhase::Instructions | GamePhase::Aiming => self.reset(),
        }
        log::info!("Viewport resized to {}x{}", width, height);
    }

    fn finish_round(&mut self, end: RoundEnd) {
        self.phase = GamePhase::Result;
        log::info!(
            "Round over ({:?}) after frame {}: {:.0} m{}",
            end,
            self.frame,
            self.distance_metres(),
            if self.is_new_best() { " - new best!" } else { "" }
        );
    }
}
