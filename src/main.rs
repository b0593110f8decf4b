//! Pixel Launch headless driver
//!
//! Plays one round at the fixed 60 Hz cadence without a window: start, drag
//! out an aim, release, then tick until the projectile comes to rest.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::Parser;
use glam::Vec2;

use pixel_launch::Tuning;
use pixel_launch::sim::{FrameInput, GamePhase, SimulationSession, tick};

#[derive(Debug, Parser)]
#[command(name = "pixel-launch", about = "Launch a pixel pet across a procedural obstacle field")]
struct Args {
    /// Seed for the obstacle field (random when omitted)
    #[arg(long)]
    seed: Option<u64>,
    /// Viewport width in pixels
    #[arg(long, default_value_t = 1280.0)]
    width: f32,
    /// Viewport height in pixels
    #[arg(long, default_value_t = 720.0)]
    height: f32,
    /// Horizontal drag distance (positive pulls forward)
    #[arg(long, default_value_t = 300.0, allow_hyphen_values = true)]
    drag_x: f32,
    /// Vertical drag distance (negative aims up)
    #[arg(long, default_value_t = -300.0, allow_hyphen_values = true)]
    drag_y: f32,
    /// JSON file with tuning overrides
    #[arg(long)]
    tuning: Option<PathBuf>,
    /// Give up after this many frames
    #[arg(long, default_value_t = 60 * 120)]
    max_frames: u32,
    /// Print the final snapshot as JSON
    #[arg(long)]
    json: bool,
}

/// Unreadable, malformed, or invalid tuning files fall back to the defaults
fn load_tuning(path: Option<&Path>) -> Tuning {
    let Some(path) = path else {
        log::info!("Using default tuning");
        return Tuning::default();
    };
    match fs::read_to_string(path) {
        Ok(json) => {
            log::info!("Reading tuning from {}", path.display());
            Tuning::from_json_or_default(&json)
        }
        Err(e) => {
            log::warn!("Could not read {} ({e}), using defaults", path.display());
            Tuning::default()
        }
    }
}

fn run() -> Result<()> {
    let args = Args::parse();
    if args.max_frames == 0 {
        bail!("max_frames must be > 0");
    }
    if !(args.width > 0.0 && args.height > 0.0) {
        bail!("viewport must have a positive size");
    }

    let tuning = load_tuning(args.tuning.as_deref());
    let seed = args.seed.unwrap_or_else(rand::random);
    let mut session = SimulationSession::new(seed, args.width, args.height, tuning);

    // Title card -> aiming, then a single charged drag
    let anchor = Vec2::new(args.width / 2.0, args.height / 2.0);
    let script = [
        FrameInput {
            press: Some(anchor),
            ..Default::default()
        },
        FrameInput {
            press: Some(anchor),
            ..Default::default()
        },
        FrameInput {
            drag: Some(anchor + Vec2::new(args.drag_x, args.drag_y)),
            ..Default::default()
        },
        FrameInput {
            release: true,
            ..Default::default()
        },
    ];
    for input in &script {
        tick(&mut session, input);
    }
    if session.phase != GamePhase::Flying {
        bail!(
            "launch did not happen (power {:.2} is too weak)",
            session.launcher.power
        );
    }

    let idle = FrameInput::default();
    let mut frames = 0;
    while session.phase == GamePhase::Flying && frames < args.max_frames {
        tick(&mut session, &idle);
        frames += 1;
    }
    if session.phase == GamePhase::Flying {
        log::warn!("Still flying after {} frames, stopping", frames);
    }

    if args.json {
        let json = serde_json::to_string_pretty(&session.snapshot())
            .context("failed serializing snapshot")?;
        println!("{json}");
    } else {
        println!(
            "seed {}: {:.0} m in {:.1} s ({} obstacles live)",
            seed,
            session.distance_metres(),
            frames as f32 / pixel_launch::consts::FRAME_RATE as f32,
            session.obstacles.len()
        );
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    log::info!("Pixel Launch (headless) starting...");
    run()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_file(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("pixel-launch-{}-{name}", std::process::id()));
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_missing_tuning_file_uses_defaults() {
        let path = std::env::temp_dir().join("pixel-launch-does-not-exist.json");
        assert_eq!(load_tuning(Some(&path)), Tuning::default());
        assert_eq!(load_tuning(None), Tuning::default());
    }

    #[test]
    fn test_bad_tuning_file_uses_defaults() {
        let garbled = scratch_file("garbled.json", "{ gravity: ");
        assert_eq!(load_tuning(Some(&garbled)), Tuning::default());

        let invalid = scratch_file("invalid.json", r#"{ "obstacle_min_dist": 900.0 }"#);
        assert_eq!(load_tuning(Some(&invalid)), Tuning::default());

        let _ = fs::remove_file(garbled);
        let _ = fs::remove_file(invalid);
    }

    #[test]
    fn test_good_tuning_file_is_loaded() {
        let path = scratch_file("good.json", r#"{ "gravity": 0.5 }"#);
        let t = load_tuning(Some(&path));
        assert_eq!(t.gravity, 0.5);
        assert_eq!(t.bounce_factor, Tuning::default().bounce_factor);
        let _ = fs::remove_file(path);
    }
}
