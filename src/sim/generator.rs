//! Procedural obstacle field
//!
//! Obstacles are spawned one at a time past a moving frontier, far enough
//! ahead of the camera that they never pop in on screen, and dropped once
//! they are well behind it.

use rand::Rng;

use super::state::{Obstacle, ObstacleKind, SimulationSession};

/// Floating rocks are sampled no higher than this fraction of the viewport
const FLOAT_BAND_TOP: f32 = 0.25;
/// Lower edge of the floating sampling band, above the ground line
const FLOAT_SAMPLE_CLEARANCE: f32 = 90.0;
/// Floating rocks always leave at least this much room underneath
const FLOAT_MIN_CLEARANCE: f32 = 50.0;

/// One slice of the archetype partition
struct ShapeRule {
    /// Upper bound (exclusive) of the cumulative roll
    below: f32,
    kind: ObstacleKind,
    width: (f32, f32),
    height: (f32, f32),
    floating: bool,
}

const fn rule(below: f32, kind: ObstacleKind, width: (f32, f32), height: (f32, f32)) -> ShapeRule {
    ShapeRule {
        below,
        kind,
        width,
        height,
        floating: false,
    }
}

/// Cumulative partition over [0, 1). The last slice is the floating rock.
const SHAPE_RULES: [ShapeRule; 8] = [
    rule(0.18, ObstacleKind::Bush, (30.0, 90.0), (20.0, 50.0)),
    rule(0.36, ObstacleKind::Rock, (30.0, 90.0), (40.0, 110.0)),
    rule(0.50, ObstacleKind::BounceBox, (40.0, 70.0), (25.0, 50.0)),
    rule(0.64, ObstacleKind::Spring, (25.0, 40.0), (15.0, 30.0)),
    rule(0.80, ObstacleKind::BoostPad, (60.0, 100.0), (15.0, 25.0)),
    rule(0.90, ObstacleKind::Ramp, (80.0, 150.0), (30.0, 60.0)),
    rule(0.97, ObstacleKind::Stopper, (15.0, 30.0), (70.0, 160.0)),
    ShapeRule {
        below: 1.0,
        kind: ObstacleKind::Rock,
        width: (40.0, 100.0),
        height: (20.0, 40.0),
        floating: true,
    },
];

/// Uniform sample in `[lo, hi)`; an empty or inverted range yields `lo`
#[inline]
fn sample<R: Rng>(rng: &mut R, lo: f32, hi: f32) -> f32 {
    if hi > lo { rng.random_range(lo..hi) } else { lo }
}

fn shape_for_roll(roll: f32) -> &'static ShapeRule {
    SHAPE_RULES
        .iter()
        .find(|r| roll < r.below)
        .unwrap_or(&SHAPE_RULES[SHAPE_RULES.len() - 1])
}

/// Roll a single obstacle whose left edge sits at `x`
pub fn spawn_obstacle<R: Rng>(
    rng: &mut R,
    x: f32,
    viewport_height: f32,
    ground_y: f32,
) -> Obstacle {
    let roll: f32 = rng.random();
    let shape = shape_for_roll(roll);
    let w = sample(rng, shape.width.0, shape.width.1);
    let h = sample(rng, shape.height.0, shape.height.1);

    let y = if shape.floating {
        let top = viewport_height * FLOAT_BAND_TOP;
        let y = sample(rng, top, ground_y - h - FLOAT_SAMPLE_CLEARANCE);
        y.min(ground_y - h - FLOAT_MIN_CLEARANCE)
    } else {
        ground_y - h
    };

    Obstacle {
        x,
        y,
        w,
        h,
        kind: shape.kind,
        floating: shape.floating,
    }
}

/// Extend the field until the frontier is safely past the right edge of the view.
///
/// Faster flight looks further ahead so obstacles exist before they scroll in.
pub fn generate_obstacles(session: &mut SimulationSession) {
    let t = &session.tuning;
    let lookahead = session.projectile.vel.x.abs() * t.lookahead_per_speed;
    let generate_until =
        session.camera.x + session.viewport.x * t.generation_ahead_factor + lookahead;
    // Guard against a zero gap stalling the loop
    let (min_gap, max_gap) = (t.obstacle_min_dist.max(1.0), t.obstacle_max_dist);

    let mut spawned = 0usize;
    while session.frontier < generate_until {
        session.frontier += sample(&mut session.rng, min_gap, max_gap);
        let obs = spawn_obstacle(
            &mut session.rng,
            session.frontier,
            session.viewport.y,
            session.ground_y,
        );
        session.obstacles.push(obs);
        spawned += 1;
    }

    if spawned > 0 {
        log::debug!(
            "Spawned {} obstacle(s), frontier now {:.0} ({} live)",
            spawned,
            session.frontier,
            session.obstacles.len()
        );
    }
}

/// Drop obstacles whose right edge is more than half a viewport behind the camera
pub fn prune_obstacles(session: &mut SimulationSession) {
    let cutoff = session.camera.x - session.viewport.x * session.tuning.prune_behind_factor;
    let before = session.obstacles.len();
    session.obstacles.retain(|o| o.right() >= cutoff);

    let removed = before - session.obstacles.len();
    if removed > 0 {
        log::debug!("Pruned {} obstacle(s) behind x={:.0}", removed, cutoff);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Tuning;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn session(seed: u64) -> SimulationSession {
        SimulationSession::new(seed, 1200.0, 800.0, Tuning::default())
    }

    #[test]
    fn test_partition_boundaries() {
        assert_eq!(shape_for_roll(0.0).kind, ObstacleKind::Bush);
        assert_eq!(shape_for_roll(0.18).kind, ObstacleKind::Rock);
        assert_eq!(shape_for_roll(0.5).kind, ObstacleKind::Spring);
        assert_eq!(shape_for_roll(0.79).kind, ObstacleKind::BoostPad);
        assert_eq!(shape_for_roll(0.95).kind, ObstacleKind::Stopper);
        assert!(!shape_for_roll(0.95).floating);
        assert!(shape_for_roll(0.99).floating);
        assert_eq!(shape_for_roll(0.99).kind, ObstacleKind::Rock);
    }

    #[test]
    fn test_every_archetype_appears() {
        let mut rng = Pcg32::seed_from_u64(3);
        let kinds: Vec<_> = (0..2000)
            .map(|i| spawn_obstacle(&mut rng, i as f32, 800.0, 680.0))
            .collect();
        for kind in [
            ObstacleKind::Bush,
            ObstacleKind::Rock,
            ObstacleKind::Spring,
            ObstacleKind::Stopper,
            ObstacleKind::BounceBox,
            ObstacleKind::BoostPad,
            ObstacleKind::Ramp,
        ] {
            assert!(kinds.iter().any(|o| o.kind == kind), "{kind:?} never spawned");
        }
        assert!(kinds.iter().any(|o| o.floating));
    }

    #[test]
    fn test_vertical_placement() {
        let mut rng = Pcg32::seed_from_u64(11);
        for i in 0..2000 {
            let o = spawn_obstacle(&mut rng, i as f32, 800.0, 680.0);
            if o.floating {
                assert!(o.bottom() <= 680.0 - FLOAT_MIN_CLEARANCE + 1e-3);
                assert!(o.y >= 800.0 * FLOAT_BAND_TOP - 1e-3);
            } else {
                assert!((o.bottom() - 680.0).abs() < 1e-3);
            }
        }
    }

    #[test]
    fn test_tiny_viewport_does_not_panic() {
        let mut rng = Pcg32::seed_from_u64(5);
        for i in 0..500 {
            let o = spawn_obstacle(&mut rng, i as f32, 60.0, 51.0);
            if o.floating {
                assert!(o.bottom() <= 51.0 - FLOAT_MIN_CLEARANCE + 1e-3);
            }
        }
    }

    #[test]
    fn test_prune_drops_only_far_behind() {
        let mut s = session(1);
        s.camera.x = 2000.0;
        // cutoff = 2000 - 600 = 1400
        s.obstacles.push(Obstacle::new(ObstacleKind::Bush, 1300.0, 650.0, 50.0, 30.0));
        s.obstacles.push(Obstacle::new(ObstacleKind::Bush, 1360.0, 650.0, 50.0, 30.0));
        s.obstacles.push(Obstacle::new(ObstacleKind::Rock, 2500.0, 600.0, 50.0, 80.0));
        prune_obstacles(&mut s);
        let xs: Vec<f32> = s.obstacles.iter().map(|o| o.x).collect();
        assert_eq!(xs, vec![1360.0, 2500.0]);
    }

    #[test]
    fn test_fast_flight_looks_further_ahead() {
        let mut slow = session(9);
        generate_obstacles(&mut slow);

        let mut fast = session(9);
        fast.projectile.vel.x = 200.0;
        generate_obstacles(&mut fast);

        // Without lookahead the frontier stops below 1800 + 650
        assert!(slow.frontier < 2450.0);
        assert!(fast.frontier >= 1800.0 + 2000.0);
        assert!(fast.obstacles.len() > slow.obstacles.len());
    }

    proptest! {
        #[test]
        fn prop_frontier_covers_view(
            seed in any::<u64>(),
            camera in 0.0f32..20_000.0,
            speed in -80.0f32..80.0,
            width in 200.0f32..3000.0,
        ) {
            let mut s = SimulationSession::new(seed, width, 800.0, Tuning::default());
            s.camera.x = camera;
            s.projectile.vel.x = speed;
            let start = s.frontier;
            generate_obstacles(&mut s);

            prop_assert!(s.frontier >= camera + width * 1.5);

            let mut prev = start;
            for o in &s.obstacles {
                let gap = o.x - prev;
                prop_assert!(gap >= 280.0 - 1e-2);
                prop_assert!(gap <= 650.0 + 1e-2);
                prev = o.x;
            }
            if let Some(last) = s.obstacles.last() {
                prop_assert_eq!(last.x, s.frontier);
            }
        }
    }
}
