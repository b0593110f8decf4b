//! Horizontal scrolling camera

use serde::{Deserialize, Serialize};

/// Smoothed horizontal scroll offset, never negative
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub x: f32,
}

impl Camera {
    /// Ease toward `target` by `smoothing` of the remaining gap.
    /// With no target the camera holds still.
    pub fn follow(&mut self, target: Option<f32>, smoothing: f32) {
        let target = target.unwrap_or(self.x);
        self.x += (target - self.x) * smoothing;
        self.x = self.x.max(0.0);
    }

    /// Where the camera wants to be to keep `subject_x` at `lead` of the viewport width
    pub fn target_for(subject_x: f32, viewport_width: f32, lead: f32) -> f32 {
        subject_x - viewport_width * lead
    }

    /// World-space x span covered by the viewport, padded by `margin` each side
    pub fn visible_span(&self, viewport_width: f32, margin: f32) -> (f32, f32) {
        (self.x - margin, self.x + viewport_width + margin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_follow_eases_toward_target() {
        let mut cam = Camera::default();
        cam.follow(Some(1000.0), 0.1);
        assert!((cam.x - 100.0).abs() < 1e-4);
        cam.follow(Some(1000.0), 0.1);
        assert!((cam.x - 190.0).abs() < 1e-4);
    }

    #[test]
    fn test_follow_clamps_at_zero() {
        let mut cam = Camera { x: 5.0 };
        cam.follow(Some(-500.0), 0.1);
        assert_eq!(cam.x, 0.0);
    }

    #[test]
    fn test_no_target_holds_still() {
        let mut cam = Camera { x: 250.0 };
        cam.follow(None, 0.1);
        assert_eq!(cam.x, 250.0);
    }

    #[test]
    fn test_target_leads_subject() {
        assert_eq!(Camera::target_for(1000.0, 1200.0, 0.3), 640.0);
    }
}
