//! # Orientation
//!
//! Turns raw mouse motion into the viewer's pitch and yaw, both in degrees.

use log::debug;

use crate::config::CameraConfig;

/// Pitch limit in degrees, just short of straight up or down.
pub const PITCH_LIMIT: f32 = 89.0;

/// Yaw magnitude past which yaw snaps back to zero.
pub const YAW_RESET: f32 = 360.0;

/// Pitch and yaw driven by mouse deltas.
///
/// Pitch is clamped to `[-89, 89]`. Yaw is not wrapped: once its magnitude
/// exceeds 360 it is reset to exactly 0, which makes the view jump when the
/// reset fires.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrientationModel {
    pitch: f32,
    yaw: f32,
    rotation_speed: f32,
}

impl Default for OrientationModel {
    fn default() -> Self {
        Self::new(CameraConfig::default().rotation_speed)
    }
}

impl OrientationModel {
    /// Starts level, facing yaw 90.
    pub fn new(rotation_speed: f32) -> Self {
        Self {
            pitch: 0.0,
            yaw: 90.0,
            rotation_speed,
        }
    }

    /// Applies one mouse motion event.
    ///
    /// Moving right turns yaw up, moving down (positive `dy`) pitches down.
    pub fn apply_mouse_delta(&mut self, dx: f64, dy: f64) {
        self.yaw += dx as f32 * self.rotation_speed;
        if self.yaw.abs() > YAW_RESET {
            debug!("Yaw {} passed {}, resetting to 0", self.yaw, YAW_RESET);
            self.yaw = 0.0;
        }

        self.pitch -= dy as f32 * self.rotation_speed;
        self.pitch = self.pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    /// Pitch in degrees.
    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    /// Yaw in degrees.
    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    /// Degrees of rotation per unit of mouse motion.
    pub fn rotation_speed(&self) -> f32 {
        self.rotation_speed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-4;

    #[test]
    fn starts_level_at_yaw_90() {
        let orientation = OrientationModel::default();
        assert_eq!(orientation.pitch(), 0.0);
        assert_eq!(orientation.yaw(), 90.0);
        assert_eq!(orientation.rotation_speed(), 0.15);
    }

    #[test]
    fn small_deltas_accumulate() {
        let mut orientation = OrientationModel::default();
        orientation.apply_mouse_delta(10.0, 20.0);
        assert!((orientation.yaw() - 91.5).abs() < EPSILON);
        assert!((orientation.pitch() + 3.0).abs() < EPSILON);
    }

    #[test]
    fn yaw_past_a_full_turn_resets_to_zero() {
        let mut orientation = OrientationModel::default();
        // 90 + 2000 * 0.15 = 390
        orientation.apply_mouse_delta(2000.0, 0.0);
        assert_eq!(orientation.yaw(), 0.0);

        let mut orientation = OrientationModel::default();
        // 90 - 2990 * 0.15 = -358.5 is still inside the limit
        orientation.apply_mouse_delta(-2990.0, 0.0);
        assert!((orientation.yaw() + 358.5).abs() < 1e-3);
        orientation.apply_mouse_delta(-20.0, 0.0);
        assert_eq!(orientation.yaw(), 0.0);
    }

    #[test]
    fn pitch_is_clamped() {
        let mut orientation = OrientationModel::default();
        orientation.apply_mouse_delta(0.0, -10_000.0);
        assert_eq!(orientation.pitch(), PITCH_LIMIT);

        orientation.apply_mouse_delta(0.0, 10_000.0);
        assert_eq!(orientation.pitch(), -PITCH_LIMIT);

        for step in -50..50 {
            orientation.apply_mouse_delta(step as f64, (step * 37) as f64);
            assert!((-PITCH_LIMIT..=PITCH_LIMIT).contains(&orientation.pitch()));
            assert!(orientation.yaw().abs() <= YAW_RESET);
        }
    }
}
