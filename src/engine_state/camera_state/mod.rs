//! # Camera State Management
//!
//! This module handles all camera-related functionality including:
//! - Mouse-driven pitch and yaw ([`orientation`])
//! - Position integration and the look-at view matrix ([`camera`])
//! - The perspective projection and its resize handling ([`projection`])
//!
//! ## Per-tick flow
//!
//! Mouse motion is applied to the orientation as it arrives. Once per redraw
//! [`CameraState::update`] moves the camera by the frame delta and refreshes
//! the view half of the [`camera::CameraUniform`]; the projection half only
//! changes on resize. Nothing here touches the GPU, the renderer uploads the
//! uniform.

use log::info;

use crate::application_state::input_state::MoveFlags;
use crate::config::CameraConfig;
use crate::error::Result;

pub mod camera;
pub mod orientation;
pub mod projection;

use camera::{Camera, CameraUniform};
use orientation::OrientationModel;
use projection::Projection;

/// Everything the viewer needs between frames.
#[derive(Debug, Clone)]
pub struct CameraState {
    /// Pitch and yaw from mouse input
    pub orientation: OrientationModel,
    /// Eye position and facing direction
    pub camera: Camera,
    /// Perspective for the current viewport
    pub projection: Projection,
    /// GPU-ready matrices, refreshed by `update` and `resize`
    pub camera_uniform: CameraUniform,
}

impl CameraState {
    /// Creates the camera for a `width × height` viewport.
    ///
    /// Fails when the configured clip planes coincide.
    pub fn new(config: &CameraConfig, width: u32, height: u32) -> Result<Self> {
        let orientation = OrientationModel::new(config.rotation_speed);
        let camera = Camera::new(config, &orientation);
        let projection = Projection::new(width, height, config)?;

        let mut camera_uniform = CameraUniform::new();
        camera_uniform.update_view(&camera);
        camera_uniform.update_projection(&projection);

        info!(
            "Camera at {:?} facing {:?}, fov {} degrees",
            camera.position, camera.direction, config.fovy_degrees
        );

        Ok(Self {
            orientation,
            camera,
            projection,
            camera_uniform,
        })
    }

    /// Forwards one mouse motion event to the orientation.
    pub fn apply_mouse_delta(&mut self, dx: f64, dy: f64) {
        self.orientation.apply_mouse_delta(dx, dy);
    }

    /// Moves the camera by `dt_millis` and refreshes the view matrix.
    pub fn update(&mut self, dt_millis: f32, flags: &MoveFlags) {
        self.camera.update(dt_millis, flags, &self.orientation);
        self.camera_uniform.update_view(&self.camera);
    }

    /// Rebuilds the projection for a new viewport size.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<()> {
        self.projection.resize(width, height)?;
        self.camera_uniform.update_projection(&self.projection);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_refreshes_the_view_uniform() {
        let mut state = CameraState::new(&CameraConfig::default(), 800, 600).unwrap();
        let before = state.camera_uniform.view();

        state.apply_mouse_delta(100.0, 0.0);
        state.update(16.0, &MoveFlags { forward: true, ..Default::default() });

        assert_ne!(state.camera_uniform.view(), before);
        assert_eq!(state.camera_uniform.view(), state.camera.compute_view());
    }

    #[test]
    fn resize_refreshes_the_projection_uniform() {
        let mut state = CameraState::new(&CameraConfig::default(), 800, 600).unwrap();
        let before = state.camera_uniform.projection();

        state.resize(1920, 1080).unwrap();
        assert_ne!(state.camera_uniform.projection(), before);
        assert_eq!(
            state.camera_uniform.projection(),
            camera::OPENGL_TO_WGPU_MATRIX * state.projection.matrix()
        );
    }

    #[test]
    fn invalid_clip_planes_fail_construction() {
        let config = CameraConfig { znear: 1.0, zfar: 1.0, ..Default::default() };
        assert!(CameraState::new(&config, 800, 600).is_err());
    }
}
