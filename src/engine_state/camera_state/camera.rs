//! # Camera Implementation
//!
//! The first-person viewer: a position that walks along the facing direction
//! derived from [`OrientationModel`], and the matrices handed to the shader.
//!
//! The world is z-up. With yaw 90 and pitch 0 the camera faces +y.

use cgmath::{Deg, InnerSpace, Matrix4, Point3, Rad, SquareMatrix, Vector3};

use crate::application_state::input_state::MoveFlags;
use crate::config::CameraConfig;

use super::orientation::OrientationModel;
use super::projection::Projection;

/// Transformation matrix to convert from OpenGL's coordinate system to WGPU's.
///
/// This matrix performs two main transformations:
/// 1. Scales the Z coordinate from [-1, 1] to [-0.5, 0.5]
/// 2. Translates the Z coordinate from [-0.5, 0.5] to [0, 1]
#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,  // Scale Z from [-1,1] to [-0.5,0.5]
    0.0, 0.0, 0.5, 1.0,  // Translate Z from [-0.5,0.5] to [0,1]
);

/// World up axis.
pub const WORLD_UP: Vector3<f32> = Vector3::new(0.0, 0.0, 1.0);

/// Unit facing direction for an orientation.
///
/// `(-cos(yaw)cos(pitch), sin(yaw)cos(pitch), sin(pitch))`
pub fn direction_from(orientation: &OrientationModel) -> Vector3<f32> {
    let yaw: Rad<f32> = Deg(orientation.yaw()).into();
    let pitch: Rad<f32> = Deg(orientation.pitch()).into();
    let (yaw_sin, yaw_cos) = yaw.0.sin_cos();
    let (pitch_sin, pitch_cos) = pitch.0.sin_cos();
    Vector3::new(-yaw_cos * pitch_cos, yaw_sin * pitch_cos, pitch_sin).normalize()
}

/// Right-handed view matrix looking from `eye` along `direction`.
///
/// With `f = direction`, `s = normalize(f × up)` and `u = s × f`, the rows are
/// `[s, -s·eye]`, `[u, -u·eye]`, `[-f, f·eye]` and `[0, 0, 0, 1]`.
pub fn look_at(eye: Point3<f32>, direction: Vector3<f32>, up: Vector3<f32>) -> Matrix4<f32> {
    let f = direction.normalize();
    let s = f.cross(up).normalize();
    let u = s.cross(f);
    let eye = Vector3::new(eye.x, eye.y, eye.z);

    #[rustfmt::skip]
    let view = Matrix4::new(
        s.x,          u.x,          -f.x,        0.0,
        s.y,          u.y,          -f.y,        0.0,
        s.z,          u.z,          -f.z,        0.0,
        -s.dot(eye),  -u.dot(eye),  f.dot(eye),  1.0,
    );
    view
}

/// The player's eye: position, facing direction and walk speed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    /// Eye position in world space
    pub position: Point3<f32>,
    /// Unit facing direction, refreshed from the orientation every update
    pub direction: Vector3<f32>,
    walk_speed: f32,
}

impl Camera {
    /// Places the camera at the configured start position, facing along
    /// `orientation`.
    pub fn new(config: &CameraConfig, orientation: &OrientationModel) -> Self {
        Self {
            position: Point3::from(config.start_position),
            direction: direction_from(orientation),
            walk_speed: config.walk_speed,
        }
    }

    /// Advances the camera by `dt_millis` milliseconds.
    ///
    /// The heading is the plain sum of every held flag's unit contribution,
    /// so diagonal movement is faster than straight movement.
    pub fn update(&mut self, dt_millis: f32, flags: &MoveFlags, orientation: &OrientationModel) {
        self.direction = direction_from(orientation);
        let right = self.direction.cross(WORLD_UP).normalize();

        let mut heading = Vector3::new(0.0, 0.0, 0.0);
        if flags.forward {
            heading += self.direction;
        }
        if flags.backward {
            heading -= self.direction;
        }
        if flags.left {
            heading -= right;
        }
        if flags.right {
            heading += right;
        }

        self.position += heading * (dt_millis * self.walk_speed);
    }

    /// The view matrix for the current position and direction.
    pub fn compute_view(&self) -> Matrix4<f32> {
        look_at(self.position, self.direction, WORLD_UP)
    }

    /// World units travelled per millisecond along each held direction.
    pub fn walk_speed(&self) -> f32 {
        self.walk_speed
    }
}

/// GPU-friendly representation of camera data for shaders.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    // We can't use cgmath with bytemuck directly so the matrices are stored as arrays
    view: [[f32; 4]; 4],
    projection: [[f32; 4]; 4],
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self::new()
    }
}

impl CameraUniform {
    /// Identity view and projection.
    pub fn new() -> Self {
        Self {
            view: Matrix4::identity().into(),
            projection: Matrix4::identity().into(),
        }
    }

    /// Refreshes the view matrix from the camera.
    pub fn update_view(&mut self, camera: &Camera) {
        self.view = camera.compute_view().into();
    }

    /// Refreshes the projection, converted to wgpu's depth range.
    pub fn update_projection(&mut self, projection: &Projection) {
        self.projection = (OPENGL_TO_WGPU_MATRIX * projection.matrix()).into();
    }

    /// The uploaded view matrix.
    pub fn view(&self) -> Matrix4<f32> {
        self.view.into()
    }

    /// The uploaded projection matrix.
    pub fn projection(&self) -> Matrix4<f32> {
        self.projection.into()
    }
}
