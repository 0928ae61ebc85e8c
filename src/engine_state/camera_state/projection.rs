//! # Projection
//!
//! Perspective projection in OpenGL clip space (depth in `[-1, 1]`). The
//! camera uniform converts it to wgpu's `[0, 1]` depth range with
//! [`OPENGL_TO_WGPU_MATRIX`](super::camera::OPENGL_TO_WGPU_MATRIX) when the
//! matrices are uploaded.

use cgmath::{Deg, Matrix4, Rad};
use log::debug;

use crate::config::CameraConfig;
use crate::error::{EngineError, Result};

/// Builds a perspective matrix from the viewport aspect and a vertical field
/// of view in degrees.
///
/// Fails with [`EngineError::InvalidProjection`] when the clip planes
/// coincide, since the depth terms would divide by zero.
///
/// ```
/// use voxel_terrain::engine_state::camera_state::projection::perspective;
///
/// let m = perspective(1.0, 90.0, 1.0, 2.0).unwrap();
/// assert!((m[0][0] - 1.0).abs() < 1e-6);
/// assert_eq!(m[2][3], -1.0);
/// assert!(perspective(1.0, 90.0, 5.0, 5.0).is_err());
/// ```
pub fn perspective(aspect: f32, fovy_degrees: f32, near: f32, far: f32) -> Result<Matrix4<f32>> {
    if near == far {
        return Err(EngineError::InvalidProjection { near, far });
    }

    let half_fovy: Rad<f32> = Deg(fovy_degrees / 2.0).into();
    let f = 1.0 / half_fovy.0.tan();
    let depth = near - far;

    #[rustfmt::skip]
    let matrix = Matrix4::new(
        f / aspect, 0.0, 0.0,                          0.0,
        0.0,        f,   0.0,                          0.0,
        0.0,        0.0, (near + far) / depth,        -1.0,
        0.0,        0.0, 2.0 * near * far / depth,     0.0,
    );
    Ok(matrix)
}

/// Viewport-dependent projection state, rebuilt on resize.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    aspect: f32,
    fovy_degrees: f32,
    znear: f32,
    zfar: f32,
    matrix: Matrix4<f32>,
}

impl Projection {
    /// Creates the projection for a `width × height` viewport.
    pub fn new(width: u32, height: u32, config: &CameraConfig) -> Result<Self> {
        let aspect = aspect_ratio(width, height);
        let matrix = perspective(aspect, config.fovy_degrees, config.znear, config.zfar)?;
        Ok(Self {
            aspect,
            fovy_degrees: config.fovy_degrees,
            znear: config.znear,
            zfar: config.zfar,
            matrix,
        })
    }

    /// Recomputes the matrix for a new viewport size.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<()> {
        self.aspect = aspect_ratio(width, height);
        self.matrix = perspective(self.aspect, self.fovy_degrees, self.znear, self.zfar)?;
        debug!("Projection rebuilt for {}x{} (aspect {:.3})", width, height, self.aspect);
        Ok(())
    }

    /// The current perspective matrix.
    pub fn matrix(&self) -> Matrix4<f32> {
        self.matrix
    }

    /// Width over height of the viewport.
    pub fn aspect(&self) -> f32 {
        self.aspect
    }
}

/// Minimised windows report a zero height.
fn aspect_ratio(width: u32, height: u32) -> f32 {
    width.max(1) as f32 / height.max(1) as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-6;

    #[test]
    fn right_angle_field_of_view() {
        let m = perspective(1.0, 90.0, 1.0, 2.0).unwrap();
        assert!((m[0][0] - 1.0).abs() < EPSILON);
        assert!((m[1][1] - 1.0).abs() < EPSILON);
        assert!((m[2][2] + 3.0).abs() < EPSILON);
        assert_eq!(m[2][3], -1.0);
        assert!((m[3][2] + 4.0).abs() < EPSILON);
        assert_eq!(m[3][3], 0.0);
    }

    #[test]
    fn aspect_only_scales_x() {
        let square = perspective(1.0, 60.0, 0.1, 100.0).unwrap();
        let wide = perspective(2.0, 60.0, 0.1, 100.0).unwrap();
        assert!((wide[0][0] * 2.0 - square[0][0]).abs() < EPSILON);
        assert_eq!(wide[1][1], square[1][1]);
        assert_eq!(wide[2], square[2]);
        assert_eq!(wide[3], square[3]);
    }

    #[test]
    fn matches_cgmath_perspective() {
        let ours = perspective(4.0 / 3.0, 60.0, 0.1, 100.0).unwrap();
        let reference = cgmath::perspective(Deg(60.0), 4.0 / 3.0, 0.1, 100.0);
        for column in 0..4 {
            for row in 0..4 {
                assert!((ours[column][row] - reference[column][row]).abs() < 1e-4);
            }
        }
    }

    #[test]
    fn coinciding_planes_are_rejected() {
        assert!(matches!(
            perspective(1.0, 60.0, 3.0, 3.0),
            Err(EngineError::InvalidProjection { near, far }) if near == 3.0 && far == 3.0
        ));
    }

    #[test]
    fn resize_updates_the_aspect() {
        let mut projection = Projection::new(800, 600, &CameraConfig::default()).unwrap();
        assert!((projection.aspect() - 4.0 / 3.0).abs() < EPSILON);

        projection.resize(1000, 500).unwrap();
        assert!((projection.aspect() - 2.0).abs() < EPSILON);
        let expected = perspective(2.0, 60.0, 0.1, 100.0).unwrap();
        assert_eq!(projection.matrix(), expected);

        projection.resize(640, 0).unwrap();
        assert_eq!(projection.aspect(), 640.0);
    }
}
