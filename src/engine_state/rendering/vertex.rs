//! Vertex data structures and layouts for voxel rendering.
//!
//! Every solid block is the same unit cube drawn at a different offset, so
//! there are exactly two vertex buffers: the 36 cube vertices stepped per
//! vertex, and the block offsets stepped per instance.

use cgmath::Point3;

/// A corner of the unit cube.
///
/// # Memory Layout
/// - Position: [f32; 3] (12 bytes)
/// - Texture Coordinates: [f32; 2] (8 bytes)
/// - Normal: [f32; 3] (12 bytes)
///
/// Total size: 32 bytes
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CubeVertex {
    /// Position relative to the block centre
    pub position: [f32; 3],
    /// UV texture coordinates (normalized 0.0-1.0)
    pub tex_coords: [f32; 2],
    /// Outward face normal
    pub normal: [f32; 3],
}

const fn vertex(position: [f32; 3], tex_coords: [f32; 2], normal: [f32; 3]) -> CubeVertex {
    CubeVertex {
        position,
        tex_coords,
        normal,
    }
}

//   8---7
//  /|  /|  +y
// 4---3 |   |
// | 5-|-6   +- +x
// |/  |/   /
// 1---2   +z
/// Two counter-clockwise triangles per face, six faces.
#[rustfmt::skip]
pub const CUBE_VERTICES: [CubeVertex; 36] = [
    // front
    vertex([-0.5, -0.5,  0.5], [0.0, 0.0], [ 0.0,  0.0,  1.0]), // 1
    vertex([ 0.5,  0.5,  0.5], [1.0, 1.0], [ 0.0,  0.0,  1.0]), // 3
    vertex([-0.5,  0.5,  0.5], [0.0, 1.0], [ 0.0,  0.0,  1.0]), // 4
    vertex([-0.5, -0.5,  0.5], [0.0, 0.0], [ 0.0,  0.0,  1.0]), // 1
    vertex([ 0.5, -0.5,  0.5], [1.0, 0.0], [ 0.0,  0.0,  1.0]), // 2
    vertex([ 0.5,  0.5,  0.5], [1.0, 1.0], [ 0.0,  0.0,  1.0]), // 3
    // back
    vertex([ 0.5, -0.5, -0.5], [0.0, 0.0], [ 0.0,  0.0, -1.0]), // 6
    vertex([-0.5,  0.5, -0.5], [1.0, 1.0], [ 0.0,  0.0, -1.0]), // 8
    vertex([ 0.5,  0.5, -0.5], [0.0, 1.0], [ 0.0,  0.0, -1.0]), // 7
    vertex([ 0.5, -0.5, -0.5], [0.0, 0.0], [ 0.0,  0.0, -1.0]), // 6
    vertex([-0.5, -0.5, -0.5], [1.0, 0.0], [ 0.0,  0.0, -1.0]), // 5
    vertex([-0.5,  0.5, -0.5], [1.0, 1.0], [ 0.0,  0.0, -1.0]), // 8
    // top
    vertex([-0.5,  0.5,  0.5], [0.0, 0.0], [ 0.0,  1.0,  0.0]), // 4
    vertex([ 0.5,  0.5, -0.5], [1.0, 1.0], [ 0.0,  1.0,  0.0]), // 7
    vertex([-0.5,  0.5, -0.5], [0.0, 1.0], [ 0.0,  1.0,  0.0]), // 8
    vertex([-0.5,  0.5,  0.5], [0.0, 0.0], [ 0.0,  1.0,  0.0]), // 4
    vertex([ 0.5,  0.5,  0.5], [1.0, 0.0], [ 0.0,  1.0,  0.0]), // 3
    vertex([ 0.5,  0.5, -0.5], [1.0, 1.0], [ 0.0,  1.0,  0.0]), // 7
    // bottom
    vertex([-0.5, -0.5, -0.5], [0.0, 0.0], [ 0.0, -1.0,  0.0]), // 5
    vertex([ 0.5, -0.5,  0.5], [1.0, 1.0], [ 0.0, -1.0,  0.0]), // 2
    vertex([-0.5, -0.5,  0.5], [0.0, 1.0], [ 0.0, -1.0,  0.0]), // 1
    vertex([-0.5, -0.5, -0.5], [0.0, 0.0], [ 0.0, -1.0,  0.0]), // 5
    vertex([ 0.5, -0.5, -0.5], [1.0, 0.0], [ 0.0, -1.0,  0.0]), // 6
    vertex([ 0.5, -0.5,  0.5], [1.0, 1.0], [ 0.0, -1.0,  0.0]), // 2
    // left
    vertex([-0.5, -0.5, -0.5], [0.0, 0.0], [-1.0,  0.0,  0.0]), // 5
    vertex([-0.5,  0.5,  0.5], [1.0, 1.0], [-1.0,  0.0,  0.0]), // 4
    vertex([-0.5,  0.5, -0.5], [0.0, 1.0], [-1.0,  0.0,  0.0]), // 8
    vertex([-0.5, -0.5, -0.5], [0.0, 0.0], [-1.0,  0.0,  0.0]), // 5
    vertex([-0.5, -0.5,  0.5], [1.0, 0.0], [-1.0,  0.0,  0.0]), // 1
    vertex([-0.5,  0.5,  0.5], [1.0, 1.0], [-1.0,  0.0,  0.0]), // 4
    // right
    vertex([ 0.5, -0.5,  0.5], [0.0, 0.0], [ 1.0,  0.0,  0.0]), // 2
    vertex([ 0.5,  0.5, -0.5], [1.0, 1.0], [ 1.0,  0.0,  0.0]), // 7
    vertex([ 0.5,  0.5,  0.5], [0.0, 1.0], [ 1.0,  0.0,  0.0]), // 3
    vertex([ 0.5, -0.5,  0.5], [0.0, 0.0], [ 1.0,  0.0,  0.0]), // 2
    vertex([ 0.5, -0.5, -0.5], [1.0, 0.0], [ 1.0,  0.0,  0.0]), // 6
    vertex([ 0.5,  0.5, -0.5], [1.0, 1.0], [ 1.0,  0.0,  0.0]), // 7
];

impl CubeVertex {
    /// # Shader Attributes
    /// - `location = 0`: position (vec3<f32>)
    /// - `location = 1`: tex_coords (vec2<f32>)
    /// - `location = 2`: normal (vec3<f32>)
    pub fn desc<'a>() -> wgpu::VertexBufferLayout<'a> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<CubeVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 5]>() as wgpu::BufferAddress,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x3,
                },
            ],
        }
    }
}

/// Integer block offset, one per drawn instance.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct InstanceOffset {
    offset: [i32; 3],
}

impl From<Point3<i32>> for InstanceOffset {
    fn from(position: Point3<i32>) -> Self {
        Self {
            offset: [position.x, position.y, position.z],
        }
    }
}

impl InstanceOffset {
    /// The block position this instance is drawn at.
    pub fn offset(&self) -> [i32; 3] {
        self.offset
    }

    /// # Shader Attributes
    /// - `location = 3`: offset (vec3<i32>)
    pub fn desc<'a>() -> wgpu::VertexBufferLayout<'a> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<InstanceOffset>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &[wgpu::VertexAttribute {
                offset: 0,
                shader_location: 3,
                format: wgpu::VertexFormat::Sint32x3,
            }],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{InnerSpace, Vector3};

    #[test]
    fn layouts_match_struct_sizes() {
        assert_eq!(std::mem::size_of::<CubeVertex>(), 32);
        assert_eq!(std::mem::size_of::<InstanceOffset>(), 12);
        assert_eq!(CubeVertex::desc().array_stride, 32);
        assert_eq!(InstanceOffset::desc().step_mode, wgpu::VertexStepMode::Instance);
    }

    #[test]
    fn every_triangle_winds_counter_clockwise_around_its_normal() {
        for triangle in CUBE_VERTICES.chunks(3) {
            let [a, b, c] = [0, 1, 2].map(|i| Vector3::from(triangle[i].position));
            let normal = Vector3::from(triangle[0].normal);
            assert!(triangle.iter().all(|v| v.normal == triangle[0].normal));
            assert!((b - a).cross(c - a).dot(normal) > 0.0);
        }
    }

    #[test]
    fn faces_lie_on_their_normal_plane() {
        for v in CUBE_VERTICES.iter() {
            let position = Vector3::from(v.position);
            let normal = Vector3::from(v.normal);
            assert_eq!(position.dot(normal), 0.5);
            assert!(v.tex_coords.iter().all(|t| *t == 0.0 || *t == 1.0));
        }
    }

    #[test]
    fn instance_from_grid_position() {
        let instance = InstanceOffset::from(Point3::new(3, -1, 7));
        assert_eq!(instance.offset(), [3, -1, 7]);
        assert_eq!(bytemuck::cast_slice::<_, i32>(&[instance]), &[3, -1, 7]);
    }
}
