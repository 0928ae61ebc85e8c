//! Manages WebGPU bind groups and their layouts.
//!
//! The voxel shader reads two groups:
//!
//! | group | binding | resource                        |
//! |-------|---------|---------------------------------|
//! | 0     | 0       | camera uniform (view, projection) |
//! | 1     | 0       | block texture                   |
//! | 1     | 1       | block sampler                   |

use wgpu::{BindGroup, BindGroupLayout, Buffer, Device};

use super::texture::Texture;

/// Label of the camera bind group
pub const CAMERA_BIND_GROUP: &str = "camera_bind_group";
/// Label of the camera bind group layout
pub const CAMERA_BIND_GROUP_LAYOUT: &str = "camera_bind_group_layout";
/// Label of the block texture bind group
pub const TEXTURE_BIND_GROUP: &str = "texture_bind_group";
/// Label of the block texture bind group layout
pub const TEXTURE_BIND_GROUP_LAYOUT: &str = "texture_bind_group_layout";

/// Owns the bind groups used by the voxel pipeline.
pub struct BindGroupState {
    camera_bind_group: BindGroup,
    camera_bind_group_layout: BindGroupLayout,
    texture_bind_group: BindGroup,
    texture_bind_group_layout: BindGroupLayout,
}

impl BindGroupState {
    /// Creates both bind groups.
    ///
    /// # Arguments
    /// * `device` - The WebGPU device
    /// * `camera_buffer` - Uniform buffer holding a `CameraUniform`
    /// * `block_texture` - The uploaded block texture and its sampler
    pub fn new(device: &Device, camera_buffer: &Buffer, block_texture: &Texture) -> Self {
        let (camera_bind_group, camera_bind_group_layout) =
            Self::generate_camera_bindgroups(device, camera_buffer);
        let (texture_bind_group, texture_bind_group_layout) =
            Self::generate_texture_bindgroups(device, block_texture);

        Self {
            camera_bind_group,
            camera_bind_group_layout,
            texture_bind_group,
            texture_bind_group_layout,
        }
    }

    /// Bind group 0.
    pub fn camera_bind_group(&self) -> &BindGroup {
        &self.camera_bind_group
    }

    /// Bind group 1.
    pub fn texture_bind_group(&self) -> &BindGroup {
        &self.texture_bind_group
    }

    /// Layouts in group order, for building the pipeline layout.
    pub fn layouts(&self) -> [&BindGroupLayout; 2] {
        [&self.camera_bind_group_layout, &self.texture_bind_group_layout]
    }

    fn generate_camera_bindgroups(device: &Device, camera_buffer: &Buffer) -> (BindGroup, BindGroupLayout) {
        let camera_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
                label: Some(CAMERA_BIND_GROUP_LAYOUT),
            });

        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &camera_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
            label: Some(CAMERA_BIND_GROUP),
        });

        (camera_bind_group, camera_bind_group_layout)
    }

    fn generate_texture_bindgroups(device: &Device, block_texture: &Texture) -> (BindGroup, BindGroupLayout) {
        let texture_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                entries: &[
                    wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Texture {
                            multisampled: false,
                            view_dimension: wgpu::TextureViewDimension::D2,
                            sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        },
                        count: None,
                    },
                    wgpu::BindGroupLayoutEntry {
                        binding: 1,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        // This should match the filterable field of the corresponding Texture entry above.
                        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                        count: None,
                    },
                ],
                label: Some(TEXTURE_BIND_GROUP_LAYOUT),
            });

        let texture_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &texture_bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&block_texture.view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&block_texture.sampler),
                },
            ],
            label: Some(TEXTURE_BIND_GROUP),
        });

        (texture_bind_group, texture_bind_group_layout)
    }
}
