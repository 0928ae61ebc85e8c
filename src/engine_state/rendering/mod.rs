//! Rendering system for the voxel terrain.
//!
//! This module owns every GPU resource: the surface, the static cube and
//! instance buffers, the camera uniform buffer and the pipeline. The instance
//! buffer is uploaded once since the terrain never changes after generation.

use cgmath::Point3;
use image::RgbaImage;
use log::info;
use wgpu::{util::DeviceExt, Buffer, Device, Queue, Surface, SurfaceConfiguration};

use crate::error::Result;

use super::camera_state::camera::CameraUniform;

pub mod bind_group_state;
pub mod pipeline_manager;
pub mod texture;
pub mod vertex;

use bind_group_state::BindGroupState;
use pipeline_manager::{DrawBuffers, PipelineManager};
use vertex::{InstanceOffset, CUBE_VERTICES};

/// Draws the terrain as one instanced cube per solid block.
pub struct VoxelRenderer {
    /// The WebGPU surface being rendered to
    pub surface: Surface<'static>,
    /// Configuration for the surface (size, format, etc.)
    pub surface_config: SurfaceConfiguration,
    /// The WebGPU device used for creating GPU resources
    pub device: Device,
    /// The WebGPU queue for submitting command buffers
    pub queue: Queue,
    /// The voxel pipeline and its bind groups
    pub pipeline_manager: PipelineManager,
    camera_buffer: Buffer,
    vertex_buffer: Buffer,
    instance_buffer: Buffer,
    instance_count: u32,
}

impl VoxelRenderer {
    /// Uploads the cube, the instance offsets, the camera uniform and the
    /// block texture, then builds the pipeline.
    pub fn new(
        surface: Surface<'static>,
        surface_config: SurfaceConfiguration,
        device: Device,
        queue: Queue,
        instances: &[Point3<i32>],
        camera_uniform: &CameraUniform,
        block_image: &RgbaImage,
    ) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("cube_vertex_buffer"),
            contents: bytemuck::cast_slice(&CUBE_VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let offsets: Vec<InstanceOffset> = instances.iter().copied().map(InstanceOffset::from).collect();
        let instance_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("instance_offset_buffer"),
            contents: bytemuck::cast_slice(&offsets),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let camera_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("camera_buffer"),
            contents: bytemuck::cast_slice(&[*camera_uniform]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let block_texture = texture::Texture::from_image(&device, &queue, block_image, "block_texture");
        let bind_group_state = BindGroupState::new(&device, &camera_buffer, &block_texture);
        let pipeline_manager =
            PipelineManager::new(&device, &surface_config, surface_config.format, bind_group_state);

        info!(
            "Renderer ready: {} instances, surface {:?} {}x{}",
            offsets.len(),
            surface_config.format,
            surface_config.width,
            surface_config.height
        );

        Self {
            surface,
            surface_config,
            device,
            queue,
            pipeline_manager,
            camera_buffer,
            vertex_buffer,
            instance_buffer,
            instance_count: offsets.len() as u32,
        }
    }

    /// Copies the latest camera matrices into the uniform buffer.
    pub fn write_camera(&self, camera_uniform: &CameraUniform) {
        self.queue
            .write_buffer(&self.camera_buffer, 0, bytemuck::cast_slice(&[*camera_uniform]));
    }

    /// Draws one frame.
    pub fn render(&self) -> Result<()> {
        self.pipeline_manager.render(
            &self.surface,
            &self.device,
            &self.queue,
            DrawBuffers {
                vertices: &self.vertex_buffer,
                instances: &self.instance_buffer,
                instance_count: self.instance_count,
            },
        )
    }

    /// Reconfigures the surface and depth buffer. Zero-sized windows are
    /// ignored until they become visible again.
    pub fn resize_surface(&mut self, size: winit::dpi::PhysicalSize<u32>) {
        if size.width == 0 || size.height == 0 {
            return;
        }
        self.surface_config.width = size.width;
        self.surface_config.height = size.height;
        self.reconfigure();
    }

    /// Re-applies the current surface configuration, e.g. after the surface
    /// was lost.
    pub fn reconfigure(&mut self) {
        self.surface.configure(&self.device, &self.surface_config);
        self.pipeline_manager.resize(&self.device, &self.surface_config);
    }

    /// Number of cubes drawn per frame.
    pub fn instance_count(&self) -> u32 {
        self.instance_count
    }
}
