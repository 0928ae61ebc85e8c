//! Manages the WebGPU render pipeline and the per-frame render pass.
//!
//! There is a single pipeline: instanced unit cubes with back-face culling
//! and a `Less` depth test, drawn into one pass that clears to black.

use wgpu::{Buffer, Device, Queue, RenderPipeline, Surface, SurfaceConfiguration, TextureFormat};

use crate::error::Result;

use super::{
    bind_group_state::BindGroupState,
    texture,
    vertex::{CubeVertex, InstanceOffset, CUBE_VERTICES},
};

/// WGSL source of the voxel shader.
pub const VOXEL_SHADER: &str = include_str!("../../../assets/shaders/voxel.wgsl");

/// Vertex and instance buffers consumed by one draw call.
pub struct DrawBuffers<'a> {
    /// The 36 cube vertices
    pub vertices: &'a Buffer,
    /// One `InstanceOffset` per solid block
    pub instances: &'a Buffer,
    /// Number of instances in `instances`
    pub instance_count: u32,
}

/// Owns the voxel pipeline, its bind groups and the depth buffer.
pub struct PipelineManager {
    /// The instanced cube pipeline
    pub render_pipeline: RenderPipeline,
    /// Camera and texture bind groups
    pub bind_group_state: BindGroupState,
    /// Depth texture used for depth testing
    pub depth_texture: texture::Texture,
}

impl PipelineManager {
    /// Compiles the voxel shader and builds the pipeline.
    ///
    /// # Arguments
    /// * `device` - The WebGPU device
    /// * `config` - Surface configuration containing size and format
    /// * `texture_format` - The colour target format
    /// * `bind_group_state` - Bind groups matching the shader's groups 0 and 1
    pub fn new(
        device: &Device,
        config: &SurfaceConfiguration,
        texture_format: TextureFormat,
        bind_group_state: BindGroupState,
    ) -> Self {
        let depth_texture = texture::Texture::create_depth_texture(device, config, "DEPTH TEXTURE");

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Voxel Shader"),
            source: wgpu::ShaderSource::Wgsl(VOXEL_SHADER.into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Voxel Pipeline Layout"),
            bind_group_layouts: &bind_group_state.layouts(),
            push_constant_ranges: &[],
        });

        let render_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Voxel Render Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[CubeVertex::desc(), InstanceOffset::desc()],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: texture_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: Some(wgpu::Face::Back),
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: texture::Texture::DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: Default::default(),
            multiview: None,
            cache: None,
        });

        Self {
            render_pipeline,
            bind_group_state,
            depth_texture,
        }
    }

    /// Renders a frame to the given surface.
    ///
    /// Acquires the next frame, clears colour and depth, issues a single
    /// instanced draw of the cube and presents. Frame acquisition failures are
    /// returned to the caller, which decides whether to reconfigure.
    pub fn render(
        &self,
        surface: &Surface,
        device: &Device,
        queue: &Queue,
        buffers: DrawBuffers<'_>,
    ) -> Result<()> {
        let frame = surface.get_current_texture()?;

        let view = frame.texture.create_view(&Default::default());
        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Voxel Render Encoder"),
        });
        {
            let depth_stencil_attachment = Some(wgpu::RenderPassDepthStencilAttachment {
                view: &self.depth_texture.view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            });
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment,
                timestamp_writes: None,
                ..Default::default()
            });

            rpass.set_pipeline(&self.render_pipeline);
            rpass.set_bind_group(0, self.bind_group_state.camera_bind_group(), &[]);
            rpass.set_bind_group(1, self.bind_group_state.texture_bind_group(), &[]);
            rpass.set_vertex_buffer(0, buffers.vertices.slice(..));
            if buffers.instance_count > 0 {
                rpass.set_vertex_buffer(1, buffers.instances.slice(..));
                rpass.draw(0..CUBE_VERTICES.len() as u32, 0..buffers.instance_count);
            }
        }

        queue.submit([encoder.finish()]);
        frame.present();
        Ok(())
    }

    /// Handles window resize events by recreating the depth texture.
    pub fn resize(&mut self, device: &Device, config: &SurfaceConfiguration) {
        self.depth_texture = texture::Texture::create_depth_texture(device, config, "DEPTH TEXTURE");
    }
}
