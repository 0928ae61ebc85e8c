//! # Engine State Module
//!
//! The core engine module that owns the terrain, the camera and the renderer.
//!
//! ## Key Components
//!
//! * `EngineState` - The main state container for the engine
//! * `camera_state` - Mouse orientation, camera movement and projection
//! * `rendering` - The instanced cube pipeline and its GPU buffers
//! * `voxels` - Noise, height map and the voxel grid
//!
//! ## Data Flow
//!
//! 1. Startup generates the grid and uploads its solid blocks as instances
//! 2. Mouse motion updates the orientation as it arrives
//! 3. Each redraw moves the camera by the frame delta and uploads the view
//! 4. The frame is drawn with a single instanced draw call

use log::debug;
use wgpu::{Device, Queue, Surface, SurfaceConfiguration};

use crate::application_state::input_state::MoveFlags;
use crate::config::EngineConfig;
use crate::error::Result;

use camera_state::CameraState;
use rendering::VoxelRenderer;
use voxels::world::VoxelGrid;

pub mod camera_state;
pub mod rendering;
pub mod voxels;

/// The main state container for the running application.
pub struct EngineState {
    /// Orientation, camera and projection
    pub camera_state: CameraState,
    /// The generated terrain
    pub grid: VoxelGrid,
    /// GPU resources and the render pipeline
    pub renderer: VoxelRenderer,
}

impl EngineState {
    /// Generates the terrain and sets up rendering for it.
    ///
    /// # Arguments
    ///
    /// * `surface` - The rendering surface
    /// * `surface_config` - Configuration for the rendering surface
    /// * `device` - The GPU device
    /// * `queue` - The GPU command queue
    /// * `config` - World, terrain, camera and texture settings
    pub fn new(
        surface: Surface<'static>,
        surface_config: SurfaceConfiguration,
        device: Device,
        queue: Queue,
        config: &EngineConfig,
    ) -> Result<Self> {
        let grid = VoxelGrid::generate(&config.world, &config.terrain)?;
        let instances = grid.visible_instances();

        let camera_state = CameraState::new(&config.camera, surface_config.width, surface_config.height)?;

        // The browser build has no filesystem to read the texture from.
        #[cfg(target_family = "wasm")]
        let block_image =
            rendering::texture::generate_dirt_image(rendering::texture::FALLBACK_TEXTURE_DIMENSION);
        #[cfg(not(target_family = "wasm"))]
        let block_image = rendering::texture::block_image(&config.window.texture_path);

        let renderer = VoxelRenderer::new(
            surface,
            surface_config,
            device,
            queue,
            &instances,
            &camera_state.camera_uniform,
            &block_image,
        );

        Ok(Self {
            camera_state,
            grid,
            renderer,
        })
    }

    /// Applies one raw mouse motion event to the orientation.
    pub fn apply_mouse_delta(&mut self, dx: f64, dy: f64) {
        self.camera_state.apply_mouse_delta(dx, dy);
    }

    /// Moves the camera by `dt_millis` and uploads the new view.
    pub fn update(&mut self, dt_millis: f32, flags: &MoveFlags) {
        self.camera_state.update(dt_millis, flags);
        self.renderer.write_camera(&self.camera_state.camera_uniform);
    }

    /// Renders the current frame.
    pub fn render(&mut self) -> Result<()> {
        self.renderer.render()
    }

    /// Resizes the surface and rebuilds the projection for the new aspect.
    pub fn resize_surface(&mut self, size: winit::dpi::PhysicalSize<u32>) -> Result<()> {
        if size.width == 0 || size.height == 0 {
            debug!("Ignoring resize to {}x{}", size.width, size.height);
            return Ok(());
        }
        self.renderer.resize_surface(size);
        self.camera_state.resize(size.width, size.height)?;
        self.renderer.write_camera(&self.camera_state.camera_uniform);
        Ok(())
    }

    /// Re-applies the surface configuration after the surface was lost or
    /// became outdated.
    pub fn reconfigure_surface(&mut self) {
        self.renderer.reconfigure();
    }
}
