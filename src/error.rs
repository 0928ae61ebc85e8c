//! # Engine Errors
//!
//! A single error type shared by the terrain core and the windowed host.
//! Core operations (grid access, projection setup, height map wrapping) return
//! these through [`Result`]; the host adds the GPU and configuration failures
//! it can hit during startup.

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, EngineError>;

/// Every failure the engine can report.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A grid coordinate fell outside the declared grid dimensions.
    #[error("block ({x}, {y}, {z}) is outside the {width}x{height}x{depth} grid")]
    OutOfBounds {
        /// Requested x coordinate
        x: i32,
        /// Requested y coordinate
        y: i32,
        /// Requested z coordinate
        z: i32,
        /// Grid width (x extent)
        width: usize,
        /// Grid height (y extent)
        height: usize,
        /// Grid depth (z extent)
        depth: usize,
    },

    /// The near and far clip planes coincide, so no projection exists.
    #[error("invalid projection: near plane ({near}) must differ from far plane ({far})")]
    InvalidProjection {
        /// Near clip distance
        near: f32,
        /// Far clip distance
        far: f32,
    },

    /// A height map does not cover the columns of the grid it is applied to.
    #[error("height map has {actual} columns, expected {expected}")]
    HeightMapSize {
        /// Number of columns the grid needs
        expected: usize,
        /// Number of columns supplied
        actual: usize,
    },

    /// The configuration file could not be read.
    #[error("could not read config file: {0}")]
    ConfigIo(#[from] std::io::Error),

    /// The configuration file is not valid JSON for [`crate::config::EngineConfig`].
    #[error("could not parse config file: {0}")]
    ConfigParse(#[from] serde_json::Error),

    /// The block texture could not be decoded.
    #[error("texture decode error: {0}")]
    Texture(#[from] image::ImageError),

    /// The event loop could not be created or exited abnormally.
    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    /// The window could not be created.
    #[error("window creation failed: {0}")]
    Window(#[from] winit::error::OsError),

    /// The rendering surface could not be created for the window.
    #[error("surface creation failed: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),

    /// No GPU adapter compatible with the surface was found.
    #[error("no compatible GPU adapter: {0}")]
    RequestAdapter(#[from] wgpu::RequestAdapterError),

    /// The adapter refused to hand out a device.
    #[error("device request failed: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),

    /// The next swapchain frame could not be acquired.
    #[error("surface frame unavailable: {0}")]
    Surface(#[from] wgpu::SurfaceError),
}
