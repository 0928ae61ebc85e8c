//! Texture handling for the rendering pipeline.
//!
//! This module provides the depth buffer and the single block texture. The
//! block texture is decoded from disk when possible; otherwise a dirt texture
//! is shaded procedurally from [`NoiseField`] so the world always renders.

use std::path::Path;

use image::{Rgba, RgbaImage};
use log::{info, warn};

use crate::engine_state::voxels::noise_field::NoiseField;
use crate::error::Result;

/// Edge length of the generated fallback texture in pixels.
pub const FALLBACK_TEXTURE_DIMENSION: u32 = 16;

/// Base dirt colour the fallback texture is shaded around.
const DIRT_BASE: [f64; 3] = [134.0, 96.0, 67.0];

/// Represents a GPU texture with associated view and sampler.
pub struct Texture {
    /// The underlying WebGPU texture resource.
    #[allow(dead_code)]
    pub texture: wgpu::Texture,
    /// The texture view used for binding the texture to the pipeline.
    pub view: wgpu::TextureView,
    /// The sampler used for texture filtering and addressing.
    pub sampler: wgpu::Sampler,
}

impl Texture {
    /// The texture format used for depth buffers.
    pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

    /// Creates a depth texture matching the surface size.
    pub fn create_depth_texture(
        device: &wgpu::Device,
        config: &wgpu::SurfaceConfiguration,
        label: &str,
    ) -> Self {
        let size = wgpu::Extent3d {
            width: config.width.max(1),
            height: config.height.max(1),
            depth_or_array_layers: 1,
        };
        let desc = wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Self::DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        };

        let texture = device.create_texture(&desc);
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            mipmap_filter: wgpu::FilterMode::Nearest,
            compare: Some(wgpu::CompareFunction::LessEqual),
            lod_min_clamp: 0.0,
            lod_max_clamp: 100.0,
            ..Default::default()
        });

        Self {
            texture,
            view,
            sampler,
        }
    }

    /// Uploads an RGBA image as the block texture.
    ///
    /// Minification is linear and magnification nearest, so blocks stay crisp
    /// up close.
    pub fn from_image(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        image: &RgbaImage,
        label: &str,
    ) -> Self {
        use wgpu::util::DeviceExt;

        let (width, height) = image.dimensions();
        let texture = device.create_texture_with_data(
            queue,
            &wgpu::TextureDescriptor {
                label: Some(label),
                size: wgpu::Extent3d {
                    width,
                    height,
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: wgpu::TextureFormat::Rgba8UnormSrgb,
                usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
                view_formats: &[],
            },
            wgpu::util::TextureDataOrder::LayerMajor,
            image.as_raw(),
        );
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            address_mode_w: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        Self {
            texture,
            view,
            sampler,
        }
    }
}

/// Decodes the image at `path` into RGBA8.
pub fn load_block_image(path: impl AsRef<Path>) -> Result<RgbaImage> {
    let image = image::open(path.as_ref())?;
    Ok(image.into_rgba8())
}

/// Shades a square dirt texture from two layers of noise.
pub fn generate_dirt_image(dimension: u32) -> RgbaImage {
    let field = NoiseField;
    RgbaImage::from_fn(dimension, dimension, |x, y| {
        let (fx, fy) = (x as f64, y as f64);
        let coarse = field.sample(fx / 5.3, fy / 5.3, 0.5);
        let fine = field.sample(fx / 1.7, fy / 1.7, 3.5);
        let shade = (0.8 + 0.35 * coarse + 0.15 * fine).clamp(0.4, 1.2);

        let [r, g, b] = DIRT_BASE.map(|channel| (channel * shade).round().clamp(0.0, 255.0) as u8);
        Rgba([r, g, b, 255])
    })
}

/// Loads the block texture, falling back to the generated dirt texture when
/// the file is missing or cannot be decoded.
pub fn block_image(path: impl AsRef<Path>) -> RgbaImage {
    let path = path.as_ref();
    match load_block_image(path) {
        Ok(image) => {
            info!(
                "Loaded block texture {} ({}x{})",
                path.display(),
                image.width(),
                image.height()
            );
            image
        }
        Err(err) => {
            warn!(
                "Could not load block texture {}: {}. Using generated dirt texture",
                path.display(),
                err
            );
            generate_dirt_image(FALLBACK_TEXTURE_DIMENSION)
        }
    }
}
