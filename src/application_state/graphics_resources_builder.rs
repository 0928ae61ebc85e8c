//! # Graphics Resources Builder
//!
//! This module handles the creation of the window and the WebGPU context.
//! Adapter and device requests are asynchronous; native builds block on them
//! with `pollster`, the browser build spawns them and hands the result back
//! through the event loop proxy.
//!
//! The main components are:
//! - `Graphics`: Holds all graphics-related resources
//! - `GraphicsBuilder`: Helper for asynchronous graphics initialization
//! - `MaybeGraphics`: Represents the various states of graphics initialization

use std::future::Future;
use std::sync::Arc;

use log::info;
use wgpu::{Device, Queue, Surface, SurfaceConfiguration};
use winit::{
    dpi::PhysicalSize,
    event_loop::{ActiveEventLoop, EventLoopProxy},
    window::Window,
};

use crate::config::WindowConfig;
use crate::error::Result;

#[cfg(target_family = "wasm")]
use crate::CANVAS_ID;

/// Contains all graphics-related resources required by the application.
pub struct Graphics {
    /// The application window
    pub window: Arc<Window>,
    /// Surface presenting into `window`
    pub surface: Surface<'static>,
    /// Current surface size and format
    pub surface_config: SurfaceConfiguration,
    /// The WebGPU device
    pub device: Device,
    /// The WebGPU queue
    pub queue: Queue,
    /// Whether `surface` has been configured with `surface_config`
    pub is_surface_configured: bool,
}

/// The user event sent back to the event loop once initialization finishes.
pub type GraphicsResult = Result<Graphics>;

/// Creates the window and surface, then returns a future that requests the
/// adapter and device.
fn create_graphics(
    event_loop: &ActiveEventLoop,
    window_config: &WindowConfig,
) -> Result<impl Future<Output = GraphicsResult> + 'static> {
    #[allow(unused_mut)]
    let mut window_attrs = Window::default_attributes()
        .with_title(window_config.title.clone())
        .with_inner_size(PhysicalSize::new(window_config.width, window_config.height));

    #[cfg(target_family = "wasm")]
    {
        use wasm_bindgen::UnwrapThrowExt;
        use web_sys::wasm_bindgen::JsCast;
        use winit::platform::web::WindowAttributesExtWebSys;

        let window = web_sys::window().unwrap_throw();
        let document = window.document().unwrap_throw();
        let canvas = document.get_element_by_id(CANVAS_ID).unwrap_throw();
        let html_canvas_element = canvas.unchecked_into();
        window_attrs = window_attrs.with_canvas(Some(html_canvas_element));
    }

    let window = Arc::new(event_loop.create_window(window_attrs)?);

    // The instance is a handle to our GPU
    // Backends::PRIMARY => Vulkan + Metal + DX12 + Browser WebGPU
    let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
        #[cfg(not(target_family = "wasm"))]
        backends: wgpu::Backends::PRIMARY,
        #[cfg(target_family = "wasm")]
        backends: wgpu::Backends::GL | wgpu::Backends::BROWSER_WEBGPU,
        flags: wgpu::InstanceFlags::empty(),
        backend_options: wgpu::BackendOptions::from_env_or_default(),
    });

    let surface = instance.create_surface(window.clone())?;

    Ok(async move {
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;

        let adapter_info = adapter.get_info();
        info!("Using adapter {} ({:?})", adapter_info.name, adapter_info.backend);

        let required_limits = if cfg!(target_family = "wasm") {
            wgpu::Limits::downlevel_webgl2_defaults()
        } else {
            wgpu::Limits::default()
        };

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                required_features: wgpu::Features::empty(),
                required_limits,
                label: None,
                memory_hints: wgpu::MemoryHints::MemoryUsage,
                trace: wgpu::Trace::Off,
            })
            .await?;

        let size = window.inner_size();

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .unwrap_or(wgpu::TextureFormat::Bgra8UnormSrgb);
        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width,
            height: size.height,
            present_mode: surface_caps
                .present_modes
                .first()
                .copied()
                .unwrap_or(wgpu::PresentMode::Fifo),
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };

        // The browser reports a zero-sized canvas until the first resize.
        let is_surface_configured = size.width > 0 && size.height > 0;
        if is_surface_configured {
            surface.configure(&device, &surface_config);
        }

        Ok(Graphics {
            window,
            surface,
            surface_config,
            device,
            queue,
            is_surface_configured,
        })
    })
}

/// Helper struct for managing the asynchronous initialization of graphics resources.
pub struct GraphicsBuilder {
    event_loop_proxy: Option<EventLoopProxy<GraphicsResult>>,
    window_config: WindowConfig,
}

/// Represents the possible states of the graphics initialization process.
pub enum MaybeGraphics {
    /// State during asynchronous graphics initialization
    Builder(GraphicsBuilder),

    /// State when graphics resources are ready but not yet configured
    Graphics(Graphics),

    /// State after graphics resources have been moved into the engine
    Moved,
}

impl GraphicsBuilder {
    /// Creates a new GraphicsBuilder with the specified event loop proxy.
    ///
    /// # Arguments
    /// * `event_loop_proxy` - Used to send the initialized graphics resources back to the main thread
    /// * `window_config` - Title and initial size of the window
    pub fn new(event_loop_proxy: EventLoopProxy<GraphicsResult>, window_config: WindowConfig) -> Self {
        Self {
            event_loop_proxy: Some(event_loop_proxy),
            window_config,
        }
    }

    /// Initiates the graphics initialization process.
    ///
    /// The result, success or failure, is delivered as a user event. Calling
    /// this again after the first time does nothing.
    pub fn build_and_send(&mut self, event_loop: &ActiveEventLoop) {
        let Some(event_loop_proxy) = self.event_loop_proxy.take() else {
            // event_loop_proxy is already spent - we already constructed Graphics
            return;
        };

        let gfx_fut = match create_graphics(event_loop, &self.window_config) {
            Ok(gfx_fut) => gfx_fut,
            Err(err) => {
                send_graphics(&event_loop_proxy, Err(err));
                return;
            }
        };

        #[cfg(target_family = "wasm")]
        {
            wasm_bindgen_futures::spawn_local(async move {
                let gfx = gfx_fut.await;
                send_graphics(&event_loop_proxy, gfx);
            });
        }

        #[cfg(not(target_family = "wasm"))]
        {
            let gfx = pollster::block_on(gfx_fut);
            send_graphics(&event_loop_proxy, gfx);
        }
    }
}

fn send_graphics(proxy: &EventLoopProxy<GraphicsResult>, gfx: GraphicsResult) {
    if proxy.send_event(gfx).is_err() {
        log::error!("Event loop closed before graphics initialization finished");
    }
}
