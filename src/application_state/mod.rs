//! # Application State Management
//!
//! This module handles the application's state management, including:
//! - Window and graphics initialization
//! - Input handling and pointer capture
//! - Application lifecycle events
//! - State transitions between initialization and running states

pub mod frame_clock;
pub mod graphics_resources_builder;
pub mod input_manager;
pub mod input_state;

use std::sync::Arc;

use frame_clock::FrameClock;
use graphics_resources_builder::{Graphics, GraphicsBuilder, GraphicsResult, MaybeGraphics};
use input_manager::{EscapeOutcome, InputManager};
use log::{error, info, warn};

use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{DeviceEvent, DeviceId, ElementState, KeyEvent, MouseButton, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoopProxy},
    keyboard::{KeyCode, PhysicalKey},
    window::{CursorGrabMode, Window, WindowId},
};

use crate::config::EngineConfig;
use crate::engine_state::EngineState;
use crate::error::EngineError;

/// The main application state container that manages the application's lifecycle.
///
/// It implements `ApplicationHandler` to handle window and device events,
/// moving from graphics initialization to the running engine.
pub struct ApplicationState {
    /// The current graphics state, which may be initializing, ready or moved
    pub graphics: MaybeGraphics,

    /// The initialized application state, if the application has started
    pub state: Option<InitializedApplicationState>,

    /// Cached window size for web platforms during initialization
    pub web_window_size: Option<PhysicalSize<u32>>,

    config: EngineConfig,
}

/// Represents the fully initialized and running state of the application.
pub struct InitializedApplicationState {
    /// Terrain, camera and renderer
    pub engine_state: EngineState,

    /// Handle to the application window
    pub window: Arc<Window>,

    /// Movement flags and pointer capture
    pub input_manager: InputManager,

    /// Time between redraws
    pub frame_clock: FrameClock,
}

impl ApplicationState {
    /// Creates the application in its initial graphics-building state.
    pub fn new(event_loop_proxy: EventLoopProxy<GraphicsResult>, config: EngineConfig) -> Self {
        Self {
            graphics: MaybeGraphics::Builder(GraphicsBuilder::new(
                event_loop_proxy,
                config.window.clone(),
            )),
            state: None,
            web_window_size: None,
            config,
        }
    }

    /// Handles window resize events during the initialization phase.
    ///
    /// Configures the surface for the new size and starts the engine.
    fn resized(&mut self, size: PhysicalSize<u32>, event_loop: &ActiveEventLoop) {
        let MaybeGraphics::Graphics(gfx) = &mut self.graphics else {
            return;
        };
        if size.width == 0 || size.height == 0 {
            return;
        }

        gfx.surface_config.width = size.width;
        gfx.surface_config.height = size.height;
        gfx.surface.configure(&gfx.device, &gfx.surface_config);
        gfx.is_surface_configured = true;
        self.initialize_application_state(event_loop);
    }

    /// Moves the graphics resources into a new [`EngineState`].
    ///
    /// Generation or GPU setup failures are fatal and close the event loop.
    fn initialize_application_state(&mut self, event_loop: &ActiveEventLoop) {
        if !matches!(self.graphics, MaybeGraphics::Graphics(_)) {
            return;
        }
        let MaybeGraphics::Graphics(gfx) = std::mem::replace(&mut self.graphics, MaybeGraphics::Moved) else {
            return;
        };

        let Graphics {
            window,
            surface,
            surface_config,
            device,
            queue,
            ..
        } = gfx;

        match EngineState::new(surface, surface_config, device, queue, &self.config) {
            Ok(engine_state) => {
                self.state = Some(InitializedApplicationState {
                    engine_state,
                    window,
                    input_manager: InputManager::new(&self.config.key_bindings),
                    frame_clock: FrameClock::new(),
                });
            }
            Err(err) => {
                error!("Failed to start engine: {}", err);
                event_loop.exit();
            }
        }
    }
}

impl InitializedApplicationState {
    /// Grabs and hides the cursor so mouse motion steers the camera.
    fn capture_pointer(&mut self) {
        let grabbed = self
            .window
            .set_cursor_grab(CursorGrabMode::Locked)
            .or_else(|err| {
                warn!("Cursor lock unavailable ({}), confining instead", err);
                self.window.set_cursor_grab(CursorGrabMode::Confined)
            });

        match grabbed {
            Ok(()) => {
                self.window.set_cursor_visible(false);
                self.input_manager.set_pointer_captured(true);
                info!("Pointer captured");
            }
            Err(err) => warn!("Could not capture pointer: {}", err),
        }
    }

    /// Returns the cursor to the user.
    fn release_pointer(&mut self) {
        if let Err(err) = self.window.set_cursor_grab(CursorGrabMode::None) {
            warn!("Could not release cursor grab: {}", err);
        }
        self.window.set_cursor_visible(true);
        self.input_manager.set_pointer_captured(false);
        info!("Pointer released");
    }

    /// One update and render tick.
    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let dt = self.frame_clock.tick();
        self.engine_state.update(dt, self.input_manager.move_flags());

        match self.engine_state.render() {
            Ok(()) => {}
            Err(EngineError::Surface(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated)) => {
                self.engine_state.reconfigure_surface();
            }
            Err(EngineError::Surface(wgpu::SurfaceError::Timeout)) => {
                warn!("Surface timed out, skipping frame");
            }
            Err(err) => {
                error!("Render failed: {}", err);
                event_loop.exit();
            }
        }
    }
}

impl ApplicationHandler<GraphicsResult> for ApplicationState {
    /// Handles window-related events such as resize, focus changes, and input events.
    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if let Some(state) = &mut self.state {
            state.input_manager.intake_input(&event);

            match event {
                WindowEvent::Resized(size) => {
                    if let Err(err) = state.engine_state.resize_surface(size) {
                        error!("Resize failed: {}", err);
                        event_loop.exit();
                    }
                }
                WindowEvent::Focused(false) => {
                    if state.input_manager.is_pointer_captured() {
                        state.release_pointer();
                    }
                    state.input_manager.focus_lost();
                }
                WindowEvent::MouseInput {
                    state: ElementState::Pressed,
                    button: MouseButton::Left,
                    ..
                } => {
                    if !state.input_manager.is_pointer_captured() {
                        state.capture_pointer();
                    }
                }
                WindowEvent::RedrawRequested => state.redraw(event_loop),
                WindowEvent::KeyboardInput {
                    event:
                        KeyEvent {
                            state: ElementState::Pressed,
                            physical_key: PhysicalKey::Code(KeyCode::Escape),
                            repeat: false,
                            ..
                        },
                    ..
                } => match state.input_manager.escape_pressed() {
                    EscapeOutcome::ReleaseCapture => state.release_pointer(),
                    EscapeOutcome::Exit => event_loop.exit(),
                },
                WindowEvent::CloseRequested => event_loop.exit(),
                _ => (),
            }
        } else {
            match event {
                WindowEvent::Resized(size) => {
                    self.web_window_size = Some(size);
                    self.resized(size, event_loop);
                }
                WindowEvent::CloseRequested
                | WindowEvent::KeyboardInput {
                    event:
                        KeyEvent {
                            state: ElementState::Pressed,
                            physical_key: PhysicalKey::Code(KeyCode::Escape),
                            ..
                        },
                    ..
                } => event_loop.exit(),
                _ => (),
            }
        }
    }

    /// Feeds raw mouse motion to the orientation while the pointer is captured.
    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: DeviceId,
        event: DeviceEvent,
    ) {
        if let Some(state) = &mut self.state {
            if let DeviceEvent::MouseMotion { delta } = event {
                if let Some((dx, dy)) = state.input_manager.filter_mouse_motion(delta) {
                    state.engine_state.apply_mouse_delta(dx, dy);
                }
            }
        }
    }

    /// Called when the application is resumed after being suspended.
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if let MaybeGraphics::Builder(builder) = &mut self.graphics {
            builder.build_and_send(event_loop);
        }
    }

    /// Receives the outcome of graphics initialization.
    fn user_event(&mut self, event_loop: &ActiveEventLoop, graphics: GraphicsResult) {
        let graphics = match graphics {
            Ok(graphics) => graphics,
            Err(err) => {
                error!("Graphics initialization failed: {}", err);
                event_loop.exit();
                return;
            }
        };

        let is_surface_configured = graphics.is_surface_configured;
        self.graphics = MaybeGraphics::Graphics(graphics);

        if is_surface_configured {
            self.initialize_application_state(event_loop);
        } else if let Some(size) = self.web_window_size {
            self.resized(size, event_loop);
        }
    }

    /// Requests the next frame once pending events are handled.
    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(state) = &self.state {
            state.window.request_redraw();
        }
    }
}
