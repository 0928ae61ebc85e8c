#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::invalid_rust_codeblocks)]

//! # Voxel Terrain
//!
//! Procedural voxel terrain with a first-person fly-through camera, rendered
//! with WGPU on native targets and in the browser (WebAssembly).
//!
//! Terrain is generated once at startup: octave gradient noise gives a height
//! per column, columns are filled into a dense block grid, and every solid
//! block is drawn as one instance of a unit cube.
//!
//! ## Key Modules
//!
//! * `config` - JSON startup settings
//! * `engine_state` - Terrain generation, camera math and rendering
//! * `application_state` - Window lifecycle, input and pointer capture
//! * `error` - The crate-wide error type
//!
//! ## Usage
//!
//! ```no_run
//! // Native application initialization
//! fn main() {
//!     voxel_terrain::run();
//! }
//! ```
//!
//! The terrain core works without a window or GPU:
//!
//! ```
//! use voxel_terrain::config::EngineConfig;
//! use voxel_terrain::engine_state::voxels::world::VoxelGrid;
//!
//! let config = EngineConfig::with_default_bindings();
//! let grid = VoxelGrid::generate(&config.world, &config.terrain).unwrap();
//! assert_eq!(grid.visible_instances().len(), grid.solid_count());
//! ```

use application_state::ApplicationState;
#[cfg(target_family = "wasm")]
use wasm_bindgen::prelude::wasm_bindgen;

use winit::event_loop::EventLoop;

use log::{error, info};

pub mod application_state;
pub mod config;
pub mod engine_state;
pub mod error;

use config::EngineConfig;

#[cfg(target_family = "wasm")]
const CANVAS_ID: &str = "wgpu-canvas";

cfg_if::cfg_if! {
    if #[cfg(target_family = "wasm")] {
        fn init_logger() {
            std::panic::set_hook(Box::new(console_error_panic_hook::hook));
            if let Err(err) = console_log::init_with_level(log::Level::Info) {
                web_sys::console::error_1(&format!("Couldn't initialize logger: {err}").into());
            }
        }
    } else {
        fn init_logger() {
            let mut log_builder = env_logger::Builder::new();
            log_builder
                .target(env_logger::Target::Stdout)
                .parse_env("RUST_LOG")
                .init();
        }
    }
}

/// Loads the config, opens the window and runs until it is closed.
///
/// Fatal startup errors are logged and end the process normally.
#[cfg(not(target_family = "wasm"))]
pub fn run() {
    init_logger();
    info!("Logger initialized");

    if let Err(err) = try_run() {
        error!("{}", err);
    }
}

#[cfg(not(target_family = "wasm"))]
fn try_run() -> error::Result<()> {
    let config = EngineConfig::load_from_env()?;
    config.validate()?;

    let event_loop = EventLoop::with_user_event().build()?;
    let mut state = ApplicationState::new(event_loop.create_proxy(), config);

    event_loop.run_app(&mut state)?;
    Ok(())
}

/// Browser entry point. Uses the default configuration and renders into the
/// canvas with id `wgpu-canvas`.
#[cfg(target_family = "wasm")]
#[wasm_bindgen]
pub fn run_web() {
    use winit::platform::web::EventLoopExtWebSys;

    init_logger();
    info!("Logger initialized");

    let config = EngineConfig::with_default_bindings();
    if let Err(err) = config.validate() {
        error!("{}", err);
        return;
    }

    let event_loop = match EventLoop::with_user_event().build() {
        Ok(event_loop) => event_loop,
        Err(err) => {
            error!("{}", err);
            return;
        }
    };

    let state = ApplicationState::new(event_loop.create_proxy(), config);
    event_loop.spawn_app(state);
}
