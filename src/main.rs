//! # Voxel Terrain Application Entry Point
//!
//! Calls into the library's `run()`. For the browser build see `run_web()`.
//!
//! ## Usage
//!
//! ```bash
//! RUST_LOG=info VOXEL_TERRAIN_CONFIG=config/terrain.json cargo run --release
//! ```

fn main() {
    #[cfg(not(target_family = "wasm"))]
    voxel_terrain::run();
}
