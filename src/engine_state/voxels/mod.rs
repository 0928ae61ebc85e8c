//! # Voxel Terrain Core
//!
//! Everything needed to turn noise into a block grid. None of it touches the
//! GPU.
//!
//! ## Architecture
//!
//! * **Noise field**: deterministic gradient noise and its octave sum
//! * **Height map**: one normalized surface height per column
//! * **Block**: the empty/solid classification of a single voxel
//! * **World**: the dense grid and its visible instance query
//!
//! ## Data Flow
//!
//! 1. [`noise_field::OctaveNoise`] is sampled at every column
//! 2. [`height_map::HeightMap`] rescales the samples to `[0, 1]`
//! 3. [`world::VoxelGrid`] fills each column up to `height * depth`
//! 4. The solid block offsets are handed to the renderer once

pub mod block;
pub mod height_map;
pub mod noise_field;
pub mod world;
