//! # World Module
//!
//! The dense voxel grid generated once at startup.
//!
//! ## Layout
//!
//! ```text
//!  z: depth (vertical)
//!  | y: height
//!  |/
//!  +--x: width
//! ```
//!
//! Blocks are stored one bit each (set = solid) at
//! `x * height * depth + y * depth + z`, so iterating the storage walks x
//! slowest and z fastest. The surface varies over the x–y plane and each
//! column is filled along z up to its scaled height.
//!
//! ## Performance Considerations
//!
//! - Solidity lookups are O(1) bit reads
//! - A 64x64x16 world fits in 8 KiB
//! - The visible instance list is derived on demand; the grid never changes
//!   after generation so callers upload it once

use bitvec::prelude::BitVec;
use cgmath::Point3;
use log::info;

use crate::config::{TerrainConfig, WorldConfig};
use crate::error::{EngineError, Result};

use super::block::Block;
use super::height_map::HeightMap;
use super::noise_field::OctaveNoise;

/// Dense `width × height × depth` grid of [`Block`]s.
///
/// # Examples
///
/// ```
/// use cgmath::Point3;
/// use voxel_terrain::engine_state::voxels::{block::Block, height_map::HeightMap, world::VoxelGrid};
///
/// let heights = HeightMap::from_samples(2, 2, vec![0.0; 4]).unwrap();
/// let grid = VoxelGrid::build(2, 2, 2, &heights).unwrap();
///
/// assert_eq!(grid.block_at(Point3::new(1, 1, 0)).unwrap(), Block::Solid);
/// assert_eq!(grid.block_at(Point3::new(1, 1, 1)).unwrap(), Block::Empty);
/// assert!(grid.block_at(Point3::new(2, 0, 0)).is_err());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct VoxelGrid {
    width: usize,
    height: usize,
    depth: usize,
    solid_array: BitVec,
}

impl VoxelGrid {
    /// Classifies every block against the column heights in `height_map`.
    ///
    /// Column `(x, y)` has surface elevation `h(x, y) * depth`; blocks at or
    /// below it are solid.
    pub fn build(width: usize, height: usize, depth: usize, height_map: &HeightMap) -> Result<Self> {
        let expected = width * height;
        if height_map.columns_x() != width || height_map.columns_y() != height {
            return Err(EngineError::HeightMapSize {
                expected,
                actual: height_map.len(),
            });
        }

        let mut solid_array = BitVec::with_capacity(width * height * depth);
        for column in height_map.samples() {
            let surface = column * depth as f64;
            for z in 0..depth {
                solid_array.push(Block::from_elevation(z, surface).is_solid());
            }
        }

        Ok(Self {
            width,
            height,
            depth,
            solid_array,
        })
    }

    /// Generates the height map from octave noise and fills the grid from it.
    pub fn generate(world: &WorldConfig, terrain: &TerrainConfig) -> Result<Self> {
        let start = web_time::Instant::now();

        let noise = OctaveNoise::new(terrain);
        let height_map = HeightMap::build(world.width, world.height, &noise);
        let grid = Self::build(world.width, world.height, world.depth, &height_map)?;

        info!(
            "Generated {}x{}x{} terrain with {} solid blocks in {:?}",
            world.width,
            world.height,
            world.depth,
            grid.solid_count(),
            start.elapsed()
        );
        Ok(grid)
    }

    /// Linear storage index of `(x, y, z)`. Coordinates must be in range.
    pub fn index(&self, x: usize, y: usize, z: usize) -> usize {
        x * self.height * self.depth + y * self.depth + z
    }

    /// Returns the block at `position`.
    ///
    /// Fails with [`EngineError::OutOfBounds`] when any coordinate lies
    /// outside `[0, dimension)`.
    pub fn block_at(&self, position: Point3<i32>) -> Result<Block> {
        let (x, y, z) = self.checked_coordinates(position)?;
        Ok(Block::from(self.solid_array[self.index(x, y, z)]))
    }

    fn checked_coordinates(&self, position: Point3<i32>) -> Result<(usize, usize, usize)> {
        let in_range = |value: i32, extent: usize| usize::try_from(value).ok().filter(|v| *v < extent);

        match (
            in_range(position.x, self.width),
            in_range(position.y, self.height),
            in_range(position.z, self.depth),
        ) {
            (Some(x), Some(y), Some(z)) => Ok((x, y, z)),
            _ => Err(EngineError::OutOfBounds {
                x: position.x,
                y: position.y,
                z: position.z,
                width: self.width,
                height: self.height,
                depth: self.depth,
            }),
        }
    }

    /// Storage index back to grid coordinates.
    fn coordinates_of(&self, index: usize) -> Point3<i32> {
        let plane = self.height * self.depth;
        let x = index / plane;
        let remainder = index - x * plane;
        Point3::new(x as i32, (remainder / self.depth) as i32, (remainder % self.depth) as i32)
    }

    /// Offsets of every solid block, in storage order.
    pub fn visible_instances_iter(&self) -> impl Iterator<Item = Point3<i32>> + '_ {
        self.solid_array
            .iter_ones()
            .map(move |index| self.coordinates_of(index))
    }

    /// Offsets of every solid block, in storage order (x, then y, then z).
    ///
    /// Interior blocks are included; the renderer relies on back-face culling
    /// rather than per-instance occlusion.
    pub fn visible_instances(&self) -> Vec<Point3<i32>> {
        self.visible_instances_iter().collect()
    }

    /// Number of solid blocks.
    pub fn solid_count(&self) -> usize {
        self.solid_array.count_ones()
    }

    /// `(width, height, depth)`.
    pub fn dimensions(&self) -> (usize, usize, usize) {
        (self.width, self.height, self.depth)
    }

    /// Total number of blocks.
    pub fn len(&self) -> usize {
        self.solid_array.len()
    }

    /// True for a grid with a zero dimension.
    pub fn is_empty(&self) -> bool {
        self.solid_array.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uniform(width: usize, height: usize, depth: usize, h: f64) -> VoxelGrid {
        let map = HeightMap::from_samples(width, height, vec![h; width * height]).unwrap();
        VoxelGrid::build(width, height, depth, &map).unwrap()
    }

    #[test]
    fn full_height_fills_every_block() {
        let grid = uniform(2, 2, 2, 1.0);
        assert_eq!(grid.solid_count(), 8);

        let expected: Vec<Point3<i32>> = (0..2)
            .flat_map(|x| (0..2).flat_map(move |y| (0..2).map(move |z| Point3::new(x, y, z))))
            .collect();
        assert_eq!(grid.visible_instances(), expected);
    }

    #[test]
    fn zero_height_fills_only_the_floor() {
        let grid = uniform(2, 2, 2, 0.0);
        assert_eq!(grid.solid_count(), 4);
        assert_eq!(
            grid.visible_instances(),
            vec![
                Point3::new(0, 0, 0),
                Point3::new(0, 1, 0),
                Point3::new(1, 0, 0),
                Point3::new(1, 1, 0),
            ]
        );
    }

    #[test]
    fn columns_follow_their_own_height() {
        // Columns in x-outer order: (0,0) (0,1) (1,0) (1,1).
        let map = HeightMap::from_samples(2, 2, vec![0.0, 0.5, 0.75, 1.0]).unwrap();
        let grid = VoxelGrid::build(2, 2, 4, &map).unwrap();

        let column_height = |x: i32, y: i32| {
            (0..4)
                .filter(|&z| grid.block_at(Point3::new(x, y, z)).unwrap().is_solid())
                .count()
        };
        assert_eq!(column_height(0, 0), 1);
        assert_eq!(column_height(0, 1), 3);
        assert_eq!(column_height(1, 0), 4);
        assert_eq!(column_height(1, 1), 4);
    }

    #[test]
    fn solid_count_is_monotonic_in_height() {
        let mut previous = 0;
        for step in 0..=20 {
            let grid = uniform(1, 1, 16, step as f64 / 20.0);
            let count = grid.solid_count();
            assert!(count >= previous, "h = {} gave {} < {}", step, count, previous);
            previous = count;
        }
        assert_eq!(previous, 16);
    }

    #[test]
    fn instances_are_exactly_the_solid_blocks() {
        let grid = VoxelGrid::generate(
            &WorldConfig { width: 16, height: 12, depth: 8 },
            &TerrainConfig::default(),
        )
        .unwrap();

        let instances = grid.visible_instances();
        assert_eq!(instances.len(), grid.solid_count());
        for offset in &instances {
            assert_eq!(grid.block_at(*offset).unwrap(), Block::Solid);
        }

        let mut solid = 0;
        for x in 0..16 {
            for y in 0..12 {
                for z in 0..8 {
                    if grid.block_at(Point3::new(x, y, z)).unwrap().is_solid() {
                        solid += 1;
                    }
                }
            }
        }
        assert_eq!(solid, instances.len());
    }

    #[test]
    fn index_and_coordinates_round_trip() {
        let grid = uniform(3, 4, 5, 0.5);
        assert_eq!(grid.index(0, 0, 1), 1);
        assert_eq!(grid.index(0, 1, 0), 5);
        assert_eq!(grid.index(1, 0, 0), 20);
        assert_eq!(grid.coordinates_of(grid.index(2, 3, 4)), Point3::new(2, 3, 4));
        assert_eq!(grid.len(), 60);
    }

    #[test]
    fn out_of_bounds_access_is_reported() {
        let grid = uniform(2, 3, 4, 1.0);
        for position in [
            Point3::new(-1, 0, 0),
            Point3::new(2, 0, 0),
            Point3::new(0, 3, 0),
            Point3::new(0, 0, 4),
            Point3::new(0, -7, 0),
        ] {
            assert!(matches!(
                grid.block_at(position),
                Err(EngineError::OutOfBounds { width: 2, height: 3, depth: 4, .. })
            ));
        }
        assert!(grid.block_at(Point3::new(1, 2, 3)).is_ok());
    }

    #[test]
    fn mismatched_height_map_is_rejected() {
        let map = HeightMap::from_samples(2, 2, vec![0.5; 4]).unwrap();
        assert!(matches!(
            VoxelGrid::build(2, 3, 4, &map),
            Err(EngineError::HeightMapSize { expected: 6, actual: 4 })
        ));
    }
}
