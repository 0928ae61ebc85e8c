//! # Block Module
//!
//! The classification stored for every voxel. Terrain only distinguishes
//! filled from empty space; anything finer (materials, light) is not tracked.

/// Classification of a single voxel.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Block {
    /// Open space. Transparent and never drawn.
    #[default]
    Empty,

    /// Filled terrain.
    Solid,
}

impl Block {
    /// Blocks are solid when their height in the column is at or below the
    /// column's scaled surface elevation.
    pub fn from_elevation(z: usize, surface: f64) -> Self {
        if (z as f64) <= surface {
            Block::Solid
        } else {
            Block::Empty
        }
    }

    /// Whether light (and the camera) passes through this block.
    pub fn is_transparent(&self) -> bool {
        matches!(self, Block::Empty)
    }

    /// Whether this block is drawn.
    pub fn is_solid(&self) -> bool {
        matches!(self, Block::Solid)
    }
}

impl From<bool> for Block {
    fn from(solid: bool) -> Self {
        if solid {
            Block::Solid
        } else {
            Block::Empty
        }
    }
}
