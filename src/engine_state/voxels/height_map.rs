//! # Terrain Height Map
//!
//! Normalized column heights for the voxel grid. Raw heights come from any
//! 2D noise source (by default [`OctaveNoise`]) and are rescaled against the
//! global minimum and maximum of the whole map, so the lowest column is
//! always 0 and the highest always 1.

use log::warn;
use noise::NoiseFn;

use crate::error::{EngineError, Result};

use super::noise_field::OctaveNoise;

/// A `columns_x × columns_y` grid of heights in `[0, 1]`.
///
/// Stored with the first coordinate outermost, `index = x * columns_y + y`,
/// which is the same order the voxel grid walks its columns in.
#[derive(Debug, Clone, PartialEq)]
pub struct HeightMap {
    columns_x: usize,
    columns_y: usize,
    samples: Vec<f64>,
}

impl HeightMap {
    /// Samples `source` at every integer column and normalizes the result.
    ///
    /// When the source is flat (global minimum equals maximum) every column
    /// becomes 0 instead of dividing by zero.
    pub fn build<N: NoiseFn<f64, 2>>(columns_x: usize, columns_y: usize, source: &N) -> Self {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;

        let mut samples = Vec::with_capacity(columns_x * columns_y);
        for x in 0..columns_x {
            for y in 0..columns_y {
                let height = source.get([x as f64, y as f64]);
                min = min.min(height);
                max = max.max(height);
                samples.push(height);
            }
        }

        let range = max - min;
        if range > 0.0 && range.is_finite() {
            for height in samples.iter_mut() {
                *height = (*height - min) / range;
            }
        } else {
            if !samples.is_empty() {
                warn!(
                    "Height map over {}x{} columns has no variation, flattening to 0",
                    columns_x, columns_y
                );
            }
            samples.iter_mut().for_each(|height| *height = 0.0);
        }

        Self {
            columns_x,
            columns_y,
            samples,
        }
    }

    /// Builds the height map from the default octave noise.
    pub fn generate(columns_x: usize, columns_y: usize) -> Self {
        Self::build(columns_x, columns_y, &OctaveNoise::default())
    }

    /// Wraps heights that were computed elsewhere.
    ///
    /// `samples` must hold exactly `columns_x * columns_y` values in
    /// `x`-outer order. Values are used as given.
    pub fn from_samples(columns_x: usize, columns_y: usize, samples: Vec<f64>) -> Result<Self> {
        let expected = columns_x * columns_y;
        if samples.len() != expected {
            return Err(EngineError::HeightMapSize {
                expected,
                actual: samples.len(),
            });
        }
        Ok(Self {
            columns_x,
            columns_y,
            samples,
        })
    }

    /// Height of column `(x, y)`, or `None` outside the map.
    pub fn get(&self, x: usize, y: usize) -> Option<f64> {
        if x >= self.columns_x || y >= self.columns_y {
            return None;
        }
        self.samples.get(x * self.columns_y + y).copied()
    }

    /// Number of columns along x.
    pub fn columns_x(&self) -> usize {
        self.columns_x
    }

    /// Number of columns along y.
    pub fn columns_y(&self) -> usize {
        self.columns_y
    }

    /// All heights in storage order.
    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    /// Lowest stored height, `None` for an empty map.
    pub fn min(&self) -> Option<f64> {
        self.samples.iter().copied().reduce(f64::min)
    }

    /// Highest stored height, `None` for an empty map.
    pub fn max(&self) -> Option<f64> {
        self.samples.iter().copied().reduce(f64::max)
    }

    /// Walks every column as `((x, y), height)` in storage order.
    pub fn iter(&self) -> impl Iterator<Item = ((usize, usize), f64)> + '_ {
        let columns_y = self.columns_y.max(1);
        self.samples
            .iter()
            .enumerate()
            .map(move |(i, &height)| ((i / columns_y, i % columns_y), height))
    }

    /// Total number of columns.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// True when the map has no columns.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Linear ramp `x * x_weight + y`.
    struct Ramp {
        x_weight: f64,
    }

    impl NoiseFn<f64, 2> for Ramp {
        fn get(&self, point: [f64; 2]) -> f64 {
            point[0] * self.x_weight + point[1]
        }
    }

    #[test]
    fn generated_map_is_normalized() {
        let map = HeightMap::generate(64, 64);
        assert_eq!(map.len(), 64 * 64);

        assert_eq!(map.min(), Some(0.0));
        assert_eq!(map.max(), Some(1.0));
        assert!(map.samples().iter().all(|h| (0.0..=1.0).contains(h)));
    }

    #[test]
    fn normalization_uses_global_extremes() {
        let map = HeightMap::build(3, 2, &Ramp { x_weight: 10.0 });
        // Raw values 0, 1, 10, 11, 20, 21 over a range of 21.
        assert_eq!(map.get(0, 0), Some(0.0));
        assert_eq!(map.get(1, 0), Some(10.0 / 21.0));
        assert_eq!(map.get(2, 1), Some(1.0));
    }

    #[test]
    fn storage_is_x_outer() {
        let map = HeightMap::build(2, 3, &Ramp { x_weight: 100.0 });
        let raw: Vec<f64> = map.samples().iter().map(|h| (h * 102.0).round()).collect();
        assert_eq!(raw, vec![0.0, 1.0, 2.0, 100.0, 101.0, 102.0]);
    }

    #[test]
    fn flat_source_flattens_to_zero() {
        let map = HeightMap::build(4, 4, &noise::Constant::new(0.7));
        assert!(map.samples().iter().all(|&h| h == 0.0));
    }

    #[test]
    fn empty_map_is_empty() {
        let map = HeightMap::generate(0, 5);
        assert!(map.is_empty());
        assert_eq!(map.get(0, 0), None);
        assert_eq!(map.min(), None);
    }

    #[test]
    fn from_samples_checks_length() {
        assert!(HeightMap::from_samples(2, 2, vec![1.0; 4]).is_ok());
        assert!(matches!(
            HeightMap::from_samples(2, 2, vec![1.0; 3]),
            Err(EngineError::HeightMapSize { expected: 4, actual: 3 })
        ));
    }

    #[test]
    fn get_rejects_out_of_range_columns() {
        let map = HeightMap::from_samples(2, 3, vec![0.5; 6]).unwrap();
        assert_eq!(map.get(1, 2), Some(0.5));
        assert_eq!(map.get(2, 0), None);
        assert_eq!(map.get(0, 3), None);
    }

    #[test]
    fn iter_reports_column_coordinates() {
        let map = HeightMap::from_samples(2, 3, vec![0.0, 0.1, 0.2, 0.3, 0.4, 0.5]).unwrap();
        let columns: Vec<(usize, usize)> = map.iter().map(|(column, _)| column).collect();
        assert_eq!(columns, vec![(0, 0), (0, 1), (0, 2), (1, 0), (1, 1), (1, 2)]);
        assert!(map.iter().all(|((x, y), h)| map.get(x, y) == Some(h)));
    }
}
