//! # Noise Field
//!
//! Deterministic improved gradient noise over a fixed permutation table, and
//! the octave sampler that layers it into fractal terrain heights.
//!
//! The table is Ken Perlin's reference permutation, so every run of the
//! engine produces exactly the same terrain. Both samplers implement
//! [`noise::NoiseFn`] and can be mixed with the `noise` crate's own sources.
//!
//! ```
//! use voxel_terrain::engine_state::voxels::noise_field::NoiseField;
//!
//! let field = NoiseField;
//! // Lattice points always sit on a zero crossing.
//! assert_eq!(field.sample(3.0, 4.0, 5.0), 0.0);
//! assert_eq!(field.sample(0.5, 0.5, 0.5), field.sample(0.5, 0.5, 0.5));
//! ```

use noise::NoiseFn;

use crate::config::TerrainConfig;

/// Ken Perlin's reference permutation of 0..=255, stored twice so that
/// `index + 1` lookups never wrap.
static PERMUTATION: [u8; 512] = {
    const BASE: [u8; 256] = [
        151, 160, 137, 91, 90, 15, 131, 13, 201, 95, 96, 53, 194, 233, 7, 225, 140, 36, 103, 30,
        69, 142, 8, 99, 37, 240, 21, 10, 23, 190, 6, 148, 247, 120, 234, 75, 0, 26, 197, 62, 94,
        252, 219, 203, 117, 35, 11, 32, 57, 177, 33, 88, 237, 149, 56, 87, 174, 20, 125, 136, 171,
        168, 68, 175, 74, 165, 71, 134, 139, 48, 27, 166, 77, 146, 158, 231, 83, 111, 229, 122,
        60, 211, 133, 230, 220, 105, 92, 41, 55, 46, 245, 40, 244, 102, 143, 54, 65, 25, 63, 161,
        1, 216, 80, 73, 209, 76, 132, 187, 208, 89, 18, 169, 200, 196, 135, 130, 116, 188, 159,
        86, 164, 100, 109, 198, 173, 186, 3, 64, 52, 217, 226, 250, 124, 123, 5, 202, 38, 147,
        118, 126, 255, 82, 85, 212, 207, 206, 59, 227, 47, 16, 58, 17, 182, 189, 28, 42, 223, 183,
        170, 213, 119, 248, 152, 2, 44, 154, 163, 70, 221, 153, 101, 155, 167, 43, 172, 9, 129,
        22, 39, 253, 19, 98, 108, 110, 79, 113, 224, 232, 178, 185, 112, 104, 218, 246, 97, 228,
        251, 34, 242, 193, 238, 210, 144, 12, 191, 179, 162, 241, 81, 51, 145, 235, 249, 14, 239,
        107, 49, 192, 214, 31, 181, 199, 106, 157, 184, 84, 204, 176, 115, 121, 50, 45, 127, 4,
        150, 254, 138, 236, 205, 93, 222, 114, 67, 29, 24, 72, 243, 141, 128, 195, 78, 66, 215,
        61, 156, 180,
    ];

    let mut table = [0u8; 512];
    let mut i = 0;
    while i < 512 {
        table[i] = BASE[i % 256];
        i += 1;
    }
    table
};

#[inline]
fn perm(index: usize) -> usize {
    PERMUTATION[index] as usize
}

/// Quintic smoothstep `6t^5 - 15t^4 + 10t^3`.
#[inline]
fn fade(t: f64) -> f64 {
    ((6.0 * t - 15.0) * t + 10.0) * (t * t * t)
}

#[inline]
fn lerp(t: f64, a: f64, b: f64) -> f64 {
    a + (b - a) * t
}

/// Dot product of the offset with one of 12 edge gradients, chosen by the
/// low four bits of the hash (four of the sixteen cases repeat).
#[inline]
fn grad(hash: usize, x: f64, y: f64, z: f64) -> f64 {
    let h = hash & 15;
    let u = if h < 8 { x } else { y };
    let v = if h < 4 {
        y
    } else if h == 12 || h == 14 {
        x
    } else {
        z
    };
    (if h & 1 == 0 { u } else { -u }) + (if h & 2 == 0 { v } else { -v })
}

/// Wraps a floored coordinate onto the 256-entry lattice.
#[inline]
fn lattice(floored: f64) -> usize {
    (floored as i64 & 255) as usize
}

/// Stateless 3D gradient noise over the fixed permutation table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoiseField;

impl NoiseField {
    /// Samples the field at a continuous 3D coordinate.
    ///
    /// Returns a value roughly in `[-1, 1]`; every integer lattice point maps to 0.
    pub fn sample(&self, x: f64, y: f64, z: f64) -> f64 {
        let (x0, y0, z0) = (x.floor(), y.floor(), z.floor());
        let (xf, yf, zf) = (x - x0, y - y0, z - z0);

        let u = fade(xf);
        let v = fade(yf);
        let w = fade(zf);

        let (xi, yi, zi) = (lattice(x0), lattice(y0), lattice(z0));

        let a = perm(xi) + yi;
        let aa = perm(a) + zi;
        let ab = perm(a + 1) + zi;
        let b = perm(xi + 1) + yi;
        let ba = perm(b) + zi;
        let bb = perm(b + 1) + zi;

        lerp(
            w,
            lerp(
                v,
                lerp(u, grad(perm(aa), xf, yf, zf), grad(perm(ba), xf - 1.0, yf, zf)),
                lerp(
                    u,
                    grad(perm(ab), xf, yf - 1.0, zf),
                    grad(perm(bb), xf - 1.0, yf - 1.0, zf),
                ),
            ),
            lerp(
                v,
                lerp(
                    u,
                    grad(perm(aa + 1), xf, yf, zf - 1.0),
                    grad(perm(ba + 1), xf - 1.0, yf, zf - 1.0),
                ),
                lerp(
                    u,
                    grad(perm(ab + 1), xf, yf - 1.0, zf - 1.0),
                    grad(perm(bb + 1), xf - 1.0, yf - 1.0, zf - 1.0),
                ),
            ),
        )
    }
}

impl NoiseFn<f64, 3> for NoiseField {
    fn get(&self, point: [f64; 3]) -> f64 {
        self.sample(point[0], point[1], point[2])
    }
}

/// Fractal sum of [`NoiseField`] layers sampled on the `z = 0` plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OctaveNoise {
    field: NoiseField,
    scale: f64,
    octaves: u32,
    lacunarity: f64,
    persistence: f64,
}

impl Default for OctaveNoise {
    fn default() -> Self {
        Self::new(&TerrainConfig::default())
    }
}

impl OctaveNoise {
    /// Creates an octave sampler with the given layering parameters.
    pub fn new(config: &TerrainConfig) -> Self {
        Self {
            field: NoiseField,
            scale: config.scale,
            octaves: config.octaves,
            lacunarity: config.lacunarity,
            persistence: config.persistence,
        }
    }

    /// Sums `octaves` layers of noise at `(x, y)`.
    pub fn sample(&self, x: f64, y: f64) -> f64 {
        let mut result = 0.0;
        let mut amplitude = 1.0;
        let mut frequency = 1.0;
        for _ in 0..self.octaves {
            let sx = x / self.scale * frequency;
            let sy = y / self.scale * frequency;
            result += self.field.sample(sx, sy, 0.0) * amplitude;
            frequency *= self.lacunarity;
            amplitude *= self.persistence;
        }
        result
    }

    /// Upper bound on `|sample|`, the sum of every octave's amplitude.
    pub fn amplitude_sum(&self) -> f64 {
        (0..self.octaves).map(|i| self.persistence.powi(i as i32)).sum()
    }
}

impl NoiseFn<f64, 2> for OctaveNoise {
    fn get(&self, point: [f64; 2]) -> f64 {
        self.sample(point[0], point[1])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-12;

    #[test]
    fn table_is_a_duplicated_permutation() {
        let mut seen = [false; 256];
        for &value in &PERMUTATION[..256] {
            seen[value as usize] = true;
        }
        assert!(seen.iter().all(|&s| s));
        assert_eq!(PERMUTATION[..256], PERMUTATION[256..]);
    }

    #[test]
    fn fade_hits_its_endpoints() {
        assert_eq!(fade(0.0), 0.0);
        assert_eq!(fade(1.0), 1.0);
        assert_eq!(fade(0.5), 0.5);
    }

    #[test]
    fn grad_follows_the_sixteen_way_branch() {
        let (x, y, z) = (0.25, 0.5, 0.75);
        assert_eq!(grad(0, x, y, z), x + y);
        assert_eq!(grad(3, x, y, z), -x - y);
        assert_eq!(grad(5, x, y, z), -x + z);
        assert_eq!(grad(8, x, y, z), y + z);
        assert_eq!(grad(12, x, y, z), y + x);
        assert_eq!(grad(13, x, y, z), -y + z);
        assert_eq!(grad(14, x, y, z), y - x);
        assert_eq!(grad(15, x, y, z), -y - z);
        // Only the low four bits matter.
        assert_eq!(grad(16 + 5, x, y, z), grad(5, x, y, z));
    }

    #[test]
    fn sample_is_deterministic() {
        let field = NoiseField;
        for &(x, y, z) in &[(0.5, 0.5, 0.5), (12.7, -3.2, 5.5), (-100.25, 7.125, 0.0)] {
            assert_eq!(
                field.sample(x, y, z).to_bits(),
                field.sample(x, y, z).to_bits()
            );
        }
    }

    #[test]
    fn sample_matches_reference_values() {
        let field = NoiseField;
        let cases = [
            ((0.5, 0.5, 0.5), -0.25),
            ((1.25, 2.5, 3.75), -0.03836345672607422),
            ((-0.3, 7.1, 0.0), 0.2274827894400001),
            ((12.7, -3.2, 5.5), 0.08915260160000119),
        ];
        for ((x, y, z), expected) in cases {
            let value = field.sample(x, y, z);
            assert!(
                (value - expected).abs() < EPSILON,
                "sample({x}, {y}, {z}) = {value}, expected {expected}"
            );
        }
    }

    #[test]
    fn lattice_points_are_zero() {
        let field = NoiseField;
        for i in -3..3 {
            assert_eq!(field.sample(i as f64, (i * 7) as f64, 2.0), 0.0);
        }
    }

    #[test]
    fn octave_sample_matches_reference_values() {
        let octaves = OctaveNoise::default();
        let cases = [
            ((0.0, 0.0), 0.0),
            ((1.0, 0.0), 0.04068394442395218),
            ((10.0, 20.0), -0.008495243769053147),
            ((63.0, 63.0), -0.12765876038052193),
        ];
        for ((x, y), expected) in cases {
            let value = octaves.sample(x, y);
            assert!(
                (value - expected).abs() < EPSILON,
                "octave_sample({x}, {y}) = {value}, expected {expected}"
            );
        }
    }

    #[test]
    fn octave_sample_stays_within_amplitude_sum() {
        let octaves = OctaveNoise::default();
        let bound = octaves.amplitude_sum();
        assert!((bound - 1.875).abs() < EPSILON);

        for x in (-300..300).step_by(7) {
            for y in (-300..300).step_by(7) {
                let value = octaves.sample(x as f64, y as f64);
                assert!(value.abs() <= bound, "({x}, {y}) -> {value}");
            }
        }
    }

    #[test]
    fn noise_fn_impls_agree_with_inherent_samplers() {
        let field = NoiseField;
        let octaves = OctaveNoise::default();
        assert_eq!(field.get([1.5, 2.25, 0.75]), field.sample(1.5, 2.25, 0.75));
        assert_eq!(octaves.get([17.0, 42.0]), octaves.sample(17.0, 42.0));
    }
}
