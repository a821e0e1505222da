//! Discretized 3D flow field sampled from seeded 2D coherent noise.
//!
//! Each cell stores a direction built from two noise samples read as
//! spherical angles (theta, phi), scaled to half the cell size. Lookups clamp
//! to the grid so any position maps to some cell.

use crate::error::{EngineError, EngineResult};
use log::debug;
use nalgebra::Vector3;
use noise::{NoiseFn, OpenSimplex};
use rand::Rng;
use std::f64::consts::PI;

/// Noise-space distance between neighbouring cells.
pub const NOISE_STEP: f64 = 0.005;

/// Upper bound on grid cells a field may allocate.
pub const MAX_FIELD_CELLS: usize = 1 << 24;

/// Seeded, reproducible 2D noise in [-1, 1].
pub trait Noise2D {
    fn noise2d(&self, x: f64, y: f64) -> f64;
}

impl<F> Noise2D for F
where
    F: Fn(f64, f64) -> f64,
{
    fn noise2d(&self, x: f64, y: f64) -> f64 {
        (self)(x, y)
    }
}

/// Default noise source backed by OpenSimplex.
#[derive(Clone)]
pub struct SimplexNoise {
    inner: OpenSimplex,
}

impl SimplexNoise {
    pub fn new(seed: u64) -> Self {
        Self {
            inner: OpenSimplex::new(fold_seed(seed)),
        }
    }
}

impl Noise2D for SimplexNoise {
    fn noise2d(&self, x: f64, y: f64) -> f64 {
        self.inner.get([x, y])
    }
}

fn fold_seed(seed: u64) -> u32 {
    (seed ^ (seed >> 32)) as u32
}

#[derive(Debug, Clone)]
pub struct FlowField {
    extent: Vector3<f64>,
    resolution: f64,
    cols: usize,
    rows: usize,
    layers: usize,
    field: Vec<Vector3<f64>>,
    seed: u64,
}

impl FlowField {
    /// Field covering `[-extent/2, extent/2]` on each axis with cubic cells of
    /// side `resolution`, built from [`SimplexNoise`] seeded with `seed`.
    pub fn new(extent: Vector3<f64>, resolution: f64, seed: u64) -> EngineResult<Self> {
        Self::with_noise(extent, resolution, seed, &SimplexNoise::new(seed))
    }

    /// Same as [`FlowField::new`] with an injected noise source. `seed` is
    /// only recorded.
    pub fn with_noise<N: Noise2D + ?Sized>(
        extent: Vector3<f64>,
        resolution: f64,
        seed: u64,
        noise: &N,
    ) -> EngineResult<Self> {
        if !resolution.is_finite() || resolution <= 0.0 {
            return Err(EngineError::InvalidResolution(resolution));
        }
        if !extent.iter().all(|c| c.is_finite() && *c > 0.0) {
            return Err(EngineError::InvalidExtent);
        }
        let cols = (extent.x / resolution).ceil() as usize;
        let rows = (extent.y / resolution).ceil() as usize;
        let layers = (extent.z / resolution).ceil() as usize;
        let cells = cols
            .checked_mul(rows)
            .and_then(|n| n.checked_mul(layers))
            .filter(|n| *n <= MAX_FIELD_CELLS)
            .ok_or(EngineError::FieldTooLarge {
                cols,
                rows,
                layers,
                max: MAX_FIELD_CELLS,
            })?;

        let mut field = Self {
            extent,
            resolution,
            cols,
            rows,
            layers,
            field: vec![Vector3::zeros(); cells],
            seed,
        };
        field.fill(noise);
        Ok(field)
    }

    /// Rebuild the whole grid from a new seed. Passing `None` draws one.
    /// Returns the seed used.
    pub fn init(&mut self, seed: Option<u64>) -> u64 {
        let seed = seed.unwrap_or_else(|| rand::thread_rng().gen_range(0..10_000_000));
        self.rebuild_with(seed, &SimplexNoise::new(seed));
        seed
    }

    /// Rebuild with a seed drawn from `rng`.
    pub fn reseed<R: Rng + ?Sized>(&mut self, rng: &mut R) -> u64 {
        let seed = rng.gen_range(0..10_000_000);
        self.rebuild_with(seed, &SimplexNoise::new(seed));
        seed
    }

    pub fn rebuild_with<N: Noise2D + ?Sized>(&mut self, seed: u64, noise: &N) {
        self.seed = seed;
        self.fill(noise);
        debug!(
            "rebuilt flow field {}x{}x{} with seed {}",
            self.cols, self.rows, self.layers, seed
        );
    }

    fn fill<N: Noise2D + ?Sized>(&mut self, noise: &N) {
        let r = self.resolution / 2.0;
        for x in 0..self.cols {
            let xoff = x as f64 * NOISE_STEP;
            for y in 0..self.rows {
                let yoff = y as f64 * NOISE_STEP;
                for z in 0..self.layers {
                    let zoff = z as f64 * NOISE_STEP;
                    let theta = noise.noise2d(yoff, zoff) * PI * 2.0;
                    let phi = noise.noise2d(xoff, yoff) * PI * 2.0;
                    let idx = self.index(x, y, z);
                    self.field[idx] = Vector3::new(
                        r * theta.sin() * phi.cos(),
                        r * theta.sin() * phi.sin(),
                        r * theta.cos(),
                    );
                }
            }
        }
    }

    fn index(&self, x: usize, y: usize, z: usize) -> usize {
        (x * self.rows + y) * self.layers + z
    }

    /// Cell index along one axis, clamped into `[0, count - 1]`.
    fn axis_cell(coord: f64, size: f64, resolution: f64, count: usize) -> usize {
        let cell = ((coord + size / 2.0) / resolution).floor();
        // NaN casts to 0, infinities saturate.
        let cell = cell.max(0.0) as usize;
        cell.min(count - 1)
    }

    /// Flow vector of the cell enclosing `position`, never out of bounds.
    pub fn lookup(&self, position: &Vector3<f64>) -> Vector3<f64> {
        let x = Self::axis_cell(position.x, self.extent.x, self.resolution, self.cols);
        let y = Self::axis_cell(position.y, self.extent.y, self.resolution, self.rows);
        let z = Self::axis_cell(position.z, self.extent.z, self.resolution, self.layers);
        self.field[self.index(x, y, z)]
    }

    pub fn cell(&self, x: usize, y: usize, z: usize) -> Option<&Vector3<f64>> {
        if x < self.cols && y < self.rows && z < self.layers {
            self.field.get(self.index(x, y, z))
        } else {
            None
        }
    }

    /// Cell corner in world space.
    pub fn cell_origin(&self, x: usize, y: usize, z: usize) -> Vector3<f64> {
        Vector3::new(
            x as f64 * self.resolution - self.extent.x / 2.0,
            y as f64 * self.resolution - self.extent.y / 2.0,
            z as f64 * self.resolution - self.extent.z / 2.0,
        )
    }

    /// Line-segment buffer: per cell [origin xyz, origin + vector xyz].
    pub fn vectors_flat(&self) -> Vec<f32> {
        let mut out = Vec::with_capacity(self.field.len() * 6);
        for x in 0..self.cols {
            for y in 0..self.rows {
                for z in 0..self.layers {
                    let o = self.cell_origin(x, y, z);
                    let tip = o + self.field[self.index(x, y, z)];
                    out.extend_from_slice(&[
                        o.x as f32, o.y as f32, o.z as f32,
                        tip.x as f32, tip.y as f32, tip.z as f32,
                    ]);
                }
            }
        }
        out
    }

    pub fn dimensions(&self) -> (usize, usize, usize) { (self.cols, self.rows, self.layers) }
    pub fn resolution(&self) -> f64 { self.resolution }
    pub fn extent(&self) -> &Vector3<f64> { &self.extent }
    pub fn seed(&self) -> u64 { self.seed }
    pub fn vectors(&self) -> &[Vector3<f64>] { &self.field }
}
