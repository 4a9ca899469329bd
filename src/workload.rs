//! Seeded sample buffers for every vector representation
//!
//! Each buffer gets its own generator seeded from the config. Draws are taken
//! component by component, element by element, so element `i` holds the same
//! logical vector in every representation built from the same seed.

use nalgebra::{Vector2, Vector4};
use ndarray::Array2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::core::{BenchConfig, BenchResult};
use crate::vectors::{F32xN, F64xN, Float4, Vec2d, Vec4};

/// Per-buffer pseudo-random source in [0, 1).
pub struct SampleRng {
    rng: StdRng,
}

impl SampleRng {
    pub fn new(seed: u64) -> Self {
        Self { rng: StdRng::seed_from_u64(seed) }
    }

    pub fn next_f64(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }

    pub fn next_f32(&mut self) -> f32 {
        self.rng.gen::<f32>()
    }

    pub fn next_components4(&mut self) -> [f32; 4] {
        [self.next_f32(), self.next_f32(), self.next_f32(), self.next_f32()]
    }

    pub fn next_components2(&mut self) -> [f64; 2] {
        [self.next_f64(), self.next_f64()]
    }
}

/// Two seeded inputs and one output buffer.
#[derive(Debug, Clone)]
pub struct Buffers<T> {
    pub x: Vec<T>,
    pub x2: Vec<T>,
    pub y: Vec<T>,
}

impl<T: Copy> Buffers<T> {
    fn generate<F>(len: usize, seed_a: u64, seed_b: u64, zero: T, mut draw: F) -> Self
    where
        F: FnMut(&mut SampleRng) -> T,
    {
        let mut fill = |seed: u64| {
            let mut rng = SampleRng::new(seed);
            (0..len).map(|_| draw(&mut rng)).collect::<Vec<T>>()
        };
        let x = fill(seed_a);
        let x2 = fill(seed_b);
        Self { x, x2, y: vec![zero; len] }
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }
}

/// `(len, 4)` matrices, one logical vector per row.
#[derive(Debug, Clone)]
pub struct MatrixBuffers {
    pub x: Array2<f32>,
    pub x2: Array2<f32>,
    pub y: Array2<f32>,
}

/// Everything the benchmark cases read and write.
///
/// Built once before the suite runs and owned by whoever drives it.
#[derive(Debug, Clone)]
pub struct Workload {
    pub len: usize,
    pub scale: f32,
    pub my_vec: Buffers<Vec4>,
    pub na_vec4: Buffers<Vector4<f32>>,
    pub float4: Buffers<Float4>,
    pub wide: Buffers<F32xN>,
    pub matrix: MatrixBuffers,
    /// Interleaved xyzw scalars, `4 * len` long
    pub flat: Buffers<f32>,
    pub my_vec2d: Buffers<Vec2d>,
    pub na_vec2d: Buffers<Vector2<f64>>,
    pub wide2d: Buffers<F64xN>,
}

impl Workload {
    pub fn new(config: &BenchConfig) -> BenchResult<Self> {
        let len = config.array_size;
        let (a, b) = (config.seed_a, config.seed_b);

        let my_vec = Buffers::generate(len, a, b, Vec4::default(), |r| {
            let [x, y, z, w] = r.next_components4();
            Vec4::new(x, y, z, w)
        });
        let na_vec4 = Buffers::generate(len, a, b, Vector4::zeros(), |r| {
            Vector4::from(r.next_components4())
        });
        let float4 = Buffers::generate(len, a, b, Float4::default(), |r| {
            Float4(r.next_components4())
        });
        let wide = Buffers::generate(len, a, b, F32xN::default(), |r| {
            F32xN::from_leading(&r.next_components4())
        });
        let flat = Buffers::generate(4 * len, a, b, 0.0, |r| r.next_f32());

        let matrix = MatrixBuffers {
            x: Array2::from_shape_vec((len, 4), flat.x.clone())?,
            x2: Array2::from_shape_vec((len, 4), flat.x2.clone())?,
            y: Array2::zeros((len, 4)),
        };

        let my_vec2d = Buffers::generate(len, a, b, Vec2d::default(), |r| {
            let [x, y] = r.next_components2();
            Vec2d::new(x, y)
        });
        let na_vec2d = Buffers::generate(len, a, b, Vector2::zeros(), |r| {
            Vector2::from(r.next_components2())
        });
        let wide2d = Buffers::generate(len, a, b, F64xN::default(), |r| {
            F64xN::from_leading(&r.next_components2())
        });

        debug!(len, seed_a = a, seed_b = b, "Sample buffers generated");

        Ok(Self {
            len,
            scale: config.scale_factor,
            my_vec,
            na_vec4,
            float4,
            wide,
            matrix,
            flat,
            my_vec2d,
            na_vec2d,
            wide2d,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config() -> BenchConfig {
        BenchConfig { array_size: 64, ..Default::default() }
    }

    #[test]
    fn test_same_seed_same_values() {
        let a = Workload::new(&small_config()).unwrap();
        let b = Workload::new(&small_config()).unwrap();
        assert_eq!(a.my_vec.x, b.my_vec.x);
        assert_eq!(a.flat.x2, b.flat.x2);
        assert_eq!(a.my_vec2d.x, b.my_vec2d.x);
    }

    #[test]
    fn test_seeds_differ() {
        let w = Workload::new(&small_config()).unwrap();
        assert_ne!(w.my_vec.x, w.my_vec.x2);
        assert_ne!(w.my_vec.x[0], w.my_vec.x[1]);
    }

    #[test]
    fn test_representations_hold_same_vectors() {
        let w = Workload::new(&small_config()).unwrap();
        for i in 0..w.len {
            let expected = w.my_vec.x[i].to_array();
            assert_eq!(w.float4.x[i].to_array(), expected);
            assert_eq!(&w.wide.x[i].lanes()[..4], &expected);
            assert_eq!(w.na_vec4.x[i].as_slice(), &expected);
            assert_eq!(&w.flat.x[4 * i..4 * i + 4], &expected);
            assert_eq!(w.matrix.x.row(i).to_vec(), expected.to_vec());

            let expected2d = w.my_vec2d.x2[i].to_array();
            assert_eq!(w.na_vec2d.x2[i].as_slice(), &expected2d);
            assert_eq!(&w.wide2d.x2[i].lanes()[..2], &expected2d);
        }
    }

    #[test]
    fn test_draws_in_unit_range() {
        let w = Workload::new(&small_config()).unwrap();
        assert!(w.flat.x.iter().all(|&v| (0.0..1.0).contains(&v)));
        assert!(w.my_vec2d.x.iter().all(|v| (0.0..1.0).contains(&v.x)));
    }

    #[test]
    fn test_f32_draws_stay_below_one() {
        let mut rng = SampleRng::new(7);
        for _ in 0..100_000 {
            let v = rng.next_f32();
            assert!((0.0..1.0).contains(&v), "draw out of range: {}", v);
        }
    }

    #[test]
    fn test_output_buffers_start_zeroed() {
        let w = Workload::new(&small_config()).unwrap();
        assert_eq!(w.my_vec.y.len(), 64);
        assert_eq!(w.flat.y.len(), 256);
        assert_eq!(w.matrix.y.dim(), (64, 4));
        assert!(w.flat.y.iter().all(|&v| v == 0.0));
    }
}
