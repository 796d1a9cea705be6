use noise::{NoiseFn, Perlin};
use rand::Rng;

/// Default spatial frequency applied to tile coordinates before sampling.
pub const DEFAULT_NOISE_SCALE: f64 = 0.1;

/// Seeded 2D coherent noise over tile coordinates, values in [-1, 1].
pub struct NoiseField {
    perlin: Perlin,
    scale: f64,
    seed: u32,
}

impl NoiseField {
    pub fn new(seed: u32, scale: f64) -> Self {
        Self {
            perlin: Perlin::new(seed),
            scale,
            seed,
        }
    }

    /// Fresh field seeded from `rng`; one is drawn per generated map.
    pub fn from_rng<R: Rng + ?Sized>(rng: &mut R, scale: f64) -> Self {
        Self::new(rng.gen(), scale)
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn sample(&self, x: f64, y: f64) -> f64 {
        self.perlin
            .get([x * self.scale, y * self.scale])
            .clamp(-1.0, 1.0)
    }
}
