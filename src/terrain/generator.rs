use rand::Rng;
use serde::Deserialize;
use tracing::{info, warn};

use super::{
    carve_coastline, carve_river, classify, Climate, Features, MapMetadata, NoiseField,
    TerrainMap, Tile,
};
use crate::error::{WorldError, MAX_DIMENSION};

fn default_river_probability() -> f64 {
    0.6
}

fn default_coastline_probability() -> f64 {
    0.3
}

fn default_noise_scale() -> f64 {
    super::noise_field::DEFAULT_NOISE_SCALE
}

fn default_coastline_depth_ratio() -> f64 {
    0.3
}

fn default_coastline_depth_variance() -> u32 {
    2
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeneratorSettings {
    #[serde(default = "default_river_probability")]
    pub river_probability: f64,
    #[serde(default = "default_coastline_probability")]
    pub coastline_probability: f64,
    #[serde(default = "default_noise_scale")]
    pub noise_scale: f64,
    #[serde(default = "default_coastline_depth_ratio")]
    pub coastline_depth_ratio: f64,
    #[serde(default = "default_coastline_depth_variance")]
    pub coastline_depth_variance: u32,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            river_probability: default_river_probability(),
            coastline_probability: default_coastline_probability(),
            noise_scale: default_noise_scale(),
            coastline_depth_ratio: default_coastline_depth_ratio(),
            coastline_depth_variance: default_coastline_depth_variance(),
        }
    }
}

impl GeneratorSettings {
    /// Pulls probabilities and the depth ratio back into [0, 1] and caps
    /// the depth variance at the largest map side.
    pub fn sanitized(mut self) -> Self {
        for (name, value) in [
            ("river_probability", &mut self.river_probability),
            ("coastline_probability", &mut self.coastline_probability),
        ] {
            if !(0.0..=1.0).contains(&*value) {
                let clamped = if value.is_nan() { 0.0 } else { value.clamp(0.0, 1.0) };
                warn!(setting = name, value = *value, clamped, "probability out of range");
                *value = clamped;
            }
        }
        if !(0.0..=1.0).contains(&self.coastline_depth_ratio) {
            let clamped = if self.coastline_depth_ratio.is_nan() {
                0.0
            } else {
                self.coastline_depth_ratio.clamp(0.0, 1.0)
            };
            warn!(value = self.coastline_depth_ratio, clamped, "coastline depth ratio out of range");
            self.coastline_depth_ratio = clamped;
        }
        if self.coastline_depth_variance > MAX_DIMENSION {
            warn!(
                value = self.coastline_depth_variance,
                clamped = MAX_DIMENSION,
                "coastline depth variance out of range"
            );
            self.coastline_depth_variance = MAX_DIMENSION;
        }
        self
    }
}

/// Builds climate-differentiated tile maps. Each call is independent:
/// a climate is drawn, water features are rolled and carved, then every
/// cell is classified from a fresh noise field.
#[derive(Debug, Clone, Default)]
pub struct TerrainGenerator {
    settings: GeneratorSettings,
}

impl TerrainGenerator {
    pub fn new(settings: GeneratorSettings) -> Self {
        Self {
            settings: settings.sanitized(),
        }
    }

    pub fn settings(&self) -> &GeneratorSettings {
        &self.settings
    }

    pub fn generate<R: Rng + ?Sized>(
        &self,
        width: u32,
        height: u32,
        rng: &mut R,
    ) -> Result<TerrainMap, WorldError> {
        check_dimensions(width, height)?;
        let climate = Climate::ALL[rng.gen_range(0..Climate::ALL.len())];
        self.generate_with_climate(width, height, climate, rng)
    }

    /// Same as [`generate`](Self::generate) with the climate fixed.
    pub fn generate_with_climate<R: Rng + ?Sized>(
        &self,
        width: u32,
        height: u32,
        climate: Climate,
        rng: &mut R,
    ) -> Result<TerrainMap, WorldError> {
        check_dimensions(width, height)?;

        let has_river = rng.gen_bool(self.settings.river_probability);
        let has_coastline = rng.gen_bool(self.settings.coastline_probability);

        let mut features = Features::default();
        if has_river {
            features.river = Some(carve_river(width, height, rng));
        }
        if has_coastline {
            let (edge, coast) = carve_coastline(
                width,
                height,
                self.settings.coastline_depth_ratio,
                self.settings.coastline_depth_variance,
                rng,
            );
            tracing::debug!(?edge, cells = coast.len(), "carved coastline");
            features.coastline = Some(coast);
        }

        let noise = NoiseField::from_rng(rng, self.settings.noise_scale);
        let mut tiles = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height as i32 {
            for x in 0..width as i32 {
                let value = noise.sample(x as f64, y as f64);
                let kind = classify(value, climate, x, y, &features);
                tiles.push(Tile::from_noise(kind, value));
            }
        }

        info!(
            width,
            height,
            %climate,
            has_river,
            has_coastline,
            noise_seed = noise.seed(),
            "generated terrain"
        );

        Ok(TerrainMap::from_tiles(
            width,
            height,
            tiles,
            MapMetadata {
                climate,
                has_river,
                has_coastline,
            },
        ))
    }
}

fn check_dimensions(width: u32, height: u32) -> Result<(), WorldError> {
    if width == 0 || height == 0 || width > MAX_DIMENSION || height > MAX_DIMENSION {
        return Err(WorldError::InvalidDimensions { width, height });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terrain::TileType;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn rejects_degenerate_dimensions() {
        let generator = TerrainGenerator::default();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert_eq!(
            generator.generate(0, 10, &mut rng).unwrap_err(),
            WorldError::InvalidDimensions {
                width: 0,
                height: 10
            }
        );
        assert!(generator.generate(10, 0, &mut rng).is_err());
        assert!(generator.generate(MAX_DIMENSION + 1, 4, &mut rng).is_err());
    }

    #[test]
    fn produces_requested_shape() {
        let generator = TerrainGenerator::default();
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let map = generator.generate(13, 7, &mut rng).unwrap();
        assert_eq!(map.width(), 13);
        assert_eq!(map.height(), 7);
        assert_eq!(map.rows().count(), 7);
        assert!(map.rows().all(|row| row.len() == 13));
    }

    #[test]
    fn seeded_generation_is_reproducible() {
        let generator = TerrainGenerator::default();
        let a = generator
            .generate(20, 20, &mut ChaCha8Rng::seed_from_u64(77))
            .unwrap();
        let b = generator
            .generate(20, 20, &mut ChaCha8Rng::seed_from_u64(77))
            .unwrap();
        assert_eq!(a.metadata(), b.metadata());
        assert!(a.cells().zip(b.cells()).all(|(l, r)| l == r));
    }

    #[test]
    fn forced_features_always_leave_water() {
        let generator = TerrainGenerator::new(GeneratorSettings {
            river_probability: 1.0,
            coastline_probability: 1.0,
            ..GeneratorSettings::default()
        });
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let map = generator
            .generate_with_climate(16, 16, Climate::HighMountain, &mut rng)
            .unwrap();
        assert!(map.metadata().has_river);
        assert!(map.metadata().has_coastline);
        assert!(map.count(TileType::Water) > 0);
    }

    #[test]
    fn disabled_features_leave_no_water() {
        let generator = TerrainGenerator::new(GeneratorSettings {
            river_probability: 0.0,
            coastline_probability: 0.0,
            ..GeneratorSettings::default()
        });
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        for climate in Climate::ALL {
            let map = generator
                .generate_with_climate(12, 12, climate, &mut rng)
                .unwrap();
            assert_eq!(map.count(TileType::Water), 0);
            assert_eq!(map.metadata().climate, climate);
        }
    }

    #[test]
    fn out_of_range_probabilities_are_clamped() {
        let generator = TerrainGenerator::new(GeneratorSettings {
            river_probability: 3.0,
            coastline_probability: -1.0,
            ..GeneratorSettings::default()
        });
        assert_eq!(generator.settings().river_probability, 1.0);
        assert_eq!(generator.settings().coastline_probability, 0.0);
    }

    #[test]
    fn oversized_coastline_settings_are_clamped() {
        let generator = TerrainGenerator::new(GeneratorSettings {
            coastline_probability: 1.0,
            coastline_depth_ratio: 1.0e300,
            coastline_depth_variance: 3_000_000_000,
            ..GeneratorSettings::default()
        });
        assert_eq!(generator.settings().coastline_depth_ratio, 1.0);
        assert_eq!(generator.settings().coastline_depth_variance, MAX_DIMENSION);

        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let map = generator.generate(12, 9, &mut rng).unwrap();
        assert!(map.metadata().has_coastline);
        assert!(map.count(TileType::Water) > 0);

        let nan = TerrainGenerator::new(GeneratorSettings {
            coastline_depth_ratio: f64::NAN,
            ..GeneratorSettings::default()
        });
        assert_eq!(nan.settings().coastline_depth_ratio, 0.0);
    }
}
