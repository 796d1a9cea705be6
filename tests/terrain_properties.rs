use std::collections::HashMap;

use isoworld::terrain::{Climate, GeneratorSettings, TerrainGenerator, TerrainMap, TileType};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn generate(seed: u64, width: u32, height: u32) -> TerrainMap {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    TerrainGenerator::default()
        .generate(width, height, &mut rng)
        .unwrap()
}

fn water_adjacent(map: &TerrainMap, x: i32, y: i32) -> bool {
    (-1..=1).any(|dy| {
        (-1..=1).any(|dx| {
            (dx, dy) != (0, 0)
                && map
                    .tile(x + dx, y + dy)
                    .is_some_and(|tile| tile.kind() == TileType::Water)
        })
    })
}

#[test]
fn maps_have_requested_shape_and_consistent_heights() {
    for seed in 0..20 {
        let map = generate(seed, 17, 9);
        assert_eq!(map.width(), 17);
        assert_eq!(map.height(), 9);
        assert_eq!(map.cells().count(), 17 * 9);
        assert_eq!(map.rows().count(), 9);
        for (_, _, tile) in map.cells() {
            match tile.kind() {
                TileType::Water | TileType::Sand | TileType::Grass => assert_eq!(tile.height(), 0),
                TileType::Rock => assert!(matches!(tile.height(), 1 | 2)),
                TileType::Snow => assert_eq!(tile.height(), 2),
            }
        }
    }
}

#[test]
fn feature_and_climate_frequencies_are_calibrated() {
    const SAMPLES: u64 = 200;
    let mut rivers = 0;
    let mut coastlines = 0;
    let mut climates: HashMap<Climate, u64> = HashMap::new();
    for seed in 0..SAMPLES {
        let map = generate(seed, 8, 8);
        let metadata = map.metadata();
        rivers += u64::from(metadata.has_river);
        coastlines += u64::from(metadata.has_coastline);
        *climates.entry(metadata.climate).or_default() += 1;
    }

    let river_rate = rivers as f64 / SAMPLES as f64;
    let coast_rate = coastlines as f64 / SAMPLES as f64;
    assert!((0.45..=0.75).contains(&river_rate), "river rate {river_rate}");
    assert!((0.15..=0.45).contains(&coast_rate), "coastline rate {coast_rate}");

    let uniform = SAMPLES as f64 / Climate::ALL.len() as f64;
    for climate in Climate::ALL {
        let seen = climates.get(&climate).copied().unwrap_or(0);
        assert!(seen > 0, "{climate} never generated");
        assert!((seen as f64) <= uniform * 1.6, "{climate} seen {seen} times");
    }
}

#[test]
fn desert_never_grows_grass() {
    let generator = TerrainGenerator::default();
    for seed in 0..50 {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let map = generator
            .generate_with_climate(10, 10, Climate::Desert, &mut rng)
            .unwrap();
        assert_eq!(map.count(TileType::Grass), 0, "seed {seed}");
    }
}

#[test]
fn desert_drawn_at_random_has_no_grass() {
    let generator = TerrainGenerator::default();
    let mut rng = ChaCha8Rng::seed_from_u64(2024);
    let deserts: Vec<TerrainMap> = (0..50)
        .map(|_| generator.generate(10, 10, &mut rng).unwrap())
        .filter(|map| map.metadata().climate == Climate::Desert)
        .collect();
    assert!(!deserts.is_empty());
    for map in &deserts {
        assert_eq!(map.count(TileType::Grass), 0);
    }
}

#[test]
fn prairie_non_grass_hugs_water() {
    let generator = TerrainGenerator::default();
    for seed in 0..50 {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let map = generator
            .generate_with_climate(20, 14, Climate::Prairie, &mut rng)
            .unwrap();
        for (x, y, tile) in map.cells() {
            if matches!(tile.kind(), TileType::Rock | TileType::Sand | TileType::Snow) {
                assert!(water_adjacent(&map, x, y), "seed {seed}: ({x}, {y})");
            }
        }
    }
}

#[test]
fn water_features_leave_water_behind() {
    for seed in 0..100 {
        let map = generate(seed, 12, 12);
        let metadata = map.metadata();
        if metadata.has_river || metadata.has_coastline {
            assert!(map.count(TileType::Water) > 0, "seed {seed}");
        }
    }
}

#[test]
fn without_features_there_is_no_water() {
    let generator = TerrainGenerator::new(GeneratorSettings {
        river_probability: 0.0,
        coastline_probability: 0.0,
        ..GeneratorSettings::default()
    });
    for seed in 0..20 {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let map = generator.generate(15, 15, &mut rng).unwrap();
        assert_eq!(map.count(TileType::Water), 0);
    }
}

#[test]
fn single_cell_and_thin_maps_generate() {
    let generator = TerrainGenerator::new(GeneratorSettings {
        river_probability: 1.0,
        coastline_probability: 1.0,
        ..GeneratorSettings::default()
    });
    let mut rng = ChaCha8Rng::seed_from_u64(11);
    for (w, h) in [(1, 1), (1, 30), (30, 1), (2, 2)] {
        let map = generator.generate(w, h, &mut rng).unwrap();
        assert_eq!(map.cells().count(), (w * h) as usize);
        assert!(map.count(TileType::Water) > 0);
    }
}
