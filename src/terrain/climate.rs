//! Climate rulesets and per-tile classification

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{Features, TileType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Climate {
    Desert,
    Prairie,
    SparseForest,
    DenseForest,
    HighMountain,
}

/// Ascending noise cut-offs. Below `grass` the climate's primary tile is
/// used, below `rock` grass, below `snow` rock, anything above is snow.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    pub grass: f64,
    pub rock: f64,
    pub snow: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClimateRule {
    pub forbidden: &'static [TileType],
    pub primary: TileType,
    pub secondary: TileType,
    pub thresholds: Thresholds,
}

static DESERT: ClimateRule = ClimateRule {
    forbidden: &[TileType::Grass],
    primary: TileType::Sand,
    secondary: TileType::Rock,
    thresholds: Thresholds {
        grass: -0.6,
        rock: 0.3,
        snow: 0.8,
    },
};

static PRAIRIE: ClimateRule = ClimateRule {
    forbidden: &[TileType::Rock, TileType::Sand, TileType::Snow],
    primary: TileType::Grass,
    secondary: TileType::Grass,
    thresholds: Thresholds {
        grass: -1.0,
        rock: 1.0,
        snow: 1.0,
    },
};

static SPARSE_FOREST: ClimateRule = ClimateRule {
    forbidden: &[TileType::Sand],
    primary: TileType::Grass,
    secondary: TileType::Rock,
    thresholds: Thresholds {
        grass: -0.2,
        rock: 0.6,
        snow: 0.9,
    },
};

static DENSE_FOREST: ClimateRule = ClimateRule {
    forbidden: &[TileType::Sand],
    primary: TileType::Grass,
    secondary: TileType::Rock,
    thresholds: Thresholds {
        grass: 0.2,
        rock: 0.7,
        snow: 0.9,
    },
};

static HIGH_MOUNTAIN: ClimateRule = ClimateRule {
    forbidden: &[TileType::Sand],
    primary: TileType::Rock,
    secondary: TileType::Snow,
    thresholds: Thresholds {
        grass: -0.3,
        rock: 0.4,
        snow: 0.6,
    },
};

impl Climate {
    pub const ALL: [Climate; 5] = [
        Climate::Desert,
        Climate::Prairie,
        Climate::SparseForest,
        Climate::DenseForest,
        Climate::HighMountain,
    ];

    pub fn rule(self) -> &'static ClimateRule {
        match self {
            Climate::Desert => &DESERT,
            Climate::Prairie => &PRAIRIE,
            Climate::SparseForest => &SPARSE_FOREST,
            Climate::DenseForest => &DENSE_FOREST,
            Climate::HighMountain => &HIGH_MOUNTAIN,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Climate::Desert => "desert",
            Climate::Prairie => "prairie",
            Climate::SparseForest => "sparse_forest",
            Climate::DenseForest => "dense_forest",
            Climate::HighMountain => "high_mountain",
        }
    }

    pub fn from_name(name: &str) -> Option<Climate> {
        Climate::ALL.into_iter().find(|c| c.name() == name)
    }

    /// Climates where river banks turn to sand.
    fn sandy_riverbanks(self) -> bool {
        matches!(self, Climate::Desert | Climate::Prairie)
    }
}

impl fmt::Display for Climate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl ClimateRule {
    pub fn forbids(&self, kind: TileType) -> bool {
        self.forbidden.contains(&kind)
    }
}

/// Decides the tile type of cell `(x, y)`. Rules are checked in a fixed
/// order and the first match wins: river, coastline, coastal sand, river
/// sand (desert and prairie only), then the climate's noise bands with
/// forbidden tiles swapped for the primary or secondary tile.
pub fn classify(noise_value: f64, climate: Climate, x: i32, y: i32, features: &Features) -> TileType {
    if features.is_river(x, y) || features.is_coastline(x, y) {
        return TileType::Water;
    }
    if features.near_coastline(x, y, 1) {
        return TileType::Sand;
    }
    if climate.sandy_riverbanks() && features.near_river(x, y, 1) {
        return TileType::Sand;
    }

    let rule = climate.rule();
    let banded = if noise_value < rule.thresholds.grass {
        rule.primary
    } else if noise_value < rule.thresholds.rock {
        TileType::Grass
    } else if noise_value < rule.thresholds.snow {
        TileType::Rock
    } else {
        TileType::Snow
    };

    if !rule.forbids(banded) {
        banded
    } else if noise_value > 0.0 {
        rule.secondary
    } else {
        rule.primary
    }
}

/// Elevation level for a classified tile. Inside the rock band the noise
/// value doubles as a second elevation signal.
pub fn height_for(kind: TileType, noise_value: f64) -> u8 {
    match kind {
        TileType::Water | TileType::Sand | TileType::Grass => 0,
        TileType::Rock if noise_value <= 0.5 => 1,
        TileType::Rock | TileType::Snow => 2,
    }
}
