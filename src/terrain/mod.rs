//! Terrain model - tile grid produced once per world and shared read-only

mod climate;
mod features;
mod generator;
mod noise_field;

use serde::{Deserialize, Serialize};

use crate::error::WorldError;

pub use climate::{classify, height_for, Climate, ClimateRule, Thresholds};
pub use features::{carve_coastline, carve_river, Edge, FeatureSet, Features};
pub use generator::{GeneratorSettings, TerrainGenerator};
pub use noise_field::NoiseField;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TileType {
    Water,
    Sand,
    Grass,
    Rock,
    Snow,
}

impl TileType {
    pub const ALL: [TileType; 5] = [
        TileType::Water,
        TileType::Sand,
        TileType::Grass,
        TileType::Rock,
        TileType::Snow,
    ];

    /// Whether agents may stand on or walk through this tile.
    pub fn is_passable(self) -> bool {
        matches!(self, TileType::Sand | TileType::Grass)
    }

    pub fn name(self) -> &'static str {
        match self {
            TileType::Water => "water",
            TileType::Sand => "sand",
            TileType::Grass => "grass",
            TileType::Rock => "rock",
            TileType::Snow => "snow",
        }
    }
}

/// One grid cell. Height is a discrete elevation level in 0..=2 and is
/// always consistent with the tile type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Tile {
    #[serde(rename = "type")]
    kind: TileType,
    height: u8,
}

impl Tile {
    pub fn new(kind: TileType, height: u8) -> Result<Self, WorldError> {
        let valid = match kind {
            TileType::Water | TileType::Sand | TileType::Grass => height == 0,
            TileType::Rock => height == 1 || height == 2,
            TileType::Snow => height == 2,
        };
        if valid {
            Ok(Self { kind, height })
        } else {
            Err(WorldError::InvalidTile { kind, height })
        }
    }

    /// Builds a tile whose height is derived from the noise sample.
    pub fn from_noise(kind: TileType, noise_value: f64) -> Self {
        Self {
            kind,
            height: height_for(kind, noise_value),
        }
    }

    pub fn kind(&self) -> TileType {
        self.kind
    }

    pub fn height(&self) -> u8 {
        self.height
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MapMetadata {
    pub climate: Climate,
    pub has_river: bool,
    pub has_coastline: bool,
}

/// Row-major grid of tiles, `height` rows of `width` columns.
#[derive(Debug, Clone)]
pub struct TerrainMap {
    width: u32,
    height: u32,
    tiles: Vec<Tile>,
    metadata: MapMetadata,
}

impl TerrainMap {
    pub(crate) fn from_tiles(width: u32, height: u32, tiles: Vec<Tile>, metadata: MapMetadata) -> Self {
        debug_assert_eq!(tiles.len(), width as usize * height as usize);
        Self {
            width,
            height,
            tiles,
            metadata,
        }
    }

    /// Builds a map from explicit rows, e.g. a hand-authored test level.
    pub fn from_rows(rows: Vec<Vec<Tile>>, metadata: MapMetadata) -> Result<Self, WorldError> {
        let height = rows.len();
        let width = rows.first().map(Vec::len).unwrap_or(0);
        if width == 0
            || height == 0
            || width > crate::error::MAX_DIMENSION as usize
            || height > crate::error::MAX_DIMENSION as usize
        {
            return Err(WorldError::InvalidDimensions {
                width: width as u32,
                height: height as u32,
            });
        }
        let mut tiles = Vec::with_capacity(width * height);
        for (row, cells) in rows.into_iter().enumerate() {
            if cells.len() != width {
                return Err(WorldError::RaggedRows {
                    row,
                    expected: width,
                    found: cells.len(),
                });
            }
            tiles.extend(cells);
        }
        Ok(Self::from_tiles(width as u32, height as u32, tiles, metadata))
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn metadata(&self) -> &MapMetadata {
        &self.metadata
    }

    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as u32) < self.width && (y as u32) < self.height
    }

    /// Tile at `(x, y)`, or `None` when the coordinate is off the map.
    pub fn tile(&self, x: i32, y: i32) -> Option<Tile> {
        if !self.in_bounds(x, y) {
            return None;
        }
        self.tiles
            .get(y as usize * self.width as usize + x as usize)
            .copied()
    }

    pub fn is_border(&self, x: i32, y: i32) -> bool {
        self.in_bounds(x, y)
            && (x == 0 || y == 0 || x as u32 == self.width - 1 || y as u32 == self.height - 1)
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Tile]> {
        self.tiles.chunks(self.width as usize)
    }

    /// Every cell with its coordinate, row by row.
    pub fn cells(&self) -> impl Iterator<Item = (i32, i32, Tile)> + '_ {
        let width = self.width as usize;
        self.tiles
            .iter()
            .enumerate()
            .map(move |(index, tile)| ((index % width) as i32, (index / width) as i32, *tile))
    }

    /// Coordinates of the outer ring, each cell once. Only the perimeter
    /// is walked.
    pub fn border_cells(&self) -> Vec<(i32, i32)> {
        let (w, h) = (self.width as i32, self.height as i32);
        let mut ring: Vec<(i32, i32)> = (0..w).map(|x| (x, 0)).collect();
        if h > 1 {
            ring.extend((0..w).map(|x| (x, h - 1)));
        }
        for y in 1..h - 1 {
            ring.push((0, y));
            if w > 1 {
                ring.push((w - 1, y));
            }
        }
        ring
    }

    pub fn count(&self, kind: TileType) -> usize {
        self.tiles.iter().filter(|tile| tile.kind == kind).count()
    }
}
