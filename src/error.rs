use thiserror::Error;

use crate::terrain::TileType;

/// Largest accepted map side, in tiles.
pub const MAX_DIMENSION: u32 = 4096;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WorldError {
    #[error("invalid map dimensions {width}x{height} (each side must be in 1..={max})", max = MAX_DIMENSION)]
    InvalidDimensions { width: u32, height: u32 },

    #[error("tile {kind:?} cannot sit at height {height}")]
    InvalidTile { kind: TileType, height: u8 },

    #[error("row {row} has {found} tiles, expected {expected}")]
    RaggedRows {
        row: usize,
        expected: usize,
        found: usize,
    },
}
