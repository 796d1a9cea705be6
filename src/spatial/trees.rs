use rand::Rng;
use serde::Serialize;
use tracing::info;

use super::{ObjectId, ObjectRegistry, Projection, WorldObject};
use crate::terrain::{Climate, TerrainMap, TileType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TreeKind {
    Conifer,
    Broadleaf,
    Shrub,
}

pub type Tree = WorldObject<TreeKind>;

/// Per-climate tree density.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TreeParams {
    pub spawn_probability: f64,
    pub max_per_tile: u32,
    /// Scales the random sub-tile offset; smaller values cluster trees.
    pub spacing: f32,
}

impl TreeParams {
    pub const DEFAULT: TreeParams = TreeParams {
        spawn_probability: 0.2,
        max_per_tile: 2,
        spacing: 0.5,
    };

    pub fn for_climate(climate: Climate) -> TreeParams {
        match climate {
            Climate::Desert => TreeParams {
                spawn_probability: 0.02,
                max_per_tile: 1,
                spacing: 0.8,
            },
            Climate::Prairie => TreeParams {
                spawn_probability: 0.15,
                max_per_tile: 2,
                spacing: 0.6,
            },
            Climate::SparseForest => TreeParams {
                spawn_probability: 0.35,
                max_per_tile: 3,
                spacing: 0.4,
            },
            Climate::DenseForest => TreeParams {
                spawn_probability: 0.65,
                max_per_tile: 5,
                spacing: 0.2,
            },
            Climate::HighMountain => TreeParams {
                spawn_probability: 0.08,
                max_per_tile: 1,
                spacing: 0.7,
            },
        }
    }

    /// Looks a climate up by name; unknown names get [`TreeParams::DEFAULT`].
    pub fn by_name(name: &str) -> TreeParams {
        Climate::from_name(name)
            .map(TreeParams::for_climate)
            .unwrap_or(TreeParams::DEFAULT)
    }
}

fn pick_kind<R: Rng + ?Sized>(climate: Climate, rng: &mut R) -> TreeKind {
    match climate {
        Climate::Desert => TreeKind::Shrub,
        Climate::HighMountain => TreeKind::Conifer,
        Climate::Prairie => TreeKind::Broadleaf,
        Climate::SparseForest | Climate::DenseForest => {
            if rng.gen_bool(0.5) {
                TreeKind::Conifer
            } else {
                TreeKind::Broadleaf
            }
        }
    }
}

#[derive(Debug, Default)]
pub struct TreeManager {
    registry: ObjectRegistry<TreeKind>,
}

impl TreeManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces all trees with a fresh climate-driven population. Only grass
    /// accepts trees. Returns the number planted.
    pub fn generate_trees<R: Rng + ?Sized>(
        &mut self,
        terrain: &TerrainMap,
        climate: Climate,
        rng: &mut R,
    ) -> usize {
        self.clear();
        let params = TreeParams::for_climate(climate);
        for (x, y, tile) in terrain.cells() {
            if tile.kind() != TileType::Grass || !rng.gen_bool(params.spawn_probability) {
                continue;
            }
            let count = rng.gen_range(1..=params.max_per_tile.max(1));
            for _ in 0..count {
                let offset = (
                    rng.gen_range(-0.5f32..0.5) * params.spacing,
                    rng.gen_range(-0.5f32..0.5) * params.spacing,
                );
                let kind = pick_kind(climate, rng);
                self.registry.create(terrain, x, y, offset, kind);
            }
        }
        info!(%climate, trees = self.registry.len(), "planted trees");
        self.registry.len()
    }

    /// Plants a single tree; grass only.
    pub fn create_tree(
        &mut self,
        terrain: &TerrainMap,
        map_x: i32,
        map_y: i32,
        offset: (f32, f32),
        kind: TreeKind,
    ) -> Option<&Tree> {
        let tile = terrain.tile(map_x, map_y)?;
        if tile.kind() != TileType::Grass {
            return None;
        }
        self.registry.create(terrain, map_x, map_y, offset, kind)
    }

    pub fn get_tree_at(&self, map_x: i32, map_y: i32) -> Option<&Tree> {
        self.registry.get_at(map_x, map_y)
    }

    pub fn get_trees_at(&self, map_x: i32, map_y: i32) -> Vec<&Tree> {
        self.registry.get_all_at(map_x, map_y)
    }

    pub fn get_trees_in_radius(
        &self,
        projection: &Projection,
        map_x: i32,
        map_y: i32,
        radius: f32,
    ) -> Vec<&Tree> {
        self.registry.get_in_radius(projection, map_x, map_y, radius)
    }

    /// Any tree on the cell or its 8 neighbours.
    pub fn has_tree_near(&self, map_x: i32, map_y: i32) -> bool {
        self.registry.any_near_cell(map_x, map_y, 1)
    }

    pub fn remove_tree(&mut self, id: ObjectId) -> bool {
        self.registry.remove(id)
    }

    pub fn remove_trees_in_radius(
        &mut self,
        projection: &Projection,
        map_x: i32,
        map_y: i32,
        radius: f32,
    ) -> usize {
        self.registry
            .remove_in_radius(projection, map_x, map_y, radius)
    }

    pub fn clear(&mut self) {
        self.registry.clear();
    }

    pub fn tree_count(&self) -> usize {
        self.registry.len()
    }

    pub fn all_trees(&self) -> impl Iterator<Item = &Tree> {
        self.registry.iter()
    }
}
