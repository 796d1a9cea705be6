use serde::Serialize;

use super::{ObjectId, ObjectRegistry, Projection, WorldObject};
use crate::agents::AgentId;
use crate::terrain::TerrainMap;

/// A tent remembers which agent pitched it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TentOwner {
    pub agent: AgentId,
}

pub type Tent = WorldObject<TentOwner>;

#[derive(Debug, Default)]
pub struct TentManager {
    registry: ObjectRegistry<TentOwner>,
}

impl TentManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pitches a tent centred on the cell. Fails only when the cell is off
    /// the map.
    pub fn create_tent(
        &mut self,
        terrain: &TerrainMap,
        map_x: i32,
        map_y: i32,
        agent: AgentId,
    ) -> Option<&Tent> {
        self.registry
            .create(terrain, map_x, map_y, (0.0, 0.0), TentOwner { agent })
    }

    pub fn get_tent_at(&self, map_x: i32, map_y: i32) -> Option<&Tent> {
        self.registry.get_at(map_x, map_y)
    }

    pub fn get_tents_in_radius(
        &self,
        projection: &Projection,
        map_x: i32,
        map_y: i32,
        radius: f32,
    ) -> Vec<&Tent> {
        self.registry.get_in_radius(projection, map_x, map_y, radius)
    }

    pub fn tent_of(&self, agent: AgentId) -> Option<&Tent> {
        self.registry.iter().find(|tent| tent.kind.agent == agent)
    }

    pub fn remove_tent(&mut self, id: ObjectId) -> bool {
        self.registry.remove(id)
    }

    pub fn remove_tents_in_radius(
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

    pub fn tent_count(&self) -> usize {
        self.registry.len()
    }

    pub fn all_tents(&self) -> impl Iterator<Item = &Tent> {
        self.registry.iter()
    }
}
