//! Spatial model - point objects bound to map cells

mod projection;
mod tents;
mod trees;

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::terrain::TerrainMap;

pub use projection::Projection;
pub use tents::{Tent, TentManager, TentOwner};
pub use trees::{Tree, TreeKind, TreeManager, TreeParams};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct ObjectId(u64);

impl ObjectId {
    pub fn raw(self) -> u64 {
        self.0
    }
}

/// A tree, tent or similar point entity. Offsets are fractions of a tile
/// applied in map space before projection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorldObject<K> {
    pub id: ObjectId,
    pub map_x: i32,
    pub map_y: i32,
    pub offset_x: f32,
    pub offset_y: f32,
    pub kind: K,
}

/// Owns a set of world objects with a per-cell index. Ids are never reused.
#[derive(Debug, Clone)]
pub struct ObjectRegistry<K> {
    next_id: u64,
    objects: BTreeMap<ObjectId, WorldObject<K>>,
    by_cell: HashMap<(i32, i32), Vec<ObjectId>>,
}

impl<K> Default for ObjectRegistry<K> {
    fn default() -> Self {
        Self {
            next_id: 0,
            objects: BTreeMap::new(),
            by_cell: HashMap::new(),
        }
    }
}

impl<K> ObjectRegistry<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Places an object on `(map_x, map_y)`. Returns `None` when the cell is
    /// off the map or has no tile.
    pub fn create(
        &mut self,
        terrain: &TerrainMap,
        map_x: i32,
        map_y: i32,
        offset: (f32, f32),
        kind: K,
    ) -> Option<&WorldObject<K>> {
        terrain.tile(map_x, map_y)?;
        let id = ObjectId(self.next_id);
        self.next_id += 1;
        self.by_cell.entry((map_x, map_y)).or_default().push(id);
        let object = WorldObject {
            id,
            map_x,
            map_y,
            offset_x: offset.0,
            offset_y: offset.1,
            kind,
        };
        Some(self.objects.entry(id).or_insert(object))
    }

    pub fn get(&self, id: ObjectId) -> Option<&WorldObject<K>> {
        self.objects.get(&id)
    }

    /// First object placed on the cell, if any.
    pub fn get_at(&self, map_x: i32, map_y: i32) -> Option<&WorldObject<K>> {
        self.by_cell
            .get(&(map_x, map_y))
            .and_then(|ids| ids.first())
            .and_then(|id| self.objects.get(id))
    }

    pub fn get_all_at(&self, map_x: i32, map_y: i32) -> Vec<&WorldObject<K>> {
        self.by_cell
            .get(&(map_x, map_y))
            .map(|ids| ids.iter().filter_map(|id| self.objects.get(id)).collect())
            .unwrap_or_default()
    }

    /// Objects whose projected position lies within `radius` tiles of the
    /// projected centre of `(map_x, map_y)`, measured on screen as
    /// `radius * tile_width / 2`.
    pub fn get_in_radius(
        &self,
        projection: &Projection,
        map_x: i32,
        map_y: i32,
        radius: f32,
    ) -> Vec<&WorldObject<K>> {
        let limit = projection.radius_px(radius);
        let centre = projection.to_screen(map_x as f32, map_y as f32);
        self.objects
            .values()
            .filter(|object| {
                let at = projection.to_screen(
                    object.map_x as f32 + object.offset_x,
                    object.map_y as f32 + object.offset_y,
                );
                let (dx, dy) = (at.0 - centre.0, at.1 - centre.1);
                (dx * dx + dy * dy).sqrt() <= limit
            })
            .collect()
    }

    /// True when any object sits on a cell within Chebyshev `distance` of
    /// `(map_x, map_y)`.
    pub fn any_near_cell(&self, map_x: i32, map_y: i32, distance: i32) -> bool {
        (-distance..=distance).any(|dy| {
            (-distance..=distance).any(|dx| {
                self.by_cell
                    .get(&(map_x + dx, map_y + dy))
                    .is_some_and(|ids| !ids.is_empty())
            })
        })
    }

    pub fn remove(&mut self, id: ObjectId) -> bool {
        let Some(object) = self.objects.remove(&id) else {
            return false;
        };
        let cell = (object.map_x, object.map_y);
        if let Some(ids) = self.by_cell.get_mut(&cell) {
            ids.retain(|other| *other != id);
            if ids.is_empty() {
                self.by_cell.remove(&cell);
            }
        }
        true
    }

    pub fn remove_in_radius(
        &mut self,
        projection: &Projection,
        map_x: i32,
        map_y: i32,
        radius: f32,
    ) -> usize {
        let doomed: Vec<ObjectId> = self
            .get_in_radius(projection, map_x, map_y, radius)
            .into_iter()
            .map(|object| object.id)
            .collect();
        doomed.into_iter().filter(|id| self.remove(*id)).count()
    }

    pub fn clear(&mut self) {
        self.objects.clear();
        self.by_cell.clear();
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// All objects in creation order.
    pub fn iter(&self) -> impl Iterator<Item = &WorldObject<K>> {
        self.objects.values()
    }
}
