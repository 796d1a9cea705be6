//! NPC agents - wander the map until they find a spot next to a tree

mod population;

use std::fmt;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::spatial::TreeManager;
use crate::terrain::TerrainMap;

pub use population::{AgentPopulationManager, PopulationConfig, StateCounts, TickReport};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct AgentId(u64);

impl AgentId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "npc-{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentState {
    Searching,
    /// Terminal: the agent has pitched its tent and no longer moves.
    PlaceFound,
}

fn default_state_check_interval() -> u64 {
    1000
}

fn default_move_interval() -> u64 {
    2000
}

fn default_move_duration() -> u64 {
    2000
}

/// Agent timings, all in milliseconds of simulation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct AgentConfig {
    #[serde(default = "default_state_check_interval", rename = "state_check_interval_ms")]
    pub state_check_interval: u64,
    #[serde(default = "default_move_interval", rename = "move_interval_ms")]
    pub move_interval: u64,
    #[serde(default = "default_move_duration", rename = "move_duration_ms")]
    pub move_duration: u64,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            state_check_interval: default_state_check_interval(),
            move_interval: default_move_interval(),
            move_duration: default_move_duration(),
        }
    }
}

/// A move in flight between two adjacent cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Movement {
    pub from: (i32, i32),
    pub to: (i32, i32),
    pub started_at: u64,
    pub duration: u64,
}

impl Movement {
    /// Fraction of the move completed at `now`, in [0, 1].
    pub fn progress(&self, now: u64) -> f32 {
        if self.duration == 0 {
            return 1.0;
        }
        let elapsed = now.saturating_sub(self.started_at);
        (elapsed as f64 / self.duration as f64).min(1.0) as f32
    }

    pub fn is_complete(&self, now: u64) -> bool {
        now >= self.started_at.saturating_add(self.duration)
    }

    pub fn position(&self, now: u64) -> (f32, f32) {
        let t = self.progress(now);
        let lerp = |a: i32, b: i32| a as f32 + (b - a) as f32 * t;
        (lerp(self.from.0, self.to.0), lerp(self.from.1, self.to.1))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentEvent {
    Settled { agent: AgentId, x: i32, y: i32 },
}

const DIRECTIONS: [(i32, i32); 4] = [(0, -1), (1, 0), (0, 1), (-1, 0)];

/// Whether an agent may stand on `(x, y)`: on the map and on sand or grass,
/// whatever the tile's height.
pub fn is_valid_position(terrain: &TerrainMap, x: i32, y: i32) -> bool {
    terrain
        .tile(x, y)
        .is_some_and(|tile| tile.kind().is_passable())
}

/// Settlement test: a sand or grass cell with a tree on it or on one of
/// its 8 neighbours.
pub fn is_nice_place(terrain: &TerrainMap, trees: &TreeManager, x: i32, y: i32) -> bool {
    is_valid_position(terrain, x, y) && trees.has_tree_near(x, y)
}

/// Agents enter the world on the outer ring only.
pub fn is_valid_spawn(terrain: &TerrainMap, x: i32, y: i32) -> bool {
    terrain.is_border(x, y) && is_valid_position(terrain, x, y)
}

#[derive(Debug, Clone)]
pub struct Agent {
    id: AgentId,
    map_x: i32,
    map_y: i32,
    state: AgentState,
    config: AgentConfig,
    last_state_check: u64,
    last_move: u64,
    movement: Option<Movement>,
}

impl Agent {
    /// Places an agent without checking the cell; see [`Agent::spawn`].
    pub fn new(id: AgentId, map_x: i32, map_y: i32, now: u64, config: AgentConfig) -> Self {
        Self {
            id,
            map_x,
            map_y,
            state: AgentState::Searching,
            config,
            last_state_check: now,
            last_move: now,
            movement: None,
        }
    }

    /// Creates an agent on a passable border cell, or `None`.
    pub fn spawn(
        id: AgentId,
        terrain: &TerrainMap,
        map_x: i32,
        map_y: i32,
        now: u64,
        config: AgentConfig,
    ) -> Option<Self> {
        is_valid_spawn(terrain, map_x, map_y).then(|| Self::new(id, map_x, map_y, now, config))
    }

    pub fn id(&self) -> AgentId {
        self.id
    }

    pub fn state(&self) -> AgentState {
        self.state
    }

    /// Authoritative cell; changes only once a move has finished.
    pub fn cell(&self) -> (i32, i32) {
        (self.map_x, self.map_y)
    }

    pub fn movement(&self) -> Option<&Movement> {
        self.movement.as_ref()
    }

    pub fn is_moving(&self) -> bool {
        self.movement.is_some()
    }

    /// Map-space position, interpolated while a move is in flight.
    pub fn position(&self, now: u64) -> (f32, f32) {
        match &self.movement {
            Some(movement) => movement.position(now),
            None => (self.map_x as f32, self.map_y as f32),
        }
    }

    /// Advances the agent to `now`. A move in flight runs to completion
    /// before anything else happens; then the settlement check and the
    /// next move run on their own intervals.
    pub fn update<R: Rng + ?Sized>(
        &mut self,
        now: u64,
        terrain: &TerrainMap,
        trees: &TreeManager,
        rng: &mut R,
    ) -> Option<AgentEvent> {
        match self.state {
            AgentState::PlaceFound => return None,
            AgentState::Searching => {}
        }

        if let Some(movement) = self.movement {
            if !movement.is_complete(now) {
                return None;
            }
            (self.map_x, self.map_y) = movement.to;
            self.movement = None;
        }

        if now.saturating_sub(self.last_state_check) >= self.config.state_check_interval {
            self.last_state_check = now;
            if is_nice_place(terrain, trees, self.map_x, self.map_y) {
                self.state = AgentState::PlaceFound;
                info!(agent = %self.id, x = self.map_x, y = self.map_y, "agent settled");
                return Some(AgentEvent::Settled {
                    agent: self.id,
                    x: self.map_x,
                    y: self.map_y,
                });
            }
        }

        if now.saturating_sub(self.last_move) >= self.config.move_interval {
            self.last_move = now;
            self.try_move(now, terrain, rng);
        }
        None
    }

    /// Starts a move to a random passable N/E/S/W neighbour. Does nothing
    /// and returns `None` when boxed in or already moving.
    pub fn try_move<R: Rng + ?Sized>(
        &mut self,
        now: u64,
        terrain: &TerrainMap,
        rng: &mut R,
    ) -> Option<(i32, i32)> {
        if self.movement.is_some() || self.state == AgentState::PlaceFound {
            return None;
        }
        let options: Vec<(i32, i32)> = DIRECTIONS
            .iter()
            .map(|(dx, dy)| (self.map_x + dx, self.map_y + dy))
            .filter(|(x, y)| is_valid_position(terrain, *x, *y))
            .collect();
        let target = *options.choose(rng)?;
        debug!(agent = %self.id, from = ?self.cell(), to = ?target, "agent moving");
        self.movement = Some(Movement {
            from: self.cell(),
            to: target,
            started_at: now,
            duration: self.config.move_duration,
        });
        Some(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spatial::TreeKind;
    use crate::terrain::{Climate, MapMetadata, Tile, TileType};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn map_from(kinds: &[&[TileType]]) -> TerrainMap {
        let rows: Vec<Vec<Tile>> = kinds
            .iter()
            .map(|row| {
                row.iter()
                    .map(|kind| {
                        let height = match kind {
                            TileType::Rock => 1,
                            TileType::Snow => 2,
                            _ => 0,
                        };
                        Tile::new(*kind, height).unwrap()
                    })
                    .collect()
            })
            .collect();
        TerrainMap::from_rows(
            rows,
            MapMetadata {
                climate: Climate::SparseForest,
                has_river: false,
                has_coastline: false,
            },
        )
        .unwrap()
    }

    fn open_field(size: usize) -> TerrainMap {
        let row = vec![TileType::Grass; size];
        let rows: Vec<&[TileType]> = (0..size).map(|_| row.as_slice()).collect();
        map_from(&rows)
    }

    #[test]
    fn legality_by_tile_type() {
        use TileType::*;
        let map = map_from(&[&[Grass, Sand, Water], &[Rock, Snow, Grass]]);
        assert!(is_valid_position(&map, 0, 0));
        assert!(is_valid_position(&map, 1, 0));
        assert!(!is_valid_position(&map, 2, 0));
        assert!(!is_valid_position(&map, 0, 1));
        assert!(!is_valid_position(&map, 1, 1));
        assert!(!is_valid_position(&map, -1, 0));
        assert!(!is_valid_position(&map, 0, 2));
    }

    #[test]
    fn boxed_in_agent_stays_put() {
        use TileType::*;
        let map = map_from(&[&[Grass, Rock], &[Water, Snow]]);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut agent = Agent::new(AgentId::new(0), 0, 0, 0, AgentConfig::default());

        assert_eq!(agent.try_move(0, &map, &mut rng), None);
        assert!(!agent.is_moving());

        let trees = TreeManager::new();
        for now in (0..20_000).step_by(500) {
            agent.update(now, &map, &trees, &mut rng);
        }
        assert_eq!(agent.cell(), (0, 0));
        assert_eq!(agent.state(), AgentState::Searching);
    }

    #[test]
    fn settles_next_to_a_tree_on_the_next_check() {
        let map = open_field(5);
        let mut trees = TreeManager::new();
        trees.create_tree(&map, 3, 2, (0.0, 0.0), TreeKind::Broadleaf);
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let mut agent = Agent::new(AgentId::new(4), 2, 2, 0, AgentConfig::default());

        assert_eq!(agent.update(500, &map, &trees, &mut rng), None);
        assert_eq!(agent.state(), AgentState::Searching);
        assert_eq!(
            agent.update(1000, &map, &trees, &mut rng),
            Some(AgentEvent::Settled {
                agent: AgentId::new(4),
                x: 2,
                y: 2
            })
        );
        assert_eq!(agent.state(), AgentState::PlaceFound);

        // terminal: no further events or moves
        assert_eq!(agent.update(10_000, &map, &trees, &mut rng), None);
        assert_eq!(agent.try_move(10_000, &map, &mut rng), None);
        assert_eq!(agent.cell(), (2, 2));
    }

    #[test]
    fn never_settles_without_trees() {
        let map = open_field(6);
        let trees = TreeManager::new();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut agent = Agent::new(AgentId::new(0), 0, 0, 0, AgentConfig::default());
        for now in (0..60_000).step_by(100) {
            assert!(agent.update(now, &map, &trees, &mut rng).is_none());
            let (x, y) = agent.cell();
            assert!(is_valid_position(&map, x, y));
        }
        assert_eq!(agent.state(), AgentState::Searching);
    }

    #[test]
    fn moves_are_timed_and_committed_on_completion() {
        let map = open_field(3);
        let trees = TreeManager::new();
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let mut agent = Agent::new(AgentId::new(0), 1, 1, 0, AgentConfig::default());

        assert!(agent.update(1999, &map, &trees, &mut rng).is_none());
        assert!(!agent.is_moving());
        agent.update(2000, &map, &trees, &mut rng);
        let movement = *agent.movement().expect("move should start");
        assert_eq!(movement.from, (1, 1));
        let (dx, dy) = (movement.to.0 - 1, movement.to.1 - 1);
        assert_eq!(dx.abs() + dy.abs(), 1);

        // halfway: position interpolated, cell unchanged
        agent.update(3000, &map, &trees, &mut rng);
        let (px, py) = agent.position(3000);
        assert_eq!(agent.cell(), (1, 1));
        assert!((px - (1.0 + dx as f32 * 0.5)).abs() < 1e-6);
        assert!((py - (1.0 + dy as f32 * 0.5)).abs() < 1e-6);

        agent.update(4000, &map, &trees, &mut rng);
        assert_eq!(agent.cell(), movement.to);
    }

    #[test]
    fn spawn_requires_passable_border_cell() {
        use TileType::*;
        let map = map_from(&[
            &[Water, Grass, Sand],
            &[Grass, Grass, Rock],
            &[Snow, Sand, Grass],
        ]);
        let config = AgentConfig::default();
        assert!(Agent::spawn(AgentId::new(0), &map, 0, 0, 0, config).is_none());
        assert!(Agent::spawn(AgentId::new(0), &map, 1, 1, 0, config).is_none());
        assert!(Agent::spawn(AgentId::new(0), &map, 2, 1, 0, config).is_none());
        assert!(Agent::spawn(AgentId::new(0), &map, 1, 0, 0, config).is_some());
        assert!(Agent::spawn(AgentId::new(0), &map, 1, 2, 0, config).is_some());
    }

    #[test]
    fn movement_progress_clamps() {
        let m = Movement {
            from: (0, 0),
            to: (1, 0),
            started_at: 100,
            duration: 200,
        };
        assert_eq!(m.progress(50), 0.0);
        assert_eq!(m.progress(200), 0.5);
        assert_eq!(m.progress(900), 1.0);
        assert!(!m.is_complete(299));
        assert!(m.is_complete(300));
    }
}
