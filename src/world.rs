use serde::Serialize;

use crate::{
    agents::{AgentPopulationManager, AgentState, PopulationConfig, StateCounts, TickReport},
    error::WorldError,
    rng::{RngManager, AGENT_STREAM, TERRAIN_STREAM, TREE_STREAM},
    spatial::{Projection, Tent, TentManager, Tree, TreeManager},
    terrain::{Climate, GeneratorSettings, MapMetadata, TerrainGenerator, TerrainMap, Tile},
};

#[derive(Debug, Clone)]
pub struct WorldSettings {
    pub seed: u64,
    pub width: u32,
    pub height: u32,
    /// Forces a climate instead of drawing one.
    pub climate: Option<Climate>,
    pub terrain: GeneratorSettings,
    pub population: PopulationConfig,
    pub projection: Projection,
}

impl WorldSettings {
    pub fn new(seed: u64, width: u32, height: u32) -> Self {
        Self {
            seed,
            width,
            height,
            climate: None,
            terrain: GeneratorSettings::default(),
            population: PopulationConfig::default(),
            projection: Projection::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AgentSnapshot {
    pub id: u64,
    pub state: AgentState,
    pub cell_x: i32,
    pub cell_y: i32,
    pub x: f32,
    pub y: f32,
    pub moving: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct WorldSnapshot {
    pub scenario: String,
    pub frame: u64,
    pub time_ms: u64,
    pub metadata: MapMetadata,
    pub tree_count: usize,
    pub tent_count: usize,
    pub agent_count: usize,
    pub state_counts: StateCounts,
    pub agents: Vec<AgentSnapshot>,
    pub tents: Vec<Tent>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TerrainSnapshot<'a> {
    pub width: u32,
    pub height: u32,
    pub metadata: MapMetadata,
    pub tiles: Vec<&'a [Tile]>,
    pub trees: Vec<&'a Tree>,
}

/// One game session: the generated map plus everything living on it.
pub struct World {
    terrain: TerrainMap,
    trees: TreeManager,
    tents: TentManager,
    population: AgentPopulationManager,
    projection: Projection,
    rng: RngManager,
    now: u64,
}

impl World {
    /// Generates terrain and trees from `settings.seed`.
    pub fn generate(settings: &WorldSettings) -> Result<Self, WorldError> {
        let mut rng = RngManager::new(settings.seed);
        let generator = TerrainGenerator::new(settings.terrain.clone());
        let terrain = {
            let mut stream = rng.stream(TERRAIN_STREAM);
            match settings.climate {
                Some(climate) => generator.generate_with_climate(
                    settings.width,
                    settings.height,
                    climate,
                    &mut stream,
                )?,
                None => generator.generate(settings.width, settings.height, &mut stream)?,
            }
        };
        let mut trees = TreeManager::new();
        trees.generate_trees(&terrain, terrain.metadata().climate, &mut rng.stream(TREE_STREAM));

        Ok(Self {
            terrain,
            trees,
            tents: TentManager::new(),
            population: AgentPopulationManager::new(settings.population),
            projection: settings.projection,
            rng,
            now: 0,
        })
    }

    pub fn terrain(&self) -> &TerrainMap {
        &self.terrain
    }

    pub fn trees(&self) -> &TreeManager {
        &self.trees
    }

    pub fn tents(&self) -> &TentManager {
        &self.tents
    }

    pub fn population(&self) -> &AgentPopulationManager {
        &self.population
    }

    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    pub fn seed(&self) -> u64 {
        self.rng.seed()
    }

    pub fn now(&self) -> u64 {
        self.now
    }

    /// Advances the simulation to `now`. Timestamps going backwards are
    /// treated as no time passing.
    pub fn update(&mut self, now: u64) -> TickReport {
        self.now = self.now.max(now);
        let mut stream = self.rng.stream(AGENT_STREAM);
        self.population.update(
            self.now,
            &self.terrain,
            &self.trees,
            &mut self.tents,
            &mut stream,
        )
    }

    pub fn snapshot(&self, scenario: &str, frame: u64) -> WorldSnapshot {
        let agents = self
            .population
            .agents()
            .map(|agent| {
                let (cell_x, cell_y) = agent.cell();
                let (x, y) = agent.position(self.now);
                AgentSnapshot {
                    id: agent.id().raw(),
                    state: agent.state(),
                    cell_x,
                    cell_y,
                    x,
                    y,
                    moving: agent.is_moving(),
                }
            })
            .collect();
        WorldSnapshot {
            scenario: scenario.to_string(),
            frame,
            time_ms: self.now,
            metadata: *self.terrain.metadata(),
            tree_count: self.trees.tree_count(),
            tent_count: self.tents.tent_count(),
            agent_count: self.population.count(),
            state_counts: self.population.state_counts(),
            agents,
            tents: self.tents.all_tents().cloned().collect(),
        }
    }

    pub fn terrain_snapshot(&self) -> TerrainSnapshot<'_> {
        TerrainSnapshot {
            width: self.terrain.width(),
            height: self.terrain.height(),
            metadata: *self.terrain.metadata(),
            tiles: self.terrain.rows().collect(),
            trees: self.trees.all_trees().collect(),
        }
    }
}
