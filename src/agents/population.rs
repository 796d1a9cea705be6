use std::collections::BTreeMap;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{is_valid_spawn, Agent, AgentConfig, AgentEvent, AgentId, AgentState};
use crate::spatial::{TentManager, TreeManager};
use crate::terrain::TerrainMap;

fn default_max_agents() -> usize {
    10
}

fn default_spawn_interval() -> u64 {
    3000
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct PopulationConfig {
    #[serde(default = "default_max_agents")]
    pub max_agents: usize,
    #[serde(default = "default_spawn_interval", rename = "spawn_interval_ms")]
    pub spawn_interval: u64,
    #[serde(flatten)]
    pub agent: AgentConfig,
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self {
            max_agents: default_max_agents(),
            spawn_interval: default_spawn_interval(),
            agent: AgentConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StateCounts {
    pub searching: usize,
    pub place_found: usize,
}

/// What happened during one population tick.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickReport {
    pub spawned: Option<AgentId>,
    pub settled: Vec<AgentId>,
}

/// Spawns agents on the map border up to a cap, ticks them, and pitches a
/// tent for every agent that settles.
#[derive(Debug, Default)]
pub struct AgentPopulationManager {
    config: PopulationConfig,
    agents: BTreeMap<AgentId, Agent>,
    next_id: u64,
    last_spawn: Option<u64>,
}

impl AgentPopulationManager {
    pub fn new(config: PopulationConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &PopulationConfig {
        &self.config
    }

    pub fn update<R: Rng + ?Sized>(
        &mut self,
        now: u64,
        terrain: &TerrainMap,
        trees: &TreeManager,
        tents: &mut TentManager,
        rng: &mut R,
    ) -> TickReport {
        let mut report = TickReport::default();
        for npc in self.agents.values_mut() {
            if let Some(AgentEvent::Settled { agent, x, y }) = npc.update(now, terrain, trees, rng) {
                if tents.create_tent(terrain, x, y, agent).is_none() {
                    debug!(%agent, x, y, "no tent placed for settled agent");
                }
                report.settled.push(agent);
            }
        }

        let due = self
            .last_spawn
            .map_or(true, |last| now.saturating_sub(last) >= self.config.spawn_interval);
        if self.agents.len() < self.config.max_agents && due {
            report.spawned = self.spawn_agent(now, terrain, rng);
        }
        report
    }

    /// Drops a new agent on a random passable border cell. On failure
    /// nothing changes, so the next tick tries again.
    pub fn spawn_agent<R: Rng + ?Sized>(
        &mut self,
        now: u64,
        terrain: &TerrainMap,
        rng: &mut R,
    ) -> Option<AgentId> {
        let candidates: Vec<(i32, i32)> = terrain
            .border_cells()
            .into_iter()
            .filter(|(x, y)| is_valid_spawn(terrain, *x, *y))
            .collect();
        let Some(&(x, y)) = candidates.choose(rng) else {
            debug!("no passable border cell to spawn on");
            return None;
        };
        self.spawn_at(now, terrain, x, y)
    }

    /// Spawns on a specific cell, provided it is a legal spawn point.
    pub fn spawn_at(&mut self, now: u64, terrain: &TerrainMap, x: i32, y: i32) -> Option<AgentId> {
        let id = AgentId::new(self.next_id);
        let agent = Agent::spawn(id, terrain, x, y, now, self.config.agent)?;
        self.next_id += 1;
        self.agents.insert(id, agent);
        self.last_spawn = Some(now);
        debug!(agent = %id, x, y, population = self.agents.len(), "agent spawned");
        Some(id)
    }

    pub fn get(&self, id: AgentId) -> Option<&Agent> {
        self.agents.get(&id)
    }

    pub fn agents(&self) -> impl Iterator<Item = &Agent> {
        self.agents.values()
    }

    pub fn count(&self) -> usize {
        self.agents.len()
    }

    pub fn count_by_state(&self, state: AgentState) -> usize {
        self.agents.values().filter(|a| a.state() == state).count()
    }

    pub fn agents_in_state(&self, state: AgentState) -> impl Iterator<Item = &Agent> {
        self.agents.values().filter(move |a| a.state() == state)
    }

    pub fn state_counts(&self) -> StateCounts {
        StateCounts {
            searching: self.count_by_state(AgentState::Searching),
            place_found: self.count_by_state(AgentState::PlaceFound),
        }
    }

    pub fn remove(&mut self, id: AgentId) -> bool {
        self.agents.remove(&id).is_some()
    }

    pub fn clear(&mut self) {
        self.agents.clear();
    }
}
