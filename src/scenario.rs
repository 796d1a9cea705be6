use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::{
    agents::PopulationConfig,
    spatial::Projection,
    terrain::{Climate, GeneratorSettings},
    world::{World, WorldSettings},
};

fn default_frame_ms() -> u64 {
    16
}

fn default_frames() -> u64 {
    600
}

#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    pub name: String,
    pub description: Option<String>,
    pub seed: u64,
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub climate: Option<Climate>,
    #[serde(default)]
    pub frames: Option<u64>,
    #[serde(default = "default_frame_ms")]
    pub frame_ms: u64,
    #[serde(default)]
    pub snapshot_interval_frames: u64,
    #[serde(default)]
    pub terrain: GeneratorSettings,
    #[serde(default)]
    pub agents: PopulationConfig,
    #[serde(default)]
    pub projection: Projection,
}

pub struct ScenarioLoader {
    base_dir: PathBuf,
}

impl ScenarioLoader {
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }

    pub fn load(&self, file: impl AsRef<Path>) -> Result<Scenario> {
        let path = self.base_dir.join(file);
        let data = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read scenario file {}", path.display()))?;
        Scenario::from_yaml(&data).with_context(|| format!("Failed to parse {}", path.display()))
    }
}

impl Scenario {
    pub fn from_yaml(text: &str) -> Result<Self> {
        let scenario: Scenario = serde_yaml::from_str(text)?;
        Ok(scenario)
    }

    pub fn world_settings(&self) -> WorldSettings {
        WorldSettings {
            seed: self.seed,
            width: self.width,
            height: self.height,
            climate: self.climate,
            terrain: self.terrain.clone(),
            population: self.agents,
            projection: self.projection,
        }
    }

    pub fn build_world(&self) -> Result<World> {
        World::generate(&self.world_settings())
            .with_context(|| format!("Failed to generate world for scenario '{}'", self.name))
    }

    pub fn frames(&self, override_frames: Option<u64>) -> u64 {
        override_frames.or(self.frames).unwrap_or_else(default_frames)
    }
}
