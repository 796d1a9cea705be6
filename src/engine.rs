use std::path::PathBuf;

use anyhow::Result;
use serde::Serialize;
use tracing::{debug, info};

use crate::{
    agents::StateCounts,
    snapshot::SnapshotWriter,
    world::{World, WorldSnapshot},
};

pub struct EngineSettings {
    pub scenario_name: String,
    pub frame_ms: u64,
    pub snapshot_interval_frames: u64,
    pub snapshot_dir: PathBuf,
}

pub struct EngineBuilder {
    settings: EngineSettings,
}

impl EngineBuilder {
    pub fn new(settings: EngineSettings) -> Self {
        Self { settings }
    }

    pub fn build(self) -> Engine {
        Engine {
            snapshot_writer: SnapshotWriter::new(
                &self.settings.snapshot_dir,
                self.settings.snapshot_interval_frames,
            ),
            settings: self.settings,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct RunSummary {
    pub frames: u64,
    pub final_time_ms: u64,
    pub spawned: usize,
    pub settled: usize,
    pub trees: usize,
    pub tents: usize,
    pub state_counts: StateCounts,
}

/// Drives a [`World`] with a fixed frame clock.
pub struct Engine {
    snapshot_writer: SnapshotWriter,
    settings: EngineSettings,
}

impl Engine {
    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    pub fn run(&mut self, world: &mut World, frames: u64) -> Result<RunSummary> {
        self.run_with_hook(world, frames, |_| {})
    }

    /// Runs `frames` frames, handing every frame's snapshot to `hook`.
    pub fn run_with_hook<F>(&mut self, world: &mut World, frames: u64, mut hook: F) -> Result<RunSummary>
    where
        F: FnMut(&WorldSnapshot),
    {
        let mut spawned = 0;
        let mut settled = 0;
        let mut now = world.now();
        for frame in 1..=frames {
            let report = world.update(now);
            if let Some(id) = report.spawned {
                debug!(frame, agent = %id, "spawned");
                spawned += 1;
            }
            settled += report.settled.len();

            let snapshot = world.snapshot(&self.settings.scenario_name, frame);
            if let Some(path) = self.snapshot_writer.maybe_write(&snapshot)? {
                debug!(frame, path = %path.display(), "snapshot written");
            }
            hook(&snapshot);
            now += self.settings.frame_ms;
        }

        let summary = RunSummary {
            frames,
            final_time_ms: world.now(),
            spawned,
            settled,
            trees: world.trees().tree_count(),
            tents: world.tents().tent_count(),
            state_counts: world.population().state_counts(),
        };
        info!(
            scenario = %self.settings.scenario_name,
            frames,
            spawned,
            settled,
            "run complete"
        );
        Ok(summary)
    }
}
