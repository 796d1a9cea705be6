use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::Serialize;

use crate::world::{TerrainSnapshot, WorldSnapshot};

#[derive(Serialize)]
struct SnapshotFile<'a, T> {
    written_at: String,
    #[serde(flatten)]
    body: &'a T,
}

/// Writes world snapshots as pretty JSON under `<dir>/<scenario>/`.
pub struct SnapshotWriter {
    dir: PathBuf,
    interval_frames: u64,
}

impl SnapshotWriter {
    pub fn new(dir: impl AsRef<Path>, interval_frames: u64) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            interval_frames,
        }
    }

    pub fn is_due(&self, frame: u64) -> bool {
        self.interval_frames != 0 && frame % self.interval_frames == 0
    }

    pub fn maybe_write(&self, snapshot: &WorldSnapshot) -> Result<Option<PathBuf>> {
        if !self.is_due(snapshot.frame) {
            return Ok(None);
        }
        let path = self
            .scenario_dir(&snapshot.scenario)?
            .join(format!("frame_{:06}.json", snapshot.frame));
        write_json(&path, snapshot)?;
        Ok(Some(path))
    }

    pub fn write_terrain(&self, scenario: &str, terrain: &TerrainSnapshot<'_>) -> Result<PathBuf> {
        let path = self.scenario_dir(scenario)?.join("terrain.json");
        write_json(&path, terrain)?;
        Ok(path)
    }

    fn scenario_dir(&self, scenario: &str) -> Result<PathBuf> {
        let dir = self.dir.join(scenario);
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create snapshot dir {}", dir.display()))?;
        Ok(dir)
    }
}

/// Serializes `body` with a write timestamp to `path`.
pub fn write_json<T: Serialize>(path: &Path, body: &T) -> Result<()> {
    let file = SnapshotFile {
        written_at: chrono::Utc::now().to_rfc3339(),
        body,
    };
    let json = serde_json::to_string_pretty(&file)?;
    fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}
