use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;

use crate::engine::TickFrame;

/// Periodic JSON checkpoints of the per-tick frame, written as
/// `<dir>/<scenario>/tick_NNNNNN.json`. An interval of zero disables
/// writing entirely.
pub struct SnapshotWriter {
    output_dir: PathBuf,
    interval_ticks: u64,
}

#[derive(Serialize)]
struct SnapshotDocument<'a> {
    written_at: String,
    #[serde(flatten)]
    frame: &'a TickFrame,
}

impl SnapshotWriter {
    pub fn new(output_dir: impl AsRef<Path>, interval_ticks: u64) -> Self {
        Self {
            output_dir: output_dir.as_ref().to_path_buf(),
            interval_ticks,
        }
    }

    pub fn maybe_write(&self, frame: &TickFrame) -> Result<Option<PathBuf>> {
        if self.interval_ticks == 0 || frame.tick % self.interval_ticks != 0 {
            return Ok(None);
        }

        let dir = self.output_dir.join(&frame.scenario);
        fs::create_dir_all(&dir)
            .with_context(|| format!("failed to create snapshot dir {}", dir.display()))?;
        let path = dir.join(format!("tick_{:06}.json", frame.tick));
        let document = SnapshotDocument {
            written_at: Utc::now().to_rfc3339(),
            frame,
        };
        let json = serde_json::to_string_pretty(&document)?;
        fs::write(&path, json)
            .with_context(|| format!("failed to write snapshot {}", path.display()))?;
        Ok(Some(path))
    }
}
