//! JSON file store shared between processes.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use super::GridStore;
use crate::grid::{Grid, GridSnapshot};

/// Grid persisted as `{"grid": [[" " | "X", ...], ...]}`.
///
/// Writes replace the whole file in place: no lock, no temp-file rename, no merge.
/// When two processes read-modify-write concurrently the later write silently drops
/// the earlier one (lost update), and a reader can observe a partially written file,
/// which loads as a blank grid. Both processes re-read immediately before each toggle
/// to keep the window small, but it is not closed.
#[derive(Debug, Clone)]
pub struct FileGridStore {
    path: PathBuf,
    grid_size: usize,
}

impl FileGridStore {
    pub fn new(path: impl Into<PathBuf>, grid_size: usize) -> Self {
        Self {
            path: path.into(),
            grid_size,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_grid(&self) -> anyhow::Result<Grid> {
        let contents = std::fs::read_to_string(&self.path)?;
        let snapshot: GridSnapshot = serde_json::from_str(&contents)?;
        Ok(snapshot.into_grid(self.grid_size)?)
    }

    fn write_grid(&self, grid: &Grid) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let contents = serde_json::to_string(&grid.to_snapshot())?;
        std::fs::write(&self.path, contents)?;
        Ok(())
    }
}

impl GridStore for FileGridStore {
    fn grid_size(&self) -> usize {
        self.grid_size
    }

    fn load(&self) -> Grid {
        if !self.path.exists() {
            tracing::debug!(
                "No grid state at {}, using blank grid",
                self.path.display()
            );
            return Grid::blank(self.grid_size);
        }

        match self.read_grid() {
            Ok(grid) => grid,
            Err(e) => {
                tracing::warn!(
                    "Failed to load grid state from {}: {:#}, using blank grid",
                    self.path.display(),
                    e
                );
                Grid::blank(self.grid_size)
            }
        }
    }

    fn save(&self, grid: &Grid) {
        match self.write_grid(grid) {
            Ok(()) => tracing::debug!(
                marked = grid.marked_count(),
                "Saved grid state to {}",
                self.path.display()
            ),
            Err(e) => tracing::error!(
                "Failed to save grid state to {}: {:#}",
                self.path.display(),
                e
            ),
        }
    }

    fn modified(&self) -> Option<SystemTime> {
        std::fs::metadata(&self.path)
            .and_then(|meta| meta.modified())
            .ok()
    }
}
