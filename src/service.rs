//! Command service: the grid operations exposed to remote callers.
//!
//! Every operation starts from a fresh `load()` so edits made by the display
//! process since the last call are never overwritten by a stale copy.

use thiserror::Error;

use crate::grid::{Grid, GridError};
use crate::launcher::DisplayLauncher;
use crate::store::SharedGridStore;

pub const SESSION_STARTED: &str =
    "New Drawing session started! The UI should open in a separate window.";

#[derive(Debug, Error)]
pub enum ServiceError {
    /// The caller passed coordinates or arguments that cannot be applied.
    #[error("{0}")]
    InvalidParams(String),

    /// Something on our side failed (display launch).
    #[error("{0}")]
    Internal(String),
}

impl From<GridError> for ServiceError {
    fn from(err: GridError) -> Self {
        ServiceError::InvalidParams(err.to_string())
    }
}

pub struct DrawService {
    store: SharedGridStore,
    launcher: Box<dyn DisplayLauncher>,
}

impl DrawService {
    pub fn new(store: SharedGridStore, launcher: Box<dyn DisplayLauncher>) -> Self {
        Self { store, launcher }
    }

    pub fn grid_size(&self) -> usize {
        self.store.grid_size()
    }

    /// Reset the grid to blank, persist it, and (re)launch the display.
    ///
    /// Persistence problems are logged by the store and do not fail the call; only a
    /// display launch failure does.
    pub fn start_session(&mut self) -> Result<String, ServiceError> {
        tracing::info!("Starting drawing session");
        self.store.save(&Grid::blank(self.store.grid_size()));

        self.launcher
            .relaunch()
            .map_err(|e| ServiceError::Internal(format!("Failed to start the UI: {}", e)))?;

        Ok(SESSION_STARTED.to_string())
    }

    /// Flip one cell. Out-of-range coordinates leave the stored grid untouched.
    pub fn toggle_cell(&mut self, row: i64, col: i64) -> Result<String, ServiceError> {
        let mut grid = self.store.load();
        let cell = grid.toggle(row, col).map_err(|e| {
            tracing::warn!(row, col, "Rejected toggle: {}", e);
            ServiceError::from(e)
        })?;
        self.store.save(&grid);

        tracing::debug!(row, col, state = cell.symbol(), "Toggled cell");
        Ok(format!(
            "Cell at ({}, {}) toggled. Current state: {}",
            row,
            col,
            cell.symbol()
        ))
    }

    /// Text rendering of the stored grid. Never fails.
    pub fn get_grid(&self) -> String {
        self.store.load().render_text()
    }

    /// Stop the tracked display, if any.
    pub fn shutdown(&mut self) {
        self.launcher.terminate();
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use crate::launcher::{DisplayLauncher, LaunchError};

    /// Launcher that records calls instead of spawning anything.
    #[derive(Clone, Default)]
    pub struct RecordingLauncher {
        pub launches: Arc<AtomicUsize>,
        pub terminations: Arc<AtomicUsize>,
        pub fail: bool,
    }

    impl DisplayLauncher for RecordingLauncher {
        fn relaunch(&mut self) -> Result<Option<u32>, LaunchError> {
            if self.fail {
                return Err(LaunchError::Spawn {
                    program: "draw-grid-ui".to_string(),
                    source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
                });
            }
            let n = self.launches.fetch_add(1, Ordering::SeqCst);
            Ok(Some(1000 + n as u32))
        }

        fn terminate(&mut self) {
            self.terminations.fetch_add(1, Ordering::SeqCst);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;
    use std::sync::Arc;

    use super::test_support::RecordingLauncher;
    use super::*;
    use crate::grid::Cell;
    use crate::store::{FileGridStore, GridStore, InMemoryGridStore};

    const N: usize = 4;

    fn service_with(store: SharedGridStore) -> (DrawService, RecordingLauncher) {
        let launcher = RecordingLauncher::default();
        (DrawService::new(store, Box::new(launcher.clone())), launcher)
    }

    fn blank_text() -> String {
        Grid::blank(N).render_text()
    }

    #[test]
    fn toggle_twice_restores_original() {
        let store: SharedGridStore = Arc::new(InMemoryGridStore::new(N));
        let (mut service, _) = service_with(store.clone());

        for row in 0..N as i64 {
            for col in 0..N as i64 {
                service.toggle_cell(row, col).unwrap();
                service.toggle_cell(row, col).unwrap();
            }
        }
        assert_eq!(store.load(), Grid::blank(N));
    }

    #[test]
    fn toggle_reports_new_state() {
        let (mut service, _) = service_with(Arc::new(InMemoryGridStore::new(N)));
        assert_eq!(
            service.toggle_cell(2, 3).unwrap(),
            "Cell at (2, 3) toggled. Current state: X"
        );
        assert_eq!(
            service.toggle_cell(2, 3).unwrap(),
            "Cell at (2, 3) toggled. Current state:  "
        );
    }

    #[test]
    fn out_of_range_toggle_is_invalid_params_and_leaves_grid() {
        let store: SharedGridStore = Arc::new(InMemoryGridStore::new(N));
        let (mut service, _) = service_with(store.clone());
        service.toggle_cell(1, 1).unwrap();
        let before = service.get_grid();

        for (row, col) in [(N as i64, 0), (0, N as i64), (-1, 2), (2, -7)] {
            match service.toggle_cell(row, col) {
                Err(ServiceError::InvalidParams(msg)) => assert_eq!(
                    msg,
                    "Invalid position. Row and column must be between 0 and 3."
                ),
                other => panic!("expected invalid params, got {:?}", other),
            }
        }
        assert_eq!(service.get_grid(), before);
    }

    #[test]
    fn start_session_resets_and_persists_blank_grid() {
        let store: SharedGridStore = Arc::new(InMemoryGridStore::new(N));
        let (mut service, launcher) = service_with(store.clone());
        service.toggle_cell(0, 0).unwrap();
        service.toggle_cell(3, 2).unwrap();

        assert_eq!(service.start_session().unwrap(), SESSION_STARTED);

        assert_eq!(store.load(), Grid::blank(N));
        assert_eq!(service.get_grid(), blank_text());
        assert_eq!(launcher.launches.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn start_session_launch_failure_is_internal_but_grid_is_reset() {
        let store: SharedGridStore = Arc::new(InMemoryGridStore::new(N));
        let launcher = RecordingLauncher {
            fail: true,
            ..Default::default()
        };
        let mut service = DrawService::new(store.clone(), Box::new(launcher));
        service.toggle_cell(0, 0).unwrap();

        match service.start_session() {
            Err(ServiceError::Internal(msg)) => {
                assert!(msg.starts_with("Failed to start the UI: "))
            }
            other => panic!("expected internal error, got {:?}", other),
        }
        assert_eq!(store.load(), Grid::blank(N));
    }

    #[test]
    fn reading_without_state_file_matches_fresh_session() {
        let dir = tempfile::tempdir().unwrap();
        let store: SharedGridStore =
            Arc::new(FileGridStore::new(dir.path().join("board_state.json"), N));
        let (mut service, _) = service_with(store);

        let before_session = service.get_grid();
        service.start_session().unwrap();
        assert_eq!(before_session, service.get_grid());
        assert_eq!(before_session, blank_text());
    }

    #[test]
    fn toggle_origin_then_read() {
        let (mut service, _) = service_with(Arc::new(InMemoryGridStore::new(N)));
        service.toggle_cell(0, 0).unwrap();

        let text = service.get_grid();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "");
        assert_eq!(lines[1], "X      ");
        for line in &lines[2..] {
            assert_eq!(*line, "       ");
        }
        assert_eq!(lines.len(), N + 1);
    }

    #[test]
    fn toggle_origin_twice_reads_blank() {
        let (mut service, _) = service_with(Arc::new(InMemoryGridStore::new(N)));
        service.toggle_cell(0, 0).unwrap();
        service.toggle_cell(0, 0).unwrap();
        assert_eq!(service.get_grid(), blank_text());
    }

    #[test]
    fn sees_writes_made_by_other_process() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("board_state.json");
        let store: SharedGridStore = Arc::new(FileGridStore::new(&path, N));
        let (mut service, _) = service_with(store);
        service.toggle_cell(0, 0).unwrap();

        // Simulate the display toggling a cell through its own store handle.
        let display = FileGridStore::new(&path, N);
        let mut grid = display.load();
        grid.toggle(1, 1).unwrap();
        display.save(&grid);

        service.toggle_cell(2, 2).unwrap();
        let stored = display.load();
        assert_eq!(stored.get(0, 0), Some(Cell::Marked));
        assert_eq!(stored.get(1, 1), Some(Cell::Marked));
        assert_eq!(stored.get(2, 2), Some(Cell::Marked));
    }

    #[test]
    fn shutdown_terminates_display() {
        let (mut service, launcher) = service_with(Arc::new(InMemoryGridStore::new(N)));
        service.shutdown();
        assert_eq!(launcher.terminations.load(Ordering::SeqCst), 1);
    }
}
