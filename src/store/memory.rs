//! In-memory grid store (non-persistent).

use std::sync::RwLock;
use std::time::SystemTime;

use super::GridStore;
use crate::grid::Grid;

#[derive(Debug)]
pub struct InMemoryGridStore {
    grid_size: usize,
    state: RwLock<Option<(Grid, SystemTime)>>,
}

impl InMemoryGridStore {
    pub fn new(grid_size: usize) -> Self {
        Self {
            grid_size,
            state: RwLock::new(None),
        }
    }
}

impl GridStore for InMemoryGridStore {
    fn grid_size(&self) -> usize {
        self.grid_size
    }

    fn load(&self) -> Grid {
        let state = self.state.read().unwrap_or_else(|e| e.into_inner());
        match state.as_ref() {
            Some((grid, _)) if grid.size() == self.grid_size => grid.clone(),
            _ => Grid::blank(self.grid_size),
        }
    }

    fn save(&self, grid: &Grid) {
        let mut state = self.state.write().unwrap_or_else(|e| e.into_inner());
        *state = Some((grid.clone(), SystemTime::now()));
    }

    fn modified(&self) -> Option<SystemTime> {
        let state = self.state.read().unwrap_or_else(|e| e.into_inner());
        state.as_ref().map(|(_, at)| *at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_store_loads_blank_grid() {
        let store = InMemoryGridStore::new(3);
        assert_eq!(store.load(), Grid::blank(3));
        assert!(store.modified().is_none());
    }

    #[test]
    fn save_replaces_grid_and_stamps_time() {
        let store = InMemoryGridStore::new(2);
        let mut grid = Grid::blank(2);
        grid.toggle(1, 1).unwrap();

        store.save(&grid);

        assert_eq!(store.load(), grid);
        assert!(store.modified().is_some());
    }

    #[test]
    fn wrong_sized_grid_loads_blank() {
        let store = InMemoryGridStore::new(2);
        store.save(&Grid::blank(5));
        assert_eq!(store.load(), Grid::blank(2));
    }
}
