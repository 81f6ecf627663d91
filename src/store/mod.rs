//! Grid persistence.
//!
//! The store is the only integration point between the command service and the
//! display process. Callers re-read it before every operation; any grid they hold in
//! memory is advisory.
//!
//! Neither `load` nor `save` reports failure. A broken or missing snapshot reads as a
//! blank grid and a failed write is logged and dropped, so grid operations stay
//! available even when the backing storage is not.

mod file;
mod memory;

pub use file::FileGridStore;
pub use memory::InMemoryGridStore;

use std::sync::Arc;
use std::time::SystemTime;

use crate::grid::Grid;

pub trait GridStore: Send + Sync {
    /// Dimension every loaded grid is validated against.
    fn grid_size(&self) -> usize;

    /// Current grid, or a blank one when nothing valid is stored.
    fn load(&self) -> Grid;

    /// Overwrite the stored grid. Best-effort.
    fn save(&self, grid: &Grid);

    /// Time of the last write, if known.
    fn modified(&self) -> Option<SystemTime>;
}

/// Shared store handle passed to each operation.
pub type SharedGridStore = Arc<dyn GridStore>;
