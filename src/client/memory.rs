use std::sync::{Arc, Mutex, MutexGuard};

use super::{ClientError, SheetClient};
use crate::cell::Grid;

#[derive(Debug, Default)]
struct State {
    grid: Grid,
    fail_reads: bool,
    fail_writes: bool,
    writes: usize,
}

/// In-memory sheet. Clones share the same contents, so a test can keep a
/// handle while the session owns another.
#[derive(Debug, Clone, Default)]
pub struct MemorySheet {
    state: Arc<Mutex<State>>,
}

impl MemorySheet {
    pub fn new(grid: Grid) -> Self {
        MemorySheet {
            state: Arc::new(Mutex::new(State {
                grid,
                ..State::default()
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        // A panic while holding the lock leaves the grid intact.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Current sheet contents.
    pub fn grid(&self) -> Grid {
        self.lock().grid.clone()
    }

    /// Number of successful writes so far.
    pub fn writes(&self) -> usize {
        self.lock().writes
    }

    pub fn set_grid(&self, grid: Grid) {
        self.lock().grid = grid;
    }

    pub fn fail_reads(&self, fail: bool) {
        self.lock().fail_reads = fail;
    }

    pub fn fail_writes(&self, fail: bool) {
        self.lock().fail_writes = fail;
    }
}

impl SheetClient for MemorySheet {
    fn describe(&self) -> String {
        "in-memory sheet".to_string()
    }

    fn read_grid(&self) -> Result<Grid, ClientError> {
        let state = self.lock();
        if state.fail_reads {
            return Err(ClientError::Unavailable("read refused".to_string()));
        }
        Ok(state.grid.clone())
    }

    fn write_grid(&self, grid: &Grid) -> Result<(), ClientError> {
        let mut state = self.lock();
        if state.fail_writes {
            return Err(ClientError::Unavailable("write refused".to_string()));
        }
        state.grid = grid.clone();
        state.writes += 1;
        Ok(())
    }
}
