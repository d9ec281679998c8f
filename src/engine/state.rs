use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use tokio::task::JoinHandle;

use super::Snapshot;
use crate::error::{Result, StatusError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CyclePhase {
    Idle,
    Probing,
}

/// Mutable engine state. Only touched through [`StateCell`], never held across an await.
pub(crate) struct EngineState {
    pub last_snapshot: Option<Arc<Snapshot>>,
    pub last_check: Option<DateTime<Utc>>,
    pub auto_refresh: bool,
    pub refresh_task: Option<JoinHandle<()>>,
    pub phase: CyclePhase,
}

pub(crate) struct StateCell(Mutex<EngineState>);

impl StateCell {
    pub fn new() -> Self {
        StateCell(Mutex::new(EngineState {
            last_snapshot: None,
            last_check: None,
            auto_refresh: false,
            refresh_task: None,
            phase: CyclePhase::Idle,
        }))
    }

    pub fn lock(&self) -> MutexGuard<'_, EngineState> {
        // State stays consistent between statements, so a poisoned lock is still usable.
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Moves IDLE -> PROBING, or refuses when a cycle is already running.
    pub fn begin_cycle(&self) -> Result<ProbingGuard<'_>> {
        let mut state = self.lock();
        if state.phase == CyclePhase::Probing {
            return Err(StatusError::CycleInProgress);
        }
        state.phase = CyclePhase::Probing;
        Ok(ProbingGuard { cell: self })
    }
}

/// Returns the engine to IDLE when dropped, whether the cycle finished, failed or was cancelled.
pub(crate) struct ProbingGuard<'a> {
    cell: &'a StateCell,
}

impl Drop for ProbingGuard<'_> {
    fn drop(&mut self) {
        self.cell.lock().phase = CyclePhase::Idle;
    }
}
