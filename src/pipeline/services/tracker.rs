//! Live per-run task status tracker.

use crate::pipeline::domain::{RunId, StatusMap, TaskName, TaskStatus};
use tokio::sync::watch;
use tracing::debug;

/// Consistent view of the tracker at one instant.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackerSnapshot {
    /// Run the statuses belong to; `None` before the first run.
    pub run_id: Option<RunId>,
    /// Status of every task registered for the run.
    pub statuses: StatusMap,
}

/// Result of a [`StatusTracker::transition`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionOutcome {
    /// The status was written.
    Applied,
    /// The name was not registered for the current run.
    UnknownTask,
    /// The write came from a run other than the current one.
    StaleRun,
    /// The status would not advance.
    Rejected {
        /// Current status.
        from: TaskStatus,
        /// Requested status.
        to: TaskStatus,
    },
}

/// Shared mapping from task name to status for the current run.
///
/// Writers and readers go through a `watch` channel, so every snapshot is a
/// whole map and subscribers are woken on each applied transition.
/// Rejected writes are no-ops rather than panics.
#[derive(Debug)]
pub struct StatusTracker {
    state: watch::Sender<TrackerSnapshot>,
}

impl Default for StatusTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusTracker {
    /// Creates a tracker with no run.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: watch::Sender::new(TrackerSnapshot::default()),
        }
    }

    /// Starts `run_id` with exactly `names`, all `pending`.
    ///
    /// Any previous map is discarded.
    pub fn initialize<'a>(&self, run_id: RunId, names: impl IntoIterator<Item = &'a TaskName>) {
        let statuses = StatusMap::pending(names);
        debug!(run_id = %run_id, tasks = statuses.len(), "initialized status tracker");
        self.state.send_replace(TrackerSnapshot {
            run_id: Some(run_id),
            statuses,
        });
    }

    /// Moves one task of `run_id` to `status`.
    pub fn transition(&self, run_id: RunId, name: &str, status: TaskStatus) -> TransitionOutcome {
        let mut outcome = TransitionOutcome::Applied;
        self.state.send_if_modified(|state| {
            if state.run_id != Some(run_id) {
                outcome = TransitionOutcome::StaleRun;
                return false;
            }
            match state.statuses.get(name) {
                None => {
                    outcome = TransitionOutcome::UnknownTask;
                    false
                }
                Some(current) if !current.can_advance_to(status) => {
                    outcome = TransitionOutcome::Rejected {
                        from: current,
                        to: status,
                    };
                    false
                }
                Some(_) => {
                    state.statuses.set(name, status);
                    true
                }
            }
        });
        if outcome != TransitionOutcome::Applied {
            debug!(run_id = %run_id, task = name, status = %status, ?outcome, "ignored status transition");
        }
        outcome
    }

    /// Returns a copy of the current status map.
    #[must_use]
    pub fn snapshot(&self) -> StatusMap {
        self.state.borrow().statuses.clone()
    }

    /// Returns the current run and its statuses together.
    #[must_use]
    pub fn current(&self) -> TrackerSnapshot {
        self.state.borrow().clone()
    }

    /// Subscribes to every applied change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<TrackerSnapshot> {
        self.state.subscribe()
    }
}
