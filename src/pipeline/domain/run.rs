//! Run phases and the settled record of a finished run.

use super::{CollectedResults, RunId, RunPhaseError, StatusMap, TaskStatus};
use crate::address::domain::{AddressCandidate, Postcode};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

/// Phase of one fetch run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunPhase {
    /// No run has been triggered.
    Idle,
    /// The prerequisite task is in flight.
    Prerequisite,
    /// Every remaining task has been launched.
    FanOut,
    /// Every task is terminal and results are stable.
    Settled,
}

impl RunPhase {
    /// Returns the canonical string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Prerequisite => "prerequisite",
            Self::FanOut => "fan_out",
            Self::Settled => "settled",
        }
    }

    /// Returns whether a run may move from this phase to `next`.
    ///
    /// A run moves strictly forward from `idle` to `settled`. Starting
    /// another run from `settled` re-enters `prerequisite`.
    #[must_use]
    pub const fn can_advance_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Idle | Self::Settled, Self::Prerequisite)
                | (Self::Prerequisite, Self::FanOut)
                | (Self::FanOut, Self::Settled)
        )
    }

    /// Returns `next` if the transition is valid.
    ///
    /// # Errors
    ///
    /// Returns [`RunPhaseError`] for out-of-order transitions.
    pub const fn advance_to(self, next: Self) -> Result<Self, RunPhaseError> {
        if self.can_advance_to(next) {
            Ok(next)
        } else {
            Err(RunPhaseError {
                from: self,
                to: next,
            })
        }
    }

    /// Returns `true` while tasks are in flight.
    #[must_use]
    pub const fn is_in_flight(self) -> bool {
        matches!(self, Self::Prerequisite | Self::FanOut)
    }
}

impl fmt::Display for RunPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stable record of a finished run, ready for presentation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SettledRun {
    run_id: RunId,
    postcode: Postcode,
    address: AddressCandidate,
    statuses: StatusMap,
    results: CollectedResults,
    started_at: DateTime<Utc>,
    settled_at: DateTime<Utc>,
}

/// Parameter object for constructing a [`SettledRun`].
#[derive(Debug, Clone, PartialEq)]
pub struct SettledRunParams {
    /// Run identifier.
    pub run_id: RunId,
    /// Postcode the run was opened for.
    pub postcode: Postcode,
    /// Address the run fetched data for.
    pub address: AddressCandidate,
    /// Final terminal status of every task.
    pub statuses: StatusMap,
    /// Payloads of the successful tasks.
    pub results: CollectedResults,
    /// Trigger timestamp.
    pub started_at: DateTime<Utc>,
    /// Settlement timestamp.
    pub settled_at: DateTime<Utc>,
}

impl SettledRun {
    /// Creates a settled run record.
    #[must_use]
    pub fn new(params: SettledRunParams) -> Self {
        Self {
            run_id: params.run_id,
            postcode: params.postcode,
            address: params.address,
            statuses: params.statuses,
            results: params.results,
            started_at: params.started_at,
            settled_at: params.settled_at,
        }
    }

    /// Returns the run identifier.
    #[must_use]
    pub const fn run_id(&self) -> RunId {
        self.run_id
    }

    /// Returns the postcode.
    #[must_use]
    pub const fn postcode(&self) -> &Postcode {
        &self.postcode
    }

    /// Returns the selected address.
    #[must_use]
    pub const fn address(&self) -> &AddressCandidate {
        &self.address
    }

    /// Returns the final status map.
    #[must_use]
    pub const fn statuses(&self) -> &StatusMap {
        &self.statuses
    }

    /// Returns the collected payloads.
    #[must_use]
    pub const fn results(&self) -> &CollectedResults {
        &self.results
    }

    /// Returns the trigger timestamp.
    #[must_use]
    pub const fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Returns the settlement timestamp.
    #[must_use]
    pub const fn settled_at(&self) -> DateTime<Utc> {
        self.settled_at
    }

    /// Returns how many tasks succeeded.
    #[must_use]
    pub fn succeeded(&self) -> usize {
        self.statuses.count(TaskStatus::Success)
    }

    /// Returns how many tasks failed.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.statuses.count(TaskStatus::Error)
    }
}
