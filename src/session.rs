//! One user's research session for a single postcode.
//!
//! A session resolves candidates once, holds the selection, and triggers
//! runs on the shared orchestrator. It reads status and results back from
//! the orchestrator rather than keeping its own copies.

use std::sync::Arc;

use mockable::Clock;
use thiserror::Error;
use tokio::sync::watch;

use crate::address::{
    domain::{AddressCandidate, Postcode},
    ports::AddressLookup,
    services::AddressResolutionService,
};
use crate::pipeline::{
    domain::{CollectedResults, SettledRun, StatusMap},
    ports::SourceTransport,
    services::{AggregationOrchestrator, TrackerSnapshot},
};

/// Errors raised by session operations.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum SessionError {
    /// The index does not name a resolved candidate.
    #[error("no candidate at index {index}; {available} available")]
    NoSuchCandidate {
        /// Requested index.
        index: usize,
        /// Number of candidates.
        available: usize,
    },
}

/// Research session over one postcode.
pub struct PropertySession<T, C>
where
    T: SourceTransport,
    C: Clock + Send + Sync,
{
    postcode: Postcode,
    candidates: Vec<AddressCandidate>,
    selected: Option<usize>,
    orchestrator: Arc<AggregationOrchestrator<T, C>>,
}

impl<T, C> PropertySession<T, C>
where
    T: SourceTransport,
    C: Clock + Send + Sync,
{
    /// Opens a session, resolving candidates for `postcode` once.
    pub async fn open<L>(
        postcode: Postcode,
        resolver: &AddressResolutionService<L>,
        orchestrator: Arc<AggregationOrchestrator<T, C>>,
    ) -> Self
    where
        L: AddressLookup,
    {
        let candidates = resolver.resolve(&postcode).await;
        Self {
            postcode,
            candidates,
            selected: None,
            orchestrator,
        }
    }

    /// Returns the session postcode.
    #[must_use]
    pub const fn postcode(&self) -> &Postcode {
        &self.postcode
    }

    /// Returns the resolved candidates in source order.
    #[must_use]
    pub fn candidates(&self) -> &[AddressCandidate] {
        &self.candidates
    }

    /// Selects the candidate at zero-based `index`.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NoSuchCandidate`] if `index` is out of range;
    /// the previous selection is kept.
    pub fn select(&mut self, index: usize) -> Result<&AddressCandidate, SessionError> {
        let candidate = self
            .candidates
            .get(index)
            .ok_or(SessionError::NoSuchCandidate {
                index,
                available: self.candidates.len(),
            })?;
        self.selected = Some(index);
        Ok(candidate)
    }

    /// Returns the selected candidate.
    #[must_use]
    pub fn selected(&self) -> Option<&AddressCandidate> {
        self.selected.and_then(|index| self.candidates.get(index))
    }

    /// Runs the pipeline for the selection; `None` if nothing is selected.
    pub async fn fetch(&self) -> Option<SettledRun> {
        self.orchestrator
            .trigger(&self.postcode, self.selected())
            .await
    }

    /// Returns the live status map.
    #[must_use]
    pub fn statuses(&self) -> StatusMap {
        self.orchestrator.statuses()
    }

    /// Subscribes to live status changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<TrackerSnapshot> {
        self.orchestrator.subscribe()
    }

    /// Returns the collected results of the latest run for the selection.
    #[must_use]
    pub fn results(&self) -> Option<CollectedResults> {
        let selected = self.selected()?;
        self.orchestrator
            .latest()
            .filter(|run| run.postcode() == &self.postcode && run.address() == selected)
            .map(|run| run.results().clone())
    }

    /// Returns whether a run is in flight.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.orchestrator.phase().is_in_flight()
    }
}
