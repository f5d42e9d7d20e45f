//! Two-phase fan-out/fan-in run orchestration.

use super::{StatusTracker, TrackerSnapshot, execute_task};
use crate::address::domain::{AddressCandidate, Postcode};
use crate::pipeline::{
    domain::{
        CollectedResults, RunId, RunPhase, SettledRun, SettledRunParams, StatusMap,
        TaskCatalog, TaskDefinition, TaskInput, TaskName, TaskOutcome, TaskStatus,
    },
    ports::SourceTransport,
};
use chrono::{DateTime, Utc};
use futures::future::join_all;
use mockable::Clock;
use std::sync::{Arc, PoisonError, RwLock};
use tokio::sync::watch;
use tracing::{debug, info, warn};

#[derive(Debug)]
struct RunRegistry {
    current: Option<RunId>,
    phase: RunPhase,
    latest: Option<SettledRun>,
}

/// Aggregation orchestrator.
///
/// The orchestrator is the only writer of shared run state. Tasks return
/// outcomes; the orchestrator records them in the tracker under the run's
/// [`RunId`]. Triggering again supersedes the current run: its remaining
/// writes are dropped and its settled record is not published.
pub struct AggregationOrchestrator<T, C>
where
    T: SourceTransport,
    C: Clock + Send + Sync,
{
    catalog: Arc<TaskCatalog>,
    transport: Arc<T>,
    clock: Arc<C>,
    tracker: Arc<StatusTracker>,
    registry: RwLock<RunRegistry>,
}

impl<T, C> AggregationOrchestrator<T, C>
where
    T: SourceTransport,
    C: Clock + Send + Sync,
{
    /// Creates an idle orchestrator.
    #[must_use]
    pub fn new(catalog: Arc<TaskCatalog>, transport: Arc<T>, clock: Arc<C>) -> Self {
        Self {
            catalog,
            transport,
            clock,
            tracker: Arc::new(StatusTracker::new()),
            registry: RwLock::new(RunRegistry {
                current: None,
                phase: RunPhase::Idle,
                latest: None,
            }),
        }
    }

    /// Returns the catalog runs are built from.
    #[must_use]
    pub fn catalog(&self) -> &TaskCatalog {
        &self.catalog
    }

    /// Returns the phase of the current run.
    #[must_use]
    pub fn phase(&self) -> RunPhase {
        self.registry
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .phase
    }

    /// Returns the live status map of the current run.
    #[must_use]
    pub fn statuses(&self) -> StatusMap {
        self.tracker.snapshot()
    }

    /// Subscribes to live status changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<TrackerSnapshot> {
        self.tracker.subscribe()
    }

    /// Returns the most recent settled run that was not superseded.
    #[must_use]
    pub fn latest(&self) -> Option<SettledRun> {
        self.registry
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .latest
            .clone()
    }

    /// Runs the whole pipeline for the selected address.
    ///
    /// Returns `None` without doing anything when `selection` is `None` or
    /// an empty candidate.
    /// Otherwise the run always settles: the prerequisite is awaited, every
    /// remaining task is launched concurrently, and the orchestrator waits
    /// for all of them regardless of individual failures.
    pub async fn trigger(
        &self,
        postcode: &Postcode,
        selection: Option<&AddressCandidate>,
    ) -> Option<SettledRun> {
        let address = selection.filter(|candidate| !candidate.is_empty())?;
        let run_id = RunId::new();
        let started_at = self.clock.utc();
        self.begin(run_id);
        info!(run_id = %run_id, postcode = %postcode, address = %address, "starting fetch run");

        let prerequisite = self.catalog.prerequisite();
        let prerequisite_outcome = self
            .run_task(
                run_id,
                prerequisite,
                &TaskInput {
                    postcode,
                    address,
                    prerequisite: None,
                },
            )
            .await;

        self.advance(run_id, RunPhase::FanOut);
        let input = TaskInput {
            postcode,
            address,
            prerequisite: prerequisite_outcome.payload(),
        };
        let fan_out_outcomes = join_all(
            self.catalog
                .fan_out()
                .iter()
                .map(|definition| self.run_task(run_id, definition, &input)),
        )
        .await;

        let mut outcomes: Vec<(&TaskName, TaskOutcome)> =
            Vec::with_capacity(self.catalog.len());
        outcomes.push((prerequisite.name(), prerequisite_outcome));
        outcomes.extend(
            self.catalog
                .fan_out()
                .iter()
                .map(TaskDefinition::name)
                .zip(fan_out_outcomes),
        );

        let settled = self.settle(run_id, postcode, address, started_at, outcomes);
        Some(settled)
    }

    async fn run_task(
        &self,
        run_id: RunId,
        definition: &TaskDefinition,
        input: &TaskInput<'_>,
    ) -> TaskOutcome {
        let name = definition.name().as_str();
        self.tracker.transition(run_id, name, TaskStatus::Loading);
        let outcome = execute_task(definition, self.transport.as_ref(), input).await;
        match outcome.failure() {
            None => debug!(run_id = %run_id, task = name, kind = %definition.kind(), "task succeeded"),
            Some(failure) => warn!(run_id = %run_id, task = name, error = %failure, "task failed"),
        }
        self.tracker.transition(run_id, name, outcome.status());
        outcome
    }

    fn begin(&self, run_id: RunId) {
        let mut registry = self.registry.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = registry.current.filter(|_| registry.phase.is_in_flight()) {
            info!(run_id = %run_id, superseded = %previous, "superseding in-flight run");
        }
        registry.current = Some(run_id);
        registry.phase = RunPhase::Prerequisite;
        registry.latest = None;
        self.tracker.initialize(run_id, self.catalog.names());
    }

    fn advance(&self, run_id: RunId, next: RunPhase) {
        let mut registry = self.registry.write().unwrap_or_else(PoisonError::into_inner);
        if registry.current != Some(run_id) {
            return;
        }
        match registry.phase.advance_to(next) {
            Ok(phase) => registry.phase = phase,
            Err(error) => warn!(run_id = %run_id, error = %error, "run phase not advanced"),
        }
    }

    fn settle(
        &self,
        run_id: RunId,
        postcode: &Postcode,
        address: &AddressCandidate,
        started_at: DateTime<Utc>,
        outcomes: Vec<(&TaskName, TaskOutcome)>,
    ) -> SettledRun {
        let statuses = StatusMap::from_entries(
            outcomes
                .iter()
                .map(|(name, outcome)| ((*name).clone(), outcome.status())),
        );
        let results = CollectedResults::from_payloads(
            outcomes
                .into_iter()
                .map(|(name, outcome)| (name.clone(), outcome.into_payload())),
        );
        let settled = SettledRun::new(SettledRunParams {
            run_id,
            postcode: postcode.clone(),
            address: address.clone(),
            statuses,
            results,
            started_at,
            settled_at: self.clock.utc(),
        });

        self.advance(run_id, RunPhase::Settled);
        let mut registry = self.registry.write().unwrap_or_else(PoisonError::into_inner);
        if registry.current == Some(run_id) {
            registry.latest = Some(settled.clone());
            info!(
                run_id = %run_id,
                succeeded = settled.succeeded(),
                failed = settled.failed(),
                "fetch run settled"
            );
        } else {
            debug!(run_id = %run_id, "superseded run settled; result discarded");
        }
        settled
    }
}
