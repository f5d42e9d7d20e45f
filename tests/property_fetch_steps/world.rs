//! Shared world state for property fetch BDD scenarios.

use std::sync::Arc;

use mockable::DefaultClock;
use proplens::{
    address::adapters::memory::InMemoryAddressLookup,
    pipeline::{
        adapters::memory::InMemorySourceTransport,
        domain::SettledRun,
        services::AggregationOrchestrator,
        sources::{SourceKeys, standard_catalog},
    },
    session::PropertySession,
};
use rstest::fixture;

/// Orchestrator type used by the BDD world.
pub type TestOrchestrator = AggregationOrchestrator<InMemorySourceTransport, DefaultClock>;

/// Session type used by the BDD world.
pub type TestSession = PropertySession<InMemorySourceTransport, DefaultClock>;

/// Scenario world for property fetch behaviour tests.
pub struct PropertyFetchWorld {
    pub lookup: Arc<InMemoryAddressLookup>,
    pub transport: Arc<InMemorySourceTransport>,
    pub orchestrator: Arc<TestOrchestrator>,
    pub postcode: Option<String>,
    pub session: Option<TestSession>,
    pub settled: Option<SettledRun>,
    pub triggered: bool,
}

impl PropertyFetchWorld {
    /// Creates a world over the standard catalog with no routes.
    ///
    /// # Panics
    ///
    /// Panics if the standard catalog is invalid.
    #[must_use]
    pub fn new() -> Self {
        let transport = Arc::new(InMemorySourceTransport::new());
        let catalog = standard_catalog(&SourceKeys::default()).expect("standard catalog is valid");
        let orchestrator = Arc::new(AggregationOrchestrator::new(
            Arc::new(catalog),
            Arc::clone(&transport),
            Arc::new(DefaultClock),
        ));

        Self {
            lookup: Arc::new(InMemoryAddressLookup::new()),
            transport,
            orchestrator,
            postcode: None,
            session: None,
            settled: None,
            triggered: false,
        }
    }
}

impl Default for PropertyFetchWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> PropertyFetchWorld {
    PropertyFetchWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
