//! Tests for run orchestration.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use super::fixtures::{TestOrchestrator, address, catalog, orchestrator, postcode, transport};
use crate::address::domain::{AddressCandidate, AddressRecord, Postcode};
use crate::pipeline::{
    adapters::memory::{InMemorySourceTransport, ScriptedReply},
    domain::{RunPhase, SourceRequest, TaskCatalog, TaskDefinition, TaskName, TaskStatus},
    ports::SourceTransportError,
    services::AggregationOrchestrator,
    sources::{self, FLOOD_URL, OS_PLACES_URL, POLICE_URL, STUB_TASKS, UPRN},
};
use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;
use rstest::rstest;
use serde_json::{Value, json};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn trigger_without_selection_is_a_no_op(
    catalog: Arc<TaskCatalog>,
    transport: Arc<InMemorySourceTransport>,
) {
    let orchestrator = orchestrator(catalog, Arc::clone(&transport));

    let settled = orchestrator.trigger(&postcode(), None).await;

    assert!(settled.is_none());
    assert_eq!(orchestrator.phase(), RunPhase::Idle);
    assert!(orchestrator.statuses().is_empty());
    assert_eq!(transport.request_count(), 0);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn successful_run_reports_every_task(
    catalog: Arc<TaskCatalog>,
    transport: Arc<InMemorySourceTransport>,
) {
    let orchestrator = orchestrator(catalog, transport);

    let settled = orchestrator
        .trigger(&postcode(), Some(&address()))
        .await
        .expect("selection present");

    assert_eq!(settled.statuses().len(), 16);
    assert_eq!(settled.succeeded(), 16);
    assert_eq!(settled.results().len(), 16);
    assert_eq!(orchestrator.phase(), RunPhase::Settled);
    assert_eq!(orchestrator.statuses(), *settled.statuses());
    assert_eq!(orchestrator.latest(), Some(settled));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn prerequisite_timeout_does_not_block_fan_out(
    catalog: Arc<TaskCatalog>,
    transport: Arc<InMemorySourceTransport>,
) {
    transport.route(OS_PLACES_URL, ScriptedReply::err(SourceTransportError::Timeout));
    let orchestrator = orchestrator(catalog, Arc::clone(&transport));

    let settled = orchestrator
        .trigger(&postcode(), Some(&address()))
        .await
        .expect("selection present");

    let statuses = settled.statuses();
    assert_eq!(statuses.get("UPRN"), Some(TaskStatus::Error));
    assert_eq!(statuses.count(TaskStatus::Error), 1);
    assert_eq!(statuses.count(TaskStatus::Success), 15);
    assert!(!settled.results().contains("UPRN"));
    assert_eq!(settled.results().len(), 15);
    assert_eq!(transport.request_count(), 10);
    let first_request = transport.requests().into_iter().next().expect("prerequisite sent");
    assert_eq!(first_request.base_url(), OS_PLACES_URL);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn failures_are_isolated_per_task(
    catalog: Arc<TaskCatalog>,
    transport: Arc<InMemorySourceTransport>,
) {
    transport.route(FLOOD_URL, ScriptedReply::err(SourceTransportError::Status(500)));
    transport.route(
        POLICE_URL,
        ScriptedReply::err(SourceTransportError::MalformedBody("eof".to_owned())),
    );
    let orchestrator = orchestrator(catalog, transport);

    let settled = orchestrator
        .trigger(&postcode(), Some(&address()))
        .await
        .expect("selection present");

    let statuses = settled.statuses();
    assert!(statuses.is_settled());
    assert_eq!(statuses.get("Flood"), Some(TaskStatus::Error));
    assert_eq!(statuses.get("Crime"), Some(TaskStatus::Error));
    assert_eq!(statuses.get("UPRN"), Some(TaskStatus::Success));
    assert_eq!(settled.failed(), 2);
    assert_eq!(settled.results().len(), 14);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn stub_tasks_never_reach_the_transport(
    catalog: Arc<TaskCatalog>,
    transport: Arc<InMemorySourceTransport>,
) {
    let orchestrator = orchestrator(catalog, Arc::clone(&transport));

    let settled = orchestrator
        .trigger(&postcode(), Some(&address()))
        .await
        .expect("selection present");

    for stub in &STUB_TASKS {
        assert_eq!(settled.statuses().get(stub.as_str()), Some(TaskStatus::Success));
        assert_eq!(settled.results().get(stub.as_str()), Some(&json!({})));
    }
    assert_eq!(transport.request_count(), 16 - STUB_TASKS.len());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn fan_out_tasks_run_concurrently(catalog: Arc<TaskCatalog>) {
    let delay = Duration::from_millis(200);
    let transport = Arc::new(
        InMemorySourceTransport::new().with_fallback(ScriptedReply::ok(json!({})).after(delay)),
    );
    let orchestrator = orchestrator(catalog, transport);
    let started = Instant::now();

    orchestrator
        .trigger(&postcode(), Some(&address()))
        .await
        .expect("selection present");

    // One prerequisite wait plus one fan-out wait; serial would take ten.
    assert!(started.elapsed() < delay * 5);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn prerequisite_payload_reaches_fan_out_builders() {
    let seen: Arc<Mutex<Vec<Option<Value>>>> = Arc::default();
    let recorder = Arc::clone(&seen);
    let catalog = TaskCatalog::new([
        TaskDefinition::prerequisite(TaskName::from_static("Lookup"), |_| {
            SourceRequest::get("https://lookup.test")
        }),
        TaskDefinition::simple_get(TaskName::from_static("Detail"), move |input| {
            recorder
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(input.prerequisite.cloned());
            SourceRequest::get("https://detail.test")
        }),
    ])
    .expect("valid catalog");
    let transport = Arc::new(InMemorySourceTransport::new());
    transport.route("https://lookup.test", ScriptedReply::ok(json!({"uprn": 42})));
    transport.route("https://detail.test", ScriptedReply::ok(json!({})));
    let orchestrator = orchestrator(Arc::new(catalog), transport);

    orchestrator
        .trigger(&postcode(), Some(&address()))
        .await
        .expect("selection present");

    let recorded = seen.lock().unwrap_or_else(PoisonError::into_inner);
    assert_eq!(*recorded, vec![Some(json!({"uprn": 42}))]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn repeated_triggers_settle_identically(
    catalog: Arc<TaskCatalog>,
    transport: Arc<InMemorySourceTransport>,
) {
    transport.route(FLOOD_URL, ScriptedReply::err(SourceTransportError::Timeout));
    let orchestrator = orchestrator(catalog, transport);
    let (postcode, address) = (postcode(), address());

    let first = orchestrator
        .trigger(&postcode, Some(&address))
        .await
        .expect("selection present");
    let second = orchestrator
        .trigger(&postcode, Some(&address))
        .await
        .expect("selection present");

    assert_ne!(first.run_id(), second.run_id());
    assert_eq!(first.statuses(), second.statuses());
    assert_eq!(first.results(), second.results());
    assert_eq!(orchestrator.latest(), Some(second));
}

/// Catalog whose fan-out URL carries the postcode, so each run can be
/// scripted separately.
fn per_postcode_catalog() -> Arc<TaskCatalog> {
    let catalog = TaskCatalog::new([
        TaskDefinition::prerequisite(TaskName::from_static("Lookup"), |_| {
            SourceRequest::get("https://lookup.test")
        }),
        TaskDefinition::simple_get(TaskName::from_static("Detail"), |input| {
            SourceRequest::get(format!("https://detail.test/{}", input.postcode.as_str()))
        }),
    ])
    .expect("valid catalog");
    Arc::new(catalog)
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn new_trigger_supersedes_in_flight_run() {
    let transport = Arc::new(InMemorySourceTransport::new());
    transport.route("https://lookup.test", ScriptedReply::ok(json!({})));
    transport.route(
        "https://detail.test/AA1 1AA",
        ScriptedReply::err(SourceTransportError::Status(500)).after(Duration::from_millis(300)),
    );
    transport.route(
        "https://detail.test/BB2 2BB",
        ScriptedReply::ok(json!({"run": "second"})),
    );
    let orchestrator: Arc<TestOrchestrator> =
        Arc::new(orchestrator(per_postcode_catalog(), Arc::clone(&transport)));
    let stale_postcode = Postcode::new("AA1 1AA").expect("valid postcode");
    let fresh_postcode = Postcode::new("BB2 2BB").expect("valid postcode");

    let background = Arc::clone(&orchestrator);
    let first_run = tokio::spawn(async move {
        background.trigger(&stale_postcode, Some(&address())).await
    });
    tokio::time::sleep(Duration::from_millis(50)).await;
    let second = orchestrator
        .trigger(&fresh_postcode, Some(&address()))
        .await
        .expect("selection present");
    let first = first_run
        .await
        .expect("first run joins")
        .expect("selection present");

    assert_eq!(first.statuses().get("Detail"), Some(TaskStatus::Error));
    assert_eq!(second.statuses().get("Detail"), Some(TaskStatus::Success));

    let snapshot = orchestrator.subscribe().borrow().clone();
    assert_eq!(snapshot.run_id, Some(second.run_id()));
    assert_eq!(snapshot.statuses.get("Detail"), Some(TaskStatus::Success));
    assert_eq!(orchestrator.statuses(), *second.statuses());
    assert_eq!(orchestrator.phase(), RunPhase::Settled);

    let latest = orchestrator.latest().expect("second run published");
    assert_eq!(latest.run_id(), second.run_id());
    assert_eq!(latest.postcode().as_str(), "BB2 2BB");
    assert_eq!(latest.results().get("Detail"), Some(&json!({"run": "second"})));

    let detail_urls: Vec<String> = transport
        .requests()
        .iter()
        .map(|request| request.base_url().to_owned())
        .filter(|url| url.starts_with("https://detail.test"))
        .collect();
    assert_eq!(
        detail_urls,
        ["https://detail.test/AA1 1AA", "https://detail.test/BB2 2BB"]
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn trigger_with_empty_candidate_is_a_no_op(
    catalog: Arc<TaskCatalog>,
    transport: Arc<InMemorySourceTransport>,
) {
    let orchestrator = orchestrator(catalog, Arc::clone(&transport));
    let empty = AddressCandidate::from_record(&AddressRecord::default());

    let settled = orchestrator.trigger(&postcode(), Some(&empty)).await;

    assert!(settled.is_none());
    assert_eq!(orchestrator.phase(), RunPhase::Idle);
    assert!(orchestrator.latest().is_none());
    assert_eq!(transport.request_count(), 0);
}

struct FixedClock(DateTime<Utc>);

impl Clock for FixedClock {
    fn local(&self) -> DateTime<Local> {
        self.0.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.0
    }
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn settled_run_is_stamped_by_the_clock(
    catalog: Arc<TaskCatalog>,
    transport: Arc<InMemorySourceTransport>,
) {
    let instant = Utc
        .with_ymd_and_hms(2024, 5, 1, 12, 0, 0)
        .single()
        .expect("valid timestamp");
    let orchestrator =
        AggregationOrchestrator::new(catalog, transport, Arc::new(FixedClock(instant)));

    let settled = orchestrator
        .trigger(&postcode(), Some(&address()))
        .await
        .expect("selection present");

    assert_eq!(settled.started_at(), instant);
    assert_eq!(settled.settled_at(), instant);
    assert!(settled.started_at() <= settled.settled_at());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn settled_run_never_settles_before_it_starts(
    catalog: Arc<TaskCatalog>,
    transport: Arc<InMemorySourceTransport>,
) {
    let orchestrator = orchestrator(catalog, transport);

    let settled = orchestrator
        .trigger(&postcode(), Some(&address()))
        .await
        .expect("selection present");

    assert!(settled.started_at() <= settled.settled_at());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn subscribers_observe_the_settled_map(
    catalog: Arc<TaskCatalog>,
    transport: Arc<InMemorySourceTransport>,
) {
    let orchestrator = orchestrator(catalog, transport);
    let mut receiver = orchestrator.subscribe();

    let settled = orchestrator
        .trigger(&postcode(), Some(&address()))
        .await
        .expect("selection present");

    assert!(receiver.has_changed().expect("tracker alive"));
    let snapshot = receiver.borrow_and_update().clone();
    assert_eq!(snapshot.run_id, Some(settled.run_id()));
    assert_eq!(snapshot.statuses.get(UPRN.as_str()), Some(TaskStatus::Success));
    assert!(snapshot.statuses.is_settled());
    assert!(sources::STUB_TASKS.iter().all(|name| snapshot.statuses.get(name.as_str()).is_some()));
}
