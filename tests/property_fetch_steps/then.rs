//! Then steps for property fetch BDD scenarios.

use super::world::PropertyFetchWorld;
use proplens::pipeline::{
    domain::{SettledRun, TaskStatus},
    sources::STUB_TASKS,
};
use rstest_bdd_macros::then;
use serde_json::json;

fn settled(world: &PropertyFetchWorld) -> Result<&SettledRun, eyre::Report> {
    world
        .settled
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing settled run in scenario world"))
}

fn parse_status(raw: &str) -> Result<TaskStatus, eyre::Report> {
    TaskStatus::try_from(raw).map_err(|err| eyre::eyre!("invalid status in scenario: {err}"))
}

#[then(r#"the status of "{task}" is "{status}""#)]
fn status_of_task_is(
    world: &PropertyFetchWorld,
    task: String,
    status: String,
) -> Result<(), eyre::Report> {
    let expected = parse_status(&status)?;
    let actual = settled(world)?.statuses().get(&task);
    if actual != Some(expected) {
        return Err(eyre::eyre!("expected {task} to be {expected}, found {actual:?}"));
    }
    Ok(())
}

#[then(r#"{count:usize} tasks have status "{status}""#)]
fn tasks_have_status(
    world: &PropertyFetchWorld,
    count: usize,
    status: String,
) -> Result<(), eyre::Report> {
    let expected = parse_status(&status)?;
    let actual = settled(world)?.statuses().count(expected);
    if actual != count {
        return Err(eyre::eyre!("expected {count} tasks {expected}, found {actual}"));
    }
    Ok(())
}

#[then("the results hold {count:usize} entries")]
fn results_hold_entries(world: &PropertyFetchWorld, count: usize) -> Result<(), eyre::Report> {
    let actual = settled(world)?.results().len();
    if actual != count {
        return Err(eyre::eyre!("expected {count} results, found {actual}"));
    }
    Ok(())
}

#[then(r#"the results have no "{task}" entry"#)]
fn results_have_no_entry(world: &PropertyFetchWorld, task: String) -> Result<(), eyre::Report> {
    if settled(world)?.results().contains(&task) {
        return Err(eyre::eyre!("expected no result for {task}"));
    }
    Ok(())
}

#[then(r#"every stub task has status "success" with an empty result"#)]
fn stub_tasks_succeed_empty(world: &PropertyFetchWorld) -> Result<(), eyre::Report> {
    let run = settled(world)?;
    let empty = json!({});
    for stub in &STUB_TASKS {
        let status = run.statuses().get(stub.as_str());
        if status != Some(TaskStatus::Success) {
            return Err(eyre::eyre!("expected stub {stub} to succeed, found {status:?}"));
        }
        if run.results().get(stub.as_str()) != Some(&empty) {
            return Err(eyre::eyre!("expected an empty result for stub {stub}"));
        }
    }
    Ok(())
}

#[then("exactly {count:usize} requests were sent")]
fn requests_were_sent(world: &PropertyFetchWorld, count: usize) -> Result<(), eyre::Report> {
    let actual = world.transport.request_count();
    if actual != count {
        return Err(eyre::eyre!("expected {count} requests, found {actual}"));
    }
    Ok(())
}

#[then("no run settles")]
fn no_run_settles(world: &PropertyFetchWorld) -> Result<(), eyre::Report> {
    if !world.triggered {
        return Err(eyre::eyre!("the run was never triggered"));
    }
    if world.settled.is_some() || world.orchestrator.latest().is_some() {
        return Err(eyre::eyre!("expected no settled run"));
    }
    Ok(())
}
