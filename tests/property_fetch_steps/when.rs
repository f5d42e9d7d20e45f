//! When steps for property fetch BDD scenarios.

use std::sync::Arc;

use super::world::{PropertyFetchWorld, run_async};
use eyre::WrapErr;
use proplens::{
    address::{domain::Postcode, services::AddressResolutionService},
    session::PropertySession,
};
use rstest_bdd_macros::when;

fn open_session(world: &mut PropertyFetchWorld) -> Result<(), eyre::Report> {
    let raw = world
        .postcode
        .clone()
        .ok_or_else(|| eyre::eyre!("missing postcode in scenario world"))?;
    let postcode = Postcode::new(raw).wrap_err("parse scenario postcode")?;
    let resolver = AddressResolutionService::new(Arc::clone(&world.lookup));
    let session = run_async(PropertySession::open(
        postcode,
        &resolver,
        Arc::clone(&world.orchestrator),
    ));
    world.session = Some(session);
    Ok(())
}

#[when("the address is selected and the run is triggered")]
fn select_and_trigger(world: &mut PropertyFetchWorld) -> Result<(), eyre::Report> {
    open_session(world)?;
    let session = world
        .session
        .as_mut()
        .ok_or_else(|| eyre::eyre!("missing session in scenario world"))?;
    session.select(0).wrap_err("select first candidate")?;
    world.settled = run_async(session.fetch());
    world.triggered = true;
    Ok(())
}

#[when("the run is triggered without a selection")]
fn trigger_without_selection(world: &mut PropertyFetchWorld) -> Result<(), eyre::Report> {
    open_session(world)?;
    let session = world
        .session
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing session in scenario world"))?;
    world.settled = run_async(session.fetch());
    world.triggered = true;
    Ok(())
}
