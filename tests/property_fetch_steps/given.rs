//! Given steps for property fetch BDD scenarios.

use super::world::PropertyFetchWorld;
use eyre::WrapErr;
use proplens::{
    address::domain::{AddressRecord, Postcode},
    pipeline::{
        adapters::memory::ScriptedReply, ports::SourceTransportError, sources::OS_PLACES_URL,
    },
};
use rstest_bdd_macros::given;
use serde_json::json;

#[given(r#"the postcode "{postcode}" resolves to the address "{address}""#)]
fn postcode_resolves_to_address(
    world: &mut PropertyFetchWorld,
    postcode: String,
    address: String,
) -> Result<(), eyre::Report> {
    let parsed = Postcode::new(&postcode).wrap_err("parse scenario postcode")?;
    world.lookup.insert(
        parsed,
        vec![AddressRecord {
            line_1: Some(address),
            ..AddressRecord::default()
        }],
    );
    world.postcode = Some(postcode);
    Ok(())
}

#[given("the prerequisite source times out")]
fn prerequisite_times_out(world: &mut PropertyFetchWorld) {
    world
        .transport
        .route(OS_PLACES_URL, ScriptedReply::err(SourceTransportError::Timeout));
}

#[given("every other source succeeds")]
fn every_other_source_succeeds(world: &mut PropertyFetchWorld) {
    world
        .transport
        .set_fallback(ScriptedReply::ok(json!({"status": "ok"})));
}

#[given("every network source is unreachable")]
fn every_network_source_unreachable(world: &mut PropertyFetchWorld) {
    world
        .transport
        .set_fallback(ScriptedReply::err(SourceTransportError::transport(
            std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "network unreachable"),
        )));
}
