//! `proplens` command-line entry point.
//!
//! ```text
//! proplens <POSTCODE>                 list address candidates
//! proplens <POSTCODE> --select N      fetch every source for candidate N
//! proplens <POSTCODE> --select N --json
//! ```
//!
//! Logs go to stderr; rendered output and JSON go to stdout.

use std::io::{self, Write};
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use eyre::{Result, WrapErr, eyre};
use mockable::DefaultClock;
use proplens::{
    address::{
        adapters::http::GetAddressLookup, domain::Postcode, services::AddressResolutionService,
    },
    config::{AppConfig, HTTP_TIMEOUT_SECS, HttpSettings, parse_timeout},
    pipeline::{
        adapters::http::ReqwestSourceTransport,
        domain::StatusMap,
        services::{AggregationOrchestrator, TrackerSnapshot},
        sources::standard_catalog,
    },
    render::Renderer,
    session::PropertySession,
};
use reqwest::Client;
use tokio::sync::watch;
use tracing::info;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "proplens=info";

#[derive(Debug, Parser)]
#[command(
    name = "proplens",
    version,
    about = "Gather public data about a UK property from its postcode"
)]
struct Cli {
    /// UK postcode, e.g. "SK9 5AE".
    postcode: String,

    /// One-based number of the address to fetch data for.
    #[arg(long, short)]
    select: Option<NonZeroUsize>,

    /// Print the settled run as JSON instead of text.
    #[arg(long)]
    json: bool,

    /// Per-request timeout in seconds.
    #[arg(long, env = HTTP_TIMEOUT_SECS, value_parser = parse_timeout)]
    timeout_secs: Option<Duration>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_writer(io::stderr)
        .init();

    let mut config = AppConfig::from_env().wrap_err("invalid configuration")?;
    if cli.timeout_secs.is_some() {
        config.http.timeout = cli.timeout_secs;
    }
    let client = http_client(&config.http).wrap_err("failed to build HTTP client")?;

    let postcode = Postcode::new(&cli.postcode)?;
    let resolver = AddressResolutionService::new(Arc::new(GetAddressLookup::new(
        client.clone(),
        config.getaddress_key.clone(),
    )));
    let catalog = standard_catalog(&config.sources)?;
    let orchestrator = Arc::new(AggregationOrchestrator::new(
        Arc::new(catalog),
        Arc::new(ReqwestSourceTransport::new(client)),
        Arc::new(DefaultClock),
    ));
    let renderer = Renderer::new()?;

    let mut session = PropertySession::open(postcode, &resolver, orchestrator).await;
    let Some(choice) = cli.select else {
        let listing = renderer.candidates(session.postcode(), session.candidates())?;
        io::stdout().lock().write_all(listing.as_bytes())?;
        return Ok(());
    };
    let address = session.select(choice.get().saturating_sub(1))?.clone();
    info!(address = %address, "selected address");

    let watcher = tokio::spawn(log_progress(session.subscribe()));
    let settled = session
        .fetch()
        .await
        .ok_or_else(|| eyre!("no address selected"))?;
    watcher.abort();

    let mut stdout = io::stdout().lock();
    if cli.json {
        serde_json::to_writer_pretty(&mut stdout, &settled)?;
        writeln!(stdout)?;
    } else {
        write!(stdout, "{}", renderer.status_panel(settled.statuses())?)?;
        writeln!(stdout)?;
        write!(stdout, "{}", renderer.result_cards(settled.results())?)?;
    }
    stdout.flush()?;
    Ok(())
}

/// Builds the shared client; without a configured timeout the client's own
/// default applies.
fn http_client(settings: &HttpSettings) -> reqwest::Result<Client> {
    let builder = Client::builder().user_agent(settings.user_agent.as_str());
    let configured = match settings.timeout {
        Some(timeout) => builder.timeout(timeout),
        None => builder,
    };
    configured.build()
}

/// Logs each status change as it is published.
async fn log_progress(mut receiver: watch::Receiver<TrackerSnapshot>) {
    let mut seen = StatusMap::default();
    while receiver.changed().await.is_ok() {
        let snapshot = receiver.borrow_and_update().clone();
        for (name, status) in snapshot.statuses.iter() {
            if seen.get(name.as_str()) != Some(status) {
                info!(task = %name, status = %status, "status changed");
            }
        }
        seen = snapshot.statuses;
    }
}
