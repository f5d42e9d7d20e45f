//! Standard table of UK property data sources.
//!
//! Each entry is data: a name, a request-shaping kind, and a closure that
//! builds the request from the run inputs. Keys are captured when the
//! catalog is built; a missing key is sent empty so the source rejects it,
//! and the rejection is contained by the task like any other failure.

use crate::pipeline::domain::{
    CatalogError, SourceRequest, TaskCatalog, TaskDefinition, TaskInput, TaskName,
};

/// OS Places `find` endpoint.
pub const OS_PLACES_URL: &str = "https://api.os.uk/search/places/v1/find";
/// MapIt postcode endpoint.
pub const MAPIT_URL: &str = "https://mapit.mysociety.org/postcode";
/// Land Registry price paid postcode endpoint.
pub const LAND_REGISTRY_URL: &str = "https://landregistry.data.gov.uk/data/ppd/v1/postcode";
/// Energy performance certificate summary endpoint.
pub const EPC_URL: &str = "https://epc.opendatacommunities.org/api/v1/domestic/dec-summary";
/// Planning entities endpoint.
pub const PLANNING_URL: &str = "https://planning.data.gov.uk/entities.json";
/// Environment Agency flood-monitoring postcode endpoint.
pub const FLOOD_URL: &str = "https://environment.data.gov.uk/flood-monitoring/id/postcodes";
/// Air quality postcode endpoint.
pub const AIR_QUALITY_URL: &str = "https://api.erg.ic.ac.uk/AirQuality/Postcode";
/// Police street-level crime endpoint.
pub const POLICE_URL: &str = "https://data.police.uk/api/crimes-street/all-crime";
/// NHS organisation directory endpoint.
pub const NHS_URL: &str = "https://directory.spineservices.nhs.uk/ORD/2-0-0/organizationalunits";
/// TravelTime time-map endpoint.
pub const TRAVELTIME_URL: &str = "https://api.traveltimeapp.com/v4/time-map";

/// Name of the prerequisite task.
pub const UPRN: TaskName = TaskName::from_static("UPRN");
/// Administrative boundaries.
pub const BOUNDARIES: TaskName = TaskName::from_static("Boundaries");
/// Recorded sale prices.
pub const TRANSACTIONS: TaskName = TaskName::from_static("Transactions");
/// Energy performance certificates.
pub const EPC: TaskName = TaskName::from_static("EPC");
/// Planning entities.
pub const PLANNING: TaskName = TaskName::from_static("Planning");
/// Flood monitoring.
pub const FLOOD: TaskName = TaskName::from_static("Flood");
/// Air quality.
pub const ENVIRONMENT: TaskName = TaskName::from_static("Environment");
/// Strategic noise mapping; no programmatic access.
pub const NOISE: TaskName = TaskName::from_static("Noise");
/// Radon potential; no programmatic access.
pub const RADON: TaskName = TaskName::from_static("Radon");
/// Street-level crime.
pub const CRIME: TaskName = TaskName::from_static("Crime");
/// School catchment; no programmatic access.
pub const SCHOOLS: TaskName = TaskName::from_static("Schools");
/// Health service organisations.
pub const HEALTH: TaskName = TaskName::from_static("Health");
/// Travel time mapping.
pub const TRANSPORT: TaskName = TaskName::from_static("Transport");
/// Nearby amenities; needs coordinates not yet extracted.
pub const AMENITIES: TaskName = TaskName::from_static("Amenities");
/// Census demographics; needs area codes not yet extracted.
pub const DEMOGRAPHICS: TaskName = TaskName::from_static("Demographics");
/// Council tax band; no free programmatic access.
pub const COUNCIL_TAX: TaskName = TaskName::from_static("CouncilTax");

/// Names of the tasks that never touch the network.
pub const STUB_TASKS: [TaskName; 6] = [NOISE, RADON, SCHOOLS, AMENITIES, DEMOGRAPHICS, COUNCIL_TAX];

/// API keys for the authenticated sources.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct SourceKeys {
    /// OS Places key, sent as `key`.
    pub os_places: Option<String>,
    /// EPC key, sent as the basic-auth username.
    pub epc: Option<String>,
    /// Air quality key, sent as `key`.
    pub air_quality: Option<String>,
    /// NHS directory key, sent as `api_key`.
    pub nhs: Option<String>,
    /// TravelTime key, sent as `X-Api-Key`.
    pub traveltime: Option<String>,
}

impl std::fmt::Debug for SourceKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let present = |key: &Option<String>| key.as_ref().map(|_| "<set>");
        f.debug_struct("SourceKeys")
            .field("os_places", &present(&self.os_places))
            .field("epc", &present(&self.epc))
            .field("air_quality", &present(&self.air_quality))
            .field("nhs", &present(&self.nhs))
            .field("traveltime", &present(&self.traveltime))
            .finish()
    }
}

fn key(value: Option<&String>) -> String {
    value.cloned().unwrap_or_default()
}

fn postcode_query(
    base: &'static str,
) -> impl Fn(&TaskInput<'_>) -> SourceRequest + Send + Sync + 'static {
    move |input| SourceRequest::get(base).query("postcode", input.postcode.as_str())
}

/// Builds the standard sixteen-source catalog.
///
/// # Errors
///
/// Returns [`CatalogError`] if the table violates catalog invariants.
pub fn standard_catalog(keys: &SourceKeys) -> Result<TaskCatalog, CatalogError> {
    let os_places_key = key(keys.os_places.as_ref());
    let epc_key = key(keys.epc.as_ref());
    let air_quality_key = key(keys.air_quality.as_ref());
    let nhs_key = key(keys.nhs.as_ref());
    let traveltime_key = key(keys.traveltime.as_ref());

    TaskCatalog::new([
        TaskDefinition::prerequisite(UPRN, move |input| {
            SourceRequest::get(OS_PLACES_URL)
                .query("query", input.address.as_str())
                .query("key", os_places_key.as_str())
        }),
        TaskDefinition::simple_get(BOUNDARIES, |input| {
            SourceRequest::get(MAPIT_URL).segment(input.postcode.as_str())
        }),
        TaskDefinition::simple_get(TRANSACTIONS, |input| {
            SourceRequest::get(LAND_REGISTRY_URL).segment(format!("{}.json", input.postcode))
        }),
        TaskDefinition::header_authenticated_get(EPC, move |input| {
            postcode_query(EPC_URL)(input)
                .header("Accept", "application/json")
                .basic_auth(epc_key.as_str(), None)
        }),
        TaskDefinition::simple_get(PLANNING, postcode_query(PLANNING_URL)),
        TaskDefinition::simple_get(FLOOD, |input| {
            SourceRequest::get(FLOOD_URL).segment(format!("{}.json", input.postcode))
        }),
        TaskDefinition::simple_get(ENVIRONMENT, move |input| {
            postcode_query(AIR_QUALITY_URL)(input).query("key", air_quality_key.as_str())
        }),
        TaskDefinition::stub(NOISE),
        TaskDefinition::stub(RADON),
        TaskDefinition::simple_get(CRIME, postcode_query(POLICE_URL)),
        TaskDefinition::stub(SCHOOLS),
        TaskDefinition::simple_get(HEALTH, move |input| {
            postcode_query(NHS_URL)(input).query("api_key", nhs_key.as_str())
        }),
        TaskDefinition::header_authenticated_get(TRANSPORT, move |input| {
            postcode_query(TRAVELTIME_URL)(input).header("X-Api-Key", traveltime_key.as_str())
        }),
        TaskDefinition::stub(AMENITIES),
        TaskDefinition::stub(DEMOGRAPHICS),
        TaskDefinition::stub(COUNCIL_TAX),
    ])
}
