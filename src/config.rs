//! Runtime configuration read from the environment.
//!
//! Every value is optional. Missing API keys are sent empty, so the source
//! rejects the call and the task settles as `error`; the run itself never
//! fails for lack of configuration.

use std::time::Duration;

use thiserror::Error;

use crate::pipeline::sources::SourceKeys;

/// getAddress.io key.
pub const GETADDRESS_API_KEY: &str = "GETADDRESS_API_KEY";
/// OS Places key.
pub const OS_PLACES_API_KEY: &str = "OS_PLACES_API_KEY";
/// EPC register key.
pub const EPC_API_KEY: &str = "EPC_API_KEY";
/// Air quality key.
pub const AIR_QUALITY_API_KEY: &str = "AIR_QUALITY_API_KEY";
/// NHS directory key.
pub const NHS_API_KEY: &str = "NHS_API_KEY";
/// TravelTime key.
pub const TRAVELTIME_API_KEY: &str = "TRAVELTIME_API_KEY";
/// Per-request timeout in whole seconds.
pub const HTTP_TIMEOUT_SECS: &str = "PROPLENS_HTTP_TIMEOUT_SECS";
/// `User-Agent` header override.
pub const USER_AGENT: &str = "PROPLENS_USER_AGENT";

/// Errors raised while reading configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// The timeout was not a positive whole number of seconds.
    #[error("invalid {HTTP_TIMEOUT_SECS} value {value:?}: expected a positive integer")]
    InvalidTimeout {
        /// Raw value as read.
        value: String,
    },
}

/// HTTP client settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpSettings {
    /// Per-request timeout; `None` leaves the client default in place.
    pub timeout: Option<Duration>,
    /// `User-Agent` sent with every request.
    pub user_agent: String,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout: None,
            user_agent: default_user_agent(),
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppConfig {
    /// Key for the address lookup service.
    pub getaddress_key: Option<String>,
    /// Keys for the authenticated data sources.
    pub sources: SourceKeys,
    /// HTTP client settings.
    pub http: HttpSettings,
}

impl AppConfig {
    /// Reads configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidTimeout`] if the timeout is malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads configuration through `lookup`.
    ///
    /// Blank values count as unset.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidTimeout`] if the timeout is malformed.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_owned())
                .filter(|value| !value.is_empty())
        };

        let timeout = read(HTTP_TIMEOUT_SECS)
            .map(|raw| parse_timeout(&raw))
            .transpose()?;

        Ok(Self {
            getaddress_key: read(GETADDRESS_API_KEY),
            sources: SourceKeys {
                os_places: read(OS_PLACES_API_KEY),
                epc: read(EPC_API_KEY),
                air_quality: read(AIR_QUALITY_API_KEY),
                nhs: read(NHS_API_KEY),
                traveltime: read(TRAVELTIME_API_KEY),
            },
            http: HttpSettings {
                timeout,
                user_agent: read(USER_AGENT).unwrap_or_else(default_user_agent),
            },
        })
    }
}

/// Parses a positive number of seconds.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidTimeout`] for zero, negative, or
/// non-numeric input.
pub fn parse_timeout(raw: &str) -> Result<Duration, ConfigError> {
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(ConfigError::InvalidTimeout {
            value: raw.to_owned(),
        }),
    }
}

fn default_user_agent() -> String {
    format!("proplens/{}", env!("CARGO_PKG_VERSION"))
}
