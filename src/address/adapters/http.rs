//! getAddress.io lookup adapter.

use crate::address::{
    domain::{AddressLookupPayload, AddressRecord, Postcode},
    ports::{AddressLookup, AddressLookupError, AddressLookupResult},
};
use async_trait::async_trait;
use reqwest::{Client, Url};

/// Default base URL of the getAddress.io API.
pub const GETADDRESS_BASE_URL: &str = "https://api.getAddress.io";

/// Address lookup backed by the getAddress.io `find` endpoint.
#[derive(Debug, Clone)]
pub struct GetAddressLookup {
    client: Client,
    base_url: String,
    api_key: String,
}

impl GetAddressLookup {
    /// Creates a lookup against the public getAddress.io endpoint.
    ///
    /// A missing key is sent as an empty value and rejected by the source.
    #[must_use]
    pub fn new(client: Client, api_key: Option<String>) -> Self {
        Self::with_base_url(client, GETADDRESS_BASE_URL, api_key)
    }

    /// Creates a lookup against an alternative base URL.
    #[must_use]
    pub fn with_base_url(
        client: Client,
        base_url: impl Into<String>,
        api_key: Option<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            api_key: api_key.unwrap_or_default(),
        }
    }

    /// Builds the `find` URL for a postcode.
    ///
    /// # Errors
    ///
    /// Returns [`AddressLookupError::Transport`] when the base URL cannot
    /// carry path segments.
    pub fn find_url(&self, postcode: &Postcode) -> AddressLookupResult<Url> {
        let mut url = Url::parse(&self.base_url).map_err(AddressLookupError::transport)?;
        url.path_segments_mut()
            .map_err(|()| {
                AddressLookupError::transport(std::io::Error::other(format!(
                    "base URL cannot be a base: {}",
                    self.base_url
                )))
            })?
            .pop_if_empty()
            .push("find")
            .push(postcode.as_str());
        url.query_pairs_mut()
            .append_pair("api-key", &self.api_key)
            .append_pair("expand", "true");
        Ok(url)
    }
}

#[async_trait]
impl AddressLookup for GetAddressLookup {
    async fn find(&self, postcode: &Postcode) -> AddressLookupResult<Vec<AddressRecord>> {
        let url = self.find_url(postcode)?;
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(AddressLookupError::transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(AddressLookupError::Status(status.as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(AddressLookupError::transport)?;
        let payload: AddressLookupPayload = serde_json::from_slice(&body)
            .map_err(|err| AddressLookupError::MalformedPayload(err.to_string()))?;
        Ok(payload.addresses)
    }
}
