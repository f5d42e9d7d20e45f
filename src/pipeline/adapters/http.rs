//! `reqwest` source transport.

use crate::pipeline::{
    domain::SourceRequest,
    ports::{SourceTransport, SourceTransportError, SourceTransportResult},
};
use async_trait::async_trait;
use reqwest::{Client, Request, Url};
use serde_json::Value;

/// Source transport backed by a shared `reqwest` client.
///
/// Timeouts are whatever the client was built with; the transport adds none.
#[derive(Debug, Clone)]
pub struct ReqwestSourceTransport {
    client: Client,
}

impl ReqwestSourceTransport {
    /// Creates a transport over `client`.
    #[must_use]
    pub const fn new(client: Client) -> Self {
        Self { client }
    }

    /// Translates a request descriptor into an HTTP request.
    ///
    /// # Errors
    ///
    /// Returns [`SourceTransportError::InvalidRequest`] when the base URL is
    /// unusable or a header name or value is invalid.
    pub fn build(&self, request: &SourceRequest) -> SourceTransportResult<Request> {
        let url = request_url(request)?;
        let mut builder = self.client.get(url);
        for (name, value) in request.headers() {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(credentials) = request.credentials() {
            builder = builder.basic_auth(credentials.username(), credentials.password());
        }
        builder
            .build()
            .map_err(|err| SourceTransportError::InvalidRequest(err.to_string()))
    }
}

fn request_url(request: &SourceRequest) -> SourceTransportResult<Url> {
    let mut url = Url::parse(request.base_url())
        .map_err(|err| SourceTransportError::InvalidRequest(err.to_string()))?;
    if !request.path_segments().is_empty() {
        url.path_segments_mut()
            .map_err(|()| {
                SourceTransportError::InvalidRequest(format!(
                    "base URL cannot carry path segments: {}",
                    request.base_url()
                ))
            })?
            .pop_if_empty()
            .extend(request.path_segments());
    }
    if !request.query_pairs().is_empty() {
        url.query_pairs_mut().extend_pairs(request.query_pairs());
    }
    Ok(url)
}

fn classify(err: reqwest::Error) -> SourceTransportError {
    if err.is_timeout() {
        SourceTransportError::Timeout
    } else if err.is_builder() {
        SourceTransportError::InvalidRequest(err.to_string())
    } else {
        SourceTransportError::transport(err)
    }
}

#[async_trait]
impl SourceTransport for ReqwestSourceTransport {
    async fn fetch(&self, request: &SourceRequest) -> SourceTransportResult<Value> {
        let http_request = self.build(request)?;
        let response = self.client.execute(http_request).await.map_err(classify)?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceTransportError::Status(status.as_u16()));
        }

        let body = response.bytes().await.map_err(classify)?;
        serde_json::from_slice(&body)
            .map_err(|err| SourceTransportError::MalformedBody(err.to_string()))
    }
}
