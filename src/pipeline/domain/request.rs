//! Transport-neutral description of one source request.

use std::fmt;

/// HTTP basic credentials.
#[derive(Clone, PartialEq, Eq)]
pub struct BasicCredentials {
    username: String,
    password: Option<String>,
}

impl BasicCredentials {
    /// Creates credentials from a username and optional password.
    #[must_use]
    pub fn new(username: impl Into<String>, password: Option<String>) -> Self {
        Self {
            username: username.into(),
            password,
        }
    }

    /// Returns the username.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Returns the password, if any.
    #[must_use]
    pub fn password(&self) -> Option<&str> {
        self.password.as_deref()
    }
}

impl fmt::Debug for BasicCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasicCredentials")
            .field("username", &"<redacted>")
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// GET request against one data source.
///
/// Path segments and query values are stored unencoded; the transport
/// adapter applies percent-encoding when it builds the URL.
#[derive(Clone, PartialEq, Eq)]
pub struct SourceRequest {
    base_url: String,
    path_segments: Vec<String>,
    query: Vec<(String, String)>,
    headers: Vec<(String, String)>,
    basic_auth: Option<BasicCredentials>,
}

impl SourceRequest {
    /// Starts a GET request against `base_url`.
    ///
    /// `base_url` may already contain a path; segments are appended to it.
    #[must_use]
    pub fn get(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            path_segments: Vec::new(),
            query: Vec::new(),
            headers: Vec::new(),
            basic_auth: None,
        }
    }

    /// Appends one path segment.
    #[must_use]
    pub fn segment(mut self, segment: impl Into<String>) -> Self {
        self.path_segments.push(segment.into());
        self
    }

    /// Appends one query parameter.
    #[must_use]
    pub fn query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((name.into(), value.into()));
        self
    }

    /// Adds one request header.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Sets HTTP basic credentials.
    #[must_use]
    pub fn basic_auth(mut self, username: impl Into<String>, password: Option<String>) -> Self {
        self.basic_auth = Some(BasicCredentials::new(username, password));
        self
    }

    /// Returns the base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the unencoded path segments.
    #[must_use]
    pub fn path_segments(&self) -> &[String] {
        &self.path_segments
    }

    /// Returns the unencoded query parameters in insertion order.
    #[must_use]
    pub fn query_pairs(&self) -> &[(String, String)] {
        &self.query
    }

    /// Returns the value of the first query parameter called `name`.
    #[must_use]
    pub fn query_value(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Returns the request headers.
    #[must_use]
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// Returns the value of the first header called `name`, ignoring case.
    #[must_use]
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Returns the basic credentials, if any.
    #[must_use]
    pub const fn credentials(&self) -> Option<&BasicCredentials> {
        self.basic_auth.as_ref()
    }

    /// Returns `true` when the request carries headers or basic credentials.
    #[must_use]
    pub const fn is_header_authenticated(&self) -> bool {
        !self.headers.is_empty() || self.basic_auth.is_some()
    }
}

// Query values and headers routinely carry API keys, so only their names
// are printed.
impl fmt::Debug for SourceRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let query: Vec<&str> = self.query.iter().map(|(name, _)| name.as_str()).collect();
        let headers: Vec<&str> = self.headers.iter().map(|(name, _)| name.as_str()).collect();
        f.debug_struct("SourceRequest")
            .field("base_url", &self.base_url)
            .field("path_segments", &self.path_segments)
            .field("query", &query)
            .field("headers", &headers)
            .field("basic_auth", &self.basic_auth)
            .finish()
    }
}
