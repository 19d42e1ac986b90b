//! transport configuration
//!
//! build a [`ClientConfig`] with the graphql endpoint and optional overrides,
//! then pass it to [`crate::HttpClient::new`].

use crate::error::{Error, Result};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use std::time::Duration;
use url::Url;

/// configuration for the blocking http transport
#[derive(Clone)]
pub struct ClientConfig {
    /// original endpoint input
    pub(crate) raw_endpoint: String,

    /// graphql endpoint (e.g., "<https://api.example.com/graphql>")
    pub(crate) endpoint: Url,

    /// whether the provided endpoint parsed successfully
    pub(crate) endpoint_valid: bool,

    /// bearer token sent as `Authorization`
    pub(crate) token: Option<String>,

    /// request timeout duration
    pub(crate) timeout: Duration,

    /// user agent string
    pub(crate) user_agent: String,

    /// whether to verify ssl certificates
    pub(crate) verify_ssl: bool,

    /// additional headers to send with every request
    pub(crate) extra_headers: HeaderMap,
}

impl ClientConfig {
    /// create a new transport configuration
    ///
    /// # arguments
    ///
    /// * `endpoint` - full url of the graphql endpoint
    ///
    /// # example
    ///
    /// ```
    /// use gqlbind::ClientConfig;
    ///
    /// let config = ClientConfig::new("https://api.example.com/graphql");
    /// ```
    pub fn new(endpoint: impl AsRef<str>) -> Self {
        let raw = endpoint.as_ref();

        let (endpoint, endpoint_valid) = match Url::parse(raw)
            .or_else(|_| Url::parse(&format!("https://{}", raw)))
        {
            Ok(url) => (url, true),
            Err(_) => (Url::parse("https://invalid.invalid").unwrap(), false),
        };

        Self {
            raw_endpoint: raw.to_string(),
            endpoint,
            endpoint_valid,
            token: None,
            timeout: Duration::from_secs(30),
            user_agent: format!("gqlbind/{} (Rust)", env!("CARGO_PKG_VERSION")),
            verify_ssl: true,
            extra_headers: HeaderMap::new(),
        }
    }

    /// send `Authorization: Bearer <token>` with every request
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// set the request timeout
    ///
    /// default: 30 seconds
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// set a custom user agent string
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// disable ssl certificate verification (not recommended for production)
    ///
    /// default: enabled
    pub fn with_ssl_verification(mut self, verify: bool) -> Self {
        self.verify_ssl = verify;
        self
    }

    /// add a header to every request
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.extra_headers.insert(name, value);
        self
    }

    /// add a set of headers to every request
    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.extra_headers.extend(headers);
        self
    }

    /// access extra headers configured on this transport
    pub fn extra_headers(&self) -> &HeaderMap {
        &self.extra_headers
    }

    /// graphql endpoint requests are posted to
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// validate the configuration
    pub(crate) fn validate(&self) -> Result<()> {
        if !self.endpoint_valid {
            return Err(Error::Config(format!(
                "invalid endpoint: {}",
                self.raw_endpoint
            )));
        }

        if self.endpoint.scheme() != "http" && self.endpoint.scheme() != "https" {
            return Err(Error::Config(format!(
                "invalid url scheme: {}. must be http or https",
                self.endpoint.scheme()
            )));
        }

        if matches!(&self.token, Some(token) if token.is_empty()) {
            return Err(Error::Config("api token cannot be empty".to_string()));
        }

        Ok(())
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("endpoint", &self.endpoint)
            .field("timeout", &self.timeout)
            .field("user_agent", &self.user_agent)
            .field("verify_ssl", &self.verify_ssl)
            .field("extra_headers", &self.extra_headers.len())
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}
