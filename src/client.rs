//! transport abstraction
//!
//! generated operations only see [`Client`]. [`HttpClient`] is the blocking
//! http implementation shipped with the crate.

use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::graphql::{Request, RequestContext, Response};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use url::Url;

/// capability used by generated operations to send a request
///
/// implementations populate `response` with whatever arrived and report
/// failure through the returned error. generated code hands both back to the
/// caller untouched.
pub trait Client {
    /// transport error
    type Error;

    /// send `request` and populate `response`
    fn make_request<V, T>(
        &self,
        ctx: Option<&RequestContext>,
        request: &Request<'_, V>,
        response: &mut Response<T>,
    ) -> std::result::Result<(), Self::Error>
    where
        V: Serialize,
        T: DeserializeOwned;
}

impl<C: Client> Client for &C {
    type Error = C::Error;

    fn make_request<V, T>(
        &self,
        ctx: Option<&RequestContext>,
        request: &Request<'_, V>,
        response: &mut Response<T>,
    ) -> std::result::Result<(), Self::Error>
    where
        V: Serialize,
        T: DeserializeOwned,
    {
        (**self).make_request(ctx, request, response)
    }
}

/// blocking http transport
#[derive(Clone)]
pub struct HttpClient {
    config: Arc<ClientConfig>,
    http: reqwest::blocking::Client,
}

impl HttpClient {
    /// create a new transport
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;

        let mut headers = HeaderMap::new();
        if let Some(token) = &config.token {
            headers.insert(
                AUTHORIZATION,
                HeaderValue::from_str(&format!("Bearer {token}")).map_err(|err| {
                    Error::Config(format!("invalid api token header value: {err}"))
                })?,
            );
        }
        headers.extend(config.extra_headers.clone());

        let http = reqwest::blocking::Client::builder()
            .default_headers(headers)
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout)
            .danger_accept_invalid_certs(!config.verify_ssl)
            .build()?;

        Ok(Self {
            config: Arc::new(config),
            http,
        })
    }

    /// access the transport configuration
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub(crate) fn make_request_with<V, T, F>(
        &self,
        ctx: Option<&RequestContext>,
        request: &Request<'_, V>,
        response: &mut Response<T>,
        send: F,
    ) -> Result<()>
    where
        V: Serialize,
        T: DeserializeOwned,
        F: FnOnce(Url, HeaderMap, serde_json::Value) -> Result<(StatusCode, String)>,
    {
        let headers = context_headers(ctx)?;
        let body = serde_json::to_value(request)?;
        tracing::debug!(operation = request.operation_name, "sending graphql request");

        let (status, text) = send(self.config.endpoint.clone(), headers, body)?;
        populate_response(status, text, response)
    }
}

impl Client for HttpClient {
    type Error = Error;

    fn make_request<V, T>(
        &self,
        ctx: Option<&RequestContext>,
        request: &Request<'_, V>,
        response: &mut Response<T>,
    ) -> Result<()>
    where
        V: Serialize,
        T: DeserializeOwned,
    {
        self.make_request_with(ctx, request, response, |url, headers, body| {
            let reply = self.http.post(url).headers(headers).json(&body).send()?;
            let status = reply.status();
            let text = reply.text()?;
            Ok((status, text))
        })
    }
}

fn context_headers(ctx: Option<&RequestContext>) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    let Some(ctx) = ctx else {
        return Ok(headers);
    };
    for (name, value) in ctx.headers() {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|err| Error::Config(format!("invalid header name {name}: {err}")))?;
        let value = HeaderValue::from_str(value)
            .map_err(|err| Error::Config(format!("invalid header value for {name}: {err}")))?;
        headers.insert(name, value);
    }
    Ok(headers)
}

/// fill `response` from a raw reply body, then report errors
///
/// the response keeps whatever data was decoded even when an error is
/// returned.
fn populate_response<T: DeserializeOwned>(
    status: StatusCode,
    text: String,
    response: &mut Response<T>,
) -> Result<()> {
    let parsed: Response<T> = match serde_json::from_str(&text) {
        Ok(parsed) => parsed,
        Err(_) if !status.is_success() => {
            return Err(Error::GraphQl {
                status: Some(status.as_u16()),
                errors: Vec::new(),
                body: text,
                message: format!("graphql http error: {}", status),
            });
        }
        Err(err) => return Err(err.into()),
    };
    *response = parsed;

    if response.has_errors() {
        let message = response
            .errors
            .first()
            .map(|err| err.message.clone())
            .unwrap_or_else(|| "graphql error".to_string());
        return Err(Error::GraphQl {
            status: Some(status.as_u16()),
            errors: response.errors.clone(),
            body: text,
            message,
        });
    }

    if !status.is_success() {
        return Err(Error::GraphQl {
            status: Some(status.as_u16()),
            errors: Vec::new(),
            body: text,
            message: format!("graphql http error: {}", status),
        });
    }

    Ok(())
}
