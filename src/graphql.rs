//! graphql wire types
//!
//! request and response envelopes shared by generated operations and
//! transports.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// request built by a generated operation function
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Request<'a, V> {
    /// operation name, sent as `operationName`
    pub operation_name: &'a str,
    /// verbatim operation text
    pub query: &'a str,
    /// variables payload
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variables: Option<V>,
}

/// graphql response envelope populated by a transport
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Response<T> {
    /// response data or null if the request failed entirely
    pub data: Option<T>,
    /// graphql errors array
    #[serde(default)]
    pub errors: Vec<GraphQlError>,
    /// optional extensions payload
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<serde_json::Value>,
}

impl<T> Default for Response<T> {
    fn default() -> Self {
        Self {
            data: None,
            errors: Vec::new(),
            extensions: None,
        }
    }
}

impl<T> Response<T> {
    /// true if the response contains graphql errors
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// graphql error entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphQlError {
    /// error message
    pub message: String,
    /// error locations in the query
    #[serde(default)]
    pub locations: Vec<GraphQlLocation>,
    /// response path
    #[serde(default)]
    pub path: Vec<serde_json::Value>,
    /// optional extensions payload
    #[serde(default)]
    pub extensions: Option<serde_json::Value>,
}

/// graphql error location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphQlLocation {
    /// line number (1-based)
    pub line: i64,
    /// column number (1-based)
    pub column: i64,
}

/// per-call invocation context handed to a transport
///
/// generated operations pass `None`; callers that drive a transport directly
/// can attach extra headers here.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestContext {
    headers: BTreeMap<String, String>,
}

impl RequestContext {
    /// empty context
    pub fn new() -> Self {
        Self::default()
    }

    /// add a header sent with this call only
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// headers attached to this call
    pub fn headers(&self) -> &BTreeMap<String, String> {
        &self.headers
    }
}

/// value of a custom scalar with no configured binding
///
/// the payload is kept as received so it can be passed back unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Opaque(serde_json::Value);

impl Opaque {
    /// wrap a raw json value
    pub fn new(value: serde_json::Value) -> Self {
        Self(value)
    }

    /// borrow the raw json value
    pub fn as_value(&self) -> &serde_json::Value {
        &self.0
    }

    /// unwrap into the raw json value
    pub fn into_value(self) -> serde_json::Value {
        self.0
    }
}

impl From<serde_json::Value> for Opaque {
    fn from(value: serde_json::Value) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_has_errors() {
        let ok: Response<serde_json::Value> = Response {
            data: Some(json!({"ok": true})),
            errors: vec![],
            extensions: None,
        };
        assert!(!ok.has_errors());

        let err = Response::<serde_json::Value> {
            data: None,
            errors: vec![GraphQlError {
                message: "boom".to_string(),
                locations: vec![],
                path: vec![],
                extensions: None,
            }],
            extensions: None,
        };
        assert!(err.has_errors());
    }

    #[test]
    fn test_request_serializes_operation_name() {
        let request = Request {
            operation_name: "Viewer",
            query: "query Viewer { viewer { id } }",
            variables: Some(json!({"first": 2})),
        };
        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(body["operationName"], "Viewer");
        assert_eq!(body["query"], "query Viewer { viewer { id } }");
        assert_eq!(body["variables"]["first"], 2);

        let bare: Request<'_, ()> = Request {
            operation_name: "Viewer",
            query: "query Viewer { viewer { id } }",
            variables: None,
        };
        let body = serde_json::to_value(&bare).unwrap();
        assert!(body.get("variables").is_none());
    }

    #[test]
    fn test_response_defaults_missing_fields() {
        let parsed: Response<serde_json::Value> =
            serde_json::from_str("{\"data\": {\"ok\": true}}").unwrap();
        assert!(parsed.errors.is_empty());
        assert!(parsed.extensions.is_none());
        assert_eq!(parsed.data.unwrap()["ok"], true);
    }

    #[test]
    fn test_context_headers() {
        let ctx = RequestContext::new()
            .with_header("x-trace", "abc")
            .with_header("x-tenant", "blue");
        assert_eq!(ctx.headers().len(), 2);
        assert_eq!(ctx.headers().get("x-trace").map(String::as_str), Some("abc"));
    }

    #[test]
    fn test_opaque_is_transparent() {
        let value: Opaque = serde_json::from_str("{\"lat\": 1.5}").unwrap();
        assert_eq!(value.as_value()["lat"], 1.5);
        assert_eq!(serde_json::to_string(&value).unwrap(), "{\"lat\":1.5}");
    }
}
