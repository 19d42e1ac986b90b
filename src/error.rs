//! error types
//!
//! structured errors for the http transport: config, http, json, and graphql
//! responses.

use crate::graphql::GraphQlError;
use std::fmt;

/// library result type
pub type Result<T> = std::result::Result<T, Error>;

/// error type reported by [`crate::HttpClient`]
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("url error: {0}")]
    Url(#[from] url::ParseError),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("graphql error: {message}")]
    GraphQl {
        /// http status if available
        status: Option<u16>,
        /// graphql error list
        errors: Vec<GraphQlError>,
        /// raw response body
        body: String,
        /// top-level message
        message: String,
    },
}

impl Error {
    /// true if the error looks like an auth failure
    pub fn is_auth_error(&self) -> bool {
        matches!(self, Error::GraphQl { status: Some(401 | 403), .. })
            || matches!(self, Error::Http(err) if err.status() == Some(reqwest::StatusCode::UNAUTHORIZED))
    }

    /// graphql errors carried by this error, if any
    pub fn graphql_errors(&self) -> &[GraphQlError] {
        match self {
            Error::GraphQl { errors, .. } => errors,
            _ => &[],
        }
    }
}

impl fmt::Display for GraphQlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graphql_error(status: Option<u16>) -> Error {
        Error::GraphQl {
            status,
            errors: vec![GraphQlError {
                message: "boom".to_string(),
                locations: vec![],
                path: vec![],
                extensions: None,
            }],
            body: String::new(),
            message: "boom".to_string(),
        }
    }

    #[test]
    fn test_is_auth_error() {
        assert!(graphql_error(Some(401)).is_auth_error());
        assert!(graphql_error(Some(403)).is_auth_error());
        assert!(!graphql_error(Some(500)).is_auth_error());
        assert!(!graphql_error(None).is_auth_error());
    }

    #[test]
    fn test_graphql_errors_accessor() {
        assert_eq!(graphql_error(Some(200)).graphql_errors().len(), 1);
        assert!(Error::Config("bad".to_string()).graphql_errors().is_empty());
        assert_eq!(graphql_error(None).to_string(), "graphql error: boom");
    }
}
