// @generated by gqlbind from operation `CrlfQuery`. do not edit.

#![allow(dead_code, unused_imports, non_camel_case_types, clippy::all)]

use serde::{Deserialize, Serialize};

/// verbatim text of `CrlfQuery`, sent as the request's `query`
pub const CRLF_QUERY_OPERATION: &str = "query CrlfQuery {\r\n  user {\r\n    id\r\n  }\r\n}";

/// `CrlfQuery` query
pub struct CrlfQuery;

impl gqlbind::Operation for CrlfQuery {
    const NAME: &'static str = "CrlfQuery";
    const QUERY: &'static str = CRLF_QUERY_OPERATION;
    type Variables = CrlfQueryVariables;
    type Response = CrlfQueryResponse;
}

/// send the `CrlfQuery` query through `client`
///
/// returns whatever data arrived alongside the transport's result.
pub fn crlf_query<C: gqlbind::Client>(
    client: C,
) -> (Option<CrlfQueryResponse>, Result<(), C::Error>) {
    let request = gqlbind::Request {
        operation_name: "CrlfQuery",
        query: CRLF_QUERY_OPERATION,
        variables: None::<CrlfQueryVariables>,
    };
    let mut response = gqlbind::Response::<CrlfQueryResponse>::default();
    let result = client.make_request(None, &request, &mut response);
    (response.data, result)
}

/// variables of `CrlfQuery`
#[derive(Debug, Clone, Serialize)]
pub struct CrlfQueryVariables {}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrlfQueryResponse {
    pub user: Option<CrlfQueryUser>,
}

impl CrlfQueryResponse {
    pub fn user(&self) -> Option<&CrlfQueryUser> {
        self.user.as_ref()
    }
}

/// A person with an account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrlfQueryUser {
    /// Stable identifier.
    pub id: String,
}

impl CrlfQueryUser {
    /// Stable identifier.
    pub fn id(&self) -> &String {
        &self.id
    }
}
