// @generated by gqlbind from operation `ListInputQuery`. do not edit.

#![allow(dead_code, unused_imports, non_camel_case_types, clippy::all)]

use serde::{Deserialize, Serialize};

/// verbatim text of `ListInputQuery`, sent as the request's `query`
pub const LIST_INPUT_QUERY_OPERATION: &str = r#"query ListInputQuery($names: [String]) {
  user(query: {names: $names}) {
    id
  }
}"#;

/// `ListInputQuery` query
pub struct ListInputQuery;

impl gqlbind::Operation for ListInputQuery {
    const NAME: &'static str = "ListInputQuery";
    const QUERY: &'static str = LIST_INPUT_QUERY_OPERATION;
    type Variables = ListInputQueryVariables;
    type Response = ListInputQueryResponse;
}

/// send the `ListInputQuery` query through `client`
///
/// returns whatever data arrived alongside the transport's result.
pub fn list_input_query<C: gqlbind::Client>(
    client: C,
    names: Option<Vec<Option<String>>>,
) -> (Option<ListInputQueryResponse>, Result<(), C::Error>) {
    let request = gqlbind::Request {
        operation_name: "ListInputQuery",
        query: LIST_INPUT_QUERY_OPERATION,
        variables: Some(ListInputQueryVariables { names }),
    };
    let mut response = gqlbind::Response::<ListInputQueryResponse>::default();
    let result = client.make_request(None, &request, &mut response);
    (response.data, result)
}

/// variables of `ListInputQuery`
#[derive(Debug, Clone, Serialize)]
pub struct ListInputQueryVariables {
    names: Option<Vec<Option<String>>>,
}

impl ListInputQueryVariables {
    pub fn names(&self) -> Option<&Vec<Option<String>>> {
        self.names.as_ref()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListInputQueryResponse {
    pub user: Option<ListInputQueryUser>,
}

impl ListInputQueryResponse {
    pub fn user(&self) -> Option<&ListInputQueryUser> {
        self.user.as_ref()
    }
}

/// A person with an account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListInputQueryUser {
    /// Stable identifier.
    pub id: String,
}

impl ListInputQueryUser {
    /// Stable identifier.
    pub fn id(&self) -> &String {
        &self.id
    }
}
