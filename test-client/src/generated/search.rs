// @generated by gqlbind from operation `Search`. do not edit.

#![allow(dead_code, unused_imports, non_camel_case_types, clippy::all)]

use serde::{Deserialize, Serialize};

/// verbatim text of `Search`, sent as the request's `query`
pub const SEARCH_OPERATION: &str = r#"query Search($text: String!) {
  search(text: $text) {
    __typename
    ... on Node {
      id
    }
    ... on User {
      name
    }
    ... on Bot {
      model
    }
  }
}"#;

/// `Search` query
pub struct Search;

impl gqlbind::Operation for Search {
    const NAME: &'static str = "Search";
    const QUERY: &'static str = SEARCH_OPERATION;
    type Variables = SearchVariables;
    type Response = SearchResponse;
}

/// send the `Search` query through `client`
///
/// returns whatever data arrived alongside the transport's result.
pub fn search<C: gqlbind::Client>(
    client: C,
    text: String,
) -> (Option<SearchResponse>, Result<(), C::Error>) {
    let request = gqlbind::Request {
        operation_name: "Search",
        query: SEARCH_OPERATION,
        variables: Some(SearchVariables { text }),
    };
    let mut response = gqlbind::Response::<SearchResponse>::default();
    let result = client.make_request(None, &request, &mut response);
    (response.data, result)
}

/// variables of `Search`
#[derive(Debug, Clone, Serialize)]
pub struct SearchVariables {
    text: String,
}

impl SearchVariables {
    pub fn text(&self) -> &String {
        &self.text
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub search: Vec<SearchSearch>,
}

impl SearchResponse {
    pub fn search(&self) -> &Vec<SearchSearch> {
        &self.search
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "__typename")]
pub enum SearchSearch {
    User(SearchSearchUser),
    Bot(SearchSearchBot),
}

/// fields shared by every `SearchResult` variant of `SearchSearch`
pub trait SearchSearchFields {
    fn typename(&self) -> &'static str;
}

impl SearchSearchFields for SearchSearch {
    fn typename(&self) -> &'static str {
        match self {
            SearchSearch::User(value) => value.typename(),
            SearchSearch::Bot(value) => value.typename(),
        }
    }
}

/// A person with an account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchSearchUser {
    /// Stable identifier.
    pub id: String,
    pub name: Option<String>,
}

impl SearchSearchUser {
    pub fn typename(&self) -> &'static str {
        "User"
    }

    /// Stable identifier.
    pub fn id(&self) -> &String {
        &self.id
    }

    pub fn name(&self) -> Option<&String> {
        self.name.as_ref()
    }
}

impl SearchSearchFields for SearchSearchUser {
    fn typename(&self) -> &'static str {
        SearchSearchUser::typename(self)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchSearchBot {
    pub id: String,
    pub model: String,
}

impl SearchSearchBot {
    pub fn typename(&self) -> &'static str {
        "Bot"
    }

    pub fn id(&self) -> &String {
        &self.id
    }

    pub fn model(&self) -> &String {
        &self.model
    }
}

impl SearchSearchFields for SearchSearchBot {
    fn typename(&self) -> &'static str {
        SearchSearchBot::typename(self)
    }
}
