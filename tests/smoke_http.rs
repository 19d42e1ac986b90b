use gqlbind::{Client, ClientConfig, HttpClient, Request, Response};

#[cfg_attr(miri, ignore)]
#[test]
fn smoke_typename() {
    let endpoint = match std::env::var("GQLBIND_SMOKE_URL") {
        Ok(endpoint) => endpoint,
        Err(_) => return,
    };
    let mut config = ClientConfig::new(endpoint);
    if let Ok(token) = std::env::var("GQLBIND_SMOKE_TOKEN") {
        config = config.with_token(token);
    }

    let client = HttpClient::new(config).expect("client");
    let request = Request::<()> {
        operation_name: "Smoke",
        query: "query Smoke { __typename }",
        variables: None,
    };
    let mut response = Response::<serde_json::Value>::default();
    client
        .make_request(None, &request, &mut response)
        .expect("graphql query");

    assert!(response.data.is_some());
}
