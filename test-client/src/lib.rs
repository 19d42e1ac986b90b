//! bindings generated by `gqlbind` from `tests/fixtures` of the parent crate
//!
//! regenerate with:
//!
//! ```text
//! gqlbind --schema tests/fixtures/schema.graphql \
//!     --operations 'tests/fixtures/crlf/crlf_query.graphql' \
//!     --operations 'tests/fixtures/operations/list_input.graphql' \
//!     --operations 'tests/fixtures/operations/search.graphql' \
//!     --out test-client/src/generated
//! ```

pub mod generated;
