//! generated operation helper
//!
//! operation trait implemented by the marker type of every generated unit.

use serde::de::DeserializeOwned;
use serde::Serialize;

/// graphql operation contract for generated types
pub trait Operation {
    /// operation name as written in the document
    const NAME: &'static str;
    /// verbatim graphql query or mutation text
    const QUERY: &'static str;
    /// variables carrier
    type Variables: Serialize;
    /// response payload type
    type Response: DeserializeOwned;
}
