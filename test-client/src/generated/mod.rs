// @generated by gqlbind. do not edit.

pub mod crlf_query;
pub mod list_input_query;
pub mod search;
