//! typed rust bindings for graphql operations
//!
//! `gqlbind` reads a graphql schema and a set of operation documents and
//! writes one rust module per operation: a response type tree, a variables
//! carrier and a function that sends the operation through a [`Client`].
//! this crate is also the runtime those modules call into.
//!
//! ## calling a generated operation
//!
//! ```ignore
//! use gqlbind::{ClientConfig, HttpClient};
//!
//! let client = HttpClient::new(ClientConfig::new("http://localhost:8000/graphql"))?;
//! let (data, result) = generated::list_users::list_users(&client, Some(10));
//! result?;
//! println!("{:?}", data);
//! ```
//!
//! ## generating bindings
//!
//! run the `gqlbind` binary next to a `gqlbind.toml`, or drive
//! [`codegen::generate_all`] directly from a build script.

mod client;
mod config;
mod error;
mod graphql;
mod operation;

pub mod codegen;

pub use client::{Client, HttpClient};
pub use config::ClientConfig;
pub use error::{Error, Result};
pub use graphql::{GraphQlError, GraphQlLocation, Opaque, Request, RequestContext, Response};
pub use operation::Operation;
