//! codegen errors
//!
//! schema loading, document parsing and per-operation binding failures.

use crate::codegen::document::{OperationKind, Pos};
use std::path::PathBuf;

/// failure while building the schema model
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("failed to parse schema: {0}")]
    Parse(#[from] graphql_parser::schema::ParseError),

    #[error("type `{0}` is defined more than once")]
    DuplicateType(String),

    #[error("`{type_name}` declares `{member}` more than once")]
    DuplicateMember { type_name: String, member: String },

    #[error("cannot extend undefined type `{0}`")]
    UnknownExtension(String),

    #[error("extension of `{0}` does not match its kind")]
    ExtensionKindMismatch(String),

    #[error("type `{name}` referenced by `{referenced_by}` is not defined")]
    UnknownType { name: String, referenced_by: String },

    #[error("root operation type `{0}` is not an object type")]
    InvalidRoot(String),
}

/// failure while parsing operation documents
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("failed to parse operations: {0}")]
    Parse(#[from] graphql_parser::query::ParseError),

    #[error("anonymous operation at {0}: operations must be named")]
    AnonymousOperation(Pos),

    #[error("operation `{0}` is defined more than once")]
    DuplicateOperation(String),

    #[error("fragment `{0}` is defined more than once")]
    DuplicateFragment(String),

    #[error("unterminated string at byte {0}")]
    UnterminatedString(usize),

    #[error("unbalanced delimiters at byte {0}")]
    Unbalanced(usize),

    #[error("found {spans} definition spans for {definitions} parsed definitions")]
    SpanMismatch { spans: usize, definitions: usize },
}

/// failure binding, naming or emitting one operation
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BindError {
    #[error("schema mismatch at `{path}`: {message}")]
    SchemaMismatch { path: String, message: String },

    #[error("argument mismatch at `{path}`: {message}")]
    ArgumentMismatch { path: String, message: String },

    #[error("fragment cycle: {}", .cycle.join(" -> "))]
    FragmentCycle { cycle: Vec<String> },

    #[error("name collision: `{name}` is produced by both {first} and {second}")]
    NameCollision {
        name: String,
        first: String,
        second: String,
    },

    #[error("conflicting selections for `{key}` at `{path}`: {message}")]
    FieldConflict {
        path: String,
        key: String,
        message: String,
    },

    #[error("unknown fragment `{0}`")]
    UnknownFragment(String),

    #[error("variable `${0}` is not declared")]
    UndefinedVariable(String),

    #[error("selection of abstract type `{type_name}` at `{path}` must request `__typename`")]
    MissingTypename { path: String, type_name: String },

    #[error("{0} operations are not supported")]
    Unsupported(OperationKind),
}

/// per-operation failure reported by the driver
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{operation}: {error}")]
pub struct Diagnostic {
    /// operation that failed
    pub operation: String,
    /// what went wrong
    pub error: BindError,
}

/// failure outside a single operation: inputs, config and output
#[derive(Debug, thiserror::Error)]
pub enum CodegenError {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("{}: {source}", .path.display())]
    Document {
        path: PathBuf,
        #[source]
        source: DocumentError,
    },

    #[error(transparent)]
    Operations(#[from] DocumentError),

    #[error("config error: {0}")]
    Config(String),

    #[error("invalid config file: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("failed to access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid glob pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error("glob error: {0}")]
    Glob(#[from] glob::GlobError),

    #[error("failed to fetch schema: {0}")]
    Fetch(#[from] reqwest::Error),
}

impl CodegenError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CodegenError::Io {
            path: path.into(),
            source,
        }
    }
}
