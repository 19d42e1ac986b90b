//! operation binding generator
//!
//! turns graphql operation documents plus a schema into one typed rust module
//! per operation. the pipeline per operation is bind -> name -> emit; each
//! step is pure, so [`generate_all`] runs operations in parallel.
//!
//! ```no_run
//! use gqlbind::codegen::{generate_all, CodegenConfig, OperationSet, Schema};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let schema = Schema::parse("type Query { hello: String }")?;
//! let operations = OperationSet::parse("query Hello { hello }")?;
//! for outcome in generate_all(&schema, &operations, &CodegenConfig::default()) {
//!     match outcome {
//!         Ok(unit) => println!("{}", unit.source),
//!         Err(diagnostic) => eprintln!("{diagnostic}"),
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod bind;
pub mod document;
pub mod emit;
pub mod error;
pub mod naming;
pub mod schema;
pub mod settings;

pub use bind::{bind, BoundOperation};
pub use document::{parse_document, OperationDoc, OperationKind, OperationSet};
pub use emit::{emit, render_mod, GeneratedUnit};
pub use error::{BindError, CodegenError, Diagnostic, DocumentError, SchemaError};
pub use naming::{assign_names, Names};
pub use schema::{Schema, TypeRef};
pub use settings::{CodegenConfig, CONFIG_FILE};

use rayon::prelude::*;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// file declaring every generated module
pub const MOD_FILE: &str = "mod.rs";

/// bind, name and emit one operation
pub fn generate_operation(
    schema: &Schema,
    set: &OperationSet,
    operation: &OperationDoc,
    config: &CodegenConfig,
) -> Result<GeneratedUnit, BindError> {
    let bound = bind(schema, set, operation, config)?;
    let names = assign_names(&operation.name, &bound)?;
    Ok(emit(&bound, &names, config))
}

/// generate every operation of `set`
///
/// outcomes come back in operation order. a failing operation never affects
/// the others; two operations landing in the same module is reported against
/// the later one.
pub fn generate_all(
    schema: &Schema,
    set: &OperationSet,
    config: &CodegenConfig,
) -> Vec<Result<GeneratedUnit, Diagnostic>> {
    let outcomes: Vec<Result<GeneratedUnit, Diagnostic>> = set
        .operations()
        .par_iter()
        .map(|operation| {
            generate_operation(schema, set, operation, config).map_err(|error| Diagnostic {
                operation: operation.name.clone(),
                error,
            })
        })
        .collect();

    let mut modules: HashMap<String, String> = HashMap::new();
    outcomes
        .into_iter()
        .map(|outcome| {
            let unit = outcome?;
            if let Some(first) = modules.get(&unit.module) {
                return Err(Diagnostic {
                    operation: unit.operation.clone(),
                    error: BindError::NameCollision {
                        name: unit.module.clone(),
                        first: format!("operation `{first}`"),
                        second: format!("operation `{}`", unit.operation),
                    },
                });
            }
            modules.insert(unit.module.clone(), unit.operation.clone());
            Ok(unit)
        })
        .collect()
}

/// read and merge sdl files
pub fn load_schema_files(paths: &[PathBuf]) -> Result<Schema, CodegenError> {
    let mut sources = Vec::with_capacity(paths.len());
    for path in paths {
        let text = fs::read_to_string(path).map_err(|err| CodegenError::io(path, err))?;
        tracing::debug!(path = %path.display(), "read schema file");
        sources.push(text);
    }
    Ok(Schema::parse_many(sources.iter().map(String::as_str))?)
}

/// download sdl text from `url`
pub fn fetch_schema(url: &str, token: Option<&str>) -> Result<String, CodegenError> {
    let http = reqwest::blocking::Client::builder()
        .user_agent(concat!("gqlbind/", env!("CARGO_PKG_VERSION")))
        .build()?;
    let mut request = http.get(url);
    if let Some(token) = token {
        request = request.bearer_auth(token);
    }
    tracing::info!(url, "fetching schema");
    let response = request.send()?.error_for_status()?;
    Ok(response.text()?)
}

/// schema named by `config`: fetched from `schema_url` or read from `schema`
pub fn load_schema(config: &CodegenConfig, token: Option<&str>) -> Result<Schema, CodegenError> {
    match &config.schema_url {
        Some(url) => Ok(Schema::parse(&fetch_schema(url, token)?)?),
        None => load_schema_files(&config.schema_files()),
    }
}

/// parse operation files into one set
///
/// a file that fails to parse or clashes with an earlier file is reported and
/// skipped; the rest still load.
pub fn load_operations(paths: &[PathBuf]) -> (OperationSet, Vec<CodegenError>) {
    let mut set = OperationSet::new();
    let mut errors = Vec::new();
    for path in paths {
        let loaded = fs::read_to_string(path)
            .map_err(|err| CodegenError::io(path, err))
            .and_then(|text| {
                parse_document(&text).map_err(|source| CodegenError::Document {
                    path: path.clone(),
                    source,
                })
            })
            .and_then(|document| {
                set.add(document).map_err(|source| CodegenError::Document {
                    path: path.clone(),
                    source,
                })
            });
        match loaded {
            Ok(()) => tracing::debug!(path = %path.display(), "loaded operations"),
            Err(err) => errors.push(err),
        }
    }
    (set, errors)
}

/// expected contents of `dir`: every unit plus the `mod.rs` listing them
pub fn planned_files(dir: &Path, units: &[GeneratedUnit]) -> Vec<(PathBuf, String)> {
    let mut files: Vec<(PathBuf, String)> = units
        .iter()
        .map(|unit| (dir.join(&unit.file_name), unit.source.clone()))
        .collect();
    files.push((dir.join(MOD_FILE), render_mod(units)));
    files
}

/// write units and `mod.rs` into `dir`, skipping files already up to date
///
/// returns the paths that were written.
pub fn write_units(dir: &Path, units: &[GeneratedUnit]) -> Result<Vec<PathBuf>, CodegenError> {
    fs::create_dir_all(dir).map_err(|err| CodegenError::io(dir, err))?;
    let mut written = Vec::new();
    for (path, contents) in planned_files(dir, units) {
        if fs::read_to_string(&path).is_ok_and(|existing| existing == contents) {
            tracing::debug!(path = %path.display(), "unchanged");
            continue;
        }
        fs::write(&path, &contents).map_err(|err| CodegenError::io(&path, err))?;
        tracing::info!(path = %path.display(), "wrote");
        written.push(path);
    }
    Ok(written)
}

/// paths in `dir` that are missing or differ from what would be written
pub fn stale_files(dir: &Path, units: &[GeneratedUnit]) -> Vec<PathBuf> {
    planned_files(dir, units)
        .into_iter()
        .filter(|(path, contents)| {
            fs::read_to_string(path).map_or(true, |existing| &existing != contents)
        })
        .map(|(path, _)| path)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SDL: &str = "type Query { hello: String user: User } type User { id: ID! }";

    #[test]
    fn test_generate_all_keeps_order_and_isolates_failures() {
        let schema = Schema::parse(SDL).unwrap();
        let set = OperationSet::parse(
            "query A { hello } query B { nope } query C { user { id } }",
        )
        .unwrap();
        let outcomes = generate_all(&schema, &set, &CodegenConfig::default());
        assert_eq!(outcomes.len(), 3);
        assert_eq!(outcomes[0].as_ref().unwrap().operation, "A");
        let diagnostic = outcomes[1].as_ref().unwrap_err();
        assert_eq!(diagnostic.operation, "B");
        assert!(matches!(diagnostic.error, BindError::SchemaMismatch { .. }));
        assert_eq!(outcomes[2].as_ref().unwrap().file_name, "c.rs");
    }

    #[test]
    fn test_module_collision() {
        let schema = Schema::parse(SDL).unwrap();
        let set = OperationSet::parse("query getHello { hello } query GetHello { hello }").unwrap();
        let outcomes = generate_all(&schema, &set, &CodegenConfig::default());
        assert!(outcomes[0].is_ok());
        let diagnostic = outcomes[1].as_ref().unwrap_err();
        assert_eq!(
            diagnostic.error,
            BindError::NameCollision {
                name: "get_hello".to_string(),
                first: "operation `getHello`".to_string(),
                second: "operation `GetHello`".to_string(),
            }
        );
    }

    #[test]
    fn test_write_and_check() {
        let schema = Schema::parse(SDL).unwrap();
        let set = OperationSet::parse("query Hello { hello }").unwrap();
        let units: Vec<GeneratedUnit> = generate_all(&schema, &set, &CodegenConfig::default())
            .into_iter()
            .collect::<Result<_, _>>()
            .unwrap();

        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("generated");
        assert_eq!(stale_files(&out, &units).len(), 2);

        let written = write_units(&out, &units).unwrap();
        assert_eq!(written, vec![out.join("hello.rs"), out.join(MOD_FILE)]);
        assert_eq!(fs::read_to_string(out.join(MOD_FILE)).unwrap(), render_mod(&units));
        assert!(stale_files(&out, &units).is_empty());

        assert!(write_units(&out, &units).unwrap().is_empty());
    }

    #[test]
    fn test_load_inputs() {
        let dir = tempfile::tempdir().unwrap();
        let schema_a = dir.path().join("a.graphql");
        let schema_b = dir.path().join("b.graphql");
        fs::write(&schema_a, "type Query { hello: String }").unwrap();
        fs::write(&schema_b, "extend type Query { bye: String }").unwrap();
        let schema = load_schema_files(&[schema_a, schema_b]).unwrap();
        assert!(schema.field("Query", "bye").is_some());

        let good = dir.path().join("good.graphql");
        let broken = dir.path().join("broken.graphql");
        let duplicate = dir.path().join("duplicate.graphql");
        fs::write(&good, "query Hello { hello }").unwrap();
        fs::write(&broken, "query Broken {").unwrap();
        fs::write(&duplicate, "query Hello { bye }").unwrap();
        let (set, errors) = load_operations(&[good, broken, duplicate]);
        assert_eq!(set.operations().len(), 1);
        assert_eq!(errors.len(), 2);
        assert!(errors
            .iter()
            .all(|err| matches!(err, CodegenError::Document { .. })));
    }

    #[test]
    fn test_missing_schema_file() {
        let err = load_schema_files(&[PathBuf::from("/no/such/schema.graphql")]).unwrap_err();
        assert!(matches!(err, CodegenError::Io { .. }));
    }
}
