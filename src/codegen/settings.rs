//! generator configuration
//!
//! read from `gqlbind.toml`. every key has a default, so an empty file is a
//! valid configuration. relative paths resolve against the directory holding
//! the file.

use crate::codegen::error::CodegenError;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// default config file name looked up by the driver
pub const CONFIG_FILE: &str = "gqlbind.toml";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CodegenConfig {
    /// sdl files making up the schema
    pub schema: Vec<PathBuf>,

    /// fetch the sdl from this url instead of reading `schema`
    pub schema_url: Option<String>,

    /// glob patterns matching operation documents
    pub operations: Vec<String>,

    /// output directory for generated files
    pub generated: PathBuf,

    /// crate path generated code uses for the runtime (`Client`, `Request`, ...)
    pub runtime_crate: String,

    /// rust type for custom scalars without a binding
    ///
    /// default: `<runtime_crate>::Opaque`
    pub opaque_scalar: Option<String>,

    /// custom scalar name to rust type path
    pub bindings: BTreeMap<String, String>,

    /// derives added to every response type, besides serde's
    pub response_derives: Vec<String>,

    /// directory relative paths resolve against
    #[serde(skip)]
    pub base_dir: PathBuf,
}

impl Default for CodegenConfig {
    fn default() -> Self {
        Self {
            schema: vec![PathBuf::from("schema.graphql")],
            schema_url: None,
            operations: vec!["operations/**/*.graphql".to_string()],
            generated: PathBuf::from("src/generated"),
            runtime_crate: "gqlbind".to_string(),
            opaque_scalar: None,
            bindings: BTreeMap::new(),
            response_derives: vec!["Debug".to_string(), "Clone".to_string()],
            base_dir: PathBuf::from("."),
        }
    }
}

impl CodegenConfig {
    /// read a config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CodegenError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|err| CodegenError::io(path, err))?;
        let mut config = Self::from_toml_str(&text)?;
        config.base_dir = path
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        Ok(config)
    }

    /// parse config text; relative paths resolve against the current directory
    pub fn from_toml_str(text: &str) -> Result<Self, CodegenError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_schema(mut self, paths: Vec<PathBuf>) -> Self {
        self.schema = paths;
        self
    }

    pub fn with_schema_url(mut self, url: impl Into<String>) -> Self {
        self.schema_url = Some(url.into());
        self
    }

    pub fn with_operations(mut self, patterns: Vec<String>) -> Self {
        self.operations = patterns;
        self
    }

    pub fn with_generated(mut self, dir: impl Into<PathBuf>) -> Self {
        self.generated = dir.into();
        self
    }

    pub fn with_runtime_crate(mut self, path: impl Into<String>) -> Self {
        self.runtime_crate = path.into();
        self
    }

    pub fn with_opaque_scalar(mut self, ty: impl Into<String>) -> Self {
        self.opaque_scalar = Some(ty.into());
        self
    }

    /// bind custom scalar `scalar` to rust type `ty`
    pub fn with_binding(mut self, scalar: impl Into<String>, ty: impl Into<String>) -> Self {
        self.bindings.insert(scalar.into(), ty.into());
        self
    }

    pub fn with_response_derives(mut self, derives: Vec<String>) -> Self {
        self.response_derives = derives;
        self
    }

    pub fn with_base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = dir.into();
        self
    }

    /// rust type unknown custom scalars bind to
    pub fn opaque_scalar(&self) -> String {
        self.opaque_scalar
            .clone()
            .unwrap_or_else(|| format!("{}::Opaque", self.runtime_crate))
    }

    /// check values serde cannot
    pub fn validate(&self) -> Result<(), CodegenError> {
        if self.runtime_crate.trim().is_empty() {
            return Err(CodegenError::Config(
                "runtime_crate cannot be empty".to_string(),
            ));
        }
        if self.schema.is_empty() && self.schema_url.is_none() {
            return Err(CodegenError::Config(
                "either schema or schema_url is required".to_string(),
            ));
        }
        if self.operations.is_empty() {
            return Err(CodegenError::Config(
                "at least one operations pattern is required".to_string(),
            ));
        }
        for (scalar, ty) in &self.bindings {
            if ty.trim().is_empty() {
                return Err(CodegenError::Config(format!(
                    "binding for scalar `{scalar}` is empty"
                )));
            }
        }
        for derive in &self.response_derives {
            if matches!(derive.as_str(), "Serialize" | "Deserialize") {
                return Err(CodegenError::Config(format!(
                    "`{derive}` is always derived; remove it from response_derives"
                )));
            }
        }
        Ok(())
    }

    /// `path` resolved against the config directory
    pub fn resolve(&self, path: impl AsRef<Path>) -> PathBuf {
        let path = path.as_ref();
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }

    /// sdl files, resolved
    pub fn schema_files(&self) -> Vec<PathBuf> {
        self.schema.iter().map(|path| self.resolve(path)).collect()
    }

    /// output directory, resolved
    pub fn generated_dir(&self) -> PathBuf {
        self.resolve(&self.generated)
    }

    /// operation documents matched by `operations`, sorted and deduplicated
    pub fn operation_files(&self) -> Result<Vec<PathBuf>, CodegenError> {
        let mut files = Vec::new();
        for pattern in &self.operations {
            let pattern = self.resolve(pattern);
            for entry in glob::glob(&pattern.to_string_lossy())? {
                let path = entry?;
                if path.is_file() {
                    files.push(path);
                }
            }
        }
        files.sort();
        files.dedup();
        Ok(files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CodegenConfig::from_toml_str("").unwrap();
        assert_eq!(config, CodegenConfig::default());
        assert_eq!(config.opaque_scalar(), "gqlbind::Opaque");
        assert_eq!(config.response_derives, vec!["Debug", "Clone"]);
    }

    #[test]
    fn test_parse_all_keys() {
        let config = CodegenConfig::from_toml_str(
            r#"
            schema = ["a.graphql", "b.graphql"]
            operations = ["queries/*.graphql"]
            generated = "out"
            runtime_crate = "crate::runtime"
            response_derives = ["Debug", "PartialEq"]

            [bindings]
            DateTime = "String"
            "#,
        )
        .unwrap();
        assert_eq!(config.schema.len(), 2);
        assert_eq!(config.generated, PathBuf::from("out"));
        assert_eq!(config.opaque_scalar(), "crate::runtime::Opaque");
        assert_eq!(config.bindings.get("DateTime").map(String::as_str), Some("String"));
    }

    #[test]
    fn test_unknown_key_rejected() {
        let err = CodegenConfig::from_toml_str("schemas = []").unwrap_err();
        assert!(matches!(err, CodegenError::Toml(_)));
    }

    #[test]
    fn test_validation() {
        let err = CodegenConfig::from_toml_str("runtime_crate = \"\"").unwrap_err();
        assert!(matches!(err, CodegenError::Config(_)));

        let err = CodegenConfig::from_toml_str("schema = []").unwrap_err();
        assert!(matches!(err, CodegenError::Config(_)));

        let err = CodegenConfig::from_toml_str("response_derives = [\"Serialize\"]").unwrap_err();
        assert!(matches!(err, CodegenError::Config(_)));

        let config = CodegenConfig::default().with_schema(Vec::new()).with_schema_url("http://x");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builders_and_resolve() {
        let config = CodegenConfig::default()
            .with_base_dir("/work")
            .with_generated("gen")
            .with_opaque_scalar("serde_json::Value")
            .with_binding("Uuid", "uuid::Uuid");
        assert_eq!(config.generated_dir(), PathBuf::from("/work/gen"));
        assert_eq!(config.schema_files(), vec![PathBuf::from("/work/schema.graphql")]);
        assert_eq!(config.resolve("/abs"), PathBuf::from("/abs"));
        assert_eq!(config.opaque_scalar(), "serde_json::Value");
        assert_eq!(config.bindings.len(), 1);
    }

    #[test]
    fn test_load_and_operation_files() {
        let dir = tempfile::tempdir().unwrap();
        let ops = dir.path().join("ops");
        std::fs::create_dir_all(ops.join("nested")).unwrap();
        std::fs::write(ops.join("b.graphql"), "query B { a }").unwrap();
        std::fs::write(ops.join("nested/a.graphql"), "query A { a }").unwrap();
        std::fs::write(ops.join("skip.txt"), "").unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE),
            "operations = [\"ops/**/*.graphql\", \"ops/*.graphql\"]",
        )
        .unwrap();

        let config = CodegenConfig::load(dir.path().join(CONFIG_FILE)).unwrap();
        assert_eq!(config.base_dir, dir.path());
        let files = config.operation_files().unwrap();
        assert_eq!(files, vec![ops.join("b.graphql"), ops.join("nested/a.graphql")]);
    }

    #[test]
    fn test_load_missing_file() {
        let err = CodegenConfig::load("/definitely/not/here/gqlbind.toml").unwrap_err();
        assert!(matches!(err, CodegenError::Io { .. }));
    }
}
