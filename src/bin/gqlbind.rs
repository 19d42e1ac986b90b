//! generate typed rust bindings for graphql operations
//!
//! reads `gqlbind.toml` (when present), loads the schema and every matching
//! operation document, then writes one module per operation plus a `mod.rs`
//! into the output directory. every failure is reported; the exit code is
//! non-zero if anything failed.

use anyhow::{Context, Result};
use clap::Parser;
use gqlbind::codegen::{self, CodegenConfig, GeneratedUnit, CONFIG_FILE};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{filter::EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "gqlbind", about = "typed rust bindings for graphql operations", version)]
struct Cli {
    /// config file; a missing default file means all defaults
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// sdl file, repeatable (overrides `schema`)
    #[arg(long, value_name = "PATH")]
    schema: Vec<PathBuf>,

    /// fetch the sdl from this url (overrides `schema_url`)
    #[arg(long, value_name = "URL")]
    schema_url: Option<String>,

    /// bearer token for `--schema-url`
    #[arg(long, env = "GQLBIND_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// operation glob, repeatable (overrides `operations`)
    #[arg(long, value_name = "GLOB")]
    operations: Vec<String>,

    /// output directory (overrides `generated`)
    #[arg(long, value_name = "DIR")]
    out: Option<PathBuf>,

    /// fail if generated files are missing or out of date instead of writing
    #[arg(long)]
    check: bool,
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_env("GQLBIND_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .init();

    match run(Cli::parse()) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            tracing::error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

fn load_config(cli: &Cli) -> Result<CodegenConfig> {
    let mut config = match &cli.config {
        Some(path) => CodegenConfig::load(path)
            .with_context(|| format!("failed to load {}", path.display()))?,
        None if PathBuf::from(CONFIG_FILE).is_file() => CodegenConfig::load(CONFIG_FILE)?,
        None => CodegenConfig::default(),
    };

    let cwd = std::env::current_dir().context("failed to read current directory")?;
    if !cli.schema.is_empty() {
        config.schema = cli.schema.iter().map(|path| cwd.join(path)).collect();
        config.schema_url = None;
    }
    if let Some(url) = &cli.schema_url {
        config = config.with_schema_url(url.clone());
    }
    if !cli.operations.is_empty() {
        let patterns = cli
            .operations
            .iter()
            .map(|pattern| cwd.join(pattern).to_string_lossy().into_owned())
            .collect();
        config = config.with_operations(patterns);
    }
    if let Some(out) = &cli.out {
        config = config.with_generated(cwd.join(out));
    }
    config.validate()?;
    Ok(config)
}

/// true when every input loaded and every operation generated
fn run(cli: Cli) -> Result<bool> {
    let config = load_config(&cli)?;
    let schema = codegen::load_schema(&config, cli.token.as_deref())?;

    let files = config.operation_files()?;
    if files.is_empty() {
        tracing::warn!(patterns = ?config.operations, "no operation files matched");
    }
    let (set, load_errors) = codegen::load_operations(&files);
    for err in &load_errors {
        tracing::warn!("{err}");
    }

    let mut units: Vec<GeneratedUnit> = Vec::new();
    let mut failed = load_errors.len();
    for outcome in codegen::generate_all(&schema, &set, &config) {
        match outcome {
            Ok(unit) => units.push(unit),
            Err(diagnostic) => {
                tracing::warn!("{diagnostic}");
                failed += 1;
            }
        }
    }

    let dir = config.generated_dir();
    if cli.check {
        let stale = codegen::stale_files(&dir, &units);
        for path in &stale {
            tracing::warn!(path = %path.display(), "out of date");
        }
        failed += stale.len();
    } else {
        let written = codegen::write_units(&dir, &units)?;
        tracing::info!(
            operations = units.len(),
            written = written.len(),
            dir = %dir.display(),
            "generation finished"
        );
    }

    if failed > 0 {
        tracing::error!(failed, "generation reported problems");
    }
    Ok(failed == 0)
}
