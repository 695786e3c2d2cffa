mod config;
mod logging;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use config::{ConfigOverrides, load_config};
use coursegen_core::{Error as CoreError, GeneratorConfig, audit_dataset};
use coursegen_generate::{GenerateOptions, GenerationEngine, GenerationError, generate_seeded};
use logging::init_logging;
use thiserror::Error;

#[derive(Debug, Error)]
enum CliError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("toml serialization error: {0}")]
    Toml(#[from] toml::ser::Error),
    #[error("failed to parse config '{path}': {message}")]
    ConfigParse { path: String, message: String },
    #[error("logging error: {0}")]
    Logging(String),
    #[error("core error: {0}")]
    Core(#[from] CoreError),
    #[error("generation error: {0}")]
    Generation(#[from] GenerationError),
}

#[derive(Parser, Debug)]
#[command(
    name = "coursegen",
    version,
    about = "Synthetic course-management data generator"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a dataset and write SQL (or CSV) into a new run directory.
    Generate(GenerateArgs),
    /// Generate in memory and print the invariant audit as JSON.
    Audit(AuditArgs),
    /// Print the JSON schema of the config file.
    ConfigSchema,
    /// Print the default config as TOML.
    InitConfig,
}

#[derive(Args, Debug)]
struct GenerateArgs {
    /// TOML config file; defaults apply to missing keys.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Directory receiving run directories and the JSON log.
    #[arg(long, default_value = "out")]
    out: PathBuf,
    /// Fail when any course stays below the enrollment floor.
    #[arg(long, default_value_t = false)]
    strict: bool,
    #[command(flatten)]
    overrides: ConfigOverrides,
}

#[derive(Args, Debug)]
struct AuditArgs {
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    #[command(flatten)]
    overrides: ConfigOverrides,
}

fn main() -> Result<(), CliError> {
    let cli = Cli::parse();

    match cli.command {
        Command::Generate(args) => run_generate(args),
        Command::Audit(args) => run_audit(args),
        Command::ConfigSchema => {
            let schema = schemars::schema_for!(GeneratorConfig);
            println!("{}", serde_json::to_string_pretty(&schema)?);
            Ok(())
        }
        Command::InitConfig => {
            print!("{}", toml::to_string_pretty(&GeneratorConfig::default())?);
            Ok(())
        }
    }
}

fn resolve_config(
    path: Option<&std::path::Path>,
    overrides: &ConfigOverrides,
) -> Result<GeneratorConfig, CliError> {
    let mut config = load_config(path)?;
    overrides.apply(&mut config);
    Ok(config)
}

fn run_generate(args: GenerateArgs) -> Result<(), CliError> {
    let GenerateArgs {
        config,
        out,
        strict,
        overrides,
    } = args;

    let config = resolve_config(config.as_deref(), &overrides)?;
    std::fs::create_dir_all(&out)?;
    init_logging(Some(&out.join("coursegen.jsonl")))?;

    tracing::info!(event = "run_requested", out = %out.display(), strict);

    let engine = GenerationEngine::new(GenerateOptions {
        out_dir: out,
        strict,
    });
    match engine.run(&config) {
        Ok(result) => {
            let report = &result.report;
            tracing::info!(
                event = "run_finished",
                status = "success",
                run_id = %report.run_id,
                warnings = report.warnings.len(),
                duration_ms = report.duration_ms
            );
            println!("{}", result.run_dir.display());
            Ok(())
        }
        Err(GenerationError::Failed(report)) => {
            tracing::error!(
                event = "run_finished",
                status = "failed",
                run_id = %report.run_id,
                warnings = report.warnings.len()
            );
            Err(GenerationError::Failed(report).into())
        }
        Err(err) => Err(err.into()),
    }
}

fn run_audit(args: AuditArgs) -> Result<(), CliError> {
    let config = resolve_config(args.config.as_deref(), &args.overrides)?;
    init_logging(None)?;

    let generated = generate_seeded(&config)?;
    let audit = audit_dataset(&generated.dataset, &config.limits);
    println!("{}", serde_json::to_string_pretty(&audit)?);

    if audit.is_consistent() {
        Ok(())
    } else {
        Err(CoreError::InvalidDataset(
            "generated dataset violates assignment invariants".to_string(),
        )
        .into())
    }
}
