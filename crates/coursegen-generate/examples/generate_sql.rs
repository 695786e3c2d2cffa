use std::env;
use std::path::PathBuf;

use coursegen_core::GeneratorConfig;
use coursegen_generate::{GenerateOptions, GenerationEngine};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut args = env::args().skip(1);
    let mut config_path: Option<PathBuf> = None;
    let mut out_dir: Option<PathBuf> = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => config_path = args.next().map(PathBuf::from),
            "--out" => out_dir = args.next().map(PathBuf::from),
            _ => return Err(format!("unexpected argument '{arg}'").into()),
        }
    }

    let config: GeneratorConfig = match config_path {
        Some(path) => toml::from_str(&std::fs::read_to_string(path)?)?,
        None => GeneratorConfig::default(),
    };

    let mut options = GenerateOptions::default();
    if let Some(out_dir) = out_dir {
        options.out_dir = out_dir;
    }

    let result = GenerationEngine::new(options).run(&config)?;
    println!("run_dir={}", result.run_dir.display());
    Ok(())
}

