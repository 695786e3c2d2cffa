use std::path::Path;

use chrono::NaiveDateTime;
use clap::{Args, ValueEnum};
use coursegen_core::{GeneratorConfig, OutputFormat};

use crate::CliError;

const BASE_TIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"];

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum FormatArg {
    Sql,
    Csv,
}

impl From<FormatArg> for OutputFormat {
    fn from(value: FormatArg) -> Self {
        match value {
            FormatArg::Sql => OutputFormat::Sql,
            FormatArg::Csv => OutputFormat::Csv,
        }
    }
}

/// Command-line overrides applied on top of the config file.
#[derive(Args, Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// Seed for the run's random source.
    #[arg(long)]
    pub seed: Option<u64>,
    /// Reference time for generated dates, e.g. 2025-01-01T09:00:00.
    #[arg(long, value_parser = parse_base_time)]
    pub base_time: Option<NaiveDateTime>,
    #[arg(long)]
    pub lecturers: Option<u32>,
    #[arg(long)]
    pub courses: Option<u32>,
    #[arg(long)]
    pub students: Option<u32>,
    #[arg(long)]
    pub assignments: Option<u32>,
    #[arg(long)]
    pub forums: Option<u32>,
    #[arg(long)]
    pub threads: Option<u32>,
    #[arg(long)]
    pub events: Option<u32>,
    #[arg(long)]
    pub course_content: Option<u32>,
    #[arg(long, value_enum)]
    pub format: Option<FormatArg>,
    #[arg(long)]
    pub database_name: Option<String>,
}

impl ConfigOverrides {
    pub fn apply(&self, config: &mut GeneratorConfig) {
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if self.base_time.is_some() {
            config.base_time = self.base_time;
        }

        let counts = &mut config.counts;
        let fields = [
            (self.lecturers, &mut counts.lecturers),
            (self.courses, &mut counts.courses),
            (self.students, &mut counts.students),
            (self.assignments, &mut counts.assignments),
            (self.forums, &mut counts.forums),
            (self.threads, &mut counts.threads),
            (self.events, &mut counts.events),
        ];
        for (value, slot) in fields {
            if let Some(value) = value {
                *slot = value;
            }
        }
        if self.course_content.is_some() {
            counts.course_content = self.course_content;
        }

        if let Some(format) = self.format {
            config.output.format = format.into();
        }
        if let Some(name) = &self.database_name {
            config.output.database_name = name.clone();
        }
    }
}

/// Defaults when `path` is absent; otherwise the TOML file with defaults
/// filling any missing keys.
pub fn load_config(path: Option<&Path>) -> Result<GeneratorConfig, CliError> {
    let Some(path) = path else {
        return Ok(GeneratorConfig::default());
    };
    let content = std::fs::read_to_string(path)?;
    toml::from_str(&content).map_err(|err| CliError::ConfigParse {
        path: path.display().to_string(),
        message: err.to_string(),
    })
}

fn parse_base_time(value: &str) -> Result<NaiveDateTime, String> {
    BASE_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .ok_or_else(|| format!("expected YYYY-MM-DDTHH:MM:SS, got '{value}'"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_path_yields_defaults() {
        let config = load_config(None).expect("defaults");
        assert_eq!(config.seed, 42);
        assert_eq!(config.counts.students, 100_000);
    }

    #[test]
    fn overrides_replace_only_given_fields() {
        let mut config = GeneratorConfig::default();
        let overrides = ConfigOverrides {
            seed: Some(7),
            students: Some(250),
            course_content: Some(12),
            format: Some(FormatArg::Csv),
            ..ConfigOverrides::default()
        };

        overrides.apply(&mut config);

        assert_eq!(config.seed, 7);
        assert_eq!(config.counts.students, 250);
        assert_eq!(config.counts.courses, 200);
        assert_eq!(config.counts.course_content(), 12);
        assert_eq!(config.output.format, OutputFormat::Csv);
        assert_eq!(config.output.database_name, "course_mgmt_db");
    }

    #[test]
    fn parses_both_base_time_forms() {
        let expected = parse_base_time("2025-02-03T04:05:06").expect("iso form");
        assert_eq!(parse_base_time("2025-02-03 04:05:06"), Ok(expected));
        assert!(parse_base_time("next tuesday").is_err());
    }

    #[test]
    fn reports_unknown_keys_with_path() {
        let mut path = std::env::temp_dir();
        path.push(format!("coursegen_cli_config_{}.toml", std::process::id()));
        std::fs::write(&path, "seed = 3\nstudent_count = 10\n").expect("write config");

        let err = load_config(Some(&path)).expect_err("unknown key");
        let _ = std::fs::remove_file(&path);
        match err {
            CliError::ConfigParse { path: reported, .. } => {
                assert!(reported.ends_with(".toml"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
