use coursegen_core::{GeneratorConfig, OutputFormat, validate_config};
use schemars::schema_for;

#[test]
fn empty_toml_uses_defaults() {
    let config: GeneratorConfig = toml::from_str("").expect("parse empty config");
    assert_eq!(config.seed, 42);
    assert_eq!(config.counts.students, 100_000);
    assert_eq!(config.limits.max_courses_per_lecturer, 5);
    assert_eq!(config.output.format, OutputFormat::Sql);
    assert!(validate_config(&config).is_ok());
}

#[test]
fn partial_toml_overrides_sections() {
    let config: GeneratorConfig = toml::from_str(
        r#"
seed = 7
base_time = "2025-01-01T00:00:00"

[counts]
courses = 5
students = 60

[output]
format = "csv"
insert_batch_size = 0
"#,
    )
    .expect("parse config");

    assert_eq!(config.seed, 7);
    assert_eq!(config.counts.courses, 5);
    assert_eq!(config.counts.lecturers, 40);
    assert_eq!(config.output.format, OutputFormat::Csv);
    assert_eq!(config.output.database_name, "course_mgmt_db");
    assert!(config.base_time.is_some());
}

#[test]
fn unknown_keys_are_rejected() {
    let result: Result<GeneratorConfig, _> = toml::from_str("[counts]\nteachers = 3\n");
    assert!(result.is_err());
}

#[test]
fn json_schema_lists_config_sections() {
    let schema = schema_for!(GeneratorConfig);
    let json = serde_json::to_value(&schema).expect("serialize json schema");
    let properties = json
        .get("properties")
        .and_then(|value| value.as_object())
        .expect("properties object");
    for key in ["seed", "counts", "limits", "identity", "output"] {
        assert!(properties.contains_key(key), "missing {key}");
    }
}
