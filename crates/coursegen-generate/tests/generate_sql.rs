use std::fs;
use std::path::PathBuf;

use chrono::NaiveDate;
use coursegen_core::{EntityCounts, GeneratorConfig, OutputFormat};
use coursegen_generate::{GenerateOptions, GenerationEngine, GenerationError};

fn small_config() -> GeneratorConfig {
    GeneratorConfig {
        seed: 1234,
        base_time: NaiveDate::from_ymd_opt(2025, 3, 1).and_then(|date| date.and_hms_opt(8, 30, 0)),
        counts: EntityCounts {
            lecturers: 2,
            courses: 12,
            students: 80,
            assignments: 20,
            forums: 5,
            threads: 10,
            events: 7,
            course_content: None,
        },
        ..GeneratorConfig::default()
    }
}

fn temp_out_dir(label: &str) -> PathBuf {
    let mut dir = std::env::temp_dir();
    dir.push(format!("coursegen_generate_{label}_{}", uuid::Uuid::new_v4()));
    fs::create_dir_all(&dir).expect("create temp out dir");
    dir
}

fn engine(label: &str) -> GenerationEngine {
    GenerationEngine::new(GenerateOptions {
        out_dir: temp_out_dir(label),
        ..GenerateOptions::default()
    })
}

#[test]
fn run_writes_scripts_and_report() {
    let result = engine("files").run(&small_config()).expect("run generation");

    for file in [
        "create_database.sql",
        "create_tables.sql",
        "create_views.sql",
        "insert_users.sql",
        "insert_lecturers.sql",
        "insert_courses.sql",
        "insert_course_lecturer.sql",
        "insert_course_content.sql",
        "insert_students.sql",
        "insert_enrollments.sql",
        "insert_assignments.sql",
        "insert_forums.sql",
        "insert_threads.sql",
        "insert_events.sql",
        "resolved_config.json",
        "generation_report.json",
    ] {
        assert!(result.run_dir.join(file).exists(), "missing {file}");
    }

    let users = fs::read_to_string(result.run_dir.join("insert_users.sql")).expect("read users");
    assert!(users.starts_with("INSERT INTO User (UserId, Username, Password, Role, Salt) VALUES"));
    assert!(users.contains("'admin', "));

    let report: serde_json::Value = serde_json::from_str(
        &fs::read_to_string(result.run_dir.join("generation_report.json")).expect("read report"),
    )
    .expect("parse report");
    let tables = report
        .get("tables")
        .and_then(|value| value.as_array())
        .expect("tables array");
    let courses = tables
        .iter()
        .find(|table| table.get("table") == Some(&serde_json::Value::String("Course".to_string())))
        .expect("course report");
    assert_eq!(courses.get("rows_generated").and_then(|v| v.as_u64()), Some(12));
    assert_eq!(courses.get("rows_requested").and_then(|v| v.as_u64()), Some(12));

    let lecturers = result.report.table("Lecturer").expect("lecturer report");
    assert_eq!(lecturers.rows_generated, 4);
    assert_eq!(lecturers.rows_requested, Some(2));
    assert_eq!(
        result.report.synthesized_lecturers,
        vec![10_000_003, 10_000_004]
    );
}

#[test]
fn run_is_deterministic_for_fixed_seed_and_time() {
    let result_a = engine("det_a").run(&small_config()).expect("run A");
    let result_b = engine("det_b").run(&small_config()).expect("run B");

    for file in ["insert_users.sql", "insert_enrollments.sql", "insert_events.sql"] {
        let a = fs::read_to_string(result_a.run_dir.join(file)).expect("read A");
        let b = fs::read_to_string(result_b.run_dir.join(file)).expect("read B");
        assert_eq!(a, b, "{file} should be deterministic");
    }
}

#[test]
fn csv_format_writes_one_file_per_table() {
    let mut config = small_config();
    config.output.format = OutputFormat::Csv;
    let result = engine("csv").run(&config).expect("run generation");

    let enrollments =
        fs::read_to_string(result.run_dir.join("Enrollment.csv")).expect("read enrollments");
    let mut lines = enrollments.lines();
    assert_eq!(lines.next(), Some("StudentID,CourseId,Grade"));
    assert!(lines.count() >= 120);
    assert!(!result.run_dir.join("insert_enrollments.sql").exists());
    assert!(result.run_dir.join("create_tables.sql").exists());
}

#[test]
fn strict_mode_fails_on_under_enrolled_courses() {
    let mut config = small_config();
    config.counts.students = 3;
    let engine = GenerationEngine::new(GenerateOptions {
        out_dir: temp_out_dir("strict"),
        strict: true,
    });

    match engine.run(&config) {
        Err(GenerationError::Failed(report)) => {
            let audit = report.audit.as_ref().expect("audit recorded");
            assert_eq!(audit.under_enrolled_courses.len(), 12);
            assert!(report.warnings_by_code.contains_key("generation.failed"));
        }
        other => panic!("expected strict failure, got {other:?}"),
    }
}

#[test]
fn invalid_config_is_rejected_before_writing() {
    let mut config = small_config();
    config.limits.min_courses_per_student = 9;
    let out_dir = temp_out_dir("invalid");
    let engine = GenerationEngine::new(GenerateOptions {
        out_dir: out_dir.clone(),
        ..GenerateOptions::default()
    });

    assert!(matches!(engine.run(&config), Err(GenerationError::Core(_))));
    assert_eq!(fs::read_dir(&out_dir).expect("read out dir").count(), 0);
}

#[test]
fn toml_config_drives_a_run() {
    let config: GeneratorConfig = toml::from_str(
        r#"
seed = 1234
base_time = "2025-03-01T08:30:00"

[counts]
lecturers = 2
courses = 12
students = 80
assignments = 20
forums = 5
threads = 10
events = 7

[output]
format = "csv"
"#,
    )
    .expect("parse toml config");
    assert_eq!(config.output.format, OutputFormat::Csv);

    let from_toml = engine("toml").run(&config).expect("run from toml");
    let mut from_struct = small_config();
    from_struct.output.format = OutputFormat::Csv;
    let from_struct = engine("struct").run(&from_struct).expect("run from struct");

    let a = fs::read_to_string(from_toml.run_dir.join("User.csv")).expect("read toml users");
    let b = fs::read_to_string(from_struct.run_dir.join("User.csv")).expect("read struct users");
    assert_eq!(a, b);
}
