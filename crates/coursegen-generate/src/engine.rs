use std::path::PathBuf;
use std::time::Instant;

use chrono::{NaiveDateTime, Utc};
use coursegen_core::{
    Dataset, GeneratorConfig, LecturerId, Role, audit_dataset, validate_config,
};
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{info, warn};

use crate::assignment::{BackfillOutcome, assign_courses};
use crate::catalog::DepartmentCatalog;
use crate::context::GenerationContext;
use crate::errors::GenerationError;
use crate::generators::{
    generate_assignments, generate_calendar_events, generate_course_content, generate_courses,
    generate_forums, generate_lecturers, generate_students, generate_threads,
};
use crate::model::{GenerateOptions, GenerationIssue, GenerationReport};
use crate::output::emit_dataset;

/// In-memory output of a generation run.
#[derive(Debug, Clone)]
pub struct GeneratedDataset {
    pub dataset: Dataset,
    pub synthesized_lecturers: Vec<LecturerId>,
    pub backfills: Vec<BackfillOutcome>,
    pub issues: Vec<GenerationIssue>,
}

/// Generate every table in dependency order without touching the filesystem.
///
/// Lecturers, courses and students come first; the assignment engine then
/// links them (possibly growing the lecturer and user pools) and the admin
/// account is appended last.
pub fn generate_dataset(
    config: &GeneratorConfig,
    rng: &mut dyn RngCore,
) -> Result<GeneratedDataset, GenerationError> {
    validate_config(config)?;

    let base_time = resolve_base_time(config);
    let mut ctx = GenerationContext::new(rng, base_time)
        .with_catalog(DepartmentCatalog::new(&config.extra_departments))
        .with_identity(config.identity.clone());
    let counts = &config.counts;

    let mut lecturers = generate_lecturers(&mut ctx, counts.lecturers);
    let courses = generate_courses(&mut ctx, counts.courses);
    let students = generate_students(&mut ctx, counts.students);
    let assignments = generate_assignments(&mut ctx, counts.assignments, &courses);
    let forums = generate_forums(&mut ctx, counts.forums, &courses);
    let threads = generate_threads(&mut ctx, counts.threads, &forums, &students);
    let events = generate_calendar_events(&mut ctx, counts.events, &courses);
    let course_content = generate_course_content(&mut ctx, counts.course_content(), &courses);

    let outcome = assign_courses(&mut ctx, &courses, &mut lecturers, &students, &config.limits);

    let identity = &config.identity;
    ctx.users.register_named(
        &identity.admin_username,
        Role::Admin,
        &identity.admin_password,
        ctx.rng,
    );

    let GenerationContext { users, issues, .. } = ctx;
    let dataset = Dataset {
        users: users.into_users(),
        lecturers,
        courses,
        students,
        course_lecturers: outcome.course_lecturers,
        enrollments: outcome.enrollments,
        assignments,
        forums,
        threads,
        events,
        course_content,
    };

    Ok(GeneratedDataset {
        dataset,
        synthesized_lecturers: outcome.synthesized_lecturers,
        backfills: outcome.backfills,
        issues,
    })
}

/// Generate with the ChaCha8 stream seeded from `config.seed`.
pub fn generate_seeded(config: &GeneratorConfig) -> Result<GeneratedDataset, GenerationError> {
    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
    generate_dataset(config, &mut rng)
}

fn resolve_base_time(config: &GeneratorConfig) -> NaiveDateTime {
    config
        .base_time
        .unwrap_or_else(|| Utc::now().naive_utc())
}

/// Result of a generation run.
#[derive(Debug, Clone)]
pub struct GenerationResult {
    pub run_dir: PathBuf,
    pub report: GenerationReport,
}

/// Entry point for generating and writing a dataset.
#[derive(Debug, Clone)]
pub struct GenerationEngine {
    options: GenerateOptions,
}

impl GenerationEngine {
    pub fn new(options: GenerateOptions) -> Self {
        Self { options }
    }

    pub fn run(&self, config: &GeneratorConfig) -> Result<GenerationResult, GenerationError> {
        validate_config(config)?;

        let start = Instant::now();
        let run_id = uuid::Uuid::new_v4().to_string();
        let timestamp = Utc::now().format("%Y-%m-%dT%H-%M-%SZ").to_string();
        let run_dir = self
            .options
            .out_dir
            .join(format!("{timestamp}__run_{run_id}"));
        std::fs::create_dir_all(&run_dir)?;

        let mut resolved = config.clone();
        resolved.base_time = Some(resolve_base_time(config));
        std::fs::write(
            run_dir.join("resolved_config.json"),
            serde_json::to_vec_pretty(&resolved)?,
        )?;

        info!(
            run_id = %run_id,
            seed = resolved.seed,
            lecturers = resolved.counts.lecturers,
            courses = resolved.counts.courses,
            students = resolved.counts.students,
            "generation started"
        );

        let mut report = GenerationReport::new(run_id.clone(), resolved.seed);
        let generated = generate_seeded(&resolved)?;

        for issue in generated.issues {
            report.record_warning(issue);
        }
        report.synthesized_lecturers = generated.synthesized_lecturers;
        report.backfills = generated.backfills;

        let audit = audit_dataset(&generated.dataset, &resolved.limits);
        let consistent = audit.is_consistent();
        let under_enrolled = audit.under_enrolled_courses.len();
        report.audit = Some(audit);

        let write_report = |report: &GenerationReport| -> Result<(), GenerationError> {
            std::fs::write(
                run_dir.join("generation_report.json"),
                serde_json::to_vec_pretty(report)?,
            )?;
            Ok(())
        };

        if !consistent || (self.options.strict && under_enrolled > 0) {
            report.record_warning(GenerationIssue::error(
                "generation.failed",
                if consistent {
                    format!("{under_enrolled} courses below the enrollment floor (strict mode)")
                } else {
                    "generated dataset violates assignment invariants".to_string()
                },
            ));
            report.duration_ms = start.elapsed().as_millis() as u64;
            write_report(&report)?;
            warn!(run_id = %run_id, under_enrolled, consistent, "generation failed");
            return Err(GenerationError::Failed(Box::new(report)));
        }

        let tables = emit_dataset(&run_dir, &generated.dataset, &resolved)?;
        for mut table in tables {
            table.rows_requested = rows_requested(&resolved, &table.table);
            report.record_table(table);
        }

        report.duration_ms = start.elapsed().as_millis() as u64;
        write_report(&report)?;
        info!(
            run_id = %run_id,
            tables = report.tables.len(),
            synthesized_lecturers = report.synthesized_lecturers.len(),
            under_enrolled,
            bytes_written = report.bytes_written,
            duration_ms = report.duration_ms,
            "generation completed"
        );

        Ok(GenerationResult { run_dir, report })
    }
}

fn rows_requested(config: &GeneratorConfig, table: &str) -> Option<u64> {
    let counts = &config.counts;
    let rows = match table {
        "Lecturer" => counts.lecturers,
        "Course" => counts.courses,
        "Student" => counts.students,
        "Assignment" => counts.assignments,
        "Forum" => counts.forums,
        "DiscussionThread" => counts.threads,
        "CalendarEvent" => counts.events,
        "CourseContent" => counts.course_content(),
        _ => return None,
    };
    Some(u64::from(rows))
}
