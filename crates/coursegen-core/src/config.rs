use chrono::NaiveDateTime;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Full configuration for a generation run.
///
/// Every section falls back to its defaults, so an empty TOML file is a
/// valid configuration.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Seed for the run's random source.
    pub seed: u64,
    /// Reference instant for "future" dates. Defaults to the current UTC time.
    pub base_time: Option<NaiveDateTime>,
    pub counts: EntityCounts,
    pub limits: AssignmentLimits,
    pub identity: IdentityOptions,
    pub output: OutputOptions,
    /// Departments added to the built-in catalog. Departments without known
    /// subjects yield placeholder courses.
    pub extra_departments: Vec<String>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            base_time: None,
            counts: EntityCounts::default(),
            limits: AssignmentLimits::default(),
            identity: IdentityOptions::default(),
            output: OutputOptions::default(),
            extra_departments: Vec::new(),
        }
    }
}

/// Number of rows requested per generated table.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(default, deny_unknown_fields)]
pub struct EntityCounts {
    pub lecturers: u32,
    pub courses: u32,
    pub students: u32,
    pub assignments: u32,
    pub forums: u32,
    pub threads: u32,
    pub events: u32,
    /// Defaults to three items per course when absent.
    pub course_content: Option<u32>,
}

impl EntityCounts {
    pub fn course_content(&self) -> u32 {
        self.course_content
            .unwrap_or_else(|| self.courses.saturating_mul(3))
    }
}

impl Default for EntityCounts {
    fn default() -> Self {
        Self {
            lecturers: 40,
            courses: 200,
            students: 100_000,
            assignments: 600,
            forums: 80,
            threads: 200,
            events: 150,
            course_content: None,
        }
    }
}

/// Capacity bounds enforced by the assignment engine.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct AssignmentLimits {
    /// Maximum `CourseLecturer` rows per lecturer.
    pub max_courses_per_lecturer: u32,
    /// Lower bound of the voluntary enrollment draw per student.
    pub min_courses_per_student: u32,
    /// Upper bound of the voluntary draw and hard cap on enrollments per student.
    pub max_courses_per_student: u32,
    /// Enrollment floor the backfill phase tries to reach for every course.
    pub min_students_per_course: u32,
    /// Iterations the backfill of a single course may take before it is abandoned.
    pub max_backfill_iterations: u32,
}

impl Default for AssignmentLimits {
    fn default() -> Self {
        Self {
            max_courses_per_lecturer: 5,
            min_courses_per_student: 3,
            max_courses_per_student: 6,
            min_students_per_course: 10,
            max_backfill_iterations: 1_000,
        }
    }
}

/// Id offsets and credentials used when fabricating users.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(default, deny_unknown_fields)]
pub struct IdentityOptions {
    pub lecturer_id_offset: u32,
    pub student_id_offset: u32,
    /// Plaintext hashed into every lecturer and student account.
    pub default_password: String,
    pub admin_username: String,
    pub admin_password: String,
}

impl Default for IdentityOptions {
    fn default() -> Self {
        Self {
            lecturer_id_offset: 10_000_000,
            student_id_offset: 620_000_000,
            default_password: "password".to_string(),
            admin_username: "admin".to_string(),
            admin_password: "admin".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    Sql,
    Csv,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(default, deny_unknown_fields)]
pub struct OutputOptions {
    pub database_name: String,
    /// Rows per `INSERT` statement; `0` emits one statement per table.
    pub insert_batch_size: usize,
    pub format: OutputFormat,
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            database_name: "course_mgmt_db".to_string(),
            insert_batch_size: 1_000,
            format: OutputFormat::Sql,
        }
    }
}

/// Reject configurations that cannot produce a consistent dataset.
///
/// This checks:
/// - enrollment bounds are ordered and lecturer capacity is non-zero
/// - students have courses to enroll in
/// - id ranges fit in 32 bits, including lecturers synthesized for courses
/// - the database name is a plain identifier
pub fn validate_config(config: &GeneratorConfig) -> Result<()> {
    let limits = &config.limits;
    if limits.max_courses_per_lecturer == 0 {
        return Err(Error::InvalidConfig(
            "limits.max_courses_per_lecturer must be at least 1".to_string(),
        ));
    }
    if limits.min_courses_per_student > limits.max_courses_per_student {
        return Err(Error::InvalidConfig(format!(
            "limits.min_courses_per_student ({}) exceeds limits.max_courses_per_student ({})",
            limits.min_courses_per_student, limits.max_courses_per_student
        )));
    }
    if limits.max_backfill_iterations == 0 && limits.min_students_per_course > 0 {
        return Err(Error::InvalidConfig(
            "limits.max_backfill_iterations must be at least 1".to_string(),
        ));
    }

    let counts = &config.counts;
    if counts.students > 0 && counts.courses == 0 && limits.min_courses_per_student > 0 {
        return Err(Error::InvalidConfig(
            "students require at least one course to enroll in".to_string(),
        ));
    }

    let identity = &config.identity;
    // Every course may need a synthesized lecturer once the pool is full.
    let synthesis_headroom = counts
        .courses
        .div_ceil(limits.max_courses_per_lecturer);
    if identity
        .lecturer_id_offset
        .checked_add(counts.lecturers)
        .and_then(|last| last.checked_add(synthesis_headroom))
        .is_none()
    {
        return Err(Error::InvalidConfig(format!(
            "identity.lecturer_id_offset + counts.lecturers leaves no room for {synthesis_headroom} synthesized lecturers"
        )));
    }
    if identity
        .student_id_offset
        .checked_add(counts.students)
        .is_none()
    {
        return Err(Error::InvalidConfig(
            "identity.student_id_offset + counts.students overflows".to_string(),
        ));
    }
    if identity.admin_username.trim().is_empty() {
        return Err(Error::InvalidConfig(
            "identity.admin_username must not be empty".to_string(),
        ));
    }

    let name = &config.output.database_name;
    if name.is_empty()
        || !name
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || ch == '_')
    {
        return Err(Error::InvalidConfig(format!(
            "output.database_name '{name}' must be a non-empty [A-Za-z0-9_] identifier"
        )));
    }

    Ok(())
}
