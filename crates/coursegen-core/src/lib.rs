//! Core contracts for coursegen.
//!
//! Defines the course-management entities, the generator configuration and
//! the dataset audit shared by the generation engine and the CLI.

pub mod config;
pub mod entities;
pub mod error;
pub mod validation;

pub use config::{
    AssignmentLimits, EntityCounts, GeneratorConfig, IdentityOptions, OutputFormat,
    OutputOptions, validate_config,
};
pub use entities::{
    Assignment, CalendarEvent, Course, CourseContent, CourseId, CourseLecturer, Dataset,
    DiscussionThread, Enrollment, Forum, LecturerId, Lecturer, Role, Student, StudentId, User,
    UserId,
};
pub use error::{Error, Result};
pub use validation::{
    CapacityViolation, CourseShortfall, DanglingReference, DatasetAudit, audit_dataset,
    validate_dataset,
};

/// Contract version for `generation_report.json` artifacts.
pub const REPORT_VERSION: &str = "0.1";
