//! Synthetic data generation for the course-management schema.
//!
//! Fabricates users, lecturers, students and courses, assigns lecturers and
//! enrollments under capacity limits, and emits the result as SQL (or CSV)
//! ready for bulk loading.

pub mod assignment;
pub mod catalog;
pub mod context;
pub mod engine;
pub mod errors;
pub mod generators;
pub mod identity;
pub mod model;
pub mod output;

pub use assignment::{AssignmentOutcome, BackfillOutcome, BackfillState};
pub use context::GenerationContext;
pub use engine::{
    GeneratedDataset, GenerationEngine, GenerationResult, generate_dataset,
    generate_seeded,
};
pub use errors::GenerationError;
pub use model::{GenerateOptions, GenerationIssue, GenerationReport, TableReport};
