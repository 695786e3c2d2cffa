//! Constrained assignment of lecturers and students to courses.
//!
//! Lecturers are assigned greedily in pool order under a per-lecturer
//! capacity, synthesizing new lecturers when the pool is exhausted.
//! Students first enroll voluntarily, then under-enrolled courses are
//! backfilled toward the per-course floor.

pub mod enrollment;
pub mod lecturers;

use coursegen_core::{AssignmentLimits, Course, CourseLecturer, Enrollment, Lecturer, LecturerId, Student};

use crate::context::GenerationContext;

pub use enrollment::{
    AbandonReason, BackfillOutcome, BackfillState, EnrollmentBook, backfill_course,
    backfill_minimums, enroll_students,
};
pub use lecturers::{
    LecturerAssignment, LecturerLoad, assign_lecturer_to_course, assign_lecturers,
    next_lecturer_id,
};

/// Association rows produced by the assignment engine.
#[derive(Debug, Clone, Default)]
pub struct AssignmentOutcome {
    pub course_lecturers: Vec<CourseLecturer>,
    pub enrollments: Vec<Enrollment>,
    pub synthesized_lecturers: Vec<LecturerId>,
    pub backfills: Vec<BackfillOutcome>,
}

/// Run lecturer assignment, voluntary enrollment and backfill in order.
///
/// May append to `lecturers` and to the context's user pool. Never fails:
/// courses the backfill cannot satisfy are recorded as issues.
pub fn assign_courses(
    ctx: &mut GenerationContext<'_>,
    courses: &[Course],
    lecturers: &mut Vec<Lecturer>,
    students: &[Student],
    limits: &AssignmentLimits,
) -> AssignmentOutcome {
    let mut load = LecturerLoad::new(lecturers);
    let (course_lecturers, synthesized_lecturers) = assign_lecturers(
        ctx,
        courses,
        lecturers,
        &mut load,
        limits.max_courses_per_lecturer,
    );

    let mut book = EnrollmentBook::new(students);
    enroll_students(ctx, students, courses, limits, &mut book);
    let backfills = backfill_minimums(ctx, courses, limits, &mut book);

    AssignmentOutcome {
        course_lecturers,
        enrollments: book.into_rows(),
        synthesized_lecturers,
        backfills,
    }
}
