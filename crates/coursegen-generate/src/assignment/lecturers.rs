use std::collections::HashMap;

use coursegen_core::{Course, CourseLecturer, Lecturer, LecturerId};
use tracing::info;

use crate::context::GenerationContext;
use crate::generators::synthesize_lecturer;
use crate::model::GenerationIssue;

/// Number of `CourseLecturer` rows recorded per lecturer.
#[derive(Debug, Clone, Default)]
pub struct LecturerLoad {
    counts: HashMap<LecturerId, u32>,
}

impl LecturerLoad {
    /// Every lecturer in `lecturers` starts with zero courses.
    pub fn new(lecturers: &[Lecturer]) -> Self {
        Self {
            counts: lecturers.iter().map(|lec| (lec.lec_id, 0)).collect(),
        }
    }

    pub fn count(&self, lec_id: LecturerId) -> u32 {
        self.counts.get(&lec_id).copied().unwrap_or(0)
    }

    pub fn set(&mut self, lec_id: LecturerId, count: u32) {
        self.counts.insert(lec_id, count);
    }

    pub fn record(&mut self, lec_id: LecturerId) {
        *self.counts.entry(lec_id).or_insert(0) += 1;
    }
}

/// Largest lecturer id in the live pool plus one, or `floor + 1` for an
/// empty pool. `None` once the id space is exhausted.
pub fn next_lecturer_id(lecturers: &[Lecturer], floor: LecturerId) -> Option<LecturerId> {
    lecturers
        .iter()
        .map(|lec| lec.lec_id)
        .max()
        .unwrap_or(floor)
        .checked_add(1)
}

/// Result of assigning a lecturer to one course.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LecturerAssignment {
    pub row: CourseLecturer,
    /// Set when no existing lecturer had spare capacity.
    pub synthesized: bool,
}

/// Assign the first lecturer (in pool order) under `capacity`, synthesizing
/// a new lecturer and user when the whole pool is full.
///
/// Returns `None`, recording an issue, when a lecturer is needed but no
/// lecturer id is left.
pub fn assign_lecturer_to_course(
    ctx: &mut GenerationContext<'_>,
    course: &Course,
    lecturers: &mut Vec<Lecturer>,
    load: &mut LecturerLoad,
    capacity: u32,
) -> Option<LecturerAssignment> {
    if let Some(lecturer) = lecturers
        .iter()
        .find(|lecturer| load.count(lecturer.lec_id) < capacity)
    {
        load.record(lecturer.lec_id);
        return Some(LecturerAssignment {
            row: CourseLecturer {
                course_id: course.course_id,
                lec_id: lecturer.lec_id,
            },
            synthesized: false,
        });
    }

    let Some(lec_id) = next_lecturer_id(lecturers, ctx.identity.lecturer_id_offset) else {
        ctx.record(
            GenerationIssue::error(
                "lecturer.id_space_exhausted",
                format!(
                    "no lecturer id left to synthesize a lecturer for course {}",
                    course.course_id
                ),
            )
            .on("Course", course.course_id),
        );
        return None;
    };
    let lecturer = synthesize_lecturer(ctx, lec_id);
    info!(
        course_id = course.course_id,
        lec_id,
        user_id = lecturer.user_id,
        "lecturer pool at capacity, synthesized lecturer"
    );
    lecturers.push(lecturer);
    load.set(lec_id, 1);

    Some(LecturerAssignment {
        row: CourseLecturer {
            course_id: course.course_id,
            lec_id,
        },
        synthesized: true,
    })
}

/// One `CourseLecturer` row per course, in course order. Courses left without
/// a lecturer id are skipped and reported through the context.
pub fn assign_lecturers(
    ctx: &mut GenerationContext<'_>,
    courses: &[Course],
    lecturers: &mut Vec<Lecturer>,
    load: &mut LecturerLoad,
    capacity: u32,
) -> (Vec<CourseLecturer>, Vec<LecturerId>) {
    let mut rows = Vec::with_capacity(courses.len());
    let mut synthesized = Vec::new();

    for course in courses {
        let Some(assignment) = assign_lecturer_to_course(ctx, course, lecturers, load, capacity)
        else {
            continue;
        };
        if assignment.synthesized {
            synthesized.push(assignment.row.lec_id);
        }
        rows.push(assignment.row);
    }

    info!(
        rows = rows.len(),
        synthesized = synthesized.len(),
        lecturers = lecturers.len(),
        "lecturers assigned to courses"
    );
    (rows, synthesized)
}
