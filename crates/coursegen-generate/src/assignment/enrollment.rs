use std::collections::{HashMap, HashSet};

use coursegen_core::{AssignmentLimits, Course, CourseId, Enrollment, Student, StudentId};
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::context::GenerationContext;
use crate::model::GenerationIssue;

/// Accumulated enrollments with per-student and per-course counters kept
/// in step with every insert.
#[derive(Debug, Clone)]
pub struct EnrollmentBook {
    rows: Vec<Enrollment>,
    student_ids: Vec<StudentId>,
    student_load: Vec<u32>,
    members: HashMap<CourseId, HashSet<StudentId>>,
}

impl EnrollmentBook {
    pub fn new(students: &[Student]) -> Self {
        Self {
            rows: Vec::new(),
            student_ids: students.iter().map(|student| student.student_id).collect(),
            student_load: vec![0; students.len()],
            members: HashMap::new(),
        }
    }

    /// Record an enrollment for the student at `slot` (pool position).
    pub fn enroll(&mut self, slot: usize, course_id: CourseId, grade: u8) {
        let student_id = self.student_ids[slot];
        if !self.members.entry(course_id).or_default().insert(student_id) {
            return;
        }
        self.student_load[slot] += 1;
        self.rows.push(Enrollment {
            student_id,
            course_id,
            grade,
        });
    }

    pub fn is_enrolled(&self, slot: usize, course_id: CourseId) -> bool {
        self.members
            .get(&course_id)
            .is_some_and(|members| members.contains(&self.student_ids[slot]))
    }

    pub fn course_count(&self, course_id: CourseId) -> u32 {
        self.members
            .get(&course_id)
            .map_or(0, |members| members.len() as u32)
    }

    pub fn student_load(&self, slot: usize) -> u32 {
        self.student_load[slot]
    }

    pub fn is_eligible(&self, slot: usize, course_id: CourseId, capacity: u32) -> bool {
        !self.is_enrolled(slot, course_id) && self.student_load[slot] < capacity
    }

    /// Student with the fewest enrollments; ties go to the earliest in pool order.
    pub fn least_loaded(&self) -> Option<usize> {
        self.student_load
            .iter()
            .enumerate()
            .min_by_key(|(slot, load)| (**load, *slot))
            .map(|(slot, _)| slot)
    }

    /// First student in pool order who can still join `course_id`.
    pub fn first_eligible(&self, course_id: CourseId, capacity: u32) -> Option<usize> {
        (0..self.student_ids.len()).find(|slot| self.is_eligible(*slot, course_id, capacity))
    }

    pub fn rows(&self) -> &[Enrollment] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<Enrollment> {
        self.rows
    }
}

/// Voluntary phase: every student picks a random number of distinct courses
/// in `min_courses_per_student..=max_courses_per_student`.
///
/// The draw is clamped to the number of courses so the rejection loop
/// always terminates.
pub fn enroll_students(
    ctx: &mut GenerationContext<'_>,
    students: &[Student],
    courses: &[Course],
    limits: &AssignmentLimits,
    book: &mut EnrollmentBook,
) {
    if courses.is_empty() {
        if !students.is_empty() {
            ctx.record(GenerationIssue::warning(
                "enrollment.no_courses",
                format!("{} students left without enrollments: no courses", students.len()),
            ));
        }
        return;
    }

    let min = limits.min_courses_per_student as usize;
    let max = limits.max_courses_per_student as usize;
    for slot in 0..students.len() {
        let target = ctx.rng.random_range(min..=max).min(courses.len());
        let mut chosen: HashSet<CourseId> = HashSet::with_capacity(target);
        while chosen.len() < target {
            let course = &courses[ctx.rng.random_range(0..courses.len())];
            if !chosen.insert(course.course_id) {
                continue;
            }
            let grade = random_grade(ctx.rng);
            book.enroll(slot, course.course_id, grade);
        }
    }

    info!(
        rows = book.rows().len(),
        students = students.len(),
        "voluntary enrollments generated"
    );
}

/// Progress of the backfill for a single course.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackfillState {
    /// Below the floor; try the least-loaded student next.
    NeedsMore,
    /// The least-loaded student was ineligible; scan the pool in order.
    Searching,
    /// No further student can be added.
    Abandoned,
    /// The floor is reached.
    Satisfied,
}

impl BackfillState {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Abandoned | Self::Satisfied)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AbandonReason {
    NoEligibleStudent,
    IterationCap,
}

/// How the backfill of one under-enrolled course ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackfillOutcome {
    pub course_id: CourseId,
    pub state: BackfillState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<AbandonReason>,
    pub enrolled_before: u32,
    pub enrolled_after: u32,
    pub iterations: u32,
}

/// Top up a course to `min_students_per_course`, preferring the student with
/// the fewest enrollments and falling back to the first eligible student.
pub fn backfill_course(
    ctx: &mut GenerationContext<'_>,
    course_id: CourseId,
    limits: &AssignmentLimits,
    book: &mut EnrollmentBook,
) -> BackfillOutcome {
    let floor = limits.min_students_per_course;
    let capacity = limits.max_courses_per_student;
    let enrolled_before = book.course_count(course_id);
    let mut state = BackfillState::NeedsMore;
    let mut reason = None;
    let mut iterations = 0;

    while !state.is_terminal() {
        if iterations >= limits.max_backfill_iterations {
            reason = Some(AbandonReason::IterationCap);
            state = BackfillState::Abandoned;
            break;
        }
        iterations += 1;

        state = match state {
            BackfillState::NeedsMore => {
                if book.course_count(course_id) >= floor {
                    BackfillState::Satisfied
                } else {
                    match book.least_loaded() {
                        Some(slot) if book.is_eligible(slot, course_id, capacity) => {
                            let grade = random_grade(ctx.rng);
                            book.enroll(slot, course_id, grade);
                            BackfillState::NeedsMore
                        }
                        Some(slot) => {
                            debug!(
                                course_id,
                                student_slot = slot,
                                already_enrolled = book.is_enrolled(slot, course_id),
                                load = book.student_load(slot),
                                "least loaded student ineligible, searching"
                            );
                            BackfillState::Searching
                        }
                        None => BackfillState::Searching,
                    }
                }
            }
            BackfillState::Searching => match book.first_eligible(course_id, capacity) {
                Some(slot) => {
                    let grade = random_grade(ctx.rng);
                    book.enroll(slot, course_id, grade);
                    BackfillState::NeedsMore
                }
                None => {
                    reason = Some(AbandonReason::NoEligibleStudent);
                    BackfillState::Abandoned
                }
            },
            terminal => terminal,
        };
    }

    let enrolled_after = book.course_count(course_id);
    if state == BackfillState::Abandoned {
        let message = match reason {
            Some(AbandonReason::IterationCap) => format!(
                "backfill for course {course_id} hit the iteration cap with {enrolled_after} of {floor} students"
            ),
            _ => format!(
                "no eligible student found for course {course_id}; left with {enrolled_after} of {floor} students"
            ),
        };
        ctx.record(
            GenerationIssue::warning("enrollment.course_under_floor", message)
                .on("Course", course_id),
        );
    }

    BackfillOutcome {
        course_id,
        state,
        reason,
        enrolled_before,
        enrolled_after,
        iterations,
    }
}

/// Backfill every course below the enrollment floor, in course order.
pub fn backfill_minimums(
    ctx: &mut GenerationContext<'_>,
    courses: &[Course],
    limits: &AssignmentLimits,
    book: &mut EnrollmentBook,
) -> Vec<BackfillOutcome> {
    let mut outcomes = Vec::new();
    for course in courses {
        if book.course_count(course.course_id) < limits.min_students_per_course {
            outcomes.push(backfill_course(ctx, course.course_id, limits, book));
        }
    }

    info!(
        courses = outcomes.len(),
        abandoned = outcomes
            .iter()
            .filter(|outcome| outcome.state == BackfillState::Abandoned)
            .count(),
        rows = book.rows().len(),
        "enrollment backfill finished"
    );
    outcomes
}

fn random_grade(rng: &mut dyn RngCore) -> u8 {
    rng.random_range(0..=100)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;

    fn students(count: u32) -> Vec<Student> {
        (1..=count)
            .map(|i| Student {
                student_id: 620_000_000 + i,
                first_name: "Alan".to_string(),
                last_name: "Kay".to_string(),
                user_id: i,
            })
            .collect()
    }

    fn courses(count: u32) -> Vec<Course> {
        (1..=count)
            .map(|course_id| Course {
                course_id,
                course_name: format!("Course {course_id}"),
                course_code: format!("COM{}", 100 + course_id),
            })
            .collect()
    }

    fn base_time() -> chrono::NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 1, 1)
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .expect("valid date")
    }

    #[test]
    fn book_ignores_duplicate_enrollment() {
        let pool = students(2);
        let mut book = EnrollmentBook::new(&pool);
        book.enroll(0, 1, 50);
        book.enroll(0, 1, 70);
        assert_eq!(book.rows().len(), 1);
        assert_eq!(book.student_load(0), 1);
        assert_eq!(book.course_count(1), 1);
        assert!(book.is_enrolled(0, 1));
        assert!(!book.is_enrolled(1, 1));
    }

    #[test]
    fn least_loaded_breaks_ties_by_pool_order() {
        let pool = students(3);
        let mut book = EnrollmentBook::new(&pool);
        book.enroll(0, 1, 10);
        assert_eq!(book.least_loaded(), Some(1));
        book.enroll(1, 1, 10);
        book.enroll(2, 1, 10);
        book.enroll(2, 2, 10);
        assert_eq!(book.least_loaded(), Some(0));
    }

    #[test]
    fn voluntary_phase_stays_in_bounds() {
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        let mut ctx = GenerationContext::new(&mut rng, base_time());
        let pool = students(50);
        let catalog = courses(12);
        let limits = AssignmentLimits::default();
        let mut book = EnrollmentBook::new(&pool);

        enroll_students(&mut ctx, &pool, &catalog, &limits, &mut book);

        for slot in 0..pool.len() {
            let load = book.student_load(slot);
            assert!((3..=6).contains(&load), "slot {slot} has {load}");
        }
        assert!(book.rows().iter().all(|row| row.grade <= 100));
    }

    #[test]
    fn voluntary_phase_clamps_to_available_courses() {
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let mut ctx = GenerationContext::new(&mut rng, base_time());
        let pool = students(5);
        let catalog = courses(2);
        let mut book = EnrollmentBook::new(&pool);

        enroll_students(&mut ctx, &pool, &catalog, &AssignmentLimits::default(), &mut book);

        assert_eq!(book.rows().len(), 10);
    }

    #[test]
    fn backfill_reaches_floor() {
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let mut ctx = GenerationContext::new(&mut rng, base_time());
        let pool = students(12);
        let mut book = EnrollmentBook::new(&pool);
        book.enroll(0, 1, 80);

        let outcome = backfill_course(&mut ctx, 1, &AssignmentLimits::default(), &mut book);

        assert_eq!(outcome.state, BackfillState::Satisfied);
        assert_eq!(outcome.enrolled_before, 1);
        assert_eq!(outcome.enrolled_after, 10);
        assert!(ctx.issues.is_empty());
    }

    #[test]
    fn backfill_searches_past_enrolled_least_loaded_student() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut ctx = GenerationContext::new(&mut rng, base_time());
        let pool = students(3);
        let mut book = EnrollmentBook::new(&pool);
        book.enroll(0, 1, 80);
        book.enroll(1, 2, 80);
        book.enroll(1, 3, 80);
        book.enroll(2, 2, 80);
        book.enroll(2, 3, 80);
        let limits = AssignmentLimits {
            min_students_per_course: 2,
            ..AssignmentLimits::default()
        };

        let outcome = backfill_course(&mut ctx, 1, &limits, &mut book);

        assert_eq!(outcome.state, BackfillState::Satisfied);
        assert!(book.is_enrolled(1, 1));
        assert!(!book.is_enrolled(2, 1));
    }

    #[test]
    fn backfill_abandons_when_everyone_is_full() {
        let mut rng = ChaCha8Rng::seed_from_u64(6);
        let mut ctx = GenerationContext::new(&mut rng, base_time());
        let pool = students(3);
        let limits = AssignmentLimits {
            max_courses_per_student: 1,
            ..AssignmentLimits::default()
        };
        let mut book = EnrollmentBook::new(&pool);
        book.enroll(0, 1, 80);
        book.enroll(1, 2, 80);

        let outcome = backfill_course(&mut ctx, 1, &limits, &mut book);

        assert_eq!(outcome.state, BackfillState::Abandoned);
        assert_eq!(outcome.reason, Some(AbandonReason::NoEligibleStudent));
        assert_eq!(outcome.enrolled_after, 2);
        assert_eq!(ctx.issues.len(), 1);
        assert_eq!(ctx.issues[0].code, "enrollment.course_under_floor");
    }

    #[test]
    fn backfill_respects_iteration_cap() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut ctx = GenerationContext::new(&mut rng, base_time());
        let pool = students(20);
        let limits = AssignmentLimits {
            max_backfill_iterations: 3,
            ..AssignmentLimits::default()
        };
        let mut book = EnrollmentBook::new(&pool);

        let outcome = backfill_course(&mut ctx, 1, &limits, &mut book);

        assert_eq!(outcome.state, BackfillState::Abandoned);
        assert_eq!(outcome.reason, Some(AbandonReason::IterationCap));
        assert_eq!(outcome.iterations, 3);
        assert_eq!(outcome.enrolled_after, 3);
    }
}
