use std::collections::HashSet;

use coursegen_core::Course;
use tracing::info;

use crate::context::GenerationContext;
use crate::model::GenerationIssue;

/// Draws allowed per course before generation gives up on uniqueness.
pub const MAX_COURSE_ATTEMPTS: u32 = 1_000;

/// Courses with ids `1..=count` and unique names and codes.
///
/// Stops early, returning the courses built so far, when a unique
/// name/code pair cannot be found within [`MAX_COURSE_ATTEMPTS`] draws.
pub fn generate_courses(ctx: &mut GenerationContext<'_>, count: u32) -> Vec<Course> {
    let mut courses = Vec::with_capacity(count as usize);
    let mut names = HashSet::new();
    let mut codes = HashSet::new();

    for course_id in 1..=count {
        let mut attempts = 0;
        let identity = loop {
            attempts += 1;
            if attempts > MAX_COURSE_ATTEMPTS {
                break None;
            }
            let department = ctx.catalog.random_department(ctx.rng).to_string();
            let candidate = ctx.catalog.course_for_department(&department, ctx.rng);
            if !names.contains(&candidate.name) && !codes.contains(&candidate.code) {
                break Some(candidate);
            }
        };

        let Some(identity) = identity else {
            ctx.record(
                GenerationIssue::error(
                    "course.unique_attempts_exhausted",
                    format!(
                        "could not generate a unique course after {MAX_COURSE_ATTEMPTS} attempts; \
                         keeping {} of {count} courses",
                        courses.len()
                    ),
                )
                .on("Course", course_id),
            );
            break;
        };

        names.insert(identity.name.clone());
        codes.insert(identity.code.clone());
        courses.push(Course {
            course_id,
            course_name: identity.name,
            course_code: identity.code,
        });
    }

    info!(rows = courses.len(), requested = count, "courses generated");
    courses
}
