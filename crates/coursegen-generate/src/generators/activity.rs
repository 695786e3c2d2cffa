use coursegen_core::{
    Assignment, CalendarEvent, Course, CourseContent, DiscussionThread, Forum, Student,
};
use fake::Fake;
use fake::faker::internet::en::DomainSuffix;
use fake::faker::lorem::en::{Paragraphs, Word};
use rand::{Rng, RngCore};
use serde_json::json;
use tracing::info;

use super::{DATETIME_FORMAT, future_datetime, lorem_paragraph, lorem_sentence, pick_index};
use crate::context::GenerationContext;
use crate::model::GenerationIssue;

const COMMON_FILE_TYPES: &[&str] = &["pdf", "docx", "pptx", "xlsx", "txt", "png", "mp4", "zip"];

pub fn generate_assignments(
    ctx: &mut GenerationContext<'_>,
    count: u32,
    courses: &[Course],
) -> Vec<Assignment> {
    if !has_parents(ctx, "Assignment", "Course", count, courses.len()) {
        return Vec::new();
    }

    let assignments: Vec<Assignment> = (1..=count)
        .map(|assignment_id| {
            let course = &courses[pick_index(courses.len(), ctx.rng)];
            let due = future_datetime(ctx.base_time, ctx.rng);
            Assignment {
                assignment_id,
                course_id: course.course_id,
                title: format!("Assignment {assignment_id} - {}", course.course_name),
                description: lorem_sentence(ctx.rng),
                due_date: due.format(DATETIME_FORMAT).to_string(),
            }
        })
        .collect();
    info!(rows = assignments.len(), "assignments generated");
    assignments
}

pub fn generate_forums(
    ctx: &mut GenerationContext<'_>,
    count: u32,
    courses: &[Course],
) -> Vec<Forum> {
    if !has_parents(ctx, "Forum", "Course", count, courses.len()) {
        return Vec::new();
    }

    let forums: Vec<Forum> = (1..=count)
        .map(|forum_id| {
            let course = &courses[pick_index(courses.len(), ctx.rng)];
            Forum {
                forum_id,
                course_id: course.course_id,
                title: format!("Forum {forum_id} - {}", course.course_name),
            }
        })
        .collect();
    info!(rows = forums.len(), "forums generated");
    forums
}

/// Threads posted by random students in random forums.
pub fn generate_threads(
    ctx: &mut GenerationContext<'_>,
    count: u32,
    forums: &[Forum],
    students: &[Student],
) -> Vec<DiscussionThread> {
    if !has_parents(ctx, "DiscussionThread", "Forum", count, forums.len())
        || !has_parents(ctx, "DiscussionThread", "Student", count, students.len())
    {
        return Vec::new();
    }

    let threads: Vec<DiscussionThread> = (1..=count)
        .map(|thread_id| {
            let forum = &forums[pick_index(forums.len(), ctx.rng)];
            let student = &students[pick_index(students.len(), ctx.rng)];
            DiscussionThread {
                thread_id,
                forum_id: forum.forum_id,
                user_id: student.student_id,
                title: format!("Thread {thread_id}"),
                post: lorem_paragraph(ctx.rng),
            }
        })
        .collect();
    info!(rows = threads.len(), "threads generated");
    threads
}

pub fn generate_calendar_events(
    ctx: &mut GenerationContext<'_>,
    count: u32,
    courses: &[Course],
) -> Vec<CalendarEvent> {
    if !has_parents(ctx, "CalendarEvent", "Course", count, courses.len()) {
        return Vec::new();
    }

    let events: Vec<CalendarEvent> = (1..=count)
        .map(|event_id| {
            let course = &courses[pick_index(courses.len(), ctx.rng)];
            let at = future_datetime(ctx.base_time, ctx.rng);
            CalendarEvent {
                event_id,
                course_id: course.course_id,
                event_date: at.format("%Y-%m-%d").to_string(),
                event_time: at.format("%H:%M:%S").to_string(),
                description: lorem_sentence(ctx.rng),
            }
        })
        .collect();
    info!(rows = events.len(), "calendar events generated");
    events
}

/// Links, file stubs and slides attached to random course sections.
pub fn generate_course_content(
    ctx: &mut GenerationContext<'_>,
    count: u32,
    courses: &[Course],
) -> Vec<CourseContent> {
    if !has_parents(ctx, "CourseContent", "Course", count, courses.len()) {
        return Vec::new();
    }

    let mut content = Vec::with_capacity(count as usize);
    for content_id in 1..=count {
        let course = &courses[pick_index(courses.len(), ctx.rng)];
        let section: u8 = ctx.rng.random_range(1..=20);
        let (body, metadata) = match ctx.rng.random_range(0..3) {
            0 => (random_url(ctx.rng), json!({ "type": "link" })),
            1 => {
                let extension = COMMON_FILE_TYPES[pick_index(COMMON_FILE_TYPES.len(), ctx.rng)];
                let size: u32 = ctx.rng.random_range(100..=1_000_000);
                (
                    format!("file_data_{content_id}"),
                    json!({
                        "type": "file",
                        "filename": format!("file_{content_id}.{extension}"),
                        "size": size,
                    }),
                )
            }
            _ => {
                let paragraphs: Vec<String> = Paragraphs(2..3).fake_with_rng(ctx.rng);
                (paragraphs.join("\n"), json!({ "type": "slide" }))
            }
        };
        content.push(CourseContent {
            content_id,
            course_id: course.course_id,
            section,
            content: body,
            metadata: metadata.to_string(),
        });
    }
    info!(rows = content.len(), "course content generated");
    content
}

fn random_url(rng: &mut dyn RngCore) -> String {
    let host: String = Word().fake_with_rng(rng);
    let suffix: String = DomainSuffix().fake_with_rng(rng);
    let path: String = Word().fake_with_rng(rng);
    format!("https://www.{host}.{suffix}/{path}")
}

fn has_parents(
    ctx: &mut GenerationContext<'_>,
    table: &str,
    parent: &str,
    requested: u32,
    parents: usize,
) -> bool {
    if requested == 0 {
        return false;
    }
    if parents == 0 {
        ctx.record(GenerationIssue::warning(
            "generator.missing_parent_rows",
            format!("skipping {requested} {table} rows: no {parent} rows to reference"),
        ));
        return false;
    }
    true
}
