use std::collections::{BTreeMap, BTreeSet, HashSet};

use serde::{Deserialize, Serialize};

use crate::config::AssignmentLimits;
use crate::entities::{CourseId, Dataset};
use crate::error::{Error, Result};

/// An entity participating in more association rows than its capacity allows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapacityViolation {
    pub id: u32,
    pub rows: u32,
    pub capacity: u32,
}

/// An association or child row pointing at an id missing from its pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DanglingReference {
    pub table: String,
    pub column: String,
    pub id: u32,
}

/// A course below the enrollment floor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseShortfall {
    pub course_id: CourseId,
    pub enrolled: u32,
    pub required: u32,
}

/// Outcome of checking a dataset against the assignment invariants.
///
/// Under-enrolled courses are reported but do not make the dataset
/// inconsistent: the enrollment floor is best-effort.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetAudit {
    pub overloaded_lecturers: Vec<CapacityViolation>,
    pub overloaded_students: Vec<CapacityViolation>,
    pub duplicate_course_lecturers: Vec<(CourseId, u32)>,
    pub duplicate_enrollments: Vec<(u32, CourseId)>,
    pub duplicate_usernames: Vec<String>,
    pub duplicate_user_ids: Vec<u32>,
    pub duplicate_lecturer_ids: Vec<u32>,
    pub duplicate_student_ids: Vec<u32>,
    pub duplicate_course_ids: Vec<CourseId>,
    pub dangling_references: Vec<DanglingReference>,
    pub unassigned_courses: Vec<CourseId>,
    pub under_enrolled_courses: Vec<CourseShortfall>,
}

impl DatasetAudit {
    pub fn is_consistent(&self) -> bool {
        self.overloaded_lecturers.is_empty()
            && self.overloaded_students.is_empty()
            && self.duplicate_course_lecturers.is_empty()
            && self.duplicate_enrollments.is_empty()
            && self.duplicate_usernames.is_empty()
            && self.duplicate_user_ids.is_empty()
            && self.duplicate_lecturer_ids.is_empty()
            && self.duplicate_student_ids.is_empty()
            && self.duplicate_course_ids.is_empty()
            && self.dangling_references.is_empty()
            && self.unassigned_courses.is_empty()
    }
}

/// Audit a dataset against the capacity, uniqueness and referential invariants.
pub fn audit_dataset(dataset: &Dataset, limits: &AssignmentLimits) -> DatasetAudit {
    let mut audit = DatasetAudit::default();

    let user_ids: HashSet<u32> = dataset.users.iter().map(|user| user.user_id).collect();
    let lecturer_ids: HashSet<u32> = dataset.lecturers.iter().map(|lec| lec.lec_id).collect();
    let student_ids: HashSet<u32> = dataset
        .students
        .iter()
        .map(|student| student.student_id)
        .collect();
    let course_ids: BTreeSet<CourseId> = dataset
        .courses
        .iter()
        .map(|course| course.course_id)
        .collect();
    let forum_ids: HashSet<u32> = dataset.forums.iter().map(|forum| forum.forum_id).collect();

    let mut seen_ids = HashSet::new();
    let mut seen_names = HashSet::new();
    for user in &dataset.users {
        if !seen_ids.insert(user.user_id) {
            audit.duplicate_user_ids.push(user.user_id);
        }
        if !seen_names.insert(user.username.as_str()) {
            audit.duplicate_usernames.push(user.username.clone());
        }
    }

    audit.duplicate_lecturer_ids = duplicates(dataset.lecturers.iter().map(|lec| lec.lec_id));
    audit.duplicate_student_ids =
        duplicates(dataset.students.iter().map(|student| student.student_id));
    audit.duplicate_course_ids =
        duplicates(dataset.courses.iter().map(|course| course.course_id));

    let mut dangling = |table: &str, column: &str, id: u32, pool: &dyn Fn(u32) -> bool| {
        if !pool(id) {
            audit.dangling_references.push(DanglingReference {
                table: table.to_string(),
                column: column.to_string(),
                id,
            });
        }
    };

    for lecturer in &dataset.lecturers {
        dangling("Lecturer", "UserId", lecturer.user_id, &|id| {
            user_ids.contains(&id)
        });
    }
    for student in &dataset.students {
        dangling("Student", "UserId", student.user_id, &|id| {
            user_ids.contains(&id)
        });
    }

    let mut lecturer_rows: BTreeMap<u32, u32> = BTreeMap::new();
    let mut seen_pairs = HashSet::new();
    let mut taught = BTreeSet::new();
    for row in &dataset.course_lecturers {
        dangling("CourseLecturer", "CourseId", row.course_id, &|id| {
            course_ids.contains(&id)
        });
        dangling("CourseLecturer", "LecId", row.lec_id, &|id| {
            lecturer_ids.contains(&id)
        });
        if !seen_pairs.insert((row.course_id, row.lec_id)) {
            audit
                .duplicate_course_lecturers
                .push((row.course_id, row.lec_id));
        }
        *lecturer_rows.entry(row.lec_id).or_insert(0) += 1;
        taught.insert(row.course_id);
    }

    let mut student_rows: BTreeMap<u32, u32> = BTreeMap::new();
    let mut course_rows: BTreeMap<CourseId, u32> = BTreeMap::new();
    let mut seen_pairs = HashSet::new();
    for row in &dataset.enrollments {
        dangling("Enrollment", "StudentID", row.student_id, &|id| {
            student_ids.contains(&id)
        });
        dangling("Enrollment", "CourseId", row.course_id, &|id| {
            course_ids.contains(&id)
        });
        if !seen_pairs.insert((row.student_id, row.course_id)) {
            audit
                .duplicate_enrollments
                .push((row.student_id, row.course_id));
        }
        *student_rows.entry(row.student_id).or_insert(0) += 1;
        *course_rows.entry(row.course_id).or_insert(0) += 1;
    }

    for assignment in &dataset.assignments {
        dangling("Assignment", "CourseId", assignment.course_id, &|id| {
            course_ids.contains(&id)
        });
    }
    for forum in &dataset.forums {
        dangling("Forum", "CourseId", forum.course_id, &|id| {
            course_ids.contains(&id)
        });
    }
    for thread in &dataset.threads {
        dangling("DiscussionThread", "ForumId", thread.forum_id, &|id| {
            forum_ids.contains(&id)
        });
        dangling("DiscussionThread", "UserId", thread.user_id, &|id| {
            student_ids.contains(&id)
        });
    }
    for event in &dataset.events {
        dangling("CalendarEvent", "CourseId", event.course_id, &|id| {
            course_ids.contains(&id)
        });
    }
    for content in &dataset.course_content {
        dangling("CourseContent", "CourseId", content.course_id, &|id| {
            course_ids.contains(&id)
        });
    }

    audit.overloaded_lecturers = overloads(&lecturer_rows, limits.max_courses_per_lecturer);
    audit.overloaded_students = overloads(&student_rows, limits.max_courses_per_student);

    for course_id in &course_ids {
        if !taught.contains(course_id) {
            audit.unassigned_courses.push(*course_id);
        }
        let enrolled = course_rows.get(course_id).copied().unwrap_or(0);
        if enrolled < limits.min_students_per_course {
            audit.under_enrolled_courses.push(CourseShortfall {
                course_id: *course_id,
                enrolled,
                required: limits.min_students_per_course,
            });
        }
    }

    audit
}

/// Fail on the first class of hard invariant violation found by [`audit_dataset`].
pub fn validate_dataset(dataset: &Dataset, limits: &AssignmentLimits) -> Result<DatasetAudit> {
    let audit = audit_dataset(dataset, limits);

    if let Some(violation) = audit.overloaded_lecturers.first() {
        return Err(Error::InvalidDataset(format!(
            "lecturer {} teaches {} courses (capacity {})",
            violation.id, violation.rows, violation.capacity
        )));
    }
    if let Some(violation) = audit.overloaded_students.first() {
        return Err(Error::InvalidDataset(format!(
            "student {} has {} enrollments (capacity {})",
            violation.id, violation.rows, violation.capacity
        )));
    }
    if let Some((course_id, lec_id)) = audit.duplicate_course_lecturers.first() {
        return Err(Error::InvalidDataset(format!(
            "duplicate course lecturer pair ({course_id}, {lec_id})"
        )));
    }
    if let Some((student_id, course_id)) = audit.duplicate_enrollments.first() {
        return Err(Error::InvalidDataset(format!(
            "duplicate enrollment ({student_id}, {course_id})"
        )));
    }
    if let Some(username) = audit.duplicate_usernames.first() {
        return Err(Error::InvalidDataset(format!(
            "duplicate username: {username}"
        )));
    }
    if let Some(user_id) = audit.duplicate_user_ids.first() {
        return Err(Error::InvalidDataset(format!("duplicate user id: {user_id}")));
    }
    if let Some(lec_id) = audit.duplicate_lecturer_ids.first() {
        return Err(Error::InvalidDataset(format!("duplicate lecturer id: {lec_id}")));
    }
    if let Some(student_id) = audit.duplicate_student_ids.first() {
        return Err(Error::InvalidDataset(format!(
            "duplicate student id: {student_id}"
        )));
    }
    if let Some(course_id) = audit.duplicate_course_ids.first() {
        return Err(Error::InvalidDataset(format!("duplicate course id: {course_id}")));
    }
    if let Some(reference) = audit.dangling_references.first() {
        return Err(Error::InvalidDataset(format!(
            "{}.{} references missing id {}",
            reference.table, reference.column, reference.id
        )));
    }
    if let Some(course_id) = audit.unassigned_courses.first() {
        return Err(Error::InvalidDataset(format!(
            "course {course_id} has no lecturer"
        )));
    }

    Ok(audit)
}

/// Ids seen more than once, each listed once in first-repeat order.
fn duplicates(ids: impl Iterator<Item = u32>) -> Vec<u32> {
    let mut seen = HashSet::new();
    let mut reported = HashSet::new();
    ids.filter(|id| !seen.insert(*id) && reported.insert(*id))
        .collect()
}

fn overloads(rows: &BTreeMap<u32, u32>, capacity: u32) -> Vec<CapacityViolation> {
    rows.iter()
        .filter(|(_, count)| **count > capacity)
        .map(|(id, count)| CapacityViolation {
            id: *id,
            rows: *count,
            capacity,
        })
        .collect()
}
