use std::fmt;

use serde::{Deserialize, Serialize};

pub type UserId = u32;
pub type LecturerId = u32;
pub type StudentId = u32;
pub type CourseId = u32;

/// Role stored on every `User` row.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Lecturer,
    Student,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Lecturer => "lecturer",
            Self::Student => "student",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Login account backing a lecturer, student or administrator.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct User {
    pub user_id: UserId,
    pub username: String,
    /// Hex SHA-256 of the plaintext password followed by the salt.
    pub password: String,
    pub role: Role,
    pub salt: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct Lecturer {
    pub lec_id: LecturerId,
    pub lec_first_name: String,
    pub lec_last_name: String,
    pub department: String,
    pub user_id: UserId,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct Student {
    #[serde(rename = "StudentID")]
    pub student_id: StudentId,
    pub first_name: String,
    pub last_name: String,
    pub user_id: UserId,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct Course {
    pub course_id: CourseId,
    pub course_name: String,
    pub course_code: String,
}

/// Association row: a lecturer teaching a course.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "PascalCase")]
pub struct CourseLecturer {
    pub course_id: CourseId,
    pub lec_id: LecturerId,
}

/// Association row: a student enrolled in a course with a grade in `0..=100`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct Enrollment {
    #[serde(rename = "StudentID")]
    pub student_id: StudentId,
    pub course_id: CourseId,
    pub grade: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct Assignment {
    pub assignment_id: u32,
    pub course_id: CourseId,
    pub title: String,
    pub description: String,
    /// MySQL `DATETIME` literal (`YYYY-MM-DD HH:MM:SS`).
    pub due_date: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct Forum {
    pub forum_id: u32,
    pub course_id: CourseId,
    pub title: String,
}

/// A forum post. `user_id` holds the author's `StudentID`, matching the
/// `DiscussionThread.UserId -> Student(StudentID)` foreign key.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct DiscussionThread {
    pub thread_id: u32,
    pub forum_id: u32,
    pub user_id: StudentId,
    pub title: String,
    pub post: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct CalendarEvent {
    pub event_id: u32,
    pub course_id: CourseId,
    pub event_date: String,
    pub event_time: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct CourseContent {
    pub content_id: u32,
    pub course_id: CourseId,
    pub section: u8,
    pub content: String,
    /// JSON document describing the content kind.
    pub metadata: String,
}

/// Every table produced by a generation run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Dataset {
    pub users: Vec<User>,
    pub lecturers: Vec<Lecturer>,
    pub courses: Vec<Course>,
    pub students: Vec<Student>,
    pub course_lecturers: Vec<CourseLecturer>,
    pub enrollments: Vec<Enrollment>,
    pub assignments: Vec<Assignment>,
    pub forums: Vec<Forum>,
    pub threads: Vec<DiscussionThread>,
    pub events: Vec<CalendarEvent>,
    pub course_content: Vec<CourseContent>,
}
