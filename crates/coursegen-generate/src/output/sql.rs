use coursegen_core::{
    Assignment, CalendarEvent, Course, CourseContent, CourseLecturer, DiscussionThread,
    Enrollment, Forum, Lecturer, Student, User,
};

/// A single column value ready for emission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlValue {
    Null,
    Int(i64),
    Text(String),
}

impl SqlValue {
    /// SQL literal: integers bare, text single-quoted with `'` doubled.
    pub fn to_sql(&self) -> String {
        match self {
            SqlValue::Null => "NULL".to_string(),
            SqlValue::Int(value) => value.to_string(),
            SqlValue::Text(value) => format!("'{}'", value.replace('\'', "''")),
        }
    }

    pub fn to_csv(&self) -> String {
        match self {
            SqlValue::Null => String::new(),
            SqlValue::Int(value) => value.to_string(),
            SqlValue::Text(value) => value.clone(),
        }
    }
}

impl From<u32> for SqlValue {
    fn from(value: u32) -> Self {
        SqlValue::Int(i64::from(value))
    }
}

impl From<u8> for SqlValue {
    fn from(value: u8) -> Self {
        SqlValue::Int(i64::from(value))
    }
}

impl From<&str> for SqlValue {
    fn from(value: &str) -> Self {
        SqlValue::Text(value.to_string())
    }
}

impl From<&String> for SqlValue {
    fn from(value: &String) -> Self {
        SqlValue::Text(value.clone())
    }
}

/// A row that maps onto a table of the course-management schema.
pub trait SqlRow {
    const TABLE: &'static str;
    const COLUMNS: &'static [&'static str];

    /// Values in `COLUMNS` order.
    fn values(&self) -> Vec<SqlValue>;
}

impl SqlRow for User {
    const TABLE: &'static str = "User";
    const COLUMNS: &'static [&'static str] = &["UserId", "Username", "Password", "Role", "Salt"];

    fn values(&self) -> Vec<SqlValue> {
        vec![
            self.user_id.into(),
            (&self.username).into(),
            (&self.password).into(),
            self.role.as_str().into(),
            (&self.salt).into(),
        ]
    }
}

impl SqlRow for Lecturer {
    const TABLE: &'static str = "Lecturer";
    const COLUMNS: &'static [&'static str] =
        &["LecId", "LecFirstName", "LecLastName", "Department", "UserId"];

    fn values(&self) -> Vec<SqlValue> {
        vec![
            self.lec_id.into(),
            (&self.lec_first_name).into(),
            (&self.lec_last_name).into(),
            (&self.department).into(),
            self.user_id.into(),
        ]
    }
}

impl SqlRow for Course {
    const TABLE: &'static str = "Course";
    const COLUMNS: &'static [&'static str] = &["CourseId", "CourseName", "CourseCode"];

    fn values(&self) -> Vec<SqlValue> {
        vec![
            self.course_id.into(),
            (&self.course_name).into(),
            (&self.course_code).into(),
        ]
    }
}

impl SqlRow for CourseLecturer {
    const TABLE: &'static str = "CourseLecturer";
    const COLUMNS: &'static [&'static str] = &["CourseId", "LecId"];

    fn values(&self) -> Vec<SqlValue> {
        vec![self.course_id.into(), self.lec_id.into()]
    }
}

impl SqlRow for Student {
    const TABLE: &'static str = "Student";
    const COLUMNS: &'static [&'static str] = &["StudentID", "FirstName", "LastName", "UserId"];

    fn values(&self) -> Vec<SqlValue> {
        vec![
            self.student_id.into(),
            (&self.first_name).into(),
            (&self.last_name).into(),
            self.user_id.into(),
        ]
    }
}

impl SqlRow for Enrollment {
    const TABLE: &'static str = "Enrollment";
    const COLUMNS: &'static [&'static str] = &["StudentID", "CourseId", "Grade"];

    fn values(&self) -> Vec<SqlValue> {
        vec![
            self.student_id.into(),
            self.course_id.into(),
            self.grade.into(),
        ]
    }
}

impl SqlRow for Assignment {
    const TABLE: &'static str = "Assignment";
    const COLUMNS: &'static [&'static str] =
        &["AssignmentId", "CourseId", "Title", "Description", "DueDate"];

    fn values(&self) -> Vec<SqlValue> {
        vec![
            self.assignment_id.into(),
            self.course_id.into(),
            (&self.title).into(),
            (&self.description).into(),
            (&self.due_date).into(),
        ]
    }
}

impl SqlRow for Forum {
    const TABLE: &'static str = "Forum";
    const COLUMNS: &'static [&'static str] = &["ForumId", "CourseId", "Title"];

    fn values(&self) -> Vec<SqlValue> {
        vec![
            self.forum_id.into(),
            self.course_id.into(),
            (&self.title).into(),
        ]
    }
}

impl SqlRow for DiscussionThread {
    const TABLE: &'static str = "DiscussionThread";
    const COLUMNS: &'static [&'static str] = &["ThreadId", "ForumId", "UserId", "Title", "Post"];

    fn values(&self) -> Vec<SqlValue> {
        vec![
            self.thread_id.into(),
            self.forum_id.into(),
            self.user_id.into(),
            (&self.title).into(),
            (&self.post).into(),
        ]
    }
}

impl SqlRow for CalendarEvent {
    const TABLE: &'static str = "CalendarEvent";
    const COLUMNS: &'static [&'static str] =
        &["EventId", "CourseId", "EventDate", "EventTime", "Description"];

    fn values(&self) -> Vec<SqlValue> {
        vec![
            self.event_id.into(),
            self.course_id.into(),
            (&self.event_date).into(),
            (&self.event_time).into(),
            (&self.description).into(),
        ]
    }
}

impl SqlRow for CourseContent {
    const TABLE: &'static str = "CourseContent";
    const COLUMNS: &'static [&'static str] =
        &["ContentId", "CourseId", "Section", "Content", "Metadata"];

    fn values(&self) -> Vec<SqlValue> {
        vec![
            self.content_id.into(),
            self.course_id.into(),
            self.section.into(),
            (&self.content).into(),
            (&self.metadata).into(),
        ]
    }
}

/// Multi-row `INSERT` statements for `rows`, `batch_size` rows per statement
/// (`0` puts every row in one statement). Empty input yields an empty string.
pub fn insert_statements<T: SqlRow>(rows: &[T], batch_size: usize) -> String {
    if rows.is_empty() {
        return String::new();
    }
    let batch_size = if batch_size == 0 { rows.len() } else { batch_size };
    let columns = T::COLUMNS.join(", ");

    let mut out = String::new();
    for batch in rows.chunks(batch_size) {
        out.push_str(&format!("INSERT INTO {} ({columns}) VALUES\n", T::TABLE));
        let values: Vec<String> = batch
            .iter()
            .map(|row| {
                let literals: Vec<String> = row.values().iter().map(SqlValue::to_sql).collect();
                format!("({})", literals.join(", "))
            })
            .collect();
        out.push_str(&values.join(",\n"));
        out.push_str(";\n\n");
    }
    out
}

pub fn create_database_statement(database: &str) -> String {
    format!(
        "DROP DATABASE IF EXISTS {database};\n\
         CREATE DATABASE IF NOT EXISTS {database};\n\
         USE {database};\n"
    )
}

/// Table DDL and the enrollment/teaching limit triggers.
pub fn create_table_statements(max_courses_per_student: u32, max_courses_per_lecturer: u32) -> String {
    format!(
        r#"CREATE TABLE User (
    UserId INT PRIMARY KEY,
    Username VARCHAR(255) NOT NULL UNIQUE,
    Password VARCHAR(255) NOT NULL,
    Role VARCHAR(10) NOT NULL CHECK (Role IN ('admin', 'lecturer', 'student')),
    Salt VARCHAR(255) NOT NULL
);

CREATE TABLE Lecturer (
    LecId INT PRIMARY KEY,
    LecFirstName VARCHAR(255) NOT NULL,
    LecLastName VARCHAR(255) NOT NULL,
    Department VARCHAR(255) NOT NULL,
    UserId INT,
    FOREIGN KEY (UserId) REFERENCES User(UserId)
);

CREATE TABLE Course (
    CourseId INT PRIMARY KEY,
    CourseName VARCHAR(255) NOT NULL UNIQUE,
    CourseCode VARCHAR(10) NOT NULL UNIQUE
);

CREATE TABLE CourseLecturer (
    CourseId INT,
    LecId INT,
    PRIMARY KEY (CourseId, LecId),
    FOREIGN KEY (CourseId) REFERENCES Course(CourseId),
    FOREIGN KEY (LecId) REFERENCES Lecturer(LecId)
);

CREATE TABLE Student (
    StudentID INT PRIMARY KEY,
    FirstName VARCHAR(255) NOT NULL,
    LastName VARCHAR(255) NOT NULL,
    UserId INT,
    FOREIGN KEY (UserId) REFERENCES User(UserId)
);

CREATE TABLE Enrollment (
    StudentID INT,
    CourseId INT,
    Grade INT CHECK (Grade >= 0 AND Grade <= 100),
    PRIMARY KEY (StudentID, CourseId),
    FOREIGN KEY (StudentID) REFERENCES Student(StudentID),
    FOREIGN KEY (CourseId) REFERENCES Course(CourseId)
);

CREATE TABLE Assignment (
    AssignmentId INT PRIMARY KEY,
    CourseId INT,
    Title VARCHAR(255) NOT NULL,
    Description TEXT,
    DueDate DATETIME,
    FOREIGN KEY (CourseId) REFERENCES Course(CourseId)
);

CREATE TABLE Forum (
    ForumId INT PRIMARY KEY,
    CourseId INT,
    Title VARCHAR(255) NOT NULL,
    FOREIGN KEY (CourseId) REFERENCES Course(CourseId)
);

CREATE TABLE DiscussionThread (
    ThreadId INT PRIMARY KEY,
    ForumId INT,
    UserId INT,
    Title VARCHAR(255) NOT NULL,
    Post TEXT NOT NULL,
    FOREIGN KEY (ForumId) REFERENCES Forum(ForumId),
    FOREIGN KEY (UserId) REFERENCES Student(StudentID)
);

CREATE TABLE CalendarEvent (
    EventId INT PRIMARY KEY,
    CourseId INT,
    EventDate DATE NOT NULL,
    EventTime TIME NOT NULL,
    Description TEXT,
    FOREIGN KEY (CourseId) REFERENCES Course(CourseId)
);

CREATE TABLE CourseContent (
    ContentId INT PRIMARY KEY,
    CourseId INT,
    Section INT NOT NULL,
    Content BLOB,
    Metadata TEXT,
    FOREIGN KEY (CourseId) REFERENCES Course(CourseId)
);

CREATE TABLE Submission (
    SubmissionId INT PRIMARY KEY,
    AssignmentId INT NOT NULL,
    StudentID INT NOT NULL,
    SubmissionContent BLOB,
    SubmissionDate DATETIME DEFAULT CURRENT_TIMESTAMP,
    FOREIGN KEY (AssignmentId) REFERENCES Assignment(AssignmentId) ON DELETE CASCADE,
    FOREIGN KEY (StudentID) REFERENCES Student(StudentID) ON DELETE CASCADE,
    UNIQUE (AssignmentId, StudentID)
);

CREATE TABLE Grade (
    GradeId INT PRIMARY KEY,
    SubmissionId INT NOT NULL UNIQUE,
    Grade INT NOT NULL CHECK (Grade >= 0 AND Grade <= 100),
    Feedback TEXT,
    GradingDate DATETIME DEFAULT CURRENT_TIMESTAMP,
    FOREIGN KEY (SubmissionId) REFERENCES Submission(SubmissionId) ON DELETE CASCADE
);

DELIMITER //

CREATE TRIGGER check_student_enrollment_limit
BEFORE INSERT ON Enrollment
FOR EACH ROW
BEGIN
    DECLARE student_course_count INT;
    SELECT COUNT(*) INTO student_course_count
    FROM Enrollment
    WHERE StudentID = NEW.StudentID;
    IF student_course_count >= {max_courses_per_student} THEN
        SIGNAL SQLSTATE '45000'
        SET MESSAGE_TEXT = 'Student cannot enroll in more than {max_courses_per_student} courses.';
    END IF;
END//

CREATE TRIGGER check_lecturer_course_limit
BEFORE INSERT ON CourseLecturer
FOR EACH ROW
BEGIN
    DECLARE lecturer_course_count INT;
    SELECT COUNT(*) INTO lecturer_course_count
    FROM CourseLecturer
    WHERE LecId = NEW.LecId;
    IF lecturer_course_count >= {max_courses_per_lecturer} THEN
        SIGNAL SQLSTATE '45000'
        SET MESSAGE_TEXT = 'Lecturer cannot teach more than {max_courses_per_lecturer} courses.';
    END IF;
END//

DELIMITER ;
"#
    )
}

/// Reporting views over enrollments and teaching loads.
pub fn create_view_statements() -> &'static str {
    r#"-- Courses with 50 or more students.
CREATE VIEW CoursesWith50PlusStudents AS
SELECT c.CourseId, c.CourseName, COUNT(e.StudentID) AS NumberOfStudents
FROM Course c
JOIN Enrollment e ON c.CourseId = e.CourseId
GROUP BY c.CourseId, c.CourseName
HAVING COUNT(e.StudentID) >= 50;

-- Students taking 5 or more courses.
CREATE VIEW StudentsWith5PlusCourses AS
SELECT s.StudentID, s.FirstName, s.LastName, COUNT(e.CourseId) AS NumberOfCourses
FROM Student s
JOIN Enrollment e ON s.StudentID = e.StudentID
GROUP BY s.StudentID, s.FirstName, s.LastName
HAVING COUNT(e.CourseId) >= 5;

-- Lecturers teaching 3 or more courses.
CREATE VIEW LecturersWith3PlusCourses AS
SELECT l.LecId, l.LecFirstName, l.LecLastName, COUNT(cl.CourseId) AS NumberOfCourses
FROM Lecturer l
JOIN CourseLecturer cl ON l.LecId = cl.LecId
GROUP BY l.LecId, l.LecFirstName, l.LecLastName
HAVING COUNT(cl.CourseId) >= 3;

-- The 10 most enrolled courses.
CREATE VIEW Top10EnrolledCourses AS
SELECT c.CourseId, c.CourseName, COUNT(e.StudentID) AS NumberOfStudents
FROM Course c
JOIN Enrollment e ON c.CourseId = e.CourseId
GROUP BY c.CourseId, c.CourseName
ORDER BY COUNT(e.StudentID) DESC
LIMIT 10;

-- The 10 students with the highest overall averages.
CREATE VIEW Top10StudentsByAverage AS
SELECT s.StudentID, s.FirstName, s.LastName, AVG(e.Grade) AS OverallAverage
FROM Student s
JOIN Enrollment e ON s.StudentID = e.StudentID
GROUP BY s.StudentID, s.FirstName, s.LastName
ORDER BY AVG(e.Grade) DESC
LIMIT 10;
"#
}
