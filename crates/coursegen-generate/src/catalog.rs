//! Departments, subjects and name particulars used to fabricate courses.

use rand::{Rng, RngCore};
use tracing::error;

const PLACEHOLDER_COURSE_NAME: &str = "Unknown Course";
const PLACEHOLDER_COURSE_CODE: &str = "XXX000";

const DEPARTMENTS: &[(&str, &[&str])] = &[
    (
        "Computing",
        &[
            "Programming",
            "Data Structures",
            "Algorithms",
            "Operating Systems",
            "Computer Networks",
            "Database Systems",
            "Software Engineering",
            "Machine Learning",
            "Computer Graphics",
            "Compilers",
        ],
    ),
    (
        "Mathematics",
        &[
            "Calculus",
            "Linear Algebra",
            "Discrete Mathematics",
            "Number Theory",
            "Real Analysis",
            "Probability",
            "Topology",
            "Differential Equations",
        ],
    ),
    (
        "Physics",
        &[
            "Mechanics",
            "Electromagnetism",
            "Thermodynamics",
            "Quantum Physics",
            "Optics",
            "Astrophysics",
            "Solid State Physics",
        ],
    ),
    (
        "Chemistry",
        &[
            "Organic Chemistry",
            "Inorganic Chemistry",
            "Physical Chemistry",
            "Analytical Chemistry",
            "Biochemistry",
            "Polymer Science",
        ],
    ),
    (
        "Biology",
        &[
            "Cell Biology",
            "Genetics",
            "Ecology",
            "Microbiology",
            "Evolution",
            "Botany",
            "Zoology",
        ],
    ),
    (
        "Economics",
        &[
            "Microeconomics",
            "Macroeconomics",
            "Econometrics",
            "Development Economics",
            "Public Finance",
            "International Trade",
        ],
    ),
    (
        "History",
        &[
            "Caribbean History",
            "World History",
            "Economic History",
            "Ancient Civilisations",
            "Colonial History",
            "Modern Europe",
        ],
    ),
    (
        "Literatures in English",
        &[
            "Poetry",
            "Drama",
            "The Novel",
            "Literary Theory",
            "Creative Writing",
            "Postcolonial Literature",
        ],
    ),
    (
        "Management Studies",
        &[
            "Accounting",
            "Marketing",
            "Human Resource Management",
            "Operations Management",
            "Corporate Finance",
            "Entrepreneurship",
        ],
    ),
    (
        "Psychology",
        &[
            "Cognitive Psychology",
            "Social Psychology",
            "Developmental Psychology",
            "Abnormal Psychology",
            "Research Methods",
        ],
    ),
    (
        "Geography",
        &[
            "Physical Geography",
            "Human Geography",
            "Geographic Information Systems",
            "Climatology",
            "Urban Planning",
        ],
    ),
    (
        "Engineering",
        &[
            "Circuit Analysis",
            "Fluid Mechanics",
            "Structural Analysis",
            "Control Systems",
            "Signal Processing",
            "Materials Science",
        ],
    ),
];

const PARTICULARS: &[&str] = &[
    "Introduction to",
    "Fundamentals of",
    "Principles of",
    "Foundations of",
    "Advanced",
    "Applied",
    "Topics in",
    "Seminar in",
    "Modern",
    "Contemporary",
    "Computational",
    "Experimental",
    "Theoretical",
    "Elements of",
    "Methods in",
    "Studies in",
    "Special Topics in",
    "Research in",
];

/// Name and code drawn for a course.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseIdentity {
    pub name: String,
    pub code: String,
}

/// Departments available to a run: the built-in catalog plus configured extras.
#[derive(Debug, Clone)]
pub struct DepartmentCatalog {
    departments: Vec<String>,
}

impl Default for DepartmentCatalog {
    fn default() -> Self {
        Self::new(&[])
    }
}

impl DepartmentCatalog {
    pub fn new(extra_departments: &[String]) -> Self {
        let mut departments: Vec<String> = DEPARTMENTS
            .iter()
            .map(|(name, _)| (*name).to_string())
            .collect();
        for extra in extra_departments {
            if !departments.contains(extra) {
                departments.push(extra.clone());
            }
        }
        Self { departments }
    }

    pub fn departments(&self) -> &[String] {
        &self.departments
    }

    pub fn random_department(&self, rng: &mut dyn RngCore) -> &str {
        &self.departments[rng.random_range(0..self.departments.len())]
    }

    /// Draw a course for `department`.
    ///
    /// Departments without known subjects fall back to a placeholder
    /// name and code instead of failing.
    pub fn course_for_department(&self, department: &str, rng: &mut dyn RngCore) -> CourseIdentity {
        let Some(subjects) = subjects(department) else {
            error!(department = %department, "no subjects found for department");
            return CourseIdentity {
                name: PLACEHOLDER_COURSE_NAME.to_string(),
                code: PLACEHOLDER_COURSE_CODE.to_string(),
            };
        };

        let subject = subjects[rng.random_range(0..subjects.len())];
        let particular = PARTICULARS[rng.random_range(0..PARTICULARS.len())];
        let prefix: String = department.chars().take(3).collect::<String>().to_uppercase();
        let number = rng.random_range(100..=999);

        CourseIdentity {
            name: format!("{particular} {subject}"),
            code: format!("{prefix}{number}"),
        }
    }
}

fn subjects(department: &str) -> Option<&'static [&'static str]> {
    DEPARTMENTS
        .iter()
        .find(|(name, _)| *name == department)
        .map(|(_, subjects)| *subjects)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;

    #[test]
    fn department_prefixes_are_distinct() {
        let prefixes: HashSet<String> = DEPARTMENTS
            .iter()
            .map(|(name, _)| name.chars().take(3).collect::<String>().to_uppercase())
            .collect();
        assert_eq!(prefixes.len(), DEPARTMENTS.len());
    }

    #[test]
    fn course_code_uses_department_prefix() {
        let catalog = DepartmentCatalog::default();
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let course = catalog.course_for_department("Mathematics", &mut rng);
        assert!(course.code.starts_with("MAT"));
        assert_eq!(course.code.len(), 6);
        let number: u32 = course.code[3..].parse().expect("numeric suffix");
        assert!((100..=999).contains(&number));
        assert!(PARTICULARS.iter().any(|p| course.name.starts_with(p)));
    }

    #[test]
    fn unknown_department_yields_placeholder() {
        let catalog = DepartmentCatalog::new(&["Astrology".to_string()]);
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let course = catalog.course_for_department("Astrology", &mut rng);
        assert_eq!(course.name, PLACEHOLDER_COURSE_NAME);
        assert_eq!(course.code, PLACEHOLDER_COURSE_CODE);
        assert_eq!(catalog.departments().len(), DEPARTMENTS.len() + 1);
    }
}
