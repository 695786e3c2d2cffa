//! Entity generators: independent rows drawn from the run's random source.

pub mod activity;
pub mod courses;
pub mod people;

use chrono::{Duration, NaiveDateTime};
use fake::Fake;
use fake::faker::lorem::en::{Paragraph, Sentence};
use rand::{Rng, RngCore};

pub use activity::{
    generate_assignments, generate_calendar_events, generate_course_content, generate_forums,
    generate_threads,
};
pub use courses::{MAX_COURSE_ATTEMPTS, generate_courses};
pub use people::{generate_lecturers, generate_students, random_person, synthesize_lecturer};

const SECONDS_PER_YEAR: i64 = 365 * 24 * 60 * 60;

/// Format used for MySQL `DATETIME` literals.
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// An instant within one year after `base`.
pub fn future_datetime(base: NaiveDateTime, rng: &mut dyn RngCore) -> NaiveDateTime {
    base + Duration::seconds(rng.random_range(1..=SECONDS_PER_YEAR))
}

pub(crate) fn lorem_sentence(rng: &mut dyn RngCore) -> String {
    Sentence(4..12).fake_with_rng(rng)
}

pub(crate) fn lorem_paragraph(rng: &mut dyn RngCore) -> String {
    Paragraph(3..6).fake_with_rng(rng)
}

pub(crate) fn pick_index(len: usize, rng: &mut dyn RngCore) -> usize {
    rng.random_range(0..len)
}
