use coursegen_core::{Lecturer, LecturerId, Role, Student};
use fake::Fake;
use fake::faker::name::en::{FirstName, LastName};
use rand::RngCore;
use tracing::{debug, info};

use crate::context::GenerationContext;

pub fn random_person(rng: &mut dyn RngCore) -> (String, String) {
    let first: String = FirstName().fake_with_rng(rng);
    let last: String = LastName().fake_with_rng(rng);
    (first, last)
}

/// Lecturers with ids `lecturer_id_offset + 1 ..`, each backed by a new user.
pub fn generate_lecturers(ctx: &mut GenerationContext<'_>, count: u32) -> Vec<Lecturer> {
    let offset = ctx.identity.lecturer_id_offset;
    let lecturers: Vec<Lecturer> = (1..=count)
        .map(|i| synthesize_lecturer(ctx, offset + i))
        .collect();
    info!(rows = lecturers.len(), "lecturers generated");
    lecturers
}

/// A single lecturer with a fresh user account and a random department.
pub fn synthesize_lecturer(ctx: &mut GenerationContext<'_>, lec_id: LecturerId) -> Lecturer {
    let (first_name, last_name) = random_person(ctx.rng);
    let user_id = ctx.users.register_person(
        &first_name,
        &last_name,
        Role::Lecturer,
        &ctx.identity.default_password,
        ctx.rng,
    );
    let department = ctx.catalog.random_department(ctx.rng).to_string();
    debug!(lec_id, user_id, department = %department, "lecturer created");

    Lecturer {
        lec_id,
        lec_first_name: first_name,
        lec_last_name: last_name,
        department,
        user_id,
    }
}

/// Students with ids `student_id_offset + 1 ..`, each backed by a new user.
pub fn generate_students(ctx: &mut GenerationContext<'_>, count: u32) -> Vec<Student> {
    let offset = ctx.identity.student_id_offset;
    let mut students = Vec::with_capacity(count as usize);
    for i in 1..=count {
        let (first_name, last_name) = random_person(ctx.rng);
        let user_id = ctx.users.register_person(
            &first_name,
            &last_name,
            Role::Student,
            &ctx.identity.default_password,
            ctx.rng,
        );
        students.push(Student {
            student_id: offset + i,
            first_name,
            last_name,
            user_id,
        });
    }
    info!(rows = students.len(), "students generated");
    students
}
