use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use coursegen_core::{
    AssignmentLimits, Course, EntityCounts, GeneratorConfig, Lecturer, Role, audit_dataset,
};
use coursegen_generate::assignment::{LecturerLoad, assign_lecturer_to_course};
use coursegen_generate::{BackfillState, GenerationContext, GenerationError, generate_dataset};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn config(courses: u32, students: u32, lecturers: u32) -> GeneratorConfig {
    GeneratorConfig {
        seed: 17,
        base_time: NaiveDate::from_ymd_opt(2025, 1, 1).and_then(|date| date.and_hms_opt(9, 0, 0)),
        counts: EntityCounts {
            lecturers,
            courses,
            students,
            assignments: 10,
            forums: 4,
            threads: 8,
            events: 6,
            course_content: Some(9),
        },
        ..GeneratorConfig::default()
    }
}

#[test]
fn capacity_and_uniqueness_invariants_hold() {
    let config = config(40, 300, 3);
    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
    let generated = generate_dataset(&config, &mut rng).expect("generate dataset");
    let dataset = &generated.dataset;

    let mut per_lecturer: HashMap<u32, u32> = HashMap::new();
    let mut pairs = HashSet::new();
    for row in &dataset.course_lecturers {
        *per_lecturer.entry(row.lec_id).or_insert(0) += 1;
        assert!(pairs.insert((row.course_id, row.lec_id)));
    }
    assert!(per_lecturer.values().all(|count| *count <= 5));
    assert_eq!(dataset.course_lecturers.len(), dataset.courses.len());

    let mut per_student: HashMap<u32, u32> = HashMap::new();
    let mut pairs = HashSet::new();
    for row in &dataset.enrollments {
        *per_student.entry(row.student_id).or_insert(0) += 1;
        assert!(pairs.insert((row.student_id, row.course_id)));
        assert!(row.grade <= 100);
    }
    assert!(per_student.values().all(|count| *count <= 6));

    let audit = audit_dataset(dataset, &config.limits);
    assert!(audit.is_consistent(), "{audit:?}");
}

#[test]
fn exhausted_lecturer_pool_grows_with_users() {
    let config = config(40, 300, 3);
    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
    let generated = generate_dataset(&config, &mut rng).expect("generate dataset");
    let dataset = &generated.dataset;

    assert_eq!(dataset.lecturers.len(), 8);
    assert_eq!(
        generated.synthesized_lecturers,
        (10_000_004..=10_000_008).collect::<Vec<_>>()
    );
    let lecturer_users = dataset
        .users
        .iter()
        .filter(|user| user.role == Role::Lecturer)
        .count();
    assert_eq!(lecturer_users, 8);

    let lecturer_ids: HashSet<u32> = dataset.lecturers.iter().map(|lec| lec.lec_id).collect();
    assert!(
        dataset
            .course_lecturers
            .iter()
            .all(|row| lecturer_ids.contains(&row.lec_id))
    );
}

#[test]
fn every_course_reaches_floor_with_enough_capacity() {
    let config = config(5, 60, 2);
    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
    let generated = generate_dataset(&config, &mut rng).expect("generate dataset");

    for course in &generated.dataset.courses {
        let enrolled = generated
            .dataset
            .enrollments
            .iter()
            .filter(|row| row.course_id == course.course_id)
            .count();
        assert!(enrolled >= 10, "course {} has {enrolled}", course.course_id);
    }
}

#[test]
fn backfill_tops_up_sparse_courses() {
    let mut config = config(30, 60, 6);
    config.limits.min_courses_per_student = 1;
    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
    let generated = generate_dataset(&config, &mut rng).expect("generate dataset");

    assert!(!generated.backfills.is_empty());
    assert!(
        generated
            .backfills
            .iter()
            .all(|outcome| outcome.state == BackfillState::Satisfied)
    );
    let audit = audit_dataset(&generated.dataset, &config.limits);
    assert!(audit.under_enrolled_courses.is_empty());
    assert!(audit.overloaded_students.is_empty());
}

#[test]
fn insufficient_capacity_degrades_without_failing() {
    let config = config(20, 5, 4);
    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
    let generated = generate_dataset(&config, &mut rng).expect("generation completes");

    let audit = audit_dataset(&generated.dataset, &config.limits);
    assert!(audit.is_consistent());
    assert_eq!(audit.under_enrolled_courses.len(), 20);
    assert!(generated.dataset.enrollments.len() <= 30);
    assert!(
        generated
            .backfills
            .iter()
            .all(|outcome| outcome.state == BackfillState::Abandoned)
    );
    assert!(
        generated
            .issues
            .iter()
            .any(|issue| issue.code == "enrollment.course_under_floor")
    );
}

#[test]
fn full_lecturer_triggers_single_synthesis() {
    let base_time = NaiveDate::from_ymd_opt(2025, 1, 1)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .expect("valid date");
    let mut rng = ChaCha8Rng::seed_from_u64(99);
    let mut ctx = GenerationContext::new(&mut rng, base_time);
    let mut lecturers = vec![Lecturer {
        lec_id: 10_000_001,
        lec_first_name: "Edsger".to_string(),
        lec_last_name: "Dijkstra".to_string(),
        department: "Computing".to_string(),
        user_id: 0,
    }];
    let mut load = LecturerLoad::new(&lecturers);
    load.set(10_000_001, 5);
    let course = Course {
        course_id: 1,
        course_name: "Introduction to Algorithms".to_string(),
        course_code: "COM101".to_string(),
    };

    let assignment = assign_lecturer_to_course(
        &mut ctx,
        &course,
        &mut lecturers,
        &mut load,
        AssignmentLimits::default().max_courses_per_lecturer,
    )
    .expect("lecturer assigned");

    assert!(assignment.synthesized);
    assert_eq!(assignment.row.course_id, 1);
    assert_eq!(assignment.row.lec_id, 10_000_002);
    assert_eq!(lecturers.len(), 2);
    assert_eq!(ctx.users.len(), 1);
    assert_eq!(ctx.users.users()[0].role, Role::Lecturer);
}

#[test]
fn lecturer_ids_near_u32_max_are_rejected_up_front() {
    let mut config = config(12, 20, 2);
    config.identity.lecturer_id_offset = u32::MAX - 2;
    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
    assert!(matches!(
        generate_dataset(&config, &mut rng),
        Err(GenerationError::Core(_))
    ));

    config.identity.lecturer_id_offset = u32::MAX - 5;
    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
    let generated = generate_dataset(&config, &mut rng).expect("generate dataset");
    let lecturer_ids: HashSet<u32> = generated
        .dataset
        .lecturers
        .iter()
        .map(|lec| lec.lec_id)
        .collect();
    assert_eq!(lecturer_ids.len(), generated.dataset.lecturers.len());
    assert_eq!(generated.synthesized_lecturers, vec![u32::MAX - 2]);
    let audit = audit_dataset(&generated.dataset, &config.limits);
    assert!(audit.duplicate_lecturer_ids.is_empty());
    assert!(audit.overloaded_lecturers.is_empty());
}

#[test]
fn same_seed_same_dataset() {
    let config = config(8, 40, 2);
    let mut rng_a = ChaCha8Rng::seed_from_u64(config.seed);
    let mut rng_b = ChaCha8Rng::seed_from_u64(config.seed);
    let a = generate_dataset(&config, &mut rng_a).expect("generate A");
    let b = generate_dataset(&config, &mut rng_b).expect("generate B");

    assert_eq!(a.dataset.users, b.dataset.users);
    assert_eq!(a.dataset.enrollments, b.dataset.enrollments);
    assert_eq!(a.dataset.assignments, b.dataset.assignments);
}

#[test]
fn usernames_and_user_ids_are_unique() {
    let config = config(6, 500, 20);
    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
    let generated = generate_dataset(&config, &mut rng).expect("generate dataset");
    let users = &generated.dataset.users;

    let names: HashSet<&str> = users.iter().map(|user| user.username.as_str()).collect();
    let ids: HashSet<u32> = users.iter().map(|user| user.user_id).collect();
    assert_eq!(names.len(), users.len());
    assert_eq!(ids.len(), users.len());
    assert_eq!(users.len(), 500 + 20 + 1);
    assert_eq!(users.last().map(|user| user.role), Some(Role::Admin));
}
