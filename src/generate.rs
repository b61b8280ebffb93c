//! Synthetic roster generation.
//!
//! Students get an aptitude band that drives their GPA and attendance habit,
//! one strength and one weakness subject, and per-subject noise. Seeded rngs
//! produce the same roster on every run.

use crate::model::{round2, Grade, Student};
use rand::seq::SliceRandom;
use rand::Rng;
use rand_distr::{Distribution, Normal, NormalError};

pub const SUBJECTS: [&str; 6] = [
    "Data Structures & Algorithms",
    "Database Management Systems",
    "Operating Systems",
    "Computer Networks",
    "Object-Oriented Programming",
    "Discrete Mathematics",
];

pub const DEFAULT_GENERATED_STUDENTS: usize = 150;

const MALE_FIRST_NAMES: [&str; 15] = [
    "Aarav", "Vivaan", "Aditya", "Vihaan", "Arjun", "Sai", "Reyansh", "Ayaan", "Krishna", "Ishaan", "Rohan", "Aryan",
    "Advik", "Kabir", "Ansh",
];
const FEMALE_FIRST_NAMES: [&str; 15] = [
    "Ananya", "Diya", "Saanvi", "Aadhya", "Myra", "Aarohi", "Isha", "Priya", "Riya", "Siya", "Kiara", "Anika", "Navya",
    "Zara", "Avni",
];
const LAST_NAMES: [&str; 15] = [
    "Sharma", "Verma", "Gupta", "Singh", "Kumar", "Patel", "Shah", "Mehta", "Iyer", "Reddy", "Joshi", "Khan", "Chopra",
    "Malhotra", "Kapoor",
];

#[derive(Debug, Clone, Copy, PartialEq)]
enum Aptitude {
    High,
    Medium,
    Low,
}

impl Aptitude {
    fn draw<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let roll: f64 = rng.gen();
        if roll < 0.3 {
            Aptitude::High
        } else if roll < 0.8 {
            Aptitude::Medium
        } else {
            Aptitude::Low
        }
    }

    fn attendance_habit<R: Rng + ?Sized>(&self, rng: &mut R) -> i32 {
        match self {
            Aptitude::High => rng.gen_range(85..=95),
            Aptitude::Medium => rng.gen_range(70..=85),
            Aptitude::Low => rng.gen_range(55..=70),
        }
    }

    fn base_gpa(&self) -> Result<Normal<f64>, NormalError> {
        match self {
            Aptitude::High => Normal::new(8.0, 0.7),
            Aptitude::Medium => Normal::new(6.5, 1.0),
            Aptitude::Low => Normal::new(5.0, 1.2),
        }
    }
}

/// Every distinct (gender, name) pair in random order
fn shuffled_names<R: Rng + ?Sized>(rng: &mut R) -> Vec<(&'static str, String)> {
    let mut names: Vec<(&'static str, String)> = Vec::new();
    for (gender, firsts) in [("Male", &MALE_FIRST_NAMES), ("Female", &FEMALE_FIRST_NAMES)] {
        for first in firsts.iter() {
            for last in LAST_NAMES.iter() {
                names.push((gender, format!("{} {}", first, last)));
            }
        }
    }
    names.shuffle(rng);
    names
}

/// Generate `count` students with one grade per subject.
///
/// Names are unique until the name pool runs out, then repeat.
pub fn generate_roster<R: Rng + ?Sized>(count: usize, rng: &mut R) -> Result<Vec<Student>, NormalError> {
    let names = shuffled_names(rng);
    let noise = Normal::new(0.0, 0.25)?;
    let mut students = Vec::with_capacity(count);

    for (i, (gender, name)) in names.iter().cycle().take(count).enumerate() {
        let aptitude = Aptitude::draw(rng);
        let habit = aptitude.attendance_habit(rng);
        let base = aptitude.base_gpa()?;

        let mut order: Vec<&str> = SUBJECTS.to_vec();
        order.shuffle(rng);
        let (strength, weakness) = (order[0], order[1]);

        let grades = SUBJECTS
            .iter()
            .map(|&subject| {
                let mut gpa = base.sample(rng);
                let attendance = habit + rng.gen_range(-15..=10);

                if subject == strength {
                    gpa += rng.gen_range(1.0..2.0);
                } else if subject == weakness {
                    gpa -= rng.gen_range(1.0..2.0);
                }

                let prev_gpa = round2(gpa.clamp(2.0, 10.0));
                let attendance = attendance.clamp(30, 100) as f64;
                let improvement = (attendance - 75.0) / 50.0;
                let current_gpa = round2((prev_gpa + improvement + noise.sample(rng)).clamp(2.0, 10.0));
                let assignment_rate = (current_gpa * 10.0 + rng.gen_range(-10..=10) as f64).clamp(40.0, 100.0).trunc();
                let participation = (attendance * 0.8 + rng.gen_range(-15..=15) as f64).clamp(30.0, 100.0).trunc();

                Grade::new(subject, prev_gpa, current_gpa, attendance, assignment_rate).with_participation(participation)
            })
            .collect();

        students.push(Student {
            student_id: format!("23WU{:06}", i + 1),
            student_name: name.clone(),
            gender: Some(gender.to_string()),
            age: Some(rng.gen_range(18..=22)),
            grades,
        });
    }

    Ok(students)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    #[test]
    fn test_generated_roster_shape() {
        let students = generate_roster(40, &mut StdRng::seed_from_u64(7)).unwrap();

        assert_eq!(students.len(), 40);
        assert_eq!(students[0].student_id, "23WU000001");
        assert_eq!(students[39].student_id, "23WU000040");
        assert!(students.iter().all(|s| s.grades.len() == SUBJECTS.len()));

        let names: HashSet<&str> = students.iter().map(|s| s.student_name.as_str()).collect();
        assert_eq!(names.len(), 40);
    }

    #[test]
    fn test_generated_values_stay_in_range() {
        let students = generate_roster(DEFAULT_GENERATED_STUDENTS, &mut StdRng::seed_from_u64(42)).unwrap();

        for student in &students {
            assert!((18..=22).contains(&student.age.unwrap()));
            for g in &student.grades {
                assert!((2.0..=10.0).contains(&g.prev_gpa));
                assert!((2.0..=10.0).contains(&g.current_gpa));
                assert!((30.0..=100.0).contains(&g.attendance_pct));
                assert!((40.0..=100.0).contains(&g.assignment_rate));
                assert!((30.0..=100.0).contains(&g.participation_score.unwrap()));
            }
        }
    }

    #[test]
    fn test_same_seed_same_roster() {
        let a = generate_roster(10, &mut StdRng::seed_from_u64(3)).unwrap();
        let b = generate_roster(10, &mut StdRng::seed_from_u64(3)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_names_repeat_once_the_pool_is_exhausted() {
        let students = generate_roster(460, &mut StdRng::seed_from_u64(1)).unwrap();
        assert_eq!(students.len(), 460);
        assert_eq!(students[450].student_name, students[0].student_name);
    }
}
