use crate::model::{mean, Student};
use serde::Serialize;
use std::collections::HashMap;

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct SubjectAverage {
    pub name: String,
    #[serde(rename = "avgGpa")]
    pub avg_gpa: f64,
    #[serde(rename = "avgAttendance")]
    pub avg_attendance: f64,
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct OverallAverages {
    pub avg_attendance: f64,
    pub avg_gpa: f64,
    pub grade_count: usize,
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct HistogramBin {
    pub label: String,
    pub count: usize,
}

#[derive(Serialize, Clone, Copy, Debug, PartialEq)]
pub struct PerformancePoint {
    pub x: f64,
    pub y: f64,
}

#[derive(Default)]
struct SubjectTotals {
    total_gpa: f64,
    total_attendance: f64,
    count: usize,
}

/// Average GPA and attendance per subject, in first-seen subject order.
pub fn calculate_subject_averages(students: &[Student]) -> Vec<SubjectAverage> {
    let mut order: Vec<&str> = Vec::new();
    let mut totals: HashMap<&str, SubjectTotals> = HashMap::new();

    for student in students {
        for grade in &student.grades {
            let entry = totals.entry(grade.subject_name.as_str()).or_insert_with(|| {
                order.push(grade.subject_name.as_str());
                SubjectTotals::default()
            });
            entry.total_gpa += grade.current_gpa;
            entry.total_attendance += grade.attendance_pct;
            entry.count += 1;
        }
    }

    order
        .into_iter()
        .filter_map(|name| {
            let subject = totals.get(name)?;
            if subject.count == 0 {
                return None;
            }
            Some(SubjectAverage {
                name: name.to_string(),
                avg_gpa: subject.total_gpa / subject.count as f64,
                avg_attendance: subject.total_attendance / subject.count as f64,
            })
        })
        .collect()
}

/// Cohort-wide means over every recorded grade.
///
/// The denominator is the number of grades actually present, so students
/// with fewer subjects do not drag the averages down.
pub fn overall_averages(students: &[Student]) -> OverallAverages {
    let grades = || students.iter().flat_map(|s| s.grades.iter());

    OverallAverages {
        avg_attendance: mean(grades().map(|g| g.attendance_pct)),
        avg_gpa: mean(grades().map(|g| g.current_gpa)),
        grade_count: grades().count(),
    }
}

pub const IMPROVEMENT_BINS: [&str; 5] = [
    "Decline (<-0.5)",
    "Slight Decline (-0.5 to 0)",
    "Maintained (~0)",
    "Slight Improvement (0 to 0.5)",
    "Improved (>0.5)",
];

fn improvement_bin(improvement: f64) -> usize {
    if improvement <= -0.5 {
        0
    } else if improvement < 0.0 {
        1
    } else if improvement.abs() < 0.1 {
        2
    } else if improvement <= 0.5 {
        3
    } else {
        4
    }
}

/// Count of student-subject records per GPA change band
pub fn improvement_histogram(students: &[Student]) -> Vec<HistogramBin> {
    let mut counts = [0usize; IMPROVEMENT_BINS.len()];

    for grade in students.iter().flat_map(|s| s.grades.iter()) {
        counts[improvement_bin(grade.improvement())] += 1;
    }

    IMPROVEMENT_BINS
        .iter()
        .zip(counts)
        .map(|(label, count)| HistogramBin {
            label: label.to_string(),
            count,
        })
        .collect()
}

/// Attendance (x) against current GPA (y) for every student-subject record
pub fn performance_points(students: &[Student]) -> Vec<PerformancePoint> {
    students
        .iter()
        .flat_map(|s| s.grades.iter())
        .map(|g| PerformancePoint {
            x: g.attendance_pct,
            y: g.current_gpa,
        })
        .collect()
}
