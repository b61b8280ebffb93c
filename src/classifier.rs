//! Student classification: at-risk detection, rankings and per-subject insights.
//!
//! Everything here is a pure function of the roster and the configured
//! [`Thresholds`].

use crate::config::Thresholds;
use crate::model::{Grade, Student};
use serde::Serialize;

/// Learning resources registered per subject
pub const SUBJECT_RESOURCES: [(&str, &str); 6] = [
    ("Data Structures & Algorithms", "https://visualgo.net/en"),
    ("Database Management Systems", "https://www.hackerrank.com/domains/sql"),
    ("Operating Systems", "https://www.docker.com/get-started/"),
    ("Computer Networks", "https://www.netacad.com/courses/packet-tracer"),
    ("Object-Oriented Programming", "https://refactoring.guru/design-patterns"),
    (
        "Discrete Mathematics",
        "https://www.youtube.com/playlist?list=PLDDGPdw7e6Ag1EIruYsvIuD-KddiIuLgB",
    ),
];

pub fn resource_for(subject_name: &str) -> Option<&'static str> {
    SUBJECT_RESOURCES
        .iter()
        .find(|(subject, _)| *subject == subject_name)
        .map(|(_, url)| *url)
}

#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum InsightKind {
    CoreConcepts,
    CourseworkDeadlines,
    LectureDisengagement,
}

impl InsightKind {
    pub fn action(&self) -> &'static str {
        match self {
            InsightKind::CoreConcepts => "Focus on foundational topics to build confidence.",
            InsightKind::CourseworkDeadlines => {
                "Recommend academic support resources and time management strategies."
            }
            InsightKind::LectureDisengagement => {
                "Schedule a one-on-one meeting to discuss potential barriers to attendance."
            }
        }
    }

    fn describe(&self, subject_name: &str) -> String {
        match self {
            InsightKind::CoreConcepts => format!("Struggling with Core Concepts in {}.", subject_name),
            InsightKind::CourseworkDeadlines => {
                format!("Difficulty with Coursework Deadlines in {}.", subject_name)
            }
            InsightKind::LectureDisengagement => format!("Disengaged with lectures in {}.", subject_name),
        }
    }
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct Insight {
    pub subject_name: String,
    pub kind: InsightKind,
    pub insight: String,
    pub action: String,
    pub resource: Option<String>,
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct RankedStudent {
    pub student_id: String,
    pub student_name: String,
    pub avg_gpa: f64,
}

impl RankedStudent {
    fn from_student(student: &Student) -> Self {
        Self {
            student_id: student.student_id.clone(),
            student_name: student.student_name.clone(),
            avg_gpa: student.average_gpa(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct StudentClassifier {
    thresholds: Thresholds,
}

impl StudentClassifier {
    pub fn new(thresholds: Thresholds) -> Self {
        Self { thresholds }
    }

    pub fn is_low_gpa(&self, grade: &Grade) -> bool {
        grade.current_gpa < self.thresholds.low_gpa
    }

    pub fn low_gpa_count(&self, student: &Student) -> usize {
        student.grades.iter().filter(|g| self.is_low_gpa(g)).count()
    }

    pub fn is_at_risk(&self, student: &Student) -> bool {
        self.low_gpa_count(student) >= self.thresholds.at_risk_min_subjects
    }

    /// Highest average GPA first, capped at the ranking limit
    pub fn top_performers(&self, students: &[Student]) -> Vec<RankedStudent> {
        let mut ranked: Vec<RankedStudent> = students.iter().map(RankedStudent::from_student).collect();
        ranked.sort_by(|a, b| b.avg_gpa.total_cmp(&a.avg_gpa));
        ranked.truncate(self.thresholds.ranking_limit);
        ranked
    }

    /// At-risk students, lowest average GPA first, capped at the ranking limit
    pub fn at_risk_students(&self, students: &[Student]) -> Vec<RankedStudent> {
        let mut ranked: Vec<RankedStudent> = students
            .iter()
            .filter(|s| self.is_at_risk(s))
            .map(RankedStudent::from_student)
            .collect();
        ranked.sort_by(|a, b| a.avg_gpa.total_cmp(&b.avg_gpa));
        ranked.truncate(self.thresholds.ranking_limit);
        ranked
    }

    /// First matching rule for a grade; later rules never fire once one has.
    pub fn classify_grade(&self, grade: &Grade) -> Option<InsightKind> {
        if self.is_low_gpa(grade) {
            Some(InsightKind::CoreConcepts)
        } else if grade.assignment_rate < self.thresholds.low_assignment_rate {
            Some(InsightKind::CourseworkDeadlines)
        } else if grade.attendance_pct < self.thresholds.low_attendance {
            Some(InsightKind::LectureDisengagement)
        } else {
            None
        }
    }

    pub fn generate_insights(&self, student: &Student) -> Vec<Insight> {
        student
            .grades
            .iter()
            .filter_map(|grade| {
                let kind = self.classify_grade(grade)?;
                // Only core-concept gaps come with study material.
                let resource = match kind {
                    InsightKind::CoreConcepts => resource_for(&grade.subject_name).map(str::to_string),
                    _ => None,
                };
                Some(Insight {
                    subject_name: grade.subject_name.clone(),
                    kind,
                    insight: kind.describe(&grade.subject_name),
                    action: kind.action().to_string(),
                    resource,
                })
            })
            .collect()
    }
}
