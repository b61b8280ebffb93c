use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Student {
    pub student_id: String,
    pub student_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    pub grades: Vec<Grade>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Grade {
    pub subject_name: String,
    pub prev_gpa: f64,
    pub current_gpa: f64,
    pub attendance_pct: f64,
    pub assignment_rate: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub participation_score: Option<f64>,
}

impl Student {
    pub fn new(student_id: impl Into<String>, student_name: impl Into<String>, grades: Vec<Grade>) -> Self {
        Self {
            student_id: student_id.into(),
            student_name: student_name.into(),
            gender: None,
            age: None,
            grades,
        }
    }

    /// Mean current GPA over this student's own grades, 0.0 without grades.
    pub fn average_gpa(&self) -> f64 {
        mean(self.grades.iter().map(|g| g.current_gpa))
    }

    /// Mean attendance over this student's own grades, 0.0 without grades.
    pub fn average_attendance(&self) -> f64 {
        mean(self.grades.iter().map(|g| g.attendance_pct))
    }
}

impl Grade {
    pub fn new(
        subject_name: impl Into<String>,
        prev_gpa: f64,
        current_gpa: f64,
        attendance_pct: f64,
        assignment_rate: f64,
    ) -> Self {
        Self {
            subject_name: subject_name.into(),
            prev_gpa,
            current_gpa,
            attendance_pct,
            assignment_rate,
            participation_score: None,
        }
    }

    pub fn with_participation(mut self, score: f64) -> Self {
        self.participation_score = Some(score);
        self
    }

    /// Change in GPA since the previous term
    pub fn improvement(&self) -> f64 {
        self.current_gpa - self.prev_gpa
    }
}

pub(crate) fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (total, count) = values.fold((0.0, 0usize), |(total, count), v| (total + v, count + 1));
    if count > 0 { total / count as f64 } else { 0.0 }
}

/// Round to two decimals for display series
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
