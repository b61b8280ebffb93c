//! View models for the dashboard, search and insights pages.
//!
//! These are plain serialisable structures; the browser renders them. Nothing
//! here computes beyond sorting and formatting already derived data.

use crate::analytics::{
    calculate_subject_averages, improvement_histogram, overall_averages, performance_points, PerformancePoint,
    SubjectAverage,
};
use crate::classifier::{Insight, RankedStudent, StudentClassifier};
use crate::config::MIN_SEARCH_QUERY_LEN;
use crate::model::{round2, Student};
use serde::Serialize;

pub const NO_CONCERNS_MESSAGE: &str = "No significant areas of concern identified. Keep up the great work!";

#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Bar,
    Doughnut,
    Scatter,
}

/// Labels plus one dataset, ready for a charting library
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct ChartSeries {
    pub kind: ChartKind,
    pub title: String,
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct ScatterSeries {
    pub kind: ChartKind,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub points: Vec<PerformancePoint>,
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct KpiSummary {
    pub total_students: usize,
    pub avg_attendance: f64,
    pub avg_gpa: f64,
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct DashboardView {
    pub kpis: KpiSummary,
    pub top_performers: Vec<RankedStudent>,
    pub at_risk: Vec<RankedStudent>,
    pub attendance_chart: ChartSeries,
    pub gpa_chart: ChartSeries,
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct SearchHit {
    pub student_id: String,
    pub student_name: String,
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct GradeRow {
    pub subject_name: String,
    pub prev_gpa: f64,
    pub current_gpa: f64,
    pub attendance_pct: f64,
    pub assignment_rate: f64,
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct ProfileView {
    pub student_id: String,
    pub student_name: String,
    pub overall_gpa: f64,
    pub overall_attendance: f64,
    pub grades: Vec<GradeRow>,
    pub insights: Vec<Insight>,
    pub no_concerns: Option<String>,
    pub attendance_donut: ChartSeries,
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct InsightsView {
    pub scatter: ScatterSeries,
    pub improvement_histogram: ChartSeries,
    pub difficulty_chart: ChartSeries,
}

fn bar_chart(title: &str, averages: &[SubjectAverage], value: impl Fn(&SubjectAverage) -> f64) -> ChartSeries {
    ChartSeries {
        kind: ChartKind::Bar,
        title: title.to_string(),
        labels: averages.iter().map(|s| s.name.clone()).collect(),
        values: averages.iter().map(|s| round2(value(s))).collect(),
    }
}

pub fn kpi_summary(students: &[Student]) -> KpiSummary {
    let overall = overall_averages(students);
    KpiSummary {
        total_students: students.len(),
        avg_attendance: overall.avg_attendance,
        avg_gpa: overall.avg_gpa,
    }
}

pub fn dashboard_view(classifier: &StudentClassifier, students: &[Student]) -> DashboardView {
    let averages = calculate_subject_averages(students);

    let mut by_attendance = averages.clone();
    by_attendance.sort_by(|a, b| b.avg_attendance.total_cmp(&a.avg_attendance));

    let mut by_gpa = averages;
    by_gpa.sort_by(|a, b| b.avg_gpa.total_cmp(&a.avg_gpa));

    DashboardView {
        kpis: kpi_summary(students),
        top_performers: classifier.top_performers(students),
        at_risk: classifier.at_risk_students(students),
        attendance_chart: bar_chart("Average Attendance %", &by_attendance, |s| s.avg_attendance),
        gpa_chart: bar_chart("Average GPA", &by_gpa, |s| s.avg_gpa),
    }
}

/// Case-insensitive match on name or id.
pub fn search_students(students: &[Student], query: &str) -> Vec<SearchHit> {
    let query = query.trim().to_lowercase();
    if query.chars().count() < MIN_SEARCH_QUERY_LEN {
        return Vec::new();
    }

    students
        .iter()
        .filter(|s| {
            s.student_name.to_lowercase().contains(&query) || s.student_id.to_lowercase().contains(&query)
        })
        .map(|s| SearchHit {
            student_id: s.student_id.clone(),
            student_name: s.student_name.clone(),
        })
        .collect()
}

pub fn profile_view(classifier: &StudentClassifier, student: &Student) -> ProfileView {
    let overall_attendance = student.average_attendance();
    let insights = classifier.generate_insights(student);
    let no_concerns = insights.is_empty().then(|| NO_CONCERNS_MESSAGE.to_string());

    ProfileView {
        student_id: student.student_id.clone(),
        student_name: student.student_name.clone(),
        overall_gpa: student.average_gpa(),
        overall_attendance,
        grades: student
            .grades
            .iter()
            .map(|g| GradeRow {
                subject_name: g.subject_name.clone(),
                prev_gpa: g.prev_gpa,
                current_gpa: g.current_gpa,
                attendance_pct: g.attendance_pct,
                assignment_rate: g.assignment_rate,
            })
            .collect(),
        insights,
        no_concerns,
        attendance_donut: ChartSeries {
            kind: ChartKind::Doughnut,
            title: format!("Avg. Attendance: {:.1}%", overall_attendance),
            labels: vec!["Attended".to_string(), "Missed".to_string()],
            values: vec![overall_attendance, 100.0 - overall_attendance],
        },
    }
}

pub fn find_profile(classifier: &StudentClassifier, students: &[Student], student_id: &str) -> Option<ProfileView> {
    students
        .iter()
        .find(|s| s.student_id == student_id)
        .map(|s| profile_view(classifier, s))
}

pub fn insights_view(students: &[Student]) -> InsightsView {
    let histogram = improvement_histogram(students);

    let mut by_difficulty = calculate_subject_averages(students);
    by_difficulty.sort_by(|a, b| a.avg_gpa.total_cmp(&b.avg_gpa));

    InsightsView {
        scatter: ScatterSeries {
            kind: ChartKind::Scatter,
            title: "Student-Subject Performance".to_string(),
            x_label: "Attendance (%)".to_string(),
            y_label: "Current GPA".to_string(),
            points: performance_points(students),
        },
        improvement_histogram: ChartSeries {
            kind: ChartKind::Bar,
            title: "# of Student-Subject Records".to_string(),
            labels: histogram.iter().map(|b| b.label.clone()).collect(),
            values: histogram.iter().map(|b| b.count as f64).collect(),
        },
        difficulty_chart: bar_chart(
            "Subjects ranked from lowest to highest average GPA",
            &by_difficulty,
            |s| s.avg_gpa,
        ),
    }
}
