use crate::classifier::{resource_for, StudentClassifier};
use crate::error::ExportError;
use crate::model::Student;
use csv::{QuoteStyle, Terminator, WriterBuilder};

pub const REPORT_HEADER: [&str; 6] = ["Student ID", "Name", "Subject", "Issue", "Recommendation", "Resource"];

const RECOMMENDATION: &str = "Focus on foundational topics";

fn quoted(value: &str) -> String {
    format!("\"{}\"", value)
}

/// One row of the at-risk report
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRow {
    pub student_id: String,
    pub student_name: String,
    pub subject_name: String,
    pub current_gpa: f64,
    pub resource: Option<&'static str>,
}

impl ReportRow {
    fn to_record(&self) -> [String; 6] {
        [
            self.student_id.clone(),
            quoted(&self.student_name),
            self.subject_name.clone(),
            quoted(&format!("Low GPA ({})", self.current_gpa)),
            quoted(RECOMMENDATION),
            quoted(self.resource.unwrap_or("")),
        ]
    }
}

/// Low-GPA grades of at-risk students, in roster order
pub fn at_risk_report_rows(classifier: &StudentClassifier, students: &[Student]) -> Vec<ReportRow> {
    students
        .iter()
        .filter(|s| classifier.is_at_risk(s))
        .flat_map(move |s| {
            s.grades
                .iter()
                .filter(move |g| classifier.is_low_gpa(g))
                .map(move |g| ReportRow {
                    student_id: s.student_id.clone(),
                    student_name: s.student_name.clone(),
                    subject_name: g.subject_name.clone(),
                    current_gpa: g.current_gpa,
                    resource: resource_for(&g.subject_name),
                })
        })
        .collect()
}

/// Render the at-risk report.
///
/// Name, issue, recommendation and resource are wrapped in double quotes
/// as-is; embedded quotes and commas are not escaped.
pub fn at_risk_report_csv(classifier: &StudentClassifier, students: &[Student]) -> Result<String, ExportError> {
    let mut wtr = WriterBuilder::new()
        .quote_style(QuoteStyle::Never)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    wtr.write_record(REPORT_HEADER)?;
    for row in at_risk_report_rows(classifier, students) {
        wtr.write_record(row.to_record())?;
    }

    let bytes = wtr.into_inner().map_err(|e| ExportError::Flush(e.to_string()))?;
    Ok(String::from_utf8(bytes)?)
}
