//! Configuration and constants for the dashboard server.

use std::time::Duration;

/// Default address the server binds to
pub const DEFAULT_BIND: &str = "127.0.0.1";

/// Default port
pub const DEFAULT_PORT: u16 = 8080;

/// Path the roster is served under
pub const ROSTER_PATH: &str = "/api/students";

/// Default location of the flat roster file
pub const DEFAULT_ROSTER_FILE: &str = "data/student_performance.csv";

/// Timeout for upstream roster requests
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// File name offered for the at-risk report download
pub const REPORT_FILE_NAME: &str = "at_risk_students_report.csv";

/// Queries shorter than this never match anything
pub const MIN_SEARCH_QUERY_LEN: usize = 2;

/// Classification thresholds.
///
/// Comparisons are strict: a grade of exactly `low_gpa` is not low.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    /// GPA below which a subject counts as struggling
    pub low_gpa: f64,
    /// Number of low-GPA subjects that makes a student at-risk
    pub at_risk_min_subjects: usize,
    /// Assignment completion rate (%) below which deadlines are flagged
    pub low_assignment_rate: f64,
    /// Attendance (%) below which a student is considered disengaged
    pub low_attendance: f64,
    /// Length of the top / at-risk tables
    pub ranking_limit: usize,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            low_gpa: 5.5,
            at_risk_min_subjects: 2,
            low_assignment_rate: 70.0,
            low_attendance: 60.0,
            ranking_limit: 5,
        }
    }
}
