//! Error types for the dashboard.
//!
//! Library code returns these `thiserror` enums; `main.rs` works in `anyhow`.

use thiserror::Error;

/// Errors that can occur while obtaining the roster
#[derive(Error, Debug)]
pub enum RosterError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("roster endpoint returned HTTP {0}")]
    Status(u16),

    #[error("failed to read roster file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid roster CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("invalid roster JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported roster file type: {0}")]
    UnsupportedFile(String),
}

/// Errors that can occur while building the CSV report
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("failed to write CSV record: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to flush CSV writer: {0}")]
    Flush(String),

    #[error("report is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Errors that can occur while training or applying the GPA predictor
#[derive(Error, Debug)]
pub enum PredictorError {
    #[error("need at least {need} students with complete features, have {have}")]
    InsufficientData { have: usize, need: usize },

    #[error("student {0} has no grades with a participation score")]
    MissingFeatures(String),

    #[error("invalid feature matrix: {0}")]
    Shape(#[from] ndarray::ShapeError),

    #[error("regression fit failed: {0}")]
    Fit(#[from] linfa_linear::LinearError<f64>),

    #[error("evaluation failed: {0}")]
    Metrics(#[from] linfa::Error),
}
