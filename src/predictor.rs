//! GPA predictor.
//!
//! Every student is reduced to one feature row: the means of previous GPA,
//! attendance, assignment completion and participation over their grades. A
//! linear regression fitted on those rows predicts the student's mean current
//! GPA. The first part of the roster trains the model, the rest evaluates it.

use crate::error::PredictorError;
use crate::model::{mean, round2, Student};
use linfa::prelude::*;
use linfa_linear::{FittedLinearRegression, LinearRegression};
use log::{debug, info};
use ndarray::{Array1, Array2};
use serde::Serialize;

pub const FEATURE_NAMES: [&str; 4] = ["avg_prev_gpa", "avg_attendance", "avg_assignments", "avg_participation"];

/// Share of the feature rows used for fitting
pub const TRAIN_RATIO: f32 = 0.8;

/// Fewer complete rows than this leave nothing meaningful to evaluate on
pub const MIN_TRAINING_STUDENTS: usize = 10;

/// Per-student feature row plus the target it is trained against
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct StudentFeatures {
    pub student_id: String,
    pub avg_prev_gpa: f64,
    pub avg_attendance: f64,
    pub avg_assignments: f64,
    pub avg_participation: f64,
    pub avg_current_gpa: f64,
}

impl StudentFeatures {
    /// `None` when the student has no grade carrying a participation score.
    pub fn from_student(student: &Student) -> Option<Self> {
        let participation: Vec<f64> = student.grades.iter().filter_map(|g| g.participation_score).collect();
        if participation.is_empty() {
            return None;
        }

        Some(Self {
            student_id: student.student_id.clone(),
            avg_prev_gpa: mean(student.grades.iter().map(|g| g.prev_gpa)),
            avg_attendance: student.average_attendance(),
            avg_assignments: mean(student.grades.iter().map(|g| g.assignment_rate)),
            avg_participation: mean(participation.into_iter()),
            avg_current_gpa: student.average_gpa(),
        })
    }

    fn values(&self) -> [f64; 4] {
        [self.avg_prev_gpa, self.avg_attendance, self.avg_assignments, self.avg_participation]
    }
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct ModelEvaluation {
    pub trained_on: usize,
    pub evaluated_on: usize,
    /// Mean absolute error of the held-out predictions, in GPA points
    pub mae: f64,
    pub r2: f64,
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct GpaPrediction {
    pub student_id: String,
    pub student_name: String,
    pub predicted_gpa: f64,
    pub actual_gpa: f64,
    pub evaluation: ModelEvaluation,
}

fn feature_matrix(rows: &[StudentFeatures]) -> Result<Array2<f64>, PredictorError> {
    let flat: Vec<f64> = rows.iter().flat_map(|r| r.values()).collect();
    Ok(Array2::from_shape_vec((rows.len(), FEATURE_NAMES.len()), flat)?)
}

pub struct GpaPredictor {
    model: FittedLinearRegression<f64>,
    evaluation: ModelEvaluation,
}

impl GpaPredictor {
    /// Fit on the leading share of the roster and evaluate on the remainder.
    ///
    /// Students without participation scores are left out of both parts.
    pub fn train(students: &[Student]) -> Result<Self, PredictorError> {
        let rows: Vec<StudentFeatures> = students.iter().filter_map(StudentFeatures::from_student).collect();
        if rows.len() < MIN_TRAINING_STUDENTS {
            return Err(PredictorError::InsufficientData {
                have: rows.len(),
                need: MIN_TRAINING_STUDENTS,
            });
        }

        let records = feature_matrix(&rows)?;
        let targets: Array1<f64> = rows.iter().map(|r| r.avg_current_gpa).collect();
        let (train, valid) = Dataset::new(records, targets).split_with_ratio(TRAIN_RATIO);

        debug!("Fitting GPA regression on {} of {} students", train.records().nrows(), rows.len());
        let model = LinearRegression::new().fit(&train)?;

        let predicted: Array1<f64> = model.predict(&valid);
        let evaluation = ModelEvaluation {
            trained_on: train.records().nrows(),
            evaluated_on: valid.records().nrows(),
            mae: predicted.mean_absolute_error(&valid)?,
            r2: predicted.r2(&valid)?,
        };

        info!(
            "GPA predictor trained: MAE {:.4}, R2 {:.4} over {} held-out students",
            evaluation.mae, evaluation.r2, evaluation.evaluated_on
        );

        Ok(Self { model, evaluation })
    }

    pub fn evaluation(&self) -> &ModelEvaluation {
        &self.evaluation
    }

    /// Intercept followed by one weight per feature, in `FEATURE_NAMES` order
    pub fn coefficients(&self) -> (f64, Vec<f64>) {
        (self.model.intercept(), self.model.params().to_vec())
    }

    pub fn predict_features(&self, features: &StudentFeatures) -> Result<f64, PredictorError> {
        let records = feature_matrix(std::slice::from_ref(features))?;
        let predicted: Array1<f64> = self.model.predict(&records);
        Ok(predicted[0])
    }

    pub fn predict(&self, student: &Student) -> Result<GpaPrediction, PredictorError> {
        let features = StudentFeatures::from_student(student)
            .ok_or_else(|| PredictorError::MissingFeatures(student.student_id.clone()))?;

        Ok(GpaPrediction {
            student_id: student.student_id.clone(),
            student_name: student.student_name.clone(),
            predicted_gpa: round2(self.predict_features(&features)?),
            actual_gpa: round2(features.avg_current_gpa),
            evaluation: self.evaluation.clone(),
        })
    }
}
