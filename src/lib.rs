//! Student performance dashboard.
//!
//! Loads a roster of students with per-subject grades, computes subject
//! averages, flags at-risk students, generates per-subject insights and
//! serves the results as view models for the dashboard, search and insights
//! pages. A linear regression over per-student feature rows predicts GPA.

pub mod analytics;
pub mod classifier;
pub mod config;
pub mod data;
pub mod error;
pub mod export;
pub mod generate;
pub mod model;
pub mod pages;
pub mod predictor;
pub mod roster;
pub mod server;
pub mod theme;
pub mod views;
