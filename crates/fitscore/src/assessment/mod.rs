//! Questionnaire intake, FitScore computation and the evaluation dashboard.

pub mod domain;
pub mod import;
pub mod repository;
pub mod router;
pub mod scoring;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    Dimension, DimensionAnswers, Evaluation, EvaluationId, EvaluationSubmission,
    FitClassification, SubmissionError, UnknownClassification,
};
pub use import::{EvaluationCsvImporter, EvaluationImportError};
pub use repository::{DashboardStats, EvaluationFilter, EvaluationRepository, RepositoryError};
pub use router::assessment_router;
pub use scoring::{compute_fit_score, FitScore, ScoreError};
pub use service::{AssessmentError, AssessmentService};
