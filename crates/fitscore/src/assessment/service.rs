use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use super::domain::{Evaluation, EvaluationId, EvaluationSubmission, SubmissionError};
use super::repository::{DashboardStats, EvaluationFilter, EvaluationRepository, RepositoryError};
use crate::notifications::{NotificationLogSink, NotificationService};

/// Service composing questionnaire intake, the repository and candidate notifications.
pub struct AssessmentService<R, L> {
    repository: Arc<R>,
    notifications: Arc<NotificationService<R, L>>,
}

impl<R, L> AssessmentService<R, L>
where
    R: EvaluationRepository + 'static,
    L: NotificationLogSink + 'static,
{
    pub fn new(notifications: Arc<NotificationService<R, L>>) -> Self {
        Self {
            repository: notifications.repository().clone(),
            notifications,
        }
    }

    /// Score and store a completed questionnaire, then send the candidate their result.
    pub fn submit(
        &self,
        submission: EvaluationSubmission,
    ) -> Result<Evaluation, AssessmentError> {
        let evaluation = Evaluation::from_submission(submission, EvaluationId::new(), Utc::now())?;
        let stored = self.repository.insert(evaluation)?;

        info!(
            evaluation_id = %stored.id,
            fit_score = stored.fit_score,
            classification = stored.fit_classification.label(),
            "evaluation recorded"
        );

        self.notifications.send_candidate_result(&stored);
        Ok(stored)
    }

    pub fn get(&self, evaluation_id: &EvaluationId) -> Result<Evaluation, AssessmentError> {
        let evaluation = self
            .repository
            .fetch(evaluation_id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(evaluation)
    }

    /// Dashboard listing, newest first.
    pub fn list(&self, filter: &EvaluationFilter) -> Result<Vec<Evaluation>, AssessmentError> {
        let evaluations = self.repository.list()?;
        Ok(evaluations
            .into_iter()
            .filter(|evaluation| filter.matches(evaluation))
            .collect())
    }

    pub fn stats(&self) -> Result<DashboardStats, AssessmentError> {
        let evaluations = self.repository.list()?;
        Ok(DashboardStats::from_evaluations(&evaluations))
    }
}

/// Error raised by the assessment service.
#[derive(Debug, thiserror::Error)]
pub enum AssessmentError {
    #[error(transparent)]
    Submission(#[from] SubmissionError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
