use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::assessment::domain::{DimensionAnswers, Evaluation, EvaluationId, EvaluationSubmission};
use crate::assessment::repository::{EvaluationRepository, RepositoryError};
use crate::assessment::AssessmentService;
use crate::config::NotificationConfig;
use crate::notifications::{
    NotificationKind, NotificationLogEntry, NotificationLogError, NotificationLogSink,
    NotificationService,
};

pub(super) fn submission(name: &str, email: &str, answers: [u8; 9]) -> EvaluationSubmission {
    EvaluationSubmission {
        candidate_name: name.to_string(),
        candidate_email: email.to_string(),
        answers: DimensionAnswers::from_slice(&answers).expect("valid answers"),
    }
}

pub(super) fn strong_submission() -> EvaluationSubmission {
    submission("Ana Souza", "ana@example.com", [5, 5, 5, 5, 5, 5, 5, 5, 4])
}

pub(super) fn build_service() -> (
    AssessmentService<MemoryRepository, MemoryLog>,
    Arc<MemoryRepository>,
    Arc<MemoryLog>,
) {
    let repository = Arc::new(MemoryRepository::default());
    let log = Arc::new(MemoryLog::default());
    let notifications = Arc::new(NotificationService::new(
        repository.clone(),
        log.clone(),
        NotificationConfig::default(),
    ));
    (AssessmentService::new(notifications), repository, log)
}

pub(super) fn service_over<R: EvaluationRepository + 'static>(
    repository: R,
) -> Arc<AssessmentService<R, MemoryLog>> {
    let notifications = Arc::new(NotificationService::new(
        Arc::new(repository),
        Arc::new(MemoryLog::default()),
        NotificationConfig::default(),
    ));
    Arc::new(AssessmentService::new(notifications))
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    pub(super) records: Arc<Mutex<HashMap<EvaluationId, Evaluation>>>,
}

impl MemoryRepository {
    pub(super) fn seed(&self, evaluation: Evaluation) {
        self.records
            .lock()
            .expect("repository mutex poisoned")
            .insert(evaluation.id, evaluation);
    }
}

impl EvaluationRepository for MemoryRepository {
    fn insert(&self, evaluation: Evaluation) -> Result<Evaluation, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&evaluation.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(evaluation.id, evaluation.clone());
        Ok(evaluation)
    }

    fn fetch(&self, id: &EvaluationId) -> Result<Option<Evaluation>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn list(&self) -> Result<Vec<Evaluation>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        let mut evaluations: Vec<Evaluation> = guard.values().cloned().collect();
        evaluations.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(evaluations)
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryLog {
    entries: Arc<Mutex<Vec<NotificationLogEntry>>>,
}

impl MemoryLog {
    pub(super) fn entries(&self) -> Vec<NotificationLogEntry> {
        self.entries.lock().expect("log mutex poisoned").clone()
    }
}

impl NotificationLogSink for MemoryLog {
    fn append(&self, entry: NotificationLogEntry) -> Result<(), NotificationLogError> {
        self.entries.lock().expect("log mutex poisoned").push(entry);
        Ok(())
    }

    fn recent(
        &self,
        kind: NotificationKind,
        limit: usize,
    ) -> Result<Vec<NotificationLogEntry>, NotificationLogError> {
        let guard = self.entries.lock().expect("log mutex poisoned");
        Ok(guard
            .iter()
            .rev()
            .filter(|entry| entry.notification_type == kind)
            .take(limit)
            .cloned()
            .collect())
    }
}

pub(super) struct ConflictRepository;

impl EvaluationRepository for ConflictRepository {
    fn insert(&self, _evaluation: Evaluation) -> Result<Evaluation, RepositoryError> {
        Err(RepositoryError::Conflict)
    }

    fn fetch(&self, _id: &EvaluationId) -> Result<Option<Evaluation>, RepositoryError> {
        Ok(None)
    }

    fn list(&self) -> Result<Vec<Evaluation>, RepositoryError> {
        Ok(Vec::new())
    }
}

pub(super) struct UnavailableRepository;

impl EvaluationRepository for UnavailableRepository {
    fn insert(&self, _evaluation: Evaluation) -> Result<Evaluation, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &EvaluationId) -> Result<Option<Evaluation>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn list(&self) -> Result<Vec<Evaluation>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
