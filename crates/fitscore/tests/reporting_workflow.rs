//! Notification and background-processing scenarios against in-memory storage.
//!
//! Background jobs run with zero delay and their join handles are awaited so the log can be
//! inspected deterministically.

mod common {
    use std::sync::{Arc, Mutex};

    use chrono::{DateTime, Utc};

    use fitscore::assessment::{
        DimensionAnswers, Evaluation, EvaluationId, EvaluationRepository, EvaluationSubmission,
        RepositoryError,
    };
    use fitscore::config::{NotificationConfig, ProcessingConfig};
    use fitscore::notifications::{
        NotificationKind, NotificationLogEntry, NotificationLogError, NotificationLogSink,
        NotificationService,
    };
    use fitscore::processing::BackgroundProcessor;

    #[derive(Default)]
    pub struct MemoryRepository {
        records: Mutex<Vec<Evaluation>>,
    }

    impl MemoryRepository {
        pub fn seed(&self, name: &str, value: u8, created_at: DateTime<Utc>) -> Evaluation {
            let evaluation = Evaluation::from_submission(
                EvaluationSubmission {
                    candidate_name: name.to_string(),
                    candidate_email: format!("{}@example.com", name.to_lowercase()),
                    answers: DimensionAnswers::uniform(value),
                },
                EvaluationId::new(),
                created_at,
            )
            .expect("valid submission");
            self.insert(evaluation).expect("insert succeeds")
        }

        pub fn seed_score(&self, name: &str, score: u8, created_at: DateTime<Utc>) -> Evaluation {
            let mut evaluation = self.seed(name, 5, created_at);
            evaluation.fit_score = score;
            evaluation.fit_classification = fitscore::assessment::scoring::classify(score);
            let mut guard = self.records.lock().expect("repository mutex poisoned");
            guard.retain(|existing| existing.id != evaluation.id);
            guard.push(evaluation.clone());
            evaluation
        }
    }

    impl EvaluationRepository for MemoryRepository {
        fn insert(&self, evaluation: Evaluation) -> Result<Evaluation, RepositoryError> {
            let mut guard = self.records.lock().expect("repository mutex poisoned");
            if guard.iter().any(|existing| existing.id == evaluation.id) {
                return Err(RepositoryError::Conflict);
            }
            guard.push(evaluation.clone());
            Ok(evaluation)
        }

        fn fetch(&self, id: &EvaluationId) -> Result<Option<Evaluation>, RepositoryError> {
            let guard = self.records.lock().expect("repository mutex poisoned");
            Ok(guard.iter().find(|evaluation| &evaluation.id == id).cloned())
        }

        fn list(&self) -> Result<Vec<Evaluation>, RepositoryError> {
            let mut evaluations = self
                .records
                .lock()
                .expect("repository mutex poisoned")
                .clone();
            evaluations.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            Ok(evaluations)
        }
    }

    #[derive(Default)]
    pub struct MemoryLog {
        entries: Mutex<Vec<NotificationLogEntry>>,
    }

    impl MemoryLog {
        pub fn of_kind(&self, kind: NotificationKind) -> Vec<NotificationLogEntry> {
            self.entries
                .lock()
                .expect("log mutex poisoned")
                .iter()
                .filter(|entry| entry.notification_type == kind)
                .cloned()
                .collect()
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
            Ok(self
                .of_kind(kind)
                .into_iter()
                .rev()
                .take(limit)
                .collect())
        }
    }

    pub struct Harness {
        pub repository: Arc<MemoryRepository>,
        pub log: Arc<MemoryLog>,
        pub notifications: Arc<NotificationService<MemoryRepository, MemoryLog>>,
        pub processor: BackgroundProcessor<MemoryRepository, MemoryLog>,
    }

    pub fn harness() -> Harness {
        let repository = Arc::new(MemoryRepository::default());
        let log = Arc::new(MemoryLog::default());
        let notifications = Arc::new(NotificationService::new(
            repository.clone(),
            log.clone(),
            NotificationConfig::default(),
        ));
        let processor =
            BackgroundProcessor::new(notifications.clone(), ProcessingConfig::immediate());
        Harness {
            repository,
            log,
            notifications,
            processor,
        }
    }
}

use chrono::{Duration, Utc};

use common::harness;
use fitscore::assessment::{EvaluationId, FitClassification};
use fitscore::config::NotificationConfig;
use fitscore::notifications::{NotificationError, NotificationKind, NotificationStatus};
use fitscore::processing::ProcessingError;

#[test]
fn candidate_result_mail_reflects_classification() {
    let harness = harness();
    let evaluation = harness.repository.seed("Ana", 5, Utc::now());

    let email = harness
        .notifications
        .notify_candidate(&evaluation.id)
        .expect("candidate notified");

    assert_eq!(email.to, "ana@example.com");
    assert!(email.subject.ends_with("Fit Questionável"));
    assert!(email.html.contains("Performance: 10/10"));

    let logged = harness.log.of_kind(NotificationKind::CandidateResult);
    assert_eq!(logged.len(), 1);
    assert_eq!(logged[0].evaluation_id, Some(evaluation.id));
}

#[test]
fn unknown_candidate_is_reported() {
    let harness = harness();

    assert!(matches!(
        harness.notifications.notify_candidate(&EvaluationId::new()),
        Err(NotificationError::EvaluationNotFound(_))
    ));
    assert!(harness
        .log
        .of_kind(NotificationKind::CandidateResult)
        .is_empty());
}

#[test]
fn approved_report_lists_recent_high_scorers() {
    let harness = harness();
    let now = Utc::now();
    harness.repository.seed_score("Bia", 85, now - Duration::hours(2));
    harness.repository.seed_score("Caio", 92, now - Duration::hours(4));
    harness.repository.seed_score("Duda", 95, now - Duration::hours(20));
    harness.repository.seed_score("Edu", 60, now - Duration::hours(1));

    let outcome = harness
        .notifications
        .approved_candidates_report(now)
        .expect("report builds");

    assert_eq!(outcome.count, 2);
    let report = outcome.report_preview.expect("report present");
    assert_eq!(report.to, NotificationConfig::DEFAULT_ADMIN_EMAIL);
    assert_eq!(report.average_score, 89);
    assert_eq!(
        report.top_candidate.map(|top| top.candidate_name),
        Some("Caio".to_string())
    );
    assert_eq!(
        harness
            .log
            .of_kind(NotificationKind::ApprovedCandidatesReport)
            .len(),
        1
    );
}

#[test]
fn approved_report_without_candidates_logs_nothing() {
    let harness = harness();
    harness.repository.seed("Ana", 5, Utc::now());

    let outcome = harness
        .notifications
        .approved_candidates_report(Utc::now())
        .expect("report builds");

    assert_eq!(outcome.count, 0);
    assert!(outcome.report_preview.is_none());
    assert_eq!(
        outcome.message,
        "Nenhum candidato aprovado nas últimas 12 horas"
    );
    assert!(harness
        .log
        .of_kind(NotificationKind::ApprovedCandidatesReport)
        .is_empty());
}

#[test]
fn creative_insights_go_to_the_manager() {
    let harness = harness();

    let entry = harness.notifications.creative_insights(Utc::now());

    assert_eq!(entry.recipient_email, NotificationConfig::DEFAULT_MANAGER_EMAIL);
    assert_eq!(entry.status, NotificationStatus::Sent);
    assert_eq!(
        harness.log.of_kind(NotificationKind::CreativeInsights),
        vec![entry]
    );
}

#[tokio::test]
async fn async_evaluation_renotifies_and_logs_completion() {
    let harness = harness();
    let evaluation = harness.repository.seed("Ana", 4, Utc::now());

    let outcome = harness
        .processor
        .process_evaluation(evaluation.id)
        .await
        .expect("processing succeeds");

    assert_eq!(outcome.evaluation_id, evaluation.id);
    let completed = harness.log.of_kind(NotificationKind::AsyncProcessing);
    assert_eq!(completed.len(), 1);
    assert_eq!(completed[0].status, NotificationStatus::Completed);
    assert_eq!(completed[0].recipient_email, "ana@example.com");
    assert_eq!(
        harness.log.of_kind(NotificationKind::CandidateResult).len(),
        1
    );
}

#[tokio::test]
async fn async_evaluation_of_unknown_id_fails_fast() {
    let harness = harness();

    let result = harness.processor.process_evaluation(EvaluationId::new()).await;

    assert!(matches!(result, Err(ProcessingError::EvaluationNotFound(_))));
    assert!(harness
        .log
        .of_kind(NotificationKind::AsyncProcessing)
        .is_empty());
}

#[tokio::test]
async fn scheduled_report_summarises_the_last_day() {
    let harness = harness();
    let now = Utc::now();
    harness.repository.seed("Ana", 5, now - Duration::hours(1));
    harness.repository.seed("Bia", 3, now - Duration::hours(5));
    harness.repository.seed("Caio", 1, now - Duration::days(3));

    let started = harness
        .processor
        .start_scheduled_report()
        .expect("report starts");
    assert_eq!(started.evaluations_count, 2);

    let summary = started
        .job
        .await
        .expect("job joins")
        .expect("job succeeds");
    assert_eq!(summary.total_evaluations, 2);
    assert_eq!(summary.average_score, 40);

    let status = harness
        .processor
        .scheduled_report_status()
        .expect("status loads");
    assert_eq!(status.total_processed, 1);
    assert_eq!(status.last_processed, Some(status.logs[0].sent_at));
    assert_eq!(status.logs[0].status, NotificationStatus::Completed);
}

#[tokio::test]
async fn scheduled_status_keeps_the_latest_five() {
    let harness = harness();

    for _ in 0..7 {
        let started = harness
            .processor
            .start_scheduled_report()
            .expect("report starts");
        started.job.await.expect("job joins").expect("job succeeds");
    }

    let status = harness
        .processor
        .scheduled_report_status()
        .expect("status loads");
    assert_eq!(status.total_processed, 5);
    assert!(status
        .logs
        .windows(2)
        .all(|pair| pair[0].sent_at >= pair[1].sent_at));
}

#[tokio::test]
async fn real_time_analytics_previews_the_latest_ten() {
    let harness = harness();
    let now = Utc::now();
    for minutes in 0..12 {
        harness
            .repository
            .seed(&format!("C{minutes}"), 3, now - Duration::minutes(minutes));
    }

    let started = harness
        .processor
        .start_real_time_analytics()
        .expect("analytics start");
    assert_eq!(started.total_evaluations, 12);
    assert_eq!(started.latest.len(), 10);
    assert_eq!(started.latest[0].candidate_name, "C0");

    let summary = started
        .job
        .await
        .expect("job joins")
        .expect("job succeeds");
    assert_eq!(summary.average_score, 30);
    assert_eq!(summary.trends.len(), 1);

    let processed = harness.log.of_kind(NotificationKind::RealTimeAnalytics);
    assert_eq!(processed.len(), 1);
    assert_eq!(processed[0].status, NotificationStatus::Processed);
}

#[tokio::test]
async fn batch_analytics_tallies_classifications() {
    let harness = harness();
    let now = Utc::now();
    harness.repository.seed("Ana", 5, now);
    harness.repository.seed("Bia", 5, now);
    harness.repository.seed("Caio", 2, now);

    let started = harness.processor.start_batch_analytics();
    let summary = started
        .job
        .await
        .expect("job joins")
        .expect("job succeeds");

    assert_eq!(summary.total_evaluations, 3);
    assert_eq!(
        summary
            .classifications
            .count(FitClassification::FitQuestionavel),
        2
    );
    assert_eq!(
        summary.classifications.count(FitClassification::ForaDoPerfil),
        1
    );
    assert_eq!(
        harness.log.of_kind(NotificationKind::BatchAnalytics)[0].recipient_email,
        NotificationConfig::DEFAULT_ADMIN_EMAIL
    );
}
