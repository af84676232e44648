//! Background processing stubs: artificial delays followed by a notification log entry.
//!
//! The detached jobs hand back their [`JoinHandle`] so callers that care (tests, the CLI)
//! can await the outcome. HTTP handlers simply drop it.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::assessment::{Evaluation, EvaluationId, EvaluationRepository, RepositoryError};
use crate::config::ProcessingConfig;
use crate::insights::{average_fit_score, within, ClassificationDistribution};
use crate::notifications::{
    NotificationError, NotificationKind, NotificationLogEntry, NotificationLogSink,
    NotificationService, NotificationStatus,
};

pub const REAL_TIME_PREVIEW: usize = 10;
pub const SCHEDULED_STATUS_LIMIT: usize = 5;
const HIGH_VOLUME_TREND: &str = "🚀 Alto volume de avaliações nas últimas 24h";

pub type BackgroundJob<T> = JoinHandle<Result<T, ProcessingError>>;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AsyncEvaluationOutcome {
    pub evaluation_id: EvaluationId,
    pub processed_at: DateTime<Utc>,
}

/// Figures computed once a scheduled report finishes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledReportSummary {
    pub total_evaluations: usize,
    pub average_score: u8,
}

pub struct ScheduledReportStarted {
    pub evaluations_count: usize,
    pub started_at: DateTime<Utc>,
    pub job: BackgroundJob<ScheduledReportSummary>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledReportStatus {
    pub processing_status: &'static str,
    pub last_processed: Option<DateTime<Utc>>,
    pub total_processed: usize,
    pub logs: Vec<NotificationLogEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RealTimeSummary {
    pub total_evaluations: usize,
    pub average_score: u8,
    pub trends: Vec<String>,
}

/// Returned to the caller before the real-time job has run.
pub struct RealTimeStarted {
    pub total_evaluations: usize,
    pub latest: Vec<Evaluation>,
    pub last_updated: DateTime<Utc>,
    pub job: BackgroundJob<RealTimeSummary>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchSummary {
    pub total_evaluations: usize,
    pub classifications: ClassificationDistribution,
}

pub struct BatchStarted {
    pub started_at: DateTime<Utc>,
    pub job: BackgroundJob<BatchSummary>,
}

/// Runs the delayed analytics and reporting jobs against the shared repository and log.
pub struct BackgroundProcessor<R, L> {
    notifications: Arc<NotificationService<R, L>>,
    config: ProcessingConfig,
}

impl<R, L> BackgroundProcessor<R, L>
where
    R: EvaluationRepository + 'static,
    L: NotificationLogSink + 'static,
{
    pub fn new(notifications: Arc<NotificationService<R, L>>, config: ProcessingConfig) -> Self {
        Self {
            notifications,
            config,
        }
    }

    /// Re-sends the candidate result after the configured delay. Awaited by the caller.
    pub async fn process_evaluation(
        &self,
        evaluation_id: EvaluationId,
    ) -> Result<AsyncEvaluationOutcome, ProcessingError> {
        let evaluation = self
            .notifications
            .repository()
            .fetch(&evaluation_id)?
            .ok_or(ProcessingError::EvaluationNotFound(evaluation_id))?;

        tokio::time::sleep(self.config.async_evaluation_delay).await;

        self.notifications.notify_candidate(&evaluation_id)?;
        let processed_at = Utc::now();
        self.notifications.record(
            NotificationLogEntry::new(
                NotificationKind::AsyncProcessing,
                evaluation.candidate_email,
                NotificationStatus::Completed,
                processed_at,
            )
            .for_evaluation(evaluation_id),
        );
        info!(evaluation_id = %evaluation_id, "async evaluation processed");

        Ok(AsyncEvaluationOutcome {
            evaluation_id,
            processed_at,
        })
    }

    /// Snapshots the last 24 hours now and summarises it after the delay.
    pub fn start_scheduled_report(&self) -> Result<ScheduledReportStarted, ProcessingError> {
        let started_at = Utc::now();
        let since = started_at - Duration::hours(24);
        let recent: Vec<Evaluation> = self
            .notifications
            .repository()
            .list()?
            .into_iter()
            .filter(|evaluation| evaluation.created_at >= since)
            .collect();
        let evaluations_count = recent.len();
        info!(evaluations = evaluations_count, "scheduled report started");

        let notifications = Arc::clone(&self.notifications);
        let delay = self.config.scheduled_report_delay;
        let job = tokio::spawn(async move {
            tokio::time::sleep(delay).await;

            let summary = ScheduledReportSummary {
                total_evaluations: recent.len(),
                average_score: average_fit_score(recent.iter()),
            };
            notifications.record(NotificationLogEntry::new(
                NotificationKind::ScheduledReport,
                notifications.config().admin_email.clone(),
                NotificationStatus::Completed,
                Utc::now(),
            ));
            info!(
                total = summary.total_evaluations,
                average_score = summary.average_score,
                "scheduled report processed"
            );
            Ok::<_, ProcessingError>(summary)
        });

        Ok(ScheduledReportStarted {
            evaluations_count,
            started_at,
            job,
        })
    }

    pub fn scheduled_report_status(&self) -> Result<ScheduledReportStatus, ProcessingError> {
        let logs = self
            .notifications
            .recent(NotificationKind::ScheduledReport, SCHEDULED_STATUS_LIMIT)?;
        Ok(ScheduledReportStatus {
            processing_status: "active",
            last_processed: logs.first().map(|entry| entry.sent_at),
            total_processed: logs.len(),
            logs,
        })
    }

    /// Returns totals and the latest evaluations immediately; the analytics run detached.
    pub fn start_real_time_analytics(&self) -> Result<RealTimeStarted, ProcessingError> {
        let evaluations = self.notifications.repository().list()?;
        let total_evaluations = evaluations.len();
        let latest = evaluations.iter().take(REAL_TIME_PREVIEW).cloned().collect();

        let notifications = Arc::clone(&self.notifications);
        let delay = self.config.real_time_delay;
        let job = tokio::spawn(async move {
            tokio::time::sleep(delay).await;

            let now = Utc::now();
            let mut trends = Vec::new();
            if within(&evaluations, now, Duration::hours(24)).len() > 5 {
                trends.push(HIGH_VOLUME_TREND.to_string());
            }
            let summary = RealTimeSummary {
                total_evaluations: evaluations.len(),
                average_score: average_fit_score(evaluations.iter()),
                trends,
            };
            notifications.record(NotificationLogEntry::new(
                NotificationKind::RealTimeAnalytics,
                notifications.config().admin_email.clone(),
                NotificationStatus::Processed,
                now,
            ));
            info!(
                total = summary.total_evaluations,
                average_score = summary.average_score,
                "real-time analytics processed"
            );
            Ok::<_, ProcessingError>(summary)
        });

        Ok(RealTimeStarted {
            total_evaluations,
            latest,
            last_updated: Utc::now(),
            job,
        })
    }

    /// Reads the whole history after the delay and tallies classifications.
    pub fn start_batch_analytics(&self) -> BatchStarted {
        info!("batch analytics started");
        let notifications = Arc::clone(&self.notifications);
        let delay = self.config.batch_delay;
        let job = tokio::spawn(async move {
            tokio::time::sleep(delay).await;

            let evaluations = notifications.repository().list().map_err(|err| {
                error!(error = %err, "batch analytics failed");
                ProcessingError::from(err)
            })?;
            let summary = BatchSummary {
                total_evaluations: evaluations.len(),
                classifications: evaluations
                    .iter()
                    .map(|evaluation| evaluation.fit_classification)
                    .collect(),
            };
            notifications.record(NotificationLogEntry::new(
                NotificationKind::BatchAnalytics,
                notifications.config().admin_email.clone(),
                NotificationStatus::Completed,
                Utc::now(),
            ));
            info!(total = summary.total_evaluations, "batch analytics completed");
            Ok::<_, ProcessingError>(summary)
        });

        BatchStarted {
            started_at: Utc::now(),
            job,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ProcessingError {
    #[error("evaluation {0} not found")]
    EvaluationNotFound(EvaluationId),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Notification(#[from] NotificationError),
}
