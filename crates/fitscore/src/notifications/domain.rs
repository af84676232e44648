use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::assessment::EvaluationId;

/// Event types recorded in the `notification_logs` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    CandidateResult,
    AsyncProcessing,
    ApprovedCandidatesReport,
    ScheduledReport,
    RealTimeAnalytics,
    BatchAnalytics,
    CreativeInsights,
}

impl NotificationKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::CandidateResult => "candidate_result",
            Self::AsyncProcessing => "async_processing",
            Self::ApprovedCandidatesReport => "approved_candidates_report",
            Self::ScheduledReport => "scheduled_report",
            Self::RealTimeAnalytics => "real_time_analytics",
            Self::BatchAnalytics => "batch_analytics",
            Self::CreativeInsights => "creative_insights",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationStatus {
    Sent,
    Processed,
    Completed,
}

/// Append-only audit row. Has no bearing on scoring or insights.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationLogEntry {
    pub evaluation_id: Option<EvaluationId>,
    pub notification_type: NotificationKind,
    pub recipient_email: String,
    pub status: NotificationStatus,
    pub sent_at: DateTime<Utc>,
}

impl NotificationLogEntry {
    pub fn new(
        notification_type: NotificationKind,
        recipient_email: impl Into<String>,
        status: NotificationStatus,
        sent_at: DateTime<Utc>,
    ) -> Self {
        Self {
            evaluation_id: None,
            notification_type,
            recipient_email: recipient_email.into(),
            status,
            sent_at,
        }
    }

    pub fn for_evaluation(mut self, evaluation_id: EvaluationId) -> Self {
        self.evaluation_id = Some(evaluation_id);
        self
    }
}

/// Sink for notification and report events (the `notification_logs` table).
pub trait NotificationLogSink: Send + Sync {
    fn append(&self, entry: NotificationLogEntry) -> Result<(), NotificationLogError>;
    /// Latest entries of one kind, newest first.
    fn recent(
        &self,
        kind: NotificationKind,
        limit: usize,
    ) -> Result<Vec<NotificationLogEntry>, NotificationLogError>;
}

#[derive(Debug, thiserror::Error)]
pub enum NotificationLogError {
    #[error("notification log unavailable: {0}")]
    Unavailable(String),
}
