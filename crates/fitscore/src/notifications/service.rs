use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{error, info};

use super::candidate::{render_candidate_email, CandidateEmail};
use super::domain::{
    NotificationKind, NotificationLogEntry, NotificationLogError, NotificationLogSink,
    NotificationStatus,
};
use super::report::{build_approved_report, select_approved, ApprovedCandidatesReport};
use crate::assessment::{Evaluation, EvaluationId, EvaluationRepository, RepositoryError};
use crate::config::NotificationConfig;

/// Renders simulated e-mails and records every event in the notification log.
pub struct NotificationService<R, L> {
    repository: Arc<R>,
    log: Arc<L>,
    config: NotificationConfig,
}

/// Result of an approved-candidates run; `report` is absent when nobody qualified.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovedReportOutcome {
    pub count: usize,
    pub message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report_preview: Option<ApprovedCandidatesReport>,
}

impl<R, L> NotificationService<R, L>
where
    R: EvaluationRepository + 'static,
    L: NotificationLogSink + 'static,
{
    pub fn new(repository: Arc<R>, log: Arc<L>, config: NotificationConfig) -> Self {
        Self {
            repository,
            log,
            config,
        }
    }

    pub fn config(&self) -> &NotificationConfig {
        &self.config
    }

    /// Look up an evaluation and send its result e-mail.
    pub fn notify_candidate(
        &self,
        evaluation_id: &EvaluationId,
    ) -> Result<CandidateEmail, NotificationError> {
        let evaluation = self
            .repository
            .fetch(evaluation_id)?
            .ok_or(NotificationError::EvaluationNotFound(*evaluation_id))?;
        Ok(self.send_candidate_result(&evaluation))
    }

    /// Render, "send" and log the result e-mail for an evaluation already in hand.
    pub fn send_candidate_result(&self, evaluation: &Evaluation) -> CandidateEmail {
        let email = render_candidate_email(evaluation);
        self.record(
            NotificationLogEntry::new(
                NotificationKind::CandidateResult,
                evaluation.candidate_email.clone(),
                NotificationStatus::Sent,
                Utc::now(),
            )
            .for_evaluation(evaluation.id),
        );
        info!(
            evaluation_id = %evaluation.id,
            recipient = %email.to,
            subject = %email.subject,
            "candidate result e-mail sent"
        );
        email
    }

    pub fn approved_candidates_report(
        &self,
        now: DateTime<Utc>,
    ) -> Result<ApprovedReportOutcome, NotificationError> {
        let evaluations = self.repository.list()?;
        let selected = select_approved(&evaluations, now);

        let Some(report) = build_approved_report(&selected, &self.config.admin_email) else {
            return Ok(ApprovedReportOutcome {
                count: 0,
                message: "Nenhum candidato aprovado nas últimas 12 horas",
                report_preview: None,
            });
        };

        self.record(NotificationLogEntry::new(
            NotificationKind::ApprovedCandidatesReport,
            self.config.admin_email.clone(),
            NotificationStatus::Sent,
            now,
        ));
        info!(
            recipient = %report.to,
            candidates = report.total_candidates,
            average_score = report.average_score,
            "approved candidates report generated"
        );

        Ok(ApprovedReportOutcome {
            count: report.total_candidates,
            message: "Relatório gerado e enviado com sucesso",
            report_preview: Some(report),
        })
    }

    /// Records a creative-insights event addressed to the manager.
    pub fn creative_insights(&self, now: DateTime<Utc>) -> NotificationLogEntry {
        let entry = NotificationLogEntry::new(
            NotificationKind::CreativeInsights,
            self.config.manager_email.clone(),
            NotificationStatus::Sent,
            now,
        );
        self.record(entry.clone());
        entry
    }

    pub fn recent(
        &self,
        kind: NotificationKind,
        limit: usize,
    ) -> Result<Vec<NotificationLogEntry>, NotificationError> {
        Ok(self.log.recent(kind, limit)?)
    }

    /// Appends to the log. A failing sink is reported but never fails the caller.
    pub fn record(&self, entry: NotificationLogEntry) {
        let kind = entry.notification_type;
        if let Err(err) = self.log.append(entry) {
            error!(notification_type = kind.label(), error = %err, "failed to record notification");
        }
    }

    pub(crate) fn repository(&self) -> &Arc<R> {
        &self.repository
    }
}

#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    #[error("evaluation {0} not found")]
    EvaluationNotFound(EvaluationId),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Log(#[from] NotificationLogError),
}
