use chrono::{DateTime, Utc};
use fitscore::assessment::{
    DimensionAnswers, Evaluation, EvaluationId, EvaluationRepository, RepositoryError,
};
use fitscore::notifications::{
    NotificationKind, NotificationLogEntry, NotificationLogError, NotificationLogSink,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Process-local evaluation store. Contents are lost on restart.
#[derive(Default, Clone)]
pub(crate) struct InMemoryEvaluationRepository {
    records: Arc<Mutex<HashMap<EvaluationId, Evaluation>>>,
}

impl InMemoryEvaluationRepository {
    pub(crate) fn with_evaluations(evaluations: Vec<Evaluation>) -> Self {
        let records = evaluations
            .into_iter()
            .map(|evaluation| (evaluation.id, evaluation))
            .collect();
        Self {
            records: Arc::new(Mutex::new(records)),
        }
    }
}

impl EvaluationRepository for InMemoryEvaluationRepository {
    fn insert(&self, evaluation: Evaluation) -> Result<Evaluation, RepositoryError> {
        let mut guard = self
            .records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("repository lock poisoned".to_string()))?;
        if guard.contains_key(&evaluation.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(evaluation.id, evaluation.clone());
        Ok(evaluation)
    }

    fn fetch(&self, id: &EvaluationId) -> Result<Option<Evaluation>, RepositoryError> {
        let guard = self
            .records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("repository lock poisoned".to_string()))?;
        Ok(guard.get(id).cloned())
    }

    fn list(&self) -> Result<Vec<Evaluation>, RepositoryError> {
        let guard = self
            .records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("repository lock poisoned".to_string()))?;
        let mut evaluations: Vec<Evaluation> = guard.values().cloned().collect();
        evaluations.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(evaluations)
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryNotificationLog {
    entries: Arc<Mutex<Vec<NotificationLogEntry>>>,
}

impl NotificationLogSink for InMemoryNotificationLog {
    fn append(&self, entry: NotificationLogEntry) -> Result<(), NotificationLogError> {
        let mut guard = self
            .entries
            .lock()
            .map_err(|_| NotificationLogError::Unavailable("log lock poisoned".to_string()))?;
        guard.push(entry);
        Ok(())
    }

    fn recent(
        &self,
        kind: NotificationKind,
        limit: usize,
    ) -> Result<Vec<NotificationLogEntry>, NotificationLogError> {
        let guard = self
            .entries
            .lock()
            .map_err(|_| NotificationLogError::Unavailable("log lock poisoned".to_string()))?;
        let mut matching: Vec<NotificationLogEntry> = guard
            .iter()
            .filter(|entry| entry.notification_type == kind)
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.sent_at.cmp(&a.sent_at));
        matching.truncate(limit);
        Ok(matching)
    }
}

impl InMemoryNotificationLog {
    pub(crate) fn entries(&self) -> Vec<NotificationLogEntry> {
        self.entries
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}

/// Parses `--answers 5,4,4,3,3,2,5,5,4` in questionnaire order.
pub(crate) fn parse_answers(raw: &str) -> Result<DimensionAnswers, String> {
    let values = raw
        .split(',')
        .map(|part| {
            part.trim()
                .parse::<u8>()
                .map_err(|err| format!("'{}' is not an answer between 1 and 5 ({err})", part.trim()))
        })
        .collect::<Result<Vec<u8>, String>>()?;
    DimensionAnswers::from_slice(&values).map_err(|err| err.to_string())
}

pub(crate) fn parse_instant(raw: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(raw.trim())
        .map(|instant| instant.with_timezone(&Utc))
        .map_err(|err| format!("failed to parse '{raw}' as an RFC 3339 timestamp ({err})"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn parse_answers_accepts_nine_values() {
        let answers = parse_answers("5, 4,4,3,3,2,5,5,4").expect("valid answers");
        assert_eq!(answers.performance_experience, 5);
        assert_eq!(answers.culture_innovation, 4);
    }

    #[test]
    fn parse_answers_reports_count_and_range() {
        let short = parse_answers("5,4,4").expect_err("too few answers");
        assert!(short.contains("expected 9 answers"));

        let out_of_range = parse_answers("5,4,4,3,3,2,5,5,9").expect_err("out of range");
        assert!(out_of_range.contains("culture_innovation"));

        assert!(parse_answers("5,4,x,3,3,2,5,5,4").is_err());
    }

    #[test]
    fn parse_instant_normalises_offsets() {
        assert_eq!(
            parse_instant("2025-03-10T15:00:00-03:00"),
            Ok(Utc.with_ymd_and_hms(2025, 3, 10, 18, 0, 0).unwrap())
        );
        assert!(parse_instant("tomorrow").is_err());
    }

    #[test]
    fn notification_log_returns_newest_of_kind() {
        let log = InMemoryNotificationLog::default();
        let base = Utc.with_ymd_and_hms(2025, 3, 10, 8, 0, 0).unwrap();
        for hour in 0..3 {
            log.append(NotificationLogEntry::new(
                NotificationKind::ScheduledReport,
                "admin@legal.com",
                fitscore::notifications::NotificationStatus::Completed,
                base + chrono::Duration::hours(hour),
            ))
            .expect("append succeeds");
        }
        log.append(NotificationLogEntry::new(
            NotificationKind::BatchAnalytics,
            "admin@legal.com",
            fitscore::notifications::NotificationStatus::Completed,
            base + chrono::Duration::hours(5),
        ))
        .expect("append succeeds");

        let recent = log
            .recent(NotificationKind::ScheduledReport, 2)
            .expect("recent succeeds");
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].sent_at, base + chrono::Duration::hours(2));
        assert_eq!(log.entries().len(), 4);
    }
}
