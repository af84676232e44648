use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::assessment::{Evaluation, EvaluationId};

use super::escape_html;

/// Minimum FitScore for the approved-candidates digest.
pub const APPROVED_SCORE_THRESHOLD: u8 = 80;
/// Lookback of the approved-candidates digest.
pub const APPROVED_REPORT_WINDOW_HOURS: i64 = 12;

const NEXT_STEPS: [&str; 4] = [
    "Priorizar contato com candidatos de FitScore ≥ 90",
    "Agendar entrevistas técnicas para os top performers",
    "Revisar perfis detalhados no dashboard administrativo",
    "Considerar processo acelerado para candidatos excepcionais",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportCandidate {
    pub evaluation_id: EvaluationId,
    pub candidate_name: String,
    pub candidate_email: String,
    pub fit_score: u8,
    pub created_at: DateTime<Utc>,
}

impl From<&Evaluation> for ReportCandidate {
    fn from(evaluation: &Evaluation) -> Self {
        Self {
            evaluation_id: evaluation.id,
            candidate_name: evaluation.candidate_name.clone(),
            candidate_email: evaluation.candidate_email.clone(),
            fit_score: evaluation.fit_score,
            created_at: evaluation.created_at,
        }
    }
}

/// Digest e-mail sent to the admin listing recent high scorers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovedCandidatesReport {
    pub to: String,
    pub subject: String,
    pub total_candidates: usize,
    pub average_score: u8,
    pub top_candidate: Option<ReportCandidate>,
    pub candidates: Vec<ReportCandidate>,
    pub next_steps: Vec<&'static str>,
    pub html: String,
}

/// Evaluations at or above the threshold created within the window, best score first.
pub fn select_approved(evaluations: &[Evaluation], now: DateTime<Utc>) -> Vec<&Evaluation> {
    let since = now - Duration::hours(APPROVED_REPORT_WINDOW_HOURS);
    let mut selected: Vec<&Evaluation> = evaluations
        .iter()
        .filter(|evaluation| {
            evaluation.fit_score >= APPROVED_SCORE_THRESHOLD && evaluation.created_at >= since
        })
        .collect();
    selected.sort_by(|a, b| b.fit_score.cmp(&a.fit_score));
    selected
}

/// Builds the digest; `None` when nothing qualifies.
pub fn build_approved_report(
    candidates: &[&Evaluation],
    recipient: &str,
) -> Option<ApprovedCandidatesReport> {
    if candidates.is_empty() {
        return None;
    }

    let total_candidates = candidates.len();
    let score_sum: u32 = candidates
        .iter()
        .map(|evaluation| u32::from(evaluation.fit_score))
        .sum();
    let average_score = (f64::from(score_sum) / total_candidates as f64).round() as u8;
    let rows: Vec<ReportCandidate> = candidates
        .iter()
        .map(|evaluation| ReportCandidate::from(*evaluation))
        .collect();
    let top_candidate = rows.first().cloned();

    let table: String = rows
        .iter()
        .map(|row| {
            format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                escape_html(&row.candidate_name),
                escape_html(&row.candidate_email),
                row.fit_score,
                row.created_at.format("%d/%m/%Y %H:%M")
            )
        })
        .collect();
    let highlight = top_candidate
        .as_ref()
        .map(|top| {
            format!(
                "<h3>Destaque do Período</h3><p>{} ({}) - {}</p>",
                escape_html(&top.candidate_name),
                escape_html(&top.candidate_email),
                top.fit_score
            )
        })
        .unwrap_or_default();
    let steps: String = NEXT_STEPS
        .iter()
        .map(|step| format!("<li>{step}</li>"))
        .collect();

    let html = format!(
        "<div style=\"font-family: Arial, sans-serif; max-width: 800px; margin: 0 auto;\">\
         <h1>LEGAL - Relatório de Candidatos</h1>\
         <p>{total_candidates} candidatos aprovados nas últimas {APPROVED_REPORT_WINDOW_HOURS} horas, \
         score médio {average_score}</p>\
         {highlight}\
         <table><thead><tr><th>Nome</th><th>E-mail</th><th>FitScore</th><th>Data</th></tr></thead>\
         <tbody>{table}</tbody></table>\
         <h3>Próximos Passos Recomendados</h3><ul>{steps}</ul>\
         </div>"
    );

    Some(ApprovedCandidatesReport {
        to: recipient.to_string(),
        subject: format!(
            "Relatório de Candidatos Aprovados - {total_candidates} novos candidatos"
        ),
        total_candidates,
        average_score,
        top_candidate,
        candidates: rows,
        next_steps: NEXT_STEPS.to_vec(),
        html,
    })
}
