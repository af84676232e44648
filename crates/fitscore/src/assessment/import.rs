use std::io::Read;
use std::path::Path;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;
use tracing::warn;

use super::domain::{DimensionAnswers, Evaluation, EvaluationId, FitClassification};

#[derive(Debug)]
pub enum EvaluationImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    InvalidRecord { row: usize, reason: String },
}

impl std::fmt::Display for EvaluationImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EvaluationImportError::Io(err) => write!(f, "failed to read evaluations export: {}", err),
            EvaluationImportError::Csv(err) => write!(f, "invalid evaluations CSV data: {}", err),
            EvaluationImportError::InvalidRecord { row, reason } => {
                write!(f, "evaluation on row {} is invalid: {}", row, reason)
            }
        }
    }
}

impl std::error::Error for EvaluationImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EvaluationImportError::Io(err) => Some(err),
            EvaluationImportError::Csv(err) => Some(err),
            EvaluationImportError::InvalidRecord { .. } => None,
        }
    }
}

impl From<std::io::Error> for EvaluationImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for EvaluationImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// Loads a CSV dump of the `evaluations` table.
///
/// Stored scores are kept as exported. Rows whose score no longer matches the answers are
/// reported with a warning.
pub struct EvaluationCsvImporter;

impl EvaluationCsvImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<Evaluation>, EvaluationImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    /// Returns evaluations newest first.
    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<Evaluation>, EvaluationImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut evaluations = Vec::new();

        for (index, record) in csv_reader.deserialize::<EvaluationRow>().enumerate() {
            let row = record?;
            // Header is row 1.
            let evaluation = row.into_evaluation(index + 2)?;
            if !evaluation.is_consistent() {
                warn!(
                    evaluation_id = %evaluation.id,
                    fit_score = evaluation.fit_score,
                    "stored fit score differs from the current formula"
                );
            }
            evaluations.push(evaluation);
        }

        evaluations.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(evaluations)
    }
}

#[derive(Debug, Deserialize)]
struct EvaluationRow {
    id: String,
    created_at: String,
    candidate_name: String,
    candidate_email: String,
    performance_experience: u8,
    performance_deliveries: u8,
    performance_skills: u8,
    energy_availability: u8,
    energy_deadlines: u8,
    energy_pressure: u8,
    culture_values: u8,
    culture_collaboration: u8,
    culture_innovation: u8,
    fit_score: u8,
    fit_classification: String,
}

impl EvaluationRow {
    fn into_evaluation(self, row: usize) -> Result<Evaluation, EvaluationImportError> {
        let invalid = |reason: String| EvaluationImportError::InvalidRecord { row, reason };

        let id = self
            .id
            .parse::<EvaluationId>()
            .map_err(|err| invalid(format!("id '{}': {err}", self.id)))?;
        let created_at = parse_timestamp(&self.created_at)
            .ok_or_else(|| invalid(format!("unrecognised created_at '{}'", self.created_at)))?;
        let fit_classification = self
            .fit_classification
            .parse::<FitClassification>()
            .map_err(|err| invalid(err.to_string()))?;
        if self.fit_score > 100 {
            return Err(invalid(format!("fit_score {} exceeds 100", self.fit_score)));
        }

        let answers = DimensionAnswers {
            performance_experience: self.performance_experience,
            performance_deliveries: self.performance_deliveries,
            performance_skills: self.performance_skills,
            energy_availability: self.energy_availability,
            energy_deadlines: self.energy_deadlines,
            energy_pressure: self.energy_pressure,
            culture_values: self.culture_values,
            culture_collaboration: self.culture_collaboration,
            culture_innovation: self.culture_innovation,
        };
        answers.validate().map_err(|err| invalid(err.to_string()))?;

        Ok(Evaluation {
            id,
            created_at,
            candidate_name: self.candidate_name,
            candidate_email: self.candidate_email,
            answers,
            fit_score: self.fit_score,
            fit_classification,
        })
    }
}

pub(crate) fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&Utc));
    }

    // Postgres text output, e.g. `2025-03-10 14:32:11.123+00`.
    if let Ok(dt) = DateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S%.f%#z") {
        return Some(dt.with_timezone(&Utc));
    }

    NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}
