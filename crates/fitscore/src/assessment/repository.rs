use serde::{Deserialize, Serialize};

use super::domain::{Evaluation, EvaluationId, FitClassification};

/// Data-access handle for the `evaluations` table.
///
/// Implementations are constructed by the caller and injected into services. There is no
/// update operation: evaluations are written once.
pub trait EvaluationRepository: Send + Sync {
    fn insert(&self, evaluation: Evaluation) -> Result<Evaluation, RepositoryError>;
    fn fetch(&self, id: &EvaluationId) -> Result<Option<Evaluation>, RepositoryError>;
    /// All evaluations, newest first.
    fn list(&self) -> Result<Vec<Evaluation>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Dashboard filter: free-text search plus an optional classification.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct EvaluationFilter {
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default, deserialize_with = "deserialize_classification_filter")]
    pub classification: Option<FitClassification>,
}

impl EvaluationFilter {
    pub fn matches(&self, evaluation: &Evaluation) -> bool {
        let search_ok = self
            .search
            .as_deref()
            .map(|term| evaluation.matches_search(term))
            .unwrap_or(true);
        let classification_ok = self
            .classification
            .map(|wanted| evaluation.fit_classification == wanted)
            .unwrap_or(true);
        search_ok && classification_ok
    }
}

/// `all` and empty strings mean "no classification filter".
fn deserialize_classification_filter<'de, D>(
    deserializer: D,
) -> Result<Option<FitClassification>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") | Some("all") => Ok(None),
        Some(label) => label
            .parse::<FitClassification>()
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

/// Counters shown at the top of the admin dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total: usize,
    pub fit_altissimo: usize,
    pub fit_aprovado: usize,
    pub fit_questionavel: usize,
    pub fora_do_perfil: usize,
}

impl DashboardStats {
    pub fn from_evaluations<'a, I>(evaluations: I) -> Self
    where
        I: IntoIterator<Item = &'a Evaluation>,
    {
        evaluations
            .into_iter()
            .fold(Self::default(), |mut stats, evaluation| {
                stats.total += 1;
                match evaluation.fit_classification {
                    FitClassification::FitAltissimo => stats.fit_altissimo += 1,
                    FitClassification::FitAprovado => stats.fit_aprovado += 1,
                    FitClassification::FitQuestionavel => stats.fit_questionavel += 1,
                    FitClassification::ForaDoPerfil => stats.fora_do_perfil += 1,
                }
                stats
            })
    }
}
