use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::scoring::{self, FitScore, ScoreError};

/// Opaque identifier assigned by the store when an evaluation is recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EvaluationId(pub Uuid);

impl EvaluationId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EvaluationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EvaluationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for EvaluationId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(Self)
    }
}

/// The three questionnaire dimensions, each answered through three Likert items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Performance,
    Energy,
    Culture,
}

impl Dimension {
    pub const fn ordered() -> [Dimension; 3] {
        [Self::Performance, Self::Energy, Self::Culture]
    }

    /// Label used in candidate e-mails and dashboard insights.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Performance => "Performance",
            Self::Energy => "Energia",
            Self::Culture => "Cultura",
        }
    }
}

/// The 1-5 answers of a completed questionnaire, named as the store names its columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DimensionAnswers {
    pub performance_experience: u8,
    pub performance_deliveries: u8,
    pub performance_skills: u8,
    pub energy_availability: u8,
    pub energy_deadlines: u8,
    pub energy_pressure: u8,
    pub culture_values: u8,
    pub culture_collaboration: u8,
    pub culture_innovation: u8,
}

impl DimensionAnswers {
    /// Same answer for every item. Mostly handy for fixtures and boundary checks.
    pub const fn uniform(value: u8) -> Self {
        Self {
            performance_experience: value,
            performance_deliveries: value,
            performance_skills: value,
            energy_availability: value,
            energy_deadlines: value,
            energy_pressure: value,
            culture_values: value,
            culture_collaboration: value,
            culture_innovation: value,
        }
    }

    /// Builds answers from the questionnaire order: performance, energy, culture.
    pub fn from_slice(values: &[u8]) -> Result<Self, ScoreError> {
        let [pe, pd, ps, ea, ed, ep, cv, cc, ci] = <[u8; 9]>::try_from(values)
            .map_err(|_| ScoreError::AnswerCount {
                expected: Self::FIELDS.len(),
                actual: values.len(),
            })?;
        let answers = Self {
            performance_experience: pe,
            performance_deliveries: pd,
            performance_skills: ps,
            energy_availability: ea,
            energy_deadlines: ed,
            energy_pressure: ep,
            culture_values: cv,
            culture_collaboration: cc,
            culture_innovation: ci,
        };
        answers.validate()?;
        Ok(answers)
    }

    pub const FIELDS: [&'static str; 9] = [
        "performance_experience",
        "performance_deliveries",
        "performance_skills",
        "energy_availability",
        "energy_deadlines",
        "energy_pressure",
        "culture_values",
        "culture_collaboration",
        "culture_innovation",
    ];

    pub fn items(&self) -> [(&'static str, u8); 9] {
        [
            ("performance_experience", self.performance_experience),
            ("performance_deliveries", self.performance_deliveries),
            ("performance_skills", self.performance_skills),
            ("energy_availability", self.energy_availability),
            ("energy_deadlines", self.energy_deadlines),
            ("energy_pressure", self.energy_pressure),
            ("culture_values", self.culture_values),
            ("culture_collaboration", self.culture_collaboration),
            ("culture_innovation", self.culture_innovation),
        ]
    }

    pub fn dimension(&self, dimension: Dimension) -> [u8; 3] {
        match dimension {
            Dimension::Performance => [
                self.performance_experience,
                self.performance_deliveries,
                self.performance_skills,
            ],
            Dimension::Energy => [
                self.energy_availability,
                self.energy_deadlines,
                self.energy_pressure,
            ],
            Dimension::Culture => [
                self.culture_values,
                self.culture_collaboration,
                self.culture_innovation,
            ],
        }
    }

    /// Arithmetic mean of the three items of a dimension.
    pub fn dimension_mean(&self, dimension: Dimension) -> f64 {
        let total: u32 = self.dimension(dimension).iter().map(|v| u32::from(*v)).sum();
        f64::from(total) / 3.0
    }

    pub fn validate(&self) -> Result<(), ScoreError> {
        for (field, value) in self.items() {
            if !scoring::ANSWER_RANGE.contains(&value) {
                return Err(ScoreError::InvalidInput { field, value });
            }
        }
        Ok(())
    }
}

/// Ordinal hiring tier derived from the FitScore.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FitClassification {
    #[serde(rename = "Fit Altíssimo")]
    FitAltissimo,
    #[serde(rename = "Fit Aprovado")]
    FitAprovado,
    #[serde(rename = "Fit Questionável")]
    FitQuestionavel,
    #[serde(rename = "Fora do Perfil")]
    ForaDoPerfil,
}

impl FitClassification {
    pub const fn ordered() -> [FitClassification; 4] {
        [
            Self::FitAltissimo,
            Self::FitAprovado,
            Self::FitQuestionavel,
            Self::ForaDoPerfil,
        ]
    }

    /// Exact label persisted by the store; diacritics included.
    pub const fn label(self) -> &'static str {
        match self {
            Self::FitAltissimo => "Fit Altíssimo",
            Self::FitAprovado => "Fit Aprovado",
            Self::FitQuestionavel => "Fit Questionável",
            Self::ForaDoPerfil => "Fora do Perfil",
        }
    }

    pub const fn is_approved(self) -> bool {
        matches!(self, Self::FitAltissimo | Self::FitAprovado)
    }
}

impl fmt::Display for FitClassification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown fit classification '{0}'")]
pub struct UnknownClassification(pub String);

impl FromStr for FitClassification {
    type Err = UnknownClassification;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ordered()
            .into_iter()
            .find(|classification| classification.label() == trimmed)
            .ok_or_else(|| UnknownClassification(trimmed.to_string()))
    }
}

/// Questionnaire payload as posted by the multi-step form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationSubmission {
    pub candidate_name: String,
    pub candidate_email: String,
    #[serde(flatten)]
    pub answers: DimensionAnswers,
}

/// Reasons a submission is refused before anything is stored.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmissionError {
    #[error("candidate name is required")]
    EmptyName,
    #[error("'{0}' is not a valid e-mail address")]
    InvalidEmail(String),
    #[error(transparent)]
    Score(#[from] ScoreError),
}

/// A scored questionnaire as persisted in the `evaluations` table.
///
/// `fit_score` and `fit_classification` are a cache of [`scoring::compute_fit_score`] over
/// `answers`; new records only come out of [`Evaluation::from_submission`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evaluation {
    pub id: EvaluationId,
    pub created_at: DateTime<Utc>,
    pub candidate_name: String,
    pub candidate_email: String,
    #[serde(flatten)]
    pub answers: DimensionAnswers,
    pub fit_score: u8,
    pub fit_classification: FitClassification,
}

impl Evaluation {
    pub fn from_submission(
        submission: EvaluationSubmission,
        id: EvaluationId,
        created_at: DateTime<Utc>,
    ) -> Result<Self, SubmissionError> {
        let EvaluationSubmission {
            candidate_name,
            candidate_email,
            answers,
        } = submission;

        let candidate_name = candidate_name.trim().to_string();
        if candidate_name.is_empty() {
            return Err(SubmissionError::EmptyName);
        }

        let candidate_email = candidate_email.trim().to_string();
        if !looks_like_email(&candidate_email) {
            return Err(SubmissionError::InvalidEmail(candidate_email));
        }

        let FitScore {
            score,
            classification,
        } = scoring::compute_fit_score(&answers)?;

        Ok(Self {
            id,
            created_at,
            candidate_name,
            candidate_email,
            answers,
            fit_score: score,
            fit_classification: classification,
        })
    }

    pub fn fit(&self) -> FitScore {
        FitScore {
            score: self.fit_score,
            classification: self.fit_classification,
        }
    }

    /// Whether the stored derived fields still match a fresh computation.
    pub fn is_consistent(&self) -> bool {
        scoring::compute_fit_score(&self.answers)
            .map(|fresh| fresh == self.fit())
            .unwrap_or(false)
    }

    /// Case-insensitive match on candidate name or e-mail.
    pub fn matches_search(&self, term: &str) -> bool {
        let needle = term.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        self.candidate_name.to_lowercase().contains(&needle)
            || self.candidate_email.to_lowercase().contains(&needle)
    }
}

fn looks_like_email(value: &str) -> bool {
    match value.split_once('@') {
        Some((local, domain)) => !local.is_empty() && !domain.is_empty() && !value.contains(' '),
        None => false,
    }
}
