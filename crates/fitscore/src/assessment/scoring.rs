//! FitScore computation and classification.
//!
//! Each dimension contributes `mean * 10`; the three contributions are averaged and rounded.
//! With answers in `1..=5` the score therefore lands in `10..=50`, while the classification
//! bands are laid out on a 0-100 scale. Stored scores depend on this exact formula.

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use super::domain::{Dimension, DimensionAnswers, FitClassification};

pub const ANSWER_RANGE: RangeInclusive<u8> = 1..=5;

const DIMENSION_SCALE: f64 = 10.0;
const DISPLAY_SCALE: f64 = 2.0;

/// Score and tier produced for one questionnaire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FitScore {
    pub score: u8,
    pub classification: FitClassification,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScoreError {
    #[error("{field} must be between 1 and 5 (got {value})")]
    InvalidInput { field: &'static str, value: u8 },
    #[error("expected {expected} answers, got {actual}")]
    AnswerCount { expected: usize, actual: usize },
}

pub fn compute_fit_score(answers: &DimensionAnswers) -> Result<FitScore, ScoreError> {
    answers.validate()?;

    let total: f64 = Dimension::ordered()
        .into_iter()
        .map(|dimension| answers.dimension_mean(dimension) * DIMENSION_SCALE)
        .sum();
    let score = (total / 3.0).round().clamp(0.0, 100.0) as u8;

    Ok(FitScore {
        score,
        classification: classify(score),
    })
}

pub const fn classify(score: u8) -> FitClassification {
    match score {
        80.. => FitClassification::FitAltissimo,
        60..=79 => FitClassification::FitAprovado,
        40..=59 => FitClassification::FitQuestionavel,
        _ => FitClassification::ForaDoPerfil,
    }
}

/// Per-dimension 2-10 figure shown in the candidate e-mail. Never persisted.
pub fn display_score(answers: &DimensionAnswers, dimension: Dimension) -> u8 {
    (answers.dimension_mean(dimension) * DISPLAY_SCALE).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowest_answers_score_ten() {
        let fit = compute_fit_score(&DimensionAnswers::uniform(1)).expect("valid answers");
        assert_eq!(fit.score, 10);
        assert_eq!(fit.classification, FitClassification::ForaDoPerfil);
    }

    #[test]
    fn highest_answers_cap_at_fifty() {
        let fit = compute_fit_score(&DimensionAnswers::uniform(5)).expect("valid answers");
        assert_eq!(fit.score, 50);
        assert_eq!(fit.classification, FitClassification::FitQuestionavel);
    }

    #[test]
    fn mixed_answers_round_to_nearest() {
        let answers =
            DimensionAnswers::from_slice(&[5, 4, 4, 3, 3, 2, 5, 5, 4]).expect("valid answers");
        // (43.33 + 26.67 + 46.67) / 3 = 38.89
        let fit = compute_fit_score(&answers).expect("valid answers");
        assert_eq!(fit.score, 39);
        assert_eq!(fit.classification, FitClassification::ForaDoPerfil);
    }

    #[test]
    fn classification_band_edges() {
        assert_eq!(classify(100), FitClassification::FitAltissimo);
        assert_eq!(classify(80), FitClassification::FitAltissimo);
        assert_eq!(classify(79), FitClassification::FitAprovado);
        assert_eq!(classify(60), FitClassification::FitAprovado);
        assert_eq!(classify(59), FitClassification::FitQuestionavel);
        assert_eq!(classify(40), FitClassification::FitQuestionavel);
        assert_eq!(classify(39), FitClassification::ForaDoPerfil);
        assert_eq!(classify(0), FitClassification::ForaDoPerfil);
    }

    #[test]
    fn rejects_zero_and_six() {
        let mut answers = DimensionAnswers::uniform(3);
        answers.performance_skills = 0;
        assert_eq!(
            compute_fit_score(&answers),
            Err(ScoreError::InvalidInput {
                field: "performance_skills",
                value: 0
            })
        );

        let mut answers = DimensionAnswers::uniform(3);
        answers.culture_innovation = 6;
        assert!(matches!(
            compute_fit_score(&answers),
            Err(ScoreError::InvalidInput {
                field: "culture_innovation",
                ..
            })
        ));
    }

    #[test]
    fn display_score_uses_ten_point_scale() {
        let answers =
            DimensionAnswers::from_slice(&[5, 5, 5, 1, 2, 2, 3, 4, 4]).expect("valid answers");
        assert_eq!(display_score(&answers, Dimension::Performance), 10);
        assert_eq!(display_score(&answers, Dimension::Energy), 3);
        assert_eq!(display_score(&answers, Dimension::Culture), 7);
    }
}
