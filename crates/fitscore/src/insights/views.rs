use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::assessment::{Dimension, FitClassification};

/// Per-dimension averages on the aggregator's 20-100 scale.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AreaScores {
    pub performance: u8,
    pub energy: u8,
    pub culture: u8,
}

impl AreaScores {
    pub fn get(&self, dimension: Dimension) -> u8 {
        match dimension {
            Dimension::Performance => self.performance,
            Dimension::Energy => self.energy,
            Dimension::Culture => self.culture,
        }
    }

    /// Performance wins ties, then Energy.
    pub fn strongest(&self) -> Dimension {
        if self.performance >= self.energy && self.performance >= self.culture {
            Dimension::Performance
        } else if self.energy >= self.culture {
            Dimension::Energy
        } else {
            Dimension::Culture
        }
    }

    /// Performance wins ties, then Energy.
    pub fn weakest(&self) -> Dimension {
        if self.performance <= self.energy && self.performance <= self.culture {
            Dimension::Performance
        } else if self.energy <= self.culture {
            Dimension::Energy
        } else {
            Dimension::Culture
        }
    }
}

/// Label → count. Labels never seen have no entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ClassificationDistribution(BTreeMap<FitClassification, usize>);

impl ClassificationDistribution {
    pub fn record(&mut self, classification: FitClassification) {
        *self.0.entry(classification).or_insert(0) += 1;
    }

    pub fn count(&self, classification: FitClassification) -> usize {
        self.0.get(&classification).copied().unwrap_or(0)
    }

    pub fn contains(&self, classification: FitClassification) -> bool {
        self.0.contains_key(&classification)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Tier order, best first.
    pub fn iter(&self) -> impl Iterator<Item = (FitClassification, usize)> + '_ {
        self.0
            .iter()
            .map(|(classification, count)| (*classification, *count))
    }

    pub fn approved(&self) -> usize {
        self.0
            .iter()
            .filter(|(classification, _)| classification.is_approved())
            .map(|(_, count)| count)
            .sum()
    }
}

impl FromIterator<FitClassification> for ClassificationDistribution {
    fn from_iter<I: IntoIterator<Item = FitClassification>>(iter: I) -> Self {
        let mut distribution = Self::default();
        for classification in iter {
            distribution.record(classification);
        }
        distribution
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PeakHour {
    pub hour: u32,
    pub count: usize,
}

/// Point-in-time aggregation over every stored evaluation. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightsSnapshot {
    pub total_evaluations: usize,
    pub evaluations_24h: usize,
    pub evaluations_7d: usize,
    pub average_score: u8,
    pub average_score_24h: u8,
    pub average_score_7d: u8,
    pub approval_rate: u8,
    pub area_scores: AreaScores,
    pub classifications: ClassificationDistribution,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub peak_hour: Option<PeakHour>,
    pub trends: Vec<String>,
    pub recommendations: Vec<String>,
    pub alerts: Vec<String>,
    pub last_updated: DateTime<Utc>,
}
