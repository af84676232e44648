use std::collections::BTreeMap;

use chrono::{DateTime, Duration, TimeZone, Timelike, Utc};

use super::narrative::{narrate, NarrativeInputs};
use super::views::{AreaScores, ClassificationDistribution, InsightsSnapshot, PeakHour};
use crate::assessment::{Dimension, Evaluation};

pub const AWAITING_DATA: &str = "Aguardando primeiras avaliações para gerar insights";

// Deliberately a different scale from the FitScore's `* 10`.
const AREA_SCALE: f64 = 20.0;

/// Summarises every evaluation relative to `now`, bucketing hours in `zone`.
pub fn aggregate_insights<Tz: TimeZone>(
    evaluations: &[Evaluation],
    now: DateTime<Utc>,
    zone: &Tz,
) -> InsightsSnapshot {
    if evaluations.is_empty() {
        return InsightsSnapshot {
            total_evaluations: 0,
            evaluations_24h: 0,
            evaluations_7d: 0,
            average_score: 0,
            average_score_24h: 0,
            average_score_7d: 0,
            approval_rate: 0,
            area_scores: AreaScores::default(),
            classifications: ClassificationDistribution::default(),
            peak_hour: None,
            trends: Vec::new(),
            recommendations: vec![AWAITING_DATA.to_string()],
            alerts: Vec::new(),
            last_updated: now,
        };
    }

    let last_24h: Vec<&Evaluation> = within(evaluations, now, Duration::hours(24));
    let last_7d: Vec<&Evaluation> = within(evaluations, now, Duration::days(7));

    let average_score = average_fit_score(evaluations.iter());
    let average_score_24h = average_fit_score(last_24h.iter().copied());
    let average_score_7d = average_fit_score(last_7d.iter().copied());

    let area_scores = AreaScores {
        performance: area_average(evaluations, Dimension::Performance),
        energy: area_average(evaluations, Dimension::Energy),
        culture: area_average(evaluations, Dimension::Culture),
    };

    let classifications: ClassificationDistribution = evaluations
        .iter()
        .map(|evaluation| evaluation.fit_classification)
        .collect();
    let approval_percent = percent(classifications.approved(), evaluations.len());
    let approval_rate = approval_percent.round() as u8;
    let peak_hour = peak_hour(evaluations, zone);

    let narrative = narrate(&NarrativeInputs {
        average_score,
        average_score_24h,
        evaluations_24h: last_24h.len(),
        approval_percent,
        area_scores,
        peak_hour,
    });

    InsightsSnapshot {
        total_evaluations: evaluations.len(),
        evaluations_24h: last_24h.len(),
        evaluations_7d: last_7d.len(),
        average_score,
        average_score_24h,
        average_score_7d,
        approval_rate,
        area_scores,
        classifications,
        peak_hour,
        trends: narrative.trends,
        recommendations: narrative.recommendations,
        alerts: narrative.alerts,
        last_updated: now,
    }
}

/// Records with `now - created_at < window`.
pub(crate) fn within(
    evaluations: &[Evaluation],
    now: DateTime<Utc>,
    window: Duration,
) -> Vec<&Evaluation> {
    evaluations
        .iter()
        .filter(|evaluation| now - evaluation.created_at < window)
        .collect()
}

/// Rounded mean FitScore, `0` for an empty input.
pub(crate) fn average_fit_score<'a, I>(evaluations: I) -> u8
where
    I: Iterator<Item = &'a Evaluation>,
{
    rounded_mean(evaluations.map(|evaluation| u32::from(evaluation.fit_score)))
}

fn area_average(evaluations: &[Evaluation], dimension: Dimension) -> u8 {
    rounded_mean(evaluations.iter().map(|evaluation| {
        (evaluation.answers.dimension_mean(dimension) * AREA_SCALE).round() as u32
    }))
}

fn rounded_mean<I: Iterator<Item = u32>>(values: I) -> u8 {
    let (sum, count) = values.fold((0u64, 0u64), |(sum, count), value| {
        (sum + u64::from(value), count + 1)
    });
    if count == 0 {
        return 0;
    }
    (sum as f64 / count as f64).round().clamp(0.0, 255.0) as u8
}

fn percent(part: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    part as f64 / total as f64 * 100.0
}

/// Busiest hour of day. Ties resolve to the earliest hour.
fn peak_hour<Tz: TimeZone>(evaluations: &[Evaluation], zone: &Tz) -> Option<PeakHour> {
    let mut buckets: BTreeMap<u32, usize> = BTreeMap::new();
    for evaluation in evaluations {
        let hour = evaluation.created_at.with_timezone(zone).hour();
        *buckets.entry(hour).or_insert(0) += 1;
    }

    buckets
        .into_iter()
        .fold(None, |best: Option<PeakHour>, (hour, count)| match best {
            Some(current) if current.count >= count => Some(current),
            _ => Some(PeakHour { hour, count }),
        })
}
