//! Threshold-gated narrative strings layered on top of the aggregated statistics.

use super::views::{AreaScores, PeakHour};

pub const DECLINE_ALERT: &str = "Investigar possível problema na atração de candidatos qualificados";
pub const LOW_APPROVAL_ALERT: &str = "Taxa de aprovação abaixo de 30% - ação necessária";
pub const RAISE_THE_BAR: &str =
    "Excelente taxa de aprovação! Considere aumentar os critérios para maior seletividade";
pub const LOW_APPROVAL: &str =
    "Taxa de aprovação baixa. Revisar critérios ou melhorar atração de candidatos";
pub const CULTURE_FOCUS: &str =
    "Focar em comunicação dos valores da LEGAL durante atração de candidatos";
pub const LOW_ENERGY_MISMATCH: &str =
    "Candidatos tecnicamente qualificados mas com baixa energia - revisar processo de seleção";

const DECLINE_MARGIN: u8 = 5;
const HIGH_VOLUME_24H: usize = 5;
const HIGH_APPROVAL_PERCENT: f64 = 70.0;
const LOW_APPROVAL_PERCENT: f64 = 30.0;
const AREA_LOW: u8 = 60;
const AREA_HIGH: u8 = 80;

#[derive(Debug, Clone, Copy)]
pub(crate) struct NarrativeInputs {
    pub average_score: u8,
    pub average_score_24h: u8,
    pub evaluations_24h: usize,
    /// Unrounded, so `70.4` still counts as above 70.
    pub approval_percent: f64,
    pub area_scores: AreaScores,
    pub peak_hour: Option<PeakHour>,
}

#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct Narrative {
    pub trends: Vec<String>,
    pub recommendations: Vec<String>,
    pub alerts: Vec<String>,
}

pub(crate) fn narrate(inputs: &NarrativeInputs) -> Narrative {
    let mut narrative = Narrative::default();
    let NarrativeInputs {
        average_score,
        average_score_24h,
        ..
    } = *inputs;

    if average_score_24h > average_score {
        narrative.trends.push(format!(
            "📈 Melhoria na qualidade: Score médio subiu {} pontos nas últimas 24h",
            average_score_24h - average_score
        ));
    } else if u16::from(average_score_24h) + u16::from(DECLINE_MARGIN) < u16::from(average_score)
    {
        narrative.trends.push(format!(
            "📉 Queda na qualidade: Score médio caiu {} pontos nas últimas 24h",
            average_score - average_score_24h
        ));
        narrative.alerts.push(DECLINE_ALERT.to_string());
    }

    if inputs.evaluations_24h > HIGH_VOLUME_24H {
        narrative.trends.push(format!(
            "🚀 Alto volume: {} avaliações nas últimas 24h",
            inputs.evaluations_24h
        ));
    }

    let areas = inputs.area_scores;
    let strongest = areas.strongest();
    let weakest = areas.weakest();
    narrative.trends.push(format!(
        "💪 Área mais forte: {} ({}/100)",
        strongest.label(),
        areas.get(strongest)
    ));
    narrative.trends.push(format!(
        "🎯 Área para desenvolvimento: {} ({}/100)",
        weakest.label(),
        areas.get(weakest)
    ));

    if inputs.approval_percent > HIGH_APPROVAL_PERCENT {
        narrative.recommendations.push(RAISE_THE_BAR.to_string());
    } else if inputs.approval_percent < LOW_APPROVAL_PERCENT {
        narrative.recommendations.push(LOW_APPROVAL.to_string());
        narrative.alerts.push(LOW_APPROVAL_ALERT.to_string());
    }

    if areas.culture < AREA_LOW {
        narrative.recommendations.push(CULTURE_FOCUS.to_string());
    }

    if areas.performance > AREA_HIGH && areas.energy < AREA_LOW {
        narrative.recommendations.push(LOW_ENERGY_MISMATCH.to_string());
    }

    if let Some(peak) = inputs.peak_hour {
        narrative.trends.push(format!(
            "⏰ Horário de pico: {}h com {} avaliações",
            peak.hour, peak.count
        ));
    }

    narrative
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs() -> NarrativeInputs {
        NarrativeInputs {
            average_score: 50,
            average_score_24h: 50,
            evaluations_24h: 1,
            approval_percent: 50.0,
            area_scores: AreaScores {
                performance: 70,
                energy: 70,
                culture: 70,
            },
            peak_hour: None,
        }
    }

    #[test]
    fn steady_state_only_reports_areas() {
        let narrative = narrate(&inputs());

        assert_eq!(narrative.trends.len(), 2);
        assert!(narrative.trends[0].contains("Área mais forte: Performance (70/100)"));
        assert!(narrative.trends[1].contains("Área para desenvolvimento: Performance (70/100)"));
        assert!(narrative.recommendations.is_empty());
        assert!(narrative.alerts.is_empty());
    }

    #[test]
    fn improvement_reports_the_gain() {
        let narrative = narrate(&NarrativeInputs {
            average_score_24h: 58,
            ..inputs()
        });

        assert!(narrative.trends[0].contains("subiu 8 pontos"));
        assert!(narrative.alerts.is_empty());
    }

    #[test]
    fn decline_needs_more_than_five_points() {
        let within_margin = narrate(&NarrativeInputs {
            average_score_24h: 45,
            ..inputs()
        });
        assert!(within_margin.alerts.is_empty());

        let decline = narrate(&NarrativeInputs {
            average_score_24h: 44,
            ..inputs()
        });
        assert!(decline.trends[0].contains("caiu 6 pontos"));
        assert_eq!(decline.alerts, vec![DECLINE_ALERT.to_string()]);
    }

    #[test]
    fn empty_recent_window_counts_as_decline() {
        let narrative = narrate(&NarrativeInputs {
            average_score_24h: 0,
            evaluations_24h: 0,
            ..inputs()
        });
        assert!(narrative.alerts.contains(&DECLINE_ALERT.to_string()));
    }

    #[test]
    fn high_volume_is_strictly_more_than_five() {
        let five = narrate(&NarrativeInputs {
            evaluations_24h: 5,
            ..inputs()
        });
        assert!(!five.trends.iter().any(|trend| trend.contains("Alto volume")));

        let six = narrate(&NarrativeInputs {
            evaluations_24h: 6,
            ..inputs()
        });
        assert!(six
            .trends
            .iter()
            .any(|trend| trend.contains("Alto volume: 6 avaliações")));
    }

    #[test]
    fn approval_thresholds() {
        let exactly_seventy = narrate(&NarrativeInputs {
            approval_percent: 70.0,
            ..inputs()
        });
        assert!(exactly_seventy.recommendations.is_empty());

        let high = narrate(&NarrativeInputs {
            approval_percent: 80.0,
            ..inputs()
        });
        assert_eq!(high.recommendations, vec![RAISE_THE_BAR.to_string()]);

        let low = narrate(&NarrativeInputs {
            approval_percent: 20.0,
            ..inputs()
        });
        assert_eq!(low.recommendations, vec![LOW_APPROVAL.to_string()]);
        assert_eq!(low.alerts, vec![LOW_APPROVAL_ALERT.to_string()]);
    }

    #[test]
    fn area_recommendations() {
        let narrative = narrate(&NarrativeInputs {
            area_scores: AreaScores {
                performance: 85,
                energy: 55,
                culture: 40,
            },
            ..inputs()
        });

        assert_eq!(
            narrative.recommendations,
            vec![CULTURE_FOCUS.to_string(), LOW_ENERGY_MISMATCH.to_string()]
        );
        assert!(narrative.trends[0].contains("Performance (85/100)"));
        assert!(narrative.trends[1].contains("Cultura (40/100)"));
    }

    #[test]
    fn peak_hour_is_the_last_trend() {
        let narrative = narrate(&NarrativeInputs {
            peak_hour: Some(PeakHour { hour: 14, count: 3 }),
            ..inputs()
        });
        assert_eq!(
            narrative.trends.last().map(String::as_str),
            Some("⏰ Horário de pico: 14h com 3 avaliações")
        );
    }
}
