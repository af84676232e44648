use serde::Serialize;

use crate::assessment::scoring::display_score;
use crate::assessment::{Dimension, Evaluation, FitClassification};

use super::escape_html;

/// Rendered result e-mail for one candidate. Delivery is simulated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CandidateEmail {
    pub to: String,
    pub subject: String,
    pub title: String,
    pub message: String,
    pub accent_color: &'static str,
    pub breakdown: Vec<DimensionBreakdown>,
    pub html: String,
}

/// 2-10 display figure per dimension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DimensionBreakdown {
    pub dimension: Dimension,
    pub label: &'static str,
    pub score: u8,
}

struct Tone {
    title: &'static str,
    message: String,
    color: &'static str,
}

fn tone(classification: FitClassification, score: u8) -> Tone {
    match classification {
        FitClassification::FitAltissimo => Tone {
            title: "Parabéns! Você obteve um resultado excepcional!",
            message: format!(
                "Com um FitScore de {score}, você demonstrou excelente alinhamento com os valores e requisitos da LEGAL. Nossa equipe entrará em contato em breve para os próximos passos."
            ),
            color: "#10B981",
        },
        FitClassification::FitAprovado => Tone {
            title: "Ótimo resultado! Você foi aprovado na avaliação.",
            message: format!(
                "Seu FitScore de {score} indica um bom alinhamento com nosso perfil. Aguarde contato da nossa equipe para continuidade do processo."
            ),
            color: "#3B82F6",
        },
        FitClassification::FitQuestionavel => Tone {
            title: "Resultado da sua avaliação FitScore",
            message: format!(
                "Seu FitScore foi {score}. Embora algumas áreas precisem de desenvolvimento, há potencial. Nossa equipe pode entrar em contato para feedback detalhado."
            ),
            color: "#F59E0B",
        },
        FitClassification::ForaDoPerfil => Tone {
            title: "Obrigado por participar da avaliação FitScore",
            message: format!(
                "Seu FitScore foi {score}. Infelizmente, neste momento seu perfil não está alinhado com nossas necessidades atuais, mas encorajamos você a se desenvolver e tentar novamente no futuro."
            ),
            color: "#EF4444",
        },
    }
}

pub fn render_candidate_email(evaluation: &Evaluation) -> CandidateEmail {
    let Tone {
        title,
        message,
        color,
    } = tone(evaluation.fit_classification, evaluation.fit_score);

    let breakdown: Vec<DimensionBreakdown> = Dimension::ordered()
        .into_iter()
        .map(|dimension| DimensionBreakdown {
            dimension,
            label: dimension.label(),
            score: display_score(&evaluation.answers, dimension),
        })
        .collect();

    let rows: String = breakdown
        .iter()
        .map(|row| format!("<li>{}: {}/10</li>", row.label, row.score))
        .collect();

    let html = format!(
        "<div style=\"font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;\">\
         <h1>LEGAL</h1>\
         <h2>{title}</h2>\
         <p>Olá {name},</p>\
         <p>{message}</p>\
         <div style=\"color: {color}; font-size: 48px; font-weight: bold;\">{score}</div>\
         <div style=\"color: {color};\">{classification}</div>\
         <h3>Detalhamento da Avaliação</h3>\
         <ul>{rows}</ul>\
         <p>Este é um e-mail automático. Para dúvidas, entre em contato conosco.</p>\
         </div>",
        name = escape_html(&evaluation.candidate_name),
        score = evaluation.fit_score,
        classification = evaluation.fit_classification,
    );

    CandidateEmail {
        to: evaluation.candidate_email.clone(),
        subject: format!(
            "Resultado da sua Avaliação FitScore - {}",
            evaluation.fit_classification
        ),
        title: title.to_string(),
        message,
        accent_color: color,
        breakdown,
        html,
    }
}
