use crate::infra::{
    parse_answers, parse_instant, InMemoryEvaluationRepository, InMemoryNotificationLog,
};
use chrono::{DateTime, Local, Utc};
use clap::Args;
use fitscore::assessment::scoring::display_score;
use fitscore::assessment::{
    compute_fit_score, AssessmentService, Dimension, DimensionAnswers, EvaluationCsvImporter,
    EvaluationSubmission,
};
use fitscore::config::{NotificationConfig, ProcessingConfig};
use fitscore::error::AppError;
use fitscore::insights::{aggregate_insights, InsightsSnapshot};
use fitscore::notifications::{NotificationKind, NotificationService};
use fitscore::processing::BackgroundProcessor;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// Nine comma-separated answers (1-5): performance, energy, then culture items
    #[arg(long, value_parser = parse_answers)]
    pub(crate) answers: DimensionAnswers,
}

#[derive(Args, Debug)]
pub(crate) struct InsightsArgs {
    /// CSV export of the evaluations table
    #[arg(long)]
    pub(crate) csv: PathBuf,
    /// Reference instant for the 24h/7d windows (RFC 3339). Defaults to now.
    #[arg(long, value_parser = parse_instant)]
    pub(crate) now: Option<DateTime<Utc>>,
    /// Print the snapshot as JSON instead of a text summary
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Print the insights snapshot as JSON after the walkthrough
    #[arg(long)]
    pub(crate) json: bool,
}

pub(crate) fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let fit = compute_fit_score(&args.answers)?;
    println!("FitScore: {} ({})", fit.score, fit.classification);
    for dimension in Dimension::ordered() {
        println!(
            "  {}: {}/10",
            dimension.label(),
            display_score(&args.answers, dimension)
        );
    }
    Ok(())
}

pub(crate) fn run_insights(args: InsightsArgs) -> Result<(), AppError> {
    let evaluations = EvaluationCsvImporter::from_path(&args.csv)?;
    let now = args.now.unwrap_or_else(Utc::now);
    let snapshot = aggregate_insights(&evaluations, now, &Local);

    if args.json {
        let json = serde_json::to_string_pretty(&snapshot).map_err(std::io::Error::from)?;
        println!("{}", json);
    } else {
        println!(
            "Insights for {} evaluations from {}",
            evaluations.len(),
            args.csv.display()
        );
        render_insights(&snapshot);
    }
    Ok(())
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let repository = Arc::new(InMemoryEvaluationRepository::default());
    let log = Arc::new(InMemoryNotificationLog::default());
    let notifications = Arc::new(NotificationService::new(
        repository.clone(),
        log.clone(),
        NotificationConfig::default(),
    ));
    let assessment = AssessmentService::new(notifications.clone());
    let processor = BackgroundProcessor::new(notifications.clone(), ProcessingConfig::immediate());

    println!("FitScore demo");
    println!("\nQuestionnaire intake");
    for submission in demo_submissions() {
        let name = submission.candidate_name.clone();
        match assessment.submit(submission) {
            Ok(evaluation) => println!(
                "  {:<16} FitScore {:>3}  {}",
                evaluation.candidate_name, evaluation.fit_score, evaluation.fit_classification
            ),
            Err(err) => println!("  {:<16} rejected: {}", name, err),
        }
    }

    let evaluations = match assessment.list(&Default::default()) {
        Ok(evaluations) => evaluations,
        Err(err) => {
            println!("  Repository unavailable: {}", err);
            return Ok(());
        }
    };

    let snapshot = aggregate_insights(&evaluations, Utc::now(), &Local);
    println!("\nDashboard insights");
    render_insights(&snapshot);

    println!("\nApproved candidates report (last 12h, FitScore >= 80)");
    match notifications.approved_candidates_report(Utc::now()) {
        Ok(outcome) => match outcome.report_preview {
            Some(report) => println!(
                "  {} candidates, average {} -> {}",
                report.total_candidates, report.average_score, report.to
            ),
            None => println!("  {}", outcome.message),
        },
        Err(err) => println!("  Report unavailable: {}", err),
    }

    println!("\nBackground jobs");
    if let Some(first) = evaluations.first() {
        match processor.process_evaluation(first.id).await {
            Ok(outcome) => println!("  Async evaluation processed for {}", outcome.evaluation_id),
            Err(err) => println!("  Async evaluation failed: {}", err),
        }
    }
    match processor.start_scheduled_report() {
        Ok(started) => match started.job.await {
            Ok(Ok(summary)) => println!(
                "  Scheduled report: {} evaluations, average {}",
                summary.total_evaluations, summary.average_score
            ),
            Ok(Err(err)) => println!("  Scheduled report failed: {}", err),
            Err(err) => println!("  Scheduled report aborted: {}", err),
        },
        Err(err) => println!("  Scheduled report unavailable: {}", err),
    }
    match processor.start_batch_analytics().job.await {
        Ok(Ok(summary)) => {
            println!("  Batch analytics over {} evaluations", summary.total_evaluations);
            for (classification, count) in summary.classifications.iter() {
                println!("    {:<18} {}", classification.label(), count);
            }
        }
        Ok(Err(err)) => println!("  Batch analytics failed: {}", err),
        Err(err) => println!("  Batch analytics aborted: {}", err),
    }

    println!("\nNotification log");
    for kind in [
        NotificationKind::CandidateResult,
        NotificationKind::AsyncProcessing,
        NotificationKind::ScheduledReport,
        NotificationKind::BatchAnalytics,
    ] {
        let count = log
            .entries()
            .iter()
            .filter(|entry| entry.notification_type == kind)
            .count();
        println!("  {:<28} {}", kind.label(), count);
    }

    if args.json {
        match serde_json::to_string_pretty(&snapshot) {
            Ok(json) => println!("\nInsights payload:\n{}", json),
            Err(err) => println!("\nInsights payload unavailable: {}", err),
        }
    }

    Ok(())
}

fn render_insights(snapshot: &InsightsSnapshot) {
    println!(
        "  Total: {} (24h: {}, 7d: {})",
        snapshot.total_evaluations, snapshot.evaluations_24h, snapshot.evaluations_7d
    );
    println!(
        "  Average FitScore: {} (24h: {}, 7d: {})",
        snapshot.average_score, snapshot.average_score_24h, snapshot.average_score_7d
    );
    println!("  Approval rate: {}%", snapshot.approval_rate);
    println!(
        "  Areas: Performance {} / Energia {} / Cultura {}",
        snapshot.area_scores.performance, snapshot.area_scores.energy, snapshot.area_scores.culture
    );

    for (heading, lines) in [
        ("Trends", &snapshot.trends),
        ("Recommendations", &snapshot.recommendations),
        ("Alerts", &snapshot.alerts),
    ] {
        if lines.is_empty() {
            continue;
        }
        println!("  {}", heading);
        for line in lines {
            println!("  - {}", line);
        }
    }
}

fn demo_submissions() -> Vec<EvaluationSubmission> {
    let profiles: [(&str, [u8; 9]); 5] = [
        ("Ana Souza", [5, 5, 5, 4, 5, 4, 5, 5, 5]),
        ("Bruno Lima", [4, 4, 5, 3, 3, 3, 2, 3, 2]),
        ("Carla Mendes", [3, 3, 3, 3, 3, 3, 3, 3, 3]),
        ("Diego Alves", [2, 2, 1, 2, 1, 2, 1, 2, 2]),
        ("Elisa Rocha", [5, 5, 5, 2, 1, 2, 4, 4, 4]),
    ];

    profiles
        .into_iter()
        .filter_map(|(name, answers)| {
            DimensionAnswers::from_slice(&answers)
                .ok()
                .map(|answers| EvaluationSubmission {
                    candidate_name: name.to_string(),
                    candidate_email: format!(
                        "{}@example.com",
                        name.to_lowercase().replace(' ', ".")
                    ),
                    answers,
                })
        })
        .collect()
}
