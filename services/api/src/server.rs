use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryEvaluationRepository, InMemoryNotificationLog};
use crate::routes::{with_service_routes, ServiceHandles};
use axum::{Extension, Router};
use axum_prometheus::PrometheusMetricLayer;
use fitscore::assessment::{AssessmentService, EvaluationCsvImporter, EvaluationRepository};
use fitscore::config::{AppConfig, NotificationConfig, ProcessingConfig};
use fitscore::error::AppError;
use fitscore::notifications::{NotificationLogSink, NotificationService};
use fitscore::processing::BackgroundProcessor;
use fitscore::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let repository = match args.seed_csv.take() {
        Some(path) => {
            let evaluations = EvaluationCsvImporter::from_path(&path)?;
            info!(
                evaluations = evaluations.len(),
                path = %path.display(),
                "seeded evaluation store from export"
            );
            InMemoryEvaluationRepository::with_evaluations(evaluations)
        }
        None => InMemoryEvaluationRepository::default(),
    };

    let app = build_router(
        Arc::new(repository),
        Arc::new(InMemoryNotificationLog::default()),
        config.notifications.clone(),
        config.processing,
    )
    .layer(Extension(app_state))
    .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "fitscore service ready");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Wires the services over the given stores. Probe routes expect an `AppState` extension.
pub(crate) fn build_router<R, L>(
    repository: Arc<R>,
    log: Arc<L>,
    notifications: NotificationConfig,
    processing: ProcessingConfig,
) -> Router
where
    R: EvaluationRepository + 'static,
    L: NotificationLogSink + 'static,
{
    let notification_service = Arc::new(NotificationService::new(
        repository.clone(),
        log,
        notifications,
    ));
    let assessment = Arc::new(AssessmentService::new(notification_service.clone()));
    let processor = Arc::new(BackgroundProcessor::new(
        notification_service.clone(),
        processing,
    ));

    with_service_routes(
        assessment,
        ServiceHandles {
            repository,
            notifications: notification_service,
            processor,
        },
    )
}
