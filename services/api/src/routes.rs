use crate::infra::AppState;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use chrono::{Local, Utc};
use fitscore::assessment::{
    assessment_router, AssessmentService, EvaluationId, EvaluationRepository,
};
use fitscore::insights::aggregate_insights;
use fitscore::notifications::{NotificationError, NotificationLogSink, NotificationService};
use fitscore::processing::{BackgroundProcessor, ProcessingError};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::error;

/// Handles shared by the analytics, notification, report and processing endpoints.
pub(crate) struct ServiceHandles<R, L> {
    pub(crate) repository: Arc<R>,
    pub(crate) notifications: Arc<NotificationService<R, L>>,
    pub(crate) processor: Arc<BackgroundProcessor<R, L>>,
}

impl<R, L> Clone for ServiceHandles<R, L> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            notifications: Arc::clone(&self.notifications),
            processor: Arc::clone(&self.processor),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct EvaluationReference {
    #[serde(default, rename = "evaluationId")]
    pub(crate) evaluation_id: Option<String>,
}

pub(crate) fn with_service_routes<R, L>(
    assessment: Arc<AssessmentService<R, L>>,
    handles: ServiceHandles<R, L>,
) -> Router
where
    R: EvaluationRepository + 'static,
    L: NotificationLogSink + 'static,
{
    let operations = Router::new()
        .route("/api/v1/analytics/insights", get(insights_endpoint::<R, L>))
        .route(
            "/api/v1/analytics/real-time",
            get(real_time_endpoint::<R, L>).post(batch_endpoint::<R, L>),
        )
        .route(
            "/api/v1/notifications/candidate-result",
            post(candidate_result_endpoint::<R, L>),
        )
        .route(
            "/api/v1/notifications/creative-insights",
            post(creative_insights_endpoint::<R, L>),
        )
        .route(
            "/api/v1/reports/approved-candidates",
            post(approved_candidates_endpoint::<R, L>),
        )
        .route(
            "/api/v1/reports/scheduled",
            post(start_scheduled_report_endpoint::<R, L>)
                .get(scheduled_report_status_endpoint::<R, L>),
        )
        .route(
            "/api/v1/process/async-evaluation",
            post(async_evaluation_endpoint::<R, L>),
        )
        .with_state(handles);

    assessment_router(assessment)
        .merge(operations)
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn insights_endpoint<R, L>(
    State(handles): State<ServiceHandles<R, L>>,
) -> Response
where
    R: EvaluationRepository + 'static,
    L: NotificationLogSink + 'static,
{
    match handles.repository.list() {
        Ok(evaluations) => {
            let now = Utc::now();
            let insights = aggregate_insights(&evaluations, now, &Local);
            let payload = json!({
                "success": true,
                "insights": insights,
                "timestamp": now,
            });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(err) => internal_error(err),
    }
}

pub(crate) async fn real_time_endpoint<R, L>(
    State(handles): State<ServiceHandles<R, L>>,
) -> Response
where
    R: EvaluationRepository + 'static,
    L: NotificationLogSink + 'static,
{
    match handles.processor.start_real_time_analytics() {
        Ok(started) => {
            let payload = json!({
                "success": true,
                "realTimeData": {
                    "totalEvaluations": started.total_evaluations,
                    "lastUpdated": started.last_updated,
                    "processingStatus": "active",
                    "message": "Analytics sendo processados em background",
                },
                "evaluations": started.latest,
            });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(err) => internal_error(err),
    }
}

pub(crate) async fn batch_endpoint<R, L>(State(handles): State<ServiceHandles<R, L>>) -> Response
where
    R: EvaluationRepository + 'static,
    L: NotificationLogSink + 'static,
{
    let started = handles.processor.start_batch_analytics();
    let payload = json!({
        "success": true,
        "message": "Processamento em lote iniciado",
        "startedAt": started.started_at,
    });
    (StatusCode::OK, Json(payload)).into_response()
}

pub(crate) async fn candidate_result_endpoint<R, L>(
    State(handles): State<ServiceHandles<R, L>>,
    Json(reference): Json<EvaluationReference>,
) -> Response
where
    R: EvaluationRepository + 'static,
    L: NotificationLogSink + 'static,
{
    let evaluation_id = match parse_reference(reference) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match handles.notifications.notify_candidate(&evaluation_id) {
        Ok(email) => {
            let payload = json!({
                "success": true,
                "message": "Notification sent successfully",
                "emailPreview": email,
            });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(NotificationError::EvaluationNotFound(_)) => not_found(),
        Err(err) => internal_error(err),
    }
}

pub(crate) async fn creative_insights_endpoint<R, L>(
    State(handles): State<ServiceHandles<R, L>>,
) -> Response
where
    R: EvaluationRepository + 'static,
    L: NotificationLogSink + 'static,
{
    let entry = handles.notifications.creative_insights(Utc::now());
    let payload = json!({ "success": true, "notification": entry });
    (StatusCode::OK, Json(payload)).into_response()
}

pub(crate) async fn approved_candidates_endpoint<R, L>(
    State(handles): State<ServiceHandles<R, L>>,
) -> Response
where
    R: EvaluationRepository + 'static,
    L: NotificationLogSink + 'static,
{
    match handles.notifications.approved_candidates_report(Utc::now()) {
        Ok(outcome) => {
            let mut payload = json!({
                "success": true,
                "message": outcome.message,
                "count": outcome.count,
            });
            if let Some(report) = outcome.report_preview {
                payload["reportPreview"] = json!(report);
            }
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(err) => internal_error(err),
    }
}

pub(crate) async fn start_scheduled_report_endpoint<R, L>(
    State(handles): State<ServiceHandles<R, L>>,
) -> Response
where
    R: EvaluationRepository + 'static,
    L: NotificationLogSink + 'static,
{
    match handles.processor.start_scheduled_report() {
        Ok(started) => {
            let payload = json!({
                "success": true,
                "message": "Processamento assíncrono de relatórios iniciado",
                "evaluationsCount": started.evaluations_count,
                "startedAt": started.started_at,
            });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(err) => internal_error(err),
    }
}

pub(crate) async fn scheduled_report_status_endpoint<R, L>(
    State(handles): State<ServiceHandles<R, L>>,
) -> Response
where
    R: EvaluationRepository + 'static,
    L: NotificationLogSink + 'static,
{
    match handles.processor.scheduled_report_status() {
        Ok(status) => {
            let payload = json!({
                "success": true,
                "processingStatus": status.processing_status,
                "lastProcessed": status.last_processed,
                "totalProcessed": status.total_processed,
                "logs": status.logs,
            });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(err) => internal_error(err),
    }
}

pub(crate) async fn async_evaluation_endpoint<R, L>(
    State(handles): State<ServiceHandles<R, L>>,
    Json(reference): Json<EvaluationReference>,
) -> Response
where
    R: EvaluationRepository + 'static,
    L: NotificationLogSink + 'static,
{
    let evaluation_id = match parse_reference(reference) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match handles.processor.process_evaluation(evaluation_id).await {
        Ok(outcome) => {
            let payload = json!({
                "success": true,
                "message": "Processamento assíncrono concluído",
                "evaluationId": outcome.evaluation_id,
                "processedAt": outcome.processed_at,
            });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(ProcessingError::EvaluationNotFound(_)) => not_found(),
        Err(err) => internal_error(err),
    }
}

fn parse_reference(reference: EvaluationReference) -> Result<EvaluationId, Response> {
    let raw = reference
        .evaluation_id
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| {
            let payload = json!({ "error": "Evaluation ID is required" });
            (StatusCode::BAD_REQUEST, Json(payload)).into_response()
        })?;

    raw.parse::<EvaluationId>().map_err(|_| {
        let payload = json!({ "error": format!("'{raw}' is not a valid evaluation id") });
        (StatusCode::BAD_REQUEST, Json(payload)).into_response()
    })
}

fn not_found() -> Response {
    let payload = json!({ "error": "Evaluation not found" });
    (StatusCode::NOT_FOUND, Json(payload)).into_response()
}

fn internal_error<E: std::fmt::Display>(err: E) -> Response {
    error!(error = %err, "request failed");
    let payload = json!({ "error": "Erro interno do servidor" });
    (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
}
