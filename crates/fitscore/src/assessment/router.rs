use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde_json::json;

use super::domain::{EvaluationId, EvaluationSubmission};
use super::repository::{EvaluationFilter, EvaluationRepository, RepositoryError};
use super::service::{AssessmentError, AssessmentService};
use crate::notifications::NotificationLogSink;

/// Router builder exposing questionnaire intake and the dashboard listing.
pub fn assessment_router<R, L>(service: Arc<AssessmentService<R, L>>) -> Router
where
    R: EvaluationRepository + 'static,
    L: NotificationLogSink + 'static,
{
    Router::new()
        .route(
            "/api/v1/evaluations",
            post(submit_handler::<R, L>).get(list_handler::<R, L>),
        )
        .route(
            "/api/v1/evaluations/:evaluation_id",
            get(fetch_handler::<R, L>),
        )
        .route("/api/v1/dashboard/stats", get(stats_handler::<R, L>))
        .with_state(service)
}

pub(crate) async fn submit_handler<R, L>(
    State(service): State<Arc<AssessmentService<R, L>>>,
    axum::Json(submission): axum::Json<EvaluationSubmission>,
) -> Response
where
    R: EvaluationRepository + 'static,
    L: NotificationLogSink + 'static,
{
    match service.submit(submission) {
        Ok(evaluation) => (StatusCode::CREATED, axum::Json(evaluation)).into_response(),
        Err(AssessmentError::Submission(error)) => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        Err(AssessmentError::Repository(RepositoryError::Conflict)) => {
            let payload = json!({ "error": "evaluation already exists" });
            (StatusCode::CONFLICT, axum::Json(payload)).into_response()
        }
        Err(other) => internal_error(other),
    }
}

pub(crate) async fn list_handler<R, L>(
    State(service): State<Arc<AssessmentService<R, L>>>,
    Query(filter): Query<EvaluationFilter>,
) -> Response
where
    R: EvaluationRepository + 'static,
    L: NotificationLogSink + 'static,
{
    match service.list(&filter) {
        Ok(evaluations) => {
            let payload = json!({
                "count": evaluations.len(),
                "evaluations": evaluations,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(other) => internal_error(other),
    }
}

pub(crate) async fn fetch_handler<R, L>(
    State(service): State<Arc<AssessmentService<R, L>>>,
    Path(evaluation_id): Path<String>,
) -> Response
where
    R: EvaluationRepository + 'static,
    L: NotificationLogSink + 'static,
{
    let Ok(id) = evaluation_id.parse::<EvaluationId>() else {
        let payload = json!({ "error": format!("'{evaluation_id}' is not a valid evaluation id") });
        return (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response();
    };

    match service.get(&id) {
        Ok(evaluation) => (StatusCode::OK, axum::Json(evaluation)).into_response(),
        Err(AssessmentError::Repository(RepositoryError::NotFound)) => {
            let payload = json!({ "error": "evaluation not found", "id": id });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(other) => internal_error(other),
    }
}

pub(crate) async fn stats_handler<R, L>(
    State(service): State<Arc<AssessmentService<R, L>>>,
) -> Response
where
    R: EvaluationRepository + 'static,
    L: NotificationLogSink + 'static,
{
    match service.stats() {
        Ok(stats) => (StatusCode::OK, axum::Json(stats)).into_response(),
        Err(other) => internal_error(other),
    }
}

fn internal_error(error: AssessmentError) -> Response {
    let payload = json!({ "error": error.to_string() });
    (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
}
