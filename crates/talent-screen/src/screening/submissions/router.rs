use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, patch, post},
    Router,
};
use chrono::Utc;
use serde_json::json;

use super::domain::{
    AssessmentRequest, CandidateSubmission, EvaluationRequest, PostingDraft, PostingUpdate,
    StatusRequest, SubmissionRecord, SubmissionView,
};
use super::export::submissions_csv;
use super::repository::{
    NotificationPublisher, PostingRepository, RepositoryError, SubmissionRepository,
};
use super::service::{ScreeningService, ScreeningServiceError};
use crate::screening::domain::SubmissionId;

/// Router builder exposing evaluation, posting and submission endpoints.
pub fn screening_router<P, S, N>(service: Arc<ScreeningService<P, S, N>>) -> Router
where
    P: PostingRepository + 'static,
    S: SubmissionRepository + 'static,
    N: NotificationPublisher + 'static,
{
    Router::new()
        .route(
            "/api/v1/screening/evaluate",
            post(evaluate_handler::<P, S, N>),
        )
        .route("/api/v1/postings", post(create_posting_handler::<P, S, N>))
        .route(
            "/api/v1/postings/:public_id",
            patch(update_posting_handler::<P, S, N>),
        )
        .route(
            "/api/v1/postings/:public_id/submissions",
            post(submit_handler::<P, S, N>).get(ranking_handler::<P, S, N>),
        )
        .route(
            "/api/v1/postings/:public_id/submissions.csv",
            get(export_handler::<P, S, N>),
        )
        .route(
            "/api/v1/submissions/:submission_id",
            get(submission_handler::<P, S, N>).delete(delete_submission_handler::<P, S, N>),
        )
        .route(
            "/api/v1/submissions/:submission_id/assessments",
            post(assessment_handler::<P, S, N>),
        )
        .route(
            "/api/v1/submissions/:submission_id/status",
            post(status_handler::<P, S, N>),
        )
        .route(
            "/api/v1/candidates/:identifier/submissions",
            get(candidate_submissions_handler::<P, S, N>),
        )
        .with_state(service)
}

pub(crate) async fn evaluate_handler<P, S, N>(
    State(service): State<Arc<ScreeningService<P, S, N>>>,
    axum::Json(request): axum::Json<EvaluationRequest>,
) -> Response
where
    P: PostingRepository + 'static,
    S: SubmissionRepository + 'static,
    N: NotificationPublisher + 'static,
{
    let result = service.preview(request);
    (StatusCode::OK, axum::Json(result)).into_response()
}

pub(crate) async fn create_posting_handler<P, S, N>(
    State(service): State<Arc<ScreeningService<P, S, N>>>,
    axum::Json(draft): axum::Json<PostingDraft>,
) -> Response
where
    P: PostingRepository + 'static,
    S: SubmissionRepository + 'static,
    N: NotificationPublisher + 'static,
{
    match service.open_posting(draft, Utc::now()) {
        Ok(posting) => (StatusCode::CREATED, axum::Json(posting)).into_response(),
        Err(error) => failure(error),
    }
}

pub(crate) async fn update_posting_handler<P, S, N>(
    State(service): State<Arc<ScreeningService<P, S, N>>>,
    Path(public_id): Path<String>,
    axum::Json(update): axum::Json<PostingUpdate>,
) -> Response
where
    P: PostingRepository + 'static,
    S: SubmissionRepository + 'static,
    N: NotificationPublisher + 'static,
{
    match service.update_posting(&public_id, update) {
        Ok(posting) => (StatusCode::OK, axum::Json(posting)).into_response(),
        Err(error) => failure(error),
    }
}

pub(crate) async fn submit_handler<P, S, N>(
    State(service): State<Arc<ScreeningService<P, S, N>>>,
    Path(public_id): Path<String>,
    axum::Json(submission): axum::Json<CandidateSubmission>,
) -> Response
where
    P: PostingRepository + 'static,
    S: SubmissionRepository + 'static,
    N: NotificationPublisher + 'static,
{
    match service.submit(&public_id, submission) {
        Ok(record) => (StatusCode::CREATED, axum::Json(record.view())).into_response(),
        Err(error) => failure(error),
    }
}

pub(crate) async fn ranking_handler<P, S, N>(
    State(service): State<Arc<ScreeningService<P, S, N>>>,
    Path(public_id): Path<String>,
) -> Response
where
    P: PostingRepository + 'static,
    S: SubmissionRepository + 'static,
    N: NotificationPublisher + 'static,
{
    match service.ranking(&public_id) {
        Ok(records) => {
            let views: Vec<SubmissionView> = records.iter().map(|record| record.view()).collect();
            (StatusCode::OK, axum::Json(views)).into_response()
        }
        Err(error) => failure(error),
    }
}

pub(crate) async fn export_handler<P, S, N>(
    State(service): State<Arc<ScreeningService<P, S, N>>>,
    Path(public_id): Path<String>,
) -> Response
where
    P: PostingRepository + 'static,
    S: SubmissionRepository + 'static,
    N: NotificationPublisher + 'static,
{
    let records = match service.ranking(&public_id) {
        Ok(records) => records,
        Err(error) => return failure(error),
    };

    match submissions_csv(&records) {
        Ok(body) => {
            let disposition = format!("attachment; filename=\"{public_id}-submissions.csv\"");
            (
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
                    (header::CONTENT_DISPOSITION, disposition),
                ],
                body,
            )
                .into_response()
        }
        Err(error) => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn submission_handler<P, S, N>(
    State(service): State<Arc<ScreeningService<P, S, N>>>,
    Path(submission_id): Path<String>,
) -> Response
where
    P: PostingRepository + 'static,
    S: SubmissionRepository + 'static,
    N: NotificationPublisher + 'static,
{
    match service.get(&SubmissionId(submission_id)) {
        Ok(detail) => (StatusCode::OK, axum::Json(detail)).into_response(),
        Err(error) => failure(error),
    }
}

pub(crate) async fn assessment_handler<P, S, N>(
    State(service): State<Arc<ScreeningService<P, S, N>>>,
    Path(submission_id): Path<String>,
    axum::Json(request): axum::Json<AssessmentRequest>,
) -> Response
where
    P: PostingRepository + 'static,
    S: SubmissionRepository + 'static,
    N: NotificationPublisher + 'static,
{
    match service.record_assessment(&SubmissionId(submission_id), request) {
        Ok(assessment) => (StatusCode::CREATED, axum::Json(assessment)).into_response(),
        Err(error) => failure(error),
    }
}

pub(crate) async fn delete_submission_handler<P, S, N>(
    State(service): State<Arc<ScreeningService<P, S, N>>>,
    Path(submission_id): Path<String>,
) -> Response
where
    P: PostingRepository + 'static,
    S: SubmissionRepository + 'static,
    N: NotificationPublisher + 'static,
{
    match service.delete_submission(&SubmissionId(submission_id)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => failure(error),
    }
}

pub(crate) async fn status_handler<P, S, N>(
    State(service): State<Arc<ScreeningService<P, S, N>>>,
    Path(submission_id): Path<String>,
    axum::Json(request): axum::Json<StatusRequest>,
) -> Response
where
    P: PostingRepository + 'static,
    S: SubmissionRepository + 'static,
    N: NotificationPublisher + 'static,
{
    match service.update_status(&SubmissionId(submission_id), request) {
        Ok(change) => (StatusCode::CREATED, axum::Json(change)).into_response(),
        Err(error) => failure(error),
    }
}

pub(crate) async fn candidate_submissions_handler<P, S, N>(
    State(service): State<Arc<ScreeningService<P, S, N>>>,
    Path(identifier): Path<String>,
) -> Response
where
    P: PostingRepository + 'static,
    S: SubmissionRepository + 'static,
    N: NotificationPublisher + 'static,
{
    match service.find_by_identifier(&identifier) {
        Ok(records) => {
            let views: Vec<SubmissionView> = records.iter().map(SubmissionRecord::view).collect();
            (StatusCode::OK, axum::Json(views)).into_response()
        }
        Err(error) => failure(error),
    }
}

fn failure(error: ScreeningServiceError) -> Response {
    let status = match &error {
        ScreeningServiceError::PostingNotFound(_)
        | ScreeningServiceError::SubmissionNotFound(_)
        | ScreeningServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        ScreeningServiceError::PostingInactive(_)
        | ScreeningServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        ScreeningServiceError::InvalidPosting(_)
        | ScreeningServiceError::InvalidSubmission(_)
        | ScreeningServiceError::InvalidAssessment(_)
        | ScreeningServiceError::InvalidStatus(_) => StatusCode::UNPROCESSABLE_ENTITY,
        ScreeningServiceError::Repository(RepositoryError::Unavailable(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    let payload = json!({ "error": error.to_string() });
    (status, axum::Json(payload)).into_response()
}
