use crate::infra::AppState;
use axum::extract::Path;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Extension;
use axum::Json;
use chrono::Utc;
use serde_json::json;
use talent_screen::error::AppError;
use talent_screen::screening::submissions::screening_router;
use talent_screen::screening::TemplateSummary;

pub(crate) fn with_screening_routes(state: &AppState) -> axum::Router {
    screening_router(state.service.clone())
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route("/api/v1/templates", get(list_templates_endpoint))
        .route("/api/v1/templates/:key", get(show_template_endpoint))
        .route(
            "/api/v1/templates/:key/postings",
            axum::routing::post(clone_template_endpoint),
        )
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

pub(crate) async fn list_templates_endpoint(
    Extension(state): Extension<AppState>,
) -> Json<Vec<TemplateSummary>> {
    Json(state.templates.list())
}

pub(crate) async fn show_template_endpoint(
    Extension(state): Extension<AppState>,
    Path(key): Path<String>,
) -> Response {
    match state.templates.get(&key) {
        Some(template) => (StatusCode::OK, Json(template)).into_response(),
        None => unknown_template(&key),
    }
}

/// Clone a preset questionnaire into a new active posting.
pub(crate) async fn clone_template_endpoint(
    Extension(state): Extension<AppState>,
    Path(key): Path<String>,
) -> Result<Response, AppError> {
    let Some(template) = state.templates.get(&key) else {
        return Ok(unknown_template(&key));
    };

    let posting = state
        .service
        .create_posting(template.instantiate(Utc::now()))?;
    Ok((StatusCode::CREATED, Json(posting)).into_response())
}

fn unknown_template(key: &str) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": format!("template {key} not found") })),
    )
        .into_response()
}
