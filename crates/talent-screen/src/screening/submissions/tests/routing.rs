use std::sync::Arc;

use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{header, Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use super::common::*;
use crate::screening::submissions::domain::AssessmentRequest;
use crate::screening::submissions::router::assessment_handler;
use crate::screening::submissions::ScreeningService;

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap()
}

fn get_request(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn evaluate_route_scores_legacy_payloads() {
    let (service, _, _) = build_service();
    let router = router_with_service(service);

    let body = json!({
        "questions": [
            {"id": "q1", "texto": "¿Vives en la ciudad?", "tipo": "si_no", "peso": 50,
             "knockout": true, "reglas": {"ideal": "si"}},
            {"id": "q2", "texto": "¿Vehículo propio?", "tipo": "si_no", "peso": 30,
             "reglas": {"ideal": "si"}},
            {"id": "q3", "texto": "Atención al cliente", "tipo": "escala_1_5", "peso": 20}
        ],
        "answers": [
            {"question_id": "q1", "value": "Sí"},
            {"question_id": "q2", "value": "no"},
            {"question_id": "q3", "value": 4}
        ]
    });

    let response = router
        .oneshot(json_request("POST", "/api/v1/screening/evaluate", body))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["score"], 66.0);
    assert_eq!(payload["verdict"], "REVIEW");
    assert_eq!(payload["recommendation"], "manual_validation_interview");
    assert_eq!(payload["category_breakdown"]["Fit"], 66);
}

#[tokio::test]
async fn submit_route_returns_created_view() {
    let (service, _, _) = build_service();
    let router = router_with_service(service);

    let body = serde_json::to_value(candidate("Ana", "yes", "no", "4")).unwrap();
    let response = router
        .oneshot(json_request(
            "POST",
            &format!("/api/v1/postings/{PUBLIC_ID}/submissions"),
            body,
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::CREATED);
    let payload = read_json_body(response).await;
    assert_eq!(payload["verdict"], "REVIEW");
    assert_eq!(payload["candidate_name"], "Ana");
    assert!(payload.get("submission_id").is_some());
    assert!(payload.get("disqualification_reason").is_none());
}

#[tokio::test]
async fn submit_route_maps_posting_errors() {
    let (service, _, _) = build_service();
    let router = router_with_service(service);
    let body = serde_json::to_value(candidate("Ana", "yes", "yes", "5")).unwrap();

    let response = router
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/postings/JOB-NOPE-1/submissions",
            body.clone(),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = router
        .oneshot(json_request(
            "POST",
            "/api/v1/postings/JOB-DRI-CLOSED/submissions",
            body,
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let payload = read_json_body(response).await;
    assert!(payload["error"]
        .as_str()
        .unwrap_or_default()
        .contains("not accepting"));
}

#[tokio::test]
async fn submit_route_returns_internal_error_on_repository_failure() {
    let service = ScreeningService::new(
        Arc::new(MemoryPostings::default()),
        Arc::new(UnavailableSubmissions),
        Arc::new(MemoryNotifications::default()),
    );
    service.create_posting(posting()).expect("posting stored");
    let router = crate::screening::submissions::screening_router(Arc::new(service));

    let body = serde_json::to_value(candidate("Ana", "yes", "yes", "5")).unwrap();
    let response = router
        .oneshot(json_request(
            "POST",
            &format!("/api/v1/postings/{PUBLIC_ID}/submissions"),
            body,
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn ranking_route_lists_best_candidates_first() {
    let (service, _, _) = build_service();
    service
        .submit(PUBLIC_ID, candidate("Low", "yes", "no", "1"))
        .expect("accepted");
    service
        .submit(PUBLIC_ID, candidate("Top", "yes", "yes", "5"))
        .expect("accepted");
    let router = router_with_service(service);

    let response = router
        .oneshot(get_request(&format!("/api/v1/postings/{PUBLIC_ID}/submissions")))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    let names: Vec<&str> = payload
        .as_array()
        .expect("array payload")
        .iter()
        .filter_map(|row| row["candidate_name"].as_str())
        .collect();
    assert_eq!(names, vec!["Top", "Low"]);
}

#[tokio::test]
async fn export_route_serves_csv() {
    let (service, _, _) = build_service();
    service
        .submit(PUBLIC_ID, candidate("Eva", "no", "yes", "5"))
        .expect("accepted");
    let router = router_with_service(service);

    let response = router
        .oneshot(get_request(&format!(
            "/api/v1/postings/{PUBLIC_ID}/submissions.csv"
        )))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok()),
        Some("text/csv; charset=utf-8")
    );
    let body = String::from_utf8(read_body(response).await).expect("utf-8 body");
    let mut lines = body.lines();
    assert!(lines
        .next()
        .unwrap_or_default()
        .starts_with("submission_id,candidate_name"));
    let row = lines.next().expect("one data row");
    assert!(row.contains("Eva"));
    assert!(row.contains("DISQUALIFIED_KO"));
    assert!(row.contains("Do you live in the city?"));
}

#[tokio::test]
async fn submission_route_returns_record_with_assessments() {
    let (service, _, _) = build_service();
    let record = service
        .submit(PUBLIC_ID, candidate("Ana", "yes", "no", "4"))
        .expect("accepted");
    let router = router_with_service(service);

    let response = router
        .clone()
        .oneshot(json_request(
            "POST",
            &format!("/api/v1/submissions/{}/assessments", record.id.0),
            json!({"interviewer": "Marta", "score": 74, "notes": "Solid"}),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = router
        .oneshot(get_request(&format!("/api/v1/submissions/{}", record.id.0)))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["result"]["score"], 66.0);
    assert_eq!(payload["assessments"][0]["score"], 74);
    assert_eq!(payload["candidate"]["name"], "Ana");
}

#[tokio::test]
async fn unknown_submission_is_not_found() {
    let (service, _, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(get_request("/api/v1/submissions/sub-missing"))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn assessment_handler_rejects_out_of_range_scores() {
    let (service, _, _) = build_service();
    let record = service
        .submit(PUBLIC_ID, candidate("Ana", "yes", "no", "4"))
        .expect("accepted");

    let response = assessment_handler::<MemoryPostings, MemorySubmissions, MemoryNotifications>(
        State(Arc::new(service)),
        Path(record.id.0.clone()),
        axum::Json(AssessmentRequest {
            interviewer: "Marta".to_string(),
            score: 140,
            notes: String::new(),
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn create_posting_route_opens_posting() {
    let (service, _, _) = build_service();
    let router = router_with_service(service);

    let body = json!({
        "title": "Field Technician",
        "questions": [
            {"id": "q1", "text": "Driving license?", "type": "yes_no", "weight": 20,
             "knockout": true, "rule": {"ideal": "yes"}}
        ],
        "critical_skills": ["General"]
    });
    let response = router
        .oneshot(json_request("POST", "/api/v1/postings", body))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::CREATED);
    let payload = read_json_body(response).await;
    assert!(payload["public_id"]
        .as_str()
        .unwrap_or_default()
        .starts_with("JOB-FIE-"));
    assert_eq!(payload["active"], true);
}

#[tokio::test]
async fn patch_posting_route_closes_the_posting() {
    let (service, _, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .clone()
        .oneshot(json_request(
            "PATCH",
            &format!("/api/v1/postings/{PUBLIC_ID}"),
            json!({"activa": false}),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["active"], false);
    assert_eq!(payload["title"], "Delivery Driver");

    let body = serde_json::to_value(candidate("Ana", "yes", "yes", "5")).unwrap();
    let response = router
        .oneshot(json_request(
            "POST",
            &format!("/api/v1/postings/{PUBLIC_ID}/submissions"),
            body,
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn patch_posting_route_maps_errors() {
    let (service, _, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .clone()
        .oneshot(json_request(
            "PATCH",
            "/api/v1/postings/JOB-NOPE-1",
            json!({"title": "Courier"}),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = router
        .oneshot(json_request(
            "PATCH",
            &format!("/api/v1/postings/{PUBLIC_ID}"),
            json!({"cargo": " "}),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn status_route_records_pipeline_moves() {
    let (service, _, _) = build_service();
    let record = service
        .submit(PUBLIC_ID, candidate("Ana", "yes", "no", "4"))
        .expect("accepted");
    let router = router_with_service(service);

    let response = router
        .clone()
        .oneshot(json_request(
            "POST",
            &format!("/api/v1/submissions/{}/status", record.id.0),
            json!({"estado": "entrevista"}),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = router
        .clone()
        .oneshot(json_request(
            "POST",
            &format!("/api/v1/submissions/{}/status", record.id.0),
            json!({"status": ""}),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let response = router
        .oneshot(get_request(&format!("/api/v1/submissions/{}", record.id.0)))
        .await
        .expect("route executes");
    let payload = read_json_body(response).await;
    assert_eq!(payload["status"], "entrevista");
    assert_eq!(payload["status_history"].as_array().map(Vec::len), Some(1));
    assert_eq!(payload["result"]["score"], 66.0);
}

#[tokio::test]
async fn candidate_route_lists_submissions_by_identifier() {
    let (service, _, _) = build_service();
    service
        .submit(PUBLIC_ID, candidate("Ana", "yes", "no", "4"))
        .expect("accepted");
    service
        .submit(PUBLIC_ID, candidate("Luis", "yes", "yes", "5"))
        .expect("accepted");
    let router = router_with_service(service);

    let response = router
        .oneshot(get_request("/api/v1/candidates/ana-id/submissions"))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    let rows = payload.as_array().expect("array payload");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["candidate_name"], "Ana");
}

#[tokio::test]
async fn delete_route_removes_the_submission() {
    let (service, _, _) = build_service();
    let record = service
        .submit(PUBLIC_ID, candidate("Ana", "yes", "no", "4"))
        .expect("accepted");
    let router = router_with_service(service);
    let uri = format!("/api/v1/submissions/{}", record.id.0);

    let response = router
        .clone()
        .oneshot(Request::delete(uri.as_str()).body(Body::empty()).unwrap())
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = router
        .clone()
        .oneshot(get_request(&uri))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = router
        .oneshot(Request::delete(uri.as_str()).body(Body::empty()).unwrap())
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
