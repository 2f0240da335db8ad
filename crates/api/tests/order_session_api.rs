//! Integration tests for the order wizard session endpoints.

mod common;

use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;
use common::{
    body_bytes, body_json, complete_answers, create_session, get, post_empty, post_json,
    put_json, session_on_review, RecordingSubmitter,
};
use serde_json::json;

fn url(id: &str, tail: &str) -> String {
    format!("/api/v1/order-sessions/{id}{tail}")
}

// ---------------------------------------------------------------------------
// Lifecycle
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_session_starts_on_first_step() {
    let app = common::build_test_app();
    let response = post_empty(app, "/api/v1/order-sessions").await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    let data = &json["data"];
    assert!(data["id"].is_string());
    assert_eq!(data["current_step"], "details");
    assert_eq!(data["step_index"], 0);
    assert_eq!(data["total_steps"], 9);
    assert_eq!(data["can_advance"], false);
    assert_eq!(data["submission"]["state"], "idle");
    assert_eq!(data["steps"].as_array().unwrap().len(), 9);
}

#[tokio::test]
async fn unknown_session_returns_404() {
    let app = common::build_test_app();
    let response = get(app, &url("00000000-0000-0000-0000-000000000000", "")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["code"], "NOT_FOUND");
}

#[tokio::test]
async fn malformed_session_id_is_rejected() {
    let app = common::build_test_app();
    let response = get(app, &url("not-a-uuid", "")).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Navigation
// ---------------------------------------------------------------------------

#[tokio::test]
async fn advance_requires_current_step_to_be_valid() {
    let app = common::build_test_app();
    let id = create_session(&app).await;

    let response = post_empty(app.clone(), &url(&id, "/advance")).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["error"], "Please tell us your name");

    let answers = json!({ "name": "Ana", "occasion": "birthday" });
    let response = put_json(app.clone(), &url(&id, "/answers"), answers).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = post_empty(app, &url(&id, "/advance")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["current_step"], "delivery_formats");
    assert_eq!(json["data"]["max_step_reached"], "delivery_formats");
}

#[tokio::test]
async fn back_and_go_to_respect_reached_steps() {
    let app = common::build_test_app();
    let id = create_session(&app).await;
    let answers = serde_json::to_value(complete_answers()).unwrap();
    put_json(app.clone(), &url(&id, "/answers"), answers).await;
    for _ in 0..3 {
        post_empty(app.clone(), &url(&id, "/advance")).await;
    }

    let json = body_json(post_empty(app.clone(), &url(&id, "/go-back")).await).await;
    assert_eq!(json["data"]["step_index"], 2);

    let response = post_json(app.clone(), &url(&id, "/go-to"), json!({ "step": 3 })).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = post_json(app.clone(), &url(&id, "/go-to"), json!({ "step": 6 })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = post_json(app, &url(&id, "/go-to"), json!({ "step": 42 })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn go_back_from_first_step_is_rejected() {
    let app = common::build_test_app();
    let id = create_session(&app).await;
    let response = post_empty(app, &url(&id, "/go-back")).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn reset_clears_answers() {
    let app = common::build_test_app();
    let id = session_on_review(&app).await;

    let json = body_json(post_empty(app, &url(&id, "/reset")).await).await;
    assert_eq!(json["data"]["current_step"], "details");
    assert_eq!(json["data"]["answers"]["name"], "");
    assert_eq!(json["data"]["answers"]["deadline"], serde_json::Value::Null);
}

// ---------------------------------------------------------------------------
// Quote, review and document
// ---------------------------------------------------------------------------

#[tokio::test]
async fn quote_reflects_session_answers() {
    let app = common::build_test_app();
    let id = session_on_review(&app).await;

    let json = body_json(get(app, &url(&id, "/quote")).await).await;
    assert_eq!(json["data"]["total"], 150);
    assert_eq!(json["data"]["price_display"], "$150");
    assert_eq!(json["data"]["deadline_window"], "regular");
}

#[tokio::test]
async fn review_lists_sections_and_submit_flag() {
    let app = common::build_test_app();
    let id = session_on_review(&app).await;

    let json = body_json(get(app, &url(&id, "/review")).await).await;
    let data = &json["data"];
    assert_eq!(data["can_submit"], true);
    assert_eq!(data["summary"]["customer_name"], "Ana Lopez");
    assert_eq!(data["summary"]["sections"][0]["title"], "Contact");
    assert_eq!(data["summary"]["palette_swatches"][0], "#f7d6e0");
    assert_eq!(data["quote"]["total"], 150);
}

#[tokio::test]
async fn review_before_last_step_cannot_submit() {
    let app = common::build_test_app();
    let id = create_session(&app).await;
    let json = body_json(get(app, &url(&id, "/review")).await).await;
    assert_eq!(json["data"]["can_submit"], false);
}

#[tokio::test]
async fn document_returns_pdf_bytes() {
    let app = common::build_test_app();
    let id = session_on_review(&app).await;

    let response = get(app, &url(&id, "/document")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["content-type"], "application/pdf");
    assert_eq!(
        response.headers()["content-disposition"],
        "attachment; filename=\"invitation-request-ana-lopez.pdf\""
    );
    let bytes = body_bytes(response).await;
    assert!(bytes.starts_with(b"%PDF-1.4"));
    assert!(bytes.ends_with(b"%%EOF\n"));
}

#[tokio::test]
async fn document_as_data_uri() {
    let app = common::build_test_app();
    let id = session_on_review(&app).await;

    let json = body_json(get(app, &url(&id, "/document?format=data_uri")).await).await;
    assert_eq!(json["data"]["file_name"], "invitation-request-ana-lopez.pdf");
    assert!(json["data"]["data_uri"]
        .as_str()
        .unwrap()
        .starts_with("data:application/pdf;base64,JVBERi0xLjQ"));
}

#[tokio::test]
async fn document_rejects_unknown_format() {
    let app = common::build_test_app();
    let id = create_session(&app).await;
    let response = get(app, &url(&id, "/document?format=docx")).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Submission
// ---------------------------------------------------------------------------

#[tokio::test]
async fn submit_without_relay_returns_503() {
    let app = common::build_test_app();
    let id = session_on_review(&app).await;

    let response = post_empty(app.clone(), &url(&id, "/submit")).await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let json = body_json(response).await;
    assert_eq!(json["code"], "DELIVERY_UNAVAILABLE");

    let json = body_json(get(app, &url(&id, "")).await).await;
    assert_eq!(json["data"]["submission"]["state"], "idle");
}

#[tokio::test]
async fn submit_sends_payload_and_locks_session() {
    let submitter = Arc::new(RecordingSubmitter::default());
    let app = common::build_test_app_with_submitter(Arc::clone(&submitter));
    let id = session_on_review(&app).await;

    let response = post_empty(app.clone(), &url(&id, "/submit")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["submission"]["state"], "submitted");
    assert_eq!(json["data"]["answers"]["submitted"], true);

    {
        let sent = submitter.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        let payload = &sent[0];
        assert_eq!(payload.access_key, "test-access-key");
        assert_eq!(payload.subject, "New invitation request from Ana Lopez");
        assert_eq!(payload.email, "studio@example.com");
        assert_eq!(payload.replyto, "ana@example.com");
        assert_eq!(payload.attachment.filename, "invitation-request-ana-lopez.pdf");
    }

    let response = post_empty(app.clone(), &url(&id, "/submit")).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let answers = serde_json::to_value(complete_answers()).unwrap();
    let response = put_json(app, &url(&id, "/answers"), answers).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(submitter.sent_count(), 1);
}

#[tokio::test]
async fn submit_before_review_is_rejected() {
    let submitter = Arc::new(RecordingSubmitter::default());
    let app = common::build_test_app_with_submitter(Arc::clone(&submitter));
    let id = create_session(&app).await;

    let response = post_empty(app, &url(&id, "/submit")).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(submitter.sent_count(), 0);
}

#[tokio::test]
async fn failed_submission_can_be_retried() {
    let submitter = Arc::new(RecordingSubmitter::failing(500));
    let app = common::build_test_app_with_submitter(Arc::clone(&submitter));
    let id = session_on_review(&app).await;

    let response = post_empty(app.clone(), &url(&id, "/submit")).await;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let json = body_json(response).await;
    assert_eq!(json["code"], "DELIVERY_FAILED");

    let json = body_json(get(app.clone(), &url(&id, "")).await).await;
    assert_eq!(json["data"]["submission"]["state"], "failed");
    assert_eq!(
        json["data"]["submission"]["message"],
        "Form relay returned HTTP 500"
    );

    submitter.recover();
    let response = post_empty(app, &url(&id, "/submit")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(submitter.sent_count(), 1);
}

#[tokio::test]
async fn session_is_locked_while_submission_in_flight() {
    let submitter = Arc::new(RecordingSubmitter::slow(Duration::from_millis(300)));
    let app = common::build_test_app_with_submitter(Arc::clone(&submitter));
    let id = session_on_review(&app).await;

    let submit_app = app.clone();
    let submit_url = url(&id, "/submit");
    let in_flight = tokio::spawn(async move { post_empty(submit_app, &submit_url).await });
    tokio::time::sleep(Duration::from_millis(50)).await;

    let json = body_json(get(app.clone(), &url(&id, "")).await).await;
    assert_eq!(json["data"]["submission"]["state"], "submitting");

    let response = post_empty(app.clone(), &url(&id, "/reset")).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let answers = serde_json::to_value(complete_answers()).unwrap();
    let response = put_json(app.clone(), &url(&id, "/answers"), answers).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = in_flight.await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(get(app.clone(), &url(&id, "")).await).await;
    assert_eq!(json["data"]["submission"]["state"], "submitted");
    assert_eq!(json["data"]["answers"]["name"], "Ana Lopez");
    assert_eq!(submitter.sent_count(), 1);

    // A completed order may be cleared to start a new one.
    let json = body_json(post_empty(app, &url(&id, "/reset")).await).await;
    assert_eq!(json["data"]["submission"]["state"], "idle");
    assert_eq!(json["data"]["answers"]["submitted"], false);
}

// ---------------------------------------------------------------------------
// Session limits
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_session_refused_when_store_full() {
    let mut config = common::test_config();
    config.max_sessions = 2;
    let app = common::build_test_app_with_config(config);

    for _ in 0..2 {
        let response = post_empty(app.clone(), "/api/v1/order-sessions").await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }
    let response = post_empty(app.clone(), "/api/v1/order-sessions").await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let json = body_json(response).await;
    assert_eq!(json["code"], "SESSION_LIMIT_REACHED");

    let json = body_json(get(app, "/health").await).await;
    assert_eq!(json["active_sessions"], 2);
}

#[tokio::test]
async fn idle_sessions_are_reclaimed_for_new_ones() {
    let mut config = common::test_config();
    config.max_sessions = 1;
    config.session_idle_ttl_secs = 0;
    let app = common::build_test_app_with_config(config);

    let first = create_session(&app).await;
    let response = post_empty(app.clone(), "/api/v1/order-sessions").await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = get(app, &url(&first, "")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
