#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use chrono::{Days, NaiveDate, Utc};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use invitewiz_api::config::ServerConfig;
use invitewiz_api::router::build_app_router;
use invitewiz_api::state::{AppState, OrderDelivery};
use invitewiz_core::deadline::is_booked;
use invitewiz_core::order::{AnimationStyle, DeliveryFormat, Occasion, OrderForm, VisualStyle};
use invitewiz_core::submission::{RelayPayload, RelaySettings};
use invitewiz_delivery::{OrderSubmitter, RelayError};

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        intro_popup_delay_secs: 5,
        order_recipient: "studio@example.com".to_string(),
        order_sender_name: "Invitation Studio".to_string(),
        session_idle_ttl_secs: 3600,
        max_sessions: 1000,
    }
}

// ---------------------------------------------------------------------------
// Recording submitter
// ---------------------------------------------------------------------------

/// Submitter that records payloads instead of sending them.
#[derive(Default)]
pub struct RecordingSubmitter {
    pub sent: Mutex<Vec<RelayPayload>>,
    /// When set, every submission fails with this HTTP status.
    pub fail_with_status: Mutex<Option<u16>>,
    /// Simulated relay latency.
    pub delay: Duration,
}

impl RecordingSubmitter {
    pub fn failing(status: u16) -> Self {
        Self {
            fail_with_status: Mutex::new(Some(status)),
            ..Default::default()
        }
    }

    pub fn slow(delay: Duration) -> Self {
        Self {
            delay,
            ..Default::default()
        }
    }

    pub fn recover(&self) {
        *self.fail_with_status.lock().unwrap() = None;
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl OrderSubmitter for RecordingSubmitter {
    async fn submit(&self, payload: &RelayPayload) -> Result<(), RelayError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if let Some(status) = *self.fail_with_status.lock().unwrap() {
            return Err(RelayError::HttpStatus(status));
        }
        self.sent.lock().unwrap().push(payload.clone());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// App builders
// ---------------------------------------------------------------------------

/// Full application router with no relay configured.
pub fn build_test_app() -> Router {
    build_app(test_config(), None)
}

/// Full application router built from a custom configuration.
pub fn build_test_app_with_config(config: ServerConfig) -> Router {
    build_app(config, None)
}

/// Full application router that submits through `submitter`.
pub fn build_test_app_with_submitter(submitter: Arc<RecordingSubmitter>) -> Router {
    let config = test_config();
    let settings = RelaySettings {
        access_key: "test-access-key".to_string(),
        recipient: config.order_recipient.clone(),
        sender_name: config.order_sender_name.clone(),
    };
    build_app(
        config,
        Some(OrderDelivery {
            submitter,
            settings,
        }),
    )
}

fn build_app(config: ServerConfig, delivery: Option<OrderDelivery>) -> Router {
    let state = AppState {
        config: Arc::new(config.clone()),
        sessions: Arc::new(config.session_store()),
        delivery,
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_empty(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> Response<Body> {
    send_json(app, Method::POST, uri, body).await
}

pub async fn put_json(app: Router, uri: &str, body: Value) -> Response<Body> {
    send_json(app, Method::PUT, uri, body).await
}

async fn send_json(app: Router, method: Method, uri: &str, body: Value) -> Response<Body> {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// First free date between 20 and 39 days out, so no price adjustment applies.
pub fn regular_deadline() -> NaiveDate {
    let today = Utc::now().date_naive();
    (20..40)
        .map(|d| today.checked_add_days(Days::new(d)).unwrap())
        .find(|date| !is_booked(*date))
        .unwrap()
}

/// Answers that pass every step: a video with no characters.
pub fn complete_answers() -> OrderForm {
    OrderForm {
        name: "Ana Lopez".into(),
        email: "ana@example.com".into(),
        occasion: Some(Occasion::Wedding),
        delivery_formats: vec![DeliveryFormat::Video],
        message: "Join us for our wedding".into(),
        color_palette: Some("preset####f7d6e0,#f2b5d4###Blush Garden".into()),
        animation_styles: vec![AnimationStyle::Confetti],
        visual_style: Some(VisualStyle::Floral),
        deadline: Some(regular_deadline()),
        ..Default::default()
    }
}

/// Create a session and return its id.
pub async fn create_session(app: &Router) -> String {
    let response = post_empty(app.clone(), "/api/v1/order-sessions").await;
    let json = body_json(response).await;
    json["data"]["id"].as_str().unwrap().to_string()
}

/// Create a session, fill in complete answers and walk it to the review step.
pub async fn session_on_review(app: &Router) -> String {
    let id = create_session(app).await;
    let answers = serde_json::to_value(complete_answers()).unwrap();
    put_json(app.clone(), &format!("/api/v1/order-sessions/{id}/answers"), answers).await;
    for _ in 0..8 {
        post_empty(app.clone(), &format!("/api/v1/order-sessions/{id}/advance")).await;
    }
    id
}
