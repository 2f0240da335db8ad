//! Handlers for invitation order wizard sessions.
//!
//! A session holds one customer's answers while they step through the
//! wizard. These endpoints create sessions, move between steps, price and
//! summarise the order, render the PDF and finally hand it to the relay.

use axum::extract::{Path, Query, State};
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use invitewiz_core::document::{attachment_file_name, render_summary_pdf, to_data_uri};
use invitewiz_core::order::OrderForm;
use invitewiz_core::pricing::{calculate_price, Quote};
use invitewiz_core::review::ReviewSummary;
use invitewiz_core::submission::{RelayPayload, PDF_CONTENT_TYPE};
use invitewiz_core::types::{SessionId, Timestamp};
use invitewiz_core::wizard::{
    can_advance_step, FormController, SubmissionState, WizardStep, TOTAL_STEPS,
};

use crate::error::{AppError, AppResult};
use crate::handlers::today;
use crate::response::DataResponse;
use crate::sessions::OrderSession;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for jumping to a step.
#[derive(Debug, Deserialize)]
pub struct GoToStepRequest {
    /// 0-based step index.
    pub step: u8,
}

#[derive(Debug, Deserialize)]
pub struct DocumentParams {
    /// `data_uri` returns JSON instead of raw PDF bytes.
    pub format: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct StepView {
    pub index: u8,
    pub step: WizardStep,
    pub label: &'static str,
    pub reached: bool,
    pub complete: bool,
}

/// Client-facing view of a session.
#[derive(Debug, Serialize)]
pub struct SessionView {
    pub id: SessionId,
    pub current_step: WizardStep,
    pub step_index: u8,
    pub total_steps: u8,
    pub max_step_reached: WizardStep,
    pub can_advance: bool,
    pub steps: Vec<StepView>,
    pub answers: OrderForm,
    pub submission: SubmissionState,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl SessionView {
    fn build(session: &OrderSession, today: NaiveDate) -> Self {
        let controller = &session.controller;
        let steps = WizardStep::ALL
            .iter()
            .map(|&step| StepView {
                index: step.index(),
                step,
                label: step.label(),
                reached: step <= controller.max_step_reached,
                complete: can_advance_step(step, &controller.answers, today),
            })
            .collect();
        Self {
            id: session.id,
            current_step: controller.current_step,
            step_index: controller.current_step.index(),
            total_steps: TOTAL_STEPS,
            max_step_reached: controller.max_step_reached,
            can_advance: can_advance_step(controller.current_step, &controller.answers, today),
            steps,
            answers: controller.answers.clone(),
            submission: controller.submission.clone(),
            created_at: session.created_at,
            updated_at: session.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ReviewView {
    pub summary: ReviewSummary,
    pub quote: Quote,
    pub can_submit: bool,
}

#[derive(Debug, Serialize)]
pub struct DocumentView {
    pub file_name: String,
    pub data_uri: String,
}

fn session_response(session: &OrderSession) -> Json<DataResponse<SessionView>> {
    Json(DataResponse {
        data: SessionView::build(session, today()),
    })
}

fn summarise(controller: &FormController, today: NaiveDate) -> (Quote, ReviewSummary) {
    let quote = calculate_price(&controller.answers, today);
    let summary = ReviewSummary::build(&controller.answers, &quote);
    (quote, summary)
}

// ---------------------------------------------------------------------------
// POST /order-sessions
// ---------------------------------------------------------------------------

/// Start a new wizard session. Refused with 503 while the store is full.
pub async fn create_session(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let session = state
        .sessions
        .create()
        .await
        .ok_or(AppError::SessionLimitReached)?;
    tracing::info!(session_id = %session.id, "Order session created");
    Ok((StatusCode::CREATED, session_response(&session)))
}

// ---------------------------------------------------------------------------
// GET /order-sessions/{id}
// ---------------------------------------------------------------------------

pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<SessionId>,
) -> AppResult<impl IntoResponse> {
    let session = state.sessions.get(id).await?;
    Ok(session_response(&session))
}

// ---------------------------------------------------------------------------
// PUT /order-sessions/{id}/answers
// ---------------------------------------------------------------------------

/// Replace the session's answers. Rejected once the order is submitted.
pub async fn update_answers(
    State(state): State<AppState>,
    Path(id): Path<SessionId>,
    Json(answers): Json<OrderForm>,
) -> AppResult<impl IntoResponse> {
    let ((), session) = state
        .sessions
        .update(id, |controller| controller.update(answers))
        .await?;
    tracing::debug!(session_id = %id, "Order answers updated");
    Ok(session_response(&session))
}

// ---------------------------------------------------------------------------
// POST /order-sessions/{id}/advance
// ---------------------------------------------------------------------------

/// Validate the current step and move forward.
pub async fn advance_step(
    State(state): State<AppState>,
    Path(id): Path<SessionId>,
) -> AppResult<impl IntoResponse> {
    let today = today();
    let (step, session) = state
        .sessions
        .update(id, |controller| controller.next(today))
        .await?;
    tracing::info!(session_id = %id, step = step.index(), "Order wizard advanced");
    Ok(session_response(&session))
}

// ---------------------------------------------------------------------------
// POST /order-sessions/{id}/go-back
// ---------------------------------------------------------------------------

pub async fn go_back(
    State(state): State<AppState>,
    Path(id): Path<SessionId>,
) -> AppResult<impl IntoResponse> {
    let (step, session) = state.sessions.update(id, FormController::back).await?;
    tracing::info!(session_id = %id, step = step.index(), "Order wizard went back");
    Ok(session_response(&session))
}

// ---------------------------------------------------------------------------
// POST /order-sessions/{id}/go-to
// ---------------------------------------------------------------------------

/// Jump to a step the customer has already reached.
pub async fn go_to_step(
    State(state): State<AppState>,
    Path(id): Path<SessionId>,
    Json(body): Json<GoToStepRequest>,
) -> AppResult<impl IntoResponse> {
    let target = WizardStep::from_index(body.step)?;
    let (step, session) = state
        .sessions
        .update(id, |controller| controller.go_to(target))
        .await?;
    tracing::info!(session_id = %id, step = step.index(), "Order wizard jumped to step");
    Ok(session_response(&session))
}

// ---------------------------------------------------------------------------
// POST /order-sessions/{id}/reset
// ---------------------------------------------------------------------------

/// Clear all answers and return to the first step.
///
/// Rejected with 409 while a submission is in flight.
pub async fn reset_session(
    State(state): State<AppState>,
    Path(id): Path<SessionId>,
) -> AppResult<impl IntoResponse> {
    let ((), session) = state
        .sessions
        .update(id, FormController::reset)
        .await?;
    tracing::info!(session_id = %id, "Order session reset");
    Ok(session_response(&session))
}

// ---------------------------------------------------------------------------
// GET /order-sessions/{id}/quote
// ---------------------------------------------------------------------------

pub async fn get_quote(
    State(state): State<AppState>,
    Path(id): Path<SessionId>,
) -> AppResult<impl IntoResponse> {
    let session = state.sessions.get(id).await?;
    let quote = calculate_price(&session.controller.answers, today());
    Ok(Json(DataResponse { data: quote }))
}

// ---------------------------------------------------------------------------
// GET /order-sessions/{id}/review
// ---------------------------------------------------------------------------

/// Review summary and price, plus whether the order may be submitted now.
pub async fn get_review(
    State(state): State<AppState>,
    Path(id): Path<SessionId>,
) -> AppResult<impl IntoResponse> {
    let session = state.sessions.get(id).await?;
    let today = today();
    let controller = &session.controller;
    let (quote, summary) = summarise(controller, today);
    let can_submit = controller.current_step == WizardStep::Review
        && !matches!(
            controller.submission,
            SubmissionState::Submitting | SubmissionState::Submitted
        )
        && can_advance_step(WizardStep::Review, &controller.answers, today);
    Ok(Json(DataResponse {
        data: ReviewView {
            summary,
            quote,
            can_submit,
        },
    }))
}

// ---------------------------------------------------------------------------
// GET /order-sessions/{id}/document
// ---------------------------------------------------------------------------

/// Render the order summary as a PDF.
///
/// Returns `application/pdf` bytes by default, or
/// `{ file_name, data_uri }` with `?format=data_uri`.
pub async fn get_document(
    State(state): State<AppState>,
    Path(id): Path<SessionId>,
    Query(params): Query<DocumentParams>,
) -> AppResult<Response> {
    let session = state.sessions.get(id).await?;
    let (_, summary) = summarise(&session.controller, today());
    let pdf = render_summary_pdf(&summary);
    let file_name = attachment_file_name(&summary.customer_name);

    match params.format.as_deref() {
        None | Some("pdf") => Ok((
            [
                (CONTENT_TYPE, PDF_CONTENT_TYPE.to_string()),
                (
                    CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{file_name}\""),
                ),
            ],
            pdf,
        )
            .into_response()),
        Some("data_uri") => Ok(Json(DataResponse {
            data: DocumentView {
                file_name,
                data_uri: to_data_uri(&pdf),
            },
        })
        .into_response()),
        Some(other) => Err(AppError::BadRequest(format!(
            "Unknown document format '{other}'. Use 'pdf' or 'data_uri'"
        ))),
    }
}

// ---------------------------------------------------------------------------
// POST /order-sessions/{id}/submit
// ---------------------------------------------------------------------------

/// Send the finished order, with its PDF summary, through the form relay.
///
/// One attempt is made. On failure the session is marked failed and the
/// customer may submit again. The session stays in `Submitting` for the
/// duration of the relay call, which locks out edits, navigation and reset.
pub async fn submit_order(
    State(state): State<AppState>,
    Path(id): Path<SessionId>,
) -> AppResult<impl IntoResponse> {
    let delivery = state.delivery.clone().ok_or(AppError::RelayNotConfigured)?;
    let today = today();

    let (payload, _) = state
        .sessions
        .update(id, |controller| {
            controller.begin_submission(today)?;
            let (_, summary) = summarise(controller, today);
            let pdf = render_summary_pdf(&summary);
            Ok(RelayPayload::build(
                &controller.answers,
                &summary,
                &pdf,
                &delivery.settings,
            ))
        })
        .await?;

    match delivery.submitter.submit(&payload).await {
        Ok(()) => {
            let ((), session) = state
                .sessions
                .update(id, FormController::mark_submitted)
                .await?;
            tracing::info!(session_id = %id, "Order submitted");
            Ok(session_response(&session))
        }
        Err(err) => {
            let message = err.to_string();
            state
                .sessions
                .update(id, |controller| controller.mark_failed(message))
                .await?;
            tracing::warn!(session_id = %id, error = %err, "Order submission failed");
            Err(err.into())
        }
    }
}
